//! Constraint inheritance across composed shapes.
//!
//! `sh:and`/`sh:xone` members may omit constraints declared on the shape that
//! composes them. The stack holds the chain of shapes currently being inferred
//! and answers "first value found, innermost first".

use crate::error::TransformError;
use crate::shape::Shape;
use oxigraph::model::Term;

#[derive(Debug, Default)]
pub struct ConstraintStack<'g> {
    frames: Vec<&'g Shape>,
}

impl<'g> ConstraintStack<'g> {
    pub fn new() -> Self {
        ConstraintStack { frames: Vec::new() }
    }

    /// Fails if `shape` is already on the stack.
    pub fn push(&mut self, shape: &'g Shape) -> Result<(), TransformError> {
        if self
            .frames
            .iter()
            .any(|frame| std::ptr::eq(*frame, shape) || frame.id() == shape.id())
        {
            return Err(TransformError::invariant(
                shape.id(),
                "shape is already on the constraint stack",
            ));
        }
        self.frames.push(shape);
        Ok(())
    }

    /// Pops `shape`, which must be the top of the stack.
    pub fn pop(&mut self, shape: &'g Shape) -> Result<(), TransformError> {
        match self.frames.last() {
            None => Err(TransformError::invariant(
                shape.id(),
                "pop from an empty constraint stack",
            )),
            Some(top) if !std::ptr::eq(*top, shape) => Err(TransformError::invariant(
                shape.id(),
                format!("constraint stack top is {}", top.id()),
            )),
            Some(_) => {
                self.frames.pop();
                Ok(())
            }
        }
    }

    pub fn top(&self) -> Option<&'g Shape> {
        self.frames.last().copied()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    fn find<T>(&self, f: impl Fn(&'g Shape) -> Option<T>) -> Option<T> {
        self.frames.iter().rev().find_map(|frame| f(*frame))
    }

    /// `sh:hasValue` values of the innermost shape declaring any.
    pub fn has_values(&self) -> Option<&'g [Term]> {
        self.find(|s| {
            let values = &s.constraints().has_values;
            (!values.is_empty()).then_some(values.as_slice())
        })
    }

    /// `sh:in` of the innermost shape declaring a non-empty one.
    pub fn in_list(&self) -> Option<&'g [Term]> {
        self.find(|s| {
            s.constraints()
                .in_list
                .as_deref()
                .filter(|list| !list.is_empty())
        })
    }

    pub fn default_value(&self) -> Option<&'g Term> {
        self.find(Shape::default_value)
    }

    pub fn min_count(&self) -> Option<u64> {
        self.find(|s| s.constraints().min_count)
    }

    pub fn max_count(&self) -> Option<u64> {
        self.find(|s| s.constraints().max_count)
    }

    /// Mutability of the innermost shape; never inherited.
    pub fn mutable(&self) -> bool {
        self.top().is_some_and(Shape::is_mutable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::shape::{NodeShape, PropertyShape};
    use crate::types::Path;
    use oxigraph::model::{Literal, NamedNode};

    fn iri(s: &str) -> NamedNode {
        NamedNode::new_unchecked(format!("http://example.org/{}", s))
    }

    fn prop(name: &str) -> PropertyShape {
        PropertyShape::new(iri(name), Path::Predicate(iri(name)))
    }

    #[test]
    fn innermost_value_shadows_outer() {
        let mut outer = prop("outer");
        outer.base.constraints.in_list = Some(vec![iri("a").into(), iri("b").into()]);
        outer.base.constraints.min_count = Some(1);
        outer.default_value = Some(Literal::new_simple_literal("outer").into());
        let outer: Shape = outer.into();

        let mut inner = prop("inner");
        inner.default_value = Some(Literal::new_simple_literal("inner").into());
        inner.base.constraints.in_list = Some(vec![]);
        let inner: Shape = inner.into();

        let mut stack = ConstraintStack::new();
        stack.push(&outer).unwrap();
        stack.push(&inner).unwrap();

        assert_eq!(stack.in_list().map(<[Term]>::len), Some(2));
        assert_eq!(stack.min_count(), Some(1));
        assert_eq!(stack.max_count(), None);
        assert_eq!(
            stack.default_value(),
            Some(&Term::from(Literal::new_simple_literal("inner")))
        );
        assert!(stack.has_values().is_none());

        stack.pop(&inner).unwrap();
        stack.pop(&outer).unwrap();
        assert!(stack.is_empty());
        assert!(stack.in_list().is_none());
    }

    #[test]
    fn pop_on_empty_stack_is_an_invariant_violation() {
        let shape: Shape = NodeShape::new(iri("A")).into();
        let mut stack = ConstraintStack::new();
        let err = stack.pop(&shape).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvariantViolation);
    }

    #[test]
    fn popping_a_shape_that_is_not_on_top_fails() {
        let a: Shape = NodeShape::new(iri("A")).into();
        let b: Shape = NodeShape::new(iri("B")).into();
        let mut stack = ConstraintStack::new();
        stack.push(&a).unwrap();
        stack.push(&b).unwrap();
        let err = stack.pop(&a).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvariantViolation);
        assert_eq!(stack.len(), 2);
    }

    #[test]
    fn pushing_twice_fails() {
        let a: Shape = NodeShape::new(iri("A")).into();
        let b: Shape = NodeShape::new(iri("B")).into();
        let mut stack = ConstraintStack::new();
        stack.push(&a).unwrap();
        stack.push(&b).unwrap();
        let err = stack.push(&a).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvariantViolation);
        assert_eq!(err.shape(), Some(a.id()));
    }

    #[test]
    fn mutability_is_read_from_the_top_only() {
        let mut outer = prop("outer");
        outer.mutable = true;
        let outer: Shape = outer.into();
        let inner: Shape = prop("inner").into();
        let mut stack = ConstraintStack::new();
        stack.push(&outer).unwrap();
        assert!(stack.mutable());
        stack.push(&inner).unwrap();
        assert!(!stack.mutable());
    }
}
