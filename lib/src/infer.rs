//! Type inference: ordered classifiers from a shape plus inherited constraints
//! to an AST type, and the cardinality decision table.
//!
//! Classifiers run in a fixed order and the first one that applies wins:
//! composite, object (or a reference to one), enumeration, identifier,
//! literal, and the term fallback which never fails.

use crate::ast::{
    Cardinality, CardinalityType, CompositeType, Doc, EnumMember, EnumType, IdentifierType,
    ListType, LiteralType, ObjectType, Property, TermType, Type,
};
use crate::error::TransformError;
use crate::name::Name;
use crate::shape::{NodeShape, Shape, ShapeId};
use crate::transform::Transformer;
use crate::types::{NodeKind, TypeId};
use crate::value::{coerce_default, DefaultTarget, DefaultValue};
use log::trace;
use oxigraph::model::{Literal, NamedNode, Term};

/// Outcome of classifying a shape.
#[derive(Debug)]
pub(crate) enum Classified {
    /// A new type for the shape's own slot.
    Type(Type),
    /// The shape's item type is the type in another slot.
    Alias(TypeId),
}

/// Which identifier type a node kind narrows to.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum IdentifierKind {
    Identifier,
    BlankNode,
    Iri,
}

/// The cardinality decision table.
///
/// A default always yields `Plain`. Without bounds the values form a set;
/// `max = 1` is optional unless `min = 1` makes it required.
pub fn decide_cardinality(
    shape: &ShapeId,
    min: Option<u64>,
    max: Option<u64>,
    default: Option<DefaultValue>,
    mutable: bool,
) -> Result<Cardinality, TransformError> {
    if let (Some(min), Some(max)) = (min, max) {
        if min > max {
            return Err(TransformError::malformed(
                shape,
                format!("sh:minCount {} is greater than sh:maxCount {}", min, max),
            ));
        }
    }
    if default.is_some() {
        return Ok(Cardinality::Plain { default });
    }
    match (min, max) {
        (None, None) => Ok(Cardinality::Set {
            min_count: 0,
            mutable,
        }),
        (None | Some(0), Some(1)) => Ok(Cardinality::Option),
        (Some(1), Some(1)) => Ok(Cardinality::Plain { default: None }),
        (min, max) if min.is_some() || max.is_some() => Ok(Cardinality::Set {
            min_count: min.unwrap_or(0),
            mutable,
        }),
        _ => Err(TransformError::invariant(
            shape,
            "cardinality table fell through without any bound",
        )),
    }
}

/// Identifier classification: the node kind allows only blank nodes and/or
/// IRIs, or there is no node kind but `sh:class` implies a resource.
pub fn classify_identifier(node_kind: Option<NodeKind>, has_class: bool) -> Option<IdentifierKind> {
    match node_kind {
        Some(NodeKind::BLANK_NODE) => Some(IdentifierKind::BlankNode),
        Some(NodeKind::IRI) => Some(IdentifierKind::Iri),
        Some(kind) if kind.is_identifier_only() => Some(IdentifierKind::Identifier),
        None if has_class => Some(IdentifierKind::Identifier),
        _ => None,
    }
}

/// A non-empty `sh:in` made only of IRIs.
pub fn iri_enumeration(values: &[Term]) -> Option<Vec<NamedNode>> {
    if values.is_empty() {
        return None;
    }
    values
        .iter()
        .map(|value| match value {
            Term::NamedNode(iri) => Some(iri.clone()),
            _ => None,
        })
        .collect()
}

/// Whether a shape is an object declaration.
///
/// Node shapes are objects unless they are composites or describe a single
/// value: a datatype, an enumeration, or a bare node kind.
pub fn object_candidate(shape: &Shape) -> bool {
    let Some(node) = shape.as_node_shape() else {
        return false;
    };
    let c = shape.constraints();
    if c.is_composite() || c.datatype.is_some() || c.in_list.is_some() {
        return false;
    }
    match c.node_kind {
        None => true,
        Some(kind) if kind.literal => false,
        Some(_) => !node.properties.is_empty() || !node.ancestors().is_empty(),
    }
}

fn doc(shape: &Shape) -> Doc {
    Doc {
        comment: shape.comment().map(str::to_string),
        label: shape.base().label.clone(),
    }
}

fn iris(values: &[Term]) -> Vec<NamedNode> {
    values
        .iter()
        .filter_map(|value| match value {
            Term::NamedNode(iri) => Some(iri.clone()),
            _ => None,
        })
        .collect()
}

fn literals(values: &[Term]) -> Vec<Literal> {
    values
        .iter()
        .filter_map(|value| match value {
            Term::Literal(literal) => Some(literal.clone()),
            _ => None,
        })
        .collect()
}

impl<'g> Transformer<'g> {
    /// Infers the type of `shape`, whose placeholder occupies `slot`.
    ///
    /// `shape` must be the top of the current constraint stack.
    pub(crate) fn infer_type(
        &mut self,
        shape: &'g Shape,
        slot: TypeId,
        name: Name,
    ) -> Result<CardinalityType, TransformError> {
        let id = shape.id();
        let list = shape.as_property_shape().is_some_and(|p| p.list);
        let classified = self.classify(shape, slot, name.clone())?;
        let item = match (classified, list) {
            (Classified::Type(ty), false) => {
                self.fill(id, slot, ty)?;
                slot
            }
            (Classified::Alias(target), false) => {
                self.register_alias(slot, target, id);
                target
            }
            (Classified::Type(ty), true) => {
                let inner = self.ast.alloc(ty);
                self.fill(id, slot, list_type(shape, name, inner))?;
                slot
            }
            (Classified::Alias(target), true) => {
                self.fill(id, slot, list_type(shape, name, target))?;
                slot
            }
        };
        self.pending_objects.remove(&slot);

        let cardinality = match shape {
            Shape::NodeShape(_) => Cardinality::Plain { default: None },
            Shape::PropertyShape(_) => self.cardinality(shape, item)?,
        };
        trace!("{} has cardinality {}", id, cardinality);
        Ok(CardinalityType { cardinality, item })
    }

    fn classify(
        &mut self,
        shape: &'g Shape,
        slot: TypeId,
        name: Name,
    ) -> Result<Classified, TransformError> {
        let id = shape.id();
        let c = shape.constraints();

        if let Some(property) = shape.as_property_shape() {
            if property.path.as_predicate().is_none() {
                return Err(TransformError::malformed(
                    id,
                    format!(
                        "only predicate paths are supported, found {} {}",
                        property.path.kind(),
                        property.path
                    ),
                ));
            }
        }

        if c.is_composite() {
            return self.classify_composite(shape, name).map(Classified::Type);
        }

        match shape {
            Shape::NodeShape(node) if object_candidate(shape) => {
                return self
                    .classify_object(shape, node, slot, name)
                    .map(Classified::Type);
            }
            Shape::NodeShape(node) if !node.ancestors().is_empty() => {
                return Err(TransformError::malformed(
                    id,
                    "sh:node on a node shape that does not declare an object",
                ));
            }
            Shape::PropertyShape(_) if !c.node.is_empty() => {
                return self.classify_reference(shape).map(Classified::Alias);
            }
            _ => {}
        }

        if let Some(ty) = self.classify_enum(shape, name.clone())? {
            return Ok(Classified::Type(ty));
        }
        if let Some(ty) = self.classify_identifier(shape, name.clone())? {
            return Ok(Classified::Type(ty));
        }
        if let Some(ty) = self.classify_literal(shape, name.clone())? {
            return Ok(Classified::Type(ty));
        }
        self.classify_term(shape, name).map(Classified::Type)
    }

    fn classify_composite(&mut self, shape: &'g Shape, name: Name) -> Result<Type, TransformError> {
        let id = shape.id();
        let c = shape.constraints();
        let (feature, members, intersection) = match (c.and.as_deref(), c.xone.as_deref()) {
            (Some(_), Some(_)) => {
                return Err(TransformError::ambiguous(
                    id,
                    "sh:and/sh:xone",
                    "a shape declares both a conjunction and an exclusive disjunction",
                ))
            }
            (Some(members), None) => ("sh:and", members, true),
            (None, Some(members)) => ("sh:xone", members, false),
            (None, None) => return Err(TransformError::invariant(id, "not a composite shape")),
        };
        if members.len() < 2 {
            return Err(TransformError::invariant(
                id,
                format!("{} needs at least two members, found {}", feature, members.len()),
            ));
        }
        if !c.node.is_empty() || shape.as_node_shape().is_some_and(|n| !n.properties.is_empty())
        {
            return Err(TransformError::malformed(
                id,
                format!("{} cannot be combined with sh:node or sh:property", feature),
            ));
        }

        // Members are composed with the shape: they resolve in the current scope.
        let mut handles = Vec::with_capacity(members.len());
        for member in members {
            handles.push(self.resolve_reference(id, member)?);
        }
        let objects = handles.iter().all(|handle| self.is_object_like(*handle));
        trace!(
            "{} composes {} members ({})",
            id,
            handles.len(),
            if objects { "objects" } else { "generic" }
        );
        let composite = CompositeType {
            shape: id.clone(),
            name,
            members: handles,
            doc: doc(shape),
        };
        Ok(match (intersection, objects) {
            (true, true) => Type::ObjectIntersection(composite),
            (true, false) => Type::Intersection(composite),
            (false, true) => Type::ObjectUnion(composite),
            (false, false) => Type::Union(composite),
        })
    }

    fn classify_object(
        &mut self,
        shape: &'g Shape,
        node: &'g NodeShape,
        slot: TypeId,
        name: Name,
    ) -> Result<Type, TransformError> {
        let id = shape.id();
        self.pending_objects.insert(slot);

        let parent = match node.ancestors() {
            [] => None,
            [ancestor] => {
                let parent = self.in_fresh_scope(|t| t.resolve_reference(id, ancestor))?;
                if !self.is_object_like(parent) {
                    return Err(TransformError::malformed(
                        id,
                        format!("ancestor {} is not an object shape", ancestor),
                    ));
                }
                Some(parent)
            }
            many => {
                return Err(TransformError::ambiguous(
                    id,
                    "sh:node",
                    format!(
                        "{} ancestors declared, an object has at most one parent",
                        many.len()
                    ),
                ))
            }
        };

        let graph = self.graph;
        let mut properties = Vec::with_capacity(node.properties.len());
        for property_id in &node.properties {
            let Some(property_shape) = graph.shape(property_id) else {
                return Err(TransformError::malformed(
                    id,
                    format!("sh:property refers to undefined shape {}", property_id),
                ));
            };
            let Some(property) = property_shape.as_property_shape() else {
                return Err(TransformError::malformed(
                    id,
                    format!("sh:property {} is not a property shape", property_id),
                ));
            };
            let ty = self.in_fresh_scope(|t| t.resolve_shape(property_id))?;
            let path = property.path.as_predicate().cloned().ok_or_else(|| {
                TransformError::malformed(property_id, "only predicate paths are supported")
            })?;
            properties.push(Property {
                shape: property_id.clone(),
                name: self.names.resolve(property_shape),
                path,
                ty,
                mutable: property.mutable,
                visibility: property.visibility,
                order: property.order,
                lazy: property.lazy,
                group: property.group.clone(),
                doc: doc(property_shape),
            });
        }

        let c = shape.constraints();
        trace!("{} is an object with {} properties", id, properties.len());
        Ok(Type::Object(ObjectType {
            shape: id.clone(),
            name,
            parent,
            properties,
            closed: c.closed.unwrap_or(false),
            ignored_properties: c.ignored_properties.clone(),
            classes: c.class.clone(),
            annotations: graph.effective_annotations(shape),
            doc: doc(shape),
        }))
    }

    /// A property shape whose values conform to a single node shape.
    fn classify_reference(&mut self, shape: &'g Shape) -> Result<TypeId, TransformError> {
        let id = shape.id();
        let c = shape.constraints();
        let target = match c.node.as_slice() {
            [target] => target,
            many => {
                return Err(TransformError::ambiguous(
                    id,
                    "sh:node",
                    format!("{} node shapes referenced, expected exactly one", many.len()),
                ))
            }
        };
        let literal_values = c
            .in_list
            .as_deref()
            .is_some_and(|values| values.iter().any(|v| matches!(v, Term::Literal(_))));
        if c.datatype.is_some() || literal_values {
            return Err(TransformError::malformed(
                id,
                "sh:node cannot be combined with sh:datatype or literal sh:in values",
            ));
        }
        let item = self.in_fresh_scope(|t| t.resolve_reference(id, target))?;
        trace!("{} refers to {} (slot {})", id, target, item);
        Ok(item)
    }

    /// An own `sh:in` of IRIs, or an inherited one when the shape itself is
    /// otherwise unconstrained.
    fn classify_enum(
        &mut self,
        shape: &'g Shape,
        name: Name,
    ) -> Result<Option<Type>, TransformError> {
        let id = shape.id();
        let c = shape.constraints();
        if c.datatype.is_some() {
            return Ok(None);
        }
        let values = match c.in_list.as_deref() {
            Some(own) => Some(own),
            None if c.node_kind.is_none() => self.scope(id)?.in_list(),
            None => None,
        };
        let Some(members) = values.and_then(iri_enumeration) else {
            return Ok(None);
        };
        trace!("{} is an enumeration of {} IRIs", id, members.len());
        let members = members
            .into_iter()
            .map(|iri| EnumMember {
                name: self.names.resolve_iri(&iri),
                iri,
            })
            .collect();
        Ok(Some(Type::Enum(EnumType {
            shape: id.clone(),
            name,
            members,
            doc: doc(shape),
        })))
    }

    fn classify_identifier(
        &mut self,
        shape: &'g Shape,
        name: Name,
    ) -> Result<Option<Type>, TransformError> {
        let id = shape.id();
        let c = shape.constraints();
        if c.datatype.is_some() {
            return Ok(None);
        }
        let Some(kind) = classify_identifier(c.node_kind, !c.class.is_empty()) else {
            return Ok(None);
        };
        let stack = self.scope(id)?;
        let identifier = IdentifierType {
            shape: id.clone(),
            name,
            has_values: iris(stack.has_values().unwrap_or_default()),
            in_list: iris(stack.in_list().unwrap_or_default()),
            classes: c.class.clone(),
            doc: doc(shape),
        };
        trace!("{} is an identifier ({:?})", id, kind);
        Ok(Some(match kind {
            IdentifierKind::Identifier => Type::Identifier(identifier),
            IdentifierKind::BlankNode => Type::BlankNode(identifier),
            IdentifierKind::Iri => Type::Iri(identifier),
        }))
    }

    fn classify_literal(
        &mut self,
        shape: &'g Shape,
        name: Name,
    ) -> Result<Option<Type>, TransformError> {
        let id = shape.id();
        let c = shape.constraints();
        let Some(datatype) = &c.datatype else {
            return Ok(None);
        };
        let stack = self.scope(id)?;
        trace!("{} is a literal of {}", id, datatype);
        Ok(Some(Type::Literal(LiteralType {
            shape: id.clone(),
            name,
            datatype: datatype.clone(),
            has_values: literals(stack.has_values().unwrap_or_default()),
            in_list: literals(stack.in_list().unwrap_or_default()),
            language_in: c.language_in.clone().unwrap_or_default(),
            min_exclusive: c.min_exclusive.clone(),
            min_inclusive: c.min_inclusive.clone(),
            max_exclusive: c.max_exclusive.clone(),
            max_inclusive: c.max_inclusive.clone(),
            min_length: c.min_length,
            max_length: c.max_length,
            pattern: c.pattern.clone(),
            doc: doc(shape),
        })))
    }

    fn classify_term(&mut self, shape: &'g Shape, name: Name) -> Result<Type, TransformError> {
        let id = shape.id();
        let stack = self.scope(id)?;
        trace!("{} falls back to a term", id);
        Ok(Type::Term(TermType {
            shape: id.clone(),
            name,
            node_kind: shape.constraints().node_kind,
            has_values: stack.has_values().unwrap_or_default().to_vec(),
            in_list: stack.in_list().unwrap_or_default().to_vec(),
            doc: doc(shape),
        }))
    }

    /// Cardinality known before the item type, recorded while `shape`
    /// resolves. A default value is left uncoerced until the item is known.
    pub(crate) fn provisional_cardinality(
        &self,
        shape: &'g Shape,
    ) -> Result<Cardinality, TransformError> {
        if shape.as_node_shape().is_some() {
            return Ok(Cardinality::Plain { default: None });
        }
        let id = shape.id();
        let stack = self.scope(id)?;
        if stack.default_value().is_some() {
            return Ok(Cardinality::Plain { default: None });
        }
        decide_cardinality(id, stack.min_count(), stack.max_count(), None, stack.mutable())
    }

    /// Cardinality of a property shape from its own or inherited bounds.
    fn cardinality(&self, shape: &'g Shape, item: TypeId) -> Result<Cardinality, TransformError> {
        let id = shape.id();
        let stack = self.scope(id)?;
        let (min, max, mutable) = (stack.min_count(), stack.max_count(), stack.mutable());
        let default = match stack.default_value() {
            Some(term) => Some(self.coerce(id, term, item)?),
            None => None,
        };
        decide_cardinality(id, min, max, default, mutable)
    }

    fn coerce(
        &self,
        id: &ShapeId,
        term: &Term,
        item: TypeId,
    ) -> Result<DefaultValue, TransformError> {
        let strict = self.options.strict_defaults;
        let item = self.follow(item);
        if self.pending_objects.contains(&item) {
            return coerce_default(id, term, DefaultTarget::Object, strict);
        }
        let members: Vec<NamedNode>;
        let target = match self.ast.get(item) {
            Some(Type::Literal(literal)) => DefaultTarget::Literal(literal.datatype.as_ref()),
            Some(Type::Identifier(i) | Type::BlankNode(i) | Type::Iri(i)) => {
                DefaultTarget::Iri(&i.in_list)
            }
            Some(Type::Enum(e)) => {
                members = e.members.iter().map(|m| m.iri.clone()).collect();
                DefaultTarget::Iri(&members)
            }
            Some(Type::Term(_) | Type::Union(_) | Type::Intersection(_) | Type::Placeholder(_)) => {
                DefaultTarget::Term
            }
            Some(
                Type::Object(_)
                | Type::ObjectUnion(_)
                | Type::ObjectIntersection(_)
                | Type::List(_),
            ) => DefaultTarget::Object,
            None => {
                return Err(TransformError::invariant(
                    id,
                    format!("default value for missing slot {}", item),
                ))
            }
        };
        coerce_default(id, term, target, strict)
    }
}

fn list_type(shape: &Shape, name: Name, item: TypeId) -> Type {
    Type::List(ListType {
        shape: shape.id().clone(),
        name,
        item,
        doc: doc(shape),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::shape::PropertyShape;
    use crate::types::Path;
    use oxigraph::model::vocab::xsd;
    use oxigraph::model::BlankNode;

    fn id() -> ShapeId {
        BlankNode::default().into()
    }

    fn iri(s: &str) -> NamedNode {
        NamedNode::new_unchecked(format!("http://example.org/{}", s))
    }

    #[test]
    fn cardinality_decision_table() {
        let set0 = Cardinality::Set {
            min_count: 0,
            mutable: false,
        };
        assert_eq!(decide_cardinality(&id(), None, None, None, false).unwrap(), set0);
        assert_eq!(
            decide_cardinality(&id(), Some(0), Some(1), None, false).unwrap(),
            Cardinality::Option
        );
        assert_eq!(
            decide_cardinality(&id(), None, Some(1), None, false).unwrap(),
            Cardinality::Option
        );
        assert_eq!(
            decide_cardinality(&id(), Some(1), Some(1), None, false).unwrap(),
            Cardinality::Plain { default: None }
        );
        assert_eq!(
            decide_cardinality(&id(), Some(2), None, None, true).unwrap(),
            Cardinality::Set {
                min_count: 2,
                mutable: true
            }
        );
        assert_eq!(
            decide_cardinality(&id(), Some(1), None, None, false).unwrap(),
            Cardinality::Set {
                min_count: 1,
                mutable: false
            }
        );
    }

    #[test]
    fn default_always_wins() {
        let default = Some(DefaultValue::Integer(0));
        assert_eq!(
            decide_cardinality(&id(), None, None, default.clone(), false).unwrap(),
            Cardinality::Plain {
                default: default.clone()
            }
        );
        assert_eq!(
            decide_cardinality(&id(), Some(0), Some(5), default.clone(), false).unwrap(),
            Cardinality::Plain { default }
        );
    }

    #[test]
    fn min_above_max_is_malformed() {
        let err = decide_cardinality(&id(), Some(3), Some(1), None, false).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
    }

    #[test]
    fn identifier_kinds() {
        assert_eq!(
            classify_identifier(Some(NodeKind::IRI), false),
            Some(IdentifierKind::Iri)
        );
        assert_eq!(
            classify_identifier(Some(NodeKind::BLANK_NODE), false),
            Some(IdentifierKind::BlankNode)
        );
        assert_eq!(
            classify_identifier(Some(NodeKind::BLANK_NODE_OR_IRI), false),
            Some(IdentifierKind::Identifier)
        );
        assert_eq!(classify_identifier(Some(NodeKind::LITERAL), true), None);
        assert_eq!(
            classify_identifier(None, true),
            Some(IdentifierKind::Identifier)
        );
        assert_eq!(classify_identifier(None, false), None);
    }

    #[test]
    fn enumerations_need_only_iris() {
        let values: Vec<Term> = vec![iri("a").into(), iri("b").into()];
        assert_eq!(iri_enumeration(&values), Some(vec![iri("a"), iri("b")]));
        let mixed: Vec<Term> = vec![iri("a").into(), Literal::new_simple_literal("b").into()];
        assert_eq!(iri_enumeration(&mixed), None);
        assert_eq!(iri_enumeration(&[]), None);
    }

    #[test]
    fn object_candidates() {
        let mut node = NodeShape::new(iri("A"));
        assert!(object_candidate(&node.clone().into()));

        node.base.constraints.node_kind = Some(NodeKind::IRI);
        assert!(!object_candidate(&node.clone().into()));
        node.properties.push(iri("p").into());
        assert!(object_candidate(&node.clone().into()));

        node.base.constraints.datatype = Some(xsd::STRING.into_owned());
        assert!(!object_candidate(&node.into()));

        let property: Shape = PropertyShape::new(iri("p"), Path::Predicate(iri("p"))).into();
        assert!(!object_candidate(&property));
    }
}
