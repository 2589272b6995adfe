//! Whole-graph transformation with cycle-safe memoization.
//!
//! Every shape moves through Unvisited -> Resolving -> Resolved. A shape that
//! starts resolving gets a placeholder slot in the type arena before any
//! recursion, so re-entering it (through an object property, a parent or a
//! composite member) hands out the slot instead of recursing again. A
//! property shape also records its cardinality from its bounds before
//! recursing; a default value is coerced once its item type is known and
//! settled into every property that re-entered the shape. When the shape's
//! type is known it is written into that slot. Shapes whose type is
//! another shape's type (aliases) are backpatched once the whole graph has
//! been visited by rewriting every handle to their slot.

use crate::ast::graphviz::{reachable, reachable_placeholders, structural_cycles};
use crate::ast::{Ast, Cardinality, CardinalityType, PlaceholderType, Type};
use crate::constraint_stack::ConstraintStack;
use crate::curie::{CurieRegistry, PrefixMap};
use crate::error::TransformError;
use crate::model::ShapesGraph;
use crate::name::NameResolver;
use crate::shape::{Shape, ShapeId};
use crate::types::TypeId;
use log::{debug, info, trace};
use std::collections::{HashMap, HashSet};

/// Knobs for a single transform.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct TransformOptions {
    /// Reject malformed boolean and string defaults instead of coercing them
    /// to `false` and `""`.
    pub strict_defaults: bool,
}

#[derive(Debug, Clone)]
enum Memo {
    /// Item slot and the cardinality known before classification.
    Resolving(TypeId, Cardinality),
    Resolved(CardinalityType),
}

#[derive(Debug)]
struct Alias {
    slot: TypeId,
    target: TypeId,
    shape: ShapeId,
}

/// Compiles one [`ShapesGraph`] into an [`Ast`].
///
/// A transformer is single use; independent graphs need independent instances.
pub struct Transformer<'g> {
    pub(crate) graph: &'g ShapesGraph,
    pub(crate) options: TransformOptions,
    pub(crate) names: NameResolver,
    pub(crate) ast: Ast,
    /// Slots of object shapes whose properties are still being resolved.
    pub(crate) pending_objects: HashSet<TypeId>,
    memo: HashMap<ShapeId, Memo>,
    /// Property shapes handed out while still resolving.
    reentered: HashSet<ShapeId>,
    scopes: Vec<ConstraintStack<'g>>,
    aliases: Vec<Alias>,
}

impl<'g> Transformer<'g> {
    pub fn new(graph: &'g ShapesGraph, prefixes: PrefixMap) -> Self {
        Transformer {
            graph,
            options: TransformOptions::default(),
            names: NameResolver::new(CurieRegistry::new(prefixes.clone())),
            ast: Ast::new(prefixes),
            pending_objects: HashSet::new(),
            memo: HashMap::new(),
            reentered: HashSet::new(),
            scopes: Vec::new(),
            aliases: Vec::new(),
        }
    }

    pub fn with_options(mut self, options: TransformOptions) -> Self {
        self.options = options;
        self
    }

    /// The curie registry shared by every name of the resulting AST.
    pub fn registry(&self) -> &CurieRegistry {
        self.names.registry()
    }

    /// Runs the transform. No partial AST is returned on failure.
    pub fn transform(mut self) -> Result<Ast, TransformError> {
        let graph = self.graph;
        info!("Transforming {} shapes", graph.len());
        for shape in graph.shapes() {
            self.in_fresh_scope(|t| t.resolve_shape(shape.id()))?;
        }
        info!(
            "Inferred {} types, backpatching {} aliases",
            self.ast.len(),
            self.aliases.len()
        );
        self.settle_reentered_properties();
        self.backpatch_aliases()?;
        self.check_lazy_properties()?;
        self.close()?;
        self.ast.set_order(graph.shapes().map(|s| s.id().clone()).collect());
        info!(
            "Transformed {} shapes into {} types ({} objects)",
            graph.len(),
            self.ast.len(),
            self.ast.objects().count()
        );
        Ok(self.ast)
    }

    /// Runs `f` with an empty constraint stack, for shapes referenced rather
    /// than composed.
    pub(crate) fn in_fresh_scope<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, TransformError>,
    ) -> Result<T, TransformError> {
        self.scopes.push(ConstraintStack::new());
        let result = f(self);
        self.scopes.pop();
        result
    }

    pub(crate) fn scope(&self, shape: &ShapeId) -> Result<&ConstraintStack<'g>, TransformError> {
        self.scopes
            .last()
            .ok_or_else(|| TransformError::invariant(shape, "no open constraint scope"))
    }

    fn scope_mut(&mut self, shape: &ShapeId) -> Result<&mut ConstraintStack<'g>, TransformError> {
        self.scopes
            .last_mut()
            .ok_or_else(|| TransformError::invariant(shape, "no open constraint scope"))
    }

    /// Resolves a shape to its cardinality type, memoized.
    pub(crate) fn resolve_shape(
        &mut self,
        id: &ShapeId,
    ) -> Result<CardinalityType, TransformError> {
        match self.memo.get(id) {
            Some(Memo::Resolved(ty)) => return Ok(ty.clone()),
            Some(Memo::Resolving(slot, cardinality)) => {
                trace!("{} re-entered, using placeholder {}", id, slot);
                let ty = CardinalityType {
                    cardinality: cardinality.clone(),
                    item: *slot,
                };
                self.reentered.insert(id.clone());
                return Ok(ty);
            }
            None => {}
        }
        let graph = self.graph;
        let shape: &'g Shape = graph
            .shape(id)
            .ok_or_else(|| TransformError::invariant(id, "shape is not part of the shapes graph"))?;

        let slot = self.ast.alloc(Type::Placeholder(PlaceholderType {
            shape: id.clone(),
        }));
        self.scope_mut(id)?.push(shape)?;
        let cardinality = self.provisional_cardinality(shape)?;
        self.memo.insert(id.clone(), Memo::Resolving(slot, cardinality));
        let name = self.names.resolve(shape);
        self.ast.insert_name(id.clone(), name.clone());
        debug!("Resolving {} into slot {}", id, slot);

        let ty = self.infer_type(shape, slot, name)?;
        self.scope_mut(id)?.pop(shape)?;

        debug!("Resolved {} as {}", id, self.ast.describe(&ty));
        self.memo.insert(id.clone(), Memo::Resolved(ty.clone()));
        self.ast.insert_lookup(id.clone(), ty.clone());
        Ok(ty)
    }

    /// The item slot of a referenced shape; a placeholder if it is still resolving.
    pub(crate) fn resolve_reference(
        &mut self,
        from: &ShapeId,
        id: &ShapeId,
    ) -> Result<TypeId, TransformError> {
        match self.memo.get(id) {
            Some(Memo::Resolved(ty)) => return Ok(ty.item),
            Some(Memo::Resolving(slot, _)) => {
                trace!("{} re-enters {}, using placeholder {}", from, id, slot);
                return Ok(*slot);
            }
            None => {}
        }
        if self.graph.shape(id).is_none() {
            return Err(TransformError::malformed(
                from,
                format!("reference to undefined shape {}", id),
            ));
        }
        Ok(self.resolve_shape(id)?.item)
    }

    pub(crate) fn fill(
        &mut self,
        shape: &ShapeId,
        slot: TypeId,
        ty: Type,
    ) -> Result<(), TransformError> {
        if self.ast.set(slot, ty) {
            Ok(())
        } else {
            Err(TransformError::invariant(
                shape,
                format!("slot {} does not exist", slot),
            ))
        }
    }

    pub(crate) fn register_alias(&mut self, slot: TypeId, target: TypeId, shape: &ShapeId) {
        trace!("{} aliases slot {} to {}", shape, slot, target);
        self.aliases.push(Alias {
            slot,
            target,
            shape: shape.clone(),
        });
    }

    /// Follows alias slots registered so far.
    pub(crate) fn follow(&self, id: TypeId) -> TypeId {
        let mut current = id;
        for _ in 0..=self.aliases.len() {
            match self.aliases.iter().find(|alias| alias.slot == current) {
                Some(alias) => current = alias.target,
                None => break,
            }
        }
        current
    }

    /// Object, Object-Union or Object-Intersection, including objects whose
    /// properties are still being resolved.
    pub(crate) fn is_object_like(&self, id: TypeId) -> bool {
        let id = self.follow(id);
        self.pending_objects.contains(&id) || self.ast.get(id).is_some_and(Type::is_object_like)
    }

    /// Replaces the provisional cardinality of properties whose shape was
    /// re-entered with the final one, which carries the coerced default.
    fn settle_reentered_properties(&mut self) {
        if self.reentered.is_empty() {
            return;
        }
        for object in self.ast.objects_mut() {
            for property in &mut object.properties {
                if !self.reentered.contains(&property.shape) {
                    continue;
                }
                if let Some(Memo::Resolved(ty)) = self.memo.get(&property.shape) {
                    property.ty.cardinality = ty.cardinality.clone();
                }
            }
        }
    }

    fn backpatch_aliases(&mut self) -> Result<(), TransformError> {
        let by_slot: HashMap<TypeId, &Alias> =
            self.aliases.iter().map(|alias| (alias.slot, alias)).collect();
        let mut rewrites = HashMap::with_capacity(self.aliases.len());
        for alias in &self.aliases {
            let mut seen = vec![alias.slot];
            let mut shapes = vec![alias.shape.clone()];
            let mut target = alias.target;
            while let Some(next) = by_slot.get(&target) {
                if seen.contains(&target) {
                    shapes.sort_by_key(ToString::to_string);
                    shapes.dedup();
                    return Err(TransformError::UnresolvedCycle { shapes });
                }
                seen.push(target);
                shapes.push(next.shape.clone());
                target = next.target;
            }
            debug!("Backpatching {} slot {} -> {}", alias.shape, alias.slot, target);
            rewrites.insert(alias.slot, target);
        }
        self.ast.rewrite(&rewrites);
        Ok(())
    }

    fn check_lazy_properties(&self) -> Result<(), TransformError> {
        for property in self.graph.property_shapes().filter(|p| p.lazy) {
            let id = &property.base.id;
            let Some(ty) = self.ast.lookup(id) else {
                return Err(TransformError::invariant(id, "property shape was never resolved"));
            };
            let item = match self.ast.get(ty.item) {
                Some(Type::List(list)) => self.ast.get(list.item),
                other => other,
            };
            match item {
                Some(item) if item.is_object_like() => {}
                Some(item) => {
                    return Err(TransformError::malformed(
                        id,
                        format!(
                            "lazy property must refer to an object type, found {}",
                            item.kind()
                        ),
                    ))
                }
                None => {
                    return Err(TransformError::invariant(
                        id,
                        format!("lazy property refers to missing slot {}", ty.item),
                    ))
                }
            }
        }
        Ok(())
    }

    /// Fails on reachable placeholders and on types that contain themselves
    /// without crossing an object property, then drops unreachable slots.
    fn close(&mut self) -> Result<(), TransformError> {
        let placeholders = reachable_placeholders(&self.ast);
        if !placeholders.is_empty() {
            return Err(TransformError::UnresolvedCycle {
                shapes: placeholders,
            });
        }
        if let Some(shapes) = structural_cycles(&self.ast).into_iter().next() {
            return Err(TransformError::UnresolvedCycle { shapes });
        }
        let keep = reachable(&self.ast);
        debug!("Dropping {} unreachable slots", self.ast.len() - keep.len());
        self.ast.compact(&keep);
        Ok(())
    }
}

/// Transforms `graph` with default options.
pub fn transform(graph: &ShapesGraph, prefixes: PrefixMap) -> Result<Ast, TransformError> {
    Transformer::new(graph, prefixes).transform()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Cardinality;
    use crate::error::ErrorKind;
    use crate::shape::{NodeShape, PropertyShape};
    use crate::types::Path;
    use oxigraph::model::NamedNode;

    fn iri(s: &str) -> NamedNode {
        NamedNode::new_unchecked(format!("http://example.org/{}", s))
    }

    fn prefixes() -> PrefixMap {
        let mut prefixes = PrefixMap::with_defaults();
        prefixes.insert("ex", "http://example.org/");
        prefixes
    }

    #[test]
    fn memoized_shapes_share_a_slot() {
        let mut a = NodeShape::new(iri("A"));
        a.properties = vec![iri("p").into(), iri("q").into()];
        let mut p = PropertyShape::new(iri("p"), Path::Predicate(iri("p")));
        p.base.constraints.node = vec![iri("B").into()];
        let mut q = PropertyShape::new(iri("q"), Path::Predicate(iri("q")));
        q.base.constraints.node = vec![iri("B").into()];

        let mut builder = ShapesGraph::builder();
        builder
            .add_shape(a)
            .add_shape(p)
            .add_shape(q)
            .add_shape(NodeShape::new(iri("B")));
        let graph = builder.build();
        let ast = transform(&graph, prefixes()).unwrap();

        let b = ast.lookup(&iri("B").into()).unwrap().item;
        assert_eq!(ast.lookup(&iri("p").into()).unwrap().item, b);
        assert_eq!(ast.lookup(&iri("q").into()).unwrap().item, b);
        assert_eq!(ast.objects().count(), 2);
        assert!(ast.types().all(|(_, t)| !t.is_placeholder()));
    }

    #[test]
    fn property_reached_again_while_resolving_keeps_its_cardinality() {
        // p is resolved first and reaches itself through A.
        let mut p = PropertyShape::new(iri("p"), Path::Predicate(iri("p")));
        p.base.constraints.node = vec![iri("A").into()];
        p.base.constraints.max_count = Some(1);
        let mut a = NodeShape::new(iri("A"));
        a.properties = vec![iri("p").into()];

        let mut builder = ShapesGraph::builder();
        builder.add_shape(p).add_shape(a);
        let ast = transform(&builder.build(), prefixes()).unwrap();

        let a_item = ast.lookup(&iri("A").into()).unwrap().item;
        let a_object = ast[a_item].as_object().unwrap();
        assert_eq!(a_object.properties[0].ty.cardinality, Cardinality::Option);
        assert_eq!(a_object.properties[0].ty.item, a_item);
        assert_eq!(ast.lookup(&iri("p").into()).unwrap().item, a_item);
        assert!(ast.types().all(|(_, t)| !t.is_placeholder()));
    }

    #[test]
    fn self_inheritance_is_an_unresolved_cycle() {
        let mut a = NodeShape::new(iri("A"));
        a.base.constraints.node = vec![iri("A").into()];
        let mut builder = ShapesGraph::builder();
        builder.add_shape(a);
        let err = transform(&builder.build(), prefixes()).unwrap_err();
        assert!(matches!(err, TransformError::UnresolvedCycle { .. }));
        assert_eq!(err.shape(), Some(&iri("A").into()));
    }

    #[test]
    fn property_aliasing_itself_is_an_unresolved_cycle() {
        let mut p = PropertyShape::new(iri("p"), Path::Predicate(iri("p")));
        p.base.constraints.node = vec![iri("p").into()];
        let mut builder = ShapesGraph::builder();
        builder.add_shape(p);
        let err = transform(&builder.build(), prefixes()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvariantViolation);
        assert!(matches!(err, TransformError::UnresolvedCycle { .. }));
    }

    #[test]
    fn dangling_reference_names_the_referrer() {
        let mut p = PropertyShape::new(iri("p"), Path::Predicate(iri("p")));
        p.base.constraints.node = vec![iri("Missing").into()];
        let mut builder = ShapesGraph::builder();
        builder.add_shape(p);
        let err = transform(&builder.build(), prefixes()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
        assert_eq!(err.shape(), Some(&iri("p").into()));
    }

    #[test]
    fn node_shapes_are_plain() {
        let mut builder = ShapesGraph::builder();
        builder.add_shape(NodeShape::new(iri("A")));
        let ast = transform(&builder.build(), prefixes()).unwrap();
        assert_eq!(
            ast.lookup(&iri("A").into()).unwrap().cardinality,
            Cardinality::Plain { default: None }
        );
        let a: ShapeId = iri("A").into();
        assert_eq!(ast.names(), vec![(&a, "A".to_string())]);
    }
}
