//! The immutable input of the transformer.

use crate::shape::{NodeShape, PropertyShape, Shape, ShapeId};
use oxigraph::model::NamedNode;
use std::collections::{BTreeSet, HashMap};

/// Opaque emitter hints: selected features and a declaration-kind hint.
///
/// The transformer never reads these; it copies them onto the AST.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotations {
    pub features: BTreeSet<String>,
    pub declaration: Option<String>,
}

impl Annotations {
    /// Union of the features; the shape's own declaration hint wins.
    pub fn merged_with(&self, outer: &Annotations) -> Annotations {
        Annotations {
            features: self.features.union(&outer.features).cloned().collect(),
            declaration: self.declaration.clone().or_else(|| outer.declaration.clone()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty() && self.declaration.is_none()
    }
}

/// An `owl:Ontology` that shapes can point to with `rdfs:isDefinedBy`.
#[derive(Debug, Clone, PartialEq)]
pub struct Ontology {
    pub id: NamedNode,
    pub label: Option<String>,
    pub comment: Option<String>,
    pub annotations: Annotations,
}

impl Ontology {
    pub fn new(id: NamedNode) -> Self {
        Ontology {
            id,
            label: None,
            comment: None,
            annotations: Annotations::default(),
        }
    }
}

/// A `sh:PropertyGroup`.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyGroup {
    pub id: ShapeId,
    pub label: Option<String>,
    pub comment: Option<String>,
    pub order: Option<f64>,
}

impl PropertyGroup {
    pub fn new(id: impl Into<ShapeId>) -> Self {
        PropertyGroup {
            id: id.into(),
            label: None,
            comment: None,
            order: None,
        }
    }
}

/// Collection of shapes, ontologies and property groups.
///
/// Built once through [`ShapesGraphBuilder`]; iteration follows insertion order.
#[derive(Debug, Clone, Default)]
pub struct ShapesGraph {
    shapes: Vec<Shape>,
    shape_index: HashMap<ShapeId, usize>,
    ontologies: Vec<Ontology>,
    ontology_index: HashMap<NamedNode, usize>,
    groups: Vec<PropertyGroup>,
    group_index: HashMap<ShapeId, usize>,
}

impl ShapesGraph {
    pub fn builder() -> ShapesGraphBuilder {
        ShapesGraphBuilder::default()
    }

    pub fn shape(&self, id: &ShapeId) -> Option<&Shape> {
        self.shape_index.get(id).map(|&i| &self.shapes[i])
    }

    pub fn shapes(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.iter()
    }

    pub fn node_shapes(&self) -> impl Iterator<Item = &NodeShape> {
        self.shapes.iter().filter_map(Shape::as_node_shape)
    }

    pub fn property_shapes(&self) -> impl Iterator<Item = &PropertyShape> {
        self.shapes.iter().filter_map(Shape::as_property_shape)
    }

    pub fn ontology(&self, id: &NamedNode) -> Option<&Ontology> {
        self.ontology_index.get(id).map(|&i| &self.ontologies[i])
    }

    pub fn ontologies(&self) -> impl Iterator<Item = &Ontology> {
        self.ontologies.iter()
    }

    pub fn group(&self, id: &ShapeId) -> Option<&PropertyGroup> {
        self.group_index.get(id).map(|&i| &self.groups[i])
    }

    pub fn groups(&self) -> impl Iterator<Item = &PropertyGroup> {
        self.groups.iter()
    }

    /// Annotations of a shape merged with those of its defining ontology.
    pub fn effective_annotations(&self, shape: &Shape) -> Annotations {
        let base = shape.base();
        match base.defined_by.as_ref().and_then(|o| self.ontology(o)) {
            Some(ontology) => base.annotations.merged_with(&ontology.annotations),
            None => base.annotations.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

/// Accumulates shapes before freezing them into a [`ShapesGraph`].
///
/// Adding an item whose identifier is already present replaces it in place.
#[derive(Debug, Default)]
pub struct ShapesGraphBuilder {
    graph: ShapesGraph,
}

impl ShapesGraphBuilder {
    pub fn add_shape(&mut self, shape: impl Into<Shape>) -> &mut Self {
        let shape = shape.into();
        let id = shape.id().clone();
        match self.graph.shape_index.get(&id) {
            Some(&i) => self.graph.shapes[i] = shape,
            None => {
                self.graph.shape_index.insert(id, self.graph.shapes.len());
                self.graph.shapes.push(shape);
            }
        }
        self
    }

    pub fn add_ontology(&mut self, ontology: Ontology) -> &mut Self {
        match self.graph.ontology_index.get(&ontology.id) {
            Some(&i) => self.graph.ontologies[i] = ontology,
            None => {
                self.graph
                    .ontology_index
                    .insert(ontology.id.clone(), self.graph.ontologies.len());
                self.graph.ontologies.push(ontology);
            }
        }
        self
    }

    pub fn add_group(&mut self, group: PropertyGroup) -> &mut Self {
        match self.graph.group_index.get(&group.id) {
            Some(&i) => self.graph.groups[i] = group,
            None => {
                self.graph
                    .group_index
                    .insert(group.id.clone(), self.graph.groups.len());
                self.graph.groups.push(group);
            }
        }
        self
    }

    pub fn contains_shape(&self, id: &ShapeId) -> bool {
        self.graph.shape_index.contains_key(id)
    }

    pub fn build(self) -> ShapesGraph {
        self.graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Path;

    fn iri(s: &str) -> NamedNode {
        NamedNode::new_unchecked(format!("http://example.org/{}", s))
    }

    #[test]
    fn builder_keeps_insertion_order_and_replaces_duplicates() {
        let mut builder = ShapesGraph::builder();
        builder
            .add_shape(NodeShape::new(iri("A")))
            .add_shape(PropertyShape::new(iri("p"), Path::Predicate(iri("p"))))
            .add_shape(NodeShape::new(iri("B")));
        let mut replacement = NodeShape::new(iri("A"));
        replacement.base.label = Some("Replaced".to_string());
        builder.add_shape(replacement);
        let graph = builder.build();

        let ids: Vec<String> = graph.shapes().map(|s| s.id().to_string()).collect();
        assert_eq!(
            ids,
            vec![
                "<http://example.org/A>",
                "<http://example.org/p>",
                "<http://example.org/B>"
            ]
        );
        assert_eq!(graph.node_shapes().count(), 2);
        assert_eq!(graph.property_shapes().count(), 1);
        let a = graph.shape(&iri("A").into()).unwrap();
        assert_eq!(a.base().label.as_deref(), Some("Replaced"));
    }

    #[test]
    fn ontology_annotations_flow_into_shapes() {
        let mut ontology = Ontology::new(iri("onto"));
        ontology.annotations.features.insert("rdf-mapping".to_string());
        ontology.annotations.declaration = Some("class".to_string());

        let mut shape = NodeShape::new(iri("A"));
        shape.base.defined_by = Some(iri("onto"));
        shape.base.annotations.features.insert("builder".to_string());
        shape.base.annotations.declaration = Some("record".to_string());

        let mut builder = ShapesGraph::builder();
        builder.add_ontology(ontology).add_shape(shape);
        let graph = builder.build();

        let shape = graph.shape(&iri("A").into()).unwrap();
        let merged = graph.effective_annotations(shape);
        assert_eq!(merged.features.len(), 2);
        assert_eq!(merged.declaration.as_deref(), Some("record"));
    }
}
