use crate::model::Annotations;
use crate::types::{NodeKind, Path, Visibility};
use oxigraph::model::{Literal, NamedNode, NamedOrBlankNode, Term};

/// Identifier of a shape: an IRI or a blank node.
pub type ShapeId = NamedOrBlankNode;

/// The constraint components the transformer reads from a shape.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Constraints {
    pub min_count: Option<u64>,
    pub max_count: Option<u64>,
    pub has_values: Vec<Term>,
    /// `sh:in`; `Some(vec![])` is an explicitly empty enumeration.
    pub in_list: Option<Vec<Term>>,
    pub closed: Option<bool>,
    pub ignored_properties: Vec<NamedNode>,
    pub and: Option<Vec<ShapeId>>,
    pub xone: Option<Vec<ShapeId>>,
    /// `sh:node` references. On a node shape these are its ancestors.
    pub node: Vec<ShapeId>,
    pub class: Vec<NamedNode>,
    pub datatype: Option<NamedNode>,
    pub node_kind: Option<NodeKind>,
    pub min_exclusive: Option<Literal>,
    pub min_inclusive: Option<Literal>,
    pub max_exclusive: Option<Literal>,
    pub max_inclusive: Option<Literal>,
    pub min_length: Option<u64>,
    pub max_length: Option<u64>,
    pub pattern: Option<String>,
    pub language_in: Option<Vec<String>>,
}

impl Constraints {
    /// True when the shape is declared through `sh:and` or `sh:xone`.
    pub fn is_composite(&self) -> bool {
        self.and.is_some() || self.xone.is_some()
    }
}

/// Data shared by node and property shapes.
#[derive(Debug, Clone)]
pub struct ShapeBase {
    pub id: ShapeId,
    /// Explicit override name (extension predicate).
    pub override_name: Option<String>,
    /// `sh:name`
    pub name: Option<String>,
    /// `rdfs:label`
    pub label: Option<String>,
    /// `rdfs:comment`
    pub comment: Option<String>,
    /// `sh:description`
    pub description: Option<String>,
    pub constraints: Constraints,
    /// `rdfs:isDefinedBy`
    pub defined_by: Option<NamedNode>,
    pub annotations: Annotations,
}

impl ShapeBase {
    pub fn new(id: impl Into<ShapeId>) -> Self {
        ShapeBase {
            id: id.into(),
            override_name: None,
            name: None,
            label: None,
            comment: None,
            description: None,
            constraints: Constraints::default(),
            defined_by: None,
            annotations: Annotations::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NodeShape {
    pub base: ShapeBase,
    /// `sh:property`, in declaration order as produced by the loader.
    pub properties: Vec<ShapeId>,
}

impl NodeShape {
    pub fn new(id: impl Into<ShapeId>) -> Self {
        NodeShape {
            base: ShapeBase::new(id),
            properties: Vec::new(),
        }
    }

    /// Ancestor node shapes, declared with `sh:node`.
    pub fn ancestors(&self) -> &[ShapeId] {
        &self.base.constraints.node
    }
}

#[derive(Debug, Clone)]
pub struct PropertyShape {
    pub base: ShapeBase,
    pub path: Path,
    pub default_value: Option<Term>,
    pub mutable: bool,
    pub visibility: Visibility,
    pub order: Option<f64>,
    pub lazy: bool,
    /// Values form an ordered collection rather than a set.
    pub list: bool,
    pub group: Option<ShapeId>,
}

impl PropertyShape {
    pub fn new(id: impl Into<ShapeId>, path: Path) -> Self {
        PropertyShape {
            base: ShapeBase::new(id),
            path,
            default_value: None,
            mutable: false,
            visibility: Visibility::default(),
            order: None,
            lazy: false,
            list: false,
            group: None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Shape {
    NodeShape(NodeShape),
    PropertyShape(PropertyShape),
}

impl Shape {
    pub fn id(&self) -> &ShapeId {
        &self.base().id
    }

    pub fn base(&self) -> &ShapeBase {
        match self {
            Shape::NodeShape(s) => &s.base,
            Shape::PropertyShape(s) => &s.base,
        }
    }

    pub fn constraints(&self) -> &Constraints {
        &self.base().constraints
    }

    pub fn as_node_shape(&self) -> Option<&NodeShape> {
        match self {
            Shape::NodeShape(s) => Some(s),
            Shape::PropertyShape(_) => None,
        }
    }

    pub fn as_property_shape(&self) -> Option<&PropertyShape> {
        match self {
            Shape::NodeShape(_) => None,
            Shape::PropertyShape(s) => Some(s),
        }
    }

    /// `sh:defaultValue`; node shapes never carry one.
    pub fn default_value(&self) -> Option<&Term> {
        self.as_property_shape()
            .and_then(|p| p.default_value.as_ref())
    }

    /// The shape's own mutability flag; node shapes are immutable.
    pub fn is_mutable(&self) -> bool {
        self.as_property_shape().is_some_and(|p| p.mutable)
    }

    /// Documentation comment: `rdfs:comment`, falling back to `sh:description`.
    pub fn comment(&self) -> Option<&str> {
        let base = self.base();
        base.comment.as_deref().or(base.description.as_deref())
    }
}

impl From<NodeShape> for Shape {
    fn from(shape: NodeShape) -> Self {
        Shape::NodeShape(shape)
    }
}

impl From<PropertyShape> for Shape {
    fn from(shape: PropertyShape) -> Self {
        Shape::PropertyShape(shape)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxigraph::model::{BlankNode, Literal};

    #[test]
    fn property_shape_accessors() {
        let mut prop = PropertyShape::new(
            BlankNode::default(),
            Path::Predicate(NamedNode::new_unchecked("http://example.org/age")),
        );
        prop.default_value = Some(Literal::from(0).into());
        prop.mutable = true;
        prop.base.description = Some("Age in years".to_string());
        let shape = Shape::from(prop);
        assert!(shape.is_mutable());
        assert!(shape.default_value().is_some());
        assert_eq!(shape.comment(), Some("Age in years"));
        assert!(shape.as_node_shape().is_none());
    }

    #[test]
    fn node_shape_ancestors_come_from_sh_node() {
        let parent = ShapeId::from(NamedNode::new_unchecked("http://example.org/Parent"));
        let mut node = NodeShape::new(NamedNode::new_unchecked("http://example.org/Child"));
        node.base.constraints.node.push(parent.clone());
        assert_eq!(node.ancestors(), &[parent]);
        let shape = Shape::from(node);
        assert!(!shape.is_mutable());
        assert!(shape.default_value().is_none());
    }
}
