//! The typed AST produced by the transformer.
//!
//! Types live in an arena and refer to each other through [`TypeId`] handles.
//! Every shape of the input graph maps to a [`CardinalityType`]: an item type
//! paired with the cardinality wrapper of the use site.

pub mod graphviz;

use crate::curie::PrefixMap;
use crate::model::Annotations;
use crate::name::Name;
use crate::shape::ShapeId;
use crate::types::{NodeKind, TypeId, Visibility};
use crate::value::DefaultValue;
use oxigraph::model::{Literal, NamedNode, Term};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::ops::Index;

/// How many values an item type takes.
#[derive(Debug, Clone, PartialEq)]
pub enum Cardinality {
    /// Zero or one value.
    Option,
    /// Exactly one value, optionally substituted by a default.
    Plain { default: Option<DefaultValue> },
    /// `min_count` or more values.
    Set { min_count: u64, mutable: bool },
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cardinality::Option => f.write_str("Option"),
            Cardinality::Plain { default: None } => f.write_str("Plain"),
            Cardinality::Plain {
                default: Some(value),
            } => write!(f, "Plain(default = {:?})", value),
            Cardinality::Set {
                min_count,
                mutable: true,
            } => write!(f, "MutableSet(min = {})", min_count),
            Cardinality::Set { min_count, .. } => write!(f, "Set(min = {})", min_count),
        }
    }
}

/// An item type with its cardinality.
#[derive(Debug, Clone, PartialEq)]
pub struct CardinalityType {
    pub cardinality: Cardinality,
    pub item: TypeId,
}

/// `rdfs:comment` (or `sh:description`) and `rdfs:label` of the source shape.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Doc {
    pub comment: Option<String>,
    pub label: Option<String>,
}

/// A property of an [`ObjectType`].
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub shape: ShapeId,
    pub name: Name,
    pub path: NamedNode,
    pub ty: CardinalityType,
    pub mutable: bool,
    pub visibility: Visibility,
    pub order: Option<f64>,
    pub lazy: bool,
    pub group: Option<ShapeId>,
    pub doc: Doc,
}

/// A struct-like type built from a node shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectType {
    pub shape: ShapeId,
    pub name: Name,
    pub parent: Option<TypeId>,
    pub properties: Vec<Property>,
    pub closed: bool,
    pub ignored_properties: Vec<NamedNode>,
    pub classes: Vec<NamedNode>,
    pub annotations: Annotations,
    pub doc: Doc,
}

/// Members of an `sh:and` or `sh:xone`.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeType {
    pub shape: ShapeId,
    pub name: Name,
    pub members: Vec<TypeId>,
    pub doc: Doc,
}

/// A blank node or IRI, possibly restricted to known values.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentifierType {
    pub shape: ShapeId,
    pub name: Name,
    pub has_values: Vec<NamedNode>,
    pub in_list: Vec<NamedNode>,
    pub classes: Vec<NamedNode>,
    pub doc: Doc,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LiteralType {
    pub shape: ShapeId,
    pub name: Name,
    pub datatype: NamedNode,
    pub has_values: Vec<Literal>,
    pub in_list: Vec<Literal>,
    pub language_in: Vec<String>,
    pub min_exclusive: Option<Literal>,
    pub min_inclusive: Option<Literal>,
    pub max_exclusive: Option<Literal>,
    pub max_inclusive: Option<Literal>,
    pub min_length: Option<u64>,
    pub max_length: Option<u64>,
    pub pattern: Option<String>,
    pub doc: Doc,
}

/// Any RDF term; the fallback when nothing narrower applies.
#[derive(Debug, Clone, PartialEq)]
pub struct TermType {
    pub shape: ShapeId,
    pub name: Name,
    pub node_kind: Option<NodeKind>,
    pub has_values: Vec<Term>,
    pub in_list: Vec<Term>,
    pub doc: Doc,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumMember {
    pub iri: NamedNode,
    pub name: Name,
}

/// A closed set of IRIs.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumType {
    pub shape: ShapeId,
    pub name: Name,
    pub members: Vec<EnumMember>,
    pub doc: Doc,
}

/// An ordered collection of `item`.
#[derive(Debug, Clone, PartialEq)]
pub struct ListType {
    pub shape: ShapeId,
    pub name: Name,
    pub item: TypeId,
    pub doc: Doc,
}

/// Slot reserved for a shape whose type is still being computed.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceholderType {
    pub shape: ShapeId,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Object(ObjectType),
    ObjectUnion(CompositeType),
    ObjectIntersection(CompositeType),
    Identifier(IdentifierType),
    BlankNode(IdentifierType),
    Iri(IdentifierType),
    Literal(LiteralType),
    Term(TermType),
    Intersection(CompositeType),
    Union(CompositeType),
    Enum(EnumType),
    List(ListType),
    Placeholder(PlaceholderType),
}

impl Type {
    pub fn shape(&self) -> &ShapeId {
        match self {
            Type::Object(t) => &t.shape,
            Type::ObjectUnion(t)
            | Type::ObjectIntersection(t)
            | Type::Intersection(t)
            | Type::Union(t) => &t.shape,
            Type::Identifier(t) | Type::BlankNode(t) | Type::Iri(t) => &t.shape,
            Type::Literal(t) => &t.shape,
            Type::Term(t) => &t.shape,
            Type::Enum(t) => &t.shape,
            Type::List(t) => &t.shape,
            Type::Placeholder(t) => &t.shape,
        }
    }

    /// `None` only for placeholders.
    pub fn name(&self) -> Option<&Name> {
        match self {
            Type::Object(t) => Some(&t.name),
            Type::ObjectUnion(t)
            | Type::ObjectIntersection(t)
            | Type::Intersection(t)
            | Type::Union(t) => Some(&t.name),
            Type::Identifier(t) | Type::BlankNode(t) | Type::Iri(t) => Some(&t.name),
            Type::Literal(t) => Some(&t.name),
            Type::Term(t) => Some(&t.name),
            Type::Enum(t) => Some(&t.name),
            Type::List(t) => Some(&t.name),
            Type::Placeholder(_) => None,
        }
    }

    pub fn doc(&self) -> Option<&Doc> {
        match self {
            Type::Object(t) => Some(&t.doc),
            Type::ObjectUnion(t)
            | Type::ObjectIntersection(t)
            | Type::Intersection(t)
            | Type::Union(t) => Some(&t.doc),
            Type::Identifier(t) | Type::BlankNode(t) | Type::Iri(t) => Some(&t.doc),
            Type::Literal(t) => Some(&t.doc),
            Type::Term(t) => Some(&t.doc),
            Type::Enum(t) => Some(&t.doc),
            Type::List(t) => Some(&t.doc),
            Type::Placeholder(_) => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Type::Object(_) => "Object",
            Type::ObjectUnion(_) => "ObjectUnion",
            Type::ObjectIntersection(_) => "ObjectIntersection",
            Type::Identifier(_) => "Identifier",
            Type::BlankNode(_) => "BlankNode",
            Type::Iri(_) => "Iri",
            Type::Literal(_) => "Literal",
            Type::Term(_) => "Term",
            Type::Intersection(_) => "Intersection",
            Type::Union(_) => "Union",
            Type::Enum(_) => "Enum",
            Type::List(_) => "List",
            Type::Placeholder(_) => "Placeholder",
        }
    }

    /// Object, Object-Union or Object-Intersection.
    pub fn is_object_like(&self) -> bool {
        matches!(
            self,
            Type::Object(_) | Type::ObjectUnion(_) | Type::ObjectIntersection(_)
        )
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Type::Placeholder(_))
    }

    pub fn as_object(&self) -> Option<&ObjectType> {
        match self {
            Type::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Every handle this type holds: parent, property items, members, list item.
    pub fn children(&self) -> Vec<TypeId> {
        match self {
            Type::Object(o) => o
                .parent
                .iter()
                .copied()
                .chain(o.properties.iter().map(|p| p.ty.item))
                .collect(),
            Type::ObjectUnion(c)
            | Type::ObjectIntersection(c)
            | Type::Intersection(c)
            | Type::Union(c) => c.members.clone(),
            Type::List(l) => vec![l.item],
            _ => Vec::new(),
        }
    }

    pub(crate) fn children_mut(&mut self) -> Vec<&mut TypeId> {
        match self {
            Type::Object(o) => o
                .parent
                .iter_mut()
                .chain(o.properties.iter_mut().map(|p| &mut p.ty.item))
                .collect(),
            Type::ObjectUnion(c)
            | Type::ObjectIntersection(c)
            | Type::Intersection(c)
            | Type::Union(c) => c.members.iter_mut().collect(),
            Type::List(l) => vec![&mut l.item],
            _ => Vec::new(),
        }
    }
}

/// The result of a transform: a type arena plus a per-shape lookup.
#[derive(Debug, Clone, Default)]
pub struct Ast {
    types: Vec<Type>,
    lookup: HashMap<ShapeId, CardinalityType>,
    names: HashMap<ShapeId, Name>,
    order: Vec<ShapeId>,
    prefixes: PrefixMap,
}

impl Ast {
    pub(crate) fn new(prefixes: PrefixMap) -> Self {
        Ast {
            prefixes,
            ..Default::default()
        }
    }

    pub fn get(&self, id: TypeId) -> Option<&Type> {
        self.types.get(id.0)
    }

    pub fn types(&self) -> impl Iterator<Item = (TypeId, &Type)> {
        self.types.iter().enumerate().map(|(i, t)| (TypeId(i), t))
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// The cardinality-wrapped type of a shape.
    pub fn lookup(&self, shape: &ShapeId) -> Option<&CardinalityType> {
        self.lookup.get(shape)
    }

    /// The item type of a shape.
    pub fn shape_type(&self, shape: &ShapeId) -> Option<&Type> {
        self.lookup(shape).and_then(|ct| self.get(ct.item))
    }

    /// Shapes in input order.
    pub fn shapes(&self) -> &[ShapeId] {
        &self.order
    }

    pub fn objects(&self) -> impl Iterator<Item = &ObjectType> {
        self.types.iter().filter_map(Type::as_object)
    }

    pub fn name(&self, shape: &ShapeId) -> Option<&Name> {
        self.names.get(shape)
    }

    /// Resolved name of every shape, in input order.
    pub fn names(&self) -> Vec<(&ShapeId, String)> {
        self.order
            .iter()
            .filter_map(|id| self.names.get(id).map(|name| (id, name.resolved())))
            .collect()
    }

    pub fn prefixes(&self) -> &PrefixMap {
        &self.prefixes
    }

    /// Short rendering of a cardinality type, such as `Set(min = 0)<Literal xsd_string>`.
    pub fn describe(&self, ty: &CardinalityType) -> String {
        format!("{}<{}>", ty.cardinality, self.describe_type(ty.item))
    }

    pub fn describe_type(&self, id: TypeId) -> String {
        match self.get(id) {
            None => format!("<missing {}>", id),
            Some(Type::Placeholder(p)) => format!("Placeholder({})", p.shape),
            Some(Type::Literal(l)) => format!("Literal {}", l.datatype),
            Some(Type::List(l)) => format!("List<{}>", self.describe_type(l.item)),
            Some(ty) => match ty.name() {
                Some(name) => format!("{} {}", ty.kind(), name),
                None => ty.kind().to_string(),
            },
        }
    }

    pub(crate) fn alloc(&mut self, ty: Type) -> TypeId {
        self.types.push(ty);
        TypeId(self.types.len() - 1)
    }

    pub(crate) fn objects_mut(&mut self) -> impl Iterator<Item = &mut ObjectType> {
        self.types.iter_mut().filter_map(|ty| match ty {
            Type::Object(object) => Some(object),
            _ => None,
        })
    }

    pub(crate) fn get_mut(&mut self, id: TypeId) -> Option<&mut Type> {
        self.types.get_mut(id.0)
    }

    /// Overwrites a slot. Returns false if the slot does not exist.
    pub(crate) fn set(&mut self, id: TypeId, ty: Type) -> bool {
        match self.get_mut(id) {
            Some(slot) => {
                *slot = ty;
                true
            }
            None => false,
        }
    }

    pub(crate) fn insert_lookup(&mut self, shape: ShapeId, ty: CardinalityType) {
        self.lookup.insert(shape, ty);
    }

    pub(crate) fn insert_name(&mut self, shape: ShapeId, name: Name) {
        self.names.insert(shape, name);
    }

    pub(crate) fn set_order(&mut self, order: Vec<ShapeId>) {
        self.order = order;
    }

    pub(crate) fn lookups(&self) -> impl Iterator<Item = (&ShapeId, &CardinalityType)> {
        self.lookup.iter()
    }

    /// Replaces every handle found in `map`, in types and in the lookup.
    pub(crate) fn rewrite(&mut self, map: &HashMap<TypeId, TypeId>) {
        for ty in &mut self.types {
            for handle in ty.children_mut() {
                if let Some(target) = map.get(handle) {
                    *handle = *target;
                }
            }
        }
        for ct in self.lookup.values_mut() {
            if let Some(target) = map.get(&ct.item) {
                ct.item = *target;
            }
        }
    }

    /// Drops every slot not in `keep` and renumbers the remaining ones.
    pub(crate) fn compact(&mut self, keep: &[TypeId]) {
        let renumber: BTreeMap<TypeId, TypeId> = keep
            .iter()
            .enumerate()
            .map(|(new, old)| (*old, TypeId(new)))
            .collect();
        let mut types: Vec<Option<Type>> = std::mem::take(&mut self.types)
            .into_iter()
            .map(Some)
            .collect();
        self.types = keep
            .iter()
            .filter_map(|old| types.get_mut(old.0).and_then(Option::take))
            .collect();
        let map: HashMap<TypeId, TypeId> = renumber.into_iter().collect();
        self.rewrite(&map);
    }
}

impl Index<TypeId> for Ast {
    type Output = Type;

    fn index(&self, id: TypeId) -> &Type {
        &self.types[id.0]
    }
}

impl fmt::Display for Ast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for id in &self.order {
            let name = self.names.get(id).map(Name::resolved).unwrap_or_default();
            match self.lookup.get(id) {
                Some(ty) => writeln!(f, "{} ({}): {}", name, id, self.describe(ty))?,
                None => writeln!(f, "{} ({}): <untyped>", name, id)?,
            }
        }
        for object in self.objects() {
            writeln!(f)?;
            write!(f, "object {}", object.name)?;
            if let Some(parent) = object.parent {
                write!(f, " : {}", self.describe_type(parent))?;
            }
            writeln!(f, " {{")?;
            for property in &object.properties {
                writeln!(
                    f,
                    "    {} <{}>: {}",
                    property.name,
                    property.path.as_str(),
                    self.describe(&property.ty)
                )?;
            }
            writeln!(f, "}}")?;
        }
        Ok(())
    }
}
