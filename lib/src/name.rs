//! Human-readable, globally disambiguated names for shapes.
//!
//! A [`Name`] keeps every candidate the ladder can offer, ordered by priority.
//! Candidates that depend on the uniqueness of a curie reference are kept as
//! curies and only evaluated when the name is resolved, so a name built early
//! in the traversal still reflects curies registered later.

use crate::curie::{Curie, CurieRegistry};
use crate::shape::{Shape, ShapeId};
use log::trace;
use oxigraph::model::{NamedNode, NamedOrBlankNode};
use regex::Regex;
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

/// Where a name candidate comes from, highest priority first.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NameSource {
    /// Explicit override attached to the shape.
    Override,
    /// `sh:name`
    ShaclName,
    /// `rdfs:label`
    Label,
    /// Local part of the property path IRI, if unique across the graph.
    PathLocal,
    /// `prefix_reference` of the property path IRI.
    PathCompact,
    /// Local part of the shape IRI, if unique across the graph.
    IdentifierLocal,
    /// `prefix_reference` of the shape IRI.
    IdentifierCompact,
    /// SPARQL rendering of the property path.
    PathString,
    /// The raw identifier.
    Identifier,
}

#[derive(Debug, Clone, PartialEq)]
enum Candidate {
    Fixed(NameSource, String),
    /// Present only while the curie's reference is unique.
    UniqueReference(NameSource, Curie),
    Compact(NameSource, Curie),
}

impl Candidate {
    fn source(&self) -> NameSource {
        match self {
            Candidate::Fixed(source, _)
            | Candidate::UniqueReference(source, _)
            | Candidate::Compact(source, _) => *source,
        }
    }

    fn value(&self) -> Option<String> {
        match self {
            Candidate::Fixed(_, value) => Some(value.clone()),
            Candidate::UniqueReference(_, curie) => curie
                .has_unique_reference()
                .then(|| curie.reference().to_string()),
            Candidate::Compact(_, curie) => Some(curie.compact()),
        }
    }
}

/// Prioritized bundle of name candidates for one shape.
///
/// The last candidate is always the raw identifier, so a name always resolves.
#[derive(Debug, Clone, PartialEq)]
pub struct Name {
    candidates: Vec<Candidate>,
}

impl Name {
    /// Resolves the winning candidate against the current registry state.
    pub fn resolved(&self) -> String {
        self.resolved_with_source().1
    }

    /// The winning candidate and the rung of the ladder it came from.
    pub fn resolved_with_source(&self) -> (NameSource, String) {
        for candidate in &self.candidates {
            if let Some(value) = candidate.value() {
                return (candidate.source(), value);
            }
        }
        // Unreachable: construction always appends the identifier candidate.
        (NameSource::Identifier, String::new())
    }

    /// The resolved name, normalized into `[A-Za-z_][A-Za-z0-9_]*`.
    pub fn identifier(&self) -> String {
        sanitize(&self.resolved())
    }

    /// The terminal fallback: the full identifier string.
    pub fn raw(&self) -> &str {
        match self.candidates.last() {
            Some(Candidate::Fixed(NameSource::Identifier, raw)) => raw,
            _ => "",
        }
    }

    /// Every candidate with its current value (`None` for a non-unique local part).
    pub fn candidates(&self) -> Vec<(NameSource, Option<String>)> {
        self.candidates
            .iter()
            .map(|c| (c.source(), c.value()))
            .collect()
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.resolved())
    }
}

fn separator_regex() -> &'static Regex {
    static SEPARATORS: OnceLock<Regex> = OnceLock::new();
    SEPARATORS.get_or_init(|| Regex::new(r"[^A-Za-z0-9_]+").expect("static regex"))
}

fn sanitize(name: &str) -> String {
    let joined = separator_regex().replace_all(name, "_");
    let trimmed = joined.trim_matches('_');
    if trimmed.is_empty() {
        return "_".to_string();
    }
    if trimmed.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{}", trimmed)
    } else {
        trimmed.to_string()
    }
}

/// Builds [`Name`]s, registering every IRI it shrinks with the curie registry.
///
/// Names are memoized per identifier; resolving the same shape twice returns
/// the same candidates without registering its curies a second time. Shapes
/// and bare IRIs are memoized apart, since an IRI may be both.
#[derive(Debug)]
pub struct NameResolver {
    registry: CurieRegistry,
    shapes: HashMap<ShapeId, Name>,
    iris: HashMap<NamedNode, Name>,
}

impl NameResolver {
    pub fn new(registry: CurieRegistry) -> Self {
        NameResolver {
            registry,
            shapes: HashMap::new(),
            iris: HashMap::new(),
        }
    }

    pub fn registry(&self) -> &CurieRegistry {
        &self.registry
    }

    pub fn resolve(&mut self, shape: &Shape) -> Name {
        if let Some(name) = self.shapes.get(shape.id()) {
            return name.clone();
        }
        let name = self.build(shape);
        trace!("Built name candidates for {}: {:?}", shape.id(), name.candidates());
        self.shapes.insert(shape.id().clone(), name.clone());
        name
    }

    /// Name of a bare IRI, such as an enumeration member.
    pub fn resolve_iri(&mut self, iri: &NamedNode) -> Name {
        if let Some(name) = self.iris.get(iri) {
            return name.clone();
        }
        let mut candidates = Vec::new();
        if let Some(curie) = self.registry.create(iri.as_ref()) {
            candidates.push(Candidate::UniqueReference(
                NameSource::IdentifierLocal,
                curie.clone(),
            ));
            candidates.push(Candidate::Compact(NameSource::IdentifierCompact, curie));
        }
        candidates.push(Candidate::Fixed(
            NameSource::Identifier,
            iri.as_str().to_string(),
        ));
        let name = Name { candidates };
        self.iris.insert(iri.clone(), name.clone());
        name
    }

    fn build(&mut self, shape: &Shape) -> Name {
        let base = shape.base();
        let mut candidates = Vec::new();

        if let Some(name) = &base.override_name {
            candidates.push(Candidate::Fixed(NameSource::Override, name.clone()));
        }
        if let Some(name) = &base.name {
            candidates.push(Candidate::Fixed(NameSource::ShaclName, name.clone()));
        }
        if let Some(label) = &base.label {
            candidates.push(Candidate::Fixed(NameSource::Label, label.clone()));
        }

        let path = shape.as_property_shape().map(|p| &p.path);
        if let Some(curie) = path
            .and_then(|p| p.as_predicate())
            .and_then(|predicate| self.registry.create(predicate.as_ref()))
        {
            candidates.push(Candidate::UniqueReference(
                NameSource::PathLocal,
                curie.clone(),
            ));
            candidates.push(Candidate::Compact(NameSource::PathCompact, curie));
        }

        if let NamedOrBlankNode::NamedNode(iri) = &base.id {
            if let Some(curie) = self.registry.create(iri.as_ref()) {
                if shape.as_node_shape().is_some() {
                    candidates.push(Candidate::UniqueReference(
                        NameSource::IdentifierLocal,
                        curie.clone(),
                    ));
                }
                candidates.push(Candidate::Compact(NameSource::IdentifierCompact, curie));
            }
        }

        if let Some(path) = path {
            candidates.push(Candidate::Fixed(
                NameSource::PathString,
                path.to_sparql_path(),
            ));
        }
        candidates.push(Candidate::Fixed(NameSource::Identifier, raw_identifier(&base.id)));

        Name { candidates }
    }
}

fn raw_identifier(id: &ShapeId) -> String {
    match id {
        NamedOrBlankNode::NamedNode(iri) => iri.as_str().to_string(),
        NamedOrBlankNode::BlankNode(bnode) => format!("_:{}", bnode.as_str()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curie::PrefixMap;
    use crate::shape::{NodeShape, PropertyShape};
    use crate::types::Path;
    use oxigraph::model::BlankNode;

    fn resolver() -> NameResolver {
        let mut prefixes = PrefixMap::new();
        prefixes.insert("ex", "http://example.org/");
        prefixes.insert("schema", "http://schema.org/");
        NameResolver::new(CurieRegistry::new(prefixes))
    }

    fn property(id: impl Into<ShapeId>, path: &str) -> Shape {
        PropertyShape::new(id, Path::Predicate(NamedNode::new_unchecked(path))).into()
    }

    #[test]
    fn override_beats_shacl_name_beats_label() {
        let mut names = resolver();
        let mut node = NodeShape::new(NamedNode::new_unchecked("http://example.org/Person"));
        node.base.label = Some("A person".to_string());
        node.base.name = Some("person".to_string());
        let shape: Shape = node.clone().into();
        assert_eq!(names.resolve(&shape).resolved(), "person");

        node.base.override_name = Some("Human".to_string());
        let shape: Shape = node.into();
        let mut fresh = resolver();
        assert_eq!(
            fresh.resolve(&shape).resolved_with_source(),
            (NameSource::Override, "Human".to_string())
        );
    }

    #[test]
    fn path_local_part_until_it_becomes_ambiguous() {
        let mut names = resolver();
        let first = names.resolve(&property(BlankNode::default(), "http://example.org/name"));
        assert_eq!(
            first.resolved_with_source(),
            (NameSource::PathLocal, "name".to_string())
        );

        names.resolve(&property(BlankNode::default(), "http://schema.org/name"));
        // The first name was built before the clash and still sees it.
        assert_eq!(
            first.resolved_with_source(),
            (NameSource::PathCompact, "ex_name".to_string())
        );
    }

    #[test]
    fn blank_node_without_information_falls_back_to_raw_identifier() {
        let mut names = resolver();
        let bnode = BlankNode::new_unchecked("b0");
        let shape: Shape = NodeShape::new(bnode).into();
        let name = names.resolve(&shape);
        assert_eq!(name.resolved(), "_:b0");
        assert_eq!(name.raw(), "_:b0");
        assert_eq!(name.identifier(), "b0");
        assert!(!name.resolved().is_empty());
    }

    #[test]
    fn unshrinkable_node_shape_uses_full_iri() {
        let mut names = resolver();
        let shape: Shape = NodeShape::new(NamedNode::new_unchecked("urn:x:Thing")).into();
        let name = names.resolve(&shape);
        assert_eq!(name.resolved(), "urn:x:Thing");
        assert_eq!(name.identifier(), "urn_x_Thing");
    }

    #[test]
    fn property_shape_iri_never_offers_its_local_part() {
        let mut names = resolver();
        let shape = property(
            NamedNode::new_unchecked("http://example.org/shapes/p1"),
            "urn:x:p",
        );
        let sources: Vec<NameSource> = names
            .resolve(&shape)
            .candidates()
            .into_iter()
            .map(|(s, _)| s)
            .collect();
        assert_eq!(
            sources,
            vec![
                NameSource::IdentifierCompact,
                NameSource::PathString,
                NameSource::Identifier
            ]
        );
    }

    #[test]
    fn resolution_is_memoized() {
        let mut names = resolver();
        let shape = property(BlankNode::default(), "http://example.org/age");
        names.resolve(&shape);
        names.resolve(&shape);
        assert_eq!(names.registry().prefix_count("age"), 1);
    }

    #[test]
    fn shape_and_bare_iri_names_do_not_leak_into_each_other() {
        let red = NamedNode::new_unchecked("http://example.org/Red");
        let mut node = NodeShape::new(red.clone());
        node.base.label = Some("Crimson".to_string());
        let shape: Shape = node.into();

        let mut names = resolver();
        assert_eq!(names.resolve_iri(&red).resolved(), "Red");
        assert_eq!(
            names.resolve(&shape).resolved_with_source(),
            (NameSource::Label, "Crimson".to_string())
        );

        let mut names = resolver();
        assert_eq!(names.resolve(&shape).resolved(), "Crimson");
        assert_eq!(
            names.resolve_iri(&red).resolved_with_source(),
            (NameSource::IdentifierLocal, "Red".to_string())
        );
        assert_eq!(names.registry().prefix_count("Red"), 1);
    }

    #[test]
    fn sanitize_handles_digits_and_punctuation() {
        assert_eq!(sanitize("3d model"), "_3d_model");
        assert_eq!(sanitize("ex:has-part"), "ex_has_part");
        assert_eq!(sanitize("::"), "_");
    }
}
