//! Reads SHACL shapes out of an RDF graph into a [`ShapesGraph`].
//!
//! The loader only reads. It does not judge whether a construct is supported:
//! complex property paths, for instance, are parsed faithfully and rejected
//! later by the transformer with the shape that uses them.

use crate::curie::PrefixMap;
use crate::error::ParseError;
use crate::model::{Annotations, Ontology, PropertyGroup, ShapesGraph};
use crate::named_nodes::{AST, OWL, SHACL};
use crate::shape::{Constraints, NodeShape, PropertyShape, ShapeBase, ShapeId};
use crate::types::{NodeKind, Path, Visibility};
use log::{debug, info};
use oxigraph::io::{RdfFormat, RdfParser};
use oxigraph::model::vocab::{rdf, rdfs};
use oxigraph::model::{
    Graph, Literal, NamedNode, NamedNodeRef, NamedOrBlankNode, NamedOrBlankNodeRef, Term,
    TermRef, Triple,
};
use regex::Regex;
use std::collections::{HashSet, VecDeque};
use std::sync::OnceLock;

/// Parses a Turtle document, returning the graph and the prefixes it declares
/// on top of [`PrefixMap::with_defaults`].
pub fn parse_turtle(input: &str) -> Result<(Graph, PrefixMap), ParseError> {
    let mut graph = Graph::new();
    for quad in RdfParser::from_format(RdfFormat::Turtle).for_reader(input.as_bytes()) {
        graph.insert(&Triple::from(quad?));
    }
    let mut prefixes = PrefixMap::with_defaults();
    prefixes.extend(&scan_prefixes(input));
    debug!(
        "Parsed {} triples with {} prefixes",
        graph.len(),
        prefixes.len()
    );
    Ok((graph, prefixes))
}

/// Reads and parses a Turtle file.
pub fn load_turtle(path: impl AsRef<std::path::Path>) -> Result<(Graph, PrefixMap), ParseError> {
    let path = path.as_ref();
    info!("Loading shapes from {}", path.display());
    let input = std::fs::read_to_string(path)?;
    parse_turtle(&input)
}

fn prefix_regex() -> &'static Regex {
    static PREFIX: OnceLock<Regex> = OnceLock::new();
    PREFIX.get_or_init(|| {
        Regex::new(r"(?im)^\s*@?prefix\s+([A-Za-z][\w.-]*)?:\s*<([^>]*)>")
            .expect("static regex")
    })
}

/// `@prefix` and `PREFIX` declarations of a Turtle document.
pub fn scan_prefixes(input: &str) -> PrefixMap {
    let mut prefixes = PrefixMap::new();
    for captures in prefix_regex().captures_iter(input) {
        let prefix = captures.get(1).map_or("", |m| m.as_str());
        prefixes.insert(prefix, &captures[2]);
    }
    prefixes
}

fn object(
    graph: &Graph,
    subject: NamedOrBlankNodeRef<'_>,
    predicate: NamedNodeRef<'_>,
) -> Option<Term> {
    graph
        .object_for_subject_predicate(subject, predicate)
        .map(TermRef::into_owned)
}

fn objects(
    graph: &Graph,
    subject: NamedOrBlankNodeRef<'_>,
    predicate: NamedNodeRef<'_>,
) -> Vec<Term> {
    let mut terms: Vec<Term> = graph
        .objects_for_subject_predicate(subject, predicate)
        .map(TermRef::into_owned)
        .collect();
    terms.sort_by_key(ToString::to_string);
    terms
}

fn as_subject(term: &Term) -> Option<NamedOrBlankNodeRef<'_>> {
    match term {
        Term::NamedNode(n) => Some(n.as_ref().into()),
        Term::BlankNode(b) => Some(b.as_ref().into()),
        _ => None,
    }
}

fn to_shape_id(term: Term, shape: &ShapeId) -> Result<ShapeId, ParseError> {
    match term {
        Term::NamedNode(n) => Ok(n.into()),
        Term::BlankNode(b) => Ok(b.into()),
        other => Err(ParseError::invalid_shape(
            shape.clone(),
            format!("{} is not a shape reference", other),
        )),
    }
}

/// Members of the `rdf:List` starting at `head`.
fn parse_list(graph: &Graph, head: Term, shape: &ShapeId) -> Result<Vec<Term>, ParseError> {
    let mut items = Vec::new();
    let mut visited = HashSet::new();
    let mut current = head;
    loop {
        if current == Term::NamedNode(rdf::NIL.into_owned()) {
            return Ok(items);
        }
        if !visited.insert(current.clone()) {
            return Err(ParseError::invalid_list(shape.clone(), "cyclic rdf:rest chain"));
        }
        let Some(node) = as_subject(&current) else {
            return Err(ParseError::invalid_list(
                shape.clone(),
                format!("{} is not a list node", current),
            ));
        };
        let first = object(graph, node, rdf::FIRST)
            .ok_or_else(|| ParseError::invalid_list(shape.clone(), "missing rdf:first"))?;
        let rest = object(graph, node, rdf::REST)
            .ok_or_else(|| ParseError::invalid_list(shape.clone(), "missing rdf:rest"))?;
        items.push(first);
        current = rest;
    }
}

fn literal(
    term: Option<Term>,
    shape: &ShapeId,
    predicate: NamedNodeRef<'_>,
) -> Result<Option<Literal>, ParseError> {
    match term {
        None => Ok(None),
        Some(Term::Literal(l)) => Ok(Some(l)),
        Some(other) => Err(ParseError::invalid_shape(
            shape.clone(),
            format!("{} must be a literal, found {}", predicate, other),
        )),
    }
}

fn to_iri(
    term: Term,
    shape: &ShapeId,
    predicate: NamedNodeRef<'_>,
) -> Result<NamedNode, ParseError> {
    match term {
        Term::NamedNode(n) => Ok(n),
        other => Err(ParseError::invalid_shape(
            shape.clone(),
            format!("{} must be an IRI, found {}", predicate, other),
        )),
    }
}

fn iri(
    term: Option<Term>,
    shape: &ShapeId,
    predicate: NamedNodeRef<'_>,
) -> Result<Option<NamedNode>, ParseError> {
    term.map(|t| to_iri(t, shape, predicate)).transpose()
}

/// Reads shapes one subject at a time.
struct ShapeReader<'a> {
    graph: &'a Graph,
    shacl: SHACL,
    ast: AST,
}

impl ShapeReader<'_> {
    fn string(
        &self,
        id: &ShapeId,
        predicate: NamedNodeRef<'_>,
    ) -> Result<Option<String>, ParseError> {
        Ok(literal(object(self.graph, id.as_ref(), predicate), id, predicate)?
            .map(|l| l.value().to_string()))
    }

    fn count(&self, id: &ShapeId, predicate: NamedNodeRef<'_>) -> Result<Option<u64>, ParseError> {
        match literal(object(self.graph, id.as_ref(), predicate), id, predicate)? {
            None => Ok(None),
            Some(l) => l.value().parse().map(Some).map_err(|_| {
                ParseError::invalid_shape(
                    id.clone(),
                    format!("{} must be a non-negative integer, found {}", predicate, l),
                )
            }),
        }
    }

    fn boolean(
        &self,
        id: &ShapeId,
        predicate: NamedNodeRef<'_>,
    ) -> Result<Option<bool>, ParseError> {
        match literal(object(self.graph, id.as_ref(), predicate), id, predicate)? {
            None => Ok(None),
            Some(l) => match l.value() {
                "true" | "1" => Ok(Some(true)),
                "false" | "0" => Ok(Some(false)),
                _ => Err(ParseError::invalid_shape(
                    id.clone(),
                    format!("{} must be a boolean, found {}", predicate, l),
                )),
            },
        }
    }

    fn number(&self, id: &ShapeId, predicate: NamedNodeRef<'_>) -> Result<Option<f64>, ParseError> {
        match literal(object(self.graph, id.as_ref(), predicate), id, predicate)? {
            None => Ok(None),
            Some(l) => l.value().parse().map(Some).map_err(|_| {
                ParseError::invalid_shape(
                    id.clone(),
                    format!("{} must be a number, found {}", predicate, l),
                )
            }),
        }
    }

    fn shape_list(
        &self,
        id: &ShapeId,
        predicate: NamedNodeRef<'_>,
    ) -> Result<Option<Vec<ShapeId>>, ParseError> {
        let Some(head) = object(self.graph, id.as_ref(), predicate) else {
            return Ok(None);
        };
        parse_list(self.graph, head, id)?
            .into_iter()
            .map(|term| to_shape_id(term, id))
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }

    fn is_property_shape(&self, id: &ShapeId) -> bool {
        object(self.graph, id.as_ref(), self.shacl.path).is_some()
    }

    fn annotations(&self, id: &ShapeId) -> Result<Annotations, ParseError> {
        let mut annotations = Annotations::default();
        for term in objects(self.graph, id.as_ref(), self.ast.feature) {
            match term {
                Term::Literal(l) => annotations.features.insert(l.value().to_string()),
                Term::NamedNode(n) => annotations.features.insert(n.as_str().to_string()),
                other => {
                    return Err(ParseError::invalid_shape(
                        id.clone(),
                        format!("feature {} must be a string or IRI", other),
                    ))
                }
            };
        }
        annotations.declaration = self.string(id, self.ast.declare)?;
        Ok(annotations)
    }

    fn base(&self, id: &ShapeId) -> Result<ShapeBase, ParseError> {
        let sh = &self.shacl;
        Ok(ShapeBase {
            id: id.clone(),
            override_name: self.string(id, self.ast.name)?,
            name: self.string(id, sh.name)?,
            label: self.string(id, rdfs::LABEL)?,
            comment: self.string(id, rdfs::COMMENT)?,
            description: self.string(id, sh.description)?,
            constraints: self.constraints(id)?,
            defined_by: iri(
                object(self.graph, id.as_ref(), rdfs::IS_DEFINED_BY),
                id,
                rdfs::IS_DEFINED_BY,
            )?,
            annotations: self.annotations(id)?,
        })
    }

    fn constraints(&self, id: &ShapeId) -> Result<Constraints, ParseError> {
        let sh = &self.shacl;
        let graph = self.graph;
        let subject = id.as_ref();

        let in_list = match object(graph, subject, sh.in_) {
            Some(head) => Some(parse_list(graph, head, id)?),
            None => None,
        };
        let ignored_properties = match object(graph, subject, sh.ignored_properties) {
            Some(head) => parse_list(graph, head, id)?
                .into_iter()
                .map(|term| to_iri(term, id, sh.ignored_properties))
                .collect::<Result<Vec<_>, _>>()?,
            None => Vec::new(),
        };
        let language_in = match object(graph, subject, sh.language_in) {
            Some(head) => Some(
                parse_list(graph, head, id)?
                    .into_iter()
                    .filter_map(|term| match term {
                        Term::Literal(l) => Some(l.value().to_string()),
                        _ => None,
                    })
                    .collect(),
            ),
            None => None,
        };
        let node_kind = match iri(object(graph, subject, sh.node_kind), id, sh.node_kind)? {
            Some(kind) => Some(NodeKind::from_iri(kind.as_ref()).ok_or_else(|| {
                ParseError::invalid_shape(id.clone(), format!("unknown node kind {}", kind))
            })?),
            None => None,
        };
        let node = objects(graph, subject, sh.node)
            .into_iter()
            .map(|term| to_shape_id(term, id))
            .collect::<Result<Vec<_>, _>>()?;
        let class = objects(graph, subject, sh.class)
            .into_iter()
            .map(|term| to_iri(term, id, sh.class))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Constraints {
            min_count: self.count(id, sh.min_count)?,
            max_count: self.count(id, sh.max_count)?,
            has_values: objects(graph, subject, sh.has_value),
            in_list,
            closed: self.boolean(id, sh.closed)?,
            ignored_properties,
            and: self.shape_list(id, sh.and)?,
            xone: self.shape_list(id, sh.xone)?,
            node,
            class,
            datatype: iri(object(graph, subject, sh.datatype), id, sh.datatype)?,
            node_kind,
            min_exclusive: literal(object(graph, subject, sh.min_exclusive), id, sh.min_exclusive)?,
            min_inclusive: literal(object(graph, subject, sh.min_inclusive), id, sh.min_inclusive)?,
            max_exclusive: literal(object(graph, subject, sh.max_exclusive), id, sh.max_exclusive)?,
            max_inclusive: literal(object(graph, subject, sh.max_inclusive), id, sh.max_inclusive)?,
            min_length: self.count(id, sh.min_length)?,
            max_length: self.count(id, sh.max_length)?,
            pattern: self.string(id, sh.pattern)?,
            language_in,
        })
    }

    fn path(&self, id: &ShapeId, term: &Term) -> Result<Path, ParseError> {
        let sh = &self.shacl;
        let graph = self.graph;
        let node = match term {
            Term::NamedNode(n) => return Ok(Path::Predicate(n.clone())),
            Term::BlankNode(b) => NamedOrBlankNodeRef::from(b.as_ref()),
            other => {
                return Err(ParseError::invalid_shape(
                    id.clone(),
                    format!("sh:path must be an IRI or blank node, found {}", other),
                ))
            }
        };
        let nested = |inner: Term| self.path(id, &inner).map(Box::new);
        if let Some(head) = object(graph, node, sh.alternative_path) {
            let paths = parse_list(graph, head, id)?
                .iter()
                .map(|p| self.path(id, p))
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(Path::Alternative(paths));
        }
        if let Some(inner) = object(graph, node, sh.inverse_path) {
            return Ok(Path::Inverse(nested(inner)?));
        }
        if let Some(inner) = object(graph, node, sh.zero_or_more_path) {
            return Ok(Path::ZeroOrMore(nested(inner)?));
        }
        if let Some(inner) = object(graph, node, sh.one_or_more_path) {
            return Ok(Path::OneOrMore(nested(inner)?));
        }
        if let Some(inner) = object(graph, node, sh.zero_or_one_path) {
            return Ok(Path::ZeroOrOne(nested(inner)?));
        }
        if object(graph, node, rdf::FIRST).is_some() {
            let paths = parse_list(graph, term.clone(), id)?
                .iter()
                .map(|p| self.path(id, p))
                .collect::<Result<Vec<_>, _>>()?;
            if paths.len() >= 2 {
                return Ok(Path::Sequence(paths));
            }
        }
        Err(ParseError::invalid_shape(id.clone(), "unknown property path structure"))
    }

    fn property_shape(&self, id: &ShapeId) -> Result<PropertyShape, ParseError> {
        let sh = &self.shacl;
        let path_term = object(self.graph, id.as_ref(), sh.path)
            .ok_or_else(|| {
                ParseError::invalid_shape(id.clone(), "property shape without sh:path")
            })?;
        let visibility = match self.string(id, self.ast.visibility)? {
            Some(value) => Visibility::parse(&value).ok_or_else(|| {
                ParseError::invalid_shape(id.clone(), format!("unknown visibility {:?}", value))
            })?,
            None => Visibility::default(),
        };
        let group = match object(self.graph, id.as_ref(), sh.group) {
            Some(term) => Some(to_shape_id(term, id)?),
            None => None,
        };
        Ok(PropertyShape {
            base: self.base(id)?,
            path: self.path(id, &path_term)?,
            default_value: object(self.graph, id.as_ref(), sh.default_value),
            mutable: self.boolean(id, self.ast.mutable)?.unwrap_or(false),
            visibility,
            order: self.number(id, sh.order)?,
            lazy: self.boolean(id, self.ast.lazy)?.unwrap_or(false),
            list: self.boolean(id, self.ast.list)?.unwrap_or(false),
            group,
        })
    }

    /// `sh:property` targets ordered by `sh:order`, unordered last, then by identifier.
    fn node_shape(&self, id: &ShapeId) -> Result<NodeShape, ParseError> {
        let mut properties = objects(self.graph, id.as_ref(), self.shacl.property)
            .into_iter()
            .map(|term| {
                let property = to_shape_id(term, id)?;
                let order = self.number(&property, self.shacl.order)?;
                Ok((order, property))
            })
            .collect::<Result<Vec<_>, ParseError>>()?;
        properties.sort_by(|(oa, a), (ob, b)| {
            let by_order = match (oa, ob) {
                (Some(x), Some(y)) => x.total_cmp(y),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            };
            by_order.then_with(|| a.to_string().cmp(&b.to_string()))
        });
        Ok(NodeShape {
            base: self.base(id)?,
            properties: properties.into_iter().map(|(_, p)| p).collect(),
        })
    }

    fn group(&self, id: &ShapeId) -> Result<PropertyGroup, ParseError> {
        let mut group = PropertyGroup::new(id.clone());
        group.label = self.string(id, rdfs::LABEL)?;
        group.comment = self.string(id, rdfs::COMMENT)?;
        group.order = self.number(id, self.shacl.order)?;
        Ok(group)
    }

    fn ontology(&self, id: NamedNode) -> Result<Ontology, ParseError> {
        let shape_id = ShapeId::from(id.clone());
        let mut ontology = Ontology::new(id);
        ontology.label = self.string(&shape_id, rdfs::LABEL)?;
        ontology.comment = self.string(&shape_id, rdfs::COMMENT)?;
        ontology.annotations = self.annotations(&shape_id)?;
        Ok(ontology)
    }
}

fn typed_subjects(graph: &Graph, class: NamedNodeRef<'_>) -> Vec<NamedOrBlankNode> {
    let mut subjects: Vec<NamedOrBlankNode> = graph
        .subjects_for_predicate_object(rdf::TYPE, class)
        .map(|s| s.into_owned())
        .collect();
    subjects.sort_by_key(ToString::to_string);
    subjects
}

/// Builds a [`ShapesGraph`] from every shape declared or referenced in `graph`.
///
/// Shapes are discovered from `rdf:type sh:NodeShape`/`sh:PropertyShape`,
/// subjects of `sh:property` and `sh:path`, and then every shape those refer to
/// through `sh:property`, `sh:node`, `sh:and` and `sh:xone`. A shape with an
/// `sh:path` is a property shape, anything else a node shape.
pub fn parse_shapes(graph: &Graph) -> Result<ShapesGraph, ParseError> {
    let reader = ShapeReader {
        graph,
        shacl: SHACL::new(),
        ast: AST::new(),
    };
    let sh = &reader.shacl;

    let mut seeds = typed_subjects(graph, sh.node_shape);
    seeds.extend(typed_subjects(graph, sh.property_shape));
    let mut untyped: Vec<NamedOrBlankNode> = graph
        .triples_for_predicate(sh.property)
        .map(|t| t.subject.into_owned())
        .chain(graph.triples_for_predicate(sh.path).map(|t| t.subject.into_owned()))
        .collect();
    untyped.sort_by_key(ToString::to_string);
    seeds.extend(untyped);

    let mut builder = ShapesGraph::builder();
    let mut seen: HashSet<ShapeId> = HashSet::new();
    let mut queue: VecDeque<ShapeId> = seeds.into_iter().collect();
    let mut groups: Vec<ShapeId> = Vec::new();

    while let Some(id) = queue.pop_front() {
        if !seen.insert(id.clone()) {
            continue;
        }
        let referenced = if reader.is_property_shape(&id) {
            let shape = reader.property_shape(&id)?;
            groups.extend(shape.group.iter().cloned());
            let referenced = references(&shape.base.constraints);
            builder.add_shape(shape);
            referenced
        } else {
            let shape = reader.node_shape(&id)?;
            let mut referenced = shape.properties.clone();
            referenced.extend(references(&shape.base.constraints));
            builder.add_shape(shape);
            referenced
        };
        queue.extend(referenced.into_iter().filter(|r| !seen.contains(r)));
    }

    groups.extend(typed_subjects(graph, sh.property_group));
    let mut group_seen = HashSet::new();
    for group in groups {
        if group_seen.insert(group.clone()) {
            builder.add_group(reader.group(&group)?);
        }
    }
    for ontology in typed_subjects(graph, OWL::new().ontology) {
        if let NamedOrBlankNode::NamedNode(id) = ontology {
            builder.add_ontology(reader.ontology(id)?);
        }
    }

    let shapes = builder.build();
    info!(
        "Parsed {} node shapes and {} property shapes",
        shapes.node_shapes().count(),
        shapes.property_shapes().count()
    );
    Ok(shapes)
}

fn references(constraints: &Constraints) -> Vec<ShapeId> {
    constraints
        .node
        .iter()
        .chain(constraints.and.iter().flatten())
        .chain(constraints.xone.iter().flatten())
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::Shape;
    use oxigraph::model::vocab::xsd;

    const SHAPES: &str = r#"
@prefix sh: <http://www.w3.org/ns/shacl#> .
@prefix xsd: <http://www.w3.org/2001/XMLSchema#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix ast: <urn:shacl-ast#> .
PREFIX ex: <http://example.org/>

ex:Person a sh:NodeShape ;
    rdfs:label "Person" ;
    sh:property ex:name, ex:knows, [
        sh:path ex:age ;
        sh:datatype xsd:integer ;
        sh:order 1 ;
        sh:defaultValue 0 ;
    ] .

ex:name sh:path ex:name ;
    sh:datatype xsd:string ;
    sh:minCount 1 ;
    sh:maxCount 1 ;
    sh:order 0 ;
    ast:visibility "private" .

ex:knows sh:path ex:knows ;
    sh:node ex:Person ;
    ast:mutable true ;
    sh:in ( ex:a ex:b ) .
"#;

    fn id(s: &str) -> ShapeId {
        NamedNode::new_unchecked(format!("http://example.org/{}", s)).into()
    }

    #[test]
    fn prefixes_include_declared_and_default_ones() {
        let prefixes = scan_prefixes(SHAPES);
        assert_eq!(prefixes.get("ex"), Some("http://example.org/"));
        assert_eq!(prefixes.get("ast"), Some("urn:shacl-ast#"));
        let (_, all) = parse_turtle(SHAPES).unwrap();
        assert_eq!(all.get("owl"), Some("http://www.w3.org/2002/07/owl#"));
    }

    #[test]
    fn shapes_and_properties_are_read() {
        let (graph, _) = parse_turtle(SHAPES).unwrap();
        let shapes = parse_shapes(&graph).unwrap();
        assert_eq!(shapes.node_shapes().count(), 1);
        assert_eq!(shapes.property_shapes().count(), 3);

        let person = shapes.shape(&id("Person")).unwrap().as_node_shape().unwrap();
        assert_eq!(person.base.label.as_deref(), Some("Person"));
        // Ordered by sh:order, then unordered by identifier.
        assert_eq!(person.properties[0], id("name"));
        assert!(matches!(person.properties[1], NamedOrBlankNode::BlankNode(_)));
        assert_eq!(person.properties[2], id("knows"));

        let name = shapes.shape(&id("name")).unwrap().as_property_shape().unwrap();
        assert_eq!(name.base.constraints.min_count, Some(1));
        assert_eq!(name.base.constraints.datatype, Some(xsd::STRING.into_owned()));
        assert_eq!(name.visibility, Visibility::Private);

        let knows = shapes.shape(&id("knows")).unwrap();
        assert!(knows.is_mutable());
        assert_eq!(knows.constraints().node, vec![id("Person")]);
        assert_eq!(knows.constraints().in_list.as_ref().map(Vec::len), Some(2));

        let age = shapes.shape(&person.properties[1]).unwrap();
        assert!(matches!(age, Shape::PropertyShape(_)));
        assert!(age.default_value().is_some());
    }

    #[test]
    fn complex_paths_are_parsed() {
        let ttl = r#"
@prefix sh: <http://www.w3.org/ns/shacl#> .
@prefix ex: <http://example.org/> .
ex:parent sh:path [ sh:inversePath ex:child ] .
ex:chain sh:path ( ex:a [ sh:zeroOrMorePath ex:b ] ) .
"#;
        let (graph, _) = parse_turtle(ttl).unwrap();
        let shapes = parse_shapes(&graph).unwrap();
        let parent = shapes.shape(&id("parent")).unwrap().as_property_shape().unwrap();
        assert_eq!(parent.path.to_sparql_path(), "^<http://example.org/child>");
        let chain = shapes.shape(&id("chain")).unwrap().as_property_shape().unwrap();
        assert_eq!(
            chain.path.to_sparql_path(),
            "(<http://example.org/a> / <http://example.org/b>*)"
        );
    }

    #[test]
    fn cyclic_lists_are_rejected() {
        let ttl = r#"
@prefix sh: <http://www.w3.org/ns/shacl#> .
@prefix rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#> .
@prefix ex: <http://example.org/> .
ex:S a sh:NodeShape ; sh:xone _:l1 .
_:l1 rdf:first ex:A ; rdf:rest _:l2 .
_:l2 rdf:first ex:B ; rdf:rest _:l1 .
"#;
        let (graph, _) = parse_turtle(ttl).unwrap();
        let err = parse_shapes(&graph).unwrap_err();
        assert!(matches!(err, ParseError::InvalidList { .. }));
    }

    #[test]
    fn invalid_counts_are_rejected() {
        let ttl = r#"
@prefix sh: <http://www.w3.org/ns/shacl#> .
@prefix ex: <http://example.org/> .
ex:p sh:path ex:p ; sh:minCount "many" .
"#;
        let (graph, _) = parse_turtle(ttl).unwrap();
        assert!(matches!(
            parse_shapes(&graph),
            Err(ParseError::InvalidShape { .. })
        ));
    }
}
