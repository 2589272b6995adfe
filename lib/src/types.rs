use crate::named_nodes::SHACL;
use oxigraph::model::{NamedNode, NamedNodeRef};
use std::fmt;
use std::hash::Hash;

/// Handle to a slot of the type arena inside an [`crate::ast::Ast`].
///
/// Container and composite types refer to their items and members through
/// these handles, which is what lets the transformer hand out a slot before the
/// type stored in it is known.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub usize);

impl From<usize> for TypeId {
    fn from(item: usize) -> Self {
        TypeId(item)
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TypeId {
    /// Converts the TypeId to a string suitable for use as a node identifier in Graphviz.
    pub fn to_graphviz_id(&self) -> String {
        format!("t{}", self.0)
    }
}

/// Represents a SHACL Property Path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Path {
    /// A predicate path, which is a single IRI.
    Predicate(NamedNode),
    /// An inverse path (`sh:inversePath`).
    Inverse(Box<Path>),
    /// A sequence of paths (an RDF list of paths).
    Sequence(Vec<Path>),
    /// A set of alternative paths (`sh:alternativePath`).
    Alternative(Vec<Path>),
    /// A path that can be traversed zero or more times (`sh:zeroOrMorePath`).
    ZeroOrMore(Box<Path>),
    /// A path that can be traversed one or more times (`sh:oneOrMorePath`).
    OneOrMore(Box<Path>),
    /// A path that can be traversed zero or one time (`sh:zeroOrOnePath`).
    ZeroOrOne(Box<Path>),
}

impl Path {
    /// The predicate of a predicate path. Every other path kind yields `None`.
    pub fn as_predicate(&self) -> Option<&NamedNode> {
        match self {
            Path::Predicate(nn) => Some(nn),
            _ => None,
        }
    }

    /// Short description of the path kind, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Path::Predicate(_) => "predicate path",
            Path::Inverse(_) => "inverse path",
            Path::Sequence(_) => "sequence path",
            Path::Alternative(_) => "alternative path",
            Path::ZeroOrMore(_) => "zero-or-more path",
            Path::OneOrMore(_) => "one-or-more path",
            Path::ZeroOrOne(_) => "zero-or-one path",
        }
    }

    /// Converts the SHACL path to its SPARQL 1.1 property path string representation.
    pub fn to_sparql_path(&self) -> String {
        match self {
            Path::Predicate(nn) => format!("<{}>", nn.as_str()),
            // Sequence and alternative render parenthesized, so `^` needs nothing more.
            Path::Inverse(inner) => format!("^{}", inner.to_sparql_path()),
            Path::Sequence(paths) => format!(
                "({})",
                paths
                    .iter()
                    .map(Path::to_sparql_path)
                    .collect::<Vec<_>>()
                    .join(" / ")
            ),
            Path::Alternative(paths) => format!(
                "({})",
                paths
                    .iter()
                    .map(Path::to_sparql_path)
                    .collect::<Vec<_>>()
                    .join(" | ")
            ),
            Path::ZeroOrMore(inner) => format!("{}*", inner.to_sparql_path()),
            Path::OneOrMore(inner) => format!("{}+", inner.to_sparql_path()),
            Path::ZeroOrOne(inner) => format!("{}?", inner.to_sparql_path()),
        }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sparql_path())
    }
}

/// The set of node kinds allowed by `sh:nodeKind`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct NodeKind {
    pub blank_node: bool,
    pub iri: bool,
    pub literal: bool,
}

impl NodeKind {
    pub const BLANK_NODE: NodeKind = NodeKind {
        blank_node: true,
        iri: false,
        literal: false,
    };
    pub const IRI: NodeKind = NodeKind {
        blank_node: false,
        iri: true,
        literal: false,
    };
    pub const BLANK_NODE_OR_IRI: NodeKind = NodeKind {
        blank_node: true,
        iri: true,
        literal: false,
    };
    pub const LITERAL: NodeKind = NodeKind {
        blank_node: false,
        iri: false,
        literal: true,
    };

    /// Creates a `NodeKind` from one of the six SHACL node kind IRIs.
    pub fn from_iri(iri: NamedNodeRef<'_>) -> Option<Self> {
        let shacl = SHACL::new();
        let (blank_node, iri_kind, literal) = if iri == shacl.blank_node {
            (true, false, false)
        } else if iri == shacl.iri {
            (false, true, false)
        } else if iri == shacl.literal {
            (false, false, true)
        } else if iri == shacl.blank_node_or_iri {
            (true, true, false)
        } else if iri == shacl.blank_node_or_literal {
            (true, false, true)
        } else if iri == shacl.iri_or_literal {
            (false, true, true)
        } else {
            return None;
        };
        Some(NodeKind {
            blank_node,
            iri: iri_kind,
            literal,
        })
    }

    /// True when only identifiers (blank nodes and/or IRIs) are allowed.
    pub fn is_identifier_only(&self) -> bool {
        !self.literal && (self.blank_node || self.iri)
    }
}

/// Visibility hint for a property, passed through to emitters.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Private,
}

impl Visibility {
    /// Parses `public`, `protected` or `private`, ignoring case.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "public" => Some(Visibility::Public),
            "protected" => Some(Visibility::Protected),
            "private" => Some(Visibility::Private),
            _ => None,
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Visibility::Public => "public",
            Visibility::Protected => "protected",
            Visibility::Private => "private",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(iri: &str) -> Path {
        Path::Predicate(NamedNode::new_unchecked(iri))
    }

    #[test]
    fn sparql_rendering_of_nested_paths() {
        let path = Path::Inverse(Box::new(Path::Sequence(vec![
            p("http://example.org/a"),
            Path::ZeroOrMore(Box::new(p("http://example.org/b"))),
        ])));
        assert_eq!(
            path.to_sparql_path(),
            "^(<http://example.org/a> / <http://example.org/b>*)"
        );
        assert!(path.as_predicate().is_none());
        assert_eq!(path.kind(), "inverse path");
    }

    #[test]
    fn node_kind_from_shacl_iris() {
        let shacl = SHACL::new();
        assert_eq!(NodeKind::from_iri(shacl.iri), Some(NodeKind::IRI));
        assert_eq!(
            NodeKind::from_iri(shacl.blank_node_or_iri),
            Some(NodeKind::BLANK_NODE_OR_IRI)
        );
        assert!(NodeKind::from_iri(shacl.blank_node_or_iri)
            .unwrap()
            .is_identifier_only());
        assert!(!NodeKind::from_iri(shacl.iri_or_literal)
            .unwrap()
            .is_identifier_only());
        assert_eq!(NodeKind::from_iri(shacl.path), None);
    }

    #[test]
    fn visibility_parsing_is_case_insensitive() {
        assert_eq!(Visibility::parse("Private"), Some(Visibility::Private));
        assert_eq!(Visibility::parse("internal"), None);
        assert_eq!(Visibility::default().to_string(), "public");
    }
}
