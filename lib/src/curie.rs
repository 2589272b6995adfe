//! Compact URIs and the registry that tracks how unique their references are.

use log::trace;
use oxigraph::model::NamedNodeRef;
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::rc::Rc;

/// Prefix table used to shrink IRIs: prefix name -> namespace IRI.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PrefixMap {
    entries: BTreeMap<String, String>,
}

impl PrefixMap {
    /// An empty prefix table.
    pub fn new() -> Self {
        Self::default()
    }

    /// The well-known RDF, RDFS, XSD, OWL and SHACL prefixes.
    pub fn with_defaults() -> Self {
        let mut map = Self::new();
        map.insert("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#");
        map.insert("rdfs", "http://www.w3.org/2000/01/rdf-schema#");
        map.insert("xsd", "http://www.w3.org/2001/XMLSchema#");
        map.insert("owl", "http://www.w3.org/2002/07/owl#");
        map.insert("sh", "http://www.w3.org/ns/shacl#");
        map
    }

    /// Adds or overrides a prefix.
    pub fn insert(&mut self, prefix: impl Into<String>, namespace: impl Into<String>) {
        self.entries.insert(prefix.into(), namespace.into());
    }

    pub fn extend(&mut self, other: &PrefixMap) {
        for (prefix, namespace) in other.iter() {
            self.insert(prefix, namespace);
        }
    }

    pub fn get(&self, prefix: &str) -> Option<&str> {
        self.entries.get(prefix).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(p, n)| (p.as_str(), n.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Splits `iri` into (prefix, reference) using the longest matching namespace.
    ///
    /// Ties between prefixes bound to the same namespace go to the
    /// alphabetically first prefix. An empty reference does not shrink.
    pub fn shrink<'a>(&'a self, iri: &'a str) -> Option<(&'a str, &'a str)> {
        self.entries
            .iter()
            .filter(|(_, namespace)| !namespace.is_empty() && iri.starts_with(namespace.as_str()))
            .max_by(|(pa, na), (pb, nb)| na.len().cmp(&nb.len()).then_with(|| pb.cmp(pa)))
            .map(|(prefix, namespace)| (prefix.as_str(), &iri[namespace.len()..]))
            .filter(|(_, reference)| !reference.is_empty())
    }
}

/// reference -> prefix -> number of times that pair was produced.
#[derive(Debug, Default)]
struct ReferenceCounts {
    counts: HashMap<String, HashMap<String, usize>>,
}

impl ReferenceCounts {
    fn distinct_prefixes(&self, reference: &str) -> usize {
        self.counts.get(reference).map_or(0, HashMap::len)
    }
}

/// Produces [`Curie`]s and counts, per reference, the distinct prefixes seen.
///
/// Clones share the same counts.
#[derive(Debug, Clone)]
pub struct CurieRegistry {
    prefixes: Rc<PrefixMap>,
    counts: Rc<RefCell<ReferenceCounts>>,
}

impl CurieRegistry {
    pub fn new(prefixes: PrefixMap) -> Self {
        CurieRegistry {
            prefixes: Rc::new(prefixes),
            counts: Rc::new(RefCell::new(ReferenceCounts::default())),
        }
    }

    pub fn prefixes(&self) -> &PrefixMap {
        &self.prefixes
    }

    /// Shrinks `iri` and records the (reference, prefix) pair.
    ///
    /// Returns `None` when no namespace of the prefix table matches.
    pub fn create(&self, iri: NamedNodeRef<'_>) -> Option<Curie> {
        let (prefix, reference) = self.prefixes.shrink(iri.as_str())?;
        *self
            .counts
            .borrow_mut()
            .counts
            .entry(reference.to_string())
            .or_default()
            .entry(prefix.to_string())
            .or_default() += 1;
        trace!("Registered curie {}:{}", prefix, reference);
        Some(Curie {
            prefix: prefix.to_string(),
            reference: reference.to_string(),
            counts: Rc::clone(&self.counts),
        })
    }

    /// Number of distinct prefixes that produced `reference` so far.
    pub fn prefix_count(&self, reference: &str) -> usize {
        self.counts.borrow().distinct_prefixes(reference)
    }
}

/// A (prefix, reference) pair bound to the registry that produced it.
#[derive(Clone)]
pub struct Curie {
    prefix: String,
    reference: String,
    counts: Rc<RefCell<ReferenceCounts>>,
}

impl Curie {
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// Whether exactly one prefix produced this reference across everything
    /// registered so far.
    ///
    /// Evaluated on every call against the live registry, so the answer is
    /// only final once the whole graph has been registered.
    pub fn has_unique_reference(&self) -> bool {
        self.counts.borrow().distinct_prefixes(&self.reference) == 1
    }

    /// `prefix_reference`, or just the reference for the empty prefix.
    pub fn compact(&self) -> String {
        if self.prefix.is_empty() {
            self.reference.clone()
        } else {
            format!("{}_{}", self.prefix, self.reference)
        }
    }
}

impl PartialEq for Curie {
    fn eq(&self, other: &Self) -> bool {
        self.prefix == other.prefix && self.reference == other.reference
    }
}

impl Eq for Curie {}

impl fmt::Debug for Curie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Curie")
            .field("prefix", &self.prefix)
            .field("reference", &self.reference)
            .finish()
    }
}

impl fmt::Display for Curie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.prefix, self.reference)
    }
}
