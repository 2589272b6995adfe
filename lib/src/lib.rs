//! Compiles SHACL shapes graphs into a typed, language-agnostic AST.
#![deny(clippy::all)]

// Publicly visible items
pub mod ast;
pub mod curie;
pub mod error;
pub mod model;
pub mod name;
pub mod shape;
pub mod types;
pub mod value;

pub use ast::{Ast, Cardinality, CardinalityType, Type};
pub use error::{ErrorKind, ParseError, TransformError};
pub use transform::{transform, TransformOptions, Transformer};

// Internal modules.
pub mod constraint_stack;
pub mod infer;
pub(crate) mod named_nodes;
pub mod parser;
pub mod transform;

use crate::curie::PrefixMap;
use crate::model::ShapesGraph;
use log::info;
use oxigraph::model::Graph;
use std::error::Error;
use std::path::PathBuf;

/// Where the shapes graph is read from.
#[derive(Debug)]
pub enum Source {
    /// A Turtle file on disk.
    File(PathBuf),
    /// A Turtle document held in memory.
    Turtle(String),
}

/// A simple facade for compiling shapes.
///
/// It loads the shapes graph once and can then compile it any number of times,
/// with different prefixes or options. For finer control, parse with
/// [`parser::parse_shapes`] and drive a [`Transformer`] directly.
pub struct Compiler {
    shapes: ShapesGraph,
    prefixes: PrefixMap,
    options: TransformOptions,
}

impl Compiler {
    /// Creates a compiler from a Turtle file.
    ///
    /// # Arguments
    ///
    /// * `shapes_path` - The file path for the SHACL shapes.
    pub fn from_file(shapes_path: &str) -> Result<Self, Box<dyn Error>> {
        Self::from_source(Source::File(PathBuf::from(shapes_path)))
    }

    /// Creates a compiler from the given shapes source.
    ///
    /// Prefixes declared in the document are added to the well-known ones and
    /// used for naming.
    pub fn from_source(source: Source) -> Result<Self, Box<dyn Error>> {
        let (graph, prefixes) = match source {
            Source::File(path) => parser::load_turtle(path)?,
            Source::Turtle(input) => parser::parse_turtle(&input)?,
        };
        Self::from_graph(&graph, prefixes)
    }

    /// Creates a compiler from an already loaded graph.
    pub fn from_graph(graph: &Graph, prefixes: PrefixMap) -> Result<Self, Box<dyn Error>> {
        let shapes = parser::parse_shapes(graph)?;
        info!("Loaded {} shapes", shapes.len());
        Ok(Compiler {
            shapes,
            prefixes,
            options: TransformOptions::default(),
        })
    }

    /// Adds or overrides a prefix used when naming shapes.
    pub fn with_prefix(mut self, prefix: &str, namespace: &str) -> Self {
        self.prefixes.insert(prefix, namespace);
        self
    }

    pub fn with_options(mut self, options: TransformOptions) -> Self {
        self.options = options;
        self
    }

    /// The parsed shapes graph.
    pub fn shapes(&self) -> &ShapesGraph {
        &self.shapes
    }

    pub fn prefixes(&self) -> &PrefixMap {
        &self.prefixes
    }

    /// Transforms the shapes graph into an [`Ast`].
    ///
    /// Either every reachable shape gets a fully resolved type, or an error
    /// names the offending shape and nothing is returned.
    pub fn compile(&self) -> Result<Ast, TransformError> {
        Transformer::new(&self.shapes, self.prefixes.clone())
            .with_options(self.options)
            .transform()
    }

    /// Generates a Graphviz DOT rendering of the compiled type graph.
    pub fn to_graphviz(&self) -> Result<String, TransformError> {
        Ok(self.compile()?.to_graphviz())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Write;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn unique_temp_dir(prefix: &str) -> Result<PathBuf, Box<dyn Error>> {
        let mut dir = std::env::temp_dir();
        let timestamp = SystemTime::now().duration_since(UNIX_EPOCH)?.as_nanos();
        dir.push(format!("{}_{}", prefix, timestamp));
        fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    const PERSON: &str = r#"@prefix sh: <http://www.w3.org/ns/shacl#> .
@prefix ex: <http://example.com/ns#> .
@prefix xsd: <http://www.w3.org/2001/XMLSchema#> .

ex:Person a sh:NodeShape ;
    sh:property [
        sh:path ex:name ;
        sh:datatype xsd:string ;
        sh:minCount 1 ;
        sh:maxCount 1 ;
    ] .
"#;

    #[test]
    fn compiles_shapes_from_a_file() -> Result<(), Box<dyn Error>> {
        let temp_dir = unique_temp_dir("shacl_ast_compiler_test")?;
        let shapes_path = temp_dir.join("shapes.ttl");
        let mut file = fs::File::create(&shapes_path)?;
        file.write_all(PERSON.as_bytes())?;

        let compiler = Compiler::from_file(shapes_path.to_str().ok_or("non-utf8 path")?)?;
        assert_eq!(compiler.prefixes().get("ex"), Some("http://example.com/ns#"));
        let ast = compiler.compile()?;

        let objects: Vec<_> = ast.objects().collect();
        assert_eq!(objects.len(), 1);
        let person = objects[0];
        assert_eq!(person.name.resolved(), "Person");
        assert_eq!(person.properties.len(), 1);
        assert_eq!(person.properties[0].name.resolved(), "name");
        assert_eq!(person.properties[0].ty.cardinality, Cardinality::Plain { default: None });

        fs::remove_dir_all(temp_dir)?;
        Ok(())
    }

    #[test]
    fn graphviz_renders_compiled_objects() -> Result<(), Box<dyn Error>> {
        let compiler = Compiler::from_source(Source::Turtle(PERSON.to_string()))?
            .with_prefix("ex", "http://example.com/ns#");
        let graphviz = compiler.to_graphviz()?;
        assert!(graphviz.starts_with("digraph ast {"));
        assert!(graphviz.contains("Person"));
        Ok(())
    }
}
