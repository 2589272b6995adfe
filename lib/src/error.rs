//! Error types for shapes-graph loading and AST transformation.

use crate::shape::ShapeId;
use oxigraph::model::Term;

/// Broad classification of a [`TransformError`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The shapes graph uses a construct the transformer does not support, or is
    /// internally inconsistent. Fixing the source schema resolves it.
    MalformedInput,
    /// The transformer reached a state its own bookkeeping forbids.
    InvariantViolation,
}

/// Errors raised while transforming a [`crate::model::ShapesGraph`] into an [`crate::ast::Ast`].
///
/// Every variant names the shape(s) it originates from. A transform that fails
/// returns no partial AST.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum TransformError {
    /// Unsupported or inconsistent shape definition.
    #[error("Malformed shape {shape}: {message}")]
    Malformed { shape: ShapeId, message: String },

    /// More than one candidate where exactly one is required.
    #[error("Ambiguous {feature} on shape {shape}: {message}")]
    Ambiguous {
        shape: ShapeId,
        feature: String,
        message: String,
    },

    /// Internal bookkeeping violation.
    #[error("Invariant violated while compiling {shape}: {message}")]
    Invariant { shape: ShapeId, message: String },

    /// A placeholder survived the whole-graph pass.
    #[error("Unresolvable reference cycle through {}", join_shapes(.shapes))]
    UnresolvedCycle { shapes: Vec<ShapeId> },
}

fn join_shapes(shapes: &[ShapeId]) -> String {
    shapes
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl TransformError {
    pub fn malformed(shape: &ShapeId, message: impl Into<String>) -> Self {
        Self::Malformed {
            shape: shape.clone(),
            message: message.into(),
        }
    }

    pub fn ambiguous(
        shape: &ShapeId,
        feature: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Ambiguous {
            shape: shape.clone(),
            feature: feature.into(),
            message: message.into(),
        }
    }

    pub fn invariant(shape: &ShapeId, message: impl Into<String>) -> Self {
        Self::Invariant {
            shape: shape.clone(),
            message: message.into(),
        }
    }

    /// Ambiguity is reported to callers as malformed input.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Malformed { .. } | Self::Ambiguous { .. } => ErrorKind::MalformedInput,
            Self::Invariant { .. } | Self::UnresolvedCycle { .. } => {
                ErrorKind::InvariantViolation
            }
        }
    }

    /// The first shape the error is attributed to.
    pub fn shape(&self) -> Option<&ShapeId> {
        match self {
            Self::Malformed { shape, .. }
            | Self::Ambiguous { shape, .. }
            | Self::Invariant { shape, .. } => Some(shape),
            Self::UnresolvedCycle { shapes } => shapes.first(),
        }
    }
}

/// Errors raised while reading RDF into a [`crate::model::ShapesGraph`].
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ParseError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Rdf(#[from] oxigraph::io::RdfParseError),

    /// A shape node that cannot be read.
    #[error("Invalid shape definition for {shape}: {message}")]
    InvalidShape { shape: Term, message: String },

    /// A broken or cyclic `rdf:List`.
    #[error("Invalid RDF list in shape {shape}: {message}")]
    InvalidList { shape: Term, message: String },
}

impl ParseError {
    pub fn invalid_shape(shape: impl Into<Term>, message: impl Into<String>) -> Self {
        Self::InvalidShape {
            shape: shape.into(),
            message: message.into(),
        }
    }

    pub fn invalid_list(shape: impl Into<Term>, message: impl Into<String>) -> Self {
        Self::InvalidList {
            shape: shape.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxigraph::model::NamedNode;

    #[test]
    fn ambiguity_is_reported_as_malformed_input() {
        let shape = ShapeId::from(NamedNode::new_unchecked("http://example.org/S"));
        let err = TransformError::ambiguous(&shape, "sh:node", "two parents");
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
        assert_eq!(err.shape(), Some(&shape));
        assert!(err.to_string().contains("<http://example.org/S>"));
    }

    #[test]
    fn cycle_error_lists_every_shape() {
        let a = ShapeId::from(NamedNode::new_unchecked("http://example.org/A"));
        let b = ShapeId::from(NamedNode::new_unchecked("http://example.org/B"));
        let err = TransformError::UnresolvedCycle {
            shapes: vec![a, b],
        };
        assert_eq!(err.kind(), ErrorKind::InvariantViolation);
        assert_eq!(
            err.to_string(),
            "Unresolvable reference cycle through <http://example.org/A>, <http://example.org/B>"
        );
    }
}
