//! Coercion of `sh:defaultValue` terms into typed default values.

use crate::error::TransformError;
use crate::shape::ShapeId;
use log::warn;
use oxigraph::model::vocab::xsd;
use oxigraph::model::{Literal, NamedNode, NamedNodeRef, Term};
use oxsdatatypes::{Boolean, Decimal, Double, Integer};
use std::str::FromStr;

/// A default value, typed after the item type it substitutes for.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultValue {
    Boolean(bool),
    Integer(i64),
    Decimal(Decimal),
    Double(f64),
    String(String),
    Iri(NamedNode),
    /// Any other literal, kept verbatim.
    Literal(Literal),
}

/// What kind of item type a default value must fit.
#[derive(Debug, Clone, Copy)]
pub enum DefaultTarget<'a> {
    /// A literal with this datatype.
    Literal(NamedNodeRef<'a>),
    /// An IRI-valued identifier; the slice restricts the allowed IRIs when non-empty.
    Iri(&'a [NamedNode]),
    /// Anything: unconstrained terms and generic composites.
    Term,
    /// Object-like types take no default.
    Object,
}

const INTEGER_TYPES: [NamedNodeRef<'static>; 13] = [
    xsd::INTEGER,
    xsd::INT,
    xsd::LONG,
    xsd::SHORT,
    xsd::BYTE,
    xsd::NON_NEGATIVE_INTEGER,
    xsd::NON_POSITIVE_INTEGER,
    xsd::POSITIVE_INTEGER,
    xsd::NEGATIVE_INTEGER,
    xsd::UNSIGNED_LONG,
    xsd::UNSIGNED_INT,
    xsd::UNSIGNED_SHORT,
    xsd::UNSIGNED_BYTE,
];

/// Coerces `term` into a default for `target`.
///
/// Malformed boolean and string defaults fall back to `false` and `""` with a
/// warning unless `strict` is set, in which case they are rejected like every
/// other malformed default.
pub fn coerce_default(
    shape: &ShapeId,
    term: &Term,
    target: DefaultTarget<'_>,
    strict: bool,
) -> Result<DefaultValue, TransformError> {
    match target {
        DefaultTarget::Object => Err(TransformError::malformed(
            shape,
            format!("default value {} on an object-typed shape", term),
        )),
        DefaultTarget::Iri(allowed) => match term {
            Term::NamedNode(iri) if allowed.is_empty() || allowed.contains(iri) => {
                Ok(DefaultValue::Iri(iri.clone()))
            }
            Term::NamedNode(iri) => Err(TransformError::malformed(
                shape,
                format!("default value {} is not one of the allowed values", iri),
            )),
            other => Err(TransformError::malformed(
                shape,
                format!("default value {} must be an IRI", other),
            )),
        },
        DefaultTarget::Term => match term {
            Term::NamedNode(iri) => Ok(DefaultValue::Iri(iri.clone())),
            Term::Literal(literal) => Ok(DefaultValue::Literal(literal.clone())),
            other => Err(TransformError::malformed(
                shape,
                format!("default value {} must be an IRI or a literal", other),
            )),
        },
        DefaultTarget::Literal(datatype) => coerce_literal(shape, term, datatype, strict),
    }
}

fn coerce_literal(
    shape: &ShapeId,
    term: &Term,
    datatype: NamedNodeRef<'_>,
    strict: bool,
) -> Result<DefaultValue, TransformError> {
    let lexical = match term {
        Term::Literal(literal) => Some(literal.value()),
        _ => None,
    };

    if datatype == xsd::BOOLEAN {
        return match lexical.map(Boolean::from_str) {
            Some(Ok(value)) => Ok(DefaultValue::Boolean(value.into())),
            _ if strict => Err(TransformError::malformed(
                shape,
                format!("default value {} is not an xsd:boolean", term),
            )),
            _ => {
                warn!("Default value {} of {} is not an xsd:boolean, using false", term, shape);
                Ok(DefaultValue::Boolean(false))
            }
        };
    }

    if datatype == xsd::STRING {
        return match lexical {
            Some(value) => Ok(DefaultValue::String(value.to_string())),
            None if strict => Err(TransformError::malformed(
                shape,
                format!("default value {} is not a string literal", term),
            )),
            None => {
                warn!("Default value {} of {} is not a literal, using \"\"", term, shape);
                Ok(DefaultValue::String(String::new()))
            }
        };
    }

    let Some(value) = lexical else {
        return Err(TransformError::malformed(
            shape,
            format!("default value {} must be a literal of type {}", term, datatype),
        ));
    };
    let invalid = |e: &dyn std::fmt::Display| {
        TransformError::malformed(
            shape,
            format!("default value {:?} is not a valid {}: {}", value, datatype, e),
        )
    };

    if INTEGER_TYPES.contains(&datatype) {
        let integer = Integer::from_str(value).map_err(|e| invalid(&e))?;
        Ok(DefaultValue::Integer(i64::from(integer)))
    } else if datatype == xsd::DECIMAL {
        let decimal = Decimal::from_str(value).map_err(|e| invalid(&e))?;
        Ok(DefaultValue::Decimal(decimal))
    } else if datatype == xsd::DOUBLE || datatype == xsd::FLOAT {
        let double = Double::from_str(value).map_err(|e| invalid(&e))?;
        Ok(DefaultValue::Double(f64::from(double)))
    } else {
        match term {
            Term::Literal(literal) => Ok(DefaultValue::Literal(literal.clone())),
            _ => Err(invalid(&"not a literal")),
        }
    }
}
