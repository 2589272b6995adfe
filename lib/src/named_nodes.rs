#![allow(clippy::upper_case_acronyms)]

use oxigraph::model::NamedNodeRef;

pub struct SHACL {
    pub node_shape: NamedNodeRef<'static>,
    pub property_shape: NamedNodeRef<'static>,
    pub property_group: NamedNodeRef<'static>,
    pub property: NamedNodeRef<'static>,
    pub path: NamedNodeRef<'static>,
    pub inverse_path: NamedNodeRef<'static>,
    pub alternative_path: NamedNodeRef<'static>,
    pub zero_or_more_path: NamedNodeRef<'static>,
    pub one_or_more_path: NamedNodeRef<'static>,
    pub zero_or_one_path: NamedNodeRef<'static>,
    pub node: NamedNodeRef<'static>,
    pub and: NamedNodeRef<'static>,
    pub xone: NamedNodeRef<'static>,
    pub in_: NamedNodeRef<'static>,
    pub has_value: NamedNodeRef<'static>,
    pub min_count: NamedNodeRef<'static>,
    pub max_count: NamedNodeRef<'static>,
    pub class: NamedNodeRef<'static>,
    pub datatype: NamedNodeRef<'static>,
    pub node_kind: NamedNodeRef<'static>,
    pub closed: NamedNodeRef<'static>,
    pub ignored_properties: NamedNodeRef<'static>,
    pub min_exclusive: NamedNodeRef<'static>,
    pub min_inclusive: NamedNodeRef<'static>,
    pub max_exclusive: NamedNodeRef<'static>,
    pub max_inclusive: NamedNodeRef<'static>,
    pub min_length: NamedNodeRef<'static>,
    pub max_length: NamedNodeRef<'static>,
    pub pattern: NamedNodeRef<'static>,
    pub language_in: NamedNodeRef<'static>,
    pub name: NamedNodeRef<'static>,
    pub description: NamedNodeRef<'static>,
    pub default_value: NamedNodeRef<'static>,
    pub order: NamedNodeRef<'static>,
    pub group: NamedNodeRef<'static>,
    pub blank_node: NamedNodeRef<'static>,
    pub iri: NamedNodeRef<'static>,
    pub literal: NamedNodeRef<'static>,
    pub blank_node_or_iri: NamedNodeRef<'static>,
    pub blank_node_or_literal: NamedNodeRef<'static>,
    pub iri_or_literal: NamedNodeRef<'static>,
}

impl Default for SHACL {
    fn default() -> Self {
        Self::new()
    }
}

impl SHACL {
    pub fn new() -> Self {
        SHACL {
            node_shape: NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#NodeShape"),
            property_shape: NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#PropertyShape"),
            property_group: NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#PropertyGroup"),
            property: NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#property"),
            path: NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#path"),
            inverse_path: NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#inversePath"),
            alternative_path: NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#alternativePath"),
            zero_or_more_path: NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#zeroOrMorePath"),
            one_or_more_path: NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#oneOrMorePath"),
            zero_or_one_path: NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#zeroOrOnePath"),
            node: NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#node"),
            and: NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#and"),
            xone: NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#xone"),
            in_: NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#in"),
            has_value: NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#hasValue"),
            min_count: NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#minCount"),
            max_count: NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#maxCount"),
            class: NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#class"),
            datatype: NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#datatype"),
            node_kind: NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#nodeKind"),
            closed: NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#closed"),
            ignored_properties: NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#ignoredProperties"),
            min_exclusive: NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#minExclusive"),
            min_inclusive: NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#minInclusive"),
            max_exclusive: NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#maxExclusive"),
            max_inclusive: NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#maxInclusive"),
            min_length: NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#minLength"),
            max_length: NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#maxLength"),
            pattern: NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#pattern"),
            language_in: NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#languageIn"),
            name: NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#name"),
            description: NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#description"),
            default_value: NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#defaultValue"),
            order: NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#order"),
            group: NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#group"),
            blank_node: NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#BlankNode"),
            iri: NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#IRI"),
            literal: NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#Literal"),
            blank_node_or_iri: NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#BlankNodeOrIRI"),
            blank_node_or_literal: NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#BlankNodeOrLiteral"),
            iri_or_literal: NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#IRIOrLiteral"),
        }
    }
}

pub struct OWL {
    pub ontology: NamedNodeRef<'static>,
}

impl Default for OWL {
    fn default() -> Self {
        Self::new()
    }
}

impl OWL {
    pub fn new() -> Self {
        OWL {
            ontology: NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#Ontology"),
        }
    }
}

/// Extension predicates in the `urn:shacl-ast#` namespace, carrying emitter
/// hints such as override names, mutability and laziness.
pub struct AST {
    pub name: NamedNodeRef<'static>,
    pub mutable: NamedNodeRef<'static>,
    pub visibility: NamedNodeRef<'static>,
    pub lazy: NamedNodeRef<'static>,
    pub list: NamedNodeRef<'static>,
    pub feature: NamedNodeRef<'static>,
    pub declare: NamedNodeRef<'static>,
}

impl Default for AST {
    fn default() -> Self {
        Self::new()
    }
}

impl AST {
    pub fn new() -> Self {
        AST {
            name: NamedNodeRef::new_unchecked("urn:shacl-ast#name"),
            mutable: NamedNodeRef::new_unchecked("urn:shacl-ast#mutable"),
            visibility: NamedNodeRef::new_unchecked("urn:shacl-ast#visibility"),
            lazy: NamedNodeRef::new_unchecked("urn:shacl-ast#lazy"),
            list: NamedNodeRef::new_unchecked("urn:shacl-ast#list"),
            feature: NamedNodeRef::new_unchecked("urn:shacl-ast#feature"),
            declare: NamedNodeRef::new_unchecked("urn:shacl-ast#declare"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AST_NAMESPACE: &str = "urn:shacl-ast#";

    #[test]
    fn extension_predicates_live_in_the_ast_namespace() {
        let ast = AST::new();
        for nn in [ast.name, ast.mutable, ast.visibility, ast.lazy, ast.list, ast.feature, ast.declare] {
            assert!(nn.as_str().starts_with(AST_NAMESPACE), "{}", nn);
        }
    }
}
