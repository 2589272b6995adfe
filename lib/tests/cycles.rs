use oxigraph::model::{NamedNode, NamedOrBlankNode};
use shacl_ast::parser::{parse_shapes, parse_turtle};
use shacl_ast::{transform, Ast, Cardinality, ErrorKind, ParseError, TransformError, Type};
use std::error::Error;

const PREFIXES: &str = r#"@prefix sh: <http://www.w3.org/ns/shacl#> .
@prefix rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#> .
@prefix xsd: <http://www.w3.org/2001/XMLSchema#> .
@prefix ex: <http://example.org/> .
"#;

fn run(body: &str) -> Result<Result<Ast, TransformError>, Box<dyn Error + Send + Sync>> {
    let (graph, prefixes) = parse_turtle(&format!("{}{}", PREFIXES, body))?;
    let shapes = parse_shapes(&graph)?;
    Ok(transform(&shapes, prefixes))
}

fn ex(local: &str) -> NamedOrBlankNode {
    NamedNode::new_unchecked(format!("http://example.org/{}", local)).into()
}

#[test]
#[ntest::timeout(5000)]
fn self_referencing_object_terminates() -> Result<(), Box<dyn Error + Send + Sync>> {
    let ast = run(
        r#"
ex:Tree a sh:NodeShape ;
    sh:property [ sh:path ex:children ; sh:node ex:Tree ] ;
    sh:property [ sh:path ex:parent ; sh:node ex:Tree ; sh:maxCount 1 ] .
"#,
    )??;
    let tree = ast.lookup(&ex("Tree")).ok_or("missing")?.item;
    let object = ast[tree].as_object().ok_or("not an object")?;
    assert!(object.properties.iter().all(|p| p.ty.item == tree));
    assert_eq!(ast.objects().count(), 1);
    Ok(())
}

#[test]
#[ntest::timeout(5000)]
fn long_reference_chain_back_to_the_start() -> Result<(), Box<dyn Error + Send + Sync>> {
    let ast = run(
        r#"
ex:A a sh:NodeShape ; sh:property [ sh:path ex:next ; sh:node ex:B ] .
ex:B a sh:NodeShape ; sh:property [ sh:path ex:next ; sh:node ex:C ] .
ex:C a sh:NodeShape ; sh:property [ sh:path ex:next ; sh:node ex:D ] .
ex:D a sh:NodeShape ; sh:property [ sh:path ex:next ; sh:node ex:A ] .
"#,
    )??;
    assert_eq!(ast.objects().count(), 4);
    assert!(ast.types().all(|(_, ty)| !ty.is_placeholder()));
    Ok(())
}

#[test]
#[ntest::timeout(5000)]
fn typed_property_shape_reaching_itself_through_its_object() -> Result<(), Box<dyn Error + Send + Sync>> {
    let ast = run(
        r#"
ex:Tree sh:property ex:child .
ex:child a sh:PropertyShape ; sh:path ex:child ; sh:node ex:Tree ; sh:maxCount 1 .
"#,
    )??;
    let tree = ast.lookup(&ex("Tree")).ok_or("missing")?.item;
    let object = ast[tree].as_object().ok_or("not an object")?;
    assert_eq!(object.properties.len(), 1);
    assert_eq!(object.properties[0].ty.item, tree);
    assert_eq!(object.properties[0].ty.cardinality, Cardinality::Option);
    assert_eq!(ast.lookup(&ex("child")).ok_or("missing")?.item, tree);
    assert!(ast.types().all(|(_, ty)| !ty.is_placeholder()));
    Ok(())
}

#[test]
#[ntest::timeout(5000)]
fn property_shape_shared_by_objects_in_a_cycle() -> Result<(), Box<dyn Error + Send + Sync>> {
    let ast = run(
        r#"
ex:A a sh:NodeShape ; sh:property ex:member .
ex:B a sh:NodeShape ; sh:property ex:member .
ex:member sh:path ex:member ; sh:node ex:B .
"#,
    )??;
    let b = ast.lookup(&ex("B")).ok_or("missing")?.item;
    for shape in ["A", "B"] {
        let object = ast.shape_type(&ex(shape)).and_then(Type::as_object).ok_or("missing")?;
        assert_eq!(object.properties[0].ty.item, b);
        assert_eq!(
            object.properties[0].ty.cardinality,
            Cardinality::Set {
                min_count: 0,
                mutable: false
            }
        );
    }
    assert_eq!(ast.objects().count(), 2);
    assert!(ast.types().all(|(_, ty)| !ty.is_placeholder()));
    Ok(())
}

#[test]
#[ntest::timeout(5000)]
fn composite_containing_itself_is_an_unresolved_cycle() -> Result<(), Box<dyn Error + Send + Sync>> {
    let err = run(
        r#"
ex:B a sh:NodeShape ; sh:property [ sh:path ex:p ; sh:datatype xsd:string ] .
ex:A a sh:NodeShape ; sh:and ( ex:A ex:B ) .
"#,
    )?
    .expect_err("a conjunction containing itself has no finite type");
    assert!(matches!(err, TransformError::UnresolvedCycle { .. }));
    assert_eq!(err.kind(), ErrorKind::InvariantViolation);
    assert_eq!(err.shape(), Some(&ex("A")));
    Ok(())
}

#[test]
#[ntest::timeout(5000)]
fn inheritance_loop_is_an_unresolved_cycle() -> Result<(), Box<dyn Error + Send + Sync>> {
    let err = run(
        r#"
ex:A a sh:NodeShape ; sh:node ex:B .
ex:B a sh:NodeShape ; sh:node ex:A .
"#,
    )?
    .expect_err("objects cannot inherit from each other");
    match err {
        TransformError::UnresolvedCycle { shapes } => {
            assert_eq!(shapes, vec![ex("A"), ex("B")]);
        }
        other => panic!("unexpected error {}", other),
    }
    Ok(())
}

#[test]
#[ntest::timeout(5000)]
fn cyclic_rdf_lists_are_rejected_while_parsing() -> Result<(), Box<dyn Error + Send + Sync>> {
    let (graph, _) = parse_turtle(&format!(
        "{}{}",
        PREFIXES,
        r#"
ex:U a sh:NodeShape ; sh:xone _:first .
_:first rdf:first ex:A ; rdf:rest _:second .
_:second rdf:first ex:B ; rdf:rest _:first .
"#
    ))?;
    assert!(matches!(
        parse_shapes(&graph),
        Err(ParseError::InvalidList { .. })
    ));
    Ok(())
}
