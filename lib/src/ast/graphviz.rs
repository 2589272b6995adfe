use super::{Ast, Type};
use crate::shape::ShapeId;
use crate::types::TypeId;
use oxigraph::model::NamedOrBlankNode;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Dfs;
use std::collections::BTreeSet;

/// How one type refers to another.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TypeEdge {
    Parent,
    /// Object property; the only edge that may close a cycle.
    Property,
    Member,
    Item,
}

/// The arena as a `petgraph` graph: one node per slot, one edge per handle.
pub fn type_graph(ast: &Ast) -> DiGraph<TypeId, TypeEdge> {
    let mut graph = DiGraph::<TypeId, TypeEdge>::with_capacity(ast.len(), ast.len());
    let nodes: Vec<NodeIndex> = ast.types().map(|(id, _)| graph.add_node(id)).collect();
    for (id, ty) in ast.types() {
        let from = nodes[id.0];
        let mut add = |target: TypeId, edge: TypeEdge| {
            if let Some(&to) = nodes.get(target.0) {
                graph.add_edge(from, to, edge);
            }
        };
        match ty {
            Type::Object(o) => {
                if let Some(parent) = o.parent {
                    add(parent, TypeEdge::Parent);
                }
                for property in &o.properties {
                    add(property.ty.item, TypeEdge::Property);
                }
            }
            Type::List(l) => add(l.item, TypeEdge::Item),
            other => {
                for member in other.children() {
                    add(member, TypeEdge::Member);
                }
            }
        }
    }
    graph
}

/// Slots reachable from the shape lookup, in arena order.
pub(crate) fn reachable(ast: &Ast) -> Vec<TypeId> {
    let graph = type_graph(ast);
    let mut seen = BTreeSet::new();
    for (_, ct) in ast.lookups() {
        if ct.item.0 >= graph.node_count() {
            continue;
        }
        let mut dfs = Dfs::new(&graph, NodeIndex::new(ct.item.0));
        while let Some(node) = dfs.next(&graph) {
            seen.insert(graph[node]);
        }
    }
    seen.into_iter().collect()
}

/// Shapes whose placeholder is still reachable from the lookup.
pub(crate) fn reachable_placeholders(ast: &Ast) -> Vec<ShapeId> {
    reachable(ast)
        .into_iter()
        .filter_map(|id| match ast.get(id) {
            Some(Type::Placeholder(p)) => Some(p.shape.clone()),
            _ => None,
        })
        .collect()
}

/// Groups of shapes whose types contain each other without crossing an
/// object property: `A and (A, B)`, a node shape inheriting from itself, ...
pub(crate) fn structural_cycles(ast: &Ast) -> Vec<Vec<ShapeId>> {
    let structural = type_graph(ast).filter_map(
        |_, id| Some(*id),
        |_, edge| (*edge != TypeEdge::Property).then_some(*edge),
    );
    tarjan_scc(&structural)
        .into_iter()
        .filter(|component| {
            component.len() > 1
                || component
                    .iter()
                    .any(|&node| structural.find_edge(node, node).is_some())
        })
        .map(|component| {
            let mut shapes: Vec<ShapeId> = component
                .into_iter()
                .filter_map(|node| ast.get(structural[node]).map(|t| t.shape().clone()))
                .collect();
            shapes.sort_by_key(ToString::to_string);
            shapes.dedup();
            shapes
        })
        .collect()
}

fn escape(label: &str) -> String {
    label.replace('\\', "\\\\").replace('"', "\\\"")
}

fn format_shape_for_label(shape: &ShapeId) -> String {
    match shape {
        NamedOrBlankNode::NamedNode(nn) => nn.as_str().to_string(),
        NamedOrBlankNode::BlankNode(bn) => format!("_:{}", bn.as_str()),
    }
}

impl Ast {
    /// Graphviz DOT rendering of the type graph.
    ///
    /// Objects are boxes, composites are diamonds and everything else is an
    /// ellipse. Property edges are labeled with the property name and cardinality.
    pub fn to_graphviz(&self) -> String {
        let mut dot = String::from("digraph ast {\n    rankdir=LR;\n");
        let mut edges = Vec::new();
        for (id, ty) in self.types() {
            let name = ty
                .name()
                .map(|n| n.resolved())
                .unwrap_or_else(|| format_shape_for_label(ty.shape()));
            let (shape, label) = match ty {
                Type::Object(_) => ("box", format!("{}\\n[{}]", escape(&name), ty.kind())),
                Type::ObjectUnion(_)
                | Type::ObjectIntersection(_)
                | Type::Union(_)
                | Type::Intersection(_) => {
                    ("diamond", format!("{}\\n[{}]", escape(&name), ty.kind()))
                }
                Type::Literal(l) => (
                    "ellipse",
                    format!("{}\\n[Literal {}]", escape(&name), escape(l.datatype.as_str())),
                ),
                _ => ("ellipse", format!("{}\\n[{}]", escape(&name), ty.kind())),
            };
            dot.push_str(&format!(
                "    {} [shape={}, label=\"{}\"];\n",
                id.to_graphviz_id(),
                shape,
                label
            ));
            match ty {
                Type::Object(o) => {
                    if let Some(parent) = o.parent {
                        edges.push(format!(
                            "    {} -> {} [style=dashed, label=\"extends\"];",
                            id.to_graphviz_id(),
                            parent.to_graphviz_id()
                        ));
                    }
                    for p in &o.properties {
                        edges.push(format!(
                            "    {} -> {} [label=\"{}: {}\"];",
                            id.to_graphviz_id(),
                            p.ty.item.to_graphviz_id(),
                            escape(&p.name.resolved()),
                            escape(&p.ty.cardinality.to_string())
                        ));
                    }
                }
                other => {
                    for child in other.children() {
                        edges.push(format!(
                            "    {} -> {} [style=dotted];",
                            id.to_graphviz_id(),
                            child.to_graphviz_id()
                        ));
                    }
                }
            }
        }
        for edge in edges {
            dot.push_str(&edge);
            dot.push('\n');
        }
        dot.push_str("}\n");
        dot
    }
}
