//! Rendered SPARQL must be accepted by a SPARQL 1.1 parser

use samyama_querybuilder::builder::{Query, QueryBuilder};
use samyama_querybuilder::rdf::{Literal, NamedNode};
use samyama_querybuilder::{
    AlgebraNode, DescribeScope, ExtensionElem, ProjectionElem, ProjectionElemList, QueryRenderer,
    RenderConfig, SparqlRenderer, Term, TriplePattern, ValueExpr,
};

fn foaf(local: &str) -> NamedNode {
    NamedNode::new(&format!("http://xmlns.com/foaf/0.1/{}", local)).unwrap()
}

fn graph(name: &str) -> NamedNode {
    NamedNode::new(&format!("http://example.org/{}", name)).unwrap()
}

fn assert_parses(text: &str) {
    if let Err(e) = spargebra::Query::parse(text, None) {
        panic!("rendered query does not parse: {}\n{}", e, text);
    }
}

fn render(query: &Query) -> String {
    SparqlRenderer::new().render(query).unwrap()
}

#[test]
fn test_optional_and_filters_parse() {
    let query = QueryBuilder::select()
        .distinct()
        .add_projection_var(["name", "age"])
        .group(|g| {
            g.atom("x", foaf("name"), "name")
                .filter_with(|f| f.regex("name", "^A").not(ValueExpr::is_blank("x")))
                .optional(|o| {
                    o.atom("x", foaf("age"), "age")
                        .filter(ValueExpr::and(ValueExpr::bound("age"), ValueExpr::ge("age", 18i64)))
                })
        })
        .order_by("name")
        .order_by_desc("age")
        .limit(10)
        .offset(5)
        .build()
        .unwrap();
    assert_parses(&render(&query));
}

#[test]
fn test_union_and_graph_blocks_parse() {
    let query = QueryBuilder::select()
        .add_projection_var(["x", "n"])
        .from_named(graph("g1"))
        .from_named(graph("g2"))
        .group(|g| {
            g.atom_in("x", foaf("knows"), "y", graph("g1"))
                .atom_in("y", foaf("knows"), "z", graph("g2"))
                .union(|u| {
                    u.side(|s| s.atom("x", foaf("name"), "n"))
                        .side(|s| s.atom("x", foaf("nick"), "n"))
                })
        })
        .build()
        .unwrap();
    assert_parses(&render(&query));
}

#[test]
fn test_construct_with_constant_parses() {
    let query = QueryBuilder::construct()
        .add_projection_statement("x", foaf("knows"), "y")
        .add_projection_statement("x", foaf("name"), Literal::from("someone"))
        .group(|g| g.atom("x", foaf("knows"), "y"))
        .build()
        .unwrap();
    assert_parses(&render(&query));
}

#[test]
fn test_ask_and_describe_parse() {
    let ask = QueryBuilder::ask()
        .from_graph(graph("g"))
        .group(|g| g.atom("x", foaf("name"), Literal::new_language_tagged_literal("Alice", "en").unwrap()))
        .build()
        .unwrap();
    assert_parses(&render(&ask));

    let targets = [Term::var("x"), Term::from(graph("alice"))];
    let mut describe = QueryBuilder::describe(targets)
        .group(|g| g.atom("x", foaf("knows"), "y"))
        .build()
        .unwrap();
    assert_parses(&render(&describe));

    assert!(describe.rewrite_describe(DescribeScope::NamedGraphs));
    assert_parses(&render(&describe));
}

#[test]
fn test_minus_and_bind_parse() {
    let tree = AlgebraNode::projection(
        Some(AlgebraNode::extension(
            AlgebraNode::difference(
                AlgebraNode::pattern(TriplePattern::new("x", foaf("name"), "n")),
                AlgebraNode::pattern(TriplePattern::new("x", foaf("nick"), "n")),
            ),
            vec![
                ExtensionElem::new("label", ValueExpr::str("n")),
                ExtensionElem::new("hidden", ValueExpr::lang("n")),
            ],
        )),
        ProjectionElemList::new(vec![ProjectionElem::same("x"), ProjectionElem::same("label")]),
    );
    let text = SparqlRenderer::new()
        .render_tree(&tree, &samyama_querybuilder::collect_contexts(&tree))
        .unwrap();
    assert!(text.contains("bind (lang(?n) as ?hidden)."));
    assert_parses(&text);
}

#[test]
fn test_compacted_output_parses() {
    let query = QueryBuilder::select()
        .add_projection_var(["n"])
        .group(|g| {
            g.atom_in("x", foaf("name"), "n", graph("people"))
                .filter(ValueExpr::gt("n", 3i64))
        })
        .build()
        .unwrap();

    let config = RenderConfig::default()
        .compacting()
        .with_prefix("ex", "http://example.org/");
    let text = SparqlRenderer::with_config(config).render(&query).unwrap();
    assert!(text.starts_with("PREFIX "));
    assert_parses(&text);
}
