use samyama_querybuilder::builder::QueryBuilder;
use samyama_querybuilder::rdf::NamedNode;
use samyama_querybuilder::{
    collect_contexts, AlgebraNode, QueryRenderer, RenderConfig, SparqlRenderer, TriplePattern,
    ValueExpr,
};

fn foaf(local: &str) -> NamedNode {
    NamedNode::new(&format!("http://xmlns.com/foaf/0.1/{}", local)).unwrap()
}

fn graph(name: &str) -> NamedNode {
    NamedNode::new(&format!("http://example.org/{}", name)).unwrap()
}

#[test]
fn test_select_two_atoms() {
    let query = QueryBuilder::select()
        .add_projection_var(["name", "mbox"])
        .group(|g| g.atom("x", foaf("name"), "name").atom("x", foaf("mbox"), "mbox"))
        .build()
        .unwrap();

    let text = SparqlRenderer::new().render(&query).unwrap();
    assert_eq!(
        text,
        "select ?name ?mbox\nwhere {\n  ?x <http://xmlns.com/foaf/0.1/name> ?name.\n  ?x <http://xmlns.com/foaf/0.1/mbox> ?mbox.\n}"
    );
}

#[test]
fn test_distinct_limit_with_optional_block() {
    let query = QueryBuilder::select()
        .distinct()
        .limit(100)
        .add_projection_var(["name", "mbox", "hp"])
        .group(|g| {
            g.atom("x", foaf("name"), "name").optional(|o| {
                o.atom("x", foaf("mbox"), "mbox")
                    .atom("x", foaf("homepage"), "hp")
            })
        })
        .build()
        .unwrap();

    let text = SparqlRenderer::new().render(&query).unwrap();
    assert_eq!(
        text,
        "select distinct ?name ?mbox ?hp\n\
         where {\n\
         \x20 ?x <http://xmlns.com/foaf/0.1/name> ?name.\n\
         \x20 OPTIONAL {\n\
         \x20   ?x <http://xmlns.com/foaf/0.1/mbox> ?mbox.\n\
         \x20   ?x <http://xmlns.com/foaf/0.1/homepage> ?hp.\n\
         \x20 }.\n\
         }\n\
         limit 100"
    );
}

#[test]
fn test_left_join_condition_renders_inside_optional() {
    let query = QueryBuilder::select()
        .add_projection_var(["x"])
        .group(|g| {
            g.atom("x", foaf("name"), "n").optional(|o| {
                o.atom("x", foaf("age"), "d")
                    .filter(ValueExpr::and(ValueExpr::bound("d"), ValueExpr::gt("d", 3i64)))
            })
        })
        .build()
        .unwrap();

    let text = SparqlRenderer::new().render(&query).unwrap();
    assert_eq!(
        text,
        "select ?x\nwhere {\n  ?x <http://xmlns.com/foaf/0.1/name> ?n.\n  OPTIONAL {\n    ?x <http://xmlns.com/foaf/0.1/age> ?d.\n    filter (bound(?d) && (?d > \"3\"^^<http://www.w3.org/2001/XMLSchema#integer>)).\n  }.\n}"
    );
    assert_eq!(text.matches("filter").count(), 1);
}

#[test]
fn test_same_context_renders_one_graph_block() {
    let query = QueryBuilder::select()
        .add_projection_var(["x"])
        .group(|g| {
            g.atom_in("x", foaf("knows"), "y", graph("g"))
                .atom_in("y", foaf("knows"), "z", graph("g"))
        })
        .build()
        .unwrap();

    let text = SparqlRenderer::new().render(&query).unwrap();
    assert_eq!(
        text,
        "select ?x\nwhere {\n  GRAPH <http://example.org/g> {\n    ?x <http://xmlns.com/foaf/0.1/knows> ?y.\n    ?y <http://xmlns.com/foaf/0.1/knows> ?z.\n  }.\n}"
    );
    assert_eq!(text.matches("GRAPH").count(), 1);
}

#[test]
fn test_different_contexts_render_two_graph_blocks() {
    let query = QueryBuilder::select()
        .add_projection_var(["x"])
        .group(|g| {
            g.atom_in("x", foaf("knows"), "y", graph("g1"))
                .atom_in("y", foaf("knows"), "z", graph("g2"))
        })
        .build()
        .unwrap();

    let text = SparqlRenderer::new().render(&query).unwrap();
    assert_eq!(
        text,
        "select ?x\nwhere {\n  GRAPH <http://example.org/g1> {\n    ?x <http://xmlns.com/foaf/0.1/knows> ?y.\n  }.\n  GRAPH <http://example.org/g2> {\n    ?y <http://xmlns.com/foaf/0.1/knows> ?z.\n  }.\n}"
    );
}

#[test]
fn test_filtered_graph_block_covers_filter() {
    let query = QueryBuilder::select()
        .add_projection_var(["x"])
        .group(|g| {
            g.atom_in("x", foaf("age"), "a", "src")
                .filter(ValueExpr::lt("a", 30i64))
        })
        .build()
        .unwrap();

    let text = SparqlRenderer::new().render(&query).unwrap();
    assert_eq!(
        text,
        "select ?x\nwhere {\n  GRAPH ?src {\n    ?x <http://xmlns.com/foaf/0.1/age> ?a.\n    filter (?a < \"30\"^^<http://www.w3.org/2001/XMLSchema#integer>).\n  }.\n}"
    );
}

#[test]
fn test_render_tree_with_difference() {
    let tree = AlgebraNode::projection(
        Some(AlgebraNode::difference(
            AlgebraNode::pattern(TriplePattern::new("x", foaf("name"), "n")),
            AlgebraNode::pattern(TriplePattern::new("x", foaf("nick"), "n")),
        )),
        Default::default(),
    );
    let text = SparqlRenderer::new()
        .render_tree(&tree, &collect_contexts(&tree))
        .unwrap();
    assert_eq!(
        text,
        "select *\nwhere {\n  ?x <http://xmlns.com/foaf/0.1/name> ?n.\n  MINUS {\n    ?x <http://xmlns.com/foaf/0.1/nick> ?n.\n  }.\n}"
    );
}

#[test]
fn test_indent_width_is_configurable() {
    let config = RenderConfig::from_json_str(r#"{"indent_width": 4}"#).unwrap();
    let query = QueryBuilder::select()
        .add_projection_var(["n"])
        .group(|g| g.atom("x", foaf("name"), "n"))
        .build()
        .unwrap();

    let text = SparqlRenderer::with_config(config).render(&query).unwrap();
    assert_eq!(
        text,
        "select ?n\nwhere {\n    ?x <http://xmlns.com/foaf/0.1/name> ?n.\n}"
    );
}
