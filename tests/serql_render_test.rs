use samyama_querybuilder::builder::QueryBuilder;
use samyama_querybuilder::rdf::NamedNode;
use samyama_querybuilder::{
    AlgebraNode, ExtensionElem, NodeKind, ProjectionElem, ProjectionElemList, QueryRenderer,
    RenderError, SerqlRenderer, Term, TriplePattern, ValueExpr,
};

fn foaf(local: &str) -> NamedNode {
    NamedNode::new(&format!("http://xmlns.com/foaf/0.1/{}", local)).unwrap()
}

#[test]
fn test_select_two_atoms() {
    let query = QueryBuilder::select()
        .add_projection_var(["name", "mbox"])
        .group(|g| g.atom("x", foaf("name"), "name").atom("x", foaf("mbox"), "mbox"))
        .build()
        .unwrap();

    assert_eq!(
        SerqlRenderer::new().render(&query).unwrap(),
        "select name, mbox\nfrom\n  {x} <http://xmlns.com/foaf/0.1/name> {name},\n  {x} <http://xmlns.com/foaf/0.1/mbox> {mbox}"
    );
}

#[test]
fn test_distinct_limit_with_optional_bracket() {
    let query = QueryBuilder::select()
        .distinct()
        .limit(100)
        .add_projection_var(["name", "mbox"])
        .group(|g| {
            g.atom("x", foaf("name"), "name").optional(|o| {
                o.atom("x", foaf("mbox"), "mbox")
                    .atom("x", foaf("homepage"), "hp")
            })
        })
        .build()
        .unwrap();

    assert_eq!(
        SerqlRenderer::new().render(&query).unwrap(),
        "select distinct name, mbox\nfrom\n  {x} <http://xmlns.com/foaf/0.1/name> {name},\n  [{x} <http://xmlns.com/foaf/0.1/mbox> {mbox}, {x} <http://xmlns.com/foaf/0.1/homepage> {hp}]\nlimit 100"
    );
}

#[test]
fn test_filters_merge_into_where_clause() {
    let query = QueryBuilder::select()
        .add_projection_var(["x"])
        .group(|g| {
            g.atom("x", foaf("name"), "n")
                .filter_with(|f| f.regex("n", "^A").ne("n", "x"))
                .optional(|o| o.atom("x", foaf("age"), "a").filter(ValueExpr::bound("a")))
        })
        .order_by_desc("n")
        .build()
        .unwrap();

    assert_eq!(
        SerqlRenderer::new().render(&query).unwrap(),
        "select x\nfrom\n  {x} <http://xmlns.com/foaf/0.1/name> {n},\n  [{x} <http://xmlns.com/foaf/0.1/age> {a} where bound(a)]\nwhere regex(n, \"^A\") and (n != x)\norder by n desc"
    );
}

#[test]
fn test_set_operations_at_the_root() {
    let name = AlgebraNode::pattern(TriplePattern::new("x", foaf("name"), "n"));
    let nick = AlgebraNode::pattern(TriplePattern::new("x", foaf("nick"), "n"));
    let only_n = ProjectionElemList::new(vec![ProjectionElem::same("n")]);

    let minus = AlgebraNode::projection(Some(AlgebraNode::difference(name.clone(), nick.clone())), only_n.clone());
    let text = SerqlRenderer::new()
        .render_tree(&minus, &samyama_querybuilder::collect_contexts(&minus))
        .unwrap();
    assert_eq!(
        text,
        "(select n\nfrom\n  {x} <http://xmlns.com/foaf/0.1/name> {n})\nminus\n(select n\nfrom\n  {x} <http://xmlns.com/foaf/0.1/nick> {n})"
    );

    let intersect = AlgebraNode::projection(Some(AlgebraNode::intersection(name, nick)), only_n);
    let text = SerqlRenderer::new()
        .render_tree(&intersect, &samyama_querybuilder::collect_contexts(&intersect))
        .unwrap();
    assert!(text.contains(")\nintersect\n("));
}

#[test]
fn test_describe_is_rewritten_to_construct() {
    let query = QueryBuilder::describe([Term::var("x")])
        .group(|g| g.atom("x", foaf("knows"), "y"))
        .build()
        .unwrap();

    assert_eq!(
        SerqlRenderer::new().render(&query).unwrap(),
        "construct {_descr_subj} _descr_pred {_descr_obj}\nfrom\n  {x} <http://xmlns.com/foaf/0.1/knows> {y},\n  {_descr_subj} _descr_pred {_descr_obj}\nwhere sameTerm(x, _descr_subj) or sameTerm(x, _descr_obj)"
    );
}

#[test]
fn test_unreferenced_extension_is_rejected() {
    let tree = AlgebraNode::projection(
        Some(AlgebraNode::extension(
            AlgebraNode::pattern(TriplePattern::new("x", foaf("name"), "n")),
            vec![ExtensionElem::new("label", ValueExpr::str("n"))],
        )),
        ProjectionElemList::new(vec![ProjectionElem::same("x")]),
    );
    let err = SerqlRenderer::new()
        .render_tree(&tree, &samyama_querybuilder::ContextMap::new())
        .unwrap_err();
    assert_eq!(
        err,
        RenderError::UnsupportedNode {
            target: "SeRQL",
            kind: NodeKind::Extension
        }
    );
}

fn graph(name: &str) -> NamedNode {
    NamedNode::new(&format!("http://example.org/{}", name)).unwrap()
}

#[test]
fn test_each_context_gets_its_own_from_clause() {
    let query = QueryBuilder::select()
        .add_projection_var(["x"])
        .group(|g| {
            g.atom_in("x", foaf("knows"), "y", graph("g1"))
                .atom_in("y", foaf("knows"), "z", graph("g2"))
                .atom("z", foaf("name"), "n")
        })
        .build()
        .unwrap();

    assert_eq!(
        SerqlRenderer::new().render(&query).unwrap(),
        "select x\n\
         from context <http://example.org/g1>\n\
         \x20 {x} <http://xmlns.com/foaf/0.1/knows> {y}\n\
         from context <http://example.org/g2>\n\
         \x20 {y} <http://xmlns.com/foaf/0.1/knows> {z}\n\
         from\n\
         \x20 {z} <http://xmlns.com/foaf/0.1/name> {n}"
    );
}

#[test]
fn test_optional_context_is_promoted_to_plain_parent() {
    let query = QueryBuilder::select()
        .add_projection_var(["x", "m"])
        .group(|g| {
            g.atom("x", foaf("name"), "n")
                .optional(|o| o.atom_in("x", foaf("mbox"), "m", graph("g")))
        })
        .build()
        .unwrap();

    assert_eq!(
        SerqlRenderer::new().render(&query).unwrap(),
        "select x, m\nfrom context <http://example.org/g>\n  {x} <http://xmlns.com/foaf/0.1/name> {n},\n  [{x} <http://xmlns.com/foaf/0.1/mbox> {m}]"
    );
}

#[test]
fn test_optional_in_other_context_is_rejected() {
    let query = QueryBuilder::select()
        .add_projection_var(["x", "m"])
        .group(|g| {
            g.atom_in("x", foaf("name"), "n", graph("g1"))
                .optional(|o| o.atom_in("x", foaf("mbox"), "m", graph("g2")))
        })
        .build()
        .unwrap();

    assert_eq!(
        SerqlRenderer::new().render(&query).unwrap_err(),
        RenderError::UnsupportedPosition {
            target: "SeRQL",
            kind: NodeKind::LeftJoin
        }
    );
}
