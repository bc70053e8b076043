use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use samyama_querybuilder::builder::{Query, QueryBuilder};
use samyama_querybuilder::rdf::NamedNode;
use samyama_querybuilder::{collect_contexts, QueryRenderer, SerqlRenderer, SparqlRenderer, ValueExpr};

fn foaf(local: &str) -> NamedNode {
    NamedNode::new(&format!("http://xmlns.com/foaf/0.1/{}", local)).unwrap()
}

/// A chain of `size` hops with an optional name on every hop
fn chain_builder(size: usize) -> QueryBuilder {
    QueryBuilder::select()
        .distinct()
        .add_projection_var(["v0"])
        .limit(100)
        .group(|mut g| {
            for i in 0..size {
                let (from, to) = (format!("v{}", i), format!("v{}", i + 1));
                let name = format!("n{}", i);
                g = g
                    .atom(from.as_str(), foaf("knows"), to.as_str())
                    .optional(|o| o.atom(from.as_str(), foaf("name"), name.as_str()));
            }
            g.filter(ValueExpr::ne("v0", format!("v{}", size).as_str()))
        })
}

fn chain_query(size: usize) -> Query {
    chain_builder(size).build().unwrap()
}

/// Benchmark fluent construction and group compilation
fn bench_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile");

    for size in [10, 100, 1000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter(|| criterion::black_box(chain_builder(size).compile().unwrap()));
        });
    }
    group.finish();
}

/// Benchmark the context collection pass
fn bench_contexts(c: &mut Criterion) {
    let mut group = c.benchmark_group("contexts");
    let graph = NamedNode::new("http://example.org/g").unwrap();

    for size in [10, 100, 1000].iter() {
        let query = QueryBuilder::select()
            .group(|mut g| {
                for i in 0..*size {
                    let (from, to) = (format!("v{}", i), format!("v{}", i + 1));
                    g = g.atom_in(from.as_str(), foaf("knows"), to.as_str(), graph.clone());
                }
                g
            })
            .build()
            .unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| criterion::black_box(collect_contexts(query.root()).len()));
        });
    }
    group.finish();
}

/// Benchmark rendering to both target syntaxes
fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    let sparql = SparqlRenderer::new();
    let serql = SerqlRenderer::new();

    for size in [10, 100, 1000].iter() {
        let query = chain_query(*size);

        group.bench_with_input(BenchmarkId::new("sparql", size), size, |b, _| {
            b.iter(|| criterion::black_box(sparql.render(&query).unwrap()));
        });
        group.bench_with_input(BenchmarkId::new("serql", size), size, |b, _| {
            b.iter(|| criterion::black_box(serql.render(&query).unwrap()));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_compile, bench_contexts, bench_render);
criterion_main!(benches);
