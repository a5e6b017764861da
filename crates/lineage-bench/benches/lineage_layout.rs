use criterion::{Criterion, black_box, criterion_group, criterion_main};
use lineage_bench::util;
use lineage_core::LayoutDirection;
use lineage_graph::{ExpandedState, LayoutRequest, LineageDocument, LineageLayout};

fn expand_all(nodes: &[lineage_core::LineageNode]) -> ExpandedState {
    nodes.iter().map(|node| (node.id.clone(), true)).collect()
}

fn bench_descendant_counts(c: &mut Criterion) {
    let (nodes, edges) = util::generate_synthetic_lineage(4, 50, 4);
    let layout = LineageLayout::default();

    c.bench_function("descendant_counts_7k_nodes", |b| {
        b.iter(|| {
            let counts = layout.descendant_counts(black_box(&nodes), black_box(&edges));
            black_box(counts);
        })
    });
}

fn bench_tree_layout(c: &mut Criterion) {
    let (nodes, edges) = util::generate_synthetic_lineage(1, 200, 3);
    let expanded = expand_all(&nodes);
    let layout = LineageLayout::default();

    c.bench_function("tree_layout_fully_expanded", |b| {
        b.iter(|| {
            let request = LayoutRequest::new(&nodes, &edges, &expanded);
            black_box(layout.arrange(black_box(&request)));
        })
    });
}

fn bench_layered_layout(c: &mut Criterion) {
    let (nodes, edges) = util::generate_synthetic_lineage(1, 100, 3);
    let expanded = expand_all(&nodes);
    let layout = LineageLayout::default();

    c.bench_function("layered_layout_left_right", |b| {
        b.iter(|| {
            let request = LayoutRequest::new(&nodes, &edges, &expanded)
                .with_direction(LayoutDirection::LeftRight);
            black_box(layout.arrange(black_box(&request)));
        })
    });
}

fn bench_load_and_arrange(c: &mut Criterion) {
    let (_temp_dir, path) = util::write_synthetic_document(2, 100, 3).unwrap();
    let layout = LineageLayout::default();

    c.bench_function("load_and_arrange_collapsed", |b| {
        b.iter(|| {
            let document = LineageDocument::load(black_box(&path)).unwrap();
            black_box(layout.arrange(&document.request()));
        })
    });
}

criterion_group!(
    benches,
    bench_descendant_counts,
    bench_tree_layout,
    bench_layered_layout,
    bench_load_and_arrange
);
criterion_main!(benches);
