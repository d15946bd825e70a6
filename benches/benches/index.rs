// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use arbor_index::{Aabb2D, GridIndex, IndexConfig};
use arbor_tree::{EntityId, TreeLayoutConfig, TreeNode};

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

/// A generation-per-row tree: `n` nodes, rows of `width`, 200 × 250 spacing.
fn gen_tree(n: usize, width: usize) -> Vec<TreeNode> {
    (0..n)
        .map(|i| {
            TreeNode::new(
                EntityId(i as u64),
                (i % width) as f64 * 200.0,
                (i / width) as f64 * 250.0,
                "n",
            )
        })
        .collect()
}

fn gen_points(count: usize, nodes: &[TreeNode]) -> Vec<(f64, f64)> {
    let mut rng = Rng::new(0x81FD_BEE7_94F0_AF1A);
    let (max_x, max_y) = nodes
        .iter()
        .fold((0.0_f64, 0.0_f64), |(x, y), n| (x.max(n.x), y.max(n.y)));
    (0..count)
        .map(|_| (rng.next_f64() * max_x, rng.next_f64() * max_y))
        .collect()
}

fn boxes(nodes: &[TreeNode], layout: &TreeLayoutConfig) -> Vec<Aabb2D> {
    nodes
        .iter()
        .map(|n| Aabb2D::centered(n.x, n.y, layout.node_width, layout.node_height))
        .collect()
}

fn bench_build(c: &mut Criterion) {
    let layout = TreeLayoutConfig::default();
    let mut group = c.benchmark_group("grid_build");
    for &n in &[100_usize, 1_000, 10_000] {
        let nodes = gen_tree(n, 40);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(BenchmarkId::from_parameter(n), |b| {
            b.iter(|| GridIndex::from_nodes(black_box(&nodes), &layout, IndexConfig::default()));
        });
    }
    group.finish();
}

fn bench_point(c: &mut Criterion) {
    let layout = TreeLayoutConfig::default();
    let mut group = c.benchmark_group("point_query");
    for &n in &[100_usize, 1_000, 10_000] {
        let nodes = gen_tree(n, 40);
        let points = gen_points(1_000, &nodes);
        let index = GridIndex::from_nodes(&nodes, &layout, IndexConfig::default());
        let scan = boxes(&nodes, &layout);
        group.throughput(Throughput::Elements(points.len() as u64));

        group.bench_function(BenchmarkId::new("Grid", n), |b| {
            b.iter(|| {
                points
                    .iter()
                    .filter(|&&(x, y)| index.query_point(x, y).is_some())
                    .count()
            });
        });
        group.bench_function(BenchmarkId::new("Scan", n), |b| {
            b.iter(|| {
                points
                    .iter()
                    .filter(|&&(x, y)| scan.iter().any(|r| r.contains_point(x, y)))
                    .count()
            });
        });
    }
    group.finish();
}

fn bench_viewport(c: &mut Criterion) {
    let layout = TreeLayoutConfig::default();
    let mut group = c.benchmark_group("viewport_query");
    // Roughly one phone screen at scale 1 plus padding.
    let viewport = Aabb2D::new(1000.0, 1000.0, 2500.0, 3500.0);
    for &n in &[100_usize, 1_000, 10_000] {
        let nodes = gen_tree(n, 40);
        let index = GridIndex::from_nodes(&nodes, &layout, IndexConfig::default());
        let scan = boxes(&nodes, &layout);
        let mut out = Vec::new();

        group.bench_function(BenchmarkId::new("Grid", n), |b| {
            b.iter(|| {
                index.query_rect_into(black_box(viewport), &mut out);
                out.len()
            });
        });
        group.bench_function(BenchmarkId::new("Scan", n), |b| {
            b.iter(|| scan.iter().filter(|r| r.overlaps(&viewport)).count());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_build, bench_point, bench_viewport);
criterion_main!(benches);
