// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use arbor_render::{RecordingSurface, RenderConfig, TreeRenderer};
use arbor_tree::{Category, EntityId, TreeNode};
use arbor_view::ViewportState;
use kurbo::{Size, Vec2};

/// Rows of 40 with each node parenting the node below it.
fn gen_family(n: usize) -> Vec<TreeNode> {
    const WIDTH: usize = 40;
    (0..n)
        .map(|i| {
            let node = TreeNode::new(
                EntityId(i as u64),
                (i % WIDTH) as f64 * 200.0,
                (i / WIDTH) as f64 * 250.0,
                format!("Member {i}"),
            )
            .with_category(Category::ALL[i % 4])
            .with_age(40);
            if i + WIDTH < n {
                node.with_children([EntityId((i + WIDTH) as u64)])
            } else {
                node
            }
        })
        .collect()
}

fn bench_frame(c: &mut Criterion) {
    let canvas = Size::new(1080.0, 2340.0);
    let mut group = c.benchmark_group("frame");
    for &n in &[100_usize, 1_000, 5_000] {
        for (label, scale) in [("full", 1.0), ("outline", 0.35), ("glyph", 0.2)] {
            let mut renderer = TreeRenderer::new(RenderConfig::default(), gen_family(n));
            let state = ViewportState::new(scale, Vec2::ZERO);
            let mut surface = RecordingSurface::new();
            group.bench_function(BenchmarkId::new(label, n), |b| {
                b.iter(|| {
                    surface.clear();
                    renderer.render(state, canvas, &mut surface)
                });
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_frame);
criterion_main!(benches);
