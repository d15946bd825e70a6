// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use arbor_thumbs::{Thumbnail, ThumbnailCache};

const EDGE: u32 = 64;

fn thumbnail() -> Thumbnail {
    let len = (EDGE * EDGE * 4) as usize;
    Thumbnail::from_rgba8(EDGE, EDGE, vec![0_u8; len]).unwrap()
}

fn bench_churn(c: &mut Criterion) {
    let thumb = thumbnail();
    let keys: Vec<String> = (0..1_000).map(|i| format!("photos/{i}.jpg")).collect();
    // Room for a quarter of the keys.
    let budget = thumb.byte_size() * keys.len() / 4;

    let mut group = c.benchmark_group("thumbnail_cache");
    group.throughput(Throughput::Elements(keys.len() as u64));
    group.bench_function("insert_evicting", |b| {
        b.iter_batched(
            || ThumbnailCache::new(budget),
            |mut cache| {
                for key in &keys {
                    cache.insert(key.as_str(), thumb.clone());
                }
                cache
            },
            BatchSize::SmallInput,
        );
    });

    let mut warm = ThumbnailCache::new(budget);
    for key in &keys[..keys.len() / 4] {
        warm.insert(key.as_str(), thumb.clone());
    }
    group.bench_function("get_hit_or_miss", |b| {
        b.iter(|| {
            keys.iter()
                .filter(|k| warm.get(black_box(k.as_str())).is_some())
                .count()
        });
    });
    group.finish();
}

criterion_group!(benches, bench_churn);
criterion_main!(benches);
