//! Middleware composition benchmarks
//!
//! Measures the per-call overhead a composed chain adds over invoking
//! the base operation directly.
//!
//! Run with: `cargo bench`

#![allow(missing_docs)] // Benchmarks don't need extensive docs
#![allow(clippy::expect_used)] // Benchmarks can use expect for setup

use criterion::{Criterion, criterion_group, criterion_main};
use lorekeeper_core::middleware::{Operation, apply_middleware, middleware_fn, operation};
use lorekeeper_core::response::Response;
use std::hint::black_box;

fn passthrough(name: &'static str) -> std::sync::Arc<dyn lorekeeper_core::Middleware<u64, u64>> {
    middleware_fn(name, |params: u64, next: Operation<u64, u64>| next(params))
}

fn bench_composition(c: &mut Criterion) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("runtime");

    let base = operation(|n: u64| async move { Response::success(n + 1) });

    let bare = base.clone();
    c.bench_function("bare_operation", |b| {
        b.to_async(&runtime).iter(|| {
            let bare = bare.clone();
            async move { black_box(bare(black_box(1)).await) }
        });
    });

    for depth in [1usize, 4, 8] {
        let chain: Vec<_> = (0..depth).map(|_| passthrough("passthrough")).collect();
        let composed = apply_middleware(base.clone(), chain);

        c.bench_function(&format!("chain_depth_{depth}"), |b| {
            b.to_async(&runtime).iter(|| {
                let composed = composed.clone();
                async move { black_box(composed(black_box(1)).await) }
            });
        });
    }
}

criterion_group!(benches, bench_composition);
criterion_main!(benches);
