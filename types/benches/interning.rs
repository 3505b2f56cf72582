//! Benchmarks for the TypeContext.
//!
//! Run with: `cargo bench --bench interning` in the types/ directory.
//!
//! Benchmark groups:
//! 1. tensor_creation: Interning dense tensor types not seen before
//! 2. tensor_lookup: Getting already-interned dense tensor types
//! 3. handle_equality: Comparing handles by identity

use carve_types::{
    DataLayout, DenseTensorType, ElementKind, NO_LOD, TypeContext, TypeFacade,
};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

/// Benchmark: Creating new tensor types (first time, not yet interned).
///
/// Measures hashing, the shard lock, arena copies of dims, and table insertion.
fn bench_tensor_creation(c: &mut Criterion) {
    let mut group = c.benchmark_group("tensor_creation");

    for rank in [1usize, 4, 16] {
        group.bench_with_input(BenchmarkId::from_parameter(rank), &rank, |b, &rank| {
            let ctx = TypeContext::new();
            let mut counter = 0i64;

            b.iter(|| {
                // Leading extent is unique per iteration to avoid cache hits
                let mut dims = vec![2i64; rank];
                dims[0] = counter;
                counter += 1;

                let ty = DenseTensorType::get(
                    &ctx,
                    ElementKind::Float32,
                    black_box(&dims),
                    DataLayout::RowMajor,
                    NO_LOD,
                    0,
                );
                black_box(ty.is_ok())
            });
        });
    }

    group.finish();
}

/// Benchmark: Getting already-interned tensor types.
///
/// This should be fast - one hash, one lock, one probe.
fn bench_tensor_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("tensor_lookup");

    for rank in [1usize, 4, 16] {
        group.bench_with_input(BenchmarkId::from_parameter(rank), &rank, |b, &rank| {
            let ctx = TypeContext::new();
            let dims = vec![3i64; rank];
            let lod: [&[usize]; 1] = [&[0, 1, 3]];

            // Pre-intern the type
            let first =
                DenseTensorType::get(&ctx, ElementKind::Float32, &dims, DataLayout::RowMajor, &lod, 0);

            b.iter(|| {
                let ty = DenseTensorType::get(
                    &ctx,
                    ElementKind::Float32,
                    black_box(&dims),
                    DataLayout::RowMajor,
                    black_box(&lod),
                    0,
                );
                black_box(ty == first)
            });
        });
    }

    group.finish();
}

/// Benchmark: Comparing two handles, which is a pointer comparison.
fn bench_handle_equality(c: &mut Criterion) {
    let ctx = TypeContext::new();
    let dims: Vec<i64> = (1..=64).collect();
    let a = DenseTensorType::get(&ctx, ElementKind::Int64, &dims, DataLayout::RowMajor, NO_LOD, 0);
    let b = DenseTensorType::get(&ctx, ElementKind::Int64, &dims, DataLayout::RowMajor, NO_LOD, 0);
    let (Ok(a), Ok(b)) = (a, b) else {
        return;
    };

    c.bench_function("handle_equality", |bench| {
        bench.iter(|| black_box(a.handle()) == black_box(b.handle()))
    });
}

criterion_group!(
    benches,
    bench_tensor_creation,
    bench_tensor_lookup,
    bench_handle_equality
);
criterion_main!(benches);
