//! Buffer benchmark: Measure allocation-path and bulk-operation performance.
//!
//! Target: allocation round-trips dominated by the allocator itself, with no
//! measurable overhead from the handle.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rawbuf::Buffer;

const COUNT: usize = 4096;

fn allocate_release_cycle(c: &mut Criterion) {
    c.bench_function("allocate_release_4096", |b| {
        b.iter(|| {
            let mut buffer = Buffer::<u64>::with_count(black_box(COUNT)).unwrap();
            buffer.deallocate();
        });
    });
}

fn zeroed_allocation(c: &mut Criterion) {
    c.bench_function("allocate_zeroed_4096", |b| {
        b.iter(|| Buffer::<u64>::zeroed(black_box(COUNT)).unwrap());
    });
}

fn fill_throughput(c: &mut Criterion) {
    let mut buffer = Buffer::<u64>::with_count(COUNT).unwrap();

    c.bench_function("fill_4096", |b| {
        b.iter(|| buffer.fill(black_box(0xFF)).unwrap());
    });
}

fn clone_buffer(c: &mut Criterion) {
    let mut buffer = Buffer::<u64>::with_count(COUNT).unwrap();
    buffer.fill(7).unwrap();

    c.bench_function("clone_4096", |b| {
        b.iter(|| black_box(&buffer).try_clone().unwrap());
    });
}

fn grow_in_place(c: &mut Criterion) {
    c.bench_function("grow_64_to_4096", |b| {
        b.iter(|| {
            let mut buffer = Buffer::<u64>::with_count(64).unwrap();
            buffer.resize(black_box(COUNT)).unwrap();
            buffer
        });
    });
}

criterion_group!(
    benches,
    allocate_release_cycle,
    zeroed_allocation,
    fill_throughput,
    clone_buffer,
    grow_in_place,
);
criterion_main!(benches);
