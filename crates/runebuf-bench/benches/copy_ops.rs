//! Criterion micro-benchmarks for the bridge copy and its entry points.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use runebuf_bench::{index_profile, upload_target, vertex_profile};
use runebuf_core::{copy, copy_elements, copy_unchecked, DirectBuffer};
use runebuf_ffi::{runebuf_copy_f32, RunebufStatus};

/// 4096 vertices: 128 KiB of floats.
const VERTICES: usize = 4096;

fn bench_copy_vertices(c: &mut Criterion) {
    let source = vertex_profile(VERTICES);
    let mut target = upload_target(&source).unwrap();
    let num_bytes = target.byte_len() as i32;

    c.bench_function("copy_vertices_128k", |b| {
        b.iter(|| {
            copy(&source[..], 0, Some(&mut target), 0, black_box(num_bytes)).unwrap();
        });
    });
}

fn bench_copy_indices(c: &mut Criterion) {
    let source = index_profile(8192);
    let mut target = upload_target(&source).unwrap();
    let num_bytes = target.byte_len() as i32;

    c.bench_function("copy_indices_48k", |b| {
        b.iter(|| {
            copy(&source[..], 0, Some(&mut target), 0, black_box(num_bytes)).unwrap();
        });
    });
}

fn bench_copy_elements_at_position(c: &mut Criterion) {
    let source = vertex_profile(VERTICES);
    let mut target = DirectBuffer::floats(source.len() * 2).unwrap();
    target.set_position(source.len()).unwrap();
    let count = source.len() as i32;

    c.bench_function("copy_elements_second_half_128k", |b| {
        b.iter(|| {
            copy_elements(&source[..], 0, &mut target, black_box(count)).unwrap();
        });
    });
}

fn bench_copy_small_sub_range(c: &mut Criterion) {
    let source = vertex_profile(VERTICES);
    let mut target = vec![0u8; 256];

    c.bench_function("copy_sub_range_256b", |b| {
        b.iter(|| {
            copy(&source[..], black_box(1024), Some(&mut target), 0, 256).unwrap();
        });
    });
}

fn bench_copy_unchecked(c: &mut Criterion) {
    let source = vertex_profile(VERTICES);
    let mut target = upload_target(&source).unwrap();
    let num_bytes = target.byte_len();

    c.bench_function("copy_unchecked_128k", |b| {
        b.iter(|| {
            let dst = target.as_bytes_mut().as_mut_ptr();
            // SAFETY: both regions hold `num_bytes` bytes and do not overlap.
            unsafe { copy_unchecked(source.as_ptr(), 0, dst, 0, black_box(num_bytes)) };
        });
    });
}

fn bench_ffi_copy(c: &mut Criterion) {
    let source = vertex_profile(VERTICES);
    let mut target = vec![0u8; source.len() * 4];
    let num_bytes = target.len() as i32;

    c.bench_function("ffi_copy_f32_128k", |b| {
        b.iter(|| {
            // SAFETY: pointers and lengths come from the live `source` and
            // `target` vectors.
            let status = unsafe {
                runebuf_copy_f32(
                    source.as_ptr(),
                    source.len(),
                    0,
                    target.as_mut_ptr(),
                    target.len(),
                    0,
                    black_box(num_bytes),
                )
            };
            assert_eq!(status, RunebufStatus::Ok as i32);
        });
    });
}

fn bench_allocate_buffer(c: &mut Criterion) {
    c.bench_function("allocate_float_buffer_64k", |b| {
        b.iter(|| black_box(DirectBuffer::floats(black_box(16 * 1024)).unwrap()));
    });
}

criterion_group!(
    benches,
    bench_copy_vertices,
    bench_copy_indices,
    bench_copy_elements_at_position,
    bench_copy_small_sub_range,
    bench_copy_unchecked,
    bench_ffi_copy,
    bench_allocate_buffer
);
criterion_main!(benches);
