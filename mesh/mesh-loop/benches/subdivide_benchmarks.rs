//! Benchmarks for mesh-loop operations.
//!
//! Run with: cargo bench -p mesh-loop
//!
//! To compare against baseline:
//! 1. First run: cargo bench -p mesh-loop -- --save-baseline main
//! 2. After changes: cargo bench -p mesh-loop -- --baseline main

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use mesh_corner::{CornerTable, GeometryBuffer, Point3};
use mesh_loop::{AdjacencyStrategy, SubdivideParams, subdivide, subdivide_round};
use std::collections::HashMap;

// =============================================================================
// Test Mesh Generation
// =============================================================================

/// Create an icosphere buffer with specified refinement level.
fn create_sphere(subdivisions: u32) -> GeometryBuffer {
    let phi = f64::midpoint(1.0, 5.0_f64.sqrt());
    let a = 1.0;
    let b = 1.0 / phi;

    let ico_verts = [
        [0.0, b, -a],
        [b, a, 0.0],
        [-b, a, 0.0],
        [0.0, b, a],
        [0.0, -b, a],
        [-a, 0.0, b],
        [0.0, -b, -a],
        [a, 0.0, -b],
        [a, 0.0, b],
        [-a, 0.0, -b],
        [b, -a, 0.0],
        [-b, -a, 0.0],
    ];

    let ico_faces: [[u32; 3]; 20] = [
        [0, 1, 2],
        [3, 2, 1],
        [3, 4, 5],
        [3, 8, 4],
        [0, 6, 7],
        [0, 9, 6],
        [4, 10, 11],
        [6, 11, 10],
        [2, 5, 9],
        [11, 9, 5],
        [1, 7, 8],
        [10, 8, 7],
        [3, 5, 2],
        [3, 1, 8],
        [0, 2, 9],
        [0, 7, 1],
        [6, 9, 11],
        [6, 10, 7],
        [4, 11, 5],
        [4, 8, 10],
    ];

    let mut buffer = GeometryBuffer::with_capacity(12, 20);
    buffer.add_vertices(
        ico_verts
            .iter()
            .map(|v| Point3::new(v[0], v[1], v[2]))
            .map(|p| Point3::from(p.coords.normalize())),
    );
    for f in &ico_faces {
        buffer.add_triangle(f[0], f[1], f[2]);
    }

    for _ in 0..subdivisions {
        buffer = refine_sphere(&buffer);
    }

    buffer
}

/// Split each face into four, pushing the new midpoints onto the unit sphere.
fn refine_sphere(buffer: &GeometryBuffer) -> GeometryBuffer {
    let mut vertices = buffer.vertices.clone();
    let mut triangles = Vec::with_capacity(buffer.triangles.len() * 4);
    let mut edge_midpoints: HashMap<(u32, u32), u32> = HashMap::new();

    for face in buffer.triangles.chunks_exact(3) {
        let (v0, v1, v2) = (face[0], face[1], face[2]);

        let m01 = get_midpoint(v0, v1, &mut vertices, &mut edge_midpoints);
        let m12 = get_midpoint(v1, v2, &mut vertices, &mut edge_midpoints);
        let m20 = get_midpoint(v2, v0, &mut vertices, &mut edge_midpoints);

        triangles.extend_from_slice(&[v0, m01, m20]);
        triangles.extend_from_slice(&[v1, m12, m01]);
        triangles.extend_from_slice(&[v2, m20, m12]);
        triangles.extend_from_slice(&[m01, m12, m20]);
    }

    GeometryBuffer::from_parts(vertices, triangles)
}

fn get_midpoint(
    v1: u32,
    v2: u32,
    vertices: &mut Vec<Point3<f64>>,
    edge_midpoints: &mut HashMap<(u32, u32), u32>,
) -> u32 {
    let key = if v1 < v2 { (v1, v2) } else { (v2, v1) };

    if let Some(&idx) = edge_midpoints.get(&key) {
        return idx;
    }

    let mid = nalgebra::center(&vertices[v1 as usize], &vertices[v2 as usize]);

    let idx = vertices.len() as u32;
    vertices.push(Point3::from(mid.coords.normalize()));
    edge_midpoints.insert(key, idx);
    idx
}

// =============================================================================
// Adjacency Benchmarks
// =============================================================================

fn bench_corner_table(c: &mut Criterion) {
    let mut group = c.benchmark_group("CornerTable");

    let test_cases = [
        ("sphere_80tri", create_sphere(1)),
        ("sphere_320tri", create_sphere(2)),
        ("sphere_1280tri", create_sphere(3)),
    ];

    for (name, buffer) in &test_cases {
        group.throughput(Throughput::Elements(buffer.corner_count() as u64));

        group.bench_with_input(BenchmarkId::new("hashed", name), buffer, |b, buffer| {
            b.iter(|| CornerTable::build(black_box(buffer)));
        });

        group.bench_with_input(BenchmarkId::new("pairwise", name), buffer, |b, buffer| {
            b.iter(|| CornerTable::build_pairwise(black_box(buffer)));
        });
    }

    group.finish();
}

// =============================================================================
// Subdivision Benchmarks
// =============================================================================

fn bench_round(c: &mut Criterion) {
    let mut group = c.benchmark_group("Round");

    let test_cases = [
        ("sphere_320tri", create_sphere(2)),
        ("sphere_1280tri", create_sphere(3)),
        ("sphere_5120tri", create_sphere(4)),
    ];

    for (name, buffer) in &test_cases {
        group.throughput(Throughput::Elements(buffer.face_count() as u64));

        let table = CornerTable::build(buffer);
        let params = SubdivideParams::new().with_uv_projection(false);
        group.bench_with_input(
            BenchmarkId::new("subdivide_round", name),
            &(buffer, table),
            |b, (buffer, table)| {
                b.iter_batched(
                    || (*buffer).clone(),
                    |mut buffer| subdivide_round(&mut buffer, black_box(table), &params),
                    criterion::BatchSize::LargeInput,
                );
            },
        );
    }

    group.finish();
}

fn bench_strategies(c: &mut Criterion) {
    let mut group = c.benchmark_group("Subdivide");
    group.sample_size(20); // Pairwise adjacency is quadratic, reduce samples

    let test_cases = [
        ("sphere_80tri", create_sphere(1)),
        ("sphere_320tri", create_sphere(2)),
    ];

    for (name, buffer) in &test_cases {
        group.throughput(Throughput::Elements(buffer.face_count() as u64));

        for (label, strategy) in [
            ("hashed_2rounds", AdjacencyStrategy::Hashed),
            ("pairwise_2rounds", AdjacencyStrategy::Pairwise),
        ] {
            let params = SubdivideParams::new()
                .with_rounds(2)
                .with_adjacency(strategy);
            group.bench_with_input(BenchmarkId::new(label, name), buffer, |b, buffer| {
                b.iter(|| subdivide(black_box(buffer.clone()), black_box(&params)));
            });
        }
    }

    group.finish();
}

// =============================================================================
// Criterion Setup
// =============================================================================

criterion_group!(benches, bench_corner_table, bench_round, bench_strategies);
criterion_main!(benches);
