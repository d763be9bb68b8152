//! Criterion benchmarks for the equilibrium solvers.
//!
//! Benchmarks:
//! 1. Support enumeration on 5x5 games
//! 2. Vertex enumeration on 5x5 games
//! 3. Default fallback solver across game sizes

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use nashlab_core::domain::{Game, PayoffConvention, PayoffMatrix};
use nashlab_core::solver::{
    EquilibriumSolver, FallbackSolver, SolverSettings, SupportEnumeration, VertexEnumeration,
};
use nashlab_core::source::{get_matrix, random_matrix, MatrixRequest};

// ── Helpers ──────────────────────────────────────────────────────────

fn random_game(rows: usize, cols: usize, seed: u64) -> Game {
    let a = random_matrix(rows, cols, seed).unwrap();
    let b = random_matrix(rows, cols, seed.wrapping_add(1)).unwrap();
    let a = get_matrix(&MatrixRequest::Custom(a)).unwrap().payoffs_a;
    let b = get_matrix(&MatrixRequest::Custom(b)).unwrap().payoffs_a;
    Game::new(a, b).unwrap()
}

fn zero_game() -> Game {
    Game::from_convention(PayoffMatrix::zeros(5, 5).unwrap(), PayoffConvention::Identical).unwrap()
}

// ── 1. Support enumeration ───────────────────────────────────────────

fn bench_support(c: &mut Criterion) {
    let solver = SupportEnumeration::new(SolverSettings::default());
    let game = random_game(5, 5, 42);
    c.bench_function("support_enumeration_5x5", |b| {
        b.iter(|| solver.enumerate(black_box(&game)))
    });
    let zeros = zero_game();
    c.bench_function("support_enumeration_5x5_zero", |b| {
        b.iter(|| solver.enumerate(black_box(&zeros)))
    });
}

// ── 2. Vertex enumeration ────────────────────────────────────────────

fn bench_vertex(c: &mut Criterion) {
    let solver = VertexEnumeration::new(SolverSettings::default());
    let game = random_game(5, 5, 42);
    c.bench_function("vertex_enumeration_5x5", |b| {
        b.iter(|| solver.enumerate(black_box(&game)))
    });
}

// ── 3. Fallback solver by size ───────────────────────────────────────

fn bench_fallback_sizes(c: &mut Criterion) {
    let solver = FallbackSolver::default();
    let mut group = c.benchmark_group("fallback_by_size");
    for n in 2..=5usize {
        let game = random_game(n, n, 7);
        group.bench_with_input(BenchmarkId::from_parameter(n), &game, |b, game| {
            b.iter(|| solver.solve(black_box(game)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_support, bench_vertex, bench_fallback_sizes);
criterion_main!(benches);
