//! Geometry and detector benchmarks
//!
//! Performance benchmarks for the per-position work done on every analysis
//! request, using Criterion.

use chess_core::{attacks_from, detect_all, Position};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

const MIDDLEGAME_FEN: &str = "r1bq1rk1/pp2bppp/2n1pn2/3p4/2PP4/2N1PN2/PP2BPPP/R2QKB1R w KQ - 4 8";

fn bench_decode_starting(c: &mut Criterion) {
    c.bench_function("decode_starting_position", |b| {
        b.iter(|| black_box(Position::starting()))
    });
}

fn bench_encode_middlegame(c: &mut Criterion) {
    let position: Position = MIDDLEGAME_FEN.parse().unwrap_or_default();

    c.bench_function("encode_middlegame", |b| {
        b.iter(|| black_box(position.to_fen()))
    });
}

fn bench_attack_map_middlegame(c: &mut Criterion) {
    let position: Position = MIDDLEGAME_FEN.parse().unwrap_or_default();

    c.bench_function("attack_map_middlegame", |b| {
        b.iter(|| {
            let total: usize = position
                .pieces()
                .map(|(sq, piece)| attacks_from(sq, piece, &position).len())
                .sum();
            black_box(total)
        })
    });
}

fn bench_detect_all(c: &mut Criterion) {
    let position: Position = MIDDLEGAME_FEN.parse().unwrap_or_default();

    c.bench_function("detect_all_middlegame", |b| {
        b.iter(|| black_box(detect_all(&position)))
    });
}

criterion_group!(
    benches,
    bench_decode_starting,
    bench_encode_middlegame,
    bench_attack_map_middlegame,
    bench_detect_all,
);
criterion_main!(benches);
