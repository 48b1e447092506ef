use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use quad_chess::game_state::chess_rules::STARTING_POSITION_FEN4;
use quad_chess::game_state::position::Position;
use quad_chess::move_generation::perft::{perft, perft_multi_threaded};

#[derive(Clone, Copy)]
struct BenchCase {
    name: &'static str,
    fen4: &'static str,
    /// Known node counts from depth 1. Deeper benchmarked depths are unchecked.
    expected_nodes: &'static [usize],
    max_depth: u8,
}

const CASES: &[BenchCase] = &[
    BenchCase {
        name: "start",
        fen4: STARTING_POSITION_FEN4,
        expected_nodes: &[20, 399],
        max_depth: 3,
    },
    BenchCase {
        name: "castling",
        fen4: "R-0,0,0,0-1,1,1,1-1,1,1,1-0,0,0,0-0-\
               3,yR,2,yK,3,yR,3/14/14/bR,12,gR/14/14/bK,13/13,gK/14/14/bR,12,gR/14/14/\
               3,rR,3,rK,2,rR,3",
        expected_nodes: &[],
        max_depth: 2,
    },
];

fn bench_perft(c: &mut Criterion) {
    let mut group = c.benchmark_group("perft");
    group.warm_up_time(Duration::from_secs(1));
    group.measurement_time(Duration::from_secs(4));
    group.sample_size(20);

    for case in CASES {
        let position = Position::from_fen4(case.fen4).expect("benchmark position should parse");

        for depth in 1..=case.max_depth {
            let expected = case.expected_nodes.get(usize::from(depth) - 1).copied();
            let mut warmup_position = position.clone();
            let warmup = perft(&mut warmup_position, depth);
            if let Some(expected) = expected {
                assert_eq!(
                    warmup.nodes, expected,
                    "node mismatch in warmup for {} depth {}",
                    case.name, depth
                );
            }

            group.throughput(Throughput::Elements(warmup.nodes as u64));
            let mut bench_position = position.clone();
            group.bench_with_input(
                BenchmarkId::new(case.name, depth),
                &warmup.nodes,
                |b, nodes| {
                    b.iter(|| {
                        let count = perft(&mut bench_position, black_box(depth));
                        assert_eq!(count.nodes, *nodes);
                        black_box(count.nodes)
                    });
                },
            );
        }
    }

    group.finish();
}

fn bench_perft_threaded(c: &mut Criterion) {
    let mut group = c.benchmark_group("perft_threaded");
    group.sample_size(10);

    let position = Position::start();
    group.bench_function("start_d3", |b| {
        b.iter(|| black_box(perft_multi_threaded(black_box(&position), 3).nodes));
    });

    group.finish();
}

criterion_group!(perft_benches, bench_perft, bench_perft_threaded);
criterion_main!(perft_benches);
