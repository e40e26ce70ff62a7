use criterion::{black_box, criterion_group, criterion_main, Criterion};

use corvid_core::eval::evaluate;
use corvid_core::move_list::MoveList;
use corvid_core::perft::perft;
use corvid_core::position::fen::import_fen;
use corvid_core::position::Position;
use corvid_core::prng::PRNG;
use corvid_core::search::{search_root, SearchLimits};
use corvid_core::tt::{Bound, TranspositionTable};

const SEED: u64 = 5_363_310_003_543;
const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

/// A handful of positions reached by random legal walks from the start
/// position, the way the original bench suite's `RandBoard` helper did.
fn random_positions(n: usize) -> Vec<Position> {
    let mut prng = PRNG::init(SEED);
    let mut out = Vec::with_capacity(n);
    for _ in 0..n {
        let mut pos = Position::start_pos();
        for _ in 0..(prng.rand() % 20 + 5) {
            let mut moves = MoveList::new();
            pos.gen_captures(&mut moves);
            pos.gen_quiet_moves(&mut moves);
            let legal: Vec<_> = moves
                .iter()
                .copied()
                .filter(|m| {
                    let mut child = pos;
                    child.make_move(m);
                    !child.is_invalid()
                })
                .collect();
            if legal.is_empty() {
                break;
            }
            let choice = legal[(prng.rand() as usize) % legal.len()];
            pos.make_move(&choice);
        }
        out.push(pos);
    }
    out
}

fn bench_movegen(c: &mut Criterion) {
    let boards = random_positions(100);
    c.bench_function("movegen_100_positions", |b| {
        b.iter(|| {
            for board in boards.iter() {
                let mut moves = MoveList::new();
                board.gen_captures(&mut moves);
                board.gen_quiet_moves(&mut moves);
                black_box(&moves);
            }
        })
    });
}

fn bench_make_move(c: &mut Criterion) {
    let board_move: Vec<_> = random_positions(100)
        .into_iter()
        .map(|pos| {
            let mut moves = MoveList::new();
            pos.gen_quiet_moves(&mut moves);
            (pos, moves[0])
        })
        .collect();

    c.bench_function("make_move_100_positions", |b| {
        b.iter(|| {
            for (pos, mv) in board_move.iter() {
                let mut child = *pos;
                child.make_move(black_box(mv));
                black_box(&child);
            }
        })
    });
}

fn bench_eval(c: &mut Criterion) {
    let boards = random_positions(100);
    c.bench_function("evaluate_100_positions", |b| {
        b.iter(|| {
            for board in boards.iter() {
                black_box(evaluate(board));
            }
        })
    });
}

fn bench_perft(c: &mut Criterion) {
    let pos = import_fen(KIWIPETE).unwrap();
    c.bench_function("perft_kiwipete_depth_3", |b| {
        b.iter(|| black_box(perft(&pos, 3)))
    });
}

fn bench_tt(c: &mut Criterion) {
    let mut prng = PRNG::init(SEED);
    c.bench_function("tt_insert_and_probe", |b| {
        b.iter(|| {
            let mut tt = TranspositionTable::new(1 << 20);
            for _ in 0..1000u32 {
                let key = prng.rand();
                tt.store(key, Bound::Exact, 4, 10, Default::default());
                black_box(tt.probe(key));
            }
        });
    });
}

fn bench_search_depth_3(c: &mut Criterion) {
    let pos = Position::start_pos();
    c.bench_function("search_startpos_depth_3", |b| {
        b.iter(|| {
            let mut tt = TranspositionTable::new(1 << 20);
            let limits = SearchLimits {
                max_depth: 3,
                ..SearchLimits::default()
            };
            black_box(search_root(&pos, &mut tt, &[pos.zkey], limits, |_| {}, &mut || false))
        })
    });
}

criterion_group!(
    engine_benches,
    bench_movegen,
    bench_make_move,
    bench_eval,
    bench_perft,
    bench_tt,
    bench_search_depth_3
);
criterion_main!(engine_benches);
