//! Criterion benchmarks for lot A* search.
//!
//! Open 64x64 lot, corner to corner, under both heuristics, plus a maze-like
//! lot where every other column is walled with a single gap.
//!
//! Run with: cargo bench -p lot --bench pathfinding_bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use lot::grid::{CellKind, Coord, GateId, LotGrid};
use lot::occupancy::OccupancyLedger;
use lot::pathfinding_sys::{find_path, reachable_from, Heuristic, SearchParams};

const SIZE: usize = 64;

fn open_lot() -> LotGrid {
    let gates = LotGrid::default_gates(SIZE, SIZE);
    LotGrid::new(SIZE, SIZE, &gates).expect("fixture lot should build")
}

/// Walls on every odd column, with the gap alternating top and bottom.
fn serpentine_lot() -> LotGrid {
    let mut grid = open_lot();
    for c in (1..SIZE - 1).step_by(2) {
        let gap = if (c / 2) % 2 == 0 { SIZE - 1 } else { 0 };
        for r in 0..SIZE {
            if r != gap {
                grid.set_cell(Coord(r, c), CellKind::Blocked)
                    .expect("fixture wall should place");
            }
        }
    }
    grid
}

fn bench_astar_heuristics(c: &mut Criterion) {
    let mut group = c.benchmark_group("lot_astar_open");
    let grid = open_lot();
    let ledger = OccupancyLedger::default();
    let goal = Coord(SIZE - 1, SIZE - 1);

    for heuristic in [Heuristic::Euclidean, Heuristic::Manhattan] {
        let params = SearchParams {
            heuristic,
            ..SearchParams::default()
        };
        assert!(find_path(Coord(0, 0), goal, &grid, &ledger, &params).is_ok());
        group.bench_with_input(
            BenchmarkId::new("corner_to_corner", format!("{heuristic:?}")),
            &params,
            |b, params| {
                b.iter(|| black_box(find_path(Coord(0, 0), goal, &grid, &ledger, params)));
            },
        );
    }
    group.finish();
}

fn bench_astar_serpentine(c: &mut Criterion) {
    let mut group = c.benchmark_group("lot_astar_serpentine");
    group.sample_size(30);
    let grid = serpentine_lot();
    let ledger = OccupancyLedger::default();
    let params = SearchParams::default();
    let goal = Coord(0, SIZE - 1);
    assert!(find_path(Coord(0, 0), goal, &grid, &ledger, &params).is_ok());

    group.bench_function("left_to_right", |b| {
        b.iter(|| black_box(find_path(Coord(0, 0), goal, &grid, &ledger, &params)));
    });
    group.finish();
}

fn bench_reachability(c: &mut Criterion) {
    let grid = open_lot();
    let ledger = OccupancyLedger::default();
    let gate = grid
        .gate(GateId::nth(0).expect("gate A"))
        .expect("fixture has gate A");
    c.bench_function("lot_reachable_from_gate", |b| {
        b.iter(|| black_box(reachable_from(gate, &grid, &ledger)));
    });
}

criterion_group!(
    benches,
    bench_astar_heuristics,
    bench_astar_serpentine,
    bench_reachability
);
criterion_main!(benches);
