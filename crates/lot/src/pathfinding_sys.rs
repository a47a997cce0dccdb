//! A* route search over the lot grid.
//!
//! Movement is 4-connected with unit step cost. Blocked cells are static
//! obstacles; occupied spots from the [`OccupancyLedger`] are layered on top
//! as dynamic obstacles. Gates and unoccupied parking cells can be driven
//! through. The start cell itself is never checked, so a parked car can
//! route out of its own spot.

use std::cmp::Ordering;
use std::collections::{BTreeSet, BinaryHeap, HashMap};

use pathfinding::prelude::bfs_reach;
use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_MAX_EXPANSIONS;
use crate::grid::{Coord, LotGrid};
use crate::occupancy::OccupancyLedger;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Heuristic {
    /// Straight-line distance. Admissible but not tight under 4-connectivity.
    #[default]
    Euclidean,
    /// Exact step count on an empty grid.
    Manhattan,
}

impl Heuristic {
    pub fn estimate(self, from: Coord, to: Coord) -> f64 {
        match self {
            Heuristic::Euclidean => from.euclidean(to),
            Heuristic::Manhattan => from.manhattan(to) as f64,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ObstacleMode {
    #[default]
    Respect,
    /// Every in-bounds cell is passable.
    Ignore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchParams {
    pub heuristic: Heuristic,
    /// Nodes expanded before the search gives up with [`PathError::Exhausted`].
    pub max_expansions: usize,
    pub obstacles: ObstacleMode,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            heuristic: Heuristic::default(),
            max_expansions: DEFAULT_MAX_EXPANSIONS,
            obstacles: ObstacleMode::Respect,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// The open set emptied without reaching the goal.
    NotFound,
    /// The expansion cap was reached first.
    Exhausted { expanded: usize },
    OutOfBounds(Coord),
}

/// Open-set entry. Ordered so `BinaryHeap` pops the lowest f-score first,
/// and among equal f-scores the earliest discovered node.
#[derive(Debug, Clone, Copy)]
struct OpenNode {
    f: f64,
    seq: u64,
    g: usize,
    coord: Coord,
}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for OpenNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenNode {}

#[inline]
fn is_open(grid: &LotGrid, occupied: &OccupancyLedger, coord: Coord, mode: ObstacleMode) -> bool {
    match mode {
        ObstacleMode::Respect => grid.is_traversable(coord) && !occupied.is_occupied(coord),
        ObstacleMode::Ignore => grid.in_bounds(coord),
    }
}

/// Shortest route from `start` to `goal`, both inclusive.
pub fn find_path(
    start: Coord,
    goal: Coord,
    grid: &LotGrid,
    occupied: &OccupancyLedger,
    params: &SearchParams,
) -> Result<Vec<Coord>, PathError> {
    for coord in [start, goal] {
        if !grid.in_bounds(coord) {
            return Err(PathError::OutOfBounds(coord));
        }
    }
    if start == goal {
        return Ok(vec![start]);
    }

    let mut open = BinaryHeap::new();
    let mut came_from: HashMap<Coord, Coord> = HashMap::new();
    let mut g_score: HashMap<Coord, usize> = HashMap::new();
    let mut seq = 0u64;
    let mut expanded = 0usize;

    g_score.insert(start, 0);
    open.push(OpenNode {
        f: params.heuristic.estimate(start, goal),
        seq,
        g: 0,
        coord: start,
    });

    while let Some(node) = open.pop() {
        if node.coord == goal {
            return Ok(reconstruct_path(&came_from, goal));
        }
        // Superseded by a cheaper entry pushed later.
        if g_score.get(&node.coord).is_some_and(|&g| node.g > g) {
            continue;
        }
        if expanded >= params.max_expansions {
            return Err(PathError::Exhausted { expanded });
        }
        expanded += 1;

        let (neighbors, count) = grid.neighbors4(node.coord);
        for &next in &neighbors[..count] {
            if !is_open(grid, occupied, next, params.obstacles) {
                continue;
            }
            let tentative = node.g + 1;
            if g_score.get(&next).is_some_and(|&g| tentative >= g) {
                continue;
            }
            came_from.insert(next, node.coord);
            g_score.insert(next, tentative);
            seq += 1;
            open.push(OpenNode {
                f: tentative as f64 + params.heuristic.estimate(next, goal),
                seq,
                g: tentative,
                coord: next,
            });
        }
    }

    Err(PathError::NotFound)
}

fn reconstruct_path(came_from: &HashMap<Coord, Coord>, goal: Coord) -> Vec<Coord> {
    let mut path = vec![goal];
    let mut current = goal;
    while let Some(&prev) = came_from.get(&current) {
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}

/// Every cell reachable from `start` under the same passability rules as
/// [`find_path`] with [`ObstacleMode::Respect`]. Includes `start`.
pub fn reachable_from(start: Coord, grid: &LotGrid, occupied: &OccupancyLedger) -> BTreeSet<Coord> {
    if !grid.in_bounds(start) {
        return BTreeSet::new();
    }
    bfs_reach(start, |&coord| {
        let (neighbors, count) = grid.neighbors4(coord);
        neighbors
            .into_iter()
            .take(count)
            .filter(move |&next| is_open(grid, occupied, next, ObstacleMode::Respect))
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{CellKind, GateId};

    use pathfinding::prelude::bfs;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn open_grid(rows: usize, cols: usize) -> LotGrid {
        LotGrid::new(rows, cols, &[(GateId::nth(0).unwrap(), Coord(0, 0))]).unwrap()
    }

    fn assert_well_formed(path: &[Coord], start: Coord, goal: Coord) {
        assert_eq!(path.first(), Some(&start));
        assert_eq!(path.last(), Some(&goal));
        for pair in path.windows(2) {
            assert!(pair[0].is_adjacent(pair[1]), "non-adjacent step {pair:?}");
        }
    }

    #[test]
    fn test_pathfinding_straight_line() {
        let grid = open_grid(8, 12);
        let ledger = OccupancyLedger::default();
        let path = find_path(
            Coord(3, 1),
            Coord(3, 10),
            &grid,
            &ledger,
            &SearchParams::default(),
        )
        .unwrap();
        assert_eq!(path.len(), 10);
        assert_well_formed(&path, Coord(3, 1), Coord(3, 10));
    }

    #[test]
    fn test_start_equals_goal() {
        let grid = open_grid(4, 4);
        let ledger = OccupancyLedger::default();
        let path = find_path(
            Coord(2, 2),
            Coord(2, 2),
            &grid,
            &ledger,
            &SearchParams::default(),
        );
        assert_eq!(path, Ok(vec![Coord(2, 2)]));
    }

    #[test]
    fn test_equal_f_ties_follow_discovery_order() {
        let grid = open_grid(8, 8);
        let ledger = OccupancyLedger::default();
        let path = find_path(
            Coord(0, 0),
            Coord(1, 1),
            &grid,
            &ledger,
            &SearchParams::default(),
        )
        .unwrap();
        // Down is discovered before right.
        assert_eq!(path, vec![Coord(0, 0), Coord(1, 0), Coord(1, 1)]);
    }

    #[test]
    fn test_routes_around_wall() {
        let grid = LotGrid::from_rows(&[
            "A.....", //
            "..X...", //
            "..X...", //
            "..X...", //
            "......", //
        ])
        .unwrap();
        let ledger = OccupancyLedger::default();
        let path = find_path(
            Coord(2, 0),
            Coord(2, 5),
            &grid,
            &ledger,
            &SearchParams::default(),
        )
        .unwrap();
        assert_well_formed(&path, Coord(2, 0), Coord(2, 5));
        assert!(!path.contains(&Coord(1, 2)));
        assert!(!path.contains(&Coord(2, 2)));
        assert!(!path.contains(&Coord(3, 2)));
        // Shortest detour goes over row 0 or under row 4: 5 right + 2x2 vertical.
        assert_eq!(path.len(), 10);
    }

    #[test]
    fn test_occupied_spots_are_obstacles() {
        let grid = LotGrid::from_rows(&["A.PP", "XXP.", "....", "...."]).unwrap();
        let mut ledger = OccupancyLedger::default();
        let params = SearchParams::default();

        // (0,2) is free parking, so it can be driven through.
        let through = find_path(Coord(0, 0), Coord(0, 3), &grid, &ledger, &params).unwrap();
        assert_eq!(through.len(), 4);

        ledger.insert(Coord(0, 2), "CAR1").unwrap();
        ledger.insert(Coord(1, 2), "CAR2").unwrap();
        assert_eq!(
            find_path(Coord(0, 0), Coord(0, 3), &grid, &ledger, &params),
            Err(PathError::NotFound)
        );
    }

    #[test]
    fn test_occupied_goal_is_unreachable() {
        let grid = open_grid(4, 4);
        let mut ledger = OccupancyLedger::default();
        ledger.insert(Coord(2, 2), "CAR1").unwrap();
        assert_eq!(
            find_path(
                Coord(0, 0),
                Coord(2, 2),
                &grid,
                &ledger,
                &SearchParams::default()
            ),
            Err(PathError::NotFound)
        );
    }

    #[test]
    fn test_occupied_start_can_leave() {
        let grid = open_grid(4, 4);
        let mut ledger = OccupancyLedger::default();
        ledger.insert(Coord(2, 2), "CAR1").unwrap();
        let path = find_path(
            Coord(2, 2),
            Coord(0, 0),
            &grid,
            &ledger,
            &SearchParams::default(),
        )
        .unwrap();
        assert_eq!(path.len(), 5);
    }

    #[test]
    fn test_gates_are_passable() {
        // The only corridor runs through gate B.
        let grid = LotGrid::from_rows(&["A.B.", "XXXX", "....", "...."]).unwrap();
        let ledger = OccupancyLedger::default();
        let path = find_path(
            Coord(0, 0),
            Coord(0, 3),
            &grid,
            &ledger,
            &SearchParams::default(),
        )
        .unwrap();
        assert!(path.contains(&Coord(0, 2)));
    }

    #[test]
    fn test_ignore_obstacles_mode() {
        let grid = LotGrid::from_rows(&["A...", "XXXX", "....", "...."]).unwrap();
        let ledger = OccupancyLedger::default();
        let respect = SearchParams::default();
        assert_eq!(
            find_path(Coord(2, 0), Coord(0, 0), &grid, &ledger, &respect),
            Err(PathError::NotFound)
        );

        let ignore = SearchParams {
            obstacles: ObstacleMode::Ignore,
            ..SearchParams::default()
        };
        let path = find_path(Coord(2, 0), Coord(0, 0), &grid, &ledger, &ignore).unwrap();
        assert_eq!(path, vec![Coord(2, 0), Coord(1, 0), Coord(0, 0)]);
    }

    #[test]
    fn test_out_of_bounds_endpoints() {
        let grid = open_grid(4, 4);
        let ledger = OccupancyLedger::default();
        let params = SearchParams::default();
        assert_eq!(
            find_path(Coord(4, 0), Coord(0, 0), &grid, &ledger, &params),
            Err(PathError::OutOfBounds(Coord(4, 0)))
        );
        assert_eq!(
            find_path(Coord(0, 0), Coord(0, 9), &grid, &ledger, &params),
            Err(PathError::OutOfBounds(Coord(0, 9)))
        );
    }

    #[test]
    fn test_expansion_cap_is_distinct_from_not_found() {
        let grid = open_grid(20, 20);
        let ledger = OccupancyLedger::default();
        let params = SearchParams {
            max_expansions: 5,
            ..SearchParams::default()
        };
        assert_eq!(
            find_path(Coord(0, 0), Coord(19, 19), &grid, &ledger, &params),
            Err(PathError::Exhausted { expanded: 5 })
        );
    }

    #[test]
    fn test_obstacle_free_paths_have_manhattan_length() {
        let grid = open_grid(16, 24);
        let ledger = OccupancyLedger::default();
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        for heuristic in [Heuristic::Euclidean, Heuristic::Manhattan] {
            let params = SearchParams {
                heuristic,
                ..SearchParams::default()
            };
            for _ in 0..200 {
                let start = Coord(rng.gen_range(0..16), rng.gen_range(0..24));
                let goal = Coord(rng.gen_range(0..16), rng.gen_range(0..24));
                let path = find_path(start, goal, &grid, &ledger, &params).unwrap();
                assert_eq!(path.len(), start.manhattan(goal) + 1);
                assert_well_formed(&path, start, goal);
            }
        }
    }

    #[test]
    fn test_random_obstacles_paths_are_valid_and_shortest() {
        let mut rng = ChaCha8Rng::seed_from_u64(2024);

        for _ in 0..40 {
            let mut grid = open_grid(12, 12);
            for r in 0..12 {
                for c in 0..12 {
                    if Coord(r, c) != Coord(0, 0) && rng.gen_bool(0.25) {
                        grid.set_cell(Coord(r, c), CellKind::Blocked).unwrap();
                    }
                }
            }
            let mut ledger = OccupancyLedger::default();
            for i in 0..6 {
                let spot = Coord(rng.gen_range(0..12), rng.gen_range(0..12));
                let _ = ledger.insert(spot, &format!("CAR{i}"));
            }

            let start = Coord(0, 0);
            let goal = Coord(rng.gen_range(0..12), rng.gen_range(0..12));
            let params = SearchParams::default();
            let found = find_path(start, goal, &grid, &ledger, &params);

            let oracle = bfs(
                &start,
                |&c| {
                    let (n, count) = grid.neighbors4(c);
                    n.into_iter()
                        .take(count)
                        .filter(|&x| grid.is_traversable(x) && !ledger.is_occupied(x))
                        .collect::<Vec<_>>()
                },
                |&c| c == goal,
            );

            match (found, oracle) {
                (Ok(path), Some(expected)) => {
                    assert_eq!(path.len(), expected.len());
                    assert_well_formed(&path, start, goal);
                    for &cell in &path[1..] {
                        assert_ne!(grid.cell_kind(cell), Ok(CellKind::Blocked));
                        assert!(!ledger.is_occupied(cell));
                    }
                }
                (Err(PathError::NotFound), None) => {}
                (found, oracle) => panic!("search {found:?} disagrees with bfs {oracle:?}"),
            }
        }
    }

    #[test]
    fn test_reachable_from_respects_obstacles() {
        let grid = LotGrid::from_rows(&["A.X.", "..X.", "XXX.", "...."]).unwrap();
        let mut ledger = OccupancyLedger::default();
        let reach = reachable_from(Coord(0, 0), &grid, &ledger);
        assert_eq!(reach.len(), 4);
        assert!(!reach.contains(&Coord(0, 3)));

        ledger.insert(Coord(1, 0), "CAR1").unwrap();
        let reach = reachable_from(Coord(0, 0), &grid, &ledger);
        assert_eq!(
            reach.into_iter().collect::<Vec<_>>(),
            vec![Coord(0, 0), Coord(0, 1), Coord(1, 1)]
        );
    }
}
