/// Smallest row or column count a lot may have.
pub const MIN_GRID_SIZE: usize = 4;
pub const DEFAULT_ROWS: usize = 8;
pub const DEFAULT_COLS: usize = 8;
/// Upper bound on rows x cols for a configured lot.
pub const MAX_GRID_CELLS: usize = 1_000_000;
/// Gate identifiers are the letters `A`..=`Z`.
pub const MAX_GATES: usize = 26;
/// A* node-expansion cap. Every cell is expanded at most once under a
/// consistent heuristic, so this only trips on lots larger than ~500x500.
pub const DEFAULT_MAX_EXPANSIONS: usize = 250_000;
pub const DEFAULT_EVENT_LOG: &str = "car_data_astar.txt";
/// Recent events kept in memory by `EventJournal`.
pub const DEFAULT_JOURNAL_CAPACITY: usize = 200;
