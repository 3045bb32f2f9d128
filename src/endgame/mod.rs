//! Perfect-play endgame table.
//!
//! - `index`: combinatorial ranking of positions with few stones in play
//! - `db`: memory-mapped, read-only access to a table file
//! - `generate`: building a table by exhaustive search

pub mod db;
pub mod generate;
pub mod index;

pub use db::{EndgameDb, VALUE_BIAS};
pub use generate::{generate, write_database};
pub use index::{index, rank, table_len, threshold_for_len, MAX_TABLE_STONES};
