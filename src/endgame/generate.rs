//! Building the endgame table by exhaustive search.
//!
//! Every position with up to `max_stones` stones in play is solved with a
//! memoised negamax over the table itself. Moves never put stones back into
//! play, and with the number of stones in play fixed every stone only moves
//! towards its own side's store, so the recursion cannot cycle.

use std::path::Path;

use super::db::VALUE_BIAS;
use super::index::{index, table_len, MAX_TABLE_STONES};
use crate::core::{GameState, Player, PITS_PER_SIDE, SLOT_COUNT};
use crate::error::{Error, Result};

/// Pits filled by the enumeration, from player A's point of view.
const PITS: [usize; 12] = [1, 2, 3, 4, 5, 6, 8, 9, 10, 11, 12, 13];

struct Solver {
    values: Vec<Option<i8>>,
}

impl Solver {
    /// Best store differential the mover can force from the stones in play.
    fn solve(&mut self, game: &GameState) -> i32 {
        let mover = game.current_player();
        let own = game.board().side_stones(mover) as i32;
        let theirs = game.board().side_stones(mover.opponent()) as i32;
        if own == 0 || theirs == 0 {
            // Terminal: both sides are swept into their own stores
            return own - theirs;
        }

        let slot = index(game);
        if let Some(value) = self.values[slot] {
            return i32::from(value);
        }

        let before = game.store_difference();
        let mut child = game.clone();
        let mut best = i32::MIN;
        for id in 1..=PITS_PER_SIDE {
            if !game.is_selectable(id) {
                continue;
            }
            child.copy_from(game);
            child.perform_move(id);

            let after = i32::from(child.board().store(mover))
                - i32::from(child.board().store(mover.opponent()));
            let gain = after - before;
            let value = if child.is_terminal() {
                gain
            } else if child.current_player() == mover {
                gain + self.solve(&child)
            } else {
                gain - self.solve(&child)
            };
            best = best.max(value);
        }

        self.values[slot] = Some(best as i8);
        best
    }
}

/// Fill `PITS[pit..]` with every distribution of `remaining` stones.
fn for_each_layout(
    slots: &mut [u8; SLOT_COUNT],
    pit: usize,
    remaining: u8,
    visit: &mut dyn FnMut(&[u8; SLOT_COUNT]),
) {
    let slot = PITS[pit];
    if pit == PITS.len() - 1 {
        slots[slot] = remaining;
        visit(slots);
        slots[slot] = 0;
        return;
    }
    for stones in 0..=remaining {
        slots[slot] = stones;
        for_each_layout(slots, pit + 1, remaining - stones, visit);
    }
    slots[slot] = 0;
}

/// Solve every position with up to `max_stones` stones in play.
///
/// Returns the table as biased bytes, ready to be written to disk or
/// wrapped with [`super::EndgameDb::from_table`].
pub fn generate(max_stones: u32) -> Result<Vec<u8>> {
    if max_stones > MAX_TABLE_STONES || max_stones > 127 {
        return Err(Error::TableTooLarge(max_stones));
    }
    let len = usize::try_from(table_len(max_stones))
        .map_err(|_| Error::TableTooLarge(max_stones))?;

    let mut solver = Solver {
        values: vec![None; len],
    };
    for stones in 1..=max_stones as u8 {
        let mut slots = [0u8; SLOT_COUNT];
        for_each_layout(&mut slots, 0, stones, &mut |layout: &[u8; SLOT_COUNT]| {
            let game = GameState::from_slots(Player::A, *layout);
            if game.board().side_stones(Player::A) > 0 {
                let value = solver.solve(&game);
                solver.values[index(&game)] = Some(value as i8);
            }
        });
        log::debug!("solved endgame positions with {stones} stones");
    }

    Ok(solver
        .values
        .into_iter()
        .map(|value| (i32::from(value.unwrap_or(0)) + VALUE_BIAS) as u8)
        .collect())
}

/// Generate the table for `max_stones` and write it to `path`.
///
/// Returns the number of bytes written.
pub fn write_database(path: impl AsRef<Path>, max_stones: u32) -> Result<u64> {
    let path = path.as_ref();
    let table = generate(max_stones)?;
    std::fs::write(path, &table).map_err(|source| Error::Database {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!(
        "wrote endgame database {} ({} positions, up to {} stones)",
        path.display(),
        table.len(),
        max_stones
    );
    Ok(table.len() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_enumeration_count() {
        let mut count = 0;
        let mut slots = [0u8; SLOT_COUNT];
        for_each_layout(&mut slots, 0, 3, &mut |layout: &[u8; SLOT_COUNT]| {
            assert_eq!(layout.iter().map(|&s| u32::from(s)).sum::<u32>(), 3);
            count += 1;
        });
        // C(3 + 11, 11)
        assert_eq!(count, 364);
    }

    #[test]
    fn test_generate_sizes() {
        assert_eq!(generate(0).unwrap().len(), 0);
        assert_eq!(generate(2).unwrap().len(), 63);
        assert!(generate(MAX_TABLE_STONES + 1).is_err());
    }

    #[test]
    fn test_single_stone_values() {
        let table = generate(2).unwrap();
        let value = |slots: [u8; SLOT_COUNT]| {
            let game = GameState::from_slots(Player::A, slots);
            i32::from(table[index(&game)]) - VALUE_BIAS
        };

        // A's only stone reaches the store, the game ends and B keeps its stone
        assert_eq!(value([0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1]), 0);
        // Moving 6 -> 5 captures the stone opposite
        assert_eq!(value([0, 0, 0, 0, 0, 0, 1, 0, 0, 1, 0, 0, 0, 0]), 2);
        // Mover has stones, opponent none: terminal, own stones are kept
        assert_eq!(value([0, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]), 2);
    }
}
