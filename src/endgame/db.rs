//! Read-only endgame table.
//!
//! The table is a flat file of biased bytes, one per position index (see
//! [`super::index`]). Each byte is the best final store differential the
//! player to move can force from the stones still in the pits, plus 128.
//! The number of stones covered follows from the file length.

use std::fs::File;
use std::path::Path;

use memmap2::Mmap;

use super::index::{index, threshold_for_len};
use crate::core::GameState;
use crate::error::{Error, Result};

/// Bias added to every stored differential.
pub const VALUE_BIAS: i32 = 128;

#[derive(Debug)]
enum Storage {
    Mapped(Mmap),
    Owned(Vec<u8>),
}

impl Storage {
    fn bytes(&self) -> &[u8] {
        match self {
            Storage::Mapped(map) => &map[..],
            Storage::Owned(bytes) => bytes.as_slice(),
        }
    }
}

/// Perfect-play lookup for positions with few stones left in play.
#[derive(Debug)]
pub struct EndgameDb {
    storage: Storage,
    threshold: u32,
}

impl EndgameDb {
    /// Memory-map the table at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let wrap = |source| Error::Database {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(wrap)?;
        let len = file.metadata().map_err(wrap)?.len();
        if len == 0 {
            return Err(Error::InvalidParameter(format!(
                "endgame database {} is empty",
                path.display()
            )));
        }
        // SAFETY: the table is opened read-only and never modified while mapped.
        let map = unsafe { Mmap::map(&file) }.map_err(wrap)?;
        let threshold = threshold_for_len(len);
        log::debug!(
            "mapped endgame database {} ({} bytes, up to {} stones)",
            path.display(),
            len,
            threshold
        );
        Ok(Self {
            storage: Storage::Mapped(map),
            threshold,
        })
    }

    /// Open the table at `path`, or log why it is unavailable.
    ///
    /// A missing or unreadable table only disables endgame lookups.
    #[must_use]
    pub fn open_optional(path: impl AsRef<Path>) -> Option<Self> {
        match Self::open(&path) {
            Ok(db) => Some(db),
            Err(err) => {
                log::warn!("endgame database disabled: {err}");
                None
            }
        }
    }

    /// Wrap an in-memory table, as produced by [`super::generate`].
    #[must_use]
    pub fn from_table(table: Vec<u8>) -> Self {
        let threshold = threshold_for_len(table.len() as u64);
        Self {
            storage: Storage::Owned(table),
            threshold,
        }
    }

    /// Largest number of stones in play the table covers.
    #[must_use]
    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Check whether the table holds a value for `game`.
    ///
    /// Only running positions are stored: both sides must still hold stones.
    #[must_use]
    pub fn has_value_stored(&self, game: &GameState) -> bool {
        let board = game.board();
        let mover = game.current_player();
        board.side_stones(mover) > 0
            && board.side_stones(mover.opponent()) > 0
            && board.pit_stones() <= self.threshold
    }

    /// Table index of `game`; `game` must satisfy [`has_value_stored`].
    ///
    /// [`has_value_stored`]: EndgameDb::has_value_stored
    #[must_use]
    pub fn index(&self, game: &GameState) -> usize {
        index(game)
    }

    /// Best store differential the mover can still force from the pits.
    ///
    /// `game` must satisfy [`has_value_stored`].
    ///
    /// [`has_value_stored`]: EndgameDb::has_value_stored
    #[must_use]
    pub fn load_value(&self, game: &GameState) -> i32 {
        i32::from(self.storage.bytes()[index(game)]) - VALUE_BIAS
    }

    /// Final store differential (mover minus opponent) under perfect play.
    #[must_use]
    pub fn final_difference(&self, game: &GameState) -> i32 {
        game.store_difference() + self.load_value(game)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Player;
    use crate::endgame::index::table_len;

    #[test]
    fn test_from_table_threshold() {
        let db = EndgameDb::from_table(vec![128; table_len(3) as usize]);
        assert_eq!(db.threshold(), 3);

        let game = GameState::from_slots(Player::A, [0, 1, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 1]);
        assert!(db.has_value_stored(&game));
        assert_eq!(db.load_value(&game), 0);

        let game = GameState::from_slots(Player::A, [0, 2, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 1]);
        assert!(!db.has_value_stored(&game));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.db");
        assert!(matches!(EndgameDb::open(&path), Err(Error::Database { .. })));
        assert!(EndgameDb::open_optional(&path).is_none());
    }

    #[test]
    fn test_empty_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(EndgameDb::open(file.path()).is_err());
    }
}
