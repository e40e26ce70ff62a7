//! Session state for one UCI `position` command: a starting position plus
//! the moves played from it, replayed incrementally so the current
//! [`Position`] and its Zobrist history are always available to the search.

use corvid_core::position::fen::import_fen;
use corvid_core::{MoveType, PieceType, Position};

use crate::error::UciError;

/// A game in progress: the position reached after replaying `moves` from
/// `start`, plus the Zobrist key of every position visited since the last
/// irreversible move (capture, pawn move, or castle), which is exactly the
/// window the search needs for repetition detection.
pub struct Game {
    current: Position,
    /// Zobrist keys since the last irreversible move, oldest first,
    /// including the current position's key.
    history: Vec<u64>,
}

impl Game {
    pub fn new() -> Game {
        let start = Position::start_pos();
        Game {
            history: vec![start.zkey],
            current: start,
        }
    }

    pub fn from_fen(fen: &str) -> Result<Game, UciError> {
        let pos = import_fen(fen)?;
        Ok(Game::from_position(pos))
    }

    /// Builds a game starting from an already-constructed position (e.g.
    /// the result of replaying `position ... moves ...`), with a fresh
    /// repetition history seeded at just that position.
    pub fn from_position(pos: Position) -> Game {
        Game {
            history: vec![pos.zkey],
            current: pos,
        }
    }

    pub fn position(&self) -> &Position {
        &self.current
    }

    /// Zobrist history available for the search's repetition check,
    /// oldest first, not including the not-yet-played current position
    /// twice over (the search pushes its own recursion path on top of
    /// this).
    pub fn history(&self) -> &[u64] {
        &self.history
    }

    /// Applies a move given in UCI coordinate notation (`e2e4`, `e7e8q`,
    /// `e1g1` for a king-side castle). Fails if the text doesn't parse as a
    /// square pair (with optional promotion letter) or doesn't name a
    /// pseudo-legal move that leaves the mover's own king safe.
    pub fn apply_uci_move(&mut self, text: &str) -> Result<(), UciError> {
        let mv = crate::uci::parse::find_matching_move(&self.current, text)
            .ok_or_else(|| UciError::BadPosition(format!("not a legal move: {}", text)))?;

        let irreversible = mv.is_capture()
            || mv.piece == PieceType::Pawn
            || mv.move_type == MoveType::Castle;

        let mut next = self.current;
        next.make_move(&mv);
        if next.is_invalid() {
            return Err(UciError::BadPosition(format!(
                "move leaves own king in check: {}",
                text
            )));
        }

        if irreversible {
            self.history.clear();
        }
        self.history.push(next.zkey);
        self.current = next;
        Ok(())
    }
}

impl Default for Game {
    fn default() -> Game {
        Game::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_game_starts_at_startpos() {
        let g = Game::new();
        assert_eq!(g.position().zkey, Position::start_pos().zkey);
        assert_eq!(g.history().len(), 1);
    }

    #[test]
    fn applying_moves_advances_the_position() {
        let mut g = Game::new();
        g.apply_uci_move("e2e4").unwrap();
        assert_ne!(g.position().zkey, Position::start_pos().zkey);
        assert_eq!(g.history().len(), 1); // pawn move is irreversible, history resets
    }

    #[test]
    fn rejects_illegal_move_text() {
        let mut g = Game::new();
        assert!(g.apply_uci_move("e2e5").is_err());
    }

    #[test]
    fn quiet_moves_grow_history() {
        let mut g = Game::from_fen("8/8/8/4k3/8/8/4K3/8 w - - 0 1").unwrap();
        g.apply_uci_move("e2d2").unwrap();
        assert_eq!(g.history().len(), 2);
    }
}
