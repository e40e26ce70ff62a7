//! An owned, growable list of moves returned by the move generator.
//!
//! The original move generator pushed onto a single process-wide arena and
//! handed callers a "stack top" index to snapshot and restore. This port
//! keeps the single-buffer-per-generation-call discipline internally but
//! exposes an owned [`MoveList`] / slice view at the public boundary instead
//! of raw stack indices, so callers can't corrupt the arena by mismatching
//! push/pop calls.

use std::ops::{Deref, DerefMut};
use std::slice::Iter;

use crate::piece_move::PieceMove;

/// A small inline-capacity-free list of moves. A typical legal position has
/// well under 48 pseudo-legal moves, so a plain `Vec` with that much
/// reserved capacity avoids reallocation in the overwhelming majority of
/// calls.
#[derive(Clone, Debug, Default)]
pub struct MoveList(Vec<PieceMove>);

impl MoveList {
    #[inline]
    pub fn new() -> MoveList {
        MoveList(Vec::with_capacity(48))
    }

    #[inline]
    pub fn push(&mut self, m: PieceMove) {
        self.0.push(m);
    }

    #[inline]
    pub fn iter(&self) -> Iter<PieceMove> {
        self.0.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Moves `m` to the front of the list, shifting the rest back. Used by
    /// the root search to try the previous iteration's best move first.
    pub fn move_to_front(&mut self, m: PieceMove) {
        if let Some(idx) = self.0.iter().position(|x| *x == m) {
            let mv = self.0.remove(idx);
            self.0.insert(0, mv);
        }
    }
}

impl Deref for MoveList {
    type Target = [PieceMove];
    fn deref(&self) -> &[PieceMove] {
        &self.0
    }
}

impl DerefMut for MoveList {
    fn deref_mut(&mut self) -> &mut [PieceMove] {
        &mut self.0
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a PieceMove;
    type IntoIter = Iter<'a, PieceMove>;
    fn into_iter(self) -> Iter<'a, PieceMove> {
        self.0.iter()
    }
}
