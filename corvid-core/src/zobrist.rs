//! Zobrist hashing tables and key computation.

use lazy_static::lazy_static;

use crate::masks::{FILE_CNT, PIECE_TYPE_CNT, PLAYER_CNT, SQ_CNT};
use crate::prng::PRNG;

/// A fixed seed keeps Zobrist keys reproducible across runs, which matters
/// for debugging and for the perft/search sanity tests that pin exact node
/// counts and scores.
const ZOBRIST_SEED: u64 = 23_081;

pub struct ZobristTables {
    pub placement: [[[u64; SQ_CNT]; PIECE_TYPE_CNT]; PLAYER_CNT],
    pub ep_file: [u64; FILE_CNT],
    pub castle: [u64; 16],
    pub white_move: u64,
}

fn build_tables() -> ZobristTables {
    let mut rng = PRNG::init(ZOBRIST_SEED);
    let mut placement = [[[0u64; SQ_CNT]; PIECE_TYPE_CNT]; PLAYER_CNT];
    for player in placement.iter_mut() {
        for piece in player.iter_mut() {
            for sq in piece.iter_mut() {
                *sq = rng.rand();
            }
        }
    }
    let mut ep_file = [0u64; FILE_CNT];
    for f in ep_file.iter_mut() {
        *f = rng.rand();
    }
    let mut castle = [0u64; 16];
    for c in castle.iter_mut() {
        *c = rng.rand();
    }
    ZobristTables {
        placement,
        ep_file,
        castle,
        white_move: rng.rand(),
    }
}

lazy_static! {
    pub static ref ZOBRIST: ZobristTables = build_tables();
}

/// Mate scores at or beyond this magnitude are hashed relative to the
/// searching ply so that a stored mate score can be reused at a different
/// ply without becoming wrong by the difference in path length.
pub const LONG_MATE: i32 = 0x7f00;
pub const INFINITE: i32 = 0x7fff;

/// Adjusts a mate score for storage, making it independent of the ply at
/// which it was found.
#[inline]
pub fn hash_score(score: i32, ply: i32) -> i32 {
    if score >= LONG_MATE {
        score + ply
    } else if score <= -LONG_MATE {
        score - ply
    } else {
        score
    }
}

/// Inverse of [`hash_score`]: re-derives the mate distance relative to the
/// current ply after reading a stored score.
#[inline]
pub fn unhash_score(score: i32, ply: i32) -> i32 {
    if score >= LONG_MATE {
        score - ply
    } else if score <= -LONG_MATE {
        score + ply
    } else {
        score
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mate_score_hash_roundtrip() {
        for ply in 0..40 {
            for score in &[LONG_MATE, LONG_MATE + 5, INFINITE, -LONG_MATE, -LONG_MATE - 5, -INFINITE] {
                let s = *score;
                assert_eq!(unhash_score(hash_score(s, ply), ply), s);
            }
        }
    }

    #[test]
    fn ordinary_scores_are_untouched() {
        for ply in 0..10 {
            assert_eq!(hash_score(150, ply), 150);
            assert_eq!(unhash_score(-73, ply), -73);
        }
    }
}
