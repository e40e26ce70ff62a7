//! The [`Position`] type: complete, self-contained chess game state.

pub mod fen;
pub mod make_move;
pub mod movegen;

use bitflags::bitflags;

use crate::attacks;
use crate::masks::*;
use crate::piece::{PieceType, Player, PIECE_TYPES};
use crate::square::SQ;
use crate::zobrist::ZOBRIST;

bitflags! {
    /// Position flags: whose turn it is, whether en passant is currently
    /// legal, check status, and the four castling rights. Aligned so that
    /// the low nibble (the four castling bits) indexes
    /// [`crate::zobrist::ZobristTables::castle`] directly.
    pub struct PositionFlags: u16 {
        const WHITE_MOVE = 0x0001;
        const EP_LEGAL   = 0x0002;
        const CHECK      = 0x0008;

        const WHITE_KS_CASTLE = (C_WHITE_K_MASK as u16) << 8;
        const WHITE_QS_CASTLE = (C_WHITE_Q_MASK as u16) << 8;
        const BLACK_KS_CASTLE = (C_BLACK_K_MASK as u16) << 8;
        const BLACK_QS_CASTLE = (C_BLACK_Q_MASK as u16) << 8;

        const WHITE_CASTLE = Self::WHITE_KS_CASTLE.bits | Self::WHITE_QS_CASTLE.bits;
        const BLACK_CASTLE = Self::BLACK_KS_CASTLE.bits | Self::BLACK_QS_CASTLE.bits;
        const CASTLE_FLAGS = Self::WHITE_CASTLE.bits | Self::BLACK_CASTLE.bits;

        const INVALID = 0x8000;
    }
}

impl PositionFlags {
    /// The 4-bit castling nibble used to index the Zobrist castling table.
    #[inline]
    pub fn castle_nibble(self) -> usize {
        ((self.bits & Self::CASTLE_FLAGS.bits) >> 8) as usize
    }

    #[inline]
    pub fn set_flag(&mut self, flag: PositionFlags) {
        self.bits |= flag.bits;
    }

    #[inline]
    pub fn clear_flag(&mut self, flag: PositionFlags) {
        self.bits &= !flag.bits;
    }

    #[inline]
    pub fn toggle_flag(&mut self, flag: PositionFlags) {
        self.bits ^= flag.bits;
    }
}

/// The complete state of a chess game between moves.
///
/// `occ_by[player][PieceType::None.idx()]` holds the aggregate occupancy
/// for that player; `occ_by[player][pt.idx()]` for `pt != None` holds that
/// player's squares occupied by piece type `pt`. This mirrors the original
/// `OccBy[color][NUM_PIECES + 1]` layout, which used index zero the same
/// way.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Position {
    pub zkey: u64,
    pub occ: u64,
    pub occ_by: [[u64; 7]; 2],
    pub ep_square: SQ,
    pub flags: PositionFlags,
    pub draw_plies: u16,
    pub move_num: u16,
}

impl Position {
    /// An empty, flagless position. Not a legal chess position by itself;
    /// used as a starting point for FEN import.
    pub fn blank() -> Position {
        Position {
            zkey: 0,
            occ: 0,
            occ_by: [[0; 7]; 2],
            ep_square: SQ::NONE,
            flags: PositionFlags::WHITE_MOVE,
            draw_plies: 0,
            move_num: 1,
        }
    }

    pub fn start_pos() -> Position {
        fen::import_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1")
            .expect("startpos FEN is well-formed")
    }

    #[inline]
    pub fn side_to_move(&self) -> Player {
        if self.flags.contains(PositionFlags::WHITE_MOVE) {
            Player::White
        } else {
            Player::Black
        }
    }

    #[inline]
    pub fn in_check(&self) -> bool {
        self.flags.contains(PositionFlags::CHECK)
    }

    #[inline]
    pub fn is_invalid(&self) -> bool {
        self.flags.contains(PositionFlags::INVALID)
    }

    #[inline]
    pub fn piece_bb(&self, player: Player, pt: PieceType) -> u64 {
        self.occ_by[player.idx()][pt.idx()]
    }

    #[inline]
    pub fn player_bb(&self, player: Player) -> u64 {
        self.occ_by[player.idx()][PieceType::None.idx()]
    }

    /// Returns the piece type occupying `sq` for `player`, or `None` if
    /// that player has no piece there.
    pub fn piece_at(&self, player: Player, sq: SQ) -> PieceType {
        for &pt in PIECE_TYPES.iter() {
            if self.occ_by[player.idx()][pt.idx()] & sq.bb() != 0 {
                return pt;
            }
        }
        PieceType::None
    }

    /// Returns the piece type and color at `sq`, or `None` if empty.
    pub fn colored_piece_at(&self, sq: SQ) -> Option<(Player, PieceType)> {
        for &player in &[Player::White, Player::Black] {
            let pt = self.piece_at(player, sq);
            if pt != PieceType::None {
                return Some((player, pt));
            }
        }
        None
    }

    pub fn king_sq(&self, player: Player) -> SQ {
        SQ(self.piece_bb(player, PieceType::King).trailing_zeros() as u8)
    }

    /// Whether `sq` is attacked by any piece belonging to `attacker`.
    pub fn attacked_by(&self, sq: SQ, attacker: Player) -> bool {
        let rook_like = self.piece_bb(attacker, PieceType::Rook) | self.piece_bb(attacker, PieceType::Queen);
        if (attacks::rook_att(self.occ, sq) & rook_like) != 0 {
            return true;
        }
        let bishop_like = self.piece_bb(attacker, PieceType::Bishop) | self.piece_bb(attacker, PieceType::Queen);
        if (attacks::bishop_att(self.occ, sq) & bishop_like) != 0 {
            return true;
        }
        if (attacks::knight_att(sq) & self.piece_bb(attacker, PieceType::Knight)) != 0 {
            return true;
        }
        if (attacks::king_att(sq) & self.piece_bb(attacker, PieceType::King)) != 0 {
            return true;
        }
        let white_attacker = attacker == Player::White;
        // A pawn of `attacker` attacks `sq` from the squares `sq` would
        // itself attack as a pawn moving the opposite direction.
        let from_squares = attacks::pawn_att(sq, !white_attacker);
        (from_squares & self.piece_bb(attacker, PieceType::Pawn)) != 0
    }

    /// Recomputes the Zobrist key from scratch. Used by `debug_assert!`s
    /// after incremental updates in [`make_move::make_move`], and by FEN
    /// import.
    pub fn compute_zobrist(&self) -> u64 {
        let mut key = 0u64;
        for &player in &[Player::White, Player::Black] {
            for &pt in PIECE_TYPES.iter() {
                let mut bb = self.piece_bb(player, pt);
                while bb != 0 {
                    let sq = bb.trailing_zeros() as usize;
                    key ^= ZOBRIST.placement[player.idx()][pt.idx()][sq];
                    bb &= bb - 1;
                }
            }
        }
        if self.flags.contains(PositionFlags::EP_LEGAL) && self.ep_square.is_okay() {
            key ^= ZOBRIST.ep_file[self.ep_square.file().0 as usize];
        }
        key ^= ZOBRIST.castle[self.flags.castle_nibble()];
        if self.flags.contains(PositionFlags::WHITE_MOVE) {
            key ^= ZOBRIST.white_move;
        }
        key
    }

    /// Checks the invariants named in the data model: exactly one king per
    /// side, no pawns on the back ranks, a sane en-passant square, and
    /// castling rights that still match king/rook placement. Does not
    /// touch `flags`; callers set `PositionFlags::INVALID` themselves.
    pub fn is_legal(&self) -> Result<(), &'static str> {
        for &player in &[Player::White, Player::Black] {
            if self.piece_bb(player, PieceType::King).count_ones() != 1 {
                return Err("each side must have exactly one king");
            }
        }
        let pawns = self.piece_bb(Player::White, PieceType::Pawn) | self.piece_bb(Player::Black, PieceType::Pawn);
        if pawns & (RANK_1 | RANK_8) != 0 {
            return Err("pawns cannot stand on the first or last rank");
        }
        if self.flags.contains(PositionFlags::EP_LEGAL) {
            let ep = self.ep_square;
            if !ep.is_okay() {
                return Err("en passant flag set without an en passant square");
            }
            let white_to_move = self.flags.contains(PositionFlags::WHITE_MOVE);
            let (expected_rank, pawn_owner) = if white_to_move {
                (5, Player::Black) // rank 6
            } else {
                (2, Player::White) // rank 3
            };
            if ep.rank().0 != expected_rank {
                return Err("en passant square is on the wrong rank");
            }
            let pawn_sq = if white_to_move {
                SQ(ep.0 - 1)
            } else {
                SQ(ep.0 + 1)
            };
            if self.piece_bb(pawn_owner, PieceType::Pawn) & pawn_sq.bb() == 0 {
                return Err("no pawn in front of the en passant square");
            }
        }
        self.check_castle_right(Player::White, true, WHITE_KING_START, ROOK_WHITE_KSIDE_START, PositionFlags::WHITE_KS_CASTLE)?;
        self.check_castle_right(Player::White, false, WHITE_KING_START, ROOK_WHITE_QSIDE_START, PositionFlags::WHITE_QS_CASTLE)?;
        self.check_castle_right(Player::Black, true, BLACK_KING_START, ROOK_BLACK_KSIDE_START, PositionFlags::BLACK_KS_CASTLE)?;
        self.check_castle_right(Player::Black, false, BLACK_KING_START, ROOK_BLACK_QSIDE_START, PositionFlags::BLACK_QS_CASTLE)?;

        let not_to_move = !self.side_to_move();
        if self.attacked_by(self.king_sq(not_to_move), self.side_to_move()) {
            return Err("the side not to move is in check");
        }
        Ok(())
    }

    fn check_castle_right(
        &self,
        player: Player,
        _kingside: bool,
        king_home: u8,
        rook_home: u8,
        flag: PositionFlags,
    ) -> Result<(), &'static str> {
        if !self.flags.contains(flag) {
            return Ok(());
        }
        if self.piece_bb(player, PieceType::King) & SQ(king_home).bb() == 0 {
            return Err("castling right set without king on its home square");
        }
        if self.piece_bb(player, PieceType::Rook) & SQ(rook_home).bb() == 0 {
            return Err("castling right set without rook on its home square");
        }
        Ok(())
    }
}
