//! Incremental position update.

use crate::masks::*;
use crate::piece::{PieceType, Player};
use crate::piece_move::{MoveType, PieceMove};
use crate::position::{Position, PositionFlags};
use crate::square::SQ;
use crate::zobrist::ZOBRIST;

impl Position {
    /// Applies `mv` to `self` in place. `mv` must be pseudo-legal (as
    /// produced by [`super::movegen`] or [`super::movegen::expand_hash_move`]);
    /// passing an arbitrary move is undefined in spirit (though memory-safe
    /// in this port, unlike the original C, since every access here stays
    /// in-bounds).
    ///
    /// Only the "does this leave the mover's own king in check" legality
    /// test is performed. On failure, `self` is left with
    /// [`PositionFlags::INVALID`] set; the caller is expected to discard
    /// the position rather than keep searching from it.
    pub fn make_move(&mut self, mv: &PieceMove) {
        let mover = self.side_to_move();
        let opponent = !mover;

        // 1. flip side to move
        self.flags.toggle_flag(PositionFlags::WHITE_MOVE);
        self.zkey ^= ZOBRIST.white_move;

        // 2. move counters
        if mover == Player::Black {
            self.move_num += 1;
        }
        if mv.piece == PieceType::Pawn || mv.is_capture() {
            self.draw_plies = 0;
        } else {
            self.draw_plies += 1;
        }

        // 3. remove captured piece, if any
        if mv.is_capture() {
            let captured_sq = if mv.piece == PieceType::Pawn && mv.dest == self.ep_square && self.flags.contains(PositionFlags::EP_LEGAL) {
                // en passant: captured pawn sits behind the destination
                if mover == Player::White {
                    SQ(mv.dest.0 - 1)
                } else {
                    SQ(mv.dest.0 + 1)
                }
            } else {
                mv.dest
            };
            self.occ_by[opponent.idx()][mv.captured.idx()] &= !captured_sq.bb();
            self.occ_by[opponent.idx()][PieceType::None.idx()] &= !captured_sq.bb();
            self.occ &= !captured_sq.bb();
            self.zkey ^= ZOBRIST.placement[opponent.idx()][mv.captured.idx()][captured_sq.0 as usize];

            if mv.captured == PieceType::Rook {
                self.clear_castle_right_for_rook_loss(opponent, captured_sq);
            }
        }

        // 4. toggle moved piece from orig to dest
        self.toggle_piece(mover, mv.piece, mv.orig);
        self.toggle_piece(mover, mv.piece, mv.dest);

        // 5. castling: relocate the rook
        if mv.move_type == MoveType::Castle {
            let (rook_from, rook_to) = castle_rook_squares(mv.dest);
            self.toggle_piece(mover, PieceType::Rook, rook_from);
            self.toggle_piece(mover, PieceType::Rook, rook_to);
        }

        // 6. promotion
        if mv.is_promotion() {
            self.toggle_piece(mover, mv.piece, mv.dest);
            self.toggle_piece(mover, mv.promotion, mv.dest);
        }

        // 7. en passant square bookkeeping
        if self.flags.contains(PositionFlags::EP_LEGAL) {
            self.zkey ^= ZOBRIST.ep_file[self.ep_square.file().0 as usize];
            self.flags.clear_flag(PositionFlags::EP_LEGAL);
        }
        self.ep_square = SQ::NONE;
        if mv.move_type == MoveType::Advance2 {
            let ep_sq = SQ((mv.orig.0 + mv.dest.0) / 2);
            self.ep_square = ep_sq;
            self.flags.set_flag(PositionFlags::EP_LEGAL);
            self.zkey ^= ZOBRIST.ep_file[ep_sq.file().0 as usize];
        }

        // 8. castling rights lost by moving the king or a rook
        self.update_castle_rights_for_move(mover, mv);

        // 9. check flag for the side now to move (the opponent)
        let opp_king = self.king_sq(opponent);
        if self.attacked_by(opp_king, mover) {
            self.flags.set_flag(PositionFlags::CHECK);
        } else {
            self.flags.clear_flag(PositionFlags::CHECK);
        }

        // 10. legality: did the mover leave their own king in check?
        let own_king = self.king_sq(mover);
        if self.attacked_by(own_king, opponent) {
            self.flags.set_flag(PositionFlags::INVALID);
        }

        debug_assert_eq!(
            self.zkey,
            self.compute_zobrist(),
            "zobrist key diverged from scratch recomputation after make_move"
        );
    }

    #[inline]
    fn toggle_piece(&mut self, player: Player, pt: PieceType, sq: SQ) {
        self.occ_by[player.idx()][pt.idx()] ^= sq.bb();
        self.occ_by[player.idx()][PieceType::None.idx()] ^= sq.bb();
        self.occ ^= sq.bb();
        self.zkey ^= ZOBRIST.placement[player.idx()][pt.idx()][sq.0 as usize];
    }

    fn clear_castle_right_for_rook_loss(&mut self, owner: Player, sq: SQ) {
        let flag = match (owner, sq.0) {
            (Player::White, x) if x == ROOK_WHITE_KSIDE_START => PositionFlags::WHITE_KS_CASTLE,
            (Player::White, x) if x == ROOK_WHITE_QSIDE_START => PositionFlags::WHITE_QS_CASTLE,
            (Player::Black, x) if x == ROOK_BLACK_KSIDE_START => PositionFlags::BLACK_KS_CASTLE,
            (Player::Black, x) if x == ROOK_BLACK_QSIDE_START => PositionFlags::BLACK_QS_CASTLE,
            _ => return,
        };
        self.clear_right(flag);
    }

    fn update_castle_rights_for_move(&mut self, mover: Player, mv: &PieceMove) {
        if mv.piece == PieceType::King {
            match mover {
                Player::White => {
                    self.clear_right(PositionFlags::WHITE_KS_CASTLE);
                    self.clear_right(PositionFlags::WHITE_QS_CASTLE);
                }
                Player::Black => {
                    self.clear_right(PositionFlags::BLACK_KS_CASTLE);
                    self.clear_right(PositionFlags::BLACK_QS_CASTLE);
                }
            }
        } else if mv.piece == PieceType::Rook {
            let flag = match (mover, mv.orig.0) {
                (Player::White, x) if x == ROOK_WHITE_KSIDE_START => Some(PositionFlags::WHITE_KS_CASTLE),
                (Player::White, x) if x == ROOK_WHITE_QSIDE_START => Some(PositionFlags::WHITE_QS_CASTLE),
                (Player::Black, x) if x == ROOK_BLACK_KSIDE_START => Some(PositionFlags::BLACK_KS_CASTLE),
                (Player::Black, x) if x == ROOK_BLACK_QSIDE_START => Some(PositionFlags::BLACK_QS_CASTLE),
                _ => None,
            };
            if let Some(flag) = flag {
                self.clear_right(flag);
            }
        }
    }

    #[inline]
    fn clear_right(&mut self, flag: PositionFlags) {
        if self.flags.contains(flag) {
            self.zkey ^= ZOBRIST.castle[self.flags.castle_nibble()];
            self.flags.clear_flag(flag);
            self.zkey ^= ZOBRIST.castle[self.flags.castle_nibble()];
        }
    }
}

/// Given the king's castling destination, returns the rook's (origin,
/// destination) squares. The rook's post-castle square is always one file
/// toward the center from the king's destination.
fn castle_rook_squares(king_dest: SQ) -> (SQ, SQ) {
    match king_dest {
        SQ::G1 => (SQ::H1, SQ::F1),
        SQ::C1 => (SQ::A1, SQ::D1),
        SQ::G8 => (SQ::H8, SQ::F8),
        SQ::C8 => (SQ::A8, SQ::D8),
        _ => unreachable!("castle move must land the king on g1/c1/g8/c8"),
    }
}
