//! FEN (Forsyth-Edwards Notation) import and export.

use crate::error::FenError;
use crate::piece::{PieceType, Player};
use crate::position::{Position, PositionFlags};
use crate::square::{parse_square, File, Rank, SQ};

/// Parses a complete FEN string into a [`Position`]. The half-move clock and
/// full-move number fields are optional and default to `0` and `1`.
pub fn import_fen(fen: &str) -> Result<Position, FenError> {
    let mut fields = fen.split_whitespace();
    let placement = fields.next().ok_or(FenError::MissingField("piece placement"))?;
    let active_color = fields.next().ok_or(FenError::MissingField("active color"))?;
    let castling = fields.next().ok_or(FenError::MissingField("castling availability"))?;
    let ep = fields.next().ok_or(FenError::MissingField("en passant target"))?;
    let half_move = fields.next().unwrap_or("0");
    let full_move = fields.next().unwrap_or("1");

    let mut pos = Position::blank();
    parse_board(placement, &mut pos)?;

    let white_to_move = match active_color {
        "w" => true,
        "b" => false,
        _ => return Err(FenError::BadActiveColor(active_color.to_string())),
    };
    if white_to_move {
        pos.flags.set_flag(PositionFlags::WHITE_MOVE);
    } else {
        pos.flags.clear_flag(PositionFlags::WHITE_MOVE);
    }

    if castling != "-" {
        for c in castling.chars() {
            let flag = match c {
                'K' => PositionFlags::WHITE_KS_CASTLE,
                'Q' => PositionFlags::WHITE_QS_CASTLE,
                'k' => PositionFlags::BLACK_KS_CASTLE,
                'q' => PositionFlags::BLACK_QS_CASTLE,
                _ => return Err(FenError::BadCastling(castling.to_string())),
            };
            pos.flags.set_flag(flag);
        }
    }

    if ep != "-" {
        let sq = parse_square(ep).ok_or_else(|| FenError::BadEpSquare(ep.to_string()))?;
        pos.ep_square = sq;
        pos.flags.set_flag(PositionFlags::EP_LEGAL);
    }

    pos.draw_plies = half_move
        .parse()
        .map_err(|_| FenError::BadHalfMoveClock(half_move.to_string()))?;
    pos.move_num = full_move
        .parse()
        .map_err(|_| FenError::BadFullMoveNumber(full_move.to_string()))?;

    pos.zkey = pos.compute_zobrist();

    pos.is_legal().map_err(FenError::Illegal)?;

    let stm = pos.side_to_move();
    if pos.attacked_by(pos.king_sq(stm), !stm) {
        pos.flags.set_flag(PositionFlags::CHECK);
    }

    Ok(pos)
}

fn parse_board(placement: &str, pos: &mut Position) -> Result<(), FenError> {
    let ranks: Vec<&str> = placement.split('/').collect();
    if ranks.len() != 8 {
        return Err(FenError::BadPlacement(placement.to_string()));
    }
    // FEN lists ranks starting at rank 8 down to rank 1.
    for (i, rank_str) in ranks.iter().enumerate() {
        let rank = Rank((7 - i) as u8);
        let mut file = 0u8;
        for c in rank_str.chars() {
            if file >= 8 {
                return Err(FenError::BadPlacement(placement.to_string()));
            }
            if let Some(skip) = c.to_digit(10) {
                file += skip as u8;
                continue;
            }
            let (player, pt) = PieceType::from_char(c).ok_or_else(|| FenError::BadPlacement(placement.to_string()))?;
            let sq = SQ::new(File(file), rank);
            pos.occ_by[player.idx()][pt.idx()] |= sq.bb();
            pos.occ_by[player.idx()][PieceType::None.idx()] |= sq.bb();
            pos.occ |= sq.bb();
            file += 1;
        }
        if file != 8 {
            return Err(FenError::BadPlacement(placement.to_string()));
        }
    }
    Ok(())
}

/// Serializes a [`Position`] back into a six-field FEN string.
pub fn export_fen(pos: &Position) -> String {
    let mut s = String::new();
    for i in 0..8u8 {
        let rank = Rank(7 - i);
        let mut empty = 0u8;
        for file in 0..8u8 {
            let sq = SQ::new(File(file), rank);
            match pos.colored_piece_at(sq) {
                Some((player, pt)) => {
                    if empty > 0 {
                        s.push((b'0' + empty) as char);
                        empty = 0;
                    }
                    s.push(pt.char(player));
                }
                None => empty += 1,
            }
        }
        if empty > 0 {
            s.push((b'0' + empty) as char);
        }
        if i != 7 {
            s.push('/');
        }
    }
    s.push(' ');
    s.push(if pos.side_to_move() == Player::White { 'w' } else { 'b' });
    s.push(' ');

    let mut castling = String::new();
    if pos.flags.contains(PositionFlags::WHITE_KS_CASTLE) {
        castling.push('K');
    }
    if pos.flags.contains(PositionFlags::WHITE_QS_CASTLE) {
        castling.push('Q');
    }
    if pos.flags.contains(PositionFlags::BLACK_KS_CASTLE) {
        castling.push('k');
    }
    if pos.flags.contains(PositionFlags::BLACK_QS_CASTLE) {
        castling.push('q');
    }
    s.push_str(if castling.is_empty() { "-" } else { &castling });
    s.push(' ');

    if pos.flags.contains(PositionFlags::EP_LEGAL) && pos.ep_square.is_okay() {
        s.push_str(&pos.ep_square.to_string());
    } else {
        s.push('-');
    }
    s.push(' ');
    s.push_str(&pos.draw_plies.to_string());
    s.push(' ');
    s.push_str(&pos.move_num.to_string());
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startpos_roundtrip() {
        let fen = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
        let pos = import_fen(fen).unwrap();
        assert_eq!(export_fen(&pos), fen);
    }

    #[test]
    fn kiwipete_roundtrip() {
        let fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
        let pos = import_fen(fen).unwrap();
        assert_eq!(export_fen(&pos), fen);
    }

    #[test]
    fn en_passant_square_parses() {
        let fen = "rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3";
        let pos = import_fen(fen).unwrap();
        assert!(pos.flags.contains(PositionFlags::EP_LEGAL));
        assert_eq!(pos.ep_square, SQ::D6);
    }

    #[test]
    fn rejects_two_kings() {
        let fen = "rnbqkbnr/pppppppp/8/8/4K3/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
        assert!(import_fen(fen).is_err());
    }
}
