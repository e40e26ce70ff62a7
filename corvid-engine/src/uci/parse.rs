//! Parsing for the `position` and `go` UCI commands, and UCI move-text
//! matching against the legal moves of a position.

use corvid_core::move_list::MoveList;
use corvid_core::position::fen::import_fen;
use corvid_core::{PieceMove, Position};

use crate::error::UciError;

fn is_keyword(arg: &str) -> bool {
    matches!(
        arg,
        "searchmoves"
            | "ponder"
            | "wtime"
            | "btime"
            | "winc"
            | "binc"
            | "movestogo"
            | "depth"
            | "nodes"
            | "mate"
            | "movetime"
            | "infinite"
    )
}

/// Finds the pseudo-legal move in `pos` whose coordinate notation matches
/// `text` exactly (`e2e4`, `e7e8q`, ...). Generation, not text parsing,
/// decides what's legal here: a move is only ever applied by comparing
/// against what the move generator actually produced.
pub fn find_matching_move(pos: &Position, text: &str) -> Option<PieceMove> {
    let mut moves = MoveList::new();
    pos.gen_captures(&mut moves);
    pos.gen_quiet_moves(&mut moves);
    moves.iter().find(|m| m.to_string() == text).copied()
}

/// Parses the argument list that follows `position` (i.e. without the
/// leading `position` token itself): `startpos [moves ...]` or
/// `fen <6 fields> [moves ...]`.
pub fn parse_position(args: &[&str]) -> Result<(Position, Vec<String>), UciError> {
    if args.is_empty() {
        return Err(UciError::BadPosition("missing startpos/fen".into()));
    }

    let (mut pos, rest): (Position, &[&str]) = if args[0] == "startpos" {
        (Position::start_pos(), &args[1..])
    } else if args[0] == "fen" {
        let fen_fields: Vec<&str> = args[1..]
            .iter()
            .take_while(|a| **a != "moves")
            .copied()
            .collect();
        let fen = fen_fields.join(" ");
        let pos = import_fen(&fen)?;
        (pos, &args[1 + fen_fields.len()..])
    } else {
        return Err(UciError::BadPosition(format!(
            "expected 'startpos' or 'fen', got '{}'",
            args[0]
        )));
    };

    let mut played = Vec::new();
    if let Some(idx) = rest.iter().position(|a| *a == "moves") {
        for mov in &rest[idx + 1..] {
            let mv = find_matching_move(&pos, mov)
                .ok_or_else(|| UciError::BadPosition(format!("illegal move in history: {}", mov)))?;
            pos.make_move(&mv);
            if pos.is_invalid() {
                return Err(UciError::BadPosition(format!(
                    "move leaves own king in check: {}",
                    mov
                )));
            }
            played.push((*mov).to_string());
        }
    }

    Ok((pos, played))
}

/// The time-control and search-depth parameters that follow `go`.
#[derive(Debug, Default, Clone)]
pub struct GoParams {
    pub infinite: bool,
    pub ponder: bool,
    pub depth: Option<u8>,
    pub nodes: Option<u64>,
    pub move_time_ms: Option<u64>,
    pub wtime_ms: Option<u64>,
    pub btime_ms: Option<u64>,
    pub winc_ms: Option<u64>,
    pub binc_ms: Option<u64>,
    pub moves_to_go: Option<u32>,
    pub search_moves: Vec<String>,
}

pub fn parse_go(args: &[&str]) -> GoParams {
    let mut params = GoParams::default();
    let mut i = 0usize;
    while i < args.len() {
        match args[i] {
            "infinite" => params.infinite = true,
            "ponder" => params.ponder = true,
            "wtime" => {
                i += 1;
                params.wtime_ms = args.get(i).and_then(|s| s.parse().ok());
            }
            "btime" => {
                i += 1;
                params.btime_ms = args.get(i).and_then(|s| s.parse().ok());
            }
            "winc" => {
                i += 1;
                params.winc_ms = args.get(i).and_then(|s| s.parse().ok());
            }
            "binc" => {
                i += 1;
                params.binc_ms = args.get(i).and_then(|s| s.parse().ok());
            }
            "movestogo" => {
                i += 1;
                params.moves_to_go = args.get(i).and_then(|s| s.parse().ok());
            }
            "depth" => {
                i += 1;
                params.depth = args.get(i).and_then(|s| s.parse().ok());
            }
            "nodes" => {
                i += 1;
                params.nodes = args.get(i).and_then(|s| s.parse().ok());
            }
            "movetime" => {
                i += 1;
                params.move_time_ms = args.get(i).and_then(|s| s.parse().ok());
            }
            "searchmoves" => {
                let mut j = i + 1;
                while j < args.len() && !is_keyword(args[j]) {
                    params.search_moves.push(args[j].to_string());
                    j += 1;
                }
                i = j - 1;
            }
            _ => {}
        }
        i += 1;
    }
    params
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_startpos_with_moves() {
        let args: Vec<&str> = "startpos moves e2e4 e7e5".split_whitespace().collect();
        let (pos, played) = parse_position(&args).unwrap();
        assert_eq!(played, vec!["e2e4", "e7e5"]);
        assert_ne!(pos.zkey, Position::start_pos().zkey);
    }

    #[test]
    fn parses_bare_startpos() {
        let args: Vec<&str> = vec!["startpos"];
        let (pos, played) = parse_position(&args).unwrap();
        assert!(played.is_empty());
        assert_eq!(pos.zkey, Position::start_pos().zkey);
    }

    #[test]
    fn parses_fen_with_moves() {
        let text = "fen r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1 moves e1g1";
        let args: Vec<&str> = text.split_whitespace().collect();
        let (_pos, played) = parse_position(&args).unwrap();
        assert_eq!(played, vec!["e1g1"]);
    }

    #[test]
    fn go_time_control_fields_parse() {
        let args: Vec<&str> = "wtime 30000 btime 30000 winc 100 binc 100 movestogo 20"
            .split_whitespace()
            .collect();
        let go = parse_go(&args);
        assert_eq!(go.wtime_ms, Some(30_000));
        assert_eq!(go.moves_to_go, Some(20));
    }

    #[test]
    fn go_searchmoves_stops_at_next_keyword() {
        let args: Vec<&str> = "searchmoves e2e4 d2d4 depth 5".split_whitespace().collect();
        let go = parse_go(&args);
        assert_eq!(go.search_moves, vec!["e2e4", "d2d4"]);
        assert_eq!(go.depth, Some(5));
    }
}
