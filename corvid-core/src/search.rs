//! Iterative-deepening negamax search with quiescence and a transposition
//! table.

use std::time::Instant;

use log::trace;

use crate::eval::evaluate;
use crate::move_list::MoveList;
use crate::piece_move::PieceMove;
use crate::position::Position;
use crate::tt::{Bound, TranspositionTable};
use crate::zobrist::{hash_score, unhash_score, INFINITE, LONG_MATE};

pub const MAX_SEARCH_DEPTH: u8 = 32;
pub const MAX_PLY: usize = 64;

/// How often (in nodes) the search checks the clock and polls for input.
/// Matches the original's separation of a cheap clock check from a more
/// expensive "is there a line of input waiting" check.
const CLOCK_NODES: u64 = 1024;
const INPUT_NODES: u64 = 32 * CLOCK_NODES;

/// What to search for and when to stop.
#[derive(Clone)]
pub struct SearchLimits {
    pub max_depth: u8,
    pub deadline: Option<Instant>,
    pub infinite: bool,
    pub ponder: bool,
}

impl Default for SearchLimits {
    fn default() -> SearchLimits {
        SearchLimits {
            max_depth: MAX_SEARCH_DEPTH,
            deadline: None,
            infinite: false,
            ponder: false,
        }
    }
}

/// The result of one completed (or partially completed) iterative-deepening
/// iteration, handed to the `print_pv` callback and returned as the final
/// result of [`search_root`].
#[derive(Clone, Debug, Default)]
pub struct PVData {
    pub pv: Vec<PieceMove>,
    pub value: i32,
    pub depth: u8,
    pub nodes: u64,
    pub time_ms: u64,
}

impl PVData {
    pub fn best_move(&self) -> Option<PieceMove> {
        self.pv.first().copied()
    }
}

struct SearchState<'a> {
    tt: &'a mut TranspositionTable,
    history: Vec<u64>,
    nodes: u64,
    start: Instant,
    limits: SearchLimits,
    stop: bool,
    check_input: &'a mut dyn FnMut() -> bool,
}

impl<'a> SearchState<'a> {
    fn should_stop(&mut self) -> bool {
        if self.stop {
            return true;
        }
        if self.limits.infinite || self.limits.ponder {
            if (self.check_input)() {
                self.stop = true;
            }
            return self.stop;
        }
        if let Some(deadline) = self.limits.deadline {
            if Instant::now() >= deadline {
                self.stop = true;
                return true;
            }
        }
        if self.nodes % INPUT_NODES == 0 && (self.check_input)() {
            self.stop = true;
        }
        self.stop
    }

    /// Draw by the fifty-move rule, or by the current position's key
    /// recurring earlier in the path actually walked by this search (which
    /// includes the tail of the game's own history seeded at the root).
    fn is_draw(&self, pos: &Position) -> bool {
        if pos.draw_plies >= 100 {
            return true;
        }
        let plies = pos.draw_plies as usize;
        let hist = &self.history;
        if hist.len() <= plies {
            return false;
        }
        let window = &hist[hist.len() - plies..hist.len() - 1];
        window.iter().any(|&k| k == pos.zkey)
    }
}

/// Runs iterative deepening from `pos` until `limits` says to stop,
/// reporting each completed depth through `on_iteration` (the `print_pv`
/// callback) and polling `check_input` for `stop`/`ponderhit` between
/// batches of nodes.
///
/// `game_history` is the Zobrist-key history of the game so far (oldest
/// first), used to detect repetitions that span the root.
pub fn search_root(
    pos: &Position,
    tt: &mut TranspositionTable,
    game_history: &[u64],
    limits: SearchLimits,
    mut on_iteration: impl FnMut(&PVData),
    check_input: &mut dyn FnMut() -> bool,
) -> PVData {
    tt.new_generation();

    let mut root_moves = MoveList::new();
    pos.gen_captures(&mut root_moves);
    pos.gen_quiet_moves(&mut root_moves);
    let legal_root_moves: Vec<PieceMove> = root_moves
        .iter()
        .copied()
        .filter(|mv| {
            let mut child = *pos;
            child.make_move(mv);
            !child.is_invalid()
        })
        .collect();

    let mut state = SearchState {
        tt,
        history: game_history.to_vec(),
        nodes: 0,
        start: Instant::now(),
        limits,
        stop: false,
        check_input,
    };

    let mut best = PVData::default();
    if legal_root_moves.is_empty() {
        best.value = if pos.in_check() { -INFINITE } else { 0 };
        return best;
    }
    let mut ordered_moves = legal_root_moves;

    let mut depth = 1u8;
    while depth <= state.limits.max_depth {
        let mut pv = Vec::new();
        let mut best_val = -INFINITE;
        let mut best_move = ordered_moves[0];
        let (mut alpha, beta) = (-INFINITE, INFINITE);

        for &mv in ordered_moves.iter() {
            let mut child = *pos;
            child.make_move(&mv);
            state.history.push(child.zkey);
            let mut child_pv = Vec::new();
            let val = -negamax(&mut state, &child, 1, depth as i16 - 1, -beta, -alpha, &mut child_pv);
            state.history.pop();

            if state.stop {
                break;
            }
            if val > best_val {
                best_val = val;
                best_move = mv;
                pv = std::iter::once(mv).chain(child_pv.into_iter()).collect();
                if val > alpha {
                    alpha = val;
                }
            }
        }

        if state.stop && depth > 1 {
            break;
        }

        ordered_moves.sort_by_key(|&m| if m == best_move { 0 } else { 1 });

        best = PVData {
            pv,
            value: best_val,
            depth,
            nodes: state.nodes,
            time_ms: state.start.elapsed().as_millis() as u64,
        };
        on_iteration(&best);

        state.tt.store(
            pos.zkey,
            Bound::Exact,
            depth,
            hash_score(best_val, 0) as i16,
            best_move.to_hash_move(),
        );

        if best_val.abs() >= LONG_MATE {
            break;
        }
        if state.stop {
            break;
        }
        depth += 1;
    }

    best
}

fn negamax(
    state: &mut SearchState,
    pos: &Position,
    ply: i16,
    mut depth: i16,
    mut alpha: i32,
    beta: i32,
    pv: &mut Vec<PieceMove>,
) -> i32 {
    let alpha0 = alpha;
    state.nodes += 1;
    if state.should_stop() {
        return INFINITE;
    }

    if ply > 0 && state.is_draw(pos) {
        return 0;
    }

    if pos.in_check() {
        depth += 1;
    }

    let mut hash_move = None;
    if let Some(entry) = state.tt.probe(pos.zkey) {
        if entry.depth as i16 >= depth {
            let score = unhash_score(entry.score as i32, ply as i32);
            match entry.bound {
                Bound::Lower if score >= beta => return score,
                Bound::Upper if score <= alpha => return score,
                Bound::Exact if score > alpha && score < beta => {
                    if let Some(mv) = pos.expand_move(entry.best_move) {
                        pv.clear();
                        pv.push(mv);
                        return score;
                    }
                }
                _ => {}
            }
        }
        if !entry.best_move.is_null() {
            hash_move = Some(entry.best_move);
        }
    }

    if depth <= 0 {
        return quiesce(state, pos, alpha, beta);
    }

    let expanded_hash_move = hash_move.and_then(|hm| pos.expand_move(hm));

    let mut moves = MoveList::new();
    if let Some(mv) = expanded_hash_move {
        moves.push(mv);
    }
    pos.gen_captures(&mut moves);
    pos.gen_quiet_moves(&mut moves);

    let mut best_val = -INFINITE;
    let mut best_move = None;
    let mut legal_moves = 0u32;
    let mut child_pv = Vec::new();
    let mut hash_move_searched = false;

    for mv in moves.iter() {
        if let Some(hm) = expanded_hash_move {
            if *mv == hm {
                if hash_move_searched {
                    continue; // already searched once, at the front of the list
                }
                hash_move_searched = true;
            }
        }

        let mut child = *pos;
        child.make_move(mv);
        if child.is_invalid() {
            continue;
        }
        legal_moves += 1;

        state.history.push(child.zkey);
        child_pv.clear();
        let val = -negamax(state, &child, ply + 1, depth - 1, -beta, -alpha, &mut child_pv);
        state.history.pop();

        if state.stop {
            return INFINITE;
        }

        if val > best_val {
            best_val = val;
            best_move = Some(*mv);
            if val > alpha {
                alpha = val;
                pv.clear();
                pv.push(*mv);
                pv.append(&mut child_pv.clone());
            }
            if alpha >= beta {
                break;
            }
        }
    }

    if legal_moves == 0 {
        return if pos.in_check() {
            -INFINITE + ply as i32
        } else {
            0
        };
    }

    let bound = if best_val >= beta {
        Bound::Lower
    } else if best_val > alpha0 {
        Bound::Exact
    } else {
        Bound::Upper
    };
    let stored_move = best_move.map(|m| m.to_hash_move()).unwrap_or_default();
    state.tt.store(
        pos.zkey,
        bound,
        depth.max(0) as u8,
        hash_score(best_val, ply as i32) as i16,
        stored_move,
    );

    best_val
}

const QUEEN_VALUE: i32 = 1000;

fn quiesce(state: &mut SearchState, pos: &Position, mut alpha: i32, beta: i32) -> i32 {
    state.nodes += 1;
    if state.should_stop() {
        return INFINITE;
    }

    let stand_pat = evaluate(pos);
    if stand_pat >= beta {
        return stand_pat;
    }
    if stand_pat > alpha {
        alpha = stand_pat;
    }
    if stand_pat + 2 * QUEEN_VALUE <= alpha {
        return alpha;
    }

    let mut moves = MoveList::new();
    pos.gen_captures(&mut moves);

    let mut best_val = stand_pat;
    for mv in moves.iter() {
        if !mv.is_promotion() && stand_pat + crate::piece::PIECE_VALUE[mv.captured.idx()] < alpha {
            continue; // futility prune: even winning this capture can't raise alpha
        }

        let mut child = *pos;
        child.make_move(mv);
        if child.is_invalid() {
            continue;
        }

        let val = -quiesce(state, &child, -beta, -alpha);
        if state.stop {
            return INFINITE;
        }

        if val > best_val {
            best_val = val;
            if val > alpha {
                alpha = val;
            }
            if alpha >= beta {
                break;
            }
        }
    }

    trace!("quiesce at {} returned {}", pos.zkey, best_val);
    best_val
}
