//! Owns the mutable state of one UCI session: the transposition table, the
//! game in progress, and configuration. Dispatches `go` into
//! [`corvid_core::search::search_root`] and writes `info`/`bestmove` lines.
//!
//! `go` runs the search on its own thread (grounded on
//! `pleco_engine::engine::PlecoSearcher::uci_go`, which dispatches onto its
//! thread pool rather than blocking the command loop) so that `stop` and
//! `isready` -- which the UCI protocol requires to be served *while a search
//! is running* -- are never stuck behind a blocking call on the same thread
//! that reads stdin. The transposition table is the only state the search
//! thread and the command thread can touch at once, so it alone moves behind
//! a `Mutex`; only one search runs at a time, so the lock is never actually
//! contended.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::warn;

use corvid_core::clock::{compute_budget, ClockInput};
use corvid_core::position::Position;
use corvid_core::search::{search_root, PVData, SearchLimits};
use corvid_core::{Player, TranspositionTable};

use crate::config::EngineConfig;
use crate::game::Game;
use crate::uci::parse::GoParams;

/// A line produced by a running search: either a progress report to print
/// as it happens, or the final `bestmove` line that also signals the search
/// is finished.
pub enum SearchEvent {
    Info(String),
    Done(String),
}

/// A handle to a search running on its own thread. Dropping it without
/// joining is safe (the thread owns everything it touches through `Arc`s),
/// but callers that care about the `bestmove` line should drain `events`
/// until `Done` arrives.
pub struct SearchJob {
    pub events: Receiver<SearchEvent>,
    stop_flag: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl SearchJob {
    /// Signals the search thread to unwind at its next cooperative check
    /// point. Does not block; the caller should keep draining `events`
    /// afterwards for the `Done` line.
    pub fn request_stop(&self) {
        self.stop_flag.store(true, Ordering::Relaxed);
    }
}

impl Drop for SearchJob {
    /// Joins the search thread once its caller is done with it (typically
    /// right after draining `events` down to `Done`), so a job never
    /// outlives the thread it represents.
    fn drop(&mut self) {
        if let Some(h) = self.handle.take() {
            h.join().ok();
        }
    }
}

pub struct Engine {
    config: EngineConfig,
    tt: Arc<Mutex<TranspositionTable>>,
    game: Game,
    /// Stop flag for a search run synchronously through [`Engine::go`].
    /// Background jobs started through [`Engine::go_async`] carry their own
    /// flag in their [`SearchJob`] instead.
    stopped: Arc<AtomicBool>,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Engine {
        let tt = Arc::new(Mutex::new(TranspositionTable::new(config.tt_size_bytes())));
        Engine {
            config,
            tt,
            game: Game::new(),
            stopped: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn new_game(&mut self) {
        *self.tt.lock().unwrap() = TranspositionTable::new(self.config.tt_size_bytes());
        self.game = Game::new();
    }

    /// Stops a search started through the synchronous [`Engine::go`]. Background
    /// jobs from [`Engine::go_async`] are stopped through their own
    /// [`SearchJob::request_stop`] instead.
    pub fn stop(&mut self) {
        self.stopped.store(true, Ordering::Relaxed);
    }

    /// Parses `setoption name <name> value <value>`. Unrecognized options
    /// are logged and otherwise ignored, per the UCI convention that a
    /// GUI may offer options an engine doesn't implement.
    pub fn apply_option_command(&mut self, line: &str) {
        let args: Vec<&str> = line.split_whitespace().collect();
        if args.len() < 4 || args[1] != "name" {
            warn!("malformed setoption command: {}", line);
            return;
        }
        let value_idx = args.iter().position(|a| *a == "value");
        let name_end = value_idx.unwrap_or(args.len());
        let name = args[2..name_end].join(" ");
        let value = value_idx.map(|i| args[i + 1..].join(" "));

        match name.as_str() {
            "Hash" => {
                if let Some(mb) = value.and_then(|v| v.parse::<usize>().ok()) {
                    self.config.hash_mb = mb;
                    *self.tt.lock().unwrap() = TranspositionTable::new(self.config.tt_size_bytes());
                } else {
                    warn!("setoption Hash requires an integer value");
                }
            }
            other => warn!("unrecognized UCI option: {}", other),
        }
    }

    pub fn set_position(&mut self, args: &[&str]) -> Result<(), crate::error::UciError> {
        let (pos, _played) = crate::uci::parse::parse_position(args)?;
        self.game = Game::from_position(pos);
        Ok(())
    }

    pub fn perft<W: Write>(&self, depth: u32, out: &mut W) {
        let (breakdown, total) = corvid_core::perft::perft_divide(self.game.position(), depth);
        for (mv, count) in breakdown {
            writeln!(out, "{}: {}", mv, count).ok();
        }
        writeln!(out, "nodes searched: {}", total).ok();
    }

    fn build_limits(&self, params: &GoParams) -> SearchLimits {
        let max_depth = params.depth.unwrap_or(self.config.max_depth);

        if params.infinite || params.ponder {
            return SearchLimits {
                max_depth,
                deadline: None,
                infinite: params.infinite,
                ponder: params.ponder,
            };
        }

        let side = self.game.position().side_to_move();
        let (time_ms, inc_ms) = match side {
            Player::White => (params.wtime_ms.unwrap_or(0), params.winc_ms.unwrap_or(0)),
            Player::Black => (params.btime_ms.unwrap_or(0), params.binc_ms.unwrap_or(0)),
        };

        let deadline = if params.move_time_ms.is_some() || time_ms > 0 {
            let budget = compute_budget(ClockInput {
                time_ms,
                inc_ms,
                moves_to_go: params.moves_to_go.unwrap_or(0),
                move_time_ms: params.move_time_ms,
            });
            Some(Instant::now() + Duration::from_millis(budget.soft_ms))
        } else {
            None
        };

        SearchLimits {
            max_depth,
            deadline,
            infinite: false,
            ponder: false,
        }
    }

    fn info_line(pv: &PVData) -> String {
        format!(
            "info depth {} score cp {} nodes {} time {} pv {}",
            pv.depth,
            pv.value,
            pv.nodes,
            pv.time_ms,
            pv.pv
                .iter()
                .map(|m| m.to_string())
                .collect::<Vec<_>>()
                .join(" ")
        )
    }

    fn bestmove_line(pv: &PVData) -> String {
        match pv.best_move() {
            Some(mv) => format!("bestmove {}", mv),
            None => "bestmove 0000".to_string(),
        }
    }

    /// Runs a search to completion on the calling thread, writing `info`
    /// lines and the final `bestmove` line to `out` as they're produced.
    /// Used by the synchronous, script-driven [`crate::uci::run`] (tests and
    /// any caller that already has the entire input available up front),
    /// where there is no concurrent command source that could race a `stop`.
    pub fn go<W: Write>(&mut self, params: GoParams, out: &mut W) {
        self.stopped.store(false, Ordering::Relaxed);
        let limits = self.build_limits(&params);
        let pos: Position = *self.game.position();
        let history = self.game.history().to_vec();
        let stopped = Arc::clone(&self.stopped);

        let mut tt = self.tt.lock().unwrap();
        let result = search_root(
            &pos,
            &mut tt,
            &history,
            limits,
            |pv: &PVData| {
                writeln!(out, "{}", Self::info_line(pv)).ok();
            },
            &mut || stopped.load(Ordering::Relaxed),
        );

        writeln!(out, "{}", Self::bestmove_line(&result)).ok();
    }

    /// Starts a search on its own thread and returns immediately with a
    /// [`SearchJob`] the caller can poll for `info`/`bestmove` events and
    /// signal to stop. This is what [`crate::uci::run_stdio`] uses so the
    /// command-reading loop stays free to serve `stop`/`isready` while the
    /// search is in flight.
    pub fn go_async(&mut self, params: GoParams) -> SearchJob {
        let limits = self.build_limits(&params);
        let pos: Position = *self.game.position();
        let history = self.game.history().to_vec();
        let tt = Arc::clone(&self.tt);
        let stop_flag = Arc::new(AtomicBool::new(false));
        let worker_stop = Arc::clone(&stop_flag);
        let (tx, rx) = mpsc::channel::<SearchEvent>();

        let handle = thread::spawn(move || {
            let mut tt = tt.lock().unwrap();
            let tx_iter = tx.clone();
            let result = search_root(
                &pos,
                &mut tt,
                &history,
                limits,
                move |pv: &PVData| {
                    tx_iter.send(SearchEvent::Info(Self::info_line(pv))).ok();
                },
                &mut || worker_stop.load(Ordering::Relaxed),
            );
            tx.send(SearchEvent::Done(Self::bestmove_line(&result))).ok();
        });

        SearchJob {
            events: rx,
            stop_flag,
            handle: Some(handle),
        }
    }
}

impl Default for Engine {
    fn default() -> Engine {
        Engine::new(EngineConfig::default())
    }
}
