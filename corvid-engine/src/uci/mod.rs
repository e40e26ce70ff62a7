//! The UCI command loop.

pub mod parse;

use std::io::{self, BufRead, Write};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use log::{info, warn};

use crate::engine::{Engine, SearchEvent, SearchJob};
use crate::version::{ID_AUTHORS, ID_NAME, VERSION};

/// Reads UCI commands from `input` and writes responses to `output` until
/// `quit` or end-of-input. Takes explicit `Read`/`Write` handles (rather
/// than hard-coding stdin/stdout) so the loop can be driven by a string
/// buffer in tests. Runs every `go` to completion on this same thread, which
/// is fine for a script whose entire input is already available (as in
/// tests) but means `stop` sent on a later line can never interrupt a search
/// already in progress -- see [`run_stdio`] for the interactive version that
/// fixes that.
pub fn run<R: BufRead, W: Write>(input: R, mut output: W, engine: &mut Engine) {
    for line in input.lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                warn!("error reading UCI input: {}", e);
                break;
            }
        };
        if !dispatch_line(&line, engine, &mut output) {
            break;
        }
        output.flush().ok();
    }
}

/// Handles one command against `engine`, writing any immediate response to
/// `out`. Returns `false` on `quit`.
fn dispatch_line<W: Write>(line: &str, engine: &mut Engine, out: &mut W) -> bool {
    let args: Vec<&str> = line.split_whitespace().collect();
    let command = match args.first() {
        Some(c) => *c,
        None => return true,
    };

    match command {
        "uci" => write_uci_header(out),
        "isready" => {
            writeln!(out, "readyok").ok();
        }
        "ucinewgame" => engine.new_game(),
        "setoption" => engine.apply_option_command(line),
        "position" => {
            if let Err(e) = engine.set_position(&args[1..]) {
                warn!("bad position command: {}", e);
            }
        }
        "go" => {
            let params = parse::parse_go(&args[1..]);
            engine.go(params, out);
        }
        "stop" => engine.stop(),
        "ponderhit" => {
            // Pondering cleverness beyond the flag is out of scope: a
            // `go ponder` search already runs with no deadline, same as
            // `go infinite`, so there is no time budget to recompute here.
            info!("received ponderhit");
        }
        "quit" => {
            info!("received quit");
            return false;
        }
        "perft" => {
            if let Some(depth) = args.get(1).and_then(|s| s.parse::<u32>().ok()) {
                engine.perft(depth, out);
            }
        }
        _ => {
            writeln!(out, "unknown command: {}", command).ok();
        }
    }
    true
}

fn write_uci_header<W: Write>(out: &mut W) {
    writeln!(out, "id name {} {}", ID_NAME, VERSION).ok();
    writeln!(out, "id author {}", ID_AUTHORS).ok();
    writeln!(
        out,
        "option name Hash type spin default {} min 1 max 65536",
        crate::config::DEFAULT_HASH_MB
    )
    .ok();
    writeln!(out, "uciok").ok();
}

/// Runs the interactive UCI loop over real stdin/stdout. A dedicated reader
/// thread feeds lines into a channel (grounded on
/// `En-En-Code-alcibiades::uci::Server::serve`'s reader-thread/`mpsc`
/// pattern) so that a `go` dispatched onto [`Engine::go_async`] doesn't
/// block this loop from noticing `stop`, `isready`, or `quit` arriving on
/// stdin while the search runs.
pub fn run_stdio(engine: &mut Engine) {
    let (cmd_tx, cmd_rx) = mpsc::channel::<String>();
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(l) => {
                    if cmd_tx.send(l).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!("error reading UCI input: {}", e);
                    break;
                }
            }
        }
    });

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut search: Option<SearchJob> = None;

    loop {
        if let Some(job) = search.as_ref() {
            if drain_search_events(job, &mut out) {
                search = None;
            }
        }

        let line = if search.is_some() {
            match cmd_rx.recv_timeout(Duration::from_millis(5)) {
                Ok(l) => l,
                Err(mpsc::RecvTimeoutError::Timeout) => continue,
                Err(mpsc::RecvTimeoutError::Disconnected) => break,
            }
        } else {
            match cmd_rx.recv() {
                Ok(l) => l,
                Err(_) => break,
            }
        };

        let args: Vec<&str> = line.split_whitespace().collect();
        let command = match args.first() {
            Some(c) => *c,
            None => continue,
        };

        if search.is_some() {
            // Mid-search, only these four commands are served; everything
            // else is ignored until the running search finishes.
            match command {
                "isready" => {
                    writeln!(out, "readyok").ok();
                }
                "ponderhit" => {
                    info!("received ponderhit");
                }
                "stop" => {
                    if let Some(job) = search.take() {
                        job.request_stop();
                        finish_and_print(job, &mut out);
                    }
                }
                "quit" => {
                    if let Some(job) = search.take() {
                        job.request_stop();
                        finish_and_print(job, &mut out);
                    }
                    info!("received quit");
                    break;
                }
                _ => {}
            }
            out.flush().ok();
            continue;
        }

        match command {
            "uci" => write_uci_header(&mut out),
            "isready" => {
                writeln!(out, "readyok").ok();
            }
            "ucinewgame" => engine.new_game(),
            "setoption" => engine.apply_option_command(&line),
            "position" => {
                if let Err(e) = engine.set_position(&args[1..]) {
                    warn!("bad position command: {}", e);
                }
            }
            "go" => {
                let params = parse::parse_go(&args[1..]);
                search = Some(engine.go_async(params));
            }
            "stop" => {} // nothing running
            "ponderhit" => {} // nothing to transition, no search in flight
            "quit" => {
                info!("received quit");
                break;
            }
            "perft" => {
                if let Some(depth) = args.get(1).and_then(|s| s.parse::<u32>().ok()) {
                    engine.perft(depth, &mut out);
                }
            }
            _ => {
                writeln!(out, "unknown command: {}", command).ok();
            }
        }
        out.flush().ok();
    }
}

/// Prints every event already queued for `job` without blocking. Returns
/// `true` once `Done` has been seen (the caller should drop the job).
fn drain_search_events<W: Write>(job: &SearchJob, out: &mut W) -> bool {
    loop {
        match job.events.try_recv() {
            Ok(SearchEvent::Info(line)) => {
                writeln!(out, "{}", line).ok();
            }
            Ok(SearchEvent::Done(line)) => {
                writeln!(out, "{}", line).ok();
                out.flush().ok();
                return true;
            }
            Err(_) => return false,
        }
    }
}

/// Blocks (briefly -- the search has just been told to stop) until the job
/// reports its final `bestmove` line, printing every event along the way.
fn finish_and_print<W: Write>(job: SearchJob, out: &mut W) {
    for event in job.events.iter() {
        match event {
            SearchEvent::Info(line) => {
                writeln!(out, "{}", line).ok();
            }
            SearchEvent::Done(line) => {
                writeln!(out, "{}", line).ok();
                break;
            }
        }
    }
    out.flush().ok();
}
