use std::collections::BTreeMap;
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, warn};

use super::{Engine, EngineError, EngineHandle};
use crate::session::Elo;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchLimits {
    pub depth: u32,
    /// When set, searches by time instead of depth.
    pub movetime: Option<Duration>,
}

impl Default for SearchLimits {
    fn default() -> Self { Self { depth: 15, movetime: None } }
}

impl SearchLimits {
    fn go_command(&self) -> String {
        match self.movetime {
            Some(t) => format!("go movetime {}", t.as_millis()),
            None => format!("go depth {}", self.depth),
        }
    }
}

/// Spawns one engine process per configured handle.
#[derive(Clone, Debug)]
pub struct UciEngine {
    path: String,
    limits: SearchLimits,
    timeout: Duration,
}

impl UciEngine {
    pub fn new(path: impl Into<String>, limits: SearchLimits, timeout: Duration) -> Self {
        Self { path: path.into(), limits, timeout }
    }
}

impl Engine for UciEngine {
    fn configure(&self, elo: Elo, fen: &str) -> Result<Box<dyn EngineHandle>, EngineError> {
        let mut proc = UciProcess::spawn(&self.path, self.limits, self.timeout)?;
        proc.handshake()?;
        proc.send("setoption name UCI_LimitStrength value true")?;
        proc.send(&format!("setoption name UCI_Elo value {}", elo.get()))?;
        proc.send(&format!("position fen {fen}"))?;
        proc.sync()?;
        Ok(Box::new(proc))
    }
}

struct UciProcess {
    child: Child,
    stdin: ChildStdin,
    lines: Receiver<String>,
    limits: SearchLimits,
    timeout: Duration,
}

impl UciProcess {
    fn spawn(path: &str, limits: SearchLimits, timeout: Duration) -> Result<Self, EngineError> {
        let mut child = Command::new(path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| EngineError::Spawn { path: path.to_string(), source })?;
        let stdin = child.stdin.take().ok_or_else(|| EngineError::Protocol("no stdin pipe".into()))?;
        let stdout = child.stdout.take().ok_or_else(|| EngineError::Protocol("no stdout pipe".into()))?;

        let (tx, lines) = mpsc::channel();
        thread::spawn(move || {
            for line in BufReader::new(stdout).lines() {
                let Ok(line) = line else { break };
                if tx.send(line).is_err() { break; }
            }
        });
        Ok(Self { child, stdin, lines, limits, timeout })
    }

    fn send(&mut self, cmd: &str) -> Result<(), EngineError> {
        debug!("uci > {cmd}");
        writeln!(self.stdin, "{cmd}")?;
        self.stdin.flush()?;
        Ok(())
    }

    /// Feeds lines to `on_line` until it returns true. One deadline covers the
    /// whole exchange; a timeout too large for `Instant` waits without one.
    fn read_until(&mut self, mut on_line: impl FnMut(&str) -> bool) -> Result<(), EngineError> {
        let deadline = Instant::now().checked_add(self.timeout);
        loop {
            let line = next_line(&self.lines, deadline, self.timeout)?;
            if on_line(line.trim()) { return Ok(()); }
        }
    }

    fn handshake(&mut self) -> Result<(), EngineError> {
        self.send("uci")?;
        self.read_until(|l| l == "uciok")
    }

    fn sync(&mut self) -> Result<(), EngineError> {
        self.send("isready")?;
        self.read_until(|l| l == "readyok")
    }

    fn search(&mut self, mut on_info: impl FnMut(&Info)) -> Result<Option<String>, EngineError> {
        let go = self.limits.go_command();
        self.send(&go)?;
        let mut best = None;
        self.read_until(|line| {
            if let Some(info) = parse_info(line) {
                on_info(&info);
                return false;
            }
            match parse_bestmove(line) {
                Some(mv) => { best = mv; true }
                None => false,
            }
        })?;
        Ok(best)
    }
}

impl EngineHandle for UciProcess {
    fn best_move(&mut self) -> Result<Option<String>, EngineError> {
        self.send("setoption name MultiPV value 1")?;
        self.search(|_| {})
    }

    fn top_moves(&mut self, n: usize) -> Result<Vec<String>, EngineError> {
        if n == 0 { return Ok(Vec::new()); }
        self.send(&format!("setoption name MultiPV value {n}"))?;
        let mut ranked: BTreeMap<usize, String> = BTreeMap::new();
        let best = self.search(|info| {
            if let (Some(k), Some(mv)) = (info.multipv, info.pv_first.as_ref()) {
                if k >= 1 && k <= n { ranked.insert(k, mv.clone()); }
            }
        })?;
        if ranked.is_empty() {
            if let Some(mv) = best { ranked.insert(1, mv); }
        }
        Ok(ranked.into_values().collect())
    }
}

impl Drop for UciProcess {
    fn drop(&mut self) {
        let _ = self.send("quit");
        if let Err(e) = self.child.kill() {
            debug!("engine already gone: {e}");
        }
        if let Err(e) = self.child.wait() {
            warn!("could not reap engine process: {e}");
        }
    }
}

fn next_line(lines: &Receiver<String>, deadline: Option<Instant>, timeout: Duration) -> Result<String, EngineError> {
    let Some(deadline) = deadline else {
        return lines.recv().map_err(|_| EngineError::Exited);
    };
    match lines.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
        Ok(line) => Ok(line),
        Err(RecvTimeoutError::Timeout) => Err(EngineError::Timeout(timeout)),
        Err(RecvTimeoutError::Disconnected) => Err(EngineError::Exited),
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
struct Info {
    multipv: Option<usize>,
    pv_first: Option<String>,
}

/// `info ... multipv k ... pv m1 m2 ...`; lines without a pv are ignored.
fn parse_info(line: &str) -> Option<Info> {
    let rest = line.strip_prefix("info ")?;
    let mut info = Info::default();
    let mut tokens = rest.split_whitespace();
    while let Some(tok) = tokens.next() {
        match tok {
            "multipv" => info.multipv = tokens.next().and_then(|s| s.parse().ok()),
            "pv" => { info.pv_first = tokens.next().map(str::to_string); break; }
            // free text runs to the end of the line
            "string" => break,
            _ => {}
        }
    }
    Some(info)
}

/// `bestmove e2e4 [ponder ..]`: outer `None` if the line is not a bestmove,
/// inner `None` if the engine has no move.
fn parse_bestmove(line: &str) -> Option<Option<String>> {
    let mut tokens = line.split_whitespace();
    if tokens.next()? != "bestmove" { return None; }
    match tokens.next() {
        None | Some("(none)") | Some("0000") => Some(None),
        Some(mv) => Some(Some(mv.to_string())),
    }
}
