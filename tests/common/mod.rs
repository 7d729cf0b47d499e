#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use chessgpt::engine::{Engine, EngineError, EngineHandle};
use chessgpt::resolver::Resolver;
use chessgpt::server::AppState;
use chessgpt::session::{Elo, SessionManager};
use chessgpt::store::MemoryStore;

/// Answers every search with the same moves and records how it was configured.
#[derive(Default)]
pub struct ScriptedEngine {
    pub best: Option<String>,
    pub top: Vec<String>,
    pub broken: bool,
    pub configured: Mutex<Vec<(Elo, String)>>,
}

impl ScriptedEngine {
    pub fn new(best: &str, top: &[&str]) -> Self {
        Self { best: Some(best.to_string()), top: top.iter().map(|m| m.to_string()).collect(), ..Self::default() }
    }

    pub fn broken() -> Self { Self { broken: true, ..Self::default() } }

    pub fn configured(&self) -> Vec<(Elo, String)> { self.configured.lock().unwrap().clone() }
}

struct ScriptedHandle {
    best: Option<String>,
    top: Vec<String>,
}

impl Engine for ScriptedEngine {
    fn configure(&self, elo: Elo, fen: &str) -> Result<Box<dyn EngineHandle>, EngineError> {
        if self.broken {
            return Err(EngineError::Timeout(std::time::Duration::from_millis(10)));
        }
        self.configured.lock().unwrap().push((elo, fen.to_string()));
        Ok(Box::new(ScriptedHandle { best: self.best.clone(), top: self.top.clone() }))
    }
}

impl EngineHandle for ScriptedHandle {
    fn best_move(&mut self) -> Result<Option<String>, EngineError> { Ok(self.best.clone()) }

    fn top_moves(&mut self, n: usize) -> Result<Vec<String>, EngineError> {
        Ok(self.top.iter().take(n).cloned().collect())
    }
}

pub fn memory_sessions() -> SessionManager { SessionManager::new(Arc::new(MemoryStore::new())) }

pub fn app_state(engine: Arc<ScriptedEngine>) -> AppState {
    AppState {
        sessions: memory_sessions(),
        resolver: Arc::new(Resolver::new(engine)),
        public_url: Some("https://chess.test".to_string()),
    }
}
