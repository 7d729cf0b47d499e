use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use log::info;

use crate::engine::{Engine, SearchLimits, UciEngine};
use crate::resolver::Resolver;
use crate::server::AppState;
use crate::session::SessionManager;
use crate::store::{FileStore, GameStore, MemoryStore, StoreError};

#[derive(Parser, Debug, Clone)]
#[command(name = "chessgpt", version, about = "Chess session service for a conversational assistant", long_about = None)]
pub struct Config {
    /// Address to listen on
    #[arg(long, env = "CHESSGPT_BIND", default_value = "127.0.0.1:5204")]
    pub bind: SocketAddr,

    /// Directory for game records; games are kept in memory when absent
    #[arg(long, env = "CHESSGPT_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// UCI engine binary
    #[arg(long, env = "CHESSGPT_ENGINE", default_value = "stockfish")]
    pub engine: String,

    /// Search depth per engine request
    #[arg(long, env = "CHESSGPT_ENGINE_DEPTH", default_value_t = 15)]
    pub engine_depth: u32,

    /// Search time in milliseconds; overrides depth when set
    #[arg(long, env = "CHESSGPT_ENGINE_MOVETIME")]
    pub engine_movetime: Option<u64>,

    /// Give up on the engine after this many milliseconds
    #[arg(long, env = "CHESSGPT_ENGINE_TIMEOUT", default_value_t = 10_000)]
    pub engine_timeout: u64,

    /// Base URL for board image links, e.g. https://chess.example.com
    #[arg(long, env = "CHESSGPT_PUBLIC_URL")]
    pub public_url: Option<String>,

    /// End games on threefold repetition and the fifty-move rule
    #[arg(long, env = "CHESSGPT_CLAIM_DRAWS", default_value_t = false)]
    pub claim_draws: bool,
}

impl Config {
    pub fn limits(&self) -> SearchLimits {
        SearchLimits { depth: self.engine_depth, movetime: self.engine_movetime.map(Duration::from_millis) }
    }

    pub fn engine(&self) -> Arc<dyn Engine> {
        Arc::new(UciEngine::new(self.engine.clone(), self.limits(), Duration::from_millis(self.engine_timeout)))
    }

    pub fn store(&self) -> Result<Arc<dyn GameStore>, StoreError> {
        match &self.data_dir {
            Some(dir) => {
                let store = FileStore::open(dir)?;
                info!("storing games under {}", store.dir().display());
                Ok(Arc::new(store))
            }
            None => {
                info!("storing games in memory");
                Ok(Arc::new(MemoryStore::new()))
            }
        }
    }

    pub fn app_state(&self) -> Result<AppState, StoreError> {
        let sessions = SessionManager::new(self.store()?);
        let resolver = Resolver::new(self.engine()).with_claim_draws(self.claim_draws);
        let public_url = self.public_url.as_ref().map(|u| u.trim_end_matches('/').to_string());
        Ok(AppState { sessions, resolver: Arc::new(resolver), public_url })
    }
}
