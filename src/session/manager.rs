use std::sync::Arc;

use log::{debug, info};

use super::{parse_rating, Elo, Session, SessionId, Side};
use crate::error::{Error, Result};
use crate::normalize::normalize;
use crate::store::GameStore;

pub const INVALID_COLOR: &str = "Invalid assistant_color in request data. Please specify 'white' or 'black'";
pub const INVALID_ELO: &str = "Invalid elo in request data. Please specify a number between 1350 and 2850";

/// Session lifecycle over an explicit store handle.
#[derive(Clone)]
pub struct SessionManager {
    store: Arc<dyn GameStore>,
}

impl SessionManager {
    pub fn new(store: Arc<dyn GameStore>) -> Self { Self { store } }

    /// Starts a fresh game, replacing whatever the conversation had before.
    pub fn create(&self, id: &SessionId, assistant_color: &str, elo: &str) -> Result<Session> {
        let assistant: Side = assistant_color
            .trim()
            .to_ascii_lowercase()
            .parse()
            .map_err(|_| Error::Validation(INVALID_COLOR.to_string()))?;
        let raw = parse_rating(elo).ok_or_else(|| Error::Validation(INVALID_ELO.to_string()))?;
        let elo = Elo::clamped(raw);
        if elo.get() as i64 != raw {
            debug!("clamped elo {raw} to {elo}");
        }

        let session = Session::new(id.clone(), assistant, elo, now());
        self.store.put(id.as_str(), &session.to_record())?;
        info!("new game {id}: assistant plays {assistant} at {elo}");
        Ok(session)
    }

    pub fn load(&self, id: &SessionId, max_ply: Option<usize>) -> Result<Session> {
        let record = self.store.get(id.as_str())?.ok_or(Error::NotFound)?;
        Ok(Session::from_record(id.clone(), &record, max_ply, now())?)
    }

    /// Plays `move_text` and persists the result. On error neither the session
    /// nor the store is touched.
    pub fn apply_move(&self, session: &Session, move_text: &str) -> Result<Session> {
        if session.is_from_setup() {
            return Err(Error::Validation("a session set up from a FEN cannot record moves".to_string()));
        }
        let normalized = normalize(session.position(), move_text)?;
        let next = session.with_move(&normalized, now())?;
        self.store.put(next.id().as_str(), &next.to_record())?;
        debug!("{}: ply {} {}", next.id(), next.ply(), normalized.san);
        Ok(next)
    }
}

fn now() -> i64 { chrono::Utc::now().timestamp() }
