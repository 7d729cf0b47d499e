use std::fmt;

use sha2::{Digest, Sha256};

/// Hex SHA-256 of the external conversation identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    pub const LEN: usize = 64;

    pub fn from_conversation(conversation_id: &str) -> Self {
        Self(format!("{:x}", Sha256::digest(conversation_id.as_bytes())))
    }

    /// Accepts an already-hashed id, as found in board image links.
    pub fn parse(hash: &str) -> Option<Self> {
        let ok = hash.len() == Self::LEN && hash.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        ok.then(|| Self(hash.to_string()))
    }

    pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}
