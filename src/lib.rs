// Session engine for a conversational chess assistant
pub mod board;
pub mod codec;
pub mod config;
pub mod engine;
pub mod error;
pub mod normalize;
pub mod render;
pub mod resolver;
pub mod server;
pub mod session;
pub mod store;

pub use error::{Error, Result};
