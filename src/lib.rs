//! musicdl-bridge: search Chinese music platforms and resolve playable
//! stream URLs, speaking single-line JSON on stdout for a host
//! application.
//!
//! The library holds the platform clients ([`sources`]), the concurrent
//! search aggregator ([`search`]) and the JSON output contract
//! ([`output`]); the two binaries in `src/bin` are thin shims over
//! [`cli`].

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod output;
pub mod search;
pub mod sources;

pub use config::Config;
pub use error::{BridgeError, Result};
pub use model::Song;
