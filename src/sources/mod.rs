//! Per-platform source clients.
//!
//! Each platform gets a client implementing [`Provider`]: keyword search
//! plus resolution of a playable stream URL for a single song. Resolution
//! mirrors the platform's player handshake only; nothing here writes to
//! disk.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use tracing::warn;

use crate::error::{BridgeError, Result};
use crate::model::Song;

pub mod kugou;
pub mod migu;
pub mod netease;
pub mod qq;

/// The supported platforms, by their wire identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Qq,
    Kugou,
    Migu,
    Netease,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Qq => "qq",
            SourceKind::Kugou => "kugou",
            SourceKind::Migu => "migu",
            SourceKind::Netease => "netease",
        }
    }

    pub fn all() -> [SourceKind; 4] {
        [
            SourceKind::Qq,
            SourceKind::Kugou,
            SourceKind::Migu,
            SourceKind::Netease,
        ]
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "qq" => Ok(SourceKind::Qq),
            "kugou" => Ok(SourceKind::Kugou),
            "migu" => Ok(SourceKind::Migu),
            "netease" => Ok(SourceKind::Netease),
            other => Err(BridgeError::UnknownSource(other.to_string())),
        }
    }
}

/// Parse the comma-separated source list from the command line.
///
/// Empty entries are dropped; unknown names are logged and skipped so a
/// partially bad list still searches the platforms it can.
pub fn parse_sources(list: &str) -> Vec<SourceKind> {
    let mut kinds = Vec::new();
    for entry in list.split(',') {
        if entry.trim().is_empty() {
            continue;
        }
        match SourceKind::from_str(entry) {
            Ok(kind) => {
                if !kinds.contains(&kind) {
                    kinds.push(kind);
                }
            }
            Err(_) => warn!("Skipping unknown source '{}'", entry.trim()),
        }
    }
    kinds
}

/// A platform client: search by keyword, resolve a stream URL in place.
#[async_trait]
pub trait Provider: Send + Sync {
    fn kind(&self) -> SourceKind;

    /// Search the platform, returning up to `limit` songs.
    async fn search(&self, keyword: &str, limit: usize) -> Result<Vec<Song>>;

    /// Populate `song.song_url` with a playable stream URL.
    ///
    /// Which song field identifies the track depends on the platform
    /// (`id`, `mid`, `hash` or `content_id`).
    async fn resolve(&self, song: &mut Song) -> Result<()>;
}

/// Construct the client for a platform over a shared HTTP client.
pub fn provider(kind: SourceKind, client: reqwest::Client) -> Box<dyn Provider> {
    match kind {
        SourceKind::Qq => Box::new(qq::QqClient::new(client)),
        SourceKind::Kugou => Box::new(kugou::KugouClient::new(client)),
        SourceKind::Migu => Box::new(migu::MiguClient::new(client)),
        SourceKind::Netease => Box::new(netease::NeteaseClient::new(client)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_kind_round_trip() {
        for kind in SourceKind::all() {
            assert_eq!(SourceKind::from_str(kind.as_str()).unwrap(), kind);
        }
    }

    #[test]
    fn test_source_kind_rejects_unknown() {
        assert!(SourceKind::from_str("spotify").is_err());
        assert!(SourceKind::from_str("").is_err());
    }

    #[test]
    fn test_parse_sources_skips_empty_and_unknown() {
        assert_eq!(
            parse_sources("qq,,kugou, bogus ,netease"),
            vec![SourceKind::Qq, SourceKind::Kugou, SourceKind::Netease]
        );
        assert!(parse_sources("").is_empty());
    }

    #[test]
    fn test_parse_sources_dedupes() {
        assert_eq!(parse_sources("qq,qq,QQ"), vec![SourceKind::Qq]);
    }
}
