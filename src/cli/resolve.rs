use std::str::FromStr;

use clap::Parser;
use serde::{Deserialize, Deserializer};
use tracing::warn;

use crate::config::Config;
use crate::model::Song;
use crate::output::{emit, ErrorOutput, ResolveOutput};
use crate::sources::{provider, SourceKind};

#[derive(Parser, Debug)]
#[command(name = "musicdl-resolve")]
#[command(about = "Resolve one song's stream URL and print it as JSON")]
pub struct ResolveArgs {
    /// Source identifier (qq, kugou, migu, netease)
    #[arg(value_name = "SOURCE")]
    pub source: String,

    /// JSON metadata payload ({mid|hash|content_id, id, title, artist})
    #[arg(value_name = "PAYLOAD")]
    pub payload: String,
}

/// Song metadata supplied by the host. Hosts serialize ids loosely, so
/// numeric values are accepted wherever a string is expected.
#[derive(Deserialize, Debug, Default, PartialEq)]
#[serde(default)]
pub struct ResolvePayload {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(deserialize_with = "string_or_number")]
    pub mid: String,
    #[serde(deserialize_with = "string_or_number")]
    pub hash: String,
    #[serde(deserialize_with = "string_or_number")]
    pub content_id: String,
    pub title: String,
    pub artist: String,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {}",
            other
        ))),
    }
}

/// Entry point for `musicdl-resolve`.
pub async fn run<I>(args: I)
where
    I: IntoIterator<Item = String>,
{
    match ResolveArgs::try_parse_from(args) {
        Ok(args) => execute(args).await,
        Err(_) => emit(&ErrorOutput::args()),
    }
}

async fn execute(args: ResolveArgs) {
    let payload = match serde_json::from_str::<ResolvePayload>(&args.payload) {
        Ok(payload) => payload,
        Err(err) => {
            warn!("Unparseable payload: {}", err);
            emit(&ErrorOutput::args());
            return;
        }
    };

    let kind = match SourceKind::from_str(&args.source) {
        Ok(kind) => kind,
        Err(_) => {
            emit(&ErrorOutput::unknown_source());
            return;
        }
    };

    let mut song = build_song(kind, payload);

    let config = Config::load().unwrap_or_else(|err| {
        warn!("Falling back to default config: {}", err);
        Config::default()
    });

    // Resolution failures degrade to an empty URL, never a process failure.
    let url = match config.http_client() {
        Ok(client) => match provider(kind, client).resolve(&mut song).await {
            Ok(()) => song.song_url,
            Err(err) => {
                warn!("resolve on {} failed: {}", kind, err);
                String::new()
            }
        },
        Err(err) => {
            warn!("Failed to build HTTP client: {}", err);
            String::new()
        }
    };

    emit(&ResolveOutput { url });
}

/// Build the source-specific song representation from the payload.
///
/// Only the key the platform resolves by is carried over; the rest is
/// display metadata.
fn build_song(kind: SourceKind, payload: ResolvePayload) -> Song {
    let mut song = Song {
        id: payload.id,
        title: payload.title,
        singer: payload.artist,
        source: kind.as_str().to_string(),
        ..Default::default()
    };

    match kind {
        SourceKind::Qq => song.mid = payload.mid,
        SourceKind::Kugou => song.hash = payload.hash,
        SourceKind::Migu => song.content_id = payload.content_id,
        // Netease resolves by the plain id.
        SourceKind::Netease => {}
    }

    song
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        std::iter::once("musicdl-resolve")
            .chain(args.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_too_few_arguments_is_an_error() {
        assert!(ResolveArgs::try_parse_from(argv(&["qq"])).is_err());
        assert!(ResolveArgs::try_parse_from(argv(&[])).is_err());
    }

    #[test]
    fn test_payload_accepts_numeric_ids() {
        let payload: ResolvePayload =
            serde_json::from_str(r#"{"id": 186016, "title": "晴天", "artist": "周杰伦"}"#).unwrap();
        assert_eq!(payload.id, "186016");
        assert_eq!(payload.title, "晴天");
        assert!(payload.mid.is_empty());
    }

    #[test]
    fn test_payload_missing_fields_default_empty() {
        let payload: ResolvePayload = serde_json::from_str("{}").unwrap();
        assert_eq!(payload, ResolvePayload::default());
    }

    #[test]
    fn test_build_song_carries_the_platform_key() {
        let payload = ResolvePayload {
            id: "1".to_string(),
            mid: "003OUlho2HcRHC".to_string(),
            hash: "F62C6B1D".to_string(),
            content_id: "60054701923".to_string(),
            title: "晴天".to_string(),
            artist: "周杰伦".to_string(),
        };

        let song = build_song(SourceKind::Qq, payload);
        assert_eq!(song.mid, "003OUlho2HcRHC");
        assert!(song.hash.is_empty());
        assert!(song.content_id.is_empty());
        assert_eq!(song.source, "qq");
        assert_eq!(song.singer, "周杰伦");
    }

    #[test]
    fn test_build_song_kugou_uses_hash() {
        let payload = ResolvePayload {
            hash: "F62C6B1D".to_string(),
            mid: "ignored".to_string(),
            ..Default::default()
        };
        let song = build_song(SourceKind::Kugou, payload);
        assert_eq!(song.hash, "F62C6B1D");
        assert!(song.mid.is_empty());
    }

    #[test]
    fn test_build_song_netease_keeps_only_id() {
        let payload = ResolvePayload {
            id: "186016".to_string(),
            content_id: "ignored".to_string(),
            ..Default::default()
        };
        let song = build_song(SourceKind::Netease, payload);
        assert_eq!(song.id, "186016");
        assert!(song.content_id.is_empty());
    }
}
