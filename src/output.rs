//! JSON output contract for the two binaries.
//!
//! The host application parses stdout as a single JSON line, so
//! everything printed here goes through [`emit`] and nothing else in the
//! process writes to stdout. Errors are payloads, not exit codes.

use serde::Serialize;

use crate::model::Song;

/// Flattened, host-facing projection of a [`Song`].
///
/// Every field is always present and serializes as a string; unknown
/// values stay `""` so the consumer never has to null-check.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SongItem {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub album: String,
    pub duration: String,
    pub source: String,
    pub song_url: String,
    pub mid: String,
    pub hash: String,
    pub content_id: String,
}

impl From<&Song> for SongItem {
    fn from(song: &Song) -> Self {
        SongItem {
            id: song.id.clone(),
            title: song.title.clone(),
            artist: song.singer.clone(),
            album: song.album.clone(),
            duration: song.duration.clone(),
            source: song.source.clone(),
            song_url: song.song_url.clone(),
            mid: song.mid.clone(),
            hash: song.hash.clone(),
            content_id: song.content_id.clone(),
        }
    }
}

#[derive(Serialize, Debug)]
pub struct SearchOutput {
    pub items: Vec<SongItem>,
    pub total: usize,
}

#[derive(Serialize, Debug)]
pub struct ResolveOutput {
    pub url: String,
}

#[derive(Serialize, Debug)]
pub struct ErrorOutput {
    pub error: String,
}

impl ErrorOutput {
    pub fn args() -> Self {
        ErrorOutput {
            error: "args".to_string(),
        }
    }

    pub fn unknown_source() -> Self {
        ErrorOutput {
            error: "unknown source".to_string(),
        }
    }
}

/// Print one JSON line to stdout.
///
/// Serialization of these output types cannot fail (string fields only),
/// but degrade to an empty object rather than panicking if it ever does.
pub fn emit<T: Serialize>(value: &T) {
    match serde_json::to_string(value) {
        Ok(line) => println!("{}", line),
        Err(_) => println!("{{}}"),
    }
}

/// Slice a result list into the requested 1-indexed page.
///
/// A page past the end yields an empty slice; the caller reports the
/// unsliced count as `total` either way.
pub fn page_slice(songs: &[Song], page: usize, page_size: usize) -> &[Song] {
    let start = page.saturating_sub(1).saturating_mul(page_size);
    if start >= songs.len() {
        return &[];
    }
    let end = (start + page_size).min(songs.len());
    &songs[start..end]
}
