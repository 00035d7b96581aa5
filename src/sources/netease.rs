//! Netease Cloud Music (music.163.com).
//!
//! Search goes through the legacy PC search API. Resolution needs no
//! request at all: the public outer-url endpoint redirects to the stream
//! for any song id, so the URL is constructed locally.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::error::{BridgeError, Result};
use crate::model::{format_duration, Song};
use crate::sources::{Provider, SourceKind};

const SEARCH_URL: &str = "http://music.163.com/api/search/pc";
const REFERER: &str = "http://music.163.com/";

pub struct NeteaseClient {
    client: reqwest::Client,
}

impl NeteaseClient {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[derive(Deserialize, Debug)]
struct SearchResponse {
    code: i64,
    result: Option<SearchResult>,
}

#[derive(Deserialize, Debug)]
struct SearchResult {
    #[serde(default)]
    songs: Vec<NeteaseSong>,
}

#[derive(Deserialize, Debug)]
struct NeteaseSong {
    id: i64,
    #[serde(default)]
    name: String,
    #[serde(default)]
    artists: Vec<NamedEntry>,
    album: Option<NamedEntry>,
    /// Milliseconds.
    #[serde(default)]
    duration: u64,
}

#[derive(Deserialize, Debug)]
struct NamedEntry {
    #[serde(default)]
    name: String,
}

impl From<NeteaseSong> for Song {
    fn from(raw: NeteaseSong) -> Self {
        Song {
            id: raw.id.to_string(),
            title: raw.name,
            singer: raw
                .artists
                .iter()
                .map(|a| a.name.as_str())
                .collect::<Vec<_>>()
                .join(","),
            album: raw.album.map(|a| a.name).unwrap_or_default(),
            duration: format_duration(raw.duration / 1000),
            source: SourceKind::Netease.as_str().to_string(),
            ..Default::default()
        }
    }
}

#[async_trait]
impl Provider for NeteaseClient {
    fn kind(&self) -> SourceKind {
        SourceKind::Netease
    }

    async fn search(&self, keyword: &str, limit: usize) -> Result<Vec<Song>> {
        let response: SearchResponse = self
            .client
            .post(SEARCH_URL)
            .header(reqwest::header::REFERER, REFERER)
            .form(&[
                ("s", keyword),
                ("offset", "0"),
                ("limit", &limit.to_string()),
                ("type", "1"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if response.code != 200 {
            return Err(BridgeError::invalid_response(format!(
                "netease search returned code {}",
                response.code
            )));
        }

        let songs: Vec<Song> = response
            .result
            .map(|r| r.songs)
            .unwrap_or_default()
            .into_iter()
            .map(Song::from)
            .collect();

        debug!("netease search '{}' -> {} songs", keyword, songs.len());
        Ok(songs)
    }

    async fn resolve(&self, song: &mut Song) -> Result<()> {
        if song.id.is_empty() {
            return Err(BridgeError::invalid_response("netease song has no id"));
        }
        song.song_url = outer_url(&song.id);
        Ok(())
    }
}

fn outer_url(id: &str) -> String {
    format!("https://music.163.com/song/media/outer/url?id={}.mp3", id)
}
