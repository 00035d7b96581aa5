//! Kugou Music (kugou.com).
//!
//! Search and resolution both use the mobile endpoints, which need no
//! signature. A song is identified by its file hash.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::error::{BridgeError, Result};
use crate::model::{format_duration, Song};
use crate::sources::{Provider, SourceKind};

const SEARCH_URL: &str = "http://mobilecdn.kugou.com/api/v3/search/song";
const SONG_INFO_URL: &str = "http://m.kugou.com/app/i/getSongInfo.php";

pub struct KugouClient {
    client: reqwest::Client,
}

impl KugouClient {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[derive(Deserialize, Debug)]
struct SearchResponse {
    #[serde(default)]
    status: i64,
    data: Option<SearchData>,
}

#[derive(Deserialize, Debug)]
struct SearchData {
    #[serde(default)]
    info: Vec<KugouSong>,
}

#[derive(Deserialize, Debug)]
struct KugouSong {
    #[serde(default)]
    hash: String,
    #[serde(default)]
    album_audio_id: i64,
    #[serde(default)]
    songname: String,
    #[serde(default)]
    singername: String,
    #[serde(default)]
    album_name: String,
    /// Seconds.
    #[serde(default)]
    duration: u64,
}

impl From<KugouSong> for Song {
    fn from(raw: KugouSong) -> Self {
        Song {
            id: if raw.album_audio_id > 0 {
                raw.album_audio_id.to_string()
            } else {
                String::new()
            },
            hash: raw.hash,
            title: raw.songname,
            singer: raw.singername,
            album: raw.album_name,
            duration: format_duration(raw.duration),
            source: SourceKind::Kugou.as_str().to_string(),
            ..Default::default()
        }
    }
}

#[derive(Deserialize, Debug)]
struct SongInfoResponse {
    #[serde(default)]
    status: i64,
    #[serde(default)]
    url: String,
}

#[async_trait]
impl Provider for KugouClient {
    fn kind(&self) -> SourceKind {
        SourceKind::Kugou
    }

    async fn search(&self, keyword: &str, limit: usize) -> Result<Vec<Song>> {
        let response: SearchResponse = self
            .client
            .get(SEARCH_URL)
            .query(&[
                ("keyword", keyword),
                ("page", "1"),
                ("pagesize", &limit.to_string()),
                ("showtype", "1"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if response.status != 1 {
            return Err(BridgeError::invalid_response(format!(
                "kugou search returned status {}",
                response.status
            )));
        }

        let songs: Vec<Song> = response
            .data
            .map(|d| d.info)
            .unwrap_or_default()
            .into_iter()
            .map(Song::from)
            .collect();

        debug!("kugou search '{}' -> {} songs", keyword, songs.len());
        Ok(songs)
    }

    async fn resolve(&self, song: &mut Song) -> Result<()> {
        if song.hash.is_empty() {
            return Err(BridgeError::invalid_response("kugou song has no hash"));
        }

        let response: SongInfoResponse = self
            .client
            .get(SONG_INFO_URL)
            .query(&[("cmd", "playInfo"), ("hash", &song.hash)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if response.status != 1 || response.url.is_empty() {
            return Err(BridgeError::invalid_response(
                "kugou playInfo returned no url",
            ));
        }

        song.song_url = response.url;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEARCH_SAMPLE: &str = r#"{
        "status": 1,
        "data": {
            "info": [
                {
                    "hash": "F62C6B1D4E3F2C0A",
                    "album_audio_id": 31234567,
                    "songname": "晴天",
                    "singername": "周杰伦",
                    "album_name": "叶惠美",
                    "duration": 269
                }
            ],
            "total": 532
        }
    }"#;

    #[test]
    fn test_parse_search_response() {
        let response: SearchResponse = serde_json::from_str(SEARCH_SAMPLE).unwrap();
        assert_eq!(response.status, 1);

        let song = Song::from(response.data.unwrap().info.remove(0));
        assert_eq!(song.hash, "F62C6B1D4E3F2C0A");
        assert_eq!(song.id, "31234567");
        assert_eq!(song.singer, "周杰伦");
        assert_eq!(song.duration, "04:29");
        assert_eq!(song.source, "kugou");
    }

    #[test]
    fn test_parse_song_info_response() {
        let response: SongInfoResponse = serde_json::from_str(
            r#"{"status": 1, "url": "http://fs.mv.web.kugou.com/abc.mp3", "timeLength": 269}"#,
        )
        .unwrap();
        assert_eq!(response.status, 1);
        assert!(response.url.ends_with(".mp3"));
    }

    #[tokio::test]
    async fn test_resolve_without_hash_fails() {
        let client = KugouClient::new(reqwest::Client::new());
        let mut song = Song::default();
        assert!(client.resolve(&mut song).await.is_err());
        assert!(song.song_url.is_empty());
    }
}
