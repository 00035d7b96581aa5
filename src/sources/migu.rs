//! Migu Music (music.migu.cn).
//!
//! The mobile search endpoint already carries a stream URL in its `mp3`
//! field, so most resolutions are free. When only a content id is known
//! (the resolve entry point), the public `listenSong.do` endpoint
//! redirects to the stream; following the redirect with a one-byte Range
//! request yields the final URL without pulling the file.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::error::{BridgeError, Result};
use crate::model::Song;
use crate::sources::{Provider, SourceKind};

const SEARCH_URL: &str = "http://m.music.migu.cn/migu/remoting/scr_search_tag";
const LISTEN_URL: &str = "https://app.pd.nf.migu.cn/MIGUM2.0/v1.0/content/sub/listenSong.do";
const REFERER: &str = "http://m.music.migu.cn/v3";

// Anonymous device identity for listenSong.do.
const LISTEN_USER_ID: &str = "15548614588710179085069412";

pub struct MiguClient {
    client: reqwest::Client,
}

impl MiguClient {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[derive(Deserialize, Debug)]
struct SearchResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    musics: Vec<MiguSong>,
}

#[derive(Deserialize, Debug)]
struct MiguSong {
    #[serde(default)]
    id: String,
    #[serde(rename = "songName", default)]
    song_name: String,
    #[serde(rename = "singerName", default)]
    singer_name: String,
    #[serde(rename = "albumName", default)]
    album_name: String,
    #[serde(rename = "copyrightId", default)]
    copyright_id: String,
    #[serde(default)]
    mp3: String,
}

impl From<MiguSong> for Song {
    fn from(raw: MiguSong) -> Self {
        Song {
            id: raw.id,
            title: raw.song_name,
            singer: raw.singer_name,
            album: raw.album_name,
            content_id: raw.copyright_id,
            // Search already hands out a stream URL; duration is not reported.
            song_url: raw.mp3,
            source: SourceKind::Migu.as_str().to_string(),
            ..Default::default()
        }
    }
}

#[async_trait]
impl Provider for MiguClient {
    fn kind(&self) -> SourceKind {
        SourceKind::Migu
    }

    async fn search(&self, keyword: &str, limit: usize) -> Result<Vec<Song>> {
        let response: SearchResponse = self
            .client
            .get(SEARCH_URL)
            .header(reqwest::header::REFERER, REFERER)
            .query(&[
                ("keyword", keyword),
                ("pgc", "1"),
                ("rows", &limit.to_string()),
                ("type", "2"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if !response.success {
            return Err(BridgeError::invalid_response("migu search unsuccessful"));
        }

        let songs: Vec<Song> = response.musics.into_iter().map(Song::from).collect();

        debug!("migu search '{}' -> {} songs", keyword, songs.len());
        Ok(songs)
    }

    async fn resolve(&self, song: &mut Song) -> Result<()> {
        if !song.song_url.is_empty() {
            return Ok(());
        }
        if song.content_id.is_empty() {
            return Err(BridgeError::invalid_response("migu song has no content id"));
        }

        let response = self
            .client
            .get(LISTEN_URL)
            .header(reqwest::header::RANGE, "bytes=0-0")
            .query(&[
                ("toneFlag", "HQ"),
                ("netType", "00"),
                ("userId", LISTEN_USER_ID),
                ("ua", "Android_migu"),
                ("version", "5.1"),
                ("copyrightId", &song.content_id),
                ("contentId", &song.content_id),
                ("resourceType", "2"),
                ("channel", "0"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(BridgeError::invalid_response(format!(
                "migu listenSong returned {}",
                response.status()
            )));
        }

        // After redirects the response URL is the stream itself; if we are
        // still on the listen endpoint no stream exists for this id.
        let final_url = response.url().as_str().to_string();
        if final_url.contains("listenSong.do") {
            return Err(BridgeError::invalid_response(
                "migu listenSong did not redirect to a stream",
            ));
        }

        song.song_url = final_url;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEARCH_SAMPLE: &str = r#"{
        "success": true,
        "pgt": 53,
        "musics": [
            {
                "id": "1106838993",
                "songName": "晴天",
                "singerName": "周杰伦",
                "albumName": "叶惠美",
                "copyrightId": "60054701923",
                "mp3": "http://freetyst.nf.migu.cn/public/product5th/abc.mp3"
            }
        ]
    }"#;

    #[test]
    fn test_parse_search_response() {
        let mut response: SearchResponse = serde_json::from_str(SEARCH_SAMPLE).unwrap();
        assert!(response.success);

        let song = Song::from(response.musics.remove(0));
        assert_eq!(song.id, "1106838993");
        assert_eq!(song.content_id, "60054701923");
        assert_eq!(song.singer, "周杰伦");
        assert!(song.song_url.ends_with(".mp3"));
        assert_eq!(song.source, "migu");
        assert!(song.duration.is_empty());
    }

    #[tokio::test]
    async fn test_resolve_keeps_existing_url() {
        let client = MiguClient::new(reqwest::Client::new());
        let mut song = Song {
            song_url: "http://freetyst.nf.migu.cn/abc.mp3".to_string(),
            ..Default::default()
        };
        client.resolve(&mut song).await.unwrap();
        assert_eq!(song.song_url, "http://freetyst.nf.migu.cn/abc.mp3");
    }

    #[tokio::test]
    async fn test_resolve_without_content_id_fails() {
        let client = MiguClient::new(reqwest::Client::new());
        let mut song = Song::default();
        assert!(client.resolve(&mut song).await.is_err());
    }
}
