//! QQ Music (y.qq.com).
//!
//! Search uses the soso `client_search_cp` endpoint. Resolution asks the
//! `musicu.fcg` vkey service for a `purl` token and joins it onto the
//! stream host; an empty `purl` means the track is not playable for
//! anonymous clients (VIP or region locked).

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::error::{BridgeError, Result};
use crate::model::{format_duration, Song};
use crate::sources::{Provider, SourceKind};

const SEARCH_URL: &str = "https://c.y.qq.com/soso/fcgi-bin/client_search_cp";
const VKEY_URL: &str = "https://u.y.qq.com/cgi-bin/musicu.fcg";
const REFERER: &str = "https://y.qq.com/";
const STREAM_HOST: &str = "http://ws.stream.qqmusic.qq.com/";

// Fixed device guid for the anonymous vkey handshake.
const GUID: &str = "7332953645";

pub struct QqClient {
    client: reqwest::Client,
}

impl QqClient {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[derive(Deserialize, Debug)]
struct SearchResponse {
    code: i64,
    data: Option<SearchData>,
}

#[derive(Deserialize, Debug)]
struct SearchData {
    song: Option<SongList>,
}

#[derive(Deserialize, Debug)]
struct SongList {
    #[serde(default)]
    list: Vec<QqSong>,
}

#[derive(Deserialize, Debug)]
struct QqSong {
    #[serde(default)]
    songid: i64,
    #[serde(default)]
    songmid: String,
    #[serde(default)]
    songname: String,
    #[serde(default)]
    albumname: String,
    /// Seconds.
    #[serde(default)]
    interval: u64,
    #[serde(default)]
    singer: Vec<QqSinger>,
}

#[derive(Deserialize, Debug)]
struct QqSinger {
    #[serde(default)]
    name: String,
}

impl From<QqSong> for Song {
    fn from(raw: QqSong) -> Self {
        Song {
            id: raw.songid.to_string(),
            mid: raw.songmid,
            title: raw.songname,
            singer: raw
                .singer
                .iter()
                .map(|s| s.name.as_str())
                .collect::<Vec<_>>()
                .join(","),
            album: raw.albumname,
            duration: format_duration(raw.interval),
            source: SourceKind::Qq.as_str().to_string(),
            ..Default::default()
        }
    }
}

#[derive(Deserialize, Debug)]
struct VkeyResponse {
    req_0: Option<VkeyReq>,
}

#[derive(Deserialize, Debug)]
struct VkeyReq {
    data: Option<VkeyData>,
}

#[derive(Deserialize, Debug)]
struct VkeyData {
    #[serde(default)]
    sip: Vec<String>,
    #[serde(default)]
    midurlinfo: Vec<MidUrlInfo>,
}

#[derive(Deserialize, Debug)]
struct MidUrlInfo {
    #[serde(default)]
    purl: String,
}

#[async_trait]
impl Provider for QqClient {
    fn kind(&self) -> SourceKind {
        SourceKind::Qq
    }

    async fn search(&self, keyword: &str, limit: usize) -> Result<Vec<Song>> {
        let response: SearchResponse = self
            .client
            .get(SEARCH_URL)
            .header(reqwest::header::REFERER, REFERER)
            .query(&[
                ("w", keyword),
                ("p", "1"),
                ("n", &limit.to_string()),
                ("format", "json"),
                ("cr", "1"),
                ("aggr", "0"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if response.code != 0 {
            return Err(BridgeError::invalid_response(format!(
                "qq search returned code {}",
                response.code
            )));
        }

        let songs: Vec<Song> = response
            .data
            .and_then(|d| d.song)
            .map(|s| s.list)
            .unwrap_or_default()
            .into_iter()
            .map(Song::from)
            .collect();

        debug!("qq search '{}' -> {} songs", keyword, songs.len());
        Ok(songs)
    }

    async fn resolve(&self, song: &mut Song) -> Result<()> {
        if song.mid.is_empty() {
            return Err(BridgeError::invalid_response("qq song has no mid"));
        }

        let payload = json!({
            "req_0": {
                "module": "vkey.GetVkeyServerBase",
                "method": "CgiGetVkey",
                "param": {
                    "guid": GUID,
                    "songmid": [song.mid],
                    "songtype": [0],
                    "uin": "0",
                    "loginflag": 1,
                    "platform": "20"
                }
            }
        });

        let response: VkeyResponse = self
            .client
            .get(VKEY_URL)
            .header(reqwest::header::REFERER, REFERER)
            .query(&[("format", "json"), ("data", &payload.to_string())])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let data = response
            .req_0
            .and_then(|r| r.data)
            .ok_or_else(|| BridgeError::invalid_response("qq vkey response missing data"))?;

        let purl = data
            .midurlinfo
            .first()
            .map(|info| info.purl.as_str())
            .unwrap_or_default();

        if purl.is_empty() {
            return Err(BridgeError::invalid_response(
                "qq vkey returned no purl (VIP or region locked)",
            ));
        }

        let host = data
            .sip
            .iter()
            .find(|s| !s.is_empty())
            .map(String::as_str)
            .unwrap_or(STREAM_HOST);

        song.song_url = format!("{}{}", host, purl);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEARCH_SAMPLE: &str = r#"{
        "code": 0,
        "data": {
            "song": {
                "list": [
                    {
                        "songid": 97773,
                        "songmid": "003OUlho2HcRHC",
                        "songname": "晴天",
                        "albumname": "叶惠美",
                        "interval": 269,
                        "singer": [{"name": "周杰伦"}]
                    }
                ]
            }
        }
    }"#;

    const VKEY_SAMPLE: &str = r#"{
        "req_0": {
            "data": {
                "sip": ["http://isure.stream.qqmusic.qq.com/"],
                "midurlinfo": [{"purl": "C400003OUlho2HcRHC.m4a?vkey=ABC&guid=7332953645"}]
            }
        }
    }"#;

    #[test]
    fn test_parse_search_response() {
        let response: SearchResponse = serde_json::from_str(SEARCH_SAMPLE).unwrap();
        let song = Song::from(response.data.unwrap().song.unwrap().list.remove(0));
        assert_eq!(song.id, "97773");
        assert_eq!(song.mid, "003OUlho2HcRHC");
        assert_eq!(song.singer, "周杰伦");
        assert_eq!(song.duration, "04:29");
        assert_eq!(song.source, "qq");
    }

    #[test]
    fn test_parse_vkey_response() {
        let response: VkeyResponse = serde_json::from_str(VKEY_SAMPLE).unwrap();
        let data = response.req_0.unwrap().data.unwrap();
        assert_eq!(data.sip[0], "http://isure.stream.qqmusic.qq.com/");
        assert!(data.midurlinfo[0].purl.starts_with("C400"));
    }

    #[test]
    fn test_parse_vkey_response_without_purl() {
        let response: VkeyResponse =
            serde_json::from_str(r#"{"req_0": {"data": {"midurlinfo": [{"purl": ""}]}}}"#).unwrap();
        let data = response.req_0.unwrap().data.unwrap();
        assert!(data.midurlinfo[0].purl.is_empty());
        assert!(data.sip.is_empty());
    }

    #[tokio::test]
    async fn test_resolve_without_mid_fails() {
        let client = QqClient::new(reqwest::Client::new());
        let mut song = Song::default();
        assert!(client.resolve(&mut song).await.is_err());
    }
}
