//! Multi-source search aggregation.

use futures::future::join_all;
use tracing::{debug, warn};

use crate::model::Song;
use crate::sources::{provider, SourceKind};

/// Search the selected platforms concurrently.
///
/// Each platform runs in its own task with `want` as its result budget.
/// A failing platform contributes nothing (logged at warn) rather than
/// failing the whole invocation, and results are interleaved round-robin
/// across sources so no single platform dominates the head of the list.
pub async fn search_all(
    client: &reqwest::Client,
    keyword: &str,
    sources: &[SourceKind],
    want: usize,
) -> Vec<Song> {
    let tasks = sources.iter().map(|kind| {
        let provider = provider(*kind, client.clone());
        let keyword = keyword.to_string();
        let kind = *kind;
        tokio::spawn(async move { (kind, provider.search(&keyword, want).await) })
    });

    let mut per_source: Vec<Vec<Song>> = Vec::new();
    for outcome in join_all(tasks).await {
        match outcome {
            Ok((kind, Ok(songs))) => {
                debug!("{}: {} songs", kind, songs.len());
                per_source.push(songs);
            }
            Ok((kind, Err(err))) => warn!("search on {} failed: {}", kind, err),
            Err(err) => warn!("search task failed: {}", err),
        }
    }

    interleave(per_source)
}

/// Merge per-source result lists by taking one song from each list in
/// turn until all are exhausted.
fn interleave(mut groups: Vec<Vec<Song>>) -> Vec<Song> {
    let total: usize = groups.iter().map(Vec::len).sum();
    let mut merged = Vec::with_capacity(total);
    let mut index = 0;
    while merged.len() < total {
        for group in &mut groups {
            if index < group.len() {
                merged.push(std::mem::take(&mut group[index]));
            }
        }
        index += 1;
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn song(source: &str, id: usize) -> Song {
        Song {
            id: id.to_string(),
            source: source.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_interleave_round_robin() {
        let merged = interleave(vec![
            vec![song("qq", 1), song("qq", 2), song("qq", 3)],
            vec![song("netease", 4)],
            vec![song("kugou", 5), song("kugou", 6)],
        ]);

        let order: Vec<&str> = merged.iter().map(|s| s.source.as_str()).collect();
        assert_eq!(order, vec!["qq", "netease", "kugou", "qq", "kugou", "qq"]);
        assert_eq!(merged.len(), 6);
    }

    #[test]
    fn test_interleave_empty() {
        assert!(interleave(vec![]).is_empty());
        assert!(interleave(vec![vec![], vec![]]).is_empty());
    }

    /// Live search against the real platforms.
    /// Run with: cargo test live_search -- --ignored
    #[tokio::test]
    #[ignore]
    async fn live_search_returns_results() {
        let config = crate::config::Config::default();
        let client = config.http_client().unwrap();
        let songs = search_all(
            &client,
            "周杰伦",
            &[SourceKind::Netease, SourceKind::Kugou],
            10,
        )
        .await;
        assert!(!songs.is_empty(), "no results from any platform");
        assert!(songs.iter().all(|s| !s.title.is_empty()));
    }
}
