use std::str::FromStr;

use clap::Parser;
use tracing::{info, warn};

use crate::config::Config;
use crate::model::Song;
use crate::output::{emit, page_slice, ErrorOutput, SearchOutput, SongItem};
use crate::search::search_all;
use crate::sources::{parse_sources, provider, SourceKind};

#[derive(Parser, Debug)]
#[command(name = "musicdl-search")]
#[command(about = "Search music platforms and print one page of results as JSON")]
pub struct SearchArgs {
    /// Search keyword
    #[arg(value_name = "KEYWORD")]
    pub keyword: String,

    /// 1-indexed page number
    #[arg(value_name = "PAGE")]
    pub page: usize,

    /// Items per page
    #[arg(value_name = "PAGE_SIZE")]
    pub page_size: usize,

    /// Comma-separated source list (qq,kugou,migu,netease)
    #[arg(value_name = "SOURCES")]
    pub sources: String,

    /// Resolve stream URLs for the first N items of the page
    #[arg(value_name = "RESOLVE_LIMIT", default_value_t = 0)]
    pub resolve_limit: usize,
}

/// Entry point for `musicdl-search`.
///
/// A malformed invocation (missing or non-numeric arguments) prints
/// `{"error":"args"}`; nothing here returns a non-zero exit code.
pub async fn run<I>(args: I)
where
    I: IntoIterator<Item = String>,
{
    match SearchArgs::try_parse_from(args) {
        Ok(args) => execute(args).await,
        Err(_) => emit(&ErrorOutput::args()),
    }
}

async fn execute(args: SearchArgs) {
    let config = Config::load().unwrap_or_else(|err| {
        warn!("Falling back to default config: {}", err);
        Config::default()
    });

    let client = match config.http_client() {
        Ok(client) => client,
        Err(err) => {
            warn!("Failed to build HTTP client: {}", err);
            emit(&SearchOutput {
                items: Vec::new(),
                total: 0,
            });
            return;
        }
    };

    let sources = parse_sources(&args.sources);
    // Fetch enough from every source to fill all pages up to the one asked for.
    let want = args.page.saturating_mul(args.page_size);

    let songs = search_all(&client, &args.keyword, &sources, want).await;
    let total = songs.len();
    info!("'{}': {} results across {} sources", args.keyword, total, sources.len());

    let mut page: Vec<Song> = page_slice(&songs, args.page, args.page_size).to_vec();
    blank_past_limit(&mut page, args.resolve_limit);
    for song in page.iter_mut().take(args.resolve_limit) {
        resolve_in_place(&client, song).await;
    }

    emit(&SearchOutput {
        items: page.iter().map(SongItem::from).collect(),
        total,
    });
}

/// Stream URLs are only reported for the first `resolve_limit` items.
/// Some platforms (migu) hand a URL out at search time already; past the
/// limit those are blanked too, within it they count as a free resolution.
fn blank_past_limit(page: &mut [Song], resolve_limit: usize) {
    for song in page.iter_mut().skip(resolve_limit) {
        song.song_url.clear();
    }
}

/// Best-effort resolution for one page item; failure leaves the URL empty.
async fn resolve_in_place(client: &reqwest::Client, song: &mut Song) {
    if !song.song_url.is_empty() {
        return;
    }
    let Ok(kind) = SourceKind::from_str(&song.source) else {
        return;
    };
    if let Err(err) = provider(kind, client.clone()).resolve(song).await {
        warn!("resolve on {} failed for '{}': {}", song.source, song.title, err);
        song.song_url.clear();
    }
}
