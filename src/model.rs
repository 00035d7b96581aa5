//! Common song representation shared by all source clients.

/// A single search hit from one platform.
///
/// Every field is a plain string so the projection to JSON output is
/// lossless; a source leaves the fields it has no data for empty. The
/// platform-specific keys (`mid`, `hash`, `content_id`) are what the
/// resolve entry point needs to re-identify the song later without
/// searching again.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Song {
    pub id: String,
    pub title: String,
    pub singer: String,
    pub album: String,
    /// Formatted as `mm:ss`; empty when the platform did not report one.
    pub duration: String,
    pub source: String,
    pub song_url: String,
    /// QQ Music song mid.
    pub mid: String,
    /// Kugou file hash.
    pub hash: String,
    /// Migu copyright/content id.
    pub content_id: String,
}

/// Render a duration in whole seconds as `mm:ss`.
///
/// Platforms report durations in seconds or milliseconds; callers divide
/// down to seconds first. Minutes are not wrapped at 60 so an hour-long
/// mix renders as `74:05` rather than losing time.
pub fn format_duration(total_seconds: u64) -> String {
    format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "00:00");
        assert_eq!(format_duration(59), "00:59");
        assert_eq!(format_duration(225), "03:45");
    }

    #[test]
    fn test_format_duration_over_an_hour() {
        assert_eq!(format_duration(74 * 60 + 5), "74:05");
    }

    #[test]
    fn test_default_song_is_all_empty() {
        let song = Song::default();
        assert!(song.id.is_empty());
        assert!(song.song_url.is_empty());
        assert!(song.content_id.is_empty());
    }
}
