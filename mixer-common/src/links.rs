//! YouTube link extraction from chat messages

use once_cell::sync::Lazy;
use regex::Regex;

/// Full links on youtube.com, www.youtube.com and music.youtube.com.
/// Short youtu.be links are not matched.
static YOUTUBE_LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"https?://(?:www\.)?(?:music\.)?youtube\.com/[^\s]+")
        .expect("YouTube link pattern is valid")
});

/// 11-character video id after `v=` or a path separator
static VIDEO_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:v=|/)([0-9A-Za-z_-]{11})")
        .expect("video id pattern is valid")
});

/// Return every YouTube link in `text`, in document order.
///
/// Links are not checked for playability here.
pub fn extract_youtube_links(text: Option<&str>) -> Vec<String> {
    let Some(text) = text else {
        return Vec::new();
    };

    YOUTUBE_LINK
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Pull the video id out of a YouTube URL.
pub fn extract_video_id(url: &str) -> Option<String> {
    VIDEO_ID
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
