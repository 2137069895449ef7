use serde_json::Value;

use super::dom::{self, Page};
use super::embedded;
use crate::error::Result;

const VIDEO_PLAYER: &str = r#"div[youtube-api="lesson.youtubeApi"]"#;

/// YouTube id of the lesson video.
pub fn video_id(page: &Page) -> Result<String> {
    let player = page.find(VIDEO_PLAYER)?;
    Ok(dom::attr(player, "video-id", VIDEO_PLAYER)?.trim().to_string())
}

/// Practice payload of a practice page. `None` when the lesson has no practice.
pub fn practice(html: &str) -> Result<Option<Value>> {
    Ok(embedded::lesson_data(html)?.practice)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn video_id_from_fixture() {
        let html = std::fs::read_to_string("tests/fixtures/lesson.html").unwrap();
        assert_eq!(video_id(&Page::parse(&html, "lesson")).unwrap(), "dQw4w9WgXcQ");
    }

    #[test]
    fn practice_from_fixture() {
        let html = std::fs::read_to_string("tests/fixtures/practice.html").unwrap();
        let activity = practice(&html).unwrap().unwrap();
        assert_eq!(activity["type"], "select-right");
        assert_eq!(activity["options"].as_array().map(Vec::len), Some(3));
    }

    #[test]
    fn page_without_player_fails() {
        assert!(video_id(&Page::parse("<div></div>", "lesson")).is_err());
    }
}
