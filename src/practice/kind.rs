use std::fmt;

/// Closed vocabulary of interactive widgets a practice page can embed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityKind {
    SelectRight,
    SwitchesText,
    StrikeThrough,
    TagCloud,
    SwipeSelector,
    TwitterDragAndDrop,
    ImageSlider,
    TextDrawer,
    BooleanSelector,
    Unrecognized(String),
}

impl ActivityKind {
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "select-right" => ActivityKind::SelectRight,
            "switches-text" => ActivityKind::SwitchesText,
            "strike-through" => ActivityKind::StrikeThrough,
            "tag-cloud" => ActivityKind::TagCloud,
            "swipe-selector" => ActivityKind::SwipeSelector,
            "twitter-draganddrop" => ActivityKind::TwitterDragAndDrop,
            "image-slider" => ActivityKind::ImageSlider,
            "text-drawer" => ActivityKind::TextDrawer,
            "boolean-selector" => ActivityKind::BooleanSelector,
            other => ActivityKind::Unrecognized(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ActivityKind::SelectRight => "select-right",
            ActivityKind::SwitchesText => "switches-text",
            ActivityKind::StrikeThrough => "strike-through",
            ActivityKind::TagCloud => "tag-cloud",
            ActivityKind::SwipeSelector => "swipe-selector",
            ActivityKind::TwitterDragAndDrop => "twitter-draganddrop",
            ActivityKind::ImageSlider => "image-slider",
            ActivityKind::TextDrawer => "text-drawer",
            ActivityKind::BooleanSelector => "boolean-selector",
            ActivityKind::Unrecognized(raw) => raw,
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_names_round_trip() {
        for name in [
            "select-right",
            "switches-text",
            "strike-through",
            "tag-cloud",
            "swipe-selector",
            "twitter-draganddrop",
            "image-slider",
            "text-drawer",
            "boolean-selector",
        ] {
            let kind = ActivityKind::parse(name);
            assert!(!matches!(kind, ActivityKind::Unrecognized(_)), "{}", name);
            assert_eq!(kind.as_str(), name);
        }
    }

    #[test]
    fn unknown_name_is_kept() {
        assert_eq!(
            ActivityKind::parse("unknown-widget"),
            ActivityKind::Unrecognized("unknown-widget".into())
        );
    }
}
