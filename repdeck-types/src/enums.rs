use serde::{Deserialize, Serialize};

/// Content variant tag carried by every post in the feed payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    #[default]
    Image,
    Video,
    Text,
}

/// The horizontally paged sections of a post card, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Panel {
    Media,
    Details,
    Comments,
}

impl Panel {
    pub const ALL: [Panel; 3] = [Panel::Media, Panel::Details, Panel::Comments];
    pub const COUNT: usize = Self::ALL.len();

    pub fn index(&self) -> usize {
        match self {
            Panel::Media => 0,
            Panel::Details => 1,
            Panel::Comments => 2,
        }
    }

    /// Out-of-range indices clamp to the last panel.
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index.min(Self::COUNT - 1)]
    }

    pub fn title(&self) -> &'static str {
        match self {
            Panel::Media => "Media",
            Panel::Details => "Details",
            Panel::Comments => "Comments",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ColorScheme {
    #[default]
    Default,
    Dark,
    Light,
}

impl ColorScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorScheme::Default => "Default",
            ColorScheme::Dark => "Dark",
            ColorScheme::Light => "Light",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "default" => Some(ColorScheme::Default),
            "dark" => Some(ColorScheme::Dark),
            "light" => Some(ColorScheme::Light),
            _ => None,
        }
    }
}
