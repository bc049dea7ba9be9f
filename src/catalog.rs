//! Closed sets of category icons and colors.
//!
//! The picker offers a fixed list of icon names and hex colors. User input
//! outside these tables is rejected. Categories coming back from the server
//! with a value off the table are shown with [`FALLBACK_ICON`] or
//! [`DEFAULT_COLOR`] instead.
use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::error::ValidationError;

/// Icon names offered by the category picker, in picker order.
const ICONS: &[&str] = &[
    "home", "radio", "cart", "heart", "person", "settings",
    "star", "book", "camera", "car", "airplane", "alarm",
    "analytics", "apps", "archive", "attach", "barbell", "basket",
    "bluetooth", "briefcase", "build", "bulb", "bus", "business",
    "cafe", "calendar", "call", "cash", "chatbox", "checkbox",
    "clipboard", "cloud", "code", "compass", "construct", "copy",
    "document", "download", "earth", "easel", "egg", "exit",
    "eye", "film", "filter", "finger-print", "fish", "flag",
    "flash", "flask", "flower", "folder", "football", "game-controller",
    "gift", "grid", "hammer", "happy", "headset", "help",
    "hourglass", "ice-cream", "image", "infinite", "information", "journal",
    "key", "language", "laptop", "layers", "leaf", "library",
    "link", "list", "location", "lock-closed", "lock-open", "mail",
    "map", "medal", "medical", "megaphone", "menu", "mic",
    "moon", "musical-note", "newspaper", "notifications", "nutrition", "pencil",
    "people", "pie-chart", "pin", "planet", "play", "print",
    "pulse", "rocket", "school", "search", "send", "share",
    "shield", "shirt", "shuffle", "stopwatch", "sunny", "tennisball",
    "thumbs-up", "time", "trophy", "umbrella", "videocam", "wallet",
    "warning", "water", "wifi", "wine", "home-outline", "cart-outline",
    "heart-outline", "person-outline", "settings-outline", "star-outline", "book-outline", "camera-outline",
    "car-outline", "airplane-outline", "alarm-outline", "analytics-outline", "apps-outline", "archive-outline",
    "barbell-outline", "basket-outline", "bluetooth-outline", "briefcase-outline", "build-outline", "bulb-outline",
    "bus-outline", "business-outline", "cafe-outline", "calendar-outline", "call-outline", "cash-outline",
    "chatbox-outline", "checkbox-outline", "clipboard-outline", "cloud-outline", "code-outline", "compass-outline",
    "construct-outline", "copy-outline", "document-outline", "download-outline", "earth-outline", "easel-outline",
    "egg-outline", "exit-outline", "eye-outline", "film-outline", "filter-outline", "finger-print-outline",
    "fish-outline", "flag-outline", "flash-outline", "flask-outline", "flower-outline", "folder-outline",
    "football-outline", "game-controller-outline", "gift-outline", "grid-outline", "hammer-outline", "happy-outline",
    "headset-outline", "help-circle", "hourglass-outline", "ice-cream-outline", "image-outline", "images-outline",
    "infinite-outline", "information-circle", "information-outline", "journal-outline", "key-outline", "language-outline",
    "laptop-outline", "layers-outline", "leaf-outline", "library-outline", "link-outline", "list-outline",
    "location-outline", "lock-closed-outline", "lock-open-outline", "mail-outline", "map-outline", "medal-outline",
    "medical-outline", "megaphone-outline", "menu-outline", "mic-outline", "moon-outline", "musical-note-outline",
    "newspaper-outline", "notifications-outline", "nutrition-outline", "pencil-outline", "people-outline", "phone-portrait-outline",
    "pie-chart-outline", "pin-outline", "planet-outline", "play-outline", "power-outline", "pricetag-outline",
    "print-outline", "pulse-outline", "push-outline", "radio-outline", "refresh-outline", "reload-outline",
    "remove-outline", "restaurant-outline", "return-down-back-outline", "rocket-outline", "save-outline", "scan-outline",
    "school-outline", "search-outline", "send-outline", "share-outline", "shield-outline", "shirt-outline",
    "shuffle-outline", "skull-outline", "snow-outline", "speedometer-outline", "square-outline", "stop-outline",
    "stopwatch-outline", "sunny-outline", "swap-horizontal-outline", "sync-outline", "tablet-landscape-outline", "tablet-portrait-outline",
    "tennisball-outline", "terminal-outline", "text-outline", "thermometer-outline", "thumbs-down-outline", "thumbs-up-outline",
    "thunderstorm-outline", "time-outline", "timer-outline", "today-outline", "toggle-outline", "trail-sign-outline",
    "train-outline", "transgender-outline", "trash-outline", "trophy-outline", "tv-outline", "umbrella-outline",
    "videocam-outline", "volume-high-outline", "walk-outline", "wallet-outline", "warning-outline", "watch-outline",
    "water-outline", "wifi-outline", "wine-outline", "woman-outline",
];

/// Colors offered by the category picker, in picker order.
const COLORS: &[&str] = &[
    "#FF7306", "#FF0A0A", "#0A0AFF", "#0AFF0A", "#FFFF0A", "#0AFFFF",
    "#FF69B4", "#1E90FF", "#48d1cc", "#FFD700", "#FF4500", "#FF6347",
    "#DA70D6", "#DC143C", "#00BFFF", "#40E0D0", "#BA55D3", "#FF1493",
    "#FFA500", "#FFDB58", "#00FF7F", "#32CD32", "#00CED1", "#FF0080",
    "#FF5722", "#FFEB3B", "#E91E63", "#4CAF50", "#FF9800", "#9C27B0",
    "#FFC107", "#00BFAE", "#E64A19", "#C2185B", "#8BC34A", "#FF4081",
    "#03A9F4", "#8E24AA", "#CDDC39", "#7C4DFF", "#FF6F00",
];

/// Color preselected when the create-category form opens.
pub const DEFAULT_COLOR: Color = Color(COLORS[0]);

/// Shown for a stored category whose icon is no longer offered.
pub const FALLBACK_ICON: Icon = Icon("folder");

// ============================================================================
// Icon
// ============================================================================

/// A category icon drawn from [`Icon::all`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "&'static str")]
pub struct Icon(&'static str);

impl Icon {
    /// Look up an icon by name. Names are case-sensitive.
    pub fn parse(name: &str) -> Result<Self, ValidationError> {
        ICONS
            .iter()
            .copied()
            .find(|candidate| *candidate == name)
            .map(Icon)
            .ok_or_else(|| ValidationError::UnknownIcon(name.to_owned()))
    }

    pub fn as_str(self) -> &'static str {
        self.0
    }

    pub fn all() -> impl Iterator<Item = Icon> {
        ICONS.iter().copied().map(Icon)
    }
}

impl<'de> Deserialize<'de> for Icon {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Icon::parse(&name).map_err(de::Error::custom)
    }
}

impl From<Icon> for &'static str {
    fn from(icon: Icon) -> Self {
        icon.0
    }
}

impl fmt::Display for Icon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.0)
    }
}

// ============================================================================
// Color
// ============================================================================

/// A category color drawn from [`Color::all`].
///
/// Lookup ignores ASCII case, so `#ff7306` resolves to the table entry
/// `#FF7306`. The table spelling is what gets sent back to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "&'static str")]
pub struct Color(&'static str);

impl Color {
    pub fn parse(hex: &str) -> Result<Self, ValidationError> {
        let hex = hex.trim();
        COLORS
            .iter()
            .copied()
            .find(|candidate| candidate.eq_ignore_ascii_case(hex))
            .map(Color)
            .ok_or_else(|| ValidationError::UnknownColor(hex.to_owned()))
    }

    pub fn as_str(self) -> &'static str {
        self.0
    }

    pub fn all() -> impl Iterator<Item = Color> {
        COLORS.iter().copied().map(Color)
    }
}

impl Default for Color {
    fn default() -> Self {
        DEFAULT_COLOR
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        Color::parse(&hex).map_err(de::Error::custom)
    }
}

impl From<Color> for &'static str {
    fn from(color: Color) -> Self {
        color.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icon_known_name() {
        let icon = Icon::parse("book-outline").unwrap();
        assert_eq!(icon.as_str(), "book-outline");
    }

    #[test]
    fn test_icon_unknown_name_rejected() {
        let err = Icon::parse("unicorn").unwrap_err();
        assert!(matches!(err, ValidationError::UnknownIcon(ref n) if n == "unicorn"));
    }

    #[test]
    fn test_icon_table_has_no_duplicates() {
        let mut seen = std::collections::HashSet::new();
        for icon in Icon::all() {
            assert!(seen.insert(icon.as_str()), "duplicate icon {}", icon);
        }
    }

    #[test]
    fn test_color_case_insensitive_lookup() {
        let color = Color::parse("#ff7306").unwrap();
        assert_eq!(color.as_str(), "#FF7306");
        assert_eq!(Color::parse("#48D1CC").unwrap().as_str(), "#48d1cc");
    }

    #[test]
    fn test_color_unknown_rejected() {
        assert!(matches!(
            Color::parse("#123456"),
            Err(ValidationError::UnknownColor(_))
        ));
    }

    #[test]
    fn test_fallback_icon_is_in_table() {
        assert_eq!(Icon::parse(FALLBACK_ICON.as_str()).unwrap(), FALLBACK_ICON);
    }

    #[test]
    fn test_default_color_is_first_entry() {
        assert_eq!(Color::default().as_str(), "#FF7306");
    }

    #[test]
    fn test_serde_rejects_unknown_icon() {
        let result: Result<Icon, _> = serde_json::from_str("\"not-an-icon\"");
        assert!(result.is_err());
        let icon: Icon = serde_json::from_str("\"wine\"").unwrap();
        assert_eq!(serde_json::to_string(&icon).unwrap(), "\"wine\"");
    }

    #[test]
    fn test_deserialize_from_borrowed_input() {
        #[derive(Deserialize)]
        struct Row {
            icono: Icon,
            color: Color,
        }
        let input = String::from(r##"{"icono": "book", "color": "#ff7306"}"##);
        let row: Row = serde_json::from_str(&input).unwrap();
        assert_eq!(row.icono.as_str(), "book");
        assert_eq!(row.color, DEFAULT_COLOR);
    }
}
