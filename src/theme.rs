// Light/dark theme controller.
// Persists the preference, toggles the body class, and derives RGB custom properties.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Body class present while the dark theme is active.
pub const DARK_CLASS: &str = "dark-theme";

/// Custom properties read from the root element and their derived RGB variants.
const RGB_VARIABLES: [(&str, &str); 2] = [
    ("--bg-color", "--bg-color-rgb"),
    ("--accent-color", "--accent-color-rgb"),
];

/// Page color theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme: {}", other)),
        }
    }
}

/// Document capabilities the theme controller needs.
pub trait ThemeHost {
    /// Persisted theme preference, if any.
    fn stored_theme(&self) -> Option<Theme>;
    fn store_theme(&mut self, theme: Theme);
    /// Whether the OS-level color scheme preference is dark.
    fn prefers_dark(&self) -> bool;
    fn has_dark_class(&self) -> bool;
    fn set_dark_class(&mut self, dark: bool);
    /// Computed value of a custom property on the root element.
    fn css_variable(&self, name: &str) -> Option<String>;
    fn set_css_variable(&mut self, name: &str, value: &str);
}

/// Drives theme state on a [`ThemeHost`].
#[derive(Debug, Default)]
pub struct ThemeController;

impl ThemeController {
    pub fn new() -> Self {
        Self
    }

    /// Persisted preference, else OS preference, else light.
    pub fn effective_theme(&self, host: &impl ThemeHost) -> Theme {
        host.stored_theme().unwrap_or(if host.prefers_dark() {
            Theme::Dark
        } else {
            Theme::Light
        })
    }

    /// Apply the effective theme on page load.
    pub fn init(&self, host: &mut impl ThemeHost) -> Theme {
        let theme = self.effective_theme(host);
        self.apply(host, theme);
        theme
    }

    /// Set the body class for `theme` and refresh the RGB variables.
    pub fn apply(&self, host: &mut impl ThemeHost, theme: Theme) {
        host.set_dark_class(theme == Theme::Dark);
        self.update_rgb_variables(host);
    }

    /// Flip the current theme and persist the new one.
    pub fn toggle(&self, host: &mut impl ThemeHost) -> Theme {
        let current = if host.has_dark_class() {
            Theme::Dark
        } else {
            Theme::Light
        };
        let next = current.toggled();
        host.store_theme(next);
        self.apply(host, next);
        tracing::debug!(theme = %next, "Theme toggled");
        next
    }

    fn update_rgb_variables(&self, host: &mut impl ThemeHost) {
        for (source, target) in RGB_VARIABLES {
            let color = host.css_variable(source).unwrap_or_default();
            let [r, g, b] = color_to_rgb(color.trim());
            host.set_css_variable(target, &format!("{}, {}, {}", r, g, b));
        }
    }
}

/// Parse a CSS color into RGB components.
///
/// Understands hex, `rgb()`/`rgba()`, and the names `white` and `black`.
/// Anything else is treated as white. `rgb()` components are taken as
/// written, so out-of-range values like `300` pass through unchanged.
pub fn color_to_rgb(color: &str) -> [u32; 3] {
    const WHITE: [u32; 3] = [255, 255, 255];

    if color.is_empty() {
        return WHITE;
    }

    if let Some(hex) = color.strip_prefix('#') {
        // Leading hex digits only, like a lenient integer parse.
        let digits: String = hex
            .chars()
            .take_while(|c| c.is_ascii_hexdigit())
            .take(16)
            .collect();
        let value = u64::from_str_radix(&digits, 16).unwrap_or(0);
        return [
            ((value >> 16) & 0xff) as u32,
            ((value >> 8) & 0xff) as u32,
            (value & 0xff) as u32,
        ];
    }

    if color.starts_with("rgb") {
        return parse_rgb_function(color).unwrap_or(WHITE);
    }

    match color {
        "white" => WHITE,
        "black" => [0, 0, 0],
        _ => WHITE,
    }
}

/// Extract the first three integers from `rgb(r, g, b)` or `rgba(r, g, b, a)`.
fn parse_rgb_function(color: &str) -> Option<[u32; 3]> {
    let args = color
        .strip_prefix("rgba(")
        .or_else(|| color.strip_prefix("rgb("))?;

    let mut parts = args.splitn(3, ',');
    let r = parts.next()?;
    let g = parts.next()?.trim_start();
    let b = parts.next()?.trim_start();

    let component = |s: &str, whole: bool| -> Option<u32> {
        let digits: String = s.chars().take_while(|c| c.is_ascii_digit()).collect();
        if digits.is_empty() || (whole && digits.len() != s.len()) {
            return None;
        }
        Some(digits.parse::<u32>().unwrap_or(u32::MAX))
    };

    Some([component(r, true)?, component(g, true)?, component(b, false)?])
}
