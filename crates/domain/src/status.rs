//! Server status as painted in the side bar: a color and a line of text.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Text shown when the server answered without a status text.
pub const FALLBACK_TEXT: &str = "SERVER ERROR";

/// Color shown when the server answered without a status color.
pub const FALLBACK_COLOR: StatusColor = StatusColor::Red;

/// Text of the synthetic status used when a poll request fails.
pub const DISCONNECTED_TEXT: &str = "Browser Disconnected";

/// Overall health color reported by the monitor endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusColor {
    Green,
    Yellow,
    Red,
}

impl StatusColor {
    /// Lowercase wire name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Red => "red",
        }
    }
}

impl fmt::Display for StatusColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusColor {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "green" => Ok(Self::Green),
            "yellow" => Ok(Self::Yellow),
            "red" => Ok(Self::Red),
            other => Err(ValidationError::UnknownColor(other.to_string())),
        }
    }
}

/// Last status applied to the view.
///
/// Text and color are tracked independently so that each one is repainted
/// (and persisted) only when it actually changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusDisplay {
    text: Option<String>,
    color: Option<StatusColor>,
}

impl StatusDisplay {
    /// Seed the display with previously persisted values.
    #[must_use]
    pub fn restored(text: Option<String>, color: Option<StatusColor>) -> Self {
        Self { text, color }
    }

    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    #[must_use]
    pub fn color(&self) -> Option<StatusColor> {
        self.color
    }

    /// Record `text`; returns `true` when it differs from the current text.
    pub fn apply_text(&mut self, text: &str) -> bool {
        if self.text.as_deref() == Some(text) {
            return false;
        }
        self.text = Some(text.to_string());
        true
    }

    /// Record a color given by its wire name.
    ///
    /// Returns the parsed color when it differs from the current one.
    /// Unknown names leave the display untouched.
    pub fn apply_color(&mut self, name: &str) -> Option<StatusColor> {
        let color = name.parse::<StatusColor>().ok()?;
        if self.color == Some(color) {
            return None;
        }
        self.color = Some(color);
        Some(color)
    }
}
