//! Typed access to the three guideline preferences

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use ratatui::style::Color;
use regex::Regex;

use crate::config::{PreferenceKind, PreferencesManager};

pub const COLUMNS_KEY: &str = "guidelines.columns";
pub const COLOR_KEY: &str = "guidelines.columnColor";
pub const ENABLED_KEY: &str = "guidelines.enabled";

pub const DEFAULT_COLUMNS: i64 = 80;
pub const DEFAULT_COLOR: &str = "#B0B4B9";
pub const DEFAULT_ENABLED: bool = true;

pub const MIN_COLUMNS: i64 = 1;
pub const MAX_COLUMNS: i64 = 1000;

static HEX_COLOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").expect("valid hex pattern"));

/// Whether `value` is a `#RGB` or `#RRGGBB` colour
pub fn is_hex_color(value: &str) -> bool {
    HEX_COLOR.is_match(value)
}

/// Parse a `#RGB` or `#RRGGBB` colour
pub fn parse_hex_color(value: &str) -> Option<Color> {
    if !is_hex_color(value) {
        return None;
    }

    let digits = &value[1..];
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    if digits.len() == 3 {
        // #abc expands to #aabbcc
        let expand = |i: usize| channel(&digits[i..i + 1]).map(|v| v * 17);
        Some(Color::Rgb(expand(0)?, expand(1)?, expand(2)?))
    } else {
        Some(Color::Rgb(
            channel(&digits[0..2])?,
            channel(&digits[2..4])?,
            channel(&digits[4..6])?,
        ))
    }
}

/// Cached guideline preferences
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuidelineSettings {
    pub columns: i64,
    pub column_color: String,
    pub enabled: bool,
}

impl Default for GuidelineSettings {
    fn default() -> Self {
        Self {
            columns: DEFAULT_COLUMNS,
            column_color: DEFAULT_COLOR.to_string(),
            enabled: DEFAULT_ENABLED,
        }
    }
}

impl GuidelineSettings {
    /// Declare the guideline preferences and their defaults
    pub fn define(preferences: &mut PreferencesManager) -> Result<()> {
        preferences.define_preference(COLUMNS_KEY, PreferenceKind::Number, DEFAULT_COLUMNS)?;
        preferences.define_preference(COLOR_KEY, PreferenceKind::String, DEFAULT_COLOR)?;
        preferences.define_preference(ENABLED_KEY, PreferenceKind::Boolean, DEFAULT_ENABLED)?;
        Ok(())
    }

    /// Read the current values, using defaults for anything missing
    pub fn load(preferences: &PreferencesManager) -> Self {
        let columns = preferences
            .get_number(COLUMNS_KEY)
            .filter(|n| n.is_finite())
            .map(|n| n.trunc() as i64)
            .unwrap_or(DEFAULT_COLUMNS);

        Self {
            columns,
            column_color: preferences
                .get_string(COLOR_KEY)
                .unwrap_or_else(|| DEFAULT_COLOR.to_string()),
            enabled: preferences.get_bool(ENABLED_KEY).unwrap_or(DEFAULT_ENABLED),
        }
    }

    /// Write all three values
    pub fn store(&self, preferences: &mut PreferencesManager) -> Result<()> {
        preferences
            .set(COLUMNS_KEY, self.columns)
            .context("Failed to store guideline column")?;
        preferences
            .set(COLOR_KEY, self.column_color.as_str())
            .context("Failed to store guideline color")?;
        preferences
            .set(ENABLED_KEY, self.enabled)
            .context("Failed to store guideline enabled flag")?;
        Ok(())
    }

    /// Column to draw at; out-of-range values fall back to the default
    pub fn effective_columns(&self) -> u16 {
        if (MIN_COLUMNS..=MAX_COLUMNS).contains(&self.columns) {
            self.columns as u16
        } else {
            DEFAULT_COLUMNS as u16
        }
    }

    /// Colour to draw with; unparsable values fall back to the default
    pub fn effective_color(&self) -> Color {
        parse_hex_color(&self.column_color)
            .or_else(|| parse_hex_color(DEFAULT_COLOR))
            .unwrap_or(Color::Gray)
    }
}
