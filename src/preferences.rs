//! User preferences
//!
//! Process-wide settings that outlive any one conversation. They are read
//! once at startup and written back on every change; callers pass the
//! current value explicitly into session and exchange operations.

use crate::store::{
    KeyValueStore, StoreResult, PREF_BREVITY, PREF_FONT_SIZE, PREF_LETTER_SPACING,
    PREF_LINE_HEIGHT,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_FONT_SIZE: u32 = 16;
pub const DEFAULT_LETTER_SPACING: i32 = 0;
pub const DEFAULT_LINE_HEIGHT: f64 = 1.2;

pub const FONT_SIZE_RANGE: (u32, u32) = (12, 24);
pub const LETTER_SPACING_RANGE: (i32, i32) = (-5, 3);
pub const LINE_HEIGHT_RANGE: (f64, f64) = (0.5, 2.5);

/// Response style requested from the remote model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Brevity {
    Brief,
    #[default]
    Normal,
    Detailed,
}

impl Brevity {
    pub fn as_str(self) -> &'static str {
        match self {
            Brevity::Brief => "brief",
            Brevity::Normal => "normal",
            Brevity::Detailed => "detailed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "brief" => Some(Brevity::Brief),
            "normal" => Some(Brevity::Normal),
            "detailed" => Some(Brevity::Detailed),
            _ => None,
        }
    }

    /// Sentence appended to the system prompt
    pub fn directive(self) -> &'static str {
        match self {
            Brevity::Brief => "Please keep your responses concise and to the point.",
            Brevity::Normal => "Provide balanced responses.",
            Brevity::Detailed => "Please provide detailed and thorough responses.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub response_style: Brevity,
    pub font_size: u32,
    pub letter_spacing: i32,
    pub line_height: f64,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            response_style: Brevity::default(),
            font_size: DEFAULT_FONT_SIZE,
            letter_spacing: DEFAULT_LETTER_SPACING,
            line_height: DEFAULT_LINE_HEIGHT,
        }
    }
}

impl Preferences {
    /// Force every presentation value into its slider range
    #[must_use]
    pub fn clamped(self) -> Self {
        let line_height = if self.line_height.is_finite() {
            let clamped = self.line_height.clamp(LINE_HEIGHT_RANGE.0, LINE_HEIGHT_RANGE.1);
            (clamped * 10.0).round() / 10.0
        } else {
            DEFAULT_LINE_HEIGHT
        };

        Self {
            response_style: self.response_style,
            font_size: self.font_size.clamp(FONT_SIZE_RANGE.0, FONT_SIZE_RANGE.1),
            letter_spacing: self
                .letter_spacing
                .clamp(LETTER_SPACING_RANGE.0, LETTER_SPACING_RANGE.1),
            line_height,
        }
    }

    /// Apply a partial update; unspecified fields keep their value
    #[must_use]
    pub fn apply(self, update: &PreferencesUpdate) -> Self {
        Self {
            response_style: update.response_style.unwrap_or(self.response_style),
            font_size: update.font_size.unwrap_or(self.font_size),
            letter_spacing: update.letter_spacing.unwrap_or(self.letter_spacing),
            line_height: update.line_height.unwrap_or(self.line_height),
        }
        .clamped()
    }

    /// Whether moving to `next` requires re-priming conversations
    pub fn changes_priming(&self, next: &Preferences) -> bool {
        self.response_style != next.response_style
    }
}

/// Partial preference change sent by the UI
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesUpdate {
    pub response_style: Option<Brevity>,
    pub font_size: Option<u32>,
    pub letter_spacing: Option<i32>,
    pub line_height: Option<f64>,
}

/// Durable preference persistence over the `pref:*` keys
pub struct PreferenceStore<S> {
    store: S,
}

impl<S: KeyValueStore> PreferenceStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Read all preferences; missing or unparseable values fall back to defaults
    pub fn load(&self) -> StoreResult<Preferences> {
        let defaults = Preferences::default();

        let response_style = self
            .store
            .get(PREF_BREVITY)?
            .and_then(|v| Brevity::parse(&v))
            .unwrap_or(defaults.response_style);
        let font_size = self
            .store
            .get(PREF_FONT_SIZE)?
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(defaults.font_size);
        let letter_spacing = self
            .store
            .get(PREF_LETTER_SPACING)?
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(defaults.letter_spacing);
        let line_height = self
            .store
            .get(PREF_LINE_HEIGHT)?
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(defaults.line_height);

        Ok(Preferences {
            response_style,
            font_size,
            letter_spacing,
            line_height,
        }
        .clamped())
    }

    /// Write every preference key in one transaction
    pub fn save(&self, preferences: &Preferences) -> StoreResult<()> {
        let font_size = preferences.font_size.to_string();
        let letter_spacing = preferences.letter_spacing.to_string();
        let line_height = preferences.line_height.to_string();
        self.store.set_many(&[
            (PREF_BREVITY, preferences.response_style.as_str()),
            (PREF_FONT_SIZE, &font_size),
            (PREF_LETTER_SPACING, &letter_spacing),
            (PREF_LINE_HEIGHT, &line_height),
        ])
    }
}
