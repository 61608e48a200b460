//! Types for the conversion catalog.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Media category a conversion rule belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Image,
    Video,
    Audio,
}

impl Category {
    /// Returns the lowercase name used in API responses.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
            Self::Audio => "audio",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Backend tool that performs the byte-level transformation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tool {
    /// In-process image transcoder.
    Image,
    /// External ffmpeg binary for audio/video.
    Ffmpeg,
}

impl Tool {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Ffmpeg => "ffmpeg",
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single supported conversion.
///
/// Identity is the `(from, to)` pair, compared case-insensitively. The
/// catalog guarantees at most one rule per identity across all categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversionRule {
    /// Category used for grouping in API responses.
    pub category: Category,
    /// Source format name (e.g. "JPEG").
    pub from: &'static str,
    /// Target format name (e.g. "PNG").
    pub to: &'static str,
    /// Backend tool that executes this conversion.
    pub tool: Tool,
    /// MIME types accepted for the source file.
    pub source_mimes: &'static [&'static str],
    /// MIME type of the produced artifact.
    pub produced_mime: &'static str,
}

impl ConversionRule {
    /// Whether this rule covers the given `(from, to)` pair.
    pub fn matches(&self, from: &str, to: &str) -> bool {
        self.from.eq_ignore_ascii_case(from) && self.to.eq_ignore_ascii_case(to)
    }

    /// Whether the declared MIME type is accepted as input for this rule.
    pub fn accepts_mime(&self, mime: &str) -> bool {
        self.source_mimes.iter().any(|m| m.eq_ignore_ascii_case(mime))
    }

    /// File extension for artifacts produced by this rule.
    pub fn output_extension(&self) -> String {
        self.to.to_ascii_lowercase()
    }
}
