//! Built-in conversion rule table.

use std::collections::BTreeMap;

use super::types::{Category, ConversionRule, Tool};

/// All supported conversions, grouped by category in declaration order.
///
/// The table is static configuration: a malformed entry (duplicate
/// `(from, to)` identity) is a programming error caught by tests, not a
/// runtime failure mode.
const RULES: &[ConversionRule] = &[
    // Images (in-process transcoder)
    ConversionRule {
        category: Category::Image,
        from: "JPEG",
        to: "PNG",
        tool: Tool::Image,
        source_mimes: &["image/jpeg", "image/jpg"],
        produced_mime: "image/png",
    },
    ConversionRule {
        category: Category::Image,
        from: "PNG",
        to: "JPEG",
        tool: Tool::Image,
        source_mimes: &["image/png"],
        produced_mime: "image/jpeg",
    },
    ConversionRule {
        category: Category::Image,
        from: "WEBP",
        to: "PNG",
        tool: Tool::Image,
        source_mimes: &["image/webp"],
        produced_mime: "image/png",
    },
    ConversionRule {
        category: Category::Image,
        from: "PNG",
        to: "WEBP",
        tool: Tool::Image,
        source_mimes: &["image/png"],
        produced_mime: "image/webp",
    },
    ConversionRule {
        category: Category::Image,
        from: "JPEG",
        to: "WEBP",
        tool: Tool::Image,
        source_mimes: &["image/jpeg", "image/jpg"],
        produced_mime: "image/webp",
    },
    ConversionRule {
        category: Category::Image,
        from: "WEBP",
        to: "JPEG",
        tool: Tool::Image,
        source_mimes: &["image/webp"],
        produced_mime: "image/jpeg",
    },
    ConversionRule {
        category: Category::Image,
        from: "BMP",
        to: "PNG",
        tool: Tool::Image,
        source_mimes: &["image/bmp"],
        produced_mime: "image/png",
    },
    ConversionRule {
        category: Category::Image,
        from: "PNG",
        to: "BMP",
        tool: Tool::Image,
        source_mimes: &["image/png"],
        produced_mime: "image/bmp",
    },
    ConversionRule {
        category: Category::Image,
        from: "TIFF",
        to: "PNG",
        tool: Tool::Image,
        source_mimes: &["image/tiff"],
        produced_mime: "image/png",
    },
    ConversionRule {
        category: Category::Image,
        from: "PNG",
        to: "TIFF",
        tool: Tool::Image,
        source_mimes: &["image/png"],
        produced_mime: "image/tiff",
    },
    ConversionRule {
        category: Category::Image,
        from: "GIF",
        to: "PNG",
        tool: Tool::Image,
        source_mimes: &["image/gif"],
        produced_mime: "image/png",
    },
    // Video (ffmpeg)
    ConversionRule {
        category: Category::Video,
        from: "MP4",
        to: "AVI",
        tool: Tool::Ffmpeg,
        source_mimes: &["video/mp4"],
        produced_mime: "video/x-msvideo",
    },
    ConversionRule {
        category: Category::Video,
        from: "AVI",
        to: "MP4",
        tool: Tool::Ffmpeg,
        source_mimes: &["video/x-msvideo"],
        produced_mime: "video/mp4",
    },
    ConversionRule {
        category: Category::Video,
        from: "MOV",
        to: "MP4",
        tool: Tool::Ffmpeg,
        source_mimes: &["video/quicktime"],
        produced_mime: "video/mp4",
    },
    ConversionRule {
        category: Category::Video,
        from: "MP4",
        to: "WEBM",
        tool: Tool::Ffmpeg,
        source_mimes: &["video/mp4"],
        produced_mime: "video/webm",
    },
    ConversionRule {
        category: Category::Video,
        from: "WEBM",
        to: "MP4",
        tool: Tool::Ffmpeg,
        source_mimes: &["video/webm"],
        produced_mime: "video/mp4",
    },
    // Audio (ffmpeg)
    ConversionRule {
        category: Category::Audio,
        from: "MP3",
        to: "WAV",
        tool: Tool::Ffmpeg,
        source_mimes: &["audio/mpeg"],
        produced_mime: "audio/wav",
    },
    ConversionRule {
        category: Category::Audio,
        from: "WAV",
        to: "MP3",
        tool: Tool::Ffmpeg,
        source_mimes: &["audio/wav", "audio/x-wav"],
        produced_mime: "audio/mpeg",
    },
    ConversionRule {
        category: Category::Audio,
        from: "OGG",
        to: "MP3",
        tool: Tool::Ffmpeg,
        source_mimes: &["audio/ogg"],
        produced_mime: "audio/mpeg",
    },
    ConversionRule {
        category: Category::Audio,
        from: "MP3",
        to: "OGG",
        tool: Tool::Ffmpeg,
        source_mimes: &["audio/mpeg"],
        produced_mime: "audio/ogg",
    },
    ConversionRule {
        category: Category::Audio,
        from: "AAC",
        to: "MP3",
        tool: Tool::Ffmpeg,
        source_mimes: &["audio/aac"],
        produced_mime: "audio/mpeg",
    },
];

/// Immutable catalog of supported conversions.
///
/// Loaded once at process start and never mutated, so it can be shared
/// freely across request handlers without locking.
#[derive(Debug)]
pub struct Catalog {
    rules: &'static [ConversionRule],
}

impl Catalog {
    /// Returns the built-in catalog.
    pub fn builtin() -> Self {
        Self { rules: RULES }
    }

    /// All rules in declaration order.
    pub fn all_rules(&self) -> &[ConversionRule] {
        self.rules
    }

    /// Rules grouped by category, preserving declaration order within
    /// each group.
    pub fn rules_by_category(&self) -> BTreeMap<Category, Vec<&ConversionRule>> {
        let mut grouped: BTreeMap<Category, Vec<&ConversionRule>> = BTreeMap::new();
        for rule in self.rules {
            grouped.entry(rule.category).or_default().push(rule);
        }
        grouped
    }

    /// Looks up a rule by its `(from, to)` identity, ignoring tool
    /// availability.
    pub fn find_rule(&self, from: &str, to: &str) -> Option<&ConversionRule> {
        self.rules.iter().find(|r| r.matches(from, to))
    }

    /// Every distinct tool referenced by the catalog.
    pub fn referenced_tools(&self) -> Vec<Tool> {
        let mut tools = Vec::new();
        for rule in self.rules {
            if !tools.contains(&rule.tool) {
                tools.push(rule.tool);
            }
        }
        tools
    }

    /// MIME type for a produced artifact, derived from its file
    /// extension via the rule table.
    pub fn mime_for_extension(&self, extension: &str) -> Option<&'static str> {
        self.rules
            .iter()
            .find(|r| r.to.eq_ignore_ascii_case(extension))
            .map(|r| r.produced_mime)
    }
}
