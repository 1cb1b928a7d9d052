//! Prompt composition: typed form fields in, one structured instruction out.
//!
//! DESIGN
//! ======
//! Each asset type owns a field-descriptor table (`fields`). Validation and
//! composition both read that table, so a field can never be validated but
//! silently left out of the prompt (or the reverse). Composition is a pure
//! function of the form. Same fields, same ratio and same reference-image
//! flag give byte-identical text.

pub mod compose;
pub mod fields;
pub mod slogan;

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use compose::{AuxParams, CardSide, ComposedPrompt, Composition, CompositionMode, compose};
pub use fields::{FieldDescriptor, FieldRole, FieldStyle};
pub use slogan::{SLOGAN_OPTIONS, SloganBrief, SloganOptions};

// =============================================================================
// ASSET TYPE
// =============================================================================

/// Category of marketing artifact being generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetType {
    Logo,
    BusinessCard,
    YardSign,
    Banner,
    Flyer,
    Slogan,
    Claim,
    Video,
}

impl AssetType {
    /// Short tag passed to the graphics endpoint alongside the prompt.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::Logo => "Logo",
            Self::BusinessCard => "Business Card",
            Self::YardSign => "Yard Sign",
            Self::Banner => "Banner",
            Self::Flyer => "Flyer",
            Self::Slogan => "Slogan",
            Self::Claim => "Claim",
            Self::Video => "Video",
        }
    }

    /// Heading used on the `Asset Type:` line of composed prompts.
    #[must_use]
    pub fn heading(self) -> &'static str {
        match self {
            Self::Logo => "Company Logo",
            Self::BusinessCard => "Business Card",
            Self::YardSign => "Yard Sign",
            Self::Banner => "Marketing Banner",
            Self::Flyer => "Promotional Flyer",
            Self::Slogan => "Slogan Set",
            Self::Claim => "Restoration Claim",
            Self::Video => "Animated Memory",
        }
    }

    /// Asset types rendered by the image-generation endpoint.
    #[must_use]
    pub fn is_graphic(self) -> bool {
        matches!(self, Self::Logo | Self::BusinessCard | Self::YardSign | Self::Banner | Self::Flyer)
    }

    /// Asset types whose studio refuses to submit without a reference image.
    #[must_use]
    pub fn requires_reference_image(self) -> bool {
        matches!(self, Self::BusinessCard | Self::YardSign | Self::Banner | Self::Flyer | Self::Video)
    }

    /// Ratio forced by the studio regardless of caller input.
    #[must_use]
    pub fn fixed_aspect_ratio(self) -> Option<AspectRatio> {
        match self {
            Self::YardSign => Some(AspectRatio::Landscape),
            Self::Banner | Self::Video => Some(AspectRatio::Wide),
            Self::Flyer => Some(AspectRatio::Portrait),
            _ => None,
        }
    }

    #[must_use]
    pub fn default_aspect_ratio(self) -> AspectRatio {
        match self {
            Self::BusinessCard => AspectRatio::Wide,
            other => other.fixed_aspect_ratio().unwrap_or(AspectRatio::Square),
        }
    }

    /// Resolve the ratio a request actually uses: fixed ratios win, then
    /// the caller's choice, then the type default.
    #[must_use]
    pub fn resolve_aspect_ratio(self, requested: Option<AspectRatio>) -> AspectRatio {
        self.fixed_aspect_ratio()
            .or(requested)
            .unwrap_or_else(|| self.default_aspect_ratio())
    }
}

// =============================================================================
// ASPECT RATIO
// =============================================================================

/// Supported output aspect ratios, passed verbatim to the image endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AspectRatio {
    /// 1:1
    Square,
    /// 16:9
    Wide,
    /// 9:16
    Tall,
    /// 4:3
    Landscape,
    /// 3:4
    Portrait,
}

/// Layout family a ratio belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatioClass {
    Wide,
    Tall,
    Square,
}

impl AspectRatio {
    pub const ALL: [Self; 5] = [Self::Square, Self::Wide, Self::Tall, Self::Landscape, Self::Portrait];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Square => "1:1",
            Self::Wide => "16:9",
            Self::Tall => "9:16",
            Self::Landscape => "4:3",
            Self::Portrait => "3:4",
        }
    }

    #[must_use]
    pub fn class(self) -> RatioClass {
        match self {
            Self::Square => RatioClass::Square,
            Self::Wide | Self::Landscape => RatioClass::Wide,
            Self::Tall | Self::Portrait => RatioClass::Tall,
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AspectRatio {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|r| r.as_str() == s.trim())
            .ok_or_else(|| format!("unsupported aspect ratio '{s}'"))
    }
}

impl TryFrom<String> for AspectRatio {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AspectRatio> for String {
    fn from(value: AspectRatio) -> Self {
        value.as_str().to_owned()
    }
}

// =============================================================================
// FIELD VALUES
// =============================================================================

/// Named text attributes collected from a studio form.
///
/// Lookups of unset names return `""`: composition never sees a missing
/// value, only an empty one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldValues(HashMap<String, String>);

impl FieldValues {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> &str {
        self.0.get(name).map_or("", String::as_str)
    }

    /// Value with surrounding whitespace removed.
    #[must_use]
    pub fn trimmed(&self, name: &str) -> &str {
        self.get(name).trim()
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.0.insert(name.to_owned(), value.into());
    }

    #[must_use]
    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    #[must_use]
    pub fn is_blank(&self, name: &str) -> bool {
        self.trimmed(name).is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FieldValues {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
