//! Structured slogan brief: sets of selected tags plus free-text preferences.

use serde::{Deserialize, Serialize};

use super::FieldValues;
use super::fields;

pub const INDUSTRY_OPTIONS: &[&str] = &["Technology", "Food & Beverage", "Health", "Fashion", "Finance", "Education"];
pub const TONE_OPTIONS: &[&str] = &["Fun", "Professional", "Edgy", "Bold", "Friendly"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SloganBrief {
    pub company_name: String,
    pub industries: Vec<String>,
    pub audiences: Vec<String>,
    pub tones: Vec<String>,
    pub themes: Vec<String>,
    pub styles: Vec<String>,
    pub preferences: String,
}

/// Preset tags offered by the slogan studio form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SloganOptions {
    pub industries: &'static [&'static str],
    pub tones: &'static [&'static str],
}

pub const SLOGAN_OPTIONS: SloganOptions = SloganOptions { industries: INDUSTRY_OPTIONS, tones: TONE_OPTIONS };

impl SloganBrief {
    /// Flatten into the slogan field table; tag sets join with `", "`.
    #[must_use]
    pub fn to_fields(&self) -> FieldValues {
        FieldValues::new()
            .with(fields::COMPANY_NAME, self.company_name.as_str())
            .with(fields::INDUSTRIES, self.industries.join(", "))
            .with(fields::AUDIENCES, self.audiences.join(", "))
            .with(fields::TONES, self.tones.join(", "))
            .with(fields::THEMES, self.themes.join(", "))
            .with(fields::STYLES, self.styles.join(", "))
            .with(fields::PREFERENCES, self.preferences.as_str())
    }

    #[must_use]
    pub fn from_fields(values: &FieldValues) -> Self {
        let tags = |name: &str| -> Vec<String> {
            values
                .get(name)
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_owned)
                .collect()
        };
        Self {
            company_name: values.trimmed(fields::COMPANY_NAME).to_owned(),
            industries: tags(fields::INDUSTRIES),
            audiences: tags(fields::AUDIENCES),
            tones: tags(fields::TONES),
            themes: tags(fields::THEMES),
            styles: tags(fields::STYLES),
            preferences: values.trimmed(fields::PREFERENCES).to_owned(),
        }
    }
}

#[cfg(test)]
#[path = "slogan_test.rs"]
mod tests;
