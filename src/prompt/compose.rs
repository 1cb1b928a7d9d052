//! The prompt composer.
//!
//! Image assets compose in one of two modes. With a reference image the
//! generator is told to re-lay-out the supplied artwork; without one it is
//! told to invent artwork from the brief. Both pick their layout rule from
//! the ratio class (wide / tall / square).

use super::fields::{self, FieldDescriptor, FieldRole, FieldStyle};
use super::{AspectRatio, AssetType, FieldValues, RatioClass};

/// Motion prompt used when the video form leaves it blank.
pub const DEFAULT_MOTION: &str = "Animate this naturally";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositionMode {
    /// Re-lay-out the elements of a supplied reference image.
    Reconfiguration,
    /// Invent icon and typography from the text brief.
    Generative,
}

/// Which face of a business card a prompt renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardSide {
    Back,
    Front,
}

impl CardSide {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Back => "back",
            Self::Front => "front",
        }
    }
}

/// Parameters that travel with the prompt text to the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuxParams {
    pub asset_type: AssetType,
    pub asset_tag: &'static str,
    pub aspect_ratio: AspectRatio,
    pub mode: Option<CompositionMode>,
    pub side: Option<CardSide>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedPrompt {
    pub text: String,
    pub aux: AuxParams,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Composition {
    Single(ComposedPrompt),
    /// Business card: back (contact details) and front (brand), same
    /// reference image and ratio.
    Pair { back: ComposedPrompt, front: ComposedPrompt },
}

impl Composition {
    #[must_use]
    pub fn prompts(&self) -> Vec<&ComposedPrompt> {
        match self {
            Self::Single(p) => vec![p],
            Self::Pair { back, front } => vec![back, front],
        }
    }
}

// =============================================================================
// ENTRY POINT
// =============================================================================

/// Compose the prompt(s) for one submission.
#[must_use]
pub fn compose(
    asset_type: AssetType,
    values: &FieldValues,
    aspect_ratio: AspectRatio,
    reference_image_present: bool,
) -> Composition {
    let mode = if reference_image_present { CompositionMode::Reconfiguration } else { CompositionMode::Generative };
    match asset_type {
        AssetType::BusinessCard => Composition::Pair {
            back: compose_card_side(CardSide::Back, values, aspect_ratio, mode),
            front: compose_card_side(CardSide::Front, values, aspect_ratio, mode),
        },
        AssetType::Logo | AssetType::YardSign | AssetType::Banner | AssetType::Flyer => {
            Composition::Single(compose_graphic(asset_type, values, aspect_ratio, mode))
        }
        AssetType::Claim => Composition::Single(text_prompt(asset_type, compose_claim(values), aspect_ratio)),
        AssetType::Slogan => Composition::Single(text_prompt(asset_type, compose_slogans(values), aspect_ratio)),
        AssetType::Video => {
            let motion = values.trimmed(fields::MOTION);
            let text = if motion.is_empty() { DEFAULT_MOTION.to_owned() } else { motion.to_owned() };
            Composition::Single(text_prompt(asset_type, text, aspect_ratio))
        }
    }
}

fn text_prompt(asset_type: AssetType, text: String, aspect_ratio: AspectRatio) -> ComposedPrompt {
    ComposedPrompt {
        text,
        aux: AuxParams { asset_type, asset_tag: asset_type.tag(), aspect_ratio, mode: None, side: None },
    }
}

// =============================================================================
// GRAPHICS
// =============================================================================

fn design_brief(asset_type: AssetType) -> &'static str {
    match asset_type {
        AssetType::YardSign => "High contrast, readable from distance.",
        AssetType::Banner => "Eye-catching, horizontal layout.",
        AssetType::Flyer => "Professional layout with clear hierarchy.",
        _ => "Distinctive, scalable brand mark.",
    }
}

fn compose_graphic(
    asset_type: AssetType,
    values: &FieldValues,
    aspect_ratio: AspectRatio,
    mode: CompositionMode,
) -> ComposedPrompt {
    let mut lines = vec![format!("Asset Type: {}", asset_type.heading())];
    lines.extend(
        fields::descriptors(asset_type)
            .iter()
            .map(|d| fields::render_line(d, values)),
    );
    lines.push(format!("Design: {}", design_brief(asset_type)));
    lines.push(format!("Target Aspect Ratio: {aspect_ratio}"));
    lines.push(mode_block(mode, aspect_ratio, values));

    ComposedPrompt {
        text: lines.join("\n"),
        aux: AuxParams {
            asset_type,
            asset_tag: asset_type.tag(),
            aspect_ratio,
            mode: Some(mode),
            side: None,
        },
    }
}

fn compose_card_side(
    side: CardSide,
    values: &FieldValues,
    aspect_ratio: AspectRatio,
    mode: CompositionMode,
) -> ComposedPrompt {
    let hidden_role = match side {
        CardSide::Back => FieldRole::Tagline,
        CardSide::Front => FieldRole::Contact,
    };
    let visible: Vec<&FieldDescriptor> = fields::descriptors(AssetType::BusinessCard)
        .iter()
        .filter(|d| d.role != hidden_role)
        .collect();

    let heading = match side {
        CardSide::Back => "Asset Type: Business Card (Back / Info Side)",
        CardSide::Front => "Asset Type: Business Card (Front / Brand Side)",
    };
    let mut lines = vec![heading.to_owned()];
    lines.extend(visible.iter().map(|d| fields::render_line(d, values)));

    if mode == CompositionMode::Reconfiguration {
        lines.push(
            match side {
                CardSide::Back => "STRICT REQUIREMENT: Use the provided [IMAGE] as the logo source.",
                CardSide::Front => {
                    "STRICT REQUIREMENT: Use the provided [IMAGE] as the CENTRAL visual element. \
                     The provided image IS the logo. Center it."
                }
            }
            .to_owned(),
        );
    }
    lines.push(
        match side {
            CardSide::Back => "Design Instructions: Clean, professional layout. Show every contact detail listed above.",
            CardSide::Front => "Design Instructions: Minimalist branding side. Logo centered. No contact text.",
        }
        .to_owned(),
    );
    lines.push(format!("Target Aspect Ratio: {aspect_ratio}"));
    lines.push(mode_block(mode, aspect_ratio, values));

    ComposedPrompt {
        text: lines.join("\n"),
        aux: AuxParams {
            asset_type: AssetType::BusinessCard,
            asset_tag: AssetType::BusinessCard.tag(),
            aspect_ratio,
            mode: Some(mode),
            side: Some(side),
        },
    }
}

fn mode_block(mode: CompositionMode, aspect_ratio: AspectRatio, values: &FieldValues) -> String {
    match mode {
        CompositionMode::Reconfiguration => reconfiguration_block(aspect_ratio),
        CompositionMode::Generative => generative_block(aspect_ratio, !values.is_blank(fields::BACKGROUND)),
    }
}

fn reconfiguration_block(aspect_ratio: AspectRatio) -> String {
    let layout = match aspect_ratio.class() {
        RatioClass::Wide => {
            "Horizontal Inline Layout. ICON on the left, PRIMARY TEXT to its right on the same line, \
             SECONDARY TEXT directly beneath the primary text."
        }
        RatioClass::Tall => {
            "Vertical Stacked Layout. ICON at the top, PRIMARY TEXT centered below it, \
             SECONDARY TEXT below the primary text."
        }
        RatioClass::Square => {
            "Centered Emblem Layout. ICON centered with PRIMARY TEXT and SECONDARY TEXT centered beneath it \
             as one emblem. If the text would crowd the canvas, give the ICON priority and reduce the text block."
        }
    };
    [
        "Composition Mode: Reconfiguration of the supplied [IMAGE]".to_owned(),
        "1. Segment the [IMAGE] into four elements: ICON, PRIMARY TEXT, SECONDARY TEXT, BACKGROUND.".to_owned(),
        format!(
            "2. Re-lay-out exactly those elements on a {aspect_ratio} canvas. \
             Never regenerate, redraw, restyle or add artwork."
        ),
        format!("3. Layout: {layout}"),
        "4. Scaling: scale each element uniformly, preserving its original proportions. \
         Never distort an element or change its width-to-height ratio."
            .to_owned(),
        "5. Background: preserve the original background color or transparency exactly \
         and extend it to fill the new canvas."
            .to_owned(),
    ]
    .join("\n")
}

fn generative_block(aspect_ratio: AspectRatio, background_requested: bool) -> String {
    let layout = match aspect_ratio.class() {
        RatioClass::Wide => {
            "Horizontal Pair Layout. Place the ICON and the wordmark side by side so the pair fills \
             70-85% of the canvas width."
        }
        RatioClass::Tall => {
            "Vertical Stack Layout. Stack the ICON above the wordmark with increased vertical spacing \
             so the composition fills the canvas height."
        }
        RatioClass::Square => "Centered Stacked Layout. Center the ICON above the wordmark as a compact emblem.",
    };
    let background = if background_requested {
        "use the requested background described above."
    } else {
        "use a clean, solid background that contrasts strongly with the ICON and text."
    };
    [
        "Composition Mode: Generative design from the brief above".to_owned(),
        "1. Invent an ICON and TYPOGRAPHY that express the brand described above.".to_owned(),
        format!("2. Layout: {layout}"),
        "3. Text: render only the text supplied above. \
         Do not invent slogans, taglines, dates, or any other copy."
            .to_owned(),
        format!("4. Background: {background}"),
    ]
    .join("\n")
}

// =============================================================================
// TEXT ASSETS
// =============================================================================

fn compose_claim(values: &FieldValues) -> String {
    let mut text = String::from("Restoration Claim Submission:\n");
    for descriptor in fields::descriptors(AssetType::Claim) {
        if descriptor.style == FieldStyle::Block {
            text.push('\n');
        }
        text.push('\n');
        text.push_str(&fields::render_line(descriptor, values));
    }
    text
}

fn compose_slogans(values: &FieldValues) -> String {
    let mut lines = vec!["Generate 5 slogans for the company described below.".to_owned()];
    lines.extend(
        fields::descriptors(AssetType::Slogan)
            .iter()
            .enumerate()
            .map(|(i, d)| format!("{}. {}", i + 1, fields::render_line(d, values))),
    );
    lines.push("Return the slogans as a numbered list, one per line, with no commentary.".to_owned());
    lines.join("\n")
}

#[cfg(test)]
#[path = "compose_test.rs"]
mod tests;
