use super::*;
use crate::prompt::SloganBrief;

fn acme() -> FieldValues {
    FieldValues::new().with(fields::COMPANY_NAME, "Acme Roofing")
}

fn single(composition: Composition) -> ComposedPrompt {
    match composition {
        Composition::Single(p) => p,
        Composition::Pair { .. } => panic!("expected a single prompt"),
    }
}

/// Every `"..."` span in the text.
fn quoted_values(text: &str) -> Vec<&str> {
    text.split('"').skip(1).step_by(2).collect()
}

// ===== determinism =====

#[test]
fn same_input_same_text() {
    let values = acme().with(fields::SLOGAN, "Built to last");
    for ratio in AspectRatio::ALL {
        for image in [true, false] {
            let a = compose(AssetType::Logo, &values, ratio, image);
            let b = compose(AssetType::Logo, &values.clone(), ratio, image);
            assert_eq!(a, b);
        }
    }
}

// ===== generative =====

#[test]
fn square_logo_without_image_is_centered_stack() {
    let prompt = single(compose(AssetType::Logo, &acme(), AspectRatio::Square, false));
    assert!(prompt.text.starts_with("Asset Type: Company Logo\nCompany Name: \"Acme Roofing\""));
    assert!(prompt.text.contains("Centered Stacked Layout"));
    assert!(prompt.text.contains("Target Aspect Ratio: 1:1"));
    assert_eq!(prompt.aux.mode, Some(CompositionMode::Generative));
    assert_eq!(prompt.aux.asset_tag, "Logo");
}

#[test]
fn generative_layout_follows_ratio_class() {
    let wide = single(compose(AssetType::Logo, &acme(), AspectRatio::Wide, false));
    assert!(wide.text.contains("Horizontal Pair Layout"));
    assert!(wide.text.contains("70-85%"));
    let tall = single(compose(AssetType::Logo, &acme(), AspectRatio::Tall, false));
    assert!(tall.text.contains("Vertical Stack Layout"));
    assert!(tall.text.contains("increased vertical spacing"));
}

#[test]
fn generative_forbids_invented_copy() {
    let prompt = single(compose(AssetType::Logo, &acme(), AspectRatio::Square, false));
    assert!(prompt.text.contains("Do not invent slogans, taglines, dates"));
    for quoted in quoted_values(&prompt.text) {
        assert!(quoted.is_empty() || quoted == "Acme Roofing", "unexpected copy {quoted:?}");
    }
}

#[test]
fn generative_background_defaults_to_contrast() {
    let plain = single(compose(AssetType::Logo, &acme(), AspectRatio::Square, false));
    assert!(plain.text.contains("clean, solid background that contrasts"));
    let requested = acme().with(fields::BACKGROUND, "navy gradient");
    let custom = single(compose(AssetType::Logo, &requested, AspectRatio::Square, false));
    assert!(custom.text.contains("Requested Background: navy gradient"));
    assert!(custom.text.contains("use the requested background"));
    assert!(!custom.text.contains("contrasts strongly"));
}

#[test]
fn empty_fields_render_as_empty_values() {
    let prompt = single(compose(AssetType::Logo, &acme(), AspectRatio::Square, false));
    assert!(prompt.text.contains("Slogan: \"\""));
    assert!(prompt.text.contains("Requested Background: \n"));
}

// ===== reconfiguration =====

#[test]
fn reconfiguration_segments_and_scales_uniformly() {
    let prompt = single(compose(AssetType::Logo, &acme(), AspectRatio::Wide, true));
    assert_eq!(prompt.aux.mode, Some(CompositionMode::Reconfiguration));
    assert!(prompt.text.contains("ICON, PRIMARY TEXT, SECONDARY TEXT, BACKGROUND"));
    assert!(prompt.text.contains("Never regenerate"));
    assert!(prompt.text.contains("scale each element uniformly"));
    assert!(prompt.text.contains("Horizontal Inline Layout"));
    assert!(!prompt.text.to_lowercase().contains("stretch"));
}

#[test]
fn reconfiguration_layout_per_class() {
    let tall = single(compose(AssetType::Logo, &acme(), AspectRatio::Tall, true));
    assert!(tall.text.contains("Vertical Stacked Layout"));
    let square = single(compose(AssetType::Logo, &acme(), AspectRatio::Square, true));
    assert!(square.text.contains("Centered Emblem Layout"));
    assert!(square.text.contains("give the ICON priority"));
}

#[test]
fn sign_banner_flyer_carry_design_line() {
    let sign = single(compose(AssetType::YardSign, &acme(), AspectRatio::Landscape, true));
    assert!(sign.text.contains("Design: High contrast, readable from distance."));
    let banner = single(compose(AssetType::Banner, &acme(), AspectRatio::Wide, true));
    assert!(banner.text.contains("Asset Type: Marketing Banner"));
    assert!(banner.text.contains("Design: Eye-catching, horizontal layout."));
    let flyer = single(compose(AssetType::Flyer, &acme(), AspectRatio::Portrait, true));
    assert!(flyer.text.contains("Design: Professional layout with clear hierarchy."));
    assert!(flyer.text.contains("Target Aspect Ratio: 3:4"));
}

// ===== business card =====

#[test]
fn card_composes_back_and_front() {
    let values = acme()
        .with(fields::SLOGAN, "Built to last")
        .with(fields::EMAIL, "jo@acme.test");
    let Composition::Pair { back, front } = compose(AssetType::BusinessCard, &values, AspectRatio::Wide, true) else {
        panic!("expected a pair");
    };
    assert_eq!(back.aux.side, Some(CardSide::Back));
    assert_eq!(front.aux.side, Some(CardSide::Front));
    assert_eq!(back.aux.aspect_ratio, front.aux.aspect_ratio);

    assert!(back.text.contains("Email: jo@acme.test"));
    assert!(!back.text.contains("Built to last"));
    assert!(back.text.contains("as the logo source"));
    assert!(back.text.contains("Clean, professional layout"));

    assert!(front.text.contains("Slogan: \"Built to last\""));
    assert!(!front.text.contains("jo@acme.test"));
    assert!(front.text.contains("CENTRAL visual element"));
    assert!(front.text.contains("No contact text"));
}

#[test]
fn composition_prompts_lists_both_sides() {
    let pair = compose(AssetType::BusinessCard, &acme(), AspectRatio::Wide, true);
    let sides: Vec<_> = pair.prompts().iter().map(|p| p.aux.side).collect();
    assert_eq!(sides, vec![Some(CardSide::Back), Some(CardSide::Front)]);
}

// ===== text assets =====

#[test]
fn claim_prompt_layout() {
    let values = FieldValues::new()
        .with(fields::HOMEOWNER_NAME, "Jo Smith")
        .with(fields::PROPERTY_ADDRESS, "1 Elm St")
        .with(fields::CLAIMS_INFO, "Hail damage on north slope");
    let prompt = single(compose(AssetType::Claim, &values, AspectRatio::Square, false));
    assert_eq!(
        prompt.text,
        "Restoration Claim Submission:\n\
         \n\
         Homeowner Name: Jo Smith\n\
         Property Address: 1 Elm St\n\
         Phone Number: \n\
         Contractor Information: \n\
         \n\
         Claim Details / Description:\n\
         Hail damage on north slope"
    );
    assert_eq!(prompt.aux.mode, None);
}

#[test]
fn slogan_prompt_is_enumerated() {
    let values = SloganBrief {
        company_name: "Acme".into(),
        tones: vec!["Edgy".into(), "Bold".into()],
        ..SloganBrief::default()
    }
    .to_fields();
    let prompt = single(compose(AssetType::Slogan, &values, AspectRatio::Square, false));
    assert!(prompt.text.starts_with("Generate 5 slogans"));
    assert!(prompt.text.contains("1. Company Name: \"Acme\""));
    assert!(prompt.text.contains("4. Tones: Edgy, Bold"));
    assert!(prompt.text.contains("7. Additional Preferences: "));
}

#[test]
fn video_motion_defaults() {
    let blank = single(compose(AssetType::Video, &FieldValues::new(), AspectRatio::Wide, true));
    assert_eq!(blank.text, DEFAULT_MOTION);
    let custom = FieldValues::new().with(fields::MOTION, " slow pan ");
    let prompt = single(compose(AssetType::Video, &custom, AspectRatio::Wide, true));
    assert_eq!(prompt.text, "slow pan");
}

#[test]
fn card_side_names() {
    assert_eq!(CardSide::Back.as_str(), "back");
    assert_eq!(CardSide::Front.as_str(), "front");
}
