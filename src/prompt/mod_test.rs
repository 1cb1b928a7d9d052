use super::*;

// ===== asset type =====

#[test]
fn fixed_ratios_override_caller() {
    assert_eq!(AssetType::YardSign.resolve_aspect_ratio(Some(AspectRatio::Square)), AspectRatio::Landscape);
    assert_eq!(AssetType::Banner.resolve_aspect_ratio(Some(AspectRatio::Tall)), AspectRatio::Wide);
    assert_eq!(AssetType::Flyer.resolve_aspect_ratio(None), AspectRatio::Portrait);
    assert_eq!(AssetType::Video.resolve_aspect_ratio(Some(AspectRatio::Square)), AspectRatio::Wide);
}

#[test]
fn free_ratios_use_choice_then_default() {
    assert_eq!(AssetType::Logo.resolve_aspect_ratio(Some(AspectRatio::Tall)), AspectRatio::Tall);
    assert_eq!(AssetType::Logo.resolve_aspect_ratio(None), AspectRatio::Square);
    assert_eq!(AssetType::BusinessCard.resolve_aspect_ratio(None), AspectRatio::Wide);
}

#[test]
fn reference_image_requirements() {
    assert!(!AssetType::Logo.requires_reference_image());
    assert!(AssetType::BusinessCard.requires_reference_image());
    assert!(AssetType::YardSign.requires_reference_image());
    assert!(AssetType::Video.requires_reference_image());
    assert!(!AssetType::Claim.requires_reference_image());
}

#[test]
fn asset_type_serde_snake_case() {
    let json = serde_json::to_string(&AssetType::BusinessCard).unwrap();
    assert_eq!(json, "\"business_card\"");
    let back: AssetType = serde_json::from_str("\"yard_sign\"").unwrap();
    assert_eq!(back, AssetType::YardSign);
}

// ===== aspect ratio =====

#[test]
fn aspect_ratio_parse_and_display() {
    for ratio in AspectRatio::ALL {
        assert_eq!(ratio.as_str().parse::<AspectRatio>().unwrap(), ratio);
        assert_eq!(ratio.to_string(), ratio.as_str());
    }
    assert!("2:1".parse::<AspectRatio>().is_err());
}

#[test]
fn aspect_ratio_serde_uses_ratio_string() {
    let json = serde_json::to_string(&AspectRatio::Tall).unwrap();
    assert_eq!(json, "\"9:16\"");
    assert!(serde_json::from_str::<AspectRatio>("\"5:4\"").is_err());
}

#[test]
fn ratio_classes() {
    assert_eq!(AspectRatio::Wide.class(), RatioClass::Wide);
    assert_eq!(AspectRatio::Landscape.class(), RatioClass::Wide);
    assert_eq!(AspectRatio::Portrait.class(), RatioClass::Tall);
    assert_eq!(AspectRatio::Square.class(), RatioClass::Square);
}

// ===== field values =====

#[test]
fn unset_fields_read_as_empty() {
    let values = FieldValues::new().with("companyName", "  Acme ");
    assert_eq!(values.get("missing"), "");
    assert_eq!(values.trimmed("companyName"), "Acme");
    assert!(values.is_blank("missing"));
    assert!(!values.is_blank("companyName"));
}

#[test]
fn field_values_deserialize_from_object() {
    let values: FieldValues = serde_json::from_str(r#"{"headline":"Storm damage?"}"#).unwrap();
    assert_eq!(values.get("headline"), "Storm damage?");
}
