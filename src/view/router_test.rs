use super::*;

#[test]
fn starts_on_landing() {
    let router = ViewRouter::new();
    assert_eq!(router.view(), AppView::Landing);
    assert_eq!(router.labs_service(), None);
}

#[test]
fn landing_resets_labs_sub_state() {
    let mut router = ViewRouter::new();
    router.open_service(LabsService::Flyer);
    assert_eq!(router.labs_service(), Some(LabsService::Flyer));

    router.navigate(AppView::Landing);
    router.navigate(AppView::Labs);
    assert_eq!(router.labs_service(), Some(LabsService::Menu));
}

#[test]
fn other_views_keep_labs_sub_state() {
    let mut router = ViewRouter::new();
    router.open_service(LabsService::Banner);
    router.navigate(AppView::Claims);
    assert_eq!(router.labs_service(), None);
    router.navigate(AppView::Labs);
    assert_eq!(router.labs_service(), Some(LabsService::Banner));
}

#[test]
fn back_steps_studio_menu_landing() {
    let mut router = ViewRouter::new();
    router.open_service(LabsService::Logo);
    router.back();
    assert_eq!(router.labs_service(), Some(LabsService::Menu));
    router.back();
    assert_eq!(router.view(), AppView::Landing);

    router.navigate(AppView::Portal);
    router.back();
    assert_eq!(router.view(), AppView::Landing);
}

#[test]
fn catalogue_covers_every_studio() {
    let cards = catalogue();
    assert_eq!(cards.len(), LabsService::STUDIOS.len());
    for (card, service) in cards.iter().zip(LabsService::STUDIOS) {
        assert_eq!(card.id, service);
        assert_eq!(card.slug, service.slug());
        assert!(service.asset_type().is_some());
    }
    assert_eq!(LabsService::Menu.asset_type(), None);
}

#[test]
fn card_serializes_camel_case() {
    let json = serde_json::to_value(&catalogue()[1]).unwrap();
    assert_eq!(json["id"], "business_card");
    assert_eq!(json["slug"], "business-card");
    assert_eq!(json["title"], "Business Cards");
}
