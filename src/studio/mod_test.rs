use super::*;
use crate::gateway::mock::{MockApi, gateway};
use crate::gateway::types::Part;

fn logo_file() -> EncodedFile {
    EncodedFile::from_bytes(b"png", "image/png", "logo.png")
}

fn graphic(asset: AssetType) -> GraphicStudio {
    GraphicStudio::new(asset).unwrap()
}

fn prompt_text(api: &MockApi, idx: usize) -> String {
    let requests = api.requests.lock().unwrap();
    match requests[idx].parts.last() {
        Some(Part::Text(text)) => text.clone(),
        other => panic!("expected trailing text part, got {other:?}"),
    }
}

// ===== claim =====

#[tokio::test]
async fn claim_text_is_displayed_verbatim() {
    let reply = "Thank you. Next steps: we will schedule an inspection.";
    let api = Arc::new(MockApi::new().text(reply));
    let gw = gateway(api.clone(), false);
    let mut view = StudioView::new(ClaimStudio, gw.capability());
    view.activate().await;
    view.set_field(fields::CLAIMS_INFO, "Roof leak from storm, no photos");

    let state = view.submit(&gw).await.unwrap();
    assert_eq!(state, &RequestLifecycle::Succeeded(StudioOutput::Single(GenerationResult::text(reply))));
    assert!(prompt_text(&api, 0).contains("Claim Details / Description:\nRoof leak from storm, no photos"));
}

#[tokio::test]
async fn claim_needs_text_or_file() {
    let api = Arc::new(MockApi::new());
    let gw = gateway(api.clone(), false);
    let mut view = StudioView::new(ClaimStudio, gw.capability());
    view.activate().await;
    assert_eq!(view.check_submit(), Err(SubmitBlocked::Invalid(ValidationError::MissingClaimInput)));

    view.select_file(EncodedFile::from_bytes(b"%PDF", "application/pdf", "estimate.pdf"));
    assert!(view.can_submit());
}

#[tokio::test]
async fn undecodable_attachment_blocks_submit() {
    let api = Arc::new(MockApi::new().text("ok"));
    let gw = gateway(api.clone(), false);
    let mut view = StudioView::new(ClaimStudio, gw.capability());
    view.select_file(EncodedFile { mime_type: "image/png".into(), data: "@@@".into(), display_name: "x.png".into() });

    let err = view.submit(&gw).await.unwrap_err();
    assert!(matches!(&err, SubmitBlocked::Invalid(ValidationError::UnreadableReferenceImage { .. })));
    assert_eq!(err.error_code(), "E_READ_BASE64");
    assert!(matches!(view.state(), RequestLifecycle::Idle));
    assert_eq!(api.content_calls(), 0);
}

#[tokio::test]
async fn claim_failure_shows_fallback_message() {
    let gw = gateway(Arc::new(MockApi::new().error(500)), false);
    let mut view = StudioView::new(ClaimStudio, gw.capability());
    view.set_field(fields::CLAIMS_INFO, "hail");
    let RequestLifecycle::Failed(body) = view.submit(&gw).await.unwrap() else { panic!("expected failure") };
    assert_eq!(body.code, "E_ANALYSIS");
    assert_eq!(body.message, "An error occurred while processing your claim.");
}

// ===== logo =====

#[tokio::test]
async fn logo_without_image_uses_generative_square_layout() {
    let api = Arc::new(MockApi::new().image("image/png", "AA=="));
    let gw = gateway(api.clone(), true);
    let mut view = StudioView::new(graphic(AssetType::Logo), gw.capability());
    view.activate().await;
    view.set_field(fields::COMPANY_NAME, "Acme Roofing");
    view.form.aspect_ratio = Some(AspectRatio::Square);

    let state = view.submit(&gw).await.unwrap();
    let RequestLifecycle::Succeeded(StudioOutput::Single(GenerationResult::Image(image))) = state else {
        panic!("expected an image, got {state:?}")
    };
    assert_eq!(image.download_name, "logo.png");
    let text = prompt_text(&api, 0);
    assert!(text.contains("Centered Stacked Layout"));
    assert!(text.contains("Create a high-quality professional Logo design."));
}

#[tokio::test]
async fn logo_requires_company_name() {
    let gw = gateway(Arc::new(MockApi::new()), true);
    let mut view = StudioView::new(graphic(AssetType::Logo), gw.capability());
    view.activate().await;
    assert_eq!(
        view.check_submit(),
        Err(SubmitBlocked::Invalid(ValidationError::MissingField { label: "Company Name" }))
    );
}

// ===== yard sign =====

#[tokio::test]
async fn yard_sign_without_file_is_blocked_and_never_calls() {
    let api = Arc::new(MockApi::new().image("image/png", "AA=="));
    let gw = gateway(api.clone(), true);
    let mut view = StudioView::new(graphic(AssetType::YardSign), gw.capability());
    view.activate().await;
    view.set_field(fields::COMPANY_NAME, "Acme Roofing");

    assert!(!view.can_submit());
    let err = view.submit(&gw).await.unwrap_err();
    assert_eq!(err, SubmitBlocked::Invalid(ValidationError::MissingReferenceImage));
    assert_eq!(api.content_calls(), 0);
    assert_eq!(view.state(), &RequestLifecycle::Idle);
}

#[tokio::test]
async fn yard_sign_ratio_is_forced() {
    let api = Arc::new(MockApi::new().image("image/png", "AA=="));
    let gw = gateway(api.clone(), true);
    let mut view = StudioView::new(graphic(AssetType::YardSign), gw.capability());
    view.activate().await;
    view.set_field(fields::COMPANY_NAME, "Acme Roofing");
    view.select_file(logo_file());
    view.form.aspect_ratio = Some(AspectRatio::Tall);
    view.submit(&gw).await.unwrap();

    let requests = api.requests.lock().unwrap();
    assert_eq!(requests[0].image_config.as_ref().unwrap().aspect_ratio, AspectRatio::Landscape);
}

// ===== capability gate =====

#[tokio::test]
async fn closed_gate_blocks_valid_form() {
    let api = Arc::new(MockApi::new().image("image/png", "AA=="));
    let gw = gateway(api.clone(), false);
    let mut view = StudioView::new(graphic(AssetType::Banner), gw.capability());
    assert_eq!(view.activate().await, GateStatus::NeedsCredential);
    assert!(!view.shows_form());
    view.set_field(fields::COMPANY_NAME, "Acme Roofing");
    view.select_file(logo_file());

    assert_eq!(view.submit(&gw).await.unwrap_err(), SubmitBlocked::CapabilityMissing);
    assert_eq!(api.content_calls(), 0);
}

#[tokio::test]
async fn ungated_studio_is_always_ready() {
    let gw = gateway(Arc::new(MockApi::new()), false);
    let mut view = StudioView::new(SloganStudio, gw.capability());
    assert_eq!(view.activate().await, GateStatus::Ready);
    assert!(view.shows_form());
}

// ===== business card =====

fn card_view(gw: &Gateway) -> StudioView<GraphicStudio> {
    let mut view = StudioView::new(graphic(AssetType::BusinessCard), gw.capability());
    view.set_field(fields::COMPANY_NAME, "Acme Roofing");
    view.set_field(fields::EMAIL, "jo@acme.test");
    view.select_file(logo_file());
    view
}

#[tokio::test]
async fn card_produces_back_and_front() {
    let api = Arc::new(MockApi::new().image("image/png", "QkFDSw==").image("image/png", "RlJPTlQ="));
    let gw = gateway(api.clone(), true);
    let mut view = card_view(&gw);
    view.activate().await;

    let RequestLifecycle::Succeeded(output) = view.submit(&gw).await.unwrap() else { panic!("expected success") };
    let sides: Vec<_> = output.results().iter().map(|(side, _)| *side).collect();
    assert_eq!(sides, vec![Some(CardSide::Back), Some(CardSide::Front)]);
    assert_eq!(api.content_calls(), 2);

    let json = serde_json::to_value(output).unwrap();
    assert_eq!(json[0]["side"], "back");
    assert_eq!(json[1]["side"], "front");
    assert_eq!(json[1]["kind"], "image");
    assert_eq!(json[0]["downloadName"], "business-card-back.png");
    assert_eq!(json[1]["downloadName"], "business-card-front.png");
}

#[tokio::test]
async fn card_fails_when_either_side_fails() {
    let api = Arc::new(MockApi::new().image("image/png", "QkFDSw==").error(500));
    let gw = gateway(api, true);
    let mut view = card_view(&gw);
    view.activate().await;

    let state = view.submit(&gw).await.unwrap();
    let RequestLifecycle::Failed(body) = state else { panic!("expected failure, got {state:?}") };
    assert_eq!(body.code, "E_GENERATION");
    assert_eq!(body.message, "Generation failed. Ensure paid API key is active.");
}

#[tokio::test]
async fn card_fails_when_one_side_is_text_only() {
    let api = Arc::new(MockApi::new().text("Sorry, no image").image("image/png", "RlJPTlQ="));
    let gw = gateway(api, true);
    let mut view = card_view(&gw);
    view.activate().await;
    let RequestLifecycle::Failed(body) = view.submit(&gw).await.unwrap() else { panic!("expected failure") };
    assert_eq!(body.code, "E_NO_IMAGE_RETURNED");
}

// ===== image edit =====

#[tokio::test]
async fn edit_text_only_response_fails_with_no_image() {
    let gw = gateway(Arc::new(MockApi::new().text("I removed the scratch.")), false);
    let mut view = StudioView::new(ImageEditStudio, gw.capability());
    view.select_file(logo_file());
    view.set_field(fields::INSTRUCTION, "remove the scratch");

    let RequestLifecycle::Failed(body) = view.submit(&gw).await.unwrap() else { panic!("expected failure") };
    assert_eq!(body.code, "E_NO_IMAGE_RETURNED");
    assert!(body.retryable);
}

#[tokio::test]
async fn edit_requires_image_and_instruction() {
    let gw = gateway(Arc::new(MockApi::new()), false);
    let mut view = StudioView::new(ImageEditStudio, gw.capability());
    view.set_field(fields::INSTRUCTION, "brighten");
    assert_eq!(view.check_submit(), Err(SubmitBlocked::Invalid(ValidationError::MissingReferenceImage)));
    view.select_file(logo_file());
    view.set_field(fields::INSTRUCTION, " ");
    assert_eq!(view.check_submit(), Err(SubmitBlocked::Invalid(ValidationError::MissingInstruction)));
}

// ===== slogans =====

#[tokio::test]
async fn slogan_studio_returns_text() {
    let api = Arc::new(MockApi::new().text("1. Roofs that fight back"));
    let gw = gateway(api.clone(), false);
    let mut view = StudioView::new(SloganStudio, gw.capability());
    view.set_field(fields::COMPANY_NAME, "Acme");
    view.set_field(fields::TONES, "Bold, Fun");
    let state = view.submit(&gw).await.unwrap();
    assert!(matches!(state, RequestLifecycle::Succeeded(StudioOutput::Single(GenerationResult::Text { .. }))));
    assert!(prompt_text(&api, 0).contains("Tones: Bold, Fun"));
}

// ===== video =====

#[tokio::test]
async fn video_form_starts_with_default_motion() {
    let gw = gateway(Arc::new(MockApi::new()), true);
    let view = StudioView::new(VideoStudio, gw.capability());
    assert_eq!(view.form.fields.get(fields::MOTION), kinds::DEFAULT_VIDEO_MOTION);
}

#[tokio::test]
async fn video_succeeds_after_polling() {
    let api = Arc::new(MockApi::new().video_done_after(Some(2)));
    let gw = gateway(api.clone(), true);
    let mut view = StudioView::new(VideoStudio, gw.capability());
    view.activate().await;
    view.select_file(logo_file());
    let state = view.submit(&gw).await.unwrap();
    assert!(matches!(state, RequestLifecycle::Succeeded(StudioOutput::Single(GenerationResult::Video(_)))));
    assert_eq!(api.poll_count(), 2);
    assert_eq!(api.video_requests.lock().unwrap()[0].prompt, kinds::DEFAULT_VIDEO_MOTION);
}

#[tokio::test]
async fn video_timeout_is_failed_not_succeeded() {
    let api = Arc::new(MockApi::new().video_done_after(None));
    let gw = gateway(api, true);
    let mut view = StudioView::new(VideoStudio, gw.capability());
    view.activate().await;
    view.select_file(logo_file());
    let RequestLifecycle::Failed(body) = view.submit(&gw).await.unwrap() else { panic!("expected failure") };
    assert_eq!(body.code, "E_VIDEO_TIMEOUT");
}

// ===== lifecycle integration =====

#[tokio::test]
async fn pending_blocks_second_submit() {
    let gw = gateway(Arc::new(MockApi::new()), false);
    let mut view = StudioView::new(SloganStudio, gw.capability());
    view.set_field(fields::COMPANY_NAME, "Acme");
    let _first = view.begin_submit().unwrap();
    assert!(!view.can_submit());
    assert_eq!(view.begin_submit().unwrap_err(), SubmitBlocked::Pending);
}

#[tokio::test]
async fn cancelled_request_completion_is_discarded() {
    let gw = gateway(Arc::new(MockApi::new()), false);
    let mut view = StudioView::new(SloganStudio, gw.capability());
    view.set_field(fields::COMPANY_NAME, "Acme");

    let (old_ticket, _, old_cancel) = view.begin_submit().unwrap();
    assert!(view.cancel());
    assert!(old_cancel.is_cancelled());
    assert!(matches!(view.state(), RequestLifecycle::Failed(body) if body.code == "E_CANCELLED"));

    let (new_ticket, _, _) = view.begin_submit().unwrap();
    assert!(!view.finish(old_ticket, Ok(StudioOutput::Single(GenerationResult::text("late")))));
    assert!(view.state().is_pending());
    assert!(view.finish(new_ticket, Ok(StudioOutput::Single(GenerationResult::text("fresh")))));
    assert_eq!(view.state(), &RequestLifecycle::Succeeded(StudioOutput::Single(GenerationResult::text("fresh"))));
}

#[test]
fn graphic_studio_only_for_graphics() {
    assert!(GraphicStudio::new(AssetType::Flyer).is_some());
    assert!(GraphicStudio::new(AssetType::Slogan).is_none());
    assert!(GraphicStudio::new(AssetType::Video).is_none());
}

#[test]
fn form_deserializes_from_json() {
    let form: StudioForm = serde_json::from_str(
        r#"{"fields":{"companyName":"Acme"},"aspectRatio":"16:9","referenceImage":{"mimeType":"image/png","data":"AA=="}}"#,
    )
    .unwrap();
    assert_eq!(form.fields.get("companyName"), "Acme");
    assert_eq!(form.aspect_ratio, Some(AspectRatio::Wide));
    assert_eq!(form.reference_image.unwrap().display_name, "");
}

#[test]
fn load_form_keeps_defaults_for_blank_fields() {
    let provider: Arc<dyn crate::credentials::CredentialProvider> =
        Arc::new(crate::credentials::CredentialStore::default());
    let mut view = StudioView::new(VideoStudio, provider);
    let mut form = StudioForm::default();
    form.fields.set(fields::MOTION, "");
    view.load_form(form);
    assert_eq!(view.form.fields.get(fields::MOTION), kinds::DEFAULT_VIDEO_MOTION);

    let mut form = StudioForm::default();
    form.fields.set(fields::MOTION, "Gentle sway");
    view.load_form(form);
    assert_eq!(view.form.fields.get(fields::MOTION), "Gentle sway");
}
