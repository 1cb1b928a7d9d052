//! Top-level view router.
//!
//! DESIGN
//! ======
//! Four views plus a nested Labs sub-state. Going to Landing from anywhere
//! resets the Labs sub-state to Menu, so re-entering Labs always starts at
//! the menu. Back is an explicit in-app control with no history stack.

use serde::{Deserialize, Serialize};

use crate::prompt::AssetType;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppView {
    #[default]
    Landing,
    Claims,
    Labs,
    Portal,
}

/// Sub-state within Labs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabsService {
    #[default]
    Menu,
    Logo,
    BusinessCard,
    YardSign,
    Banner,
    Flyer,
    Slogan,
}

impl LabsService {
    pub const STUDIOS: [Self; 6] = [Self::Logo, Self::BusinessCard, Self::YardSign, Self::Banner, Self::Flyer, Self::Slogan];

    #[must_use]
    pub fn asset_type(self) -> Option<AssetType> {
        match self {
            Self::Menu => None,
            Self::Logo => Some(AssetType::Logo),
            Self::BusinessCard => Some(AssetType::BusinessCard),
            Self::YardSign => Some(AssetType::YardSign),
            Self::Banner => Some(AssetType::Banner),
            Self::Flyer => Some(AssetType::Flyer),
            Self::Slogan => Some(AssetType::Slogan),
        }
    }

    /// Path segment used by `POST /api/labs/{studio}`.
    #[must_use]
    pub fn slug(self) -> &'static str {
        match self {
            Self::Menu => "menu",
            Self::Logo => "logo",
            Self::BusinessCard => "business-card",
            Self::YardSign => "yard-sign",
            Self::Banner => "banner",
            Self::Flyer => "flyer",
            Self::Slogan => "slogan",
        }
    }
}

/// Labs menu entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceCard {
    pub id: LabsService,
    pub slug: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

const fn card(id: LabsService, slug: &'static str, title: &'static str, description: &'static str) -> ServiceCard {
    ServiceCard { id, slug, title, description }
}

const CATALOGUE: [ServiceCard; 6] = [
    card(
        LabsService::Logo,
        "logo",
        "Logo Creation",
        "Create professional brand logos from scratch or refine existing concepts.",
    ),
    card(
        LabsService::BusinessCard,
        "business-card",
        "Business Cards",
        "Generate dual-sided business cards with your branding and contact info.",
    ),
    card(
        LabsService::YardSign,
        "yard-sign",
        "Yard Signs",
        "High-visibility signs for job sites and local advertising.",
    ),
    card(LabsService::Banner, "banner", "Banners", "Large format banners for web, social media, or vinyl print."),
    card(LabsService::Flyer, "flyer", "Flyers", "Promotional flyers with detailed body text and key bullet points."),
    card(
        LabsService::Slogan,
        "slogan",
        "Slogan Creation",
        "Generate catchy, witty, and powerful slogans with our Grok-powered engine.",
    ),
];

#[must_use]
pub fn catalogue() -> &'static [ServiceCard] {
    &CATALOGUE
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ViewRouter {
    view: AppView,
    labs: LabsService,
}

impl ViewRouter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn view(&self) -> AppView {
        self.view
    }

    /// Labs sub-state, `None` outside Labs.
    #[must_use]
    pub fn labs_service(&self) -> Option<LabsService> {
        (self.view == AppView::Labs).then_some(self.labs)
    }

    pub fn navigate(&mut self, view: AppView) {
        if view == AppView::Landing {
            self.labs = LabsService::Menu;
        }
        self.view = view;
    }

    pub fn open_service(&mut self, service: LabsService) {
        self.view = AppView::Labs;
        self.labs = service;
    }

    /// In-app back: studio -> Labs menu, anything else -> Landing.
    pub fn back(&mut self) {
        if self.view == AppView::Labs && self.labs != LabsService::Menu {
            self.labs = LabsService::Menu;
        } else {
            self.navigate(AppView::Landing);
        }
    }
}

#[cfg(test)]
#[path = "router_test.rs"]
mod tests;
