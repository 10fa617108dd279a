//! Page decorations that run alongside the live listener.
//!
//! Everything here is DOM-free: selectors, style values and the small state
//! machines the wasm crate wires to real elements.

use core::time::Duration;

use crate::config::PageConfig;

pub const CARD_SELECTOR: &str = ".card";
pub const ALERT_SELECTOR: &str = ".alert";
pub const BADGE_SELECTOR: &str = ".badge";
pub const DELETE_LINK_SELECTOR: &str = "a[href*=\"supprimer\"]";
pub const PROMO_POPUP_ID: &str = "my-popup";
pub const PROMO_CLOSE_ID: &str = "popup-close";

pub const LOADED_BANNER: &str = "🚀 TikTok Tracking App loaded";

/// CSS declarations as `(property, value)` pairs.
pub type StyleDecls = &'static [(&'static str, &'static str)];

// Cards start shifted down and transparent, then slide in once visible.
pub const CARD_HIDDEN: StyleDecls = &[
    ("opacity", "0"),
    ("transform", "translateY(30px)"),
    ("transition", "opacity 0.5s ease, transform 0.5s ease"),
];
pub const CARD_REVEALED: StyleDecls = &[("opacity", "1"), ("transform", "translateY(0)")];
pub const CARD_REVEAL_THRESHOLD: f64 = 0.1;
pub const CARD_REVEAL_ROOT_MARGIN: &str = "0px 0px -50px 0px";

pub const DELETE_CONFIRM_PROMPT: &str = "Es-tu sûr de vouloir supprimer ce compte ?";

/// Whether a click on a delete link must be confirmed first.
///
/// Links into the dedicated confirmation page (`compte_delete`) already ask
/// the user, so they pass through.
pub fn needs_delete_confirmation(href: &str) -> bool {
    href.contains("supprimer") && !href.contains("compte_delete")
}

/// Tooltip for a status badge.
pub fn badge_title(text: &str) -> &str {
    text.trim()
}

/// Fade-then-remove timeline for flash alerts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlertDismissal {
    pub fade_after: Duration,
    pub remove_after_fade: Duration,
}

impl AlertDismissal {
    pub fn from_config(cfg: &PageConfig) -> Self {
        Self {
            fade_after: cfg.alert_dismiss_after(),
            remove_after_fade: cfg.alert_fade(),
        }
    }
}

/// Where a click on the promo popup landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromoClick {
    CloseButton,
    /// The overlay element itself, outside the content box.
    Overlay,
    Content,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PromoPopup {
    visible: bool,
}

impl PromoPopup {
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Value for the popup's `display` style.
    pub fn display(&self) -> &'static str {
        if self.visible {
            "flex"
        } else {
            "none"
        }
    }

    pub fn reveal(&mut self) {
        self.visible = true;
    }

    /// Apply a click; returns whether visibility changed.
    pub fn click(&mut self, target: PromoClick) -> bool {
        match target {
            PromoClick::CloseButton | PromoClick::Overlay if self.visible => {
                self.visible = false;
                true
            }
            _ => false,
        }
    }
}
