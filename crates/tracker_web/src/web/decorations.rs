use tracker_live::config::PageConfig;
use tracker_live::listener::HostError;
use tracker_live::page::{
    badge_title, needs_delete_confirmation, AlertDismissal, ALERT_SELECTOR, BADGE_SELECTOR,
    CARD_HIDDEN, CARD_REVEALED, CARD_REVEAL_ROOT_MARGIN, CARD_REVEAL_THRESHOLD, CARD_SELECTOR,
    DELETE_CONFIRM_PROMPT, DELETE_LINK_SELECTOR,
};
use tracing::{debug, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use super::dom::{dom_err, query_all, set_styles, set_timeout};

/// Hide every card and slide it in the first time it scrolls into view.
pub(super) fn reveal_cards(document: &web_sys::Document) -> Result<(), HostError> {
    let cards: Vec<web_sys::HtmlElement> = query_all(document, CARD_SELECTOR);
    if cards.is_empty() {
        return Ok(());
    }

    let on_intersect = Closure::wrap(Box::new(
        move |entries: js_sys::Array, _observer: IntersectionObserver| {
            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                    continue;
                };
                if !entry.is_intersecting() {
                    continue;
                }
                if let Ok(card) = entry.target().dyn_into::<web_sys::HtmlElement>() {
                    set_styles(&card, CARD_REVEALED);
                }
            }
        },
    ) as Box<dyn FnMut(js_sys::Array, IntersectionObserver)>);

    let init = IntersectionObserverInit::new();
    init.set_threshold(&JsValue::from_f64(CARD_REVEAL_THRESHOLD));
    init.set_root_margin(CARD_REVEAL_ROOT_MARGIN);
    let observer =
        IntersectionObserver::new_with_options(on_intersect.as_ref().unchecked_ref(), &init)
            .map_err(dom_err)?;
    on_intersect.forget();

    for card in &cards {
        set_styles(card, CARD_HIDDEN);
        observer.observe(card);
    }
    debug!(count = cards.len(), "observing cards");
    Ok(())
}

pub(super) fn guard_delete_links(window: &web_sys::Window, document: &web_sys::Document) {
    let links: Vec<web_sys::HtmlAnchorElement> = query_all(document, DELETE_LINK_SELECTOR);
    for link in links {
        let on_click = {
            let window = window.clone();
            let link = link.clone();
            Closure::wrap(Box::new(move |ev: web_sys::Event| {
                if !needs_delete_confirmation(&link.href()) {
                    return;
                }
                let confirmed = window
                    .confirm_with_message(DELETE_CONFIRM_PROMPT)
                    .unwrap_or(false);
                if !confirmed {
                    ev.prevent_default();
                }
            }) as Box<dyn FnMut(web_sys::Event)>)
        };
        if let Err(e) = link.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())
        {
            warn!("delete guard not attached: {}", dom_err(e));
        }
        on_click.forget();
    }
}

/// Fade each flash alert out, then drop it from the DOM.
pub(super) fn dismiss_alerts(
    window: &web_sys::Window,
    document: &web_sys::Document,
    cfg: &PageConfig,
) {
    let timeline = AlertDismissal::from_config(cfg);
    let alerts: Vec<web_sys::HtmlElement> = query_all(document, ALERT_SELECTOR);
    for alert in alerts {
        let w = window.clone();
        let fade = move || {
            if let Err(e) = alert.style().set_property("opacity", "0") {
                debug!("alert fade: {}", dom_err(e));
            }
            if let Err(e) = set_timeout(&w, timeline.remove_after_fade, move || alert.remove()) {
                warn!("alert removal not scheduled: {e}");
            }
        };
        if let Err(e) = set_timeout(window, timeline.fade_after, fade) {
            warn!("alert dismissal not scheduled: {e}");
        }
    }
}

pub(super) fn annotate_badges(document: &web_sys::Document) {
    let badges: Vec<web_sys::Element> = query_all(document, BADGE_SELECTOR);
    for badge in badges {
        let text = badge.text_content().unwrap_or_default();
        if let Err(e) = badge.set_attribute("title", badge_title(&text)) {
            debug!("badge title: {}", dom_err(e));
        }
    }
}
