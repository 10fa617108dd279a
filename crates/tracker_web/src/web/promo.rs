use std::cell::RefCell;
use std::rc::Rc;

use tracker_live::config::PageConfig;
use tracker_live::listener::HostError;
use tracker_live::page::{PromoClick, PromoPopup, PROMO_CLOSE_ID, PROMO_POPUP_ID};
use tracing::debug;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use super::dom::{dom_err, set_timeout};

fn apply(el: &web_sys::HtmlElement, state: &PromoPopup) {
    if let Err(e) = el.style().set_property("display", state.display()) {
        debug!("promo display: {}", dom_err(e));
    }
}

fn is_overlay(ev: &web_sys::Event, overlay: &web_sys::HtmlElement) -> bool {
    ev.target().is_some_and(|t| {
        let t: &JsValue = t.as_ref();
        let o: &JsValue = overlay.as_ref();
        t == o
    })
}

/// Show `#my-popup` after the configured delay and wire its close paths.
pub(super) fn install(
    window: &web_sys::Window,
    document: &web_sys::Document,
    cfg: &PageConfig,
) -> Result<(), HostError> {
    let popup = document
        .get_element_by_id(PROMO_POPUP_ID)
        .and_then(|el| el.dyn_into::<web_sys::HtmlElement>().ok())
        .ok_or_else(|| HostError::MissingElement(PROMO_POPUP_ID.to_string()))?;
    let close = document
        .get_element_by_id(PROMO_CLOSE_ID)
        .ok_or_else(|| HostError::MissingElement(PROMO_CLOSE_ID.to_string()))?;

    let state = Rc::new(RefCell::new(PromoPopup::default()));

    {
        let popup = popup.clone();
        let state = Rc::clone(&state);
        set_timeout(window, cfg.promo_delay(), move || {
            let mut s = state.borrow_mut();
            s.reveal();
            apply(&popup, &s);
        })?;
    }

    let on_close = {
        let popup = popup.clone();
        let state = Rc::clone(&state);
        Closure::wrap(Box::new(move |_ev: web_sys::Event| {
            let mut s = state.borrow_mut();
            if s.click(PromoClick::CloseButton) {
                apply(&popup, &s);
            }
        }) as Box<dyn FnMut(web_sys::Event)>)
    };
    close
        .add_event_listener_with_callback("click", on_close.as_ref().unchecked_ref())
        .map_err(dom_err)?;
    on_close.forget();

    let on_overlay = {
        let overlay = popup.clone();
        Closure::wrap(Box::new(move |ev: web_sys::Event| {
            let target = if is_overlay(&ev, &overlay) {
                PromoClick::Overlay
            } else {
                PromoClick::Content
            };
            let mut s = state.borrow_mut();
            if s.click(target) {
                apply(&overlay, &s);
            }
        }) as Box<dyn FnMut(web_sys::Event)>)
    };
    popup
        .add_event_listener_with_callback("click", on_overlay.as_ref().unchecked_ref())
        .map_err(dom_err)?;
    on_overlay.forget();

    Ok(())
}
