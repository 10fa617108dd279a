use std::cell::RefCell;
use std::rc::Rc;

use tracker_live::config::{ConfigError, PageConfig};
use tracker_live::listener::{HostError, NotificationListener};
use tracker_live::page::LOADED_BANNER;
use tracing::{info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

mod console;
mod decorations;
mod dom;
mod promo;
mod socket;

use dom::DomPopupHost;

const CONFIG_ATTR: &str = "data-tracker-config";

pub fn start() {
    console_error_panic_hook::set_once();

    let Some(window) = web_sys::window() else {
        web_sys::console::error_1(&JsValue::from_str("tracker: no window"));
        return;
    };
    let Some(document) = window.document() else {
        web_sys::console::error_1(&JsValue::from_str("tracker: no document"));
        return;
    };

    if document.ready_state() == "loading" {
        let target = document.clone();
        let cb = Closure::once_into_js(move || boot(window, document));
        if target
            .add_event_listener_with_callback("DOMContentLoaded", cb.unchecked_ref())
            .is_err()
        {
            web_sys::console::error_1(&JsValue::from_str("tracker: cannot wait for DOMContentLoaded"));
        }
    } else {
        boot(window, document);
    }
}

fn boot(window: web_sys::Window, document: web_sys::Document) {
    let (cfg, cfg_err) = match load_config(&document) {
        Ok(cfg) => (cfg, None),
        Err(e) => (PageConfig::default(), Some(e)),
    };
    console::install(cfg.max_level());
    if let Some(e) = cfg_err {
        warn!("ignoring {CONFIG_ATTR}: {e}");
    }

    if let Err(e) = decorations::reveal_cards(&document) {
        warn!("card reveal disabled: {e}");
    }
    decorations::guard_delete_links(&window, &document);
    decorations::dismiss_alerts(&window, &document, &cfg);
    decorations::annotate_badges(&document);

    info!("{LOADED_BANNER}");

    if let Err(e) = promo::install(&window, &document, &cfg) {
        warn!("promo popup disabled: {e}");
    }

    if let Err(e) = start_live_notifications(&window, &document, &cfg) {
        warn!("live notifications disabled: {e}");
    }
}

fn load_config(document: &web_sys::Document) -> Result<PageConfig, ConfigError> {
    let raw = document
        .document_element()
        .and_then(|el| el.get_attribute(CONFIG_ATTR));
    match raw {
        Some(raw) => PageConfig::from_json(&raw),
        None => Ok(PageConfig::default()),
    }
}

fn start_live_notifications(
    window: &web_sys::Window,
    document: &web_sys::Document,
    cfg: &PageConfig,
) -> Result<(), HostError> {
    let host = DomPopupHost::query(window, document, cfg)?;
    let listener = Rc::new(RefCell::new(NotificationListener::new(host, cfg)));
    socket::connect(window, listener, cfg)
}
