use core::time::Duration;

use tracker_live::config::PageConfig;
use tracker_live::listener::{HostError, PopupHost};
use tracker_live::page::StyleDecls;
use tracing::{debug, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

pub(super) fn dom_err(e: JsValue) -> HostError {
    HostError::Dom(e.as_string().unwrap_or_else(|| format!("{e:?}")))
}

/// All elements matching `selector` that cast to `T`.
pub(super) fn query_all<T: JsCast>(document: &web_sys::Document, selector: &str) -> Vec<T> {
    let list = match document.query_selector_all(selector) {
        Ok(list) => list,
        Err(e) => {
            warn!("querySelectorAll({selector}) failed: {}", dom_err(e));
            return Vec::new();
        }
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<T>().ok())
        .collect()
}

pub(super) fn set_styles(el: &web_sys::HtmlElement, decls: StyleDecls) {
    let style = el.style();
    for (prop, value) in decls {
        if let Err(e) = style.set_property(prop, value) {
            debug!("style {prop}: {}", dom_err(e));
        }
    }
}

pub(super) fn set_timeout(
    window: &web_sys::Window,
    delay: Duration,
    f: impl FnOnce() + 'static,
) -> Result<i32, HostError> {
    let ms = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
    let cb = Closure::once_into_js(f);
    window
        .set_timeout_with_callback_and_timeout_and_arguments_0(cb.unchecked_ref(), ms)
        .map_err(dom_err)
}

/// Renders popups into `#live-notifications-container`.
pub(super) struct DomPopupHost {
    window: web_sys::Window,
    document: web_sys::Document,
    container: web_sys::Element,
}

impl DomPopupHost {
    /// Look the container up once; the handle is kept for the page lifetime.
    pub(super) fn query(
        window: &web_sys::Window,
        document: &web_sys::Document,
        cfg: &PageConfig,
    ) -> Result<Self, HostError> {
        let container = document
            .get_element_by_id(&cfg.container_id)
            .ok_or_else(|| HostError::MissingElement(cfg.container_id.clone()))?;
        Ok(Self {
            window: window.clone(),
            document: document.clone(),
            container,
        })
    }
}

impl PopupHost for DomPopupHost {
    type Popup = web_sys::Element;

    fn append_popup(&mut self, class: &str, text: &str) -> Result<Self::Popup, HostError> {
        let el = self.document.create_element("div").map_err(dom_err)?;
        el.set_class_name(class);
        el.set_text_content(Some(text));
        self.container.append_child(&el).map_err(dom_err)?;
        Ok(el)
    }

    fn remove_after(&mut self, popup: Self::Popup, delay: Duration) -> Result<(), HostError> {
        set_timeout(&self.window, delay, move || popup.remove()).map(|_| ())
    }

    fn remove_now(&mut self, popup: &Self::Popup) {
        popup.remove();
    }
}
