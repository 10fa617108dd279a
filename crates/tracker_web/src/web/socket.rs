use std::cell::RefCell;
use std::rc::Rc;

use tracker_live::channel::endpoint_url;
use tracker_live::config::PageConfig;
use tracker_live::listener::{HostError, NotificationListener};
use tracing::{info, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

use super::dom::{dom_err, DomPopupHost};

type SharedListener = Rc<RefCell<NotificationListener<DomPopupHost>>>;

/// Open the live socket and route its events into `listener`.
///
/// The handlers are leaked for the page lifetime. There is no reconnect.
pub(super) fn connect(
    window: &web_sys::Window,
    listener: SharedListener,
    cfg: &PageConfig,
) -> Result<(), HostError> {
    let location = window.location();
    let protocol = location.protocol().map_err(dom_err)?;
    let host = location.host().map_err(dom_err)?;
    let url = endpoint_url(&protocol, &host, &cfg.socket_path);

    let socket = web_sys::WebSocket::new(&url).map_err(dom_err)?;
    info!(%url, "opening live socket");

    let on_open = {
        let listener = Rc::clone(&listener);
        Closure::wrap(Box::new(move |_ev: web_sys::Event| {
            listener.borrow_mut().on_open();
        }) as Box<dyn FnMut(web_sys::Event)>)
    };
    socket.set_onopen(Some(on_open.as_ref().unchecked_ref()));
    on_open.forget();

    let on_error = {
        let listener = Rc::clone(&listener);
        Closure::wrap(Box::new(move |ev: web_sys::Event| {
            listener.borrow_mut().on_error(&ev.type_());
        }) as Box<dyn FnMut(web_sys::Event)>)
    };
    socket.set_onerror(Some(on_error.as_ref().unchecked_ref()));
    on_error.forget();

    let on_close = {
        let listener = Rc::clone(&listener);
        Closure::wrap(Box::new(move |ev: web_sys::CloseEvent| {
            listener.borrow_mut().on_close(ev.code(), &ev.reason());
        }) as Box<dyn FnMut(web_sys::CloseEvent)>)
    };
    socket.set_onclose(Some(on_close.as_ref().unchecked_ref()));
    on_close.forget();

    let on_message = Closure::wrap(Box::new(move |ev: web_sys::MessageEvent| {
        match ev.data().as_string() {
            Some(text) => {
                listener.borrow_mut().on_message(&text);
            }
            None => warn!("ignoring non-text live frame"),
        }
    }) as Box<dyn FnMut(web_sys::MessageEvent)>);
    socket.set_onmessage(Some(on_message.as_ref().unchecked_ref()));
    on_message.forget();

    Ok(())
}
