//! # tracker_live
//!
//! Platform-neutral core of the TikTok Tracking App page script.
//!
//! The browser binding lives in the `tracker_web` crate; everything that can
//! be decided without a DOM lives here so it builds and tests on the host.
//!
//! ## Modules
//!
//! - [`message`]: typed decoding of push-channel frames
//! - [`listener`]: frame-to-popup bridge and the [`listener::PopupHost`] seam
//! - [`channel`]: socket endpoint and connection lifecycle
//! - [`page`]: card reveal, delete guard, alert, badge and promo popup models
//! - [`config`]: page configuration with defaults

pub mod channel;
pub mod config;
pub mod listener;
pub mod message;
pub mod page;

#[cfg(test)]
mod test_host;

pub mod prelude {
    pub use crate::channel::{endpoint_url, ChannelState};
    pub use crate::config::{ConfigError, PageConfig};
    pub use crate::listener::{
        Handled, HostError, ListenerError, ListenerStats, NotificationListener, PopupHost,
    };
    pub use crate::message::{decode, DecodeError, InboundMessage, LiveNotification};
}
