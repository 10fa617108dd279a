//! Live notification listener.
//!
//! Bridges frames from the push channel to self-expiring popups. The DOM is
//! reached only through [`PopupHost`], so the same listener drives the
//! browser and the in-memory host used by tests.

use core::time::Duration;

use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::channel::ChannelState;
use crate::config::PageConfig;
use crate::message::{self, DecodeError, InboundMessage, LiveNotification};

#[derive(Debug, Error)]
pub enum HostError {
    #[error("element #{0} not found")]
    MissingElement(String),
    #[error("dom: {0}")]
    Dom(String),
}

#[derive(Debug, Error)]
pub enum ListenerError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Host(#[from] HostError),
}

/// Where popups are rendered.
pub trait PopupHost {
    type Popup: Clone;

    /// Create an element with `class` and `text` and append it to the
    /// notification container.
    fn append_popup(&mut self, class: &str, text: &str) -> Result<Self::Popup, HostError>;

    /// Remove `popup` once `delay` has elapsed. Never cancelled.
    fn remove_after(&mut self, popup: Self::Popup, delay: Duration) -> Result<(), HostError>;

    /// Remove `popup` immediately.
    fn remove_now(&mut self, popup: &Self::Popup);
}

/// Text shown for a live notification.
pub fn popup_text(n: &LiveNotification) -> String {
    format!("🔴 {} est en live ! Titre : {}", n.compte, n.titre)
}

/// Result of handling one inbound frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Handled {
    Rendered,
    /// Well-formed, but not something this page displays.
    Ignored(String),
    Rejected,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListenerStats {
    pub rendered: u64,
    pub ignored: u64,
    pub rejected: u64,
}

pub struct NotificationListener<H: PopupHost> {
    host: H,
    state: ChannelState,
    popup_class: String,
    popup_lifetime: Duration,
    stats: ListenerStats,
}

impl<H: PopupHost> NotificationListener<H> {
    pub fn new(host: H, cfg: &PageConfig) -> Self {
        Self {
            host,
            state: ChannelState::Connecting,
            popup_class: cfg.popup_class.clone(),
            popup_lifetime: cfg.popup_lifetime(),
            stats: ListenerStats::default(),
        }
    }

    pub fn state(&self) -> ChannelState {
        self.state
    }

    pub fn stats(&self) -> ListenerStats {
        self.stats
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn on_open(&mut self) {
        self.state = self.state.opened();
        info!("✅ WebSocket connecté");
    }

    pub fn on_error(&mut self, detail: &str) {
        self.state = self.state.closed();
        error!(state = self.state.label(), "❌ WebSocket erreur: {detail}");
    }

    pub fn on_close(&mut self, code: u16, reason: &str) {
        self.state = self.state.closed();
        info!(code, reason, state = self.state.label(), "live socket closed");
    }

    /// Handle one text frame, logging and discarding anything that fails.
    pub fn on_message(&mut self, raw: &str) -> Handled {
        match self.try_handle(raw) {
            Ok(handled) => handled,
            Err(e) => {
                self.stats.rejected += 1;
                warn!("discarding live frame: {e}");
                Handled::Rejected
            }
        }
    }

    pub fn try_handle(&mut self, raw: &str) -> Result<Handled, ListenerError> {
        match message::decode(raw)? {
            InboundMessage::LiveNotification(n) => {
                self.render(&n)?;
                self.stats.rendered += 1;
                Ok(Handled::Rendered)
            }
            other => {
                self.stats.ignored += 1;
                debug!(kind = other.kind(), "ignoring live frame");
                Ok(Handled::Ignored(other.kind().to_string()))
            }
        }
    }

    fn render(&mut self, n: &LiveNotification) -> Result<(), HostError> {
        let text = popup_text(n);
        let popup = self.host.append_popup(&self.popup_class, &text)?;
        // A popup without a pending removal would stay forever; drop it now.
        if let Err(e) = self.host.remove_after(popup.clone(), self.popup_lifetime) {
            self.host.remove_now(&popup);
            return Err(e);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_host::MemoryHost;

    fn listener() -> NotificationListener<MemoryHost> {
        NotificationListener::new(MemoryHost::default(), &PageConfig::default())
    }

    fn live(compte: &str, titre: &str) -> String {
        serde_json::json!({"type": "live_notification", "compte": compte, "titre": titre})
            .to_string()
    }

    #[test]
    fn renders_expected_text() {
        let mut l = listener();
        assert_eq!(l.on_message(&live("alice", "Soirée jeux")), Handled::Rendered);
        let host = l.host();
        assert_eq!(host.texts(), vec!["🔴 alice est en live ! Titre : Soirée jeux"]);
        assert_eq!(host.classes(), vec!["live-popup"]);
    }

    #[test]
    fn popup_is_removed_at_exactly_five_seconds() {
        let mut l = listener();
        l.on_message(&live("alice", "x"));
        assert_eq!(l.host().live_count(), 1);

        l.host_mut().advance(Duration::from_millis(4999));
        assert_eq!(l.host().live_count(), 1);

        l.host_mut().advance(Duration::from_millis(1));
        assert_eq!(l.host().live_count(), 0);
    }

    #[test]
    fn each_popup_keeps_its_own_deadline() {
        let mut l = listener();
        l.on_message(&live("a", "1"));
        l.host_mut().advance(Duration::from_millis(3000));
        l.on_message(&live("b", "2"));

        l.host_mut().advance(Duration::from_millis(2000));
        assert_eq!(l.host().texts(), vec!["🔴 b est en live ! Titre : 2"]);

        l.host_mut().advance(Duration::from_millis(3000));
        assert_eq!(l.host().live_count(), 0);
    }

    #[test]
    fn burst_produces_one_popup_per_message() {
        let mut l = listener();
        for i in 0..25 {
            l.on_message(&live(&format!("user{i}"), "burst"));
        }
        assert_eq!(l.host().live_count(), 25);
        assert_eq!(l.stats().rendered, 25);

        l.host_mut().advance(Duration::from_millis(5000));
        assert_eq!(l.host().live_count(), 0);
    }

    #[test]
    fn other_kinds_leave_container_untouched() {
        let mut l = listener();
        let frames = [
            r#"{"type":"live_ended","compte":"a"}"#,
            r#"{"type":"new_transcription","segment":1,"text":"t","risque_score":0.1,"categorie":"ok"}"#,
            r#"{"type":"moderation_alert","alerte_id":1,"live_id":2,"compte":"c","risque_score":0.9,"categorie":"x"}"#,
        ];
        for f in frames {
            assert!(matches!(l.on_message(f), Handled::Ignored(_)));
        }
        assert_eq!(l.host().live_count(), 0);
        assert_eq!(l.stats().ignored, 3);
    }

    #[test]
    fn malformed_frames_are_discarded() {
        let mut l = listener();
        let frames = [
            "",
            "{",
            "null",
            "42",
            r#"{"type":"live_notification"}"#,
            r#"{"type":"live_notification","compte":"a","titre":null}"#,
            "\u{0}\u{1}garbage",
        ];
        for f in frames {
            assert_eq!(l.on_message(f), Handled::Rejected);
        }
        assert_eq!(l.host().live_count(), 0);
        assert_eq!(l.stats().rejected, frames.len() as u64);
    }

    #[test]
    fn host_failure_is_reported_and_counted() {
        let mut l = listener();
        l.host_mut().fail_appends = true;
        assert!(matches!(
            l.try_handle(&live("a", "b")),
            Err(ListenerError::Host(HostError::Dom(_)))
        ));
        assert_eq!(l.on_message(&live("a", "b")), Handled::Rejected);
        assert_eq!(l.stats().rejected, 1);
    }

    #[test]
    fn unschedulable_popup_is_not_left_behind() {
        let mut l = listener();
        l.host_mut().fail_timers = true;
        assert_eq!(l.on_message(&live("a", "b")), Handled::Rejected);
        assert_eq!(l.host().live_count(), 0);
        assert_eq!(l.stats().rendered, 0);
        assert_eq!(l.stats().rejected, 1);

        l.host_mut().fail_timers = false;
        assert_eq!(l.on_message(&live("a", "b")), Handled::Rendered);
        assert_eq!(l.host().live_count(), 1);
    }

    #[test]
    fn malformed_reserved_kinds_are_ignored_not_rejected() {
        let mut l = listener();
        let frames = [
            r#"{"type":"moderation_alert","compte":"c","message":"x"}"#,
            r#"{"type":"new_transcription","segment":1,"text":"t","risque_score":null,"categorie":null}"#,
        ];
        for f in frames {
            assert!(matches!(l.on_message(f), Handled::Ignored(_)));
        }
        assert_eq!(
            l.stats(),
            ListenerStats {
                rendered: 0,
                ignored: 2,
                rejected: 0
            }
        );
        assert_eq!(l.host().live_count(), 0);
    }

    #[test]
    fn channel_lifecycle_is_one_shot() {
        let mut l = listener();
        assert_eq!(l.state(), ChannelState::Connecting);
        l.on_open();
        assert_eq!(l.state(), ChannelState::Open);
        l.on_error("network down");
        assert_eq!(l.state(), ChannelState::Closed);
        l.on_open();
        assert_eq!(l.state(), ChannelState::Closed);
        l.on_close(1006, "");
        assert_eq!(l.state(), ChannelState::Closed);
    }

    #[test]
    fn lifetime_comes_from_config() {
        let cfg = PageConfig {
            popup_lifetime_ms: 250,
            popup_class: "toast".to_string(),
            ..PageConfig::default()
        };
        let mut l = NotificationListener::new(MemoryHost::default(), &cfg);
        l.on_message(&live("a", "b"));
        assert_eq!(l.host().classes(), vec!["toast"]);
        l.host_mut().advance(Duration::from_millis(250));
        assert_eq!(l.host().live_count(), 0);
    }
}
