//! Push-channel endpoint and connection lifecycle.

/// Lifecycle of the single live socket.
///
/// There is no transition out of `Closed`: a dropped connection stays
/// dropped until the page is reloaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelState {
    #[default]
    Connecting,
    Open,
    Closed,
}

impl ChannelState {
    pub fn label(self) -> &'static str {
        match self {
            ChannelState::Connecting => "connecting",
            ChannelState::Open => "open",
            ChannelState::Closed => "closed",
        }
    }

    /// State after the transport reports it is open.
    pub fn opened(self) -> Self {
        match self {
            ChannelState::Connecting => ChannelState::Open,
            other => other,
        }
    }

    /// State after an error or a close from either side.
    pub fn closed(self) -> Self {
        ChannelState::Closed
    }
}

/// WebSocket scheme matching the page's own transport.
pub fn socket_scheme(page_protocol: &str) -> &'static str {
    if page_protocol.trim_end_matches(':').eq_ignore_ascii_case("https") {
        "wss"
    } else {
        "ws"
    }
}

/// Build the socket URL from `location.protocol`, `location.host` and a path.
pub fn endpoint_url(page_protocol: &str, host: &str, path: &str) -> String {
    let scheme = socket_scheme(page_protocol);
    if path.starts_with('/') {
        format!("{scheme}://{host}{path}")
    } else {
        format!("{scheme}://{host}/{path}")
    }
}
