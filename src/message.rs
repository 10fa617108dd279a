//! Inbound push-channel payloads.
//!
//! Every frame on the live socket is a JSON object tagged by its `type`
//! field. Frames are validated here, at the channel boundary, so the rest of
//! the crate only ever sees typed messages.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

pub const LIVE_NOTIFICATION: &str = "live_notification";
pub const MODERATION_ALERT: &str = "moderation_alert";
pub const NEW_TRANSCRIPTION: &str = "new_transcription";

/// A tracked account went live.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LiveNotification {
    pub compte: String,
    pub titre: String,
    #[serde(default)]
    pub user_id: Option<i64>,
    /// Server-side preformatted summary. Not used for rendering.
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ModerationAlert {
    pub alerte_id: i64,
    pub live_id: i64,
    pub compte: String,
    pub risque_score: f64,
    pub categorie: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewTranscription {
    pub segment: i64,
    pub text: String,
    pub risque_score: f64,
    pub categorie: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InboundMessage {
    LiveNotification(LiveNotification),
    ModerationAlert(ModerationAlert),
    NewTranscription(NewTranscription),
    /// Discriminator this client does not render: unknown kinds, and known
    /// non-rendered kinds whose shape did not match. Reserved for future use.
    Other(String),
}

impl InboundMessage {
    /// The wire discriminator this message was decoded from.
    pub fn kind(&self) -> &str {
        match self {
            InboundMessage::LiveNotification(_) => LIVE_NOTIFICATION,
            InboundMessage::ModerationAlert(_) => MODERATION_ALERT,
            InboundMessage::NewTranscription(_) => NEW_TRANSCRIPTION,
            InboundMessage::Other(kind) => kind,
        }
    }
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("payload has no string `type` field")]
    MissingType,
    #[error("malformed `{kind}` payload: {source}")]
    Variant {
        kind: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Decode one text frame.
///
/// Only `live_notification` is validated strictly. A malformed frame of any
/// other kind is still ignorable, so it decodes as [`InboundMessage::Other`].
pub fn decode(raw: &str) -> Result<InboundMessage, DecodeError> {
    let value: Value = serde_json::from_str(raw)?;
    let kind = value
        .get("type")
        .and_then(Value::as_str)
        .ok_or(DecodeError::MissingType)?
        .to_owned();

    match kind.as_str() {
        LIVE_NOTIFICATION => variant(kind, value).map(InboundMessage::LiveNotification),
        MODERATION_ALERT => Ok(lenient(kind, value, InboundMessage::ModerationAlert)),
        NEW_TRANSCRIPTION => Ok(lenient(kind, value, InboundMessage::NewTranscription)),
        _ => Ok(InboundMessage::Other(kind)),
    }
}

fn variant<T: DeserializeOwned>(kind: String, value: Value) -> Result<T, DecodeError> {
    serde_json::from_value(value).map_err(|source| DecodeError::Variant { kind, source })
}

fn lenient<T: DeserializeOwned>(
    kind: String,
    value: Value,
    wrap: fn(T) -> InboundMessage,
) -> InboundMessage {
    match serde_json::from_value(value) {
        Ok(v) => wrap(v),
        Err(e) => {
            debug!(%kind, "unexpected payload shape: {e}");
            InboundMessage::Other(kind)
        }
    }
}
