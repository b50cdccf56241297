//! Client error taxonomy.

use derive_more::{Display, Error};

use crate::protocol::GameRuleType;

/// Errors surfaced by the match client.
///
/// Transport errors are retried at the stream layer only; everything else is
/// fatal unless the caller's event-error hook opts to continue (see
/// [`ConnectCallbacks`](crate::ConnectCallbacks)).
#[derive(Debug, Display, Error)]
pub enum ClientError {
    /// Connection, DNS, or timeout failure while talking to the server.
    #[display("transport error: {message}")]
    Transport {
        /// Underlying transport failure, formatted.
        message: String,
    },

    /// The server rejected the supplied credentials (HTTP 401).
    #[display("authentication failed")]
    Authentication,

    /// The server answered with a status or body the protocol does not allow.
    #[display("unexpected server response: status {status}: {body}")]
    UnexpectedResponse {
        /// HTTP status code of the response.
        status: u16,
        /// Response body, possibly empty.
        body: String,
    },

    /// A streamed event or fetched document was malformed.
    #[display("protocol parse error: {message}")]
    ProtocolParse {
        /// What was missing or malformed.
        message: String,
    },

    /// The client was driven in an unsupported way before streaming started.
    #[display("configuration error: {message}")]
    Configuration {
        /// What was misconfigured.
        message: String,
    },

    /// The supplied engine does not declare the capability the match requires.
    #[display("the thinking engine does not support the {expected} rule")]
    CapabilityMismatch {
        /// Rule variant the match descriptor selected.
        expected: GameRuleType,
    },

    /// Posting a shot or end-setup choice was refused by the server.
    #[display("action submission failed: status {status}: {body}")]
    ActionSubmission {
        /// HTTP status code of the refusal.
        status: u16,
        /// Response body, possibly empty.
        body: String,
    },
}

impl ClientError {
    /// Creates a [`ClientError::ProtocolParse`].
    pub fn parse(message: impl Into<String>) -> Self {
        Self::ProtocolParse {
            message: message.into(),
        }
    }

    /// Creates a [`ClientError::Configuration`].
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates a [`ClientError::UnexpectedResponse`] from a status and body.
    pub fn unexpected(status: u16, body: impl Into<String>) -> Self {
        Self::UnexpectedResponse {
            status,
            body: body.into(),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::ProtocolParse {
            message: err.to_string(),
        }
    }
}
