use std::error::Error;
use std::fmt;
use std::fmt::Display;

/// This enum contains all error messages this library can return. Most API
/// functions will generally return a [`Result<(), ArenaError>`].
///
/// The taxonomy mirrors how errors must be surfaced to a player: capture
/// errors are recoverable by retry, transport errors each carry a distinct
/// user-facing meaning, and out-of-phase requests are rejected without
/// touching protocol state.
///
/// [`Result<(), ArenaError>`]: std::result::Result
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ArenaError {
    /// You made an invalid request, usually by calling an operation that the
    /// session's role or phase does not permit.
    InvalidRequest {
        /// Further specifies why the request was invalid.
        info: String,
    },
    /// The readiness barrier is not satisfied yet. The host may only start
    /// the match once both its own readiness and the joiner's `ready`
    /// announcement have been observed.
    NotReady,
    /// The supplied room code does not normalize to six characters of the
    /// room-code alphabet.
    InvalidRoomCode {
        /// The rejected input, after trimming.
        input: String,
    },
    /// The transport reported that no peer is listening under the given room
    /// code.
    RoomNotFound,
    /// The transport reported a local network failure.
    NetworkUnreachable,
    /// The transport's rendezvous server could not be reached.
    ServerUnreachable,
    /// The transport failed for a reason it could not classify.
    ConnectionFailed {
        /// The transport's own description of the failure.
        context: String,
    },
    /// No connection was established within the configured bound. The room
    /// may not exist, or the host may have left.
    ConnectTimeout {
        /// How long the session waited, in milliseconds.
        waited_ms: u64,
    },
    /// The camera or media pipeline is denied or unavailable. Fatal to
    /// starting a match, recoverable by retry or a permission grant.
    CaptureUnavailable {
        /// A description of the capture failure.
        context: String,
    },
    /// The peer channel is closed; the operation needs an open channel.
    ChannelClosed,
    /// Serialization or deserialization of a protocol message failed.
    SerializationError {
        /// A description of what failed to serialize or deserialize.
        context: String,
    },
}

impl Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArenaError::InvalidRequest { info } => {
                write!(f, "Invalid request: {}", info)
            }
            ArenaError::NotReady => {
                write!(f, "Both players must be ready before the match can start.")
            }
            ArenaError::InvalidRoomCode { input } => {
                write!(f, "'{}' is not a valid 6-character room code.", input)
            }
            ArenaError::RoomNotFound => {
                write!(f, "Room not found. Check the code.")
            }
            ArenaError::NetworkUnreachable => {
                write!(f, "Network error. Check your connection.")
            }
            ArenaError::ServerUnreachable => {
                write!(f, "Server error. Try again.")
            }
            ArenaError::ConnectionFailed { context } => {
                write!(f, "Connection failed: {}", context)
            }
            ArenaError::ConnectTimeout { waited_ms } => {
                write!(
                    f,
                    "Connection timeout after {} ms. Room may not exist or host left.",
                    waited_ms
                )
            }
            ArenaError::CaptureUnavailable { context } => {
                write!(f, "Camera unavailable: {}", context)
            }
            ArenaError::ChannelClosed => {
                write!(f, "The peer channel is closed.")
            }
            ArenaError::SerializationError { context } => {
                write!(f, "Serialization error: {}", context)
            }
        }
    }
}

impl Error for ArenaError {}

/// Classification of a connect failure as reported by the external transport.
///
/// The transport collaborator maps its own error vocabulary onto these kinds;
/// [`ArenaError::from`] turns each into the distinct user-facing error the
/// join flow requires (peer-not-found, network, and server failures must not
/// collapse into one message).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TransportErrorKind {
    /// No peer is listening under the dialed identity.
    PeerNotFound,
    /// A local network failure.
    Network,
    /// The rendezvous/relay server could not be reached.
    Server,
    /// Anything the transport could not classify.
    Other,
}

impl From<TransportErrorKind> for ArenaError {
    fn from(kind: TransportErrorKind) -> Self {
        match kind {
            TransportErrorKind::PeerNotFound => ArenaError::RoomNotFound,
            TransportErrorKind::Network => ArenaError::NetworkUnreachable,
            TransportErrorKind::Server => ArenaError::ServerUnreachable,
            TransportErrorKind::Other => ArenaError::ConnectionFailed {
                context: "unclassified transport failure".to_owned(),
            },
        }
    }
}
