use serde::{Deserialize, Serialize};

use crate::{Confidence, Emotion};

/// Authoritative score snapshot, always in host perspective.
///
/// Every scoring message carries the full pair rather than a delta, so a
/// joiner that missed an update converges on the next one. The joiner maps
/// the pair into its own perspective on receipt; it never increments.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ScorePair {
    /// The host's score.
    pub host: u32,
    /// The joiner's score.
    pub joiner: u32,
}

/// A round or match winner in wire (host) perspective.
///
/// The wire never says "you" or "me"; each side maps `Host`/`Joiner` onto its
/// own role on receipt.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WireWinner {
    /// The host won.
    Host,
    /// The joiner won.
    Joiner,
    /// Nobody scored.
    Draw,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub(crate) struct MessageHeader {
    pub magic: u16,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) enum MessageBody {
    /// Display-name exchange, sent by both sides once the channel opens.
    PlayerInfo { name: String },
    /// The sender's readiness announcement. Direction-agnostic.
    Ready,
    /// Host only. Starts a match (fresh or rematch) at round 1.
    GameStart {
        round: u32,
        emotion: Emotion,
        scores: ScorePair,
    },
    /// Periodic smoothed progress report, sent by both sides while a round
    /// is active. Lossy by nature; the latest value wins.
    EmotionUpdate { emotion: Emotion, value: Confidence },
    /// Host only. Resolves the current round and carries the updated scores.
    RoundWin { winner: WireWinner, scores: ScorePair },
    /// Host only. Advances to the next round with a new target emotion.
    NextRound { round: u32, emotion: Emotion },
    /// Host only. Terminates the match with the final scores.
    GameOver { winner: WireWinner, scores: ScorePair },
    /// Host only. Announces an in-place reset before the rematch's
    /// `game_start`.
    PlayAgain,
    /// Graceful departure notice from either side.
    Leave,
}

/// A message a [`ReliableChannel`] carries between the two peers. Implementors
/// of the channel treat it as opaque; construction and interpretation belong
/// to the sessions.
///
/// [`ReliableChannel`]: crate::ReliableChannel
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub(crate) header: MessageHeader,
    pub(crate) body: MessageBody,
}
