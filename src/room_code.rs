//! Short human-shareable room identifiers.
//!
//! A room code is six characters from a 32-character alphabet of uppercase
//! letters and digits with the visually confusable `I`, `O`, `0`, and `1`
//! removed, so codes can be read aloud or copied from a screen without
//! ambiguity. Input is case-insensitive and trimmed. Collision with an
//! existing session is the transport's report; the host simply generates a
//! fresh code and retries.

use crate::error::ArenaError;
use crate::rng::Pcg32;

/// The code alphabet: uppercase letters and digits minus `I`, `O`, `0`, `1`.
pub const ROOM_CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Number of characters in a room code.
pub const ROOM_CODE_LEN: usize = 6;

/// A validated six-character room code.
///
/// # Examples
///
/// ```
/// use emotion_arena::RoomCode;
///
/// let code: RoomCode = "  ab2cd9 ".parse().expect("valid after normalization");
/// assert_eq!(code.as_str(), "AB2CD9");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoomCode([u8; ROOM_CODE_LEN]);

impl RoomCode {
    /// Generates a fresh random code.
    ///
    /// On a transport-reported collision, call again; the 32^6 code space
    /// makes repeated collisions vanishingly unlikely.
    #[must_use]
    pub fn generate(rng: &mut Pcg32) -> Self {
        let mut chars = [0u8; ROOM_CODE_LEN];
        for slot in &mut chars {
            let index = rng.gen_range(0..ROOM_CODE_ALPHABET.len() as u32) as usize;
            *slot = ROOM_CODE_ALPHABET[index];
        }
        RoomCode(chars)
    }

    /// The code as an uppercase string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        // Invariant: the buffer only ever holds alphabet bytes, which are ASCII.
        std::str::from_utf8(&self.0).unwrap_or("??????")
    }
}

impl std::str::FromStr for RoomCode {
    type Err = ArenaError;

    /// Parses user input: trims surrounding whitespace, uppercases, then
    /// requires exactly six alphabet characters.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        let invalid = || ArenaError::InvalidRoomCode {
            input: trimmed.to_owned(),
        };

        if trimmed.chars().count() != ROOM_CODE_LEN {
            return Err(invalid());
        }
        let mut chars = [0u8; ROOM_CODE_LEN];
        for (slot, ch) in chars.iter_mut().zip(trimmed.chars()) {
            let upper = ch.to_ascii_uppercase();
            if !upper.is_ascii() || !ROOM_CODE_ALPHABET.contains(&(upper as u8)) {
                return Err(invalid());
            }
            *slot = upper as u8;
        }
        Ok(RoomCode(chars))
    }
}

impl std::fmt::Display for RoomCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn generated_codes_use_only_the_alphabet() {
        let mut rng = Pcg32::seed_from_u64(42);
        for _ in 0..100 {
            let code = RoomCode::generate(&mut rng);
            assert_eq!(code.as_str().len(), ROOM_CODE_LEN);
            for byte in code.as_str().bytes() {
                assert!(ROOM_CODE_ALPHABET.contains(&byte));
            }
        }
    }

    #[test]
    fn alphabet_excludes_confusable_characters() {
        for confusable in [b'I', b'O', b'0', b'1'] {
            assert!(!ROOM_CODE_ALPHABET.contains(&confusable));
        }
        assert_eq!(ROOM_CODE_ALPHABET.len(), 32);
    }

    #[test]
    fn parse_is_case_insensitive_and_trims() {
        let code: RoomCode = " ab2cd9\n".parse().unwrap();
        assert_eq!(code.as_str(), "AB2CD9");
    }

    #[test]
    fn parse_rejects_wrong_length() {
        assert!("ABCDE".parse::<RoomCode>().is_err());
        assert!("ABCDEFG".parse::<RoomCode>().is_err());
        assert!("".parse::<RoomCode>().is_err());
    }

    #[test]
    fn parse_rejects_confusable_characters() {
        assert!("AB0CDE".parse::<RoomCode>().is_err());
        assert!("AB1CDE".parse::<RoomCode>().is_err());
        assert!("ABOCDE".parse::<RoomCode>().is_err());
        assert!("ABICDE".parse::<RoomCode>().is_err());
    }

    #[test]
    fn parse_error_reports_the_trimmed_input() {
        let err = " xyz ".parse::<RoomCode>().unwrap_err();
        assert_eq!(
            err,
            ArenaError::InvalidRoomCode {
                input: "xyz".to_owned()
            }
        );
    }

    #[test]
    fn roundtrip_generate_parse() {
        let mut rng = Pcg32::seed_from_u64(7);
        let code = RoomCode::generate(&mut rng);
        let reparsed: RoomCode = code.as_str().to_lowercase().parse().unwrap();
        assert_eq!(code, reparsed);
    }

    #[test]
    fn display_matches_as_str() {
        let mut rng = Pcg32::seed_from_u64(3);
        let code = RoomCode::generate(&mut rng);
        assert_eq!(code.to_string(), code.as_str());
    }
}
