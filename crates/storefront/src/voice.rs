//! Optional voice input.
//!
//! Speech recognition is not done here; it is delegated to an injected
//! [`SpeechInput`]. When no capability is present the shop reports that voice
//! is unsupported and carries on. A captured transcript is interpreted as a
//! [`VoiceCommand`].

use std::collections::VecDeque;

use thiserror::Error;

/// Advisory shown when no speech capability was injected.
pub const UNSUPPORTED_MESSAGE: &str = "Voice API is not supported on this device.";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VoiceError {
    /// The capability produced no transcript.
    #[error("No speech was recognized.")]
    NothingHeard,

    /// The capability failed.
    #[error("Voice capture failed: {0}")]
    Capture(String),
}

/// A speech-to-text capability.
pub trait SpeechInput: Send {
    /// Capture one utterance and return its transcript.
    ///
    /// # Errors
    ///
    /// Returns `VoiceError` when nothing usable was captured.
    fn listen(&mut self) -> Result<String, VoiceError>;
}

/// Speech input that replays prepared transcripts in order.
///
/// Used by the terminal client, where the shopper types what they would say,
/// and by tests.
#[derive(Debug, Default, Clone)]
pub struct ScriptedSpeech {
    transcripts: VecDeque<String>,
}

impl ScriptedSpeech {
    #[must_use]
    pub fn new<I, S>(transcripts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            transcripts: transcripts.into_iter().map(Into::into).collect(),
        }
    }

    /// Queue another transcript.
    pub fn say(&mut self, transcript: impl Into<String>) {
        self.transcripts.push_back(transcript.into());
    }
}

impl SpeechInput for ScriptedSpeech {
    fn listen(&mut self) -> Result<String, VoiceError> {
        self.transcripts
            .pop_front()
            .filter(|text| !text.trim().is_empty())
            .ok_or(VoiceError::NothingHeard)
    }
}

/// What a transcript asks the shop to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceCommand {
    /// Transcript as heard, copied into the chat input.
    pub transcript: String,
    /// New search term when the transcript mentions "search".
    pub search: Option<String>,
    /// Whether to switch to the shop view ("cart" was mentioned).
    pub open_shop: bool,
}

impl VoiceCommand {
    /// Interpret a transcript.
    ///
    /// `"search red shoes"` sets the search term to `"red shoes"`; any mention of
    /// "cart" opens the shop view.
    #[must_use]
    pub fn interpret(transcript: &str) -> Self {
        let normalized = transcript.trim().to_lowercase();
        let search = normalized
            .contains("search")
            .then(|| normalized.replacen("search", "", 1).trim().to_string());

        Self {
            transcript: transcript.trim().to_string(),
            search,
            open_shop: normalized.contains("cart"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_search_command_strips_keyword() {
        let command = VoiceCommand::interpret("Search Running Shoes");
        assert_eq!(command.search.as_deref(), Some("running shoes"));
        assert!(!command.open_shop);
        assert_eq!(command.transcript, "Search Running Shoes");
    }

    #[test]
    fn test_cart_command_opens_shop() {
        let command = VoiceCommand::interpret("open my cart");
        assert!(command.open_shop);
        assert_eq!(command.search, None);
    }

    #[test]
    fn test_plain_transcript() {
        let command = VoiceCommand::interpret("recommend something");
        assert_eq!(command.search, None);
        assert!(!command.open_shop);
    }

    #[test]
    fn test_scripted_speech_replays_in_order() {
        let mut speech = ScriptedSpeech::new(["search lamp", "  "]);
        speech.say("cart");

        assert_eq!(speech.listen().unwrap(), "search lamp");
        assert_eq!(speech.listen(), Err(VoiceError::NothingHeard));
        assert_eq!(speech.listen().unwrap(), "cart");
        assert_eq!(speech.listen(), Err(VoiceError::NothingHeard));
    }
}
