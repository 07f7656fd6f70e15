//! Typed stand-in for a microphone.
//!
//! With `--voice`, `voice <words>` hands the words to the shop as if they had
//! been heard. The REPL keeps the sending half; the shop owns this end.

use std::sync::mpsc::{Receiver, Sender, channel};

use bazaar_storefront::voice::{SpeechInput, VoiceError};

pub struct TypedSpeech {
    utterances: Receiver<String>,
}

impl TypedSpeech {
    /// Create the speech input and the sender that feeds it.
    #[must_use]
    pub fn channel() -> (Self, Sender<String>) {
        let (tx, rx) = channel();
        (Self { utterances: rx }, tx)
    }
}

impl SpeechInput for TypedSpeech {
    fn listen(&mut self) -> Result<String, VoiceError> {
        self.utterances
            .try_recv()
            .ok()
            .filter(|text| !text.trim().is_empty())
            .ok_or(VoiceError::NothingHeard)
    }
}
