//! Transcript types: the ordered log of a debate and the canonical reply every backend
//! adapter is normalized into.
//!
//! Entry order is the only source of turn parity, so the transcript is append-only from the
//! library's point of view. Only [`Transcript::clear`] (used by a session reset) empties it.

use serde::{Deserialize, Serialize};

/// Speaker label recorded for human interjections.
pub const HUMAN_SPEAKER: &str = "User";

/// One turn of the debate: who spoke and what they said.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    /// Display label of the speaker.
    pub speaker: String,
    /// Body of the turn. May contain lightweight markup produced by the backend.
    pub text: String,
}

impl TranscriptEntry {
    pub fn new(speaker: impl Into<String>, text: impl Into<String>) -> Self {
        TranscriptEntry {
            speaker: speaker.into(),
            text: text.into(),
        }
    }

    /// Entry for a message typed by the human moderator.
    pub fn human(text: impl Into<String>) -> Self {
        Self::new(HUMAN_SPEAKER, text)
    }
}

/// The normalized output of a turn, identical in shape for every backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalReply {
    pub speaker: String,
    pub text: String,
}

impl From<CanonicalReply> for TranscriptEntry {
    fn from(reply: CanonicalReply) -> Self {
        TranscriptEntry {
            speaker: reply.speaker,
            text: reply.text,
        }
    }
}

/// Ordered, append-only history of one debate.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry and return a reference to it.
    pub fn push(&mut self, entry: TranscriptEntry) -> &TranscriptEntry {
        self.entries.push(entry);
        &self.entries[self.entries.len() - 1]
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&TranscriptEntry> {
        self.entries.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TranscriptEntry> {
        self.entries.iter()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}

impl AsRef<[TranscriptEntry]> for Transcript {
    fn as_ref(&self) -> &[TranscriptEntry] {
        &self.entries
    }
}

impl From<Vec<TranscriptEntry>> for Transcript {
    fn from(entries: Vec<TranscriptEntry>) -> Self {
        Transcript { entries }
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a TranscriptEntry;
    type IntoIter = std::slice::Iter<'a, TranscriptEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
