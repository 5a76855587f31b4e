//! A debate session: two backends, one transcript, and whose turn it is.
//!
//! The next speaker is never stored. It is derived from the transcript length: side A
//! speaks when the length is even, side B when it is odd. A human interjection is appended
//! like any other entry and therefore also flips the parity, so after the human speaks the
//! turn passes to the *other* side from the one that would otherwise have spoken next.
//!
//! ## States
//!
//! ```text
//!            start()               begin_turn()
//!   Idle ───────────────► Ready ────────────────► AwaitingReply
//!    ▲                    │  ▲                        │
//!    └──── reset() ───────┘  └── complete_turn() ─────┘
//!                               (success appends, failure does not)
//! ```
//!
//! A turn is dispatched with [`DebateSession::begin_turn`], which hands out a
//! [`PendingTurn`] ticket, and finished with [`DebateSession::complete_turn`]. A ticket that
//! no longer matches the session (the turn was cancelled or the session reset in the
//! meantime) is rejected and its result discarded. [`DebateSession::take_turn`] wraps both
//! steps around a call to the [`TurnOrchestrator`].
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use duologue::orchestrator::TurnOrchestrator;
//! use duologue::registry::BackendRegistry;
//! use duologue::session::DebateSession;
//! use duologue::{Credentials, DebateConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let registry = Arc::new(BackendRegistry::with_defaults(&DebateConfig::default()));
//!     let orchestrator = TurnOrchestrator::new(registry, Credentials::Environment);
//!
//!     let mut session = DebateSession::new("anthropic", "gemini", "Is water wet?");
//!     session.start_and_take_turn(&orchestrator).await?;
//!     session.take_turn(&orchestrator).await?;
//!     session.inject_and_take_turn(&orchestrator, "Please define 'wet' first.").await?;
//!
//!     for entry in session.transcript() {
//!         println!("{}: {}", entry.speaker, entry.text);
//!     }
//!     Ok(())
//! }
//! ```

use log::{debug, info, warn};
use uuid::Uuid;

use crate::duologue::error::DebateError;
use crate::duologue::orchestrator::TurnOrchestrator;
use crate::duologue::registry::BackendIdentity;
use crate::duologue::transcript::{CanonicalReply, Transcript, TranscriptEntry};

/// Which of the two bound backends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    A,
    B,
}

impl Side {
    /// Side whose turn it is for a transcript of `len` entries.
    pub fn for_turn(len: usize) -> Side {
        if len % 2 == 0 {
            Side::A
        } else {
            Side::B
        }
    }
}

/// Lifecycle state of a [`DebateSession`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Ready,
    AwaitingReply,
}

/// Ticket for a dispatched turn. Hand it back to [`DebateSession::complete_turn`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingTurn {
    pub backend: BackendIdentity,
    pub side: Side,
    /// Transcript length at dispatch; the reply becomes entry number `turn_index + 1`.
    pub turn_index: usize,
    epoch: u64,
}

/// Pick side A or side B for `transcript` by length parity.
pub fn next_speaker<'a>(
    transcript: &[TranscriptEntry],
    side_a: &'a BackendIdentity,
    side_b: &'a BackendIdentity,
) -> &'a BackendIdentity {
    match Side::for_turn(transcript.len()) {
        Side::A => side_a,
        Side::B => side_b,
    }
}

/// One debate between two backends. Owned by its caller; sessions share nothing.
#[derive(Debug)]
pub struct DebateSession {
    id: String,
    side_a: BackendIdentity,
    side_b: BackendIdentity,
    topic: String,
    extra_instructions: Option<String>,
    transcript: Transcript,
    state: SessionState,
    // Bumped whenever outstanding tickets must stop being honoured.
    epoch: u64,
}

impl DebateSession {
    /// New idle session. `side_a` and `side_b` may name the same backend.
    pub fn new(
        side_a: impl Into<BackendIdentity>,
        side_b: impl Into<BackendIdentity>,
        topic: impl Into<String>,
    ) -> Self {
        DebateSession {
            id: Uuid::new_v4().to_string(),
            side_a: side_a.into(),
            side_b: side_b.into(),
            topic: topic.into(),
            extra_instructions: None,
            transcript: Transcript::new(),
            state: SessionState::Idle,
            epoch: 0,
        }
    }

    pub fn with_extra_instructions(mut self, extra: impl Into<String>) -> Self {
        self.extra_instructions = Some(extra.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn side_a(&self) -> &BackendIdentity {
        &self.side_a
    }

    pub fn side_b(&self) -> &BackendIdentity {
        &self.side_b
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// The topic is read at every dispatch, so edits apply from the next turn on.
    pub fn set_topic(&mut self, topic: impl Into<String>) {
        self.topic = topic.into();
    }

    pub fn extra_instructions(&self) -> Option<&str> {
        self.extra_instructions.as_deref()
    }

    pub fn set_extra_instructions(&mut self, extra: Option<String>) {
        self.extra_instructions = extra;
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Backend whose turn it is.
    pub fn next_speaker(&self) -> &BackendIdentity {
        next_speaker(self.transcript.entries(), &self.side_a, &self.side_b)
    }

    pub fn next_side(&self) -> Side {
        Side::for_turn(self.transcript.len())
    }

    /// Text of the most recent entry, or `""` for an empty transcript. Handy for quoting the
    /// last reply back in an interjection.
    pub fn last_entry_text(&self) -> &str {
        self.transcript.last().map(|e| e.text.as_str()).unwrap_or("")
    }

    /// `Idle → Ready`.
    pub fn start(&mut self) -> Result<(), DebateError> {
        if self.state != SessionState::Idle {
            return Err(DebateError::InvalidState(format!(
                "cannot start a session in state {:?}",
                self.state
            )));
        }
        self.state = SessionState::Ready;
        info!(
            "duologue::session[{}]: started ({} vs {})",
            self.id, self.side_a, self.side_b
        );
        Ok(())
    }

    /// Back to `Idle` with an empty transcript. Any dispatched turn is abandoned and its
    /// result will be discarded.
    pub fn reset(&mut self) {
        self.transcript.clear();
        self.state = SessionState::Idle;
        self.epoch += 1;
        info!("duologue::session[{}]: reset", self.id);
    }

    /// Append a human message. It takes a turn slot like any other entry.
    ///
    /// Blank text is rejected; the text is stored trimmed.
    pub fn inject_human(&mut self, text: &str) -> Result<&TranscriptEntry, DebateError> {
        self.require_state(SessionState::Ready, "inject a message")?;
        let text = text.trim();
        if text.is_empty() {
            return Err(DebateError::InvalidInput(
                "Please enter a custom prompt".to_string(),
            ));
        }
        debug!(
            "duologue::session[{}]: human message at turn {}",
            self.id,
            self.transcript.len() + 1
        );
        Ok(self.transcript.push(TranscriptEntry::human(text)))
    }

    /// `Ready → AwaitingReply`. Returns the ticket for the side whose turn it is.
    pub fn begin_turn(&mut self) -> Result<PendingTurn, DebateError> {
        self.require_state(SessionState::Ready, "dispatch a turn")?;
        self.state = SessionState::AwaitingReply;
        Ok(PendingTurn {
            backend: self.next_speaker().clone(),
            side: self.next_side(),
            turn_index: self.transcript.len(),
            epoch: self.epoch,
        })
    }

    /// `AwaitingReply → Ready`, appending the reply on success.
    ///
    /// On failure the transcript is left as it was and the upstream error is returned; the
    /// same side can be retried with another [`begin_turn`](Self::begin_turn). A stale ticket
    /// is rejected with [`DebateError::InvalidState`] and `result` is dropped unapplied.
    pub fn complete_turn(
        &mut self,
        ticket: PendingTurn,
        result: Result<CanonicalReply, DebateError>,
    ) -> Result<&TranscriptEntry, DebateError> {
        if !self.is_current(&ticket) {
            warn!(
                "duologue::session[{}]: discarding result of abandoned turn {}",
                self.id,
                ticket.turn_index + 1
            );
            return Err(DebateError::InvalidState(
                "turn was abandoned; result discarded".to_string(),
            ));
        }

        self.state = SessionState::Ready;
        match result {
            Ok(reply) => Ok(self.transcript.push(reply.into())),
            Err(err) => Err(err),
        }
    }

    /// Give up on the outstanding turn, if any. Its result will be discarded when it arrives.
    pub fn cancel_pending(&mut self) {
        if self.state == SessionState::AwaitingReply {
            self.epoch += 1;
            self.state = SessionState::Ready;
            debug!("duologue::session[{}]: pending turn cancelled", self.id);
        }
    }

    /// Run the next turn through `orchestrator`, speaking with the backend's registered label.
    ///
    /// Dropping the returned future before it finishes (for example under
    /// `tokio::time::timeout`) cancels the pending turn, leaving the session `Ready` with the
    /// transcript untouched.
    pub async fn take_turn(
        &mut self,
        orchestrator: &TurnOrchestrator,
    ) -> Result<&TranscriptEntry, DebateError> {
        let ticket = self.begin_turn()?;

        let label = match orchestrator.registry().resolve(ticket.backend.as_str()) {
            Ok(registered) => registered.label.clone(),
            Err(err) => return self.complete_turn(ticket, Err(err)),
        };

        let backend = ticket.backend.clone();
        let guard = TurnGuard {
            session: &mut *self,
            ticket: Some(ticket),
        };
        let result = orchestrator
            .take_turn(
                &guard.session.topic,
                guard.session.transcript.entries(),
                &backend,
                &label,
                guard.session.extra_instructions.as_deref(),
            )
            .await;
        guard.complete(result)?;

        self.transcript.last().ok_or_else(|| {
            DebateError::InvalidState("transcript is empty after a completed turn".to_string())
        })
    }

    /// Start the session and immediately run side A's opening turn.
    pub async fn start_and_take_turn(
        &mut self,
        orchestrator: &TurnOrchestrator,
    ) -> Result<&TranscriptEntry, DebateError> {
        self.start()?;
        self.take_turn(orchestrator).await
    }

    /// Inject a human message and immediately run the next backend turn.
    ///
    /// If the backend turn fails the human message stays in the transcript.
    pub async fn inject_and_take_turn(
        &mut self,
        orchestrator: &TurnOrchestrator,
        text: &str,
    ) -> Result<&TranscriptEntry, DebateError> {
        self.inject_human(text)?;
        self.take_turn(orchestrator).await
    }

    fn is_current(&self, ticket: &PendingTurn) -> bool {
        self.state == SessionState::AwaitingReply
            && ticket.epoch == self.epoch
            && ticket.turn_index == self.transcript.len()
    }

    fn require_state(&self, expected: SessionState, action: &str) -> Result<(), DebateError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(DebateError::InvalidState(format!(
                "cannot {} while {:?}",
                action, self.state
            )))
        }
    }
}

/// Holds the ticket of a turn run by [`DebateSession::take_turn`]. Dropped with the ticket
/// still held, it cancels the turn.
struct TurnGuard<'a> {
    session: &'a mut DebateSession,
    ticket: Option<PendingTurn>,
}

impl TurnGuard<'_> {
    fn complete(mut self, result: Result<CanonicalReply, DebateError>) -> Result<(), DebateError> {
        match self.ticket.take() {
            Some(ticket) => self.session.complete_turn(ticket, result).map(|_| ()),
            None => Err(DebateError::InvalidState(
                "turn was already completed".to_string(),
            )),
        }
    }
}

impl Drop for TurnGuard<'_> {
    fn drop(&mut self) {
        if let Some(ticket) = self.ticket.take() {
            if self.session.is_current(&ticket) {
                warn!(
                    "duologue::session[{}]: turn {} abandoned before the reply arrived",
                    self.session.id,
                    ticket.turn_index + 1
                );
                self.session.cancel_pending();
            }
        }
    }
}
