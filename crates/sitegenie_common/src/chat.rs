//! Chat interaction handler
//!
//! Owns the Conversation for one interactive session and runs each user turn
//! through classification, the model gateway and the message store.
//! Storage and gateway failures are scoped to the turn that hit them: the
//! session keeps going on in-memory state. If history could not be loaded at
//! start, nothing is written until a successful reset, so the log never
//! drifts from what is on screen.

use crate::classifier::{self, Decision};
use crate::error::{GatewayError, StoreError};
use crate::gateway::ModelGateway;
use crate::reconciler::SessionReconciler;
use crate::store::MessageStore;
use crate::turn::{Conversation, Role, Turn};
use tracing::warn;

/// Assistant text recorded when the model call fails
pub const GATEWAY_FAILURE_REPLY: &str =
    "Sorry, I couldn't get an answer from the model right now. Please try again.";

/// How the reply for a turn was produced
#[derive(Debug, Clone, PartialEq)]
pub enum ReplySource {
    /// Fixed refusal, model not called
    Refused,
    /// Canned self-introduction, model not called
    Identified,
    /// Model completion
    Generated,
    /// Model call failed; reply is GATEWAY_FAILURE_REPLY
    GatewayFailed(GatewayError),
}

/// Result of one user submission
#[derive(Debug)]
pub struct TurnOutcome {
    pub reply: String,
    pub source: ReplySource,
    /// False when the session is running in memory only
    pub saved: bool,
    /// Persistence failures hit while recording this turn
    pub storage_errors: Vec<StoreError>,
}

impl TurnOutcome {
    pub fn persisted(&self) -> bool {
        self.saved && self.storage_errors.is_empty()
    }
}

/// One interactive session: the conversation plus its collaborators
pub struct ChatSession<'a, G: ModelGateway + ?Sized> {
    store: &'a MessageStore,
    gateway: &'a G,
    conversation: Conversation,
    /// Cleared when the stored history could not be loaded
    persisting: bool,
}

impl<'a, G: ModelGateway + ?Sized> ChatSession<'a, G> {
    /// Reconcile with the store once and start the session.
    ///
    /// If history cannot be read the session starts from the system turn
    /// alone, stops writing to the store, and the error is returned
    /// alongside it.
    pub fn start(store: &'a MessageStore, gateway: &'a G) -> (Self, Option<StoreError>) {
        let (conversation, error) = match SessionReconciler::new(store).load_or_initialize() {
            Ok(conversation) => (conversation, None),
            Err(e) => {
                warn!("Could not load chat history, this session will not be saved: {}", e);
                (Conversation::seeded(), Some(e))
            }
        };

        let persisting = error.is_none();
        (
            Self {
                store,
                gateway,
                conversation,
                persisting,
            },
            error,
        )
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// True while turns are being written to the store
    pub fn is_persisting(&self) -> bool {
        self.persisting
    }

    /// Handle one user turn and record both sides of the exchange
    pub fn submit(&mut self, input: &str) -> TurnOutcome {
        let mut storage_errors = Vec::new();

        self.record(Turn::user(input), &mut storage_errors);

        let decision = classifier::classify(input);
        let (reply, source) = match decision.canned_reply() {
            Some(text) => {
                let source = if decision == Decision::Identify {
                    ReplySource::Identified
                } else {
                    ReplySource::Refused
                };
                (text.to_string(), source)
            }
            None => match self.gateway.generate(&self.conversation.transcript()) {
                Ok(text) => (text, ReplySource::Generated),
                Err(e) => {
                    warn!("Model gateway failed for this turn: {}", e);
                    (GATEWAY_FAILURE_REPLY.to_string(), ReplySource::GatewayFailed(e))
                }
            },
        };

        self.record(Turn::assistant(reply.clone()), &mut storage_errors);

        TurnOutcome {
            reply,
            source,
            saved: self.persisting,
            storage_errors,
        }
    }

    /// Clear stored history and start over from the system turn.
    /// An empty log matches the fresh conversation, so saving resumes.
    pub fn reset(&mut self) -> Result<(), StoreError> {
        SessionReconciler::new(self.store).reset(&mut self.conversation)?;
        self.persisting = true;
        Ok(())
    }

    fn record(&mut self, turn: Turn, errors: &mut Vec<StoreError>) {
        debug_assert!(turn.role != Role::System);
        self.conversation.push(turn);
        if !self.persisting {
            return;
        }

        if let Some(turn) = self.conversation.turns().last() {
            if let Err(e) = self.store.append(turn.role, &turn.content) {
                warn!("Turn kept in memory only: {}", e);
                errors.push(e);
            }
        }
    }
}
