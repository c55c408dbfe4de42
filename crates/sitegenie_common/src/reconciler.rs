//! Session Reconciler
//!
//! Rebuilds the in-memory Conversation from the durable log at load time and
//! after a reset. Reconciliation only reads history; it never rewrites it.

use crate::error::StoreError;
use crate::store::MessageStore;
use crate::turn::Conversation;
use tracing::info;

pub struct SessionReconciler<'a> {
    store: &'a MessageStore,
}

impl<'a> SessionReconciler<'a> {
    pub fn new(store: &'a MessageStore) -> Self {
        Self { store }
    }

    /// `[system turn] + stored history`, or just `[system turn]` when the log
    /// is empty.
    pub fn load_or_initialize(&self) -> Result<Conversation, StoreError> {
        let history = self.store.read_all()?;
        if history.is_empty() {
            info!("No stored history, starting a fresh conversation");
            return Ok(Conversation::seeded());
        }

        info!("Restored {} turns from {}", history.len(), self.store.path().display());
        Ok(Conversation::from_history(history))
    }

    /// Truncate the log, then re-seed the conversation.
    ///
    /// If the log cannot be cleared the conversation is left as it was, so
    /// what is on screen still matches what a restart would show.
    pub fn reset(&self, conversation: &mut Conversation) -> Result<(), StoreError> {
        self.store.clear()?;
        *conversation = Conversation::seeded();
        info!("Conversation reset");
        Ok(())
    }
}
