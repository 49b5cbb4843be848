//! Runtime for driving conversations and operator flows
//!
//! Owns the per-user sessions, runs the receive loop and executes the
//! effects the state machine asks for.

mod executor;
mod router;


pub use executor::{BotRuntime, DispatchError};

use crate::state_machine::{ConvState, DeleteTarget, Session};
use crate::store::UserId;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Per-user sessions, keyed by user id
///
/// A user with nothing in flight has no entry. Racing events for the same
/// user are last-write-wins.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<UserId, Session>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, user: UserId) -> Session {
        self.sessions
            .read()
            .await
            .get(&user)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn conversation(&self, user: UserId) -> ConvState {
        self.get(user).await.conversation
    }

    pub async fn set_conversation(&self, user: UserId, state: ConvState) {
        self.update(user, |session| session.conversation = state).await;
    }

    pub async fn set_pending_delete(&self, user: UserId, target: Option<DeleteTarget>) {
        self.update(user, |session| session.pending_delete = target).await;
    }

    /// Remove and return the user's pending delete, if any
    pub async fn take_pending_delete(&self, user: UserId) -> Option<DeleteTarget> {
        let mut taken = None;
        self.update(user, |session| taken = session.pending_delete.take())
            .await;
        taken
    }

    /// Forget everything about the user
    pub async fn reset(&self, user: UserId) {
        self.sessions.write().await.remove(&user);
    }

    /// Number of users with something in flight
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    async fn update(&self, user: UserId, apply: impl FnOnce(&mut Session)) {
        let mut sessions = self.sessions.write().await;
        let session = sessions.entry(user).or_default();
        apply(session);
        if session.is_empty() {
            sessions.remove(&user);
        }
    }
}
