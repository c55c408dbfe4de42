//! SiteGenie shared library
//!
//! Conversation model, durable chat history, session reconciliation, the
//! construction-domain query classifier and the hosted model gateway.

pub mod chat;
pub mod classifier;
pub mod config;
pub mod error;
pub mod gateway;
pub mod reconciler;
pub mod store;
pub mod turn;

pub use chat::{ChatSession, ReplySource, TurnOutcome, GATEWAY_FAILURE_REPLY};
pub use classifier::{classify, Decision};
pub use config::{ColorMode, SiteGenieConfig};
pub use error::{GatewayError, StoreError};
pub use gateway::{FakeGateway, GatewayConfig, GeminiGateway, ModelGateway};
pub use reconciler::SessionReconciler;
pub use store::MessageStore;
pub use turn::{fixed_system_turn, Conversation, Role, Turn};
