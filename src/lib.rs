//! Tracks peer-to-peer escrow trading contracts on a remote exchange.
//!
//! The core is the reconciliation engine: a polling loop that fetches
//! each tracked contract, verifies the escrow address locally, derives
//! a human-readable status line, and publishes the result to session
//! state a presentation layer renders from. User actions (mark paid,
//! cancel, open on website) go through the same session.

pub mod bootstrap;
pub mod config;
pub mod contracts;
pub mod error;
pub mod escrow;
pub mod reconcile;
pub mod remote;
pub mod store;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use reconcile::{ContractsSession, PollScheduler, SessionState};
