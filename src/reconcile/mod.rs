pub mod engine;
pub mod scheduler;
pub mod session;
pub mod status;

pub use engine::{IdOutcome, PassOutcome, ReconcileEngine};
pub use scheduler::PollScheduler;
pub use session::{ContractsSession, SessionState};
