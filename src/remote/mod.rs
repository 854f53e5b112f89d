pub mod hodl;

use crate::contracts::Contract;
use crate::error::{ActionError, FetchError, NotifyError};
use async_trait::async_trait;

/// Remote exchange surface consumed by the reconciliation engine.
///
/// The exchange is authoritative for contract state; this crate never
/// second-guesses an accepted action. Implementations must be cheap to
/// clone behind an `Arc` and safe to call concurrently.
#[async_trait]
pub trait ContractService: Send + Sync {
    /// Fetch the current remote state of one contract.
    async fn get_contract(&self, id: &str) -> Result<Contract, FetchError>;

    /// Tell the exchange we verified the escrow address locally.
    ///
    /// Sent at least once per pass for every verified contract; the
    /// exchange tolerates repeats.
    async fn mark_as_confirmed(&self, id: &str) -> Result<(), NotifyError>;

    /// Mark the contract as paid by the buyer.
    async fn mark_as_paid(&self, id: &str) -> Result<(), ActionError>;

    /// Cancel the contract.
    async fn cancel_contract(&self, id: &str) -> Result<(), ActionError>;

    /// Exchange the locally held signature key for a one-time
    /// autologin token usable in a web deep link.
    async fn request_autologin_token(&self, signature_key: &str) -> Result<String, ActionError>;
}
