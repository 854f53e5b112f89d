use crate::contracts::{Contract, ContractStatus};
use crate::error::FetchError;
use crate::escrow::EscrowVerifier;
use crate::reconcile::status;
use crate::remote::ContractService;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// What happened to one identifier during a pass. Skips are explicit
/// outcomes, not swallowed exceptions, so callers can log and inspect
/// them.
#[derive(Debug)]
pub enum IdOutcome {
    Fetched,
    Canceled,
    FetchFailed(FetchError),
}

/// Result of one full reconciliation pass.
#[derive(Debug)]
pub struct PassOutcome {
    /// Enriched contracts in original identifier order, minus skips.
    pub contracts: Vec<Contract>,
    /// Fresh copy of the focused contract, when this pass fetched it.
    pub refreshed_focus: Option<Contract>,
    /// Per-identifier outcome, in input order.
    pub outcomes: Vec<(String, IdOutcome)>,
}

/// Converts a set of tracked contract identifiers into an enriched,
/// display-ready contract list.
///
/// Fetches run sequentially, which keeps the remote rate limiting
/// trivial and the output order equal to the input order.
pub struct ReconcileEngine {
    service: Arc<dyn ContractService>,
}

impl ReconcileEngine {
    pub fn new(service: Arc<dyn ContractService>) -> Self {
        Self { service }
    }

    /// Run one reconciliation pass over `ids`.
    ///
    /// Per-identifier failures are contained: a failing fetch drops
    /// that contract from this pass only, the next pass retries it.
    /// Canceled contracts are never part of the output.
    pub async fn reconcile(&self, ids: &[String], focused_id: Option<&str>) -> PassOutcome {
        let pass_id = Uuid::new_v4();
        debug!("🔄 Reconciliation pass {} over {} contract(s)", pass_id, ids.len());

        let mut contracts = Vec::with_capacity(ids.len());
        let mut refreshed_focus = None;
        let mut outcomes = Vec::with_capacity(ids.len());

        for id in ids {
            let mut contract = match self.service.get_contract(id).await {
                Ok(contract) => contract,
                Err(err) => {
                    warn!("⚠ Skipping contract {} this pass: {}", id, err);
                    outcomes.push((id.clone(), IdOutcome::FetchFailed(err)));
                    continue;
                }
            };

            if contract.status == ContractStatus::Canceled {
                debug!("Contract {} is canceled, dropping from view", id);
                outcomes.push((id.clone(), IdOutcome::Canceled));
                continue;
            }

            self.enrich(&mut contract).await;

            if focused_id == Some(contract.id.as_str()) {
                refreshed_focus = Some(contract.clone());
            }

            outcomes.push((id.clone(), IdOutcome::Fetched));
            contracts.push(contract);
        }

        info!(
            "✓ Pass {} done: {} shown, {} skipped",
            pass_id,
            contracts.len(),
            outcomes.len() - contracts.len()
        );

        PassOutcome {
            contracts,
            refreshed_focus,
            outcomes,
        }
    }

    /// Verify the escrow address locally and, when it checks out,
    /// notify the exchange and compute the derived display fields.
    ///
    /// The confirmed notification is re-sent every pass; the exchange
    /// tolerates repeats and a failed notification never drops the
    /// contract.
    async fn enrich(&self, contract: &mut Contract) {
        let address = match contract.escrow_address() {
            Some(address) => address.to_string(),
            None => return,
        };

        if !EscrowVerifier::verify(&address) {
            warn!(
                "⚠ Escrow address for contract {} failed local verification",
                contract.id
            );
            return;
        }

        if let Err(err) = self.service.mark_as_confirmed(&contract.id).await {
            warn!("⚠ Confirm notification for {} failed: {}", contract.id, err);
        }

        let escrow = match contract.escrow.as_ref() {
            Some(escrow) => escrow,
            None => return,
        };
        let deposited = status::is_deposited_enough(escrow, contract.confirmations, contract);

        contract.is_deposited_enough = Some(deposited);
        contract.status_text = Some(status::derive_status_text(contract, deposited));
    }
}
