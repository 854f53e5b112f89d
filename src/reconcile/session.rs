use crate::contracts::Contract;
use crate::error::{ActionError, AppResult};
use crate::reconcile::engine::ReconcileEngine;
use crate::remote::ContractService;
use crate::store::CredentialStore;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

/// Observable state the presentation layer renders from. The contract
/// list is replaced wholesale on every pass, never merged.
#[derive(Clone, Debug, Default)]
pub struct SessionState {
    pub contracts: Vec<Contract>,
    pub focused: Option<Contract>,
    pub is_loading: bool,
    /// When the last successful pass published, for freshness display.
    pub last_updated: Option<DateTime<Utc>>,
}

/// One screen's worth of contract-tracking state, owned by the
/// screen's lifecycle controller.
///
/// All mutation goes through this session; the poll scheduler and
/// user-initiated actions share `pass_guard`, so at most one
/// reconciliation pass is ever in flight.
pub struct ContractsSession {
    engine: ReconcileEngine,
    service: Arc<dyn ContractService>,
    store: Arc<dyn CredentialStore>,
    web_base_url: String,
    state: RwLock<SessionState>,
    pass_guard: Mutex<()>,
}

impl ContractsSession {
    pub fn new(
        service: Arc<dyn ContractService>,
        store: Arc<dyn CredentialStore>,
        web_base_url: &str,
    ) -> Self {
        Self {
            engine: ReconcileEngine::new(service.clone()),
            service,
            store,
            web_base_url: web_base_url.trim_end_matches('/').to_string(),
            state: RwLock::new(SessionState {
                is_loading: true,
                ..SessionState::default()
            }),
            pass_guard: Mutex::new(()),
        }
    }

    /// Current state clone for consumers.
    pub async fn snapshot(&self) -> SessionState {
        self.state.read().await.clone()
    }

    /// Select a contract from the current list for the detail view.
    pub async fn focus(&self, id: &str) -> bool {
        let mut state = self.state.write().await;
        let found = state.contracts.iter().find(|c| c.id == id).cloned();
        let hit = found.is_some();
        if hit {
            state.focused = found;
        }
        hit
    }

    /// Close the detail view.
    pub async fn blur(&self) {
        self.state.write().await.focused = None;
    }

    /// Run one reconciliation pass and publish the result.
    ///
    /// A pass that fails before reaching the engine (store unreadable)
    /// leaves the previous contract list untouched; `is_loading` is
    /// cleared either way so the screen never hangs on a spinner.
    pub async fn reconcile_now(&self) -> AppResult<()> {
        let _pass = self.pass_guard.lock().await;

        self.state.write().await.is_loading = true;

        let ids = match self.store.tracked_contract_ids().await {
            Ok(ids) => ids,
            Err(err) => {
                self.state.write().await.is_loading = false;
                return Err(err);
            }
        };

        let focused_id = self
            .state
            .read()
            .await
            .focused
            .as_ref()
            .map(|c| c.id.clone());

        let outcome = self.engine.reconcile(&ids, focused_id.as_deref()).await;

        let mut state = self.state.write().await;
        state.contracts = outcome.contracts;
        // keep the prior focus when this pass did not re-fetch it
        if let Some(fresh) = outcome.refreshed_focus {
            state.focused = Some(fresh);
        }
        state.is_loading = false;
        state.last_updated = Some(Utc::now());

        Ok(())
    }

    /// Mark a contract as paid, then refresh immediately so the list
    /// reflects the new remote state. The remote service is
    /// authoritative and may reject; the error is surfaced as-is with
    /// no retry.
    pub async fn mark_paid(&self, id: &str) -> AppResult<()> {
        self.service.mark_as_paid(id).await?;
        info!("✓ Contract {} marked as paid", id);

        if let Err(err) = self.reconcile_now().await {
            warn!("⚠ Refresh after mark-paid failed: {}", err);
        }
        Ok(())
    }

    /// Cancel a contract, then refresh immediately.
    pub async fn cancel(&self, id: &str) -> AppResult<()> {
        self.service.cancel_contract(id).await?;
        info!("✓ Contract {} canceled", id);

        if let Err(err) = self.reconcile_now().await {
            warn!("⚠ Refresh after cancel failed: {}", err);
        }
        Ok(())
    }

    /// Build a one-time autologin deep link to the contract's web
    /// page. Fails fast when no signature key is stored locally; no
    /// partial side effect happens in that case.
    pub async fn web_login_link(&self, id: &str) -> AppResult<String> {
        let signature_key = self
            .store
            .signature_key()
            .await?
            .ok_or(ActionError::MissingSignatureKey)?;

        let token = self.service.request_autologin_token(&signature_key).await?;
        Ok(format!(
            "{}/contracts/{}?sign_in_token={}",
            self.web_base_url, id, token
        ))
    }
}
