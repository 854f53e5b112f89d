use crate::reconcile::session::ContractsSession;
use std::sync::Arc;
use std::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{error, info, warn};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);

/// Drives reconciliation at a fixed cadence, bound to the owning
/// screen's visible lifetime: `start()` on activation, `stop()` on
/// deactivation.
///
/// The loop awaits each pass before sleeping for the next tick, so
/// passes never overlap from the scheduler's side; `stop()` aborts the
/// task, after which no further passes or remote calls happen.
pub struct PollScheduler {
    session: Arc<ContractsSession>,
    poll_interval: Duration,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl PollScheduler {
    pub fn new(session: Arc<ContractsSession>, poll_interval: Duration) -> Self {
        Self {
            session,
            poll_interval,
            handle: Mutex::new(None),
        }
    }

    /// Run one immediate pass, then keep reconciling every
    /// `poll_interval`. A failed pass does not stop the schedule; the
    /// next tick retries.
    pub fn start(&self) {
        let mut handle = self.handle.lock().unwrap();
        if handle.is_some() {
            warn!("⚠ Poll scheduler already running, ignoring start()");
            return;
        }

        info!(
            "⏰ Starting contract poll every {}s",
            self.poll_interval.as_secs()
        );

        let session = self.session.clone();
        let period = self.poll_interval;

        *handle = Some(tokio::spawn(async move {
            if let Err(err) = session.reconcile_now().await {
                error!("❌ Initial reconciliation pass failed: {}", err);
            }

            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // the first tick of a fresh interval completes immediately
            ticker.tick().await;

            loop {
                ticker.tick().await;
                if let Err(err) = session.reconcile_now().await {
                    error!("❌ Reconciliation pass failed: {}", err);
                }
            }
        }));
    }

    /// Cancel the recurring pass. Safe to call when never started.
    pub fn stop(&self) {
        if let Some(handle) = self.handle.lock().unwrap().take() {
            handle.abort();
            info!("⏹ Contract poll stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.lock().unwrap().is_some()
    }
}

impl Drop for PollScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts::models::VolumeBreakdown;
    use crate::contracts::{Contract, ContractStatus, TradeRole};
    use crate::error::{ActionError, AppResult, FetchError, NotifyError};
    use crate::remote::ContractService;
    use crate::store::CredentialStore;
    use async_trait::async_trait;
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingService {
        fetches: AtomicUsize,
    }

    #[async_trait]
    impl ContractService for CountingService {
        async fn get_contract(&self, id: &str) -> Result<Contract, FetchError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            Ok(Contract {
                id: id.to_string(),
                status: ContractStatus::InProgress,
                your_role: TradeRole::Buyer,
                escrow: None,
                volume: dec!(0.5),
                confirmations: 2,
                asset_code: "BTC".to_string(),
                currency_code: "USD".to_string(),
                price: "9000".to_string(),
                volume_breakdown: VolumeBreakdown {
                    goes_to_buyer: dec!(0.495),
                },
                payment_method_instruction: None,
                release_address: None,
                can_be_canceled: false,
                status_text: None,
                is_deposited_enough: None,
            })
        }

        async fn mark_as_confirmed(&self, _id: &str) -> Result<(), NotifyError> {
            Ok(())
        }

        async fn mark_as_paid(&self, _id: &str) -> Result<(), ActionError> {
            Ok(())
        }

        async fn cancel_contract(&self, _id: &str) -> Result<(), ActionError> {
            Ok(())
        }

        async fn request_autologin_token(&self, _key: &str) -> Result<String, ActionError> {
            Ok("token".to_string())
        }
    }

    struct OneIdStore;

    #[async_trait]
    impl CredentialStore for OneIdStore {
        async fn tracked_contract_ids(&self) -> AppResult<Vec<String>> {
            Ok(vec!["1".to_string()])
        }

        async fn api_key(&self) -> AppResult<String> {
            Ok("key".to_string())
        }

        async fn signature_key(&self) -> AppResult<Option<String>> {
            Ok(None)
        }
    }

    fn scheduler() -> (PollScheduler, Arc<CountingService>) {
        let service = Arc::new(CountingService {
            fetches: AtomicUsize::new(0),
        });
        let session = Arc::new(ContractsSession::new(
            service.clone(),
            Arc::new(OneIdStore),
            "https://hodlhodl.com",
        ));
        (
            PollScheduler::new(session, DEFAULT_POLL_INTERVAL),
            service,
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_runs_immediate_pass_then_ticks() {
        let (scheduler, service) = scheduler();
        scheduler.start();

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(service.fetches.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_secs(61)).await;
        assert_eq!(service.fetches.load(Ordering::SeqCst), 2);

        scheduler.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_suppresses_all_further_passes() {
        let (scheduler, service) = scheduler();
        scheduler.start();

        tokio::time::sleep(Duration::from_millis(10)).await;
        let before = service.fetches.load(Ordering::SeqCst);
        assert_eq!(before, 1);

        scheduler.stop();
        assert!(!scheduler.is_running());

        // well past several poll intervals: no remote calls at all
        tokio::time::sleep(Duration::from_secs(300)).await;
        assert_eq!(service.fetches.load(Ordering::SeqCst), before);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_without_start_is_a_no_op() {
        let (scheduler, _service) = scheduler();
        scheduler.stop();
        assert!(!scheduler.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_double_start_keeps_single_schedule() {
        let (scheduler, service) = scheduler();
        scheduler.start();
        scheduler.start();

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(service.fetches.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_secs(61)).await;
        assert_eq!(service.fetches.load(Ordering::SeqCst), 2);

        scheduler.stop();
    }
}
