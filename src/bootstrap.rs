use crate::config::Config;
use crate::error::AppResult;
use crate::reconcile::{ContractsSession, PollScheduler};
use crate::remote::hodl::HodlApi;
use crate::store::{CredentialStore, FileStore};
use std::sync::Arc;
use tracing::info;

/// Wire the store, remote client, session and scheduler together.
pub async fn initialize(config: &Config) -> AppResult<(Arc<ContractsSession>, PollScheduler)> {
    info!("Initializing application components ...");

    let store: Arc<dyn CredentialStore> = Arc::new(FileStore::new(&config.store_path));

    let api_key = store.api_key().await?;
    let service = Arc::new(HodlApi::new(&config.api_base_url, &api_key));
    info!("✅ Exchange client ready for {}", config.api_base_url);

    let session = Arc::new(ContractsSession::new(
        service,
        store,
        &config.web_base_url,
    ));
    let scheduler = PollScheduler::new(session.clone(), config.poll_interval);

    Ok((session, scheduler))
}
