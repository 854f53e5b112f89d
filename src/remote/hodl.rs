use crate::contracts::Contract;
use crate::error::{ActionError, FetchError, NotifyError};
use crate::remote::ContractService;
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use tracing::debug;

/// Wrapper object the exchange puts around a single contract payload.
#[derive(Deserialize)]
struct ContractEnvelope {
    contract: Contract,
}

#[derive(Deserialize)]
struct AutologinEnvelope {
    autologin_token: String,
}

#[derive(Deserialize)]
struct RemoteErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    errors: Option<Vec<String>>,
}

/// HTTP client for the exchange's v1 contract API, authenticated with
/// the user's API key.
pub struct HodlApi {
    client: Client,
    base_url: String,
    api_key: String,
}

impl HodlApi {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get(&self, path: &str) -> Result<Response, reqwest::Error> {
        self.client
            .get(self.url(path))
            .bearer_auth(&self.api_key)
            .send()
            .await
    }

    async fn post(&self, path: &str, body: serde_json::Value) -> Result<Response, reqwest::Error> {
        self.client
            .post(self.url(path))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
    }

    /// Pull a human-readable rejection message out of an error
    /// response, falling back to the HTTP status line.
    async fn rejection_message(response: Response) -> String {
        let status = response.status();
        match response.json::<RemoteErrorBody>().await {
            Ok(body) => body
                .error
                .or_else(|| body.errors.map(|e| e.join("; ")))
                .unwrap_or_else(|| format!("HTTP {}", status)),
            Err(_) => format!("HTTP {}", status),
        }
    }

    fn map_action_status(status: StatusCode) -> Option<ActionError> {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Some(ActionError::Auth),
            s if s.is_success() => None,
            _ => Some(ActionError::RemoteRejected(String::new())),
        }
    }

    async fn post_action(&self, path: &str) -> Result<(), ActionError> {
        let response = self.post(path, serde_json::json!({})).await?;
        match Self::map_action_status(response.status()) {
            None => Ok(()),
            Some(ActionError::RemoteRejected(_)) => Err(ActionError::RemoteRejected(
                Self::rejection_message(response).await,
            )),
            Some(err) => Err(err),
        }
    }
}

#[async_trait]
impl ContractService for HodlApi {
    async fn get_contract(&self, id: &str) -> Result<Contract, FetchError> {
        let response = self.get(&format!("/contracts/{}", id)).await?;

        match response.status() {
            StatusCode::NOT_FOUND => return Err(FetchError::NotFound(id.to_string())),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => return Err(FetchError::Auth),
            s if !s.is_success() => {
                return Err(FetchError::Network(format!("HTTP {}", s)));
            }
            _ => {}
        }

        let envelope: ContractEnvelope = response
            .json()
            .await
            .map_err(|e| FetchError::Network(format!("bad contract payload: {}", e)))?;

        debug!("✓ Fetched contract {}", envelope.contract.id);
        Ok(envelope.contract)
    }

    async fn mark_as_confirmed(&self, id: &str) -> Result<(), NotifyError> {
        let response = self
            .post(&format!("/contracts/{}/confirm", id), serde_json::json!({}))
            .await?;

        if !response.status().is_success() {
            return Err(NotifyError::Network(format!(
                "confirm rejected with HTTP {}",
                response.status()
            )));
        }
        Ok(())
    }

    async fn mark_as_paid(&self, id: &str) -> Result<(), ActionError> {
        self.post_action(&format!("/contracts/{}/mark_as_paid", id))
            .await
    }

    async fn cancel_contract(&self, id: &str) -> Result<(), ActionError> {
        self.post_action(&format!("/contracts/{}/cancel", id)).await
    }

    async fn request_autologin_token(&self, signature_key: &str) -> Result<String, ActionError> {
        let response = self
            .post(
                "/users/me/request_autologin_token",
                serde_json::json!({ "signature": signature_key }),
            )
            .await?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => return Err(ActionError::Auth),
            s if !s.is_success() => {
                return Err(ActionError::RemoteRejected(
                    Self::rejection_message(response).await,
                ));
            }
            _ => {}
        }

        let envelope: AutologinEnvelope = response
            .json()
            .await
            .map_err(|e| ActionError::Network(format!("bad token payload: {}", e)))?;
        Ok(envelope.autologin_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_status_mapping() {
        assert!(HodlApi::map_action_status(StatusCode::OK).is_none());
        assert!(HodlApi::map_action_status(StatusCode::CREATED).is_none());
        assert!(matches!(
            HodlApi::map_action_status(StatusCode::UNAUTHORIZED),
            Some(ActionError::Auth)
        ));
        assert!(matches!(
            HodlApi::map_action_status(StatusCode::UNPROCESSABLE_ENTITY),
            Some(ActionError::RemoteRejected(_))
        ));
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let api = HodlApi::new("https://example.com/api/v1/", "key");
        assert_eq!(api.url("/contracts/1"), "https://example.com/api/v1/contracts/1");
    }
}
