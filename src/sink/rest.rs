use super::SignalSink;
use crate::error::Error;
use crate::models::{Signal, SignalStatus};
use crate::Result;
use reqwest::{Client, Response};
use serde::Deserialize;
use std::collections::HashMap;

/// Signal as held by the remote store, under the key the store assigned
#[derive(Debug, Clone, PartialEq)]
pub struct StoredSignal {
    pub key: String,
    pub signal: Signal,
}

#[derive(Debug, Deserialize)]
struct PushResponse {
    name: String,
}

/// Client for a Firebase-style JSON REST signal store
///
/// Layout under `base_url`:
/// - `POST /signals.json` appends a signal, the store answers `{"name": key}`
/// - `GET /signals.json` returns a map of key to signal, or `null` when empty
/// - `PUT /signals/{key}/status.json` sets the outcome
/// - `DELETE /signals/{key}.json` removes a signal
#[derive(Debug, Clone)]
pub struct RestSignalStore {
    client: Client,
    base_url: String,
}

impl RestSignalStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(Error::Sink {
                status: status.as_u16(),
                url: response.url().to_string(),
            })
        }
    }

    /// Store a signal and return the key the store assigned to it
    pub async fn push(&self, signal: &Signal) -> Result<String> {
        let response = self
            .client
            .post(self.url("signals.json"))
            .json(signal)
            .send()
            .await?;
        let created: PushResponse = Self::check(response)?.json().await?;

        tracing::debug!("Stored {} {} as {}", signal.symbol, signal.pattern, created.name);
        Ok(created.name)
    }

    /// Every stored signal, newest first
    pub async fn load(&self) -> Result<Vec<StoredSignal>> {
        let response = self.client.get(self.url("signals.json")).send().await?;
        let body: Option<HashMap<String, Signal>> = Self::check(response)?.json().await?;

        let mut stored: Vec<StoredSignal> = body
            .unwrap_or_default()
            .into_iter()
            .map(|(key, signal)| StoredSignal { key, signal })
            .collect();
        stored.sort_by(|a, b| b.signal.created_at.cmp(&a.signal.created_at));

        tracing::info!("Loaded {} signals from {}", stored.len(), self.base_url);
        Ok(stored)
    }

    pub async fn update_status(&self, key: &str, status: SignalStatus) -> Result<()> {
        let response = self
            .client
            .put(self.url(&format!("signals/{}/status.json", key)))
            .json(&status)
            .send()
            .await?;
        Self::check(response)?;
        Ok(())
    }

    pub async fn delete(&self, key: &str) -> Result<()> {
        let response = self
            .client
            .delete(self.url(&format!("signals/{}.json", key)))
            .send()
            .await?;
        Self::check(response)?;
        Ok(())
    }
}

impl SignalSink for RestSignalStore {
    /// Fire-and-forget upload on the current tokio runtime
    fn add_signal(&self, signal: &Signal) {
        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                tracing::warn!("No tokio runtime, {} {} not stored", signal.symbol, signal.pattern);
                return;
            }
        };

        let store = self.clone();
        let signal = signal.clone();
        handle.spawn(async move {
            if let Err(e) = store.push(&signal).await {
                tracing::warn!("Failed to store {} {}: {}", signal.symbol, signal.pattern, e);
            }
        });
    }
}
