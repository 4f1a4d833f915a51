// Delivery of rendered reports

use async_trait::async_trait;
use futures::future::join_all;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Sink rejected message with status {0}")]
    Rejected(u16),
}

/// A place a finished report can be sent.
#[async_trait]
pub trait Notifier: Send + Sync {
    fn name(&self) -> &str;

    async fn send(&self, text: &str) -> Result<(), NotifyError>;
}

/// Posts `{"text": ...}` as JSON to an incoming-webhook URL.
pub struct WebhookNotifier {
    client: Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>) -> Result<Self, NotifyError> {
        let client = Client::builder().timeout(Duration::from_secs(15)).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    fn name(&self) -> &str {
        "webhook"
    }

    async fn send(&self, text: &str) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(&self.url)
            .json(&serde_json::json!({ "text": text }))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(NotifyError::Rejected(status.as_u16()))
        }
    }
}

/// Send `text` to every notifier at once.
///
/// Returns the number of sinks that accepted it. When none did, the text is
/// printed to stdout so the run is never silent.
pub async fn deliver(notifiers: &[Box<dyn Notifier>], text: &str) -> usize {
    let outcomes = join_all(notifiers.iter().map(|n| n.send(text))).await;

    let mut delivered = 0;
    for (notifier, outcome) in notifiers.iter().zip(outcomes) {
        match outcome {
            Ok(()) => {
                info!("Report delivered via {}", notifier.name());
                delivered += 1;
            }
            Err(e) => warn!("Delivery via {} failed: {}", notifier.name(), e),
        }
    }

    if delivered == 0 {
        println!("{}", text);
    }

    delivered
}
