//! Outbound delivery of instructions and callbacks to the signaling endpoint.
//!
//! Delivery is best-effort: transport failures are logged and returned as
//! [`Delivery::Failed`], never as errors.

use crate::config::Config;
use crate::error::Result;
use futures::future::BoxFuture;
use futures::FutureExt;
use serde::Serialize;
use std::time::Duration;
use tracing::{info, warn};

pub const INSTRUCTION_PATH: &str = "module_x_instruction";
pub const CALLBACK_PATH: &str = "module_x_callback";

/// Upper bound on a single outbound call; a timeout counts as a transport failure.
pub const DELIVERY_TIMEOUT: Duration = Duration::from_secs(10);

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstructionPayload<'a> {
    pub instruction: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallbackPayload {
    pub status: String,
    pub annotations_received: usize,
}

/// One outbound message. Instructions and callbacks go to different paths
/// and carry differently shaped bodies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal {
    Instruction(String),
    Callback(CallbackPayload),
}

impl Signal {
    pub fn instruction(text: impl Into<String>) -> Self {
        Signal::Instruction(text.into())
    }

    /// Short label for logs.
    pub fn describe(&self) -> &str {
        match self {
            Signal::Instruction(text) => text,
            Signal::Callback(payload) => &payload.status,
        }
    }
}

// ---------------------------------------------------------------------------
// Delivery
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// The request completed; `status` is whatever the endpoint answered.
    Sent { status: u16 },
    Failed { reason: String },
}

impl Delivery {
    pub fn is_sent(&self) -> bool {
        matches!(self, Delivery::Sent { .. })
    }
}

// ---------------------------------------------------------------------------
// Notifier
// ---------------------------------------------------------------------------

pub trait Notifier: Send + Sync {
    fn instruct<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Delivery>;

    fn callback<'a>(&'a self, payload: &'a CallbackPayload) -> BoxFuture<'a, Delivery>;

    fn deliver<'a>(&'a self, signal: &'a Signal) -> BoxFuture<'a, Delivery> {
        match signal {
            Signal::Instruction(text) => self.instruct(text),
            Signal::Callback(payload) => self.callback(payload),
        }
    }
}

/// Notifier that POSTs JSON to `{base}/module_x_instruction` and
/// `{base}/module_x_callback`.
#[derive(Debug, Clone)]
pub struct HttpNotifier {
    client: reqwest::Client,
    base: String,
}

impl HttpNotifier {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(DELIVERY_TIMEOUT)
            .build()?;
        let base = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.signaling_base())
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    async fn post<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Delivery {
        let url = format!("{}/{}", self.base, path);
        match self.client.post(&url).json(body).send().await {
            Ok(resp) => Delivery::Sent {
                status: resp.status().as_u16(),
            },
            Err(e) => Delivery::Failed {
                reason: e.to_string(),
            },
        }
    }
}

impl Notifier for HttpNotifier {
    fn instruct<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Delivery> {
        async move {
            if text.trim().is_empty() {
                warn!("refusing to send empty instruction");
                return Delivery::Failed {
                    reason: "empty instruction".to_string(),
                };
            }
            let delivery = self
                .post(INSTRUCTION_PATH, &InstructionPayload { instruction: text })
                .await;
            match &delivery {
                Delivery::Sent { status } => info!(instruction = %text, status, "instruction sent"),
                Delivery::Failed { reason } => {
                    warn!(instruction = %text, error = %reason, "error sending instruction")
                }
            }
            delivery
        }
        .boxed()
    }

    fn callback<'a>(&'a self, payload: &'a CallbackPayload) -> BoxFuture<'a, Delivery> {
        async move {
            let delivery = self.post(CALLBACK_PATH, payload).await;
            match &delivery {
                Delivery::Sent { status } => info!(
                    callback = %payload.status,
                    annotations = payload.annotations_received,
                    status,
                    "callback sent"
                ),
                Delivery::Failed { reason } => {
                    warn!(callback = %payload.status, error = %reason, "error sending callback")
                }
            }
            delivery
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    #[tokio::test]
    async fn instruct_posts_instruction_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/module_x_instruction")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({ "instruction": "Turn left" })))
            .with_status(200)
            .expect(1)
            .create_async()
            .await;

        let notifier = HttpNotifier::new(server.url()).unwrap();
        let delivery = notifier.instruct("Turn left").await;

        assert_eq!(delivery, Delivery::Sent { status: 200 });
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn callback_posts_status_and_count() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/module_x_callback")
            .match_body(Matcher::Json(json!({
                "status": "ready_for_video",
                "annotations_received": 3
            })))
            .with_status(204)
            .create_async()
            .await;

        let notifier = HttpNotifier::new(format!("{}/", server.url())).unwrap();
        let payload = CallbackPayload {
            status: "ready_for_video".into(),
            annotations_received: 3,
        };
        let delivery = notifier.deliver(&Signal::Callback(payload)).await;

        assert_eq!(delivery, Delivery::Sent { status: 204 });
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn error_status_still_counts_as_sent() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/module_x_instruction")
            .with_status(500)
            .create_async()
            .await;

        let notifier = HttpNotifier::new(server.url()).unwrap();
        let delivery = notifier.instruct("Detected object in view").await;
        assert_eq!(delivery, Delivery::Sent { status: 500 });
        assert!(delivery.is_sent());
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_failed_delivery() {
        let notifier = HttpNotifier::new("http://127.0.0.1:1").unwrap();
        let delivery = notifier.instruct("anyone there?").await;
        assert!(matches!(delivery, Delivery::Failed { .. }));
    }

    #[tokio::test]
    async fn empty_instruction_is_not_sent() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/module_x_instruction")
            .expect(0)
            .create_async()
            .await;

        let notifier = HttpNotifier::new(server.url()).unwrap();
        assert!(!notifier.instruct("   ").await.is_sent());
        mock.assert_async().await;
    }

    #[test]
    fn from_config_uses_trimmed_base() {
        let config = Config::default()
            .with_signaling_url(Some("http://10.1.1.1:3000/".into()))
            .unwrap();
        let notifier = HttpNotifier::from_config(&config).unwrap();
        assert_eq!(notifier.base_url(), "http://10.1.1.1:3000");
    }
}
