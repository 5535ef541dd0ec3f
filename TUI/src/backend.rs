// Backend communication with the catalog and recommendation HTTP endpoints

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::catalog::CatalogItem;
use crate::config::Endpoints;

#[derive(Debug, Clone, Serialize)]
pub struct RecommendationRequest {
    pub prompt: String,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct RecommendationResponse {
    #[serde(default)]
    pub recomendacion: Option<Value>,
}

impl RecommendationResponse {
    /// The recommendation text, or `""` when absent or not a string.
    pub fn text(&self) -> String {
        self.recomendacion
            .as_ref()
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{endpoint} returned status {status}")]
    Status {
        endpoint: String,
        status: reqwest::StatusCode,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unexpected payload: expected {expected}, got {found}")]
    UnexpectedShape {
        expected: &'static str,
        found: &'static str,
    },
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Turn a catalog payload into items.
///
/// Anything but a JSON array is an error. Entries that don't deserialize are
/// dropped one by one.
pub fn parse_catalog(payload: Value) -> Result<Vec<CatalogItem>, BackendError> {
    let entries = match payload {
        Value::Array(entries) => entries,
        other => {
            return Err(BackendError::UnexpectedShape {
                expected: "array",
                found: json_kind(&other),
            })
        }
    };

    let total = entries.len();
    let items: Vec<CatalogItem> = entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value::<CatalogItem>(entry) {
            Ok(item) => Some(item),
            Err(e) => {
                tracing::warn!(index, error = %e, "Skipping malformed catalog entry");
                None
            }
        })
        .collect();

    if items.len() < total {
        tracing::warn!(kept = items.len(), total, "Catalog contained malformed entries");
    }

    Ok(items)
}

/// Parse a recommendation payload. Non-object payloads carry no text.
pub fn parse_recommendation(payload: Value) -> String {
    match payload {
        Value::Object(_) => serde_json::from_value::<RecommendationResponse>(payload)
            .map(|r| r.text())
            .unwrap_or_default(),
        _ => String::new(),
    }
}

/// HTTP client for the two collaborators.
#[derive(Debug, Clone)]
pub struct CatalogApi {
    http_client: reqwest::Client,
    endpoints: Endpoints,
}

impl CatalogApi {
    pub fn new(endpoints: Endpoints) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            endpoints,
        }
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    async fn read_json(
        endpoint: &str,
        response: reqwest::Response,
    ) -> Result<Value, BackendError> {
        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status {
                endpoint: endpoint.to_string(),
                status,
            });
        }
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    pub async fn fetch_catalog(&self) -> Result<Vec<CatalogItem>, BackendError> {
        let url = &self.endpoints.catalog_url;
        let response = self.http_client.get(url).send().await?;
        let payload = Self::read_json(url, response).await?;
        let items = parse_catalog(payload)?;

        tracing::info!(count = items.len(), url = %url, "Fetched catalog");
        Ok(items)
    }

    pub async fn request_recommendation(&self, prompt: &str) -> Result<String, BackendError> {
        let url = &self.endpoints.recommend_url;
        let request = RecommendationRequest {
            prompt: prompt.to_string(),
        };
        let response = self.http_client.post(url).json(&request).send().await?;
        let payload = Self::read_json(url, response).await?;
        let text = parse_recommendation(payload);

        tracing::info!(chars = text.len(), url = %url, "Received recommendation");
        Ok(text)
    }
}

/// Work the UI asks the backend to do.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendRequest {
    LoadCatalog,
    Recommend { generation: u64, prompt: String },
}

/// Completion of a `BackendRequest`, delivered back to the UI loop.
#[derive(Debug)]
pub enum BackendEvent {
    CatalogLoaded(Result<Vec<CatalogItem>, BackendError>),
    Recommendation {
        generation: u64,
        result: Result<String, BackendError>,
    },
}

/// Spawns requests on the runtime and funnels completions into one channel.
pub struct Backend {
    api: CatalogApi,
    runtime: Handle,
    events: UnboundedSender<BackendEvent>,
    in_flight: usize,
}

impl Backend {
    pub fn new(api: CatalogApi, runtime: Handle) -> (Self, UnboundedReceiver<BackendEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        (
            Self {
                api,
                runtime,
                events,
                in_flight: 0,
            },
            rx,
        )
    }

    pub fn dispatch(&mut self, request: BackendRequest) {
        let api = self.api.clone();
        let events = self.events.clone();
        self.in_flight += 1;

        match request {
            BackendRequest::LoadCatalog => {
                tracing::debug!(url = %api.endpoints().catalog_url, "Requesting catalog");
                self.runtime.spawn(async move {
                    let result = api.fetch_catalog().await;
                    let _ = events.send(BackendEvent::CatalogLoaded(result));
                });
            }
            BackendRequest::Recommend { generation, prompt } => {
                tracing::debug!(generation, "Requesting recommendation");
                self.runtime.spawn(async move {
                    let result = api.request_recommendation(&prompt).await;
                    let _ = events.send(BackendEvent::Recommendation { generation, result });
                });
            }
        }
    }

    /// Record that a completion was received from the channel.
    pub fn completed(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }
}
