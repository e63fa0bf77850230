//! HTTP oracle client: one attempt per call, failures classified as
//! transient or permanent.

use std::time::Duration;

use fidelity_core::config::OracleConfig;
use fidelity_core::errors::OracleError;
use fidelity_core::models::{DimensionScore, Rubric};
use fidelity_core::{IQualityOracle, OracleOutcome};
use serde::{de::DeserializeOwned, Serialize};

use crate::protocol::{
    ScoreRequest, ScoreResponse, TransformRequest, TransformResponse, SCORE_PATH, TRANSFORM_PATH,
};

/// Configuration for the HTTP oracle.
#[derive(Debug, Clone)]
pub struct HttpOracleConfig {
    /// Base URL; `/score` and `/transform` are appended.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl HttpOracleConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(fidelity_core::config::defaults::DEFAULT_ORACLE_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Failure class of a non-success HTTP status: 408, 429 and 5xx are
/// transient, every other status is permanent.
pub fn classify_status(status: u16, body: &str) -> OracleError {
    let reason = if body.trim().is_empty() {
        format!("HTTP {status}")
    } else {
        format!("HTTP {status}: {}", body.trim())
    };
    if status == 408 || status == 429 || (500..=599).contains(&status) {
        OracleError::Transient { reason }
    } else {
        OracleError::Permanent { reason }
    }
}

/// Quality oracle reached over HTTP with JSON bodies.
#[derive(Debug)]
pub struct HttpOracle {
    config: HttpOracleConfig,
    name: String,
    #[cfg(feature = "http")]
    client: reqwest::blocking::Client,
}

impl HttpOracle {
    pub fn new(config: HttpOracleConfig) -> Result<Self, OracleError> {
        if config.base_url.is_empty() {
            return Err(OracleError::Unavailable {
                reason: "empty oracle endpoint".to_string(),
            });
        }
        #[cfg(feature = "http")]
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .gzip(true)
            .build()
            .map_err(|e: reqwest::Error| OracleError::Permanent {
                reason: e.to_string(),
            })?;
        Ok(Self {
            name: format!("http({})", config.base_url),
            config,
            #[cfg(feature = "http")]
            client,
        })
    }

    /// Build from the `[oracle]` config section. `Unavailable` when no
    /// endpoint is configured.
    pub fn from_config(config: &OracleConfig) -> Result<Self, OracleError> {
        let endpoint = config.endpoint.as_deref().ok_or_else(|| OracleError::Unavailable {
            reason: "no oracle endpoint configured".to_string(),
        })?;
        Self::new(
            HttpOracleConfig::new(endpoint).with_timeout(Duration::from_secs(config.timeout_secs)),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn post<Req: Serialize, Resp: DeserializeOwned>(
        &self,
        path: &str,
        payload: &Req,
    ) -> Result<Resp, OracleError> {
        let _url = format!("{}{}", self.config.base_url, path);

        #[cfg(feature = "http")]
        {
            self.do_request(&_url, payload)
        }

        #[cfg(not(feature = "http"))]
        {
            let _ = payload;
            Err(OracleError::Unavailable {
                reason: "http feature not enabled".into(),
            })
        }
    }

    #[cfg(feature = "http")]
    fn do_request<Req: Serialize, Resp: DeserializeOwned>(
        &self,
        url: &str,
        payload: &Req,
    ) -> Result<Resp, OracleError> {
        tracing::debug!("oracle: POST {url}");
        let resp = self.client.post(url).json(payload).send().map_err(|e| {
            // No response at all: connect failure, timeout or send error.
            if e.is_connect() || e.is_timeout() || e.is_request() {
                OracleError::Transient {
                    reason: e.to_string(),
                }
            } else {
                OracleError::Permanent {
                    reason: e.to_string(),
                }
            }
        })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            let err = classify_status(status.as_u16(), &body);
            tracing::debug!("oracle: {err}");
            return Err(err);
        }
        resp.json::<Resp>().map_err(|e: reqwest::Error| OracleError::Permanent {
            reason: format!("deserialization failed: {e}"),
        })
    }
}

impl IQualityOracle for HttpOracle {
    fn score(&self, document: &str, rubric: &Rubric) -> OracleOutcome<Vec<DimensionScore>> {
        self.post::<_, ScoreResponse>(SCORE_PATH, &ScoreRequest { document, rubric })
            .map(|r| r.dimensions)
            .into()
    }

    fn transform(&self, document: &str, instruction: &str) -> OracleOutcome<String> {
        self.post::<_, TransformResponse>(
            TRANSFORM_PATH,
            &TransformRequest {
                document,
                instruction,
            },
        )
        .map(|r| r.document)
        .into()
    }

    fn name(&self) -> &str {
        &self.name
    }
}
