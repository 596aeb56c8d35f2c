//! REST gateway. This is the ONLY place that interprets HTTP status codes.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use super::helpers::{error_message, parse_list_body, query_pairs};
use super::EntityGateway;
use crate::config::GatewayConfig;
use crate::error::{CascadeError, CascadeResult};
use crate::params::FetchParams;
use crate::types::{Class, EntityKind, GradeLevel, LearningUnit, Subject};

const USER_AGENT_VALUE: &str = concat!("catalog-cascade/", env!("CARGO_PKG_VERSION"));

/// Entity gateway backed by the catalog REST API.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: String,
    config: GatewayConfig,
}

impl HttpGateway {
    pub fn new(config: GatewayConfig) -> CascadeResult<Self> {
        Url::parse(&config.url).map_err(|e| CascadeError::Config {
            message: format!("invalid catalog API url {:?}: {}", config.url, e),
        })?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(default_headers)
            .build()
            .map_err(|e| CascadeError::Config {
                message: format!("failed to create HTTP client: {}", e),
            })?;

        let base_url = config.url.trim_end_matches('/').to_string();

        Ok(Self {
            client,
            base_url,
            config,
        })
    }

    pub fn from_env() -> CascadeResult<Self> {
        Self::new(GatewayConfig::from_env())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, kind: EntityKind) -> String {
        let path = self.config.paths.for_kind(kind).trim_start_matches('/');
        format!("{}/{}", self.base_url, path)
    }

    async fn fetch_list<T: DeserializeOwned>(
        &self,
        kind: EntityKind,
        params: &FetchParams,
    ) -> CascadeResult<Vec<T>> {
        let url = self.endpoint(kind);
        let query = query_pairs(kind, params);
        debug!(url = %url, entity = %kind, query = ?query, "fetching catalog list");

        let response = self.client.get(&url).query(&query).send().await?;
        let status = response.status();

        let body = response.text().await.map_err(|e| CascadeError::Network {
            message: format!("failed to read response body: {}", e),
        })?;

        if !status.is_success() {
            let message = match error_message(&body) {
                Some(detail) => format!("HTTP {}: {}", status.as_u16(), detail),
                None => format!("HTTP {}", status.as_u16()),
            };
            return Err(CascadeError::transport(kind, message));
        }

        parse_list_body(kind, &body)
    }
}

#[async_trait]
impl EntityGateway for HttpGateway {
    async fn fetch_grade_levels(&self, params: &FetchParams) -> CascadeResult<Vec<GradeLevel>> {
        self.fetch_list(EntityKind::GradeLevel, params).await
    }

    async fn fetch_subjects(&self, params: &FetchParams) -> CascadeResult<Vec<Subject>> {
        self.fetch_list(EntityKind::Subject, params).await
    }

    async fn fetch_classes(&self, params: &FetchParams) -> CascadeResult<Vec<Class>> {
        self.fetch_list(EntityKind::Class, params).await
    }

    async fn fetch_learning_units(
        &self,
        params: &FetchParams,
    ) -> CascadeResult<Vec<LearningUnit>> {
        self.fetch_list(EntityKind::LearningUnit, params).await
    }
}
