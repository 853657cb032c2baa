// reqwest-backed InfluxDB v2 client
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client as ReqwestClient, RequestBuilder, Response, Url};
use serde::Deserialize;
use serde_json::json;
use thermograph_shared::BucketDescriptor;
use tracing::debug;

use super::{Bucket, InfluxApi, Organization, WritePrecision};
use crate::config::InfluxConfig;
use crate::errors::{InfluxError, Result};

#[derive(Deserialize)]
struct Organizations {
    #[serde(default)]
    orgs: Vec<Organization>,
}

#[derive(Deserialize)]
struct Buckets {
    #[serde(default)]
    buckets: Vec<Bucket>,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Production client bound to one `(url, token)` pair.
pub struct HttpInfluxApi {
    base_url: String,
    token: String,
    client: ReqwestClient,
}

impl HttpInfluxApi {
    pub fn new(config: &InfluxConfig) -> Result<Self> {
        Url::parse(config.base_url())
            .map_err(|e| InfluxError::config(format!("invalid URL {:?}: {}", config.url, e)))?;

        Ok(Self {
            base_url: config.base_url().to_string(),
            token: config.token.clone(),
            client: ReqwestClient::new(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.header(AUTHORIZATION, format!("Token {}", self.token))
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = self.authorized(request).send().await?;
        let status = response.status();
        debug!(url = %response.url(), status = status.as_u16(), "InfluxDB response");

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(InfluxError::http(status.as_u16(), error_message(&body)))
    }
}

/// The `message` of a JSON error body, or the body itself.
fn error_message(body: &str) -> String {
    if let Ok(error) = serde_json::from_str::<ErrorBody>(body) {
        return error.message;
    }
    match body.trim() {
        "" => "no response body".to_string(),
        text => text.to_string(),
    }
}

#[async_trait]
impl InfluxApi for HttpInfluxApi {
    async fn find_organizations(&self, name: &str) -> Result<Vec<Organization>> {
        let request = self
            .client
            .get(self.endpoint("/api/v2/orgs"))
            .query(&[("org", name)]);
        let orgs: Organizations = self.send(request).await?.json().await?;
        Ok(orgs.orgs)
    }

    async fn find_buckets(&self, org_id: &str, name: &str) -> Result<Vec<Bucket>> {
        let request = self
            .client
            .get(self.endpoint("/api/v2/buckets"))
            .query(&[("orgID", org_id), ("name", name)]);
        let buckets: Buckets = self.send(request).await?.json().await?;
        Ok(buckets.buckets)
    }

    async fn create_bucket(&self, descriptor: &BucketDescriptor) -> Result<Bucket> {
        let body = json!({
            "orgID": descriptor.org_id,
            "name": descriptor.name,
            "retentionRules": [],
        });
        let request = self
            .client
            .post(self.endpoint("/api/v2/buckets"))
            .json(&body);
        Ok(self.send(request).await?.json().await?)
    }

    async fn write(
        &self,
        org: &str,
        bucket: &str,
        precision: WritePrecision,
        lines: &[String],
    ) -> Result<()> {
        let request = self
            .client
            .post(self.endpoint("/api/v2/write"))
            .query(&[("org", org), ("bucket", bucket), ("precision", precision.as_str())])
            .header(CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(lines.join("\n"));
        self.send(request).await?;
        Ok(())
    }

    async fn query(&self, org: &str, flux: &str) -> Result<String> {
        let body = json!({
            "query": flux,
            "type": "flux",
            "dialect": {
                "header": true,
                "delimiter": ",",
                "annotations": ["datatype", "group", "default"],
            },
        });
        let request = self
            .client
            .post(self.endpoint("/api/v2/query"))
            .query(&[("org", org)])
            .header(ACCEPT, "application/csv")
            .json(&body);
        Ok(self.send(request).await?.text().await?)
    }

    async fn ping(&self) -> Result<()> {
        let request = self.client.get(self.endpoint("/ping"));
        self.send(request).await?;
        Ok(())
    }
}
