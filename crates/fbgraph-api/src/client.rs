// Async client for the Facebook Graph and Marketing APIs.
//
// Base URL: https://graph.facebook.com/<version>/
// Auth: `Authorization: Bearer <token>` plus `appsecret_proof` when an app
// secret is configured.

use bytes::Bytes;
use reqwest::{Method, RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, trace};
use url::Url;

use crate::auth::{ApiVersion, AppSecretProof, requires_token};
use crate::classify::{AuthReason, ErrorEnvelope, FacebookError, into_error};
use crate::error::Error;
use crate::models::{Insight, Metric, Period, User};
use crate::paging::{ListEnvelope, PagedResult, PagingCursor};
use crate::params::{FieldSelector, FormData, ImageSpec, Params};
use crate::transport::TransportConfig;

pub const DEFAULT_BASE_URL: &str = "https://graph.facebook.com/";

/// Query keys whose values never appear in logs.
const SENSITIVE_PARAMS: &[&str] = &["access_token", AppSecretProof::PARAM];

/// Longest body excerpt kept in error values.
const BODY_PREVIEW_CHARS: usize = 200;

// ── Configuration ────────────────────────────────────────────────────

/// Everything needed to build a [`GraphClient`].
#[derive(Debug, Clone)]
pub struct GraphConfig {
    pub base_url: String,
    /// `None` addresses the unversioned API (the app's default version).
    pub version: Option<ApiVersion>,
    pub access_token: Option<SecretString>,
    pub app_secret: Option<SecretString>,
    pub transport: TransportConfig,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            version: Some(ApiVersion::DEFAULT),
            access_token: None,
            app_secret: None,
            transport: TransportConfig::default(),
        }
    }
}

impl GraphConfig {
    pub fn with_access_token(mut self, token: impl Into<SecretString>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn with_app_secret(mut self, secret: impl Into<SecretString>) -> Self {
        self.app_secret = Some(secret.into());
        self
    }
}

// ── Client ───────────────────────────────────────────────────────────

/// Async Graph API client.
///
/// Holds no mutable state: every operation is a single request/response
/// round trip, so one client can be shared freely across tasks. Pagination
/// is driven by the caller through [`PagingCursor`] values.
#[derive(Debug, Clone)]
pub struct GraphClient {
    http: reqwest::Client,
    base_url: Url,
    access_token: Option<SecretString>,
    proof: Option<AppSecretProof>,
}

impl GraphClient {
    // ── Constructors ─────────────────────────────────────────────────

    pub fn new(config: &GraphConfig) -> Result<Self, Error> {
        let http = config.transport.build_client()?;
        Self::from_reqwest(
            &config.base_url,
            config.version,
            http,
            config.access_token.clone(),
            config.app_secret.as_ref(),
        )
    }

    /// Wrap an existing `reqwest::Client`.
    ///
    /// The app secret is only used to derive the proof; it is not retained.
    pub fn from_reqwest(
        base_url: &str,
        version: Option<ApiVersion>,
        http: reqwest::Client,
        access_token: Option<SecretString>,
        app_secret: Option<&SecretString>,
    ) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url, version)?;
        let proof = match (app_secret, access_token.as_ref()) {
            (Some(secret), Some(token)) => Some(AppSecretProof::compute(secret, token)),
            _ => None,
        };
        Ok(Self {
            http,
            base_url,
            access_token,
            proof,
        })
    }

    /// `https://host/prefix/` + `vX.Y/`, always with a trailing slash.
    fn normalize_base_url(raw: &str, version: Option<ApiVersion>) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        if url.cannot_be_a_base() {
            return Err(Error::InvalidArgument {
                field: "base_url",
                reason: format!("{raw} cannot be used as a base URL"),
            });
        }
        let path = url.path().trim_end_matches('/').to_owned();
        match version {
            Some(v) => url.set_path(&format!("{path}/{v}/")),
            None => url.set_path(&format!("{path}/")),
        }
        url.set_query(None);
        Ok(url)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn has_access_token(&self) -> bool {
        self.access_token.is_some()
    }

    pub fn app_secret_proof(&self) -> Option<&AppSecretProof> {
        self.proof.as_ref()
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// `base/{id}[/{connection...}]`. Segments are percent-encoded.
    fn url(&self, object_id: &str, connection: Option<&str>) -> Result<Url, Error> {
        if object_id.trim().is_empty() || object_id.contains('/') {
            return Err(Error::InvalidObjectId(object_id.to_owned()));
        }
        let mut segments = vec![object_id];
        if let Some(conn) = connection {
            let parts: Vec<&str> = conn.split('/').collect();
            if parts.iter().any(|p| p.trim().is_empty()) {
                return Err(Error::InvalidArgument {
                    field: "connection",
                    reason: format!("{conn:?} is not a connection name"),
                });
            }
            segments.extend(parts);
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidArgument {
                field: "base_url",
                reason: "cannot be used as a base URL".into(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn query(fields: &FieldSelector, params: &Params) -> Params {
        let mut query = params.clone();
        if let Some(f) = fields.to_param() {
            query.insert_missing("fields", f);
        }
        query
    }

    // ── Auth ─────────────────────────────────────────────────────────

    fn no_token() -> Error {
        Error::AuthRequired {
            reason: AuthReason::NoAccessToken,
            status: None,
            error: None,
        }
    }

    fn require_token(&self) -> Result<(), Error> {
        if self.access_token.is_some() {
            Ok(())
        } else {
            Err(Self::no_token())
        }
    }

    fn require_token_for(&self, object_id: &str) -> Result<(), Error> {
        if requires_token(object_id) {
            self.require_token()
        } else {
            Ok(())
        }
    }

    /// Attach the bearer token and, unless the URL already has one, the
    /// app secret proof.
    fn authorize(&self, builder: RequestBuilder, url: &Url) -> RequestBuilder {
        let mut builder = builder;
        if let Some(token) = &self.access_token {
            builder = builder.bearer_auth(token.expose_secret());
        }
        if let Some(proof) = &self.proof {
            let already = url.query_pairs().any(|(k, _)| k == AppSecretProof::PARAM);
            if !already {
                builder = builder.query(&[(AppSecretProof::PARAM, proof.as_str())]);
            }
        }
        builder
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    async fn send(&self, method: Method, url: Url, query: &Params) -> Result<Response, Error> {
        debug!("{method} {} params={:?}", redacted(&url), redacted_params(query));
        let builder = self.http.request(method, url.clone()).query(query.as_pairs());
        Ok(self.authorize(builder, &url).send().await?)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, query: &Params) -> Result<T, Error> {
        let resp = self.send(Method::GET, url, query).await?;
        handle_json(resp).await
    }

    async fn post_form(&self, url: Url, form: FormData) -> Result<Value, Error> {
        debug!(
            "POST {} fields={:?} attachments={}",
            redacted(&url),
            form.fields().iter().map(|(k, _)| k.as_str()).collect::<Vec<_>>(),
            form.attachments().len()
        );
        let builder = self.http.post(url.clone());
        let builder = if form.is_multipart() {
            builder.multipart(form.into_multipart()?)
        } else {
            builder.form(form.fields())
        };
        let resp = self.authorize(builder, &url).send().await?;
        handle_json(resp).await
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// `GET /{id}?fields=...`
    pub async fn fetch_object<T: DeserializeOwned>(
        &self,
        object_id: &str,
        fields: &FieldSelector,
    ) -> Result<T, Error> {
        self.fetch_object_with(object_id, fields, &Params::new())
            .await
    }

    /// `GET /{id}` with extra query parameters.
    pub async fn fetch_object_with<T: DeserializeOwned>(
        &self,
        object_id: &str,
        fields: &FieldSelector,
        params: &Params,
    ) -> Result<T, Error> {
        let url = self.url(object_id, None)?;
        self.require_token_for(object_id)?;
        self.get_json(url, &Self::query(fields, params)).await
    }

    /// `GET /{id}/{connection}`: one page of a collection.
    ///
    /// The cursor's window is merged into `params`; keys set explicitly in
    /// `params` take precedence.
    pub async fn fetch_connections<T: DeserializeOwned>(
        &self,
        object_id: &str,
        connection: &str,
        fields: &FieldSelector,
        params: &Params,
        cursor: Option<&PagingCursor>,
    ) -> Result<PagedResult<T>, Error> {
        let url = self.url(object_id, Some(connection))?;
        self.require_token_for(object_id)?;
        let mut query = Self::query(fields, params);
        if let Some(cursor) = cursor {
            query.merge_cursor(cursor);
        }
        let envelope: ListEnvelope<T> = self.get_json(url, &query).await?;
        Ok(envelope.into_paged())
    }

    /// Follow a server-issued paging URL verbatim.
    ///
    /// Only URLs on the client's own origin are followed.
    pub async fn fetch_page<T: DeserializeOwned>(
        &self,
        cursor: &PagingCursor,
    ) -> Result<PagedResult<T>, Error> {
        let raw = cursor.full_url().ok_or(Error::NoFullUrl)?;
        let url = Url::parse(raw)?;
        if url.origin() != self.base_url.origin() {
            return Err(Error::InvalidArgument {
                field: "full_url",
                reason: format!("{} is not on {}", url.origin().ascii_serialization(), self.base_url),
            });
        }
        let envelope: ListEnvelope<T> = self.get_json(url, &Params::new()).await?;
        Ok(envelope.into_paged())
    }

    /// The token owner's profile.
    pub async fn me(&self, fields: &FieldSelector) -> Result<User, Error> {
        self.fetch_object("me", fields).await
    }

    /// Raw image bytes, e.g. `GET /{id}/picture?type=large`.
    ///
    /// The Graph API answers with a redirect to the CDN; the transport
    /// follows it.
    pub async fn fetch_image(
        &self,
        object_id: &str,
        connection: &str,
        spec: ImageSpec,
    ) -> Result<Bytes, Error> {
        let url = self.url(object_id, Some(connection))?;
        self.require_token_for(object_id)?;
        let resp = self.send(Method::GET, url, &spec.to_params()).await?;
        let status = resp.status();
        trace!(status = status.as_u16(), "image response");
        if !status.is_success() {
            let body = resp.text().await?;
            return Err(error_from(status.as_u16(), &body));
        }
        Ok(resp.bytes().await?)
    }

    // ── Insights ─────────────────────────────────────────────────────

    /// `GET /{id}/insights/{metric}[?period=...]`
    pub async fn get_insight(
        &self,
        target_id: &str,
        metric: &Metric,
        period: Option<&Period>,
    ) -> Result<Vec<Insight>, Error> {
        let connection = format!("insights/{}", metric.as_str());
        let mut params = Params::new();
        if let Some(p) = period {
            params.insert("period", p);
        }
        let page: PagedResult<Insight> = self
            .fetch_connections(target_id, &connection, &FieldSelector::all(), &params, None)
            .await?;
        Ok(page.into_items())
    }

    /// `GET /{id}/insights?metric=a,b,...` for several metrics at once.
    pub async fn get_insights(
        &self,
        target_id: &str,
        metrics: &[Metric],
        period: Option<&Period>,
        cursor: Option<&PagingCursor>,
    ) -> Result<PagedResult<Insight>, Error> {
        if metrics.is_empty() {
            return Err(Error::InvalidArgument {
                field: "metric",
                reason: "at least one metric is required".into(),
            });
        }
        let names: Vec<&str> = metrics.iter().map(Metric::as_str).collect();
        let mut params = Params::new().with("metric", names.join(","));
        if let Some(p) = period {
            params.insert("period", p);
        }
        self.fetch_connections(target_id, "insights", &FieldSelector::all(), &params, cursor)
            .await
    }

    // ── Writes ───────────────────────────────────────────────────────

    /// `POST /{id}/{connection}` and return the new object's id.
    pub async fn publish(
        &self,
        object_id: &str,
        connection: &str,
        form: FormData,
    ) -> Result<String, Error> {
        let url = self.url(object_id, Some(connection))?;
        self.require_token()?;
        let value = self.post_form(url, form).await?;
        match value.get("id") {
            Some(Value::String(id)) => Ok(id.clone()),
            Some(Value::Number(id)) => Ok(id.to_string()),
            _ => Err(Error::MissingId {
                body: preview(&value.to_string()),
            }),
        }
    }

    /// `POST /{id}[/{connection}]` returning the response body as-is.
    pub async fn post(
        &self,
        object_id: &str,
        connection: Option<&str>,
        form: FormData,
    ) -> Result<Value, Error> {
        let url = self.url(object_id, connection)?;
        self.require_token()?;
        self.post_form(url, form).await
    }

    /// `DELETE /{id}[/{connection}]`.
    pub async fn delete(
        &self,
        object_id: &str,
        connection: Option<&str>,
        params: &Params,
    ) -> Result<(), Error> {
        let url = self.url(object_id, connection)?;
        self.require_token()?;
        let resp = self.send(Method::DELETE, url, params).await?;
        let status = resp.status().as_u16();
        let value: Value = handle_json(resp).await?;
        if value.get("success").and_then(Value::as_bool) == Some(false) {
            return Err(Error::Api {
                status,
                error: FacebookError::from_message("delete was not acknowledged"),
            });
        }
        Ok(())
    }
}

// ── Response handling ────────────────────────────────────────────────

async fn handle_json<T: DeserializeOwned>(resp: Response) -> Result<T, Error> {
    let status = resp.status();
    trace!(status = status.as_u16(), "response");
    let body = resp.text().await?;

    if !status.is_success() {
        return Err(error_from(status.as_u16(), &body));
    }

    let value: Value = serde_json::from_str(&body).map_err(|e| Error::Deserialization {
        message: e.to_string(),
        body: preview(&body),
    })?;

    // Some endpoints report failures inside a 200 response.
    if let Some(error) = embedded_error(&value) {
        return Err(into_error(status.as_u16(), error));
    }

    serde_json::from_value(value).map_err(|e| Error::Deserialization {
        message: e.to_string(),
        body: preview(&body),
    })
}

/// Classify a non-success response body.
fn error_from(status: u16, body: &str) -> Error {
    let error = serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|env| env.error)
        .unwrap_or_else(|| FacebookError::from_message(preview(body)));
    into_error(status, error)
}

fn embedded_error(value: &Value) -> Option<FacebookError> {
    let error = value.get("error")?;
    let looks_like_error = error.get("message").is_some() || error.get("code").is_some();
    if !looks_like_error {
        return None;
    }
    serde_json::from_value(error.clone()).ok()
}

fn preview(body: &str) -> String {
    body.chars().take(BODY_PREVIEW_CHARS).collect()
}

fn redacted(url: &Url) -> String {
    if url.query().is_none() {
        return url.to_string();
    }
    let mut clean = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if SENSITIVE_PARAMS.contains(&k.as_ref()) {
                "[REDACTED]".to_owned()
            } else {
                v.into_owned()
            };
            (k.into_owned(), v)
        })
        .collect();
    clean.query_pairs_mut().clear().extend_pairs(pairs);
    clean.to_string()
}

fn redacted_params(params: &Params) -> Vec<(&str, &str)> {
    params
        .as_pairs()
        .iter()
        .map(|(k, v)| {
            if SENSITIVE_PARAMS.contains(&k.as_str()) {
                (k.as_str(), "[REDACTED]")
            } else {
                (k.as_str(), v.as_str())
            }
        })
        .collect()
}
