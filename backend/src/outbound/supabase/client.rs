//! Reqwest client for the hosted backend's REST surfaces.
//!
//! One client covers PostgREST (`/rest/v1`), GoTrue (`/auth/v1`), and
//! Storage (`/storage/v1`). Every call carries the project's anon key in
//! `apikey` and the caller's access token as the bearer, so row-level
//! security applies to the caller rather than to this service.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, HeaderValue};
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;
use zeroize::Zeroizing;

use super::error::{BackendError, BackendErrorKind};
use super::query::TableQuery;
use crate::domain::AccessToken;

const REST_PATH: &str = "rest/v1/";
const AUTH_PATH: &str = "auth/v1/";
const STORAGE_PATH: &str = "storage/v1/object/";

/// Shared HTTP client bound to one project.
#[derive(Clone)]
pub struct SupabaseClient {
    http: Client,
    base: Url,
    anon_key: Arc<Zeroizing<String>>,
}

impl std::fmt::Debug for SupabaseClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseClient")
            .field("base", &self.base.as_str())
            .finish_non_exhaustive()
    }
}

impl SupabaseClient {
    /// Build a client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        base: Url,
        anon_key: Zeroizing<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;
        let mut base = base;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self {
            http,
            base,
            anon_key: Arc::new(anon_key),
        })
    }

    /// Project base URL, always ending in `/`.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, operation: &str, path: &str) -> Result<Url, BackendError> {
        self.base.join(path).map_err(|error| {
            BackendError::new(
                BackendErrorKind::InvalidRequest,
                operation,
                format!("invalid endpoint path `{path}`: {error}"),
            )
        })
    }

    fn request(&self, method: Method, url: Url, token: &AccessToken) -> RequestBuilder {
        self.http
            .request(method, url)
            .header("apikey", self.anon_key.as_str())
            .bearer_auth(token.expose())
    }

    async fn send(&self, operation: &str, request: RequestBuilder) -> Result<Vec<u8>, BackendError> {
        let response = request.send().await.map_err(|error| {
            let error = BackendError::from_transport(operation, &error);
            warn!(operation, kind = ?error.kind(), "backend request failed");
            error
        })?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|error| BackendError::from_transport(operation, &error))?;
        if status.is_success() {
            return Ok(body.to_vec());
        }
        let error = BackendError::from_response(operation, status, &body);
        warn!(
            operation,
            status = status.as_u16(),
            code = error.code().unwrap_or_default(),
            kind = ?error.kind(),
            message = error.message(),
            "backend returned an error"
        );
        Err(error)
    }

    fn decode<T: DeserializeOwned>(operation: &str, body: &[u8]) -> Result<T, BackendError> {
        let body: &[u8] = if body.is_empty() { b"null" } else { body };
        serde_json::from_slice(body).map_err(|error| {
            warn!(operation, %error, "backend response did not decode");
            BackendError::decode(operation, error.to_string())
        })
    }

    fn table_url(&self, operation: &str, query: &TableQuery) -> Result<Url, BackendError> {
        let mut url = self.endpoint(operation, &format!("{REST_PATH}{}", query.name()))?;
        query.apply_to(&mut url);
        Ok(url)
    }

    fn require_filters(operation: &str, query: &TableQuery) -> Result<(), BackendError> {
        if query.has_filters() {
            Ok(())
        } else {
            Err(BackendError::new(
                BackendErrorKind::InvalidRequest,
                operation,
                "refusing to write without a filter",
            ))
        }
    }

    /// Read rows.
    pub async fn select<T: DeserializeOwned>(
        &self,
        token: &AccessToken,
        query: &TableQuery,
    ) -> Result<Vec<T>, BackendError> {
        let operation = format!("select {}", query.name());
        let url = self.table_url(&operation, query)?;
        let body = self
            .send(&operation, self.request(Method::GET, url, token))
            .await?;
        Self::decode(&operation, &body)
    }

    /// Insert one row or an array of rows, returning the stored rows.
    pub async fn insert<B, T>(
        &self,
        token: &AccessToken,
        table: &str,
        rows: &B,
    ) -> Result<Vec<T>, BackendError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let operation = format!("insert {table}");
        let url = self.endpoint(&operation, &format!("{REST_PATH}{table}"))?;
        let request = self
            .request(Method::POST, url, token)
            .header("Prefer", "return=representation")
            .json(rows);
        let body = self.send(&operation, request).await?;
        Self::decode(&operation, &body)
    }

    /// Patch the rows matched by `query`, returning them.
    pub async fn update<B, T>(
        &self,
        token: &AccessToken,
        query: &TableQuery,
        patch: &B,
    ) -> Result<Vec<T>, BackendError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let operation = format!("update {}", query.name());
        Self::require_filters(&operation, query)?;
        let url = self.table_url(&operation, query)?;
        let request = self
            .request(Method::PATCH, url, token)
            .header("Prefer", "return=representation")
            .json(patch);
        let body = self.send(&operation, request).await?;
        Self::decode(&operation, &body)
    }

    /// Delete the rows matched by `query`.
    pub async fn delete(&self, token: &AccessToken, query: &TableQuery) -> Result<(), BackendError> {
        let operation = format!("delete {}", query.name());
        Self::require_filters(&operation, query)?;
        let url = self.table_url(&operation, query)?;
        let request = self
            .request(Method::DELETE, url, token)
            .header("Prefer", "return=minimal");
        self.send(&operation, request).await.map(|_| ())
    }

    /// Call a database function.
    pub async fn rpc<P, T>(
        &self,
        token: &AccessToken,
        function: &str,
        params: &P,
    ) -> Result<T, BackendError>
    where
        P: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let operation = format!("rpc {function}");
        let url = self.endpoint(&operation, &format!("{REST_PATH}rpc/{function}"))?;
        let body = self
            .send(&operation, self.request(Method::POST, url, token).json(params))
            .await?;
        Self::decode(&operation, &body)
    }

    /// Resolve the token into the auth user record.
    pub async fn auth_user<T: DeserializeOwned>(
        &self,
        token: &AccessToken,
    ) -> Result<T, BackendError> {
        let operation = "auth user";
        let url = self.endpoint(operation, &format!("{AUTH_PATH}user"))?;
        let body = self
            .send(operation, self.request(Method::GET, url, token))
            .await?;
        Self::decode(operation, &body)
    }

    /// Revoke the session behind the token.
    pub async fn sign_out(&self, token: &AccessToken) -> Result<(), BackendError> {
        let operation = "auth logout";
        let url = self.endpoint(operation, &format!("{AUTH_PATH}logout"))?;
        self.send(operation, self.request(Method::POST, url, token))
            .await
            .map(|_| ())
    }

    /// Upload an object.
    pub async fn upload_object(
        &self,
        token: &AccessToken,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), BackendError> {
        let operation = format!("upload {bucket}");
        let url = self.endpoint(&operation, &format!("{STORAGE_PATH}{bucket}/{path}"))?;
        let content_type = HeaderValue::from_str(content_type).map_err(|error| {
            BackendError::new(BackendErrorKind::InvalidRequest, &operation, error.to_string())
        })?;
        let request = self
            .request(Method::POST, url, token)
            .header(CONTENT_TYPE, content_type)
            .header("x-upsert", "false")
            .body(bytes);
        self.send(&operation, request).await.map(|_| ())
    }

    /// Public URL of an object in a public bucket.
    #[must_use]
    pub fn public_object_url(&self, bucket: &str, path: &str) -> String {
        format!("{}{STORAGE_PATH}public/{bucket}/{path}", self.base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> SupabaseClient {
        SupabaseClient::new(
            Url::parse(base).expect("url"),
            Zeroizing::new("anon".to_owned()),
            Duration::from_secs(5),
        )
        .expect("client")
    }

    #[test]
    fn base_path_gains_a_trailing_slash() {
        let client = client("https://proxy.example/supabase");
        assert_eq!(client.base_url().as_str(), "https://proxy.example/supabase/");
        let url = client
            .table_url("select rooms", &TableQuery::table("rooms").eq("id", 1))
            .expect("url");
        assert_eq!(
            url.as_str(),
            "https://proxy.example/supabase/rest/v1/rooms?id=eq.1"
        );
    }

    #[test]
    fn public_urls_point_at_the_public_object_route() {
        let client = client("https://abc.supabase.co");
        assert_eq!(
            client.public_object_url("property-images", "p1/x.png"),
            "https://abc.supabase.co/storage/v1/object/public/property-images/p1/x.png"
        );
    }

    #[test]
    fn unfiltered_writes_are_refused() {
        let error = SupabaseClient::require_filters("delete rooms", &TableQuery::table("rooms"))
            .expect_err("refused");
        assert_eq!(error.kind(), BackendErrorKind::InvalidRequest);
    }

    #[test]
    fn empty_bodies_decode_as_null() {
        let value: Option<String> = SupabaseClient::decode("rpc f", b"").expect("decoded");
        assert!(value.is_none());
    }

    #[test]
    fn debug_output_hides_the_key() {
        let rendered = format!("{:?}", client("https://abc.supabase.co"));
        assert!(!rendered.contains("anon"));
    }
}
