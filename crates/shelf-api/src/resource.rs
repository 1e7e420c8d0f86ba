// Async HTTP client for a single PostgREST-style table resource.
//
// Base path: <base>/<resource>
// Auth: `apikey` + `Authorization: Bearer` headers
// Filters: `?id=eq.<id>`, ordering: `?order=<field>.asc`

use std::marker::PhantomData;

use reqwest::header::HeaderValue;
use secrecy::SecretString;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::Error;
use crate::transport::TransportConfig;

const PREFER: &str = "Prefer";
const RETURN_REPRESENTATION: &str = "return=representation";

// ── Client ───────────────────────────────────────────────────────────

/// Async client for one table resource, typed by its row shape `R`.
///
/// Every call is a single request, except [`update`](Self::update) which
/// may follow up with a read when the server doesn't echo the row.
/// No retries; a dropped response surfaces as an error to the caller.
pub struct ResourceClient<R> {
    http: reqwest::Client,
    endpoint: Url,
    resource: String,
    order: Option<String>,
    return_representation: bool,
    _row: PhantomData<fn() -> R>,
}

impl<R> Clone for ResourceClient<R> {
    fn clone(&self) -> Self {
        Self {
            http: self.http.clone(),
            endpoint: self.endpoint.clone(),
            resource: self.resource.clone(),
            order: self.order.clone(),
            return_representation: self.return_representation,
            _row: PhantomData,
        }
    }
}

impl<R> std::fmt::Debug for ResourceClient<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("order", &self.order)
            .field("return_representation", &self.return_representation)
            .finish_non_exhaustive()
    }
}

impl<R: DeserializeOwned> ResourceClient<R> {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from an API key and transport config.
    ///
    /// Injects `apikey` and `Authorization: Bearer` as default headers.
    pub fn from_api_key(
        base_url: &str,
        resource: &str,
        api_key: &SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let headers = crate::auth::api_key_headers(api_key)?;
        let http = transport.build_client_with_headers(headers)?;
        Self::from_reqwest(base_url, resource, http)
    }

    /// Wrap an existing `reqwest::Client` (caller manages auth headers).
    pub fn from_reqwest(
        base_url: &str,
        resource: &str,
        http: reqwest::Client,
    ) -> Result<Self, Error> {
        let endpoint = Self::resource_url(base_url, resource)?;
        Ok(Self {
            http,
            endpoint,
            resource: resource.to_owned(),
            order: None,
            return_representation: false,
            _row: PhantomData,
        })
    }

    /// Sort `list()` results ascending by `field` (server-side).
    pub fn with_order(mut self, field: impl Into<String>) -> Self {
        self.order = Some(field.into());
        self
    }

    /// Ask the server to echo the updated row on PATCH, skipping the
    /// follow-up read.
    pub fn with_return_representation(mut self, enabled: bool) -> Self {
        self.return_representation = enabled;
        self
    }

    /// Join the resource name under the base path.
    ///
    /// `https://h/rest/v1` + `movies` → `https://h/rest/v1/movies`
    fn resource_url(raw: &str, resource: &str) -> Result<Url, Error> {
        let mut base = Url::parse(raw)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(base.join(resource.trim_matches('/'))?)
    }

    // ── Accessors ────────────────────────────────────────────────────

    /// Table name this client targets.
    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// Fully-resolved endpoint URL.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// Read every row, ordered server-side when an order field is set.
    pub async fn list(&self) -> Result<Vec<R>, Error> {
        let mut params = Vec::new();
        if let Some(ref field) = self.order {
            params.push(("order", format!("{field}.asc")));
        }
        debug!("GET {} params={params:?}", self.endpoint);

        let resp = self
            .http
            .get(self.endpoint.clone())
            .query(&params)
            .send()
            .await?;
        let body = Self::success_body(resp).await?;
        Self::parse_rows(body)
    }

    /// Read the row with `id`; zero matches is [`Error::NotFound`].
    pub async fn get_by_id(&self, id: &str) -> Result<R, Error> {
        debug!("GET {} id=eq.{id}", self.endpoint);

        let resp = self
            .http
            .get(self.endpoint.clone())
            .query(&Self::id_filter(id))
            .send()
            .await?;
        let body = Self::success_body(resp).await?;
        Self::parse_rows(body)?
            .into_iter()
            .next()
            .ok_or_else(|| self.not_found(id))
    }

    /// Insert a row. The server assigns the id and echoes the new row.
    pub async fn create<B: Serialize + Sync>(&self, fields: &B) -> Result<R, Error> {
        debug!("POST {}", self.endpoint);

        let resp = self
            .http
            .post(self.endpoint.clone())
            .header(PREFER, HeaderValue::from_static(RETURN_REPRESENTATION))
            .json(fields)
            .send()
            .await?;
        let body = Self::success_body(resp).await?;
        Self::parse_optional_row(body)?.ok_or(Error::MissingRepresentation {
            operation: "create",
        })
    }

    /// Replace the fields of row `id`.
    ///
    /// Two-call protocol: PATCH, then GET-by-id only if the PATCH
    /// response didn't carry the row. A row that doesn't exist surfaces
    /// as [`Error::NotFound`] from the follow-up read.
    pub async fn update<B: Serialize + Sync>(&self, id: &str, fields: &B) -> Result<R, Error> {
        debug!("PATCH {} id=eq.{id}", self.endpoint);

        let mut req = self
            .http
            .patch(self.endpoint.clone())
            .query(&Self::id_filter(id))
            .json(fields);
        if self.return_representation {
            req = req.header(PREFER, HeaderValue::from_static(RETURN_REPRESENTATION));
        }

        let resp = req.send().await?;
        let body = Self::success_body(resp).await?;
        if let Some(row) = Self::parse_optional_row(body)? {
            return Ok(row);
        }

        debug!(id, "PATCH returned no row, re-reading");
        self.get_by_id(id).await
    }

    /// Delete row `id`. No payload on success.
    pub async fn delete(&self, id: &str) -> Result<(), Error> {
        debug!("DELETE {} id=eq.{id}", self.endpoint);

        let resp = self
            .http
            .delete(self.endpoint.clone())
            .query(&Self::id_filter(id))
            .send()
            .await?;
        Self::success_body(resp).await?;
        Ok(())
    }

    // ── Response handling ────────────────────────────────────────────

    fn id_filter(id: &str) -> [(&'static str, String); 1] {
        [("id", format!("eq.{id}"))]
    }

    fn not_found(&self, id: &str) -> Error {
        Error::NotFound {
            resource: self.resource.clone(),
            id: id.to_owned(),
        }
    }

    /// Read the body of a 2xx response; anything else becomes
    /// [`Error::Status`] carrying the code and body text.
    async fn success_body(resp: reqwest::Response) -> Result<String, Error> {
        let status = resp.status();
        let body = resp.text().await?;
        if status.is_success() {
            Ok(body)
        } else {
            Err(Error::Status {
                status: status.as_u16(),
                body: if body.is_empty() {
                    status.to_string()
                } else {
                    body
                },
            })
        }
    }

    /// Parse a sequence body. A bare object counts as a one-row sequence,
    /// an empty body as no rows.
    fn parse_rows(body: String) -> Result<Vec<R>, Error> {
        if body.trim().is_empty() {
            return Ok(Vec::new());
        }
        let value = Self::parse_json(&body)?;
        let rows = match value {
            serde_json::Value::Array(_) => serde_json::from_value(value),
            other => serde_json::from_value(other).map(|row| vec![row]),
        };
        rows.map_err(|e| Self::deserialization(&e, body))
    }

    /// First row of an array-wrapped or bare-object body, if any.
    fn parse_optional_row(body: String) -> Result<Option<R>, Error> {
        Ok(Self::parse_rows(body)?.into_iter().next())
    }

    fn parse_json(body: &str) -> Result<serde_json::Value, Error> {
        serde_json::from_str(body).map_err(|e| Self::deserialization(&e, body.to_owned()))
    }

    fn deserialization(err: &serde_json::Error, body: String) -> Error {
        let preview: String = body.chars().take(200).collect();
        Error::Deserialization {
            message: format!("{err} (body preview: {preview:?})"),
            body,
        }
    }
}
