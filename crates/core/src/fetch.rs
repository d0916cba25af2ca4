//! HTTP client abstraction for making requests to the CityWatch API

use log::{debug, warn};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::multipart::Form;
use reqwest::{Client, Method};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use url::Url;

use crate::base::ApiBase;
use crate::error::{ApiError, Result};
use crate::session::Sessions;

/// Status and body of a completed request
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    /// The body parsed as JSON, `None` when empty or not JSON
    pub data: Option<Value>,
    /// The raw body text
    pub text: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// A string field of the JSON body
    pub fn field_str(&self, key: &str) -> Option<&str> {
        self.data.as_ref()?.get(key)?.as_str()
    }

    /// Decode the JSON body into `T`
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        let data = self.data.clone().unwrap_or(Value::Null);
        Ok(serde_json::from_value(data)?)
    }

    /// Turn a failure status into an [`ApiError::Api`]
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            return Ok(self);
        }

        let message = self
            .data
            .as_ref()
            .and_then(|d| d.get("message"))
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .map(str::to_string);

        Err(ApiError::Api {
            status: self.status,
            message,
            body: self.data,
        })
    }
}

enum Body {
    Empty,
    Json(Vec<u8>),
    Multipart(Form),
}

/// Helper for building and executing HTTP requests
pub struct FetchBuilder<'a> {
    client: &'a Client,
    url: Url,
    method: Method,
    headers: HeaderMap,
    query_params: Vec<(String, String)>,
    body: Body,
}

impl<'a> FetchBuilder<'a> {
    /// Create a new FetchBuilder
    pub fn new(client: &'a Client, url: Url, method: Method) -> Self {
        Self {
            client,
            url,
            method,
            headers: HeaderMap::new(),
            query_params: Vec::new(),
            body: Body::Empty,
        }
    }

    /// Add a header to the request
    pub fn header(mut self, name: &'static str, value: &str) -> Self {
        if let Ok(value) = HeaderValue::from_str(value) {
            self.headers.insert(name, value);
        }
        self
    }

    /// Add bearer token authentication to the request
    pub fn bearer_auth(mut self, token: &str) -> Self {
        if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", token)) {
            self.headers.insert(AUTHORIZATION, value);
        }
        self
    }

    /// Add a query parameter to the request
    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query_params.push((key.to_string(), value.to_string()));
        self
    }

    /// Add a JSON body to the request
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        let json = serde_json::to_vec(body)?;
        self.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        self.body = Body::Json(json);
        Ok(self)
    }

    /// Add a multipart body to the request
    pub fn multipart(mut self, form: Form) -> Self {
        self.headers.remove(CONTENT_TYPE);
        self.body = Body::Multipart(form);
        self
    }

    /// Send the request and return whatever came back, failure statuses included
    pub async fn send(self) -> Result<ApiResponse> {
        let mut url = self.url;
        if !self.query_params.is_empty() {
            let mut query_pairs = url.query_pairs_mut();
            for (key, value) in &self.query_params {
                query_pairs.append_pair(key, value);
            }
        }

        debug!("{} {}", self.method, url);

        let mut req = self.client.request(self.method, url).headers(self.headers);
        req = match self.body {
            Body::Empty => req,
            Body::Json(bytes) => req.body(bytes),
            Body::Multipart(form) => req.multipart(form),
        };

        let response = req.send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;

        let data = if text.trim().is_empty() {
            None
        } else {
            match serde_json::from_str::<Value>(&text) {
                Ok(value) => Some(value),
                Err(err) => {
                    warn!("Response body with status {} is not JSON: {}", status, err);
                    None
                }
            }
        };

        Ok(ApiResponse { status, data, text })
    }

    /// Send the request, treating any non-2xx status as an error
    pub async fn execute(self) -> Result<ApiResponse> {
        self.send().await?.error_for_status()
    }

    /// Send the request and decode the JSON body
    pub async fn execute_json<T: DeserializeOwned>(self) -> Result<T> {
        self.execute().await?.json()
    }
}

/// Client shared by every CityWatch component
///
/// Resolves paths against the [`ApiBase`] and attaches the stored bearer
/// token, when there is one, to every request.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base: ApiBase,
    http_client: Client,
    sessions: Sessions,
}

impl ApiClient {
    pub fn new(base: ApiBase, http_client: Client, sessions: Sessions) -> Self {
        Self {
            base,
            http_client,
            sessions,
        }
    }

    pub fn base(&self) -> &ApiBase {
        &self.base
    }

    pub fn sessions(&self) -> &Sessions {
        &self.sessions
    }

    pub fn http_client(&self) -> &Client {
        &self.http_client
    }

    /// Start a request to `path`
    pub fn request(&self, method: Method, path: &str) -> Result<FetchBuilder<'_>> {
        let url = self.base.join(path)?;
        let builder = FetchBuilder::new(&self.http_client, url, method);
        Ok(match self.sessions.token() {
            Some(token) => builder.bearer_auth(&token),
            None => builder,
        })
    }

    /// Create a GET request
    pub fn get(&self, path: &str) -> Result<FetchBuilder<'_>> {
        self.request(Method::GET, path)
    }

    /// Create a POST request
    pub fn post(&self, path: &str) -> Result<FetchBuilder<'_>> {
        self.request(Method::POST, path)
    }

    /// Create a PATCH request
    pub fn patch(&self, path: &str) -> Result<FetchBuilder<'_>> {
        self.request(Method::PATCH, path)
    }
}
