//! HTTP transport types and the transport seam.
//!
//! # Design
//! Requests and responses are plain data. The dispatcher builds an
//! [`HttpRequest`], hands it to a [`Transport`], and interprets the
//! [`HttpResponse`] that comes back. Keeping the boundary as data makes
//! the dispatcher testable with scripted or recording stubs, and keeps
//! every networking concern (pooling, TLS, redirects) inside the
//! transport implementation.
//!
//! [`UreqTransport`] is the default: a blocking `ureq` agent with
//! status-as-error disabled, so 4xx/5xx responses come back as data for
//! the status classifier rather than as transport failures.

/// Transport-level failure: DNS, connection, TLS, timeout, read errors.
pub type TransportError = Box<dyn std::error::Error + Send + Sync>;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// An HTTP request described as plain data.
///
/// `url` is absolute and already carries the encoded query.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Executes one request synchronously.
///
/// Implementations must return `Ok` for any response the server produced,
/// whatever its status code; `Err` is reserved for calls that never
/// completed at the HTTP level.
pub trait Transport: Send + Sync {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Default blocking transport backed by a shared [`ureq::Agent`].
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    /// Build an agent with automatic status-code-as-error behavior
    /// disabled, so non-2xx responses are returned as data and status
    /// interpretation stays with the caller.
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let result = match (request.method, request.body) {
            (HttpMethod::Get, _) => {
                let mut builder = self.agent.get(&request.url);
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                builder.call()
            }
            (HttpMethod::Delete, _) => {
                let mut builder = self.agent.delete(&request.url);
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                builder.call()
            }
            (HttpMethod::Post, body) => {
                let mut builder = self.agent.post(&request.url);
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                match body {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
            (HttpMethod::Put, body) => {
                let mut builder = self.agent.put(&request.url);
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                match body {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
        };

        let mut response = result?;
        let status = response.status().as_u16();
        let body = response.body_mut().read_to_string()?;

        Ok(HttpResponse { status, body })
    }
}
