//! Client, request dispatcher and endpoint wrappers for the core REST API.
//!
//! # Design
//! `Client` holds the base URL, basic-auth credentials, a [`Transport`]
//! and a [`Clock`] — nothing else. Every operation goes through
//! [`Client::do_request`]: encode the parameter table into a query,
//! build the full URL, execute the call synchronously, capture the raw
//! status, decode 2xx JSON bodies into the caller's shape. Endpoint
//! wrappers add pre-flight validation in front and status classification
//! behind; they never retry and keep no state between calls.
//!
//! The transport and clock are injectable so tests can run against
//! scripted stubs and a fixed time source; production callers never need
//! to touch either.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};
use crate::http::{HttpMethod, HttpRequest, Transport, UreqTransport};
use crate::query::{
    self, Clock, CollectionParameters, ExpandParameters, Parameters, SystemClock,
};
use crate::types::{
    Content, Contents, Entity, GroupCollection, History, Labels, SearchParameters, SearchResult,
    Space, SpaceCollection, SpaceParameters, User, UserParameters, WatchInfo, WatchParameters,
};

/// Base path of the core REST API.
const REST_BASE: &str = "/rest/api";

/// User-agent header sent with every request.
const USER_AGENT: &str = concat!("confluence-core/", env!("CARGO_PKG_VERSION"));

/// Synchronous client for the Confluence REST API.
///
/// # Example
///
/// ```no_run
/// use confluence_core::{Client, ExpandParameters};
///
/// let client = Client::new("https://wiki.example.com", "john", "secret");
/// let user = client.get_current_user(ExpandParameters::default())?;
/// println!("logged in as {}", user.display_name);
/// # Ok::<(), confluence_core::Error>(())
/// ```
pub struct Client {
    base_url: String,
    username: String,
    password: String,
    transport: Box<dyn Transport>,
    clock: Box<dyn Clock>,
}

impl Client {
    /// Create a client with the default blocking transport and wall clock.
    ///
    /// A trailing slash on `base_url` is stripped so paths concatenate
    /// cleanly.
    #[must_use]
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            username: username.into(),
            password: password.into(),
            transport: Box::new(UreqTransport::new()),
            clock: Box::new(SystemClock),
        }
    }

    /// Replace the transport. Useful for stubs in tests or an
    /// instrumented HTTP stack.
    #[must_use]
    pub fn with_transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Box::new(transport);
        self
    }

    /// Replace the time source used for cache-busting parameters.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    fn basic_auth(&self) -> String {
        let token = BASE64.encode(format!("{}:{}", self.username, self.password));
        format!("Basic {token}")
    }

    /// Dispatch one request and decode its response.
    ///
    /// The encoded query is appended only when non-empty; `body`, when
    /// supplied, is sent as JSON. A transport failure maps to
    /// [`Error::Transport`] with no status code. On any completed call
    /// the raw status is returned; 2xx bodies are decoded into `R`
    /// (failure → [`Error::Decode`]), non-2xx bodies are returned
    /// undecoded as `None` for the wrapper's classifier.
    pub fn do_request<R>(
        &self,
        method: HttpMethod,
        path: &str,
        params: &dyn Parameters,
        body: Option<&serde_json::Value>,
    ) -> Result<(u16, Option<R>)>
    where
        R: DeserializeOwned,
    {
        let query = query::encode(params, self.clock.as_ref());
        let mut url = format!("{}{}", self.base_url, path);
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query);
        }

        let mut headers = vec![
            ("authorization".to_string(), self.basic_auth()),
            ("accept".to_string(), "application/json".to_string()),
            ("user-agent".to_string(), USER_AGENT.to_string()),
        ];

        let body = body.map(|value| {
            headers.push(("content-type".to_string(), "application/json".to_string()));
            value.to_string()
        });

        tracing::debug!(method = method.as_str(), url = %url, "dispatching request");

        let response = self
            .transport
            .execute(HttpRequest {
                method,
                url,
                headers,
                body,
            })
            .map_err(Error::Transport)?;

        tracing::debug!(
            status = response.status,
            size = response.body.len(),
            "response received"
        );

        if (200..300).contains(&response.status) {
            let value = serde_json::from_str(&response.body).map_err(|source| Error::Decode {
                size: response.body.len(),
                snippet: response.body.chars().take(60).collect(),
                source,
            })?;
            Ok((response.status, Some(value)))
        } else {
            Ok((response.status, None))
        }
    }

    // CONTENT ---------------------------------------------------------------

    /// List content.
    ///
    /// Documented statuses: `403` → [`Error::PermissionDenied`]; any other
    /// non-2xx → [`Error::UnexpectedStatus`]. The same mapping applies to
    /// every wrapper below.
    pub fn get_content(&self, params: CollectionParameters) -> Result<Content> {
        let (status, payload) =
            self.do_request(HttpMethod::Get, &format!("{REST_BASE}/content"), &params, None)?;
        classify(status, payload)
    }

    /// Fetch a single content entity by ID.
    pub fn get_content_by_id(&self, content_id: &str, params: ExpandParameters) -> Result<Entity> {
        if content_id.is_empty() {
            return Err(Error::MissingParameter("contentId"));
        }
        let (status, payload) = self.do_request(
            HttpMethod::Get,
            &format!("{REST_BASE}/content/{content_id}"),
            &params,
            None,
        )?;
        classify(status, payload)
    }

    /// Fetch the direct children of a content entity, grouped by type.
    pub fn get_content_children(
        &self,
        content_id: &str,
        params: ExpandParameters,
    ) -> Result<Contents> {
        if content_id.is_empty() {
            return Err(Error::MissingParameter("contentId"));
        }
        let (status, payload) = self.do_request(
            HttpMethod::Get,
            &format!("{REST_BASE}/content/{content_id}/child"),
            &params,
            None,
        )?;
        classify(status, payload)
    }

    /// Fetch the labels attached to a content entity.
    pub fn get_content_labels(
        &self,
        content_id: &str,
        params: CollectionParameters,
    ) -> Result<Labels> {
        if content_id.is_empty() {
            return Err(Error::MissingParameter("contentId"));
        }
        let (status, payload) = self.do_request(
            HttpMethod::Get,
            &format!("{REST_BASE}/content/{content_id}/label"),
            &params,
            None,
        )?;
        classify(status, payload)
    }

    /// Fetch the version history of a content entity.
    pub fn get_content_history(
        &self,
        content_id: &str,
        params: ExpandParameters,
    ) -> Result<History> {
        if content_id.is_empty() {
            return Err(Error::MissingParameter("contentId"));
        }
        let (status, payload) = self.do_request(
            HttpMethod::Get,
            &format!("{REST_BASE}/content/{content_id}/history"),
            &params,
            None,
        )?;
        classify(status, payload)
    }

    // SEARCH ----------------------------------------------------------------

    /// Run a CQL search. The `cql` parameter is mandatory.
    pub fn search(&self, params: SearchParameters) -> Result<SearchResult> {
        if params.cql.is_empty() {
            return Err(Error::MissingParameter("cql"));
        }
        let (status, payload) =
            self.do_request(HttpMethod::Get, &format!("{REST_BASE}/search"), &params, None)?;
        classify(status, payload)
    }

    // SPACE -----------------------------------------------------------------

    /// List spaces.
    pub fn get_spaces(&self, params: SpaceParameters) -> Result<SpaceCollection> {
        let (status, payload) =
            self.do_request(HttpMethod::Get, &format!("{REST_BASE}/space"), &params, None)?;
        classify(status, payload)
    }

    /// Fetch a single space by key.
    pub fn get_space(&self, space_key: &str, params: ExpandParameters) -> Result<Space> {
        if space_key.is_empty() {
            return Err(Error::MissingParameter("spaceKey"));
        }
        let (status, payload) = self.do_request(
            HttpMethod::Get,
            &format!("{REST_BASE}/space/{space_key}"),
            &params,
            None,
        )?;
        classify(status, payload)
    }

    // USER ------------------------------------------------------------------

    /// Fetch a user by key or username; at least one must be set.
    pub fn get_user(&self, params: UserParameters) -> Result<User> {
        if params.key.is_empty() && params.username.is_empty() {
            return Err(Error::MissingParameter("key or username"));
        }
        let (status, payload) =
            self.do_request(HttpMethod::Get, &format!("{REST_BASE}/user"), &params, None)?;
        classify(status, payload)
    }

    /// Fetch the authenticated user.
    pub fn get_current_user(&self, params: ExpandParameters) -> Result<User> {
        let (status, payload) = self.do_request(
            HttpMethod::Get,
            &format!("{REST_BASE}/user/current"),
            &params,
            None,
        )?;
        classify(status, payload)
    }

    /// Fetch the anonymous user.
    pub fn get_anonymous_user(&self, params: ExpandParameters) -> Result<User> {
        let (status, payload) = self.do_request(
            HttpMethod::Get,
            &format!("{REST_BASE}/user/anonymous"),
            &params,
            None,
        )?;
        classify(status, payload)
    }

    /// Fetch the groups a user belongs to; key or username must be set.
    pub fn get_user_groups(&self, params: UserParameters) -> Result<GroupCollection> {
        if params.key.is_empty() && params.username.is_empty() {
            return Err(Error::MissingParameter("key or username"));
        }
        let (status, payload) = self.do_request(
            HttpMethod::Get,
            &format!("{REST_BASE}/user/memberof"),
            &params,
            None,
        )?;
        classify(status, payload)
    }

    // WATCH -----------------------------------------------------------------

    /// Fetch the watch status of a content entity for a user.
    pub fn get_watch_status(&self, content_id: &str, params: WatchParameters) -> Result<WatchInfo> {
        if content_id.is_empty() {
            return Err(Error::MissingParameter("contentId"));
        }
        let (status, payload) = self.do_request(
            HttpMethod::Get,
            &format!("{REST_BASE}/user/watch/content/{content_id}"),
            &params,
            None,
        )?;
        classify(status, payload)
    }
}

/// Shared status classification: `403` means no permission on every
/// endpoint of this API, a decoded 2xx payload is success, and any other
/// status falls through with its raw code.
pub(crate) fn classify<R>(status: u16, payload: Option<R>) -> Result<R> {
    match (status, payload) {
        (403, _) => Err(Error::PermissionDenied),
        (_, Some(value)) => Ok(value),
        (status, None) => Err(Error::UnexpectedStatus(status)),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::http::HttpResponse;
    use std::sync::{Arc, Mutex};

    /// Transport that records every request and answers with a script.
    pub(crate) struct ScriptedTransport {
        pub status: u16,
        pub body: String,
        pub seen: Arc<Mutex<Vec<HttpRequest>>>,
    }

    impl ScriptedTransport {
        pub fn ok(body: &str) -> (Self, Arc<Mutex<Vec<HttpRequest>>>) {
            Self::with_status(200, body)
        }

        pub fn with_status(status: u16, body: &str) -> (Self, Arc<Mutex<Vec<HttpRequest>>>) {
            let seen = Arc::new(Mutex::new(Vec::new()));
            (
                Self {
                    status,
                    body: body.to_string(),
                    seen: Arc::clone(&seen),
                },
                seen,
            )
        }
    }

    impl Transport for ScriptedTransport {
        fn execute(
            &self,
            request: HttpRequest,
        ) -> std::result::Result<HttpResponse, crate::http::TransportError> {
            self.seen.lock().unwrap().push(request);
            Ok(HttpResponse {
                status: self.status,
                body: self.body.clone(),
            })
        }
    }

    struct FailingTransport;

    impl Transport for FailingTransport {
        fn execute(
            &self,
            _request: HttpRequest,
        ) -> std::result::Result<HttpResponse, crate::http::TransportError> {
            Err("connection refused".into())
        }
    }

    fn client_with(transport: ScriptedTransport) -> Client {
        Client::new("http://wiki.test", "john", "secret")
            .with_transport(transport)
            .with_clock(crate::query::tests::FixedClock(1))
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let (transport, seen) = ScriptedTransport::ok(r#"{"watching":false}"#);
        let client = Client::new("http://wiki.test/", "john", "secret").with_transport(transport);
        client
            .get_watch_status("65603", WatchParameters::default())
            .unwrap();
        let url = &seen.lock().unwrap()[0].url;
        assert_eq!(url, "http://wiki.test/rest/api/user/watch/content/65603");
    }

    #[test]
    fn query_is_appended_after_a_question_mark() {
        let (transport, seen) = ScriptedTransport::ok(r#"{"id":"65603"}"#);
        let client = client_with(transport);
        let params = ExpandParameters {
            expand: vec!["space".to_string(), "version".to_string()],
        };
        client.get_content_by_id("65603", params).unwrap();
        let url = &seen.lock().unwrap()[0].url;
        assert_eq!(
            url,
            "http://wiki.test/rest/api/content/65603?expand=space%2Cversion"
        );
    }

    #[test]
    fn empty_query_means_no_question_mark() {
        let (transport, seen) = ScriptedTransport::ok(r#"{"username":"john"}"#);
        let client = client_with(transport);
        client.get_current_user(ExpandParameters::default()).unwrap();
        let url = &seen.lock().unwrap()[0].url;
        assert_eq!(url, "http://wiki.test/rest/api/user/current");
    }

    #[test]
    fn requests_carry_basic_auth_and_user_agent() {
        let (transport, seen) = ScriptedTransport::ok(r#"{"username":"john"}"#);
        let client = client_with(transport);
        client.get_current_user(ExpandParameters::default()).unwrap();

        let request = &seen.lock().unwrap()[0];
        let auth = request
            .headers
            .iter()
            .find(|(name, _)| name == "authorization")
            .map(|(_, value)| value.clone())
            .unwrap();
        assert_eq!(auth, "Basic am9objpzZWNyZXQ=");
        assert!(request
            .headers
            .iter()
            .any(|(name, value)| name == "user-agent" && value.starts_with("confluence-core/")));
    }

    #[test]
    fn missing_content_id_never_touches_the_transport() {
        let (transport, seen) = ScriptedTransport::ok("{}");
        let client = client_with(transport);

        let err = client
            .get_content_by_id("", ExpandParameters::default())
            .unwrap_err();

        assert!(matches!(err, Error::MissingParameter("contentId")));
        assert_eq!(seen.lock().unwrap().len(), 0);
    }

    #[test]
    fn missing_cql_never_touches_the_transport() {
        let (transport, seen) = ScriptedTransport::ok("{}");
        let client = client_with(transport);

        let err = client.search(SearchParameters::default()).unwrap_err();

        assert!(matches!(err, Error::MissingParameter("cql")));
        assert_eq!(seen.lock().unwrap().len(), 0);
    }

    #[test]
    fn forbidden_maps_to_permission_denied() {
        let (transport, _) = ScriptedTransport::with_status(403, "");
        let client = client_with(transport);
        let err = client
            .get_content_by_id("65603", ExpandParameters::default())
            .unwrap_err();
        assert!(matches!(err, Error::PermissionDenied));
    }

    #[test]
    fn undocumented_status_falls_through_with_its_code() {
        let (transport, _) = ScriptedTransport::with_status(404, "");
        let client = client_with(transport);
        let err = client
            .get_content_by_id("65603", ExpandParameters::default())
            .unwrap_err();
        assert!(matches!(err, Error::UnexpectedStatus(404)));
    }

    #[test]
    fn malformed_success_body_is_a_decode_error() {
        let (transport, _) = ScriptedTransport::ok("<html>proxy error</html>");
        let client = client_with(transport);
        let err = client
            .get_content_by_id("65603", ExpandParameters::default())
            .unwrap_err();
        match err {
            Error::Decode { size, snippet, .. } => {
                assert_eq!(size, 24);
                assert!(snippet.starts_with("<html>"));
            }
            other => panic!("expected decode error, got {other:?}"),
        }
    }

    #[test]
    fn transport_failure_surfaces_without_a_status() {
        let client = Client::new("http://wiki.test", "john", "secret")
            .with_transport(FailingTransport);
        let err = client
            .get_current_user(ExpandParameters::default())
            .unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
    }

    #[test]
    fn body_is_serialized_with_a_json_content_type() {
        let (transport, seen) = ScriptedTransport::ok(r#"{"id":"1"}"#);
        let client = client_with(transport);
        let body = serde_json::json!({"title": "New page"});

        let _: (u16, Option<Entity>) = client
            .do_request(
                HttpMethod::Post,
                "/rest/api/content",
                &crate::query::EmptyParameters,
                Some(&body),
            )
            .unwrap();

        let request = &seen.lock().unwrap()[0];
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.body.as_deref(), Some(r#"{"title":"New page"}"#));
        assert!(request
            .headers
            .iter()
            .any(|(name, value)| name == "content-type" && value == "application/json"));
    }

    #[test]
    fn get_requests_send_no_body() {
        let (transport, seen) = ScriptedTransport::ok(r#"{"results":[]}"#);
        let client = client_with(transport);
        client.get_content(CollectionParameters::default()).unwrap();
        let request = &seen.lock().unwrap()[0];
        assert!(request.body.is_none());
        assert!(!request.headers.iter().any(|(name, _)| name == "content-type"));
    }

    #[test]
    fn user_lookup_requires_key_or_username() {
        let (transport, seen) = ScriptedTransport::ok("{}");
        let client = client_with(transport);
        let err = client.get_user(UserParameters::default()).unwrap_err();
        assert!(matches!(err, Error::MissingParameter(_)));
        assert_eq!(seen.lock().unwrap().len(), 0);
    }
}
