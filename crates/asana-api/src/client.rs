use std::collections::HashSet;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;
use uuid::Uuid;

use crate::error::{ApiError, ErrorDetail, WireError};
use crate::options::{Options, join_features};
use crate::transport::{
    DEFAULT_TIMEOUT, HttpRequest, HttpResponse, Method, ReqwestTransport, Transport,
};

pub const DEFAULT_BASE_URL: &str = "https://app.asana.com/api/1.0/";
pub const MAX_PAGE_SIZE: u32 = 100;

/// Supplies the bearer token. Called once per request; `Ok(None)` means no credential
/// is stored.
pub trait TokenProvider: Send + Sync {
    fn bearer_token(&self) -> anyhow::Result<Option<String>>;
}

#[derive(Debug, Clone)]
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl TokenProvider for StaticToken {
    fn bearer_token(&self) -> anyhow::Result<Option<String>> {
        Ok(Some(self.0.clone()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NextPage {
    #[serde(default)]
    pub offset: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub uri: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub data: T,
    pub next_page: Option<NextPage>,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    next_page: Option<NextPage>,
    #[serde(default)]
    errors: Option<Vec<WireError>>,
}

#[derive(Serialize)]
struct RequestBody<'a, B: Serialize + ?Sized> {
    data: &'a B,
    options: &'a Options,
}

pub struct Client {
    base_url: Url,
    transport: Box<dyn Transport>,
    tokens: Box<dyn TokenProvider>,
    default_options: Options,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url.as_str())
            .field("default_options", &self.default_options)
            .finish_non_exhaustive()
    }
}

impl Client {
    pub fn new(base_url: &str, tokens: impl TokenProvider + 'static) -> Result<Self, ApiError> {
        let transport = ReqwestTransport::new(DEFAULT_TIMEOUT)
            .map_err(|err| ApiError::InvalidConfig(err.to_string()))?;
        Self::with_transport(base_url, transport, tokens)
    }

    pub fn with_transport(
        base_url: &str,
        transport: impl Transport + 'static,
        tokens: impl TokenProvider + 'static,
    ) -> Result<Self, ApiError> {
        Ok(Self {
            base_url: normalize_base_url(base_url)?,
            transport: Box::new(transport),
            tokens: Box::new(tokens),
            default_options: Options::default(),
        })
    }

    pub fn with_default_options(mut self, options: Options) -> Self {
        self.default_options = options;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves a resource path below the base URL, refusing anything that could leave it.
    pub fn resolve(&self, path: &str) -> Result<Url, ApiError> {
        let invalid = |reason| ApiError::InvalidPath {
            path: path.to_string(),
            reason,
        };
        if path.contains("://") || path.starts_with("//") {
            return Err(invalid("absolute URLs are not allowed"));
        }
        if path.contains(['?', '#', '\\']) {
            return Err(invalid("query and fragment belong in options"));
        }
        let relative = path.strip_prefix('/').unwrap_or(path);
        if relative.is_empty() {
            return Err(invalid("path is empty"));
        }
        for segment in relative.split('/') {
            match segment {
                "" => return Err(invalid("empty path segment")),
                s if is_dot_segment(s) => return Err(invalid("dot segments are not allowed")),
                _ => {}
            }
        }
        let url = self
            .base_url
            .join(relative)
            .map_err(|_| invalid("not a valid URL path"))?;
        if !url.as_str().starts_with(self.base_url.as_str()) {
            return Err(invalid("path escapes the API base URL"));
        }
        Ok(url)
    }

    pub fn get<T, Q>(&self, path: &str, query: &Q, options: &Options) -> Result<Page<T>, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let pairs = query_pairs(query)?;
        let (page, request_id, status) = self.execute(Method::Get, path, pairs, None, options)?;
        Ok(Page {
            data: decode_data(page.data, status, &request_id)?,
            next_page: page.next_page,
        })
    }

    pub fn post<B, T>(&self, path: &str, body: &B, options: &Options) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.write(Method::Post, path, body, options)
    }

    pub fn put<B, T>(&self, path: &str, body: &B, options: &Options) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.write(Method::Put, path, body, options)
    }

    pub fn delete(&self, path: &str, options: &Options) -> Result<(), ApiError> {
        self.execute(Method::Delete, path, Vec::new(), None, options)?;
        Ok(())
    }

    /// Follows `next_page.offset` until the server stops returning one, or until `limit`
    /// items have been collected (`0` means no limit). Server order is preserved.
    pub fn get_all<T, Q>(
        &self,
        path: &str,
        query: &Q,
        options: &Options,
        limit: usize,
    ) -> Result<Vec<T>, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let mut options = options.clone();
        if options.limit.is_none() {
            let page_size = match u32::try_from(limit) {
                Ok(0) | Err(_) => MAX_PAGE_SIZE,
                Ok(n) => n.min(MAX_PAGE_SIZE),
            };
            options.limit = Some(page_size);
        }

        let mut items: Vec<T> = Vec::new();
        let mut seen: HashSet<String> = options.offset.iter().cloned().collect();
        let mut pages = 0_usize;
        loop {
            let page: Page<Vec<T>> = self.get(path, query, &options)?;
            pages += 1;
            items.extend(page.data);

            if limit > 0 && items.len() >= limit {
                items.truncate(limit);
                break;
            }
            let offset = match page.next_page {
                Some(next) if !next.offset.is_empty() => next.offset,
                _ => break,
            };
            if !seen.insert(offset.clone()) {
                tracing::warn!(path, %offset, "server repeated a pagination offset");
                return Err(ApiError::PaginationLoop { offset });
            }
            options.offset = Some(offset);
        }

        tracing::debug!(path, pages, items = items.len(), "pagination finished");
        Ok(items)
    }

    fn write<B, T>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        options: &Options,
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let merged = options.merged_with(&self.default_options);
        let encoded = serde_json::to_vec(&RequestBody {
            data: body,
            options: &merged,
        })
        .map_err(ApiError::Encode)?;
        let (page, request_id, status) =
            self.execute(method, path, Vec::new(), Some(encoded), options)?;
        decode_data(page.data, status, &request_id)
    }

    fn execute(
        &self,
        method: Method,
        path: &str,
        mut query: Vec<(String, String)>,
        body: Option<Vec<u8>>,
        options: &Options,
    ) -> Result<(Page<Value>, String, u16), ApiError> {
        let request_id = Uuid::new_v4().to_string();
        let mut url = self.resolve(path)?;
        let options = options.merged_with(&self.default_options);

        let token = match self.tokens.bearer_token() {
            Ok(Some(token)) if !token.trim().is_empty() => token,
            Ok(_) => return Err(ApiError::NotAuthenticated),
            Err(err) => return Err(ApiError::Credential(format!("{err:#}"))),
        };

        if !method.sends_body() {
            query.extend(options.query_pairs());
        }
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }

        let mut headers = vec![
            ("Authorization", format!("Bearer {}", token.trim())),
            ("Accept", "application/json".to_string()),
        ];
        if method.sends_body() {
            headers.push(("Content-Type", "application/json".to_string()));
        }
        if !options.enable.is_empty() {
            headers.push(("Asana-Enable", join_features(&options.enable)));
        }
        if !options.disable.is_empty() {
            headers.push(("Asana-Disable", join_features(&options.disable)));
        }

        tracing::debug!(%request_id, %method, path, "sending asana request");
        let response = self
            .transport
            .send(HttpRequest {
                method,
                url,
                headers,
                body: if method.sends_body() { body } else { None },
            })
            .map_err(|err| ApiError::Transport {
                method,
                path: path.to_string(),
                message: err.message,
                timed_out: err.timed_out,
            })?;
        tracing::debug!(%request_id, status = response.status, "asana response received");

        let status = response.status;
        let page = classify(response, &request_id).inspect_err(|err| {
            if let ApiError::Api(detail) = err {
                tracing::warn!(%request_id, status = detail.status_code, message = %detail.message, "asana api error");
            }
        })?;
        Ok((page, request_id, status))
    }
}

/// Maps a raw response onto the envelope contract: any `errors` entry is an API error,
/// a non-2xx without a decodable body falls back to the status text, and a 2xx must
/// carry `data`.
fn classify(response: HttpResponse, request_id: &str) -> Result<Page<Value>, ApiError> {
    let status = response.status;
    let success = (200..300).contains(&status);
    let envelope: Envelope = match serde_json::from_slice(&response.body) {
        Ok(envelope) => envelope,
        Err(err) if success => {
            return Err(ApiError::Decode {
                status,
                request_id: request_id.to_string(),
                reason: err.to_string(),
            });
        }
        Err(_) => return Err(ApiError::Api(ErrorDetail::from_status(status, request_id))),
    };

    if let Some(errors) = envelope.errors.filter(|errors| !errors.is_empty()) {
        return Err(ApiError::Api(ErrorDetail::from_wire(
            errors, status, request_id,
        )));
    }
    if !success {
        return Err(ApiError::Api(ErrorDetail::from_status(status, request_id)));
    }
    match envelope.data {
        Some(data) => Ok(Page {
            data,
            next_page: envelope.next_page,
        }),
        None => Err(ApiError::MissingData {
            request_id: request_id.to_string(),
        }),
    }
}

fn decode_data<T: DeserializeOwned>(data: Value, status: u16, request_id: &str) -> Result<T, ApiError> {
    serde_json::from_value(data).map_err(|err| ApiError::Decode {
        status,
        request_id: request_id.to_string(),
        reason: format!("unable to parse response data: {err}"),
    })
}

fn normalize_base_url(raw: &str) -> Result<Url, ApiError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(ApiError::InvalidConfig("base URL is empty".to_string()));
    }
    let url = Url::parse(&format!("{trimmed}/"))
        .map_err(|err| ApiError::InvalidConfig(format!("invalid base URL {raw:?}: {err}")))?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(ApiError::InvalidConfig(format!(
            "base URL must be http(s): {raw:?}"
        )));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(ApiError::InvalidConfig(format!(
            "base URL must not carry a query or fragment: {raw:?}"
        )));
    }
    Ok(url)
}

/// Flattens a serializable query struct into `key=value` pairs: strings verbatim, numbers and
/// booleans stringified, arrays comma-joined, nulls dropped.
pub(crate) fn query_pairs<Q: Serialize + ?Sized>(query: &Q) -> Result<Vec<(String, String)>, ApiError> {
    match serde_json::to_value(query).map_err(ApiError::Encode)? {
        Value::Null => Ok(Vec::new()),
        Value::Object(map) => Ok(map
            .into_iter()
            .filter_map(|(key, value)| query_value(&value).map(|value| (key, value)))
            .collect()),
        other => Err(ApiError::InvalidRequest(format!(
            "query must be a struct or map, got {other}"
        ))),
    }
}

fn query_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(query_value).collect();
            (!parts.is_empty()).then(|| parts.join(","))
        }
        Value::Object(_) => Some(value.to_string()),
    }
}

/// Validates a single id before it is spliced into a resource path.
pub(crate) fn segment(gid: &str) -> Result<&str, ApiError> {
    let trimmed = gid.trim();
    if trimmed.is_empty() || trimmed.contains(['/', '?', '#', '\\']) || is_dot_segment(trimmed) {
        return Err(ApiError::InvalidRequest(format!("invalid gid {gid:?}")));
    }
    Ok(trimmed)
}

/// `.` and `..`, including percent-encoded forms such as `%2E%2e`, which URL parsers
/// normalize away.
fn is_dot_segment(segment: &str) -> bool {
    let decoded = segment.to_ascii_lowercase().replace("%2e", ".");
    decoded == "." || decoded == ".."
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use serde_json::json;

    use super::*;
    use crate::transport::TransportError;

    #[derive(Clone, Default)]
    struct ScriptedTransport {
        responses: Arc<Mutex<VecDeque<Result<HttpResponse, TransportError>>>>,
        requests: Arc<Mutex<Vec<HttpRequest>>>,
    }

    impl ScriptedTransport {
        fn push(&self, status: u16, body: Value) {
            self.push_raw(status, body.to_string().as_bytes());
        }

        fn push_raw(&self, status: u16, body: &[u8]) {
            self.responses.lock().expect("lock").push_back(Ok(HttpResponse {
                status,
                body: body.to_vec(),
            }));
        }

        fn requests(&self) -> Vec<HttpRequest> {
            self.requests.lock().expect("lock").clone()
        }
    }

    impl Transport for ScriptedTransport {
        fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
            self.requests.lock().expect("lock").push(request);
            self.responses
                .lock()
                .expect("lock")
                .pop_front()
                .unwrap_or_else(|| panic!("unexpected request, no scripted response left"))
        }
    }

    struct NoToken;

    impl TokenProvider for NoToken {
        fn bearer_token(&self) -> anyhow::Result<Option<String>> {
            Ok(None)
        }
    }

    fn client(transport: &ScriptedTransport) -> Client {
        Client::with_transport(
            "https://app.asana.com/api/1.0",
            transport.clone(),
            StaticToken::new("secret-token"),
        )
        .expect("client")
    }

    fn page(items: Value, offset: Option<&str>) -> Value {
        match offset {
            Some(offset) => json!({
                "data": items,
                "next_page": {"offset": offset, "path": "/tasks?offset=x", "uri": "https://x"}
            }),
            None => json!({"data": items, "next_page": null}),
        }
    }

    #[test]
    fn base_url_is_normalized_with_single_trailing_slash() {
        for raw in [
            "https://app.asana.com/api/1.0",
            "https://app.asana.com/api/1.0/",
            "https://app.asana.com/api/1.0//",
        ] {
            let transport = ScriptedTransport::default();
            let client = Client::with_transport(raw, transport, StaticToken::new("t"))
                .expect("client");
            assert_eq!(client.base_url().as_str(), "https://app.asana.com/api/1.0/");
        }
        assert!(matches!(
            normalize_base_url("ftp://example.com"),
            Err(ApiError::InvalidConfig(_))
        ));
    }

    #[test]
    fn resolve_rejects_paths_escaping_the_base() {
        let client = client(&ScriptedTransport::default());
        assert_eq!(
            client.resolve("/tasks/12").expect("resolve").as_str(),
            "https://app.asana.com/api/1.0/tasks/12"
        );
        assert_eq!(
            client.resolve("users/me").expect("resolve").as_str(),
            "https://app.asana.com/api/1.0/users/me"
        );
        for bad in [
            "https://evil.example/tasks",
            "//evil.example/tasks",
            "../secrets",
            "tasks/../../x",
            "tasks/./1",
            "tasks/%2e%2e/users/me",
            "%2E%2E/secrets",
            "tasks/.%2e/x",
            "tasks/%2e/1",
            "tasks//1",
            "tasks?limit=1",
            "",
            "/",
        ] {
            assert!(
                matches!(client.resolve(bad), Err(ApiError::InvalidPath { .. })),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn missing_token_short_circuits_before_transport() {
        let transport = ScriptedTransport::default();
        let client = Client::with_transport(DEFAULT_BASE_URL, transport.clone(), NoToken)
            .expect("client");
        let err = client
            .get::<Value, _>("users/me", &(), &Options::default())
            .expect_err("must fail");
        assert!(matches!(err, ApiError::NotAuthenticated));
        assert!(err.is_auth_error());
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn errors_list_wins_even_on_success_status() {
        let transport = ScriptedTransport::default();
        transport.push(
            200,
            json!({"data": {"gid": "1"}, "errors": [{"message": "partial failure"}]}),
        );
        let err = client(&transport)
            .get::<Value, _>("tasks/1", &(), &Options::default())
            .expect_err("must fail");
        match err {
            ApiError::Api(detail) => {
                assert_eq!(detail.status_code, 200);
                assert_eq!(detail.message, "partial failure");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn success_without_data_is_missing_data() {
        let transport = ScriptedTransport::default();
        transport.push(200, json!({"data": null}));
        transport.push(201, json!({}));
        let client = client(&transport);
        for _ in 0..2 {
            let err = client
                .get::<Value, _>("tasks/1", &(), &Options::default())
                .expect_err("must fail");
            assert!(matches!(err, ApiError::MissingData { .. }), "{err:?}");
        }
    }

    #[test]
    fn undecodable_success_body_is_decode_error_with_status() {
        let transport = ScriptedTransport::default();
        transport.push_raw(200, b"<html>gateway</html>");
        let err = client(&transport)
            .get::<Value, _>("tasks/1", &(), &Options::default())
            .expect_err("must fail");
        match err {
            ApiError::Decode {
                status, request_id, ..
            } => {
                assert_eq!(status, 200);
                assert!(!request_id.is_empty());
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn undecodable_error_body_falls_back_to_status_text() {
        let transport = ScriptedTransport::default();
        transport.push_raw(503, b"upstream unavailable");
        let err = client(&transport)
            .get::<Value, _>("tasks/1", &(), &Options::default())
            .expect_err("must fail");
        match err {
            ApiError::Api(detail) => {
                assert_eq!(detail.status_code, 503);
                assert_eq!(detail.kind, "unknown");
                assert_eq!(detail.message, "Service Unavailable");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn transport_failure_is_retryable() {
        let transport = ScriptedTransport::default();
        transport
            .responses
            .lock()
            .expect("lock")
            .push_back(Err(TransportError {
                message: "operation timed out".to_string(),
                timed_out: true,
            }));
        let err = client(&transport)
            .get::<Value, _>("tasks/1", &(), &Options::default())
            .expect_err("must fail");
        assert!(err.is_retryable());
        assert!(matches!(
            err,
            ApiError::Transport {
                method: Method::Get,
                timed_out: true,
                ..
            }
        ));
    }

    #[test]
    fn payload_shape_mismatch_is_decode_error() {
        let transport = ScriptedTransport::default();
        transport.push(200, json!({"data": {"gid": "1"}}));
        let err = client(&transport)
            .get::<Vec<Value>, _>("tasks", &(), &Options::default())
            .expect_err("must fail");
        assert!(matches!(err, ApiError::Decode { status: 200, .. }));
        assert!(!err.is_retryable());
    }

    #[test]
    fn pagination_fetches_every_page_in_order() {
        let transport = ScriptedTransport::default();
        transport.push(200, page(json!([1, 2]), Some("p1")));
        transport.push(200, page(json!([3, 4]), Some("p2")));
        transport.push(200, page(json!([5]), None));

        let items: Vec<u32> = client(&transport)
            .get_all("tasks", &(), &Options::default(), 0)
            .expect("get_all");
        assert_eq!(items, vec![1, 2, 3, 4, 5]);

        let requests = transport.requests();
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[0].query_param("offset"), None);
        assert_eq!(requests[0].query_param("limit").as_deref(), Some("100"));
        assert_eq!(requests[1].query_param("offset").as_deref(), Some("p1"));
        assert_eq!(requests[2].query_param("offset").as_deref(), Some("p2"));
    }

    #[test]
    fn pagination_stops_on_empty_offset() {
        let transport = ScriptedTransport::default();
        transport.push(200, page(json!(["a"]), Some("")));
        let items: Vec<String> = client(&transport)
            .get_all("tags", &(), &Options::default(), 0)
            .expect("get_all");
        assert_eq!(items, vec!["a"]);
        assert_eq!(transport.requests().len(), 1);
    }

    #[test]
    fn pagination_truncates_to_limit_exactly() {
        let transport = ScriptedTransport::default();
        transport.push(200, page(json!([1, 2, 3]), Some("p1")));
        transport.push(200, page(json!([4, 5, 6]), Some("p2")));

        let items: Vec<u32> = client(&transport)
            .get_all("tasks", &(), &Options::default().with_limit(3), 5)
            .expect("get_all");
        assert_eq!(items, vec![1, 2, 3, 4, 5]);
        assert_eq!(transport.requests().len(), 2);
    }

    #[test]
    fn pagination_uses_limit_as_page_size_when_small() {
        let transport = ScriptedTransport::default();
        transport.push(200, page(json!([1, 2]), Some("p1")));
        let items: Vec<u32> = client(&transport)
            .get_all("tasks", &(), &Options::default(), 2)
            .expect("get_all");
        assert_eq!(items, vec![1, 2]);
        assert_eq!(
            transport.requests()[0].query_param("limit").as_deref(),
            Some("2")
        );
    }

    #[test]
    fn pagination_offset_is_round_tripped_verbatim() {
        let offset = "eyJ0eXAiOiJKV1QiLCJhbGciOiJIUzI1NiJ9+/==";
        let transport = ScriptedTransport::default();
        transport.push(200, page(json!([1]), Some(offset)));
        transport.push(200, page(json!([2]), None));
        let _: Vec<u32> = client(&transport)
            .get_all("tasks", &(), &Options::default(), 0)
            .expect("get_all");
        assert_eq!(
            transport.requests()[1].query_param("offset").as_deref(),
            Some(offset)
        );
    }

    #[test]
    fn repeated_offset_is_a_pagination_error() {
        let transport = ScriptedTransport::default();
        transport.push(200, page(json!([1]), Some("same")));
        transport.push(200, page(json!([2]), Some("same")));
        let err = client(&transport)
            .get_all::<u32, _>("tasks", &(), &Options::default(), 0)
            .expect_err("must fail");
        assert!(matches!(err, ApiError::PaginationLoop { offset } if offset == "same"));
        assert_eq!(transport.requests().len(), 2);
    }

    #[test]
    fn write_wraps_body_in_data_envelope() {
        let transport = ScriptedTransport::default();
        transport.push(201, json!({"data": {"gid": "77", "name": "Ship it"}}));
        let created: Value = client(&transport)
            .post(
                "tasks",
                &json!({"name": "Ship it"}),
                &Options::fields(["name"]),
            )
            .expect("post");
        assert_eq!(created["gid"], "77");

        let request = &transport.requests()[0];
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.header("content-type"), Some("application/json"));
        assert_eq!(request.url.query(), None);
        let body: Value =
            serde_json::from_slice(request.body.as_deref().expect("body")).expect("json");
        assert_eq!(
            body,
            json!({"data": {"name": "Ship it"}, "options": {"fields": ["name"]}})
        );
    }

    #[test]
    fn delete_sends_no_body_and_options_as_query() {
        let transport = ScriptedTransport::default();
        transport.push(200, json!({"data": {}}));
        client(&transport)
            .delete("time_tracking_entries/9", &Options::default().with_limit(1))
            .expect("delete");
        let request = &transport.requests()[0];
        assert_eq!(request.method, Method::Delete);
        assert!(request.body.is_none());
        assert_eq!(request.header("content-type"), None);
        assert_eq!(request.query_param("limit").as_deref(), Some("1"));
    }

    #[test]
    fn default_options_fill_unset_request_options() {
        let transport = ScriptedTransport::default();
        transport.push(200, json!({"data": {"gid": "1"}}));
        let client = client(&transport).with_default_options(Options {
            pretty: true,
            enable: vec![crate::Feature::new_sections()],
            ..Options::default()
        });
        let _: Page<Value> = client
            .get("projects/1", &(), &Options::default())
            .expect("get");
        let request = &transport.requests()[0];
        assert_eq!(request.query_param("opt_pretty").as_deref(), Some("true"));
        assert_eq!(request.header("asana-enable"), Some("new_sections"));
        assert_eq!(request.header("authorization"), Some("Bearer secret-token"));
    }

    #[test]
    fn query_structs_flatten_into_pairs() {
        #[derive(Serialize)]
        struct Query {
            assignee: Option<String>,
            workspace: &'static str,
            #[serde(rename = "tags.all")]
            tags: Vec<&'static str>,
            is_blocked: bool,
            limit_hint: Option<u32>,
        }
        let mut pairs = query_pairs(&Query {
            assignee: None,
            workspace: "123",
            tags: vec!["a", "b"],
            is_blocked: true,
            limit_hint: Some(5),
        })
        .expect("pairs");
        pairs.sort();
        assert_eq!(
            pairs,
            vec![
                ("is_blocked".to_string(), "true".to_string()),
                ("limit_hint".to_string(), "5".to_string()),
                ("tags.all".to_string(), "a,b".to_string()),
                ("workspace".to_string(), "123".to_string()),
            ]
        );
        assert!(query_pairs(&()).expect("unit").is_empty());
        assert!(query_pairs(&vec![1, 2]).is_err());
    }

    #[test]
    fn segments_reject_path_characters() {
        assert_eq!(segment(" 123 ").expect("ok"), "123");
        for bad in ["", "..", "%2e%2e", "%2E.", "1/2", "1?x", "1#x"] {
            assert!(segment(bad).is_err(), "{bad}");
        }
    }
}
