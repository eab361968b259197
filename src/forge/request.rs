use reqwest::{Method, StatusCode};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
/// JSON request relative to the platform API root.
///
/// Path segments and query pairs are kept unencoded; the transport encodes
/// each one when building the URL, so names containing `#`, `?` or `%` stay
/// inside their own segment.
pub struct ApiRequest {
    pub method: Method,
    pub segments: Vec<String>,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    fn new<I, S>(method: Method, segments: I, body: Option<Value>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            method,
            segments: segments.into_iter().map(Into::into).collect(),
            query: vec![],
            body,
        }
    }

    pub fn get<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Method::GET, segments, None)
    }

    pub fn post<I, S>(segments: I, body: Value) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Method::POST, segments, Some(body))
    }

    pub fn with_query(
        mut self,
        key: impl Into<String>,
        value: impl ToString,
    ) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Unencoded `a/b/c?k=v` form, for logging and matching.
    pub fn path(&self) -> String {
        let path = self.segments.join("/");
        if self.query.is_empty() {
            return path;
        }

        let query = self
            .query
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<String>>()
            .join("&");

        format!("{path}?{query}")
    }
}

#[derive(Debug, Clone)]
/// Raw response as received from the platform, after body framing fixes.
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_joins_segments_and_query() {
        let req = ApiRequest::get(["repos", "acme", "widgets", "pulls"])
            .with_query("state", "open")
            .with_query("page", 2);

        assert_eq!(req.method, Method::GET);
        assert_eq!(req.path(), "repos/acme/widgets/pulls?state=open&page=2");
    }

    #[test]
    fn segments_keep_reserved_characters_intact() {
        let req = ApiRequest::get(["repos", "acme", "widgets", "branches", "fix#2"]);

        assert_eq!(req.segments.last().map(String::as_str), Some("fix#2"));
        assert!(req.query.is_empty());
    }
}
