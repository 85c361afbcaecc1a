//! Request description for the pipeline

use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use super::errors::ApiError;

/// One call to the Skydropx API
///
/// Authenticated by default; token endpoint calls use [`ApiRequest::without_auth`].
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    method: Method,
    path: String,
    body: Option<Value>,
    query: Vec<(String, String)>,
    requires_auth: bool,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self { method, path: path.into(), body: None, query: Vec::new(), requires_auth: true }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Set the JSON body
    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Append query parameters
    #[must_use]
    pub fn query<K, V>(mut self, params: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.query.extend(params.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Skip token renewal and the `Authorization` header
    #[must_use]
    pub fn without_auth(mut self) -> Self {
        self.requires_auth = false;
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    pub fn query_params(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn requires_auth(&self) -> bool {
        self.requires_auth
    }
}

/// Serialize a caller payload into a JSON value
pub(crate) fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(ApiError::decode)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_defaults_to_authenticated() {
        let request = ApiRequest::get("/api/v1/shipments");
        assert!(request.requires_auth());
        assert_eq!(request.method(), &Method::GET);
        assert!(request.body().is_none());
        assert!(request.query_params().is_empty());
    }

    #[test]
    fn test_builder_chain() {
        let request = ApiRequest::post("/api/v1/oauth/token")
            .json(json!({"grant_type": "client_credentials"}))
            .query([("page", "2")])
            .without_auth();

        assert!(!request.requires_auth());
        assert_eq!(request.body(), Some(&json!({"grant_type": "client_credentials"})));
        assert_eq!(request.query_params(), &[("page".to_string(), "2".to_string())]);
    }
}
