//! Stateless HTTP request builder and response parser for the customer API.
//!
//! # Design
//! `CustomerClient` holds only a `base_url` and carries no mutable state
//! between calls. Each operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. The caller executes the actual HTTP round-trip, keeping the
//! core deterministic and free of I/O dependencies.

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Customer, CustomerId, CustomerInput, DeleteAck, SearchQuery};

/// Synchronous, stateless client for the customer API.
///
/// Builds `HttpRequest` values and parses `HttpResponse` values without
/// touching the network. The caller is responsible for executing the HTTP
/// round-trip between `build_*` and `parse_*`.
#[derive(Debug, Clone)]
pub struct CustomerClient {
    base_url: String,
}

impl CustomerClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_create(&self, input: &CustomerInput) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(input).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}/customers", self.base_url),
            headers: json_headers(),
            body: Some(body),
        })
    }

    pub fn build_update(&self, id: &CustomerId, input: &CustomerInput) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(input).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Put,
            path: self.instance_path(id),
            headers: json_headers(),
            body: Some(body),
        })
    }

    pub fn build_retrieve(&self, id: &CustomerId) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: self.instance_path(id),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_delete(&self, id: &CustomerId) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            path: self.instance_path(id),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Only non-empty filters become query parameters; with none the request
    /// is a plain collection listing.
    pub fn build_search(&self, query: &SearchQuery) -> HttpRequest {
        let params: Vec<String> = [("firstname", &query.firstname), ("lastname", &query.lastname)]
            .into_iter()
            .filter_map(|(key, value)| value.as_deref().map(|v| format!("{key}={}", encode_component(v))))
            .collect();

        let mut path = format!("{}/customers", self.base_url);
        if !params.is_empty() {
            path.push('?');
            path.push_str(&params.join("&"));
        }

        HttpRequest {
            method: HttpMethod::Get,
            path,
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn parse_create(&self, response: HttpResponse) -> Result<Customer, ApiError> {
        check_status(&response)?;
        parse_body(&response)
    }

    pub fn parse_update(&self, response: HttpResponse) -> Result<Customer, ApiError> {
        check_status(&response)?;
        parse_body(&response)
    }

    pub fn parse_retrieve(&self, response: HttpResponse) -> Result<Customer, ApiError> {
        check_status(&response)?;
        parse_body(&response)
    }

    /// An empty body (e.g. 204) acknowledges without an id.
    pub fn parse_delete(&self, response: HttpResponse) -> Result<DeleteAck, ApiError> {
        check_status(&response)?;
        if response.body.trim().is_empty() {
            return Ok(DeleteAck::default());
        }
        parse_body(&response)
    }

    pub fn parse_search(&self, response: HttpResponse) -> Result<Vec<Customer>, ApiError> {
        check_status(&response)?;
        parse_body(&response)
    }

    fn instance_path(&self, id: &CustomerId) -> String {
        format!("{}/customers/{}", self.base_url, encode_component(id.as_str()))
    }
}

fn json_headers() -> Vec<(String, String)> {
    vec![("content-type".to_string(), "application/json".to_string())]
}

fn parse_body<T: serde::de::DeserializeOwned>(response: &HttpResponse) -> Result<T, ApiError> {
    serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// Map non-2xx statuses to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::from_response(response))
}

/// Percent-encode a path segment or query value (RFC 3986 unreserved set).
fn encode_component(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for b in input.as_bytes() {
        match *b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => out.push(*b as char),
            _ => out.push_str(&format!("%{:02X}", b)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> CustomerClient {
        CustomerClient::new("http://localhost:3000")
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    fn ann_lee() -> CustomerInput {
        CustomerInput {
            firstname: "Ann".to_string(),
            lastname: "Lee".to_string(),
        }
    }

    #[test]
    fn build_create_produces_correct_request() {
        let req = client().build_create(&ann_lee()).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:3000/customers");
        assert_eq!(
            req.headers,
            vec![("content-type".to_string(), "application/json".to_string())]
        );
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, serde_json::json!({"firstname": "Ann", "lastname": "Lee"}));
    }

    #[test]
    fn build_create_sends_empty_names() {
        let input = CustomerInput {
            firstname: String::new(),
            lastname: String::new(),
        };
        let req = client().build_create(&input).unwrap();
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["firstname"], "");
        assert_eq!(body["lastname"], "");
    }

    #[test]
    fn build_update_targets_instance_path() {
        let req = client().build_update(&CustomerId::from(7), &ann_lee()).unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.path, "http://localhost:3000/customers/7");
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert!(body.get("customer_id").is_none());
        assert!(body.get("id").is_none());
    }

    #[test]
    fn build_retrieve_and_delete_have_no_body() {
        let id = CustomerId::from(3);
        let get = client().build_retrieve(&id);
        assert_eq!(get.method, HttpMethod::Get);
        assert_eq!(get.path, "http://localhost:3000/customers/3");
        assert!(get.body.is_none());
        assert!(get.headers.is_empty());

        let delete = client().build_delete(&id);
        assert_eq!(delete.method, HttpMethod::Delete);
        assert_eq!(delete.path, "http://localhost:3000/customers/3");
        assert!(delete.body.is_none());
    }

    #[test]
    fn id_cannot_escape_the_instance_path() {
        let req = client().build_retrieve(&CustomerId::from("1/../admin?x=1"));
        assert_eq!(req.path, "http://localhost:3000/customers/1%2F..%2Fadmin%3Fx%3D1");
    }

    #[test]
    fn build_search_without_filters_has_no_query() {
        let req = client().build_search(&SearchQuery::from_fields("", ""));
        assert_eq!(req.path, "http://localhost:3000/customers");
        assert!(req.body.is_none());
    }

    #[test]
    fn build_search_with_one_filter() {
        let req = client().build_search(&SearchQuery::from_fields("Ann", ""));
        assert_eq!(req.path, "http://localhost:3000/customers?firstname=Ann");
        let req = client().build_search(&SearchQuery::from_fields("", "Lee"));
        assert_eq!(req.path, "http://localhost:3000/customers?lastname=Lee");
    }

    #[test]
    fn build_search_with_both_filters() {
        let req = client().build_search(&SearchQuery::from_fields("Ann", "Lee"));
        assert_eq!(req.path, "http://localhost:3000/customers?firstname=Ann&lastname=Lee");
    }

    #[test]
    fn build_search_encodes_values() {
        let req = client().build_search(&SearchQuery::from_fields("Mary Ann", "O&Lee"));
        assert_eq!(
            req.path,
            "http://localhost:3000/customers?firstname=Mary%20Ann&lastname=O%26Lee"
        );
    }

    #[test]
    fn parse_create_success() {
        let customer = client()
            .parse_create(response(201, r#"{"id":7,"firstname":"Ann","lastname":"Lee"}"#))
            .unwrap();
        assert_eq!(customer.id.as_str(), "7");
        assert_eq!(customer.full_name(), "Ann Lee");
    }

    #[test]
    fn parse_create_wrong_status() {
        let err = client()
            .parse_create(response(400, r#"{"status":400,"message":"Invalid Customer: missing lastname"}"#))
            .unwrap_err();
        assert!(matches!(err, ApiError::HttpError { status: 400, .. }));
        assert_eq!(err.server_message(), Some("Invalid Customer: missing lastname"));
    }

    #[test]
    fn any_2xx_is_accepted() {
        let customer = client()
            .parse_update(response(202, r#"{"id":7,"firstname":"Ann","lastname":"Lee"}"#))
            .unwrap();
        assert_eq!(customer.full_name(), "Ann Lee");
        let ack = client().parse_delete(response(202, "")).unwrap();
        assert!(ack.id.is_none());
    }

    #[test]
    fn redirect_is_a_failure() {
        let err = client().parse_retrieve(response(302, "")).unwrap_err();
        assert!(matches!(err, ApiError::HttpError { status: 302, .. }));
    }

    #[test]
    fn parse_retrieve_not_found() {
        let err = client().parse_retrieve(response(404, "")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn parse_update_bad_json() {
        let err = client().parse_update(response(200, "not json")).unwrap_err();
        assert!(matches!(err, ApiError::DeserializationError(_)));
    }

    #[test]
    fn parse_delete_with_and_without_echo() {
        let ack = client().parse_delete(response(200, r#"{"id":5}"#)).unwrap();
        assert_eq!(ack.id, Some(CustomerId::from(5)));
        let ack = client().parse_delete(response(204, "")).unwrap();
        assert!(ack.id.is_none());
    }

    #[test]
    fn parse_search_keeps_server_order() {
        let customers = client()
            .parse_search(response(
                200,
                r#"[{"id":2,"firstname":"B","lastname":"X"},{"id":1,"firstname":"A","lastname":"Y"}]"#,
            ))
            .unwrap();
        let ids: Vec<&str> = customers.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["2", "1"]);
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = CustomerClient::new("http://localhost:3000/");
        let req = client.build_search(&SearchQuery::default());
        assert_eq!(req.path, "http://localhost:3000/customers");
    }
}
