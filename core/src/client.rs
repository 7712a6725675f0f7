//! Stateless HTTP request builder and response parser for the backend API.
//!
//! # Design
//! `BackendClient` holds only a `base_url` and the collection name, and
//! carries no mutable state between calls. Each backend operation is split
//! into a `build_*` method that produces an `HttpRequest` and a `parse_*`
//! method that consumes an `HttpResponse`. The caller executes the actual
//! HTTP round-trip, keeping this module deterministic and free of I/O.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{
    DeleteResult, FindOptions, InsertOneResult, NewTodo, TodoFilter, TodoItem, TodoUpdate,
    UpdateOptions, UpdateResult, UserHandle,
};

#[derive(Serialize)]
struct FindBody<'a> {
    filter: &'a TodoFilter,
    limit: u32,
}

#[derive(Serialize)]
struct InsertOneBody<'a> {
    document: &'a NewTodo,
}

#[derive(Serialize)]
struct UpdateOneBody<'a> {
    filter: &'a TodoFilter,
    update: &'a TodoUpdate,
    options: &'a UpdateOptions,
}

#[derive(Serialize)]
struct DeleteBody<'a> {
    filter: &'a TodoFilter,
}

/// Synchronous, stateless client for the backend API.
#[derive(Debug, Clone)]
pub struct BackendClient {
    base_url: String,
    collection: String,
}

impl BackendClient {
    pub fn new(base_url: &str, collection: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            collection: collection.to_string(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(&config.base_url, &config.collection)
    }

    // -----------------------------------------------------------------------
    // Auth
    // -----------------------------------------------------------------------

    pub fn build_login_anonymous(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}/auth/providers/anon-user/login", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_logout(&self, user: &UserHandle) -> Result<HttpRequest, ApiError> {
        self.json_request(format!("{}/auth/session/logout", self.base_url), user)
    }

    pub fn parse_login_anonymous(&self, response: HttpResponse) -> Result<UserHandle, ApiError> {
        check_status(&response, 200)?;
        parse_body(&response)
    }

    pub fn parse_logout(&self, response: HttpResponse) -> Result<UserHandle, ApiError> {
        check_status(&response, 200)?;
        parse_body(&response)
    }

    // -----------------------------------------------------------------------
    // Collection
    // -----------------------------------------------------------------------

    pub fn build_find(
        &self,
        filter: &TodoFilter,
        options: &FindOptions,
    ) -> Result<HttpRequest, ApiError> {
        let body = FindBody {
            filter,
            limit: options.limit,
        };
        self.json_request(self.collection_path("find"), &body)
    }

    pub fn build_insert_one(&self, document: &NewTodo) -> Result<HttpRequest, ApiError> {
        self.json_request(self.collection_path("insertOne"), &InsertOneBody { document })
    }

    pub fn build_update_one(
        &self,
        filter: &TodoFilter,
        update: &TodoUpdate,
        options: &UpdateOptions,
    ) -> Result<HttpRequest, ApiError> {
        let body = UpdateOneBody {
            filter,
            update,
            options,
        };
        self.json_request(self.collection_path("updateOne"), &body)
    }

    pub fn build_delete_one(&self, filter: &TodoFilter) -> Result<HttpRequest, ApiError> {
        self.json_request(self.collection_path("deleteOne"), &DeleteBody { filter })
    }

    pub fn build_delete_many(&self, filter: &TodoFilter) -> Result<HttpRequest, ApiError> {
        self.json_request(self.collection_path("deleteMany"), &DeleteBody { filter })
    }

    pub fn parse_find(&self, response: HttpResponse) -> Result<Vec<TodoItem>, ApiError> {
        check_status(&response, 200)?;
        parse_body(&response)
    }

    pub fn parse_insert_one(&self, response: HttpResponse) -> Result<InsertOneResult, ApiError> {
        check_status(&response, 201)?;
        parse_body(&response)
    }

    pub fn parse_update_one(&self, response: HttpResponse) -> Result<UpdateResult, ApiError> {
        check_status(&response, 200)?;
        parse_body(&response)
    }

    pub fn parse_delete_one(&self, response: HttpResponse) -> Result<DeleteResult, ApiError> {
        check_status(&response, 200)?;
        parse_body(&response)
    }

    pub fn parse_delete_many(&self, response: HttpResponse) -> Result<DeleteResult, ApiError> {
        check_status(&response, 200)?;
        parse_body(&response)
    }

    fn collection_path(&self, operation: &str) -> String {
        format!("{}/collections/{}/{operation}", self.base_url, self.collection)
    }

    fn json_request<B: Serialize>(&self, path: String, body: &B) -> Result<HttpRequest, ApiError> {
        let body =
            serde_json::to_string(body).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path,
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }
}

/// Map unexpected status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse, expected: u16) -> Result<(), ApiError> {
    if response.status == expected {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}

fn parse_body<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ApiError> {
    serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{TodoId, UserId};

    fn client() -> BackendClient {
        BackendClient::new("http://localhost:3000", "items")
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    fn body_json(req: &HttpRequest) -> serde_json::Value {
        serde_json::from_str(req.body.as_deref().unwrap()).unwrap()
    }

    #[test]
    fn build_login_anonymous_has_no_body() {
        let req = client().build_login_anonymous();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:3000/auth/providers/anon-user/login");
        assert!(req.body.is_none());
        assert!(req.headers.is_empty());
    }

    #[test]
    fn build_logout_sends_user_handle() {
        let user = UserHandle {
            id: UserId::new("u1"),
        };
        let req = client().build_logout(&user).unwrap();
        assert_eq!(req.path, "http://localhost:3000/auth/session/logout");
        assert_eq!(body_json(&req), serde_json::json!({"id": "u1"}));
    }

    #[test]
    fn build_find_carries_filter_and_limit() {
        let filter = TodoFilter::owned_by("u1".into());
        let req = client().build_find(&filter, &FindOptions::default()).unwrap();
        assert_eq!(req.path, "http://localhost:3000/collections/items/find");
        assert_eq!(
            req.headers,
            vec![("content-type".to_string(), "application/json".to_string())]
        );
        assert_eq!(
            body_json(&req),
            serde_json::json!({"filter": {"owner_id": "u1"}, "limit": 1000})
        );
    }

    #[test]
    fn build_insert_one_wraps_document() {
        let doc = NewTodo::new("buy milk", "u1".into());
        let req = client().build_insert_one(&doc).unwrap();
        assert_eq!(req.path, "http://localhost:3000/collections/items/insertOne");
        let body = body_json(&req);
        assert_eq!(body["document"]["text"], "buy milk");
        assert_eq!(body["document"]["owner_id"], "u1");
        assert_eq!(body["document"]["checked"], false);
    }

    #[test]
    fn build_update_one_sets_checked() {
        let req = client()
            .build_update_one(
                &TodoFilter::by_id(TodoId::new("1")),
                &TodoUpdate::set_checked(true),
                &UpdateOptions {
                    return_new_document: true,
                },
            )
            .unwrap();
        assert_eq!(req.path, "http://localhost:3000/collections/items/updateOne");
        assert_eq!(
            body_json(&req),
            serde_json::json!({
                "filter": {"_id": "1"},
                "update": {"$set": {"checked": true}},
                "options": {"returnNewDocument": true}
            })
        );
    }

    #[test]
    fn build_delete_many_with_empty_filter() {
        let req = client().build_delete_many(&TodoFilter::default()).unwrap();
        assert_eq!(req.path, "http://localhost:3000/collections/items/deleteMany");
        assert_eq!(body_json(&req), serde_json::json!({"filter": {}}));
    }

    #[test]
    fn parse_find_success() {
        let todos = client()
            .parse_find(response(
                200,
                r#"[{"_id":"1","text":"Test","owner_id":"u1","checked":false}]"#,
            ))
            .unwrap();
        assert_eq!(todos.len(), 1);
        assert_eq!(todos[0].text, "Test");
    }

    #[test]
    fn parse_find_bad_json() {
        let err = client().parse_find(response(200, "not json")).unwrap_err();
        assert!(matches!(err, ApiError::DeserializationError(_)));
    }

    #[test]
    fn parse_insert_one_success() {
        let result = client()
            .parse_insert_one(response(201, r#"{"insertedId":"abc"}"#))
            .unwrap();
        assert_eq!(result.inserted_id.as_str(), "abc");
    }

    #[test]
    fn parse_insert_one_wrong_status() {
        let err = client()
            .parse_insert_one(response(500, "internal error"))
            .unwrap_err();
        assert!(matches!(err, ApiError::HttpError { status: 500, .. }));
    }

    #[test]
    fn parse_logout_unknown_session_is_not_found() {
        let err = client().parse_logout(response(404, "")).unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[test]
    fn parse_delete_many_reads_count() {
        let result = client()
            .parse_delete_many(response(200, r#"{"deletedCount":3}"#))
            .unwrap();
        assert_eq!(result.deleted_count, 3);
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = BackendClient::new("http://localhost:3000/", "items");
        let req = client.build_login_anonymous();
        assert_eq!(req.path, "http://localhost:3000/auth/providers/anon-user/login");
    }
}
