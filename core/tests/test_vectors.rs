//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses,
//! and expected parse results. Comparing parsed JSON (not raw strings) avoids
//! false negatives from field-ordering differences.

use serde::Serialize;
use todo_core::{
    ApiError, BackendClient, FindOptions, HttpMethod, HttpRequest, HttpResponse, NewTodo,
    TodoFilter, TodoUpdate, UpdateOptions, UserHandle,
};

const BASE_URL: &str = "http://localhost:3000";

fn client() -> BackendClient {
    BackendClient::new(BASE_URL, "items")
}

fn load(raw: &str) -> Vec<serde_json::Value> {
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();
    vectors["cases"].as_array().unwrap().clone()
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "POST" => HttpMethod::Post,
        other => panic!("unknown method: {other}"),
    }
}

fn assert_request(name: &str, req: &HttpRequest, expected: &serde_json::Value) {
    let method = parse_method(expected["method"].as_str().unwrap());
    assert_eq!(req.method, method, "{name}: method");
    let path = format!("{BASE_URL}{}", expected["path"].as_str().unwrap());
    assert_eq!(req.path, path, "{name}: path");

    let expected_headers: Vec<(String, String)> = expected["headers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|h| {
            let arr = h.as_array().unwrap();
            (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
        })
        .collect();
    assert_eq!(req.headers, expected_headers, "{name}: headers");

    match req.body.as_deref() {
        Some(body) => {
            let body: serde_json::Value = serde_json::from_str(body).unwrap();
            assert_eq!(body, expected["body"], "{name}: body");
        }
        None => assert!(expected["body"].is_null(), "{name}: request has no body"),
    }
}

fn simulated(case: &serde_json::Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse {
        status: sim["status"].as_u64().unwrap() as u16,
        headers: Vec::new(),
        body: sim["body"].as_str().unwrap().to_string(),
    }
}

/// Check a parse result against `expected_result` or `expected_error`.
fn assert_outcome<T: Serialize>(name: &str, case: &serde_json::Value, result: Result<T, ApiError>) {
    if let Some(expected_error) = case.get("expected_error") {
        let err = match result {
            Ok(_) => panic!("{name}: expected an error"),
            Err(err) => err,
        };
        match expected_error.as_str().unwrap() {
            "NotFound" => assert!(matches!(err, ApiError::NotFound), "{name}: expected NotFound"),
            "HttpError" => assert!(
                matches!(err, ApiError::HttpError { .. }),
                "{name}: expected HttpError"
            ),
            other => panic!("{name}: unknown expected_error: {other}"),
        }
    } else {
        let value = serde_json::to_value(result.unwrap()).unwrap();
        assert_eq!(value, case["expected_result"], "{name}: parsed result");
    }
}

// ---------------------------------------------------------------------------
// Find
// ---------------------------------------------------------------------------

#[test]
fn find_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/find.json")) {
        let name = case["name"].as_str().unwrap();
        let filter: TodoFilter = serde_json::from_value(case["input"]["filter"].clone()).unwrap();
        let options = FindOptions {
            limit: case["input"]["limit"].as_u64().unwrap() as u32,
        };

        let req = c.build_find(&filter, &options).unwrap();
        assert_request(name, &req, &case["expected_request"]);
        assert_outcome(name, &case, c.parse_find(simulated(&case)));
    }
}

// ---------------------------------------------------------------------------
// Insert
// ---------------------------------------------------------------------------

#[test]
fn insert_one_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/insert_one.json")) {
        let name = case["name"].as_str().unwrap();
        let document: NewTodo = serde_json::from_value(case["input"].clone()).unwrap();

        let req = c.build_insert_one(&document).unwrap();
        assert_request(name, &req, &case["expected_request"]);
        assert_outcome(name, &case, c.parse_insert_one(simulated(&case)));
    }
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[test]
fn update_one_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/update_one.json")) {
        let name = case["name"].as_str().unwrap();
        let input = &case["input"];
        let filter: TodoFilter = serde_json::from_value(input["filter"].clone()).unwrap();
        let update: TodoUpdate = serde_json::from_value(input["update"].clone()).unwrap();
        let options: UpdateOptions = serde_json::from_value(input["options"].clone()).unwrap();

        let req = c.build_update_one(&filter, &update, &options).unwrap();
        assert_request(name, &req, &case["expected_request"]);
        assert_outcome(name, &case, c.parse_update_one(simulated(&case)));
    }
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[test]
fn delete_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/delete.json")) {
        let name = case["name"].as_str().unwrap();
        let filter: TodoFilter = serde_json::from_value(case["input"]["filter"].clone()).unwrap();

        match case["operation"].as_str().unwrap() {
            "deleteOne" => {
                let req = c.build_delete_one(&filter).unwrap();
                assert_request(name, &req, &case["expected_request"]);
                assert_outcome(name, &case, c.parse_delete_one(simulated(&case)));
            }
            "deleteMany" => {
                let req = c.build_delete_many(&filter).unwrap();
                assert_request(name, &req, &case["expected_request"]);
                assert_outcome(name, &case, c.parse_delete_many(simulated(&case)));
            }
            other => panic!("{name}: unknown operation: {other}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[test]
fn auth_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/auth.json")) {
        let name = case["name"].as_str().unwrap();

        match case["operation"].as_str().unwrap() {
            "login" => {
                let req = c.build_login_anonymous();
                assert_request(name, &req, &case["expected_request"]);
                assert_outcome(name, &case, c.parse_login_anonymous(simulated(&case)));
            }
            "logout" => {
                let user: UserHandle = serde_json::from_value(case["input"].clone()).unwrap();
                let req = c.build_logout(&user).unwrap();
                assert_request(name, &req, &case["expected_request"]);
                assert_outcome(name, &case, c.parse_logout(simulated(&case)));
            }
            other => panic!("{name}: unknown operation: {other}"),
        }
    }
}
