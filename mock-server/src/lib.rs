use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "_id")]
    pub id: String,
    pub text: String,
    pub owner_id: String,
    pub checked: bool,
}

#[derive(Deserialize)]
pub struct NewDocument {
    pub text: String,
    pub owner_id: String,
    #[serde(default)]
    pub checked: bool,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Filter {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub checked: Option<bool>,
}

impl Filter {
    pub fn matches(&self, doc: &Document) -> bool {
        self.id.as_ref().is_none_or(|id| *id == doc.id)
            && self.owner_id.as_ref().is_none_or(|owner| *owner == doc.owner_id)
            && self.checked.is_none_or(|checked| checked == doc.checked)
    }
}

#[derive(Deserialize)]
pub struct FindRequest {
    #[serde(default)]
    pub filter: Filter,
    pub limit: Option<usize>,
}

#[derive(Deserialize)]
pub struct InsertOneRequest {
    pub document: NewDocument,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SetFields {
    pub checked: Option<bool>,
}

#[derive(Deserialize)]
pub struct Update {
    #[serde(rename = "$set")]
    pub set: SetFields,
}

#[derive(Deserialize)]
pub struct UpdateOneRequest {
    #[serde(default)]
    pub filter: Filter,
    pub update: Update,
}

#[derive(Deserialize)]
pub struct DeleteRequest {
    #[serde(default)]
    pub filter: Filter,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertOneResponse {
    pub inserted_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResponse {
    pub matched_count: u64,
    pub modified_count: u64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResponse {
    pub deleted_count: u64,
}

/// Collections keep documents in insertion order so `find` returns them the
/// way they were added.
#[derive(Clone, Default)]
pub struct Db {
    sessions: Arc<RwLock<HashSet<String>>>,
    collections: Arc<RwLock<HashMap<String, Vec<Document>>>>,
}

pub fn app() -> Router {
    Router::new()
        .route("/auth/providers/anon-user/login", post(login_anonymous))
        .route("/auth/session/logout", post(logout))
        .route("/collections/{name}/find", post(find))
        .route("/collections/{name}/insertOne", post(insert_one))
        .route("/collections/{name}/updateOne", post(update_one))
        .route("/collections/{name}/deleteOne", post(delete_one))
        .route("/collections/{name}/deleteMany", post(delete_many))
        .with_state(Db::default())
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn login_anonymous(State(db): State<Db>) -> Json<User> {
    let user = User {
        id: Uuid::new_v4().to_string(),
    };
    db.sessions.write().await.insert(user.id.clone());
    tracing::info!(user_id = %user.id, "anonymous login");
    Json(user)
}

async fn logout(State(db): State<Db>, Json(user): Json<User>) -> Result<Json<User>, StatusCode> {
    if db.sessions.write().await.remove(&user.id) {
        tracing::info!(user_id = %user.id, "logout");
        Ok(Json(user))
    } else {
        tracing::debug!(user_id = %user.id, "logout for unknown session");
        Err(StatusCode::NOT_FOUND)
    }
}

async fn find(
    State(db): State<Db>,
    Path(name): Path<String>,
    Json(input): Json<FindRequest>,
) -> Json<Vec<Document>> {
    let collections = db.collections.read().await;
    let docs: Vec<Document> = collections
        .get(&name)
        .map(|docs| {
            docs.iter()
                .filter(|doc| input.filter.matches(doc))
                .take(input.limit.unwrap_or(usize::MAX))
                .cloned()
                .collect()
        })
        .unwrap_or_default();
    tracing::debug!(collection = %name, count = docs.len(), "find");
    Json(docs)
}

async fn insert_one(
    State(db): State<Db>,
    Path(name): Path<String>,
    Json(input): Json<InsertOneRequest>,
) -> (StatusCode, Json<InsertOneResponse>) {
    let doc = Document {
        id: Uuid::new_v4().to_string(),
        text: input.document.text,
        owner_id: input.document.owner_id,
        checked: input.document.checked,
    };
    let inserted_id = doc.id.clone();
    db.collections
        .write()
        .await
        .entry(name.clone())
        .or_default()
        .push(doc);
    tracing::debug!(collection = %name, id = %inserted_id, "insertOne");
    (StatusCode::CREATED, Json(InsertOneResponse { inserted_id }))
}

async fn update_one(
    State(db): State<Db>,
    Path(name): Path<String>,
    Json(input): Json<UpdateOneRequest>,
) -> Json<UpdateResponse> {
    let mut collections = db.collections.write().await;
    let target = collections
        .get_mut(&name)
        .and_then(|docs| docs.iter_mut().find(|doc| input.filter.matches(doc)));
    let Some(doc) = target else {
        tracing::debug!(collection = %name, "updateOne matched nothing");
        return Json(UpdateResponse {
            matched_count: 0,
            modified_count: 0,
        });
    };
    let mut modified_count = 0;
    if let Some(checked) = input.update.set.checked {
        if doc.checked != checked {
            doc.checked = checked;
            modified_count = 1;
        }
    }
    tracing::debug!(collection = %name, id = %doc.id, modified_count, "updateOne");
    Json(UpdateResponse {
        matched_count: 1,
        modified_count,
    })
}

async fn delete_one(
    State(db): State<Db>,
    Path(name): Path<String>,
    Json(input): Json<DeleteRequest>,
) -> Json<DeleteResponse> {
    let mut collections = db.collections.write().await;
    let mut deleted_count = 0;
    if let Some(docs) = collections.get_mut(&name) {
        if let Some(pos) = docs.iter().position(|doc| input.filter.matches(doc)) {
            docs.remove(pos);
            deleted_count = 1;
        }
    }
    tracing::debug!(collection = %name, deleted_count, "deleteOne");
    Json(DeleteResponse { deleted_count })
}

async fn delete_many(
    State(db): State<Db>,
    Path(name): Path<String>,
    Json(input): Json<DeleteRequest>,
) -> Json<DeleteResponse> {
    let mut collections = db.collections.write().await;
    let mut deleted_count = 0;
    if let Some(docs) = collections.get_mut(&name) {
        let before = docs.len();
        docs.retain(|doc| !input.filter.matches(doc));
        deleted_count = (before - docs.len()) as u64;
    }
    tracing::debug!(collection = %name, deleted_count, "deleteMany");
    Json(DeleteResponse { deleted_count })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: &str, owner: &str, checked: bool) -> Document {
        Document {
            id: id.to_string(),
            text: "t".to_string(),
            owner_id: owner.to_string(),
            checked,
        }
    }

    #[test]
    fn document_serializes_with_underscore_id() {
        let json = serde_json::to_value(doc("1", "u1", false)).unwrap();
        assert_eq!(json["_id"], "1");
        assert_eq!(json["owner_id"], "u1");
        assert_eq!(json["checked"], false);
    }

    #[test]
    fn new_document_defaults_checked_to_false() {
        let input: NewDocument =
            serde_json::from_str(r#"{"text":"No checked field","owner_id":"u1"}"#).unwrap();
        assert!(!input.checked);
    }

    #[test]
    fn new_document_rejects_missing_text() {
        let result: Result<NewDocument, _> = serde_json::from_str(r#"{"owner_id":"u1"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn empty_filter_matches_everything() {
        let filter: Filter = serde_json::from_str("{}").unwrap();
        assert!(filter.matches(&doc("1", "u1", true)));
        assert!(filter.matches(&doc("2", "u2", false)));
    }

    #[test]
    fn filter_combines_fields() {
        let filter: Filter =
            serde_json::from_str(r#"{"owner_id":"u1","checked":true}"#).unwrap();
        assert!(filter.matches(&doc("1", "u1", true)));
        assert!(!filter.matches(&doc("2", "u1", false)));
        assert!(!filter.matches(&doc("3", "u2", true)));
    }

    #[test]
    fn filter_rejects_unknown_fields() {
        let result: Result<Filter, _> = serde_json::from_str(r#"{"status":true}"#);
        assert!(result.is_err());
    }

    #[test]
    fn update_reads_set_document() {
        let update: Update = serde_json::from_str(r#"{"$set":{"checked":true}}"#).unwrap();
        assert_eq!(update.set.checked, Some(true));
    }

    #[test]
    fn update_rejects_immutable_fields() {
        let result: Result<Update, _> = serde_json::from_str(r#"{"$set":{"text":"new"}}"#);
        assert!(result.is_err());
    }
}
