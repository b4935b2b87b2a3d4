use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// User record as exposed over HTTP and persisted by the JSON file store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct User {
    /// Backend-assigned identifier (UUID for the file store, ObjectId hex for MongoDB)
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub email: String,
}

impl User {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            email: email.into(),
        }
    }

    /// Same record under another identifier
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }
}

/// Request body for POST/PUT. Unknown fields, `id` included, are ignored.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UserPayload {
    pub name: String,
    pub email: String,
}

impl From<UserPayload> for User {
    fn from(payload: UserPayload) -> Self {
        User::new(payload.name, payload.email)
    }
}

/// Document stored in the `users` collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub email: String,
}

impl From<&User> for UserDocument {
    fn from(user: &User) -> Self {
        UserDocument {
            id: None,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

impl From<UserDocument> for User {
    fn from(doc: UserDocument) -> Self {
        User {
            id: doc.id.map(|id| id.to_hex()).unwrap_or_default(),
            name: doc.name,
            email: doc.email,
        }
    }
}

/// Response for POST /users
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateUserResponse {
    pub message: String,
    pub user: User,
}

/// Response for PUT and DELETE /users/{id}
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_id_is_dropped() {
        let payload: UserPayload =
            serde_json::from_str(r#"{"id":"forged","name":"Ann","email":"ann@x.com"}"#).unwrap();
        let user = User::from(payload);
        assert_eq!(user.id, "");
        assert_eq!(user.name, "Ann");
    }

    #[test]
    fn payload_requires_name_and_email() {
        assert!(serde_json::from_str::<UserPayload>(r#"{"name":"Ann"}"#).is_err());
        assert!(serde_json::from_str::<UserPayload>(r#"{"email":"ann@x.com"}"#).is_err());
        assert!(serde_json::from_str::<UserPayload>(r#"{"name":1,"email":"ann@x.com"}"#).is_err());
    }

    #[test]
    fn document_id_becomes_hex() {
        let oid = ObjectId::new();
        let user = User::from(UserDocument {
            id: Some(oid),
            name: "Ann".into(),
            email: "ann@x.com".into(),
        });
        assert_eq!(user.id, oid.to_hex());
    }

    #[test]
    fn new_document_has_no_id_field() {
        let doc = mongodb::bson::to_document(&UserDocument::from(&User::new("Ann", "ann@x.com"))).unwrap();
        assert!(!doc.contains_key("_id"));
        assert_eq!(doc.get_str("email").unwrap(), "ann@x.com");
    }
}
