use serde::{Serialize, Deserialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

/// account record of the currently authenticated user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub confirmed: bool,
    #[serde(default)]
    pub blocked: bool,
    pub role: Role,
}

/// uploaded media reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Avatar {
    pub id: u64,
    pub url: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub mime: Option<String>,
}

/// profile data attached to a user that the user is allowed to edit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserMetadata {
    pub id: u64,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub avatar: Option<Avatar>,
}

impl UserMetadata {
    pub fn avatar_url(&self) -> Option<&str> {
        self.avatar.as_ref().map(|v| v.url.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateUserMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
}

/// reference used by the upload endpoint to attach a file to a record
pub const AVATAR_REF: &str = "user-metadata";
pub const AVATAR_FIELD: &str = "avatar";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub id: u64,
    pub url: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub mime: Option<String>,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn user_record() {
        let given = r#"{
            "id": 12,
            "username": "miku",
            "email": "miku@example.com",
            "provider": "local",
            "confirmed": true,
            "blocked": false,
            "role": {"id": 1, "name": "Authenticated", "description": "Default role given to authenticated user.", "type": "authenticated"}
        }"#;
        let user: User = serde_json::from_str(given).unwrap();

        assert_eq!(user.username, "miku");
        assert!(user.confirmed);
        assert_eq!(user.role.kind.as_deref(), Some("authenticated"));
    }

    #[test]
    fn metadata_without_avatar() {
        let given = r#"{"id": 4, "nickname": "miku", "avatar": null}"#;
        let meta: UserMetadata = serde_json::from_str(given).unwrap();

        assert_eq!(meta.nickname.as_deref(), Some("miku"));
        assert_eq!(meta.avatar_url(), None);
    }

    #[test]
    fn metadata_with_avatar() {
        let given = r#"{"id": 4, "avatar": {"id": 9, "url": "/uploads/avatar_9.png", "mime": "image/png"}}"#;
        let meta: UserMetadata = serde_json::from_str(given).unwrap();

        assert_eq!(meta.nickname, None);
        assert_eq!(meta.avatar_url(), Some("/uploads/avatar_9.png"));
    }

    #[test]
    fn update_body_skips_missing() {
        let body = UpdateUserMetadata { nickname: None };

        assert_eq!(serde_json::to_string(&body).unwrap(), "{}");

        let body = UpdateUserMetadata { nickname: Some("luka".into()) };

        assert_eq!(serde_json::to_string(&body).unwrap(), r#"{"nickname":"luka"}"#);
    }
}
