//! Directory API types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A directory user exactly as the API lists it.
///
/// The commonly read fields are typed; everything else is kept verbatim in
/// `extra` and written back out unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryUser {
    pub id: String,
    pub primary_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<UserName>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_admin: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suspended: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserName {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// API response for `users.list`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserListResponse {
    #[serde(default)]
    pub users: Vec<DirectoryUser>,
    pub next_page_token: Option<String>,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;

    #[test]
    fn test_user_passes_unknown_fields_through() {
        let raw = serde_json::json!({
            "kind": "admin#directory#user",
            "id": "1001",
            "primaryEmail": "ada@example.com",
            "name": {"givenName": "Ada", "familyName": "Lovelace", "fullName": "Ada Lovelace"},
            "isAdmin": true,
            "orgUnitPath": "/Engineering",
            "emails": [{"address": "ada@example.com", "primary": true}]
        });

        let user: DirectoryUser = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(user.primary_email, "ada@example.com");
        assert_eq!(user.is_admin, Some(true));
        assert_eq!(user.extra["orgUnitPath"], "/Engineering");

        assert_eq!(serde_json::to_value(&user).unwrap(), raw);
    }

    #[test]
    fn test_user_name_keeps_extra_fields() {
        let raw = serde_json::json!({
            "id": "1002",
            "primaryEmail": "ada@example.com",
            "name": {
                "givenName": "Ada",
                "familyName": "Lovelace",
                "fullName": "Ada Lovelace",
                "displayName": "Ada L."
            }
        });

        let user: DirectoryUser = serde_json::from_value(raw.clone()).unwrap();
        let name = user.name.as_ref().unwrap();
        assert_eq!(name.given_name.as_deref(), Some("Ada"));
        assert_eq!(name.extra["displayName"], "Ada L.");

        assert_eq!(serde_json::to_value(&user).unwrap(), raw);
    }

    #[test]
    fn test_empty_list_response() {
        let resp: UserListResponse =
            serde_json::from_str(r#"{"kind": "admin#directory#users"}"#).unwrap();
        assert!(resp.users.is_empty());
        assert!(resp.next_page_token.is_none());
    }
}
