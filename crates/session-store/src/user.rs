//! User profile record.

use serde::{Deserialize, Serialize};

/// Profile of the signed-in user, as returned by the auth backend.
///
/// The session core only checks for the profile's existence; every field
/// beyond `id` is carried opaquely for consumers (avatar rendering, the
/// account menu, trip attribution).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Backend user ID.
    pub id: String,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Email address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Identity provider that authenticated this user (e.g. "google").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    /// User ID at the identity provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_id: Option<String>,
    /// Account type assigned by the backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_type: Option<String>,
    /// Avatar image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    /// Who claimed this account, if anyone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claimed_by: Option<String>,
    /// Who created this account.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    /// Creation timestamp (ISO string, backend-formatted).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl UserProfile {
    /// Create a profile carrying only the user ID.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_decodes_camel_case() {
        let json = r#"{
            "id": "u1",
            "name": "Alex",
            "providerId": "google-123",
            "avatarUrl": "https://example.com/a.png",
            "createdAt": "2025-05-01T12:00:00Z"
        }"#;

        let profile: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.id, "u1");
        assert_eq!(profile.provider_id.as_deref(), Some("google-123"));
        assert_eq!(profile.avatar_url.as_deref(), Some("https://example.com/a.png"));
        assert!(profile.phone.is_none());
    }

    #[test]
    fn test_profile_id_only() {
        let profile = UserProfile::with_id("u2");
        let json = serde_json::to_string(&profile).unwrap();
        assert_eq!(json, r#"{"id":"u2"}"#);
    }
}
