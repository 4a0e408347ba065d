use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Raw user record as returned by the authentication service.
/// Field names follow the service's camelCase wire format; call
/// [`ApiUser::into_user`] to get the normalized domain type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiUser {
    pub id: String,
    pub email: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "profilePicture")]
    pub profile_picture: Option<String>,
    pub provider: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: Option<String>,
    #[serde(rename = "updatedAt")]
    pub updated_at: Option<String>,
}

impl ApiUser {
    /// Normalize into the domain [`User`]. Missing provider defaults to
    /// "local" (the service omits it on some endpoints).
    pub fn into_user(self) -> User {
        User {
            id: self.id,
            name: self.name.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            profile_image: self.profile_picture,
            provider: self.provider.unwrap_or_else(|| "local".to_string()),
            created_at: self.created_at.as_deref().and_then(parse_timestamp),
            updated_at: self.updated_at.as_deref().and_then(parse_timestamp),
        }
    }
}

/// Parse a service timestamp. Depending on the endpoint the service emits
/// ISO-8601 with an offset or a naive UTC datetime.
pub(crate) fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Normalized user profile used throughout the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub profile_image: Option<String>,
    pub provider: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Successful login or OAuth-exchange payload.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: ApiUser,
}

/// OAuth initiation payload.
#[derive(Debug, Clone, Deserialize)]
pub struct RedirectResponse {
    pub redirect_url: String,
}

/// Generic acknowledgement body.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Health probe payload.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceHealth {
    pub status: String,
    pub service: Option<String>,
}

/// Fields accepted by the profile update endpoint.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "profileImage", skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_login_response() {
        let json = r#"{
            "token": "eyJhbGciOiJIUzI1NiJ9.payload.sig",
            "user": {
                "id": "64f1c0ffee",
                "email": "ada@example.com",
                "name": "Ada",
                "profilePicture": null,
                "provider": "local",
                "createdAt": "2025-01-05T09:30:00Z",
                "updatedAt": "2025-01-06T10:00:00Z"
            }
        }"#;

        let parsed: AuthResponse = serde_json::from_str(json).expect("Failed to parse login JSON");
        assert_eq!(parsed.token, "eyJhbGciOiJIUzI1NiJ9.payload.sig");

        let user = parsed.user.into_user();
        assert_eq!(user.id, "64f1c0ffee");
        assert_eq!(user.name, "Ada");
        assert_eq!(user.email, "ada@example.com");
        assert_eq!(user.provider, "local");
        assert!(user.profile_image.is_none());
        assert!(user.created_at.is_some());
    }

    #[test]
    fn parse_registration_response_defaults_provider() {
        // The signup endpoint omits profilePicture and sometimes provider.
        let json = r#"{
            "id": "64f1c0ffee",
            "email": "ada@example.com",
            "name": "Ada",
            "createdAt": "2025-01-05T09:30:00Z",
            "updatedAt": "2025-01-05T09:30:00Z"
        }"#;

        let parsed: ApiUser = serde_json::from_str(json).expect("Failed to parse signup JSON");
        let user = parsed.into_user();
        assert_eq!(user.provider, "local");
        assert!(user.profile_image.is_none());
    }

    #[test]
    fn parse_timestamp_accepts_naive_datetimes() {
        // /users/me emits naive UTC timestamps with microseconds.
        let dt = parse_timestamp("2025-01-05T09:30:00.123456").expect("naive timestamp");
        assert_eq!(dt.timestamp(), 1736069400);

        let dt = parse_timestamp("2025-01-05T09:30:00Z").expect("rfc3339 timestamp");
        assert_eq!(dt.timestamp(), 1736069400);
    }

    #[test]
    fn parse_timestamp_rejects_garbage() {
        assert!(parse_timestamp("last tuesday").is_none());
        assert!(parse_timestamp("").is_none());
    }

    #[test]
    fn profile_update_skips_absent_fields() {
        let update = ProfileUpdate {
            name: Some("Ada".to_string()),
            profile_image: None,
        };
        let json = serde_json::to_string(&update).expect("serialize update");
        assert_eq!(json, r#"{"name":"Ada"}"#);
    }
}
