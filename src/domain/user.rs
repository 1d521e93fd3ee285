//! Builder accounts and business profiles.

use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::types::{BuilderId, UserId};

/// Role id assigned to accounts created through sign up.
pub const DEFAULT_ROLE_ID: i64 = 2;

fn de_role<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawRole {
        Name(String),
        Object { name: String },
    }

    Ok(
        Option::<RawRole>::deserialize(deserializer)?.map(|role| match role {
            RawRole::Name(name) | RawRole::Object { name } => name,
        }),
    )
}

/// Account returned by the authentication endpoints.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub email_verified_at: Option<String>,
    #[serde(default)]
    pub role_id: Option<i64>,
    #[serde(default, deserialize_with = "de_role")]
    pub role: Option<String>,
}

impl User {
    pub fn is_verified(&self) -> bool {
        self.email_verified_at
            .as_deref()
            .is_some_and(|at| !at.trim().is_empty())
    }

    /// Builder identifier used in public survey links.
    pub fn builder_id(&self) -> BuilderId {
        self.id.into()
    }

    /// First word of the display name.
    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or(&self.name)
    }
}

/// Business details of a builder.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub business_name: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub profile_picture: Option<String>,
}

/// Picture attached to a profile update.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProfilePicture {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Profile changes; blank values are not sent.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProfileUpdate {
    pub business_name: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub picture: Option<ProfilePicture>,
}

impl ProfileUpdate {
    #[must_use]
    pub fn new(business_name: &str, phone_number: &str, address: &str) -> Self {
        let keep = |value: &str| {
            let value = ammonia::clean(value.trim());
            (!value.is_empty()).then_some(value)
        };
        Self {
            business_name: keep(business_name),
            phone_number: keep(phone_number),
            address: keep(address),
            picture: None,
        }
    }

    #[must_use]
    pub fn with_picture(mut self, picture: ProfilePicture) -> Self {
        self.picture = Some(picture);
        self
    }

    /// Non-empty text fields in a stable order.
    pub fn text_fields(&self) -> Vec<(&'static str, &str)> {
        [
            ("business_name", self.business_name.as_deref()),
            ("phone_number", self.phone_number.as_deref()),
            ("address", self.address.as_deref()),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| (name, v)))
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verification_requires_a_timestamp() {
        let json = r#"{"id": 5, "name": "Bob Builder", "email": "bob@example.com", "email_verified_at": null, "role": {"name": "builder"}}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert!(!user.is_verified());
        assert_eq!(user.role.as_deref(), Some("builder"));
        assert_eq!(user.first_name(), "Bob");

        let verified = User {
            email_verified_at: Some("2024-01-01T00:00:00Z".to_string()),
            ..user
        };
        assert!(verified.is_verified());
        assert_eq!(verified.builder_id().get(), 5);
    }

    #[test]
    fn profile_update_drops_blank_fields() {
        let update = ProfileUpdate::new("  Acme Renovations ", "", "   ");
        assert_eq!(update.text_fields(), vec![("business_name", "Acme Renovations")]);
    }
}
