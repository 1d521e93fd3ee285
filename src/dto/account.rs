use serde::Serialize;

use crate::domain::user::{Profile, User};

/// Data required to render the account settings page.
#[derive(Debug, Default, Serialize)]
pub struct AccountPageData {
    pub name: String,
    pub email: String,
    pub business_name: String,
    pub phone_number: String,
    pub address: String,
    /// URL of the current profile picture, if any.
    pub profile_picture: Option<String>,
}

impl AccountPageData {
    pub fn new(user: &User, profile: Option<Profile>) -> Self {
        let profile = profile.unwrap_or_default();
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
            business_name: profile.business_name.unwrap_or_default(),
            phone_number: profile.phone_number.unwrap_or_default(),
            address: profile.address.unwrap_or_default(),
            profile_picture: profile.profile_picture.filter(|url| !url.is_empty()),
        }
    }
}
