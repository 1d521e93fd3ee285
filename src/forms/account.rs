use actix_multipart::form::{MultipartForm, tempfile::TempFile, text::Text};

use crate::domain::survey::{ALLOWED_PHOTO_TYPES, MAX_PHOTO_BYTES};
use crate::domain::user::{ProfilePicture, ProfileUpdate};
use crate::forms::FormError;

/// Business profile form with an optional picture.
#[derive(MultipartForm)]
pub struct ProfileForm {
    pub business_name: Option<Text<String>>,
    pub phone_number: Option<Text<String>>,
    pub address: Option<Text<String>>,
    #[multipart(limit = "10MB")]
    pub profile_picture: Option<TempFile>,
}

fn text(field: &Option<Text<String>>) -> &str {
    field.as_ref().map(|t| t.0.as_str()).unwrap_or("")
}

impl TryFrom<ProfileForm> for ProfileUpdate {
    type Error = FormError;

    fn try_from(form: ProfileForm) -> Result<Self, Self::Error> {
        let update = ProfileUpdate::new(
            text(&form.business_name),
            text(&form.phone_number),
            text(&form.address),
        );

        let Some(file) = form.profile_picture.filter(|f| f.size > 0) else {
            return Ok(update);
        };
        if file.size > MAX_PHOTO_BYTES {
            return Err(FormError::Upload(
                "Profile picture must be no larger than 5MB.".to_string(),
            ));
        }
        let content_type = file
            .content_type
            .as_ref()
            .map(|mime| mime.essence_str().to_string())
            .unwrap_or_default();
        if !ALLOWED_PHOTO_TYPES.contains(&content_type.as_str()) {
            return Err(FormError::Upload(
                "Please select an image file (PNG, JPG, GIF).".to_string(),
            ));
        }
        let data = std::fs::read(file.file.path()).map_err(|e| FormError::Upload(e.to_string()))?;

        Ok(update.with_picture(ProfilePicture {
            file_name: file.file_name.clone().unwrap_or_else(|| "profile".to_string()),
            content_type,
            data,
        }))
    }
}
