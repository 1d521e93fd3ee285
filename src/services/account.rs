use crate::api::ProfileApi;
use crate::domain::user::ProfileUpdate;
use crate::dto::account::AccountPageData;
use crate::forms::account::ProfileForm;
use crate::services::{ServiceError, ServiceResult};
use crate::session::AuthenticatedBuilder;

/// Loads the account and business profile of the signed-in builder.
pub async fn load_account<A>(api: &A, builder: &AuthenticatedBuilder) -> ServiceResult<AccountPageData>
where
    A: ProfileApi + ?Sized,
{
    let profile = api.profile(&builder.token).await.map_err(|err| {
        log::error!("Failed to fetch profile: {err}");
        ServiceError::from(err)
    })?;
    Ok(AccountPageData::new(&builder.user, profile))
}

/// Validates the posted profile and sends the non-empty fields.
pub async fn update_account<A>(
    api: &A,
    builder: &AuthenticatedBuilder,
    form: ProfileForm,
) -> ServiceResult<()>
where
    A: ProfileApi + ?Sized,
{
    let update = ProfileUpdate::try_from(form)?;
    save_profile(api, builder, &update).await
}

async fn save_profile<A>(
    api: &A,
    builder: &AuthenticatedBuilder,
    update: &ProfileUpdate,
) -> ServiceResult<()>
where
    A: ProfileApi + ?Sized,
{
    api.update_profile(&builder.token, update)
        .await
        .map(|_| ())
        .map_err(|err| {
            log::error!("Failed to update profile: {err}");
            ServiceError::from(err)
        })
}
