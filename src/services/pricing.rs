//! Pricing setup: list, add, edit and delete pricing items.

use crate::api::{PricingReader, PricingWriter};
use crate::domain::pricing::{NewPricingItem, PricingTable};
use crate::domain::types::PricingId;
use crate::dto::Alert;
use crate::dto::pricing::PricingPageData;
use crate::forms::pricing::PricingForm;
use crate::services::{ServiceError, ServiceResult};
use crate::session::AuthenticatedBuilder;

async fn fetch_table<A>(api: &A, builder: &AuthenticatedBuilder) -> ServiceResult<PricingTable>
where
    A: PricingReader + ?Sized,
{
    let items = api.list_pricing(&builder.token).await.map_err(|err| {
        log::error!("Failed to load pricing items: {err}");
        ServiceError::from(err)
    })?;
    Ok(PricingTable::new(items))
}

/// Loads the pricing table, prefilling the form when `edit` names an item.
pub async fn load_pricing_page<A>(
    api: &A,
    builder: &AuthenticatedBuilder,
    edit: Option<i64>,
) -> ServiceResult<PricingPageData>
where
    A: PricingReader + ?Sized,
{
    let table = fetch_table(api, builder).await?;

    let editing = edit
        .and_then(|id| PricingId::new(id).ok())
        .and_then(|id| table.get(id));
    let page = match editing {
        Some(item) => PricingPageData::new(&table, Some(item.id.get()), &PricingForm::from(item)),
        None => PricingPageData::new(&table, None, &PricingForm::default()),
    };
    Ok(page)
}

/// Validates the form and creates a new pricing item.
pub async fn add_pricing_item<A>(
    api: &A,
    builder: &AuthenticatedBuilder,
    form: PricingForm,
) -> ServiceResult<()>
where
    A: PricingWriter + ?Sized,
{
    let item = NewPricingItem::try_from(form)?;
    api.create_pricing(&builder.token, &item).await.map_err(|err| {
        log::error!("Failed to add a pricing item: {err}");
        ServiceError::from(err)
    })
}

/// Validates the form and replaces an existing pricing item.
pub async fn update_pricing_item<A>(
    api: &A,
    builder: &AuthenticatedBuilder,
    item_id: i64,
    form: PricingForm,
) -> ServiceResult<()>
where
    A: PricingWriter + ?Sized,
{
    let id = PricingId::new(item_id).map_err(|_| ServiceError::NotFound)?;
    let item = NewPricingItem::try_from(form)?;
    api.update_pricing(&builder.token, id, &item)
        .await
        .map_err(|err| {
            log::error!("Failed to update pricing item {id}: {err}");
            ServiceError::from(err)
        })
}

/// Deletes one pricing item and renders the table without it.
pub async fn delete_pricing_item<A>(
    api: &A,
    builder: &AuthenticatedBuilder,
    item_id: i64,
) -> ServiceResult<PricingPageData>
where
    A: PricingReader + PricingWriter + ?Sized,
{
    let id = PricingId::new(item_id).map_err(|_| ServiceError::NotFound)?;
    let mut table = fetch_table(api, builder).await?;

    let alert = match api.delete_pricing(&builder.token, id).await {
        Ok(()) => {
            table.remove(id);
            Alert::success("Pricing item deleted successfully.")
        }
        Err(err) if err.is_unauthorized() => return Err(ServiceError::Unauthorized),
        Err(err) => {
            log::error!("Failed to delete pricing item {id}: {err}");
            Alert::error(format!("Error deleting pricing: {err}"))
        }
    };

    Ok(PricingPageData::new(&table, None, &PricingForm::default()).with_alert(alert))
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::api::{ApiError, ApiResult};
    use crate::domain::pricing::{BuilderPricingItem, PriceType};
    use crate::domain::types::{BearerToken, UserId};
    use crate::domain::user::User;

    #[derive(Default)]
    struct FakeBackend {
        items: RefCell<Vec<BuilderPricingItem>>,
        created: RefCell<Vec<NewPricingItem>>,
        fail_delete: bool,
    }

    impl FakeBackend {
        fn with_item() -> Self {
            let backend = Self::default();
            backend.items.borrow_mut().push(BuilderPricingItem {
                id: PricingId::new(1).unwrap(),
                item_name: "Floor tiling".to_string(),
                applicability: Some("Floor Surface".to_string()),
                price_type: PriceType::SquareMeter,
                base_price: 50.0,
                markup_percent: 10.0,
                final_price: 55.0,
            });
            backend
        }
    }

    impl PricingReader for FakeBackend {
        async fn list_pricing(&self, _token: &BearerToken) -> ApiResult<Vec<BuilderPricingItem>> {
            Ok(self.items.borrow().clone())
        }
    }

    impl PricingWriter for FakeBackend {
        async fn create_pricing(&self, _token: &BearerToken, item: &NewPricingItem) -> ApiResult<()> {
            self.created.borrow_mut().push(item.clone());
            Ok(())
        }

        async fn update_pricing(
            &self,
            _token: &BearerToken,
            _id: PricingId,
            item: &NewPricingItem,
        ) -> ApiResult<()> {
            self.created.borrow_mut().push(item.clone());
            Ok(())
        }

        async fn delete_pricing(&self, _token: &BearerToken, _id: PricingId) -> ApiResult<()> {
            if self.fail_delete {
                Err(ApiError::Network("connection refused".to_string()))
            } else {
                Ok(())
            }
        }
    }

    fn builder() -> AuthenticatedBuilder {
        AuthenticatedBuilder {
            user: User {
                id: UserId::new(3).unwrap(),
                name: "Ann".to_string(),
                email: "ann@example.com".to_string(),
                email_verified_at: Some("2024-01-01".to_string()),
                role_id: Some(2),
                role: None,
            },
            token: BearerToken::new("token").unwrap(),
        }
    }

    #[actix_web::test]
    async fn invalid_form_never_reaches_backend() {
        let api = FakeBackend::default();
        let form = PricingForm {
            item_name: "Grout".to_string(),
            ..PricingForm::default()
        };

        let result = add_pricing_item(&api, &builder(), form).await;

        assert!(matches!(result, Err(ServiceError::Form(_))));
        assert!(api.created.borrow().is_empty());
    }

    #[actix_web::test]
    async fn add_sends_recomputed_final_price() {
        let api = FakeBackend::default();
        let form = PricingForm {
            item_name: "Grout".to_string(),
            applicability: "Wall Surface".to_string(),
            price_type: "linear_meter".to_string(),
            base_price: "20".to_string(),
            markup_percent: "50".to_string(),
        };

        add_pricing_item(&api, &builder(), form).await.unwrap();

        let created = api.created.borrow();
        assert_eq!(created[0].final_price, 30.0);
        assert_eq!(created[0].price_type, PriceType::LinearMeter);
    }

    #[actix_web::test]
    async fn edit_query_prefills_form() {
        let api = FakeBackend::with_item();

        let page = load_pricing_page(&api, &builder(), Some(1)).await.unwrap();
        assert_eq!(page.form.editing_id, Some(1));
        assert_eq!(page.form.item_name, "Floor tiling");

        let page = load_pricing_page(&api, &builder(), Some(77)).await.unwrap();
        assert_eq!(page.form.editing_id, None);
    }

    #[actix_web::test]
    async fn failed_delete_keeps_item() {
        let api = FakeBackend {
            fail_delete: true,
            ..FakeBackend::with_item()
        };

        let page = delete_pricing_item(&api, &builder(), 1).await.unwrap();

        assert_eq!(page.items.len(), 1);
        assert_eq!(page.alert.unwrap().level, "danger");

        let api = FakeBackend::with_item();
        let page = delete_pricing_item(&api, &builder(), 1).await.unwrap();
        assert!(page.items.is_empty());
    }
}
