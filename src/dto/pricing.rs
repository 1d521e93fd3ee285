use serde::Serialize;

use crate::domain::pricing::{APPLICABILITY_OPTIONS, BuilderPricingItem, PriceType, PricingTable};
use crate::dto::Alert;
use crate::forms::pricing::PricingForm;

/// Select option of the pricing form.
#[derive(Debug, Serialize)]
pub struct SelectOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

/// Pricing item formatted for the table.
#[derive(Debug, Serialize)]
pub struct PricingRow {
    pub id: i64,
    pub item_name: String,
    pub applicability: String,
    pub price_type: &'static str,
    pub base_price: String,
    pub markup_percent: String,
    pub final_price: String,
}

impl From<&BuilderPricingItem> for PricingRow {
    fn from(item: &BuilderPricingItem) -> Self {
        Self {
            id: item.id.get(),
            item_name: item.item_name.clone(),
            applicability: item.applicability.clone().unwrap_or_else(|| "-".to_string()),
            price_type: item.price_type.label(),
            base_price: format!("${:.2}", item.base_price),
            markup_percent: format!("{}%", item.markup_percent),
            final_price: format!("${:.2}", item.final_price),
        }
    }
}

/// Values and choices of the add/edit form.
#[derive(Debug, Serialize)]
pub struct PricingFormView {
    /// Item being edited, `None` when adding.
    pub editing_id: Option<i64>,
    pub item_name: String,
    pub base_price: String,
    pub markup_percent: String,
    pub applicability_options: Vec<SelectOption>,
    pub price_type_options: Vec<SelectOption>,
}

impl PricingFormView {
    pub fn new(editing_id: Option<i64>, form: &PricingForm) -> Self {
        let price_type = form.price_type.parse::<PriceType>().unwrap_or_default();
        Self {
            editing_id,
            item_name: form.item_name.clone(),
            base_price: form.base_price.clone(),
            markup_percent: form.markup_percent.clone(),
            applicability_options: APPLICABILITY_OPTIONS
                .into_iter()
                .map(|value| SelectOption {
                    value,
                    label: value,
                    selected: form.applicability == value,
                })
                .collect(),
            price_type_options: PriceType::ALL
                .into_iter()
                .map(|t| SelectOption {
                    value: t.as_str(),
                    label: t.label(),
                    selected: t == price_type,
                })
                .collect(),
        }
    }
}

/// Data required to render the pricing setup page.
#[derive(Debug, Serialize)]
pub struct PricingPageData {
    pub items: Vec<PricingRow>,
    pub form: PricingFormView,
    pub alert: Option<Alert>,
}

impl PricingPageData {
    pub fn new(table: &PricingTable, editing_id: Option<i64>, form: &PricingForm) -> Self {
        Self {
            items: table.items().iter().map(PricingRow::from).collect(),
            form: PricingFormView::new(editing_id, form),
            alert: None,
        }
    }

    #[must_use]
    pub fn with_alert(mut self, alert: Alert) -> Self {
        self.alert = Some(alert);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::PricingId;

    #[test]
    fn edit_form_preselects_item_values() {
        let item = BuilderPricingItem {
            id: PricingId::new(5).unwrap(),
            item_name: "Grout".to_string(),
            applicability: Some("Wall Surface".to_string()),
            price_type: PriceType::LinearMeter,
            base_price: 12.0,
            markup_percent: 25.0,
            final_price: 15.0,
        };
        let table = PricingTable::new(vec![item.clone()]);

        let page = PricingPageData::new(&table, Some(5), &PricingForm::from(&item));

        assert_eq!(page.items[0].final_price, "$15.00");
        assert_eq!(page.items[0].price_type, "Per Linear Meter");
        assert_eq!(page.form.editing_id, Some(5));
        let selected = |options: &[SelectOption]| {
            options.iter().filter(|o| o.selected).map(|o| o.value).collect::<Vec<_>>()
        };
        assert_eq!(selected(&page.form.applicability_options), vec!["Wall Surface"]);
        assert_eq!(selected(&page.form.price_type_options), vec!["linear_meter"]);
    }

    #[test]
    fn empty_form_defaults_to_square_meters() {
        let page = PricingPageData::new(&PricingTable::default(), None, &PricingForm::default());
        assert!(page.items.is_empty());
        assert!(page.form.price_type_options[0].selected);
        assert!(page.form.applicability_options.iter().all(|o| !o.selected));
    }
}
