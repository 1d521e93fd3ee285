//! Add and edit form of the pricing setup page.

use serde::Deserialize;

use crate::domain::pricing::{APPLICABILITY_OPTIONS, BuilderPricingItem, NewPricingItem, PriceType};
use crate::domain::types::{ItemName, parse_decimal};
use crate::forms::FormError;

pub const REQUIRED_FIELDS_MESSAGE: &str =
    "Please fill in all required fields (Item Name, Applicability, and Base Price).";

/// `?edit=ID` query of the pricing page.
#[derive(Debug, Default, Deserialize)]
pub struct PricingQuery {
    pub edit: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PricingForm {
    #[serde(default)]
    pub item_name: String,
    #[serde(default)]
    pub applicability: String,
    #[serde(default)]
    pub price_type: String,
    #[serde(default)]
    pub base_price: String,
    #[serde(default)]
    pub markup_percent: String,
}

impl TryFrom<PricingForm> for NewPricingItem {
    type Error = FormError;

    fn try_from(form: PricingForm) -> Result<Self, Self::Error> {
        let applicability = form.applicability.trim();
        if form.item_name.trim().is_empty()
            || applicability.is_empty()
            || form.base_price.trim().is_empty()
        {
            return Err(FormError::InvalidValue(REQUIRED_FIELDS_MESSAGE.to_string()));
        }

        let item_name = ItemName::new(form.item_name.as_str())
            .map_err(|_| FormError::InvalidValue(REQUIRED_FIELDS_MESSAGE.to_string()))?;
        if !APPLICABILITY_OPTIONS.contains(&applicability) {
            return Err(FormError::InvalidValue(format!("Unknown applicability: {applicability}")));
        }
        let price_type = match form.price_type.trim() {
            "" => PriceType::default(),
            raw => raw.parse::<PriceType>()?,
        };
        let base_price =
            parse_decimal(&form.base_price).map_err(|_| FormError::InvalidNumber("Base Price"))?;
        let markup_percent = match form.markup_percent.trim() {
            "" => 0.0,
            raw => parse_decimal(raw).map_err(|_| FormError::InvalidNumber("Markup Percentage"))?,
        };

        Ok(NewPricingItem::new(
            item_name,
            applicability.to_string(),
            price_type,
            base_price,
            markup_percent,
        ))
    }
}

impl From<&BuilderPricingItem> for PricingForm {
    fn from(item: &BuilderPricingItem) -> Self {
        Self {
            item_name: item.item_name.clone(),
            applicability: item.applicability.clone().unwrap_or_default(),
            price_type: item.price_type.as_str().to_string(),
            base_price: item.base_price.to_string(),
            markup_percent: item.markup_percent.to_string(),
        }
    }
}
