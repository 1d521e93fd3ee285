//! Builder pricing line items.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::types::{ItemName, PricingId, TypeConstraintError, de_number};

/// Work categories a pricing item can apply to.
pub const APPLICABILITY_OPTIONS: [&str; 10] = [
    "Floor Surface",
    "Wall Surface",
    "Ceiling Surface",
    "Bathroom Tiling",
    "Kitchen Backsplash",
    "Outdoor Patio",
    "Pool Area",
    "General Labor",
    "Materials",
    "Equipment",
];

/// Unit a price is quoted in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PriceType {
    #[default]
    #[serde(rename = "m2")]
    SquareMeter,
    #[serde(rename = "linear_meter")]
    LinearMeter,
    #[serde(rename = "fixed")]
    Fixed,
    #[serde(rename = "hourly")]
    Hourly,
}

impl PriceType {
    pub const ALL: [PriceType; 4] = [
        PriceType::SquareMeter,
        PriceType::LinearMeter,
        PriceType::Fixed,
        PriceType::Hourly,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            PriceType::SquareMeter => "m2",
            PriceType::LinearMeter => "linear_meter",
            PriceType::Fixed => "fixed",
            PriceType::Hourly => "hourly",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            PriceType::SquareMeter => "Per Square Meter (m²)",
            PriceType::LinearMeter => "Per Linear Meter",
            PriceType::Fixed => "Fixed Price",
            PriceType::Hourly => "Hourly Rate",
        }
    }
}

impl Display for PriceType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PriceType {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        PriceType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| TypeConstraintError::InvalidValue(s.to_string()))
    }
}

/// Price after applying a percentage markup.
pub fn final_price(base_price: f64, markup_percent: f64) -> f64 {
    base_price + base_price * markup_percent / 100.0
}

/// Pricing item as stored by the backend.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BuilderPricingItem {
    pub id: PricingId,
    pub item_name: String,
    #[serde(default)]
    pub applicability: Option<String>,
    #[serde(default)]
    pub price_type: PriceType,
    #[serde(deserialize_with = "de_number")]
    pub base_price: f64,
    #[serde(default, deserialize_with = "de_number")]
    pub markup_percent: f64,
    #[serde(default, deserialize_with = "de_number")]
    pub final_price: f64,
}

/// Validated pricing item ready to be created or updated.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct NewPricingItem {
    pub item_name: ItemName,
    pub applicability: String,
    pub price_type: PriceType,
    pub base_price: f64,
    pub markup_percent: f64,
    pub final_price: f64,
}

impl NewPricingItem {
    /// Builds the payload, recomputing the final price from its inputs.
    #[must_use]
    pub fn new(
        item_name: ItemName,
        applicability: String,
        price_type: PriceType,
        base_price: f64,
        markup_percent: f64,
    ) -> Self {
        Self {
            item_name,
            applicability,
            price_type,
            base_price,
            markup_percent,
            final_price: final_price(base_price, markup_percent),
        }
    }
}

/// Pricing items fetched for one page render.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PricingTable {
    items: Vec<BuilderPricingItem>,
}

impl PricingTable {
    pub fn new(items: Vec<BuilderPricingItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[BuilderPricingItem] {
        &self.items
    }

    pub fn get(&self, id: PricingId) -> Option<&BuilderPricingItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Drops one item. Returns `false` when the id is absent.
    pub fn remove(&mut self, id: PricingId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        self.items.len() != before
    }
}
