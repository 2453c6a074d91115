use serde::{Deserialize, Serialize};

/// A sellable plot/apartment size offered under a listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub size: f64,
    /// Unit of measure, e.g. "sqm" or "plot".
    pub unit: String,
    pub price: f64,
    #[serde(default = "default_available")]
    pub available: bool,
}

fn default_available() -> bool {
    true
}

/// Lowest price among the units still available.
pub fn starting_price(units: &[Unit]) -> Option<f64> {
    units
        .iter()
        .filter(|u| u.available)
        .map(|u| u.price)
        .reduce(f64::min)
}
