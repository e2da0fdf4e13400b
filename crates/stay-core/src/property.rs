//! # Property Types
//!
//! Rental property, seasonal pricing rules, per-day availability overrides
//! and extra services. Properties are loaded from `config/properties.toml`.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::dates::DateSpan;

/// Effect a seasonal pricing rule applies to the nightly rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum RuleEffect {
    /// Raise the rate by a percentage
    PercentageIncrease(Decimal),
    /// Lower the rate by a percentage
    PercentageDecrease(Decimal),
    /// Replace the rate outright
    FixedDaily(Decimal),
}

/// A dated seasonal pricing rule over a half-open range.
///
/// Rules are kept in their configured order; the first rule whose range
/// contains a day wins for that day and no later rule is considered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingRule {
    pub range: DateSpan,
    #[serde(flatten)]
    pub effect: RuleEffect,
}

impl PricingRule {
    pub fn new(from: NaiveDate, to: NaiveDate, effect: RuleEffect) -> Self {
        Self {
            range: DateSpan::raw(from, to),
            effect,
        }
    }
}

/// A rental property
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Property {
    /// Unique property identifier (e.g., "villa-aurora")
    pub id: String,

    /// Display name
    pub name: String,

    /// Base nightly rate (absent means fall back to weekly / 7)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_nightly_rate: Option<Decimal>,

    /// Base weekly rate, used as `weekly / 7` when the nightly rate is absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_weekly_rate: Option<Decimal>,

    /// Maximum guest count
    pub max_guests: u32,

    /// Ordered seasonal pricing rules (first match wins)
    #[serde(default)]
    pub pricing_rules: Vec<PricingRule>,

    /// Whether this property is active and bookable
    #[serde(default = "default_true")]
    pub active: bool,
}

fn default_true() -> bool {
    true
}

impl Property {
    /// Create a property with a nightly rate
    pub fn new(id: impl Into<String>, name: impl Into<String>, nightly_rate: Decimal) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            base_nightly_rate: Some(nightly_rate),
            base_weekly_rate: None,
            max_guests: 2,
            pricing_rules: Vec::new(),
            active: true,
        }
    }

    /// Builder: set weekly rate
    pub fn with_weekly_rate(mut self, rate: Decimal) -> Self {
        self.base_weekly_rate = Some(rate);
        self
    }

    /// Builder: set max guests
    pub fn with_max_guests(mut self, guests: u32) -> Self {
        self.max_guests = guests;
        self
    }

    /// Builder: append a pricing rule (keeps configured order)
    pub fn with_rule(mut self, rule: PricingRule) -> Self {
        self.pricing_rules.push(rule);
        self
    }
}

/// Status carried by an explicit per-day availability override
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverrideStatus {
    Available,
    Booked,
    Blocked,
    Maintenance,
}

/// An explicit per-day override of availability and price.
///
/// One override per (property, date). When present it replaces the default
/// and seasonal layers wholesale: status, price, min_nights, max_guests and
/// notes all come from the override, not a field-wise merge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityOverride {
    pub property_id: String,
    pub date: NaiveDate,
    pub status: OverrideStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(default = "default_min_nights")]
    pub min_nights: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_guests: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

fn default_min_nights() -> u32 {
    1
}

impl AvailabilityOverride {
    pub fn new(property_id: impl Into<String>, date: NaiveDate, status: OverrideStatus) -> Self {
        Self {
            property_id: property_id.into(),
            date,
            status,
            price: None,
            min_nights: 1,
            max_guests: None,
            notes: None,
        }
    }

    /// Builder: set price
    pub fn with_price(mut self, price: Decimal) -> Self {
        self.price = Some(price);
        self
    }

    /// Builder: set minimum nights
    pub fn with_min_nights(mut self, nights: u32) -> Self {
        self.min_nights = nights;
        self
    }

    /// Builder: set notes
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// A flat-priced extra service, applied once per booking when selected
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtraService {
    pub id: String,
    pub property_id: String,
    pub name: String,
    pub price: Decimal,
}

impl ExtraService {
    pub fn new(
        id: impl Into<String>,
        property_id: impl Into<String>,
        name: impl Into<String>,
        price: Decimal,
    ) -> Self {
        Self {
            id: id.into(),
            property_id: property_id.into(),
            name: name.into(),
            price,
        }
    }
}

/// Property catalog (loaded from config)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PropertyCatalog {
    #[serde(default)]
    pub properties: Vec<Property>,
    #[serde(default)]
    pub services: Vec<ExtraService>,
}

impl PropertyCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Find a property by ID
    pub fn get(&self, id: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.id == id)
    }

    /// All active properties
    pub fn active_properties(&self) -> impl Iterator<Item = &Property> {
        self.properties.iter().filter(|p| p.active)
    }

    /// Services attached to a property
    pub fn services_for<'a>(
        &'a self,
        property_id: &'a str,
    ) -> impl Iterator<Item = &'a ExtraService> + 'a {
        self.services
            .iter()
            .filter(move |s| s.property_id == property_id)
    }

    /// Load catalog from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_property_builder() {
        let property = Property::new("villa-aurora", "Villa Aurora", dec!(100))
            .with_max_guests(6)
            .with_rule(PricingRule::new(
                d("2024-06-01"),
                d("2024-09-01"),
                RuleEffect::PercentageIncrease(dec!(20)),
            ));

        assert_eq!(property.id, "villa-aurora");
        assert_eq!(property.max_guests, 6);
        assert_eq!(property.pricing_rules.len(), 1);
        assert!(property.active);
    }

    #[test]
    fn test_catalog_lookup() {
        let mut catalog = PropertyCatalog::new();
        catalog
            .properties
            .push(Property::new("a", "A", dec!(80)));
        catalog
            .services
            .push(ExtraService::new("cleaning", "a", "Final cleaning", dec!(45)));

        assert!(catalog.get("a").is_some());
        assert!(catalog.get("b").is_none());
        assert_eq!(catalog.services_for("a").count(), 1);
        assert_eq!(catalog.services_for("b").count(), 0);
    }

    #[test]
    fn test_override_builder() {
        let ovr = AvailabilityOverride::new("a", d("2024-06-15"), OverrideStatus::Maintenance)
            .with_min_nights(3)
            .with_notes("pool repair");

        assert_eq!(ovr.status, OverrideStatus::Maintenance);
        assert_eq!(ovr.min_nights, 3);
        assert_eq!(ovr.notes.as_deref(), Some("pool repair"));
        assert!(ovr.price.is_none());
    }
}
