//! # Pricing
//!
//! Day-by-day seasonal rate resolution and stay price calculation.
//!
//! The resolver starts from the property's base nightly rate (or
//! `weekly / 7` when no nightly rate is set), then applies the first
//! seasonal rule whose range contains the day. Rules are evaluated strictly
//! in their configured order and never stack: the first match wins and
//! later rules are not considered for that day.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::dates::DateSpan;
use crate::error::{BookingError, BookingResult};
use crate::property::{ExtraService, Property, RuleEffect};

const SEVEN: Decimal = Decimal::from_parts(7, 0, 0, false, 0);
const ONE_HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Resolve the effective nightly rate for one calendar day.
///
/// Fails with a pricing error when neither a nightly nor a weekly base rate
/// is configured.
pub fn resolve_daily_rate(property: &Property, date: NaiveDate) -> BookingResult<Decimal> {
    let base = base_rate(property)?;

    for rule in &property.pricing_rules {
        if rule.range.contains(date) {
            let rate = match rule.effect {
                RuleEffect::PercentageIncrease(pct) => {
                    base * (Decimal::ONE + pct / ONE_HUNDRED)
                }
                RuleEffect::PercentageDecrease(pct) => {
                    base * (Decimal::ONE - pct / ONE_HUNDRED)
                }
                RuleEffect::FixedDaily(value) => value,
            };
            return Ok(rate);
        }
    }

    Ok(base)
}

fn base_rate(property: &Property) -> BookingResult<Decimal> {
    match property.base_nightly_rate {
        Some(rate) if !rate.is_zero() => Ok(rate),
        _ => match property.base_weekly_rate {
            Some(weekly) if !weekly.is_zero() => Ok(weekly / SEVEN),
            _ => Err(BookingError::Pricing(format!(
                "property {} has no base nightly or weekly rate",
                property.id
            ))),
        },
    }
}

/// Price breakdown for a stay
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub nights: i64,
    pub base_total: Decimal,
    pub services_total: Decimal,
    pub total: Decimal,
}

/// Calculate the price breakdown for a stay over `[date_from, date_to)`.
///
/// Sums the resolved daily rate for every night, adds the flat price of each
/// selected extra service (charged once per booking no matter how often its
/// id appears; unknown ids are ignored), and rounds the grand total once to
/// 2 decimal places. Guest count is accepted for future
/// guest-based pricing but does not affect the arithmetic; capacity is the
/// caller's check.
pub fn calculate(
    property: &Property,
    span: DateSpan,
    _guests: u32,
    services: &[ExtraService],
    selected_service_ids: &[String],
) -> BookingResult<Quote> {
    let nights = span.nights();
    if nights <= 0 {
        return Err(BookingError::Pricing(format!(
            "stay {} resolves to {} nights",
            span, nights
        )));
    }

    let mut base_total = Decimal::ZERO;
    for day in span.days() {
        base_total += resolve_daily_rate(property, day)?;
    }

    let services_total: Decimal = services
        .iter()
        .filter(|s| selected_service_ids.contains(&s.id))
        .map(|s| s.price)
        .sum();

    let total = (base_total + services_total).round_dp(2);

    Ok(Quote {
        nights,
        base_total,
        services_total,
        total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::PricingRule;
    use rust_decimal_macros::dec;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn span(from: &str, to: &str) -> DateSpan {
        DateSpan::new(d(from), d(to)).unwrap()
    }

    #[test]
    fn test_base_rate_fallback_to_weekly() {
        let property = Property {
            base_nightly_rate: None,
            ..Property::new("a", "A", dec!(0))
        }
        .with_weekly_rate(dec!(700));
        assert_eq!(
            resolve_daily_rate(&property, d("2024-06-01")).unwrap(),
            dec!(100)
        );
    }

    #[test]
    fn test_zero_nightly_rate_falls_back_to_weekly() {
        let property = Property::new("a", "A", dec!(0)).with_weekly_rate(dec!(770));
        assert_eq!(
            resolve_daily_rate(&property, d("2024-06-01")).unwrap(),
            dec!(110)
        );
    }

    #[test]
    fn test_no_base_rate_fails() {
        let property = Property {
            base_nightly_rate: None,
            base_weekly_rate: None,
            ..Property::new("a", "A", dec!(0))
        };
        assert!(matches!(
            resolve_daily_rate(&property, d("2024-06-01")),
            Err(BookingError::Pricing(_))
        ));
    }

    #[test]
    fn test_percentage_effects() {
        let property = Property::new("a", "A", dec!(100))
            .with_rule(PricingRule::new(
                d("2024-06-01"),
                d("2024-07-01"),
                RuleEffect::PercentageIncrease(dec!(20)),
            ))
            .with_rule(PricingRule::new(
                d("2024-10-01"),
                d("2024-11-01"),
                RuleEffect::PercentageDecrease(dec!(15)),
            ));

        assert_eq!(
            resolve_daily_rate(&property, d("2024-06-15")).unwrap(),
            dec!(120.00)
        );
        assert_eq!(
            resolve_daily_rate(&property, d("2024-10-15")).unwrap(),
            dec!(85.00)
        );
        // outside every rule: base rate stands
        assert_eq!(
            resolve_daily_rate(&property, d("2024-08-15")).unwrap(),
            dec!(100)
        );
    }

    #[test]
    fn test_first_match_wins_no_stacking() {
        // both rules cover June 15th; the earlier-configured one decides
        let property = Property::new("a", "A", dec!(100))
            .with_rule(PricingRule::new(
                d("2024-06-01"),
                d("2024-07-01"),
                RuleEffect::FixedDaily(dec!(150)),
            ))
            .with_rule(PricingRule::new(
                d("2024-06-10"),
                d("2024-06-20"),
                RuleEffect::PercentageIncrease(dec!(50)),
            ));

        assert_eq!(
            resolve_daily_rate(&property, d("2024-06-15")).unwrap(),
            dec!(150)
        );
    }

    #[test]
    fn test_scenario_a_flat_rate() {
        // base nightly 100, no rules, 2024-06-01 .. 2024-06-04 => 3 nights, 300
        let property = Property::new("a", "A", dec!(100));
        let quote = calculate(&property, span("2024-06-01", "2024-06-04"), 2, &[], &[]).unwrap();
        assert_eq!(quote.nights, 3);
        assert_eq!(quote.base_total, dec!(300));
        assert_eq!(quote.total, dec!(300.00));
    }

    #[test]
    fn test_scenario_b_fixed_daily_mid_stay() {
        // fixed 150 covering only 2024-06-02 => rates 100, 150, 100 = 350
        let property = Property::new("a", "A", dec!(100)).with_rule(PricingRule::new(
            d("2024-06-02"),
            d("2024-06-03"),
            RuleEffect::FixedDaily(dec!(150)),
        ));
        let quote = calculate(&property, span("2024-06-01", "2024-06-04"), 2, &[], &[]).unwrap();
        assert_eq!(quote.base_total, dec!(350));
        assert_eq!(quote.total, dec!(350.00));
    }

    #[test]
    fn test_services_and_rounding() {
        let property = Property {
            base_nightly_rate: None,
            ..Property::new("a", "A", dec!(0))
        }
        .with_weekly_rate(dec!(100)); // 100/7 per night, repeating decimal
        let services = vec![
            ExtraService::new("cleaning", "a", "Final cleaning", dec!(45.50)),
            ExtraService::new("linen", "a", "Linen package", dec!(12.25)),
        ];
        let selected = vec![
            "cleaning".to_string(),
            "linen".to_string(),
            "missing".to_string(), // unknown ids are ignored
        ];

        let quote = calculate(
            &property,
            span("2024-06-01", "2024-06-08"),
            2,
            &services,
            &selected,
        )
        .unwrap();

        assert_eq!(quote.nights, 7);
        assert_eq!(quote.services_total, dec!(57.75));
        // 7 * (100/7) + 57.75 = 157.75, rounded once to 2dp
        assert_eq!(quote.total, dec!(157.75));
    }

    #[test]
    fn test_duplicate_service_selection_charged_once() {
        let property = Property::new("a", "A", dec!(100));
        let services = vec![ExtraService::new(
            "cleaning",
            "a",
            "Final cleaning",
            dec!(45.50),
        )];
        let selected = vec!["cleaning".to_string(), "cleaning".to_string()];

        let quote = calculate(
            &property,
            span("2024-06-01", "2024-06-02"),
            2,
            &services,
            &selected,
        )
        .unwrap();

        assert_eq!(quote.services_total, dec!(45.50));
        assert_eq!(quote.total, dec!(145.50));
    }

    #[test]
    fn test_calculation_is_deterministic() {
        let property = Property::new("a", "A", dec!(99.95)).with_rule(PricingRule::new(
            d("2024-06-01"),
            d("2024-06-10"),
            RuleEffect::PercentageIncrease(dec!(12.5)),
        ));
        let first = calculate(&property, span("2024-06-01", "2024-06-05"), 2, &[], &[]).unwrap();
        let second = calculate(&property, span("2024-06-01", "2024-06-05"), 2, &[], &[]).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.total, (first.base_total + first.services_total).round_dp(2));
    }
}
