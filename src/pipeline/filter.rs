//! Eligibility filtering over normalized trade records

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::common::types::{DateField, TradeRecord, TradeType};
use crate::config::types::FilterConfig;

/// Conjunction of optional eligibility bounds
///
/// Every bound left unset admits all records, so the default filter passes
/// everything through. Bounds are inclusive: a record exactly at
/// `minimum_value` or `earliest_date` is eligible.
#[derive(Debug, Clone, Default)]
pub struct TradeFilter {
    pub required_trade_type: Option<TradeType>,
    pub minimum_value: Option<Decimal>,
    pub earliest_date: Option<NaiveDate>,
    pub date_field: DateField,
}

impl TradeFilter {
    pub fn from_config(config: &FilterConfig) -> Self {
        Self {
            required_trade_type: config.required_trade_type,
            minimum_value: config.minimum_value,
            earliest_date: config.earliest_date,
            date_field: config.date_field,
        }
    }

    /// True when the record satisfies every configured bound
    pub fn matches(&self, record: &TradeRecord) -> bool {
        if let Some(required) = self.required_trade_type {
            if record.trade_type != required {
                return false;
            }
        }
        if let Some(minimum) = self.minimum_value {
            if record.value < minimum {
                return false;
            }
        }
        if let Some(earliest) = self.earliest_date {
            if record.date(self.date_field) < earliest {
                return false;
            }
        }
        true
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn record(trade_type: TradeType, value: Decimal, trade_date: &str) -> TradeRecord {
        TradeRecord {
            ticker: "ABC".to_string(),
            insider_name: "Doe John".to_string(),
            title: None,
            trade_type,
            price: dec!(10),
            quantity: 100,
            value,
            filing_date: NaiveDate::from_ymd_opt(2026, 3, 5).unwrap(),
            trade_date: trade_date.parse().unwrap(),
        }
    }

    fn purchase_filter() -> TradeFilter {
        TradeFilter {
            required_trade_type: Some(TradeType::Purchase),
            minimum_value: Some(dec!(50000)),
            earliest_date: Some(NaiveDate::from_ymd_opt(2026, 2, 1).unwrap()),
            date_field: DateField::TradeDate,
        }
    }

    #[test]
    fn default_filter_admits_everything() {
        let filter = TradeFilter::default();
        assert!(filter.matches(&record(TradeType::Purchase, dec!(1), "2001-01-01")));
        assert!(filter.matches(&record(TradeType::Sale, dec!(0), "1999-12-31")));
        assert!(filter.matches(&record(TradeType::Other, dec!(9999999), "2026-03-01")));
    }

    #[test]
    fn all_bounds_must_hold() {
        let filter = purchase_filter();
        assert!(filter.matches(&record(TradeType::Purchase, dec!(75000), "2026-03-01")));
        // Each bound violated in isolation.
        assert!(!filter.matches(&record(TradeType::Sale, dec!(75000), "2026-03-01")));
        assert!(!filter.matches(&record(TradeType::Purchase, dec!(49999), "2026-03-01")));
        assert!(!filter.matches(&record(TradeType::Purchase, dec!(75000), "2026-01-31")));
    }

    #[test]
    fn bounds_are_inclusive() {
        let filter = purchase_filter();
        assert!(filter.matches(&record(TradeType::Purchase, dec!(50000), "2026-02-01")));
    }

    #[test]
    fn date_bound_follows_the_configured_field() {
        let mut filter = purchase_filter();
        filter.earliest_date = Some(NaiveDate::from_ymd_opt(2026, 3, 3).unwrap());

        // Trade date 2026-03-01 is before the bound, filing date 2026-03-05
        // is after it. Which one decides depends on date_field.
        let rec = record(TradeType::Purchase, dec!(75000), "2026-03-01");
        assert!(!filter.matches(&rec));

        filter.date_field = DateField::FilingDate;
        assert!(filter.matches(&rec));
    }

    #[test]
    fn from_config_carries_every_bound() {
        let config = FilterConfig {
            required_trade_type: Some(TradeType::Sale),
            minimum_value: Some(dec!(10000)),
            earliest_date: Some(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()),
            date_field: DateField::FilingDate,
        };
        let filter = TradeFilter::from_config(&config);
        assert_eq!(filter.required_trade_type, Some(TradeType::Sale));
        assert_eq!(filter.minimum_value, Some(dec!(10000)));
        assert_eq!(
            filter.earliest_date,
            Some(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap())
        );
        assert_eq!(filter.date_field, DateField::FilingDate);
    }
}
