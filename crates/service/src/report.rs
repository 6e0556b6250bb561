//! In-memory aggregation for the donations report.
//!
//! The handler fetches the filtered join and hands the rows here; grouping
//! stays pure so it is trivially unit-testable.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

pub const UNSPECIFIED: &str = "Unspecified";

/// One donation row as the report sees it.
#[derive(Debug, Clone)]
pub struct DonationRecord {
    pub donation_date: NaiveDate,
    pub amount_ml: i32,
    pub center: Option<String>,
    pub blood_type: Option<String>,
}

#[derive(Debug, Default, Serialize, PartialEq)]
pub struct DonationStats {
    pub total_donations: usize,
    pub total_ml: i64,
    pub by_blood_type: BTreeMap<String, u64>,
    pub by_center: BTreeMap<String, u64>,
    pub by_month: BTreeMap<String, u64>,
}

/// Count totals and per-group frequencies; months key as `YYYY-MM`.
pub fn aggregate(records: &[DonationRecord]) -> DonationStats {
    let mut stats = DonationStats { total_donations: records.len(), ..Default::default() };
    for record in records {
        stats.total_ml += i64::from(record.amount_ml);
        let blood = record.blood_type.clone().unwrap_or_else(|| UNSPECIFIED.to_string());
        let center = record.center.clone().unwrap_or_else(|| UNSPECIFIED.to_string());
        let month = format!("{:04}-{:02}", record.donation_date.year(), record.donation_date.month());
        *stats.by_blood_type.entry(blood).or_insert(0) += 1;
        *stats.by_center.entry(center).or_insert(0) += 1;
        *stats.by_month.entry(month).or_insert(0) += 1;
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: &str, ml: i32, center: Option<&str>, blood: Option<&str>) -> DonationRecord {
        DonationRecord {
            donation_date: date.parse().unwrap(),
            amount_ml: ml,
            center: center.map(String::from),
            blood_type: blood.map(String::from),
        }
    }

    #[test]
    fn empty_input_yields_zeroed_stats() {
        let stats = aggregate(&[]);
        assert_eq!(stats, DonationStats::default());
    }

    #[test]
    fn groups_by_type_center_and_month() {
        let stats = aggregate(&[
            record("2024-03-10", 450, Some("Central"), Some("O+")),
            record("2024-03-22", 500, Some("Central"), Some("A-")),
            record("2024-04-01", 450, Some("North"), Some("O+")),
        ]);
        assert_eq!(stats.total_donations, 3);
        assert_eq!(stats.total_ml, 1400);
        assert_eq!(stats.by_blood_type["O+"], 2);
        assert_eq!(stats.by_blood_type["A-"], 1);
        assert_eq!(stats.by_center["Central"], 2);
        assert_eq!(stats.by_month["2024-03"], 2);
        assert_eq!(stats.by_month["2024-04"], 1);
    }

    #[test]
    fn missing_fields_group_under_unspecified() {
        let stats = aggregate(&[record("2024-01-05", 300, None, None)]);
        assert_eq!(stats.by_blood_type[UNSPECIFIED], 1);
        assert_eq!(stats.by_center[UNSPECIFIED], 1);
    }
}
