//! Price-calculation engine.
//!
//! Spreadsheet-style arithmetic over independently configured cost rows:
//! each row carries a base cost and a markup percentage, from which the
//! markup amount, the total excluding VAT, and the total including the fixed
//! 25% VAT are derived. All derived figures are rounded half-up to two
//! decimal places at computation time so persisted quotes match what the
//! customer saw.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ids::InstallerGroupId;

/// VAT multiplier applied on top of the ex-VAT total (fixed 25% rate).
pub const VAT_MULTIPLIER: f64 = 1.25;

/// Round to two decimal places, half away from zero.
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Coerce user-supplied numeric input to a cost figure.
///
/// Malformed input is coerced to zero rather than rejected, matching the
/// forgiving behaviour of the quote forms. Accepts a comma decimal separator.
#[must_use]
pub fn coerce_amount(raw: &str) -> f64 {
    let normalised = raw.trim().replace(',', ".");
    f64::from_str(&normalised).unwrap_or(0.0)
}

/// Derived figures for a single price row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    pub markup: f64,
    pub total_ex_vat: f64,
    pub total_incl_vat: f64,
}

/// Compute the markup/VAT breakdown for one row.
#[must_use]
pub fn breakdown(cost: f64, markup_percent: f64) -> PriceBreakdown {
    let markup = round2(cost * markup_percent / 100.0);
    let total_ex_vat = round2(cost + markup);
    let total_incl_vat = round2(total_ex_vat * VAT_MULTIPLIER);
    PriceBreakdown {
        markup,
        total_ex_vat,
        total_incl_vat,
    }
}

/// Category a price row belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PriceCategory {
    RoofType,
    Electrician,
    Additional,
}

impl PriceCategory {
    /// Every category in display order.
    pub const ALL: [Self; 3] = [Self::RoofType, Self::Electrician, Self::Additional];

    /// Stable storage representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RoofType => "roof_type",
            Self::Electrician => "electrician",
            Self::Additional => "additional",
        }
    }
}

impl fmt::Display for PriceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error raised when parsing an unknown category string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown price category: {}", self.0)
    }
}

impl std::error::Error for UnknownCategory {}

impl FromStr for PriceCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "roof_type" => Ok(Self::RoofType),
            "electrician" => Ok(Self::Electrician),
            "additional" => Ok(Self::Additional),
            other => Err(UnknownCategory(other.to_owned())),
        }
    }
}

/// A configured cost row, keyed by (installer group, category, name).
///
/// Saves are independent upserts on that natural key; no transaction spans
/// multiple rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PriceItem {
    #[schema(value_type = String)]
    pub installer_group_id: InstallerGroupId,
    pub category: PriceCategory,
    pub name: String,
    pub cost: f64,
    pub markup_percent: f64,
    pub updated_at: DateTime<Utc>,
}

impl PriceItem {
    /// Derived figures for this row.
    #[must_use]
    pub fn breakdown(&self) -> PriceBreakdown {
        breakdown(self.cost, self.markup_percent)
    }
}

/// One computed row of a price table.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PriceRow {
    pub category: PriceCategory,
    pub name: String,
    pub cost: f64,
    pub markup_percent: f64,
    #[serde(flatten)]
    pub figures: PriceBreakdown,
}

impl From<PriceItem> for PriceRow {
    fn from(item: PriceItem) -> Self {
        let figures = item.breakdown();
        Self {
            category: item.category,
            name: item.name,
            cost: item.cost,
            markup_percent: item.markup_percent,
            figures,
        }
    }
}

/// A full price table for an installer group: rows grouped per category plus
/// the aggregated quote total.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PriceTable {
    #[schema(value_type = String)]
    pub installer_group_id: InstallerGroupId,
    pub rows: Vec<PriceRow>,
    pub quote_total: f64,
}

impl PriceTable {
    /// Build a table from configured items, ordering rows by category then
    /// name and summing the VAT-inclusive totals.
    #[must_use]
    pub fn compute(installer_group_id: InstallerGroupId, items: Vec<PriceItem>) -> Self {
        let mut rows: Vec<PriceRow> = items.into_iter().map(PriceRow::from).collect();
        rows.sort_by(|a, b| {
            (a.category.as_str(), a.name.as_str()).cmp(&(b.category.as_str(), b.name.as_str()))
        });
        let quote_total = round2(rows.iter().map(|row| row.figures.total_incl_vat).sum());
        Self {
            installer_group_id,
            rows,
            quote_total,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::worked_example(1000.0, 20.0, 200.0, 1200.0, 1500.0)]
    #[case::zero_cost(0.0, 35.0, 0.0, 0.0, 0.0)]
    #[case::zero_markup(800.0, 0.0, 0.0, 800.0, 1000.0)]
    #[case::fractional(99.99, 12.5, 12.5, 112.49, 140.61)]
    fn breakdown_matches_expected_figures(
        #[case] cost: f64,
        #[case] pct: f64,
        #[case] markup: f64,
        #[case] ex_vat: f64,
        #[case] incl_vat: f64,
    ) {
        let figures = breakdown(cost, pct);
        assert_eq!(figures.markup, markup);
        assert_eq!(figures.total_ex_vat, ex_vat);
        assert_eq!(figures.total_incl_vat, incl_vat);
    }

    #[test]
    fn incl_vat_equals_ex_vat_times_rate_for_all_rows() {
        for (cost, pct) in [(1234.56, 17.0), (10.0, 3.0), (55_000.0, 42.0)] {
            let figures = breakdown(cost, pct);
            assert_eq!(
                figures.total_incl_vat,
                round2(figures.total_ex_vat * VAT_MULTIPLIER)
            );
        }
    }

    #[rstest]
    #[case("1000", 1000.0)]
    #[case(" 12.5 ", 12.5)]
    #[case("12,5", 12.5)]
    #[case("", 0.0)]
    #[case("abc", 0.0)]
    #[case("1.2.3", 0.0)]
    fn malformed_amounts_coerce_to_zero(#[case] raw: &str, #[case] expected: f64) {
        assert_eq!(coerce_amount(raw), expected);
    }

    #[test]
    fn table_sums_vat_inclusive_totals() {
        let group = InstallerGroupId::random();
        let now = Utc::now();
        let item = |category, name: &str, cost, pct| PriceItem {
            installer_group_id: group,
            category,
            name: name.to_owned(),
            cost,
            markup_percent: pct,
            updated_at: now,
        };
        let table = PriceTable::compute(
            group,
            vec![
                item(PriceCategory::Electrician, "Panel hookup", 500.0, 10.0),
                item(PriceCategory::RoofType, "Tile roof", 1000.0, 20.0),
            ],
        );
        // 500 * 1.10 * 1.25 = 687.50; 1000 * 1.20 * 1.25 = 1500.00
        assert_eq!(table.quote_total, 2187.50);
        assert_eq!(table.rows.len(), 2);
    }

    #[test]
    fn table_orders_rows_by_category_then_name() {
        let group = InstallerGroupId::random();
        let now = Utc::now();
        let item = |category, name: &str| PriceItem {
            installer_group_id: group,
            category,
            name: name.to_owned(),
            cost: 100.0,
            markup_percent: 0.0,
            updated_at: now,
        };
        let table = PriceTable::compute(
            group,
            vec![
                item(PriceCategory::RoofType, "Tile roof"),
                item(PriceCategory::Additional, "Scaffolding"),
                item(PriceCategory::Additional, "Bird netting"),
            ],
        );
        let names: Vec<&str> = table.rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Bird netting", "Scaffolding", "Tile roof"]);
    }
}
