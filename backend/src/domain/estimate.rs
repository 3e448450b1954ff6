//! Solar-installation estimate attached to a lead.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ids::LeadId;
use crate::domain::pricing::round2;

/// Sizing and cost inputs computed for a single lead.
///
/// ## Invariants
/// - An estimate belongs to exactly one lead; saves are upserts keyed by
///   `lead_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Estimate {
    #[schema(value_type = String)]
    pub lead_id: LeadId,
    pub panel_count: i32,
    pub roof_type: String,
    pub annual_consumption_kwh: f64,
    pub system_size_kw: f64,
    pub quoted_total: f64,
    pub updated_at: DateTime<Utc>,
}

/// Nominal output per panel used for sizing, in kW.
pub const PANEL_OUTPUT_KW: f64 = 0.44;

impl Estimate {
    /// Derive the system size from the panel count.
    #[must_use]
    pub fn sized(mut self) -> Self {
        self.system_size_kw = round2(f64::from(self.panel_count) * PANEL_OUTPUT_KW);
        self
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    #[test]
    fn sizing_derives_from_panel_count() {
        let estimate = Estimate {
            lead_id: LeadId::random(),
            panel_count: 10,
            roof_type: "tile".to_owned(),
            annual_consumption_kwh: 4500.0,
            system_size_kw: 0.0,
            quoted_total: 0.0,
            updated_at: Utc::now(),
        }
        .sized();
        assert_eq!(estimate.system_size_kw, 4.4);
    }
}
