use crate::core::units::power_to_kilowatts;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use serde_valid::Validate;
use std::io::Read;

/// This module contains the input model for a sizing request. The two
/// consumption paths (itemised appliances, monthly figures) are variants of
/// one tagged union so that both feed a single normalisation step.

pub fn ingest_sizing_input(json: impl Read) -> anyhow::Result<SizingInput> {
    let input: SizingInput =
        serde_json::from_reader(json).context("Parsing the sizing input document failed")?;
    input
        .validate()
        .map_err(|errors| anyhow::anyhow!("Sizing input document was invalid: {errors}"))?;
    Ok(input)
}

/// One sizing request for a project.
#[derive(Clone, Debug, Deserialize, Serialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct SizingInput {
    pub project_id: String,
    /// Free-text location, resolved against the peak sun hours table.
    pub location: Option<String>,
    /// Brand key into the panel catalog.
    pub panel_brand: String,
    pub system_type: SystemType,
    /// Required for hybrid and off-grid systems; ignored for grid-tied.
    #[validate]
    pub backup: Option<BackupParameters>,
    #[validate]
    pub demand: DemandInput,
}

/// The consumption evidence a sizing request is based on.
#[derive(Clone, Debug, Deserialize, Serialize, Validate)]
#[serde(tag = "basis", rename_all = "snake_case")]
pub enum DemandInput {
    /// Itemised appliance entries; the diversity factor applies to these.
    Appliances {
        #[validate]
        loads: Vec<ApplianceLoad>,
    },
    /// Figures from a utility bill; already realised consumption, so no
    /// diversity reduction is applied.
    Monthly {
        #[serde(default)]
        monthly_kwh: Option<f64>,
        #[serde(default)]
        monthly_bill: Option<f64>,
        #[serde(default)]
        tariff: Option<f64>,
    },
}

/// One electrical load entry in a customer's appliance schedule.
#[derive(Clone, Debug, Deserialize, Serialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ApplianceLoad {
    /// Label carried through to quote line items.
    #[serde(default)]
    pub name: Option<String>,
    #[validate(exclusive_minimum = 0.)]
    pub power_value: f64,
    pub power_unit: PowerUnit,
    #[validate(minimum = 1)]
    pub quantity: u32,
    #[validate(minimum = 0.)]
    #[validate(maximum = 24.)]
    pub hours_per_day: f64,
    /// Whether a battery must carry this load during an outage.
    #[serde(default)]
    pub is_essential: bool,
}

impl ApplianceLoad {
    /// Nameplate power of one unit, normalised to kW.
    pub fn power_kw(&self) -> f64 {
        power_to_kilowatts(self.power_value, self.power_unit)
    }

    /// Nameplate energy demand of this entry over a day, in kWh.
    pub fn daily_kwh(&self) -> f64 {
        self.power_kw() * self.quantity as f64 * self.hours_per_day
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerUnit {
    Watts,
    Kilowatts,
    Horsepower,
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemType {
    GridTied,
    Hybrid,
    OffGrid,
}

impl SystemType {
    /// Grid-tied systems have no battery, whatever backup figures were sent.
    pub fn is_grid_tied(&self) -> bool {
        matches!(self, Self::GridTied)
    }
}

/// Outage-backup requirements for hybrid and off-grid systems.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct BackupParameters {
    #[validate(minimum = 0.)]
    pub backup_hours: f64,
    /// Fraction of total demand the battery must support during an outage.
    #[validate(minimum = 0.)]
    #[validate(maximum = 1.)]
    pub essential_load_percent: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;
    use serde_json::json;

    #[rstest]
    fn should_ingest_appliance_based_input() {
        let document = json!({
            "project_id": "prj-17",
            "location": "Accra",
            "panel_brand": "Helios 570",
            "system_type": "hybrid",
            "backup": {"backup_hours": 6., "essential_load_percent": 0.4},
            "demand": {
                "basis": "appliances",
                "loads": [
                    {"name": "Fridge", "power_value": 200., "power_unit": "watts", "quantity": 1, "hours_per_day": 10., "is_essential": true},
                    {"power_value": 1., "power_unit": "kilowatts", "quantity": 2, "hours_per_day": 4.}
                ]
            }
        });
        let input = ingest_sizing_input(document.to_string().as_bytes()).unwrap();
        assert_eq!(input.system_type, SystemType::Hybrid);
        let DemandInput::Appliances { loads } = &input.demand else {
            panic!("expected appliance-based demand");
        };
        assert_eq!(loads.len(), 2);
        assert_eq!(loads[0].daily_kwh(), 2.);
        assert_eq!(loads[1].daily_kwh(), 8.);
        assert!(loads[0].is_essential);
        assert!(!loads[1].is_essential);
    }

    #[rstest]
    fn should_ingest_monthly_based_input() {
        let document = json!({
            "project_id": "prj-18",
            "location": "Kumasi",
            "panel_brand": "Helios 570",
            "system_type": "grid_tied",
            "backup": null,
            "demand": {"basis": "monthly", "monthly_kwh": 300.}
        });
        let input = ingest_sizing_input(document.to_string().as_bytes()).unwrap();
        let DemandInput::Monthly {
            monthly_kwh,
            monthly_bill,
            tariff,
        } = input.demand
        else {
            panic!("expected monthly-based demand");
        };
        assert_eq!(monthly_kwh, Some(300.));
        assert_eq!(monthly_bill, None);
        assert_eq!(tariff, None);
    }

    #[rstest]
    fn should_reject_out_of_range_hours_per_day() {
        let document = json!({
            "project_id": "prj-19",
            "location": "Accra",
            "panel_brand": "Helios 570",
            "system_type": "grid_tied",
            "backup": null,
            "demand": {
                "basis": "appliances",
                "loads": [{"power_value": 200., "power_unit": "watts", "quantity": 1, "hours_per_day": 25.}]
            }
        });
        assert!(ingest_sizing_input(document.to_string().as_bytes()).is_err());
    }

    #[rstest]
    fn should_reject_unknown_fields() {
        let document = json!({
            "project_id": "prj-20",
            "location": "Accra",
            "panel_brand": "Helios 570",
            "system_type": "grid_tied",
            "backup": null,
            "demand": {"basis": "monthly", "monthly_kwh": 300.},
            "discount_rate": 0.1
        });
        assert!(ingest_sizing_input(document.to_string().as_bytes()).is_err());
    }

    #[rstest]
    #[case(500., PowerUnit::Watts, 3, 4., 6.)]
    #[case(0.5, PowerUnit::Kilowatts, 3, 4., 6.)]
    #[case(1., PowerUnit::Horsepower, 1, 10., 7.46)]
    fn should_derive_daily_kwh(
        #[case] power_value: f64,
        #[case] power_unit: PowerUnit,
        #[case] quantity: u32,
        #[case] hours_per_day: f64,
        #[case] expected_kwh: f64,
    ) {
        let load = ApplianceLoad {
            name: None,
            power_value,
            power_unit,
            quantity,
            hours_per_day,
            is_essential: false,
        };
        assert_eq!(load.daily_kwh(), expected_kwh);
    }
}
