use crate::core::battery::BatteryPolicy;
use crate::core::inverter::InverterPolicy;
use crate::core::load::DailyDemand;
use crate::core::panels::PanelProduct;
use crate::core::units::WATTS_PER_KILOWATT;
use crate::errors::SizingError;
use crate::input::{BackupParameters, SystemType};
use serde::{Deserialize, Serialize};

/// This module contains the sizing calculator, the algorithmic centre of
/// the quoting tool.

/// Cumulative derate covering inverter conversion, wiring, temperature and
/// soiling losses. Matches the deration the original quoting sheets were
/// calibrated against for rooftop installations in hot climates.
const DEFAULT_SYSTEM_EFFICIENCY: f64 = 0.72;
/// Safety margin on the computed array size covering panel degradation and
/// variable weather.
const DEFAULT_DESIGN_FACTOR: f64 = 1.15;
/// Target PV-array oversizing relative to the inverter AC rating, reducing
/// clipping losses without paying for inverter headroom that is never used.
const DEFAULT_DC_AC_RATIO: f64 = 1.2;
/// Multiplier on panel footprint covering inter-row walkways and tilt
/// clearance. Physical installations cannot pack panels edge to edge.
const DEFAULT_PANEL_SPACING_FACTOR: f64 = 1.2;

/// Tunable design assumptions behind a quote.
///
/// These are configuration, not literals: operators adjust them per market
/// without code changes, and every value used is echoed into the result so
/// a quote can be reproduced later.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct DesignParameters {
    /// Derated fraction of nameplate generation actually delivered.
    pub system_efficiency: f64,
    /// Safety multiplier applied to the computed system size (> 1.0).
    pub design_factor: f64,
    /// PV nameplate capacity over inverter AC rating.
    pub dc_ac_ratio: f64,
    /// Roof-area margin over raw panel footprint.
    pub panel_spacing_factor: f64,
    pub inverter: InverterPolicy,
    pub battery: BatteryPolicy,
}

impl Default for DesignParameters {
    fn default() -> Self {
        Self {
            system_efficiency: DEFAULT_SYSTEM_EFFICIENCY,
            design_factor: DEFAULT_DESIGN_FACTOR,
            dc_ac_ratio: DEFAULT_DC_AC_RATIO,
            panel_spacing_factor: DEFAULT_PANEL_SPACING_FACTOR,
            inverter: Default::default(),
            battery: Default::default(),
        }
    }
}

impl DesignParameters {
    fn validate(&self) -> Result<(), SizingError> {
        if !(0. ..=1.).contains(&self.system_efficiency) || self.system_efficiency == 0. {
            return Err(SizingError::invalid(format!(
                "System efficiency must be in (0, 1] (got {})",
                self.system_efficiency
            )));
        }
        if self.design_factor < 1. {
            return Err(SizingError::invalid(format!(
                "Design factor must be at least 1 (got {})",
                self.design_factor
            )));
        }
        if self.dc_ac_ratio <= 0. {
            return Err(SizingError::invalid(format!(
                "DC/AC ratio must be positive (got {})",
                self.dc_ac_ratio
            )));
        }
        if self.panel_spacing_factor < 1. {
            return Err(SizingError::invalid(format!(
                "Panel spacing factor must be at least 1 (got {})",
                self.panel_spacing_factor
            )));
        }
        if self.inverter.step_kw <= 0. || self.inverter.floor_kw < 0. {
            return Err(SizingError::invalid(
                "Inverter policy must have a positive step and non-negative floor".to_owned(),
            ));
        }
        if !(0. ..=1.).contains(&self.battery.depth_of_discharge)
            || self.battery.depth_of_discharge == 0.
        {
            return Err(SizingError::invalid(format!(
                "Battery depth of discharge must be in (0, 1] (got {})",
                self.battery.depth_of_discharge
            )));
        }
        if matches!(self.battery.module_size_kwh, Some(module_kwh) if module_kwh <= 0.) {
            return Err(SizingError::invalid(
                "Battery module size must be positive when set".to_owned(),
            ));
        }
        Ok(())
    }
}

/// The full output of one sizing calculation.
///
/// One result is live per project; recalculation overwrites it wholesale so
/// stale fields cannot survive a parameter change.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct SizingResult {
    pub project_id: String,
    pub location: String,
    pub peak_sun_hours: f64,
    /// Nameplate daily demand before the diversity reduction.
    pub total_daily_kwh: f64,
    /// Energy the array must generate per day to deliver the adjusted
    /// demand after system losses.
    pub effective_daily_kwh: f64,
    pub panel_brand: String,
    pub panel_wattage: f64,
    pub system_size_kw: f64,
    pub number_of_panels: u32,
    pub roof_area_m2: f64,
    pub min_inverter_kw: f64,
    /// Commercial size offered in the quote; never below `min_inverter_kw`.
    pub inverter_size_kw: f64,
    pub backup_hours: Option<f64>,
    pub essential_load_percent: Option<f64>,
    /// None for grid-tied systems and for a zero backup window.
    pub battery_capacity_kwh: Option<f64>,
    pub system_efficiency: f64,
    pub dc_ac_ratio: f64,
    pub design_factor: f64,
}

impl SizingResult {
    /// The design margin as a display percentage, e.g. 15.0 for a design
    /// factor of 1.15.
    pub fn design_margin_percent(&self) -> f64 {
        (self.design_factor - 1.) * 100.
    }
}

/// Size a PV system for one project.
///
/// Pure function of the normalised demand, the resolved irradiance, the
/// panel product and the design parameters; all failure modes are caller
/// input errors reported back as values.
pub fn calculate(
    project_id: &str,
    location: &str,
    peak_sun_hours: f64,
    demand: &DailyDemand,
    panel: &PanelProduct,
    system_type: SystemType,
    backup: Option<&BackupParameters>,
    design: &DesignParameters,
) -> Result<SizingResult, SizingError> {
    design.validate()?;
    if demand.adjusted_daily_kwh <= 0. {
        return Err(SizingError::invalid(format!(
            "Daily energy demand must be positive (got {} kWh)",
            demand.adjusted_daily_kwh
        )));
    }
    if peak_sun_hours <= 0. {
        return Err(SizingError::invalid(format!(
            "Peak sun hours must be positive (got {peak_sun_hours})"
        )));
    }
    if panel.wattage_w <= 0. {
        return Err(SizingError::invalid(format!(
            "Panel wattage must be positive (got {})",
            panel.wattage_w
        )));
    }

    let effective_daily_kwh = demand.adjusted_daily_kwh / design.system_efficiency;
    let system_size_kw = effective_daily_kwh / peak_sun_hours * design.design_factor;
    // A fractional panel is not purchasable, so always round up.
    let number_of_panels =
        (system_size_kw * WATTS_PER_KILOWATT as f64 / panel.wattage_w).ceil() as u32;
    let roof_area_m2 = number_of_panels as f64 * panel.unit_area_m2 * design.panel_spacing_factor;
    let min_inverter_kw = system_size_kw / design.dc_ac_ratio;
    let inverter_size_kw = design.inverter.select(min_inverter_kw);

    let backup_requirement = battery_requirement(demand, system_type, backup, design)?;

    Ok(SizingResult {
        project_id: project_id.to_owned(),
        location: location.to_owned(),
        peak_sun_hours,
        total_daily_kwh: demand.total_daily_kwh,
        effective_daily_kwh,
        panel_brand: panel.brand.clone(),
        panel_wattage: panel.wattage_w,
        system_size_kw,
        number_of_panels,
        roof_area_m2,
        min_inverter_kw,
        inverter_size_kw,
        backup_hours: backup_requirement.map(|(hours, _, _)| hours),
        essential_load_percent: backup_requirement.map(|(_, percent, _)| percent),
        battery_capacity_kwh: backup_requirement.and_then(|(_, _, capacity)| capacity),
        system_efficiency: design.system_efficiency,
        dc_ac_ratio: design.dc_ac_ratio,
        design_factor: design.design_factor,
    })
}

/// Battery need as (backup hours, essential percent, capacity); None for
/// grid-tied systems, capacity None for a zero backup window.
fn battery_requirement(
    demand: &DailyDemand,
    system_type: SystemType,
    backup: Option<&BackupParameters>,
    design: &DesignParameters,
) -> Result<Option<(f64, f64, Option<f64>)>, SizingError> {
    if system_type.is_grid_tied() {
        return Ok(None);
    }
    let backup = backup.ok_or_else(|| {
        SizingError::invalid(
            "Backup hours and essential load percent are required for hybrid and off-grid systems"
                .to_owned(),
        )
    })?;
    if backup.backup_hours < 0. {
        return Err(SizingError::invalid(format!(
            "Backup hours must not be negative (got {})",
            backup.backup_hours
        )));
    }
    if !(0. ..=1.).contains(&backup.essential_load_percent) {
        return Err(SizingError::invalid(format!(
            "Essential load percent must be between 0 and 1 (got {})",
            backup.essential_load_percent
        )));
    }
    if backup.backup_hours == 0. {
        return Ok(Some((0., backup.essential_load_percent, None)));
    }

    // The appliance-level essential subtotal is more accurate than a flat
    // share of total demand, so it wins whenever the schedule flagged any
    // essential loads.
    let essential_daily_kwh = match demand.essential_daily_kwh {
        Some(essential) if essential > 0. => essential,
        _ => demand.adjusted_daily_kwh * backup.essential_load_percent,
    };
    let capacity_kwh = design
        .battery
        .capacity_kwh(essential_daily_kwh, backup.backup_hours);
    Ok(Some((
        backup.backup_hours,
        backup.essential_load_percent,
        Some(capacity_kwh),
    )))
}
