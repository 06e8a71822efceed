use crate::core::load::{DailyDemand, DiversityFactor};
use crate::core::units::HOURS_PER_DAY;
use crate::errors::SizingError;
use crate::input::ApplianceLoad;

/// Aggregate an itemised appliance schedule into daily demand figures.
///
/// Produces the nameplate daily sum, the essential-flagged subtotal, and
/// the diversity-adjusted total the rest of the sizing pipeline consumes.
/// Pure function of the entries plus the current diversity setting.
pub fn aggregate(
    loads: &[ApplianceLoad],
    diversity: DiversityFactor,
) -> Result<DailyDemand, SizingError> {
    if loads.is_empty() {
        return Err(SizingError::EmptyLoad);
    }
    for load in loads {
        validate_load(load)?;
    }

    let raw_daily_kwh: f64 = loads.iter().map(ApplianceLoad::daily_kwh).sum();
    let essential_daily_kwh: f64 = loads
        .iter()
        .filter(|load| load.is_essential)
        .map(ApplianceLoad::daily_kwh)
        .sum();

    // The essential subtotal is a share of the adjusted total, so the same
    // reduction applies to both.
    Ok(DailyDemand {
        total_daily_kwh: raw_daily_kwh,
        adjusted_daily_kwh: diversity.apply(raw_daily_kwh),
        essential_daily_kwh: Some(diversity.apply(essential_daily_kwh)),
    })
}

fn validate_load(load: &ApplianceLoad) -> Result<(), SizingError> {
    let label = load.name.as_deref().unwrap_or("appliance");
    if load.power_value <= 0. {
        return Err(SizingError::invalid(format!(
            "Power for {label} must be positive (got {})",
            load.power_value
        )));
    }
    if load.quantity == 0 {
        return Err(SizingError::invalid(format!(
            "Quantity for {label} must be at least 1"
        )));
    }
    if !(0. ..=HOURS_PER_DAY as f64).contains(&load.hours_per_day) {
        return Err(SizingError::invalid(format!(
            "Hours per day for {label} must be between 0 and {HOURS_PER_DAY} (got {})",
            load.hours_per_day
        )));
    }
    Ok(())
}
