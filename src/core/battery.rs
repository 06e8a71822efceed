use crate::core::units::HOURS_PER_DAY;
use serde::{Deserialize, Serialize};

/// Battery sizing policy for hybrid and off-grid systems.
///
/// The usable energy requirement is the average hourly essential demand
/// multiplied by the requested backup duration. Nameplate capacity derates
/// that by the usable depth of discharge. Rounding up to whole commercial
/// modules is supported but disabled by default; the module size offered by
/// the original vendor backend is unconfirmed.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatteryPolicy {
    /// Usable fraction of nameplate capacity (between 0 & 1).
    pub depth_of_discharge: f64,
    /// Round nameplate capacity up to whole modules of this size when set.
    pub module_size_kwh: Option<f64>,
}

impl Default for BatteryPolicy {
    fn default() -> Self {
        Self {
            depth_of_discharge: 0.9,
            module_size_kwh: None,
        }
    }
}

impl BatteryPolicy {
    /// Nameplate capacity required to carry the essential share of demand
    /// for the requested number of hours.
    pub fn capacity_kwh(&self, essential_daily_kwh: f64, backup_hours: f64) -> f64 {
        let hourly_essential_kw = essential_daily_kwh / HOURS_PER_DAY as f64;
        let usable_kwh = hourly_essential_kw * backup_hours;
        let nameplate_kwh = usable_kwh / self.depth_of_discharge;
        match self.module_size_kwh {
            Some(module_kwh) => (nameplate_kwh / module_kwh).ceil() * module_kwh,
            None => nameplate_kwh,
        }
    }
}
