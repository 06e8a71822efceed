use serde::{Deserialize, Serialize};

/// Commercial inverter offering policy.
///
/// Quoted inverters come in fixed kW steps with a floor at the smallest
/// unit offered in this market, so the selected size can exceed the raw
/// minimum rating; both figures are kept in the result so the difference
/// can be explained to the customer.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct InverterPolicy {
    /// Commercial size increment, in kW.
    pub step_kw: f64,
    /// Smallest commercially offered unit, in kW.
    pub floor_kw: f64,
}

impl Default for InverterPolicy {
    fn default() -> Self {
        Self {
            step_kw: 0.5,
            floor_kw: 6.5,
        }
    }
}

impl InverterPolicy {
    /// Round a minimum rating up to the next commercially offered size.
    pub fn select(&self, min_inverter_kw: f64) -> f64 {
        let stepped = (min_inverter_kw / self.step_kw).ceil() * self.step_kw;
        stepped.max(self.floor_kw)
    }
}
