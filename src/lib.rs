#![allow(clippy::too_many_arguments)]

//! Sizing engine behind a solar photovoltaic quoting tool: derives the
//! required array capacity, panel count, inverter rating and (for
//! non-grid-tied systems) battery capacity from a customer's appliance
//! schedule or monthly utility bill.

pub mod core;
pub mod errors;
pub mod input;
pub mod store;

#[macro_use]
extern crate is_close;

use crate::core::irradiance::PeakSunHoursTable;
use crate::core::load::{appliances, monthly, DailyDemand, DiversityFactor};
use crate::core::panels::PanelCatalog;
use crate::core::sizing::{calculate, DesignParameters, SizingResult};
use crate::errors::SizingError;
use crate::input::{DemandInput, SizingInput};
use crate::store::SizingResultStore;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Operator-tunable settings shared across calculations.
///
/// Read at calculation time so a change applies to the next quote without a
/// restart; the settings store collaborator owns the writes.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct OperatorSettings {
    pub diversity_factor: DiversityFactor,
    pub design: DesignParameters,
}

/// The engine wiring the reference data, operator settings and result
/// store behind the two calls collaborators use: `compute_sizing` and
/// `get_sizing`.
#[derive(Debug)]
pub struct SizingEngine {
    sun_hours: PeakSunHoursTable,
    panels: PanelCatalog,
    settings: Arc<RwLock<OperatorSettings>>,
    store: SizingResultStore,
}

impl SizingEngine {
    pub fn new(
        sun_hours: PeakSunHoursTable,
        panels: PanelCatalog,
        settings: OperatorSettings,
    ) -> Self {
        Self {
            sun_hours,
            panels,
            settings: Arc::new(RwLock::new(settings)),
            store: SizingResultStore::new(),
        }
    }

    /// Handle on the shared settings, for the settings store collaborator.
    pub fn settings(&self) -> Arc<RwLock<OperatorSettings>> {
        self.settings.clone()
    }

    /// Run a sizing calculation for a project and persist the result,
    /// overwriting any previous one. Either calculation path (itemised
    /// appliances or monthly figures) lands in the same normalised demand
    /// before sizing.
    pub fn compute_sizing(&self, input: &SizingInput) -> Result<SizingResult, SizingError> {
        let settings = *self.settings.read();
        let demand = resolve_demand(&input.demand, settings.diversity_factor)?;
        let location = input.location.as_deref().unwrap_or_default();
        let peak_sun_hours = self.sun_hours.resolve(location)?;
        let panel = self.panels.find(&input.panel_brand)?;

        let result = calculate(
            &input.project_id,
            location,
            peak_sun_hours,
            &demand,
            panel,
            input.system_type,
            input.backup.as_ref(),
            &settings.design,
        )?;
        debug!(
            project_id = %input.project_id,
            system_size_kw = result.system_size_kw,
            number_of_panels = result.number_of_panels,
            "sizing calculated"
        );
        self.store.upsert(result.clone());
        Ok(result)
    }

    /// The latest stored result for a project, if one has been calculated.
    pub fn get_sizing(&self, project_id: &str) -> Option<SizingResult> {
        self.store.get(project_id)
    }

    /// Discard a project's stored result when the project itself goes away.
    pub fn remove_sizing(&self, project_id: &str) -> Option<SizingResult> {
        self.store.remove(project_id)
    }
}

/// Normalise either input shape to the canonical daily demand figures.
fn resolve_demand(
    demand: &DemandInput,
    diversity: DiversityFactor,
) -> Result<DailyDemand, SizingError> {
    match demand {
        DemandInput::Appliances { loads } => appliances::aggregate(loads, diversity),
        DemandInput::Monthly {
            monthly_kwh,
            monthly_bill,
            tariff,
        } => monthly::normalize(*monthly_kwh, *monthly_bill, *tariff),
    }
}
