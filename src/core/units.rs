use crate::input::PowerUnit;

pub const WATTS_PER_KILOWATT: u32 = 1_000;
pub const HOURS_PER_DAY: u32 = 24;
/// Flat month length used to normalise utility bills to a daily figure.
/// Billing periods vary between 28 and 31 days; quotes use the flat value
/// so two customers with the same bill get the same system.
pub const DAYS_PER_BILLING_MONTH: u32 = 30;
/// Mechanical-to-electrical conversion for motor loads quoted in
/// horsepower (1 hp = 745.7 W, rounded as commonly used on nameplates).
pub const KILOWATTS_PER_HORSEPOWER: f64 = 0.746;

/// Normalise a nameplate power figure to kilowatts.
pub fn power_to_kilowatts(value: f64, unit: PowerUnit) -> f64 {
    match unit {
        PowerUnit::Kilowatts => value,
        PowerUnit::Watts => value / WATTS_PER_KILOWATT as f64,
        PowerUnit::Horsepower => value * KILOWATTS_PER_HORSEPOWER,
    }
}
