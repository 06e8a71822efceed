use crate::core::load::DailyDemand;
use crate::core::units::DAYS_PER_BILLING_MONTH;
use crate::errors::SizingError;

/// Normalise a monthly consumption figure, or a monthly bill plus tariff,
/// into the same daily-kWh unit the appliance aggregator produces.
///
/// A metered kWh figure wins over a bill when both are supplied, being the
/// more direct measurement. Historical consumption already reflects
/// realised simultaneous usage, so the diversity factor does not apply on
/// this path.
pub fn normalize(
    monthly_kwh: Option<f64>,
    monthly_bill: Option<f64>,
    tariff: Option<f64>,
) -> Result<DailyDemand, SizingError> {
    let monthly_kwh = match (monthly_kwh, monthly_bill, tariff) {
        (Some(kwh), _, _) => kwh,
        (None, Some(bill), Some(tariff)) => {
            if tariff <= 0. {
                return Err(SizingError::insufficient(format!(
                    "tariff must be positive to derive consumption from a bill (got {tariff})"
                )));
            }
            bill / tariff
        }
        (None, Some(_), None) => {
            return Err(SizingError::insufficient(
                "a monthly bill needs a tariff to derive consumption".to_owned(),
            ));
        }
        (None, None, _) => {
            return Err(SizingError::insufficient(
                "supply monthly_kwh, or monthly_bill together with tariff".to_owned(),
            ));
        }
    };

    let daily_kwh = monthly_kwh / DAYS_PER_BILLING_MONTH as f64;
    Ok(DailyDemand {
        total_daily_kwh: daily_kwh,
        adjusted_daily_kwh: daily_kwh,
        essential_daily_kwh: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn should_normalise_metered_consumption() {
        let demand = normalize(Some(300.), None, None).unwrap();
        assert_eq!(demand.adjusted_daily_kwh, 10.);
        assert_eq!(demand.total_daily_kwh, 10.);
        assert_eq!(demand.essential_daily_kwh, None);
    }

    #[rstest]
    fn should_derive_consumption_from_bill_and_tariff() {
        let demand = normalize(None, Some(500.), Some(2.)).unwrap();
        assert_relative_eq!(demand.adjusted_daily_kwh, 500. / 2. / 30., epsilon = 1e-9);
    }

    #[rstest]
    fn metered_consumption_should_win_over_bill() {
        let demand = normalize(Some(300.), Some(500.), Some(2.)).unwrap();
        assert_eq!(demand.adjusted_daily_kwh, 10.);
    }

    #[rstest]
    #[case(None, None, None)]
    #[case(None, Some(500.), None)]
    #[case(None, None, Some(2.))]
    fn missing_input_should_be_rejected(
        #[case] monthly_kwh: Option<f64>,
        #[case] monthly_bill: Option<f64>,
        #[case] tariff: Option<f64>,
    ) {
        assert!(matches!(
            normalize(monthly_kwh, monthly_bill, tariff),
            Err(SizingError::InsufficientInput(_))
        ));
    }

    #[rstest]
    #[case(0.)]
    #[case(-2.)]
    fn non_positive_tariff_should_be_rejected(#[case] tariff: f64) {
        assert!(matches!(
            normalize(None, Some(500.), Some(tariff)),
            Err(SizingError::InsufficientInput(_))
        ));
    }
}
