//! Mileage rates and distance-derived amounts
use super::currency::convert_to_display_string;
use super::localize::Translator;

const METERS_TO_MILES: f64 = 0.000621371;
const METERS_TO_KM: f64 = 0.001;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, minicbor::Encode, minicbor::Decode, serde::Deserialize, serde::Serialize,
)]
pub enum DistanceUnit {
    #[n(0)]
    #[serde(rename = "mi")]
    Miles,
    #[n(1)]
    #[serde(rename = "km")]
    Kilometers,
}

/// Reimbursement rate per distance unit, in hundredths of `currency`.
#[derive(Debug, Clone, PartialEq, minicbor::Encode, minicbor::Decode, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct MileageRate {
    #[n(0)]
    pub unit: DistanceUnit,
    #[n(1)]
    pub rate: Option<f64>,
    #[n(2)]
    pub currency: String,
}

impl Default for MileageRate {
    fn default() -> Self {
        Self {
            unit: DistanceUnit::Miles,
            rate: None,
            currency: "USD".to_string(),
        }
    }
}

impl MileageRate {
    pub fn new(unit: DistanceUnit, rate: f64, currency: &str) -> Self {
        Self {
            unit,
            rate: Some(rate),
            currency: currency.to_string(),
        }
    }

    /// A zero rate counts as missing.
    pub fn has_rate(&self) -> bool {
        self.rate.is_some_and(|r| r > 0.0)
    }
}

/// Distance in the rate's unit, rounded to two decimals.
pub fn rounded_distance(distance_meters: f64, unit: DistanceUnit) -> f64 {
    let factor = match unit {
        DistanceUnit::Miles => METERS_TO_MILES,
        DistanceUnit::Kilometers => METERS_TO_KM,
    };
    (distance_meters * factor * 100.0).round() / 100.0
}

pub fn distance_request_amount(distance_meters: f64, rate: &MileageRate) -> i64 {
    let per_unit = rate.rate.unwrap_or(0.0);
    (rounded_distance(distance_meters, rate.unit) * per_unit).round() as i64
}

/// Merchant text for a distance request, e.g. `12.50 miles @ $0.67 / mile`.
pub fn distance_merchant(
    has_route: bool,
    distance_meters: f64,
    rate: &MileageRate,
    translator: &dyn Translator,
) -> String {
    if !has_route || !rate.has_rate() {
        return translator.translate("iou.routePending", &[]);
    }

    let distance = rounded_distance(distance_meters, rate.unit);
    let distance_text = format!("{distance:.2}");
    let (plural_key, singular_key) = match rate.unit {
        DistanceUnit::Miles => ("common.miles", "common.mile"),
        DistanceUnit::Kilometers => ("common.kilometers", "common.kilometer"),
    };
    let singular = translator.translate(singular_key, &[]);
    let unit_text = if distance_text == "1.00" {
        singular.clone()
    } else {
        translator.translate(plural_key, &[])
    };

    let per_unit = rate.rate.unwrap_or(0.0).round() as i64;
    let rate_text = convert_to_display_string(per_unit, &rate.currency);

    format!(
        "{} {unit_text} @ {} / {singular}",
        translator.to_locale_digits(&distance_text),
        translator.to_locale_digits(&rate_text),
    )
}
