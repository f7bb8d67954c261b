//! String-typed form inputs and caller-side checks on the result.
//!
//! Web forms and similar front ends hand over every field as text. All
//! coercion to numbers and enums happens here, so the solver only ever sees
//! a typed [`ObservationRequest`].

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::EtcError;
use crate::hardware::Instrument;
use crate::photometry::{Filter, MoonPhase};
use crate::solver::{ObservationRequest, SolveResult};

/// Advisory shown when the peak pixel may exceed the detector's full well
pub const SATURATION_WARNING: &str =
    "Saturation may occur. Consider reducing the exposure or defocusing the telescope.";

/// The seven named calculator inputs, as submitted.
///
/// Empty strings mean "not given".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormInput {
    /// Target signal-to-noise ratio
    #[serde(rename = "S_N")]
    pub s_n: String,
    /// Source magnitude
    pub mag: String,
    /// Exposure time in seconds
    pub etime: String,
    /// Instrument id, 0..=4
    pub itel: String,
    /// Filter name
    pub filter: String,
    /// Moon phase: 0 new, 1 half, 2 full
    pub moonp: String,
    /// Airmass
    pub air: String,
}

impl FormInput {
    /// Parse every field into a typed request.
    ///
    /// # Errors
    /// - `InvalidNumericInput` for unparseable numbers, a negative exposure,
    ///   a missing airmass or an unknown moon phase
    /// - `InvalidInstrument` for ids outside 0..=4
    /// - `InvalidFilter` for unknown filter names
    pub fn parse(&self) -> Result<ObservationRequest, EtcError> {
        let instrument = parse_instrument(&self.itel)?;
        let filter: Filter = self.filter.trim().parse()?;
        let moon_phase = parse_moon_phase(&self.moonp)?;
        let airmass = optional_number("air", &self.air)?
            .ok_or_else(|| EtcError::numeric("air", &self.air, "airmass is required"))?;

        let mut request = ObservationRequest::new(instrument, filter, moon_phase, airmass);
        request.target_snr = optional_number("S_N", &self.s_n)?;
        request.magnitude = optional_number("mag", &self.mag)?;
        request.exposure = optional_number("etime", &self.etime)?
            .map(|seconds| {
                Duration::try_from_secs_f64(seconds)
                    .map_err(|_| EtcError::numeric("etime", seconds, "must be zero or positive"))
            })
            .transpose()?;

        request.validate()?;
        Ok(request)
    }
}

fn optional_number(field: &'static str, text: &str) -> Result<Option<f64>, EtcError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    text.parse::<f64>()
        .map(Some)
        .map_err(|_| EtcError::numeric(field, text, "not a number"))
}

fn parse_instrument(text: &str) -> Result<Instrument, EtcError> {
    let text = text.trim();
    let id: i64 = text
        .parse()
        .map_err(|_| EtcError::numeric("itel", text, "instrument id must be an integer"))?;
    let id = u8::try_from(id).map_err(|_| EtcError::InvalidInstrument(id))?;
    Instrument::from_id(id)
}

fn parse_moon_phase(text: &str) -> Result<MoonPhase, EtcError> {
    let text = text.trim();
    text.parse::<u8>()
        .ok()
        .and_then(MoonPhase::from_index)
        .ok_or_else(|| {
            EtcError::numeric(
                "moonp",
                text,
                "moon phase must be 0 (new), 1 (half) or 2 (full)",
            )
        })
}

/// Whether the peak pixel estimate exceeds the detector saturation limit
pub fn is_saturated(result: &SolveResult) -> bool {
    result.peak_dn > result.saturation_limit
}

/// Warning text to display next to the peak pixel, if any
pub fn saturation_warning(result: &SolveResult) -> Option<&'static str> {
    is_saturated(result).then_some(SATURATION_WARNING)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> FormInput {
        FormInput {
            s_n: String::new(),
            mag: "18".to_string(),
            etime: "300".to_string(),
            itel: "1".to_string(),
            filter: "V".to_string(),
            moonp: "0".to_string(),
            air: "1.2".to_string(),
        }
    }

    #[test]
    fn test_parse_complete_form() {
        let request = form().parse().unwrap();
        assert_eq!(request.instrument, Instrument::Sinistro1m0);
        assert_eq!(request.filter, Filter::JohnsonV);
        assert_eq!(request.moon_phase, MoonPhase::New);
        assert_eq!(request.airmass, 1.2);
        assert_eq!(request.target_snr, None);
        assert_eq!(request.magnitude, Some(18.0));
        assert_eq!(request.exposure, Some(Duration::from_secs(300)));
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        let request = FormInput {
            s_n: " 20 ".to_string(),
            itel: " 3".to_string(),
            filter: "g ".to_string(),
            ..form()
        }
        .parse()
        .unwrap();
        assert_eq!(request.target_snr, Some(20.0));
        assert_eq!(request.instrument, Instrument::Spectral2m0);
        assert_eq!(request.filter, Filter::SloanG);
    }

    #[test]
    fn test_bad_numbers() {
        let err = FormInput {
            mag: "eighteen".to_string(),
            ..form()
        }
        .parse()
        .unwrap_err();
        assert!(matches!(
            err,
            EtcError::InvalidNumericInput { field: "mag", .. }
        ));

        let err = FormInput {
            etime: "-10".to_string(),
            ..form()
        }
        .parse()
        .unwrap_err();
        assert!(matches!(
            err,
            EtcError::InvalidNumericInput { field: "etime", .. }
        ));

        let err = FormInput {
            air: String::new(),
            ..form()
        }
        .parse()
        .unwrap_err();
        assert!(matches!(
            err,
            EtcError::InvalidNumericInput { field: "air", .. }
        ));
    }

    #[test]
    fn test_bad_instrument() {
        let out_of_range = FormInput {
            itel: "8".to_string(),
            ..form()
        };
        assert_eq!(out_of_range.parse(), Err(EtcError::InvalidInstrument(8)));

        let negative = FormInput {
            itel: "-1".to_string(),
            ..form()
        };
        assert_eq!(negative.parse(), Err(EtcError::InvalidInstrument(-1)));

        let text = FormInput {
            itel: "sinistro".to_string(),
            ..form()
        };
        assert!(matches!(
            text.parse(),
            Err(EtcError::InvalidNumericInput { field: "itel", .. })
        ));
    }

    #[test]
    fn test_bad_filter_and_moon() {
        let filter = FormInput {
            filter: "Ha".to_string(),
            ..form()
        };
        assert_eq!(filter.parse(), Err(EtcError::InvalidFilter("Ha".to_string())));

        let moon = FormInput {
            moonp: "3".to_string(),
            ..form()
        };
        assert!(matches!(
            moon.parse(),
            Err(EtcError::InvalidNumericInput { field: "moonp", .. })
        ));
    }

    #[test]
    fn test_deserialize_from_json() {
        let json = r#"{"S_N": "20", "mag": "18", "etime": "", "itel": "1",
                       "filter": "V", "moonp": "0", "air": "1.2"}"#;
        let input: FormInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.s_n, "20");
        let request = input.parse().unwrap();
        assert_eq!(request.exposure, None);
    }

    #[test]
    fn test_missing_json_fields_are_empty() {
        let input: FormInput =
            serde_json::from_str(r#"{"itel": "0", "filter": "B", "moonp": "2", "air": "1"}"#)
                .unwrap();
        assert!(input.mag.is_empty());
        assert!(input.parse().is_ok());
    }
}
