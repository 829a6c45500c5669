//! Text values for the command line and preset files.
//!
//! Values are written in the parameter's own unit, with the unit suffix
//! optional: `"-12 dB"`, `"-12"`, `"1.2 kHz"`, `"30ms"`, `"4:1"`, `"on"`.

use mbcomp_core::{ParamDescriptor, ParamKind, ParamUnit};

use crate::ParamError;

/// Parses `text` as a value for `desc`, returning the stored (clamped,
/// quantized) value.
///
/// ```rust
/// use mbcomp_params::{Band, BandParam, ParamKey, parse_value};
///
/// let ratio = ParamKey::Band(Band::Low, BandParam::Ratio).descriptor();
/// assert_eq!(parse_value(&ratio, "4:1").unwrap(), 4.0);
///
/// let crossover = ParamKey::MidHighCrossover.descriptor();
/// assert_eq!(parse_value(&crossover, "2.5 kHz").unwrap(), 2500.0);
/// ```
pub fn parse_value(desc: &ParamDescriptor, text: &str) -> Result<f32, ParamError> {
    let trimmed = text.trim();
    let invalid = |reason: &str| ParamError::invalid_value(desc.string_id, text, reason);

    let value = match desc.kind {
        ParamKind::Boolean => match trimmed.to_ascii_lowercase().as_str() {
            "on" | "true" | "yes" | "1" => 1.0,
            "off" | "false" | "no" | "0" => 0.0,
            _ => return Err(invalid("expected on/off")),
        },
        ParamKind::Choice(labels) => {
            let label = trimmed
                .strip_suffix(desc.unit.suffix())
                .filter(|_| !desc.unit.suffix().is_empty())
                .unwrap_or(trimmed)
                .trim();
            let index = labels
                .iter()
                .position(|l| *l == label)
                .or_else(|| {
                    // "4.0" names the same ratio as "4"
                    let number = label.parse::<f32>().ok()?;
                    labels.iter().position(|l| l.parse::<f32>().ok() == Some(number))
                })
                .ok_or_else(|| invalid(&format!("expected one of: {}", labels.join(", "))))?;
            index as f32
        }
        ParamKind::Continuous => {
            parse_with_unit(trimmed, desc.unit).ok_or_else(|| invalid("expected a number"))?
        }
    };

    if !value.is_finite() {
        return Err(invalid("expected a finite number"));
    }
    Ok(desc.quantize(value))
}

/// Formats a stored value the way [`parse_value`] reads it back.
pub fn format_value(desc: &ParamDescriptor, value: f32) -> String {
    desc.display(value).to_string()
}

fn parse_with_unit(text: &str, unit: ParamUnit) -> Option<f32> {
    let (number, scale) = match unit {
        ParamUnit::Hertz => {
            if let Some(khz) = strip_suffix_ci(text, "khz") {
                (khz, 1000.0)
            } else {
                (strip_suffix_ci(text, "hz").unwrap_or(text), 1.0)
            }
        }
        ParamUnit::Milliseconds => {
            if let Some(ms) = strip_suffix_ci(text, "ms") {
                (ms, 1.0)
            } else if let Some(s) = strip_suffix_ci(text, "s") {
                (s, 1000.0)
            } else {
                (text, 1.0)
            }
        }
        ParamUnit::Decibels => (strip_suffix_ci(text, "db").unwrap_or(text), 1.0),
        ParamUnit::Ratio => (text.strip_suffix(":1").unwrap_or(text), 1.0),
        ParamUnit::None => (text, 1.0),
    };
    number.trim().parse::<f32>().ok().map(|v| v * scale)
}

fn strip_suffix_ci<'a>(text: &'a str, suffix: &str) -> Option<&'a str> {
    let split = text.len().checked_sub(suffix.len())?;
    if !text.is_char_boundary(split) {
        return None;
    }
    let (head, tail) = text.split_at(split);
    tail.eq_ignore_ascii_case(suffix).then_some(head)
}
