//! Parameter metadata for the control surface.
//!
//! Each control the compressor exposes is described by a [`ParamDescriptor`]:
//! display names, a stable [`ParamId`] and string id for persistence, its
//! [`ParamKind`] (continuous, choice, boolean), range, step, default and
//! [`ParamUnit`]. The boundary layer uses descriptors to validate every
//! write, so the audio path only ever sees in-range values.
//!
//! # Example
//!
//! ```rust
//! use mbcomp_core::{ParamDescriptor, ParamId};
//!
//! let threshold = ParamDescriptor::gain_db("Threshold", "Thresh", -60.0, 12.0, 0.0)
//!     .with_step(1.0)
//!     .with_id(ParamId(110), "low_threshold");
//!
//! assert_eq!(threshold.quantize(-80.0), -60.0);
//! assert_eq!(threshold.quantize(-12.4), -12.0);
//! ```
//!
//! # no_std Support
//!
//! This module is fully `no_std` compatible with no heap allocations required.

use core::fmt;

/// Stable parameter identifier that survives reordering.
///
/// Once assigned, a `ParamId` must never change for a given parameter:
/// hosts record automation against it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParamId(pub u32);

/// What sort of value a parameter holds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamKind {
    /// A float in `min..=max`, snapped to `step`.
    Continuous,
    /// An index into the given labels, stored as a float.
    Choice(&'static [&'static str]),
    /// `0.0` (off) or `1.0` (on).
    Boolean,
}

/// Unit type for parameter display and formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamUnit {
    /// Decibels (dB) - for gain and threshold parameters.
    Decibels,

    /// Hertz (Hz) - for crossover frequencies.
    Hertz,

    /// Milliseconds (ms) - for attack and release.
    Milliseconds,

    /// Ratio (n:1) - for compressor ratios.
    Ratio,

    /// No unit - for switches and dimensionless parameters.
    None,
}

impl ParamUnit {
    /// Returns the unit suffix string for display.
    ///
    /// ```rust
    /// use mbcomp_core::ParamUnit;
    ///
    /// assert_eq!(ParamUnit::Decibels.suffix(), " dB");
    /// assert_eq!(ParamUnit::None.suffix(), "");
    /// ```
    pub const fn suffix(&self) -> &'static str {
        match self {
            ParamUnit::Decibels => " dB",
            ParamUnit::Hertz => " Hz",
            ParamUnit::Milliseconds => " ms",
            ParamUnit::Ratio => ":1",
            ParamUnit::None => "",
        }
    }
}

/// Describes a single parameter's metadata for display and validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamDescriptor {
    /// Full parameter name for display (e.g., "Low Threshold").
    pub name: &'static str,

    /// Short name for narrow displays, max 8 characters.
    pub short_name: &'static str,

    /// Value kind.
    pub kind: ParamKind,

    /// Unit type for formatting the parameter value.
    pub unit: ParamUnit,

    /// Minimum allowed value.
    pub min: f32,

    /// Maximum allowed value.
    pub max: f32,

    /// Default value.
    pub default: f32,

    /// Quantization step (relative to `min`). `0.0` disables snapping.
    pub step: f32,

    /// Stable numeric ID for host automation and persistence.
    pub id: ParamId,

    /// Human-readable stable ID used as the key in saved state and presets.
    ///
    /// Convention: `"band_param"` (e.g., `"low_threshold"`, `"mid_solo"`).
    pub string_id: &'static str,

    /// Parameter group for display (e.g., `"low"`, `"global"`).
    pub group: &'static str,
}

impl ParamDescriptor {
    #[allow(clippy::too_many_arguments)]
    const fn base(
        name: &'static str,
        short_name: &'static str,
        kind: ParamKind,
        unit: ParamUnit,
        min: f32,
        max: f32,
        default: f32,
        step: f32,
    ) -> Self {
        Self {
            name,
            short_name,
            kind,
            unit,
            min,
            max,
            default,
            step,
            id: ParamId(0),
            string_id: "",
            group: "",
        }
    }

    /// Gain parameter in decibels (0.5 dB steps).
    pub const fn gain_db(
        name: &'static str,
        short_name: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self::base(
            name,
            short_name,
            ParamKind::Continuous,
            ParamUnit::Decibels,
            min,
            max,
            default,
            0.5,
        )
    }

    /// Time parameter in milliseconds (1 ms steps).
    pub const fn time_ms(
        name: &'static str,
        short_name: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self::base(
            name,
            short_name,
            ParamKind::Continuous,
            ParamUnit::Milliseconds,
            min,
            max,
            default,
            1.0,
        )
    }

    /// Frequency parameter in hertz (1 Hz steps).
    pub const fn frequency_hz(
        name: &'static str,
        short_name: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self::base(
            name,
            short_name,
            ParamKind::Continuous,
            ParamUnit::Hertz,
            min,
            max,
            default,
            1.0,
        )
    }

    /// Choice parameter over `labels`, stored as an index.
    pub const fn choice(
        name: &'static str,
        short_name: &'static str,
        labels: &'static [&'static str],
        unit: ParamUnit,
        default_index: usize,
    ) -> Self {
        Self::base(
            name,
            short_name,
            ParamKind::Choice(labels),
            unit,
            0.0,
            (labels.len().saturating_sub(1)) as f32,
            default_index as f32,
            1.0,
        )
    }

    /// On/off switch.
    pub const fn toggle(name: &'static str, short_name: &'static str, default: bool) -> Self {
        Self::base(
            name,
            short_name,
            ParamKind::Boolean,
            ParamUnit::None,
            0.0,
            1.0,
            if default { 1.0 } else { 0.0 },
            1.0,
        )
    }

    /// Sets the stable parameter ID and string ID.
    pub const fn with_id(mut self, id: ParamId, string_id: &'static str) -> Self {
        self.id = id;
        self.string_id = string_id;
        self
    }

    /// Overrides the quantization step.
    pub const fn with_step(mut self, step: f32) -> Self {
        self.step = step;
        self
    }

    /// Sets the display group.
    pub const fn with_group(mut self, group: &'static str) -> Self {
        self.group = group;
        self
    }

    /// Replaces the display names.
    pub const fn with_names(mut self, name: &'static str, short_name: &'static str) -> Self {
        self.name = name;
        self.short_name = short_name;
        self
    }

    /// Clamps a value to this parameter's valid range.
    ///
    /// NaN clamps to the default.
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            self.default
        } else if value < self.min {
            self.min
        } else if value > self.max {
            self.max
        } else {
            value
        }
    }

    /// Clamps and snaps a value the way the parameter stores it.
    ///
    /// Continuous values snap to `min + k * step`; choices round to the
    /// nearest index; booleans become `0.0` or `1.0`.
    pub fn quantize(&self, value: f32) -> f32 {
        let clamped = self.clamp(value);
        match self.kind {
            ParamKind::Boolean => {
                if clamped >= 0.5 {
                    1.0
                } else {
                    0.0
                }
            }
            ParamKind::Choice(_) => libm::roundf(clamped),
            ParamKind::Continuous if self.step > 0.0 => {
                let steps = libm::roundf((clamped - self.min) / self.step);
                (self.min + steps * self.step).min(self.max)
            }
            ParamKind::Continuous => clamped,
        }
    }

    /// Choice labels, if this is a choice parameter.
    pub fn choices(&self) -> Option<&'static [&'static str]> {
        match self.kind {
            ParamKind::Choice(labels) => Some(labels),
            _ => None,
        }
    }

    /// Formats a value for display ("3:1", "on", "-12.0 dB").
    pub fn display(&self, value: f32) -> ParamDisplay {
        ParamDisplay { desc: *self, value }
    }
}

/// [`fmt::Display`] adapter returned by [`ParamDescriptor::display`].
#[derive(Debug, Clone, Copy)]
pub struct ParamDisplay {
    desc: ParamDescriptor,
    value: f32,
}

impl fmt::Display for ParamDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self.desc.quantize(self.value);
        match self.desc.kind {
            ParamKind::Boolean => f.write_str(if value >= 0.5 { "on" } else { "off" }),
            ParamKind::Choice(labels) => {
                let label = labels.get(value as usize).copied().unwrap_or("?");
                write!(f, "{}{}", label, self.desc.unit.suffix())
            }
            ParamKind::Continuous => match self.desc.unit {
                ParamUnit::Hertz | ParamUnit::Milliseconds => {
                    write!(f, "{:.0}{}", value, self.desc.unit.suffix())
                }
                _ => write!(f, "{:.1}{}", value, self.desc.unit.suffix()),
            },
        }
    }
}
