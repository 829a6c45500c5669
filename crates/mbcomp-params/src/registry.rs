//! The typed parameter surface.
//!
//! Every control has a [`ParamKey`]. Keys map one-to-one onto
//! [`ParamDescriptor`]s carrying range, default, unit, a stable numeric
//! [`ParamId`] and the string id used in saved state and presets.
//!
//! | Key | String id | Range | Default |
//! |-----|-----------|-------|---------|
//! | Input / output gain | `input_gain`, `output_gain` | -24..24 dB (0.5) | 0 dB |
//! | Crossovers | `low_mid_crossover`, `mid_high_crossover` | 20..999 / 1000..20000 Hz | 400 / 2000 Hz |
//! | Attack / release | `<band>_attack`, `<band>_release` | 5..500 ms (1) | 50 / 250 ms |
//! | Threshold | `<band>_threshold` | -60..12 dB (1) | 0 dB |
//! | Ratio | `<band>_ratio` | 1:1 .. 100:1 (14 choices) | 3:1 |
//! | Switches | `<band>_bypass`, `<band>_mute`, `<band>_solo` | off/on | off |
//!
//! `<band>` is `low`, `mid` or `high`.

use mbcomp_core::{ParamDescriptor, ParamId, ParamUnit};
use mbcomp_dsp::{DEFAULT_RATIO_INDEX, LOW_MID_RANGE, MID_HIGH_RANGE};

/// Display labels for the ratio choices, in index order.
pub const RATIO_LABELS: &[&str] = &[
    "1", "1.5", "2", "3", "4", "5", "6", "7", "8", "10", "15", "20", "50", "100",
];

/// Number of parameters in the registry.
pub const PARAM_COUNT: usize = 4 + 3 * BandParam::ALL.len();

/// A frequency band of the compressor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Band {
    /// Below the low-mid crossover.
    Low,
    /// Between the crossovers (everything above low-mid in 2-band mode).
    Mid,
    /// Above the mid-high crossover.
    High,
}

impl Band {
    /// All bands, low to high.
    pub const ALL: [Band; 3] = [Band::Low, Band::Mid, Band::High];

    /// Position of the band (0 = low).
    pub const fn index(self) -> usize {
        match self {
            Band::Low => 0,
            Band::Mid => 1,
            Band::High => 2,
        }
    }

    /// Lower-case name used as the string id prefix and display group.
    pub const fn name(self) -> &'static str {
        match self {
            Band::Low => "low",
            Band::Mid => "mid",
            Band::High => "high",
        }
    }
}

/// A per-band control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BandParam {
    /// Attack time.
    Attack,
    /// Release time.
    Release,
    /// Threshold.
    Threshold,
    /// Ratio choice index.
    Ratio,
    /// Bypass switch.
    Bypass,
    /// Mute switch.
    Mute,
    /// Solo switch.
    Solo,
}

impl BandParam {
    /// All per-band controls in registry order.
    pub const ALL: [BandParam; 7] = [
        BandParam::Attack,
        BandParam::Release,
        BandParam::Threshold,
        BandParam::Ratio,
        BandParam::Bypass,
        BandParam::Mute,
        BandParam::Solo,
    ];

    const fn index(self) -> usize {
        match self {
            BandParam::Attack => 0,
            BandParam::Release => 1,
            BandParam::Threshold => 2,
            BandParam::Ratio => 3,
            BandParam::Bypass => 4,
            BandParam::Mute => 5,
            BandParam::Solo => 6,
        }
    }
}

/// Identifies one control on the parameter surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKey {
    /// Gain before the crossover.
    InputGain,
    /// Gain after recombination.
    OutputGain,
    /// Low/mid boundary.
    LowMidCrossover,
    /// Mid/high boundary.
    MidHighCrossover,
    /// A per-band control.
    Band(Band, BandParam),
}

macro_rules! band_descriptors {
    ($group:literal, $label:literal, $base:literal) => {
        [
            ParamDescriptor::time_ms("Attack", "Attack", 5.0, 500.0, 50.0)
                .with_names(concat!($label, " Attack"), "Attack")
                .with_id(ParamId($base), concat!($group, "_attack"))
                .with_group($group),
            ParamDescriptor::time_ms("Release", "Release", 5.0, 500.0, 250.0)
                .with_names(concat!($label, " Release"), "Release")
                .with_id(ParamId($base + 1), concat!($group, "_release"))
                .with_group($group),
            ParamDescriptor::gain_db("Threshold", "Thresh", -60.0, 12.0, 0.0)
                .with_step(1.0)
                .with_names(concat!($label, " Threshold"), "Thresh")
                .with_id(ParamId($base + 2), concat!($group, "_threshold"))
                .with_group($group),
            ParamDescriptor::choice(
                "Ratio",
                "Ratio",
                RATIO_LABELS,
                ParamUnit::Ratio,
                DEFAULT_RATIO_INDEX,
            )
            .with_names(concat!($label, " Ratio"), "Ratio")
            .with_id(ParamId($base + 3), concat!($group, "_ratio"))
            .with_group($group),
            ParamDescriptor::toggle("Bypass", "Bypass", false)
                .with_names(concat!($label, " Bypass"), "Bypass")
                .with_id(ParamId($base + 4), concat!($group, "_bypass"))
                .with_group($group),
            ParamDescriptor::toggle("Mute", "Mute", false)
                .with_names(concat!($label, " Mute"), "Mute")
                .with_id(ParamId($base + 5), concat!($group, "_mute"))
                .with_group($group),
            ParamDescriptor::toggle("Solo", "Solo", false)
                .with_names(concat!($label, " Solo"), "Solo")
                .with_id(ParamId($base + 6), concat!($group, "_solo"))
                .with_group($group),
        ]
    };
}

const GLOBAL: [ParamDescriptor; 4] = [
    ParamDescriptor::gain_db("Input Gain", "Input", -24.0, 24.0, 0.0)
        .with_id(ParamId(100), "input_gain")
        .with_group("global"),
    ParamDescriptor::gain_db("Output Gain", "Output", -24.0, 24.0, 0.0)
        .with_id(ParamId(101), "output_gain")
        .with_group("global"),
    ParamDescriptor::frequency_hz(
        "Low-Mid Crossover",
        "Lo-Mid",
        LOW_MID_RANGE.0,
        LOW_MID_RANGE.1,
        400.0,
    )
    .with_id(ParamId(102), "low_mid_crossover")
    .with_group("crossover"),
    ParamDescriptor::frequency_hz(
        "Mid-High Crossover",
        "Mid-Hi",
        MID_HIGH_RANGE.0,
        MID_HIGH_RANGE.1,
        2000.0,
    )
    .with_id(ParamId(103), "mid_high_crossover")
    .with_group("crossover"),
];

const LOW: [ParamDescriptor; 7] = band_descriptors!("low", "Low", 200);
const MID: [ParamDescriptor; 7] = band_descriptors!("mid", "Mid", 300);
const HIGH: [ParamDescriptor; 7] = band_descriptors!("high", "High", 400);

impl ParamKey {
    /// Every key, in registry (index) order.
    pub const ALL: [ParamKey; PARAM_COUNT] = {
        let mut keys = [ParamKey::InputGain; PARAM_COUNT];
        keys[1] = ParamKey::OutputGain;
        keys[2] = ParamKey::LowMidCrossover;
        keys[3] = ParamKey::MidHighCrossover;
        let mut b = 0;
        while b < Band::ALL.len() {
            let mut p = 0;
            while p < BandParam::ALL.len() {
                keys[4 + b * BandParam::ALL.len() + p] =
                    ParamKey::Band(Band::ALL[b], BandParam::ALL[p]);
                p += 1;
            }
            b += 1;
        }
        keys
    };

    /// Position of this key in [`ParamKey::ALL`] and in the store.
    pub const fn index(self) -> usize {
        match self {
            ParamKey::InputGain => 0,
            ParamKey::OutputGain => 1,
            ParamKey::LowMidCrossover => 2,
            ParamKey::MidHighCrossover => 3,
            ParamKey::Band(band, param) => 4 + band.index() * BandParam::ALL.len() + param.index(),
        }
    }

    /// Metadata for this key.
    pub const fn descriptor(self) -> ParamDescriptor {
        match self {
            ParamKey::InputGain => GLOBAL[0],
            ParamKey::OutputGain => GLOBAL[1],
            ParamKey::LowMidCrossover => GLOBAL[2],
            ParamKey::MidHighCrossover => GLOBAL[3],
            ParamKey::Band(Band::Low, param) => LOW[param.index()],
            ParamKey::Band(Band::Mid, param) => MID[param.index()],
            ParamKey::Band(Band::High, param) => HIGH[param.index()],
        }
    }

    /// Stable string id (e.g. `"mid_threshold"`).
    pub const fn string_id(self) -> &'static str {
        self.descriptor().string_id
    }

    /// Looks a key up by its string id.
    pub fn from_string_id(string_id: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|key| key.string_id() == string_id)
    }

    /// Looks a key up by its stable numeric id.
    pub fn from_id(id: ParamId) -> Option<Self> {
        Self::ALL.iter().copied().find(|key| key.descriptor().id == id)
    }
}
