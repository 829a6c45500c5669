//! Factory presets bundled with mbcomp.
//!
//! Embedded TOML so they are always available and go through the same parser
//! as user files.

use crate::Preset;

/// Names of the factory presets, in listing order.
pub static FACTORY_PRESET_NAMES: &[&str] = &["init", "bass_control", "vocal", "master_glue"];

static FACTORY_PRESETS_TOML: &[(&str, &str)] = &[
    ("init", INIT_PRESET),
    ("bass_control", BASS_CONTROL_PRESET),
    ("vocal", VOCAL_PRESET),
    ("master_glue", MASTER_GLUE_PRESET),
];

/// Every parameter at its default: unity, nothing compresses.
const INIT_PRESET: &str = r#"
name = "Init"
description = "Unity gain, all thresholds at 0 dB"
band_count = 3
"#;

/// Holds the low end steady and leaves the rest alone.
const BASS_CONTROL_PRESET: &str = r#"
name = "Bass Control"
description = "Steadies the low end below 150 Hz"
band_count = 2

[params]
low_mid_crossover = "150 Hz"
low_threshold = "-24 dB"
low_ratio = "4:1"
low_attack = "20 ms"
low_release = "200 ms"
mid_bypass = "on"
"#;

/// Upper mids and sibilance.
const VOCAL_PRESET: &str = r#"
name = "Vocal"
description = "Gentle body control with a faster de-essing top band"
band_count = 3

[params]
low_mid_crossover = "250 Hz"
mid_high_crossover = "5 kHz"
low_threshold = "-30 dB"
low_ratio = "2:1"
mid_threshold = "-18 dB"
mid_ratio = "3:1"
mid_attack = "10 ms"
high_threshold = "-28 dB"
high_ratio = "6:1"
high_attack = "5 ms"
high_release = "60 ms"
"#;

/// Light compression on all three bands with a little makeup gain.
const MASTER_GLUE_PRESET: &str = r#"
name = "Master Glue"
description = "Low-ratio bus compression across the spectrum"
band_count = 3

[params]
low_mid_crossover = "120 Hz"
mid_high_crossover = "4 kHz"
low_threshold = "-20 dB"
low_ratio = "1.5:1"
mid_threshold = "-20 dB"
mid_ratio = "1.5:1"
high_threshold = "-22 dB"
high_ratio = "1.5:1"
output_gain = "2 dB"
"#;

/// Get all factory presets.
pub fn factory_presets() -> Vec<Preset> {
    FACTORY_PRESETS_TOML
        .iter()
        .filter_map(|(_, toml)| Preset::from_toml(toml).ok())
        .collect()
}

/// Get a factory preset by short name or display name, case-insensitively.
pub fn get_factory_preset(name: &str) -> Option<Preset> {
    FACTORY_PRESETS_TOML
        .iter()
        .filter_map(|(id, toml)| Some((id, Preset::from_toml(toml).ok()?)))
        .find(|(id, preset)| {
            id.eq_ignore_ascii_case(name) || preset.name.eq_ignore_ascii_case(name)
        })
        .map(|(_, preset)| preset)
}
