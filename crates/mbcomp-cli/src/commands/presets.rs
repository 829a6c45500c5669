//! Preset commands: list the factory set, show one, save a new one.

use super::common::{apply_overrides, load_preset, parse_key_val};
use clap::{Args, Subcommand};
use mbcomp_dsp::BandCount;
use mbcomp_params::{ParamStore, Preset, factory_presets};
use std::path::{Path, PathBuf};

#[derive(Args)]
pub struct PresetsArgs {
    #[command(subcommand)]
    command: PresetsCommand,
}

#[derive(Subcommand)]
enum PresetsCommand {
    /// List factory presets
    List,

    /// Show the settings in a preset
    Show {
        /// Factory preset name or TOML file
        name: String,
    },

    /// Write a complete preset file
    Save {
        /// Output TOML file
        path: PathBuf,

        /// Start from this preset instead of the defaults
        #[arg(long)]
        from: Option<String>,

        /// Parameter override (e.g. "mid_ratio=4:1"); repeatable
        #[arg(short, long = "set", value_parser = parse_key_val)]
        set: Vec<(String, String)>,

        /// Number of bands (1, 2 or 3)
        #[arg(short, long)]
        bands: Option<usize>,

        /// Preset name (defaults to the file stem)
        #[arg(long)]
        name: Option<String>,

        /// Description of the preset
        #[arg(short, long)]
        description: Option<String>,

        /// Overwrite if the file already exists
        #[arg(long)]
        force: bool,
    },
}

pub fn run(args: PresetsArgs) -> anyhow::Result<()> {
    match args.command {
        PresetsCommand::List => list_presets(),
        PresetsCommand::Show { name } => show_preset(&name),
        PresetsCommand::Save {
            path,
            from,
            set,
            bands,
            name,
            description,
            force,
        } => {
            let options = SaveOptions {
                from: from.as_deref(),
                overrides: &set,
                bands,
                name: name.as_deref(),
                description: description.as_deref(),
                force,
            };
            let preset = save_preset(&path, &options)?;
            println!("Saved preset '{}' to {}", preset.name, path.display());
            Ok(())
        }
    }
}

fn list_presets() -> anyhow::Result<()> {
    println!("Factory Presets:");
    println!("================");
    for preset in factory_presets() {
        let desc = preset.description.as_deref().unwrap_or("");
        println!("  {:20} - {}", preset.name, desc);
    }
    println!();
    println!("Use 'mbcomp presets show <name>' for details.");
    Ok(())
}

fn show_preset(name: &str) -> anyhow::Result<()> {
    let preset = load_preset(name)?;

    println!("Preset: {}", preset.name);
    println!("{}", "=".repeat(8 + preset.name.len()));
    println!();

    if let Some(desc) = &preset.description {
        println!("Description: {}", desc);
        println!();
    }

    println!("Bands: {}", preset.band_count);
    println!();

    if preset.params.is_empty() {
        println!("All parameters at their defaults.");
    } else {
        println!("Parameters ({}):", preset.params.len());
        for (key, value) in &preset.params {
            println!("  {:20} = {}", key, value);
        }
    }

    Ok(())
}

struct SaveOptions<'a> {
    from: Option<&'a str>,
    overrides: &'a [(String, String)],
    bands: Option<usize>,
    name: Option<&'a str>,
    description: Option<&'a str>,
    force: bool,
}

/// Resolves the starting preset and overrides into a full preset and writes
/// it to `path`.
fn save_preset(path: &Path, options: &SaveOptions<'_>) -> anyhow::Result<Preset> {
    if path.exists() && !options.force {
        anyhow::bail!(
            "'{}' already exists. Use --force to overwrite.",
            path.display()
        );
    }

    let store = ParamStore::new();
    let mut band_count = BandCount::default();
    let mut description = None;

    if let Some(source) = options.from {
        let base = load_preset(source)?;
        base.apply_to(&store)?;
        band_count = base.band_count()?;
        description = base.description;
    }
    apply_overrides(&store, options.overrides)?;
    if let Some(n) = options.bands {
        band_count = BandCount::from_count(n)
            .ok_or_else(|| anyhow::anyhow!("invalid band count {} (expected 1, 2 or 3)", n))?;
    }

    let name = options
        .name
        .map(str::to_string)
        .or_else(|| path.file_stem().map(|s| s.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "Untitled".to_string());

    let mut preset = Preset::from_store(name, &store, band_count);
    if let Some(desc) = options.description.map(str::to_string).or(description) {
        preset = preset.with_description(desc);
    }

    preset.save(path)?;
    Ok(preset)
}
