//! Parameter listing command.

#![allow(clippy::print_literal)] // Table headers use literal strings intentionally

use clap::Args;
use mbcomp_core::ParamDescriptor;
use mbcomp_params::{ParamKey, ParamStore, format_value};

#[derive(Args)]
pub struct ParamsArgs {
    /// Show details for one parameter (string id, e.g. "low_ratio")
    #[arg(value_name = "PARAM")]
    param: Option<String>,
}

pub fn run(args: ParamsArgs) -> anyhow::Result<()> {
    if let Some(string_id) = &args.param {
        let key = ParamKey::from_string_id(string_id)
            .ok_or_else(|| anyhow::anyhow!("Unknown parameter: {}", string_id))?;
        print_details(&key.descriptor());
        return Ok(());
    }

    let store = ParamStore::new();
    println!("Parameters");
    println!("==========");

    let mut group = "";
    for desc in store.descriptors() {
        if desc.group != group {
            group = desc.group;
            println!();
            println!("[{}]", group);
            println!(
                "  {:20}  {:>5}  {:>12}  {}",
                "Id", "#", "Default", "Range"
            );
        }
        println!(
            "  {:20}  {:>5}  {:>12}  {}",
            desc.string_id,
            desc.id.0,
            format_value(desc, desc.default),
            range(desc)
        );
    }

    println!();
    println!("Use 'mbcomp params <id>' for details, and");
    println!("'mbcomp process in.wav out.wav --set <id>=<value>' to change one.");
    Ok(())
}

fn print_details(desc: &ParamDescriptor) {
    println!("{}", desc.name);
    println!("{}", "=".repeat(desc.name.len()));
    println!();
    println!("  Id:       {} (#{})", desc.string_id, desc.id.0);
    println!("  Group:    {}", desc.group);
    println!("  Default:  {}", format_value(desc, desc.default));
    println!("  Range:    {}", range(desc));
    if desc.step > 0.0 && desc.choices().is_none() {
        println!("  Step:     {}{}", desc.step, desc.unit.suffix());
    }
    println!();
    println!("Example:");
    println!(
        "  mbcomp process input.wav output.wav --set {}=\"{}\"",
        desc.string_id,
        format_value(desc, desc.max)
    );
}

fn range(desc: &ParamDescriptor) -> String {
    match desc.choices() {
        Some(labels) if desc.unit.suffix().is_empty() => labels.join(" | "),
        Some(labels) => labels
            .iter()
            .map(|l| format!("{l}{}", desc.unit.suffix()))
            .collect::<Vec<_>>()
            .join(" | "),
        None => format!(
            "{} .. {}",
            format_value(desc, desc.min),
            format_value(desc, desc.max)
        ),
    }
}
