//! Module kind listing and detail command.

use super::common::{describe_range, format_value};
use clap::Args;
use patchwire_registry::{KindCategory, KindRegistry};

#[derive(Args)]
pub struct KindsArgs {
    /// Show ports and parameters of one kind
    #[arg(value_name = "KIND")]
    kind: Option<String>,
}

pub fn run(args: KindsArgs) -> anyhow::Result<()> {
    let registry = KindRegistry::new();

    let Some(name) = &args.kind else {
        println!("Module Kinds");
        println!("============");
        for category in KindCategory::ALL {
            println!();
            println!("{}:", category.name());
            for kind in registry.kinds_in_category(category) {
                println!("  {:12} - {}", kind.id, kind.description);
            }
        }
        println!();
        println!("Use 'patchwire kinds <kind>' for ports and parameters.");
        return Ok(());
    };

    let descriptor = registry
        .get(name)
        .ok_or_else(|| anyhow::anyhow!("Unknown module kind: {name}"))?;
    let module = registry
        .create(descriptor.id)
        .ok_or_else(|| anyhow::anyhow!("Unknown module kind: {name}"))?;

    println!("{} ({})", descriptor.name, descriptor.id);
    println!("{}", "=".repeat(descriptor.name.len() + descriptor.id.len() + 3));
    println!("{}", descriptor.description);
    println!();

    println!("Inputs:");
    if module.inputs().is_empty() {
        println!("  (none)");
    }
    for (i, port) in module.inputs().iter().enumerate() {
        println!("  {i}: {:12} {}", port.name, port.signal);
    }
    println!("Outputs:");
    if module.outputs().is_empty() {
        println!("  (none)");
    }
    for (i, port) in module.outputs().iter().enumerate() {
        println!("  {i}: {:12} {}", port.name, port.signal);
    }
    println!();

    if module.param_count() == 0 {
        println!("No parameters.");
        return Ok(());
    }

    println!("Parameters:");
    println!("  {:16}  {:24}  {:16}  Range", "Name", "Label", "Default");
    println!("  {:16}  {:24}  {:16}  -----", "----", "-----", "-------");
    for index in 0..module.param_count() {
        let (Some(info), Some(value)) = (module.param_info(index), module.get_param(index)) else {
            continue;
        };
        let range = if info.is_writable() {
            describe_range(&info)
        } else {
            format!("{} (read-only)", describe_range(&info))
        };
        println!(
            "  {:16}  {:24}  {:16}  {}",
            info.name,
            info.label,
            format_value(&value),
            range
        );
    }

    Ok(())
}
