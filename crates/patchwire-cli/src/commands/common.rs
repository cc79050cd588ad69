//! Shared CLI helpers used across multiple commands.

use anyhow::Context;
use patchwire_config::{LoadReport, factory_patch, find_patch};
use patchwire_core::{ParamDescriptor, ParamKind, ParamValue, StepKind};
use std::path::PathBuf;

/// Raw text of a patch and where it came from.
pub struct PatchSource {
    /// Factory name or file path, for messages.
    pub label: String,
    /// Patch JSON.
    pub json: String,
}

/// Resolve a patch by name or path.
///
/// Searches in this order:
/// 1. Factory patches (by name)
/// 2. User and system patch directories (by name)
/// 3. File path
pub fn load_patch(name: &str) -> anyhow::Result<PatchSource> {
    if let Some(doc) = factory_patch(name) {
        return Ok(PatchSource {
            label: format!("factory:{name}"),
            json: doc.to_json()?,
        });
    }

    let path = find_patch(name).unwrap_or_else(|| PathBuf::from(name));
    if path.is_file() {
        let json = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        return Ok(PatchSource {
            label: path.display().to_string(),
            json,
        });
    }

    anyhow::bail!("Patch '{name}' not found. Use 'patchwire patches list' to see available patches.")
}

/// Short form of a parameter value.
pub fn format_value(value: &ParamValue) -> String {
    match value {
        ParamValue::Number(n) => format!("{n}"),
        ParamValue::Flag(b) => b.to_string(),
        ParamValue::Text(s) if s.is_empty() => "-".to_string(),
        ParamValue::Text(s) => s.clone(),
        ParamValue::List(items) => {
            let items: Vec<String> = items.iter().map(format_value).collect();
            format!("[{}]", items.join(" "))
        }
    }
}

/// Accepted values of a parameter, for the kinds listing.
pub fn describe_range(info: &ParamDescriptor) -> String {
    match info.kind {
        ParamKind::Number { min, max } => {
            format!("{min}..{max}{}", info.unit.suffix())
        }
        ParamKind::Choice(options) => options.join("|"),
        ParamKind::Flag => "on|off".to_string(),
        ParamKind::Text => "text".to_string(),
        ParamKind::Steps { len, item } => {
            let step = match item {
                StepKind::Note => "note",
                StepKind::Octave => "octave",
                StepKind::Gate => "0|1",
            };
            format!("{len} x {step}")
        }
    }
}

/// Print the warnings and start failures of a load.
pub fn print_report(report: &LoadReport) {
    println!(
        "  {} modules, {} connections loaded",
        report.modules_loaded, report.connections_loaded
    );
    for warning in &report.warnings {
        println!("  warning: {warning}");
    }
    if let Some(failure) = &report.start_failure {
        println!("  {failure}");
        for (id, error) in &failure.failures {
            println!("    {id}: {error}");
        }
    }
}
