//! Patch validation command.

use super::common::{load_patch, print_report};
use clap::Args;
use patchwire_config::{check_document, read_document};

#[derive(Args)]
pub struct CheckArgs {
    /// Patch name or path
    patch: String,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Exit with an error if anything would be skipped or fail to start
    #[arg(long)]
    strict: bool,
}

pub fn run(args: CheckArgs) -> anyhow::Result<()> {
    let source = load_patch(&args.patch)?;
    let (doc, mut warnings) = read_document(&source.json)?;
    let mut report = check_document(&doc);
    warnings.append(&mut report.warnings);
    report.warnings = warnings;

    if args.json {
        let failures: Vec<String> = report
            .start_failure
            .iter()
            .flat_map(|f| f.failures.iter().map(|(id, e)| format!("{id}: {e}")))
            .collect();
        let summary = serde_json::json!({
            "patch": source.label,
            "modules": report.modules_loaded,
            "connections": report.connections_loaded,
            "warnings": report.warnings.iter().map(ToString::to_string).collect::<Vec<_>>(),
            "start_failures": failures,
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{}", source.label);
        print_report(&report);
        if report.is_clean() {
            println!("  ok");
        }
    }

    if args.strict && !report.is_clean() {
        anyhow::bail!("patch '{}' has problems", args.patch);
    }
    Ok(())
}
