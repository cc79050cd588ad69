//! Patch management commands.

use super::common::load_patch;
use clap::{Args, Subcommand};
use patchwire_config::paths::{ensure_user_patches_dir, patch_name_from_path, PATCH_EXTENSION};
use patchwire_config::{
    GraphDocument, factory_patch, factory_patches, list_user_patches, system_patches_dir,
    user_patches_dir,
};

#[derive(Args)]
pub struct PatchesArgs {
    #[command(subcommand)]
    command: PatchesCommand,
}

#[derive(Subcommand)]
enum PatchesCommand {
    /// List available patches (factory and user)
    List {
        /// Show only factory patches
        #[arg(long)]
        factory: bool,

        /// Show only user patches
        #[arg(long)]
        user: bool,
    },

    /// Print a patch as JSON
    Show {
        /// Patch name or path
        name: String,
    },

    /// Copy a factory patch into the user patch directory
    SaveDefault {
        /// Factory patch to copy
        #[arg(default_value = "default")]
        source: String,

        /// File name for the copy (defaults to the factory name)
        #[arg(short, long)]
        name: Option<String>,

        /// Overwrite an existing user patch
        #[arg(long)]
        force: bool,
    },

    /// Show patch directories
    Paths,
}

pub fn run(args: PatchesArgs) -> anyhow::Result<()> {
    match args.command {
        PatchesCommand::List { factory, user } => list_patches(factory, user),
        PatchesCommand::Show { name } => show_patch(&name),
        PatchesCommand::SaveDefault {
            source,
            name,
            force,
        } => save_default(&source, name.as_deref(), force),
        PatchesCommand::Paths => show_paths(),
    }
}

fn list_patches(factory_only: bool, user_only: bool) -> anyhow::Result<()> {
    if !user_only {
        println!("Factory Patches:");
        println!("================");
        for (name, doc) in factory_patches() {
            println!("  {:20} - {}", name, summarize(&doc));
        }
        println!();
    }

    if !factory_only {
        println!("User Patches:");
        println!("=============");
        let user_patches = list_user_patches();
        if user_patches.is_empty() {
            println!("  (none)");
            println!();
            println!("  Copy one with: patchwire patches save-default <factory-name>");
        }
        for path in user_patches {
            let name = patch_name_from_path(&path).unwrap_or_else(|| "unknown".to_string());
            match GraphDocument::load(&path) {
                Ok(doc) => println!("  {:20} - {}", name, summarize(&doc)),
                Err(_) => println!("  {name:20} - (error loading)"),
            }
        }
        println!();
    }

    Ok(())
}

fn summarize(doc: &GraphDocument) -> String {
    let kinds: Vec<&str> = doc.modules.iter().map(|m| m.kind.as_str()).collect();
    format!(
        "{} modules, {} connections ({})",
        doc.modules.len(),
        doc.connections.len(),
        kinds.join(", ")
    )
}

fn show_patch(name: &str) -> anyhow::Result<()> {
    let source = load_patch(name)?;
    let doc = GraphDocument::from_json(&source.json)?;
    println!("{}", doc.to_json()?);
    Ok(())
}

fn save_default(source: &str, name: Option<&str>, force: bool) -> anyhow::Result<()> {
    let doc = factory_patch(source)
        .ok_or_else(|| anyhow::anyhow!("Factory patch '{source}' not found"))?;

    let dir = ensure_user_patches_dir()?;
    let name = name.unwrap_or(source);
    let path = dir.join(format!("{name}.{PATCH_EXTENSION}"));
    if path.exists() && !force {
        anyhow::bail!(
            "Patch '{}' already exists. Use --force to overwrite.",
            path.display()
        );
    }

    doc.save(&path)?;
    println!("Saved {}", path.display());
    Ok(())
}

fn show_paths() -> anyhow::Result<()> {
    println!("User patches:   {}", user_patches_dir().display());
    println!("System patches: {}", system_patches_dir().display());
    Ok(())
}
