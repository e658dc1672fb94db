//! CLI for site documents: JSON import/export, scripted edits, version listing.
//!
//! Usage:
//!   sitecraft import --input site.json [--output site.automerge] [--site-id ID] [--validate] [--stats]
//!   sitecraft export --input site.automerge [--output site.json]
//!   sitecraft edit --input site.automerge --commands edits.json [--max-history N]
//!   sitecraft versions --input site.automerge

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use sitecraft::{EditCommand, EditorConfig, EditorSession, SiteContent, SiteManager};

#[derive(Parser, Debug)]
#[command(name = "sitecraft", about = "Inspect and edit site documents", version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert site content JSON to an Automerge document
    Import {
        /// Input JSON file path (`{ pages, settings }`)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (defaults to input path with .automerge extension)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Site id stored in the document (defaults to the input file stem)
        #[arg(long)]
        site_id: Option<String>,

        /// Validate output by hydrating back to structs
        #[arg(long, default_value = "false")]
        validate: bool,

        /// Print statistics about the conversion
        #[arg(long, default_value = "false")]
        stats: bool,
    },

    /// Write the current draft of an Automerge document as JSON
    Export {
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (prints to stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Apply a JSON list of edit commands and save the result as a new version
    Edit {
        #[arg(short, long)]
        input: PathBuf,

        /// JSON array of commands, e.g. `[{"op": "addSection", "sectionType": "hero"}]`
        #[arg(short, long)]
        commands: PathBuf,

        /// Maximum undo snapshots kept while replaying
        #[arg(long, env = "SITECRAFT_MAX_HISTORY", default_value_t = sitecraft::site::DEFAULT_MAX_HISTORY)]
        max_history: usize,
    },

    /// List saved versions
    Versions {
        #[arg(short, long)]
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match args.command {
        Command::Import {
            input,
            output,
            site_id,
            validate,
            stats,
        } => import(&input, output, site_id, validate, stats),
        Command::Export { input, output } => export(&input, output),
        Command::Edit {
            input,
            commands,
            max_history,
        } => edit(&input, &commands, max_history),
        Command::Versions { input } => versions(&input),
    }
}

fn load_manager(path: &Path) -> Result<SiteManager> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read document {}", path.display()))?;
    SiteManager::from_bytes(&bytes).context("Failed to load Automerge document")
}

fn import(
    input_path: &Path,
    output: Option<PathBuf>,
    site_id: Option<String>,
    validate: bool,
    stats: bool,
) -> Result<()> {
    if !input_path.exists() {
        anyhow::bail!("Input file does not exist: {}", input_path.display());
    }

    let json_content = std::fs::read_to_string(input_path).context("Failed to read input file")?;
    let content: SiteContent =
        serde_json::from_str(&json_content).context("Failed to parse site JSON")?;
    content.validate().context("Site content is inconsistent")?;

    let site_id = site_id.unwrap_or_else(|| {
        input_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "site".to_string())
    });

    let num_pages = content.pages.len();
    let num_sections = content.section_count();

    let mut manager =
        SiteManager::new(&site_id, content.clone()).context("Failed to create Automerge document")?;
    let binary = manager.save();

    let output_path = output.unwrap_or_else(|| {
        let mut path = input_path.to_path_buf();
        path.set_extension("automerge");
        path
    });
    std::fs::write(&output_path, &binary).context("Failed to write output file")?;

    if validate {
        let mut loaded = SiteManager::from_bytes(&binary)
            .context("Failed to load binary for validation")?;
        let hydrated = loaded.content().context("Failed to hydrate for validation")?;
        if hydrated != content {
            anyhow::bail!("Validation failed: hydrated content differs from input");
        }
        println!("✓ Validation passed!");
    }

    if stats {
        println!();
        println!("Conversion statistics:");
        println!("  Site ID:  {}", site_id);
        println!("  Business: {}", content.settings.business_name);
        println!();
        println!("  Input JSON:    {:>10} bytes", json_content.len());
        println!("  Output binary: {:>10} bytes", binary.len());
        println!();
        println!("  Pages:    {}", num_pages);
        println!("  Sections: {}", num_sections);
    }

    println!();
    println!(
        "Successfully converted {} → {}",
        input_path.display(),
        output_path.display()
    );
    Ok(())
}

fn export(input: &Path, output: Option<PathBuf>) -> Result<()> {
    let mut manager = load_manager(input)?;
    let content = manager.content().context("Failed to hydrate document")?;
    let json = serde_json::to_string_pretty(&content).context("Failed to serialize content")?;
    match output {
        Some(path) => {
            std::fs::write(&path, json).context("Failed to write output file")?;
            info!(path = %path.display(), "exported");
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn edit(input: &Path, commands_path: &Path, max_history: usize) -> Result<()> {
    let mut manager = load_manager(input)?;
    let content = manager.content().context("Failed to hydrate document")?;

    let script = std::fs::read_to_string(commands_path).context("Failed to read commands file")?;
    let commands = EditCommand::parse_list(&script).context("Failed to parse commands")?;
    let total = commands.len();

    let mut session = EditorSession::with_config(EditorConfig::default().with_max_history(max_history));
    session.set_content(content);
    let changed = session
        .execute_all(commands)
        .context("Failed to apply commands")?;

    let Some(version) = manager
        .save_content(&session.content())
        .context("Failed to save draft")?
    else {
        println!("{} of {} commands applied; document unchanged, no version saved", changed, total);
        return Ok(());
    };
    std::fs::write(input, manager.save()).context("Failed to write document")?;
    println!(
        "{} of {} commands applied; saved version {} ({})",
        changed, total, version.version_number, version.id
    );
    Ok(())
}

fn versions(input: &Path) -> Result<()> {
    let mut manager = load_manager(input)?;
    let versions = manager.versions().context("Failed to hydrate document")?;
    if versions.is_empty() {
        println!("No saved versions");
        return Ok(());
    }
    for version in versions {
        let when = chrono::DateTime::from_timestamp_millis(version.created_at)
            .map(|t| t.to_rfc3339())
            .unwrap_or_else(|| version.created_at.to_string());
        let sections: usize = version.pages.iter().map(|p| p.sections.len()).sum();
        println!(
            "v{:<4} {}  {}  {} pages, {} sections",
            version.version_number,
            version.id,
            when,
            version.pages.len(),
            sections
        );
    }
    Ok(())
}
