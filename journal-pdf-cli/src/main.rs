use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use journal_pdf::{render_entry, render_with_config, JournalEntry, LayoutConfig, PdfExport};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "journalpdf",
    about = "Export journal entries as PDF documents",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a marked-up text file (or stdin) to PDF
    Render {
        /// Input text file; reads stdin when omitted or "-"
        input: Option<PathBuf>,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Render a journal entry stored as JSON
    Entry {
        /// Input JSON file
        input: PathBuf,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Render without writing and print a summary of the result
    Inspect {
        /// Input file; reads stdin when omitted or "-"
        input: Option<PathBuf>,

        /// Treat the input as a JSON journal entry
        #[arg(short, long)]
        entry: bool,

        #[command(flatten)]
        layout: LayoutArgs,
    },
}

#[derive(Args)]
struct LayoutArgs {
    /// Maximum number of pages before content is truncated
    #[arg(long)]
    max_pages: Option<usize>,

    /// Wrap width in characters
    #[arg(long)]
    wrap_width: Option<usize>,
}

impl LayoutArgs {
    fn to_config(&self) -> Result<LayoutConfig> {
        let mut config = LayoutConfig::default();
        if let Some(max_pages) = self.max_pages {
            config = config.with_max_pages(max_pages);
        }
        if let Some(wrap_width) = self.wrap_width {
            config = config.with_wrap_width(wrap_width);
        }
        config.validate().context("Invalid layout options")?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("journal_pdf=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            input,
            output,
            layout,
        } => {
            let config = layout.to_config()?;
            let text = read_input(input.as_deref())?;
            let export = render_with_config(&text, &config);
            save_export(&export, &output, &config)?;
        }

        Commands::Entry {
            input,
            output,
            layout,
        } => {
            let config = layout.to_config()?;
            let entry = read_entry(&input)?;
            let export = render_entry(&entry, &config);
            save_export(&export, &output, &config)?;
        }

        Commands::Inspect {
            input,
            entry,
            layout,
        } => {
            let config = layout.to_config()?;
            let export = if entry {
                let path = input.context("An input file is required with --entry")?;
                render_entry(&read_entry(&path)?, &config)
            } else {
                render_with_config(&read_input(input.as_deref())?, &config)
            };

            println!("Pages: {}", export.page_count);
            println!("Truncated: {}", if export.truncated { "yes" } else { "no" });
            println!("Objects: {}", export.object_count);
            println!("Size: {} bytes", export.len());
        }
    }

    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        _ => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            Ok(text)
        }
    }
}

fn read_entry(path: &Path) -> Result<JournalEntry> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let entry = JournalEntry::from_json(&json)
        .with_context(|| format!("Failed to parse entry {}", path.display()))?;
    debug!(
        cards = entry.cards.len(),
        reflections = entry.reflections.len(),
        "loaded entry"
    );
    Ok(entry)
}

fn save_export(export: &PdfExport, output: &Path, config: &LayoutConfig) -> Result<()> {
    export
        .save(output)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    if export.truncated {
        eprintln!(
            "Warning: content exceeded {} pages; the export was truncated",
            config.max_pages
        );
    }
    println!(
        "PDF written to {} ({} page{})",
        output.display(),
        export.page_count,
        if export.page_count == 1 { "" } else { "s" }
    );
    Ok(())
}
