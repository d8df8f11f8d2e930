//! sheetglyph - glyph sheets from the command line.
//!
//! A headless host: indexes a project's sheets, renders files on disk, and
//! resolves hex codes in place.

mod host;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use sheetglyph_api::{BufferDocument, HostEvent, Position, TextDocument};
use sheetglyph_atlas::{FallbackSheets, GlyphEngine, GlyphOptions};
use sheetglyph_providers::{Command, Host, Session};
use tracing_subscriber::EnvFilter;

use crate::host::{CollectSurface, StderrNotifier};

#[derive(Parser)]
#[command(name = "sheetglyph", version, about = "Render glyph-sheet characters")]
struct Cli {
    /// Project directory searched for `font/glyph_XX.png` sheets.
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Directory holding the bundled `glyph_E0.png` / `glyph_E1.png`.
    #[arg(long, global = true)]
    fallback: Option<PathBuf>,

    /// Editor settings file (JSON).
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Keep the source character visible under glyphs.
    #[arg(long, global = true)]
    show_source: bool,

    /// Index fully transparent cells too.
    #[arg(long, global = true)]
    include_transparent: bool,

    /// More logging (-v for debug).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Index the project and list the sheets found.
    Index,

    /// Print the decorations for a file as JSON.
    Render { file: PathBuf },

    /// Show glyph details at a line and column (both zero-based).
    Hover { file: PathBuf, line: u32, col: u32 },

    /// Resolve the hex code that ends at a UTF-16 offset.
    Resolve {
        file: PathBuf,
        offset: usize,

        /// Choose this picker entry instead of listing them.
        #[arg(long)]
        pick: Option<usize>,

        /// Write the edited text back to the file instead of stdout.
        #[arg(long)]
        write: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let settings = load_settings(cli.settings.as_deref())?;
    let mut options = GlyphOptions::from_settings(&settings);
    if cli.show_source {
        options.hide_source_char = false;
    }
    if cli.include_transparent {
        options.exclude_transparent = false;
    }

    let root = match cli.root {
        Some(root) => root,
        None => std::env::current_dir().context("no working directory")?,
    };
    if !root.is_dir() {
        bail!("Root '{}' is not a directory", root.display());
    }
    let fallback = match &cli.fallback {
        Some(dir) => FallbackSheets::from_dir(dir),
        None => FallbackSheets::none(),
    };

    tracing::debug!(
        "root {}, options {:?}, fallback sheets {}",
        root.display(),
        options,
        if fallback.is_empty() { "none" } else { "loaded" }
    );

    let engine = GlyphEngine::new(Some(root), fallback, options);
    let mut session = Session::new(engine);

    match cli.command {
        Commands::Index => print_index(&session),
        Commands::Render { file } => {
            let mut document = read_document(&file)?;
            let mut surface = CollectSurface::default();
            let mut notifier = StderrNotifier::default();
            let mut host = Host {
                document: &mut document,
                surface: &mut surface,
                notifier: &mut notifier,
                settings: &settings,
            };
            session.handle_event(&HostEvent::ActiveViewChanged, &mut host);
            let json = serde_json::to_string_pretty(&surface.decorations())?;
            println!("{}", json);
            Ok(())
        }
        Commands::Hover { file, line, col } => {
            let document = read_document(&file)?;
            match session.hover(&document, Position::new(line, col)) {
                Some(info) => print!("{}", info.markdown()),
                None => eprintln!("No glyph at {}:{}", line, col),
            }
            Ok(())
        }
        Commands::Resolve {
            file,
            offset,
            pick,
            write,
        } => resolve(&mut session, &settings, &file, offset, pick, write),
    }
}

fn setup_logging(verbose: u8) {
    let default = if verbose > 0 { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn load_settings(path: Option<&Path>) -> Result<serde_json::Value> {
    let Some(path) = path else {
        return Ok(serde_json::Value::Object(Default::default()));
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Invalid settings {}", path.display()))
}

fn read_document(path: &Path) -> Result<BufferDocument> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(BufferDocument::new(text))
}

fn print_index(session: &Session) -> Result<()> {
    let report = session.engine().report();
    println!(
        "{} glyphs from {} sheets",
        report.code_points,
        report.sheets.len()
    );
    for (byte, source) in &report.sheets {
        println!("  {:02X}  {}", byte, source);
    }
    if report.duplicates > 0 {
        println!("{} duplicate sheets ignored", report.duplicates);
    }
    if report.skipped_dirs > 0 {
        println!("{} directories could not be read", report.skipped_dirs);
    }
    Ok(())
}

fn resolve(
    session: &mut Session,
    settings: &serde_json::Value,
    file: &Path,
    offset: usize,
    pick: Option<usize>,
    write: bool,
) -> Result<()> {
    let mut document = read_document(file)?;
    let position = document.position_at(offset);
    let mut surface = CollectSurface::default();
    let mut notifier = StderrNotifier::default();
    let before = document.as_str().to_string();

    {
        let mut host = Host {
            document: &mut document,
            surface: &mut surface,
            notifier: &mut notifier,
            settings,
        };
        if let Some(picker) = session.execute(Command::ResolveHex, position, &mut host) {
            match pick {
                Some(index) => {
                    session.pick(&picker, index, &mut host);
                }
                None => {
                    for (index, candidate) in picker.candidates.iter().enumerate() {
                        println!("{:>3}  {}  {}", index, candidate.text, candidate.label);
                    }
                    return Ok(());
                }
            }
        }
    }

    if notifier.warnings > 0 {
        bail!("Nothing to resolve at offset {}", offset);
    }
    if document.as_str() == before {
        return Ok(());
    }
    if write {
        std::fs::write(file, document.as_str())
            .with_context(|| format!("Failed to write {}", file.display()))?;
    } else {
        print!("{}", document.as_str());
    }
    Ok(())
}
