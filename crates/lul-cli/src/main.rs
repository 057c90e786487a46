//! lul - headless command line for LUL layout files.
//!
//! Validate saved layouts, export them as Tkinter programs, or start a new
//! empty layout file without opening the editor.

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use lul_core::{EditorConfig, WidgetKind};
use lul_editor::Editor;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// lul - check and export LUL layouts
#[derive(Parser)]
#[command(name = "lul")]
#[command(about = "Command-line interface for the LUL layout manager")]
struct Cli {
    /// JSON editor config (grid unit, history depth, export options)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override the grid unit
    #[arg(long, global = true)]
    grid: Option<i32>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a Python/Tkinter program from a layout
    Export {
        /// Layout file to read
        layout: PathBuf,

        /// Write the program here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Window title of the generated program
        #[arg(long)]
        title: Option<String>,

        /// Window geometry, e.g. 640x480
        #[arg(long)]
        geometry: Option<String>,
    },

    /// Validate a layout and print a summary
    Check {
        /// Layout file to read
        layout: PathBuf,
    },

    /// Write an empty layout file
    New {
        /// Where to create the layout
        path: PathBuf,

        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(cli.config.as_deref(), cli.grid)?;
    let result = match cli.command {
        Commands::Export {
            layout,
            output,
            title,
            geometry,
        } => export(config, &layout, output.as_deref(), title, geometry),
        Commands::Check { layout } => check(config, &layout),
        Commands::New { path, force } => new_layout(config, &path, force),
    };
    log::logger().flush();
    result
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn load_config(path: Option<&Path>, grid: Option<i32>) -> Result<EditorConfig> {
    let mut config = match path {
        Some(path) => EditorConfig::load(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?,
        None => EditorConfig::default(),
    };
    if let Some(grid) = grid {
        config.grid_unit = grid;
    }
    Ok(config.normalized())
}

fn open(config: EditorConfig, layout: &Path) -> Result<Editor> {
    let mut editor = Editor::new(config);
    editor
        .load(layout)
        .with_context(|| format!("Failed to load {}", layout.display()))?;
    Ok(editor)
}

fn export(
    mut config: EditorConfig,
    layout: &Path,
    output: Option<&Path>,
    title: Option<String>,
    geometry: Option<String>,
) -> Result<()> {
    if let Some(title) = title {
        config.emit.title = title;
    }
    if geometry.is_some() {
        config.emit.geometry = geometry;
    }
    let mut editor = open(config, layout)?;
    match output {
        Some(path) => {
            editor
                .export_source(path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Exported {} widgets to {}", editor.document().len(), path.display());
        }
        None => print!("{}", editor.generated_source()),
    }
    Ok(())
}

fn check(config: EditorConfig, layout: &Path) -> Result<()> {
    let editor = open(config, layout)?;
    print!("{}", summarize(&editor));
    Ok(())
}

/// Per-kind widget counts plus the total, one line each.
fn summarize(editor: &Editor) -> String {
    let mut counts: BTreeMap<usize, (WidgetKind, usize)> = BTreeMap::new();
    for widget in editor.document().widgets() {
        counts.entry(widget.kind as usize).or_insert((widget.kind, 0)).1 += 1;
    }
    let mut out = String::new();
    for (kind, count) in counts.values() {
        out.push_str(&format!("{kind:<12} {count}\n"));
    }
    out.push_str(&format!("{} widgets, grid {}\n", editor.document().len(), editor.config().grid_unit));
    out
}

fn new_layout(config: EditorConfig, path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to replace it)", path.display());
    }
    let mut editor = Editor::new(config);
    editor
        .save_as(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Created {}", path.display());
    Ok(())
}
