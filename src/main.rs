use std::{
    fs::{self, File},
    process,
    sync::Mutex,
};

use anyhow::{bail, Context, Result};
use tracing_subscriber::EnvFilter;

use pixel_pattern::{
    editor::Editor,
    grid::Grid,
    persist::{self, PatternDocument, store::state_dir},
    session::EditorSession,
};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

const NEW_USAGE: &str = "pixel-pattern new <width> <height> <output.json>";
const RESIZE_USAGE: &str = "pixel-pattern resize <pattern.json> <width> <height>";
const INFO_USAGE: &str = "pixel-pattern info <pattern.json>";
const EDIT_USAGE: &str = "pixel-pattern edit <pattern.json>";

const LOG_ENV: &str = "PIXEL_PATTERN_LOG";

fn run() -> Result<()> {
    let mut args = std::env::args().skip(1);

    match args.next().as_deref() {
        Some("new") => {
            init_logging(false);
            let width = parse_size(args.next(), NEW_USAGE)?;
            let height = parse_size(args.next(), NEW_USAGE)?;
            let output = args.next().context(NEW_USAGE)?;
            new_pattern(width, height, &output)
        }
        Some("resize") => {
            init_logging(false);
            let path = args.next().context(RESIZE_USAGE)?;
            let width = parse_size(args.next(), RESIZE_USAGE)?;
            let height = parse_size(args.next(), RESIZE_USAGE)?;
            resize(&path, width, height)
        }
        Some("info") => {
            init_logging(false);
            let path = args.next().context(INFO_USAGE)?;
            info(&path)
        }
        Some("edit") => {
            init_logging(true);
            let path = args.next().context(EDIT_USAGE)?;
            edit(&path)
        }
        _ => bail!(
            "Pixel Pattern — grid pattern editor\n\nUsage:\n  {NEW_USAGE}\n  {RESIZE_USAGE}\n  {INFO_USAGE}\n  {EDIT_USAGE}"
        ),
    }
}

/// Log to stderr, or to a file in the state directory while the full-screen
/// editor owns the terminal. Logging setup failures are not fatal.
fn init_logging(to_file: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if to_file {
        let dir = state_dir();
        let file = fs::create_dir_all(&dir).and_then(|_| File::create(dir.join("editor.log")));
        match file {
            Ok(file) => {
                let _ = builder.with_ansi(false).with_writer(Mutex::new(file)).try_init();
            }
            // Nothing may be written to the terminal once the editor starts.
            Err(_) => {
                let _ = builder.with_writer(std::io::sink).try_init();
            }
        }
    } else {
        let _ = builder.with_writer(std::io::stderr).try_init();
    }
}

fn parse_size(arg: Option<String>, usage: &str) -> Result<i64> {
    let arg = arg.context(usage.to_string())?;
    arg.parse().with_context(|| format!("Not a number: {arg}"))
}

fn read_pattern(path: &str) -> Result<PatternDocument> {
    let json = fs::read_to_string(path).with_context(|| format!("Failed to read {path}"))?;
    persist::import_json(&json).with_context(|| format!("Failed to parse {path}"))
}

fn write_pattern(path: &str, doc: &PatternDocument) -> Result<()> {
    let json = persist::export_now(doc)?;
    fs::write(path, &json).with_context(|| format!("Failed to write {path}"))
}

fn new_pattern(width: i64, height: i64, output: &str) -> Result<()> {
    let width = pixel_pattern::types::clamp_grid_size(width);
    let height = pixel_pattern::types::clamp_grid_size(height);
    let doc = PatternDocument {
        grid: Grid::new(width, height),
        ..Default::default()
    };
    write_pattern(output, &doc)?;
    eprintln!("Created {width}×{height} pattern -> {output}");
    Ok(())
}

fn resize(path: &str, width: i64, height: i64) -> Result<()> {
    let mut session = EditorSession::from_document(read_pattern(path)?);
    let width = pixel_pattern::types::clamp_grid_size(width);
    let height = pixel_pattern::types::clamp_grid_size(height);
    session
        .resize_centered(width, height)
        .with_context(|| format!("Cannot resize {path} to {width}×{height}"))?;
    write_pattern(path, &session.to_document())?;
    eprintln!("Resized {path} to {width}×{height}");
    Ok(())
}

fn info(path: &str) -> Result<()> {
    let session = EditorSession::from_document(read_pattern(path)?);
    let grid = session.grid();
    let (rx, ry) = session.effective_preview_repeat();

    println!("Size:        {}×{}", grid.width(), grid.height());
    println!("Aspect:      {:.2}", session.aspect_ratio());
    println!("Painted:     {} of {}", grid.count_painted(), grid.width() * grid.height());
    match grid.content_bounds() {
        Some(b) => println!(
            "Content:     rows {}..={}, cols {}..={} ({}×{})",
            b.min_row,
            b.max_row,
            b.min_col,
            b.max_col,
            b.width(),
            b.height()
        ),
        None => println!("Content:     (blank)"),
    }
    println!("Background:  {}", session.background_color());
    let colors: Vec<String> = session.pattern_colors().iter().map(ToString::to_string).collect();
    println!("Colours:     {}", colors.join(" "));
    println!("Preview:     {rx}×{ry} (max {})", session.max_preview_repeat());
    println!("Palette:     {}", session.active_palette());
    Ok(())
}

fn edit(path: &str) -> Result<()> {
    let mut editor = Editor::open(path)?;
    editor.run()
}
