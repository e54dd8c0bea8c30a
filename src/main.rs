//! Room Mapper CLI
//!
//! Usage:
//!   room-mapper [OPTIONS] <ROOMS_JSON>
//!
//! Options:
//!   --rooms <RANGES>         Select rooms by id ranges ("100-120, 135")
//!   --location <NAME>...     Select rooms by location
//!   --theme <NAME|FILE>      Color theme preset or TOML file
//!   --coords <FILE>          Import group offsets and annotations
//!   -o, --output <FILE>      Write SVG here instead of stdout
//!   -h, --help               Print help

use std::fs;
use std::path::{Path, PathBuf};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use clap::Parser;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use room_mapper::coords::{image_coordinates, CoordinateFile};
use room_mapper::renderer::{BackgroundFit, BackgroundImage};
use room_mapper::selection::{exclude, parse_room_ranges, Selection};
use room_mapper::{
    generate_map, load_rooms, ConfigError, LoadError, MapError, RenderConfig, Theme,
};

#[derive(Parser)]
#[command(name = "room-mapper")]
#[command(about = "Draw grid-aligned SVG maps from a room database")]
struct Cli {
    /// Room database (JSON array of rooms)
    rooms_json: PathBuf,

    /// Room id ranges to include, e.g. "35593-35601, 35608"
    #[arg(long, value_name = "RANGES", conflicts_with = "location")]
    rooms: Option<String>,

    /// Match --rooms against alternate ids
    #[arg(long, requires = "rooms")]
    uid: bool,

    /// Include every room in these locations
    #[arg(long, num_args = 1..)]
    location: Vec<String>,

    /// Room id ranges to leave out
    #[arg(long, value_name = "RANGES")]
    exclude: Option<String>,

    /// Match --exclude against alternate ids
    #[arg(long, requires = "exclude")]
    exclude_uid: bool,

    /// Rendering configuration (TOML)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Theme preset name or theme file (TOML)
    #[arg(short, long, value_name = "NAME|FILE")]
    theme: Option<String>,

    /// Coordinate file with group offsets, names and annotations
    #[arg(long, value_name = "FILE")]
    coords: Option<PathBuf>,

    /// Write a coordinate file for this map
    #[arg(long, value_name = "FILE")]
    export_coords: Option<PathBuf>,

    /// Write room bounding boxes in image pixels (JSON)
    #[arg(long, value_name = "FILE")]
    image_coords: Option<PathBuf>,

    /// Image embedded as the map background
    #[arg(long, value_name = "IMAGE")]
    background: Option<PathBuf>,

    /// Output SVG file (stdout if not provided)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Debug logging to stderr
    #[arg(short, long)]
    debug: bool,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("{}: {source}", path.display())]
    Load { path: PathBuf, source: LoadError },

    #[error("{}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Map(#[from] MapError),

    #[error("failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no rooms matched the selection")]
    EmptySelection,
}

fn load_err(path: &Path) -> impl FnOnce(LoadError) -> CliError + '_ {
    move |source| CliError::Load {
        path: path.to_path_buf(),
        source,
    }
}

fn write_file(path: &Path, contents: &str) -> Result<(), CliError> {
    fs::write(path, contents).map_err(|source| CliError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(debug: bool) {
    let default = if debug { "room_mapper=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let database = load_rooms(&cli.rooms_json).map_err(load_err(&cli.rooms_json))?;

    let selection = build_selection(cli);
    let rooms = match &selection {
        Some(selection) => selection.apply(&database),
        None => match &cli.exclude {
            Some(ranges) => exclude(database, &parse_room_ranges(ranges), cli.exclude_uid),
            None => database,
        },
    };
    if rooms.is_empty() {
        return Err(CliError::EmptySelection);
    }

    let coords = match &cli.coords {
        Some(path) => Some(CoordinateFile::load(path).map_err(load_err(path))?),
        None => None,
    };

    let mut config = match &cli.config {
        Some(path) => RenderConfig::from_file(path).map_err(load_err(path))?,
        None => RenderConfig::default(),
    };
    // Settings saved with the coordinates sit between --config and --theme.
    if let Some(file) = &coords {
        file.apply_config(&mut config);
        file.apply_annotations(&mut config);
    }
    if let Some(theme) = &cli.theme {
        config = config.with_theme(&load_theme(theme)?);
    }
    if let Some(path) = &cli.background {
        config.background_image = Some(background_image(path, &config)?);
    }

    let overrides = coords
        .as_ref()
        .map(CoordinateFile::to_overrides)
        .unwrap_or_default();

    let map = generate_map(&rooms, &config, &overrides)?;
    tracing::info!(
        rooms = map.layout.positions.len(),
        groups = map.groups.len(),
        "map generated"
    );

    match &cli.output {
        Some(path) => write_file(path, &map.svg)?,
        None => println!("{}", map.svg),
    }

    let map_name = cli
        .output
        .as_deref()
        .and_then(Path::file_stem)
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "map".to_string());

    if let Some(path) = &cli.export_coords {
        let map_id = selection
            .as_ref()
            .map(Selection::map_identifier)
            .unwrap_or_else(|| "all".to_string());
        let file = CoordinateFile::from_groups(&map_name, map_id, &map.groups, &overrides, &config);
        write_file(path, &file.to_json().map_err(load_err(path))?)?;
    }

    if let Some(path) = &cli.image_coords {
        let image = format!("{}.png", map_name);
        let coords = image_coordinates(&rooms, &map.layout, &config, &image);
        write_file(path, &serde_json::to_string_pretty(&coords)?)?;
    }

    Ok(())
}

fn build_selection(cli: &Cli) -> Option<Selection> {
    let selection = if !cli.location.is_empty() {
        Selection::locations(cli.location.iter().cloned())
    } else {
        Selection::ranges(cli.rooms.clone()?, cli.uid)
    };
    Some(match &cli.exclude {
        Some(ranges) => selection.with_exclusions(ranges.clone(), cli.exclude_uid),
        None => selection,
    })
}

/// A preset name, or failing that a theme file
fn load_theme(name: &str) -> Result<Theme, CliError> {
    match Theme::preset(name) {
        Ok(theme) => Ok(theme),
        Err(err) => {
            let path = Path::new(name);
            if path.exists() {
                Theme::from_file(path).map_err(load_err(path))
            } else {
                Err(err.into())
            }
        }
    }
}

fn background_image(path: &Path, config: &RenderConfig) -> Result<BackgroundImage, CliError> {
    let bytes = fs::read(path).map_err(|e| CliError::Load {
        path: path.to_path_buf(),
        source: e.into(),
    })?;
    let mime = match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    };
    let (fit, tile_size) = config
        .background_image
        .as_ref()
        .map(|b| (b.fit, b.tile_size))
        .unwrap_or((BackgroundFit::Stretch, None));

    Ok(BackgroundImage {
        href: format!("data:{};base64,{}", mime, STANDARD.encode(bytes)),
        fit,
        tile_size,
    })
}
