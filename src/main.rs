use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use matrice_radar::serve::{self, App, ServerConfig};
use matrice_radar::{RenderSettings, StyleMode, Table, ViewQuery, DEFAULT_RADIAL_MAX};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "matrice-radar")]
#[command(author, version, about = "Turn an Excel table into a radar chart")]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    serve: ServeArgs,
}

#[derive(clap::Args, Debug)]
struct ServeArgs {
    /// Port to listen on
    #[arg(short, long, default_value = "3001")]
    port: u16,

    /// Workbook to open on start (optional, files can be uploaded in the page)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Pick the workbook with a file dialog
    #[arg(long)]
    gui: bool,

    /// Don't open the browser
    #[arg(long)]
    no_open: bool,

    /// Ceiling of the radial axis
    #[arg(long, default_value_t = DEFAULT_RADIAL_MAX)]
    radial_max: f64,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the web form (default)
    Serve(ServeArgs),

    /// Write a chart and table for one view to a file
    Report {
        /// Workbook to read
        file: PathBuf,

        /// Output file (.html or .svg; default: matrice-radar_<timestamp>.html)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Series to draw: all, synthese or row
        #[arg(long, default_value = "all")]
        series: String,

        /// Row label, with --series row
        #[arg(long)]
        row: Option<String>,

        /// Line style for --series all: detailed or simple
        #[arg(long, value_parser = parse_style)]
        style: Option<StyleMode>,

        /// Don't wrap axis labels
        #[arg(long)]
        no_wrap: bool,

        /// Axis label font size (6-20)
        #[arg(long, default_value = "10")]
        font_size: u8,

        /// Ceiling of the radial axis
        #[arg(long, default_value_t = DEFAULT_RADIAL_MAX)]
        radial_max: f64,

        /// Open the report when done
        #[arg(long)]
        open: bool,
    },
}

fn parse_style(s: &str) -> std::result::Result<StyleMode, String> {
    match s {
        "detailed" => Ok(StyleMode::Detailed),
        "simple" => Ok(StyleMode::Simple),
        other => Err(format!("unknown style {:?} (expected detailed or simple)", other)),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    match args.command {
        Some(Command::Serve(serve_args)) => run_serve(serve_args),
        Some(Command::Report {
            file,
            output,
            series,
            row,
            style,
            no_wrap,
            font_size,
            radial_max,
            open,
        }) => {
            let query = ViewQuery {
                series: Some(series),
                row,
                style,
                wrap: Some(!no_wrap),
                font_size: Some(font_size),
            };
            run_report(file, output, query, radial_max, open)
        }
        None => run_serve(args.serve),
    }
}

fn run_serve(args: ServeArgs) -> Result<()> {
    let settings = RenderSettings::new(args.radial_max)?;
    let mut app = App::new(settings);

    let file = if args.gui { pick_file(args.file) } else { args.file };
    if let Some(path) = file {
        app.preload(&path)
            .with_context(|| format!("could not load {}", path.display()))?;
    }

    let config = ServerConfig {
        port: args.port,
        open_browser: !args.no_open,
    };
    serve::start(&config, app).context("server error")
}

fn run_report(
    file: PathBuf,
    output: Option<PathBuf>,
    query: ViewQuery,
    radial_max: f64,
    open: bool,
) -> Result<()> {
    let settings = RenderSettings::new(radial_max)?;
    let table = Table::open(&file).with_context(|| format!("could not load {}", file.display()))?;
    let view = query.into_view(&table)?;

    let output = output.unwrap_or_else(|| {
        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        PathBuf::from(format!("matrice-radar_{}.html", timestamp))
    });

    let source_name = file.file_name().map(|n| n.to_string_lossy().into_owned());
    matrice_radar::report::generate(&output, &table, &view, &settings, source_name.as_deref())?;
    eprintln!("Report: {}", output.display());

    if open {
        if let Err(e) = open::that(&output) {
            log::warn!("could not open {}: {}", output.display(), e);
        }
    }
    Ok(())
}

#[cfg(feature = "gui")]
fn pick_file(fallback: Option<PathBuf>) -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Sélectionnez un fichier Excel")
        .add_filter("Excel", &["xlsx"])
        .pick_file()
        .or(fallback)
}

#[cfg(not(feature = "gui"))]
fn pick_file(fallback: Option<PathBuf>) -> Option<PathBuf> {
    log::warn!("GUI mode not available in this build");
    fallback
}
