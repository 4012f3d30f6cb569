use clap::Parser;
use pdflicenses::app::{self, RunOptions};
use pdflicenses::ui;
use std::path::PathBuf;

/// Identifica licencias, derechos y autores de un PDF y de las imágenes que contiene.
#[derive(Parser, Debug)]
#[command(name = "pdflicenses", version, about)]
struct Cli {
    /// Nombre o ruta del PDF
    #[arg(value_name = "FILENAME")]
    filename: PathBuf,

    /// Guarda un reporte HTML de los resultados
    #[arg(long)]
    html: bool,

    /// Guarda un CSV con el análisis de las imágenes
    #[arg(long)]
    csv: bool,

    /// Guarda todas las imágenes del documento en una carpeta
    #[arg(long = "export-images", alias = "exportimages")]
    export_images: bool,

    /// No imprime la metadata en la terminal
    #[arg(long)]
    silent: bool,

    /// Muestra el detalle del análisis
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    let options = RunOptions {
        path: cli.filename,
        html: cli.html,
        csv: cli.csv,
        export_images: cli.export_images,
        silent: cli.silent,
    };

    if let Err(error) = app::run(&options) {
        ui::render_error(&error.to_string());
        std::process::exit(1);
    }
}
