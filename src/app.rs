use crate::error::Result;
use crate::report::console::print_analysis;
use crate::report::csv::save_csv_report;
use crate::report::html::save_html_report;
use crate::report::output_dir_for;
use crate::scanner::{self, ScanOptions};
use console::style;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Default)]
pub struct RunOptions {
    pub path: PathBuf,
    pub html: bool,
    pub csv: bool,
    pub export_images: bool,
    pub silent: bool,
}

/// Analiza el documento y produce las salidas pedidas.
///
/// El reporte HTML necesita las imágenes en disco; si no se exportaron en el
/// primer análisis, el documento se vuelve a analizar guardándolas.
pub fn run(options: &RunOptions) -> Result<()> {
    let mut result = scanner::scan(
        &options.path,
        ScanOptions {
            persist_images: options.export_images,
        },
    )?;

    if !options.silent {
        print_analysis(&result);
    }

    let output_dir = output_dir_for(&options.path);
    if options.export_images && !options.silent {
        report_saved("Imágenes", &output_dir);
    }

    if options.csv {
        let path = save_csv_report(&output_dir, &result.images)?;
        if !options.silent {
            report_saved("Reporte CSV", &path);
        }
    }

    if options.html {
        if !options.export_images {
            log::info!("Guardando las imágenes para las vistas previas del HTML");
            result = scanner::scan(
                &options.path,
                ScanOptions {
                    persist_images: true,
                },
            )?;
        }
        let path = save_html_report(&output_dir, &result)?;
        if !options.silent {
            report_saved("Reporte HTML", &path);
        }
    }

    Ok(())
}

fn report_saved(label: &str, path: &Path) {
    println!(
        "{} {}",
        style(format!("✔ {label}:")).green().bold(),
        style(path.display()).green()
    );
}
