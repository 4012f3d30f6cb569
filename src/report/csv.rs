//! Exportación de la metadata de imágenes a CSV.

use super::{FIELD_NAMES, ImageRecord};
use crate::error::Result;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

pub const CSV_REPORT_NAME: &str = "report.csv";

/// Escribe la cabecera y una fila por imagen; los campos ausentes quedan vacíos.
pub fn write_csv<W: Write>(writer: W, images: &[ImageRecord]) -> Result<()> {
    let mut writer = ::csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    writer.write_record(FIELD_NAMES)?;
    for record in images {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Guarda `report.csv` en `dir`, creando la carpeta si no existe.
pub fn save_csv_report(dir: &Path, images: &[ImageRecord]) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(CSV_REPORT_NAME);
    write_csv(File::create(&path)?, images)?;
    log::info!("Reporte CSV guardado en {}", path.display());
    Ok(path)
}
