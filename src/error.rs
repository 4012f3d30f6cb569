//! Tipos de error compartidos por el escáner y los reportes.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// El archivo no existe, no es un PDF válido o está cifrado.
    #[error("No se pudo abrir `{}` como PDF: {reason}", path.display())]
    DocumentAccess { path: PathBuf, reason: String },

    /// Una imagen embebida no pudo decodificarse como imagen raster.
    #[error("No se pudo decodificar la imagen {name} de la página {page}: {reason}")]
    ImageDecode {
        page: u32,
        name: String,
        reason: String,
    },

    /// Se encontró un xpacket cuyo contenido no es XML bien formado.
    #[error("Paquete XMP mal formado: {0}")]
    MalformedXmp(String),

    #[error("Error de E/S: {0}")]
    Io(#[from] io::Error),

    #[error("No se pudo escribir el CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("No se pudo generar el reporte: {0}")]
    Report(String),
}

impl Error {
    pub(crate) fn document_access(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::DocumentAccess {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
