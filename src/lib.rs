//! Revisión de derechos, licencias y autores de las imágenes embebidas en un PDF.

pub mod app;
pub mod error;
pub mod formatting;
pub mod image_metadata;
pub mod report;
pub mod scanner;
pub mod ui;

#[cfg(test)]
mod test_support;

pub use error::{Error, Result};
