//! Modelos compartidos para reportar la metadata de las imágenes de un PDF.

pub mod console;
pub mod csv;
pub mod html;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Nombres de las columnas de un [`ImageRecord`], en su orden posicional.
pub const FIELD_NAMES: [&str; 10] = [
    "page_number",
    "image_name",
    "width",
    "height",
    "has_xmp",
    "iptc_rights",
    "creators",
    "has_exif",
    "exif_rights",
    "exif_artist",
];

/// Metadata normalizada de una imagen embebida.
///
/// El orden de los campos es el de [`FIELD_NAMES`]; CSV, consola y HTML
/// dependen de él.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub page_number: u32,
    pub image_name: String,
    pub width: u32,
    pub height: u32,
    pub has_xmp: bool,
    pub iptc_rights: Option<String>,
    pub creators: Option<String>,
    pub has_exif: bool,
    pub exif_rights: Option<String>,
    pub exif_artist: Option<String>,
}

impl ImageRecord {
    /// Valores del registro en orden posicional; `None` marca un campo ausente.
    pub fn values(&self) -> [Option<String>; 10] {
        [
            Some(self.page_number.to_string()),
            Some(self.image_name.clone()),
            Some(self.width.to_string()),
            Some(self.height.to_string()),
            Some(self.has_xmp.to_string()),
            self.iptc_rights.clone(),
            self.creators.clone(),
            Some(self.has_exif.to_string()),
            self.exif_rights.clone(),
            self.exif_artist.clone(),
        ]
    }

    /// Nombre con el que se guarda la imagen y con el que la referencia el HTML.
    pub fn file_name(&self) -> String {
        image_file_name(self.page_number, &self.image_name)
    }
}

pub fn image_file_name(page_number: u32, image_name: &str) -> String {
    format!("{page_number}-{image_name}")
}

/// Diccionario de información del documento, en el orden del PDF.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    entries: Vec<(String, String)>,
}

impl DocumentMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.push((key.into(), value.into()));
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(entry_key, _)| entry_key == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for DocumentMetadata {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

/// Resultado completo del análisis de un documento.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnalysisResult {
    pub images: Vec<ImageRecord>,
    pub document: DocumentMetadata,
}

/// Carpeta de salida de un documento: su ruta sin la extensión.
pub fn output_dir_for(pdf_path: &Path) -> PathBuf {
    pdf_path.with_extension("")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> ImageRecord {
        ImageRecord {
            page_number: 2,
            image_name: "Im1.jpg".to_string(),
            width: 40,
            height: 30,
            has_xmp: true,
            iptc_rights: Some("CC BY 4.0".to_string()),
            creators: None,
            has_exif: true,
            exif_rights: None,
            exif_artist: Some("Jane Doe".to_string()),
        }
    }

    #[test]
    fn values_follow_field_order() {
        let values = sample_record().values();
        assert_eq!(values.len(), FIELD_NAMES.len());
        assert_eq!(values[0].as_deref(), Some("2"));
        assert_eq!(values[1].as_deref(), Some("Im1.jpg"));
        assert_eq!(values[4].as_deref(), Some("true"));
        assert_eq!(values[5].as_deref(), Some("CC BY 4.0"));
        assert_eq!(values[6], None);
        assert_eq!(values[9].as_deref(), Some("Jane Doe"));
    }

    #[test]
    fn file_name_joins_page_and_image_name() {
        assert_eq!(sample_record().file_name(), "2-Im1.jpg");
    }

    #[test]
    fn output_dir_strips_extension() {
        assert_eq!(
            output_dir_for(Path::new("docs/paper.pdf")),
            PathBuf::from("docs/paper")
        );
    }

    #[test]
    fn document_metadata_keeps_insertion_order() {
        let metadata: DocumentMetadata =
            [("Title", "Informe"), ("Author", "Ana")].into_iter().collect();
        let keys: Vec<&str> = metadata.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, ["Title", "Author"]);
        assert_eq!(metadata.get("Author"), Some("Ana"));
        assert_eq!(metadata.get("Producer"), None);
    }
}
