//! Extracción de derechos y creadores de una imagen a partir de XMP y EXIF.

mod exif_tags;
mod xmp;

pub use exif_tags::{ExifFields, ExifTags, TAG_ARTIST, TAG_COPYRIGHT, extract_exif};
pub use xmp::{DC_NAMESPACE, RDF_NAMESPACE, XmpFields, extract_xmp, find_packet};

use crate::error::Result;

/// Metadata de procedencia de una imagen, normalizada.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImageMetadata {
    pub xmp: Option<XmpFields>,
    pub exif: Option<ExifFields>,
}

impl ImageMetadata {
    pub fn has_xmp(&self) -> bool {
        self.xmp.is_some()
    }

    pub fn has_exif(&self) -> bool {
        self.exif.is_some()
    }
}

/// Combina el XMP de los bytes crudos con las etiquetas EXIF decodificadas.
///
/// `exif` es `None` solo cuando no se obtuvo ningún mapa de etiquetas; un mapa
/// vacío sigue contando como EXIF presente.
pub fn extract(data: &[u8], exif: Option<&ExifTags>) -> Result<ImageMetadata> {
    Ok(ImageMetadata {
        xmp: extract_xmp(data)?,
        exif: exif.map(extract_exif),
    })
}
