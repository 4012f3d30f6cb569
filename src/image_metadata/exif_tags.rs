//! Interpretación de las etiquetas EXIF de derechos y autoría.

use std::collections::BTreeMap;

/// Etiquetas EXIF por identificador numérico.
pub type ExifTags = BTreeMap<u16, String>;

pub const TAG_COPYRIGHT: u16 = 33432;
pub const TAG_ARTIST: u16 = 315;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExifFields {
    pub rights: Option<String>,
    pub artist: Option<String>,
}

pub fn extract_exif(tags: &ExifTags) -> ExifFields {
    ExifFields {
        rights: tags.get(&TAG_COPYRIGHT).cloned(),
        artist: tags.get(&TAG_ARTIST).cloned(),
    }
}
