//! Decodificación de imágenes raster y lectura de su mapa EXIF.

use crate::error::{Error, Result};
use crate::image_metadata::ExifTags;
use image::{DynamicImage, GenericImageView};
use std::io::Cursor;
use std::path::Path;

/// Imagen ya decodificada por un [`ImageCodec`].
pub trait DecodedImage {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    /// Mapa de etiquetas EXIF; puede estar vacío.
    fn exif(&self) -> &ExifTags;
    /// Guarda la imagen; el formato lo decide la extensión de `path`.
    fn save(&self, path: &Path) -> Result<()>;
}

pub trait ImageCodec {
    type Image: DecodedImage;

    /// Decodifica los bytes; el error solo describe la causa, el escáner
    /// le añade página y nombre.
    fn decode(&self, data: &[u8]) -> std::result::Result<Self::Image, String>;
}

/// Códec basado en `image` para los píxeles y `kamadak-exif` para las etiquetas.
#[derive(Clone, Copy, Debug, Default)]
pub struct RasterCodec;

pub struct RasterImage {
    image: DynamicImage,
    exif: ExifTags,
}

impl ImageCodec for RasterCodec {
    type Image = RasterImage;

    fn decode(&self, data: &[u8]) -> std::result::Result<RasterImage, String> {
        let image = image::load_from_memory(data).map_err(|err| err.to_string())?;
        Ok(RasterImage {
            image,
            exif: read_exif_tags(data),
        })
    }
}

impl DecodedImage for RasterImage {
    fn width(&self) -> u32 {
        self.image.dimensions().0
    }

    fn height(&self) -> u32 {
        self.image.dimensions().1
    }

    fn exif(&self) -> &ExifTags {
        &self.exif
    }

    fn save(&self, path: &Path) -> Result<()> {
        self.image.save(path).map_err(|err| {
            Error::Report(format!(
                "No se pudo guardar la imagen `{}`: {err}",
                path.display()
            ))
        })
    }
}

/// Lee las etiquetas del IFD primario. Una imagen sin bloque EXIF, o con uno
/// ilegible, produce un mapa vacío.
pub fn read_exif_tags(data: &[u8]) -> ExifTags {
    let mut reader = Cursor::new(data);
    let exif = match exif::Reader::new().read_from_container(&mut reader) {
        Ok(exif) => exif,
        Err(exif::Error::NotFound(_)) | Err(exif::Error::InvalidFormat(_)) => {
            return ExifTags::new();
        }
        Err(err) => {
            log::warn!("Bloque EXIF ilegible, se ignora: {err}");
            return ExifTags::new();
        }
    };

    exif.fields()
        .filter(|field| field.ifd_num == exif::In::PRIMARY)
        .map(|field| (field.tag.number(), field_text(field)))
        .collect()
}

fn field_text(field: &exif::Field) -> String {
    match &field.value {
        exif::Value::Ascii(parts) => parts
            .iter()
            .map(|part| String::from_utf8_lossy(part).trim().to_string())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("; "),
        _ => field.display_value().to_string(),
    }
}
