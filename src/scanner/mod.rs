//! Recorre las páginas de un PDF y arma la metadata de cada imagen embebida.

mod pdf;
mod raster;

pub use pdf::{EmbeddedImage, LopdfSource, PdfSource};
pub use raster::{DecodedImage, ImageCodec, RasterCodec, RasterImage, read_exif_tags};

use crate::error::{Error, Result};
use crate::image_metadata;
use crate::report::{AnalysisResult, ImageRecord, image_file_name, output_dir_for};
use std::fs;
use std::path::Path;

#[derive(Clone, Copy, Debug, Default)]
pub struct ScanOptions {
    /// Guarda cada imagen en la carpeta de salida del documento.
    pub persist_images: bool,
}

/// Analiza el PDF en `path` con los colaboradores por defecto.
///
/// Las imágenes, si se guardan, van a la ruta del PDF sin extensión.
pub fn scan(path: &Path, options: ScanOptions) -> Result<AnalysisResult> {
    let source = LopdfSource::open(path)?;
    let image_dir = options.persist_images.then(|| output_dir_for(path));
    scan_source(&source, &RasterCodec, image_dir.as_deref())
}

/// Analiza un documento ya abierto. Con `image_dir` las imágenes se guardan
/// como `<página>-<nombre>` dentro de esa carpeta.
pub fn scan_source<S, C>(source: &S, codec: &C, image_dir: Option<&Path>) -> Result<AnalysisResult>
where
    S: PdfSource,
    C: ImageCodec,
{
    if let Some(dir) = image_dir {
        fs::create_dir_all(dir)?;
    }

    let mut images = Vec::new();
    for page_number in 1..=source.page_count() {
        let embedded = source.page_images(page_number)?;
        log::debug!("Página {page_number}: {} imágenes", embedded.len());
        for image in &embedded {
            images.push(scan_image(codec, page_number, image, image_dir)?);
        }
    }

    Ok(AnalysisResult {
        images,
        document: source.metadata(),
    })
}

fn scan_image<C: ImageCodec>(
    codec: &C,
    page_number: u32,
    image: &EmbeddedImage,
    image_dir: Option<&Path>,
) -> Result<ImageRecord> {
    let decoded = codec
        .decode(&image.data)
        .map_err(|reason| Error::ImageDecode {
            page: page_number,
            name: image.name.clone(),
            reason,
        })?;

    let metadata = image_metadata::extract(&image.data, Some(decoded.exif()))?;

    if let Some(dir) = image_dir {
        let target = dir.join(image_file_name(page_number, &image.name));
        decoded.save(&target)?;
        log::info!("Imagen guardada en {}", target.display());
    }

    let has_xmp = metadata.has_xmp();
    let has_exif = metadata.has_exif();
    let (iptc_rights, creators) = match metadata.xmp {
        Some(xmp) => (Some(xmp.rights), Some(xmp.creators)),
        None => (None, None),
    };
    let exif = metadata.exif.unwrap_or_default();

    Ok(ImageRecord {
        page_number,
        image_name: image.name.clone(),
        width: decoded.width(),
        height: decoded.height(),
        has_xmp,
        iptc_rights,
        creators,
        has_exif,
        exif_rights: exif.rights,
        exif_artist: exif.artist,
    })
}
