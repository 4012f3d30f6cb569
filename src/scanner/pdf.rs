//! Acceso a páginas, imágenes y diccionario Info de un PDF mediante `lopdf`.

use crate::error::{Error, Result};
use crate::report::DocumentMetadata;
use image::{DynamicImage, GrayImage, ImageFormat, RgbImage};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::collections::{BTreeMap, HashSet};
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// Imagen embebida tal como la expone el PDF.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmbeddedImage {
    pub name: String,
    pub data: Vec<u8>,
}

/// Documento PDF del que se leen metadata, páginas e imágenes.
pub trait PdfSource {
    fn metadata(&self) -> DocumentMetadata;
    fn page_count(&self) -> u32;
    /// Imágenes de la página `page_number` (desde 1), en el orden de sus recursos.
    fn page_images(&self, page_number: u32) -> Result<Vec<EmbeddedImage>>;
}

pub struct LopdfSource {
    path: PathBuf,
    doc: Document,
    pages: BTreeMap<u32, ObjectId>,
}

impl LopdfSource {
    pub fn open(path: &Path) -> Result<Self> {
        let doc = Document::load(path).map_err(|err| Error::document_access(path, err))?;
        if doc.trailer.get(b"Encrypt").is_ok() {
            return Err(Error::document_access(path, "el documento está cifrado"));
        }
        let pages = doc.get_pages();
        log::debug!("{} abierto con {} páginas", path.display(), pages.len());
        Ok(Self {
            path: path.to_path_buf(),
            doc,
            pages,
        })
    }

    fn resolve<'a>(&'a self, obj: &'a Object) -> Option<&'a Object> {
        match obj {
            Object::Reference(id) => self.doc.get_object(*id).ok(),
            other => Some(other),
        }
    }

    fn resolve_dict<'a>(&'a self, obj: &'a Object) -> Option<&'a Dictionary> {
        match self.resolve(obj)? {
            Object::Dictionary(dict) => Some(dict),
            _ => None,
        }
    }

    /// Recursos de la página, heredados del ancestro más cercano si faltan.
    fn page_resources(&self, page_id: ObjectId) -> Option<&Dictionary> {
        let mut node = self.doc.get_dictionary(page_id).ok();
        let mut visited = HashSet::new();
        while let Some(dict) = node {
            if let Some(resources) = dict.get(b"Resources").ok().and_then(|o| self.resolve_dict(o)) {
                return Some(resources);
            }
            node = match dict.get(b"Parent") {
                Ok(Object::Reference(parent)) if visited.insert(*parent) => {
                    self.doc.get_dictionary(*parent).ok()
                }
                _ => None,
            };
        }
        None
    }

    fn collect_images(
        &self,
        resources: &Dictionary,
        seen: &mut HashSet<ObjectId>,
        images: &mut Vec<EmbeddedImage>,
    ) {
        let Some(xobjects) = resources
            .get(b"XObject")
            .ok()
            .and_then(|o| self.resolve_dict(o))
        else {
            return;
        };

        for (name, entry) in xobjects.iter() {
            let Object::Reference(id) = entry else {
                continue;
            };
            if !seen.insert(*id) {
                continue;
            }
            let Ok(Object::Stream(stream)) = self.doc.get_object(*id) else {
                continue;
            };

            match name_value(stream.dict.get(b"Subtype").ok()).as_deref() {
                Some("Image") => images.push(self.embedded_image(name, stream)),
                Some("Form") => {
                    if let Some(inner) = stream
                        .dict
                        .get(b"Resources")
                        .ok()
                        .and_then(|o| self.resolve_dict(o))
                    {
                        self.collect_images(inner, seen, images);
                    }
                }
                _ => {}
            }
        }
    }

    fn embedded_image(&self, resource_name: &[u8], stream: &Stream) -> EmbeddedImage {
        let data = self.image_payload(stream);
        let extension = infer::get(&data)
            .map(|kind| kind.extension())
            .unwrap_or("bin");
        EmbeddedImage {
            name: format!("{}.{extension}", String::from_utf8_lossy(resource_name)),
            data,
        }
    }

    /// JPEG y JPEG 2000 se entregan sin los filtros previos al códec; las
    /// muestras sin codificar se convierten a PNG cuando el espacio de color
    /// lo permite.
    fn image_payload(&self, stream: &Stream) -> Vec<u8> {
        let filters = stream_filters(&stream.dict);
        let payload = match filters.split_last() {
            Some((last, prefix)) if last == "DCTDecode" || last == "JPXDecode" => {
                self.strip_filters(stream, prefix.len())
            }
            _ => self.samples_as_png(stream, filters.len()),
        };
        payload.unwrap_or_else(|| stream.content.clone())
    }

    /// Deshace los primeros `count` filtros del flujo.
    ///
    /// `Stream::decompressed_content` rechaza los XObject de imagen, así que
    /// se decodifica una copia con solo esos filtros.
    fn strip_filters(&self, stream: &Stream, count: usize) -> Option<Vec<u8>> {
        if count == 0 {
            return Some(stream.content.clone());
        }
        let filters: Vec<Object> = stream_filters(&stream.dict)
            .into_iter()
            .take(count)
            .map(|name| Object::Name(name.into_bytes()))
            .collect();

        let mut dict = Dictionary::new();
        dict.set("Filter", filters);
        if let Some(parms) = self.decode_parms(&stream.dict, count) {
            dict.set("DecodeParms", parms.clone());
        }

        match Stream::new(dict, stream.content.clone()).decompressed_content() {
            Ok(data) => Some(data),
            Err(err) => {
                log::debug!("No se pudieron deshacer los filtros de la imagen: {err}");
                None
            }
        }
    }

    fn decode_parms<'a>(&'a self, dict: &'a Dictionary, count: usize) -> Option<&'a Dictionary> {
        match self.resolve(dict.get(b"DecodeParms").ok()?)? {
            Object::Dictionary(parms) => Some(parms),
            Object::Array(items) => items
                .iter()
                .take(count)
                .find_map(|item| self.resolve_dict(item)),
            _ => None,
        }
    }

    fn samples_as_png(&self, stream: &Stream, filter_count: usize) -> Option<Vec<u8>> {
        let dict = &stream.dict;
        let width = u32::try_from(integer_value(dict.get(b"Width").ok())?).ok()?;
        let height = u32::try_from(integer_value(dict.get(b"Height").ok())?).ok()?;

        let is_mask = matches!(dict.get(b"ImageMask"), Ok(Object::Boolean(true)));
        let (bits, color_space) = if is_mask {
            (1, ColorSpace::Components(1))
        } else {
            let bits = integer_value(dict.get(b"BitsPerComponent").ok()).unwrap_or(8);
            (
                u8::try_from(bits).ok()?,
                self.color_space(dict.get(b"ColorSpace").ok()?)?,
            )
        };

        let data = self.strip_filters(stream, filter_count)?;
        let (columns, rows) = (width as usize, height as usize);
        let (components, samples) = match &color_space {
            ColorSpace::Components(components) => {
                let samples: Vec<u8> = unpack_samples(&data, columns, rows, *components, bits)?
                    .into_iter()
                    .map(|value| scale_to_byte(value, bits))
                    .collect();
                (*components, samples)
            }
            ColorSpace::Indexed {
                base,
                hival,
                lookup,
            } => {
                let indices = unpack_samples(&data, columns, rows, 1, bits)?;
                (*base, expand_palette(&indices, *base, *hival, lookup))
            }
        };

        let image = match components {
            1 => DynamicImage::ImageLuma8(GrayImage::from_raw(width, height, samples)?),
            3 => DynamicImage::ImageRgb8(RgbImage::from_raw(width, height, samples)?),
            4 => DynamicImage::ImageRgb8(RgbImage::from_raw(width, height, cmyk_to_rgb(&samples))?),
            _ => return None,
        };

        let mut png = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .ok()?;
        Some(png)
    }

    fn color_space(&self, color_space: &Object) -> Option<ColorSpace> {
        match self.resolve(color_space)? {
            Object::Name(name) => device_components(name).map(ColorSpace::Components),
            Object::Array(parts) => match name_value(parts.first())?.as_str() {
                "ICCBased" => {
                    let profile = match self.resolve(parts.get(1)?)? {
                        Object::Stream(profile) => profile,
                        _ => return None,
                    };
                    let components = integer_value(profile.dict.get(b"N").ok())?;
                    usize::try_from(components).ok().map(ColorSpace::Components)
                }
                "CalGray" => Some(ColorSpace::Components(1)),
                "CalRGB" => Some(ColorSpace::Components(3)),
                "Indexed" | "I" => {
                    let ColorSpace::Components(base) = self.color_space(parts.get(1)?)? else {
                        return None;
                    };
                    let hival = integer_value(parts.get(2).and_then(|o| self.resolve(o)))?;
                    Some(ColorSpace::Indexed {
                        base,
                        hival: usize::try_from(hival).ok()?,
                        lookup: self.lookup_table(parts.get(3)?)?,
                    })
                }
                _ => None,
            },
            _ => None,
        }
    }

    fn lookup_table(&self, lookup: &Object) -> Option<Vec<u8>> {
        match self.resolve(lookup)? {
            Object::String(bytes, _) => Some(bytes.clone()),
            Object::Stream(stream) => {
                self.strip_filters(stream, stream_filters(&stream.dict).len())
            }
            _ => None,
        }
    }

    fn object_to_string(&self, obj: &Object) -> Option<String> {
        match obj {
            Object::String(bytes, _) => Some(decode_text_string(bytes)),
            Object::Name(name) => Some(String::from_utf8_lossy(name).trim().to_string()),
            Object::Integer(value) => Some(value.to_string()),
            Object::Real(value) => Some(value.to_string()),
            Object::Boolean(value) => Some(value.to_string()),
            Object::Reference(reference) => self
                .doc
                .get_object(*reference)
                .ok()
                .and_then(|inner| self.object_to_string(inner)),
            _ => None,
        }
    }
}

impl PdfSource for LopdfSource {
    fn metadata(&self) -> DocumentMetadata {
        let mut metadata = DocumentMetadata::new();
        let Some(info) = self
            .doc
            .trailer
            .get(b"Info")
            .ok()
            .and_then(|o| self.resolve_dict(o))
        else {
            log::debug!("{} no tiene diccionario Info", self.path.display());
            return metadata;
        };

        for (key, value) in info.iter() {
            if let Some(text) = self.object_to_string(value) {
                metadata.push(String::from_utf8_lossy(key), text);
            }
        }
        metadata
    }

    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn page_images(&self, page_number: u32) -> Result<Vec<EmbeddedImage>> {
        let page_id = *self.pages.get(&page_number).ok_or_else(|| {
            Error::document_access(&self.path, format!("la página {page_number} no existe"))
        })?;

        let mut images = Vec::new();
        if let Some(resources) = self.page_resources(page_id) {
            self.collect_images(resources, &mut HashSet::new(), &mut images);
        }
        Ok(images)
    }
}

enum ColorSpace {
    Components(usize),
    Indexed {
        base: usize,
        hival: usize,
        lookup: Vec<u8>,
    },
}

fn device_components(name: &[u8]) -> Option<usize> {
    match name {
        b"DeviceGray" | b"G" | b"CalGray" => Some(1),
        b"DeviceRGB" | b"RGB" | b"CalRGB" => Some(3),
        b"DeviceCMYK" | b"CMYK" => Some(4),
        _ => None,
    }
}

/// Una muestra por byte, sin escalar. Con menos de 8 bits cada fila
/// empieza en un byte nuevo; con 16 se conserva el byte alto.
fn unpack_samples(
    data: &[u8],
    columns: usize,
    rows: usize,
    components: usize,
    bits: u8,
) -> Option<Vec<u8>> {
    let per_row = columns * components;
    match bits {
        8 => data.get(..per_row * rows).map(<[u8]>::to_vec),
        16 => data
            .get(..per_row * rows * 2)
            .map(|data| data.chunks_exact(2).map(|pair| pair[0]).collect()),
        1 | 2 | 4 => {
            let bits = usize::from(bits);
            let row_bytes = (per_row * bits).div_ceil(8);
            let data = data.get(..row_bytes * rows)?;
            let mask = (1u8 << bits) - 1;
            let mut samples = Vec::with_capacity(per_row * rows);
            for row in data.chunks_exact(row_bytes.max(1)) {
                for index in 0..per_row {
                    let offset = index * bits;
                    let shift = 8 - bits - offset % 8;
                    samples.push((row[offset / 8] >> shift) & mask);
                }
            }
            Some(samples)
        }
        _ => None,
    }
}

fn scale_to_byte(value: u8, bits: u8) -> u8 {
    if bits >= 8 {
        return value;
    }
    let max = (1u16 << bits) - 1;
    (u16::from(value) * 255 / max) as u8
}

/// Cambia cada índice por su color de la tabla; los índices mayores que
/// `hival` se recortan.
fn expand_palette(indices: &[u8], base: usize, hival: usize, lookup: &[u8]) -> Vec<u8> {
    indices
        .iter()
        .flat_map(|&index| {
            let start = usize::from(index).min(hival) * base;
            (0..base).map(move |offset| lookup.get(start + offset).copied().unwrap_or(0))
        })
        .collect()
}

fn name_value(obj: Option<&Object>) -> Option<String> {
    match obj? {
        Object::Name(name) => Some(String::from_utf8_lossy(name).into_owned()),
        _ => None,
    }
}

fn integer_value(obj: Option<&Object>) -> Option<i64> {
    match obj? {
        Object::Integer(value) => Some(*value),
        _ => None,
    }
}

fn stream_filters(dict: &Dictionary) -> Vec<String> {
    match dict.get(b"Filter") {
        Ok(Object::Name(name)) => vec![String::from_utf8_lossy(name).into_owned()],
        Ok(Object::Array(filters)) => filters
            .iter()
            .filter_map(|filter| name_value(Some(filter)))
            .collect(),
        _ => Vec::new(),
    }
}

fn cmyk_to_rgb(samples: &[u8]) -> Vec<u8> {
    samples
        .chunks_exact(4)
        .flat_map(|px| {
            let k = 255 - u16::from(px[3]);
            [px[0], px[1], px[2]].map(|c| ((255 - u16::from(c)) * k / 255) as u8)
        })
        .collect()
}

/// Decodifica una cadena de texto PDF: UTF-16BE con BOM, UTF-8 o Latin-1.
fn decode_text_string(bytes: &[u8]) -> String {
    let text: String = if let Some(utf16) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units = utf16
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]));
        char::decode_utf16(units)
            .map(|ch| ch.unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect()
    } else {
        match std::str::from_utf8(bytes) {
            Ok(text) => text.to_string(),
            Err(_) => bytes.iter().map(|&b| b as char).collect(),
        }
    };
    text.trim().to_string()
}
