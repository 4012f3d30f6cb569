//! Generadores de imágenes y PDFs de prueba.

use crate::image_metadata::{DC_NAMESPACE, RDF_NAMESPACE};
use flate2::Compression;
use flate2::write::ZlibEncoder;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use lopdf::{Dictionary, Document, Object, Stream, StringFormat, dictionary};
use std::io::{Cursor, Write};
use std::path::Path;

pub type TestResult<T = ()> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Paquete XMP con los `dc:creator` (en un `rdf:Seq`) y `dc:rights` (en un `rdf:Alt`).
pub fn xmp_packet(creators: &[&str], rights: &[&str]) -> String {
    let creators: String = creators
        .iter()
        .map(|name| format!("<rdf:li>{name}</rdf:li>"))
        .collect();
    let rights: String = rights
        .iter()
        .map(|text| format!("<rdf:li xml:lang=\"x-default\">{text}</rdf:li>"))
        .collect();
    format!(
        "<?xpacket begin=\"\u{FEFF}\" id=\"W5M0MpCehiHzreSzNTczkc9d\"?>\n\
         <x:xmpmeta xmlns:x=\"adobe:ns:meta/\">\n\
         <rdf:RDF xmlns:rdf=\"{RDF_NAMESPACE}\">\n\
         <rdf:Description rdf:about=\"\" xmlns:dc=\"{DC_NAMESPACE}\">\n\
         <dc:creator><rdf:Seq>{creators}</rdf:Seq></dc:creator>\n\
         <dc:rights><rdf:Alt>{rights}</rdf:Alt></dc:rights>\n\
         </rdf:Description>\n\
         </rdf:RDF>\n\
         </x:xmpmeta>\n\
         <?xpacket end=\"w\"?>"
    )
}

/// Bloque TIFF little-endian con etiquetas ASCII en el IFD0.
pub fn tiff_exif(entries: &[(u16, &str)]) -> Vec<u8> {
    let mut entries = entries.to_vec();
    entries.sort_by_key(|(tag, _)| *tag);

    let mut out = b"II*\0".to_vec();
    out.extend(8u32.to_le_bytes());
    out.extend((entries.len() as u16).to_le_bytes());

    let mut data_offset = 8 + 2 + entries.len() * 12 + 4;
    let mut data = Vec::new();
    for (tag, text) in entries {
        let mut bytes = text.as_bytes().to_vec();
        bytes.push(0);
        out.extend(tag.to_le_bytes());
        out.extend(2u16.to_le_bytes());
        out.extend((bytes.len() as u32).to_le_bytes());
        if bytes.len() <= 4 {
            bytes.resize(4, 0);
            out.extend(bytes);
        } else {
            out.extend((data_offset as u32).to_le_bytes());
            data_offset += bytes.len();
            data.extend(bytes);
        }
    }
    out.extend(0u32.to_le_bytes());
    out.extend(data);
    out
}

fn encode(image: DynamicImage, format: ImageFormat) -> TestResult<Vec<u8>> {
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), format)?;
    Ok(bytes)
}

fn solid(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([180, 40, 40])))
}

pub fn png_bytes(width: u32, height: u32) -> TestResult<Vec<u8>> {
    encode(solid(width, height), ImageFormat::Png)
}

/// JPEG con segmentos APP1 opcionales de XMP y EXIF justo tras el SOI.
pub fn jpeg_with_segments(
    width: u32,
    height: u32,
    xmp: Option<&str>,
    exif: Option<&[u8]>,
) -> TestResult<Vec<u8>> {
    let jpeg = encode(solid(width, height), ImageFormat::Jpeg)?;

    let mut segments = Vec::new();
    if let Some(tiff) = exif {
        segments.push([b"Exif\0\0".as_slice(), tiff].concat());
    }
    if let Some(packet) = xmp {
        segments.push([b"http://ns.adobe.com/xap/1.0/\0".as_slice(), packet.as_bytes()].concat());
    }

    let mut out = jpeg[..2].to_vec();
    for payload in segments {
        out.extend([0xFF, 0xE1]);
        out.extend(((payload.len() + 2) as u16).to_be_bytes());
        out.extend(payload);
    }
    out.extend(&jpeg[2..]);
    Ok(out)
}

/// Imagen a incrustar como XObject.
pub struct FixtureImage {
    pub resource: &'static str,
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub filters: Vec<&'static str>,
    pub color_space: Object,
    pub bits_per_component: i64,
}

impl FixtureImage {
    pub fn jpeg(resource: &'static str, width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            resource,
            data,
            width,
            height,
            filters: vec!["DCTDecode"],
            color_space: Object::Name(b"DeviceRGB".to_vec()),
            bits_per_component: 8,
        }
    }

    /// Muestras RGB sin comprimir.
    pub fn raw_rgb(resource: &'static str, width: u32, height: u32) -> Self {
        Self::raw(
            resource,
            width,
            height,
            Object::Name(b"DeviceRGB".to_vec()),
            8,
            vec![90; (width * height * 3) as usize],
        )
    }

    pub fn raw(
        resource: &'static str,
        width: u32,
        height: u32,
        color_space: Object,
        bits_per_component: i64,
        data: Vec<u8>,
    ) -> Self {
        Self {
            resource,
            data,
            width,
            height,
            filters: Vec::new(),
            color_space,
            bits_per_component,
        }
    }

    /// Paleta `[/Indexed /DeviceRGB hival <lookup>]` con índices de 8 bits.
    pub fn indexed_rgb(
        resource: &'static str,
        width: u32,
        height: u32,
        lookup: &[u8],
        indices: Vec<u8>,
    ) -> Self {
        let hival = (lookup.len() / 3).saturating_sub(1) as i64;
        let color_space = Object::Array(vec![
            Object::Name(b"Indexed".to_vec()),
            Object::Name(b"DeviceRGB".to_vec()),
            Object::Integer(hival),
            Object::String(lookup.to_vec(), StringFormat::Hexadecimal),
        ]);
        Self::raw(resource, width, height, color_space, 8, indices)
    }

    /// Comprime los datos con Flate delante de los filtros existentes.
    pub fn flate(mut self) -> TestResult<Self> {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&self.data)?;
        self.data = encoder.finish()?;
        self.filters.insert(0, "FlateDecode");
        Ok(self)
    }
}

/// Escribe un PDF con una página por elemento de `pages` y el diccionario Info dado.
pub fn write_pdf(path: &Path, pages: &[Vec<FixtureImage>], info: &[(&str, &str)]) -> TestResult {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut kids = Vec::new();
    for images in pages {
        let mut xobjects = Dictionary::new();
        for image in images {
            let mut dict = dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => i64::from(image.width),
                "Height" => i64::from(image.height),
                "ColorSpace" => image.color_space.clone(),
                "BitsPerComponent" => image.bits_per_component,
            };
            match image.filters.as_slice() {
                [] => {}
                [filter] => dict.set("Filter", Object::Name(filter.as_bytes().to_vec())),
                filters => dict.set(
                    "Filter",
                    filters
                        .iter()
                        .map(|filter| Object::Name(filter.as_bytes().to_vec()))
                        .collect::<Vec<_>>(),
                ),
            }
            let image_id = doc.add_object(Stream::new(dict, image.data.clone()));
            xobjects.set(image.resource, image_id);
        }

        let content_id = doc.add_object(Stream::new(dictionary! {}, Vec::new()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => dictionary! { "XObject" => xobjects },
        });
        kids.push(Object::from(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    if !info.is_empty() {
        let mut info_dict = Dictionary::new();
        for (key, value) in info {
            info_dict.set(*key, Object::string_literal(*value));
        }
        let info_id = doc.add_object(info_dict);
        doc.trailer.set("Info", info_id);
    }

    doc.save(path)?;
    Ok(())
}
