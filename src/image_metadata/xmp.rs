//! Lectura de derechos y creadores desde paquetes XMP embebidos.

use crate::error::{Error, Result};
use std::collections::HashSet;
use xmltree::{Element, XMLNode};

const PACKET_BEGIN: &[u8] = b"<?xpacket begin";
const PACKET_END: &[u8] = b"<?xpacket end";

pub const DC_NAMESPACE: &str = "http://purl.org/dc/elements/1.1/";
pub const RDF_NAMESPACE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct XmpFields {
    /// Textos de `dc:rights` concatenados sin separador.
    pub rights: String,
    /// Nombres de `dc:creator` unidos con `;`.
    pub creators: String,
}

/// Devuelve el tramo que va desde `<?xpacket begin` hasta el inicio de `<?xpacket end`.
pub fn find_packet(data: &[u8]) -> Option<&[u8]> {
    let begin = find_bytes(data, PACKET_BEGIN)?;
    let end = begin + find_bytes(&data[begin..], PACKET_END)?;
    Some(&data[begin..end])
}

/// Extrae los campos XMP de los bytes de una imagen.
///
/// `Ok(None)` cuando no hay marcadores xpacket; un paquete que no es XML
/// bien formado se reporta como [`Error::MalformedXmp`].
pub fn extract_xmp(data: &[u8]) -> Result<Option<XmpFields>> {
    let Some(packet) = find_packet(data) else {
        return Ok(None);
    };

    let root = Element::parse(packet).map_err(|err| Error::MalformedXmp(err.to_string()))?;

    let creators = collect_dc_values(&root, "creator", "Seq");
    let rights = collect_dc_values(&root, "rights", "Alt");

    Ok(Some(XmpFields {
        rights: rights.concat(),
        creators: join_unique(creators, ";"),
    }))
}

fn find_bytes(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Recoge los valores de cada `dc:<name>` del paquete, en orden de documento.
///
/// Si el elemento envuelve un contenedor RDF `container`, se toman los textos
/// de sus hijos y no el texto propio del elemento.
fn collect_dc_values(root: &Element, name: &str, container: &str) -> Vec<String> {
    let mut matches = Vec::new();
    collect_descendants(root, DC_NAMESPACE, name, &mut matches);

    let mut values = Vec::new();
    for element in matches {
        let mut from_container = false;
        for child in child_elements(element) {
            if is_rdf(child, container) {
                values.extend(child_elements(child).map(leading_text));
                from_container = true;
            }
        }
        if !from_container {
            values.push(leading_text(element));
        }
    }

    values.retain(|value| !value.trim().is_empty());
    values
}

fn collect_descendants<'a>(
    element: &'a Element,
    namespace: &str,
    name: &str,
    found: &mut Vec<&'a Element>,
) {
    for child in child_elements(element) {
        if child.name == name && child.namespace.as_deref() == Some(namespace) {
            found.push(child);
        }
        collect_descendants(child, namespace, name, found);
    }
}

fn child_elements(element: &Element) -> impl Iterator<Item = &Element> {
    element.children.iter().filter_map(|node| match node {
        XMLNode::Element(child) => Some(child),
        _ => None,
    })
}

fn is_rdf(element: &Element, name: &str) -> bool {
    element.name == name && element.namespace.as_deref() == Some(RDF_NAMESPACE)
}

/// Texto del elemento anterior a su primer hijo, sin recortar.
fn leading_text(element: &Element) -> String {
    element
        .children
        .iter()
        .take_while(|node| !matches!(node, XMLNode::Element(_)))
        .filter_map(|node| match node {
            XMLNode::Text(text) | XMLNode::CData(text) => Some(text.as_str()),
            _ => None,
        })
        .collect()
}

fn join_unique(values: Vec<String>, separator: &str) -> String {
    let mut seen = HashSet::new();
    values
        .into_iter()
        .filter(|value| seen.insert(value.clone()))
        .collect::<Vec<_>>()
        .join(separator)
}
