//! Reporte HTML con la metadata del documento y una vista previa de cada imagen.

use super::{AnalysisResult, DocumentMetadata, FIELD_NAMES, ImageRecord};
use crate::error::{Error, Result};
use crate::formatting::{format_optional, format_report_time};
use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};
use xmltree::{Element, EmitterConfig, XMLNode};

pub const HTML_REPORT_NAME: &str = "report.html";

const REPORT_TITLE: &str = "Reporte de derechos de autor";
const PREVIEW_HEIGHT: &str = "200";
const STYLE: &str = "body { font-family: sans-serif; margin: 2em; } \
table { border-collapse: collapse; margin-bottom: 1em; } \
td { border: 1px solid #ccc; padding: 4px 8px; vertical-align: top; }";

pub fn render_html(result: &AnalysisResult, generated_at: DateTime<Local>) -> Result<String> {
    let mut head = Element::new("head");
    let mut charset = Element::new("meta");
    charset
        .attributes
        .insert("charset".to_string(), "utf-8".to_string());
    append(&mut head, charset);
    append(&mut head, text_element("title", REPORT_TITLE));
    append(&mut head, text_element("style", STYLE));

    let mut body = Element::new("body");
    append(&mut body, text_element("h1", REPORT_TITLE));
    append(&mut body, text_element("h2", "Información del archivo PDF"));
    append(&mut body, document_table(&result.document));
    append(&mut body, text_element("h2", "Imágenes del PDF"));
    append(&mut body, images_table(&result.images));
    append(
        &mut body,
        text_element(
            "p",
            &format!("Generado el {}", format_report_time(generated_at)),
        ),
    );

    let mut html = Element::new("html");
    append(&mut html, head);
    append(&mut html, body);

    let mut buffer = Vec::new();
    let config = EmitterConfig::new()
        .perform_indent(false)
        .write_document_declaration(false);
    html.write_with_config(&mut buffer, config)
        .map_err(|err| Error::Report(err.to_string()))?;
    let markup = String::from_utf8(buffer).map_err(|err| Error::Report(err.to_string()))?;

    Ok(format!("<!DOCTYPE html>\n{markup}\n"))
}

/// Guarda `report.html` en `dir`; las vistas previas apuntan a las imágenes
/// guardadas en esa misma carpeta.
pub fn save_html_report(dir: &Path, result: &AnalysisResult) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(HTML_REPORT_NAME);
    fs::write(&path, render_html(result, Local::now())?)?;
    log::info!("Reporte HTML guardado en {}", path.display());
    Ok(path)
}

fn document_table(metadata: &DocumentMetadata) -> Element {
    let rows = metadata
        .iter()
        .map(|(key, value)| key_value_row(key, value));
    table(rows)
}

fn images_table(images: &[ImageRecord]) -> Element {
    table(images.iter().map(image_row))
}

fn image_row(record: &ImageRecord) -> Element {
    let mut preview = Element::new("img");
    preview
        .attributes
        .insert("src".to_string(), record.file_name());
    preview
        .attributes
        .insert("height".to_string(), PREVIEW_HEIGHT.to_string());

    let mut preview_cell = Element::new("td");
    append(&mut preview_cell, preview);

    let values = record.values();
    let details = table(
        FIELD_NAMES
            .iter()
            .zip(values.iter())
            .map(|(name, value)| key_value_row(name, format_optional(value.as_deref()))),
    );
    let mut details_cell = Element::new("td");
    append(&mut details_cell, details);

    let mut row = Element::new("tr");
    append(&mut row, preview_cell);
    append(&mut row, details_cell);
    row
}

fn table(rows: impl Iterator<Item = Element>) -> Element {
    let mut tbody = Element::new("tbody");
    for row in rows {
        append(&mut tbody, row);
    }
    let mut table = Element::new("table");
    append(&mut table, tbody);
    table
}

fn key_value_row(key: &str, value: &str) -> Element {
    let mut row = Element::new("tr");
    append(&mut row, text_element("td", key));
    append(&mut row, text_element("td", value));
    row
}

/// Un texto vacío se emitiría como etiqueta autocerrada, que HTML no cierra.
fn text_element(name: &str, text: &str) -> Element {
    let mut element = Element::new(name);
    let text = if text.is_empty() { "\u{A0}" } else { text };
    element.children.push(XMLNode::Text(text.to_string()));
    element
}

fn append(parent: &mut Element, child: Element) {
    parent.children.push(XMLNode::Element(child));
}
