//! Tablas de consola para la metadata del documento y de sus imágenes.

use super::{AnalysisResult, DocumentMetadata, FIELD_NAMES, ImageRecord};
use crate::formatting::format_optional;
use crate::ui::{base_table, header_cell, label_cell, render_notice, render_section_title};
use comfy_table::{Cell, Color, Row, Table};

pub fn document_table(metadata: &DocumentMetadata) -> Table {
    let mut table = base_table();
    table.set_header(vec![header_cell("Clave"), header_cell("Valor")]);
    for (key, value) in metadata.iter() {
        table.add_row(Row::from(vec![
            label_cell(key),
            Cell::new(value).fg(Color::White),
        ]));
    }
    table
}

pub fn images_table(images: &[ImageRecord]) -> Table {
    let mut table = base_table();
    table.set_header(FIELD_NAMES.iter().map(|name| header_cell(name)).collect::<Vec<_>>());
    for record in images {
        let cells: Vec<Cell> = record
            .values()
            .iter()
            .map(|value| Cell::new(format_optional(value.as_deref())).fg(value_color(value)))
            .collect();
        table.add_row(Row::from(cells));
    }
    table
}

fn value_color(value: &Option<String>) -> Color {
    match value.as_deref() {
        None => Color::DarkGrey,
        Some("false") => Color::Yellow,
        Some(_) => Color::White,
    }
}

pub fn print_document_metadata(metadata: &DocumentMetadata) {
    render_section_title("METADATA DEL DOCUMENTO PDF");
    if metadata.is_empty() {
        render_notice("El PDF no tiene diccionario de información");
        return;
    }
    println!("{}", document_table(metadata));
}

pub fn print_images_metadata(images: &[ImageRecord]) {
    render_section_title("METADATA DE LAS IMÁGENES");
    if images.is_empty() {
        render_notice("No se encontraron imágenes en el documento");
        return;
    }
    println!("{}", images_table(images));
}

pub fn print_analysis(result: &AnalysisResult) {
    print_document_metadata(&result.document);
    print_images_metadata(&result.images);
}
