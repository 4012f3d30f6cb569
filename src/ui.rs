use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use console::style;

const BANNER_WIDTH: usize = 40;

/// Título de sección enmarcado con asteriscos.
pub fn render_section_title(title: &str) {
    let border = "*".repeat(BANNER_WIDTH.max(title.chars().count() + 4));
    println!("\n{}", style(&border).cyan());
    println!("{}", style(format!("  {title}")).cyan().bold());
    println!("{}", style(&border).cyan());
}

pub fn render_notice(message: &str) {
    println!("{}", style(format!("  {message}")).dim());
}

pub fn render_error(message: &str) {
    eprintln!("{}", style(message).red().bold());
}

pub fn base_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

pub fn label_cell(text: &str) -> Cell {
    Cell::new(text).fg(Color::Rgb {
        r: 160,
        g: 196,
        b: 255,
    })
}
