use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use nuts_cli::types::RunResult;

/// Identifiers listed by name in the unmatched and duplicate rows before
/// truncating.
const LISTED_IDS: usize = 8;

pub fn print_summary(result: &RunResult) {
    println!("{}", summary_table(result));
    match &result.export {
        Some(export) => println!(
            "Done: wrote {} features to layer '{}' in {}",
            export.features,
            export.layer_name,
            export.path.display()
        ),
        None => println!("Done: dry run, nothing written"),
    }
}

fn summary_table(result: &RunResult) -> Table {
    let join = &result.join;
    let mut table = Table::new();
    table.set_header(vec![header_cell("Item"), header_cell("Value")]);
    apply_summary_table_style(&mut table);

    table.add_row(vec![Cell::new("Country"), Cell::new(&result.country)]);
    table.add_row(vec![
        Cell::new("NUTS schema"),
        Cell::new(result.schema_year),
    ]);
    table.add_row(vec![Cell::new("Stat year"), Cell::new(result.stat_year)]);
    table.add_row(vec![
        Cell::new("Column"),
        Cell::new(&result.population_column),
    ]);
    table.add_row(vec![Cell::new("Regions"), Cell::new(join.regions)]);
    table.add_row(vec![Cell::new("Matched"), Cell::new(join.matched)]);
    table.add_row(vec![
        Cell::new("Missing values"),
        count_cell(join.missing_values, Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new("Unmatched"),
        list_cell(&join.unmatched, Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new("Duplicates"),
        list_cell(&join.duplicates, Color::Yellow),
    ]);
    let output = match &result.export {
        Some(export) => Cell::new(export.path.display()),
        None => dim_cell(format!("{} (dry run)", result.output.display())),
    };
    table.add_row(vec![Cell::new("Output"), output]);

    align_column(&mut table, 1, CellAlignment::Left);
    table
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn list_cell(items: &[String], color: Color) -> Cell {
    if items.is_empty() {
        return dim_cell(0);
    }
    let mut listed = items
        .iter()
        .take(LISTED_IDS)
        .cloned()
        .collect::<Vec<_>>()
        .join(", ");
    if items.len() > LISTED_IDS {
        listed.push_str(&format!(", ... ({} more)", items.len() - LISTED_IDS));
    }
    Cell::new(format!("{}: {listed}", items.len())).fg(color)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
