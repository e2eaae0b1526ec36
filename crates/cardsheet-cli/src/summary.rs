use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use cardsheet_model::{ImportSummary, RecordSchema, RowError, RowErrorKind};

pub fn print_summary(summary: &ImportSummary) {
    println!("Document: {}", summary.document_id);
    println!("Destination: {}", summary.destination);
    if summary.dry_run {
        println!("Dry run: nothing was written");
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Rows"),
        header_cell(if summary.dry_run {
            "Would create"
        } else {
            "Created"
        }),
        header_cell("Skipped"),
        header_cell("Errors"),
    ]);
    apply_table_style(&mut table);
    for index in 0..4 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    table.add_row(vec![
        Cell::new(summary.rows_seen()).add_attribute(Attribute::Bold),
        count_cell(summary.created, Color::Green),
        dim_cell(summary.skipped),
        count_cell(summary.errors.len(), Color::Red),
    ]);
    println!("{table}");
    print_error_table(&summary.errors);
}

fn print_error_table(errors: &[RowError]) {
    if errors.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Line"),
        header_cell("Column"),
        header_cell("Field"),
        header_cell("Value"),
        header_cell("Problem"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 1, CellAlignment::Right);
    for error in errors {
        // Lines are shown 1-based to match the sheet.
        let line = Cell::new(error.line + 1);
        match &error.kind {
            RowErrorKind::FieldParse(parse) => table.add_row(vec![
                line,
                Cell::new(parse.position),
                Cell::new(&parse.field),
                Cell::new(format!("'{}'", parse.raw_value)).fg(Color::Yellow),
                Cell::new("not an integer"),
            ]),
            RowErrorKind::Write { name, message } => table.add_row(vec![
                line,
                dim_cell("-"),
                dim_cell("-"),
                Cell::new(name).fg(Color::Yellow),
                Cell::new(message),
            ]),
        };
    }
    println!("{table}");
}

pub fn print_schema(schema: &RecordSchema) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Field"),
        header_cell("Kind"),
        header_cell("Range"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    let mut columns: Vec<_> = schema.columns.iter().collect();
    columns.sort_by_key(|column| column.index);
    for column in columns {
        let field = if column.field == schema.name_field {
            Cell::new(format!("{} (name)", column.field)).add_attribute(Attribute::Bold)
        } else {
            Cell::new(&column.field)
        };
        let range = match column.range {
            Some([min, max]) => Cell::new(format!("{min}..={max}")),
            None => dim_cell("-"),
        };
        table.add_row(vec![
            Cell::new(column.index),
            field,
            Cell::new(column.kind.label()),
            range,
        ]);
    }
    println!("{table}");
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
