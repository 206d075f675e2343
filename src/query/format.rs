//! Tabular rendering of query results.
//!
//! Results are rendered as a grid-style text table: a border, one header
//! row, and one line per data row. No row index column is added.

use crate::db::{ColumnInfo, QueryOutput, Row};

/// Returned by `execute` for statements that produce no result set.
pub const NO_RESULT_MARKER: &str = "OK: statement executed, no result set";

/// Renders a query output for display.
pub fn render_output(output: &QueryOutput) -> String {
    match output {
        QueryOutput::Rows { columns, rows } => render_table(columns, rows),
        QueryOutput::NoResultSet => NO_RESULT_MARKER.to_string(),
    }
}

/// Renders columns and rows as a grid-style text table.
pub fn render_table(columns: &[ColumnInfo], rows: &[Row]) -> String {
    let headers: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();

    // Column widths: the widest of the header and every value.
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    let rendered_rows: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.iter().map(|v| v.to_display_string()).collect())
        .collect();
    for row in &rendered_rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }
    }

    let border = render_border(&widths);

    let mut out = String::new();
    out.push_str(&border);
    out.push('\n');
    out.push_str(&render_row(&headers, &widths));
    out.push('\n');
    out.push_str(&border);
    for row in &rendered_rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        out.push('\n');
        out.push_str(&render_row(&cells, &widths));
    }
    out.push('\n');
    out.push_str(&border);
    out
}

fn render_border(widths: &[usize]) -> String {
    let mut line = String::from("+");
    for width in widths {
        line.push_str(&"-".repeat(width + 2));
        line.push('+');
    }
    line
}

fn render_row(cells: &[&str], widths: &[usize]) -> String {
    let mut line = String::from("|");
    for (cell, width) in cells.iter().zip(widths) {
        let padding = width - cell.chars().count();
        line.push(' ');
        line.push_str(cell);
        line.push_str(&" ".repeat(padding + 1));
        line.push('|');
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Value;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_single_cell() {
        let columns = vec![ColumnInfo::new("x", "integer")];
        let rows = vec![vec![Value::Int(1)]];

        let table = render_table(&columns, &rows);

        assert_eq!(table, "+---+\n| x |\n+---+\n| 1 |\n+---+");
    }

    #[test]
    fn test_render_pads_to_widest_value() {
        let columns = vec![
            ColumnInfo::new("id", "integer"),
            ColumnInfo::new("name", "text"),
        ];
        let rows = vec![
            vec![Value::Int(1), Value::from("Alice")],
            vec![Value::Int(2), Value::from("Bob")],
        ];

        let table = render_table(&columns, &rows);

        let expected = "\
+----+-------+
| id | name  |
+----+-------+
| 1  | Alice |
| 2  | Bob   |
+----+-------+";
        assert_eq!(table, expected);
    }

    #[test]
    fn test_row_and_column_counts() {
        let columns = vec![
            ColumnInfo::new("a", "integer"),
            ColumnInfo::new("b", "integer"),
            ColumnInfo::new("c", "integer"),
        ];
        let rows: Vec<Row> = (0..5)
            .map(|i| vec![Value::Int(i), Value::Int(i * 2), Value::Int(i * 3)])
            .collect();

        let table = render_table(&columns, &rows);
        let lines: Vec<&str> = table.lines().collect();

        // 3 borders + 1 header + 5 data rows.
        assert_eq!(lines.len(), 9);
        // Every printable row has one cell per column.
        for line in lines.iter().filter(|l| l.starts_with('|')) {
            assert_eq!(line.matches('|').count(), 4);
        }
    }

    #[test]
    fn test_values_in_column_order() {
        let columns = vec![
            ColumnInfo::new("first", "text"),
            ColumnInfo::new("second", "text"),
        ];
        let rows = vec![vec![Value::from("left"), Value::from("right")]];

        let table = render_table(&columns, &rows);
        let data_line = table.lines().nth(3).unwrap();
        let left = data_line.find("left").unwrap();
        let right = data_line.find("right").unwrap();
        assert!(left < right);
    }

    #[test]
    fn test_render_null() {
        let columns = vec![ColumnInfo::new("v", "text")];
        let rows = vec![vec![Value::Null]];
        let table = render_table(&columns, &rows);
        assert!(table.contains("NULL"));
    }

    #[test]
    fn test_render_empty_result_keeps_header() {
        let columns = vec![ColumnInfo::new("id", "integer")];
        let table = render_table(&columns, &[]);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4); // border, header, border, border
        assert!(lines[1].contains("id"));
    }

    #[test]
    fn test_render_output_no_result_set() {
        let rendered = render_output(&QueryOutput::NoResultSet);
        assert_eq!(rendered, NO_RESULT_MARKER);
        assert!(!rendered.is_empty());
    }
}
