/// Describes how a column should align its contents.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Right,
}

/// Specifies the configuration for a single column in the rendered table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableColumn {
    pub header: String,
    pub min_width: usize,
    pub max_width: Option<usize>,
    pub alignment: Alignment,
}

/// Represents a table with column metadata and rows of data to render.
pub struct Table {
    pub columns: Vec<TableColumn>,
    pub rows: Vec<Vec<String>>,
    pub padding: usize,
}

impl Table {
    /// Computes the content widths for each column based on headers, rows, and
    /// column constraints.
    pub fn compute_widths(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                let mut width = visible_width(&column.header).max(column.min_width);
                for row in &self.rows {
                    if let Some(cell) = row.get(idx) {
                        width = width.max(visible_width(cell));
                    }
                }
                if let Some(max_width) = column.max_width {
                    width = width.min(max_width);
                }
                width
            })
            .collect()
    }

    /// Renders a single row using the provided column widths.
    pub fn render_row(&self, row: &[String], widths: &[usize]) -> String {
        let rendered_cells: Vec<String> = self
            .columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                let cell_text = row.get(idx).map(|s| s.as_str()).unwrap_or("");
                render_cell(cell_text, widths[idx], column.alignment, self.padding)
            })
            .collect();

        rendered_cells.join("|").trim_end().to_string()
    }

    /// Renders the header, a separator and every row.
    pub fn render(&self) -> String {
        let widths = self.compute_widths();
        let header: Vec<String> = self.columns.iter().map(|c| c.header.clone()).collect();

        let mut lines = Vec::with_capacity(self.rows.len() + 2);
        lines.push(self.render_row(&header, &widths));
        lines.push(horizontal_rule(&widths, self.padding));
        for row in &self.rows {
            lines.push(self.render_row(row, &widths));
        }
        lines.join("\n")
    }
}

fn visible_width(text: &str) -> usize {
    text.chars().count()
}

fn truncate_text(text: &str, width: usize) -> String {
    if visible_width(text) <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut result: String = text.chars().take(width - 1).collect();
    result.push('…');
    result
}

/// Renders a single cell with padding and alignment applied.
pub fn render_cell(text: &str, width: usize, alignment: Alignment, padding: usize) -> String {
    let fitted = truncate_text(text, width);
    let remaining = width.saturating_sub(visible_width(&fitted));

    let (left_spaces, right_spaces) = match alignment {
        Alignment::Left => (0, remaining),
        Alignment::Right => (remaining, 0),
    };

    let mut cell = String::new();
    cell.push_str(&" ".repeat(padding + left_spaces));
    cell.push_str(&fitted);
    cell.push_str(&" ".repeat(right_spaces + padding));
    cell
}

/// Builds a horizontal rule that spans the width of the table.
pub fn horizontal_rule(widths: &[usize], padding: usize) -> String {
    widths
        .iter()
        .map(|width| "-".repeat(width + padding * 2))
        .collect::<Vec<_>>()
        .join("+")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(header: &str, alignment: Alignment) -> TableColumn {
        TableColumn {
            header: header.into(),
            min_width: 0,
            max_width: Some(8),
            alignment,
        }
    }

    #[test]
    fn right_aligned_cells_pad_on_the_left() {
        assert_eq!(render_cell("42", 5, Alignment::Right, 1), "    42 ");
        assert_eq!(render_cell("42", 5, Alignment::Left, 0), "42   ");
    }

    #[test]
    fn long_cells_are_truncated_with_ellipsis() {
        assert_eq!(truncate_text("Supermarket", 6), "Super…");
    }

    #[test]
    fn render_includes_header_rule_and_rows() {
        let table = Table {
            columns: vec![column("Item", Alignment::Left), column("Value", Alignment::Right)],
            rows: vec![vec!["Rent".into(), "300".into()]],
            padding: 1,
        };
        let rendered = table.render();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], " Item | Value");
        assert_eq!(lines[1], "------+-------");
        assert_eq!(lines[2], " Rent |   300");
    }
}
