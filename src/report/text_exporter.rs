use crate::errors::{LedgerError, Result, ServiceKind};

use super::table_renderer::{Alignment, Table, TableColumn};
use super::{DocumentExporter, TableSpec};

const DEFAULT_MAX_COLUMN_WIDTH: usize = 32;

/// Plain-text exporter: a title block followed by a fixed-width table.
#[derive(Debug, Clone)]
pub struct TextTableExporter {
    pub max_column_width: usize,
    pub padding: usize,
}

impl Default for TextTableExporter {
    fn default() -> Self {
        Self {
            max_column_width: DEFAULT_MAX_COLUMN_WIDTH,
            padding: 1,
        }
    }
}

impl TextTableExporter {
    fn table_for(&self, spec: &TableSpec) -> Table {
        let columns = spec
            .head
            .iter()
            .enumerate()
            .map(|(idx, header)| TableColumn {
                header: header.clone(),
                min_width: 0,
                max_width: Some(self.max_column_width),
                alignment: if spec.numeric_columns.contains(&idx) {
                    Alignment::Right
                } else {
                    Alignment::Left
                },
            })
            .collect();
        Table {
            columns,
            rows: spec.body.clone(),
            padding: self.padding,
        }
    }
}

impl DocumentExporter for TextTableExporter {
    fn render(&self, spec: &TableSpec) -> Result<Vec<u8>> {
        if spec.head.is_empty() {
            return Err(LedgerError::external(
                ServiceKind::Export,
                "report table has no columns",
            ));
        }
        if let Some(row) = spec.body.iter().find(|row| row.len() > spec.head.len()) {
            return Err(LedgerError::external(
                ServiceKind::Export,
                format!(
                    "row has {} cells but the table has {} columns",
                    row.len(),
                    spec.head.len()
                ),
            ));
        }

        let mut out = String::new();
        out.push_str(&spec.title);
        out.push('\n');
        for line in spec.subtitle_lines.iter().chain(&spec.summary_lines) {
            out.push_str(line);
            out.push('\n');
        }
        out.push('\n');
        out.push_str(&self.table_for(spec).render());
        out.push('\n');
        Ok(out.into_bytes())
    }

    fn extension(&self) -> &str {
        "txt"
    }
}
