//! Tabular report views and the document exporter capability.
//!
//! The aggregator produces flat tables; turning them into a paginated document
//! is the exporter's job. Exports are point-in-time snapshots.

pub mod table_renderer;
pub mod text_exporter;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::auth::Identity;
use crate::core::services::{ManagementSummary, Statement};
use crate::currency::{format_currency, format_date};
use crate::domain::{MonthSelector, TransactionKind};
use crate::errors::{LedgerError, Result, ServiceKind};
use crate::utils::persistence::write_atomic;

pub use text_exporter::TextTableExporter;

/// Flat, renderer-agnostic description of a report.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TableSpec {
    pub title: String,
    #[serde(default)]
    pub subtitle_lines: Vec<String>,
    #[serde(default)]
    pub summary_lines: Vec<String>,
    pub head: Vec<String>,
    pub body: Vec<Vec<String>>,
    /// Column indexes holding amounts; renderers right-align them.
    #[serde(default)]
    pub numeric_columns: Vec<usize>,
}

impl TableSpec {
    /// Management view: month totals, bucket totals and the filtered listing.
    pub fn from_management_summary(summary: &ManagementSummary, author: &Identity) -> Self {
        let mut summary_lines = vec![
            format!("Income (month): {}", format_currency(summary.totals.income)),
            format!(
                "Paid expenses (month): {}",
                format_currency(summary.totals.paid_expense)
            ),
            format!(
                "Pending expenses (month): {}",
                format_currency(summary.totals.pending_expense)
            ),
            format!(
                "Saved (month): {}",
                format_currency(summary.totals.savings_out)
            ),
            format!(
                "Free balance (month): {}",
                format_currency(summary.free_balance)
            ),
            format!(
                "Total saved (all time): {}",
                format_currency(summary.total_saved)
            ),
        ];
        summary_lines.extend(summary.buckets.entries.iter().map(|bucket| {
            format!("  {}: {}", bucket.name, format_currency(bucket.total))
        }));

        let body = summary
            .transactions
            .iter()
            .map(|txn| {
                vec![
                    format_date(txn.date),
                    txn.description.clone(),
                    txn.kind.to_string(),
                    status_label(txn.kind, txn.settled).to_string(),
                    format_currency(txn.amount),
                    txn.note.clone().unwrap_or_else(|| "-".into()),
                ]
            })
            .collect();

        Self {
            title: format!("Financial report - {}", summary.month.label()),
            subtitle_lines: vec![format!("Generated by: {}", author.first_name())],
            summary_lines,
            head: ["Date", "Description", "Type", "Status", "Amount", "Note"]
                .iter()
                .map(|h| h.to_string())
                .collect(),
            body,
            numeric_columns: vec![4],
        }
    }

    /// Statement view: opening line, one line per entry, closing balance.
    pub fn from_statement(statement: &Statement, author: &Identity) -> Self {
        let mut body = vec![vec![
            format_date(statement.month.first_day()),
            "Opening balance".into(),
            String::new(),
            String::new(),
            String::new(),
            format_currency(statement.prior_balance),
        ]];
        body.extend(statement.lines.iter().map(|line| {
            let effect = if line.kind == TransactionKind::Expense && !line.settled {
                "pending".to_string()
            } else {
                format_currency(line.signed_amount)
            };
            vec![
                format_date(line.date),
                line.description.clone(),
                line.kind.to_string(),
                format_currency(line.amount),
                effect,
                format_currency(line.running_balance),
            ]
        }));

        Self {
            title: format!("Statement - {}", statement.month.label()),
            subtitle_lines: vec![format!("Generated by: {}", author.first_name())],
            summary_lines: vec![
                format!(
                    "Opening balance: {}",
                    format_currency(statement.prior_balance)
                ),
                format!(
                    "Closing balance: {}",
                    format_currency(statement.final_balance)
                ),
            ],
            head: ["Date", "Description", "Type", "Amount", "Effect", "Balance"]
                .iter()
                .map(|h| h.to_string())
                .collect(),
            body,
            numeric_columns: vec![3, 4, 5],
        }
    }
}

fn status_label(kind: TransactionKind, settled: bool) -> &'static str {
    match kind {
        TransactionKind::Expense if settled => "Paid",
        TransactionKind::Expense => "Pending",
        TransactionKind::SavingsTransfer => "Deposited",
        TransactionKind::Income => "-",
    }
}

/// Renders a [`TableSpec`] into document bytes.
pub trait DocumentExporter: Send + Sync {
    fn render(&self, spec: &TableSpec) -> Result<Vec<u8>>;

    /// File extension of the produced document, without the dot.
    fn extension(&self) -> &str {
        "pdf"
    }
}

/// `report_March_2024.pdf`-style file name for a month.
pub fn report_file_name(month: MonthSelector, extension: &str) -> String {
    format!("report_{}.{}", month.label().replace(' ', "_"), extension)
}

/// Renders the report in memory, then writes it atomically to `dir`.
///
/// No file is left behind when rendering or writing fails.
pub fn export_report(
    exporter: &dyn DocumentExporter,
    spec: &TableSpec,
    dir: &Path,
    file_name: &str,
) -> Result<PathBuf> {
    let bytes = exporter.render(spec).map_err(|err| {
        tracing::error!(error = %err, title = %spec.title, "report rendering failed");
        match err {
            LedgerError::ExternalService { .. } => err,
            other => LedgerError::external(ServiceKind::Export, other.to_string()),
        }
    })?;

    let path = dir.join(file_name);
    if let Err(err) = write_atomic(&path, &bytes) {
        tracing::error!(error = %err, path = %path.display(), "report write failed");
        return Err(LedgerError::external(ServiceKind::Export, err.to_string()));
    }
    tracing::info!(path = %path.display(), bytes = bytes.len(), "report exported");
    Ok(path)
}
