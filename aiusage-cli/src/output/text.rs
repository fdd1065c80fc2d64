//! Text output formatting with tables and colors.

use aiusage_core::{AggregateReport, Period, ReportStatus, Usd, UsageWindow, UsageWindows};
use aiusage_providers::{DoctorReport, ProviderCheck, ProviderDescriptor};
use comfy_table::{Cell, CellAlignment, Color, ContentArrangement, Table};

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";

/// Placeholder for a null or inapplicable value.
const NONE: &str = "-";

/// Text formatter with optional colors.
pub struct TextFormatter {
    use_colors: bool,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    // ========================================================================
    // Usage report
    // ========================================================================

    /// Formats the usage report as a table followed by notes.
    pub fn format_report(&self, report: &AggregateReport, verbose: bool) -> String {
        let mut table = self.table();
        let mut header = vec![self.header_cell("Tool"), self.header_cell("Status")];
        header.extend(Period::all().iter().map(|p| self.header_cell(p.label())));
        table.set_header(header);

        for row in &report.providers {
            let mut cells = vec![
                Cell::new(&row.display_name),
                self.status_cell(row.status),
            ];
            cells.extend(window_cells(row.is_active().then_some(&row.usage)));
            table.add_row(cells);
        }

        let active = report.count(ReportStatus::Active);
        if active > 1 {
            let combined = report.combined();
            let mut cells = vec![Cell::new("All tools"), Cell::new("")];
            cells.extend(window_cells(Some(&combined)));
            table.add_row(cells);
        }

        for index in 2..2 + Period::all().len() {
            if let Some(column) = table.column_mut(index) {
                column.set_cell_alignment(CellAlignment::Right);
            }
        }

        let mut lines = vec![table.to_string()];
        let notes = self.format_notes(report, verbose);
        if !notes.is_empty() {
            lines.push(String::new());
            lines.extend(notes);
        }
        lines.push(String::new());
        lines.push(format!(
            "{active} of {} tools active",
            report.providers.len()
        ));
        lines.join("\n")
    }

    fn format_notes(&self, report: &AggregateReport, verbose: bool) -> Vec<String> {
        let mut notes = Vec::new();
        let mut hidden = 0;

        for row in &report.providers {
            let shown = verbose || matches!(row.status, ReportStatus::Active | ReportStatus::Error);
            if let Some(diagnostic) = &row.diagnostic {
                if shown {
                    notes.push(format!("  {}: {}", self.bold(&row.display_name), diagnostic));
                } else {
                    hidden += 1;
                }
            }
            if verbose && row.is_active() {
                if let Some(source) = &row.source {
                    notes.push(format!("  {}: {}", self.bold(&row.display_name), self.dim(source)));
                }
            }
        }

        if !notes.is_empty() {
            notes.insert(0, "Notes:".to_string());
        }
        if hidden > 0 {
            notes.push(self.dim(&format!(
                "{hidden} tool(s) not found; run with -v or `aiusage doctor` for details"
            )));
        }
        notes
    }

    // ========================================================================
    // Doctor
    // ========================================================================

    /// Formats the doctor report as one block per tool.
    pub fn format_doctor(&self, report: &DoctorReport) -> String {
        let mut lines = vec![self.bold("Data source check"), String::new()];

        for check in &report.checks {
            lines.extend(self.format_check(check));
        }

        lines.push(format!(
            "{}: {} of {} tools found",
            self.bold("Summary"),
            report.found,
            report.total
        ));
        lines.join("\n")
    }

    fn format_check(&self, check: &ProviderCheck) -> Vec<String> {
        let icon = if check.reachable {
            self.green("✓")
        } else {
            self.red("✗")
        };
        let mut title = format!("{icon} {}", self.bold(&check.display_name));
        if check.disabled {
            title.push_str(&self.dim(" (disabled in config)"));
        }
        let mut lines = vec![title];

        for source in &check.sources {
            let location = if source.resolution.found {
                source.resolution.location.clone()
            } else {
                self.dim(&source.resolution.location)
            };
            lines.push(format!("    [{}] {location}", source.kind));
            if let Some(detail) = &source.resolution.detail {
                lines.push(format!("      {}", self.dim(detail)));
            }
        }
        if !check.credential_env.is_empty() {
            lines.push(format!("    credential: {}", check.credential_env.join(" or ")));
        }
        if !check.reachable {
            if let Some(url) = &check.dashboard_url {
                lines.push(format!("    dashboard: {url}"));
            }
        }
        lines.push(String::new());
        lines
    }

    // ========================================================================
    // Provider list
    // ========================================================================

    /// Formats the supported tool list.
    pub fn format_providers(&self, providers: &[ProviderDescriptor]) -> String {
        let mut table = self.table();
        table.set_header(vec![
            self.header_cell("Tool"),
            self.header_cell("CLI name"),
            self.header_cell("Measures"),
            self.header_cell("Data source"),
        ]);

        for desc in providers {
            let mut name = desc.cli_name().to_string();
            if !desc.metadata.aliases.is_empty() {
                name = format!("{name} ({})", desc.metadata.aliases.join(", "));
            }
            table.add_row(vec![
                Cell::new(desc.display_name()),
                Cell::new(name),
                Cell::new(desc.capability.label()),
                Cell::new(desc.metadata.data_source),
            ]);
        }

        format!("{table}\n\nTotal: {} tools", providers.len())
    }

    // ========================================================================
    // Table/color helpers
    // ========================================================================

    fn table(&self) -> Table {
        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        if !self.use_colors {
            table.force_no_tty();
        }
        table
    }

    fn header_cell(&self, text: &str) -> Cell {
        let cell = Cell::new(text);
        if self.use_colors { cell.fg(Color::Cyan) } else { cell }
    }

    fn status_cell(&self, status: ReportStatus) -> Cell {
        let cell = Cell::new(status.label());
        if !self.use_colors {
            return cell;
        }
        match status {
            ReportStatus::Active => cell.fg(Color::Green),
            ReportStatus::Unavailable => cell.fg(Color::DarkGrey),
            ReportStatus::NotApplicable => cell.fg(Color::Blue),
            ReportStatus::Error => cell.fg(Color::Red),
        }
    }

    fn bold(&self, text: &str) -> String {
        self.paint(BOLD, text)
    }

    fn dim(&self, text: &str) -> String {
        self.paint(DIM, text)
    }

    fn green(&self, text: &str) -> String {
        self.paint(GREEN, text)
    }

    fn red(&self, text: &str) -> String {
        self.paint(RED, text)
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.use_colors {
            format!("{code}{text}{RESET}")
        } else {
            text.to_string()
        }
    }
}

// ============================================================================
// Cell text
// ============================================================================

fn window_cells(usage: Option<&UsageWindows>) -> Vec<Cell> {
    Period::all()
        .iter()
        .map(|&period| {
            let text = usage.map_or_else(|| NONE.to_string(), |u| format_window(u.get(period)));
            Cell::new(text)
        })
        .collect()
}

/// Formats one window cell.
///
/// Tokens when known, otherwise the request count, otherwise a dash. A null
/// token count is never shown as zero. A recorded cost follows in brackets.
pub fn format_window(window: &UsageWindow) -> String {
    let usage = match window.total_tokens {
        Some(total) => format_number(total),
        None if window.request_count > 0 => {
            let n = window.request_count;
            format!("{} req{}", format_number(n), if n == 1 { "" } else { "s" })
        }
        None => NONE.to_string(),
    };
    match window.cost_usd {
        Some(cost) => format!("{usage} ({})", format_cost(cost)),
        None => usage,
    }
}

/// Formats a cost in dollars and cents.
pub fn format_cost(cost: Usd) -> String {
    format!("${:.2}", cost.dollars())
}

/// Formats a count with a K/M suffix.
#[allow(clippy::cast_precision_loss)]
pub fn format_number(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

// ============================================================================
// Tests
// ============================================================================
