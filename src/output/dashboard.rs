use colored::Colorize;

use crate::columns::ColumnDef;
use crate::detail::DetailView;
use crate::feed::FeedAdapter;
use crate::grid::DataGrid;
use crate::layout::Orientation;
use crate::model::Record;
use crate::session::Session;

/// Pixels per terminal cell when converting the grid's pixel widths.
pub const CELL_PX: u16 = 10;
const FIT_WIDTH: usize = 16;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 160,
            height: 48,
        }
    }
}

fn column_width(col: &ColumnDef) -> usize {
    col.width
        .map(|px| usize::from((px as u16).div_ceil(CELL_PX)).max(4))
        .unwrap_or(FIT_WIDTH)
}

fn fit(value: &str, width: usize) -> String {
    let count = value.chars().count();
    if count <= width {
        return format!("{value:<width$}");
    }
    let mut out: String = value.chars().take(width.saturating_sub(1)).collect();
    out.push('~');
    out
}

// Styled lines are left whole; cutting them could split an escape sequence.
fn clip(line: &str, width: usize) -> String {
    if line.contains('\x1b') {
        return line.to_string();
    }
    line.chars().take(width).collect()
}

pub fn render_status(feed: &FeedAdapter) -> String {
    let mut line = format!(
        "Records loaded: {}  Total records: {}",
        feed.loaded().to_string().bold(),
        feed.total().to_string().bold()
    );
    if feed.is_pending() {
        line.push_str(&format!("  {}", "loading...".dimmed()));
    }
    if let Some(err) = feed.last_error() {
        line.push_str(&format!("  {}", err.red()));
    }
    line
}

/// The grid's visible rows, `>` on the selection and `!` on flagged rows.
pub fn render_grid<G: DataGrid>(
    grid: &G,
    selected: Option<&crate::model::RecordId>,
    max_rows: usize,
    width: usize,
) -> Vec<String> {
    let columns = grid.columns();
    let mut lines = Vec::new();
    if columns.is_empty() {
        lines.push("(no columns selected)".dimmed().to_string());
        return lines;
    }
    let header: Vec<String> = columns
        .iter()
        .map(|c| fit(c.title, column_width(c)))
        .collect();
    lines.push(format!("  {:>5}  {}", "#", clip(&header.join(" "), width)).bold().to_string());

    let rows = grid.visible_rows();
    if rows.is_empty() {
        lines.push("  No data available".dimmed().to_string());
        return lines;
    }
    for (idx, row) in rows.iter().take(max_rows).enumerate() {
        let id = row.id();
        let flagged = id.as_ref().map(|i| grid.is_flagged(i)).unwrap_or(false);
        let marker = if flagged {
            "!"
        } else if id.is_some() && id.as_ref() == selected {
            ">"
        } else {
            " "
        };
        let cells: Vec<String> = columns
            .iter()
            .map(|c| fit(&row.cell(c.field), column_width(c)))
            .collect();
        let line = format!("{marker} {:>5}  {}", idx + 1, clip(&cells.join(" "), width));
        if flagged {
            lines.push(line.black().on_yellow().to_string());
        } else if marker == ">" {
            lines.push(line.cyan().to_string());
        } else {
            lines.push(line);
        }
    }
    if rows.len() > max_rows {
        lines.push(
            format!("  ... {} more rows", rows.len() - max_rows)
                .dimmed()
                .to_string(),
        );
    }
    lines
}

pub fn render_detail(view: &DetailView, has_bug_notice: bool) -> Vec<String> {
    let mut lines = Vec::new();
    if has_bug_notice {
        lines.push(
            "This record has been reported as buggy (dismiss to continue)."
                .yellow()
                .bold()
                .to_string(),
        );
    }
    if let Some(err) = view.error.as_deref() {
        lines.push(err.red().to_string());
    }
    match view.content.as_deref() {
        Some(content) => lines.extend(content.lines().map(str::to_string)),
        None if !has_bug_notice => lines.push("(no record selected)".dimmed().to_string()),
        None => {}
    }
    lines
}

pub fn render_summary(record: Option<&Record>, columns: &[ColumnDef]) -> Vec<String> {
    let Some(record) = record else {
        return Vec::new();
    };
    columns
        .iter()
        .map(|c| format!("{}: {}", c.title.bold(), record.cell(c.field)))
        .collect()
}

fn side_by_side(left: &[String], right: &[String], widths: &[u16], gap: usize) -> Vec<String> {
    let lw = usize::from(widths.first().copied().unwrap_or(40));
    let rw = usize::from(widths.get(1).copied().unwrap_or(40));
    let rows = left.len().max(right.len());
    (0..rows)
        .map(|i| {
            let l = left.get(i).map(|s| clip(s, lw)).unwrap_or_default();
            let r = right.get(i).map(|s| clip(s, rw)).unwrap_or_default();
            let pad = lw.saturating_sub(l.chars().count()) + gap;
            format!("{l}{}{r}", " ".repeat(pad))
        })
        .collect()
}

/// Full screen: status line, grid pane, then the info split.
pub fn render<G: DataGrid>(session: &Session<G>, viewport: Viewport) -> String {
    let layout = session.layout();
    let heights = layout.main().partition(viewport.height, CELL_PX * 2);
    let table_rows = usize::from(heights.first().copied().unwrap_or(10)).max(3);
    let info_rows = usize::from(heights.get(1).copied().unwrap_or(20)).max(3);
    let width = usize::from(viewport.width);

    let mut out = Vec::new();
    out.push(render_status(session.feed()));
    out.extend(render_grid(
        session.grid(),
        session.selection(),
        table_rows,
        width,
    ));
    out.push("-".repeat(width.min(120)));

    let detail = render_detail(session.detail(), session.has_bug_notice());
    let selected = session.grid().selected_rows();
    let summary = render_summary(selected.first().copied(), session.grid().columns());
    match layout.orientation() {
        Orientation::Horizontal => {
            let widths = layout.info().partition(viewport.width, CELL_PX);
            let gap = usize::from(layout.info().config().gutter_size.div_ceil(CELL_PX));
            let mut rows = side_by_side(&detail, &summary, &widths, gap);
            rows.truncate(info_rows);
            out.extend(rows);
        }
        Orientation::Vertical => {
            let heights = layout.info().partition(info_rows as u16, CELL_PX * 2);
            let top = usize::from(heights.first().copied().unwrap_or(10)).max(1);
            out.extend(detail.into_iter().take(top).map(|l| clip(&l, width)));
            out.push(String::new());
            out.extend(summary);
        }
    }

    if session.report().is_open() {
        out.push(String::new());
        out.push(render_report_state(session));
    }
    out.join("\n")
}

fn render_report_state<G: DataGrid>(session: &Session<G>) -> String {
    use crate::report::ReportState;
    match session.report().state() {
        ReportState::Closed => String::new(),
        ReportState::Drafting => format!(
            "{} describe the problem with `issue <text>` ({})",
            "[report]".bold(),
            session
                .selection()
                .map(|id| format!("record {id}"))
                .unwrap_or_else(|| "no record selected".to_string())
        ),
        ReportState::AwaitingFeedback(issue) => format!(
            "{} issue for {} ready, `confirm` to flag the row",
            "[report]".bold(),
            issue.record_id
        ),
    }
}
