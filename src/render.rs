//! HTML fragment rendering.
//!
//! Every fragment is a single line carrying an element id, so the
//! supervisor can broadcast stdout verbatim and HTMX swaps each fragment
//! into place out-of-band on every connected client.

use crate::engine::{BoardView, CellView, ProgressView, Status, ViewUpdate};

/// Renders a view update into one or more fragment lines.
pub fn fragments(update: &ViewUpdate) -> Vec<String> {
    match update {
        ViewUpdate::Board(board) => board_fragments(board),
        ViewUpdate::Cell(cell) => vec![cell_fragment(cell)],
        ViewUpdate::Status(status) => vec![overlay(status_text(*status), "message")],
        ViewUpdate::Progress(progress) => progress_fragments(progress),
    }
}

/// Renders the status overlay with the given element id.
///
/// The engine uses id `message`; fatal startup failures use id `error`.
pub fn overlay(message: &str, id: &str) -> String {
    format!(r#"<div id="{id}" class="overlay">{message}</div>"#)
}

fn status_text(status: Status) -> &'static str {
    match status {
        Status::Clear => "",
        Status::Success => "Success!",
        Status::Failed => "Failed!",
    }
}

fn board_fragments(board: &BoardView) -> Vec<String> {
    board
        .rows
        .iter()
        .enumerate()
        .map(|(y, row)| row_fragment(row, y))
        .collect()
}

fn row_fragment(cells: &[CellView], y: usize) -> String {
    let mut row = format!(r#"<tr id="row_{y}">"#);
    for cell in cells {
        row.push_str("<td>");
        row.push_str(&cell_fragment(cell));
        row.push_str("</td>");
    }
    row.push_str("</tr>");
    row
}

fn cell_fragment(cell: &CellView) -> String {
    let CellView { x, y, value, fixed } = *cell;
    let value = if value == 0 {
        String::new()
    } else {
        value.to_string()
    };

    if fixed {
        format!(
            r#"<input id="cell_{x}_{y}" disabled="true" hx-swap-oob="true" name="cell_{x}_{y}" value="{value}" />"#
        )
    } else {
        format!(
            r#"<input id="cell_{x}_{y}" hx-swap-oob="true" name="cell_{x}_{y}" value="{value}" hx-ws="send" hx-trigger="keyup changed" maxlength="1" onfocus="this.select()" onclick="this.select()" />"#
        )
    }
}

fn progress_fragments(progress: &ProgressView) -> Vec<String> {
    vec![
        format!(
            r#"<span id="completion-label">{}% completed</span>"#,
            progress.percent_complete
        ),
        bar("completion-label", progress.percent_complete),
        format!(
            r#"<span id="time-label">{} min remaining</span>"#,
            progress.minutes_remaining
        ),
        bar("time-label", progress.percent_time),
    ]
}

fn bar(label_id: &str, percent: i64) -> String {
    format!(
        r##"<span id="{label_id}-data" class="progress-bar" role="progressbar" aria-labelledby="{label_id}" aria-valuenow="{percent}"><svg width="100" height="10"><rect height="10" width="100" fill="white" /><rect height="10" width="{percent}" fill="#0369a1" /></svg></span>"##
    )
}
