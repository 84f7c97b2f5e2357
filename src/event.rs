//! Parsing of inbound wire events.
//!
//! Two unrelated client protocols arrive multiplexed on one stream: cell
//! edits as HTMX trigger payloads and room joins as supervisor events.
//! Parsing is total; anything that fails validation degrades to
//! [`GameEvent::Noop`] so malformed client input can never crash or
//! log-spam the session.

use serde_json::Value;

/// Internal event applied to the session engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// A player wrote `value` into the cell at `(x, y)`.
    SetCell {
        /// Column, 0-based.
        x: usize,
        /// Row, 0-based.
        y: usize,
        /// Digit 0-9; 0 clears the cell.
        value: u8,
    },
    /// A player joined and needs a full board snapshot.
    NewPlayer {
        /// Identifier assigned by the room supervisor.
        id: i64,
    },
    /// Begin a fresh round. Never produced by parsing; the engine injects
    /// it at startup and on scheduled restarts.
    StartGame,
    /// Unrecognized or invalid input; applied as a no-op.
    Noop,
}

/// Translates a decoded JSON payload into a [`GameEvent`].
///
/// Trigger-style edit payloads take priority over room events; input
/// matching neither shape yields [`GameEvent::Noop`].
pub fn parse_event(data: &Value) -> GameEvent {
    if let Some(trigger) = data
        .get("HEADERS")
        .and_then(|headers| headers.get("HX-Trigger"))
        .and_then(Value::as_str)
    {
        return parse_cell_edit(data, trigger);
    }

    if data.get("t").and_then(Value::as_str) == Some("Join") {
        if let Some(id) = data.get("id").and_then(integer) {
            return GameEvent::NewPlayer { id };
        }
    }

    GameEvent::Noop
}

/// Parses a `cell_<x>_<y>` trigger with its same-keyed value field.
fn parse_cell_edit(data: &Value, trigger: &str) -> GameEvent {
    let mut tokens = trigger.split('_');
    if tokens.next() != Some("cell") {
        return GameEvent::Noop;
    }

    let coordinates: Vec<&str> = tokens.collect();
    if coordinates.len() != 2 {
        return GameEvent::Noop;
    }

    // The value lives under the trigger's own name; a missing field (or a
    // payload keyed under some other cell) invalidates the event. A value
    // of zero is still a value.
    let Some(payload) = data.get(trigger) else {
        return GameEvent::Noop;
    };

    let parsed = [
        coordinates[0].parse::<i64>().ok(),
        coordinates[1].parse::<i64>().ok(),
        integer(payload),
    ];

    match parsed {
        [Some(x), Some(y), Some(value)] if parsed.iter().flatten().all(in_bounds) => {
            GameEvent::SetCell {
                x: x as usize,
                y: y as usize,
                value: value as u8,
            }
        }
        _ => GameEvent::Noop,
    }
}

/// Extracts an integer from a JSON number or numeric string.
fn integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => text.parse().ok(),
        _ => None,
    }
}

fn in_bounds(value: &i64) -> bool {
    (0..=9).contains(value)
}
