// Copyright 2025 the Treemap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event scripts.
//!
//! One command per line; `#` starts a comment and blank lines are skipped.
//! Command names are case-insensitive.
//!
//! ```text
//! select 120 40     # primary click (alias: left)
//! delete 500 300    # secondary click (alias: right)
//! up                # grow the selection by 1%
//! down              # shrink the selection by 1%
//! resize 800 600    # new canvas size, status line included
//! quit
//! ```

use std::fmt;

use kurbo::Point;
use thiserror::Error;

/// One script command.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    /// Primary click at a canvas position.
    Select(Point),
    /// Secondary click at a canvas position.
    Delete(Point),
    /// Release of the Up key.
    Up,
    /// Release of the Down key.
    Down,
    /// The canvas changed size.
    Resize {
        /// New canvas width.
        width: u32,
        /// New canvas height.
        height: u32,
    },
    /// End the session.
    Quit,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Select(p) => write!(f, "select {} {}", p.x, p.y),
            Self::Delete(p) => write!(f, "delete {} {}", p.x, p.y),
            Self::Up => f.write_str("up"),
            Self::Down => f.write_str("down"),
            Self::Resize { width, height } => write!(f, "resize {width} {height}"),
            Self::Quit => f.write_str("quit"),
        }
    }
}

/// A script line that is not a command.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line}: {message}")]
pub struct ParseError {
    /// 1-based line number.
    pub line: usize,
    /// What was wrong.
    pub message: String,
}

/// Parse one line. Returns `Ok(None)` for blank lines and comments.
pub fn parse_line(text: &str) -> Result<Option<Command>, String> {
    let code = text.split_once('#').map_or(text, |(code, _)| code);
    let mut words = code.split_whitespace();
    let Some(name) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();
    let command = match name.to_ascii_lowercase().as_str() {
        "select" | "left" => Command::Select(point(&args)?),
        "delete" | "right" => Command::Delete(point(&args)?),
        "up" => nullary(Command::Up, &args)?,
        "down" => nullary(Command::Down, &args)?,
        "resize" => {
            let [w, h] = args[..] else {
                return Err(format!("resize takes WIDTH HEIGHT, got {} arguments", args.len()));
            };
            Command::Resize {
                width: w.parse().map_err(|e| format!("bad width {w:?}: {e}"))?,
                height: h.parse().map_err(|e| format!("bad height {h:?}: {e}"))?,
            }
        }
        "quit" | "exit" => nullary(Command::Quit, &args)?,
        other => return Err(format!("unknown command {other:?}")),
    };
    Ok(Some(command))
}

/// Parse a whole script, stopping at the first bad line.
pub fn parse(text: &str) -> Result<Vec<Command>, ParseError> {
    let mut out = Vec::new();
    for (i, line) in text.lines().enumerate() {
        match parse_line(line) {
            Ok(Some(command)) => out.push(command),
            Ok(None) => {}
            Err(message) => return Err(ParseError { line: i + 1, message }),
        }
    }
    Ok(out)
}

fn point(args: &[&str]) -> Result<Point, String> {
    let [x, y] = args[..] else {
        return Err(format!("expected X Y, got {} arguments", args.len()));
    };
    let coord = |s: &str| {
        s.parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| format!("bad coordinate {s:?}"))
    };
    Ok(Point::new(coord(x)?, coord(y)?))
}

fn nullary(command: Command, args: &[&str]) -> Result<Command, String> {
    if args.is_empty() {
        Ok(command)
    } else {
        Err(format!("{command} takes no arguments"))
    }
}
