// Copyright 2025 the Treemap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A running treemap: script commands in, status lines and frames out.

use std::io::{BufRead, Read, Write};

use tracing::{debug, info, warn};
use treemap_interaction::{Action, Button, ClickState, Event, Key, Response, Visualiser};
use treemap_layout::TilingKind;
use treemap_tree::Tree;

use crate::config::ViewConfig;
use crate::error::{AppError, AppResult};
use crate::render::Frame;
use crate::script::{self, Command};

/// Milliseconds between consecutive commands on the session clock.
const TICK: u64 = 1000;

/// Drives a [`Visualiser`] from [`Command`]s and writes status lines to `out`.
pub struct Session<W: Write> {
    vis: Visualiser,
    view: ViewConfig,
    clock: u64,
    printed_status: String,
    out: W,
}

impl<W: Write> std::fmt::Debug for Session<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("vis", &self.vis)
            .field("view", &self.view)
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

impl<W: Write> Session<W> {
    /// Lay out `tree` for `view` and start with nothing selected.
    pub fn new(tree: Tree, view: ViewConfig, out: W) -> Self {
        let tree = tree.with_colour_seed(view.colour_seed);
        let clicks =
            ClickState::with_thresholds(Some(view.click_distance), Some(view.click_time_ms));
        let vis = Visualiser::new(tree, view.treemap_bounds(), TilingKind::from(view.tiling))
            .with_click_state(clicks);
        info!(
            tiles = vis.treemap().tiles().len(),
            width = view.width,
            height = view.height,
            tiling = ?view.tiling,
            "session started"
        );
        Self {
            vis,
            view,
            clock: 0,
            printed_status: String::new(),
            out,
        }
    }

    /// The controller.
    pub fn visualiser(&self) -> &Visualiser {
        &self.vis
    }

    /// The current view, including any resizes.
    pub fn view(&self) -> &ViewConfig {
        &self.view
    }

    /// Whether a `quit` has been seen.
    pub fn is_running(&self) -> bool {
        self.vis.is_running()
    }

    /// Draw the current state.
    pub fn frame(&self) -> Frame {
        Frame::capture(&self.vis, &self.view)
    }

    /// Give back the output.
    pub fn into_output(self) -> W {
        self.out
    }

    /// Apply one command. A changed status line is written to the output.
    pub fn apply(&mut self, command: Command) -> AppResult<Response> {
        let time = self.clock;
        self.clock += TICK;
        debug!(%command, time, "command");

        let response = match command {
            Command::Select(p) => self.vis.click(Button::Primary, p, time),
            Command::Delete(p) => self.vis.click(Button::Secondary, p, time),
            Command::Up => self.vis.handle(Event::Key(Key::Up)),
            Command::Down => self.vis.handle(Event::Key(Key::Down)),
            Command::Resize { width, height } => {
                let view = ViewConfig {
                    width,
                    height,
                    ..self.view.clone()
                };
                view.validate()?;
                self.view = view;
                self.vis.handle(Event::Resize(self.view.treemap_bounds()))
            }
            Command::Quit => self.vis.handle(Event::Quit),
        };

        if let Some(action) = response.action {
            self.log(action);
        }
        if self.vis.status() != self.printed_status {
            self.printed_status = self.vis.status().to_owned();
            writeln!(self.out, "{}", self.printed_status).map_err(stdout_error)?;
        }
        Ok(response)
    }

    /// Run a whole script. A bad line anywhere rejects the script before any
    /// command runs; a failing command or `quit` stops it.
    pub fn run_script(&mut self, mut input: impl BufRead, origin: &str) -> AppResult<()> {
        let mut text = String::new();
        input
            .read_to_string(&mut text)
            .map_err(|source| AppError::Io {
                what: format!("read {origin}"),
                source,
            })?;
        let commands = script::parse(&text).map_err(|source| AppError::Script {
            origin: origin.to_owned(),
            source,
        })?;
        debug!(origin, commands = commands.len(), "script parsed");
        for command in commands {
            self.apply(command)?;
            if !self.vis.is_running() {
                break;
            }
        }
        Ok(())
    }

    /// Run commands as they arrive. Bad lines and failing commands are
    /// reported and skipped.
    pub fn run_interactive(&mut self, input: impl BufRead, origin: &str) -> AppResult<()> {
        for (i, line) in input.lines().enumerate() {
            let line = line.map_err(|source| AppError::Io {
                what: format!("read {origin}"),
                source,
            })?;
            match script::parse_line(&line) {
                Ok(Some(command)) => {
                    if let Err(e) = self.apply(command) {
                        warn!(error = %e, "command failed");
                    }
                }
                Ok(None) => {}
                Err(message) => warn!(line = i + 1, %message, "skipping line"),
            }
            if !self.vis.is_running() {
                break;
            }
        }
        Ok(())
    }

    /// Write every tile as `x y width height path (value)`.
    pub fn list(&mut self) -> AppResult<()> {
        let tree = self.vis.tree();
        for tile in self.vis.treemap().tiles() {
            let r = tile.rect;
            writeln!(
                self.out,
                "{} {} {} {} {} ({})",
                r.x0,
                r.y0,
                r.width(),
                r.height(),
                tree.path(tile.node).unwrap_or_default(),
                tree.value(tile.node).unwrap_or_default()
            )
            .map_err(stdout_error)?;
        }
        Ok(())
    }

    fn log(&self, action: Action) {
        let tree = self.vis.tree();
        match action {
            Action::Selected(id) => info!(path = ?tree.path(id), "selected"),
            Action::Deselected(_) => info!("selection cleared"),
            Action::Deleted { value, .. } => info!(
                value,
                total = tree.value(tree.root()),
                "deleted"
            ),
            Action::Resized { node, from, to } => info!(
                path = ?tree.path(node),
                from,
                to,
                "resized"
            ),
            Action::Relaid(bounds) => info!(?bounds, "relaid"),
            Action::Quit => info!("quit"),
        }
    }
}

fn stdout_error(source: std::io::Error) -> AppError {
    AppError::Io {
        what: "write output".to_owned(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;

    // 1000×530 canvas: 1000×500 treemap, Europe (France 300 over Spain 100) on
    // the left and Japan 400 on the right.
    fn session() -> Session<Vec<u8>> {
        let mut tree = Tree::new("World");
        let root = tree.root();
        let europe = tree.insert(root, "Europe", 0).unwrap();
        let asia = tree.insert(root, "Asia", 0).unwrap();
        tree.insert(europe, "France", 300).unwrap();
        tree.insert(europe, "Spain", 100).unwrap();
        tree.insert(asia, "Japan", 400).unwrap();
        let view = ViewConfig {
            width: 1000,
            height: 530,
            ..ViewConfig::default()
        };
        Session::new(tree, view, Vec::new())
    }

    fn output(session: Session<Vec<u8>>) -> String {
        String::from_utf8(session.into_output()).unwrap()
    }

    #[test]
    fn script_prints_status_changes() {
        let mut s = session();
        let script = "\
select 100 100
up
delete 450 100   # Spain, now beside France
select 100 100
quit
select 900 10
";
        s.run_script(script.as_bytes(), "test").unwrap();
        assert!(!s.is_running());
        assert_eq!(s.visualiser().selected(), None);
        assert_eq!(s.visualiser().tree().value(s.visualiser().tree().root()), Some(703));
        assert_eq!(
            output(s),
            "World -> Europe -> France      (300)\n\
             World -> Europe -> France      (303)\n\
             \n"
        );
    }

    #[test]
    fn strict_scripts_stop_at_bad_lines() {
        let mut s = session();
        let err = s
            .run_script("select 100 100\nwiggle 1 2\nup\n".as_bytes(), "demo.txt")
            .unwrap_err();
        assert!(
            matches!(&err, AppError::Script { origin, source } if origin == "demo.txt" && source.line == 2),
            "{err}"
        );
        // Nothing ran, not even the good first line.
        assert_eq!(s.visualiser().selected(), None);
        assert_eq!(output(s), "");
    }

    #[test]
    fn strict_scripts_stop_at_failing_commands() {
        let mut s = session();
        let err = s
            .run_script("resize 10 10\nselect 100 100\n".as_bytes(), "demo.txt")
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidView(_)), "{err}");
        assert_eq!(s.visualiser().selected(), None);
    }

    #[test]
    fn interactive_skips_bad_lines() {
        let mut s = session();
        s.run_interactive("wiggle\nresize 10 10\nselect 900 10\n".as_bytes(), "<stdin>")
            .unwrap();
        assert!(s.visualiser().selected().is_some());
        assert_eq!(s.view().width, 1000);
    }

    #[test]
    fn resize_relays_the_treemap() {
        let mut s = session();
        let r = s
            .apply(Command::Resize {
                width: 500,
                height: 230,
            })
            .unwrap();
        assert!(r.redraw);
        assert_eq!(s.view().treemap_bounds().height(), 200.0);
        let leaf = s.visualiser().treemap().leaf_at(Point::new(400.0, 100.0));
        assert_eq!(
            leaf.and_then(|id| s.visualiser().tree().name(id)),
            Some("Japan")
        );
    }

    #[test]
    fn clicks_on_the_status_line_are_ignored() {
        let mut s = session();
        let r = s.apply(Command::Select(Point::new(10.0, 520.0))).unwrap();
        assert_eq!(r.action, None);
        assert_eq!(output(s), "");
    }

    #[test]
    fn list_writes_one_line_per_tile() {
        let mut s = session();
        s.list().unwrap();
        let text = output(s);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(
            lines,
            [
                "0 0 500 375 World -> Europe -> France (300)",
                "0 375 500 125 World -> Europe -> Spain (100)",
                "500 0 500 500 World -> Asia -> Japan (400)",
            ]
        );
    }
}
