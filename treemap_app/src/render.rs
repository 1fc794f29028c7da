// Copyright 2025 the Treemap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frames: what a window would show, as a display list and as SVG.
//!
//! A frame is a black canvas with the treemap tiles on top, the selected tile
//! outlined, and the status text in white along the bottom.

use std::fmt::Write as _;

use kurbo::{Point, Rect, Size};
use treemap_interaction::Visualiser;
use treemap_layout::Tiling;
use treemap_tree::Rgb;

use crate::config::ViewConfig;

/// Width of the outline around the selected tile.
const OUTLINE_WIDTH: f64 = 3.0;

/// One drawing command.
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    /// A filled rectangle.
    Fill {
        /// Where.
        rect: Rect,
        /// Fill colour.
        colour: Rgb,
    },
    /// A rectangle outline drawn inside `rect`.
    Outline {
        /// Where.
        rect: Rect,
        /// Stroke colour.
        colour: Rgb,
        /// Stroke width.
        width: f64,
    },
    /// A line of text; `origin` is its top-left corner.
    Text {
        /// Top-left corner.
        origin: Point,
        /// Font size in pixels.
        size: f64,
        /// Font family.
        family: String,
        /// Text colour.
        colour: Rgb,
        /// The text.
        text: String,
    },
}

/// A display list for one frame, painted in order.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    /// Canvas size.
    pub size: Size,
    /// Canvas colour.
    pub background: Rgb,
    /// Shapes, back to front.
    pub shapes: Vec<Shape>,
}

impl Frame {
    /// Draw the current state of `vis` on a canvas described by `view`.
    pub fn capture<L: Tiling>(vis: &Visualiser<L>, view: &ViewConfig) -> Self {
        let treemap = vis.treemap();
        let mut shapes: Vec<Shape> = treemap
            .tiles()
            .iter()
            .filter(|t| t.rect.area() > 0.0)
            .map(|t| Shape::Fill {
                rect: t.rect,
                colour: t.colour,
            })
            .collect();

        if let Some(tile) = vis.selected().and_then(|id| treemap.tile_of(id)) {
            shapes.push(Shape::Outline {
                rect: tile.rect,
                colour: contrast(tile.colour),
                width: OUTLINE_WIDTH,
            });
        }

        if !vis.status().is_empty() {
            let font_height = f64::from(view.font_height);
            shapes.push(Shape::Text {
                origin: Point::new(0.0, f64::from(view.height) - font_height + 4.0),
                size: font_height - 8.0,
                family: view.font_family.clone(),
                colour: Rgb::WHITE,
                text: vis.status().to_owned(),
            });
        }

        Self {
            size: view.canvas(),
            background: Rgb::BLACK,
            shapes,
        }
    }

    /// Render as a standalone SVG document.
    pub fn to_svg(&self) -> String {
        let mut svg = String::new();
        // Writing to a String cannot fail.
        let _ = self.write_svg(&mut svg);
        svg
    }

    fn write_svg(&self, out: &mut String) -> std::fmt::Result {
        let Size { width, height } = self.size;
        writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
        )?;
        writeln!(
            out,
            r#"  <rect x="0" y="0" width="{width}" height="{height}" fill="{}"/>"#,
            hex(self.background)
        )?;
        for shape in &self.shapes {
            match shape {
                Shape::Fill { rect, colour } => writeln!(
                    out,
                    r#"  <rect x="{}" y="{}" width="{}" height="{}" fill="{}"/>"#,
                    rect.x0,
                    rect.y0,
                    rect.width(),
                    rect.height(),
                    hex(*colour)
                )?,
                Shape::Outline {
                    rect,
                    colour,
                    width,
                } => {
                    let inner = rect.inset(-width / 2.0);
                    writeln!(
                        out,
                        r#"  <rect x="{}" y="{}" width="{}" height="{}" fill="none" stroke="{}" stroke-width="{width}"/>"#,
                        inner.x0,
                        inner.y0,
                        inner.width().max(0.0),
                        inner.height().max(0.0),
                        hex(*colour)
                    )?;
                }
                Shape::Text {
                    origin,
                    size,
                    family,
                    colour,
                    text,
                } => writeln!(
                    out,
                    r#"  <text x="{}" y="{}" font-family="{}" font-size="{size}" dominant-baseline="hanging" fill="{}">{}</text>"#,
                    origin.x,
                    origin.y,
                    escape(family),
                    hex(*colour),
                    escape(text)
                )?,
            }
        }
        writeln!(out, "</svg>")
    }
}

fn hex(c: Rgb) -> String {
    format!("#{:02x}{:02x}{:02x}", c.r, c.g, c.b)
}

/// Black or white, whichever stands out against `c`.
fn contrast(c: Rgb) -> Rgb {
    let luma = 299 * u32::from(c.r) + 587 * u32::from(c.g) + 114 * u32::from(c.b);
    if luma > 128_000 {
        Rgb::BLACK
    } else {
        Rgb::WHITE
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}
