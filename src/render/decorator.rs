//! Label artwork for the sphere ornaments.
//!
//! The layout is computed by [`label_layout`], which has no browser
//! dependency; [`CanvasDecorator`] only replays it onto a 2D canvas.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement};
use crate::data::Color;

pub const LABEL_WIDTH: u32 = 512;
pub const LABEL_HEIGHT: u32 = 256;
const LINE_HEIGHT: f64 = 55.0;
const TEXT_CENTER_Y: f64 = 128.0;
const FONT: &str = "bold 48px \"Cinzel\", serif";
const TEXT_COLOR: &str = "#ffffff";
const BAND_COLOR: &str = "rgba(0,0,0,0.1)";
const TRIM_COLOR: &str = "#FFD700";

/// Axis-aligned rectangle in canvas pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// One line of label text, anchored at its centre
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabelLayout {
    pub band: Rect,
    pub trim: Rect,
    pub trim_width: f64,
    pub lines: Vec<TextLine>,
}

/// Lay out a label: lines split on `\n`, stacked 55px apart and centred
/// vertically on the band.
pub fn label_layout(label: &str) -> LabelLayout {
    let parts: Vec<&str> = label.split('\n').collect();
    let start_y = TEXT_CENTER_Y - (parts.len() - 1) as f64 * LINE_HEIGHT / 2.0;

    let lines = parts
        .iter()
        .enumerate()
        .map(|(i, text)| TextLine {
            text: text.to_string(),
            x: LABEL_WIDTH as f64 / 2.0,
            y: start_y + i as f64 * LINE_HEIGHT,
        })
        .collect();

    LabelLayout {
        band: Rect { x: 0.0, y: 100.0, width: LABEL_WIDTH as f64, height: 56.0 },
        trim: Rect { x: 10.0, y: 10.0, width: 492.0, height: 236.0 },
        trim_width: 6.0,
        lines,
    }
}

/// Produces the surface image wrapped around a labelled sphere
pub trait SurfaceDecorator {
    type Surface;

    fn decorate(&self, label: &str, base_color: Color) -> Result<Self::Surface, String>;
}

/// Draws labels onto offscreen 2D canvases
pub struct CanvasDecorator {
    document: Document,
}

impl CanvasDecorator {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    /// Decorator bound to the page's document
    pub fn from_window() -> Result<Self, String> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or("No document available")?;
        Ok(Self::new(document))
    }

    fn context(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, String> {
        canvas
            .get_context("2d")
            .map_err(js_error)?
            .ok_or("Failed to get 2D context")?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| "2D context has an unexpected type".to_string())
    }
}

impl SurfaceDecorator for CanvasDecorator {
    type Surface = HtmlCanvasElement;

    fn decorate(&self, label: &str, base_color: Color) -> Result<HtmlCanvasElement, String> {
        let canvas = self
            .document
            .create_element("canvas")
            .map_err(js_error)?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| "Created element is not a canvas".to_string())?;
        canvas.set_width(LABEL_WIDTH);
        canvas.set_height(LABEL_HEIGHT);

        let ctx = Self::context(&canvas)?;
        let layout = label_layout(label);

        ctx.set_fill_style_str(&base_color.to_hex());
        ctx.fill_rect(0.0, 0.0, LABEL_WIDTH as f64, LABEL_HEIGHT as f64);

        let band = layout.band;
        ctx.set_fill_style_str(BAND_COLOR);
        ctx.fill_rect(band.x, band.y, band.width, band.height);

        ctx.set_font(FONT);
        ctx.set_fill_style_str(TEXT_COLOR);
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");
        for line in &layout.lines {
            ctx.fill_text(&line.text, line.x, line.y).map_err(js_error)?;
        }

        let trim = layout.trim;
        ctx.set_stroke_style_str(TRIM_COLOR);
        ctx.set_line_width(layout.trim_width);
        ctx.stroke_rect(trim.x, trim.y, trim.width, trim.height);

        Ok(canvas)
    }
}

fn js_error(e: JsValue) -> String {
    format!("{:?}", e)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line_centred() {
        let layout = label_layout("Citadel");
        assert_eq!(layout.lines.len(), 1);
        assert_eq!(layout.lines[0].y, 128.0);
        assert_eq!(layout.lines[0].x, 256.0);
    }

    #[test]
    fn test_two_lines_straddle_centre() {
        let layout = label_layout("Goldman\nSachs");
        let ys: Vec<f64> = layout.lines.iter().map(|l| l.y).collect();
        assert_eq!(ys, vec![100.5, 155.5]);
        assert_eq!(layout.lines[0].text, "Goldman");
        assert_eq!(layout.lines[1].text, "Sachs");
    }

    #[test]
    fn test_three_lines() {
        let layout = label_layout("a\nb\nc");
        let ys: Vec<f64> = layout.lines.iter().map(|l| l.y).collect();
        assert_eq!(ys, vec![73.0, 128.0, 183.0]);
    }

    #[test]
    fn test_band_and_trim_inside_canvas() {
        let layout = label_layout("");
        assert_eq!(layout.lines.len(), 1);
        for rect in [layout.band, layout.trim] {
            assert!(rect.x >= 0.0 && rect.y >= 0.0);
            assert!(rect.x + rect.width <= LABEL_WIDTH as f64);
            assert!(rect.y + rect.height <= LABEL_HEIGHT as f64);
        }
        assert_eq!(layout.band.y + layout.band.height / 2.0, 128.0);
    }
}
