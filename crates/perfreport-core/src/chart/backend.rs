//! Drawing backend wrapper that keeps rendering when no font is usable.
//!
//! Headless machines often lack the system fonts plotters looks up. Text
//! draws that fail with a font error (or panic inside the font stack) are
//! skipped, and text extents fall back to an estimate from the font size, so
//! lines, axes and legends still come out.

use std::cell::Cell;
use std::panic;

use plotters_backend::{
    BackendColor, BackendCoord, BackendStyle, BackendTextStyle, DrawingBackend, DrawingErrorKind,
};

/// Average glyph advance as a fraction of the font size.
const GLYPH_ASPECT: f64 = 0.6;

pub struct FontSafeBackend<DB> {
    inner: DB,
    warned: Cell<bool>,
}

impl<DB> FontSafeBackend<DB> {
    pub fn new(inner: DB) -> Self {
        Self {
            inner,
            warned: Cell::new(false),
        }
    }

    fn note_fallback(&self, text: &str) {
        if !self.warned.replace(true) {
            log::warn!("no usable font, chart text omitted (first: {text:?})");
        }
    }
}

impl<DB: DrawingBackend> DrawingBackend for FontSafeBackend<DB> {
    type ErrorType = DB::ErrorType;

    fn get_size(&self) -> (u32, u32) {
        self.inner.get_size()
    }

    fn ensure_prepared(&mut self) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.ensure_prepared()
    }

    fn present(&mut self) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.present()
    }

    fn draw_pixel(
        &mut self,
        point: BackendCoord,
        color: BackendColor,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.draw_pixel(point, color)
    }

    fn draw_line<S: BackendStyle>(
        &mut self,
        from: BackendCoord,
        to: BackendCoord,
        style: &S,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.draw_line(from, to, style)
    }

    fn draw_rect<S: BackendStyle>(
        &mut self,
        upper_left: BackendCoord,
        bottom_right: BackendCoord,
        style: &S,
        fill: bool,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.draw_rect(upper_left, bottom_right, style, fill)
    }

    fn draw_path<S: BackendStyle, I: IntoIterator<Item = BackendCoord>>(
        &mut self,
        path: I,
        style: &S,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.draw_path(path, style)
    }

    fn draw_circle<S: BackendStyle>(
        &mut self,
        center: BackendCoord,
        radius: u32,
        style: &S,
        fill: bool,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.draw_circle(center, radius, style, fill)
    }

    fn fill_polygon<S: BackendStyle, I: IntoIterator<Item = BackendCoord>>(
        &mut self,
        vert: I,
        style: &S,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.fill_polygon(vert, style)
    }

    fn blit_bitmap(
        &mut self,
        pos: BackendCoord,
        (iw, ih): (u32, u32),
        src: &[u8],
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.blit_bitmap(pos, (iw, ih), src)
    }

    fn draw_text<TStyle: BackendTextStyle>(
        &mut self,
        text: &str,
        style: &TStyle,
        pos: BackendCoord,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        let inner = &mut self.inner;
        match panic::catch_unwind(panic::AssertUnwindSafe(|| inner.draw_text(text, style, pos))) {
            Ok(Err(DrawingErrorKind::FontError(_))) | Err(_) => {
                self.note_fallback(text);
                Ok(())
            }
            Ok(result) => result,
        }
    }

    fn estimate_text_size<TStyle: BackendTextStyle>(
        &self,
        text: &str,
        style: &TStyle,
    ) -> Result<(u32, u32), DrawingErrorKind<Self::ErrorType>> {
        match panic::catch_unwind(panic::AssertUnwindSafe(|| {
            self.inner.estimate_text_size(text, style)
        })) {
            Ok(Err(DrawingErrorKind::FontError(_))) | Err(_) => {
                let size = style.size().max(1.0);
                let width = text.chars().count() as f64 * size * GLYPH_ASPECT;
                Ok((width.ceil() as u32, size.ceil() as u32))
            }
            Ok(result) => result,
        }
    }
}
