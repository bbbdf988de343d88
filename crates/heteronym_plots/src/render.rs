use crate::{
    config::ChartTheme,
    constants::MAX_CANVAS_PX,
    error::{HeteronymError, Result},
};

use ab_glyph::{FontVec, PxScale};
use font_kit::{family_name::FamilyName, properties::Properties, source::SystemSource};
use image::{ImageBuffer, Rgb, RgbImage, imageops};
use imageproc::{
    drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_line_segment_mut, draw_text_mut, text_size},
    rect::Rect,
};
use log::debug;
use std::path::Path;

/// One figure's drawing surface. Created per chart and consumed by [`Renderer::save`].
pub struct Renderer {
    pub image: RgbImage,
    pub width: u32,
    pub height: u32,
    pub font: FontVec,
    background: Rgb<u8>,
}

impl Renderer {
    /// Blank canvas filled with the theme background, using the first available theme font
    pub fn new(width: u32, height: u32, theme: &ChartTheme) -> Result<Self> {
        if width > MAX_CANVAS_PX || height > MAX_CANVAS_PX {
            return Err(HeteronymError::CanvasTooLarge { width, height });
        }
        let font = load_system_font(&theme.fonts)?;
        Ok(Self::with_font(width, height, Rgb(theme.background), font))
    }

    pub fn with_font(width: u32, height: u32, background: Rgb<u8>, font: FontVec) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            image: ImageBuffer::from_pixel(width, height, background),
            width,
            height,
            font,
            background,
        }
    }

    /// Filled rectangle
    pub fn draw_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Rgb<u8>) {
        if let Some(rect) = to_rect(x, y, width, height) {
            draw_filled_rect_mut(&mut self.image, rect, color);
        }
    }

    /// Rectangle border
    pub fn draw_rect_outline(&mut self, x: f64, y: f64, width: f64, height: f64, color: Rgb<u8>) {
        if let Some(rect) = to_rect(x, y, width, height) {
            draw_hollow_rect_mut(&mut self.image, rect, color);
        }
    }

    /// Border drawn `thickness` pixels wide, growing inward
    pub fn draw_rect_outline_thick(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        thickness: u32,
        color: Rgb<u8>,
    ) {
        for i in 0..thickness {
            let inset = i as f64;
            self.draw_rect_outline(x + inset, y + inset, width - 2.0 * inset, height - 2.0 * inset, color);
        }
    }

    pub fn draw_line(&mut self, from: (f64, f64), to: (f64, f64), color: Rgb<u8>) {
        draw_line_segment_mut(
            &mut self.image,
            (from.0 as f32, from.1 as f32),
            (to.0 as f32, to.1 as f32),
            color,
        );
    }

    /// Line of the given pixel width, offset perpendicular for axis-aligned segments
    pub fn draw_thick_line(&mut self, from: (f64, f64), to: (f64, f64), thickness: u32, color: Rgb<u8>) {
        let vertical = (from.0 - to.0).abs() < (from.1 - to.1).abs();
        let half = thickness as f64 / 2.0;
        for i in 0..thickness.max(1) {
            let offset = i as f64 - half + 0.5;
            let (dx, dy) = if vertical { (offset, 0.0) } else { (0.0, offset) };
            self.draw_line((from.0 + dx, from.1 + dy), (to.0 + dx, to.1 + dy), color);
        }
    }

    /// Horizontal line blended over the existing pixels
    pub fn draw_hline_blend(&mut self, x0: f64, x1: f64, y: f64, color: Rgb<u8>, alpha: f32) {
        let y = y.round() as i64;
        for x in x0.round() as i64..=x1.round() as i64 {
            self.blend_pixel(x, y, color, alpha);
        }
    }

    /// Vertical line blended over the existing pixels
    pub fn draw_vline_blend(&mut self, x: f64, y0: f64, y1: f64, color: Rgb<u8>, alpha: f32) {
        let x = x.round() as i64;
        for y in y0.round() as i64..=y1.round() as i64 {
            self.blend_pixel(x, y, color, alpha);
        }
    }

    /// Filled disc blended over the existing pixels
    pub fn draw_point(&mut self, cx: f64, cy: f64, radius: f64, color: Rgb<u8>, alpha: f32) {
        let r2 = radius * radius;
        let (x0, x1) = ((cx - radius).floor() as i64, (cx + radius).ceil() as i64);
        let (y0, y1) = ((cy - radius).floor() as i64, (cy + radius).ceil() as i64);
        for py in y0..=y1 {
            for px in x0..=x1 {
                let dx = px as f64 + 0.5 - cx;
                let dy = py as f64 + 0.5 - cy;
                if dx * dx + dy * dy <= r2 {
                    self.blend_pixel(px, py, color, alpha);
                }
            }
        }
    }

    fn blend_pixel(&mut self, x: i64, y: i64, color: Rgb<u8>, alpha: f32) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let px = self.image.get_pixel_mut(x as u32, y as u32);
        *px = blend(*px, color, alpha);
    }

    /// Text with its top-left corner at (x, y)
    pub fn draw_text(&mut self, x: f64, y: f64, text: &str, font_size: f64, color: Rgb<u8>) {
        let scale = PxScale::from(font_size as f32);
        draw_text_mut(
            &mut self.image,
            color,
            x as i32,
            y as i32,
            scale,
            &self.font,
            text,
        );
    }

    /// Faux bold: the glyphs are struck twice, one pixel apart
    pub fn draw_text_bold(&mut self, x: f64, y: f64, text: &str, font_size: f64, color: Rgb<u8>) {
        self.draw_text(x, y, text, font_size, color);
        self.draw_text(x + 1.0, y, text, font_size, color);
    }

    /// Pixel size of rendered text
    pub fn text_size(&self, text: &str, font_size: f64) -> (f64, f64) {
        let (w, h) = text_size(PxScale::from(font_size as f32), &self.font, text);
        (w as f64, h as f64)
    }

    /// Text centred horizontally on `cx`
    pub fn draw_text_centered(&mut self, cx: f64, y: f64, text: &str, font_size: f64, color: Rgb<u8>) {
        let (w, _) = self.text_size(text, font_size);
        self.draw_text(cx - w / 2.0, y, text, font_size, color);
    }

    /// Text ending at `right_x`
    pub fn draw_text_right(&mut self, right_x: f64, y: f64, text: &str, font_size: f64, color: Rgb<u8>) {
        let (w, _) = self.text_size(text, font_size);
        self.draw_text(right_x - w, y, text, font_size, color);
    }

    /// Text rotated 90° counter-clockwise, centred on (cx, cy)
    pub fn draw_text_vertical(&mut self, cx: f64, cy: f64, text: &str, font_size: f64, color: Rgb<u8>) {
        let (w, h) = self.text_size(text, font_size);
        let pad = (font_size * 0.3).ceil();
        let tile_w = (w + 2.0 * pad) as u32;
        let tile_h = (h + 2.0 * pad) as u32;

        let mut tile: RgbImage = ImageBuffer::from_pixel(tile_w.max(1), tile_h.max(1), self.background);
        draw_text_mut(
            &mut tile,
            color,
            pad as i32,
            pad as i32,
            PxScale::from(font_size as f32),
            &self.font,
            text,
        );
        let rotated = imageops::rotate270(&tile);
        let x = (cx - rotated.width() as f64 / 2.0) as i64;
        let y = (cy - rotated.height() as f64 / 2.0) as i64;
        imageops::overlay(&mut self.image, &rotated, x, y);
    }

    /// Writes the PNG and releases the canvas
    pub fn save<P: AsRef<Path>>(self, path: P) -> Result<()> {
        let path = path.as_ref();
        self.image.save(path)?;
        debug!("Saved {}x{} image to {}", self.width, self.height, path.display());
        Ok(())
    }
}

fn to_rect(x: f64, y: f64, width: f64, height: f64) -> Option<Rect> {
    let w = width.round();
    let h = height.round();
    if w < 1.0 || h < 1.0 {
        return None;
    }
    Some(Rect::at(x.round() as i32, y.round() as i32).of_size(w as u32, h as u32))
}

/// Alpha-composites `top` over `bottom`
pub fn blend(bottom: Rgb<u8>, top: Rgb<u8>, alpha: f32) -> Rgb<u8> {
    let a = alpha.clamp(0.0, 1.0);
    let mix = |b: u8, t: u8| (b as f32 * (1.0 - a) + t as f32 * a).round() as u8;
    Rgb([
        mix(bottom[0], top[0]),
        mix(bottom[1], top[1]),
        mix(bottom[2], top[2]),
    ])
}

/// Loads the first family in `families` the system can provide, then any sans-serif
pub fn load_system_font(families: &[String]) -> Result<FontVec> {
    let source = SystemSource::new();

    let candidates = families
        .iter()
        .map(|name| FamilyName::Title(name.clone()))
        .chain(std::iter::once(FamilyName::SansSerif));

    for family in candidates {
        if let Ok(handle) = source.select_best_match(&[family.clone()], &Properties::new())
            && let Ok(font_kit_font) = handle.load()
            && let Some(font_bytes) = font_kit_font.copy_font_data()
            && let Ok(font) = FontVec::try_from_vec(font_bytes.to_vec())
        {
            debug!("Using font {:?}", family);
            return Ok(font);
        }
    }

    Err(HeteronymError::FontNotFound(
        families
            .iter()
            .map(String::as_str)
            .chain(std::iter::once("sans-serif"))
            .collect::<Vec<_>>()
            .join(", "),
    ))
}
