//! SVG to PNG conversion.

use crate::constants;
use crate::error::{DiagramError, Result};
use std::sync::{Arc, OnceLock};
use std::thread::JoinHandle;
use tiny_skia::Pixmap;

/// System font database, loaded on first use and shared by every rasterization.
fn font_database() -> Arc<fontdb::Database> {
    static FONTS: OnceLock<Arc<fontdb::Database>> = OnceLock::new();
    FONTS
        .get_or_init(|| {
            let mut db = fontdb::Database::new();
            db.load_system_fonts();
            log::debug!("loaded {} font faces", db.len());
            Arc::new(db)
        })
        .clone()
}

/// Rasterizes rendered diagrams on an opaque white background.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterExporter {
    pixel_density: f32,
}

impl Default for RasterExporter {
    fn default() -> Self {
        Self::new(constants::EXPORT_PIXEL_DENSITY)
    }
}

impl RasterExporter {
    /// Creates an exporter producing `pixel_density` pixels per SVG unit.
    pub fn new(pixel_density: f32) -> Self {
        Self { pixel_density }
    }

    /// Pixels per SVG unit.
    pub fn pixel_density(&self) -> f32 {
        self.pixel_density
    }

    /// A copy whose density keeps a `width` by `height` document within
    /// `max_side` pixels on each side. The density is never raised.
    pub fn limited_to(&self, max_side: usize, width: f64, height: f64) -> Self {
        let longest = width.max(height) as f32;
        if !longest.is_finite() || longest <= 0.0 {
            return *self;
        }
        Self::new(self.pixel_density.min(max_side as f32 / longest))
    }

    /// Decodes `svg` and draws it into a new pixmap.
    pub fn rasterize(&self, svg: &str) -> Result<Pixmap> {
        let mut opt = usvg::Options::default();
        opt.fontdb = font_database();

        let tree = usvg::Tree::from_data(svg.as_bytes(), &opt)
            .map_err(|e| DiagramError::Export(format!("invalid SVG: {}", e)))?;

        let scale = self.pixel_density;
        let size = tree.size();
        let out_w = (size.width() * scale).round().max(1.0) as u32;
        let out_h = (size.height() * scale).round().max(1.0) as u32;

        let mut pixmap = Pixmap::new(out_w, out_h)
            .ok_or_else(|| DiagramError::Export(format!("cannot allocate a {}x{} image", out_w, out_h)))?;
        pixmap.fill(tiny_skia::Color::WHITE);

        let transform = tiny_skia::Transform::from_scale(scale, scale);
        resvg::render(&tree, transform, &mut pixmap.as_mut());
        Ok(pixmap)
    }

    /// Rasterizes `svg` and encodes the result as PNG.
    pub fn encode_png(&self, svg: &str) -> Result<Vec<u8>> {
        self.rasterize(svg)?
            .encode_png()
            .map_err(|e| DiagramError::Export(e.to_string()))
    }

    /// Encodes `svg` on a background thread and hands the PNG bytes to `on_complete`.
    ///
    /// Nothing happens when there is no document, and failures are only
    /// logged: `on_complete` is called exactly when encoding succeeds.
    pub fn export<F>(&self, svg: Option<&str>, on_complete: F) -> Option<JoinHandle<()>>
    where
        F: FnOnce(Vec<u8>) + Send + 'static,
    {
        let Some(svg) = svg else {
            log::debug!("export requested without a rendered diagram");
            return None;
        };
        let svg = svg.to_owned();
        let exporter = *self;
        Some(std::thread::spawn(move || match exporter.encode_png(&svg) {
            Ok(bytes) => {
                log::info!("exported {} bytes of PNG", bytes.len());
                on_complete(bytes);
            }
            Err(err) => log::debug!("export skipped: {}", err),
        }))
    }
}
