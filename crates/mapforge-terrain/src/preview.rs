//! Preview rendering of generated terrain as RGBA images.
//!
//! Used by tooling to eyeball a generation run without the editor: one
//! pixel block per cell, colored by biome or elevation, with placed assets
//! drawn on top.

use hashbrown::HashSet;

use crate::asset::AssetInstance;
use crate::biome::{Biome, BiomeMap};
use crate::error::TerrainError;
use crate::grid::ScalarGrid;
use crate::params::BiomeThresholds;

/// Largest preview, in pixels, the renderers will allocate.
pub const MAX_PREVIEW_PIXELS: u64 = 1 << 26;

/// A 2D image stored as row-major RGBA pixels.
#[derive(Clone, Debug)]
pub struct PreviewImage {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Pixel data in row-major RGBA format. Length = `width * height * 4`.
    pub pixels: Vec<u8>,
}

impl PreviewImage {
    /// Create a new transparent black image.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 4],
        }
    }

    /// Set a pixel's RGBA value. Out-of-range coordinates are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        self.pixels[idx..idx + 4].copy_from_slice(&rgba);
    }

    /// Get a pixel's RGBA value, or `None` outside the image.
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        let mut out = [0; 4];
        out.copy_from_slice(&self.pixels[idx..idx + 4]);
        Some(out)
    }

    /// Fill the `scale x scale` block for cell `(cx, cy)`.
    fn fill_cell(&mut self, cx: u32, cy: u32, scale: u32, rgb: (u8, u8, u8)) {
        for py in cy * scale..(cy + 1) * scale {
            for px in cx * scale..(cx + 1) * scale {
                self.set_pixel(px, py, [rgb.0, rgb.1, rgb.2, 255]);
            }
        }
    }

    /// Returns `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Count the number of unique colors (ignoring alpha) in the image.
    pub fn unique_color_count(&self) -> usize {
        let mut colors = HashSet::new();
        for chunk in self.pixels.chunks_exact(4) {
            colors.insert((chunk[0], chunk[1], chunk[2]));
        }
        colors.len()
    }
}

/// RGB color for a biome.
pub fn biome_color(biome: Biome) -> (u8, u8, u8) {
    match biome {
        Biome::DeepWater => (0, 0, 128),
        Biome::ShallowWater => (30, 80, 200),
        Biome::Beach => (230, 210, 140),
        Biome::Desert => (220, 190, 80),
        Biome::Grassland => (100, 180, 60),
        Biome::Forest => (30, 120, 30),
        Biome::Hills => (130, 150, 70),
        Biome::Mountain => (130, 110, 90),
        Biome::Snow => (240, 240, 250),
    }
}

/// Map a normalized height `[0, 1]` to an RGB color.
///
/// Color bands follow the biome thresholds: deep water, shallow water, beach,
/// lowland gradient, highland gradient, snow.
pub fn height_to_color(h: f64, t: &BiomeThresholds) -> (u8, u8, u8) {
    if h < t.water_level * 0.7 {
        (0, 0, 128)
    } else if h < t.water_level {
        (30, 80, 200)
    } else if h < t.beach_level {
        (220, 200, 130)
    } else if h <= t.hill_level {
        let span = (t.hill_level - t.beach_level).max(f64::EPSILON);
        let k = ((h - t.beach_level) / span).clamp(0.0, 1.0);
        (
            (30.0 + k * 80.0) as u8,
            (160.0 - k * 40.0) as u8,
            (30.0 + k * 20.0) as u8,
        )
    } else if h <= 0.9 {
        let k = ((h - t.hill_level) / (0.9 - t.hill_level).max(f64::EPSILON)).clamp(0.0, 1.0);
        (
            (110.0 + k * 40.0) as u8,
            (120.0 - k * 50.0) as u8,
            (50.0 + k * 20.0) as u8,
        )
    } else {
        let k = ((h - 0.9) / 0.1).min(1.0);
        let base = (150.0 + k * 105.0) as u8;
        (base, base, base)
    }
}

/// Pixel size of a `width x height` cell grid drawn at `scale`.
///
/// # Errors
///
/// Returns [`TerrainError::PreviewTooLarge`] when the image would exceed
/// [`MAX_PREVIEW_PIXELS`].
pub fn preview_size(width: u32, height: u32, scale: u32) -> Result<(u32, u32), TerrainError> {
    let too_large = TerrainError::PreviewTooLarge {
        width,
        height,
        scale,
    };
    let (Some(pw), Some(ph)) = (width.checked_mul(scale), height.checked_mul(scale)) else {
        return Err(too_large);
    };
    if u64::from(pw) * u64::from(ph) > MAX_PREVIEW_PIXELS {
        return Err(too_large);
    }
    Ok((pw, ph))
}

/// Render a biome map with each cell drawn as a `scale x scale` block.
///
/// # Errors
///
/// Returns [`TerrainError::PreviewTooLarge`] for oversized images.
pub fn render_biome_preview(biomes: &BiomeMap, scale: u32) -> Result<PreviewImage, TerrainError> {
    let scale = scale.max(1);
    let (w, h) = biomes.dimensions();
    let (pw, ph) = preview_size(w, h, scale)?;
    let mut image = PreviewImage::new(pw, ph);
    for (x, y, biome) in biomes.iter() {
        image.fill_cell(x, y, scale, biome_color(biome));
    }
    Ok(image)
}

/// Render a heightmap using [`height_to_color`].
///
/// # Errors
///
/// Returns [`TerrainError::PreviewTooLarge`] for oversized images.
pub fn render_heightmap_preview(
    grid: &ScalarGrid,
    thresholds: &BiomeThresholds,
    scale: u32,
) -> Result<PreviewImage, TerrainError> {
    let scale = scale.max(1);
    let (w, h) = grid.dimensions();
    let (pw, ph) = preview_size(w, h, scale)?;
    let mut image = PreviewImage::new(pw, ph);
    for y in 0..h {
        for x in 0..w {
            let color = height_to_color(grid.get(x as i32, y as i32), thresholds);
            image.fill_cell(x, y, scale, color);
        }
    }
    Ok(image)
}

/// Draw a dot at the center of every instance's cell.
///
/// Instances whose cell lies outside the image are skipped.
pub fn overlay_assets(image: &mut PreviewImage, instances: &[AssetInstance], scale: u32) {
    let scale = scale.max(1);
    let half = scale / 2;
    let center = |c: i32| {
        u32::try_from(c)
            .ok()?
            .checked_mul(scale)?
            .checked_add(half)
    };
    for inst in instances {
        if let (Some(px), Some(py)) = (center(inst.x), center(inst.y)) {
            image.set_pixel(px, py, [200, 30, 30, 255]);
        }
    }
}
