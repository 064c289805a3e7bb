//! Writers for the generated map document and its PNG preview.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use mapforge_config::OutputConfig;
use mapforge_terrain::{AssetInstance, GeneratedMap, GeneratedTerrain, preview};
use serde::Serialize;
use tracing::info;

use crate::error::CliError;

/// File name of the map document inside the output directory.
pub const MAP_FILE_NAME: &str = "map.json";
/// File name of the preview image inside the output directory.
pub const PREVIEW_FILE_NAME: &str = "preview.png";

/// Map document consumed by the host editor.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapDocument<'a> {
    pub width: u32,
    pub height: u32,
    pub seed: u64,
    /// Layer name → `"x,y"` → tile token.
    pub layers: BTreeMap<String, BTreeMap<String, String>>,
    pub assets: &'a [AssetInstance],
    /// Biome name → cell count, biomes with no cells omitted.
    pub biomes: BTreeMap<&'static str, usize>,
}

impl<'a> MapDocument<'a> {
    pub fn new(terrain: &GeneratedTerrain, assets: &'a [AssetInstance]) -> Self {
        Self {
            width: terrain.params.width,
            height: terrain.params.height,
            seed: terrain.params.seed,
            layers: terrain.tiles.to_host_layers(),
            assets,
            biomes: terrain
                .biome_histogram()
                .into_iter()
                .map(|(biome, count)| (biome.name(), count))
                .collect(),
        }
    }
}

/// Write `map.json` into `dir`, creating the directory if needed.
pub fn write_map_json(dir: &Path, doc: &MapDocument<'_>, pretty: bool) -> Result<PathBuf, CliError> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(MAP_FILE_NAME);
    let writer = BufWriter::new(File::create(&path)?);
    if pretty {
        serde_json::to_writer_pretty(writer, doc)?;
    } else {
        serde_json::to_writer(writer, doc)?;
    }
    Ok(path)
}

/// Encode an image as an 8-bit RGBA PNG at `path`.
pub fn write_png(path: &Path, image: &preview::PreviewImage) -> Result<(), CliError> {
    let writer = BufWriter::new(File::create(path)?);
    let mut encoder = png::Encoder::new(writer, image.width, image.height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut png_writer = encoder.write_header()?;
    png_writer.write_image_data(&image.pixels)?;
    Ok(())
}

/// Write every output the config asks for. Returns the paths written.
pub fn write_outputs(map: &GeneratedMap, output: &OutputConfig) -> Result<Vec<PathBuf>, CliError> {
    let doc = MapDocument::new(&map.terrain, &map.assets);
    let mut written = vec![write_map_json(&output.directory, &doc, output.pretty_json)?];
    info!(path = %written[0].display(), "map written");

    let (w, h) = map.terrain.biomes.dimensions();
    if output.write_preview && w > 0 && h > 0 {
        let scale = output.preview_scale;
        let mut image = preview::render_biome_preview(&map.terrain.biomes, scale)?;
        preview::overlay_assets(&mut image, &map.assets, scale);
        let path = output.directory.join(PREVIEW_FILE_NAME);
        write_png(&path, &image)?;
        info!(path = %path.display(), "preview written");
        written.push(path);
    }
    Ok(written)
}
