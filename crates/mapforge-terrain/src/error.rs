//! Terrain generation error types.

/// Errors that can occur during terrain generation or catalog setup.
#[derive(Debug, thiserror::Error)]
pub enum TerrainError {
    /// The heightmap and moisture map passed to biome assignment differ in size.
    #[error(
        "heightmap is {}x{} but moisture map is {}x{}",
        .height.0, .height.1, .moisture.0, .moisture.1
    )]
    DimensionMismatch {
        /// `(width, height)` of the heightmap.
        height: (u32, u32),
        /// `(width, height)` of the moisture map.
        moisture: (u32, u32),
    },

    /// An asset with this id is already registered in the catalog.
    #[error("duplicate asset id: {0}")]
    DuplicateAsset(String),

    /// A preview of this many cells at this scale does not fit in memory.
    #[error("preview of {width}x{height} cells at scale {scale} is too large")]
    PreviewTooLarge { width: u32, height: u32, scale: u32 },
}
