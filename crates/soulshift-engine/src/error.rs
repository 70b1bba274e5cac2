use thiserror::Error;

/// Failures while reading the parsed level layout.
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("failed to parse level map: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("level map has no object layer named '{0}'")]
    MissingLayer(String),
    #[error("level map has no 'Spawn' object in the 'Entities' layer")]
    MissingSpawn,
    #[error("level map has invalid dimensions {width}x{height} tiles of {tile_width}x{tile_height}")]
    InvalidDimensions {
        width: u32,
        height: u32,
        tile_width: u32,
        tile_height: u32,
    },
}

/// Failures constructing a [`World`](crate::World).
#[derive(Debug, Error)]
pub enum WorldError {
    #[error(transparent)]
    Level(#[from] LevelError),
    #[error("invalid world config: {0}")]
    Config(serde_json::Error),
    #[error("invalid world config: {field} = {value}")]
    InvalidConfig { field: &'static str, value: f32 },
    #[error("invalid asset manifest: {0}")]
    Manifest(serde_json::Error),
}
