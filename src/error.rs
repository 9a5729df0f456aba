use thiserror::Error;

/// Fatal initialization failures. The game cannot run past setup
/// without a valid level, tile table and required sprite sheets, so
/// these surface to the caller instead of being swallowed.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse level {path}: {source}")]
    Level {
        path: String,
        source: serde_json::Error,
    },

    #[error("failed to parse tile set {path}: {source}")]
    TileSet {
        path: String,
        source: serde_json::Error,
    },

    #[error("failed to parse sprite sheet {path}: {source}")]
    SpriteSheet {
        path: String,
        source: serde_json::Error,
    },

    #[error("level {path} is missing required dimensions")]
    MissingDimensions { path: String },

    #[error("failed to load texture {path}: {reason}")]
    Texture { path: String, reason: String },

    #[error("failed to create window: {0}")]
    Window(String),
}
