use std::path::PathBuf;

/// Errors produced while loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid generation parameters: {0}")]
    InvalidGeneration(String),

    #[error("invalid render settings: {0}")]
    InvalidRender(String),
}

/// Errors produced while loading a wall texture.
#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("failed to decode texture {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("texture {path} has no pixels")]
    Empty { path: PathBuf },

    #[error("texture loader thread exited before delivering a texture")]
    LoaderDisconnected,
}
