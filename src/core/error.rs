use thiserror::Error;

/// Errors raised by the loading surfaces (config, templates, spells, ASCII maps).
///
/// The per-turn algorithms never return these: bad coordinates, unreachable
/// goals and missing data all degrade to a no-op instead.
#[derive(Error, Debug)]
pub enum GloomError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Actor template not found: {0}")]
    TemplateNotFound(String),

    #[error("Malformed map: {0}")]
    MalformedMap(String),
}

pub type Result<T> = std::result::Result<T, GloomError>;
