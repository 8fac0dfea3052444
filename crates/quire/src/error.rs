//! Error types

use quire_codec::CodecError;
use quire_style::StyleError;
use quire_tree::TreeError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Style(#[from] StyleError),

    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error("Invalid configuration: {0}")]
    Config(#[source] serde_json::Error),

    #[error("Malformed JSON: {0}")]
    Json(#[source] serde_json::Error),

    #[error("Registries are already initialized")]
    AlreadyInitialized,

    #[error("Registries are not initialized; call quire::init first")]
    NotInitialized,
}

pub type Result<T> = std::result::Result<T, Error>;
