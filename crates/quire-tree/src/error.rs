//! Tree errors

use quire_codec::CodecError;
use quire_style::StyleError;

#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    #[error("Child index {index} out of bounds for {len} children")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error(transparent)]
    Style(#[from] StyleError),

    #[error(transparent)]
    Codec(#[from] CodecError),
}
