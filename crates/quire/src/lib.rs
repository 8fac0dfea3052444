//! Quire
//!
//! Styled rich-text documents: an immutable tree of text under style
//! containers, validated style properties, and a tagged JSON interchange
//! format for values whose type is only known at run time.
//!
//! # Example
//! ```rust,ignore
//! use quire::{Color, Config, Node, Value};
//!
//! let registries = quire::init(Config::default())?;
//! let doc = Node::new_style(vec![Node::new_text("hi")], registries.style([
//!     ("textColor", Value::new(Color::RED)),
//! ])?);
//! let text = registries.to_string(&doc)?;
//! assert_eq!(registries.from_str(&text)?, doc);
//! ```

mod config;
mod error;
mod registries;

pub use config::{Config, ExtraProperty};
pub use error::{Error, Result};
pub use registries::Registries;

pub use quire_codec::{CodecError, TypeRegistry, Value};
pub use quire_style::{
    Color, Keyword, Length, PropertyName, PropertyRegistry, StyleError, StyleMap, StyleVisitor,
    UnknownProperties, ValueHandler,
};
pub use quire_tree::{Node, NodeKind, TreeError};

// Re-export sub-crates for advanced usage
pub use quire_codec as codec;
pub use quire_style as style;
pub use quire_tree as tree;

use once_cell::sync::OnceCell;

static REGISTRIES: OnceCell<Registries> = OnceCell::new();

/// Build the process-wide registries from `config`.
///
/// Runs once; later calls fail with [`Error::AlreadyInitialized`].
pub fn init(config: Config) -> Result<&'static Registries> {
    let mut built = false;
    let registries = REGISTRIES.get_or_try_init(|| {
        built = true;
        Registries::build(&config)
    })?;
    if !built {
        tracing::warn!("registries initialized twice");
        return Err(Error::AlreadyInitialized);
    }
    Ok(registries)
}

/// The process-wide registries
pub fn registries() -> Result<&'static Registries> {
    REGISTRIES.get().ok_or(Error::NotInitialized)
}
