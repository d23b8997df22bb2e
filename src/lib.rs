//! Typed key-value configuration backed by an ini file.
//!
//! ```text
//! ini text ──parse──▶ ConfigTable ◀──get/set── IniStore ◀──open── StoreRegistry
//!          ◀─serialize─┘
//! ```
//!
//! The [`codec`] is pure text conversion. An [`IniStore`] owns the table for
//! one file, keeps it in step with the file's modification stamp and
//! serializes concurrent access. A [`StoreRegistry`] hands out one store per
//! path.

pub mod codec;
pub mod error;
pub mod key;
pub mod logging;
pub mod store;

pub use codec::ConfigTable;
pub use error::StoreError;
pub use store::{default_path, FromIniValue, IniStore, StoreRegistry, ToIniValue};
