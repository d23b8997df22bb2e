//! Stateless ini text codec.
//!
//! Converts between ini text and a flat [`ConfigTable`] keyed by
//! `section.key`. Nothing here touches the file system.

mod parse;
mod serialize;
mod table;

pub use parse::{parse, parse_with_diagnostics, Diagnostic, DiagnosticKind};
pub use serialize::serialize;
pub use table::{ConfigTable, Iter};
