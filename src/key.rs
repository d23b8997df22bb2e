//! Building combined keys from templates.
//!
//! Statically known templates go through `format_args!` and
//! [`IniStore::get_fmt`](crate::IniStore::get_fmt). The helpers here cover
//! templates that only exist at runtime and the common indexed-item shape.

use std::fmt;

use thiserror::Error;

const PLACEHOLDER: &str = "{}";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyError {
    #[error("Key template '{template}' expects {expected} argument(s), got {got}")]
    ArgumentCount {
        template: String,
        expected: usize,
        got: usize,
    },
}

/// Replace each `{}` in `template` with the next argument.
///
/// The number of arguments must match the number of placeholders exactly.
pub fn interpolate(template: &str, args: &[&dyn fmt::Display]) -> Result<String, KeyError> {
    let expected = template.matches(PLACEHOLDER).count();
    if expected != args.len() {
        return Err(KeyError::ArgumentCount {
            template: template.to_string(),
            expected,
            got: args.len(),
        });
    }

    let mut out = String::with_capacity(template.len());
    let mut pieces = template.split(PLACEHOLDER);
    if let Some(head) = pieces.next() {
        out.push_str(head);
    }
    for (piece, arg) in pieces.zip(args) {
        out.push_str(&arg.to_string());
        out.push_str(piece);
    }
    Ok(out)
}

/// Key of one field of an indexed item: `prefix.item<index>.field`.
pub fn indexed(prefix: &str, index: usize, field: &str) -> String {
    format!("{}.item{}.{}", prefix, index, field)
}
