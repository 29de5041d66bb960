//! Term name mangling

use heck::ToShoutySnakeCase;

/// Constant name for a term's local name, or `None` when nothing usable is left
///
/// Word boundaries follow `heck`; punctuation is dropped. A name starting with
/// a digit is prefixed with an underscore.
pub fn constant_name(local_name: &str) -> Option<String> {
    let name = local_name.to_shouty_snake_case();
    let first = name.chars().next()?;

    if first.is_ascii_digit() {
        Some(format!("_{name}"))
    } else if first.is_alphabetic() || first == '_' {
        Some(name)
    } else {
        None
    }
}
