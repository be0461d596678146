// sls-logs - core/definition.rs
//
// Extraction of a function name from the text of a definition file.
// Pure string handling; no I/O.

use crate::core::model::FunctionName;

/// Extract the function name from a definition file's content.
///
/// The name is the first `\n`-separated line with one trailing `:` removed.
/// Nothing else is touched: surrounding whitespace, a trailing `\r` and an
/// empty result are all passed through unchanged.
pub fn extract_function_name(content: &str) -> FunctionName {
    let first_line = content.split('\n').next().unwrap_or_default();
    first_line
        .strip_suffix(':')
        .unwrap_or(first_line)
        .to_string()
}
