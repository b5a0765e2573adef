use std::io::BufRead;

use crate::error::AppResult;

pub const PLACEHOLDER: &str = "Leave a comment here";

/// Captures the composer input: inline text, or everything on `input` when
/// the text is omitted or given as `-`.
pub fn read_draft(inline: Option<String>, input: &mut impl BufRead) -> AppResult<String> {
    match inline {
        Some(text) if text != "-" => Ok(text),
        _ => {
            let mut draft = String::new();
            input.read_to_string(&mut draft)?;
            Ok(draft.trim_end_matches(['\r', '\n']).to_string())
        }
    }
}
