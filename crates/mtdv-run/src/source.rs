use miette::{IntoDiagnostic, miette};
use std::{fs, path::Path};

/// Reads a program file as lines, decoding it as UTF-8 and falling back to
/// Latin-1, which accepts any byte sequence.
pub fn read_lines(path: &Path) -> miette::Result<Vec<String>> {
    if !path.exists() {
        return Err(miette!("File not found: {}", path.display()));
    }

    let bytes = fs::read(path).into_diagnostic()?;
    Ok(decode(bytes).lines().map(str::to_string).collect())
}

fn decode(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => match text.strip_prefix('\u{feff}') {
            Some(text) => text.to_string(),
            None => text,
        },
        Err(e) => {
            log::debug!("input is not valid UTF-8, decoding as Latin-1");
            e.into_bytes().into_iter().map(char::from).collect()
        }
    }
}
