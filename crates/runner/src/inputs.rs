//! Input selection: named files concatenated in argument order, or
//! standard input when no files are named.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;

use anyhow::{Context, Result};

/// One line source, ready to read.
pub struct Input {
    /// Display name for diagnostics (`<stdin>` or the file path).
    pub name: String,
    pub reader: Box<dyn BufRead>,
}

impl std::fmt::Debug for Input {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Input")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Open every named input up front, so a missing or unreadable file
/// aborts before the first line is processed.
pub fn open_inputs(files: &[PathBuf]) -> Result<Vec<Input>> {
    if files.is_empty() {
        return Ok(vec![Input {
            name: "<stdin>".to_owned(),
            reader: Box::new(BufReader::new(io::stdin())),
        }]);
    }

    files
        .iter()
        .map(|path| {
            let file = File::open(path).with_context(|| {
                format!("opening input {}", path.display())
            })?;
            Ok(Input {
                name: path.display().to_string(),
                reader: Box::new(BufReader::new(file)),
            })
        })
        .collect()
}
