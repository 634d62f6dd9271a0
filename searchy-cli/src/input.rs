//! Expanding `get` arguments into a URL list

use searchy_common::{ErrorSeverity, Severity};
use std::io::{BufRead, Read};
use std::path::PathBuf;
use thiserror::Error;

/// Argument that means "read URLs from stdin"
pub const STDIN_ARG: &str = "-";

/// Prefix marking a URL list file
pub const LIST_FILE_PREFIX: char = '@';

#[derive(Debug, Error)]
pub enum InputError {
    #[error("URL list file not found: {path}")]
    MissingList { path: PathBuf },

    #[error("failed to read URLs from {origin}")]
    Read {
        origin: String,
        #[source]
        source: std::io::Error,
    },
}

impl Severity for InputError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Error
    }
}

/// Replace `-` with the lines of `stdin` and `@path` with the lines of that
/// file. Listed lines are trimmed and blank ones skipped; other arguments pass
/// through unchanged.
pub fn expand_targets<R: BufRead>(args: &[String], mut stdin: R) -> Result<Vec<String>, InputError> {
    let mut urls = Vec::new();
    for arg in args {
        if arg == STDIN_ARG {
            let mut text = String::new();
            stdin
                .read_to_string(&mut text)
                .map_err(|source| InputError::Read {
                    origin: "stdin".to_string(),
                    source,
                })?;
            urls.extend(listed(&text));
        } else if let Some(path) = arg.strip_prefix(LIST_FILE_PREFIX) {
            let path = PathBuf::from(path);
            if !path.is_file() {
                return Err(InputError::MissingList { path });
            }
            let text = std::fs::read_to_string(&path).map_err(|source| InputError::Read {
                origin: path.display().to_string(),
                source,
            })?;
            urls.extend(listed(&text));
        } else {
            urls.push(arg.clone());
        }
    }
    tracing::debug!("Expanded {} arguments into {} URLs", args.len(), urls.len());
    Ok(urls)
}

fn listed(text: &str) -> impl Iterator<Item = String> + '_ {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
}
