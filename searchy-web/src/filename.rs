//! Collision-free file names for saved pages

use chrono::Utc;
use rand::distr::{Alphanumeric, SampleString};
use std::io;
use std::path::{Path, PathBuf};

/// Name used when a URL has no usable characters
const FALLBACK_BASE_NAME: &str = "page";

/// Random characters appended to a colliding name
const TOKEN_LEN: usize = 8;

/// Proposes paths inside one folder that do not exist yet
#[derive(Debug, Clone)]
pub struct FilenameAllocator {
    folder: PathBuf,
}

impl FilenameAllocator {
    pub fn new(folder: impl Into<PathBuf>) -> Self {
        Self {
            folder: folder.into(),
        }
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    /// Free path for `url`, creating the folder if needed.
    ///
    /// Returns `<folder>/<base>` when that is free, otherwise
    /// `<folder>/<base>-<YYYYMMDDHHMMSSmmm>-<token>`, drawing again until a
    /// name is free. Nothing is created besides the folder.
    pub fn propose(&self, url: &str) -> io::Result<PathBuf> {
        std::fs::create_dir_all(&self.folder)?;

        let base = base_name(url);
        let candidate = self.folder.join(&base);
        if !candidate.exists() {
            return Ok(candidate);
        }

        loop {
            let stamp = Utc::now().format("%Y%m%d%H%M%S%3f");
            let token = Alphanumeric
                .sample_string(&mut rand::rng(), TOKEN_LEN)
                .to_ascii_lowercase();
            let candidate = self.folder.join(format!("{base}-{stamp}-{token}"));
            if !candidate.exists() {
                tracing::debug!("{} is taken, using {}", base, candidate.display());
                return Ok(candidate);
            }
        }
    }
}

/// Host, path and query of `url` split on non-alphanumerics, joined with `-`
pub fn base_name(url: &str) -> String {
    let source = match url::Url::parse(url) {
        Ok(parsed) => {
            let mut source = parsed.host_str().unwrap_or_default().to_string();
            source.push_str(parsed.path());
            if let Some(query) = parsed.query() {
                source.push('?');
                source.push_str(query);
            }
            source
        }
        Err(_) => url.to_string(),
    };

    let name = source
        .split(|c: char| !c.is_alphanumeric())
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("-");

    if name.is_empty() {
        FALLBACK_BASE_NAME.to_string()
    } else {
        name
    }
}
