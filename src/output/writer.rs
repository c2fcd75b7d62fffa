//! Atomic document writer.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Write `document` to `path`, replacing any previous content atomically.
///
/// A path of `-` writes to stdout instead.
pub fn write_atomic(path: &Path, document: &str) -> Result<(), OutputError> {
    if path == Path::new("-") {
        let mut stdout = io::stdout().lock();
        return stdout
            .write_all(document.as_bytes())
            .and_then(|_| stdout.flush())
            .map_err(|source| OutputError::Io {
                path: path.to_path_buf(),
                source,
            });
    }

    let tmp = temp_path(path);
    let io_err = |source: io::Error| OutputError::Io {
        path: path.to_path_buf(),
        source,
    };

    fs::write(&tmp, document).map_err(io_err)?;
    if let Err(source) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(io_err(source));
    }

    tracing::debug!(path = %path.display(), bytes = document.len(), "Document written");
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
