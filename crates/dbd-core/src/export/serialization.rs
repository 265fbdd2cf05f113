use crate::domain::{DbdError, DbdResult};
use std::fs;
use std::path::Path;

pub fn format_fixed_f64(value: f64, width: usize, precision: usize) -> String {
    format!(
        "{value:>width$.precision$}",
        width = width,
        precision = precision
    )
}

pub fn normalize_text_artifact(content: &str) -> String {
    let mut normalized = content.replace("\r\n", "\n").replace('\r', "\n");
    if !normalized.is_empty() && !normalized.ends_with('\n') {
        normalized.push('\n');
    }
    normalized
}

pub fn ensure_parent_dir(path: &Path) -> DbdResult<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|source| {
                DbdError::io_system(
                    "IO.OUTPUT_DIRECTORY",
                    format!(
                        "failed to create output directory '{}': {}",
                        parent.display(),
                        source
                    ),
                )
            })
        }
        _ => Ok(()),
    }
}

pub fn write_text_artifact(path: &Path, content: &str) -> DbdResult<()> {
    ensure_parent_dir(path)?;
    fs::write(path, normalize_text_artifact(content)).map_err(|source| {
        DbdError::io_system(
            "IO.WRITE_ARTIFACT",
            format!("failed to write '{}': {}", path.display(), source),
        )
    })
}
