//! CSV export of the active view.

use std::{
    fs,
    path::{Path, PathBuf},
};

use csv::{Terminator, WriterBuilder};
use tempfile::Builder;
use tracing::info;

use crate::{
    error::ExportError,
    models::{Column, PlayerRecord},
};

/// What an export request did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// The file was written with this many data rows.
    Written {
        /// Final destination, including any added extension.
        path: PathBuf,
        /// Number of data rows (the header is not counted).
        rows: usize,
    },
    /// The view was empty so no file was created.
    NothingToExport,
}

/// Append `.csv` when the destination has no extension.
pub fn with_csv_extension(path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    if path.extension().is_some() {
        path.to_path_buf()
    } else {
        path.with_extension("csv")
    }
}

/// Write `rows` as CSV to `path`.
///
/// The file is assembled next to the destination and renamed into place,
/// so a failure never leaves a truncated file behind.
pub fn write_csv<'a, I>(path: impl AsRef<Path>, rows: I) -> Result<ExportOutcome, ExportError>
where
    I: IntoIterator<Item = &'a PlayerRecord>,
{
    let rows: Vec<&PlayerRecord> = rows.into_iter().collect();
    if rows.is_empty() {
        return Ok(ExportOutcome::NothingToExport);
    }

    let path = with_csv_extension(path);
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let io_error = |source| ExportError::Io {
        path: path.clone(),
        source,
    };

    // An overwritten file keeps its mode.
    let existing = fs::metadata(&path).ok().map(|meta| meta.permissions());

    let mut builder = Builder::new();
    builder.prefix(".txplayers-").suffix(".csv.part");
    default_permissions(&mut builder);
    let mut staged = builder.tempfile_in(dir).map_err(io_error)?;
    if let Some(permissions) = existing {
        staged
            .as_file()
            .set_permissions(permissions)
            .map_err(io_error)?;
    }
    {
        let mut writer = WriterBuilder::new()
            .terminator(Terminator::CRLF)
            .from_writer(staged.as_file_mut());
        writer.write_record(Column::ALL.map(Column::csv_header))?;
        for record in &rows {
            writer.write_record(record.cells())?;
        }
        writer.flush().map_err(io_error)?;
    }
    staged.as_file().sync_all().map_err(io_error)?;

    let file = staged
        .persist(&path)
        .map_err(|err| ExportError::Persist {
            path: path.clone(),
            source: err.error,
        })?;
    drop(file);

    info!(path = %path.display(), rows = rows.len(), "CSV export written");
    Ok(ExportOutcome::Written {
        path,
        rows: rows.len(),
    })
}

/// New exports get `0o666` minus the umask.
#[cfg(unix)]
fn default_permissions(builder: &mut Builder<'_, '_>) {
    use std::os::unix::fs::PermissionsExt;

    builder.permissions(fs::Permissions::from_mode(0o666));
}

#[cfg(not(unix))]
fn default_permissions(_builder: &mut Builder<'_, '_>) {}
