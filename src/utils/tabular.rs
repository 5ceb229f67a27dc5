use std::fs;
use std::fs::File;
use std::path::Path;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};
use crate::core::library::{LibraryError, LibraryResult};

// read_records loads every row of a comma-delimited dataset with a header row. A file that
// cannot be opened is reported and treated as an empty dataset; a malformed row fails the load.
pub(crate) fn read_records<T: DeserializeOwned>(path: &Path) -> LibraryResult<Vec<T>> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "{} file not found.", file_name(path));
            return Ok(vec![]);
        }
    };
    let mut reader = csv::Reader::from_reader(file);
    let records = reader.deserialize()
        .map(|row| row.map_err(LibraryError::from))
        .collect::<LibraryResult<Vec<T>>>()?;
    debug!(path = %path.display(), rows = records.len(), "loaded dataset");
    Ok(records)
}

// write_records rewrites the whole dataset: header row first, then one row per record.
pub(crate) fn write_records<T: Serialize>(path: &Path, headers: &[&str], records: &[T]) -> LibraryResult<usize> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    writer.write_record(headers)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    debug!(path = %path.display(), rows = records.len(), "saved dataset");
    Ok(records.len())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
