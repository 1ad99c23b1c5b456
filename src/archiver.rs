use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::Path;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::errors::DatasetError;
use crate::models::ProductRecord;

/// Writes the products as a 4-space indented JSON array. Non-ASCII text is
/// kept as-is.
pub fn save_dataset(
    products: &[ProductRecord],
    path: impl AsRef<Path>,
) -> Result<(), DatasetError> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
    products
        .serialize(&mut serializer)
        .map_err(|source| DatasetError::Invalid {
            path: path.to_path_buf(),
            source,
        })?;

    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

pub fn load_dataset(path: impl AsRef<Path>) -> Result<Vec<ProductRecord>, DatasetError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => DatasetError::NotFound(path.to_path_buf()),
        _ => DatasetError::Io(e),
    })?;

    serde_json::from_reader(BufReader::new(file)).map_err(|source| DatasetError::Invalid {
        path: path.to_path_buf(),
        source,
    })
}
