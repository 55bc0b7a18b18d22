//! Directory processing: collect, encode, extract, normalize.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::{debug, info};

use crate::error::{Result, TallyError};
use crate::extraction::ReceiptExtractor;
use crate::models::receipt::{is_known_category, ReceiptCollection, ReceiptRecord};
use crate::source::{encode_file, list_files, ReceiptFile};

/// List the receipt files in `dir`, sorted by name.
pub fn collect_files(dir: &Path) -> Result<Vec<ReceiptFile>> {
    let mut files = list_files(dir)?;
    files.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(files)
}

/// Encode one file, send it to the extractor and normalize the reply.
pub async fn process_file<E: ReceiptExtractor>(
    file: &ReceiptFile,
    extractor: &E,
) -> Result<ReceiptRecord> {
    let image_b64 = encode_file(&file.path)?;

    let fields = extractor
        .extract(&image_b64)
        .await
        .map_err(|source| TallyError::Extraction {
            name: file.name.clone(),
            source,
        })?;

    let record = ReceiptRecord::from_fields(fields);

    if let Some(category) = record.category.as_deref() {
        if !is_known_category(category) {
            debug!("{}: model returned unlisted category {:?}", file.name, category);
        }
    }
    debug!(
        "{}: date={:?} amount={:?} vendor={:?} category={:?}",
        file.name, record.date, record.amount, record.vendor, record.category
    );

    Ok(record)
}

/// Process files one at a time, calling `on_processed` after each.
///
/// The first failure aborts the run; no partial collection is returned.
pub async fn process_files<E, F>(
    files: &[ReceiptFile],
    extractor: &E,
    mut on_processed: F,
) -> Result<ReceiptCollection>
where
    E: ReceiptExtractor,
    F: FnMut(&ReceiptFile),
{
    let mut records = BTreeMap::new();

    for file in files {
        let record = process_file(file, extractor).await?;
        records.insert(file.name.clone(), record);
        on_processed(file);
    }

    Ok(ReceiptCollection::from(records))
}

/// Build the receipt collection for every regular file in `dir`.
pub async fn process_directory<E: ReceiptExtractor>(
    dir: &Path,
    extractor: &E,
) -> Result<ReceiptCollection> {
    let files = collect_files(dir)?;
    info!("Processing {} files from {}", files.len(), dir.display());

    process_files(&files, extractor, |_| {}).await
}
