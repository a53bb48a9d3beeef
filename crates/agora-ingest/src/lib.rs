//! CSV cleaning for corpus uploads.
//!
//! Datasets must carry `id`, `title`, `description`, and `url` columns.
//! Rows missing an id, title, or url are skipped and counted; a missing
//! description becomes empty. Title and description are lowercased to match
//! the corpus convention. Pure synchronous; the caller decides where the
//! cleaned rows go.

pub mod error;

use agora_core::corpus::{CorpusKind, CorpusRecord};

pub use error::{Error, Result};

/// Outcome of cleaning one uploaded dataset.
#[derive(Debug)]
pub struct CleanedDataset {
  pub kind:    CorpusKind,
  pub records: Vec<CorpusRecord>,
  /// Rows dropped for a missing or unparsable id, title, or url.
  pub skipped: usize,
}

/// Infer which corpus a file belongs to from its name.
/// `None` when the name mentions neither "case" nor "method".
pub fn kind_from_filename(name: &str) -> Option<CorpusKind> {
  let lowered = name.to_lowercase();
  if lowered.contains("case") {
    Some(CorpusKind::Case)
  } else if lowered.contains("method") {
    Some(CorpusKind::Method)
  } else {
    None
  }
}

/// Parse and clean a CSV dataset.
///
/// Column order is free; header names are matched case-insensitively.
pub fn clean_csv(kind: CorpusKind, data: &[u8]) -> Result<CleanedDataset> {
  let mut reader = csv::Reader::from_reader(data);

  let headers = reader.headers()?.clone();
  let column = |name: &'static str| -> Result<usize> {
    headers
      .iter()
      .position(|h| h.trim().eq_ignore_ascii_case(name))
      .ok_or(Error::MissingColumn(name))
  };
  let id_col = column("id")?;
  let title_col = column("title")?;
  let description_col = column("description")?;
  let url_col = column("url")?;

  let mut records = Vec::new();
  let mut skipped = 0usize;

  for row in reader.records() {
    let row = row?;

    let id = row.get(id_col).and_then(|v| v.trim().parse::<i64>().ok());
    let title = row.get(title_col).map(str::trim).filter(|t| !t.is_empty());
    let url = row.get(url_col).map(str::trim).filter(|u| !u.is_empty());

    let (Some(id), Some(title), Some(url)) = (id, title, url) else {
      skipped += 1;
      continue;
    };

    let description = row
      .get(description_col)
      .map(str::trim)
      .filter(|d| !d.is_empty())
      .map(str::to_lowercase);

    records.push(CorpusRecord {
      id,
      title: title.to_lowercase(),
      description,
      url: url.to_string(),
    });
  }

  Ok(CleanedDataset {
    kind,
    records,
    skipped,
  })
}
