//! # Inventory Table I/O
//!
//! Reads and writes the whole inventory file in one pass.
//!
//! ## Persist Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    write_table(path, table)                             │
//! │                                                                         │
//! │  1. Create .stockscan-XXXX.tmp next to the target (same filesystem)    │
//! │  2. Copy permissions of the existing file, if any                      │
//! │  3. Write header + every row                                            │
//! │  4. fsync the temp file                                                 │
//! │  5. rename over the target   ← atomic: readers see old or new, never   │
//! │                                 a half-written file                     │
//! │                                                                         │
//! │  Any failure before step 5 leaves the previous file untouched and the  │
//! │  temp file is removed when it is dropped.                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

use stockscan_core::validation::validate_barcode;
use stockscan_core::{InventoryRecord, Money, RecordDefaults};
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::schema::{Column, Layout};

/// One data row: the interpreted record plus any uninterpreted cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRow {
    pub record: InventoryRecord,

    /// Cells of the extra columns, indexed by `Column::Extra(i)`.
    pub extra: Vec<String>,
}

impl StoredRow {
    /// A row with no extra cells.
    pub fn new(record: InventoryRecord) -> Self {
        StoredRow {
            record,
            extra: Vec::new(),
        }
    }
}

/// The whole inventory file in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventoryTable {
    pub layout: Layout,
    pub rows: Vec<StoredRow>,
}

impl InventoryTable {
    /// Empty table with the canonical columns.
    pub fn new() -> Self {
        InventoryTable::default()
    }

    /// Records in file order.
    pub fn records(&self) -> impl Iterator<Item = &InventoryRecord> {
        self.rows.iter().map(|row| &row.record)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// =============================================================================
// Reading
// =============================================================================

/// Reads the inventory file at `path`.
///
/// Returns `Ok(None)` if the file does not exist. `defaults` supplies the
/// placeholder name for files without a name column.
pub fn read_table(path: &Path, defaults: &RecordDefaults) -> StoreResult<Option<InventoryTable>> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(StoreError::Unreadable {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| csv_error(path, e))?
        .iter()
        .map(str::to_string)
        .collect::<Vec<_>>();

    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(StoreError::corrupt(path, "no header row"));
    }

    let mut layout = Layout::resolve(&headers).map_err(|reason| StoreError::corrupt(path, reason))?;

    let mut rows = Vec::new();
    let mut seen: HashMap<String, u64> = HashMap::new();

    for result in reader.records() {
        let cells = result.map_err(|e| csv_error(path, e))?;
        let line = cells.position().map_or(0, |p| p.line());

        if cells.iter().all(|c| c.trim().is_empty()) {
            continue;
        }

        let width = layout.columns().len();
        if cells.iter().skip(width).any(|c| !c.trim().is_empty()) {
            return Err(StoreError::corrupt(
                path,
                format!("line {line}: row has {} cells, header has {width}", cells.len()),
            ));
        }

        let row = parse_row(&layout, &cells, defaults)
            .map_err(|reason| StoreError::corrupt(path, format!("line {line}: {reason}")))?;

        if let Some(first) = seen.insert(row.record.code.clone(), line) {
            return Err(StoreError::corrupt(
                path,
                format!(
                    "line {line}: barcode {} already appears on line {first}",
                    row.record.code
                ),
            ));
        }

        rows.push(row);
    }

    if layout.ensure_name_column() {
        debug!(path = %path.display(), "No name column, adding one on next save");
    }

    Ok(Some(InventoryTable { layout, rows }))
}

fn parse_row(
    layout: &Layout,
    cells: &csv::StringRecord,
    defaults: &RecordDefaults,
) -> Result<StoredRow, String> {
    let mut code = None;
    let mut name = None;
    let mut price = None;
    let mut stock = None;
    let mut extra = vec![String::new(); layout.extra_count()];

    for (index, column) in layout.columns().iter().enumerate() {
        let cell = cells.get(index).unwrap_or("");
        match column {
            Column::Code => {
                code = Some(
                    validate_barcode(cell)
                        .map_err(|e| format!("bad barcode '{cell}': {e}"))?
                        .to_string(),
                );
            }
            Column::Name => {
                let trimmed = cell.trim();
                if !trimmed.is_empty() {
                    name = Some(trimmed.to_string());
                }
            }
            Column::Price => price = Some(parse_price(cell)?),
            Column::Stock => stock = Some(parse_stock(cell)?),
            Column::Extra(i) => extra[*i] = cell.to_string(),
        }
    }

    // Layout::resolve guarantees these columns exist.
    let (Some(code), Some(price), Some(stock)) = (code, price, stock) else {
        return Err("row is missing a required cell".to_string());
    };
    let name = name.unwrap_or_else(|| defaults.placeholder_name(&code));

    Ok(StoredRow {
        record: InventoryRecord::new(code, name, price, stock),
        extra,
    })
}

fn parse_price(cell: &str) -> Result<Money, String> {
    let cell = cell.trim();
    let price: Money = cell
        .parse()
        .map_err(|e| format!("price '{cell}' is invalid: {e}"))?;

    if price.is_negative() {
        return Err(format!("price '{cell}' is negative"));
    }
    Ok(price)
}

/// Parses a stock cell. Spreadsheet exports often write whole numbers as
/// `3.0`, so an all-zero fraction is accepted.
fn parse_stock(cell: &str) -> Result<u64, String> {
    let cell = cell.trim();

    if let Ok(stock) = cell.parse::<u64>() {
        return Ok(stock);
    }

    if let Some((whole, fraction)) = cell.split_once('.') {
        let whole_ok = !whole.is_empty() && whole.bytes().all(|b| b.is_ascii_digit());
        if whole_ok && fraction.bytes().all(|b| b == b'0') {
            return whole
                .parse::<u64>()
                .map_err(|_| format!("stock '{cell}' is too large"));
        }
    }

    if cell.starts_with('-') {
        Err(format!("stock '{cell}' is negative"))
    } else {
        Err(format!("stock '{cell}' is not a whole number"))
    }
}

fn csv_error(path: &Path, err: csv::Error) -> StoreError {
    match err.into_kind() {
        csv::ErrorKind::Io(source) => StoreError::Unreadable {
            path: path.to_path_buf(),
            source,
        },
        csv::ErrorKind::Utf8 { pos, err } => {
            let line = pos.map_or(0, |p| p.line());
            StoreError::corrupt(path, format!("line {line}: {err}"))
        }
        other => StoreError::corrupt(path, format!("{other:?}")),
    }
}

// =============================================================================
// Writing
// =============================================================================

/// Writes `table` to `path`, replacing any existing file atomically.
pub fn write_table(path: &Path, table: &InventoryTable) -> StoreResult<()> {
    let persist_err = |source: io::Error| StoreError::persist(path, source);

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::Builder::new()
        .prefix(".stockscan-")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(persist_err)?;

    if let Ok(meta) = fs::metadata(path) {
        tmp.as_file()
            .set_permissions(meta.permissions())
            .map_err(persist_err)?;
    }

    {
        let mut writer = csv::Writer::from_writer(tmp.as_file_mut());
        write_rows(&mut writer, table).map_err(|e| persist_err(io::Error::other(e)))?;
        writer.flush().map_err(persist_err)?;
    }

    tmp.as_file().sync_all().map_err(persist_err)?;
    tmp.persist(path).map_err(|e| persist_err(e.error))?;

    debug!(path = %path.display(), rows = table.len(), "Inventory written");
    Ok(())
}

fn write_rows<W: Write>(writer: &mut csv::Writer<W>, table: &InventoryTable) -> csv::Result<()> {
    writer.write_record(table.layout.headers())?;
    for row in &table.rows {
        writer.write_record(table.layout.cells(&row.record, &row.extra))?;
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
