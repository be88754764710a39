//! # Inventory File Schema
//!
//! Maps the header row of an inventory file onto record fields.
//!
//! ## Header Resolution
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  header:  SKU     │ Category │ Name    │ Price │ Qty                   │
//! │            │           │          │         │       │                  │
//! │            ▼           ▼          ▼         ▼       ▼                  │
//! │  column:  Code    │ Extra(0) │ Name    │ Price │ Stock                 │
//! │                                                                         │
//! │  Labels and order are kept as found, so a rewrite produces the same    │
//! │  header the operator's spreadsheet started with.                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Matching is case-insensitive and ignores surrounding whitespace.

use stockscan_core::InventoryRecord;

/// Canonical header of a freshly created inventory file.
pub const CANONICAL_HEADERS: [&str; 4] = ["Barcode", "Product Name", "Price", "Stock"];

const CODE_ALIASES: &[&str] = &["barcode", "product", "code", "sku"];
const NAME_ALIASES: &[&str] = &["product name", "name"];
const PRICE_ALIASES: &[&str] = &["price"];
const STOCK_ALIASES: &[&str] = &["stock", "quantity", "qty"];

/// What a column holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Code,
    Name,
    Price,
    Stock,
    /// A column stockscan does not interpret, carried through verbatim.
    /// The index is the position among the extra columns.
    Extra(usize),
}

impl Column {
    /// Resolves a header label to a record field, or `None` if unrecognised.
    fn from_label(label: &str) -> Option<Column> {
        let label = label.trim().to_lowercase();
        let label = label.as_str();

        if CODE_ALIASES.contains(&label) {
            Some(Column::Code)
        } else if NAME_ALIASES.contains(&label) {
            Some(Column::Name)
        } else if PRICE_ALIASES.contains(&label) {
            Some(Column::Price)
        } else if STOCK_ALIASES.contains(&label) {
            Some(Column::Stock)
        } else {
            None
        }
    }

    fn field_name(self) -> &'static str {
        match self {
            Column::Code => "barcode",
            Column::Name => "name",
            Column::Price => "price",
            Column::Stock => "stock",
            Column::Extra(_) => "extra",
        }
    }
}

/// Resolved header row: labels as written plus what each column holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    headers: Vec<String>,
    columns: Vec<Column>,
    extra_count: usize,
}

impl Layout {
    /// Layout of a new file: `Barcode, Product Name, Price, Stock`.
    pub fn canonical() -> Self {
        Layout {
            headers: CANONICAL_HEADERS.iter().map(|h| h.to_string()).collect(),
            columns: vec![Column::Code, Column::Name, Column::Price, Column::Stock],
            extra_count: 0,
        }
    }

    /// Resolves a header row.
    ///
    /// Returns a human-readable reason when a required column is missing
    /// or when two columns claim the same field.
    pub fn resolve<S: AsRef<str>>(headers: &[S]) -> Result<Self, String> {
        let mut columns = Vec::with_capacity(headers.len());
        let mut extra_count = 0;

        for label in headers {
            let label = label.as_ref();
            let column = match Column::from_label(label) {
                Some(column) => {
                    if let Some(first) = columns.iter().position(|c| *c == column) {
                        return Err(format!(
                            "columns '{}' and '{}' both hold the {}",
                            headers[first].as_ref(),
                            label,
                            column.field_name()
                        ));
                    }
                    column
                }
                None => {
                    extra_count += 1;
                    Column::Extra(extra_count - 1)
                }
            };
            columns.push(column);
        }

        for required in [Column::Code, Column::Price, Column::Stock] {
            if !columns.contains(&required) {
                return Err(format!("missing required {} column", required.field_name()));
            }
        }

        Ok(Layout {
            headers: headers.iter().map(|h| h.as_ref().to_string()).collect(),
            columns,
            extra_count,
        })
    }

    /// Header labels in file order.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Column roles in file order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Number of uninterpreted columns.
    pub fn extra_count(&self) -> usize {
        self.extra_count
    }

    /// File position of a field's column.
    pub fn position(&self, column: Column) -> Option<usize> {
        self.columns.iter().position(|c| *c == column)
    }

    /// True if the file has a product-name column.
    pub fn has_name(&self) -> bool {
        self.position(Column::Name).is_some()
    }

    /// Appends a canonical `Product Name` column if there is none.
    /// Returns true if the layout changed.
    pub fn ensure_name_column(&mut self) -> bool {
        if self.has_name() {
            return false;
        }
        self.headers.push(CANONICAL_HEADERS[1].to_string());
        self.columns.push(Column::Name);
        true
    }

    /// Lays out one record and its extra cells in file column order.
    pub fn cells(&self, record: &InventoryRecord, extra: &[String]) -> Vec<String> {
        self.columns
            .iter()
            .map(|column| match column {
                Column::Code => record.code.clone(),
                Column::Name => record.name.clone(),
                Column::Price => record.price.to_decimal_string(),
                Column::Stock => record.stock.to_string(),
                Column::Extra(i) => extra.get(*i).cloned().unwrap_or_default(),
            })
            .collect()
    }
}

impl Default for Layout {
    fn default() -> Self {
        Layout::canonical()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
