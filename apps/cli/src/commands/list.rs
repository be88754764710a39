//! `stockscan list`: print the inventory.

use anyhow::Result;
use stockscan_core::{InventoryRecord, Money};
use stockscan_scanner::ScannerConfig;

use super::open_store;

pub fn run(config: &ScannerConfig, json: bool) -> Result<()> {
    let store = open_store(config)?;
    let records = store.snapshot();

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        print!("{}", render_table(&records));
    }
    Ok(())
}

/// Fixed-width table with a totals line.
fn render_table(records: &[InventoryRecord]) -> String {
    let code_width = column_width("Barcode", records.iter().map(|r| r.code.chars().count()));
    let name_width = column_width("Product Name", records.iter().map(|r| r.name.chars().count()));

    let mut out = format!(
        "{:<code_width$}  {:<name_width$}  {:>10}  {:>8}\n",
        "Barcode", "Product Name", "Price", "Stock"
    );

    let mut units: u64 = 0;
    let mut value = Money::zero();
    for record in records {
        out.push_str(&format!(
            "{:<code_width$}  {:<name_width$}  {:>10}  {:>8}\n",
            record.code,
            record.name,
            record.price.to_string(),
            record.stock
        ));
        units = units.saturating_add(record.stock);
        value += record.stock_value();
    }

    out.push_str(&format!(
        "{} product(s), {} unit(s), stock value {}\n",
        records.len(),
        units,
        value
    ));
    out
}

fn column_width(header: &str, widths: impl Iterator<Item = usize>) -> usize {
    widths.max().unwrap_or(0).max(header.len())
}
