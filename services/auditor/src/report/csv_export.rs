//! Flat CSV export of decoded records
//!
//! One row per item. A record without items still gets one row, with the
//! item columns left empty. Non-item columns repeat on every row.

use crate::processor::RecordSink;
use audit_types::{Decimal, Item, Record};
use csv::{QuoteStyle, Terminator, Writer, WriterBuilder};
use std::io::{self, Write};

/// Column names, in output order
pub const CSV_COLUMNS: [&str; 11] = [
    "order_id",
    "user_id",
    "currency",
    "total_amount",
    "created_at",
    "updated_at",
    "channel",
    "total_discounts",
    "item_sku",
    "item_qty",
    "item_price",
];

/// Header line as written to the file
pub const CSV_HEADER: &str = "order_id,user_id,currency,total_amount,created_at,updated_at,channel,total_discounts,item_sku,item_qty,item_price";

/// Writes records as CSV rows
pub struct CsvExporter<W: Write> {
    writer: Writer<W>,
    rows_written: u64,
    records_written: u64,
}

impl<W: Write> CsvExporter<W> {
    /// Create an exporter and write the header line
    pub fn new(inner: W) -> io::Result<Self> {
        let mut writer = WriterBuilder::new()
            .quote_style(QuoteStyle::Necessary)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(inner);
        writer.write_record(CSV_COLUMNS)?;

        Ok(Self {
            writer,
            rows_written: 0,
            records_written: 0,
        })
    }

    /// Write the rows for one record
    pub fn write_record(&mut self, record: &Record) -> io::Result<()> {
        let common = common_columns(record);

        match record.items.as_deref() {
            Some(items) if !items.is_empty() => {
                for item in items {
                    let [sku, qty, price] = item_columns(item);
                    self.writer
                        .write_record(common.iter().chain([&sku, &qty, &price]))?;
                    self.rows_written += 1;
                }
            }
            _ => {
                self.writer
                    .write_record(common.iter().map(String::as_str).chain(["", "", ""]))?;
                self.rows_written += 1;
            }
        }

        self.records_written += 1;
        Ok(())
    }

    /// Flush buffered output
    pub fn finish(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }

    pub fn records_written(&self) -> u64 {
        self.records_written
    }

    /// Flush and hand back the underlying writer
    pub fn into_inner(self) -> io::Result<W> {
        self.writer.into_inner().map_err(|err| err.into_error())
    }
}

impl<W: Write> RecordSink for CsvExporter<W> {
    fn name(&self) -> &'static str {
        "csv"
    }

    fn accept(&mut self, record: &Record) -> io::Result<()> {
        self.write_record(record)
    }

    fn finish(&mut self) -> io::Result<()> {
        CsvExporter::finish(self)
    }
}

fn common_columns(record: &Record) -> [String; 8] {
    let text = |value: Option<&str>| value.unwrap_or_default().to_string();

    [
        text(record.order_id.as_deref()),
        text(record.user_id.as_deref()),
        text(record.currency.as_deref()),
        record.total_amount.map(|amount| amount.to_string()).unwrap_or_default(),
        text(record.created_at.as_deref()),
        text(record.updated_at.as_deref()),
        text(record.channel()),
        total_discounts(record),
    ]
}

fn item_columns(item: &Item) -> [String; 3] {
    [
        item.sku.clone().unwrap_or_default(),
        item.qty.map(|qty| qty.to_string()).unwrap_or_default(),
        item.price.map(|price| price.to_string()).unwrap_or_default(),
    ]
}

/// Exact sum of discount amounts, `0.00` when there are none
fn total_discounts(record: &Record) -> String {
    match record.discounts.as_deref() {
        None | Some([]) => "0.00".to_string(),
        Some(discounts) => discounts
            .iter()
            .filter_map(|discount| discount.amount)
            .try_fold(Decimal::ZERO, |sum, amount| sum.checked_add(amount))
            .map(|sum| sum.to_string())
            .unwrap_or_default(),
    }
}
