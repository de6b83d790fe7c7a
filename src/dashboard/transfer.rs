// dashboard/transfer.rs - Import/export of flat records
//
// The derived view leaves the dashboard as a sequence of flat records
// (ordered column/value string pairs) written as CSV, JSON or an HTML
// table. Import reads the same three formats back into flat records, and
// products_from_records turns those into products for an import preview.
//
// Import never touches live state: callers get records or an error.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use scraper::{Html, Selector};
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::dashboard::error::{DashboardError, Result};
use crate::dashboard::model::{ImportStatus, Product};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const CERTIFICATION_SEPARATOR: &str = ";";

/// Supported text formats
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Json,
    Html,
}

impl ExportFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv; charset=utf-8",
            ExportFormat::Json => "application/json",
            ExportFormat::Html => "text/html; charset=utf-8",
        }
    }

    pub fn file_extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Html => "html",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Csv => write!(f, "CSV"),
            ExportFormat::Json => write!(f, "JSON"),
            ExportFormat::Html => write!(f, "HTML"),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            "html" | "htm" => Ok(ExportFormat::Html),
            _ => Err(DashboardError::invalid_value("format", s)),
        }
    }
}

/// Ordered column/value pairs
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FlatRecord {
    fields: Vec<(String, String)>,
}

impl FlatRecord {
    pub fn new() -> Self {
        FlatRecord::default()
    }

    /// Append a column, replacing the value if the column already exists
    pub fn push(&mut self, column: impl Into<String>, value: impl Into<String>) {
        let column = column.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(c, _)| *c == column) {
            Some(field) => field.1 = value,
            None => self.fields.push((column, value)),
        }
    }

    pub fn with(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(column, value);
        self
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, v)| v.as_str())
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(c, _)| c.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

// Serialized as a JSON object with columns in record order
impl Serialize for FlatRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (column, value) in &self.fields {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FlatRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_map(FlatRecordVisitor)
    }
}

struct FlatRecordVisitor;

impl<'de> Visitor<'de> for FlatRecordVisitor {
    type Value = FlatRecord;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "an object with scalar values")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<FlatRecord, A::Error> {
        let mut record = FlatRecord::new();
        while let Some((column, value)) = access.next_entry::<String, serde_json::Value>()? {
            let text = match value {
                serde_json::Value::String(s) => s,
                serde_json::Value::Null => String::new(),
                serde_json::Value::Bool(b) => b.to_string(),
                serde_json::Value::Number(n) => n.to_string(),
                _ => {
                    return Err(de::Error::custom(format!(
                        "column '{}' holds a nested value",
                        column
                    )))
                }
            };
            record.push(column, text);
        }
        Ok(record)
    }
}

impl Product {
    /// Flatten into export columns
    pub fn to_flat_record(&self) -> FlatRecord {
        let certifications: Vec<&str> = self.certifications.iter().map(String::as_str).collect();

        FlatRecord::new()
            .with("id", self.id.to_string())
            .with("sku", self.sku.as_str())
            .with("name", self.name.as_str())
            .with("name_vi", self.name_vi.as_str())
            .with("category", self.category.as_str())
            .with("subcategory", self.subcategory.clone().unwrap_or_default())
            .with("temperature_class", self.temperature_class.to_string())
            .with("stock", self.stock.to_string())
            .with("reorder_point", self.reorder_point.to_string())
            .with("price", self.price.to_string())
            .with("province", self.province.as_str())
            .with(
                "certifications",
                certifications.join(CERTIFICATION_SEPARATOR),
            )
            .with("popular", self.popular.to_string())
            .with("blockchain_verified", self.blockchain_verified.to_string())
            .with("quality_grade", self.quality_grade.to_string())
            .with(
                "last_restocked",
                self.last_restocked.format(TIMESTAMP_FORMAT).to_string(),
            )
    }
}

/// Serialize records; the first record's columns form the header
pub fn export(records: &[FlatRecord], format: ExportFormat) -> Result<String> {
    let output = match format {
        ExportFormat::Csv => export_csv(records),
        ExportFormat::Json => serde_json::to_string_pretty(records).map_err(|e| export_error(format, e)),
        ExportFormat::Html => Ok(export_html(records)),
    }?;

    tracing::debug!("Exported {} records as {}", records.len(), format);
    Ok(output)
}

/// Flatten and serialize products in the given order
pub fn export_products<'a>(
    products: impl IntoIterator<Item = &'a Product>,
    format: ExportFormat,
) -> Result<String> {
    let records: Vec<FlatRecord> = products.into_iter().map(Product::to_flat_record).collect();
    export(&records, format)
}

fn header(records: &[FlatRecord]) -> Vec<&str> {
    records
        .first()
        .map(|r| r.columns().collect())
        .unwrap_or_default()
}

fn export_csv(records: &[FlatRecord]) -> Result<String> {
    let columns = header(records);
    let mut writer = csv::Writer::from_writer(Vec::new());

    if !columns.is_empty() {
        writer
            .write_record(&columns)
            .map_err(|e| export_error(ExportFormat::Csv, e))?;
    }
    for record in records {
        let row: Vec<&str> = columns
            .iter()
            .map(|c| record.get(c).unwrap_or(""))
            .collect();
        writer
            .write_record(&row)
            .map_err(|e| export_error(ExportFormat::Csv, e))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| export_error(ExportFormat::Csv, e))?;
    String::from_utf8(bytes).map_err(|e| export_error(ExportFormat::Csv, e))
}

fn export_html(records: &[FlatRecord]) -> String {
    let columns = header(records);
    let mut html = String::from("<table>\n  <thead>\n    <tr>");
    for column in &columns {
        html.push_str(&format!("<th>{}</th>", escape_html(column)));
    }
    html.push_str("</tr>\n  </thead>\n  <tbody>\n");
    for record in records {
        html.push_str("    <tr>");
        for column in &columns {
            html.push_str(&format!(
                "<td>{}</td>",
                escape_html(record.get(column).unwrap_or(""))
            ));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("  </tbody>\n</table>\n");
    html
}

/// Parse text in `format` back into records
pub fn import(text: &str, format: ExportFormat) -> Result<Vec<FlatRecord>> {
    let records = match format {
        ExportFormat::Csv => import_csv(text),
        ExportFormat::Json => {
            serde_json::from_str::<Vec<FlatRecord>>(text).map_err(|e| import_error(format, e))
        }
        ExportFormat::Html => import_html(text),
    }?;

    tracing::debug!("Imported {} records from {}", records.len(), format);
    Ok(records)
}

fn import_csv(text: &str) -> Result<Vec<FlatRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| import_error(ExportFormat::Csv, e))?
        .clone();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|e| import_error(ExportFormat::Csv, e))?;
        let mut record = FlatRecord::new();
        for (column, value) in headers.iter().zip(row.iter()) {
            record.push(column, value);
        }
        records.push(record);
    }
    Ok(records)
}

// First row is the header; `th` and `td` cells are read alike
fn import_html(text: &str) -> Result<Vec<FlatRecord>> {
    let document = Html::parse_document(text);
    let row_selector = html_selector("tr")?;
    let cell_selector = html_selector("th, td")?;

    let mut rows = document.select(&row_selector).map(|row| {
        row.select(&cell_selector)
            .map(|cell| cell.text().collect::<String>().trim().to_string())
            .collect::<Vec<String>>()
    });
    let columns = rows
        .next()
        .ok_or_else(|| import_error(ExportFormat::Html, "no table rows found"))?;

    rows.enumerate()
        .map(|(idx, cells)| {
            if cells.len() != columns.len() {
                return Err(import_error(
                    ExportFormat::Html,
                    format!(
                        "row {} has {} cells, header has {}",
                        idx + 1,
                        cells.len(),
                        columns.len()
                    ),
                ));
            }
            let mut record = FlatRecord::new();
            for (column, value) in columns.iter().zip(cells) {
                record.push(column.as_str(), value);
            }
            Ok(record)
        })
        .collect()
}

fn html_selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| import_error(ExportFormat::Html, e))
}

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn import_error(format: ExportFormat, err: impl fmt::Display) -> DashboardError {
    DashboardError::Import {
        format: format.to_string(),
        message: err.to_string(),
    }
}

fn export_error(format: ExportFormat, err: impl fmt::Display) -> DashboardError {
    DashboardError::Export {
        format: format.to_string(),
        message: err.to_string(),
    }
}

/// Convert imported records into products for a preview
///
/// Each record is processed independently; failures are counted and
/// described in the status, never fatal. Repeated ids fail after the first.
pub fn products_from_records(records: &[FlatRecord]) -> (Vec<Product>, ImportStatus) {
    let mut status = ImportStatus {
        total: records.len(),
        ..ImportStatus::default()
    };
    let mut products = Vec::new();
    let mut seen_ids = HashSet::new();

    for (idx, record) in records.iter().enumerate() {
        status.processed += 1;

        let parsed = product_from_record(record).and_then(|product| {
            if seen_ids.insert(product.id) {
                Ok(product)
            } else {
                Err(format!("duplicate id {}", product.id))
            }
        });

        match parsed {
            Ok(product) => {
                status.succeeded += 1;
                products.push(product);
            }
            Err(message) => {
                status.failed += 1;
                status.errors.push(format!("row {}: {}", idx + 1, message));
            }
        }
    }

    status.complete = true;
    (products, status)
}

fn product_from_record(record: &FlatRecord) -> std::result::Result<Product, String> {
    let text = |column: &str| -> std::result::Result<String, String> {
        record
            .get(column)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| format!("missing column '{}'", column))
    };
    fn parsed<T: FromStr>(column: &str, value: String) -> std::result::Result<T, String> {
        value
            .parse()
            .map_err(|_| format!("invalid {} '{}'", column, value))
    }
    let flag = |column: &str| -> std::result::Result<bool, String> {
        match record.get(column).map(|v| v.trim().to_lowercase()) {
            None => Ok(false),
            Some(v) if v.is_empty() || v == "false" || v == "0" => Ok(false),
            Some(v) if v == "true" || v == "1" => Ok(true),
            Some(v) => Err(format!("invalid {} '{}'", column, v)),
        }
    };

    let last_restocked = text("last_restocked")?;
    let last_restocked = NaiveDateTime::parse_from_str(&last_restocked, TIMESTAMP_FORMAT)
        .map_err(|_| format!("invalid last_restocked '{}'", last_restocked))?;

    Ok(Product {
        id: parsed("id", text("id")?)?,
        sku: text("sku")?,
        name: text("name")?,
        name_vi: text("name_vi")?,
        category: text("category")?,
        subcategory: text("subcategory").ok(),
        temperature_class: parsed("temperature_class", text("temperature_class")?)?,
        stock: parsed("stock", text("stock")?)?,
        reorder_point: parsed("reorder_point", text("reorder_point")?)?,
        price: parsed::<Decimal>("price", text("price")?)?,
        province: text("province")?,
        certifications: record
            .get("certifications")
            .unwrap_or("")
            .split(CERTIFICATION_SEPARATOR)
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect(),
        popular: flag("popular")?,
        blockchain_verified: flag("blockchain_verified")?,
        quality_grade: parsed("quality_grade", text("quality_grade")?)?,
        last_restocked,
    })
}
