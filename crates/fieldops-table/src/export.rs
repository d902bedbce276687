// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use fieldops_app::{
    Customer, EntityKind, Invoice, Record, StatusKey, WorkOrder, format_cents, format_date,
};
use serde_json::{Map, Value};
use std::io::Write;
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("nothing to export -- select records or widen the filter and retry")]
    Empty,
    #[error("write CSV rows -- check the export destination is writable and retry")]
    Csv(#[from] csv::Error),
    #[error("write JSON rows -- check the export destination is writable and retry")]
    Json(#[from] serde_json::Error),
    #[error("write export output -- check free space and permissions on the destination")]
    Io(#[from] std::io::Error),
}

/// A record type with a flat tabular export shape.
pub trait ExportRecord: Record {
    fn headers() -> &'static [&'static str];
    fn row(&self) -> Vec<String>;
}

fn joined_tags<R: Record>(record: &R) -> String {
    record.tags().iter().collect::<Vec<_>>().join("; ")
}

impl ExportRecord for Customer {
    fn headers() -> &'static [&'static str] {
        &[
            "id",
            "name",
            "email",
            "phone",
            "company",
            "address",
            "status",
            "tags",
            "total_jobs",
            "lifetime_value",
            "customer_since",
        ]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.email.clone(),
            self.phone.clone(),
            self.company.clone(),
            self.address.clone(),
            self.status.as_str().to_owned(),
            joined_tags(self),
            self.total_jobs.to_string(),
            format_cents(self.lifetime_value_cents),
            format_date(self.customer_since),
        ]
    }
}

impl ExportRecord for WorkOrder {
    fn headers() -> &'static [&'static str] {
        &[
            "id",
            "title",
            "customer",
            "technician",
            "address",
            "priority",
            "scheduled_for",
            "estimate",
            "status",
            "tags",
        ]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.title.clone(),
            self.customer.clone(),
            self.technician.clone(),
            self.address.clone(),
            self.priority.as_str().to_owned(),
            format_date(self.scheduled_for),
            format_cents(self.estimate_cents),
            self.status.as_str().to_owned(),
            joined_tags(self),
        ]
    }
}

impl ExportRecord for Invoice {
    fn headers() -> &'static [&'static str] {
        &[
            "id",
            "customer",
            "work_order",
            "issued_on",
            "due_on",
            "total",
            "status",
            "tags",
        ]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.customer.clone(),
            self.work_order
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
            format_date(self.issued_on),
            format_date(self.due_on),
            format_cents(self.total_cents),
            self.status.as_str().to_owned(),
            joined_tags(self),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportScope {
    Selection,
    Filtered,
}

impl ExportScope {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Selection => "selection",
            Self::Filtered => "filtered",
        }
    }
}

/// Rows handed to an [`Exporter`], already flattened to strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportBatch {
    pub entity: EntityKind,
    pub scope: ExportScope,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ExportBatch {
    pub fn from_records<'a, R, I>(scope: ExportScope, records: I) -> Self
    where
        R: ExportRecord + 'a,
        I: IntoIterator<Item = &'a R>,
    {
        Self {
            entity: R::ENTITY,
            scope,
            headers: R::headers().iter().map(|header| (*header).to_owned()).collect(),
            rows: records.into_iter().map(R::row).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub trait Exporter {
    /// Writes the batch and returns the number of rows written.
    fn export(&mut self, batch: &ExportBatch) -> Result<usize, ExportError>;
}

pub struct CsvExporter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> CsvExporter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(writer),
        }
    }
}

impl<W: Write> Exporter for CsvExporter<W> {
    fn export(&mut self, batch: &ExportBatch) -> Result<usize, ExportError> {
        if batch.is_empty() {
            return Err(ExportError::Empty);
        }
        self.writer.write_record(&batch.headers)?;
        for row in &batch.rows {
            self.writer.write_record(row)?;
        }
        self.writer.flush()?;
        info!(
            entity = batch.entity.as_str(),
            scope = batch.scope.as_str(),
            rows = batch.len(),
            "csv export"
        );
        Ok(batch.len())
    }
}

/// Writes the batch as a JSON array with one object per row, keyed by
/// header.
pub struct JsonExporter<W: Write> {
    writer: W,
}

impl<W: Write> JsonExporter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> Exporter for JsonExporter<W> {
    fn export(&mut self, batch: &ExportBatch) -> Result<usize, ExportError> {
        if batch.is_empty() {
            return Err(ExportError::Empty);
        }
        let objects = batch
            .rows
            .iter()
            .map(|row| {
                batch
                    .headers
                    .iter()
                    .cloned()
                    .zip(row.iter().cloned().map(Value::String))
                    .collect::<Map<_, _>>()
            })
            .map(Value::Object)
            .collect::<Vec<_>>();
        serde_json::to_writer_pretty(&mut self.writer, &objects)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        info!(
            entity = batch.entity.as_str(),
            scope = batch.scope.as_str(),
            rows = batch.len(),
            "json export"
        );
        Ok(batch.len())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl ExportFormat {
    pub const ALL: [Self; 2] = [Self::Csv, Self::Json];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    pub const fn extension(self) -> &'static str {
        self.as_str()
    }

    pub fn exporter<'w, W: Write + 'w>(self, writer: W) -> Box<dyn Exporter + 'w> {
        match self {
            Self::Csv => Box::new(CsvExporter::new(writer)),
            Self::Json => Box::new(JsonExporter::new(writer)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ExportBatch, ExportError, ExportFormat, ExportScope, Exporter, JsonExporter};
    use crate::test_support::customer;
    use crate::CsvExporter;
    use fieldops_app::{Customer, CustomerStatus, EntityKind};
    use std::io::Write;

    fn batch() -> ExportBatch {
        let records = vec![
            customer("CUS-0001", "Avery Walker", CustomerStatus::Vip, &["VIP", "Priority"]),
            customer("CUS-0002", "Jordan, Hill", CustomerStatus::Lead, &[]),
        ];
        ExportBatch::from_records(ExportScope::Filtered, records.iter())
    }

    #[test]
    fn batch_carries_entity_headers() {
        let batch = batch();
        assert_eq!(batch.entity, EntityKind::Customers);
        assert_eq!(batch.headers[0], "id");
        assert_eq!(batch.rows[0][6], "vip");
        assert_eq!(batch.rows[0][7], "VIP; Priority");
    }

    #[test]
    fn csv_quotes_cells_with_commas() {
        let mut out = Vec::new();
        let written = CsvExporter::new(&mut out).export(&batch()).expect("export");
        assert_eq!(written, 2);
        let text = String::from_utf8(out).expect("utf8");
        let mut lines = text.lines();
        assert!(lines.next().is_some_and(|line| line.starts_with("id,name,email")));
        assert!(lines.next().is_some_and(|line| line.starts_with("CUS-0001,Avery Walker,")));
        assert!(lines.next().is_some_and(|line| line.starts_with("CUS-0002,\"Jordan, Hill\",")));
    }

    #[test]
    fn json_writes_one_object_per_row() {
        let mut out = Vec::new();
        JsonExporter::new(&mut out).export(&batch()).expect("export");
        let value: serde_json::Value = serde_json::from_slice(&out).expect("valid json");
        let rows = value.as_array().expect("array");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1]["name"], "Jordan, Hill");
        assert_eq!(rows[0]["customer_since"], "2025-03-04");
    }

    #[test]
    fn json_keys_follow_header_order() {
        let batch = batch();
        let mut out = Vec::new();
        JsonExporter::new(&mut out).export(&batch).expect("export");
        let value: serde_json::Value = serde_json::from_slice(&out).expect("valid json");
        let first = value[0].as_object().expect("object");
        let keys = first.keys().map(String::as_str).collect::<Vec<_>>();
        assert_eq!(keys, batch.headers.iter().map(String::as_str).collect::<Vec<_>>());
    }

    #[test]
    fn write_failures_say_how_to_recover() {
        struct Closed;
        impl Write for Closed {
            fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("pipe closed"))
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        for format in ExportFormat::ALL {
            let error = format.exporter(Closed).export(&batch()).expect_err("closed writer");
            assert!(error.to_string().contains(" -- "), "{format:?}: {error}");
        }
    }

    #[test]
    fn empty_batch_is_refused() {
        let batch = ExportBatch::from_records::<Customer, _>(ExportScope::Selection, []);
        let mut out = Vec::new();
        let error = ExportFormat::Json
            .exporter(&mut out)
            .export(&batch)
            .expect_err("empty batch");
        assert!(matches!(error, ExportError::Empty));
        assert!(out.is_empty());
    }

    #[test]
    fn format_parse_round_trips_known_names() {
        for format in ExportFormat::ALL {
            assert_eq!(ExportFormat::parse(format.as_str()), Some(format));
        }
        assert_eq!(ExportFormat::parse("xlsx"), None);
    }
}
