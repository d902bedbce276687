// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use fieldops_app::{EntityKind, FormPayload};
use fieldops_table::{ExportBatch, ExportError, ExportFormat};
use fieldops_testkit::{FieldFaker, SeedCounts};
use fieldops_tui::EntityRecords;
use std::fs::{self, File, OpenOptions};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use time::{Date, OffsetDateTime};
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Serves seeded mock data to the terminal UI and writes exports to disk.
pub struct SeedRuntime {
    faker: FieldFaker,
    counts: SeedCounts,
    page_size: usize,
    export_format: ExportFormat,
    export_dir: PathBuf,
}

impl SeedRuntime {
    pub fn new(
        seed: u64,
        counts: SeedCounts,
        page_size: usize,
        export_format: ExportFormat,
        export_dir: PathBuf,
    ) -> Self {
        Self {
            faker: FieldFaker::new(seed),
            counts,
            page_size,
            export_format,
            export_dir,
        }
    }

    fn export_path(&self, batch: &ExportBatch) -> PathBuf {
        self.export_dir.join(format!(
            "{}-{}.{}",
            batch.entity.as_str(),
            batch.scope.as_str(),
            self.export_format.extension()
        ))
    }
}

impl fieldops_tui::AppRuntime for SeedRuntime {
    fn load_records(&mut self) -> Result<EntityRecords> {
        let data = self.faker.dataset(self.counts);
        info!(
            seed = self.faker.seed(),
            customers = data.customers.len(),
            work_orders = data.work_orders.len(),
            invoices = data.invoices.len(),
            "seed data loaded"
        );
        Ok(EntityRecords {
            customers: data.customers,
            work_orders: data.work_orders,
            invoices: data.invoices,
        })
    }

    fn page_size(&self) -> usize {
        self.page_size
    }

    fn today(&self) -> Date {
        OffsetDateTime::now_utc().date()
    }

    fn draft_form(&mut self, entity: EntityKind) -> Result<FormPayload> {
        let payload = self.faker.form_draft(entity);
        payload.validate()?;
        Ok(payload)
    }

    fn export(&mut self, batch: &ExportBatch) -> Result<String> {
        if batch.is_empty() {
            return Err(ExportError::Empty.into());
        }
        fs::create_dir_all(&self.export_dir)
            .with_context(|| format!("create export directory {}", self.export_dir.display()))?;
        let path = self.export_path(batch);
        let file = File::create(&path)
            .with_context(|| format!("create export file {}", path.display()))?;
        let rows = self
            .export_format
            .exporter(BufWriter::new(file))
            .export(batch)
            .with_context(|| format!("export {} to {}", batch.entity.as_str(), path.display()))?;
        info!(rows, path = %path.display(), "export written");
        Ok(path.display().to_string())
    }
}

/// Installs a file-backed subscriber. `RUST_LOG` wins over `level`. The
/// terminal UI owns stdout, so nothing is written there.
pub fn init_logging(level: &str, file: &Path) -> Result<()> {
    if let Some(parent) = file.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("create log directory {}", parent.display()))?;
    }
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(file)
        .with_context(|| {
            format!(
                "open log file {} -- set [log].file to a writable path",
                file.display()
            )
        })?;

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level)
            .with_context(|| format!("invalid [log].level directive {level:?}"))?,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(Mutex::new(log_file)),
        )
        .try_init()
        .context("install log subscriber")?;
    Ok(())
}
