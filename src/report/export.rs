// file: src/report/export.rs
// description: writes report document, csv export and delivery manifest to disk
// reference: hand-off to an external delivery channel

use crate::error::{PipelineError, Result};
use crate::jobs::ReportSettings;
use crate::models::{GroupedReport, ReportRow};
use crate::report::renderer::{header, render_html, row_values, rows};
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use uuid::Uuid;

pub const HTML_FILE: &str = "report.html";
pub const CSV_FILE: &str = "report.csv";
pub const MANIFEST_FILE: &str = "delivery.json";

/// What the delivery channel needs to send a report.
#[derive(Debug, Clone, Serialize)]
pub struct DeliveryManifest {
    pub job_id: String,
    pub run_id: Uuid,
    pub subject: String,
    pub recipients: Vec<String>,
    pub html: String,
    pub attachments: Vec<String>,
    pub result_count: usize,
    pub generated_at: String,
}

pub fn full_subject(subject: &str, date: NaiveDate) -> String {
    format!("{} - DOU de {}", subject, date.format("%d/%m/%Y"))
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn csv_line(values: &[&str]) -> String {
    let fields: Vec<String> = values.iter().map(|v| csv_field(v)).collect();
    format!("{}\r\n", fields.join(","))
}

/// Tabular export; the group column is present only when `grouped`.
pub fn to_csv(rows: &[ReportRow], grouped: bool) -> String {
    let mut out = csv_line(&header(grouped));
    for row in rows {
        out.push_str(&csv_line(&row_values(row, grouped)));
    }
    out
}

#[derive(Debug, Clone)]
pub struct ReportWriter {
    output_dir: PathBuf,
}

impl ReportWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self> {
        let output_dir = output_dir.into();
        fs::create_dir_all(&output_dir).map_err(|source| PipelineError::FileOperation {
            path: output_dir.clone(),
            source,
        })?;
        Ok(Self { output_dir })
    }

    fn write_file(path: &Path, content: &str) -> Result<()> {
        fs::write(path, content).map_err(|source| PipelineError::FileOperation {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn write(
        &self,
        job_id: &str,
        run_id: Uuid,
        settings: &ReportSettings,
        report: &GroupedReport,
        date: NaiveDate,
    ) -> Result<DeliveryManifest> {
        let job_dir = self.output_dir.join(job_id);
        fs::create_dir_all(&job_dir).map_err(|source| PipelineError::FileOperation {
            path: job_dir.clone(),
            source,
        })?;

        let html_path = job_dir.join(HTML_FILE);
        Self::write_file(&html_path, &render_html(report))?;

        let mut attachments = Vec::new();
        if settings.attach_csv {
            let csv_path = job_dir.join(CSV_FILE);
            Self::write_file(&csv_path, &to_csv(&rows(report), report.is_grouped()))?;
            attachments.push(csv_path.display().to_string());
        }

        let manifest = DeliveryManifest {
            job_id: job_id.to_string(),
            run_id,
            subject: full_subject(&settings.subject, date),
            recipients: settings.emails.clone(),
            html: html_path.display().to_string(),
            attachments,
            result_count: report.result_count(),
            generated_at: Utc::now().to_rfc3339(),
        };

        let manifest_path = job_dir.join(MANIFEST_FILE);
        Self::write_file(&manifest_path, &serde_json::to_string_pretty(&manifest)?)?;
        info!("Report for {} written to {}", job_id, job_dir.display());

        Ok(manifest)
    }
}
