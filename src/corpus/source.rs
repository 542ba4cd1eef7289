//! Reading the sentence table from a local file or a URL.

use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};

use super::links::{decode_links_text, decode_links_value, parse_index, value_to_id, value_to_index};
use super::{Corpus, SentenceRow};
use crate::error::{AppError, Result};

/// Where the sentence table lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    File(PathBuf),
    Url(String),
}

/// Layout of the sentence table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    Json,
    JsonLines,
}

impl DataSource {
    pub fn parse(location: &str) -> Self {
        let location = location.trim();
        if location.starts_with("http://") || location.starts_with("https://") {
            DataSource::Url(location.to_string())
        } else {
            DataSource::File(PathBuf::from(location))
        }
    }

    /// Format from the file extension; remote spreadsheet exports default to CSV
    pub fn format(&self) -> SourceFormat {
        let extension = match self {
            DataSource::File(path) => path
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("")
                .to_lowercase(),
            DataSource::Url(url) => {
                let path = url.split(['?', '#']).next().unwrap_or("");
                Path::new(path)
                    .extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or("")
                    .to_lowercase()
            }
        };

        match extension.as_str() {
            "json" => SourceFormat::Json,
            "jsonl" | "ndjson" => SourceFormat::JsonLines,
            _ => SourceFormat::Csv,
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::File(path) => write!(f, "{}", path.display()),
            DataSource::Url(url) => write!(f, "{}", url),
        }
    }
}

/// Load and decode the whole corpus
pub async fn load(source: &DataSource) -> Result<Corpus> {
    let name = source.to_string();
    let text = fetch_text(source).await?;
    let (rows, dropped) = parse_rows(&text, source.format(), &name)?;

    if dropped > 0 {
        tracing::warn!("Dropped {} malformed link entries from {}", dropped, name);
    }

    let corpus = Corpus::from_rows(rows, &name)?.with_dropped_links(dropped);
    tracing::info!("Loaded {} documents from {}", corpus.len(), name);
    Ok(corpus)
}

async fn fetch_text(source: &DataSource) -> Result<String> {
    let name = source.to_string();
    match source {
        DataSource::File(path) => tokio::fs::read_to_string(path)
            .await
            .map_err(|e| AppError::data_load(name, e)),
        DataSource::Url(url) => {
            let response = reqwest::get(url)
                .await
                .and_then(|r| r.error_for_status())
                .map_err(|e| AppError::data_load(&name, e))?;
            response
                .text()
                .await
                .map_err(|e| AppError::data_load(name, e))
        }
    }
}

/// Parse the raw table into rows. Returns the rows and the number of dropped link entries.
pub fn parse_rows(text: &str, format: SourceFormat, name: &str) -> Result<(Vec<SentenceRow>, usize)> {
    match format {
        SourceFormat::Csv => parse_csv(text, name),
        SourceFormat::Json => {
            let rows: Vec<JsonRow> =
                serde_json::from_str(text).map_err(|e| AppError::data_load(name, e))?;
            convert_json_rows(rows, name)
        }
        SourceFormat::JsonLines => {
            let rows = text
                .lines()
                .enumerate()
                .filter(|(_, line)| !line.trim().is_empty())
                .map(|(i, line)| {
                    serde_json::from_str::<JsonRow>(line)
                        .map_err(|e| AppError::data_load(name, format!("line {}: {}", i + 1, e)))
                })
                .collect::<Result<Vec<_>>>()?;
            convert_json_rows(rows, name)
        }
    }
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(alias = "doc_id")]
    document_id: String,
    #[serde(default)]
    title: String,
    #[serde(alias = "sent_id")]
    sentence_id: String,
    #[serde(alias = "sent", default)]
    text: String,
    #[serde(default)]
    links: String,
}

fn parse_csv(text: &str, name: &str) -> Result<(Vec<SentenceRow>, usize)> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    let mut dropped = 0;

    for (i, record) in reader.deserialize::<CsvRow>().enumerate() {
        // header is line 1
        let line = i + 2;
        let record = record.map_err(|e| AppError::data_load(name, e))?;

        let document_id = record.document_id.trim();
        if document_id.is_empty() {
            return Err(AppError::data_load(name, format!("line {}: empty document id", line)));
        }
        let sentence_id = parse_index(&record.sentence_id).ok_or_else(|| {
            AppError::data_load(
                name,
                format!("line {}: invalid sentence id '{}'", line, record.sentence_id),
            )
        })?;

        let decoded = decode_links_text(&record.links);
        dropped += decoded.dropped;

        rows.push(SentenceRow {
            document_id: document_id.to_string(),
            title: record.title,
            sentence_id,
            text: record.text,
            links: decoded.links,
        });
    }

    Ok((rows, dropped))
}

#[derive(Debug, Deserialize)]
struct JsonRow {
    #[serde(alias = "doc_id")]
    document_id: Value,
    #[serde(default)]
    title: Option<String>,
    #[serde(alias = "sent_id")]
    sentence_id: Value,
    #[serde(alias = "sent", default)]
    text: Option<String>,
    #[serde(default)]
    links: Value,
}

fn convert_json_rows(rows: Vec<JsonRow>, name: &str) -> Result<(Vec<SentenceRow>, usize)> {
    let mut converted = Vec::with_capacity(rows.len());
    let mut dropped = 0;

    for (i, row) in rows.into_iter().enumerate() {
        let document_id = value_to_id(&row.document_id).ok_or_else(|| {
            AppError::data_load(name, format!("row {}: invalid document id", i))
        })?;
        let sentence_id = value_to_index(&row.sentence_id).ok_or_else(|| {
            AppError::data_load(name, format!("row {}: invalid sentence id", i))
        })?;

        let decoded = decode_links_value(&row.links);
        dropped += decoded.dropped;

        converted.push(SentenceRow {
            document_id,
            title: row.title.unwrap_or_default(),
            sentence_id,
            text: row.text.unwrap_or_default(),
            links: decoded.links,
        });
    }

    Ok((converted, dropped))
}
