use serde::Serialize;
use tokio::io::{AsyncWriteExt, BufWriter};

use crate::error::AppResult;
use crate::sweep::SweepReport;

/// Top-level JSON document: run parameters plus one entry per sweep.
#[derive(Debug, Serialize)]
pub struct RunDocument<'run> {
    pub endpoint: &'run str,
    pub model: &'run str,
    pub prompt: &'run str,
    pub trials_per_level: usize,
    pub sweeps: &'run [SweepReport],
}

/// # Errors
///
/// Returns an error when serialization fails.
pub fn render_json(document: &RunDocument<'_>) -> AppResult<String> {
    Ok(serde_json::to_string_pretty(document)?)
}

/// Writes `document` as pretty JSON to `path`, replacing any existing file.
///
/// # Errors
///
/// Returns an error when the file cannot be written or serialization fails.
pub async fn export_json(path: &str, document: &RunDocument<'_>) -> AppResult<()> {
    let json = serde_json::to_vec_pretty(document)?;
    let file = tokio::fs::File::create(path).await?;
    let mut writer = BufWriter::new(file);
    writer.write_all(&json).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;
    Ok(())
}
