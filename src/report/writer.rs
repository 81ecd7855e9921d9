//! Result output: terminal table, CSV and JSON.

use crate::markov::MarkovModel;
use crate::models::{LinkoscopeError, Result, ResultMatrix};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Output file format, chosen from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Json,
}

impl OutputFormat {
    /// `.csv` → CSV, anything else → JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Self::Csv,
            _ => Self::Json,
        }
    }
}

/// Render results as an aligned text table.
pub fn render_table(results: &ResultMatrix) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:>6}  {:>14}  {:>14}\n", "size", "mean entropy", "std entropy"));
    for row in results.rows() {
        out.push_str(&format!(
            "{:>6}  {:>14.6}  {:>14.6}\n",
            row.size, row.mean, row.std
        ));
    }
    out
}

/// Write results as CSV.
pub fn write_csv<W: Write>(w: &mut W, results: &ResultMatrix) -> std::io::Result<()> {
    writeln!(w, "size,mean_entropy,std_entropy")?;
    for row in results.rows() {
        writeln!(w, "{},{:.6},{:.6}", row.size, row.mean, row.std)?;
    }
    Ok(())
}

/// Write results as a pretty JSON array of `{size, mean, std}`.
pub fn write_json<W: Write>(w: &mut W, results: &ResultMatrix) -> Result<()> {
    serde_json::to_writer_pretty(&mut *w, &results.rows())
        .map_err(|e| LinkoscopeError::Internal(format!("Serializing results: {e}")))?;
    writeln!(w).map_err(|e| LinkoscopeError::io("writing results", e))
}

/// Write results to `path` in the format implied by its extension.
pub fn write_results(path: &Path, results: &ResultMatrix) -> Result<()> {
    let file = File::create(path).map_err(|e| LinkoscopeError::io("creating results file", e))?;
    let mut writer = BufWriter::new(file);

    let format = OutputFormat::from_path(path);
    match format {
        OutputFormat::Csv => {
            write_csv(&mut writer, results).map_err(|e| LinkoscopeError::io("writing results", e))?
        }
        OutputFormat::Json => write_json(&mut writer, results)?,
    }

    writer
        .flush()
        .map_err(|e| LinkoscopeError::io("flushing results", e))?;

    info!(path = %path.display(), ?format, rows = results.rows().len(), "Results written");
    Ok(())
}

/// Render a model's transition matrix with class labels.
pub fn render_transitions(model: &MarkovModel) -> String {
    let classes = model.classes();
    let width = classes.iter().map(|c| c.len()).max().unwrap_or(0).max(6);

    let mut out = format!("{:width$}", "");
    for class in classes {
        out.push_str(&format!("  {class:>width$}"));
    }
    out.push('\n');

    for (class, row) in classes.iter().zip(model.transitions().rows()) {
        out.push_str(&format!("{class:width$}"));
        for p in row.iter() {
            out.push_str(&format!("  {p:>width$.4}"));
        }
        out.push('\n');
    }
    out
}
