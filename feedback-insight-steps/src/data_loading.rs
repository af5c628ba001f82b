use {
    std::{fs::{self, File}, io::BufReader, path::Path},
    anyhow::{anyhow, bail, Context, Result},
    csv::StringRecord,
    indicatif::ProgressBar,
    tracing::info,
    feedback_insight_core::FeedbackBatch,
};

pub const FEEDBACK_COLUMN_HINTS: &[&str] = &["feedback", "review", "comment", "text", "message", "response"];

pub fn load_feedback_file(path: &Path, column: Option<&str>) -> Result<FeedbackBatch> {
    info!("loading file: {}", path.display());

    let extension = path.extension()
        .and_then(|v| v.to_str())
        .map(|v| v.to_lowercase())
        .unwrap_or_default();

    let batch = match extension.as_str() {
        "csv" => load_csv_file(path, column)?,
        "txt" => load_text_file(path)?,
        "json" => load_json_file(path)?,
        other => bail!("unsupported file format: \"{}\" ({})", other, path.display()),
    };

    info!("loaded {} feedback records ({} skipped) from {}", batch.len(), batch.skipped(), path.display());
    Ok(batch)
}

fn load_csv_file(path: &Path, column: Option<&str>) -> Result<FeedbackBatch> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let pb = ProgressBar::new(file.metadata().map(|v| v.len()).unwrap_or(0));

    let mut reader = csv::Reader::from_reader(BufReader::new(file));
    let headers = reader.headers()?.clone();

    let mut records = Vec::new();
    let mut record = StringRecord::new();
    while reader.read_record(&mut record).with_context(|| format!("failed to read csv rows from {}", path.display()))? {
        records.push(record.clone());
        pb.set_position(reader.position().byte());
    }

    pb.finish_and_clear();

    let column_index = match column {
        Some(name) => headers.iter()
            .position(|header| header.trim().eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| anyhow!("column \"{}\" not found in {}", name, path.display()))?,
        None => detect_feedback_column(&headers, &records)
            .ok_or_else(|| anyhow!("could not identify feedback column in {}", path.display()))?,
    };
    info!("using column \"{}\" as feedback text", &headers[column_index]);

    // an empty cell is a missing value, a blank one is still a record
    let entries = records.iter()
        .map(|record| record.get(column_index)
            .filter(|v| !v.is_empty())
            .map(|v| v.to_owned()));

    Ok(FeedbackBatch::from_entries(entries))
}

/// First header mentioning feedback-like content, else the first column holding text that is
/// not a number.
pub fn detect_feedback_column(headers: &StringRecord, records: &[StringRecord]) -> Option<usize> {
    let by_name = headers.iter().position(|header| {
        let header = header.to_lowercase();
        FEEDBACK_COLUMN_HINTS.iter().any(|hint| header.contains(hint))
    });

    by_name.or_else(|| (0..headers.len()).find(|index| is_text_column(records, *index)))
}

fn is_text_column(records: &[StringRecord], index: usize) -> bool {
    records.iter()
        .filter_map(|record| record.get(index))
        .map(str::trim)
        .any(|value| !value.is_empty() && value.parse::<f64>().is_err())
}

fn load_text_file(path: &Path) -> Result<FeedbackBatch> {
    let content = fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;

    Ok(FeedbackBatch::from_texts(content.lines().map(str::trim).filter(|line| !line.is_empty())))
}

fn load_json_file(path: &Path) -> Result<FeedbackBatch> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("failed to parse json in {}", path.display()))?;

    Ok(FeedbackBatch::from_json(&value)?)
}
