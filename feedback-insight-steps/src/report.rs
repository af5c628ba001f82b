use {
    std::{fmt::Write as _, fs, path::Path},
    anyhow::{Context, Result},
    chrono::{DateTime, Local},
    serde::Serialize,
    tracing::info,
    feedback_insight_core::{
        keywords::{KeywordCounting, KeywordEntry},
        sentiment::{BatchSentiment, SentimentBreakdown, SentimentLabel},
        summary::SummaryReport,
        topics::{TopicFrequency, TopicReport},
        AnalysisResult,
        EngineOutput,
    },
};

#[derive(Serialize)]
struct ExportedReport<'a> {
    generated_at: String,
    #[serde(flatten)]
    output: &'a EngineOutput,
}

/// Renders a result as text. `counting` is the mode the keyword counts were produced with.
pub fn render_report(output: &EngineOutput, counting: KeywordCounting) -> String {
    let mut report = String::new();

    match &output.result {
        AnalysisResult::Sentiment(sentiment) => render_sentiment(&mut report, sentiment),
        AnalysisResult::Keywords(keywords) => render_keywords(&mut report, keywords, counting),
        AnalysisResult::Topics(topics) => render_topics(&mut report, topics),
        AnalysisResult::Summary(summary) => render_summary(&mut report, summary, counting),
    }

    if output.skipped_records > 0 {
        let _ = writeln!(report, "\nSkipped entries without text: {}", output.skipped_records);
    }

    report
}

fn render_sentiment(report: &mut String, sentiment: &BatchSentiment) {
    let breakdown = &sentiment.breakdown;

    let _ = writeln!(report, "=== SENTIMENT ANALYSIS RESULTS ===\n");
    let _ = writeln!(report, "Total feedback analyzed: {}", breakdown.total);
    render_breakdown(report, breakdown);
    let _ = writeln!(report, "\nOverall Sentiment: {}", breakdown.overall);
}

fn render_breakdown(report: &mut String, breakdown: &SentimentBreakdown) {
    for label in SentimentLabel::PRIORITY {
        let _ = writeln!(
            report,
            "{} feedback: {} ({:.1}%)",
            label_title(label),
            breakdown.count(label),
            breakdown.percentage(label),
        );
    }
}

fn render_keywords(report: &mut String, keywords: &[KeywordEntry], counting: KeywordCounting) {
    let _ = writeln!(report, "=== KEYWORD ANALYSIS RESULTS ===\n");
    let _ = writeln!(report, "Top {} Keywords:", keywords.len());
    let _ = writeln!(report, "{}", "-".repeat(30));

    for entry in keywords {
        let _ = writeln!(report, "{}: {}", entry.term, keyword_count(entry, counting));
    }
}

fn render_topics(report: &mut String, topics: &TopicReport) {
    let _ = writeln!(report, "=== TOPIC ANALYSIS RESULTS ===\n");
    let _ = writeln!(report, "Topics Mentioned:");
    let _ = writeln!(report, "{}", "-".repeat(30));
    render_topic_frequencies(report, &topics.frequencies);
}

fn render_topic_frequencies(report: &mut String, frequencies: &[TopicFrequency]) {
    for frequency in frequencies.iter().filter(|frequency| frequency.count > 0) {
        let _ = writeln!(report, "{}: {} mentions ({:.1}%)", frequency.topic, frequency.count, frequency.percentage);
    }
}

fn render_summary(report: &mut String, summary: &SummaryReport, counting: KeywordCounting) {
    let _ = writeln!(report, "=== FEEDBACK SUMMARY ===\n");
    let _ = writeln!(report, "Total feedback entries: {}", summary.record_count());
    let _ = writeln!(report, "Average words per entry: {:.1}", summary.mean_tokens_per_record());
    let _ = writeln!(
        report,
        "Average feedback length: {:.1} characters (median {}, longest {})",
        summary.length().mean_chars,
        summary.length().median_chars,
        summary.length().max_chars,
    );

    let _ = writeln!(report, "\nMost common themes:");
    for entry in summary.top_keywords() {
        let _ = writeln!(report, "- {} ({})", entry.term, keyword_count(entry, counting));
    }

    let _ = writeln!(report, "\nTopics:");
    render_topic_frequencies(report, summary.topic_frequencies());

    let _ = writeln!(report, "\nQuick Sentiment Overview:");
    render_breakdown(report, summary.sentiment());
    let _ = writeln!(report, "Overall Sentiment: {}", summary.sentiment().overall);
}

fn keyword_count(entry: &KeywordEntry, counting: KeywordCounting) -> String {
    match counting {
        KeywordCounting::Records => format!("mentioned in {} records", entry.count),
        KeywordCounting::Occurrences => format!("mentioned {} times", entry.count),
    }
}

fn label_title(label: SentimentLabel) -> &'static str {
    match label {
        SentimentLabel::Positive => "Positive",
        SentimentLabel::Negative => "Negative",
        SentimentLabel::Neutral => "Neutral",
    }
}

pub fn export_report(output: &EngineOutput, counting: KeywordCounting, path: &Path) -> Result<()> {
    export_report_at(output, counting, path, Local::now())
}

fn export_report_at(output: &EngineOutput, counting: KeywordCounting, path: &Path, generated_at: DateTime<Local>) -> Result<()> {
    let is_json = path.extension()
        .and_then(|v| v.to_str())
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let content = if is_json {
        let exported = ExportedReport {
            generated_at: generated_at.to_rfc3339(),
            output,
        };
        serde_json::to_string_pretty(&exported)?
    } else {
        format!("Generated at: {}\n\n{}", generated_at.format("%Y-%m-%d %H:%M:%S"), render_report(output, counting))
    };

    fs::write(path, content).with_context(|| format!("failed to export results to {}", path.display()))?;
    info!("results exported to {}", path.display());

    Ok(())
}
