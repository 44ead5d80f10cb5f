use anyhow::Context;
use chrono::{DateTime, SecondsFormat, Utc};
use clap::{Args, ValueEnum};
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Cell, Color, ContentArrangement, Table};
use loglens_sdk::{QueryClient, QueryRequest, QueryResponse};

use crate::tui::components::query::results::cell_text;

#[derive(Args)]
pub struct QueryArgs {
    /// SQL text to execute
    sql: String,

    /// Range start: RFC3339, or a duration before now (e.g. "10m", "2h")
    #[arg(long, default_value = "10m")]
    from: String,

    /// Range end: RFC3339, or "now"
    #[arg(long, default_value = "now")]
    to: String,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

impl QueryArgs {
    pub async fn run(self, client: &QueryClient) -> anyhow::Result<()> {
        let now = Utc::now();
        let start = parse_bound(&self.from, now)?;
        let end = parse_bound(&self.to, now)?;

        let request = QueryRequest {
            query: self.sql,
            start_time: start.to_rfc3339_opts(SecondsFormat::Secs, true),
            end_time: end.to_rfc3339_opts(SecondsFormat::Secs, true),
        };
        let response = client.query(&request).await.context("failed to query")?;

        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&response.records)?);
            }
            OutputFormat::Table => {
                println!("{}", render_table(&response));
                eprintln!("{} record(s)", response.records.len());
            }
        }
        Ok(())
    }
}

/// Parse a time bound: "now", a `humantime` duration offset back from now,
/// or an absolute RFC3339 timestamp.
fn parse_bound(text: &str, now: DateTime<Utc>) -> anyhow::Result<DateTime<Utc>> {
    if text == "now" {
        return Ok(now);
    }
    if let Ok(duration) = humantime::parse_duration(text) {
        let delta = chrono::Duration::from_std(duration)?;
        return Ok(now - delta);
    }
    let parsed = DateTime::parse_from_rfc3339(text)
        .with_context(|| format!("'{text}' is neither a duration nor an RFC3339 timestamp"))?;
    Ok(parsed.with_timezone(&Utc))
}

fn render_table(response: &QueryResponse) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(
        response
            .fields
            .iter()
            .map(|f| Cell::new(f).fg(Color::Cyan)),
    );
    for record in &response.records {
        table.add_row(
            response
                .fields
                .iter()
                .map(|f| Cell::new(cell_text(record.get(f)))),
        );
    }
    table
}
