//! `query` and `report`: read `aggregated_responses` the way charting
//! consumers do, one (question, year) selection at a time.

use std::{
    fmt::Write as _,
    fs,
    io::Write,
    path::Path,
};

use anyhow::{Context, Result};
use log::{info, warn};

use crate::{
    cli::{OutputFormat, QueryArgs, ReportArgs},
    config::SurveyConfig,
    io_utils,
    storage::{ResponseCount, SurveyStore},
    table::{self, Align},
    topics::{TopicQuery, YearPanel, find_topic, year_panels},
};

const COUNT_HEADERS: [&str; 6] = [
    "surveyed_year",
    "question_index",
    "question_type",
    "question_description",
    "response",
    "response_count",
];

pub fn execute_query(args: &QueryArgs) -> Result<()> {
    let config = SurveyConfig::load_or_default(args.config.as_deref())?;
    let database = args.database.as_ref().unwrap_or(&config.database);
    let store = SurveyStore::open_read_only(database)?;
    let counts = store
        .response_counts(&args.selectors)
        .with_context(|| format!("Querying aggregated responses in {database:?}"))?;
    if counts.is_empty() {
        warn!("No aggregated responses matched the selection");
    }

    match args.format {
        OutputFormat::Table => {
            let rows = counts.iter().map(count_row).collect::<Vec<_>>();
            let headers = COUNT_HEADERS.map(String::from).to_vec();
            table::print_table(
                &headers,
                &rows,
                &[Align::Right, Align::Left, Align::Left, Align::Left, Align::Left, Align::Right],
            );
        }
        OutputFormat::Csv => write_counts_csv(args.output.as_deref(), &counts)?,
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&counts)?;
            match args.output.as_deref() {
                Some(path) if !io_utils::is_dash(path) => fs::write(path, json + "\n")
                    .with_context(|| format!("Writing {path:?}"))?,
                _ => writeln!(std::io::stdout(), "{json}")?,
            }
        }
    }
    info!("Returned {} aggregated row(s)", counts.len());
    Ok(())
}

pub fn execute_report(args: &ReportArgs) -> Result<()> {
    let config = SurveyConfig::load_or_default(args.config.as_deref())?;
    let database = args.database.as_ref().unwrap_or(&config.database);
    let store = SurveyStore::open_read_only(database)?;

    let selected = if args.topics.is_empty() {
        config.topics.iter().collect::<Vec<_>>()
    } else {
        args.topics
            .iter()
            .map(|name| find_topic(&config.topics, name))
            .collect::<Result<Vec<_>, _>>()?
    };

    if let Some(dir) = &args.output_dir {
        fs::create_dir_all(dir).with_context(|| format!("Creating output directory {dir:?}"))?;
    }

    for topic in selected {
        let counts = store
            .response_counts(&topic.selectors)
            .with_context(|| format!("Querying topic '{}'", topic.name))?;
        match &args.output_dir {
            Some(dir) => {
                let path = dir.join(format!("{}.csv", topic.name));
                write_counts_csv(Some(&path), &counts)?;
                info!("Wrote {} row(s) for '{}' to {:?}", counts.len(), topic.name, path);
            }
            None => {
                let panels = year_panels(&counts, topic.shared_axis);
                print!("{}", render_topic(topic, &panels, args.bar_width));
            }
        }
    }
    Ok(())
}

/// Text rendering of one topic: a titled block per year with count bars.
pub fn render_topic(topic: &TopicQuery, panels: &[YearPanel], bar_width: usize) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "== {} ==", topic.title);
    if panels.is_empty() {
        let _ = writeln!(output, "(no responses)");
    }
    for panel in panels {
        let max = panel.bars.iter().map(|(_, count)| *count).max().unwrap_or(0);
        let rows = panel
            .bars
            .iter()
            .map(|(response, count)| {
                vec![
                    response.clone(),
                    count.to_string(),
                    table::bar(*count, max, bar_width),
                ]
            })
            .collect::<Vec<_>>();
        let headers = vec![panel.year.to_string(), "count".to_string(), String::new()];
        let _ = writeln!(output);
        output.push_str(&table::render_aligned(
            &headers,
            &rows,
            &[Align::Left, Align::Right],
        ));
    }
    let _ = writeln!(output);
    output
}

fn count_row(count: &ResponseCount) -> Vec<String> {
    vec![
        count.surveyed_year.to_string(),
        count.question_index.clone(),
        count.question_type.clone(),
        count.question_description.clone(),
        count.response.clone(),
        count.response_count.to_string(),
    ]
}

pub fn write_counts_csv(path: Option<&Path>, counts: &[ResponseCount]) -> Result<()> {
    let mut writer = io_utils::open_csv_writer(path, io_utils::DEFAULT_CSV_DELIMITER)?;
    writer.write_record(COUNT_HEADERS)?;
    for count in counts {
        writer
            .write_record(count_row(count))
            .context("Writing aggregated row")?;
    }
    writer.flush()?;
    Ok(())
}
