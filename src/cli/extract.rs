//! CLI entry-point for streaming extraction over sentence records.

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Args as ClapArgs;
use futures::stream::{self, StreamExt};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, BufWriter};
use tracing::{info, instrument, warn};
use walkdir::WalkDir;

use crate::{
    config::Settings,
    data::dictionaries::Dictionaries,
    nlp::{mention::OutputRecord, Pipeline},
};

const INPUT_EXTENSIONS: &[&str] = &["tsv", "txt"];
const LINES_PER_WORKER: usize = 64;

/// Args for the `extract` sub-command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Record files or directories of them; stdin when omitted.
    pub inputs: Vec<PathBuf>,
    /// Dictionary directory, overriding `GENESUP_DICT_DIR`.
    #[arg(long)]
    pub dicts: Option<PathBuf>,
    /// Write JSON lines here instead of stdout.
    #[arg(long, short)]
    pub output: Option<PathBuf>,
    /// Records processed concurrently, overriding `GENESUP_WORKERS`.
    #[arg(long)]
    pub workers: Option<usize>,
}

/// Counters reported when a run finishes.
#[derive(Debug, Default, Clone, Copy)]
struct RunStats {
    records: usize,
    skipped: usize,
    emitted: usize,
}

type Sink = BufWriter<Box<dyn AsyncWrite + Unpin + Send>>;

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let dict_dir = args.dicts.clone().unwrap_or_else(|| settings.dict_dir.clone());
    let dicts = Dictionaries::load(&dict_dir)
        .with_context(|| format!("loading dictionaries from {}", dict_dir.display()))?;
    let pipeline = Arc::new(Pipeline::new(Arc::new(dicts)));
    let workers = args.workers.unwrap_or(settings.workers).max(1);

    let writer: Box<dyn AsyncWrite + Unpin + Send> = match &args.output {
        Some(path) => Box::new(
            tokio::fs::File::create(path)
                .await
                .with_context(|| format!("create {}", path.display()))?,
        ),
        None => Box::new(tokio::io::stdout()),
    };
    let mut sink = BufWriter::new(writer);
    let mut stats = RunStats::default();

    let sources = collect_inputs(&args.inputs)?;
    if sources.is_empty() {
        let reader = BufReader::new(tokio::io::stdin());
        process_reader(reader, "<stdin>", &pipeline, workers, &mut sink, &mut stats).await?;
    } else {
        for path in &sources {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("open {}", path.display()))?;
            let name = path.display().to_string();
            process_reader(BufReader::new(file), &name, &pipeline, workers, &mut sink, &mut stats)
                .await?;
        }
    }
    sink.flush().await?;

    info!(
        records = stats.records,
        skipped = stats.skipped,
        emitted = stats.emitted,
        "extraction finished"
    );
    Ok(())
}

/// Expand directories into the record files beneath them, sorted by path.
fn collect_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if !input.is_dir() {
            files.push(input.clone());
            continue;
        }
        let mut found = Vec::new();
        for entry in WalkDir::new(input) {
            let entry = entry.with_context(|| format!("walk {}", input.display()))?;
            let path = entry.path();
            let wanted = entry.file_type().is_file()
                && path
                    .extension()
                    .and_then(|s| s.to_str())
                    .is_some_and(|ext| INPUT_EXTENSIONS.contains(&ext));
            if wanted {
                found.push(path.to_path_buf());
            }
        }
        found.sort();
        files.extend(found);
    }
    Ok(files)
}

async fn process_reader<R>(
    reader: R,
    source: &str,
    pipeline: &Arc<Pipeline>,
    workers: usize,
    sink: &mut Sink,
    stats: &mut RunStats,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut line_no = 0usize;
    let mut batch = Vec::with_capacity(workers * LINES_PER_WORKER);
    loop {
        let next = lines
            .next_line()
            .await
            .with_context(|| format!("read {source}"))?;
        let done = next.is_none();
        if let Some(line) = next {
            line_no += 1;
            if !line.trim().is_empty() {
                batch.push((line_no, line));
            }
        }
        if batch.len() >= workers * LINES_PER_WORKER || (done && !batch.is_empty()) {
            let results = process_batch(std::mem::take(&mut batch), pipeline, workers).await?;
            write_results(results, source, sink, stats).await?;
        }
        if done {
            return Ok(());
        }
    }
}

type LineResult = (usize, crate::Result<Vec<OutputRecord>>);

/// Results come back in input order whatever the worker count.
async fn process_batch(
    batch: Vec<(usize, String)>,
    pipeline: &Arc<Pipeline>,
    workers: usize,
) -> Result<Vec<LineResult>> {
    if workers == 1 {
        return Ok(batch
            .into_iter()
            .map(|(line_no, line)| (line_no, pipeline.process_line(&line)))
            .collect());
    }
    let joined = stream::iter(batch)
        .map(|(line_no, line)| {
            let pipeline = Arc::clone(pipeline);
            tokio::task::spawn_blocking(move || (line_no, pipeline.process_line(&line)))
        })
        .buffered(workers)
        .collect::<Vec<_>>()
        .await;
    joined
        .into_iter()
        .map(|res| res.context("extraction worker panicked"))
        .collect()
}

async fn write_results(
    results: Vec<LineResult>,
    source: &str,
    sink: &mut Sink,
    stats: &mut RunStats,
) -> Result<()> {
    for (line_no, result) in results {
        stats.records += 1;
        match result {
            Ok(records) => {
                for record in &records {
                    let mut line = record.to_line()?;
                    line.push('\n');
                    sink.write_all(line.as_bytes()).await?;
                }
                stats.emitted += records.len();
            }
            Err(err) => {
                stats.skipped += 1;
                warn!(source, line = line_no, error = %err, "skipping record");
            }
        }
    }
    Ok(())
}
