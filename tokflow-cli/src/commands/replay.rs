//! Replay command implementation

use crate::config::CliConfig;
use crate::error::CliError;
use crate::input::{read_trace, resolve_patterns};
use crate::output::{JsonFormatter, MarkdownFormatter, OutputFormatter, TextFormatter};
use crate::progress::ProgressReporter;
use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use rayon::prelude::*;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tokflow_api::{Config, Pipeline, ScriptedModel, VocabDecoder};
use tokflow_core::{BoxError, StreamStats, TextSink, Transcript};

/// Arguments for the replay command
#[derive(Debug, Args)]
pub struct ReplayArgs {
    /// Trace files or patterns (supports glob)
    #[arg(short, long, value_name = "FILE/PATTERN", required = true)]
    pub input: Vec<String>,

    /// Vocabulary JSON mapping token ids to pieces
    #[arg(long, value_name = "FILE", required = true)]
    pub vocab: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (default: taken from the config file, else text)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Force a flush once this many tokens are buffered
    #[arg(long, value_name = "N")]
    pub max_pending: Option<usize>,

    /// Replace the soft punctuation set, e.g. ",!?"
    #[arg(long, value_name = "CHARS")]
    pub punctuation: Option<String>,

    /// Cap on prompt plus generated tokens
    #[arg(long, value_name = "N")]
    pub max_length: Option<usize>,

    /// Replay files concurrently; output keeps the file order
    #[arg(short, long)]
    pub parallel: bool,

    /// Suppress progress and log output
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Deltas written as they arrive
    Text,
    /// JSON array of per-file chunk lists and counters
    Json,
    /// Markdown section per file
    Markdown,
}

impl ReplayArgs {
    /// Execute the replay command
    pub fn execute(&self) -> Result<()> {
        self.init_logging()?;

        log::info!("Starting trace replay");
        log::debug!("Arguments: {:?}", self);

        let cli_config = CliConfig::load_or_default(self.config.as_deref())?;
        let config = self.pipeline_config(&cli_config)?;
        let format = self.resolve_format(&cli_config)?;

        if !self.vocab.is_file() {
            return Err(CliError::FileNotFound(self.vocab.display().to_string()).into());
        }
        let vocab = VocabDecoder::from_json_file(&self.vocab)
            .with_context(|| format!("Failed to load vocabulary: {}", self.vocab.display()))?;

        let files = resolve_patterns(&self.input)?;
        log::info!(
            "Replaying {} trace files over {} vocabulary pieces",
            files.len(),
            vocab.len()
        );

        let writer: Box<dyn Write + Send> = match &self.output {
            Some(path) => {
                let file = File::create(path)
                    .with_context(|| format!("Failed to create output file: {}", path.display()))?;
                Box::new(BufWriter::new(file))
            }
            None => Box::new(io::stdout()),
        };
        let headers = cli_config.output.file_headers && files.len() > 1;
        let mut formatter: Box<dyn OutputFormatter> = match format {
            OutputFormat::Text => Box::new(TextFormatter::new(writer, headers)),
            OutputFormat::Json => {
                Box::new(JsonFormatter::new(writer, cli_config.output.pretty_json))
            }
            OutputFormat::Markdown => Box::new(MarkdownFormatter::new(writer)),
        };

        let mut progress = ProgressReporter::new(self.quiet);
        progress.init_files(files.len() as u64);

        if self.parallel {
            replay_parallel(&files, &vocab, &config, formatter.as_mut(), &progress)?;
        } else {
            for path in &files {
                replay_streaming(path, &vocab, &config, formatter.as_mut())?;
                progress.file_completed(&path.display().to_string());
            }
        }

        progress.finish();
        formatter.finish()?;
        Ok(())
    }

    /// Config file settings with command-line overrides applied
    fn pipeline_config(&self, cli_config: &CliConfig) -> Result<Config> {
        let mut builder = Config::builder()
            .policy(cli_config.holdback.clone())
            .options(cli_config.generation.clone());
        if let Some(marks) = &self.punctuation {
            builder = builder.soft_punctuation(marks.chars());
        }
        if let Some(limit) = self.max_pending {
            builder = builder.max_pending_tokens(Some(limit));
        }
        if let Some(max_length) = self.max_length {
            builder = builder.max_length(max_length);
        }
        builder
            .build()
            .map_err(|e| CliError::ConfigError(e.to_string()).into())
    }

    fn resolve_format(&self, cli_config: &CliConfig) -> Result<OutputFormat> {
        if let Some(format) = self.format {
            return Ok(format);
        }
        let name = &cli_config.output.default_format;
        OutputFormat::from_str(name, true)
            .map_err(|_| CliError::ConfigError(format!("unknown output format '{name}'")).into())
    }

    /// Initialize logging based on verbosity level
    fn init_logging(&self) -> Result<()> {
        let log_level = match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };

        if !self.quiet {
            let result = env_logger::Builder::from_env(
                env_logger::Env::default().default_filter_or(log_level),
            )
            .try_init();
            if let Err(e) = result {
                log::debug!("logger already initialized: {e}");
            }
        }

        Ok(())
    }
}

/// Forwards buffer notifications straight to a formatter
struct FormatterSink<'a> {
    formatter: &'a mut dyn OutputFormatter,
}

impl TextSink for FormatterSink<'_> {
    fn notify(&mut self, delta: &str, is_final: bool) -> Result<(), BoxError> {
        self.formatter.delta(delta, is_final).map_err(Into::into)
    }
}

fn pipeline_for(
    path: &Path,
    vocab: &VocabDecoder,
    config: &Config,
) -> Result<Pipeline<ScriptedModel<VocabDecoder>>> {
    let batches = read_trace(path)?;
    log::debug!("{}: {} batches", path.display(), batches.len());
    Ok(Pipeline::with_config(
        ScriptedModel::new(vocab.clone(), batches),
        config.clone(),
    ))
}

/// Replay one trace, writing deltas as the buffer releases them
fn replay_streaming(
    path: &Path,
    vocab: &VocabDecoder,
    config: &Config,
    formatter: &mut dyn OutputFormatter,
) -> Result<StreamStats> {
    let pipeline = pipeline_for(path, vocab, config)?;

    formatter.begin_file(path)?;
    let sink = FormatterSink {
        formatter: &mut *formatter,
    };
    let (_, stats) = pipeline
        .generate_into("", config.options(), sink)
        .with_context(|| format!("Failed to replay {}", path.display()))?;
    formatter.end_file(&stats)?;

    Ok(stats)
}

/// Replay every trace on the rayon pool, then format in file order
fn replay_parallel(
    files: &[PathBuf],
    vocab: &VocabDecoder,
    config: &Config,
    formatter: &mut dyn OutputFormatter,
    progress: &ProgressReporter,
) -> Result<()> {
    let results = files
        .par_iter()
        .map(|path| -> Result<(Transcript, StreamStats)> {
            let pipeline = pipeline_for(path, vocab, config)?;
            let result = pipeline
                .generate_into("", config.options(), Transcript::new())
                .with_context(|| format!("Failed to replay {}", path.display()))?;
            progress.file_completed(&path.display().to_string());
            Ok(result)
        })
        .collect::<Result<Vec<_>>>()?;

    for (path, (transcript, stats)) in files.iter().zip(results) {
        formatter.begin_file(path)?;
        for chunk in transcript.into_chunks() {
            formatter.delta(&chunk.text, chunk.is_final)?;
        }
        formatter.end_file(&stats)?;
    }
    Ok(())
}
