//! Per-key averages of `key,number` records.
//!
//! Run with:
//! ```bash
//! cargo run --bin monoflow-average -- data/records.txt --partitions 4
//! ```

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use monoflow_common::{DEFAULT_APP_NAME, FlowConfig};
use monoflow_core::{AveragePipeline, FlowContext};
use std::path::PathBuf;
use tracing::{Level, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Stage counts followed by `key<TAB>average` lines
    Text,
    /// A JSON object mapping each key to its average
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "monoflow-average", version, about = "Average the numbers of each key")]
struct Args {
    /// Input file, or a directory whose files are all read
    input: PathBuf,

    /// Number of partitions for both the input and the shuffle
    #[arg(long)]
    partitions: Option<usize>,

    /// Worker threads (defaults to the number of CPUs)
    #[arg(long)]
    threads: Option<usize>,

    #[arg(long, default_value = DEFAULT_APP_NAME)]
    app_name: String,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Log task and stage progress
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn flow_config(&self) -> Result<FlowConfig> {
        let mut builder = FlowConfig::builder().app_name(self.app_name.clone());
        if let Some(threads) = self.threads {
            builder = builder.num_threads(threads);
        }
        if let Some(partitions) = self.partitions {
            builder = builder.default_parallelism(partitions);
        }
        builder.build().context("invalid command line settings")
    }
}

/// Run the pipeline for the parsed arguments and render its output.
fn run(args: &Args) -> Result<String> {
    let context = FlowContext::with_config(args.flow_config()?)?;
    info!(input = %args.input.display(), "reading records");

    let report = AveragePipeline::new(&context)
        .run_path(&args.input)
        .with_context(|| format!("failed to average {}", args.input.display()))?;

    let output = match args.format {
        OutputFormat::Text => report.render_text(&args.input),
        OutputFormat::Json => report.to_json()?,
    };
    Ok(output)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let output = run(&args)?;
    print!("{output}");
    if args.format == OutputFormat::Json {
        println!();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::fs;
    use tempfile::tempdir;

    fn args_for(input: &str, extra: &[&str]) -> Args {
        let mut argv = vec!["monoflow-average", input];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    fn args(extra: &[&str]) -> Args {
        args_for("input.txt", extra)
    }

    #[test]
    fn test_flags_map_onto_config() {
        let config = args(&["--threads", "3", "--partitions", "5", "--app-name", "job"])
            .flow_config()
            .unwrap();
        assert_eq!(config.num_threads, 3);
        assert_eq!(config.default_parallelism, 5);
        assert_eq!(config.app_name, "job");

        let defaults = args(&[]).flow_config().unwrap();
        assert_eq!(defaults, FlowConfig::default());
    }

    #[test]
    fn test_zero_partitions_is_rejected() {
        let err = args(&["--partitions", "0"]).flow_config().unwrap_err();
        assert!(format!("{err:#}").contains("default_parallelism must be positive"));
        assert!(args(&["--threads", "0"]).flow_config().is_err());
    }

    #[test]
    fn test_format_flag() {
        assert_eq!(args(&[]).format, OutputFormat::Text);
        assert_eq!(args(&["--format", "json"]).format, OutputFormat::Json);
        assert!(Args::try_parse_from(["monoflow-average", "in", "--format", "xml"]).is_err());
        assert!(Args::try_parse_from(["monoflow-average"]).is_err());
    }

    #[test]
    fn test_run_renders_text_and_json() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("records.txt");
        fs::write(&input, "b,5\na,10\na,20\n").unwrap();
        let input_arg = input.to_str().unwrap();

        let text = run(&args_for(input_arg, &["--threads", "2"])).unwrap();
        assert!(text.contains("records.count(): 3\n"));
        assert!(text.contains("sum_and_freq.count(): 3\n"));
        assert!(text.ends_with("a\t15\nb\t5\n"));

        let json = run(&args_for(input_arg, &["--format", "json"])).unwrap();
        let parsed: BTreeMap<String, f64> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["a"], 15.0);
        assert_eq!(parsed["b"], 5.0);
    }

    #[test]
    fn test_run_fails_on_a_bad_line() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("records.txt");
        fs::write(&input, "a,10\nbad-line\n").unwrap();

        let err = run(&args_for(input.to_str().unwrap(), &[])).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("failed to average"));
        assert!(message.contains("line 2"));
    }
}
