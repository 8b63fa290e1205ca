use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::WrapErr;
use sales_serde_bench::bench::{BenchmarkRunner, CountingAllocator};
use sales_serde_bench::codec::CodecKind;
use sales_serde_bench::config::{BenchConfig, OutputFormat};
use sales_serde_bench::dataset::Dataset;
use sales_serde_bench::model::SalesItemContainer;
use tracing_subscriber::EnvFilter;

#[global_allocator]
static GLOBAL: CountingAllocator = CountingAllocator;

/// Compare serialization formats on a sales-records dataset
#[derive(Parser, Debug, Clone)]
#[command(name = "sales-serde-bench", version)]
struct Args {
    /// Print the default configuration as JSON and exit
    #[arg(long, default_value_t = false)]
    print_default_config: bool,

    /// JSON configuration file, overridden by the flags below
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// CSV dataset; the synthetic dataset is used when absent
    #[arg(long, value_name = "PATH")]
    dataset: Option<PathBuf>,

    /// Maximum number of records loaded
    #[arg(long, value_name = "N")]
    rows: Option<usize>,

    /// Seed of the synthetic dataset
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Directory holding the Avro schema documents
    #[arg(long, value_name = "PATH")]
    schema_dir: Option<PathBuf>,

    /// Timed trials per codec, shape and operation
    #[arg(long, value_name = "N")]
    iterations: Option<usize>,

    /// Untimed calls before the trials
    #[arg(long, value_name = "N")]
    warmup_iterations: Option<usize>,

    /// Codec to benchmark; repeat or separate with commas
    #[arg(long = "codec", value_name = "NAME", value_delimiter = ',')]
    codecs: Vec<CodecKind>,

    /// Report rendering on stdout: table or json
    #[arg(long, value_name = "FORMAT")]
    output: Option<OutputFormat>,

    /// Also write the JSON report to this file
    #[arg(long, value_name = "PATH")]
    report_path: Option<PathBuf>,
}

impl Args {
    fn load_config(self) -> color_eyre::Result<BenchConfig> {
        let mut config = match &self.config {
            Some(path) => BenchConfig::from_file(path)
                .wrap_err_with(|| format!("loading configuration from {}", path.display()))?,
            None => BenchConfig::default(),
        };

        if let Some(v) = self.dataset {
            config.dataset = Some(v);
        }
        if let Some(v) = self.rows {
            config.rows = v;
        }
        if let Some(v) = self.seed {
            config.seed = v;
        }
        if let Some(v) = self.schema_dir {
            config.schema_dir = v;
        }
        if let Some(v) = self.iterations {
            config.iterations = v;
        }
        if let Some(v) = self.warmup_iterations {
            config.warmup_iterations = v;
        }
        if !self.codecs.is_empty() {
            config.codecs = self.codecs;
        }
        if let Some(v) = self.output {
            config.output = v;
        }
        if let Some(v) = self.report_path {
            config.report_path = Some(v);
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    if args.print_default_config {
        println!("{}", BenchConfig::default().to_json()?);
        return Ok(());
    }
    let config = args.load_config()?;
    tracing::debug!(?config, "configuration loaded");

    let provider = config.dataset_provider();
    let dataset = Dataset::load(provider.as_ref()).wrap_err("loading dataset")?;

    let mut runner = BenchmarkRunner::<SalesItemContainer>::new(config.runner_options());
    for kind in &config.codecs {
        let codec = kind
            .build(&config.schema_dir)
            .wrap_err_with(|| format!("setting up codec {kind}"))?;
        runner.register(codec);
    }

    let report = runner.run(&dataset).wrap_err("benchmark aborted")?;
    match config.output {
        OutputFormat::Table => print!("{report}"),
        OutputFormat::Json => println!("{}", report.to_json()?),
    }

    if let Some(path) = &config.report_path {
        report
            .write_json(path)
            .wrap_err_with(|| format!("writing report to {}", path.display()))?;
        tracing::info!(path = %path.display(), "report written");
    }
    Ok(())
}
