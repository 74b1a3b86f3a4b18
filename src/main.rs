use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use rstfidf::api::{create_router, AppState};
use rstfidf::loader;
use rstfidf::sink::{JsonLinesSink, TextSink};
use rstfidf::storage::ScoreStore;
use rstfidf::tokenizer::AnalyzerOptions;
use rstfidf::{EmptyDocumentPolicy, Pipeline, PipelineConfig};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

// CLI Arguments
#[derive(Parser, Debug)]
#[command(author, version, about = "Corpus-wide TF-IDF scoring", long_about = None)]
struct Cli {
    /// Emit logs as JSON
    #[arg(long, global = true, env = "RSTFIDF_LOG_JSON")]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score every (word, document) pair of a corpus
    Run(RunArgs),
    /// Serve scores stored by `run --format store`
    Serve(ServeArgs),
}

#[derive(Args, Debug)]
struct RunArgs {
    /// File, directory or wildcard pattern (e.g. "corpus/*.txt")
    #[arg(short, long, env = "RSTFIDF_INPUT")]
    input: String,

    /// Output file, or database directory for `--format store`
    #[arg(short, long, env = "RSTFIDF_OUTPUT")]
    output: String,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text, env = "RSTFIDF_FORMAT")]
    format: OutputFormat,

    /// What to do with documents that contain no words
    #[arg(long, value_enum, default_value_t = EmptyDocuments::Fail, env = "RSTFIDF_EMPTY_DOCUMENTS")]
    empty_documents: EmptyDocuments,

    /// Drop common English stopwords
    #[arg(long, env = "RSTFIDF_STOPWORDS")]
    stopwords: bool,

    /// Stem words (English Snowball)
    #[arg(long, env = "RSTFIDF_STEM")]
    stem: bool,
}

#[derive(Args, Debug)]
struct ServeArgs {
    /// Score database written by `run --format store`
    #[arg(short, long, env = "RSTFIDF_STORE")]
    store: String,

    #[arg(short, long, default_value_t = 3000, env = "RSTFIDF_PORT")]
    port: u16,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OutputFormat {
    /// word<TAB>document<TAB>score
    Text,
    /// One JSON object per line
    Jsonl,
    /// sled database, served by `serve`
    Store,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum EmptyDocuments {
    Fail,
    Exclude,
}

impl From<EmptyDocuments> for EmptyDocumentPolicy {
    fn from(value: EmptyDocuments) -> Self {
        match value {
            EmptyDocuments::Fail => EmptyDocumentPolicy::Fail,
            EmptyDocuments::Exclude => EmptyDocumentPolicy::Exclude,
        }
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("rstfidf=info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn run(args: RunArgs) -> Result<()> {
    let config = PipelineConfig {
        empty_documents: args.empty_documents.into(),
        analyzer: AnalyzerOptions {
            remove_stopwords: args.stopwords,
            stem: args.stem,
        },
    };
    let pipeline = Pipeline::new(config);

    let start = Instant::now();
    let records = loader::load(&args.input)?;
    tracing::info!("Loaded {} lines in {:?}", records.len(), start.elapsed());

    // Compute before touching the output so a failed run leaves it intact.
    let start = Instant::now();
    let output = pipeline.run(&records)?;
    match args.format {
        OutputFormat::Text => {
            let mut sink = TextSink::create(&args.output)?;
            output.write_to(&mut sink)?;
        }
        OutputFormat::Jsonl => {
            let mut sink = JsonLinesSink::create(&args.output)?;
            output.write_to(&mut sink)?;
        }
        OutputFormat::Store => {
            let mut store = ScoreStore::open(&args.output)?;
            store.clear()?;
            output.write_to(&mut store)?;
            store.save_run_stats(&output.stats)?;
            store.save_analyzer(&pipeline.config().analyzer)?;
            store.flush()?;
        }
    }
    let stats = &output.stats;

    tracing::info!(
        "Wrote {} scores for {} words across {} documents to {} in {:?}",
        stats.scores,
        stats.distinct_words,
        stats.total_documents,
        args.output,
        start.elapsed()
    );
    Ok(())
}

async fn serve(args: ServeArgs) -> Result<()> {
    let store = ScoreStore::open(&args.store)?;
    let state = AppState::new(store)?;
    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Serving scores from {} on {}", args.store, addr);

    axum::serve(listener, app).await?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    match cli.command {
        Command::Run(args) => run(args),
        Command::Serve(args) => {
            let runtime = tokio::runtime::Runtime::new().context("Failed to start runtime")?;
            runtime.block_on(serve(args))
        }
    }
}
