//! FieldKit CLI - extract fields from web pages or serve the extraction API

use clap::{Args, Parser, Subcommand, ValueEnum};
use fieldkit::{ExtractRequest, ExtractResponse, Extractor, DEFAULT_MODEL, TOOL_LLMTXT};
use serde_json::json;
use std::io::{self, Write};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Output format for extract subcommand
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum OutputFormat {
    /// Markdown with YAML frontmatter
    #[default]
    Md,
    /// JSON format
    Json,
}

/// FieldKit - LLM-assisted field extraction from web pages
#[derive(Parser, Debug)]
#[command(name = "fieldkit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Print full help with examples (llmtxt)
    #[arg(long)]
    llmtxt: bool,
}

/// Extractor configuration shared by subcommands
#[derive(Args, Debug, Clone)]
struct ExtractorArgs {
    /// Base URL of the OpenAI-compatible API
    #[arg(long)]
    api_base: Option<String>,

    /// Custom User-Agent for page fetches
    #[arg(long)]
    user_agent: Option<String>,

    /// Only fetch URLs starting with this prefix (repeatable)
    #[arg(long = "allow-prefix")]
    allow_prefixes: Vec<String>,

    /// Never fetch URLs starting with this prefix (repeatable)
    #[arg(long = "block-prefix")]
    block_prefixes: Vec<String>,
}

impl ExtractorArgs {
    fn build(self) -> Extractor {
        let mut builder = Extractor::builder();

        if let Some(api_base) = self.api_base {
            builder = builder.api_base(api_base);
        }
        if let Some(ua) = self.user_agent {
            builder = builder.user_agent(ua);
        }
        for prefix in self.allow_prefixes {
            builder = builder.allow_prefix(prefix);
        }
        for prefix in self.block_prefixes {
            builder = builder.block_prefix(prefix);
        }

        builder.build()
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve POST /api/scrape over HTTP
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "127.0.0.1:3000")]
        bind: SocketAddr,

        #[command(flatten)]
        extractor: ExtractorArgs,
    },
    /// Extract fields from a URL and print the result
    Extract {
        /// URL to fetch
        #[arg(long)]
        url: String,

        /// Field to extract (repeatable)
        #[arg(long = "field", short = 'f', required = true)]
        fields: Vec<String>,

        /// Completion model
        #[arg(long, default_value = DEFAULT_MODEL)]
        model: String,

        /// OpenAI API key
        #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
        api_key: String,

        /// Output format
        #[arg(long, short, default_value = "md")]
        output: OutputFormat,

        #[command(flatten)]
        extractor: ExtractorArgs,
    },
    /// Print JSON Schemas of the request and response bodies
    Schema,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Handle --llmtxt flag
    if cli.llmtxt {
        writeln_safe(TOOL_LLMTXT);
        std::process::exit(0);
    }

    match cli.command {
        Some(Commands::Serve { bind, extractor }) => {
            init_tracing("info");
            run_serve(bind, extractor.build()).await;
        }
        Some(Commands::Extract {
            url,
            fields,
            model,
            api_key,
            output,
            extractor,
        }) => {
            init_tracing("warn");
            let request = ExtractRequest::new(url)
                .fields(fields)
                .model(model)
                .api_key(api_key);
            run_extract(request, output, extractor.build()).await;
        }
        Some(Commands::Schema) => {
            let extractor = Extractor::default();
            let schemas = json!({
                "request": extractor.input_schema(),
                "response": extractor.output_schema(),
            });
            writeln_safe(&serde_json::to_string_pretty(&schemas).unwrap_or_default());
        }
        None => {
            eprintln!("Usage: fieldkit extract --url <URL> --field <FIELD>...");
            eprintln!("   or: fieldkit serve [--bind <ADDR>]");
            eprintln!("   or: fieldkit --help");
            std::process::exit(1);
        }
    }
}

/// Install the stderr log subscriber, honouring RUST_LOG when set
fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

async fn run_serve(bind: SocketAddr, extractor: Extractor) {
    if let Err(e) = fieldkit::server::serve(bind, Arc::new(extractor)).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run_extract(request: ExtractRequest, output: OutputFormat, extractor: Extractor) {
    let url = request.url.clone();
    let model = request.model.clone();

    let result = extractor
        .execute_with_status(request, |status| {
            debug!(phase = %status.phase, percent = ?status.percent_complete, "Extraction progress");
        })
        .await;

    match result {
        Ok(response) => match output {
            OutputFormat::Md => writeln_safe(&format_md_with_frontmatter(&url, &model, &response)),
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(&response).unwrap_or_else(|e| {
                    eprintln!("Error serializing response: {}", e);
                    std::process::exit(1);
                });
                writeln_safe(&json);
            }
        },
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Format response as markdown with YAML frontmatter
fn format_md_with_frontmatter(url: &str, model: &str, response: &ExtractResponse) -> String {
    let mut output = String::new();

    // Build frontmatter
    output.push_str("---\n");
    output.push_str(&format!("url: {}\n", url));
    output.push_str(&format!("model: {}\n", model));
    output.push_str(&format!("input_tokens: {}\n", response.input_tokens));
    output.push_str(&format!("output_tokens: {}\n", response.output_tokens));
    output.push_str(&format!("total_cost: {:.4}\n", response.total_cost));
    output.push_str("---\n");

    output.push_str(&response.result);

    output
}

/// Write to stdout, exit silently on broken pipe
fn writeln_safe(s: &str) {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if let Err(e) = writeln!(handle, "{}", s) {
        if e.kind() == io::ErrorKind::BrokenPipe {
            std::process::exit(0);
        }
        eprintln!("Error writing to stdout: {}", e);
        std::process::exit(1);
    }
}
