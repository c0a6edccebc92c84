use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Args, Parser, Subcommand};
use serde_json::{Map, Value};
use std::io::{self, Read, Write};
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;
use yamlfmt_cli::config::{self, ConfigMerger, MergedConfig};
use yamlfmt_cli::paths::{PathFilter, collect_paths};
use yamlfmt_cli::summary::{RunMode, RunSummary};
use yamlfmt_core::{Engine, EngineOutput, ErrorList, LineEnding};
use yamlfmt_formatters::FormatterRegistry;

#[derive(Debug, Parser)]
#[command(
    name = "yamlfmt",
    version,
    about = "Batch formatter and linter for YAML documents.",
    args_conflicts_with_subcommands = true
)]
struct Cli {
    #[command(subcommand)]
    cmd: Option<Command>,

    #[command(flatten)]
    run: RunArgs,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List registered formatters with their default configuration.
    ListFormatters(ListFormattersArgs),
}

#[derive(Debug, Args)]
struct RunArgs {
    /// Files, directories or globs to process (default: current directory).
    paths: Vec<String>,

    /// Report files that are not formatted and exit 1; never writes.
    #[arg(long, conflicts_with_all = ["dry", "stdin"])]
    lint: bool,

    /// Show what would be formatted; never writes.
    #[arg(long, conflicts_with = "stdin")]
    dry: bool,

    /// Format stdin to stdout.
    #[arg(long = "in", id = "stdin")]
    stdin: bool,

    /// Print only the paths of changed files.
    #[arg(long, short)]
    quiet: bool,

    /// Config file (default: ./yamlfmt.toml when present).
    #[arg(long)]
    conf: Option<Utf8PathBuf>,

    /// Formatter setting as key=value; repeatable, overrides the config file.
    #[arg(long = "formatter", value_name = "KEY=VALUE")]
    formatter: Vec<String>,

    /// Line ending for formatted output (lf, crlf).
    #[arg(long)]
    line_ending: Option<LineEnding>,

    /// Glob for files to skip; repeatable, extends the config file list.
    #[arg(long)]
    exclude: Vec<String>,

    /// Output format (text, json).
    #[arg(long, value_enum, default_value = "text")]
    output_format: OutputFormat,

    /// Log pipeline steps to stderr.
    #[arg(long, short)]
    verbose: bool,
}

#[derive(Debug, Args)]
struct ListFormattersArgs {
    /// Output format (text, json).
    #[arg(long, value_enum, default_value = "text")]
    output_format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Usage and configuration problems exit 2; file failures exit 1.
const EXIT_USAGE: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.run.verbose);

    match real_main(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("yamlfmt: {:#}", e);
            ExitCode::from(EXIT_USAGE)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::OFF
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(default.into())
                .from_env_lossy(),
        )
        .with_writer(io::stderr)
        .init();
}

fn real_main(cli: Cli) -> anyhow::Result<ExitCode> {
    match cli.cmd {
        Some(Command::ListFormatters(args)) => cmd_list_formatters(args),
        None => cmd_run(cli.run),
    }
}

fn load_merged(args: &RunArgs) -> anyhow::Result<MergedConfig> {
    let file_config = match &args.conf {
        Some(path) => config::load_config(path)?,
        None => config::load_or_default(Utf8Path::new(".")).context("load yamlfmt.toml config")?,
    };
    let cli_formatter = config::parse_formatter_params(&args.formatter)?;
    let merged = ConfigMerger::new(file_config).merge_cli_args(
        &cli_formatter,
        args.quiet,
        args.line_ending,
        &args.exclude,
    )?;
    debug!(
        "merged config: formatter={:?}, engine={:?}, include={:?}, exclude={:?}, schemas={}",
        merged.formatter,
        merged.engine,
        merged.include,
        merged.exclude,
        merged.schemas.len()
    );
    Ok(merged)
}

fn cmd_run(args: RunArgs) -> anyhow::Result<ExitCode> {
    let merged = load_merged(&args)?;
    let formatter = FormatterRegistry::builtin()
        .create(&merged.formatter_type, &merged.formatter)
        .context("configure formatter")?;
    let engine = Engine::from_settings(formatter, merged.engine)
        .with_schemas(merged.schema_registry());

    if args.stdin {
        return format_stdin(&engine);
    }

    let filter = PathFilter::new(&merged.include, &merged.exclude)?;
    let paths = collect_paths(&args.paths, &filter)?;
    info!("processing {} files", paths.len());

    if args.lint {
        let output = engine.lint(&paths);
        print_output(RunMode::Lint, &output, args.output_format)?;
        return Ok(exit_code(output.has_failures()));
    }
    if args.dry {
        let output = engine.dry_run(&paths);
        print_output(RunMode::DryRun, &output, args.output_format)?;
        return Ok(exit_code(!output.errors.is_empty()));
    }

    match engine.format(&paths) {
        Ok(files) => {
            info!("formatted {} of {} files", files.changed_count(), files.len());
            if args.output_format == OutputFormat::Json {
                let summary = RunSummary::new(RunMode::Format, &files, &ErrorList::new());
                print_json(&summary)?;
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(errors) => {
            match args.output_format {
                OutputFormat::Text => print_errors(&errors),
                OutputFormat::Json => {
                    print_json(&RunSummary::from_errors(RunMode::Format, &errors))?
                }
            }
            Ok(ExitCode::FAILURE)
        }
    }
}

fn format_stdin(engine: &Engine) -> anyhow::Result<ExitCode> {
    let mut input = Vec::new();
    io::stdin().read_to_end(&mut input).context("read stdin")?;
    match engine.format_content(&input) {
        Ok(formatted) => {
            io::stdout().write_all(&formatted).context("write stdout")?;
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("<stdin>: {}", e);
            Ok(ExitCode::FAILURE)
        }
    }
}

fn print_output(mode: RunMode, output: &EngineOutput, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => {
            print!("{}", output);
            print_errors(&output.errors);
        }
        OutputFormat::Json => print_json(&RunSummary::from_output(mode, output))?,
    }
    Ok(())
}

fn print_errors(errors: &ErrorList) {
    for err in errors {
        eprintln!("{}", err);
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value).context("serialize json")?);
    Ok(())
}

fn exit_code(failed: bool) -> ExitCode {
    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn cmd_list_formatters(args: ListFormattersArgs) -> anyhow::Result<ExitCode> {
    let registry = FormatterRegistry::builtin();
    let mut formatters = Vec::new();
    for tag in registry.type_tags() {
        let formatter = registry.create(tag, &Map::new())?;
        formatters.push((tag, formatter.config_map()?));
    }

    match args.output_format {
        OutputFormat::Text => {
            for (tag, config) in &formatters {
                println!("{}", tag);
                for (key, value) in config {
                    if key != yamlfmt_formatters::TYPE_KEY {
                        println!("  {} = {}", key, value);
                    }
                }
            }
        }
        OutputFormat::Json => {
            let map: Map<String, Value> = formatters
                .into_iter()
                .map(|(tag, config)| (tag.to_string(), Value::Object(config)))
                .collect();
            print_json(&map)?;
        }
    }
    Ok(ExitCode::SUCCESS)
}
