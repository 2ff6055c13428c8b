//! Command-line driver: count alkane isomers, validate and browse checkpoints
#![forbid(unsafe_code)]

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use alkane_isomers::checkpoint::{parse_file_name, CheckpointStore, DirStore};
use alkane_isomers::utils::logging::init_logging;
use alkane_isomers::utils::timing::Timer;
use alkane_isomers::utils::{page_count, page_range};
use alkane_isomers::validate::check_checkpoint;
use alkane_isomers::{EnumerationConfig, Enumerator, ExpandOptions};
use clap::error::ErrorKind;
use clap::{Args, CommandFactory, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "alkanes",
    version,
    about = "Count the structural isomers of CnH2n+2",
    disable_help_subcommand = true
)]
struct Cli {
    #[arg(
        long,
        global = true,
        value_name = "DIR",
        env = "ALKANES_DATA_DIR",
        help = "Checkpoint directory (default: data)"
    )]
    data_dir: Option<PathBuf>,

    #[arg(long, global = true, value_name = "FILE", help = "JSON configuration file")]
    config: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        default_value = "info",
        help = "Log filter used when RUST_LOG is unset"
    )]
    log_level: String,

    #[command(flatten)]
    count: CountArgs,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Enumerate isomers up to N carbons (the default command)
    Count(CountArgs),
    /// Check that checkpoint files hold well-formed trees
    Validate(ValidateArgs),
    /// Print one page of a stored generation
    Show(ShowArgs),
}

#[derive(Args, Debug)]
struct CountArgs {
    #[arg(
        value_name = "N",
        value_parser = clap::value_parser!(u64).range(1..),
        help = "Number of carbon atoms"
    )]
    n: Option<u64>,

    #[arg(long, help = "Ignore existing checkpoints and start from C1")]
    no_resume: bool,

    #[arg(long, help = "Expand on the calling thread only")]
    sequential: bool,
}

#[derive(Args, Debug)]
struct ValidateArgs {
    #[arg(value_name = "FILE", help = "Checkpoint files (default: every *.json in the data dir)")]
    files: Vec<PathBuf>,
}

#[derive(Args, Debug)]
struct ShowArgs {
    #[arg(value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    n: u64,

    #[arg(long, default_value_t = 1, help = "1-based page number")]
    page: usize,

    #[arg(long, default_value_t = 24, help = "Trees per page")]
    page_size: usize,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = init_logging(&cli.log_level) {
        eprintln!("error: {err}");
        return ExitCode::FAILURE;
    }

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, Box<dyn Error>> {
    let mut config = match &cli.config {
        Some(path) => EnumerationConfig::from_json_file(path)?,
        None => EnumerationConfig::default(),
    };
    if let Some(dir) = cli.data_dir {
        config = config.with_data_dir(dir);
    }

    match cli.command {
        Some(Command::Count(args)) => run_count(args, config),
        Some(Command::Validate(args)) => run_validate(args, &config.data_dir),
        Some(Command::Show(args)) => run_show(args, &config.data_dir),
        None => run_count(cli.count, config),
    }
}

fn run_count(args: CountArgs, mut config: EnumerationConfig) -> Result<ExitCode, Box<dyn Error>> {
    let Some(n) = args.n else {
        Cli::command()
            .error(ErrorKind::MissingRequiredArgument, "the number of carbons <N> is required")
            .exit();
    };
    let n = usize::try_from(n)?;

    if args.no_resume {
        config = config.with_resume(false);
    }
    if args.sequential {
        config = config.with_expand(ExpandOptions::sequential());
    }
    config.validate()?;

    let timer = Timer::new("Generation");
    let store = DirStore::new(config.data_dir.clone());
    let mut enumerator = Enumerator::new(store, config);
    let report = enumerator.run_with_progress(n, |step| {
        println!("Generating size {}: {} unique trees", step.size, step.count);
    })?;

    if let Some(size) = report.resumed_from {
        println!("Resumed from size {size}");
    }
    println!("{}", timer.display());
    println!(
        "Structural isomers of C{}H{}: {}",
        n,
        2 * n + 2,
        report.count()
    );
    Ok(ExitCode::SUCCESS)
}

fn run_validate(args: ValidateArgs, data_dir: &Path) -> Result<ExitCode, Box<dyn Error>> {
    let targets = if args.files.is_empty() {
        if !data_dir.is_dir() {
            eprintln!("No {} directory found", data_dir.display());
            return Ok(ExitCode::from(1));
        }
        let mut files: Vec<PathBuf> = fs::read_dir(data_dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .collect();
        files.sort();
        files
    } else {
        args.files
    };

    let mut failed = false;
    for path in &targets {
        if !path.exists() {
            eprintln!("Skipped (not found): {}", path.display());
            failed = true;
            continue;
        }
        match validate_file(path) {
            Ok(()) => println!("OK: {}", path.display()),
            Err(reason) => {
                eprintln!("INVALID: {} -> {}", path.display(), reason);
                failed = true;
            }
        }
    }

    Ok(if failed { ExitCode::from(2) } else { ExitCode::SUCCESS })
}

fn validate_file(path: &Path) -> Result<(), String> {
    let bytes = fs::read(path).map_err(|err| format!("unreadable: {err}"))?;
    let expected_size = path
        .file_name()
        .and_then(|name| name.to_str())
        .and_then(parse_file_name);

    check_checkpoint(expected_size, &bytes)
        .map(|_| ())
        .map_err(|fault| fault.to_string())
}

fn run_show(args: ShowArgs, data_dir: &Path) -> Result<ExitCode, Box<dyn Error>> {
    let n = usize::try_from(args.n)?;
    let store = DirStore::new(data_dir);
    let Some(generation) = store.load(n)? else {
        eprintln!(
            "No checkpoint for size {} in {} (available: {:?})",
            n,
            data_dir.display(),
            store.sizes()?
        );
        return Ok(ExitCode::from(1));
    };

    let pages = page_count(generation.len(), args.page_size);
    let Some(range) = page_range(generation.len(), args.page, args.page_size) else {
        eprintln!("Page {} out of range (1..={})", args.page, pages);
        return Ok(ExitCode::from(1));
    };

    println!(
        "C{}H{}: {} isomers, page {}/{}",
        n,
        2 * n + 2,
        generation.len(),
        args.page,
        pages
    );
    for (index, (key, tree)) in generation.iter().enumerate().skip(range.start).take(range.len()) {
        println!();
        println!("#{} {}", index + 1, key);
        print!("{:?}", tree);
    }
    Ok(ExitCode::SUCCESS)
}
