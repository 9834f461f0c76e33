use std::fs;
use std::io::{self, IsTerminal};
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ColorChoice {
    Auto,
    Always,
    Never,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatArg {
    Legacy,
    Verbose,
}

impl From<FormatArg> for crsstat::Format {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Legacy => crsstat::Format::Legacy,
            FormatArg::Verbose => crsstat::Format::Verbose,
        }
    }
}

/// Status of the Oracle Clusterware resources, highlighting the ones that
/// are not in their target state
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None, disable_version_flag = true)]
struct Args {
    /// Show only the rows containing this text (case insensitive)
    search: Option<String>,

    /// Split the output in local and cluster resources
    #[clap(short = 'c', long)]
    split: bool,

    /// Print version
    #[clap(short = 'v', long)]
    version: bool,

    /// Clusterware home directory
    #[clap(long)]
    home: Option<PathBuf>,

    /// Read a saved status command output instead of running it
    #[clap(long)]
    input: Option<PathBuf>,

    /// Format of the status output
    #[clap(long, value_enum)]
    format: Option<FormatArg>,

    /// Include the lower stack (-init) resources
    #[clap(long)]
    init: bool,

    /// Discover the environment again, ignoring the cache
    #[clap(long)]
    refresh: bool,

    /// Config file name
    #[clap(long)]
    config: Option<PathBuf>,

    /// When to color the output
    #[clap(long, value_enum, default_value = "auto")]
    color: ColorChoice,

    /// Log debug information on stderr
    #[clap(short, long)]
    debug: bool,
}

fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("crsstat=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr))
        .init();
}

fn run() -> crsstat::Result<()> {
    let args = Args::parse();
    if args.version {
        println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        return Ok(());
    }
    init_logging(args.debug);

    match args.color {
        ColorChoice::Always => colored::control::set_override(true),
        ColorChoice::Never => colored::control::set_override(false),
        ColorChoice::Auto => {
            if !io::stdout().is_terminal() {
                colored::control::set_override(false);
            }
        }
    }

    let mut cfgs = crsstat::find_configs();
    if let Some(config) = args.config {
        cfgs.push(config);
    }
    let config = crsstat::Config::from_files(&cfgs)?;

    let (format, status) = match args.input {
        Some(input) => {
            let format = args.format.map_or(crsstat::Format::Verbose, Into::into);
            (format, String::from_utf8_lossy(&fs::read(input)?).into_owned())
        }
        None => {
            let environment = crsstat::Environment::discover(args.home, &config, args.refresh)?;
            let format = args.format.map_or(environment.format, Into::into);
            let status = environment.status_output(format, args.init || config.init)?;
            (format, status)
        }
    };

    let rows = crsstat::parse(format, status.as_bytes())?;
    let report = crsstat::Report::new(format.into(), args.search.as_deref())?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if args.split {
        report.write_split(&mut out, &rows)?;
    } else {
        report.write_table(&mut out, None, &rows, None)?;
    }

    Ok(())
}

fn main() {
    std::process::exit(match run() {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("error: {}", e);
            1
        }
    });
}
