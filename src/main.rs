//! CLI entry point for canopy

use std::fs::File;
use std::io::{self, BufWriter, IsTerminal};
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use termcolor::{NoColor, StandardStream, WriteColor};

use canopy::{
    DisplayStatistics, Error, Filter, FilterSet, GitHubTreeBuilder, JsonTree, LineFormatter,
    OutputConfig, RemoteConfig, Result, SizeFormat, SummaryContext, TreeWalker, WalkerConfig,
    write_json, write_lines, write_summary,
};

/// Decide whether to use color output from the flags and environment.
fn should_use_color(args: &Args) -> bool {
    if args.no_color || args.json || args.output.is_some() {
        return false;
    }
    // Respect NO_COLOR environment variable (https://no-color.org/)
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    std::io::stdout().is_terminal()
}

/// Parse a worker count: a number, or `auto` for one per core.
fn parse_threads(s: &str) -> std::result::Result<usize, String> {
    if s.eq_ignore_ascii_case("auto") {
        return Ok(0);
    }
    s.parse()
        .map_err(|_| format!("expected a number or 'auto', got '{}'", s))
}

#[derive(Parser, Debug)]
#[command(name = "canopy")]
#[command(about = "Annotated directory trees for local folders and GitHub repositories")]
#[command(version)]
struct Args {
    /// Directory to display, or a GitHub repository URL
    #[arg(default_value = ".")]
    path: String,

    /// Show hidden files and directories
    #[arg(short, long)]
    all: bool,

    /// Descend only N levels deep (0 = unlimited)
    #[arg(short = 'L', long = "level", value_name = "N", default_value = "0")]
    level: usize,

    /// Size filter, e.g. "> 100MB" or "<=1.5KiB" (can be used multiple times)
    #[arg(short = 's', long = "size", value_name = "OP SIZE", allow_hyphen_values = true)]
    size: Vec<String>,

    /// Modification date filter, e.g. "> 2024-01-01" (can be used multiple times)
    #[arg(short = 'd', long = "date", value_name = "OP DATE", allow_hyphen_values = true)]
    date: Vec<String>,

    /// Show only files whose name matches PATTERN (* and ? wildcards)
    #[arg(short = 'n', long = "name", value_name = "PATTERN")]
    name: Vec<String>,

    /// Hide files whose name matches PATTERN (* and ? wildcards)
    #[arg(short = 'x', long = "exclude", value_name = "PATTERN")]
    exclude: Vec<String>,

    /// Worker threads for file metadata: N, or auto for one per core
    #[arg(short = 't', long = "threads", value_name = "N|auto", value_parser = parse_threads)]
    threads: Option<usize>,

    /// Build the tree of a GitHub repository
    #[arg(short = 'g', long = "github", value_name = "URL")]
    github: Option<String>,

    /// Depth for GitHub trees (0 = unlimited)
    #[arg(long = "github-depth", value_name = "N", default_value_t = canopy::remote::DEFAULT_REMOTE_DEPTH)]
    github_depth: usize,

    /// Output in JSON format
    #[arg(long = "json", conflicts_with = "github")]
    json: bool,

    /// Disable colored output
    #[arg(long = "no-color")]
    no_color: bool,

    /// Write the output to FILE instead of stdout
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    output: Option<PathBuf>,

    /// Show sizes in binary and decimal units with the exact byte count
    #[arg(short = 'p', long = "precise-size")]
    precise_size: bool,

    /// Do not print the statistics summary
    #[arg(long = "no-stats")]
    no_stats: bool,
}

impl Args {
    fn filters(&self) -> Result<FilterSet> {
        let mut filters = FilterSet::new();
        for spec in &self.size {
            filters.add(Filter::size(spec)?);
        }
        for spec in &self.date {
            filters.add(Filter::modified(spec)?);
        }
        for pattern in &self.name {
            filters.add(Filter::name(pattern, true)?);
        }
        for pattern in &self.exclude {
            filters.add(Filter::name(pattern, false)?);
        }
        Ok(filters)
    }

    /// The repository URL, from `--github` or a URL given as the path.
    fn remote_url(&self) -> Option<&str> {
        self.github.as_deref().or_else(|| {
            let path = self.path.as_str();
            (path.starts_with("http://") || path.starts_with("https://")).then_some(path)
        })
    }
}

/// Everything that ends up in the output, in order.
enum Report {
    Text {
        header: Option<String>,
        lines: Vec<String>,
        summary: Option<(DisplayStatistics, SummaryContext)>,
    },
    Json(JsonTree),
}

fn emit<W: WriteColor>(out: &mut W, report: &Report) -> io::Result<()> {
    match report {
        Report::Text {
            header,
            lines,
            summary,
        } => {
            if let Some(header) = header {
                writeln!(out, "{}", header)?;
            }
            write_lines(out, lines)?;
            if let Some((stats, ctx)) = summary {
                write_summary(out, stats, *ctx)?;
            }
        }
        Report::Json(tree) => write_json(out, tree)?,
    }
    out.flush()
}

fn deliver(report: &Report, destination: Option<&Path>, config: OutputConfig) -> Result<()> {
    let Some(path) = destination else {
        let mut stdout = StandardStream::stdout(config.color_choice());
        emit(&mut stdout, report)?;
        return Ok(());
    };

    let write_error = |source: io::Error| Error::Write {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(write_error)?;
    let mut out = NoColor::new(BufWriter::new(file));
    emit(&mut out, report).map_err(write_error)?;
    println!("Output written to {}", path.display());
    Ok(())
}

fn run(args: &Args) -> Result<()> {
    let output = OutputConfig {
        use_color: should_use_color(args),
        show_stats: !args.no_stats,
    };
    let formatter = LineFormatter::new(output.use_color);

    if let Some(url) = args.remote_url() {
        if args.json {
            log::warn!("JSON output is not available for GitHub trees, printing text");
        }
        let config = RemoteConfig {
            max_depth: args.github_depth,
            show_hidden: args.all,
            ..RemoteConfig::from_env()
        };
        let mut builder = GitHubTreeBuilder::new(url, config)?;
        if !builder.is_valid() {
            return Err(Error::InvalidRepoUrl(url.to_string()));
        }

        let lines = builder.build_lines(formatter);
        let summary = output.show_stats.then(|| {
            let ctx = SummaryContext {
                remote: true,
                show_hidden: args.all,
                ..SummaryContext::default()
            };
            (*builder.display_statistics(), ctx)
        });
        let report = Report::Text {
            header: None,
            lines,
            summary,
        };
        return deliver(&report, args.output.as_deref(), output);
    }

    let filters = args.filters()?;
    let filtered = !filters.is_empty();
    let walker_config = WalkerConfig {
        show_hidden: args.all,
        max_depth: (args.level > 0).then_some(args.level),
        filters,
        parallel_workers: args.threads,
        size_format: if args.precise_size {
            SizeFormat::Precise
        } else {
            SizeFormat::Compact
        },
        ..WalkerConfig::default()
    };

    let mut walker = TreeWalker::new(&args.path, walker_config)?;
    if args.threads.is_some() {
        log::info!("using {} worker threads", walker.worker_count());
    }

    let report = if args.json {
        Report::Json(walker.build_json())
    } else {
        let lines = walker.build_lines(formatter);
        let header = (args.level > 0 && args.output.is_none())
            .then(|| format!("Depth limited to {} levels", args.level));
        let summary = output.show_stats.then(|| {
            let ctx = SummaryContext {
                remote: false,
                depth_limited: args.level > 0,
                show_hidden: args.all,
                filtered,
            };
            (*walker.display_statistics(), ctx)
        });
        Report::Text {
            header,
            lines,
            summary,
        }
    };

    deliver(&report, args.output.as_deref(), output)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::try_parse().unwrap_or_else(|e| {
        // Help and version go to stdout and succeed; usage errors fail with 1.
        let code = if e.use_stderr() { 1 } else { 0 };
        let _ = e.print();
        process::exit(code);
    });

    if let Err(e) = run(&args) {
        eprintln!("canopy: {}", e);
        process::exit(1);
    }
}
