//! yieldtab CLI - rebuild yield tables from flattened report text

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use yieldtab::render::{self, ScriptOptions, DEFAULT_CONST_NAME};
use yieldtab::{
    merge_supplement, validate, JsonFormat, ParseOptions, ParseOutcome, ParseStats, ResultTable,
    SupplementRow, YieldParser,
};

#[derive(Parser)]
#[command(name = "yieldtab")]
#[command(version)]
#[command(about = "Rebuild species yield tables from two-column report text", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a text dump into a yield table
    Parse(ParseArgs),

    /// Merge supplement rows into an existing table
    Merge {
        /// Existing table (JSON, or script with --script)
        #[arg(value_name = "TABLE")]
        table: PathBuf,

        /// Supplement rows as a JSON array
        #[arg(value_name = "ROWS")]
        rows: PathBuf,

        /// Output file (overwrites TABLE if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Read and write script format
        #[arg(long)]
        script: bool,

        /// Name of the declared constant in script format
        #[arg(long, value_name = "NAME", default_value = DEFAULT_CONST_NAME)]
        const_name: String,
    },

    /// Check a table for implausible records
    Validate {
        /// Table to check (JSON, or script with --script)
        #[arg(value_name = "TABLE")]
        table: PathBuf,

        /// Read script format
        #[arg(long)]
        script: bool,

        /// Name of the declared constant in script format
        #[arg(long, value_name = "NAME", default_value = DEFAULT_CONST_NAME)]
        const_name: String,
    },

    /// Show version information
    Version,
}

#[derive(clap::Args)]
struct ParseArgs {
    /// Input text dump
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Output file (stdout if not specified)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Output compact JSON
    #[arg(long, conflicts_with = "script")]
    compact: bool,

    /// Output a `const NAME = {...};` script instead of JSON
    #[arg(long)]
    script: bool,

    /// Name of the declared constant in script output
    #[arg(long, value_name = "NAME", default_value = DEFAULT_CONST_NAME)]
    const_name: String,

    /// Add a generated-at comment to script output
    #[arg(long, requires = "script")]
    timestamp: bool,

    /// Derive species names from the table of contents
    #[arg(long)]
    toc: bool,

    /// Single-column lines this long or longer are dropped
    #[arg(long, value_name = "N", env = "YIELDTAB_SHORT_LINE")]
    short_line: Option<usize>,

    /// Additional species name (repeatable)
    #[arg(long = "species", value_name = "NAME")]
    species: Vec<String>,

    /// Additional banner marker (repeatable)
    #[arg(long = "banner", value_name = "TEXT")]
    banners: Vec<String>,

    /// Print diagnostic counts to stderr
    #[arg(long)]
    stats: bool,
}

impl ParseArgs {
    fn parse_options(&self) -> ParseOptions {
        let mut options = ParseOptions::new();
        if let Some(chars) = self.short_line {
            options = options.with_short_line_threshold(chars);
        }
        if self.toc {
            options = options.with_toc_registry();
        }
        for name in &self.species {
            options = options.with_species(name.as_str());
        }
        for marker in &self.banners {
            options = options.with_banner(marker.as_str());
        }
        options
    }

    fn script_options(&self) -> ScriptOptions {
        let options = ScriptOptions::new().with_const_name(self.const_name.as_str());
        if self.timestamp {
            options.with_timestamp()
        } else {
            options
        }
    }
}

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Parse(args) => cmd_parse(&args),
        Commands::Merge {
            table,
            rows,
            output,
            script,
            const_name,
        } => cmd_merge(&table, &rows, output.as_deref(), script, &const_name),
        Commands::Validate {
            table,
            script,
            const_name,
        } => cmd_validate(&table, script, &const_name),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_parse(args: &ParseArgs) -> CliResult<()> {
    let text = fs::read_to_string(&args.input)?;
    let lines: Vec<&str> = text.lines().collect();
    log::info!("Parsing {} lines from {}", lines.len(), args.input.display());

    let parser = YieldParser::new(args.parse_options())?;
    let outcome = run_with_progress(&parser, &lines, args.output.is_some());

    let rendered = if args.script {
        render::to_script(&outcome.table, &args.script_options())?
    } else if args.compact {
        render::to_json(&outcome.table, JsonFormat::Compact)?
    } else {
        render::to_json(&outcome.table, JsonFormat::Pretty)?
    };

    write_output(args.output.as_deref(), &rendered)?;

    if args.stats {
        print_stats(&outcome);
    }

    Ok(())
}

fn run_with_progress(parser: &YieldParser, lines: &[&str], show: bool) -> ParseOutcome {
    let pb = if show {
        let pb = ProgressBar::new(lines.len() as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} lines {msg}")
        {
            pb.set_style(style.progress_chars("#>-"));
        }
        pb
    } else {
        ProgressBar::hidden()
    };

    let mut session = parser.session(parser.registry_for(lines));
    for line in lines {
        session.feed(line);
        pb.inc(1);
    }
    pb.finish_with_message("done");

    session.finish()
}

fn cmd_merge(
    table_path: &Path,
    rows_path: &Path,
    output: Option<&Path>,
    script: bool,
    const_name: &str,
) -> CliResult<()> {
    let (mut table, tail) = load_table(table_path, script, const_name)?;
    log::debug!("Reading supplement rows from {}", rows_path.display());
    let rows: Vec<SupplementRow> = serde_json::from_str(&fs::read_to_string(rows_path)?)?;

    let report = merge_supplement(&mut table, &rows);

    let rendered = if script {
        let mut rendered =
            render::to_script(&table, &ScriptOptions::new().with_const_name(const_name))?;
        if !tail.is_empty() {
            log::debug!("Keeping {} bytes after the {} declaration", tail.len(), const_name);
        }
        rendered.push_str(&tail);
        rendered
    } else {
        render::to_json(&table, JsonFormat::Pretty)?
    };
    let target = output.unwrap_or(table_path);
    log::debug!("Writing {} bytes to {}", rendered.len(), target.display());
    fs::write(target, rendered)?;

    println!(
        "{} {} rows, {} skipped",
        "Merged".green(),
        report.merged,
        report.skipped
    );
    println!("{} {}", "Saved to".green(), target.display());

    Ok(())
}

fn cmd_validate(table_path: &Path, script: bool, const_name: &str) -> CliResult<()> {
    let table = read_table(table_path, script, const_name)?;
    let report = validate(&table);

    println!("{}", "Validation".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Records".bold(), report.checked);

    if report.is_clean() {
        println!("{}", "No issues found".green());
    } else {
        println!("{}: {}", "Issues".bold(), report.issues.len().to_string().yellow());
        for issue in &report.issues {
            println!("  {} {}", "-".dimmed(), issue);
        }
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "yieldtab".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Yield table reconstruction from two-column report text");
    println!();
    println!("License: MIT");
}

fn read_table(path: &Path, script: bool, const_name: &str) -> CliResult<ResultTable> {
    Ok(load_table(path, script, const_name)?.0)
}

/// Read a table, plus whatever follows its declaration in script mode.
fn load_table(path: &Path, script: bool, const_name: &str) -> CliResult<(ResultTable, String)> {
    log::debug!("Reading table from {}", path.display());
    let text = fs::read_to_string(path)?;
    if script {
        let (table, tail) = render::split_script(&text, const_name)?;
        Ok((table, tail.to_string()))
    } else {
        Ok((render::from_json(&text)?, String::new()))
    }
}

fn write_output(output: Option<&Path>, content: &str) -> CliResult<()> {
    if let Some(path) = output {
        log::debug!("Writing {} bytes to {}", content.len(), path.display());
        fs::write(path, content)?;
        eprintln!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content.trim_end());
    }
    Ok(())
}

fn print_stats(outcome: &ParseOutcome) {
    let ParseStats {
        lines,
        headers,
        records,
        overwritten,
        unknown_entity,
        malformed,
        ambiguous,
        numeric_failures,
        ..
    } = outcome.stats;

    eprintln!();
    eprintln!("{}", "Parse Statistics".cyan().bold());
    eprintln!("{}", "─".repeat(40).dimmed());
    eprintln!("{}: {}", "Lines".bold(), lines);
    eprintln!("{}: {}", "Noise".bold(), outcome.stats.noise());
    eprintln!("{}: {}", "Headers".bold(), headers);
    eprintln!(
        "{}: {} ({} entities)",
        "Records".bold(),
        records,
        outcome.table.entity_count()
    );
    eprintln!("{}: {}", "Overwritten".bold(), overwritten);
    eprintln!("{}: {}", "Unknown entity".bold(), unknown_entity);
    eprintln!("{}: {}", "Malformed".bold(), malformed);
    eprintln!("{}: {}", "Ambiguous".bold(), ambiguous);
    let failures = numeric_failures.to_string();
    eprintln!(
        "{}: {}",
        "Numeric failures".bold(),
        if numeric_failures > 0 {
            failures.yellow()
        } else {
            failures.normal()
        }
    );
}
