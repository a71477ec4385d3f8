// snapcc: dump the syntax skeleton of C program snapshots

use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser as ClapParser, ValueEnum};
use crossterm::style::Stylize;
use tracing_subscriber::EnvFilter;

use snapcc::parser::lexer::Lexer;
use snapcc::snapshot::{analyze_paths, read_source, AnalysisError};
use snapcc::ui::theme::DEFAULT_THEME;
use snapcc::ui::{render_tokens, render_tree, RenderOptions};

#[derive(ClapParser)]
#[command(author, version, about = "Loose C front end for program snapshots")]
struct Cli {
    /// C source files to analyse
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Print the token stream instead of the syntax tree
    #[arg(long)]
    tokens: bool,

    /// Append the line and column of each node's first token
    #[arg(long)]
    positions: bool,

    /// When to colour the output
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
    color: ColorChoice,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ColorChoice {
    Auto,
    Always,
    Never,
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn report(name: &str, err: &AnalysisError, color: bool) {
    if color {
        eprintln!("{}: {}", name.bold(), err.to_string().with(DEFAULT_THEME.error));
    } else {
        eprintln!("{name}: {err}");
    }
}

/// Write one rendered snapshot, preceded by a `==> name <==` header when
/// several files are being shown.
fn write_output(out: &mut impl Write, header: Option<&str>, text: &str) -> io::Result<()> {
    if let Some(name) = header {
        writeln!(out, "==> {name} <==")?;
    }
    out.write_all(text.as_bytes())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let color = match cli.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => io::stdout().is_terminal(),
    };
    let options = RenderOptions {
        show_positions: cli.positions,
        color,
        ..RenderOptions::default()
    };

    let show_headers = cli.files.len() > 1;
    let mut stdout = io::stdout().lock();

    let outputs: Vec<Result<String, AnalysisError>> = if cli.tokens {
        cli.files
            .iter()
            .map(|path| {
                let source = read_source(path)?;
                let tokens = Lexer::new(&source).tokenize()?;
                Ok(render_tokens(&tokens, &options))
            })
            .collect()
    } else {
        analyze_paths(&cli.files)
            .into_iter()
            .map(|result| {
                result.map(|snapshot| render_tree(snapshot.tree(), snapshot.tokens(), &options))
            })
            .collect()
    };

    let mut failed = false;
    for (path, output) in cli.files.iter().zip(outputs) {
        let name = path.display().to_string();
        match output {
            Ok(text) => {
                let header = show_headers.then_some(name.as_str());
                if write_output(&mut stdout, header, &text).is_err() {
                    // Downstream closed the pipe
                    return ExitCode::FAILURE;
                }
            }
            Err(err) => {
                report(&name, &err, color);
                failed = true;
            }
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
