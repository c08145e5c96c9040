use clap::{Parser, Subcommand};
use itertools::Itertools;
use miette::IntoDiagnostic;
use mtdv_lang::{BackendKind, DEFAULT_MAX_STEPS, GeneratorConfig, Machine};
use std::io::{self, BufRead, BufWriter, Write};
use std::{fs, path::PathBuf};

use crate::source;

#[derive(Parser, Debug)]
#[command(name = "mtdv")]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(after_help = "Examples:\n\n\
    To translate a program into Python:\n\
    $ mtdv translate program.ts program.py\n\n\
    To translate with another backend:\n\
    $ mtdv translate --backend pure-state-threading program.ts program.py\n\n\
    To run a program with 1s written over cells 30..35:\n\
    $ mtdv run --range 30:5 program.ts")]
#[command(
    about = "mtdv translates MTdV tape programs into Python and runs them.",
    long_about = None
)]
pub struct Cli {
    #[clap(subcommand)]
    commands: Commands,

    #[command(flatten)]
    pub verbose: clap_verbosity_flag::Verbosity,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, clap::ValueEnum)]
enum Backend {
    /// Loops become `while` statements
    #[default]
    StructuredLoop,
    /// Top-level nodes become numbered steps; loops run once
    StepMachine,
    /// Loops become self-recursive functions
    RecursiveProcedure,
    /// No assignments; the state is threaded through pure functions
    PureStateThreading,
}

impl From<Backend> for BackendKind {
    fn from(backend: Backend) -> Self {
        match backend {
            Backend::StructuredLoop => BackendKind::StructuredLoop,
            Backend::StepMachine => BackendKind::StepMachine,
            Backend::RecursiveProcedure => BackendKind::RecursiveProcedure,
            Backend::PureStateThreading => BackendKind::PureStateThreading,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Translate an MTdV program into a Python program
    Translate {
        /// Path to the MTdV program
        input: PathBuf,
        /// Path of the Python file to write
        output: PathBuf,
        /// Code generation strategy
        #[arg(short, long, value_enum, default_value_t)]
        backend: Backend,
        /// Number of spaces for indentation
        #[arg(short, long, default_value_t = 4, value_parser = parse_indent_width)]
        indent_width: usize,
    },
    /// Run an MTdV program on the built-in machine
    Run {
        /// Path to the MTdV program
        input: PathBuf,
        /// Writes 1s over LENGTH cells from START before running
        #[arg(short, long = "range", value_name = "START:LENGTH", value_parser = parse_range)]
        ranges: Vec<(i64, i64)>,
        /// Number of steps after which the run is aborted
        #[arg(long, default_value_t = DEFAULT_MAX_STEPS)]
        max_steps: usize,
        /// Print the tape at `P` without waiting for Enter
        #[arg(long)]
        no_pause: bool,
    },
    /// Print the tokens with their nesting depth
    Tokens {
        /// Path to the MTdV program
        input: PathBuf,
    },
    /// Print the instruction tree
    Tree {
        /// Path to the MTdV program
        input: PathBuf,
    },
}

fn parse_range(s: &str) -> Result<(i64, i64), String> {
    let (start, length) = s
        .split_once(':')
        .ok_or_else(|| format!("expected START:LENGTH, got `{s}`"))?;
    let start = start
        .trim()
        .parse::<i64>()
        .map_err(|e| format!("invalid start `{start}`: {e}"))?;
    let length = length
        .trim()
        .parse::<i64>()
        .map_err(|e| format!("invalid length `{length}`: {e}"))?;
    Ok((start, length))
}

fn parse_indent_width(s: &str) -> Result<usize, String> {
    match s.trim().parse::<usize>() {
        Ok(0) => Err("indent width must be at least 1".to_string()),
        Ok(width) => Ok(width),
        Err(e) => Err(format!("invalid indent width `{s}`: {e}")),
    }
}

impl Cli {
    pub fn run(&self) -> miette::Result<()> {
        match &self.commands {
            Commands::Translate {
                input,
                output,
                backend,
                indent_width,
            } => {
                let lines = source::read_lines(input)?;
                let code = mtdv_lang::translate(
                    &lines,
                    (*backend).into(),
                    &GeneratorConfig {
                        indent_width: *indent_width,
                    },
                )?;

                fs::write(output, format!("{}\n", code.iter().join("\n"))).into_diagnostic()?;
                log::info!(
                    "wrote {} line(s) to {}",
                    code.len(),
                    output.display()
                );
                Ok(())
            }
            Commands::Run {
                input,
                ranges,
                max_steps,
                no_pause,
            } => {
                let lines = source::read_lines(input)?;
                let program = mtdv_lang::parse(&lines)?;
                let machine = Machine::with_ranges(ranges);

                print_state("Initial state:", &machine)?;
                let mut on_pause = |machine: &Machine| {
                    if let Err(e) = pause(machine, *no_pause) {
                        log::warn!("pause failed: {e}");
                    }
                };
                let machine = machine
                    .run(&program, &mut on_pause, *max_steps)
                    .map_err(|e| mtdv_lang::Error::from_error(mtdv_lang::source_text(&lines), e))?;
                print_state("Final state:", &machine)?;
                println!("Program finished.");
                Ok(())
            }
            Commands::Tokens { input } => {
                let lines = source::read_lines(input)?;
                let tokens = mtdv_lang::depth_tokens(&lines)?;
                let stdout = io::stdout();
                let mut stdout = BufWriter::new(stdout.lock());

                writeln!(stdout, "{:>4} {:>3} TOKEN", "#", "K").into_diagnostic()?;
                for token in tokens {
                    writeln!(stdout, "{token}").into_diagnostic()?;
                }
                stdout.flush().into_diagnostic()
            }
            Commands::Tree { input } => {
                let lines = source::read_lines(input)?;
                let program = mtdv_lang::parse(&lines)?;
                let stdout = io::stdout();
                let mut stdout = BufWriter::new(stdout.lock());

                for line in mtdv_lang::render_tree(&program) {
                    writeln!(stdout, "{line}").into_diagnostic()?;
                }
                stdout.flush().into_diagnostic()
            }
        }
    }
}

fn print_state(title: &str, machine: &Machine) -> miette::Result<()> {
    let [cells, marker] = machine.display();
    let mut stdout = io::stdout().lock();

    writeln!(stdout, "{title}\n{cells}\n{marker}").into_diagnostic()?;
    stdout.flush().into_diagnostic()
}

fn pause(machine: &Machine, no_pause: bool) -> miette::Result<()> {
    print_state("Pause:", machine)?;
    if no_pause {
        return Ok(());
    }

    print!("Press Enter to continue...");
    io::stdout().flush().into_diagnostic()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line).into_diagnostic()?;
    Ok(())
}
