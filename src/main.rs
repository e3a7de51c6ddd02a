use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use clap::Subcommand;
use env_logger::Builder;
use log::{debug, info};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use sinterp::ast_printer::AstPrinter;
use sinterp::scanner::Scanner;
use sinterp::session::{Session, Status};
use sinterp::token::Token;

const HISTORY_FILE: &str = ".sinterp_history";

#[derive(ClapParser, Debug)]
#[command(version, about = "sinterp scripting language interpreter", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    commands: Commands,

    /// Enable logging to sinterp.log
    #[arg(long, global = true)]
    log: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Tokenizes input from a file, printing each token
    Tokenize {
        filename: PathBuf,

        /// Print one JSON object per token instead of the plain listing
        #[arg(long)]
        json: bool,
    },

    /// Parses a program and prints each statement in prefix form
    Parse { filename: PathBuf },

    /// Runs a program
    Run { filename: PathBuf },

    /// Starts an interactive prompt
    Repl,
}

/// Reads the contents of a file into a String
fn read_file(filename: &Path) -> Result<String> {
    info!("Reading file: {:?}", filename);
    let file = File::open(filename).context(format!("Failed to open file {:?}", filename))?;
    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();

    let bytes = reader
        .read_to_end(&mut buf)
        .context(format!("Failed to read file {:?}", filename))?;

    info!("Read {} bytes from {:?}", bytes, filename);

    String::from_utf8(buf).context(format!("File {:?} is not valid UTF-8", filename))
}

fn init_logger() -> Result<()> {
    let log_file = File::create("sinterp.log").context("Failed to create sinterp.log")?;

    Builder::new()
        .format(|buf, record| {
            // Strip 'sinterp::' from module path
            let module = record
                .module_path()
                .unwrap_or("<unnamed>")
                .strip_prefix("sinterp::")
                .unwrap_or(record.module_path().unwrap_or("<unnamed>"));
            writeln!(
                buf,
                "[{}:{}] - {}",
                module,
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .filter(None, log::LevelFilter::Debug)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized, writing to sinterp.log");
    Ok(())
}

/// Print and clear whatever the session has collected.
fn report_errors(session: &mut Session) {
    for e in session.diagnostics_mut().drain() {
        eprintln!("{}", e);
    }
}

fn tokenize(filename: &Path, json: bool) -> Result<i32> {
    let source = read_file(filename)?;
    let mut tokenized = true;

    for result in Scanner::new(source.as_bytes()) {
        match result {
            Ok(token) => {
                debug!("Scanned token: {}", token);

                if json {
                    println!("{}", serde_json::to_string::<Token>(&token)?);
                } else {
                    println!("{}", token);
                }
            }

            Err(e) => {
                tokenized = false;

                debug!("Tokenization debug: {}", e);

                eprintln!("{}", e);
            }
        }
    }

    if !tokenized {
        debug!("Tokenization failed, exiting with code 65");
        return Ok(Status::StaticError.exit_code());
    }

    info!("Tokenization completed successfully");
    Ok(0)
}

fn parse(filename: &Path) -> Result<i32> {
    let source = read_file(filename)?;
    let mut session = Session::new();

    let statements = session.parse(&source);

    if session.diagnostics().had_static_error() {
        report_errors(&mut session);
        return Ok(Status::StaticError.exit_code());
    }

    for stmt in &statements {
        let ast_str = AstPrinter::print_stmt(stmt);

        debug!("AST: {}", ast_str);
        println!("{}", ast_str);
    }

    info!("Parse subcommand completed");
    Ok(0)
}

fn run(filename: &Path) -> Result<i32> {
    let source = read_file(filename)?;
    info!("Provided input:\n {}", source);

    let mut session = Session::new();
    let status = session.run(&source);

    report_errors(&mut session);

    info!("Run finished: {:?}", status);
    Ok(status.exit_code())
}

fn repl() -> Result<i32> {
    let mut rl = DefaultEditor::new().context("Failed to start line editor")?;
    if rl.load_history(HISTORY_FILE).is_err() {
        debug!("No previous history");
    }

    let mut session = Session::new();

    loop {
        match rl.readline("> ") {
            Ok(line) => {
                rl.add_history_entry(line.as_str())?;

                let status = session.run_line(&line);
                debug!("Line finished: {:?}", status);

                report_errors(&mut session);
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err).context("Failed to read line"),
        }
    }

    if let Err(e) = rl.save_history(HISTORY_FILE) {
        debug!("Could not save history: {}", e);
    }

    let code = if session.diagnostics().had_runtime_error() {
        Status::RuntimeError.exit_code()
    } else {
        0
    };

    Ok(code)
}

fn main() -> Result<()> {
    let args: Cli = Cli::parse();

    // Initialize logger only if --log flag is provided
    if args.log {
        init_logger()?;
    } else {
        // Initialize a minimal logger to avoid "no logger" errors
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Off)
            .init();
    }

    info!("CLI arguments: {:?}", args);

    let code = match &args.commands {
        Commands::Tokenize { filename, json } => tokenize(filename, *json)?,
        Commands::Parse { filename } => parse(filename)?,
        Commands::Run { filename } => run(filename)?,
        Commands::Repl => repl()?,
    };

    if code != 0 {
        std::process::exit(code);
    }

    Ok(())
}
