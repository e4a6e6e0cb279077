//! Command-line interface for asmfsm
//! Parses assembler statements and prints the collected fields and operands.
//!
//! Usage:
//!   asmfsm line `<text>`                   - Parse one source statement
//!   asmfsm operands `<mnemonic>` `<text>`  - Parse an operand field with the mnemonic's grammar
//!   asmfsm file `<path>`                   - Parse every statement of a source file
//!   asmfsm tokens `<vocabulary>` `<text>`  - Show the tokens of a text in one vocabulary
//!   asmfsm list-grammars                 - List mnemonics with an operand grammar
//!
//! Global flags: `--trace`, `--format json|yaml|debug`, `--config <path>`.
//! Set `ASMFSM_LOG` (e.g. `ASMFSM_LOG=debug`) for library logging.

use asmfsm::fsm::TRACE_TARGET;
use asmfsm::grammars::{self, MNEMONICS};
use asmfsm::lexing::{tokenize, vocabulary};
use asmfsm::ParseError;
use asmfsm_config::{AsmfsmConfig, ConfigError, Loader, OutputFormat};
use clap::{Arg, ArgAction, ArgMatches, Command};
use serde::Serialize;
use std::fmt::Debug;
use std::process::exit;

fn main() {
    let matches = Command::new("asmfsm")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Parse mainframe assembler statements with context-sensitive grammars")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("trace")
                .long("trace")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log every state machine dispatch"),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .short('f')
                .global(true)
                .value_parser(OutputFormat::NAMES.to_vec())
                .help("Output format [default: from config, json]"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .help("Configuration file layered over the built-in defaults"),
        )
        .subcommand(
            Command::new("line")
                .about("Parse one source statement")
                .arg(Arg::new("text").help("Statement text").required(true).index(1)),
        )
        .subcommand(
            Command::new("operands")
                .about("Parse an operand field")
                .arg(
                    Arg::new("mnemonic")
                        .help("Operation whose grammar to use (e.g. START, USING)")
                        .required(true)
                        .index(1),
                )
                .arg(Arg::new("text").help("Operand field").required(true).index(2)),
        )
        .subcommand(
            Command::new("file")
                .about("Parse every statement of a source file")
                .arg(
                    Arg::new("path")
                        .help("Path to the assembler source")
                        .required(true)
                        .index(1),
                ),
        )
        .subcommand(
            Command::new("tokens")
                .about("Tokenize a text with one vocabulary")
                .arg(
                    Arg::new("vocabulary")
                        .help("Vocabulary name")
                        .required(true)
                        .value_parser(vocabulary::standard().names())
                        .index(1),
                )
                .arg(Arg::new("text").help("Text to tokenize").required(true).index(2)),
        )
        .subcommand(Command::new("list-grammars").about("List mnemonics with an operand grammar"))
        .get_matches();

    let config = load_config(&matches).unwrap_or_else(|e| {
        eprintln!("Error loading configuration: {}", e);
        exit(1);
    });
    init_logging(config.parsing.trace);

    let trace = config.parsing.trace;
    let format = config.output.format;
    match matches.subcommand() {
        Some(("line", line_matches)) => {
            let text = required(line_matches, "text");
            handle_line_command(text, trace, format);
        }
        Some(("operands", operand_matches)) => {
            let mnemonic = required(operand_matches, "mnemonic");
            let text = required(operand_matches, "text");
            handle_operands_command(mnemonic, text, trace, format);
        }
        Some(("file", file_matches)) => {
            let path = required(file_matches, "path");
            handle_file_command(path, trace, format);
        }
        Some(("tokens", token_matches)) => {
            let vocabulary = required(token_matches, "vocabulary");
            let text = required(token_matches, "text");
            handle_tokens_command(vocabulary, text, format);
        }
        Some(("list-grammars", _)) => {
            handle_list_grammars_command();
        }
        _ => unreachable!(),
    }
}

fn required<'a>(matches: &'a ArgMatches, name: &str) -> &'a str {
    matches
        .get_one::<String>(name)
        .map(String::as_str)
        .unwrap_or_default()
}

/// Layer the config file and command line flags over the defaults
fn load_config(matches: &ArgMatches) -> Result<AsmfsmConfig, ConfigError> {
    let mut loader = Loader::new();
    if let Some(path) = matches.get_one::<String>("config") {
        loader = loader.with_file(path);
    }
    if matches.get_flag("trace") {
        loader = loader.set_override("parsing.trace", true)?;
    }
    if let Some(format) = matches.get_one::<String>("format") {
        loader = loader.set_override("output.format", format.as_str())?;
    }
    loader.build()
}

fn init_logging(trace: bool) {
    let env = env_logger::Env::default()
        .filter("ASMFSM_LOG")
        .write_style("ASMFSM_LOG_STYLE");
    let trace_level = if trace {
        log::LevelFilter::Info
    } else {
        log::LevelFilter::Off
    };
    env_logger::Builder::new()
        .format_timestamp(None)
        .filter_level(log::LevelFilter::Off)
        .filter(Some(TRACE_TARGET), trace_level)
        .parse_env(env)
        .init();
}

fn render<T: Serialize + Debug>(value: &T, format: OutputFormat) -> String {
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(value).map_err(|e| e.to_string()),
        OutputFormat::Yaml => serde_yaml::to_string(value).map_err(|e| e.to_string()),
        OutputFormat::Debug => Ok(format!("{:#?}", value)),
    };
    rendered.unwrap_or_else(|e| {
        eprintln!("Error rendering output: {}", e);
        exit(1);
    })
}

fn report(err: &ParseError) -> ! {
    if err.is_defect() {
        eprintln!("Internal error: {}", err);
    } else {
        eprintln!("Error: {}", err);
    }
    exit(1);
}

/// Handle the line command
fn handle_line_command(text: &str, trace: bool, format: OutputFormat) {
    match grammars::parse_line(text, trace) {
        Ok(line) => println!("{}", render(&line, format)),
        Err(e) => report(&e),
    }
}

/// Handle the operands command
fn handle_operands_command(mnemonic: &str, text: &str, trace: bool, format: OutputFormat) {
    match grammars::parse_operands(mnemonic, text, trace) {
        Ok(Some(operands)) => println!("{}", render(&operands, format)),
        Ok(None) => {
            eprintln!("Error: no operand grammar for {}", mnemonic);
            exit(1);
        }
        Err(e) => report(&e),
    }
}

/// Handle the file command. Bad statements are reported and skipped; a grammar defect
/// stops the run.
fn handle_file_command(path: &str, trace: bool, format: OutputFormat) {
    let source = std::fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file: {}", e);
        exit(1);
    });

    let mut failed = 0;
    for (index, line) in source.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match grammars::parse_line(line, trace) {
            Ok(parsed) => println!("{}", render(&parsed, format)),
            Err(e) if e.is_defect() => {
                eprintln!("Internal error at line {}: {}", index + 1, e);
                exit(2);
            }
            Err(e) => {
                eprintln!("Error at line {}: {}", index + 1, e);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        eprintln!("{} statement(s) could not be parsed", failed);
        exit(1);
    }
}

/// Handle the tokens command
fn handle_tokens_command(vocabulary: &str, text: &str, format: OutputFormat) {
    match tokenize(text, vocabulary) {
        Ok(tokens) => println!("{}", render(&tokens, format)),
        Err(e) => report(&ParseError::from(e)),
    }
}

/// Handle the list-grammars command
fn handle_list_grammars_command() {
    println!("Operand grammars:\n");
    for (mnemonic, grammar) in MNEMONICS {
        println!("  {:<8} {}", mnemonic, grammar.name());
    }
}
