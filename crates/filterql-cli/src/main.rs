//! FilterQL CLI - Command line front end for the query parser

use std::io::{self, Read};

use std::ops::Range;

use ariadne::{Color, Config, IndexType, Label, Report, ReportKind, Source};
use clap::{Parser, Subcommand};

use filterql_ast::{Expression, ToQuery};
use filterql_lexer::{completion_context, Lexer};
use filterql_parser::{parse_with_max_depth, Error, DEFAULT_MAX_DEPTH};

/// Name used for query text in diagnostics
const QUERY_ID: &str = "<query>";

#[derive(Parser)]
#[command(name = "filterql")]
#[command(about = "Parse and inspect filter queries", long_about = None)]
struct Cli {
    /// Log parser activity to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Refuse queries longer than this many bytes
    #[arg(long, global = true, default_value_t = 64 * 1024)]
    max_len: usize,

    /// Refuse queries nested deeper than this many parentheses
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a query and output the AST as JSON
    Parse {
        /// Query text; read from stdin when omitted
        query: Option<String>,
        /// Pretty print the output
        #[arg(short, long)]
        pretty: bool,
    },
    /// Print the token stream of a query
    Tokens {
        /// Query text; read from stdin when omitted
        query: Option<String>,
    },
    /// Check one or more queries and report syntax errors
    Check {
        /// Queries to check
        #[arg(required = true)]
        queries: Vec<String>,
    },
    /// Show what is expected at a cursor position
    Complete {
        /// Query text
        query: String,
        /// Byte offset of the cursor; defaults to the end of the query
        #[arg(short, long)]
        cursor: Option<usize>,
    },
    /// Interactive REPL
    Repl,
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::TRACE
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    let limits = Limits {
        max_len: cli.max_len,
        max_depth: cli.max_depth,
    };
    match cli.command {
        Commands::Parse { query, pretty } => cmd_parse(&read_query(query, limits), pretty, limits),
        Commands::Tokens { query } => cmd_tokens(&read_query(query, limits)),
        Commands::Check { queries } => cmd_check(&queries, limits),
        Commands::Complete { query, cursor } => cmd_complete(&query, cursor),
        Commands::Repl => cmd_repl(limits),
    }
}

/// Bounds applied to untrusted query text
#[derive(Debug, Clone, Copy)]
struct Limits {
    max_len: usize,
    max_depth: usize,
}

impl Limits {
    fn parse(&self, source: &str) -> Result<Expression, Error> {
        parse_with_max_depth(source, self.max_depth)
    }
}

/// Query from the argument or stdin, bounded by `max_len`
fn read_query(query: Option<String>, limits: Limits) -> String {
    let source = match query {
        Some(q) => q,
        None => {
            let mut buffer = String::new();
            if let Err(e) = io::stdin().read_to_string(&mut buffer) {
                eprintln!("Error reading stdin: {}", e);
                std::process::exit(1);
            }
            buffer
        }
    };

    if let Err(message) = check_len(&source, limits.max_len) {
        eprintln!("{}", message);
        std::process::exit(1);
    }
    source
}

fn check_len(source: &str, max_len: usize) -> Result<(), String> {
    if source.len() > max_len {
        Err(format!(
            "Query is {} bytes, longer than the limit of {} (see --max-len)",
            source.len(),
            max_len
        ))
    } else {
        Ok(())
    }
}

fn cmd_parse(source: &str, pretty: bool, limits: Limits) {
    match limits.parse(source) {
        Ok(expr) => {
            let json = if pretty {
                serde_json::to_string_pretty(&expr)
            } else {
                serde_json::to_string(&expr)
            };
            match json {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    eprintln!("Error serializing AST: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Err(e) => {
            report_error(source, &e);
            std::process::exit(1);
        }
    }
}

fn cmd_tokens(source: &str) {
    for result in Lexer::new(source) {
        match result {
            Ok(token) => println!(
                "{}:{}\t{}\t{}",
                token.position.line,
                token.position.column,
                token.kind.name(),
                token.text(source)
            ),
            Err(e) => {
                report_error(source, &Error::Lex(e));
                std::process::exit(1);
            }
        }
    }
}

fn cmd_check(queries: &[String], limits: Limits) {
    let mut all_ok = true;

    for source in queries {
        if let Err(message) = check_len(source, limits.max_len) {
            eprintln!("✗ {}", message);
            all_ok = false;
            continue;
        }

        match limits.parse(source) {
            Ok(expr) => println!("✓ {}", expr.to_query()),
            Err(e) => {
                report_error(source, &e);
                all_ok = false;
            }
        }
    }

    if !all_ok {
        std::process::exit(1);
    }
}

fn cmd_complete(source: &str, cursor: Option<usize>) {
    let context = completion_context(source, cursor.unwrap_or(source.len()));
    match serde_json::to_string(&context) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing completion context: {}", e);
            std::process::exit(1);
        }
    }
}

fn cmd_repl(limits: Limits) {
    use rustyline::DefaultEditor;

    println!("FilterQL REPL v{}", env!("CARGO_PKG_VERSION"));
    println!("Type a query to parse it, :help for help, :quit to exit");
    println!();

    let mut rl = match DefaultEditor::new() {
        Ok(rl) => rl,
        Err(e) => {
            eprintln!("Failed to create REPL: {}", e);
            std::process::exit(1);
        }
    };

    loop {
        let readline = rl.readline("filterql> ");
        match readline {
            Ok(line) => {
                let _ = rl.add_history_entry(&line);
                let trimmed = line.trim();

                if trimmed.starts_with(':') {
                    match trimmed {
                        ":quit" | ":q" => break,
                        ":help" | ":h" => {
                            println!("Commands:");
                            println!("  <query>          - Parse and show the AST");
                            println!("  :tokens <query>  - Show the token stream");
                            println!("  :quit            - Exit REPL");
                        }
                        cmd if cmd.starts_with(":tokens ") => {
                            cmd_tokens_lenient(cmd[":tokens ".len()..].trim());
                        }
                        _ => {
                            println!("Unknown command. Type :help for help.");
                        }
                    }
                } else if !trimmed.is_empty() {
                    if let Err(message) = check_len(trimmed, limits.max_len) {
                        eprintln!("{}", message);
                        continue;
                    }
                    match limits.parse(trimmed) {
                        Ok(expr) => match serde_json::to_string_pretty(&expr) {
                            Ok(json) => {
                                println!("{}", expr.to_query());
                                println!("{}", json);
                            }
                            Err(e) => eprintln!("Error serializing AST: {}", e),
                        },
                        Err(e) => report_error(trimmed, &e),
                    }
                }
            }
            Err(_) => break,
        }
    }

    println!("Goodbye!");
}

/// Token dump that keeps the REPL alive on lexical errors
fn cmd_tokens_lenient(source: &str) {
    for result in Lexer::new(source) {
        match result {
            Ok(token) => println!(
                "  {}:{}\t{}\t{}",
                token.position.line,
                token.position.column,
                token.kind.name(),
                token.text(source)
            ),
            Err(e) => report_error(source, &Error::Lex(e)),
        }
    }
}

fn report_error(source: &str, error: &Error) {
    let result = build_report(error, source.len(), true)
        .eprint((QUERY_ID.to_string(), Source::from(source)));

    if result.is_err() {
        eprintln!("{}", error);
    }
}

/// Caret diagnostic for `error`; spans are byte offsets into the query
fn build_report(
    error: &Error,
    source_len: usize,
    color: bool,
) -> Report<'static, (String, Range<usize>)> {
    // End-of-input errors carry no span; point just past the text instead
    let span = error
        .span()
        .map(|s| s.range())
        .unwrap_or(source_len..source_len);
    let label = match error.position() {
        Some(position) => format!("{} ({})", error.message(), position),
        None => error.message(),
    };

    let id = QUERY_ID.to_string();
    Report::build(ReportKind::Error, id.clone(), span.start)
        .with_config(
            Config::default()
                .with_index_type(IndexType::Byte)
                .with_color(color),
        )
        .with_message(error.to_string())
        .with_label(
            Label::new((id, span))
                .with_message(label)
                .with_color(Color::Red),
        )
        .finish()
}
