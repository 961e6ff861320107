use clap::{Parser as ClapParser, Subcommand};
use jsonql::cli::{self, CheckOptions, CheckResult, CliError, Mode};
use std::io::{self, Read};

#[derive(ClapParser)]
#[command(name = "jsonql")]
#[command(about = "jsonql - extract values from and filter JSON documents")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate an expression against a JSON document
    Query {
        /// The expression to evaluate
        expression: String,

        /// JSON input (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Keep the records of a JSON array for which the expression is true
    Filter {
        /// The predicate to evaluate per record
        expression: String,

        /// JSON input (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Only validate the expression's syntax
    Check {
        /// The expression to validate
        expression: String,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Query {
            expression,
            input,
            pretty,
        } => run(expression, input, pretty, Mode::Path),
        Commands::Filter {
            expression,
            input,
            pretty,
        } => run(expression, input, pretty, Mode::Filter),
        Commands::Check { expression } => run(expression, None, false, Mode::SyntaxOnly),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run(
    expression: String,
    input: Option<String>,
    pretty: bool,
    mode: Mode,
) -> Result<(), CliError> {
    let input = match input {
        Some(s) => Some(s),
        None if mode != Mode::SyntaxOnly && !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Some(buffer)
        }
        None => None,
    };

    let options = CheckOptions {
        expression,
        input,
        mode,
    };

    match cli::execute_check(&options)? {
        CheckResult::SyntaxValid => println!("Syntax is valid"),
        CheckResult::Success(output) => {
            let json = if pretty {
                serde_json::to_string_pretty(&output)
            } else {
                serde_json::to_string(&output)
            }
            .map_err(|e| CliError::Io(e.into()))?;
            println!("{}", json);
        }
    }
    Ok(())
}
