use clap::{Args, Parser as ClapParser, Subcommand};
use sift_lang::{
    CompileOptions,
    cli::{
        self, CheckOptions, CheckResult, CliError, FilterOptions, TranslateOptions,
    },
};
use std::io::{self, Read};

#[derive(ClapParser)]
#[command(name = "sift")]
#[command(about = "Sift - A predicate language for filtering nested JSON records")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that a query parses and is a valid filter
    Check {
        /// The query to check
        query: String,

        /// Only validate syntax
        #[arg(long)]
        syntax_only: bool,
    },

    /// Print the canonical, fully parenthesised form of a query
    Parse {
        /// The query to parse
        query: String,
    },

    /// Print the records that match a query
    Filter {
        /// The query to run
        query: String,

        /// JSON input: an array, an object or JSON lines (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,

        #[command(flatten)]
        matching: MatchArgs,
    },

    /// Print the MongoDB-style filter document for a query
    Translate {
        /// The query to translate
        query: String,

        /// Lower-case strings and make patterns ignore case
        #[arg(short = 'c', long)]
        case_insensitive: bool,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,
    },
}

#[derive(Args)]
struct MatchArgs {
    /// Compare strings ignoring case
    #[arg(short = 'c', long)]
    case_insensitive: bool,

    /// Separator between the segments of a field path
    #[arg(long, default_value = ".")]
    separator: String,

    /// Treat every field path as a single key
    #[arg(long)]
    flat_keys: bool,

    /// Fail when a field resolves to no value
    #[arg(long)]
    strict_keys: bool,

    /// Skip query validation
    #[arg(long)]
    no_validate: bool,
}

impl MatchArgs {
    fn compile_options(self) -> CompileOptions {
        CompileOptions {
            use_nested_keys: !self.flat_keys,
            key_separator: self.separator,
            case_sensitive: !self.case_insensitive,
            raise_on_missing_key: self.strict_keys,
            validate: !self.no_validate,
            ..CompileOptions::default()
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(tracing::Level::WARN.into())
                .with_env_var("SIFT_LOG")
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check { query, syntax_only } => run_check(query, syntax_only, false),
        Commands::Parse { query } => run_check(query, true, true),
        Commands::Filter {
            query,
            input,
            pretty,
            matching,
        } => run_filter(query, input, pretty, matching),
        Commands::Translate {
            query,
            case_insensitive,
            pretty,
        } => run_translate(query, case_insensitive, pretty),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run_check(query: String, syntax_only: bool, print_canonical: bool) -> Result<(), CliError> {
    let options = CheckOptions { query, syntax_only };

    match cli::execute_check(&options)? {
        CheckResult::Empty => println!("Query is empty"),
        CheckResult::Valid(canonical) if print_canonical => println!("{}", canonical),
        CheckResult::Valid(_) if syntax_only => println!("Syntax is valid"),
        CheckResult::Valid(_) => println!("Query is valid"),
    }
    Ok(())
}

fn run_filter(
    query: String,
    input: Option<String>,
    pretty: bool,
    matching: MatchArgs,
) -> Result<(), CliError> {
    let input = match input {
        Some(s) => Some(s),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Some(buffer)
        }
        None => None,
    };

    let options = FilterOptions {
        query,
        input,
        compile: matching.compile_options(),
    };

    let records = cli::execute_filter(&options)?;
    println!("{}", cli::render(&cli::records_to_json(&records), pretty)?);
    Ok(())
}

fn run_translate(query: String, case_insensitive: bool, pretty: bool) -> Result<(), CliError> {
    let options = TranslateOptions {
        query,
        case_insensitive,
    };
    let filter = cli::execute_translate(&options)?;
    println!("{}", cli::render(&serde_json::Value::Object(filter), pretty)?);
    Ok(())
}
