use std::path::PathBuf;
use std::process::ExitCode;

use actions_expr::config::ContextSource;
use actions_expr::Engine;
use anyhow::Context as _;
use clap::{Parser, Subcommand};
use dotenv::dotenv;

#[derive(Parser, Debug)]
#[command(author, version, about = "An actions expression parser", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the passed in expression
    Run {
        /// The expression to evaluate
        expression: String,

        /// JSON formatted context
        #[arg(short, long)]
        context: Option<String>,

        /// Path to a JSON or YAML context file
        #[arg(long)]
        context_file: Option<PathBuf>,
    },
    /// Print the tokens of an expression
    Tokens {
        /// The expression to tokenize
        expression: String,
    },
    /// Print the syntax tree of an expression
    Parse {
        /// The expression to parse
        expression: String,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    dotenv().ok();
    env_logger::init();

    let args = Args::parse();
    let engine = Engine::new();

    match args.command {
        Commands::Run {
            expression,
            context,
            context_file,
        } => {
            println!("Running:  {}", expression);

            let source = ContextSource::resolve(context, context_file);
            log::debug!("Context source: {:?}", source);
            let ctx = source.load().context("Failed to load context")?;
            if !source.is_empty() {
                println!("Including context {}", ctx.to_json());
            }

            match engine.evaluate(&expression, &ctx) {
                Ok(output) => {
                    println!("Output:   {}", output);
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => {
                    println!("An error occurred: {}", e);
                    println!("Output:   null");
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        Commands::Tokens { expression } => match engine.tokenize(&expression) {
            Ok(tokens) => {
                for token in tokens {
                    println!("{:>4}  {:<16} {}", token.position, token.kind, token.text);
                }
                Ok(ExitCode::SUCCESS)
            }
            Err(e) => {
                println!("An error occurred: {}", e);
                Ok(ExitCode::FAILURE)
            }
        },
        Commands::Parse { expression } => match engine.parse(&expression) {
            Ok(expr) => {
                println!("{:#?}", expr);
                Ok(ExitCode::SUCCESS)
            }
            Err(e) => {
                println!("An error occurred: {}", e);
                Ok(ExitCode::FAILURE)
            }
        },
    }
}
