use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use lex::Lexer;
use pp::{AliasTable, Preprocessor};

#[derive(Parser, Debug)]
#[command(
    name = "wgslpp",
    about = "WGSL shader preprocessor — macros and conditional compilation",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Preprocess a shader file and print (or write) the result
    Process {
        /// Input WGSL file
        input: PathBuf,
        /// Output path (default: stdout)
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,
        /// Defines in the form NAME or NAME=VALUE
        #[arg(short = 'D', value_name = "NAME[=VALUE]")]
        define: Vec<String>,
        /// Directive prefix (default "///#"; use "#" for C-style lines)
        #[arg(long = "prefix", value_name = "PREFIX")]
        prefix: Option<String>,
    },
    /// Preprocess then lex a shader file and print the token stream
    Tokens {
        /// Input WGSL file
        input: PathBuf,
        /// Defines in the form NAME or NAME=VALUE
        #[arg(short = 'D', value_name = "NAME[=VALUE]")]
        define: Vec<String>,
        /// Directive prefix (default "///#")
        #[arg(long = "prefix", value_name = "PREFIX")]
        prefix: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Process {
            input,
            output,
            define,
            prefix,
        } => {
            let out = run_preprocess(&input, &define, prefix.as_deref())?;
            report_errors(&out.errors);
            match output {
                Some(path) => fs::write(&path, out.code)
                    .with_context(|| format!("failed to write {}", path.display()))?,
                None => println!("{}", out.code),
            }
            Ok(())
        }
        Commands::Tokens {
            input,
            define,
            prefix,
        } => {
            let out = run_preprocess(&input, &define, prefix.as_deref())?;
            report_errors(&out.errors);
            let lexed = Lexer::tokenize(&out.code);
            for e in &lexed.errors {
                eprintln!("error: {}:{}: {}", e.line, e.column, e.message);
            }
            for t in &lexed.tokens {
                println!("{:?} {}", t.kind, t.text);
            }
            Ok(())
        }
    }
}

fn run_preprocess(
    input: &PathBuf,
    defines: &[String],
    prefix: Option<&str>,
) -> Result<pp::PreprocessOutput> {
    let src = fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let alias = match prefix {
        Some(p) => AliasTable::with_prefix(p),
        None => AliasTable::default(),
    };
    // -D NAME[=VALUE] becomes a define line ahead of the source, so
    // command-line macros go through the normal registry build
    let mut prelude = String::new();
    for d in defines {
        let (name, value) = match d.split_once('=') {
            Some((n, v)) => (n, v),
            None => (d.as_str(), "1"),
        };
        prelude.push_str(&format!("{} {} {}\n", alias.define, name, value));
    }
    let pp = Preprocessor::with_alias(alias);
    Ok(pp.process(&format!("{prelude}{src}")))
}

fn report_errors(errors: &[pp::Diagnostic]) {
    // diagnostics never fail the run; code is always produced
    for e in errors {
        eprintln!("error: {}", e);
    }
}
