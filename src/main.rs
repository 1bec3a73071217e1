use clap::Parser as ClapParser;
use std::io::{self, BufRead};

use varsift::{JsonRecord, compile, run};

#[derive(ClapParser)]
#[command(name = "varsift")]
#[command(about = "Filter JSON-lines variant records with a filter expression")]
#[command(version)]
struct Cli {
    /// The filter expression, e.g. "(DP > 10) && (FILTER = 'PASS')"
    expression: String,

    /// Read records from a file instead of stdin
    #[arg(short, long)]
    input: Option<String>,

    /// Only validate the expression, don't read any records
    #[arg(long)]
    syntax_only: bool,

    /// Keep the records the expression rejects instead
    #[arg(short = 'v', long)]
    invert: bool,
}

fn main() {
    let cli = Cli::parse();

    let compiled = match compile(&cli.expression) {
        Ok(compiled) => compiled,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    if cli.syntax_only {
        println!("Syntax is valid");
        return;
    }

    let input = match read_input(cli.input.as_deref()) {
        Ok(input) => input,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    let mut failed = 0usize;
    for (line_no, line) in input.lines().enumerate() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                eprintln!("{}", e);
                std::process::exit(1);
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        let json: serde_json::Value = match serde_json::from_str(&line) {
            Ok(json) => json,
            Err(e) => {
                eprintln!("line {}: invalid JSON: {}", line_no + 1, e);
                failed += 1;
                continue;
            }
        };
        let record = JsonRecord::new(json);
        match run(&compiled, &record) {
            Ok(value) => {
                if value.as_bool() != cli.invert {
                    println!("{}", line);
                }
            }
            Err(e) => {
                // evaluation errors are per-record: report and keep filtering
                eprintln!("line {}: {}", line_no + 1, e);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        std::process::exit(1);
    }
}

fn read_input(path: Option<&str>) -> io::Result<Box<dyn BufRead>> {
    match path {
        Some(path) => {
            let file = std::fs::File::open(path)?;
            Ok(Box::new(io::BufReader::new(file)))
        }
        None => {
            if atty::is(atty::Stream::Stdin) {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "no input: pipe JSON-lines records to stdin or pass --input",
                ));
            }
            Ok(Box::new(io::BufReader::new(io::stdin())))
        }
    }
}
