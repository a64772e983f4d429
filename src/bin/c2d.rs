//! chat2docx CLI - convert assistant Markdown into a Word document

#[cfg(feature = "cli")]
use clap::{Parser, ValueEnum};
#[cfg(feature = "cli")]
use std::fs;
#[cfg(feature = "cli")]
use std::io::{self, Read};
#[cfg(feature = "cli")]
use chat2docx::{generate_docx, AiSource, GenerateOptions, OUTPUT_FILE_NAME};

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "c2d")]
#[command(version)]
#[command(about = "Convert AI-assistant Markdown with LaTeX math into a Word document", long_about = None)]
struct Cli {
    /// Input Markdown file (reads from stdin if not provided)
    input_file: Option<String>,

    /// Output file path
    #[arg(short, long, default_value = OUTPUT_FILE_NAME)]
    output: String,

    /// Which assistant the Markdown was copied from
    #[arg(short, long, value_enum, default_value_t = Source::Gemini)]
    source: Source,

    /// Convert runs of CSV/TSV lines into tables
    #[arg(long)]
    csv_tables: bool,
}

#[cfg(feature = "cli")]
#[derive(Clone, Copy, ValueEnum)]
enum Source {
    /// Google Gemini output
    Gemini,
    /// OpenAI ChatGPT output
    Chatgpt,
}

#[cfg(feature = "cli")]
impl From<Source> for AiSource {
    fn from(source: Source) -> Self {
        match source {
            Source::Gemini => AiSource::Gemini,
            Source::Chatgpt => AiSource::ChatGpt,
        }
    }
}

#[cfg(feature = "cli")]
fn main() -> io::Result<()> {
    let cli = Cli::parse();

    let input = match cli.input_file {
        Some(ref path) => fs::read_to_string(path)?,
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    let options = GenerateOptions {
        source: cli.source.into(),
        csv_tables: cli.csv_tables,
    };

    match generate_docx(&input, &options) {
        Ok(bytes) => {
            fs::write(&cli.output, bytes)?;
            eprintln!("✓ Output written to: {}", cli.output);
            Ok(())
        }
        Err(err) => {
            eprintln!("✗ {}", err);
            std::process::exit(1);
        }
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Build with --features cli");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  cargo install chat2docx --features cli");
    eprintln!("  c2d [OPTIONS] [INPUT_FILE]");
}
