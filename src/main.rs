use anyhow::{bail, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use record_converter::logging::init_logger;
use record_converter::{
    resolve_reader, resolve_reader_by_name, resolve_writer, resolve_writer_by_name, Converter,
    CsvGenerator, CsvParser, FileFormat, Generator, Parser as ParserTrait,
};

#[derive(clap::Parser, Debug)]
#[command(
    name = "record-converter",
    about = "Converts flat data between JSON, XML and CSV",
    after_help = "Only flat data is supported: nested objects or arrays cause an error."
)]
struct Args {
    /// Input file path (.json, .xml or .csv)
    #[arg(short, long)]
    input: PathBuf,

    /// Output file path (.json, .xml or .csv)
    #[arg(short, long)]
    output: PathBuf,

    /// Force the input format (json, xml or csv) instead of using the extension
    #[arg(long)]
    from: Option<String>,

    /// Force the output format (json, xml or csv) instead of using the extension
    #[arg(long)]
    to: Option<String>,

    /// Override delimiter detection for CSV input (e.g., ',', ';', '|')
    #[arg(short, long)]
    delimiter: Option<char>,

    /// Delimiter for CSV output (default: ',')
    #[arg(long)]
    output_delimiter: Option<char>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logger(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let parser = build_parser(args)?;
    let generator = build_generator(args)?;

    let summary = Converter::new(parser, generator).convert(&args.input, &args.output)?;

    println!(
        "Successfully converted '{}' to '{}' ({} records)",
        args.input.display(),
        args.output.display(),
        summary.records
    );
    Ok(())
}

fn build_parser(args: &Args) -> Result<Box<dyn ParserTrait>> {
    let parser = match &args.from {
        Some(name) => resolve_reader_by_name(name)?,
        None => resolve_reader(&args.input)?,
    };

    match args.delimiter {
        Some(delimiter) if parser.format() == FileFormat::Csv => {
            Ok(Box::new(CsvParser::with_delimiter(ascii_delimiter(delimiter)?)))
        }
        Some(_) => {
            tracing::warn!("--delimiter only applies to CSV input and is ignored");
            Ok(parser)
        }
        None => Ok(parser),
    }
}

fn build_generator(args: &Args) -> Result<Box<dyn Generator>> {
    let generator = match &args.to {
        Some(name) => resolve_writer_by_name(name)?,
        None => resolve_writer(&args.output)?,
    };

    match args.output_delimiter {
        Some(delimiter) if generator.format() == FileFormat::Csv => Ok(Box::new(
            CsvGenerator::with_delimiter(ascii_delimiter(delimiter)?),
        )),
        Some(_) => {
            tracing::warn!("--output-delimiter only applies to CSV output and is ignored");
            Ok(generator)
        }
        None => Ok(generator),
    }
}

fn ascii_delimiter(delimiter: char) -> Result<u8> {
    if !delimiter.is_ascii() {
        bail!("Error: Delimiter '{}' must be a single ASCII character", delimiter);
    }
    Ok(delimiter as u8)
}
