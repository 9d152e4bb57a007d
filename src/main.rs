pub mod backend;
pub mod shell;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use crate::backend::analysis::{BookAnalyzer, BookService};
use crate::backend::loader;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the bestsellers CSV dataset
    file: PathBuf,

    /// Print dataset statistics as JSON and exit
    #[arg(long)]
    stats_json: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let books = loader::load_books(&args.file)?;
    if books.is_empty() {
        eprintln!("No books loaded. Please check if {:?} exists and has data.", args.file);
        return Ok(());
    }

    let service = BookService::new(books);

    if args.stats_json {
        println!("{}", serde_json::to_string_pretty(&service.statistics())?);
        return Ok(());
    }

    println!("=== Bestselling Books Analysis ===\n");
    println!(
        "Successfully loaded {} books from dataset.\n",
        service.total_books()
    );

    shell::run(&service)
}
