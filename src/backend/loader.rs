use anyhow::{Context, Result, bail};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::parser::LineParser;
use super::record::{Book, Genre};

const FIELD_COUNT: usize = 7;

/// Loads the dataset from a CSV file. A file that cannot be opened or read
/// is a load-level failure; individual malformed lines are logged and
/// skipped without aborting the load.
pub fn load_books(path: &Path) -> Result<Vec<Book>> {
    let file = File::open(path).with_context(|| format!("Failed to open dataset: {:?}", path))?;
    load_from_reader(BufReader::new(file))
}

/// Reads lines from any buffered source. The first line is always treated
/// as a header and discarded without inspection.
pub fn load_from_reader(reader: impl BufRead) -> Result<Vec<Book>> {
    let mut books = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line.context("Failed to read dataset line")?;
        if index == 0 {
            continue;
        }
        match book_from_line(&line) {
            Ok(book) => books.push(book),
            Err(e) => eprintln!("Skipping line {}: {}", index + 1, e),
        }
    }

    Ok(books)
}

/// Converts a single data line into a `Book`. Any deviation (field count,
/// numeric parse, unknown genre) rejects the whole line.
fn book_from_line(line: &str) -> Result<Book> {
    let fields = LineParser::split(line);
    if fields.len() != FIELD_COUNT {
        bail!("expected {} fields, got {}", FIELD_COUNT, fields.len());
    }

    let rating: f32 = fields[2]
        .trim()
        .parse()
        .with_context(|| format!("invalid rating {:?}", fields[2].trim()))?;
    let reviews: u64 = fields[3]
        .trim()
        .parse()
        .with_context(|| format!("invalid review count {:?}", fields[3].trim()))?;
    let price: i64 = fields[4]
        .trim()
        .parse()
        .with_context(|| format!("invalid price {:?}", fields[4].trim()))?;
    let year: i32 = fields[5]
        .trim()
        .parse()
        .with_context(|| format!("invalid year {:?}", fields[5].trim()))?;
    let genre = Genre::parse(&fields[6])
        .with_context(|| format!("unknown genre {:?}", fields[6].trim()))?;

    Ok(Book {
        title: fields[0].trim().to_string(),
        author: fields[1].trim().to_string(),
        rating,
        reviews,
        price,
        year,
        genre,
    })
}
