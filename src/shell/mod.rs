use anyhow::Result;
use std::io::{self, BufRead, Write};

use crate::backend::analysis::BookAnalyzer;
use crate::backend::record::Genre;

/// Runs the interactive menu over stdin/stdout until the user exits.
pub fn run<A: BookAnalyzer>(analyzer: &A) -> Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    run_loop(analyzer, &mut stdin.lock(), &mut stdout.lock())
}

/// The menu loop itself, generic over its streams so tests can drive it
/// with in-memory buffers and a fake analyzer.
pub fn run_loop<A: BookAnalyzer>(
    analyzer: &A,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<()> {
    print_menu(out)?;

    loop {
        write!(out, "Enter your choice (1-9, or 0 to exit): ")?;
        out.flush()?;

        let Some(line) = read_line(input)? else { break };

        match line.trim() {
            "0" => {
                writeln!(out, "Thank you for using the Book Analysis System!")?;
                break;
            }
            "1" => count_by_author(analyzer, input, out)?,
            "2" => display_all_authors(analyzer, out)?,
            "3" => titles_by_author(analyzer, input, out)?,
            "4" => books_by_rating(analyzer, input, out)?,
            "5" => prices_by_author(analyzer, input, out)?,
            "6" => books_by_genre(analyzer, input, out)?,
            "7" => books_by_price_range(analyzer, input, out)?,
            "8" => top_rated(analyzer, input, out)?,
            "9" => writeln!(out, "{}", analyzer.statistics())?,
            _ => writeln!(out, "Invalid choice. Please select 1-9 or 0 to exit.")?,
        }

        writeln!(out, "\n{}\n", "=".repeat(50))?;
    }

    Ok(())
}

fn print_menu(out: &mut impl Write) -> Result<()> {
    writeln!(out, "Available Operations:")?;
    writeln!(out, "1. Get total number of books by an author")?;
    writeln!(out, "2. Display all authors in the dataset")?;
    writeln!(out, "3. Get all books by an author")?;
    writeln!(out, "4. Find books by user rating")?;
    writeln!(out, "5. Get book prices by author")?;
    writeln!(out, "6. Find books by genre")?;
    writeln!(out, "7. Find books in a price range")?;
    writeln!(out, "8. Show top rated books")?;
    writeln!(out, "9. Display dataset statistics")?;
    writeln!(out, "0. Exit")?;
    writeln!(out, "{}", "-".repeat(50))?;
    Ok(())
}

/// Returns `None` at EOF; otherwise the line with its newline stripped.
fn read_line(input: &mut impl BufRead) -> Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        Ok(None)
    } else {
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

fn prompt(input: &mut impl BufRead, out: &mut impl Write, msg: &str) -> Result<Option<String>> {
    write!(out, "{}", msg)?;
    out.flush()?;
    read_line(input)
}

fn prompt_author(
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<Option<String>> {
    let Some(author) = prompt(input, out, "Enter author name: ")? else {
        return Ok(None);
    };
    let author = author.trim().to_string();
    if author.is_empty() {
        writeln!(out, "Author name cannot be empty.")?;
        return Ok(None);
    }
    Ok(Some(author))
}

fn count_by_author<A: BookAnalyzer>(
    analyzer: &A,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<()> {
    let Some(author) = prompt_author(input, out)? else {
        return Ok(());
    };
    let total = analyzer.count_by_author(&author);
    if total == 0 {
        writeln!(out, "No books found for author: {}", author)?;
    } else {
        writeln!(out, "Total books by {}: {}", author, total)?;
    }
    Ok(())
}

fn display_all_authors<A: BookAnalyzer>(analyzer: &A, out: &mut impl Write) -> Result<()> {
    let authors = analyzer.all_authors();
    writeln!(out, "All authors in the dataset ({} total):", authors.len())?;
    writeln!(out, "{}", "-".repeat(40))?;
    for (i, author) in authors.iter().enumerate() {
        writeln!(out, "{}. {}", i + 1, author)?;
    }
    Ok(())
}

fn titles_by_author<A: BookAnalyzer>(
    analyzer: &A,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<()> {
    let Some(author) = prompt_author(input, out)? else {
        return Ok(());
    };
    let titles = analyzer.titles_by_author(&author);
    if titles.is_empty() {
        writeln!(out, "No books found for author: {}", author)?;
    } else {
        writeln!(out, "Books by {} ({} total):", author, titles.len())?;
        writeln!(out, "{}", "-".repeat(40))?;
        for (i, title) in titles.iter().enumerate() {
            writeln!(out, "{}. {}", i + 1, title)?;
        }
    }
    Ok(())
}

fn books_by_rating<A: BookAnalyzer>(
    analyzer: &A,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<()> {
    let Some(raw) = prompt(input, out, "Enter user rating (e.g., 4.7): ")? else {
        return Ok(());
    };
    let Ok(rating) = raw.trim().parse::<f32>() else {
        writeln!(out, "Invalid rating format. Please enter a decimal number.")?;
        return Ok(());
    };
    let books = analyzer.books_by_rating(rating);
    if books.is_empty() {
        writeln!(out, "No books found with rating: {}", rating)?;
    } else {
        writeln!(out, "Books with rating {} ({} total):", rating, books.len())?;
        writeln!(out, "{}", "-".repeat(60))?;
        for book in books {
            writeln!(out, "* {} by {}", book.title, book.author)?;
        }
    }
    Ok(())
}

fn prices_by_author<A: BookAnalyzer>(
    analyzer: &A,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<()> {
    let Some(author) = prompt_author(input, out)? else {
        return Ok(());
    };
    let prices = analyzer.prices_by_author(&author);
    if prices.is_empty() {
        writeln!(out, "No books found for author: {}", author)?;
    } else {
        writeln!(out, "Books and prices by {}:", author)?;
        writeln!(out, "{}", "-".repeat(50))?;
        for priced in prices {
            writeln!(out, "* {}", priced)?;
        }
    }
    Ok(())
}

fn books_by_genre<A: BookAnalyzer>(
    analyzer: &A,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<()> {
    let Some(raw) = prompt(input, out, "Enter genre (Fiction / Non Fiction): ")? else {
        return Ok(());
    };
    let genre = Genre::parse(&raw);
    let books = analyzer.books_by_genre(genre);
    if books.is_empty() {
        writeln!(out, "No books found for genre: {}", raw.trim())?;
    } else {
        writeln!(out, "Books in genre ({} total):", books.len())?;
        writeln!(out, "{}", "-".repeat(60))?;
        for book in books {
            writeln!(out, "* {}", book)?;
        }
    }
    Ok(())
}

fn books_by_price_range<A: BookAnalyzer>(
    analyzer: &A,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<()> {
    let Some(min_raw) = prompt(input, out, "Enter minimum price: ")? else {
        return Ok(());
    };
    let Some(max_raw) = prompt(input, out, "Enter maximum price: ")? else {
        return Ok(());
    };
    let (Ok(min), Ok(max)) = (min_raw.trim().parse::<i64>(), max_raw.trim().parse::<i64>())
    else {
        writeln!(out, "Invalid price format. Please enter whole numbers.")?;
        return Ok(());
    };
    let books = analyzer.books_by_price_range(min, max);
    if books.is_empty() {
        writeln!(out, "No books found in price range ${} - ${}.", min, max)?;
    } else {
        writeln!(
            out,
            "Books priced ${} - ${} ({} total):",
            min,
            max,
            books.len()
        )?;
        writeln!(out, "{}", "-".repeat(60))?;
        for book in books {
            writeln!(out, "* {}", book)?;
        }
    }
    Ok(())
}

fn top_rated<A: BookAnalyzer>(
    analyzer: &A,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<()> {
    let Some(raw) = prompt(input, out, "Enter minimum rating (e.g., 4.5): ")? else {
        return Ok(());
    };
    let Ok(threshold) = raw.trim().parse::<f32>() else {
        writeln!(out, "Invalid rating format. Please enter a decimal number.")?;
        return Ok(());
    };
    let books = analyzer.top_rated(threshold);
    if books.is_empty() {
        writeln!(out, "No books rated {} or higher.", threshold)?;
    } else {
        writeln!(
            out,
            "Books rated {} or higher ({} total):",
            threshold,
            books.len()
        )?;
        writeln!(out, "{}", "-".repeat(60))?;
        for book in books {
            writeln!(out, "* {}", book)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::record::{Book, PricedTitle};
    use std::io::Cursor;

    /// Implements only the required capability set; the defaulted
    /// extensions fall back to their empty bodies.
    struct FakeAnalyzer;

    impl BookAnalyzer for FakeAnalyzer {
        fn count_by_author(&self, author: &str) -> usize {
            if author.eq_ignore_ascii_case("jane doe") { 2 } else { 0 }
        }

        fn all_authors(&self) -> Vec<String> {
            vec!["Ann Poe".to_string(), "Jane Doe".to_string()]
        }

        fn titles_by_author(&self, _author: &str) -> Vec<String> {
            vec!["Alpha".to_string()]
        }

        fn books_by_rating(&self, _rating: f32) -> Vec<&Book> {
            Vec::new()
        }

        fn prices_by_author(&self, _author: &str) -> Vec<PricedTitle> {
            Vec::new()
        }
    }

    fn run_session(script: &str) -> String {
        let mut input = Cursor::new(script.to_string());
        let mut out = Vec::new();
        run_loop(&FakeAnalyzer, &mut input, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_exit_immediately() {
        let out = run_session("0\n");
        assert!(out.contains("Available Operations:"));
        assert!(out.contains("Thank you for using the Book Analysis System!"));
    }

    #[test]
    fn test_eof_ends_loop() {
        let out = run_session("");
        assert!(out.contains("Enter your choice"));
    }

    #[test]
    fn test_count_by_author_flow() {
        let out = run_session("1\nJANE DOE\n0\n");
        assert!(out.contains("Total books by JANE DOE: 2"));
    }

    #[test]
    fn test_empty_author_is_rejected() {
        let out = run_session("1\n   \n0\n");
        assert!(out.contains("Author name cannot be empty."));
    }

    #[test]
    fn test_all_authors_listing() {
        let out = run_session("2\n0\n");
        assert!(out.contains("All authors in the dataset (2 total):"));
        assert!(out.contains("1. Ann Poe"));
        assert!(out.contains("2. Jane Doe"));
    }

    #[test]
    fn test_invalid_rating_input() {
        let out = run_session("4\nnot-a-number\n0\n");
        assert!(out.contains("Invalid rating format."));
    }

    #[test]
    fn test_defaulted_extension_reports_empty() {
        // FakeAnalyzer relies on the default top_rated body.
        let out = run_session("8\n4.0\n0\n");
        assert!(out.contains("No books rated 4 or higher."));
    }

    #[test]
    fn test_invalid_choice() {
        let out = run_session("42\n0\n");
        assert!(out.contains("Invalid choice."));
    }
}
