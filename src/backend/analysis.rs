use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

use super::record::{Book, Genre, PricedTitle};

/// Ratings within this distance of the queried value are considered a match.
/// Compensates for float representation, not a rounding rule.
const RATING_TOLERANCE: f32 = 0.01;

/// Aggregate snapshot of the loaded dataset. Averages are `None` when the
/// dataset is empty.
#[derive(Clone, Debug, Default, Serialize)]
pub struct DatasetStats {
    pub total_books: usize,
    pub total_authors: usize,
    pub books_per_genre: Vec<(Genre, usize)>,
    pub average_rating: Option<f64>,
    pub average_price: Option<f64>,
}

impl fmt::Display for DatasetStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Dataset Statistics ===")?;
        writeln!(f, "Total books: {}", self.total_books)?;
        writeln!(f, "Total authors: {}", self.total_authors)?;
        writeln!(f, "Books by genre:")?;
        for (genre, count) in &self.books_per_genre {
            writeln!(f, "  {}: {}", genre, count)?;
        }
        if let Some(avg) = self.average_rating {
            writeln!(f, "Average rating: {:.2}", avg)?;
        }
        if let Some(avg) = self.average_price {
            writeln!(f, "Average price: ${:.2}", avg)?;
        }
        write!(f, "==========================")
    }
}

/// Read-only query capabilities over the loaded dataset. The first five
/// operations are the required surface; the rest have empty default bodies
/// so a minimal provider (or a test fake) only has to supply the core.
pub trait BookAnalyzer {
    fn count_by_author(&self, author: &str) -> usize;
    fn all_authors(&self) -> Vec<String>;
    fn titles_by_author(&self, author: &str) -> Vec<String>;
    fn books_by_rating(&self, rating: f32) -> Vec<&Book>;
    fn prices_by_author(&self, author: &str) -> Vec<PricedTitle>;

    fn books_by_genre(&self, genre: Option<Genre>) -> Vec<&Book> {
        let _ = genre;
        Vec::new()
    }

    fn books_by_price_range(&self, min: i64, max: i64) -> Vec<&Book> {
        let _ = (min, max);
        Vec::new()
    }

    fn top_rated(&self, threshold: f32) -> Vec<&Book> {
        let _ = threshold;
        Vec::new()
    }

    fn statistics(&self) -> DatasetStats {
        DatasetStats::default()
    }
}

/// The concrete analyzer. Owns its snapshot of the dataset, so nothing
/// outside can mutate what queries observe.
pub struct BookService {
    books: Vec<Book>,
}

impl BookService {
    pub fn new(books: Vec<Book>) -> Self {
        Self { books }
    }

    pub fn total_books(&self) -> usize {
        self.books.len()
    }

    /// Case-insensitive match against a trimmed author query. An empty or
    /// whitespace-only query matches nothing.
    fn matching_author<'a>(&'a self, author: &'a str) -> impl Iterator<Item = &'a Book> {
        let needle = author.trim();
        self.books
            .iter()
            .filter(move |b| !needle.is_empty() && b.author.eq_ignore_ascii_case(needle))
    }
}

impl BookAnalyzer for BookService {
    fn count_by_author(&self, author: &str) -> usize {
        self.matching_author(author).count()
    }

    fn all_authors(&self) -> Vec<String> {
        let distinct: BTreeSet<&str> = self.books.iter().map(|b| b.author.as_str()).collect();
        distinct.into_iter().map(String::from).collect()
    }

    fn titles_by_author(&self, author: &str) -> Vec<String> {
        self.matching_author(author)
            .map(|b| b.title.clone())
            .collect()
    }

    fn books_by_rating(&self, rating: f32) -> Vec<&Book> {
        self.books
            .iter()
            .filter(|b| (b.rating - rating).abs() < RATING_TOLERANCE)
            .collect()
    }

    fn prices_by_author(&self, author: &str) -> Vec<PricedTitle> {
        self.matching_author(author)
            .map(|b| PricedTitle {
                title: b.title.clone(),
                price: b.price,
            })
            .collect()
    }

    fn books_by_genre(&self, genre: Option<Genre>) -> Vec<&Book> {
        match genre {
            Some(genre) => self.books.iter().filter(|b| b.genre == genre).collect(),
            None => Vec::new(),
        }
    }

    fn books_by_price_range(&self, min: i64, max: i64) -> Vec<&Book> {
        self.books
            .iter()
            .filter(|b| b.price >= min && b.price <= max)
            .collect()
    }

    fn top_rated(&self, threshold: f32) -> Vec<&Book> {
        let mut hits: Vec<&Book> = self
            .books
            .iter()
            .filter(|b| b.rating >= threshold)
            .collect();
        // Stable sort keeps dataset order among equal ratings.
        hits.sort_by(|a, b| b.rating.total_cmp(&a.rating));
        hits
    }

    fn statistics(&self) -> DatasetStats {
        let total_books = self.books.len();
        let books_per_genre = Genre::all()
            .iter()
            .map(|&genre| {
                let count = self.books.iter().filter(|b| b.genre == genre).count();
                (genre, count)
            })
            .collect();

        let (average_rating, average_price) = if total_books == 0 {
            (None, None)
        } else {
            let n = total_books as f64;
            let rating_sum: f64 = self.books.iter().map(|b| b.rating as f64).sum();
            let price_sum: f64 = self.books.iter().map(|b| b.price as f64).sum();
            (Some(rating_sum / n), Some(price_sum / n))
        };

        DatasetStats {
            total_books,
            total_authors: self.all_authors().len(),
            books_per_genre,
            average_rating,
            average_price,
        }
    }
}
