use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of dataset categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Genre {
    Fiction,
    NonFiction,
}

impl Genre {
    pub fn all() -> &'static [Genre] {
        &[Genre::Fiction, Genre::NonFiction]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Genre::Fiction => "Fiction",
            Genre::NonFiction => "Non Fiction",
        }
    }

    /// Parses a genre label from free text. Case-insensitive; spaces and
    /// underscores are ignored, so "non fiction", "nonfiction" and
    /// "non_fiction" all map to `NonFiction`. Anything else is rejected.
    pub fn parse(s: &str) -> Option<Genre> {
        let normalized: String = s
            .trim()
            .to_ascii_lowercase()
            .chars()
            .filter(|c| *c != ' ' && *c != '_')
            .collect();

        match normalized.as_str() {
            "fiction" => Some(Genre::Fiction),
            "nonfiction" => Some(Genre::NonFiction),
            _ => None,
        }
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One parsed row of the dataset. Fields are set at load time and never
/// mutated afterwards; the analysis layer only reads and copies.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub title: String,
    pub author: String,
    pub rating: f32,
    pub reviews: u64,
    pub price: i64,
    pub year: i32,
    pub genre: Genre,
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} by {} ({:.2}/5) ({} reviews) ${} in {} ({})",
            self.title, self.author, self.rating, self.reviews, self.price, self.year, self.genre
        )
    }
}

/// Title/price projection returned by the prices-by-author query.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PricedTitle {
    pub title: String,
    pub price: i64,
}

impl fmt::Display for PricedTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Book: {}, Price: ${}", self.title, self.price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genre_aliases() {
        assert_eq!(Genre::parse("fiction"), Some(Genre::Fiction));
        assert_eq!(Genre::parse("Fiction"), Some(Genre::Fiction));
        assert_eq!(Genre::parse("non fiction"), Some(Genre::NonFiction));
        assert_eq!(Genre::parse("nonfiction"), Some(Genre::NonFiction));
        assert_eq!(Genre::parse("non_fiction"), Some(Genre::NonFiction));
        assert_eq!(Genre::parse("NON_FICTION"), Some(Genre::NonFiction));
        assert_eq!(Genre::parse("  Non Fiction  "), Some(Genre::NonFiction));
    }

    #[test]
    fn test_genre_rejects_unknown() {
        assert_eq!(Genre::parse("poetry"), None);
        assert_eq!(Genre::parse(""), None);
        assert_eq!(Genre::parse("fictional"), None);
    }

    #[test]
    fn test_book_display() {
        let book = Book {
            title: "The Title".to_string(),
            author: "A. Author".to_string(),
            rating: 4.5,
            reviews: 1200,
            price: 15,
            year: 2019,
            genre: Genre::NonFiction,
        };
        assert_eq!(
            book.to_string(),
            "The Title by A. Author (4.50/5) (1200 reviews) $15 in 2019 (Non Fiction)"
        );
    }
}
