pub struct LineParser;

impl LineParser {
    /// Splits one raw CSV line into fields, respecting double quotes.
    /// A quote toggles the quoted state and is stripped from the output;
    /// commas inside quotes are kept literally. The final buffer is always
    /// flushed, so an empty line yields a single empty field, and an
    /// unterminated quote still terminates cleanly.
    pub fn split(line: &str) -> Vec<String> {
        let mut fields = Vec::new();
        let mut buf = String::new();
        let mut in_quote = false;

        for c in line.chars() {
            match c {
                '"' => in_quote = !in_quote,
                ',' if !in_quote => fields.push(std::mem::take(&mut buf)),
                _ => buf.push(c),
            }
        }
        fields.push(buf);

        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_simple() {
        assert_eq!(LineParser::split("a,b,c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_split_quoted_comma() {
        assert_eq!(LineParser::split("a,\"b,c\",d"), vec!["a", "b,c", "d"]);
    }

    #[test]
    fn test_split_quoted_author_line() {
        let fields = LineParser::split("\"Smith, John\",Title A,4.5,100,10,2020,Fiction");
        assert_eq!(fields.len(), 7);
        assert_eq!(fields[0], "Smith, John");
        assert_eq!(fields[1], "Title A");
    }

    #[test]
    fn test_split_empty_line() {
        assert_eq!(LineParser::split(""), vec![""]);
    }

    #[test]
    fn test_split_trailing_comma() {
        assert_eq!(LineParser::split("a,b,"), vec!["a", "b", ""]);
    }

    #[test]
    fn test_split_unterminated_quote() {
        // Open quote at EOL is tolerated; the rest of the line lands in the
        // last field, commas included.
        assert_eq!(LineParser::split("a,\"b,c"), vec!["a", "b,c"]);
    }
}
