pub mod table;

pub use table::MorseTable;

/// A single keyed Morse element
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Symbol {
    Dot,
    Dash,
}

impl Symbol {
    /// Parse the text form used in code strings
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '.' => Some(Symbol::Dot),
            '-' => Some(Symbol::Dash),
            _ => None,
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            Symbol::Dot => '.',
            Symbol::Dash => '-',
        }
    }
}

/// Convert a code string to symbols, skipping anything that isn't a dot or dash
pub fn parse_code(code: &str) -> Vec<Symbol> {
    code.chars().filter_map(Symbol::from_char).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_chars() {
        assert_eq!(Symbol::from_char('.'), Some(Symbol::Dot));
        assert_eq!(Symbol::from_char('-'), Some(Symbol::Dash));
        assert_eq!(Symbol::from_char('x'), None);
        assert_eq!(Symbol::Dot.as_char(), '.');
        assert_eq!(Symbol::Dash.as_char(), '-');
    }

    #[test]
    fn test_parse_code() {
        use Symbol::{Dash, Dot};
        assert_eq!(parse_code(".-"), vec![Dot, Dash]);
        assert_eq!(parse_code(". -x"), vec![Dot, Dash]);
        assert!(parse_code("").is_empty());
    }
}
