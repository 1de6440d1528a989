use std::collections::HashMap;

use crate::error::ConfigError;

/// International Morse code: letters, digits, ITU punctuation and a few prosigns
pub const STANDARD_CODES: &[(char, &str)] = &[
    ('A', ".-"),
    ('B', "-..."),
    ('C', "-.-."),
    ('D', "-.."),
    ('E', "."),
    ('F', "..-."),
    ('G', "--."),
    ('H', "...."),
    ('I', ".."),
    ('J', ".---"),
    ('K', "-.-"),
    ('L', ".-.."),
    ('M', "--"),
    ('N', "-."),
    ('O', "---"),
    ('P', ".--."),
    ('Q', "--.-"),
    ('R', ".-."),
    ('S', "..."),
    ('T', "-"),
    ('U', "..-"),
    ('V', "...-"),
    ('W', ".--"),
    ('X', "-..-"),
    ('Y', "-.--"),
    ('Z', "--.."),
    ('0', "-----"),
    ('1', ".----"),
    ('2', "..---"),
    ('3', "...--"),
    ('4', "....-"),
    ('5', "....."),
    ('6', "-...."),
    ('7', "--..."),
    ('8', "---.."),
    ('9', "----."),
    ('.', ".-.-.-"),
    (',', "--..--"),
    ('?', "..--.."),
    ('\'', ".----."),
    ('!', "-.-.--"),
    ('/', "-..-."),
    ('(', "-.--."),
    (')', "-.--.-"),
    ('&', ".-..."),
    (':', "---..."),
    (';', "-.-.-."),
    ('=', "-...-"),
    ('-', "-....-"),
    ('_', "..--.-"),
    ('$', "...-..-"),
    ('@', ".--.-."),
    // Prosigns: SOS and AS (wait)
    ('§', "...---..."),
    ('+', ".-.-."),
];

/// Bidirectional character <-> code mapping.
///
/// The inverse map is built once at construction, so a code string
/// resolves in constant time and never depends on entry order.
#[derive(Clone, Debug)]
pub struct MorseTable {
    entries: Vec<(char, String)>,
    by_code: HashMap<String, char>,
}

impl MorseTable {
    /// Build a table, rejecting empty tables, malformed codes and codes
    /// shared by two characters
    pub fn new<I, S>(entries: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (char, S)>,
        S: Into<String>,
    {
        let mut table = Self {
            entries: Vec::new(),
            by_code: HashMap::new(),
        };

        for (ch, code) in entries {
            let code = code.into();
            if code.is_empty() {
                return Err(ConfigError::EmptyCode(ch));
            }
            if !code.chars().all(|c| c == '.' || c == '-') {
                return Err(ConfigError::InvalidCode(ch, code));
            }
            if let Some(&first) = table.by_code.get(&code) {
                return Err(ConfigError::DuplicateCode {
                    code,
                    first,
                    second: ch,
                });
            }
            // A character listed twice keeps its first code
            if table.entries.iter().any(|(existing, _)| *existing == ch) {
                continue;
            }
            table.by_code.insert(code.clone(), ch);
            table.entries.push((ch, code));
        }

        if table.entries.is_empty() {
            return Err(ConfigError::EmptyTable);
        }

        Ok(table)
    }

    /// The built-in international table
    pub fn standard() -> Self {
        Self::new(STANDARD_CODES.iter().copied())
            .expect("built-in morse table is well formed")
    }

    /// Resolve a code string to its character. An empty code never matches.
    pub fn lookup(&self, code: &str) -> Option<char> {
        if code.is_empty() {
            return None;
        }
        self.by_code.get(code).copied()
    }

    /// Code for a character (case-insensitive for letters)
    pub fn code_for(&self, ch: char) -> Option<&str> {
        let upper = ch.to_ascii_uppercase();
        self.entries
            .iter()
            .find(|(c, _)| *c == upper)
            .map(|(_, code)| code.as_str())
    }

    /// All entries sorted by character, for the reference sheet
    pub fn sorted_entries(&self) -> Vec<(char, &str)> {
        let mut sorted: Vec<(char, &str)> = self
            .entries
            .iter()
            .map(|(c, code)| (*c, code.as_str()))
            .collect();
        sorted.sort_by_key(|(c, _)| *c);
        sorted
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_standard_table_is_injective() {
        let mut seen = HashSet::new();
        for (ch, code) in STANDARD_CODES {
            assert!(seen.insert(*code), "code {} reused by {}", code, ch);
        }
        assert_eq!(MorseTable::standard().len(), STANDARD_CODES.len());
    }

    #[test]
    fn test_reverse_lookup_matches_every_entry() {
        let table = MorseTable::standard();
        for (ch, code) in STANDARD_CODES {
            assert_eq!(table.lookup(code), Some(*ch));
            assert_eq!(table.code_for(*ch), Some(*code));
        }
    }

    #[test]
    fn test_lookup_empty_and_unknown() {
        let table = MorseTable::standard();
        assert_eq!(table.lookup(""), None);
        assert_eq!(table.lookup("........"), None);
        assert_eq!(table.lookup("abc"), None);
    }

    #[test]
    fn test_code_for_lowercase() {
        let table = MorseTable::standard();
        assert_eq!(table.code_for('s'), Some("..."));
        assert_eq!(table.code_for('~'), None);
    }

    #[test]
    fn test_rejects_duplicate_code() {
        let err = MorseTable::new(vec![('S', "..."), ('Z', "...")]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::DuplicateCode {
                code: "...".to_string(),
                first: 'S',
                second: 'Z',
            }
        );
    }

    #[test]
    fn test_rejects_empty_and_malformed() {
        let empty: Vec<(char, &str)> = Vec::new();
        assert_eq!(MorseTable::new(empty).unwrap_err(), ConfigError::EmptyTable);
        assert_eq!(
            MorseTable::new(vec![('E', "")]).unwrap_err(),
            ConfigError::EmptyCode('E')
        );
        assert!(matches!(
            MorseTable::new(vec![('E', ".x")]),
            Err(ConfigError::InvalidCode('E', _))
        ));
    }

    #[test]
    fn test_sorted_entries() {
        let table = MorseTable::new(vec![('T', "-"), ('E', "."), ('A', ".-")]).unwrap();
        let sorted = table.sorted_entries();
        assert_eq!(sorted, vec![('A', ".-"), ('E', "."), ('T', "-")]);
    }
}
