use rand::seq::SliceRandom;
use rand::Rng;
use std::path::Path;

use crate::error::ConfigError;

const DEFAULT_WORDS: &[&str] = &[
    "SOS", "CODE", "JAVA", "TEST", "LEARN", "MORSE", "TRAINER", "PROGRAM", "CAT", "HAT", "THE",
    "QUICK", "BROWN", "FOX", "JUMPED", "OVER", "THE", "LAZY", "DOG", "1", "2", "3", "4", "5",
    "6", "7", "8", "9", "0",
];

/// Candidate target words. Never empty.
#[derive(Clone, Debug)]
pub struct TargetWords {
    words: Vec<String>,
}

impl TargetWords {
    pub fn new<I, S>(words: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let words: Vec<String> = words.into_iter().map(Into::into).collect();
        if words.is_empty() {
            return Err(ConfigError::EmptyWordList);
        }
        Ok(Self { words })
    }

    /// Built-in list used when no word file is configured
    pub fn default_list() -> Self {
        Self {
            words: DEFAULT_WORDS.iter().map(|w| w.to_string()).collect(),
        }
    }

    /// Load words from a file
    ///
    /// Supported formats:
    /// - One word per line, upper-cased on load
    /// - Lines starting with # are comments
    /// - Empty lines are ignored
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        let words: Vec<String> = content
            .lines()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(|line| line.to_uppercase())
            .collect();

        Self::new(words)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Pick a word uniformly at random. Repeats are allowed.
    pub fn random<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        self.words
            .choose(rng)
            .map(String::as_str)
            // Construction guarantees at least one word
            .unwrap_or_default()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.iter().any(|w| w == word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use std::io::Write;

    #[test]
    fn test_rejects_empty_list() {
        let empty: Vec<String> = Vec::new();
        assert_eq!(TargetWords::new(empty).unwrap_err(), ConfigError::EmptyWordList);
    }

    #[test]
    fn test_random_draws_from_list() {
        let words = TargetWords::default_list();
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..200 {
            let word = words.random(&mut rng).to_string();
            assert!(words.contains(&word));
        }
    }

    #[test]
    fn test_random_covers_small_list() {
        let words = TargetWords::new(vec!["A", "B"]).unwrap();
        let mut rng = SmallRng::seed_from_u64(1);
        let drawn: Vec<String> = (0..100).map(|_| words.random(&mut rng).to_string()).collect();
        assert!(drawn.iter().any(|w| w == "A"));
        assert!(drawn.iter().any(|w| w == "B"));
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# practice words").unwrap();
        writeln!(file, "paris").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "  cq  ").unwrap();

        let words = TargetWords::load(file.path()).unwrap();
        assert_eq!(words.len(), 2);
        assert!(words.contains("PARIS"));
        assert!(words.contains("CQ"));
    }

    #[test]
    fn test_load_rejects_file_without_words() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# nothing here").unwrap();

        let err = TargetWords::load(file.path()).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(TargetWords::load(dir.path().join("missing.txt")).is_err());
    }
}
