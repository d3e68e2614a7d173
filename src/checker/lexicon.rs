use crate::checker::normalize::normalize;
use crate::error::{Error, Result};
use fst::{Set, SetBuilder, Streamer};
use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

/// The set of known, correctly spelled word forms.
///
/// Backed by an FST set, so entries are unique and always visited in
/// byte-lexicographic order.
pub struct Lexicon {
    set: Set<Vec<u8>>,
}

impl Lexicon {
    /// Build an in-memory lexicon. Every word is normalized first; empty
    /// strings are dropped.
    pub fn from_words<I, S>(words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let sorted: BTreeSet<String> = words
            .into_iter()
            .map(|w| normalize(w.as_ref()))
            .filter(|w| !w.is_empty())
            .collect();

        let set = Set::from_iter(sorted.iter())?;
        Ok(Self { set })
    }

    /// Load a lexicon file written by [`Lexicon::save`].
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).map_err(|e| Error::io(path, e))?;
        let set = Set::new(bytes)?;
        log::info!("Loaded lexicon {} ({} entries)", path.display(), set.len());
        Ok(Self { set })
    }

    pub fn save(&self, output_path: &Path) -> Result<()> {
        let file = File::create(output_path).map_err(|e| Error::io(output_path, e))?;
        let writer = BufWriter::new(file);
        let mut builder = SetBuilder::new(writer)?;

        let mut stream = self.set.stream();
        while let Some(key) = stream.next() {
            builder.insert(key)?;
        }

        builder.finish()?;
        Ok(())
    }

    pub fn contains(&self, word: &str) -> bool {
        self.set.contains(word.as_bytes())
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    /// Visit every entry in lexicographic order.
    pub fn scan<F: FnMut(&str)>(&self, mut visit: F) {
        let mut stream = self.set.stream();
        while let Some(key) = stream.next() {
            if let Ok(word) = std::str::from_utf8(key) {
                visit(word);
            }
        }
    }

    /// Collect all entries. Allocates one string per entry.
    pub fn words(&self) -> Vec<String> {
        let mut words = Vec::with_capacity(self.len());
        self.scan(|w| words.push(w.to_string()));
        words
    }
}

impl std::fmt::Debug for Lexicon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lexicon").field("len", &self.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_save_and_load_lexicon() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.fst");

        let lexicon = Lexicon::from_words(["ઘર", "કામ", "ઘરમાં"]).unwrap();
        lexicon.save(&path).unwrap();

        let loaded = Lexicon::load_from_path(&path).unwrap();
        assert_eq!(loaded.len(), 3);
        assert!(loaded.contains("ઘર"));
        assert!(loaded.contains("ઘરમાં"));
        assert!(!loaded.contains("ઘપ"));
    }

    #[test]
    fn test_from_words_normalizes_and_dedups() {
        let lexicon =
            Lexicon::from_words(["[translate:બાળક]", "બાળક", "", "e\u{0301}"]).unwrap();
        assert_eq!(lexicon.len(), 2);
        assert!(lexicon.contains("બાળક"));
        assert!(lexicon.contains("\u{00e9}"));
    }

    #[test]
    fn test_scan_is_ordered() {
        let lexicon = Lexicon::from_words(["c", "a", "b"]).unwrap();
        assert_eq!(lexicon.words(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let err = Lexicon::load_from_path(&dir.path().join("nope.fst")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
