use lazy_static::lazy_static;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref TRANSLATE_MARKUP: Regex = Regex::new(r"^\[translate:(.*)\]$").unwrap();
}

/// Strip `[translate:...]` wrappers and compose to NFC.
///
/// A wrapper must span the whole input. Nested wrappers are peeled until
/// none is left, so the result is always a fixed point of `normalize`.
pub fn normalize(raw: &str) -> String {
    let mut current = raw;
    while let Some(inner) = TRANSLATE_MARKUP
        .captures(current)
        .and_then(|caps| caps.get(1))
    {
        current = inner.as_str();
    }
    current.nfc().collect()
}
