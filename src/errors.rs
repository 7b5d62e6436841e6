// Error taxonomy - three failure classes, nothing retried internally
//
// LoadError is fatal: a missing or malformed table file aborts before any
// conjugation is attempted and no partial bundle is returned.  LookupError
// and ConjugateError are recoverable and left to the caller.

use crate::tables::ConjKey;
use thiserror::Error;

/// Fatal errors raised while reading the conjugation table files.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The file could not be opened or a row could not be decoded.
    /// Covers the missing-file case (the csv error wraps the io error).
    #[error("failed to read `{file}`: {source}")]
    Csv {
        file: String,
        #[source]
        source: csv::Error,
    },

    /// A row was read but one of its columns failed its converter.
    #[error("`{file}` line {line}: {reason}")]
    Malformed {
        file: String,
        line: u64,
        reason: String,
    },

    /// Two rows in `conjo.csv` share the same (pos, conj, neg, fml, onum)
    /// key.  The original JMdictDB reader silently kept the last row; here
    /// a duplicate is treated as a data-authoring bug.
    #[error("`{file}`: duplicate conjugation key {key:?}")]
    DuplicateKey { file: String, key: ConjKey },
}

/// Recoverable: the caller asked for a part-of-speech the tables don't know.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum LookupError {
    #[error("part-of-speech `{0}` is not conjugatable")]
    UnknownPartOfSpeech(String),
}

/// Recoverable: the word itself cannot be conjugated.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConjugateError {
    /// The rewrite inspects the second-to-last character, so one-character
    /// words cannot be classified, let alone conjugated.
    #[error("`{0}`: conjugatable words must be at least 2 characters long")]
    TooShort(String),

    /// Neither a kanji nor a kana spelling was supplied.
    #[error("no kanji or kana text to conjugate")]
    NoText,
}
