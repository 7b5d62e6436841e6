// katsuyo - Core Library
// Conjugates a Japanese word into all of its inflected forms using the
// JMdictDB conjugation tables.  Exposes all modules for use in the CLI,
// tests and embedding callers.

pub mod conjugate;
pub mod errors;
pub mod kana;
pub mod merge;
pub mod tables;

// Re-export commonly used types
pub use conjugate::{conjugate, construct};
pub use errors::{ConjugateError, LoadError, LookupError};
pub use kana::{is_hiragana_syllable, is_kana_word, HIRAGANA_SYLLABLES};
pub use merge::combine_variants;
pub use tables::{
    CellKey, ConjKey, ConjTables, ConjugationKind, ConjugationRule, Note, PartOfSpeech,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
