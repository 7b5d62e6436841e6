// Rule Table Loader - five tab-delimited files -> one immutable bundle
//
// The on-disk layout is the JMdictDB conjugation data: kwpos.csv (no
// header), conj.csv, conjo.csv, conotes.csv and conjo_notes.csv (all with a
// header row).  Column order and the per-column converters are part of the
// contract and must not be reordered.

use crate::errors::{LoadError, LookupError};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;

pub const KWPOS_FILE: &str = "kwpos.csv";
pub const CONJ_FILE: &str = "conj.csv";
pub const CONJO_FILE: &str = "conjo.csv";
pub const CONOTES_FILE: &str = "conotes.csv";
pub const CONJO_NOTES_FILE: &str = "conjo_notes.csv";

// ============================================================================
// RECORD TYPES
// ============================================================================

/// One row of kwpos.csv.  `keyword` is the external code ("v1", "adj-i", ...)
/// as used in wwwjdic / JMdict; lookup works by either id or keyword.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartOfSpeech {
    pub id: u32,
    pub keyword: String,
    pub description: String,
}

/// One row of conj.csv: a grammatical category such as "Past (~ta)",
/// independent of part-of-speech.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConjugationKind {
    pub id: u32,
    pub description: String,
}

/// Composite key identifying one conjugation row.
///
/// The derived `Ord` is the ascending 5-tuple order (with `false < true`),
/// which is what both the variant scan and the merger rely on.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ConjKey {
    pub pos: u32,
    pub conj: u32,
    pub neg: bool,
    pub fml: bool,
    /// Disambiguates variant okurigana for the same grammatical cell
    /// (e.g. ～なくて and ～ないで).  Starts at 1 and runs contiguously.
    pub onum: u32,
}

impl ConjKey {
    pub fn new(pos: u32, conj: u32, neg: bool, fml: bool, onum: u32) -> Self {
        ConjKey {
            pos,
            conj,
            neg,
            fml,
            onum,
        }
    }

    /// Drop the variant index, leaving the grammatical cell.
    pub fn cell(&self) -> CellKey {
        CellKey {
            pos: self.pos,
            conj: self.conj,
            neg: self.neg,
            fml: self.fml,
        }
    }
}

/// A grammatical cell: tense x polarity x politeness, variants merged away.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct CellKey {
    pub pos: u32,
    pub conj: u32,
    pub neg: bool,
    pub fml: bool,
}

/// One row of conjo.csv: how to rewrite a word's tail for one conjugation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConjugationRule {
    pub key: ConjKey,
    /// Characters to remove from the end of the word.
    pub stem: usize,
    /// Okurigana appended after trimming.
    pub okuri: String,
    /// Replacement stem text when the word is kana and has a euphonic
    /// change (e.g. く -> こ in 来る -> こない).
    pub euphr: Option<String>,
    /// Replacement stem text when the word is kanji (only used by the
    /// potential of 為る・する: 為る -> 出来る).
    pub euphk: Option<String>,
}

/// One row of conotes.csv: a footnote referenced by conjugation rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: u32,
    pub text: String,
}

// ============================================================================
// TABLE BUNDLE
// ============================================================================

/// All five tables, loaded once and read-only afterwards.
///
/// The bundle is a plain value: share it by reference across as many
/// `conjugate` / `combine_variants` calls as needed.  Nothing in it is
/// mutated after `load` returns.
#[derive(Debug, Clone)]
pub struct ConjTables {
    parts_of_speech: BTreeMap<u32, PartOfSpeech>,
    keyword_index: HashMap<String, u32>,
    kinds: BTreeMap<u32, ConjugationKind>,
    rules: BTreeMap<ConjKey, ConjugationRule>,
    notes: BTreeMap<u32, Note>,
    note_links: BTreeMap<ConjKey, BTreeSet<u32>>,
}

impl ConjTables {
    /// Read the five table files from `dir`.
    ///
    /// Any missing file, malformed row or duplicate conjugation key is
    /// fatal: the error is returned and no partial bundle ever escapes.
    pub fn load(dir: &Path) -> Result<Self, LoadError> {
        // kwpos.csv: id, keyword, description - the only file with no header
        let mut parts_of_speech = BTreeMap::new();
        let mut keyword_index = HashMap::new();
        for row in read_rows(dir, KWPOS_FILE, false)? {
            let id = row.int(0)?;
            let keyword = row.text(1)?;
            let description = row.text(2)?;
            keyword_index.insert(keyword.clone(), id);
            parts_of_speech.insert(
                id,
                PartOfSpeech {
                    id,
                    keyword,
                    description,
                },
            );
        }
        debug!("{}: {} parts of speech", KWPOS_FILE, parts_of_speech.len());

        // conj.csv: id, name
        let mut kinds = BTreeMap::new();
        for row in read_rows(dir, CONJ_FILE, true)? {
            let id = row.int(0)?;
            let description = row.text(1)?;
            kinds.insert(id, ConjugationKind { id, description });
        }
        debug!("{}: {} conjugation kinds", CONJ_FILE, kinds.len());

        // conjo.csv: pos, conj, neg, fml, onum, stem, okuri, euphr, euphk, pos2
        let mut rules: BTreeMap<ConjKey, ConjugationRule> = BTreeMap::new();
        for row in read_rows(dir, CONJO_FILE, true)? {
            let key = ConjKey::new(
                row.int(0)?,
                row.int(1)?,
                row.flag(2)?,
                row.flag(3)?,
                row.int(4)?,
            );
            let rule = ConjugationRule {
                key,
                stem: row.int(5)? as usize,
                okuri: row.text(6)?,
                euphr: row.opt_text(7),
                euphk: row.opt_text(8),
            };
            // pos2 is unused but still has to parse
            row.opt_int(9)?;
            if rules.insert(key, rule).is_some() {
                return Err(LoadError::DuplicateKey {
                    file: CONJO_FILE.to_string(),
                    key,
                });
            }
        }
        debug!("{}: {} conjugation rules", CONJO_FILE, rules.len());

        // conotes.csv: id, txt
        let mut notes = BTreeMap::new();
        for row in read_rows(dir, CONOTES_FILE, true)? {
            let id = row.int(0)?;
            let text = row.text(1)?;
            notes.insert(id, Note { id, text });
        }

        // conjo_notes.csv: pos, conj, neg, fml, onum, note (many-to-many)
        let mut note_links: BTreeMap<ConjKey, BTreeSet<u32>> = BTreeMap::new();
        for row in read_rows(dir, CONJO_NOTES_FILE, true)? {
            let key = ConjKey::new(
                row.int(0)?,
                row.int(1)?,
                row.flag(2)?,
                row.flag(3)?,
                row.int(4)?,
            );
            let note = row.int(5)?;
            if !rules.contains_key(&key) {
                warn!(
                    "{}: note {} links to {:?}, which has no row in {}",
                    CONJO_NOTES_FILE, note, key, CONJO_FILE
                );
            }
            note_links.entry(key).or_default().insert(note);
        }

        Ok(ConjTables {
            parts_of_speech,
            keyword_index,
            kinds,
            rules,
            notes,
            note_links,
        })
    }

    // ========================================================================
    // LOOKUPS
    // ========================================================================

    /// Look a part-of-speech up by keyword ("v1") or by id rendered as
    /// digits ("28").  All-digit input is tried as an id first.
    pub fn part_of_speech(&self, key: &str) -> Result<&PartOfSpeech, LookupError> {
        if let Ok(id) = key.parse::<u32>() {
            if let Some(pos) = self.parts_of_speech.get(&id) {
                return Ok(pos);
            }
        }
        self.keyword_index
            .get(key)
            .and_then(|id| self.parts_of_speech.get(id))
            .ok_or_else(|| LookupError::UnknownPartOfSpeech(key.to_string()))
    }

    pub fn part_of_speech_by_id(&self, id: u32) -> Option<&PartOfSpeech> {
        self.parts_of_speech.get(&id)
    }

    pub fn kind(&self, id: u32) -> Option<&ConjugationKind> {
        self.kinds.get(&id)
    }

    /// All conjugation kinds in ascending id order.
    pub fn kinds(&self) -> impl Iterator<Item = &ConjugationKind> {
        self.kinds.values()
    }

    pub fn rule(&self, key: &ConjKey) -> Option<&ConjugationRule> {
        self.rules.get(key)
    }

    /// Every rule for one part-of-speech, in ascending key order.
    pub fn rules_for(&self, pos: u32) -> impl Iterator<Item = &ConjugationRule> {
        let lo = ConjKey::new(pos, 0, false, false, 0);
        let hi = ConjKey::new(pos, u32::MAX, true, true, u32::MAX);
        self.rules.range(lo..=hi).map(|(_, rule)| rule)
    }

    /// Note ids attached to one conjugation row; empty when unlinked.
    pub fn notes_for(&self, key: &ConjKey) -> BTreeSet<u32> {
        self.note_links.get(key).cloned().unwrap_or_default()
    }

    pub fn note(&self, id: u32) -> Option<&Note> {
        self.notes.get(&id)
    }

    /// Every part-of-speech with at least one conjugation rule, sorted by
    /// keyword.  This is what `--list` prints.
    pub fn conjugatable_parts_of_speech(&self) -> Vec<&PartOfSpeech> {
        let ids: BTreeSet<u32> = self.rules.keys().map(|key| key.pos).collect();
        let mut available: Vec<&PartOfSpeech> = ids
            .iter()
            .filter_map(|id| self.parts_of_speech.get(id))
            .collect();
        available.sort_by(|a, b| a.keyword.cmp(&b.keyword));
        available
    }
}

// ============================================================================
// ROW READING & COLUMN CONVERTERS
// ============================================================================

/// One decoded row plus enough context to report a useful error.
struct Row {
    file: &'static str,
    line: u64,
    record: csv::StringRecord,
}

impl Row {
    fn malformed(&self, reason: String) -> LoadError {
        LoadError::Malformed {
            file: self.file.to_string(),
            line: self.line,
            reason,
        }
    }

    fn field(&self, idx: usize) -> Result<&str, LoadError> {
        self.record
            .get(idx)
            .ok_or_else(|| self.malformed(format!("missing column {}", idx + 1)))
    }

    fn int(&self, idx: usize) -> Result<u32, LoadError> {
        let raw = self.field(idx)?;
        raw.parse::<u32>()
            .map_err(|_| self.malformed(format!("column {}: `{}` is not an integer", idx + 1, raw)))
    }

    /// Tri-state boolean: leading 't' or 'f', case-insensitive.  Anything
    /// else is a malformed row, exactly like the original sbool converter.
    fn flag(&self, idx: usize) -> Result<bool, LoadError> {
        let raw = self.field(idx)?;
        match raw.chars().next().map(|c| c.to_ascii_lowercase()) {
            Some('t') => Ok(true),
            Some('f') => Ok(false),
            _ => Err(self.malformed(format!(
                "column {}: `{}` is not a t/f flag",
                idx + 1,
                raw
            ))),
        }
    }

    fn text(&self, idx: usize) -> Result<String, LoadError> {
        Ok(self.field(idx)?.to_string())
    }

    /// Blank (or absent trailing) column -> None.
    fn opt_text(&self, idx: usize) -> Option<String> {
        self.record
            .get(idx)
            .filter(|raw| !raw.is_empty())
            .map(str::to_string)
    }

    fn opt_int(&self, idx: usize) -> Result<Option<u32>, LoadError> {
        match self.record.get(idx) {
            None | Some("") => Ok(None),
            Some(raw) => raw.parse::<u32>().map(Some).map_err(|_| {
                self.malformed(format!("column {}: `{}` is not an integer", idx + 1, raw))
            }),
        }
    }
}

/// Read one tab-delimited file into rows.  `has_headers` skips the first
/// line; every file except kwpos.csv carries one.
fn read_rows(dir: &Path, file: &'static str, has_headers: bool) -> Result<Vec<Row>, LoadError> {
    let path = dir.join(file);
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(has_headers)
        .flexible(true)
        .from_path(&path)
        .map_err(|source| LoadError::Csv {
            file: file.to_string(),
            source,
        })?;

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|source| LoadError::Csv {
            file: file.to_string(),
            source,
        })?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        rows.push(Row { file, line, record });
    }
    Ok(rows)
}

// ============================================================================
// TEST FIXTURES (shared with the engine and merger tests)
// ============================================================================

#[cfg(test)]
pub(crate) mod fixtures {
    use super::ConjTables;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    pub fn write_file(dir: &Path, name: &str, contents: &str) {
        fs::write(dir.join(name), contents).unwrap();
    }

    /// A small but structurally complete table set: v1 and vk verbs, two
    /// conjugation kinds, a two-variant cell with note links, and one
    /// non-conjugatable part-of-speech (n).
    pub fn write_standard_tables(dir: &Path) {
        write_file(
            dir,
            super::KWPOS_FILE,
            "17\tn\tnoun (common)\n\
             28\tv1\tIchidan verb\n\
             45\tvk\tKuru verb - special class\n",
        );
        write_file(
            dir,
            super::CONJ_FILE,
            "id\tname\n\
             1\tNon-past\n\
             2\tPast (~ta)\n",
        );
        write_file(
            dir,
            super::CONJO_FILE,
            "pos\tconj\tneg\tfml\tonum\tstem\tokuri\teuphr\teuphk\tpos2\n\
             28\t1\tf\tf\t1\t1\tる\t\t\t\n\
             28\t1\tt\tf\t1\t1\tない\t\t\t\n\
             28\t2\tf\tf\t1\t1\tた\t\t\t\n\
             28\t2\tt\tf\t1\t1\tなかった\t\t\t\n\
             28\t2\tt\tf\t2\t1\tんかった\t\t\t\n\
             45\t1\tf\tf\t1\t1\tる\t\t\t\n\
             45\t1\tt\tf\t1\t1\tない\tこ\t\t\n\
             45\t2\tf\tf\t1\t1\tた\tき\t\t\n",
        );
        write_file(
            dir,
            super::CONOTES_FILE,
            "id\ttxt\n\
             3\tColloquial contraction.\n\
             5\tRegional form.\n\
             6\tRarely written.\n",
        );
        write_file(
            dir,
            super::CONJO_NOTES_FILE,
            "pos\tconj\tneg\tfml\tonum\tnote\n\
             28\t2\tt\tf\t1\t3\n\
             28\t2\tt\tf\t2\t5\n\
             28\t2\tt\tf\t2\t6\n",
        );
    }

    /// Write the standard tables into a fresh temp dir and load them.
    /// The TempDir must stay alive as long as the tables are used.
    pub fn standard_tables() -> (TempDir, ConjTables) {
        let dir = TempDir::new().unwrap();
        write_standard_tables(dir.path());
        let tables = ConjTables::load(dir.path()).unwrap();
        (dir, tables)
    }
}

// ============================================================================
// TESTS
// ============================================================================
