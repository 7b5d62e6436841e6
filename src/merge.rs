// Variant Merger - collapse okurigana variants of one grammatical cell
//
// The engine emits one entry per (pos, conj, neg, fml, onum); display wants
// one entry per (pos, conj, neg, fml) with the variant texts joined and the
// relevant footnote numbers attached.  Iterating the BTreeMap visits keys
// in ascending 5-tuple order, so variant 1 always lands first and the
// output is deterministic for a given input.

use crate::tables::{CellKey, ConjKey, ConjTables};
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

/// Separator between variant texts of the same cell.
const VARIANT_SEPARATOR: &str = " / ";

/// Fold the raw per-variant forms into per-cell display entries.
///
/// Each variant gets its note references appended as `[n1,n2]` (numerically
/// sorted) before being joined.  Also returns the union of every note id
/// encountered so the caller can render the footnotes themselves.
pub fn combine_variants(
    forms: &BTreeMap<ConjKey, String>,
    tables: &ConjTables,
) -> (BTreeMap<CellKey, String>, BTreeSet<u32>) {
    let mut merged: BTreeMap<CellKey, String> = BTreeMap::new();
    let mut all_notes: BTreeSet<u32> = BTreeSet::new();

    for (key, text) in forms {
        let mut text = text.clone();
        let notes = tables.notes_for(key);
        if !notes.is_empty() {
            let ids: Vec<String> = notes.iter().map(u32::to_string).collect();
            text.push_str(&format!("[{}]", ids.join(",")));
            all_notes.extend(notes);
        }
        match merged.entry(key.cell()) {
            Entry::Vacant(slot) => {
                slot.insert(text);
            }
            Entry::Occupied(mut slot) => {
                slot.get_mut().push_str(VARIANT_SEPARATOR);
                slot.get_mut().push_str(&text);
            }
        }
    }

    (merged, all_notes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conjugate::conjugate;
    use crate::tables::fixtures::standard_tables;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_variants_merge_with_notes_attached() {
        let (_dir, tables) = standard_tables();
        let forms = conjugate(None, Some("たべる"), 28, &tables).unwrap();
        let (merged, notes) = combine_variants(&forms, &tables);

        // (28, 2, neg, plain) has variants with notes {3} and {5, 6}
        assert_eq!(
            merged[&CellKey {
                pos: 28,
                conj: 2,
                neg: true,
                fml: false
            }],
            "たべなかった[3] / たべんかった[5,6]"
        );
        assert_eq!(notes, BTreeSet::from([3, 5, 6]));
    }

    #[test]
    fn test_unannotated_cells_pass_through() {
        let (_dir, tables) = standard_tables();
        let forms = conjugate(None, Some("たべる"), 28, &tables).unwrap();
        let (merged, _) = combine_variants(&forms, &tables);

        assert_eq!(
            merged[&CellKey {
                pos: 28,
                conj: 1,
                neg: false,
                fml: false
            }],
            "たべる"
        );
    }

    #[test]
    fn test_single_variant_cells_keep_one_entry() {
        let (_dir, tables) = standard_tables();
        let forms = conjugate(None, Some("たべる"), 28, &tables).unwrap();
        let (merged, _) = combine_variants(&forms, &tables);

        // five raw variants fold into four cells
        assert_eq!(forms.len(), 5);
        assert_eq!(merged.len(), 4);
    }

    #[test]
    fn test_merge_is_deterministic() {
        let (_dir, tables) = standard_tables();
        let forms = conjugate(Some("食べる"), Some("たべる"), 28, &tables).unwrap();

        let first = combine_variants(&forms, &tables);
        let second = combine_variants(&forms, &tables);
        assert_eq!(first, second);
    }
}
