// Conjugation Engine - pure suffix rewriting over the loaded tables
//
// For every conjugation kind, every (neg, fml) combination and every
// variant index from 1 upward, look the rule up by its composite key and
// rewrite the word's tail.  The first absent variant index ends that
// cell's run: contiguity of onum values is a property of the data, so no
// upper ceiling is imposed here.

use crate::errors::ConjugateError;
use crate::kana::is_hiragana_syllable;
use crate::tables::{ConjKey, ConjTables, ConjugationRule};
use std::collections::BTreeMap;

/// The four polarity/politeness combinations, in output order.
const CELL_COMBOS: [(bool, bool); 4] = [(false, false), (false, true), (true, false), (true, true)];

/// Generate every conjugated form of the kanji and/or kana spellings of one
/// word, assuming part-of-speech `pos`.
///
/// Each entry maps a full `ConjKey` to the display text for that variant:
/// `kanji【kana】` when both spellings were supplied, otherwise whichever
/// one was.  A part-of-speech with no rules yields an empty map.
pub fn conjugate(
    kanji: Option<&str>,
    kana: Option<&str>,
    pos: u32,
    tables: &ConjTables,
) -> Result<BTreeMap<ConjKey, String>, ConjugateError> {
    let kanji = kanji.filter(|text| !text.is_empty());
    let kana = kana.filter(|text| !text.is_empty());
    if kanji.is_none() && kana.is_none() {
        return Err(ConjugateError::NoText);
    }

    let mut forms = BTreeMap::new();
    for kind in tables.kinds() {
        for (neg, fml) in CELL_COMBOS {
            for onum in 1.. {
                let key = ConjKey::new(pos, kind.id, neg, fml, onum);
                let Some(rule) = tables.rule(&key) else {
                    // first absent index = end of this cell's variant run
                    break;
                };
                let kanji_form = kanji.map(|text| construct(text, rule)).transpose()?;
                let kana_form = kana.map(|text| construct(text, rule)).transpose()?;
                let text = match (kanji_form, kana_form) {
                    (Some(k), Some(r)) => format!("{k}【{r}】"),
                    (Some(k), None) => k,
                    (None, Some(r)) => r,
                    (None, None) => return Err(ConjugateError::NoText),
                };
                forms.insert(key, text);
            }
        }
    }
    Ok(forms)
}

/// Apply one rule's suffix rewrite to one spelling of a word.
///
/// Trim `stem` characters from the end, plus one more when the matching
/// euphonic replacement is present (kana words use `euphr`, kanji words
/// `euphk`), then append the replacement (if any) and the okurigana.
pub fn construct(word: &str, rule: &ConjugationRule) -> Result<String, ConjugateError> {
    let chars: Vec<char> = word.chars().collect();
    if chars.len() < 2 {
        return Err(ConjugateError::TooShort(word.to_string()));
    }

    let is_kana = is_hiragana_syllable(chars[chars.len() - 2]);
    let replacement = if is_kana {
        rule.euphr.as_deref()
    } else {
        rule.euphk.as_deref()
    };

    let mut trim = rule.stem;
    if replacement.is_some() {
        // the euphonic substitution consumes one extra trailing character
        trim += 1;
    }

    let kept = chars.len().saturating_sub(trim);
    let mut text: String = chars[..kept].iter().collect();
    if let Some(replacement) = replacement {
        text.push_str(replacement);
    }
    text.push_str(&rule.okuri);
    Ok(text)
}
