// Script classification for the euphonic-change branch.
//
// The rule table carries separate replacement stems for kana and kanji
// spellings (euphr/euphk).  Which one applies is decided from the word's
// second-to-last character: okurigana rewriting only ever touches the tail
// of the word, so that character belongs to the stem and reliably tells the
// two spellings apart for the small closed set of irregular words that have
// euphonic rows (いい, 来る・くる, 為る・する).

/// Inclusive codepoint range, (min, max).
pub type CodepointRange = (u32, u32);

/// Hiragana syllables あ through ん, both bounds inclusive.
pub const HIRAGANA_SYLLABLES: CodepointRange = ('あ' as u32, 'ん' as u32);

pub fn is_code_point_in_range(code_point: u32, range: CodepointRange) -> bool {
    code_point >= range.0 && code_point <= range.1
}

/// True if `c` falls in the hiragana syllable block.
pub fn is_hiragana_syllable(c: char) -> bool {
    is_code_point_in_range(c as u32, HIRAGANA_SYLLABLES)
}

/// Classify a word as kana by its second-to-last character.
/// Returns `None` for words shorter than 2 characters.
pub fn is_kana_word(word: &str) -> Option<bool> {
    let second_to_last = word.chars().rev().nth(1)?;
    Some(is_hiragana_syllable(second_to_last))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hiragana_bounds_are_inclusive() {
        // あ and ん are the block bounds themselves
        assert!(is_hiragana_syllable('あ'));
        assert!(is_hiragana_syllable('ん'));
        // one codepoint below あ (small ぁ) and one above ん (ゔ)
        assert!(!is_hiragana_syllable('ぁ'));
        assert!(!is_hiragana_syllable('ゔ'));
    }

    #[test]
    fn test_kanji_is_not_hiragana() {
        assert!(!is_hiragana_syllable('来'));
        assert!(!is_hiragana_syllable('食'));
        // katakana is outside the range too
        assert!(!is_hiragana_syllable('カ'));
    }

    #[test]
    fn test_word_classification_uses_second_to_last_char() {
        // 食べる: second-to-last is べ (hiragana), despite the leading kanji
        assert_eq!(is_kana_word("食べる"), Some(true));
        // 来る: second-to-last is 来
        assert_eq!(is_kana_word("来る"), Some(false));
        assert_eq!(is_kana_word("くる"), Some(true));
    }

    #[test]
    fn test_short_words_cannot_be_classified() {
        assert_eq!(is_kana_word("る"), None);
        assert_eq!(is_kana_word(""), None);
    }
}
