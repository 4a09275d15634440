//! Hangul leading-consonant ("chosung") extraction.
//!
//! A product's `initial` column stores the chosung form of its name so that a
//! search such as `ㅅㅋㄹ` finds `슈크림 라떼`.

/// Leading consonants in Unicode syllable-composition order.
const CHOSUNG: [char; 19] = [
    'ㄱ', 'ㄲ', 'ㄴ', 'ㄷ', 'ㄸ', 'ㄹ', 'ㅁ', 'ㅂ', 'ㅃ', 'ㅅ', 'ㅆ', 'ㅇ', 'ㅈ', 'ㅉ', 'ㅊ', 'ㅋ', 'ㅌ',
    'ㅍ', 'ㅎ',
];

/// First precomposed Hangul syllable (`가`).
const SYLLABLE_FIRST: u32 = 0xAC00;
/// Last precomposed Hangul syllable (`힣`).
const SYLLABLE_LAST: u32 = 0xD7A3;
/// Syllables sharing one leading consonant (21 vowels x 28 finals).
const SYLLABLES_PER_CHOSUNG: u32 = 588;

/// Standalone consonant jamo range, `ㄱ`..=`ㅎ`.
const JAMO_CONSONANT_FIRST: u32 = 0x3131;
const JAMO_CONSONANT_LAST: u32 = 0x314E;

fn is_syllable(c: char) -> bool {
    (SYLLABLE_FIRST..=SYLLABLE_LAST).contains(&(c as u32))
}

fn is_consonant_jamo(c: char) -> bool {
    (JAMO_CONSONANT_FIRST..=JAMO_CONSONANT_LAST).contains(&(c as u32))
}

/// Replace every Hangul syllable with its leading consonant.
///
/// Every other code point is copied through, so the output always has the
/// same number of code points as the input.
pub fn extract_initials(text: &str) -> String {
    text.chars()
        .map(|c| {
            if is_syllable(c) {
                let index = (c as u32 - SYLLABLE_FIRST) / SYLLABLES_PER_CHOSUNG;
                CHOSUNG[index as usize]
            } else {
                c
            }
        })
        .collect()
}

/// Whether a search term should be matched against the chosung column.
///
/// True only when the term contains at least one standalone consonant and no
/// full syllable.
pub fn is_chosung_query(text: &str) -> bool {
    let mut has_consonant = false;

    for c in text.chars() {
        if is_syllable(c) {
            return false;
        }
        if is_consonant_jamo(c) {
            has_consonant = true;
        }
    }

    has_consonant
}
