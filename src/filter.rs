//! Recipe name and category filtering
//!
//! Selects which names get resolved; never touches resolution itself.
//! Dataset names mix hiragana and katakana, so matching folds both scripts
//! together before the substring test.

/// Fold a string for matching: lowercase ASCII, hiragana mapped to katakana.
///
/// Hiragana and katakana blocks are offset by 0x60, so ひ folds to ヒ and a
/// query in either script matches names written in the other.
pub fn fold_kana(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            'ぁ'..='ん' => char::from_u32(c as u32 + 0x60).unwrap_or(c),
            _ => c.to_ascii_lowercase(),
        })
        .collect()
}

/// Substring match on folded names. An empty query matches everything.
pub fn name_matches(name: &str, query: &str) -> bool {
    fold_kana(name).contains(&fold_kana(query))
}

/// Category match; the special category `all` matches every recipe.
pub fn category_matches(category: &str, selected: &str) -> bool {
    selected == "all" || category == selected
}
