use unicode_normalization::UnicodeNormalization;

/// UTF-8 accented letters whose two bytes were decoded as MacRoman
/// (`ç` = `C3 A7` shows up as `√ß`), mapped to the unaccented letter.
/// Applied in order as literal substring replacements.
pub const MOJIBAKE_REPLACEMENTS: &[(&str, &str)] = &[
    ("√°", "a"),
    ("√†", "a"),
    ("√£", "a"),
    ("√¢", "a"),
    ("√§", "a"),
    ("√©", "e"),
    ("√®", "e"),
    ("√™", "e"),
    ("√´", "e"),
    ("√≠", "i"),
    ("√¨", "i"),
    ("√Æ", "i"),
    ("√Ø", "i"),
    ("√≥", "o"),
    ("√≤", "o"),
    ("√µ", "o"),
    ("√¥", "o"),
    ("√∂", "o"),
    ("√∫", "u"),
    ("√π", "u"),
    ("√ª", "u"),
    ("√º", "u"),
    ("√ß", "c"),
    ("√±", "n"),
    ("√Å", "A"),
    ("√Ä", "A"),
    ("√É", "A"),
    ("√Ç", "A"),
    ("√Ñ", "A"),
    ("√â", "E"),
    ("√à", "E"),
    ("√ä", "E"),
    ("√ã", "E"),
    ("√ç", "I"),
    ("√å", "I"),
    ("√é", "I"),
    ("√è", "I"),
    ("√ì", "O"),
    ("√í", "O"),
    ("√ï", "O"),
    ("√î", "O"),
    ("√ñ", "O"),
    ("√ö", "U"),
    ("√ô", "U"),
    ("√õ", "U"),
    ("√ú", "U"),
    ("√á", "C"),
    ("√ë", "N"),
];

/// Canonical form of a file or folder name: NFC, garbled sequences replaced,
/// trailing whitespace removed.
pub fn normalize_name(name: &str) -> String {
    let mut result: String = name.nfc().collect();
    for (garbled, plain) in MOJIBAKE_REPLACEMENTS {
        if result.contains(garbled) {
            result = result.replace(garbled, plain);
        }
    }
    result.trim_end().to_string()
}

/// The renamed form of `name`, or `None` when it is already clean.
pub fn renamed(name: &str) -> Option<String> {
    let original: String = name.nfc().collect();
    let normalized = normalize_name(&original);
    if normalized.is_empty() || normalized == original {
        None
    } else {
        Some(normalized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbled_promocao_is_repaired() {
        assert_eq!(normalize_name("Promo√ß√£o"), "Promocao");
        assert_eq!(renamed("Promo√ß√£o").as_deref(), Some("Promocao"));
    }

    #[test]
    fn uppercase_sequences_map_to_uppercase_letters() {
        assert_eq!(normalize_name("CAMIS√ïES √Å VISTA"), "CAMISOES A VISTA");
        assert_eq!(normalize_name("√áALÇADOS"), "CALÇADOS");
    }

    #[test]
    fn clean_names_are_left_alone() {
        assert_eq!(renamed("Cadeiras"), None);
        assert_eq!(renamed("10.jpg"), None);
        // real accents are not garbling
        assert_eq!(renamed("Promoção"), None);
    }

    #[test]
    fn trailing_whitespace_is_stripped() {
        assert_eq!(renamed("Mesas  ").as_deref(), Some("Mesas"));
        assert_eq!(renamed("  Mesas"), None);
    }

    #[test]
    fn whitespace_only_names_are_never_emptied() {
        assert_eq!(renamed("   "), None);
    }

    #[test]
    fn decomposed_clean_name_is_not_a_change() {
        // "ã" as a + combining tilde composes to the same clean name
        assert_eq!(renamed("Promoc\u{0327}a\u{0303}o"), None);
    }

    #[test]
    fn normalization_is_idempotent() {
        for name in ["Promo√ß√£o", "√â √∫ltimo  ", "Sof√°s 2"] {
            let once = normalize_name(name);
            assert_eq!(normalize_name(&once), once);
        }
    }

    #[test]
    fn table_keys_are_two_char_sequences() {
        assert_eq!(MOJIBAKE_REPLACEMENTS.len(), 48);
        for (garbled, plain) in MOJIBAKE_REPLACEMENTS {
            assert_eq!(garbled.chars().count(), 2);
            assert!(garbled.starts_with('√'));
            assert!(plain.is_ascii());
        }
    }
}
