//! Discipline normalization.
//!
//! Maps localized subject names onto the canonical English set used for
//! filtering. Unknown labels pass through unchanged.

/// Portuguese → English discipline names.
const TRANSLATIONS: &[(&str, &str)] = &[
    ("Matemática", "Mathematics"),
    ("Ciências", "Science"),
    ("Física", "Physics"),
    ("História", "History"),
    ("Geografia", "Geography"),
    ("Biologia", "Biology"),
    ("Inglês", "English Language Arts"),
    ("Filosofia", "Philosophy"),
    ("Educação Física", "Physical Education"),
    ("Artes", "Arts"),
    ("Português", "Portuguese"),
    ("Espanhol", "Spanish"),
];

/// Return the canonical label for `raw`. Total: never fails.
pub fn normalize_discipline(raw: &str) -> &str {
    let key = raw.trim();
    TRANSLATIONS
        .iter()
        .find(|(localized, _)| *localized == key)
        .map(|(_, canonical)| *canonical)
        .unwrap_or(raw)
}

/// All canonical labels known to the translation table.
pub fn canonical_disciplines() -> impl Iterator<Item = &'static str> {
    TRANSLATIONS.iter().map(|(_, canonical)| *canonical)
}
