//! City name normalization.
//!
//! The weather provider's free-text `q` parameter is unreliable with some
//! accented characters, so the common Portuguese and Spanish diacritics are
//! folded to their base letter before the query is built. This is a
//! compatibility shim, not a transliteration: characters outside the table,
//! including non-Latin scripts, pass through unchanged.

/// Replace the known accented Latin letters in `text` with their base letter.
pub fn normalize_city_name(text: &str) -> String {
    text.chars().map(fold).collect()
}

fn fold(c: char) -> char {
    match c {
        'ã' | 'á' | 'â' | 'à' => 'a',
        'Ã' | 'Á' | 'Â' | 'À' => 'A',
        'é' | 'ê' | 'è' => 'e',
        'É' | 'Ê' | 'È' => 'E',
        'í' | 'î' | 'ì' => 'i',
        'Í' | 'Î' | 'Ì' => 'I',
        'ó' | 'ô' | 'ò' => 'o',
        'Ó' | 'Ô' | 'Ò' => 'O',
        'ú' | 'û' | 'ù' => 'u',
        'Ú' | 'Û' | 'Ù' => 'U',
        'ç' => 'c',
        'Ç' => 'C',
        'ñ' => 'n',
        'Ñ' => 'N',
        other => other,
    }
}
