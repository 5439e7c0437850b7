//! Just enough English inflection for templated alert messages.
//!
//! Handles the regular cases (`rocket`/`rockets`, `library`/`libraries`,
//! `witch`/`witches`, `create`/`created`). Irregular nouns should supply
//! an explicit singular name on the resource configuration instead.

const SIBILANT_ENDINGS: [&str; 4] = ["s", "x", "z", "ch"];

fn ends_with_sibilant(word: &str) -> bool {
    SIBILANT_ENDINGS.iter().any(|ending| word.ends_with(ending)) || word.ends_with("sh")
}

fn ends_with_consonant_y(word: &str) -> bool {
    let mut chars = word.chars().rev();
    let Some(last) = chars.next() else {
        return false;
    };
    let Some(previous) = chars.next() else {
        return false;
    };

    last == 'y' && !matches!(previous, 'a' | 'e' | 'i' | 'o' | 'u')
}

/// Pluralizes a regular English noun.
#[must_use]
pub fn pluralize(word: &str) -> String {
    if ends_with_consonant_y(word) {
        return format!("{}ies", &word[..word.len() - 1]);
    }

    if ends_with_sibilant(word) {
        return format!("{word}es");
    }

    format!("{word}s")
}

/// Singularizes a regular English plural.
#[must_use]
pub fn singularize(word: &str) -> String {
    if word.len() > 3 && word.ends_with("ies") {
        return format!("{}y", &word[..word.len() - 3]);
    }

    if word.ends_with("es") {
        let stem = &word[..word.len() - 2];
        if ends_with_sibilant(stem) {
            return stem.to_string();
        }
    }

    if word.ends_with('s') && !word.ends_with("ss") {
        return word[..word.len() - 1].to_string();
    }

    word.to_string()
}

/// Past-tenses a regular English verb.
#[must_use]
pub fn past_tense(word: &str) -> String {
    if word.ends_with('e') {
        return format!("{word}d");
    }

    if ends_with_consonant_y(word) {
        return format!("{}ied", &word[..word.len() - 1]);
    }

    format!("{word}ed")
}

/// Uppercases the first character.
#[must_use]
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
