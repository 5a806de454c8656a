/// Split a payment provider "full name" into (first, last) on the first
/// space. Multi-word first names end up partly in the last name; that is a
/// known limitation of the upstream data, not something to guess around.
pub fn split_full_name(full_name: &str) -> (String, String) {
    let trimmed = full_name.trim();
    match trimmed.split_once(' ') {
        Some((first, rest)) => (first.to_string(), rest.trim().to_string()),
        None => (trimmed.to_string(), String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_first_space() {
        assert_eq!(
            split_full_name("Marie Dupont"),
            ("Marie".to_string(), "Dupont".to_string())
        );
    }

    #[test]
    fn extra_words_land_in_last_name() {
        assert_eq!(
            split_full_name("Jean Claude Van Damme"),
            ("Jean".to_string(), "Claude Van Damme".to_string())
        );
    }

    #[test]
    fn single_word_has_empty_last_name() {
        assert_eq!(
            split_full_name("Cher"),
            ("Cher".to_string(), String::new())
        );
    }

    #[test]
    fn whitespace_is_trimmed() {
        assert_eq!(
            split_full_name("  Marie Dupont  "),
            ("Marie".to_string(), "Dupont".to_string())
        );
    }
}
