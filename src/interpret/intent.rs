//! Control intents. Runs before column matching so that "save" or "reset" is
//! never read as a column reference.

use crate::vocab::Vocabulary;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Quit,
    Save,
    Reset,
    Summary,
    Update,
}

/// Quit beats save beats reset beats summary; anything else is an update.
pub fn classify(tokens: &[String], vocab: &Vocabulary) -> Intent {
    let hit = |set: &std::collections::BTreeSet<String>| tokens.iter().any(|t| set.contains(t));

    if hit(&vocab.quit_words) {
        Intent::Quit
    } else if hit(&vocab.save_words) {
        Intent::Save
    } else if hit(&vocab.reset_words) {
        Intent::Reset
    } else if hit(&vocab.summary_words) {
        Intent::Summary
    } else {
        Intent::Update
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn reset_ignores_other_words() {
        let vocab = Vocabulary::default();
        assert_eq!(classify(&tokens(&["reset", "please"]), &vocab), Intent::Reset);
    }

    #[test]
    fn priority_order() {
        let vocab = Vocabulary::default();
        assert_eq!(
            classify(&tokens(&["summary", "reset", "save", "quit"]), &vocab),
            Intent::Quit
        );
        assert_eq!(
            classify(&tokens(&["summary", "reset", "save"]), &vocab),
            Intent::Save
        );
        assert_eq!(classify(&tokens(&["summary", "reset"]), &vocab), Intent::Reset);
        assert_eq!(classify(&tokens(&["status"]), &vocab), Intent::Summary);
    }

    #[test]
    fn defaults_to_update() {
        let vocab = Vocabulary::default();
        assert_eq!(classify(&tokens(&["carat", "price"]), &vocab), Intent::Update);
        assert_eq!(classify(&[], &vocab), Intent::Update);
    }
}
