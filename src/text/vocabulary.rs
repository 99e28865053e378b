//! Fixed branch vocabulary for decision outputs.
//!
//! Text is split into tokens, each token normalized (lowercase, common OCR
//! digit/letter confusions undone, punctuation stripped) and compared with
//! the affirmative and negative word lists. Tokens of three or more letters
//! also match at edit distance 1. The single letters `y` and `n` count only
//! when they are the whole text. Text matching both lists, or neither,
//! yields no label.
use serde::{Deserialize, Serialize};
use std::fmt;

const AFFIRMATIVE: &[&str] = &["yes", "true", "ok"];
const NEGATIVE: &[&str] = &["no", "false"];
const FUZZY_MIN_LEN: usize = 3;

/// Canonical decision-branch label.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BranchLabel {
    Yes,
    No,
}

impl BranchLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            BranchLabel::Yes => "yes",
            BranchLabel::No => "no",
        }
    }

    /// Every value a decision edge label may take.
    pub fn all() -> [BranchLabel; 2] {
        [BranchLabel::Yes, BranchLabel::No]
    }
}

impl fmt::Display for BranchLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn normalize_token(token: &str) -> String {
    token
        .chars()
        .map(|c| match c {
            '0' => 'o',
            '5' | '$' => 's',
            '1' | '|' => 'l',
            other => other,
        })
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_alphanumeric())
        .collect()
}

fn matches_word(token: &str, words: &[&str]) -> bool {
    words.iter().any(|w| {
        if token == *w {
            return true;
        }
        token.chars().count() >= FUZZY_MIN_LEN
            && w.len() >= FUZZY_MIN_LEN
            && strsim::levenshtein(token, w) <= 1
    })
}

/// Map free OCR text onto the branch vocabulary.
pub fn classify_branch(text: &str) -> Option<BranchLabel> {
    match normalize_token(text).as_str() {
        "y" => return Some(BranchLabel::Yes),
        "n" => return Some(BranchLabel::No),
        _ => {}
    }
    let mut yes = false;
    let mut no = false;
    for raw in text.split(|c: char| c.is_whitespace() || c == '/' || c == ',') {
        let token = normalize_token(raw);
        if token.is_empty() {
            continue;
        }
        yes |= matches_word(&token, AFFIRMATIVE);
        no |= matches_word(&token, NEGATIVE);
    }
    match (yes, no) {
        (true, false) => Some(BranchLabel::Yes),
        (false, true) => Some(BranchLabel::No),
        _ => None,
    }
}
