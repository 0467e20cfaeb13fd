//! Correctness classification of tree nodes.
//!
//! Problem files mark lines in two ways: move-annotation properties
//! (`BM`, `DO`, `TE`) and free text in `C`. All reading of those marks goes
//! through [`classify`] and [`is_preferred`].
//!
//! Precedence: an explicit bad-move marker always makes a node wrong (`DO`
//! only when [`Config::doubtful_is_wrong`] is set). The
//! comment is consulted only when no such marker is present, and only when
//! the config allows it; a wrong keyword beats a right keyword. `TE` never
//! ends a problem, it only steers the hint.

use crate::config::Config;
use crate::constants::{PROP_BAD_MOVE, PROP_DOUBTFUL, PROP_TESUJI};
use crate::tree::Node;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The line is a failure
    Wrong,
    /// The line is marked as the solution
    Right,
    /// No mark either way
    Neutral,
}

pub fn classify(node: &Node, config: &Config) -> Verdict {
    if node.has(PROP_BAD_MOVE) || (config.doubtful_is_wrong && node.has(PROP_DOUBTFUL)) {
        return Verdict::Wrong;
    }
    if config.markers_only {
        return Verdict::Neutral;
    }
    let Some(comment) = node.comment() else {
        return Verdict::Neutral;
    };
    let words: Vec<&str> = comment
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();
    let mentions = |keywords: &[String]| {
        keywords
            .iter()
            .any(|k| words.iter().any(|w| w.eq_ignore_ascii_case(k)))
    };
    if mentions(&config.wrong_keywords) {
        Verdict::Wrong
    } else if mentions(&config.right_keywords) {
        Verdict::Right
    } else {
        Verdict::Neutral
    }
}

/// A node explicitly marked as the preferred continuation.
pub fn is_preferred(node: &Node) -> bool {
    node.has(PROP_TESUJI)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sgf::parse;

    fn verdict_of(text: &str, config: &Config) -> Verdict {
        let tree = parse(text).unwrap();
        classify(tree.root(), config)
    }

    #[test]
    fn test_markers() {
        let config = Config::default();
        assert_eq!(verdict_of("(;BM[1])", &config), Verdict::Wrong);
        assert_eq!(verdict_of("(;DO[])", &config), Verdict::Neutral);
        assert_eq!(verdict_of("(;TE[1])", &config), Verdict::Neutral);
    }

    #[test]
    fn test_doubtful_switch() {
        let config = Config {
            doubtful_is_wrong: true,
            ..Config::default()
        };
        assert_eq!(verdict_of("(;DO[])", &config), Verdict::Wrong);
        assert_eq!(verdict_of("(;DO[]C[Correct])", &config), Verdict::Wrong);
    }

    #[test]
    fn test_marker_beats_comment() {
        let config = Config::default();
        assert_eq!(verdict_of("(;BM[1]C[Correct!])", &config), Verdict::Wrong);
    }

    #[test]
    fn test_comment_keywords_case_insensitive() {
        let config = Config::default();
        assert_eq!(verdict_of("(;C[CORRECT])", &config), Verdict::Right);
        assert_eq!(verdict_of("(;C[That is wrong.])", &config), Verdict::Wrong);
        assert_eq!(verdict_of("(;C[Solved!])", &config), Verdict::Right);
        assert_eq!(verdict_of("(;C[Black lives])", &config), Verdict::Neutral);
    }

    #[test]
    fn test_incorrect_is_not_correct() {
        let config = Config::default();
        assert_eq!(verdict_of("(;C[incorrect])", &config), Verdict::Wrong);
        assert_eq!(verdict_of("(;C[rightly so])", &config), Verdict::Neutral);
        assert_eq!(verdict_of("(;C[Right idea, but not yet.])", &config), Verdict::Neutral);
    }

    #[test]
    fn test_markers_only_policy() {
        let config = Config {
            markers_only: true,
            ..Config::default()
        };
        assert_eq!(verdict_of("(;C[Wrong])", &config), Verdict::Neutral);
        assert_eq!(verdict_of("(;BM[2])", &config), Verdict::Wrong);
    }

    #[test]
    fn test_preferred() {
        let tree = parse("(;TE[1])").unwrap();
        assert!(is_preferred(tree.root()));
    }
}
