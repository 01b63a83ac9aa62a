//! Application configuration file.

use hint_engine::HintPolicyView;
use serde::{Deserialize, Serialize};

/// Top-level shape of `hintkit.yaml`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Hint appearance and matching behavior.
    pub hints: HintPolicyView,
}

#[cfg(test)]
mod tests {
    use super::*;
    use hint_engine::HintStyle;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config: Config = serde_yaml::from_str(
            "hints:\n  style: number\n  mark_hints: true\n",
        )
        .expect("valid yaml");
        assert_eq!(config.hints.style, HintStyle::Number);
        assert!(config.hints.mark_hints);
        assert_eq!(config.hints.letter_seq, HintPolicyView::default().letter_seq);
    }

    #[test]
    fn empty_document_is_default() {
        let config: Config = serde_yaml::from_str("{}").expect("valid yaml");
        assert_eq!(config, Config::default());
    }
}
