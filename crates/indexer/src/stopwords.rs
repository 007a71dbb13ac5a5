//! Stop-word lists.
//!
//! Lower-case, no accents stripped: tokens are compared after lower-casing only.

use crate::config::StopWordLanguage;
use std::collections::HashSet;

const ENGLISH: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and", "any",
    "are", "as", "at", "be", "because", "been", "before", "being", "below", "between", "both",
    "but", "by", "can", "could", "did", "do", "does", "doing", "down", "during", "each", "either",
    "else", "ever", "every", "few", "for", "from", "further", "had", "has", "have", "having", "he",
    "her", "here", "hers", "herself", "him", "himself", "his", "how", "however", "if", "in",
    "into", "is", "it", "its", "itself", "just", "may", "me", "might", "more", "most", "must",
    "my", "myself", "neither", "no", "nor", "not", "now", "of", "off", "on", "once", "one", "only",
    "or", "other", "our", "ours", "ourselves", "out", "over", "own", "same", "she", "should", "so",
    "some", "such", "than", "that", "the", "their", "theirs", "them", "themselves", "then",
    "there", "these", "they", "this", "those", "through", "to", "too", "under", "until", "up",
    "upon", "us", "very", "was", "we", "were", "what", "when", "where", "which", "while", "who",
    "whom", "whose", "why", "will", "with", "within", "without", "would", "yet", "you", "your",
    "yours", "yourself", "yourselves",
];

const PORTUGUESE: &[&str] = &[
    "a", "ao", "aos", "aquela", "aquelas", "aquele", "aqueles", "aquilo", "as", "até", "com",
    "como", "da", "das", "de", "dela", "delas", "dele", "deles", "depois", "do", "dos", "e", "ela",
    "elas", "ele", "eles", "em", "entre", "era", "eram", "essa", "essas", "esse", "esses", "esta",
    "estas", "este", "estes", "eu", "foi", "foram", "há", "isso", "isto", "já", "lhe", "lhes",
    "mais", "mas", "me", "mesmo", "meu", "meus", "minha", "minhas", "muito", "na", "nas", "nem",
    "no", "nos", "nossa", "nossas", "nosso", "nossos", "num", "numa", "não", "o", "os", "ou",
    "para", "pela", "pelas", "pelo", "pelos", "por", "qual", "quando", "que", "quem", "se", "sem",
    "ser", "seu", "seus", "só", "sua", "suas", "também", "te", "tem", "têm", "teu", "tua", "um",
    "uma", "umas", "uns", "você", "vocês", "à", "às", "é",
];

/// Set of words dropped by the analyzer
#[derive(Debug, Clone, Default)]
pub struct StopWords {
    words: HashSet<&'static str>,
}

impl StopWords {
    pub fn for_language(language: StopWordLanguage) -> Self {
        let list: &[&'static str] = match language {
            StopWordLanguage::English => ENGLISH,
            StopWordLanguage::Portuguese => PORTUGUESE,
            StopWordLanguage::None => &[],
        };
        Self {
            words: list.iter().copied().collect(),
        }
    }

    pub fn contains(&self, token: &str) -> bool {
        self.words.contains(token)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_lists() {
        let english = StopWords::for_language(StopWordLanguage::English);
        assert!(english.contains("the"));
        assert!(!english.contains("batman"));

        let portuguese = StopWords::for_language(StopWordLanguage::Portuguese);
        assert!(portuguese.contains("não"));
        assert!(!portuguese.contains("the"));

        assert!(StopWords::for_language(StopWordLanguage::None).is_empty());
    }
}
