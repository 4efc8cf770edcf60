use regex::Regex;
use std::sync::OnceLock;

/// Never emitted as tags, compared case-insensitively.
pub const STOP_WORDS: [&str; 14] = [
    "the", "and", "its", "a", "an", "of", "to", "in", "for", "with", "on", "at", "by", "from",
];

/// Linguistic boundary: pull candidate nouns out of free text.
pub trait NounExtractor {
    fn nouns(&self, text: &str) -> Vec<String>;
}

/// Tags for `notes`: the extractor's nouns minus stop words, de-duplicated
/// case-insensitively and lowercased, in first-seen order.
pub fn extract_tags<E: NounExtractor + ?Sized>(extractor: &E, notes: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for noun in extractor.nouns(notes) {
        let tag = noun.trim().to_lowercase();
        if tag.is_empty() || is_stop_word(&tag) || tags.contains(&tag) {
            continue;
        }
        tags.push(tag);
    }
    tags
}

pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS
        .iter()
        .any(|stop| stop.eq_ignore_ascii_case(word.trim()))
}

// Words that are almost never nouns in travel notes.
const NON_NOUNS: &[&str] = &[
    // pronouns and determiners
    "i", "me", "my", "mine", "we", "us", "our", "ours", "you", "your", "yours", "he", "him",
    "his", "she", "her", "hers", "it", "they", "them", "their", "theirs", "this", "that",
    "these", "those", "some", "any", "all", "each", "every", "no", "none", "both", "either",
    "neither", "much", "many", "more", "most", "less", "least", "few", "several", "other",
    "another", "such", "what", "which", "who", "whom", "whose", "where", "when", "why", "how",
    // conjunctions and prepositions
    "or", "but", "nor", "so", "yet", "if", "then", "than", "because", "while", "although",
    "though", "unless", "until", "about", "above", "across", "after", "against", "along",
    "among", "around", "before", "behind", "below", "beside", "between", "beyond", "during",
    "except", "inside", "into", "near", "off", "onto", "out", "outside", "over", "past",
    "since", "through", "toward", "towards", "under", "up", "down", "upon", "within", "without",
    "via", "per", "as",
    // auxiliaries and common verbs
    "be", "am", "is", "are", "was", "were", "been", "being", "have", "has", "had", "having",
    "do", "does", "did", "doing", "will", "would", "shall", "should", "can", "could", "may",
    "might", "must", "want", "wants", "wanted", "like", "likes", "liked", "love", "loves",
    "loved", "prefer", "prefers", "need", "needs", "see", "visit", "go", "going", "get",
    "try", "avoid", "enjoy", "make", "take", "let", "please", "hate", "dislike", "include",
    // adjectives and adverbs that show up in notes
    "not", "very", "too", "also", "just", "only", "really", "quite", "good", "great", "nice",
    "best", "lots", "lot", "fun", "cheap", "expensive", "local", "new", "old", "big", "small",
    "here", "there", "now", "again", "always", "never", "often", "maybe", "quiet", "tight",
    "busy", "calm", "cozy", "cosy", "relaxed", "relaxing", "romantic", "scenic", "historic",
    "famous", "popular", "modern", "ancient", "authentic", "traditional", "hidden", "free",
    "cheaper", "short", "long", "early", "late", "easy", "hard", "hot", "cold", "warm", "fancy",
    "quick", "slow", "fresh", "open",
];

// Lowercase nouns that the `-ly` adverb rule would otherwise drop.
const LY_NOUNS: &[&str] = &[
    "family", "july", "rally", "belly", "jelly", "lily", "ally", "holly", "folly", "gully",
    "anomaly", "assembly", "monopoly", "supply", "reply", "butterfly", "dragonfly", "firefly",
];

// Lowercase adjective endings, checked on words longer than five letters.
const ADJECTIVE_SUFFIXES: &[&str] = &["ful", "ous", "less"];

fn looks_like_modifier(lower: &str) -> bool {
    if lower.len() > 4 && lower.ends_with("ly") {
        return !LY_NOUNS.contains(&lower);
    }
    lower.chars().count() > 5 && ADJECTIVE_SUFFIXES.iter().any(|suffix| lower.ends_with(suffix))
}

fn word_pattern() -> &'static Regex {
    static WORD: OnceLock<Regex> = OnceLock::new();
    WORD.get_or_init(|| Regex::new(r"[\p{L}][\p{L}'\-]*").expect("word pattern is valid"))
}

/// Lexicon-based noun guesser: keeps word tokens that are not in a closed set
/// of function words, common verbs and adjectives. Lowercase words with an
/// adverb or adjective ending are dropped unless they are known nouns;
/// capitalised words are always kept.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeuristicNounExtractor;

impl NounExtractor for HeuristicNounExtractor {
    fn nouns(&self, text: &str) -> Vec<String> {
        word_pattern()
            .find_iter(text)
            .map(|m| m.as_str().trim_matches(|c: char| c == '\'' || c == '-'))
            .filter(|word| word.chars().count() > 1)
            .filter(|word| {
                let lower = word.to_lowercase();
                let capitalized = word.chars().next().is_some_and(char::is_uppercase);
                !NON_NOUNS.contains(&lower.as_str())
                    && (capitalized || !looks_like_modifier(&lower))
            })
            .map(|word| word.strip_suffix("'s").unwrap_or(word).to_string())
            .collect()
    }
}
