//! Relevance scoring of extracted page text against the gold query.
//!
//! The score blends two signals:
//!
//! - keyword hit rate: the share of query keywords found as substrings of
//!   the lowercased text;
//! - token-set fuzzy similarity between the query and the head of the text.
//!
//! `score = 0.6 * hit_rate + 0.4 * fuzzy`, clamped to `[0, 1]`.

use similar::{DiffOp, TextDiff};
use std::collections::BTreeSet;

/// Weight of the keyword hit rate in the blended score.
pub const HIT_RATE_WEIGHT: f64 = 0.6;

/// Weight of the fuzzy similarity in the blended score.
pub const FUZZY_WEIGHT: f64 = 0.4;

/// Characters of text compared by the fuzzy matcher.
pub const FUZZY_WINDOW_CHARS: usize = 5000;

/// Minimum keyword length is this plus one.
const MIN_KEYWORD_LEN: usize = 2;

/// English stopwords excluded from query keywords.
pub const STOPWORDS: &[&str] = &[
    "a", "about", "above", "across", "after", "afterwards", "again", "against", "all", "almost",
    "alone", "along", "already", "also", "although", "always", "am", "among", "amongst",
    "amoungst", "amount", "an", "and", "another", "any", "anyhow", "anyone", "anything", "anyway",
    "anywhere", "are", "around", "as", "at", "back", "be", "became", "because", "become",
    "becomes", "becoming", "been", "before", "beforehand", "behind", "being", "below", "beside",
    "besides", "between", "beyond", "bill", "both", "bottom", "but", "by", "call", "can",
    "cannot", "cant", "co", "con", "could", "couldnt", "cry", "de", "describe", "detail", "do",
    "done", "down", "due", "during", "each", "eg", "eight", "either", "eleven", "else",
    "elsewhere", "empty", "enough", "etc", "even", "ever", "every", "everyone", "everything",
    "everywhere", "except", "few", "fifteen", "fifty", "fill", "find", "fire", "first", "five",
    "for", "former", "formerly", "forty", "found", "four", "from", "front", "full", "further",
    "get", "give", "go", "had", "has", "hasnt", "have", "he", "hence", "her", "here",
    "hereafter", "hereby", "herein", "hereupon", "hers", "herself", "him", "himself", "his",
    "how", "however", "hundred", "i", "ie", "if", "in", "inc", "indeed", "interest", "into",
    "is", "it", "its", "itself", "keep", "last", "latter", "latterly", "least", "less", "ltd",
    "made", "many", "may", "me", "meanwhile", "might", "mill", "mine", "more", "moreover",
    "most", "mostly", "move", "much", "must", "my", "myself", "name", "namely", "neither",
    "never", "nevertheless", "next", "nine", "no", "nobody", "none", "noone", "nor", "not",
    "nothing", "now", "nowhere", "of", "off", "often", "on", "once", "one", "only", "onto", "or",
    "other", "others", "otherwise", "our", "ours", "ourselves", "out", "over", "own", "part",
    "per", "perhaps", "please", "put", "rather", "re", "same", "see", "seem", "seemed",
    "seeming", "seems", "serious", "several", "she", "should", "show", "side", "since",
    "sincere", "six", "sixty", "so", "some", "somehow", "someone", "something", "sometime",
    "sometimes", "somewhere", "still", "such", "system", "take", "ten", "than", "that", "the",
    "their", "them", "themselves", "then", "thence", "there", "thereafter", "thereby",
    "therefore", "therein", "thereupon", "these", "they", "thick", "thin", "third", "this",
    "those", "though", "three", "through", "throughout", "thru", "thus", "to", "together", "too",
    "top", "toward", "towards", "twelve", "twenty", "two", "un", "under", "until", "up", "upon",
    "us", "very", "via", "was", "we", "well", "were", "what", "whatever", "when", "whence",
    "whenever", "where", "whereafter", "whereas", "whereby", "wherein", "whereupon", "wherever",
    "whether", "which", "while", "whither", "who", "whoever", "whole", "whom", "whose", "why",
    "will", "with", "within", "without", "would", "yet", "you", "your", "yours", "yourself",
    "yourselves",
];

/// Scores how well a text matches a query, in `[0, 1]`.
pub trait RelevanceScorer: Send + Sync {
    fn score(&self, query: &str, text: &str) -> f64;
}

/// Keyword hit rate blended with token-set fuzzy similarity.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordFuzzyScorer;

impl RelevanceScorer for KeywordFuzzyScorer {
    fn score(&self, query: &str, text: &str) -> f64 {
        relevance_score(query, text)
    }
}

/// The components of a relevance score, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBreakdown {
    pub hit_rate: f64,
    pub fuzzy: f64,
    pub score: f64,
}

/// Blended relevance of `text` to `query`.
///
/// Returns 0.0 when the query has no keywords.
pub fn relevance_score(query: &str, text: &str) -> f64 {
    score_breakdown(query, text).score
}

/// Compute the score together with its components.
pub fn score_breakdown(query: &str, text: &str) -> ScoreBreakdown {
    let keywords = extract_keywords(query);
    if keywords.is_empty() {
        return ScoreBreakdown {
            hit_rate: 0.0,
            fuzzy: 0.0,
            score: 0.0,
        };
    }

    let hit_rate = keyword_hit_rate(&keywords, text);
    let window: String = text.chars().take(FUZZY_WINDOW_CHARS).collect();
    let fuzzy = token_set_ratio(query, &window);
    let score = (HIT_RATE_WEIGHT * hit_rate + FUZZY_WEIGHT * fuzzy).clamp(0.0, 1.0);

    ScoreBreakdown {
        hit_rate,
        fuzzy,
        score,
    }
}

/// Lowercase alphabetic words longer than two characters, minus stopwords.
///
/// Words are maximal runs of alphanumerics or `_`; a run counts only if it
/// is made of ASCII letters. Repeats are kept.
pub fn extract_keywords(query: &str) -> Vec<String> {
    query
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|w| w.len() > MIN_KEYWORD_LEN && w.chars().all(|c| c.is_ascii_alphabetic()))
        .map(str::to_ascii_lowercase)
        .filter(|w| !STOPWORDS.contains(&w.as_str()))
        .collect()
}

/// Share of `keywords` occurring as substrings of the lowercased `text`.
pub fn keyword_hit_rate(keywords: &[String], text: &str) -> f64 {
    if keywords.is_empty() {
        return 0.0;
    }
    let lower = text.to_lowercase();
    let hits = keywords.iter().filter(|k| lower.contains(k.as_str())).count();
    hits as f64 / keywords.len() as f64
}

/// Token-set similarity of two strings in `[0, 1]`.
///
/// Case-sensitive; tokens are whitespace separated. Either side without
/// tokens scores 0.
pub fn token_set_ratio(a: &str, b: &str) -> f64 {
    let tokens_a: BTreeSet<&str> = a.split_whitespace().collect();
    let tokens_b: BTreeSet<&str> = b.split_whitespace().collect();
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }

    let sect = join(tokens_a.intersection(&tokens_b));
    let only_a = join(tokens_a.difference(&tokens_b));
    let only_b = join(tokens_b.difference(&tokens_a));

    if !sect.is_empty() && (only_a.is_empty() || only_b.is_empty()) {
        return 1.0;
    }

    if sect.is_empty() {
        return indel_ratio(&only_a, &only_b);
    }

    // The shared tokens count toward both the match and the total length.
    let s = sect.chars().count();
    indel_ratio(&format!("{sect} {only_a}"), &format!("{sect} {only_b}"))
        .max(prefix_ratio(s, only_a.chars().count()))
        .max(prefix_ratio(s, only_b.chars().count()))
}

fn join<'a, 'b: 'a>(tokens: impl Iterator<Item = &'a &'b str>) -> String {
    tokens.copied().collect::<Vec<_>>().join(" ")
}

/// Normalized indel similarity, `2 * LCS / (|a| + |b|)` over characters.
fn indel_ratio(a: &str, b: &str) -> f64 {
    let total = a.chars().count() + b.chars().count();
    if total == 0 {
        return 1.0;
    }
    let matched: usize = TextDiff::from_chars(a, b)
        .ops()
        .iter()
        .map(|op| match op {
            DiffOp::Equal { len, .. } => *len,
            _ => 0,
        })
        .sum();
    2.0 * matched as f64 / total as f64
}

/// Indel similarity of `sect` against `sect + " " + rest`.
///
/// One string is a prefix of the other, so the LCS is `sect` itself.
fn prefix_ratio(sect_len: usize, rest_len: usize) -> f64 {
    let s = sect_len as f64;
    2.0 * s / (2.0 * s + 1.0 + rest_len as f64)
}
