//! Regex and keyword heuristics that pull "reason" phrases out of OCR text taken
//! from decision diagrams.
//!
//! These are tuned against one family of diagram layouts. They are best-effort:
//! nothing here promises stable output for arbitrary images.
use std::collections::BTreeSet;

use regex::Regex;

/// Text after a bullet-like symbol, up to end of line
const SYMBOL_PATTERN: &str = r"(?im)[©•]\s*(.+?)(?:\n|$)";
/// `left / right` alternatives
const SLASH_PATTERN: &str = r"(?i)(.+?)\s+/\s+(.+?)(?:\n|$)";
/// `left or right` alternatives
const OR_PATTERN: &str = r"(?i)(.+?)\s+or\s+(.+?)(?:\n|$)";
const WHITESPACE_PATTERN: &str = r"\s+";
const SENTENCE_SPLIT_PATTERN: &str = r"[.\n]";
/// Bullets and stray `o` glyphs that OCR puts in front of list items
const LEADING_NOISE_PATTERN: &str = r"^[o©•|\s]+";

/// Lines naming a decision type rather than a reason (decision heuristic).
const DECISION_SKIP: &[&str] = &[
    "PLAY ON",
    "FREE KICK",
    "PENALTY",
    "OFFENCE",
    "SANCTION",
    "CARELESS",
    "RECKLESS",
    "SERIOUS FOUL",
];

const EXPLANATION_KEYWORDS: &[&str] = &[
    "no ",
    "not ",
    "because",
    "due to",
    "as a result",
    "since",
    "when",
    "if",
];

const SENTENCE_INDICATORS: &[&str] = &[
    "supports",
    "extended",
    "stopped",
    "challenge",
    "contact",
    "force",
    "intent",
    "position",
];

/// Lines naming a decision type rather than a reason (line heuristic).
const LINE_SKIP: &[&str] = &[
    "PLAY ON",
    "FREE KICK",
    "PENALTY KICK",
    "NO OFFENCE",
    "INDIRECT",
    "DIRECT",
    "DROP BALL",
    "KICK OFF",
];

const LINE_KEYWORDS: &[&str] = &[
    "not",
    "no",
    "but",
    "when",
    "by",
    "off",
    "supports",
    "extended",
    "challenge",
    "interfering",
    "gaining",
    "obstructing",
    "impact",
    "action",
    "clearly",
    "obvious",
    "deliberately",
    "rebounds",
    "deflects",
    "saved",
    "touching",
    "playing",
    "ball",
    "opponent",
    "teammate",
];

const DECISION_TRIM: &[char] = &['.', ',', ';', ':', '(', ')', '[', ']'];
const LINE_TRIM: &[char] = &['.', ',', ';', ':', '(', ')', '[', ']', '©', '•', 'o', '|'];

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

/// Sort by lowercase form; ties fall back to byte order so output is deterministic.
pub fn sort_case_insensitive(items: &mut [String]) {
    items.sort_by(|a, b| {
        a.to_lowercase()
            .cmp(&b.to_lowercase())
            .then_with(|| a.cmp(b))
    });
}

/// Keep the first spelling of every case-insensitive duplicate whose trimmed
/// length exceeds `min_len`, then sort case-insensitively.
pub fn unique_case_insensitive<I>(items: I, min_len: usize) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = BTreeSet::new();
    let mut unique = Vec::new();
    for item in items {
        let key = item.trim().to_lowercase();
        if char_len(item.trim()) > min_len && seen.insert(key) {
            unique.push(item);
        }
    }
    sort_case_insensitive(&mut unique);
    unique
}

/// Compiled patterns shared by both heuristics.
#[derive(Debug, Clone)]
pub struct ReasonPatterns {
    symbol: Regex,
    slash: Regex,
    or: Regex,
    whitespace: Regex,
    sentence_split: Regex,
    leading_noise: Regex,
}

impl ReasonPatterns {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            symbol: Regex::new(SYMBOL_PATTERN)?,
            slash: Regex::new(SLASH_PATTERN)?,
            or: Regex::new(OR_PATTERN)?,
            whitespace: Regex::new(WHITESPACE_PATTERN)?,
            sentence_split: Regex::new(SENTENCE_SPLIT_PATTERN)?,
            leading_noise: Regex::new(LEADING_NOISE_PATTERN)?,
        })
    }

    fn collapse_whitespace(&self, text: &str) -> String {
        self.whitespace.replace_all(text, " ").into_owned()
    }

    /// Reasons found in the text of one decision image, or `None` when nothing
    /// survives cleaning.
    ///
    /// Whitespace (newlines included) is collapsed first, so the whole image is
    /// searched as one line.
    pub fn decision_reasons(&self, text: &str) -> Option<Vec<String>> {
        let text = self.collapse_whitespace(text);
        let text = text.trim();
        let mut candidates: Vec<String> = Vec::new();

        for caps in self.symbol.captures_iter(text) {
            let m = caps[1].trim();
            if char_len(m) > 10 {
                candidates.push(m.to_string());
            }
        }

        for line in text.split('\n') {
            let line = line.trim();
            if contains_any(&line.to_uppercase(), DECISION_SKIP) {
                continue;
            }
            if contains_any(&line.to_lowercase(), EXPLANATION_KEYWORDS) && char_len(line) > 15 {
                candidates.push(line.to_string());
            }
        }

        for sentence in self.sentence_split.split(text) {
            let sentence = sentence.trim();
            if char_len(sentence) < 15 {
                continue;
            }
            let upper = sentence.to_uppercase();
            if upper.contains("FREE KICK") && upper.contains("PENALTY") {
                continue;
            }
            if contains_any(&sentence.to_lowercase(), SENTENCE_INDICATORS) {
                candidates.push(sentence.to_string());
            }
        }

        for pattern in [&self.slash, &self.or] {
            for caps in pattern.captures_iter(text) {
                for group in [&caps[1], &caps[2]] {
                    let part = group.trim();
                    if char_len(part) > 10 {
                        candidates.push(part.to_string());
                    }
                }
            }
        }

        let mut cleaned: Vec<String> = Vec::new();
        for candidate in candidates {
            let reason = self.collapse_whitespace(&candidate);
            let reason = reason.trim_matches(DECISION_TRIM);
            let len = char_len(reason);
            if !(10..=200).contains(&len) {
                continue;
            }
            let lower = reason.to_lowercase();
            if !cleaned.iter().any(|r| r.to_lowercase() == lower) {
                cleaned.push(reason.to_string());
            }
        }

        if cleaned.is_empty() { None } else { Some(cleaned) }
    }

    /// Reason-like lines of one image, cleaned of OCR bullet noise.
    pub fn line_reasons(&self, text: &str) -> Vec<String> {
        let mut reasons = Vec::new();

        for line in text.split('\n').map(str::trim).filter(|l| !l.is_empty()) {
            if contains_any(&line.to_uppercase(), LINE_SKIP) {
                continue;
            }
            let len = char_len(line);
            if !(8..=200).contains(&len) {
                continue;
            }
            if !contains_any(&line.to_lowercase(), LINE_KEYWORDS) {
                continue;
            }

            let collapsed = self.collapse_whitespace(line);
            let stripped = collapsed.trim_matches(LINE_TRIM);
            let cleaned = self.leading_noise.replace(stripped, "");
            let cleaned = cleaned.trim();
            if (8..=180).contains(&char_len(cleaned)) {
                reasons.push(cleaned.to_string());
            }
        }

        reasons
    }
}

/// One-shot form of [`ReasonPatterns::decision_reasons`].
pub fn find_decision_reasons(text: &str) -> Result<Option<Vec<String>>, regex::Error> {
    Ok(ReasonPatterns::new()?.decision_reasons(text))
}

/// One-shot form of [`ReasonPatterns::line_reasons`].
pub fn find_line_reasons(text: &str) -> Result<Vec<String>, regex::Error> {
    Ok(ReasonPatterns::new()?.line_reasons(text))
}
