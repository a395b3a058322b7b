//! Lexical signal extraction.
//!
//! Turns raw request text into a [`SignalSet`]: which cue families are
//! present, how strongly, and a best-effort topic label. Matching is
//! case-insensitive and whole-word, and when several phrases of the same
//! family match, the longest one is reported.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Families of lexical cues the extractor recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    /// Asking for a finished artifact.
    ShortcutRequest,
    /// Self-reported attempts or being stuck.
    StruggleEvidence,
    /// Probing questions (why, edge cases, proofs, optimization).
    InquiryDepth,
    /// Shows own reasoning.
    ReasoningShown,
    /// Competency cues: breaking a problem apart.
    Analysis,
    /// Competency cues: combining ideas into a design.
    Synthesis,
    /// Competency cues: reflecting on how one learns.
    Metacognition,
    Verification,
    Collaboration,
    Learning,
    TimePressure,
    Anxiety,
    Convenience,
    Curiosity,
    HarmCue,
    DeceptionCue,
    BiasCue,
    CoercionCue,
    DignityCue,
    SensitiveTopic,
}

impl SignalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalKind::ShortcutRequest => "shortcut_request",
            SignalKind::StruggleEvidence => "struggle_evidence",
            SignalKind::InquiryDepth => "inquiry_depth",
            SignalKind::ReasoningShown => "reasoning_shown",
            SignalKind::Analysis => "analysis",
            SignalKind::Synthesis => "synthesis",
            SignalKind::Metacognition => "metacognition",
            SignalKind::Verification => "verification",
            SignalKind::Collaboration => "collaboration",
            SignalKind::Learning => "learning",
            SignalKind::TimePressure => "time_pressure",
            SignalKind::Anxiety => "anxiety",
            SignalKind::Convenience => "convenience",
            SignalKind::Curiosity => "curiosity",
            SignalKind::HarmCue => "harm_cue",
            SignalKind::DeceptionCue => "deception_cue",
            SignalKind::BiasCue => "bias_cue",
            SignalKind::CoercionCue => "coercion_cue",
            SignalKind::DignityCue => "dignity_cue",
            SignalKind::SensitiveTopic => "sensitive_topic",
        }
    }
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

const PHRASES: &[(SignalKind, &[&str])] = &[
    (
        SignalKind::ShortcutRequest,
        &[
            "write my", "do my", "just give me", "give me the answer", "solve this for me",
            "do it for me", "write it for me", "do this for me", "complete my", "finish my",
            "just tell me the answer", "just solve", "essay for me", "homework for me",
            "write me a", "can you just", "give me the code", "give me the solution",
        ],
    ),
    (
        SignalKind::StruggleEvidence,
        &[
            "i tried", "i've tried", "i have tried", "i'm stuck", "i am stuck", "got stuck",
            "stuck on", "stuck at", "got to step", "my attempt", "i attempted", "i worked on",
            "i've been working on", "doesn't work", "i tested", "i experimented",
        ],
    ),
    (
        SignalKind::InquiryDepth,
        &[
            "why", "edge case", "edge cases", "corner case", "prove", "proof", "optimize",
            "optimise", "trade-off", "tradeoff", "complexity", "what if", "invariant",
            "alternative approach", "more elegant",
        ],
    ),
    (
        SignalKind::ReasoningShown,
        &[
            "because", "i think", "my approach", "my reasoning", "i considered", "however",
            "although", "depends on", "i analyzed", "i've analyzed", "my method", "so that",
        ],
    ),
    (
        SignalKind::Analysis,
        &[
            "analyze", "analyse", "examine", "break down", "breakdown", "decompose",
            "understand why",
        ],
    ),
    (
        SignalKind::Synthesis,
        &["combine", "integrate", "design", "synthesize", "synthesise", "bring together"],
    ),
    (
        SignalKind::Metacognition,
        &["how do i learn", "how i learn", "my approach", "my method", "my process", "i've tried"],
    ),
    (
        SignalKind::Verification,
        &[
            "check my", "verify", "is this right", "is this correct", "am i right", "validate",
            "confirm", "double-check",
        ],
    ),
    (
        SignalKind::Collaboration,
        &["help me", "guide me", "feedback", "review my", "work through", "together", "improve my"],
    ),
    (
        SignalKind::Learning,
        &[
            "how do", "how does", "how can i", "explain", "understand", "teach me", "learn",
            "what is", "what are",
        ],
    ),
    (
        SignalKind::TimePressure,
        &[
            "urgent", "deadline", "tomorrow", "tonight", "asap", "due today", "due tomorrow",
            "due tonight", "due soon", "hurry", "running out of time", "in an hour",
        ],
    ),
    (
        SignalKind::Anxiety,
        &[
            "afraid", "worried", "scared", "confused", "lost", "desperate", "overwhelmed",
            "panicking", "stressed", "i don't know",
        ],
    ),
    (
        SignalKind::Convenience,
        &["just give", "quick", "quickly", "easy way", "shortcut", "without effort", "don't want to"],
    ),
    (
        SignalKind::Curiosity,
        &["curious", "wonder", "interested in", "want to understand", "fascinated"],
    ),
    (
        SignalKind::HarmCue,
        &[
            "harm", "hurt someone", "hurt them", "hurt him", "hurt her", "attack someone",
            "attack them", "kill someone", "kill them", "kill him", "kill her", "destroy their",
            "damage their", "sabotage", "poison", "weapon", "revenge",
        ],
    ),
    (
        SignalKind::DeceptionCue,
        &[
            "fake", "pretend", "trick", "manipulate", "deceive", "cheat", "fraud", "plagiarize",
            "plagiarise", "lie to", "forge", "without getting caught", "pass it off as my own",
            "undetectable",
        ],
    ),
    (
        SignalKind::BiasCue,
        &[
            "racist", "racism", "sexist", "sexism", "discriminate", "discrimination", "bigot",
            "prejudice", "stereotype", "stereotypes", "inferior race",
        ],
    ),
    (
        SignalKind::CoercionCue,
        &[
            "force them", "force him", "force her", "pressure them", "coerce", "blackmail",
            "threaten", "make them do", "intimidate",
        ],
    ),
    (
        SignalKind::DignityCue,
        &["humiliate", "degrade", "mock them", "shame them", "belittle", "bully", "dehumanize"],
    ),
    (
        SignalKind::SensitiveTopic,
        &[
            "diagnose", "diagnosis", "dosage", "medication", "lawsuit", "legal advice",
            "invest my savings", "self-medicate", "symptoms",
        ],
    ),
];

const TOPICS: &[(&str, &[&str])] = &[
    ("writing", &["essay", "paper", "report", "thesis", "article", "writing", "paragraph"]),
    (
        "mathematics",
        &["math", "maths", "algebra", "calculus", "equation", "geometry", "statistics", "math problems"],
    ),
    ("proofs", &["proof", "theorem", "lemma", "induction"]),
    (
        "programming",
        &["code", "coding", "program", "debug", "function", "rust", "python", "javascript", "compiler", "bug"],
    ),
    (
        "algorithms",
        &["algorithm", "recursion", "big o", "sorting", "data structure", "o n log n"],
    ),
    ("science", &["physics", "chemistry", "biology", "experiment"]),
    ("business", &["business", "startup", "company", "marketing", "revenue"]),
    ("career", &["career", "job", "interview", "resume"]),
    ("life", &["life", "relationship", "should i"]),
];

/// Phrase tables normalized once, the same way queries are.
static PHRASE_TABLE: Lazy<Vec<(SignalKind, Vec<String>)>> = Lazy::new(|| {
    PHRASES
        .iter()
        .map(|(kind, phrases)| (*kind, phrases.iter().map(|p| normalize(p)).collect()))
        .collect()
});

static TOPIC_TABLE: Lazy<Vec<(&'static str, Vec<String>)>> = Lazy::new(|| {
    TOPICS
        .iter()
        .map(|(label, phrases)| (*label, phrases.iter().map(|p| normalize(p)).collect()))
        .collect()
});

/// One detected cue family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalMatch {
    /// Number of distinct phrases of this family present.
    pub strength: u32,
    /// Longest matching phrase (lexicographically first on length ties).
    pub phrase: String,
}

/// Structured bag of signals for one request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalSet {
    signals: BTreeMap<SignalKind, SignalMatch>,
    topic_tag: Option<String>,
    word_count: usize,
    question_count: usize,
}

impl SignalSet {
    /// An empty signal set.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn has(&self, kind: SignalKind) -> bool {
        self.signals.contains_key(&kind)
    }

    /// Strength of a signal, zero when absent.
    pub fn strength(&self, kind: SignalKind) -> u32 {
        self.signals.get(&kind).map(|m| m.strength).unwrap_or(0)
    }

    pub fn get(&self, kind: SignalKind) -> Option<&SignalMatch> {
        self.signals.get(&kind)
    }

    /// Longest phrase matched for a signal.
    pub fn phrase(&self, kind: SignalKind) -> Option<&str> {
        self.signals.get(&kind).map(|m| m.phrase.as_str())
    }

    pub fn topic_tag(&self) -> Option<&str> {
        self.topic_tag.as_deref()
    }

    pub fn word_count(&self) -> usize {
        self.word_count
    }

    pub fn question_count(&self) -> usize {
        self.question_count
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty() && self.topic_tag.is_none()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SignalKind, &SignalMatch)> {
        self.signals.iter().map(|(k, v)| (*k, v))
    }

    /// Compact one-line rendering, e.g. `shortcut_request(write my), topic=writing`.
    pub fn summary(&self) -> String {
        let mut parts: Vec<String> = self
            .signals
            .iter()
            .map(|(kind, m)| format!("{}({})", kind, m.phrase))
            .collect();
        if let Some(topic) = &self.topic_tag {
            parts.push(format!("topic={}", topic));
        }
        if parts.is_empty() {
            "none".to_string()
        } else {
            parts.join(", ")
        }
    }

    /// Builder used by tests and callers that assemble signals by hand.
    pub fn with_signal(mut self, kind: SignalKind, phrase: impl Into<String>) -> Self {
        let phrase = phrase.into();
        let entry = self.signals.entry(kind).or_insert(SignalMatch {
            strength: 0,
            phrase: String::new(),
        });
        entry.strength += 1;
        if prefer(&phrase, &entry.phrase) {
            entry.phrase = phrase;
        }
        self
    }

    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic_tag = Some(topic.into());
        self
    }
}

/// Deterministic phrase matcher. Stateless and infallible.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignalExtractor;

impl SignalExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extracts signals from a query. The optional prior-turn context only
    /// supplies a topic when the query itself names none.
    pub fn extract(&self, query: &str, context: Option<&str>) -> SignalSet {
        let normalized = normalize(query);
        if normalized.is_empty() {
            return SignalSet::empty();
        }
        let haystack = format!(" {} ", normalized);

        let mut signals = BTreeMap::new();
        for (kind, phrases) in PHRASE_TABLE.iter() {
            if let Some(found) = best_match(&haystack, phrases) {
                signals.insert(*kind, found);
            }
        }

        let topic_tag = detect_topic(&haystack).or_else(|| {
            context
                .map(normalize)
                .filter(|c| !c.is_empty())
                .and_then(|c| detect_topic(&format!(" {} ", c)))
        });

        SignalSet {
            signals,
            topic_tag,
            word_count: normalized.split(' ').count(),
            question_count: query.matches('?').count(),
        }
    }
}

fn best_match(haystack: &str, phrases: &[String]) -> Option<SignalMatch> {
    let mut strength = 0u32;
    let mut best: Option<&String> = None;
    for phrase in phrases {
        if contains_phrase(haystack, phrase) {
            strength += 1;
            if best.map_or(true, |b| prefer(phrase, b)) {
                best = Some(phrase);
            }
        }
    }
    best.map(|phrase| SignalMatch {
        strength,
        phrase: phrase.clone(),
    })
}

fn detect_topic(haystack: &str) -> Option<String> {
    let mut best: Option<(&str, &String)> = None;
    for (label, phrases) in TOPIC_TABLE.iter() {
        for phrase in phrases {
            if !contains_phrase(haystack, phrase) {
                continue;
            }
            // Longest phrase wins; earlier table rows win exact ties.
            if best.map_or(true, |(_, b)| phrase.len() > b.len()) {
                best = Some((*label, phrase));
            }
        }
    }
    best.map(|(label, _)| label.to_string())
}

/// True when `candidate` should replace `current` as the reported phrase.
fn prefer(candidate: &str, current: &str) -> bool {
    candidate.len() > current.len()
        || (candidate.len() == current.len() && candidate < current)
}

fn contains_phrase(haystack: &str, phrase: &str) -> bool {
    !phrase.is_empty() && haystack.contains(&format!(" {} ", phrase))
}

/// Lowercases, folds typographic apostrophes, and turns every other
/// non-alphanumeric character into a single space.
pub(crate) fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;
    for ch in text.chars() {
        let ch = match ch {
            '\u{2018}' | '\u{2019}' => '\'',
            other => other,
        };
        if ch.is_alphanumeric() || ch == '\'' {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.extend(ch.to_lowercase());
        } else {
            pending_space = true;
        }
    }
    out
}
