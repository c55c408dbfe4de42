//! Query Classifier
//!
//! Cheap local pre-filter run on every user turn before the model is called.
//! Decides between a fixed refusal, a canned self-introduction, and
//! delegating to the model.

/// Substrings that mark a query as construction-related
pub const DOMAIN_KEYWORDS: &[&str] = &[
    "construction",
    "boq",
    "material",
    "cement",
    "steel",
    "building",
    "contract",
    "safety",
    "method",
    "site",
    "project",
];

/// Reply for queries outside the construction domain
pub const REFUSAL_REPLY: &str = "I can answer only construction-related queries.";

/// Phrase that triggers the canned self-introduction
pub const IDENTITY_PHRASE: &str = "who are you";

/// Reply to "who are you"
pub const IDENTITY_REPLY: &str =
    "I am a Chatbot designed by Chaitanya Sannidhi to answer your construction queries effectively.";

/// How a user turn should be answered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// No domain keyword present
    Refuse,
    /// Asked who the assistant is
    Identify,
    /// In-domain query for the model
    Delegate,
}

impl Decision {
    /// Fixed reply for local decisions, None when the model must answer
    pub fn canned_reply(&self) -> Option<&'static str> {
        match self {
            Decision::Refuse => Some(REFUSAL_REPLY),
            Decision::Identify => Some(IDENTITY_REPLY),
            Decision::Delegate => None,
        }
    }
}

/// True if the (already lowercased) input mentions any domain keyword
pub fn is_in_domain(normalized: &str) -> bool {
    DOMAIN_KEYWORDS.iter().any(|kw| normalized.contains(kw))
}

/// Classify one user turn.
///
/// The keyword check runs first and may pick a refusal. The identity check
/// runs afterwards regardless and overrides whatever the keyword check chose.
/// Only input that passes the keyword check and is not an identity question
/// reaches the model.
pub fn classify(input: &str) -> Decision {
    let normalized = input.trim().to_lowercase();

    let mut decision = if is_in_domain(&normalized) {
        Decision::Delegate
    } else {
        Decision::Refuse
    };

    if normalized.contains(IDENTITY_PHRASE) {
        decision = Decision::Identify;
    }

    decision
}
