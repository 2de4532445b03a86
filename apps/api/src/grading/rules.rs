//! Rule tables: marker sets and thresholds for every scored dimension.
//!
//! Pure data. The scorers own the AND/OR shape; these tables own the words.
//! Markers are matched as lower-case substrings of the lower-cased answer,
//! so multi-word phrases and trailing spaces (`"i "`) are significant.

/// Bump when marker lists or thresholds change.
pub const RULES_VERSION: &str = "2024.2";

/// A relevance topic: a key plus the words that signal it.
#[derive(Debug, Clone, Copy)]
pub struct Topic {
    pub key: &'static str,
    pub markers: &'static [&'static str],
}

#[derive(Debug, Clone, Copy)]
pub struct SituationRules {
    pub context_markers: &'static [&'static str],
    /// Relative-time phrases, word-bounded.
    pub specificity_pattern: &'static str,
    pub min_words: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct TaskRules {
    pub need_markers: &'static [&'static str],
    pub goal_markers: &'static [&'static str],
    pub min_words: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct ActionRules {
    pub markers: &'static [&'static str],
    pub sequence_markers: &'static [&'static str],
    pub min_hits: usize,
    pub min_words: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct ResultRules {
    pub outcome_markers: &'static [&'static str],
    /// Percentage, `Nx` multiplier, currency amount, or a count of a unit.
    pub metric_pattern: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct ReflectionRules {
    pub learning_markers: &'static [&'static str],
    pub growth_markers: &'static [&'static str],
}

#[derive(Debug, Clone, Copy)]
pub struct ClarityRules {
    pub short_answer_words: usize,
    pub short_answer_score: u8,
    /// Counted with a space on each side to avoid partial-word hits.
    pub fillers: &'static [&'static str],
    pub max_fillers: usize,
    pub concise_min_words: usize,
    pub wall_of_text_words: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct StructureRules {
    pub labels: &'static [&'static str],
    pub beginning_markers: &'static [&'static str],
    pub middle_markers: &'static [&'static str],
    pub ending_markers: &'static [&'static str],
    pub transitions: &'static [&'static str],
    pub snippet_chars: usize,
    pub max_transition_bonus: u8,
}

#[derive(Debug, Clone, Copy)]
pub struct CompletenessRules {
    pub components: &'static [(&'static str, &'static [&'static str])],
    pub short_answer_words: usize,
    pub short_answer_cap: u8,
}

#[derive(Debug, Clone, Copy)]
pub struct RuleTables {
    /// Order is the tie-break when a question matches several topics.
    pub topics: &'static [Topic],
    /// Distinct hits another topic needs in the answer to trip the gate.
    pub mismatch_min_hits: usize,
    pub situation: SituationRules,
    pub task: TaskRules,
    pub action: ActionRules,
    pub result: ResultRules,
    pub reflection: ReflectionRules,
    pub clarity: ClarityRules,
    pub structure: StructureRules,
    pub completeness: CompletenessRules,
}

pub static RULES: RuleTables = RuleTables {
    topics: &[
        Topic {
            key: "disagree",
            markers: &[
                "disagree", "conflict", "argument", "coworker", "opinion", "different", "view",
                "perspective", "resolve", "handle", "manager", "team", "clash", "fight",
                "tension",
            ],
        },
        Topic {
            key: "complex",
            markers: &[
                "complex", "problem", "information", "unknown", "data", "figure out", "solve",
                "ambiguous", "uncertain", "challenge", "difficult", "issue", "situation",
                "analyze", "investigate", "technical",
            ],
        },
        Topic {
            key: "persuade",
            markers: &[
                "persuade", "convince", "stakeholder", "buy-in", "propose", "pitch", "agreement",
                "negotiate", "idea", "suggestion", "team", "align", "influence",
            ],
        },
        Topic {
            key: "mistake",
            markers: &[
                "mistake", "fail", "error", "wrong", "fix", "apologize", "correct", "missed",
                "regret", "issue", "bug", "accident", "overlooked", "failure",
            ],
        },
        Topic {
            key: "prioritize",
            markers: &[
                "prioritize", "deadline", "urgent", "important", "focus", "juggle", "manage",
                "time", "schedule", "task", "project", "plan", "roadmap",
            ],
        },
    ],
    mismatch_min_hits: 2,
    situation: SituationRules {
        context_markers: &[
            "when", "time", "situation", "context", "background", "at", "during", "while",
            "working on", "project",
        ],
        specificity_pattern: r"\b(last|previous|ago|in \d{4}|month|year|quarter|q[1-4])\b",
        min_words: 30,
    },
    task: TaskRules {
        need_markers: &[
            "needed to", "had to", "was responsible", "my role", "goal was", "objective",
            "challenge", "problem", "task", "required",
        ],
        goal_markers: &[
            "goal", "objective", "achieve", "deliver", "solve", "to cut", "to reduce",
            "to improve", "to increase", "to ensure",
        ],
        min_words: 20,
    },
    action: ActionRules {
        markers: &[
            "i ", "i decided", "i implemented", "i created", "i developed", "i analyzed",
            "i designed", "i proposed", "i worked", "i collaborated", "first", "then", "next",
            "after that", "finally",
        ],
        sequence_markers: &["first", "then", "next", "after", "finally"],
        min_hits: 3,
        min_words: 40,
    },
    result: ResultRules {
        outcome_markers: &[
            "result", "outcome", "achieved", "delivered", "completed", "increased", "decreased",
            "reduced", "improved", "saved",
        ],
        metric_pattern: r"\b\d+\s*%|\b\d+x\b|\$\d+|\d+\s*(users|customers|hours|days|weeks)",
    },
    reflection: ReflectionRules {
        learning_markers: &[
            "learned", "realized", "discovered", "understood", "insight", "would", "could have",
            "should have", "next time", "in future", "taught me", "experience showed",
            "takeaway",
        ],
        growth_markers: &["would", "will", "next time", "in future", "going forward"],
    },
    clarity: ClarityRules {
        short_answer_words: 20,
        short_answer_score: 1,
        fillers: &["um", "uh", "like"],
        max_fillers: 3,
        concise_min_words: 50,
        wall_of_text_words: 150,
    },
    structure: StructureRules {
        labels: &["situation:", "task:", "action:", "result:"],
        beginning_markers: &["when", "time", "situation", "context"],
        middle_markers: &["i decided", "i implemented", "i then", "next"],
        ending_markers: &["result", "achieved", "learned", "outcome"],
        transitions: &[
            "first", "then", "next", "after", "finally", "as a result", "therefore",
        ],
        snippet_chars: 100,
        max_transition_bonus: 2,
    },
    completeness: CompletenessRules {
        components: &[
            ("context", &["when", "situation", "background"]),
            ("challenge", &["problem", "challenge", "needed", "had to"]),
            ("action", &["i implemented", "i created", "i decided"]),
            ("outcome", &["result", "achieved", "completed"]),
            ("learning", &["learned", "realized", "would"]),
        ],
        short_answer_words: 40,
        short_answer_cap: 2,
    },
};

/// True if `text` contains any of `markers`.
pub fn contains_any(text: &str, markers: &[&str]) -> bool {
    markers.iter().any(|m| text.contains(m))
}

/// Number of distinct `markers` found in `text`.
pub fn count_hits(text: &str, markers: &[&str]) -> usize {
    markers.iter().filter(|m| text.contains(*m)).count()
}

/// Whitespace-separated token count of the trimmed answer.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
