//! Built-in behavioral question sets, one per role.

/// `(id, text, tags)`
pub type CatalogEntry = (&'static str, &'static str, &'static [&'static str]);

pub const SWE: &[CatalogEntry] = &[
    (
        "swe_1",
        "Tell me about a time when you had to debug a critical production issue under time pressure.",
        &["problem-solving", "pressure", "technical"],
    ),
    (
        "swe_2",
        "Describe a situation where you had to refactor legacy code. What was your approach?",
        &["technical", "initiative", "quality"],
    ),
    (
        "swe_3",
        "Tell me about a time when you disagreed with a technical decision made by your team.",
        &["collaboration", "communication", "conflict"],
    ),
    (
        "swe_4",
        "Share an example of when you had to learn a new technology or framework quickly to meet a deadline.",
        &["learning", "pressure", "adaptability"],
    ),
    (
        "swe_5",
        "Describe a project where you had to balance technical excellence with business constraints.",
        &["decision-making", "technical", "business"],
    ),
    (
        "swe_6",
        "Tell me about a time when you received critical feedback on your code. How did you respond?",
        &["growth", "communication", "adaptability"],
    ),
    (
        "swe_7",
        "Describe a situation where you identified and prevented a potential security vulnerability.",
        &["initiative", "technical", "quality"],
    ),
    (
        "swe_8",
        "Tell me about your biggest technical failure and what you learned from it.",
        &["failure", "learning", "growth"],
    ),
    (
        "swe_9",
        "Share an example of when you mentored or helped a junior developer solve a complex problem.",
        &["leadership", "communication", "collaboration"],
    ),
    (
        "swe_10",
        "Describe a time when you had to make a trade-off between code quality and delivery speed.",
        &["decision-making", "pressure", "quality"],
    ),
    (
        "swe_11",
        "Tell me about a time when you improved the performance of a system or application significantly.",
        &["technical", "initiative", "impact"],
    ),
    (
        "swe_12",
        "Describe a situation where you had to advocate for a technical approach that others initially resisted.",
        &["leadership", "communication", "technical"],
    ),
];

pub const DATA_ANALYST: &[CatalogEntry] = &[
    (
        "da_1",
        "Tell me about a time when your data analysis led to a significant business decision.",
        &["impact", "business", "technical"],
    ),
    (
        "da_2",
        "Describe a situation where you found errors or inconsistencies in data. How did you handle it?",
        &["problem-solving", "quality", "initiative"],
    ),
    (
        "da_3",
        "Tell me about a time when you had to explain complex data insights to non-technical stakeholders.",
        &["communication", "collaboration", "business"],
    ),
    (
        "da_4",
        "Share an example of when you had to work with incomplete or messy data.",
        &["adaptability", "problem-solving", "technical"],
    ),
    (
        "da_5",
        "Describe a project where you had to learn a new analytical tool or technique quickly.",
        &["learning", "adaptability", "technical"],
    ),
    (
        "da_6",
        "Tell me about a time when your initial analysis turned out to be wrong. What did you do?",
        &["failure", "learning", "integrity"],
    ),
    (
        "da_7",
        "Describe a situation where you had to prioritize multiple data requests from different stakeholders.",
        &["decision-making", "pressure", "collaboration"],
    ),
    (
        "da_8",
        "Tell me about a time when you identified a trend or pattern that others had missed.",
        &["initiative", "impact", "technical"],
    ),
    (
        "da_9",
        "Share an example of when you had to challenge a business assumption based on your data analysis.",
        &["communication", "confidence", "impact"],
    ),
    (
        "da_10",
        "Describe a time when you automated a reporting process. What was the impact?",
        &["initiative", "technical", "efficiency"],
    ),
    (
        "da_11",
        "Tell me about a situation where you had to balance analytical depth with tight deadlines.",
        &["pressure", "decision-making", "quality"],
    ),
    (
        "da_12",
        "Describe a time when you collaborated with other teams to solve a data-related problem.",
        &["collaboration", "communication", "problem-solving"],
    ),
];

pub const PRODUCT: &[CatalogEntry] = &[
    (
        "pm_1",
        "Tell me about a time when you had to say no to a feature request from an important stakeholder.",
        &["decision-making", "communication", "conflict"],
    ),
    (
        "pm_2",
        "Describe a product you launched that didn't meet expectations. What did you learn?",
        &["failure", "learning", "adaptability"],
    ),
    (
        "pm_3",
        "Tell me about a time when you had to prioritize features with limited resources.",
        &["decision-making", "pressure", "strategy"],
    ),
    (
        "pm_4",
        "Share an example of when you used data to influence a product decision.",
        &["impact", "technical", "communication"],
    ),
    (
        "pm_5",
        "Describe a situation where you had to balance user needs with business goals.",
        &["decision-making", "business", "empathy"],
    ),
    (
        "pm_6",
        "Tell me about a time when you had to get buy-in from engineering for a challenging project.",
        &["collaboration", "communication", "leadership"],
    ),
    (
        "pm_7",
        "Describe a time when you identified a market opportunity that others had overlooked.",
        &["initiative", "impact", "strategy"],
    ),
    (
        "pm_8",
        "Tell me about a situation where you had to make a product decision with incomplete information.",
        &["decision-making", "pressure", "risk"],
    ),
    (
        "pm_9",
        "Share an example of when you had to pivot your product strategy based on user feedback.",
        &["adaptability", "learning", "empathy"],
    ),
    (
        "pm_10",
        "Describe a time when you had to manage conflicting priorities from different stakeholders.",
        &["collaboration", "conflict", "communication"],
    ),
    (
        "pm_11",
        "Tell me about a product feature you championed that became highly successful.",
        &["initiative", "impact", "leadership"],
    ),
    (
        "pm_12",
        "Describe a situation where you had to work with a difficult team member to deliver a product.",
        &["collaboration", "conflict", "adaptability"],
    ),
];
