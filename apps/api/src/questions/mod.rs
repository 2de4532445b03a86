#![allow(dead_code)]

//! Question bank: closed role set and per-role question lists.
//!
//! The bank is read-only after construction and shared across sessions.
//! Sessions draw their own ordered subset through an injected RNG.

mod catalog;

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::errors::SessionError;

/// One behavioral question. Missing fields deserialize to empty values so the
/// stateless evaluate endpoint never rejects a partial question.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

impl Question {
    pub fn new(id: impl Into<String>, text: impl Into<String>, tags: &[&str]) -> Self {
        Question {
            id: id.into(),
            text: text.into(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }
}

/// Interview role. Closed set: unknown names are an error, never a fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "SWE")]
    Swe,
    #[serde(rename = "Data Analyst")]
    DataAnalyst,
    #[serde(rename = "Product")]
    Product,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Swe, Role::DataAnalyst, Role::Product];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Swe => "SWE",
            Role::DataAnalyst => "Data Analyst",
            Role::Product => "Product",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        match normalized.as_str() {
            "swe" => Ok(Role::Swe),
            "data analyst" | "data_analyst" => Ok(Role::DataAnalyst),
            "product" => Ok(Role::Product),
            _ => Err(SessionError::UnknownRole(s.trim().to_string())),
        }
    }
}

/// Mapping role → non-empty ordered question list.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    questions: HashMap<Role, Vec<Question>>,
}

impl QuestionBank {
    /// The built-in bank: twelve questions for each of the three roles.
    pub fn builtin() -> Self {
        let mut questions = HashMap::new();
        for role in Role::ALL {
            let entries = match role {
                Role::Swe => catalog::SWE,
                Role::DataAnalyst => catalog::DATA_ANALYST,
                Role::Product => catalog::PRODUCT,
            };
            let list = entries
                .iter()
                .map(|(id, text, tags)| Question::new(*id, *text, tags))
                .collect();
            questions.insert(role, list);
        }
        QuestionBank { questions }
    }

    /// Builds a bank from caller-supplied lists. Empty lists are dropped so
    /// every role present in the bank has at least one question.
    pub fn from_lists(lists: impl IntoIterator<Item = (Role, Vec<Question>)>) -> Self {
        let questions = lists
            .into_iter()
            .filter(|(_, list)| !list.is_empty())
            .collect();
        QuestionBank { questions }
    }

    pub fn roles(&self) -> Vec<Role> {
        let mut roles: Vec<Role> = self.questions.keys().copied().collect();
        roles.sort();
        roles
    }

    pub fn questions_for(&self, role: Role) -> Option<&[Question]> {
        self.questions.get(&role).map(Vec::as_slice)
    }

    /// Uniform shuffle of the role's full set, then the first `n`.
    /// Returns the whole (shuffled) set when `n` exceeds its size.
    pub fn pick_session_questions<R: Rng + ?Sized>(
        &self,
        role: Role,
        n: usize,
        rng: &mut R,
    ) -> Result<Vec<Question>, SessionError> {
        let pool = self
            .questions_for(role)
            .ok_or_else(|| SessionError::UnknownRole(role.to_string()))?;

        let mut picked = pool.to_vec();
        picked.shuffle(rng);
        picked.truncate(n);
        Ok(picked)
    }
}
