//! Voice transcript buffer for one session.
//!
//! Finalized segments accumulate; the interim segment is replaced on every
//! update and is the only part a stop discards.

use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TranscriptBuffer {
    finalized: String,
    interim: String,
}

impl TranscriptBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_segment(&mut self, text: &str, is_final: bool) {
        if is_final {
            let text = text.trim();
            if !text.is_empty() {
                if !self.finalized.is_empty() {
                    self.finalized.push(' ');
                }
                self.finalized.push_str(text);
            }
            self.interim.clear();
        } else {
            self.interim = text.trim().to_string();
        }
    }

    /// Drops the unconfirmed tail, keeps everything finalized.
    pub fn stop_capture(&mut self) {
        self.interim.clear();
    }

    /// Finalized text followed by the interim segment, trimmed.
    pub fn combined(&self) -> String {
        match (self.finalized.is_empty(), self.interim.is_empty()) {
            (_, true) => self.finalized.clone(),
            (true, false) => self.interim.clone(),
            (false, false) => format!("{} {}", self.finalized, self.interim),
        }
    }

    pub fn finalized(&self) -> &str {
        &self.finalized
    }

    pub fn interim(&self) -> &str {
        &self.interim
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.finalized.is_empty() && self.interim.is_empty()
    }

    pub fn clear(&mut self) {
        self.finalized.clear();
        self.interim.clear();
    }
}
