use crate::core::message::{Role, Turn};

/// Ordered conversation history for one session.
///
/// The first turn is always a system turn and turns are only ever appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            turns: vec![Turn::system(system_prompt)],
        }
    }

    /// Rebuild a transcript from persisted turns.
    ///
    /// Lists that do not open with a system turn get `fallback_system`
    /// prepended so the invariant holds for every live transcript.
    pub fn from_turns(turns: Vec<Turn>, fallback_system: &str) -> Self {
        let starts_with_system = turns
            .first()
            .map(|turn| turn.role.is_system())
            .unwrap_or(false);
        if starts_with_system {
            return Self { turns };
        }

        tracing::warn!("loaded transcript has no leading system turn; prepending default");
        let mut seeded = Vec::with_capacity(turns.len() + 1);
        seeded.push(Turn::system(fallback_system));
        seeded.extend(turns);
        Self { turns: seeded }
    }

    pub fn push(&mut self, role: Role, content: impl Into<String>) {
        self.turns.push(Turn::new(role, content));
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.push(Role::User, content);
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.push(Role::Assistant, content);
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn system_prompt(&self) -> &str {
        self.turns
            .first()
            .map(|turn| turn.content.as_str())
            .unwrap_or_default()
    }

    pub fn into_turns(self) -> Vec<Turn> {
        self.turns
    }
}
