use hashbrown::HashMap;

use super::state::CompetitorState;
use crate::event_log::CompetitorId;

/// Owned table of competitor state, keyed by competitor id.
///
/// Only the event processor can mutate a roster. Once processing is done the
/// roster is handed out by value and is read-only from then on.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    competitors: HashMap<CompetitorId, CompetitorState>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or lazily create the state for a competitor.
    pub(crate) fn entry(&mut self, id: CompetitorId) -> &mut CompetitorState {
        self.competitors
            .entry(id)
            .or_insert_with(|| CompetitorState::new(id))
    }

    pub fn get(&self, id: CompetitorId) -> Option<&CompetitorState> {
        self.competitors.get(&id)
    }

    /// Iterate competitors in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &CompetitorState> {
        self.competitors.values()
    }

    /// Competitor ids in ascending order.
    pub fn ids(&self) -> Vec<CompetitorId> {
        let mut ids: Vec<_> = self.competitors.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.competitors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.competitors.is_empty()
    }
}

impl FromIterator<CompetitorState> for Roster {
    fn from_iter<I: IntoIterator<Item = CompetitorState>>(iter: I) -> Self {
        Self {
            competitors: iter.into_iter().map(|c| (c.id, c)).collect(),
        }
    }
}
