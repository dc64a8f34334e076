//! Due-item selection for review sessions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Lang, ReviewState};

/// ReviewState with its item id, as returned by review queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DueItem {
    pub id: String,
    #[serde(flatten)]
    pub state: ReviewState,
}

/// Items in `lang` whose due date has passed, oldest first, at most `limit`.
pub fn select_due<'a, I>(entries: I, lang: Lang, now: DateTime<Utc>, limit: usize) -> Vec<DueItem>
where
    I: IntoIterator<Item = (&'a str, &'a ReviewState)>,
{
    let mut due: Vec<(&str, &ReviewState)> = entries
        .into_iter()
        .filter(|(_, state)| state.lang == lang && state.due_at <= now)
        .collect();

    due.sort_by(|a, b| a.1.due_at.cmp(&b.1.due_at).then_with(|| a.0.cmp(b.0)));

    due.into_iter()
        .take(limit)
        .map(|(id, state)| DueItem {
            id: id.to_string(),
            state: state.clone(),
        })
        .collect()
}
