use crate::captions::model::{Caption, CaptionId};
use crate::foundation::error::{RelingoError, RelingoResult};
use std::collections::HashSet;

/// Ordered sequence of captions answering "which caption is active at time t".
///
/// Store order is significant: overlapping segments resolve to the first match in store order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaptionStore {
    entries: Vec<Caption>,
}

impl CaptionStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from captions in the given order, validating timings and id uniqueness.
    pub fn from_captions(captions: Vec<Caption>) -> RelingoResult<Self> {
        let mut seen = HashSet::with_capacity(captions.len());
        for c in &captions {
            c.validate()?;
            if !seen.insert(&c.id) {
                return Err(RelingoError::validation(format!(
                    "duplicate caption id '{}'",
                    c.id
                )));
            }
        }
        Ok(Self { entries: captions })
    }

    /// Parse a JSON array of `{id, start, end, text}` objects.
    pub fn from_json_str(json: &str) -> RelingoResult<Self> {
        let captions: Vec<Caption> = serde_json::from_str(json)
            .map_err(|e| RelingoError::validation(format!("invalid caption json: {e}")))?;
        Self::from_captions(captions)
    }

    /// Serialize to a pretty JSON array.
    pub fn to_json_string(&self) -> RelingoResult<String> {
        serde_json::to_string_pretty(&self.entries)
            .map_err(|e| RelingoError::Other(anyhow::Error::new(e)))
    }

    /// First caption, in store order, whose `[start, end]` contains `t`.
    pub fn active_at(&self, t: f64) -> Option<&Caption> {
        self.entries.iter().find(|c| c.contains(t))
    }

    /// Replace the text of the caption with `id`. Returns `false` (and does nothing) if absent.
    pub fn update_text(&mut self, id: &CaptionId, text: impl Into<String>) -> bool {
        match self.entries.iter_mut().find(|c| &c.id == id) {
            Some(c) => {
                c.text = text.into();
                true
            }
            None => false,
        }
    }

    /// Insert `caption` and re-sort the whole sequence by start time.
    ///
    /// The sort is stable, so entries with equal starts keep their relative order and the new
    /// caption lands after existing ones that start at the same time.
    pub fn insert_sorted(&mut self, caption: Caption) {
        self.entries.push(caption);
        self.entries.sort_by(|a, b| a.start.total_cmp(&b.start));
    }

    /// Replace the whole sequence verbatim.
    ///
    /// No check is made that ids or timings match the previous entries; use
    /// [`CaptionStore::apply_translation`] when the input comes from a translator.
    pub fn replace_all(&mut self, captions: Vec<Caption>) {
        self.entries = captions;
    }

    /// Replace texts from a translator response after checking it kept every `id/start/end`.
    ///
    /// The response must have the same length and order as the store. On any mismatch the store
    /// is left untouched and a `translate` service error is returned.
    pub fn apply_translation(&mut self, translated: Vec<Caption>) -> RelingoResult<()> {
        if translated.len() != self.entries.len() {
            return Err(RelingoError::service(
                "translate",
                format!(
                    "translator returned {} captions, expected {}",
                    translated.len(),
                    self.entries.len()
                ),
            ));
        }
        for (i, (orig, new)) in self.entries.iter().zip(&translated).enumerate() {
            if orig.id != new.id {
                return Err(RelingoError::service(
                    "translate",
                    format!(
                        "caption #{i} id changed from '{}' to '{}'",
                        orig.id, new.id
                    ),
                ));
            }
            if orig.start != new.start || orig.end != new.end {
                return Err(RelingoError::service(
                    "translate",
                    format!("caption '{}' timing changed", orig.id),
                ));
            }
        }
        self.replace_all(translated);
        Ok(())
    }

    /// Look up a caption by id.
    pub fn get(&self, id: &CaptionId) -> Option<&Caption> {
        self.entries.iter().find(|c| &c.id == id)
    }

    /// Captions in store order.
    pub fn as_slice(&self) -> &[Caption] {
        &self.entries
    }

    /// Iterate captions in store order.
    pub fn iter(&self) -> std::slice::Iter<'_, Caption> {
        self.entries.iter()
    }

    /// Number of captions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when the store holds no captions.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All caption texts joined by a single space, in store order.
    pub fn joined_text(&self) -> String {
        self.entries
            .iter()
            .map(|c| c.text.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Consume the store, returning its captions.
    pub fn into_vec(self) -> Vec<Caption> {
        self.entries
    }
}

impl<'a> IntoIterator for &'a CaptionStore {
    type Item = &'a Caption;
    type IntoIter = std::slice::Iter<'a, Caption>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/captions/store.rs"]
mod tests;
