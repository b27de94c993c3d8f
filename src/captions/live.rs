use crate::captions::model::{Caption, CaptionId};
use crate::captions::store::CaptionStore;
use std::sync::Arc;
use tokio::sync::watch;

/// Cloneable handle to a caption store that may be edited while a render reads it.
///
/// Readers take an immutable [`Arc<CaptionStore>`] snapshot; edits are copy-on-write, so a
/// snapshot never changes under its holder. The compositor takes one snapshot per frame, which
/// means edits show up from the next frame on.
#[derive(Debug, Clone)]
pub struct LiveCaptions {
    tx: Arc<watch::Sender<Arc<CaptionStore>>>,
}

impl LiveCaptions {
    /// Wrap an initial store.
    pub fn new(store: CaptionStore) -> Self {
        let (tx, _rx) = watch::channel(Arc::new(store));
        Self { tx: Arc::new(tx) }
    }

    /// Current immutable snapshot.
    pub fn snapshot(&self) -> Arc<CaptionStore> {
        self.tx.borrow().clone()
    }

    /// Receiver that is notified after every edit.
    pub fn subscribe(&self) -> watch::Receiver<Arc<CaptionStore>> {
        self.tx.subscribe()
    }

    /// Apply an edit to the store and publish the result.
    pub fn edit<R>(&self, f: impl FnOnce(&mut CaptionStore) -> R) -> R {
        let mut out = None;
        self.tx.send_modify(|store| out = Some(f(Arc::make_mut(store))));
        out.unwrap_or_else(|| unreachable!("watch::Sender::send_modify always runs its closure"))
    }

    /// See [`CaptionStore::update_text`].
    pub fn update_text(&self, id: &CaptionId, text: impl Into<String>) -> bool {
        let text = text.into();
        self.edit(|s| s.update_text(id, text))
    }

    /// See [`CaptionStore::insert_sorted`].
    pub fn insert_sorted(&self, caption: Caption) {
        self.edit(|s| s.insert_sorted(caption));
    }

    /// See [`CaptionStore::replace_all`].
    pub fn replace_all(&self, captions: Vec<Caption>) {
        self.edit(|s| s.replace_all(captions));
    }
}

impl Default for LiveCaptions {
    fn default() -> Self {
        Self::new(CaptionStore::new())
    }
}

impl From<CaptionStore> for LiveCaptions {
    fn from(store: CaptionStore) -> Self {
        Self::new(store)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/captions/live.rs"]
mod tests;
