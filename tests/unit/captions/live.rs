use super::*;

#[test]
fn snapshots_are_isolated_from_later_edits() {
    let live = LiveCaptions::new(
        CaptionStore::from_captions(vec![Caption::new("a", 0.0, 2.0, "old").unwrap()])
            .unwrap(),
    );
    let before = live.snapshot();
    assert!(live.update_text(&CaptionId::from("a"), "new"));

    assert_eq!(before.active_at(1.0).unwrap().text, "old");
    assert_eq!(live.snapshot().active_at(1.0).unwrap().text, "new");
}

#[test]
fn clones_share_the_same_store() {
    let live = LiveCaptions::default();
    let editor = live.clone();
    editor.insert_sorted(Caption::new("x", 1.0, 3.0, "hi").unwrap());
    assert_eq!(live.snapshot().len(), 1);
}

#[test]
fn subscribers_observe_edits() {
    let live = LiveCaptions::default();
    let mut rx = live.subscribe();
    assert!(!rx.has_changed().unwrap());
    live.insert_sorted(Caption::new("x", 0.0, 1.0, "hi").unwrap());
    assert!(rx.has_changed().unwrap());
    assert_eq!(rx.borrow_and_update().len(), 1);
}
