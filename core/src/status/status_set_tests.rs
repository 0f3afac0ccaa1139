//! Tests for StatusSet list management

use super::{StatusEntry, StatusList, StatusSet};

fn catalog() -> StatusSet {
    StatusSet::from_catalog(
        [
            (910, "Doom".to_string()),
            (17, "Paralysis".to_string()),
            (3, "Heavy".to_string()),
            (1714, "Doom".to_string()),
            (215, "Sleep".to_string()),
        ],
        &[215],
    )
}

#[test]
fn test_catalog_respects_disabled_ids() {
    let set = catalog();
    assert_eq!(set.len(), 5);
    assert!(set.is_watched(910));
    assert!(!set.is_watched(215));
    assert_eq!(set.list_of(215), Some(StatusList::Disabled));
    assert_eq!(set.list_of(42), None);
    assert_eq!(set.disabled_ids(), vec![215]);
    assert_eq!(set.first_enabled(), Some(3));
}

#[test]
fn test_swap_moves_between_lists() {
    let mut set = catalog();

    assert_eq!(set.swap(910), Some(StatusList::Disabled));
    assert!(!set.is_watched(910));
    assert_eq!(set.name(910), Some("Doom"));

    assert_eq!(set.swap(910), Some(StatusList::Enabled));
    assert!(set.is_watched(910));

    assert_eq!(set.swap(42), None);
    assert_eq!(set.len(), 5);
}

#[test]
fn test_lists_stay_exclusive() {
    let mut set = catalog();
    set.insert(17, "Paralysis".to_string(), StatusList::Disabled);
    assert_eq!(set.enabled().filter(|(id, _)| *id == 17).count(), 0);
    assert_eq!(set.disabled().filter(|(id, _)| *id == 17).count(), 1);
    assert_eq!(set.len(), 5);
}

#[test]
fn test_clear_lists() {
    let mut set = catalog();

    set.clear_enabled_list();
    assert_eq!(set.enabled().count(), 0);
    assert_eq!(set.disabled().count(), 5);
    assert_eq!(set.first_enabled(), None);

    set.clear_disabled_list();
    assert_eq!(set.enabled().count(), 5);
    assert!(set.disabled_ids().is_empty());
}

#[test]
fn test_visible_entries_dedupes_and_sorts() {
    let set = catalog();
    let entries = set.visible_entries(StatusList::Enabled, "");
    let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["Doom", "Heavy", "Paralysis"]);
    // Lowest id wins for duplicate names
    assert_eq!(entries[0].id, 910);
}

#[test]
fn test_visible_entries_filter() {
    let set = catalog();
    assert_eq!(
        set.visible_entries(StatusList::Enabled, "PARA"),
        vec![StatusEntry {
            id: 17,
            name: "Paralysis".to_string()
        }]
    );
    // Matches on id too
    let by_id = set.visible_entries(StatusList::Enabled, "1714");
    assert_eq!(by_id.len(), 1);
    assert_eq!(by_id[0].id, 1714);

    assert!(set.visible_entries(StatusList::Disabled, "doom").is_empty());
    assert_eq!(set.visible_entries(StatusList::Disabled, "sle").len(), 1);
}
