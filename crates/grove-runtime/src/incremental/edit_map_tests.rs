use super::{EditMap, InputEdit};

#[test]
fn replace_builds_edit() {
    let edit = InputEdit::replace(2..3, 2);
    assert_eq!(
        edit,
        InputEdit {
            start: 2,
            old_end: 3,
            new_end: 4,
        }
    );
}

#[test]
fn no_edits_is_identity() {
    let map = EditMap::new(&[]);
    assert_eq!(map.to_old(0), Some(0));
    assert_eq!(map.to_old(1000), Some(1000));
    assert!(map.unchanged(0, 1000));
}

#[test]
fn replacement_maps_around_edit() {
    let map = EditMap::new(&[InputEdit::replace(2..3, 2)]);

    assert_eq!(map.to_old(1), Some(1));
    assert_eq!(map.to_old(2), None);
    assert_eq!(map.to_old(3), None);
    assert_eq!(map.to_old(4), Some(3));
    assert_eq!(map.to_old(5), Some(4));
}

#[test]
fn unchanged_is_strict_at_edit_start() {
    let map = EditMap::new(&[InputEdit::replace(2..3, 2)]);

    assert!(map.unchanged(0, 1));
    assert!(!map.unchanged(0, 2));
    assert!(!map.unchanged(1, 4));
    assert!(map.unchanged(4, 6));
}

#[test]
fn insertion_splits_text() {
    let map = EditMap::new(&[InputEdit::replace(3..3, 2)]);

    assert_eq!(map.to_old(2), Some(2));
    assert_eq!(map.to_old(3), None);
    assert_eq!(map.to_old(4), None);
    assert_eq!(map.to_old(5), Some(3));
    assert!(!map.unchanged(2, 3));
    assert!(map.unchanged(3, 10));
}

#[test]
fn deletion_shifts_left() {
    let map = EditMap::new(&[InputEdit::replace(1..4, 0)]);

    assert_eq!(map.to_old(0), Some(0));
    assert_eq!(map.to_old(1), Some(4));
    assert!(!map.unchanged(0, 4));
    assert!(map.unchanged(4, 8));
}

#[test]
fn edits_compose_in_order() {
    // "1+2+3" -> "1+22+3" -> "+22+3"
    let map = EditMap::new(&[InputEdit::replace(2..3, 2), InputEdit::replace(0..1, 0)]);

    assert_eq!(map.to_old(0), Some(1));
    assert_eq!(map.to_old(1), None);
    assert_eq!(map.to_old(2), None);
    assert_eq!(map.to_old(3), Some(3));
    assert_eq!(map.to_old(4), Some(4));
}
