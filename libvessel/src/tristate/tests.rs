use super::*;

#[test]
fn test_default_is_unset() {
    assert_eq!(OptionalBool::default(), OptionalBool::Unset);
    assert!(!OptionalBool::default().is_set());
}

#[test]
fn test_from_bool() {
    assert_eq!(OptionalBool::from(true), OptionalBool::True);
    assert_eq!(OptionalBool::from(false), OptionalBool::False);
}

#[test]
fn test_from_option() {
    assert_eq!(OptionalBool::from(None), OptionalBool::Unset);
    assert_eq!(OptionalBool::from(Some(false)), OptionalBool::False);
}

#[test]
fn test_explicit_false_is_set() {
    assert!(OptionalBool::False.is_set());
    assert_eq!(OptionalBool::False.value(), Some(false));
}

#[test]
fn test_unwrap_or_only_applies_to_unset() {
    assert!(OptionalBool::Unset.unwrap_or(true));
    assert!(!OptionalBool::False.unwrap_or(true));
    assert!(OptionalBool::True.unwrap_or(false));
}
