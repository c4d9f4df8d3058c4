/// Applies one sparse patch field to a stored value.
///
/// `incoming` is `None` when the field was absent from the payload, which
/// leaves the stored value untouched. The field name is recorded only when
/// the stored value actually changes.
pub fn apply_field<T: PartialEq>(
    current: &mut T,
    incoming: Option<T>,
    name: &str,
    changed: &mut Vec<String>,
) {
    if let Some(value) = incoming {
        if *current != value {
            *current = value;
            changed.push(name.to_owned());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::apply_field;

    #[test]
    fn absent_field_leaves_value_untouched() {
        let mut current = "before".to_owned();
        let mut changed = Vec::new();

        apply_field(&mut current, None, "title", &mut changed);

        assert_eq!(current, "before");
        assert!(changed.is_empty());
    }

    #[test]
    fn equal_value_is_not_reported_as_changed() {
        let mut current = "same".to_owned();
        let mut changed = Vec::new();

        apply_field(&mut current, Some("same".to_owned()), "title", &mut changed);

        assert!(changed.is_empty());
    }

    #[test]
    fn differing_value_is_applied_and_reported() {
        let mut current = Some(3_i64);
        let mut changed = Vec::new();

        apply_field(&mut current, Some(None), "amount", &mut changed);

        assert_eq!(current, None);
        assert_eq!(changed, vec!["amount".to_owned()]);
    }
}
