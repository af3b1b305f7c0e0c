use chef_core::{parse_quantity, scale, serving_factor};

#[test]
fn scales_magnitude_and_keeps_unit_and_words() {
    assert_eq!(scale("2 cups flour", 1.5), "3.0 cups flour");
    assert_eq!(scale("1 egg", 2.0), "2.0 egg");
    assert_eq!(scale("3", 0.5), "1.5");
}

#[test]
fn unparseable_text_is_returned_unchanged() {
    assert_eq!(scale("pinch of salt", 2.0), "pinch of salt");
    assert_eq!(scale("", 3.0), "");
    assert_eq!(scale("1/2 cup milk", 2.0), "1/2 cup milk");
}

#[test]
fn comma_is_accepted_as_decimal_separator() {
    let quantity = parse_quantity("1,5 kg potatoes");
    assert_eq!(quantity.magnitude(), Some(1.5));
    assert_eq!(quantity.unit(), Some("kg"));
    assert_eq!(quantity.scaled(2.0), "3.0 kg potatoes");
}

#[test]
fn unit_is_only_assigned_with_a_magnitude() {
    let quantity = parse_quantity("salt to taste");
    assert!(!quantity.is_measured());
    assert_eq!(quantity.unit(), None);
    assert_eq!(quantity.original(), "salt to taste");

    let bare = parse_quantity("4");
    assert_eq!(bare.magnitude(), Some(4.0));
    assert_eq!(bare.unit(), None);
}

#[test]
fn scaling_by_one_keeps_value_with_one_decimal() {
    assert_eq!(scale("2 tbsp butter", 1.0), "2.0 tbsp butter");
    assert_eq!(scale("0.3 tsp  cumin,   ground", 1.0), "0.3 tsp cumin, ground");
}

#[test]
fn non_finite_tokens_are_not_magnitudes() {
    assert_eq!(scale("nan cups", 2.0), "nan cups");
    assert_eq!(scale("inf grams", 2.0), "inf grams");
}

#[test]
fn serving_factor_guards_zero_original() {
    assert_eq!(serving_factor(6, 4), 1.5);
    assert_eq!(serving_factor(3, 0), 1.0);
}
