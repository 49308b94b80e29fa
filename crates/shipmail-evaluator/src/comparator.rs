//! Field comparison rules used for grading

use serde_json::Value;
use shipmail_domain::round_decimals;

/// Decide whether an extracted value matches the expected one
///
/// Rules, in order:
///
/// 1. both null: equal
/// 2. exactly one null: not equal
/// 3. both strings: equal after trimming and case folding
/// 4. both numbers: equal after rounding to 2 decimals
/// 5. both booleans: plain equality
/// 6. anything else: structural equality
///
/// Rounding breaks exact ties to even, so `10.125` matches `10.12`.
/// Booleans are not numbers here: `true` never matches `1` and `false`
/// never matches `0`, where a Python-based grader would count both as equal.
///
/// ```
/// use serde_json::json;
/// use shipmail_evaluator::equal;
///
/// assert!(equal(&json!("FOB "), &json!("fob")));
/// assert!(equal(&json!(5.001), &json!(5.0)));
/// assert!(!equal(&json!(null), &json!(0)));
/// ```
pub fn equal(expected: &Value, actual: &Value) -> bool {
    match (expected, actual) {
        (Value::Null, Value::Null) => true,
        (Value::Null, _) | (_, Value::Null) => false,
        (Value::String(a), Value::String(b)) => fold(a) == fold(b),
        (Value::Number(a), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(a), Some(b)) => round_decimals(a, 2) == round_decimals(b, 2),
            _ => a == b,
        },
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (a, b) => a == b,
    }
}

fn fold(s: &str) -> String {
    s.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_nulls() {
        assert!(equal(&Value::Null, &Value::Null));
        assert!(!equal(&Value::Null, &json!("FOB")));
        assert!(!equal(&json!(false), &Value::Null));
    }

    #[test]
    fn test_strings_ignore_case_and_padding() {
        assert!(equal(&json!("FOB "), &json!("fob")));
        assert!(equal(&json!("  Hong Kong"), &json!("HONG KONG ")));
        assert!(!equal(&json!("Hong Kong"), &json!("HongKong")));
    }

    #[test]
    fn test_numbers_round_to_two_decimals() {
        assert!(equal(&json!(5.001), &json!(5.0)));
        assert!(equal(&json!(500.0), &json!(500.004)));
        assert!(equal(&json!(500), &json!(500.0)));
        assert!(!equal(&json!(2.5), &json!(2.51)));
    }

    #[test]
    fn test_numbers_tie_to_even() {
        assert!(equal(&json!(10.12), &json!(10.125)));
        assert!(!equal(&json!(10.13), &json!(10.125)));
        assert!(equal(&json!(0.38), &json!(0.375)));
    }

    #[test]
    fn test_booleans() {
        assert!(equal(&json!(true), &json!(true)));
        assert!(!equal(&json!(true), &json!(false)));
    }

    #[test]
    fn test_mixed_types_fall_back_to_structure() {
        assert!(!equal(&json!("500"), &json!(500)));
        assert!(!equal(&json!(true), &json!(1)));
        assert!(!equal(&json!(0), &json!(false)));
        assert!(equal(&json!([1, 2]), &json!([1, 2])));
    }

    proptest! {
        #[test]
        fn null_never_equals_a_value(s in ".*", n in any::<i64>(), b in any::<bool>()) {
            for value in [json!(s), json!(n), json!(b)] {
                prop_assert!(!equal(&Value::Null, &value));
                prop_assert!(!equal(&value, &Value::Null));
            }
        }

        #[test]
        fn equality_is_symmetric(a in -1e6f64..1e6, b in -1e6f64..1e6) {
            prop_assert_eq!(equal(&json!(a), &json!(b)), equal(&json!(b), &json!(a)));
        }

        #[test]
        fn every_value_equals_itself(s in "[ a-zA-Z]{0,16}", x in -1e9f64..1e9) {
            prop_assert!(equal(&json!(s), &json!(s)));
            prop_assert!(equal(&json!(x), &json!(x)));
        }

        #[test]
        fn case_and_padding_never_matter(s in "[a-zA-Z ]{0,16}", pad in " {0,3}") {
            let upper = format!("{}{}{}", pad, s.to_uppercase(), pad);
            prop_assert!(equal(&json!(s), &json!(upper)));
        }
    }
}
