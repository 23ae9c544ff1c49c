//! Property and message tests for the year compatibility policy.

use std::collections::BTreeSet;

use proptest::prelude::*;

use nuts_model::{ModelError, SchemaYear, StatYear, allowed_pairs, validate};

fn canonical_pairs() -> BTreeSet<(i32, i32)> {
    allowed_pairs().collect()
}

#[test]
fn every_canonical_pair_is_accepted() {
    for (schema, stat) in canonical_pairs() {
        let pair = validate(schema, stat).unwrap_or_else(|err| panic!("{schema}/{stat}: {err}"));
        assert_eq!(pair.schema().year(), schema);
        assert_eq!(pair.stat(), StatYear::new(stat));
    }
}

#[test]
fn values_just_outside_each_range_are_rejected() {
    let cases = [
        (2013, 2013),
        (2013, 2018),
        (2016, 2017),
        (2016, 2021),
        (2021, 2020),
        (2021, 2024),
        (2024, 2023),
        (2024, 2031),
    ];
    for (schema, stat) in cases {
        assert!(validate(schema, stat).is_err(), "{schema}/{stat} accepted");
    }
}

#[test]
fn scenario_de_2016_2018_is_accepted() {
    let pair = validate(2016, 2018).unwrap();
    assert_eq!(pair.schema(), SchemaYear::Nuts2016);
    assert_eq!(pair.stat().year(), 2018);
}

#[test]
fn rejection_message_lists_every_range() {
    let err = validate(2016, 2021).unwrap_err();
    insta::assert_snapshot!(err.to_string(), @r"
    incompatible years: schema year 2016 cannot be combined with stat year 2021
    valid combinations (schema year: stat years):
      2013: 2014-2017
      2016: 2018-2020
      2021: 2021-2023
      2024: 2024-2030
    ");
}

#[test]
fn rejection_converts_into_model_error() {
    let err: ModelError = validate(1999, 2018).unwrap_err().into();
    assert!(matches!(err, ModelError::Compatibility(_)));
    let message = err.to_string();
    assert!(message.contains("1999"));
    assert!(message.contains("2018"));
}

proptest! {
    #[test]
    fn validate_agrees_with_rule_table(schema in 2005i32..2040, stat in 2005i32..2040) {
        let expected = canonical_pairs().contains(&(schema, stat));
        prop_assert_eq!(validate(schema, stat).is_ok(), expected);
    }

    #[test]
    fn validate_is_total(schema in any::<i32>(), stat in any::<i32>()) {
        match validate(schema, stat) {
            Ok(pair) => {
                prop_assert_eq!(pair.schema().year(), schema);
                prop_assert_eq!(pair.stat().year(), stat);
            }
            Err(err) => {
                prop_assert_eq!(err.schema_year, schema);
                prop_assert_eq!(err.stat_year, stat);
                let message = err.to_string();
                prop_assert!(message.contains("2013: 2014-2017"));
                prop_assert!(message.contains("2024: 2024-2030"));
            }
        }
    }
}
