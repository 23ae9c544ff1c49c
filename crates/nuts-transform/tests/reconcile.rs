//! Integration tests for selection, filtering and the join.

use chrono::NaiveDate;
use polars::prelude::{Column, DataFrame, DataType, IntoColumn, NamedFrom, Series};

use nuts_model::dates::epoch_days;
use nuts_model::{CountryCode, PopulationColumn, SchemaYear, StatYear};
use nuts_transform::{TransformError, filter_stats, merge, select_country};

fn test_df(columns: Vec<(&str, Vec<&str>)>) -> DataFrame {
    let cols: Vec<Column> = columns
        .into_iter()
        .map(|(name, values)| {
            Series::new(
                name.into(),
                values.iter().copied().map(String::from).collect::<Vec<_>>(),
            )
            .into_column()
        })
        .collect();
    DataFrame::new(cols).unwrap()
}

fn country(code: &str) -> CountryCode {
    CountryCode::parse(code).unwrap()
}

fn strings(df: &DataFrame, name: &str) -> Vec<Option<String>> {
    df.column(name)
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .map(|value| value.map(String::from))
        .collect()
}

fn floats(df: &DataFrame, name: &str) -> Vec<Option<f64>> {
    df.column(name)
        .unwrap()
        .f64()
        .unwrap()
        .into_iter()
        .collect()
}

fn regions() -> DataFrame {
    test_df(vec![
        ("NUTS_ID", vec!["DE111", "DE112", "DE113", "AT111"]),
        ("CNTR_CODE", vec!["DE", "DE", "DE", "AT"]),
        ("NAME_LATN", vec!["Stuttgart", "Böblingen", "Esslingen", "Mittelburgenland"]),
        ("geometry", vec!["{}", "{}", "{}", "{}"]),
    ])
}

// === Geometry selection ===

#[test]
fn select_country_matches_country_attribute() {
    let selected = select_country(&regions(), &country("de"), SchemaYear::Nuts2016).unwrap();
    assert_eq!(
        strings(&selected, "NUTS_ID"),
        vec![
            Some("DE111".to_string()),
            Some("DE112".to_string()),
            Some("DE113".to_string())
        ]
    );
    // All attributes survive.
    assert_eq!(selected.width(), 4);
}

#[test]
fn select_country_ignores_identifier_prefix() {
    // Overseas regions can carry an identifier of another country.
    let df = test_df(vec![
        ("NUTS_ID", vec!["FRY10", "FR101"]),
        ("CNTR_CODE", vec!["XX", "FR"]),
    ]);
    let selected = select_country(&df, &country("FR"), SchemaYear::Nuts2021).unwrap();
    assert_eq!(strings(&selected, "NUTS_ID"), vec![Some("FR101".to_string())]);
}

#[test]
fn select_country_unknown_country_is_empty_result() {
    let err = select_country(&regions(), &country("ZZ"), SchemaYear::Nuts2016).unwrap_err();
    assert!(matches!(err, TransformError::NoRegions { .. }));
    assert!(err.to_string().contains("ZZ"));
    assert!(err.to_string().contains("2016"));
}

#[test]
fn select_country_requires_country_attribute() {
    let df = test_df(vec![("NUTS_ID", vec!["DE111"])]);
    let err = select_country(&df, &country("DE"), SchemaYear::Nuts2016).unwrap_err();
    assert!(matches!(err, TransformError::MissingColumn { ref column, .. } if column == "CNTR_CODE"));
}

// === Observation filtering ===

fn mixed_observations() -> DataFrame {
    test_df(vec![
        (
            "geo",
            vec![
                "DE111", "DE111", "DE111", "DE1", "DE1111", "AT111", "DE112", "DE112", "DE113",
            ],
        ),
        (
            "TIME_PERIOD",
            vec![
                "2018", "2018", "2018", "2018", "2018", "2018", "2019", "2018-01-01", "2018-07-01",
            ],
        ),
        ("sex", vec!["T", "F", "T", "T", "T", "T", "T", "T", "T"]),
        (
            "age",
            vec![
                "TOTAL", "TOTAL", "Y10-14", "TOTAL", "TOTAL", "TOTAL", "TOTAL", "TOTAL", "TOTAL",
            ],
        ),
        ("OBS_VALUE", vec!["1", "2", "3", "4", "5", "6", "7", "8", "9"]),
    ])
}

#[test]
fn filter_stats_applies_every_condition() {
    let filtered = filter_stats(&mixed_observations(), StatYear::new(2018), &country("DE")).unwrap();
    assert_eq!(
        strings(&filtered, "geo"),
        vec![Some("DE111".to_string()), Some("DE112".to_string())]
    );
    assert_eq!(
        strings(&filtered, "OBS_VALUE"),
        vec![Some("1".to_string()), Some("8".to_string())]
    );
}

#[test]
fn filter_stats_prefix_is_case_sensitive() {
    let observations = test_df(vec![
        ("geo", vec!["de111", "DE111"]),
        ("TIME_PERIOD", vec!["2018", "2018"]),
        ("sex", vec!["T", "T"]),
        ("age", vec!["TOTAL", "TOTAL"]),
        ("OBS_VALUE", vec!["1", "634830"]),
    ]);

    let filtered = filter_stats(&observations, StatYear::new(2018), &country("DE")).unwrap();
    assert_eq!(strings(&filtered, "geo"), vec![Some("DE111".to_string())]);

    let regions = test_df(vec![("NUTS_ID", vec!["DE111"])]);
    let dataset = merge(&regions, &filtered, &population_2018()).unwrap();
    assert_eq!(floats(&dataset.data, "POP_2018"), vec![Some(634830.0)]);
    assert!(dataset.report.unmatched.is_empty());
    assert!(dataset.report.duplicates.is_empty());
}

#[test]
fn filter_stats_on_date_column() {
    let day = |year| epoch_days(NaiveDate::from_ymd_opt(year, 1, 1).unwrap());
    let dates = Series::new("TIME_PERIOD".into(), vec![day(2017), day(2018), None])
        .cast(&DataType::Date)
        .unwrap();
    let mut df = test_df(vec![
        ("geo", vec!["DE111", "DE111", "DE111"]),
        ("TIME_PERIOD", vec!["", "", ""]),
        ("sex", vec!["T", "T", "T"]),
        ("age", vec!["TOTAL", "TOTAL", "TOTAL"]),
        ("OBS_VALUE", vec!["10", "20", "30"]),
    ]);
    df.with_column(dates).unwrap();

    let filtered = filter_stats(&df, StatYear::new(2018), &country("DE")).unwrap();
    assert_eq!(strings(&filtered, "OBS_VALUE"), vec![Some("20".to_string())]);
}

#[test]
fn filter_stats_empty_names_country_and_year() {
    let err = filter_stats(&mixed_observations(), StatYear::new(2020), &country("DE")).unwrap_err();
    insta::assert_snapshot!(err, @"no population observations found for country DE in 2020");
    assert!(matches!(err, TransformError::NoObservations { stat_year: 2020, .. }));
}

#[test]
fn filter_stats_requires_stratum_columns() {
    let df = test_df(vec![
        ("geo", vec!["DE111"]),
        ("TIME_PERIOD", vec!["2018"]),
        ("sex", vec!["T"]),
    ]);
    let err = filter_stats(&df, StatYear::new(2018), &country("DE")).unwrap_err();
    assert!(matches!(err, TransformError::MissingColumn { ref column, .. } if column == "age"));
}

// === Join ===

fn population_2018() -> PopulationColumn {
    PopulationColumn::for_year(StatYear::new(2018))
}

#[test]
fn merge_keeps_every_region() {
    let regions = select_country(&regions(), &country("DE"), SchemaYear::Nuts2016).unwrap();
    let observations = test_df(vec![
        ("geo", vec!["DE112", "DE111"]),
        ("OBS_VALUE", vec!["215000", "634830"]),
    ]);

    let dataset = merge(&regions, &observations, &population_2018()).unwrap();

    assert_eq!(dataset.data.height(), 3);
    assert_eq!(
        floats(&dataset.data, "POP_2018"),
        vec![Some(634830.0), Some(215000.0), None]
    );
    assert_eq!(
        strings(&dataset.data, "NUTS_ID"),
        vec![
            Some("DE111".to_string()),
            Some("DE112".to_string()),
            Some("DE113".to_string())
        ]
    );
    assert_eq!(dataset.report.matched, 2);
    assert_eq!(dataset.report.unmatched, vec!["DE113".to_string()]);
    // Observation columns other than the value are not carried over.
    assert!(dataset.data.column("geo").is_err());
    assert!(dataset.data.column("OBS_VALUE").is_err());
}

#[test]
fn merge_duplicates_first_seen_wins() {
    let regions = test_df(vec![("NUTS_ID", vec!["DE111", "DE112", "DE113"])]);
    let observations = test_df(vec![
        ("geo", vec!["DE111", "DE111", "DE112", "DE111"]),
        ("OBS_VALUE", vec!["100", "999", ":", "998"]),
    ]);

    let dataset = merge(&regions, &observations, &population_2018()).unwrap();

    assert_eq!(
        floats(&dataset.data, "POP_2018"),
        vec![Some(100.0), None, None]
    );
    insta::assert_json_snapshot!(dataset.report, @r#"
    {
      "regions": 3,
      "matched": 2,
      "missing_values": 1,
      "unmatched": [
        "DE113"
      ],
      "duplicates": [
        "DE111"
      ]
    }
    "#);
}

#[test]
fn merge_rejects_non_numeric_values() {
    let regions = test_df(vec![("NUTS_ID", vec!["DE111"])]);
    let observations = test_df(vec![("geo", vec!["DE111"]), ("OBS_VALUE", vec!["n/a"])]);

    let err = merge(&regions, &observations, &population_2018()).unwrap_err();
    assert!(matches!(
        err,
        TransformError::NonNumeric { ref value, ref region, ref column }
            if value == "n/a" && region == "DE111" && column == "POP_2018"
    ));
}

#[test]
fn merge_missing_value_column_is_schema_error() {
    let regions = test_df(vec![("NUTS_ID", vec!["DE111"])]);
    let observations = test_df(vec![("geo", vec!["DE111"]), ("value", vec!["1"])]);

    let err = merge(&regions, &observations, &population_2018()).unwrap_err();
    assert!(matches!(err, TransformError::MissingColumn { ref column, .. } if column == "OBS_VALUE"));
}

#[test]
fn merge_without_any_match_still_returns_all_regions() {
    let regions = test_df(vec![("NUTS_ID", vec!["DE111", "DE112"])]);
    let observations = test_df(vec![("geo", vec!["AT111"]), ("OBS_VALUE", vec!["5"])]);

    let dataset = merge(&regions, &observations, &population_2018()).unwrap();
    assert_eq!(dataset.data.height(), 2);
    assert_eq!(dataset.data.column("POP_2018").unwrap().null_count(), 2);
    assert_eq!(dataset.report.matched, 0);
}
