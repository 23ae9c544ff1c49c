//! NUTS boundaries from the GISCO distribution service.
//!
//! Files are published per vintage, scale, projection and level, e.g.
//! `NUTS_RG_20M_2016_4326_LEVL_3.geojson`. The whole level is downloaded;
//! narrowing to one country happens downstream.

use std::collections::HashMap;

use geojson::GeoJson;
use polars::prelude::{Column, DataFrame, IntoColumn, NamedFrom, Series};
use serde_json::Value;

use nuts_model::GeometryOptions;
use nuts_model::columns::{CNTR_CODE, GEOMETRY, NUTS_ID};

use crate::error::{IngestError, Result};
use crate::http::{CachePolicy, Downloader};
use crate::provider::GeometryProvider;

/// GISCO distribution API base URL.
pub const GISCO_BASE_URL: &str = "https://gisco-services.ec.europa.eu/distribution/v2";

/// File name of the boundary layer for a set of options.
pub fn boundary_file_name(options: &GeometryOptions) -> String {
    format!(
        "NUTS_RG_{}_{}_{}_LEVL_{}.geojson",
        options.resolution.code(),
        options.schema_year.year(),
        options.crs.epsg(),
        options.level.value()
    )
}

/// Geometry provider backed by GISCO GeoJSON downloads.
///
/// Published vintages do not change, so cached boundaries never expire;
/// [`GiscoProvider::with_refresh`] forces a new download.
#[derive(Debug, Clone)]
pub struct GiscoProvider {
    downloader: Downloader,
    base_url: String,
    refresh: bool,
}

impl GiscoProvider {
    pub fn new(downloader: Downloader) -> Self {
        Self {
            downloader,
            base_url: GISCO_BASE_URL.to_string(),
            refresh: false,
        }
    }

    #[must_use]
    pub fn with_refresh(mut self, refresh: bool) -> Self {
        self.refresh = refresh;
        self
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn url(&self, options: &GeometryOptions) -> String {
        format!(
            "{}/nuts/geojson/{}",
            self.base_url.trim_end_matches('/'),
            boundary_file_name(options)
        )
    }
}

impl GeometryProvider for GiscoProvider {
    fn fetch_regions(&self, options: &GeometryOptions) -> Result<DataFrame> {
        let url = self.url(options);
        let source_name = boundary_file_name(options);
        let policy = match (options.cache_enabled, self.refresh) {
            (false, _) => CachePolicy::Bypass,
            (true, true) => CachePolicy::Refresh,
            (true, false) => CachePolicy::Reuse { max_age: None },
        };
        let bytes = self.downloader.fetch(&url, policy)?;
        let text = String::from_utf8(bytes).map_err(|e| IngestError::GeoJson {
            source_name: source_name.clone(),
            message: e.to_string(),
        })?;
        let regions = regions_from_geojson(&text, &source_name)?;
        tracing::info!(
            source = %source_name,
            regions = regions.height(),
            "loaded boundary features"
        );
        Ok(regions)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PropertyKind {
    Integer,
    Float,
    Text,
}

/// Decode a GeoJSON feature collection into a region frame.
///
/// Every property becomes a column (Int64 when all values are integers,
/// Float64 when all are numbers, String otherwise); the feature geometry is
/// kept as GeoJSON text in the `geometry` column.
pub fn regions_from_geojson(text: &str, source_name: &str) -> Result<DataFrame> {
    let geojson: GeoJson = text.parse().map_err(|e: geojson::Error| IngestError::GeoJson {
        source_name: source_name.to_string(),
        message: e.to_string(),
    })?;
    let GeoJson::FeatureCollection(collection) = geojson else {
        return Err(IngestError::GeoJson {
            source_name: source_name.to_string(),
            message: "expected a FeatureCollection".to_string(),
        });
    };

    let row_count = collection.features.len();
    let mut names: Vec<String> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut values: Vec<Vec<Option<Value>>> = Vec::new();
    let mut geometries: Vec<Option<String>> = Vec::with_capacity(row_count);

    for (row, feature) in collection.features.into_iter().enumerate() {
        let geometry = match &feature.geometry {
            Some(geometry) => {
                Some(
                    serde_json::to_string(geometry).map_err(|e| IngestError::GeoJson {
                        source_name: source_name.to_string(),
                        message: e.to_string(),
                    })?,
                )
            }
            None => None,
        };
        geometries.push(geometry);

        for (key, value) in feature.properties.into_iter().flatten() {
            if key == GEOMETRY {
                continue;
            }
            let position = match positions.get(&key) {
                Some(position) => *position,
                None => {
                    names.push(key.clone());
                    values.push(vec![None; row]);
                    positions.insert(key, names.len() - 1);
                    names.len() - 1
                }
            };
            values[position].push((!value.is_null()).then_some(value));
        }
        for column in &mut values {
            if column.len() <= row {
                column.push(None);
            }
        }
    }

    for required in [NUTS_ID, CNTR_CODE] {
        if !positions.contains_key(required) {
            if row_count > 0 {
                return Err(IngestError::MissingColumn {
                    column: required.to_string(),
                    source_name: source_name.to_string(),
                });
            }
            names.push(required.to_string());
            values.push(Vec::new());
        }
    }

    let mut columns: Vec<Column> = names
        .iter()
        .zip(values)
        .map(|(name, column_values)| property_column(name, &column_values))
        .collect();
    columns.push(Series::new(GEOMETRY.into(), geometries).into_column());

    Ok(DataFrame::new(columns)?)
}

fn infer_kind(values: &[Option<Value>]) -> PropertyKind {
    let mut kind = PropertyKind::Integer;
    for value in values.iter().flatten() {
        match value {
            Value::Number(number) if number.as_i64().is_some() => {}
            Value::Number(_) => kind = PropertyKind::Float,
            _ => return PropertyKind::Text,
        }
    }
    if values.iter().all(Option::is_none) {
        PropertyKind::Text
    } else {
        kind
    }
}

fn property_column(name: &str, values: &[Option<Value>]) -> Column {
    let series = match infer_kind(values) {
        PropertyKind::Integer => Series::new(
            name.into(),
            values
                .iter()
                .map(|value| value.as_ref().and_then(Value::as_i64))
                .collect::<Vec<_>>(),
        ),
        PropertyKind::Float => Series::new(
            name.into(),
            values
                .iter()
                .map(|value| value.as_ref().and_then(Value::as_f64))
                .collect::<Vec<_>>(),
        ),
        PropertyKind::Text => Series::new(
            name.into(),
            values
                .iter()
                .map(|value| match value {
                    Some(Value::String(text)) => Some(text.clone()),
                    Some(other) => Some(other.to_string()),
                    None => None,
                })
                .collect::<Vec<_>>(),
        ),
    };
    series.into_column()
}

#[cfg(test)]
mod tests {
    use super::*;
    use nuts_model::{Crs, Resolution, SchemaYear};
    use polars::prelude::DataType;

    const SAMPLE: &str = r#"{
      "type": "FeatureCollection",
      "features": [
        {
          "type": "Feature",
          "id": "DE111",
          "geometry": {"type": "Polygon", "coordinates": [[[9.0, 48.0], [9.5, 48.0], [9.5, 48.5], [9.0, 48.0]]]},
          "properties": {"NUTS_ID": "DE111", "CNTR_CODE": "DE", "LEVL_CODE": 3, "NAME_LATN": "Stuttgart", "COAST_TYPE": 3}
        },
        {
          "type": "Feature",
          "id": "AT111",
          "geometry": {"type": "Polygon", "coordinates": [[[16.0, 47.0], [16.5, 47.0], [16.5, 47.5], [16.0, 47.0]]]},
          "properties": {"NUTS_ID": "AT111", "CNTR_CODE": "AT", "LEVL_CODE": 3, "NAME_LATN": "Mittelburgenland", "SHARE": 0.5}
        }
      ]
    }"#;

    #[test]
    fn test_boundary_file_name() {
        let options = GeometryOptions::new(SchemaYear::Nuts2016)
            .with_resolution(Resolution::M01)
            .with_crs(Crs::EtrsLaea);
        assert_eq!(
            boundary_file_name(&options),
            "NUTS_RG_01M_2016_3035_LEVL_3.geojson"
        );
    }

    #[test]
    fn test_url() {
        let downloader = Downloader::new(&crate::http::HttpOptions::default()).unwrap();
        let provider = GiscoProvider::new(downloader).with_base_url("http://localhost/v2/");
        let options = GeometryOptions::new(SchemaYear::Nuts2021);
        assert_eq!(
            provider.url(&options),
            "http://localhost/v2/nuts/geojson/NUTS_RG_20M_2021_4326_LEVL_3.geojson"
        );
    }

    #[test]
    fn test_regions_from_geojson() {
        let df = regions_from_geojson(SAMPLE, "sample").unwrap();

        assert_eq!(df.height(), 2);
        assert_eq!(df.column(NUTS_ID).unwrap().dtype(), &DataType::String);
        assert_eq!(df.column("LEVL_CODE").unwrap().dtype(), &DataType::Int64);
        assert_eq!(df.column("SHARE").unwrap().dtype(), &DataType::Float64);

        let ids: Vec<Option<&str>> = df
            .column(NUTS_ID)
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(ids, vec![Some("DE111"), Some("AT111")]);

        // Properties missing on a feature become nulls.
        assert_eq!(df.column("COAST_TYPE").unwrap().null_count(), 1);
        assert_eq!(df.column("SHARE").unwrap().null_count(), 1);

        let geometry = df.column(GEOMETRY).unwrap().str().unwrap().get(0).unwrap();
        assert!(geometry.contains("\"Polygon\""));
    }

    #[test]
    fn test_missing_required_property() {
        let text = r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "geometry": null, "properties": {"NUTS_ID": "DE111"}}
        ]}"#;
        let err = regions_from_geojson(text, "sample").unwrap_err();
        assert!(matches!(err, IngestError::MissingColumn { ref column, .. } if column == CNTR_CODE));
    }

    #[test]
    fn test_empty_collection_has_required_columns() {
        let text = r#"{"type": "FeatureCollection", "features": []}"#;
        let df = regions_from_geojson(text, "sample").unwrap();
        assert_eq!(df.height(), 0);
        assert!(df.column(NUTS_ID).is_ok());
        assert!(df.column(CNTR_CODE).is_ok());
        assert!(df.column(GEOMETRY).is_ok());
    }

    #[test]
    fn test_rejects_non_collection() {
        let text = r#"{"type": "Point", "coordinates": [1.0, 2.0]}"#;
        assert!(matches!(
            regions_from_geojson(text, "sample"),
            Err(IngestError::GeoJson { .. })
        ));
    }
}
