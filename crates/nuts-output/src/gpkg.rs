//! Minimal GeoPackage 1.3 writer.
//!
//! Produces one feature table with an integer primary key, a geometry column
//! in GeoPackage binary and one typed column per attribute, together with
//! the required metadata tables. All rows are inserted in a single
//! transaction.

use std::collections::BTreeSet;
use std::path::Path;

use polars::prelude::{Column, DataFrame, DataType};
use rusqlite::types::Value;
use rusqlite::{Connection, params, params_from_iter};

use nuts_model::Crs;
use nuts_model::columns::{GEOMETRY, NUTS_ID};
use nuts_transform::OutputDataset;

use crate::error::{OutputError, Result, sqlite};
use crate::geometry::{EncodedGeometry, encode_geojson, union_bounds};
use crate::srs::{required_refs, spatial_ref};
use crate::values::{any_to_sql, sql_type};

/// `application_id` of a GeoPackage ("GPKG").
pub const APPLICATION_ID: i32 = 0x4750_4B47;
/// `user_version` of GeoPackage 1.3.0.
pub const USER_VERSION: i32 = 10300;

const METADATA_TABLES: &str = "
CREATE TABLE gpkg_spatial_ref_sys (
    srs_name TEXT NOT NULL,
    srs_id INTEGER PRIMARY KEY,
    organization TEXT NOT NULL,
    organization_coordsys_id INTEGER NOT NULL,
    definition TEXT NOT NULL,
    description TEXT
);
CREATE TABLE gpkg_contents (
    table_name TEXT NOT NULL PRIMARY KEY,
    data_type TEXT NOT NULL,
    identifier TEXT UNIQUE,
    description TEXT DEFAULT '',
    last_change DATETIME NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ','now')),
    min_x DOUBLE,
    min_y DOUBLE,
    max_x DOUBLE,
    max_y DOUBLE,
    srs_id INTEGER,
    CONSTRAINT fk_gc_r_srs_id FOREIGN KEY (srs_id) REFERENCES gpkg_spatial_ref_sys(srs_id)
);
CREATE TABLE gpkg_geometry_columns (
    table_name TEXT NOT NULL,
    column_name TEXT NOT NULL,
    geometry_type_name TEXT NOT NULL,
    srs_id INTEGER NOT NULL,
    z TINYINT NOT NULL,
    m TINYINT NOT NULL,
    CONSTRAINT pk_geom_cols PRIMARY KEY (table_name, column_name),
    CONSTRAINT uk_gc_table_name UNIQUE (table_name),
    CONSTRAINT fk_gc_tn FOREIGN KEY (table_name) REFERENCES gpkg_contents(table_name),
    CONSTRAINT fk_gc_srs FOREIGN KEY (srs_id) REFERENCES gpkg_spatial_ref_sys(srs_id)
);
";

/// Write `dataset` as the only feature layer of a new GeoPackage at `path`.
///
/// `path` must not exist yet. Returns the number of features written.
pub fn write_geopackage(
    path: &Path,
    dataset: &OutputDataset,
    layer_name: &str,
    crs: Crs,
) -> Result<usize> {
    validate_layer_name(layer_name)?;

    let mut conn = Connection::open(path).map_err(sqlite("open GeoPackage"))?;
    conn.pragma_update(None, "application_id", APPLICATION_ID)
        .map_err(sqlite("set application id"))?;
    conn.pragma_update(None, "user_version", USER_VERSION)
        .map_err(sqlite("set user version"))?;
    conn.execute_batch(METADATA_TABLES)
        .map_err(sqlite("create metadata tables"))?;

    let features = write_layer(&mut conn, &dataset.data, layer_name, crs)?;

    conn.close()
        .map_err(|(_, source)| OutputError::Sqlite {
            operation: "close GeoPackage",
            source,
        })?;
    Ok(features)
}

fn write_layer(conn: &mut Connection, df: &DataFrame, layer_name: &str, crs: Crs) -> Result<usize> {
    let srs = spatial_ref(crs);
    let attributes: Vec<&Column> = df
        .get_columns()
        .iter()
        .filter(|column| column.name().as_str() != GEOMETRY)
        .collect();
    let taken: Vec<&str> = attributes.iter().map(|column| column.name().as_str()).collect();
    let fid_column = unique_name("fid", &taken);
    let geom_column = unique_name("geom", &taken);

    let geometries = encode_geometries(df, srs.srs_id)?;
    let type_names: BTreeSet<&str> = geometries.iter().flatten().map(|g| g.type_name).collect();
    let geometry_type = match type_names.len() {
        1 => type_names.first().copied().unwrap_or("GEOMETRY"),
        _ => "GEOMETRY",
    };
    let extent = geometries
        .iter()
        .flatten()
        .fold(None, |acc, g| union_bounds(acc, g.bounds));

    let column_defs: Vec<String> = std::iter::once(format!(
        "{} INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL",
        quote_identifier(&fid_column)
    ))
    .chain(std::iter::once(format!(
        "{} {}",
        quote_identifier(&geom_column),
        geometry_type
    )))
    .chain(attributes.iter().map(|column| {
        format!(
            "{} {}",
            quote_identifier(column.name().as_str()),
            sql_type(column.dtype())
        )
    }))
    .collect();

    let insert_columns: Vec<String> = std::iter::once(quote_identifier(&geom_column))
        .chain(
            attributes
                .iter()
                .map(|column| quote_identifier(column.name().as_str())),
        )
        .collect();
    let placeholders = vec!["?"; insert_columns.len()].join(", ");

    let tx = conn.transaction().map_err(sqlite("begin transaction"))?;

    for srs_row in required_refs(crs) {
        tx.execute(
            "INSERT INTO gpkg_spatial_ref_sys \
             (srs_name, srs_id, organization, organization_coordsys_id, definition, description) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                srs_row.name,
                srs_row.srs_id,
                srs_row.organization,
                srs_row.organization_id,
                srs_row.definition,
                srs_row.description
            ],
        )
        .map_err(sqlite("register spatial reference system"))?;
    }

    let create_sql = format!(
        "CREATE TABLE {} ({})",
        quote_identifier(layer_name),
        column_defs.join(", ")
    );
    tracing::debug!(sql = %create_sql, "creating feature table");
    tx.execute(&create_sql, [])
        .map_err(sqlite("create feature table"))?;

    let last_change = chrono::Utc::now()
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string();
    tx.execute(
        "INSERT INTO gpkg_contents \
         (table_name, data_type, identifier, description, last_change, min_x, min_y, max_x, max_y, srs_id) \
         VALUES (?1, 'features', ?2, '', ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            layer_name,
            layer_name,
            last_change,
            extent.map(|rect| rect.min().x),
            extent.map(|rect| rect.min().y),
            extent.map(|rect| rect.max().x),
            extent.map(|rect| rect.max().y),
            srs.srs_id
        ],
    )
    .map_err(sqlite("register layer contents"))?;
    tx.execute(
        "INSERT INTO gpkg_geometry_columns \
         (table_name, column_name, geometry_type_name, srs_id, z, m) \
         VALUES (?1, ?2, ?3, ?4, 0, 0)",
        params![layer_name, geom_column, geometry_type, srs.srs_id],
    )
    .map_err(sqlite("register geometry column"))?;

    {
        let insert_sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            quote_identifier(layer_name),
            insert_columns.join(", "),
            placeholders
        );
        let mut stmt = tx.prepare(&insert_sql).map_err(sqlite("prepare insert"))?;
        for (row, geometry) in geometries.into_iter().enumerate() {
            let mut values: Vec<Value> = Vec::with_capacity(insert_columns.len());
            values.push(geometry.map_or(Value::Null, |g| Value::Blob(g.blob)));
            for column in &attributes {
                values.push(any_to_sql(column.get(row)?));
            }
            stmt.execute(params_from_iter(values.iter()))
                .map_err(sqlite("insert feature"))?;
        }
    }

    tx.commit().map_err(sqlite("commit features"))?;

    tracing::debug!(
        layer = layer_name,
        features = df.height(),
        geometry_type,
        srs_id = srs.srs_id,
        "wrote feature table"
    );
    Ok(df.height())
}

fn encode_geometries(df: &DataFrame, srs_id: i32) -> Result<Vec<Option<EncodedGeometry>>> {
    let Ok(column) = df.column(GEOMETRY) else {
        return Ok(vec![None; df.height()]);
    };
    let text = column.cast(&DataType::String)?;
    let mut encoded = Vec::with_capacity(df.height());
    for (row, value) in text.str()?.into_iter().enumerate() {
        let geometry = match value.map(str::trim) {
            None | Some("") => None,
            Some(value) => Some(encode_geojson(value, srs_id).map_err(|message| {
                OutputError::Geometry {
                    feature: feature_label(df, row),
                    message,
                }
            })?),
        };
        encoded.push(geometry);
    }
    Ok(encoded)
}

fn feature_label(df: &DataFrame, row: usize) -> String {
    df.column(NUTS_ID)
        .ok()
        .and_then(|column| column.str().ok().and_then(|ids| ids.get(row)))
        .map_or_else(|| format!("row {row}"), ToString::to_string)
}

fn validate_layer_name(name: &str) -> Result<()> {
    let reserved = name
        .get(..5)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("gpkg_"));
    if name.trim().is_empty() || reserved || name.chars().any(char::is_control) {
        return Err(OutputError::InvalidLayerName {
            name: name.to_string(),
        });
    }
    Ok(())
}

/// `base`, or `base_N` when an attribute already uses the name (SQLite
/// column names are case-insensitive).
fn unique_name(base: &str, taken: &[&str]) -> String {
    let is_taken = |candidate: &str| taken.iter().any(|name| name.eq_ignore_ascii_case(candidate));
    if !is_taken(base) {
        return base.to_string();
    }
    (1..)
        .map(|n| format!("{base}_{n}"))
        .find(|candidate| !is_taken(candidate))
        .unwrap_or_else(|| base.to_string())
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
