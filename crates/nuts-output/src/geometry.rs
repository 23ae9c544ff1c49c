//! GeoJSON feature geometry to GeoPackage binary.

use geo::{BoundingRect, Geometry, Rect};
use geozero::{CoordDimensions, ToWkb};

/// Geometry ready for insertion.
#[derive(Debug, Clone)]
pub struct EncodedGeometry {
    /// GeoPackage binary: `GP` header with envelope followed by WKB.
    pub blob: Vec<u8>,
    pub type_name: &'static str,
    pub bounds: Option<Rect<f64>>,
}

/// Encode GeoJSON geometry text for a GeoPackage feature table.
pub fn encode_geojson(text: &str, srs_id: i32) -> Result<EncodedGeometry, String> {
    let geojson: geojson::Geometry = serde_json::from_str(text).map_err(|e| e.to_string())?;
    let geometry: Geometry<f64> =
        Geometry::try_from(geojson).map_err(|e: geojson::Error| e.to_string())?;

    let bounds = geometry.bounding_rect();
    let envelope = bounds
        .map(|rect| vec![rect.min().x, rect.max().x, rect.min().y, rect.max().y])
        .unwrap_or_default();
    let blob = geometry
        .to_gpkg_wkb(CoordDimensions::xy(), Some(srs_id), envelope)
        .map_err(|e| e.to_string())?;

    Ok(EncodedGeometry {
        blob,
        type_name: type_name(&geometry),
        bounds,
    })
}

/// OGC geometry type name as used in `gpkg_geometry_columns`.
pub fn type_name(geometry: &Geometry<f64>) -> &'static str {
    match geometry {
        Geometry::Point(_) => "POINT",
        Geometry::Line(_) | Geometry::LineString(_) => "LINESTRING",
        Geometry::Polygon(_) | Geometry::Rect(_) | Geometry::Triangle(_) => "POLYGON",
        Geometry::MultiPoint(_) => "MULTIPOINT",
        Geometry::MultiLineString(_) => "MULTILINESTRING",
        Geometry::MultiPolygon(_) => "MULTIPOLYGON",
        Geometry::GeometryCollection(_) => "GEOMETRYCOLLECTION",
    }
}

/// Smallest rectangle covering both.
pub fn union_bounds(a: Option<Rect<f64>>, b: Option<Rect<f64>>) -> Option<Rect<f64>> {
    match (a, b) {
        (Some(a), Some(b)) => Some(Rect::new(
            (a.min().x.min(b.min().x), a.min().y.min(b.min().y)),
            (a.max().x.max(b.max().x), a.max().y.max(b.max().y)),
        )),
        (Some(rect), None) | (None, Some(rect)) => Some(rect),
        (None, None) => None,
    }
}
