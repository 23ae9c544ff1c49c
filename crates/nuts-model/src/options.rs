//! Configuration passed explicitly to the geometry provider and exporter.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::years::SchemaYear;

/// Layer name of the exported GeoPackage.
pub const DEFAULT_LAYER_NAME: &str = "nuts3_pop";

/// NUTS hierarchy level (0 = country, 3 = small regions). Only level 3 is
/// requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NutsLevel(u8);

impl NutsLevel {
    pub const LEVEL_3: NutsLevel = NutsLevel(3);

    pub const fn value(self) -> u8 {
        self.0
    }

    /// Length of a region identifier at this level (country prefix + one
    /// character per level).
    pub const fn code_length(self) -> usize {
        2 + self.0 as usize
    }
}

impl Default for NutsLevel {
    fn default() -> Self {
        Self::LEVEL_3
    }
}

/// GISCO generalisation scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Resolution {
    /// 1:1 million.
    M01,
    /// 1:3 million.
    M03,
    /// 1:10 million.
    M10,
    /// 1:20 million.
    #[default]
    M20,
    /// 1:60 million.
    M60,
}

impl Resolution {
    /// Code used in GISCO file names.
    pub fn code(self) -> &'static str {
        match self {
            Resolution::M01 => "01M",
            Resolution::M03 => "03M",
            Resolution::M10 => "10M",
            Resolution::M20 => "20M",
            Resolution::M60 => "60M",
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Resolution {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "01M" | "1M" => Ok(Resolution::M01),
            "03M" | "3M" => Ok(Resolution::M03),
            "10M" => Ok(Resolution::M10),
            "20M" => Ok(Resolution::M20),
            "60M" => Ok(Resolution::M60),
            _ => Err(ModelError::InvalidResolution {
                value: s.to_string(),
            }),
        }
    }
}

/// Coordinate reference systems served by GISCO.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Crs {
    /// WGS 84 geographic coordinates.
    #[default]
    Wgs84,
    /// ETRS89 Lambert azimuthal equal-area.
    EtrsLaea,
    /// Web Mercator.
    WebMercator,
}

impl Crs {
    pub fn epsg(self) -> u32 {
        match self {
            Crs::Wgs84 => 4326,
            Crs::EtrsLaea => 3035,
            Crs::WebMercator => 3857,
        }
    }

    pub fn from_epsg(epsg: u32) -> Result<Self> {
        match epsg {
            4326 => Ok(Crs::Wgs84),
            3035 => Ok(Crs::EtrsLaea),
            3857 => Ok(Crs::WebMercator),
            _ => Err(ModelError::UnsupportedCrs { epsg }),
        }
    }
}

impl FromStr for Crs {
    type Err = ModelError;

    /// Accepts `4326` or `EPSG:4326`.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let code = trimmed
            .get(..5)
            .filter(|prefix| prefix.eq_ignore_ascii_case("EPSG:"))
            .map_or(trimmed, |_| &trimmed[5..]);
        let epsg = code.parse::<u32>().map_err(|_| ModelError::InvalidCrs {
            value: s.to_string(),
        })?;
        Self::from_epsg(epsg)
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{}", self.epsg())
    }
}

/// Options controlling which boundary file is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeometryOptions {
    pub schema_year: SchemaYear,
    pub level: NutsLevel,
    pub resolution: Resolution,
    pub crs: Crs,
    /// Reuse previously downloaded files.
    pub cache_enabled: bool,
}

impl GeometryOptions {
    pub fn new(schema_year: SchemaYear) -> Self {
        Self {
            schema_year,
            level: NutsLevel::LEVEL_3,
            resolution: Resolution::default(),
            crs: Crs::default(),
            cache_enabled: true,
        }
    }

    #[must_use]
    pub fn with_resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = resolution;
        self
    }

    #[must_use]
    pub fn with_crs(mut self, crs: Crs) -> Self {
        self.crs = crs;
        self
    }

    #[must_use]
    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.cache_enabled = enabled;
        self
    }
}

/// Output file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    #[default]
    GeoPackage,
}

impl OutputFormat {
    /// OGR-style driver name.
    pub fn driver_name(self) -> &'static str {
        match self {
            OutputFormat::GeoPackage => "GPKG",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::GeoPackage => "gpkg",
        }
    }
}

/// Options for the export stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportOptions {
    pub layer_name: String,
    pub format: OutputFormat,
    /// CRS the geometries are expressed in.
    pub crs: Crs,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            layer_name: DEFAULT_LAYER_NAME.to_string(),
            format: OutputFormat::default(),
            crs: Crs::default(),
        }
    }
}

impl ExportOptions {
    #[must_use]
    pub fn with_crs(mut self, crs: Crs) -> Self {
        self.crs = crs;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_code_length() {
        assert_eq!(NutsLevel::LEVEL_3.code_length(), 5);
        assert_eq!(NutsLevel::LEVEL_3.value(), 3);
    }

    #[test]
    fn test_resolution_parse() {
        assert_eq!("20m".parse::<Resolution>().unwrap(), Resolution::M20);
        assert_eq!("01M".parse::<Resolution>().unwrap(), Resolution::M01);
        assert!("5M".parse::<Resolution>().is_err());
    }

    #[test]
    fn test_crs_round_trip() {
        for crs in [Crs::Wgs84, Crs::EtrsLaea, Crs::WebMercator] {
            assert_eq!(Crs::from_epsg(crs.epsg()).unwrap(), crs);
        }
        assert!(matches!(
            Crs::from_epsg(2154),
            Err(ModelError::UnsupportedCrs { epsg: 2154 })
        ));
    }

    #[test]
    fn test_crs_parse() {
        assert_eq!("3035".parse::<Crs>().unwrap(), Crs::EtrsLaea);
        assert_eq!("epsg:3857".parse::<Crs>().unwrap(), Crs::WebMercator);
        assert_eq!(" EPSG:4326 ".parse::<Crs>().unwrap(), Crs::Wgs84);
        assert!(matches!(
            "2154".parse::<Crs>(),
            Err(ModelError::UnsupportedCrs { epsg: 2154 })
        ));
        assert!(matches!(
            "wgs84".parse::<Crs>(),
            Err(ModelError::InvalidCrs { .. })
        ));
    }

    #[test]
    fn test_defaults() {
        let options = GeometryOptions::new(SchemaYear::Nuts2021);
        assert_eq!(options.level, NutsLevel::LEVEL_3);
        assert_eq!(options.resolution, Resolution::M20);
        assert_eq!(options.crs, Crs::Wgs84);
        assert!(options.cache_enabled);

        let export = ExportOptions::default();
        assert_eq!(export.layer_name, "nuts3_pop");
        assert_eq!(export.format.driver_name(), "GPKG");
    }
}
