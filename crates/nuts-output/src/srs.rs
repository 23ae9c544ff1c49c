//! Spatial reference systems registered in every GeoPackage.

use nuts_model::Crs;

/// One `gpkg_spatial_ref_sys` row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpatialRef {
    pub srs_id: i32,
    pub name: &'static str,
    pub organization: &'static str,
    pub organization_id: i32,
    pub definition: &'static str,
    pub description: &'static str,
}

const WGS84_WKT: &str = r#"GEOGCS["WGS 84",DATUM["WGS_1984",SPHEROID["WGS 84",6378137,298.257223563,AUTHORITY["EPSG","7030"]],AUTHORITY["EPSG","6326"]],PRIMEM["Greenwich",0,AUTHORITY["EPSG","8901"]],UNIT["degree",0.0174532925199433,AUTHORITY["EPSG","9122"]],AUTHORITY["EPSG","4326"]]"#;

const LAEA_WKT: &str = r#"PROJCS["ETRS89-extended / LAEA Europe",GEOGCS["ETRS89",DATUM["European_Terrestrial_Reference_System_1989",SPHEROID["GRS 1980",6378137,298.257222101,AUTHORITY["EPSG","7019"]],AUTHORITY["EPSG","6258"]],PRIMEM["Greenwich",0,AUTHORITY["EPSG","8901"]],UNIT["degree",0.0174532925199433,AUTHORITY["EPSG","9122"]],AUTHORITY["EPSG","4258"]],PROJECTION["Lambert_Azimuthal_Equal_Area"],PARAMETER["latitude_of_center",52],PARAMETER["longitude_of_center",10],PARAMETER["false_easting",4321000],PARAMETER["false_northing",3210000],UNIT["metre",1,AUTHORITY["EPSG","9001"]],AUTHORITY["EPSG","3035"]]"#;

const PSEUDO_MERCATOR_WKT: &str = r#"PROJCS["WGS 84 / Pseudo-Mercator",GEOGCS["WGS 84",DATUM["WGS_1984",SPHEROID["WGS 84",6378137,298.257223563,AUTHORITY["EPSG","7030"]],AUTHORITY["EPSG","6326"]],PRIMEM["Greenwich",0,AUTHORITY["EPSG","8901"]],UNIT["degree",0.0174532925199433,AUTHORITY["EPSG","9122"]],AUTHORITY["EPSG","4326"]],PROJECTION["Mercator_1SP"],PARAMETER["central_meridian",0],PARAMETER["scale_factor",1],PARAMETER["false_easting",0],PARAMETER["false_northing",0],UNIT["metre",1,AUTHORITY["EPSG","9001"]],AUTHORITY["EPSG","3857"]]"#;

/// Rows required by the GeoPackage standard.
pub const UNDEFINED: [SpatialRef; 2] = [
    SpatialRef {
        srs_id: -1,
        name: "Undefined cartesian SRS",
        organization: "NONE",
        organization_id: -1,
        definition: "undefined",
        description: "undefined cartesian coordinate reference system",
    },
    SpatialRef {
        srs_id: 0,
        name: "Undefined geographic SRS",
        organization: "NONE",
        organization_id: 0,
        definition: "undefined",
        description: "undefined geographic coordinate reference system",
    },
];

pub fn spatial_ref(crs: Crs) -> SpatialRef {
    match crs {
        Crs::Wgs84 => SpatialRef {
            srs_id: 4326,
            name: "WGS 84 geodetic",
            organization: "EPSG",
            organization_id: 4326,
            definition: WGS84_WKT,
            description: "longitude/latitude coordinates in decimal degrees on the WGS 84 spheroid",
        },
        Crs::EtrsLaea => SpatialRef {
            srs_id: 3035,
            name: "ETRS89-extended / LAEA Europe",
            organization: "EPSG",
            organization_id: 3035,
            definition: LAEA_WKT,
            description: "Lambert azimuthal equal area projection for Europe",
        },
        Crs::WebMercator => SpatialRef {
            srs_id: 3857,
            name: "WGS 84 / Pseudo-Mercator",
            organization: "EPSG",
            organization_id: 3857,
            definition: PSEUDO_MERCATOR_WKT,
            description: "spherical Mercator projection used by web maps",
        },
    }
}

/// Every row to register for a layer in `crs`, without duplicates.
pub fn required_refs(crs: Crs) -> Vec<SpatialRef> {
    let mut refs = UNDEFINED.to_vec();
    refs.push(spatial_ref(Crs::Wgs84));
    if crs != Crs::Wgs84 {
        refs.push(spatial_ref(crs));
    }
    refs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_srs_ids_follow_epsg() {
        for crs in [Crs::Wgs84, Crs::EtrsLaea, Crs::WebMercator] {
            let srs = spatial_ref(crs);
            assert_eq!(u32::try_from(srs.srs_id).unwrap(), crs.epsg());
            assert!(srs.definition.contains(&format!("\"{}\"]]", crs.epsg())));
        }
    }

    #[test]
    fn test_required_refs() {
        let ids: Vec<i32> = required_refs(Crs::Wgs84).iter().map(|r| r.srs_id).collect();
        assert_eq!(ids, vec![-1, 0, 4326]);
        let ids: Vec<i32> = required_refs(Crs::EtrsLaea).iter().map(|r| r.srs_id).collect();
        assert_eq!(ids, vec![-1, 0, 4326, 3035]);
    }
}
