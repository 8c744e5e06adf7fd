// Boundary document pass-through.

use log::info;

use geojson::GeoJson;

use crate::lfs::*;

/// Reads the province boundary file.
///
/// Only the overall shape is checked here: the features and their
/// geometries are handed to the map output untouched and never
/// interpreted.
pub fn read_boundary(path: &str) -> DashResult<geojson::FeatureCollection> {
    let contents = fs::read_to_string(path).context(OpeningDataSnafu {
        path: path.to_string(),
    })?;
    let gj: GeoJson = contents.parse().context(ParsingBoundarySnafu {
        path: path.to_string(),
    })?;
    match gj {
        GeoJson::FeatureCollection(fc) => {
            info!(
                "read_boundary: {}: {} features",
                io_common::simplify_file_name(path),
                fc.features.len()
            );
            Ok(fc)
        }
        _ => BoundaryNotCollectionSnafu {
            path: path.to_string(),
        }
        .fail(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDARY: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {"prov_name_en": "Alberta"},
                "geometry": {"type": "Polygon", "coordinates": [[
                    [-120.0, 49.0], [-110.0, 49.0], [-110.0, 60.0],
                    [-120.0, 60.0], [-120.0, 49.0]
                ]]}
            }
        ]
    }"#;

    #[test]
    fn boundary_is_passed_through() {
        let path = std::env::temp_dir().join("wfdash_test_boundary.geojson");
        fs::write(&path, BOUNDARY).unwrap();
        let fc = read_boundary(path.display().to_string().as_str()).unwrap();
        assert_eq!(fc.features.len(), 1);
        let name = fc.features[0]
            .property("prov_name_en")
            .and_then(|v| v.as_str())
            .unwrap();
        assert_eq!(name, "Alberta");
    }

    #[test]
    fn non_collection_boundary_is_rejected() {
        let path = std::env::temp_dir().join("wfdash_test_boundary_point.geojson");
        fs::write(&path, r#"{"type": "Point", "coordinates": [0.0, 0.0]}"#).unwrap();
        let res = read_boundary(path.display().to_string().as_str());
        match res {
            Err(DashError::BoundaryNotCollection { .. }) => {}
            x => panic!("unexpected result {:?}", x),
        }
    }
}
