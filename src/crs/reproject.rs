use anyhow::anyhow;
use proj::Transform;

use super::crs_utils::{epsg_4326, epsg_code_to_authority_string, EpsgCode, WGS84_EPSG};
use crate::geofile::feature::FeatureTable;

/// Reproject every geometry of the table to the display CRS (EPSG:4326).
///
/// A table that already carries EPSG:4326 is returned unchanged. Non-polygon
/// geometries pass through untouched since they never reach the output.
pub fn table_to_wgs84(table: FeatureTable) -> anyhow::Result<FeatureTable> {
    let source_code = table.spatial_ref.auth_code()? as EpsgCode;
    if source_code == WGS84_EPSG {
        return Ok(table);
    }
    log::info!(
        "Reprojecting {} records from {} to {}",
        table.len(),
        epsg_code_to_authority_string(source_code),
        epsg_code_to_authority_string(WGS84_EPSG)
    );
    let projection = proj::Proj::new_known_crs(
        &epsg_code_to_authority_string(source_code),
        &epsg_code_to_authority_string(WGS84_EPSG),
        None,
    )?;

    let FeatureTable {
        features,
        field_names,
        ..
    } = table;
    let features = features
        .into_iter()
        .map(|mut feature| {
            feature.geometry = match feature.geometry {
                geo::Geometry::Polygon(polygon) => geo::Geometry::Polygon(
                    polygon
                        .transformed(&projection)
                        .map_err(|err| anyhow!("Could not reproject polygon, {}", err))?,
                ),
                geo::Geometry::MultiPolygon(multi_polygon) => geo::Geometry::MultiPolygon(
                    multi_polygon
                        .transformed(&projection)
                        .map_err(|err| anyhow!("Could not reproject multipolygon, {}", err))?,
                ),
                other => other,
            };
            Ok(feature)
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(FeatureTable {
        features,
        field_names,
        spatial_ref: epsg_4326(),
    })
}
