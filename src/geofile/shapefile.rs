use anyhow::{anyhow, Context};
use gdal::vector::LayerAccess;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::feature::{Feature, FeatureTable};
use crate::crs::crs_utils::epsg_4326;

/// Attribute text in the MLIT planning shapefiles is Shift_JIS encoded.
const SHAPEFILE_OPEN_OPTIONS: [&str; 1] = ["ENCODING=SHIFT_JIS"];

/// Recursively collect `.shp` files under `root_dir` whose file name contains
/// `keyword`. The result is sorted by path so repeated runs read files in the
/// same order.
pub fn find_shp_files(root_dir: &Path, keyword: &str) -> anyhow::Result<Vec<PathBuf>> {
    let mut file_list = Vec::new();
    collect_shp_files(root_dir, keyword, &mut file_list)?;
    file_list.sort();
    Ok(file_list)
}

fn collect_shp_files(
    dir: &Path,
    keyword: &str,
    file_list: &mut Vec<PathBuf>,
) -> anyhow::Result<()> {
    for entry in fs::read_dir(dir).with_context(|| format!("Listing directory {:?}", dir))? {
        let path = entry?.path();
        if path.is_dir() {
            collect_shp_files(&path, keyword, file_list)?;
        } else if let Some(file_name) = path.file_name().and_then(|name| name.to_str()) {
            if file_name.ends_with(".shp") && file_name.contains(keyword) {
                file_list.push(path);
            }
        }
    }
    Ok(())
}

/// Read and concatenate the given shapefiles into one table.
///
/// The schema is the union of all source columns in first-seen order. Every
/// file must carry the same CRS; a file without a projection is assumed to be
/// EPSG:4326 already.
pub fn merge_shapefiles(file_list: &[PathBuf]) -> anyhow::Result<FeatureTable> {
    gdal::DriverManager::register_all();

    let mut table = FeatureTable::empty(epsg_4326());
    let mut spatial_ref: Option<gdal::spatial_ref::SpatialRef> = None;
    for filepath in file_list {
        append_shapefile(filepath, &mut table, &mut spatial_ref)?;
    }
    if let Some(spatial_ref) = spatial_ref {
        table.spatial_ref = spatial_ref;
    }
    Ok(table)
}

fn append_shapefile(
    filepath: &Path,
    table: &mut FeatureTable,
    spatial_ref: &mut Option<gdal::spatial_ref::SpatialRef>,
) -> anyhow::Result<()> {
    let mut dataset_options = gdal::DatasetOptions::default();
    dataset_options.open_flags = gdal::GdalOpenFlags::GDAL_OF_VECTOR;
    dataset_options.open_options = Some(&SHAPEFILE_OPEN_OPTIONS);
    let dataset = gdal::Dataset::open_ex(filepath, dataset_options)
        .with_context(|| format!("Opening shapefile {:?}", filepath))?;
    let mut layer = dataset
        .layer(0)
        .with_context(|| format!("Reading layer of {:?}", filepath))?;

    let layer_spatial_ref = match layer.spatial_ref() {
        Ok(layer_spatial_ref) => layer_spatial_ref,
        Err(_) => {
            log::warn!("No projection found in {:?}, assuming EPSG:4326", filepath);
            epsg_4326()
        }
    };
    match spatial_ref {
        Some(spatial_ref) => {
            if spatial_ref.auth_code().ok() != layer_spatial_ref.auth_code().ok() {
                return Err(anyhow!(
                    "Shapefile {:?} does not share the CRS of the previously merged files",
                    filepath
                ));
            }
        }
        None => *spatial_ref = Some(layer_spatial_ref),
    }

    for field in layer.defn().fields() {
        let name = field.name();
        if !table.has_field(&name) {
            table.field_names.push(name);
        }
    }

    for gdal_feature in layer.features() {
        let wkb_bytes = gdal_feature.geometry().wkb()?;
        let geometry = wkb::wkb_to_geom(&mut wkb_bytes.as_slice())
            .map_err(|err| anyhow!("Could not read geometry from WKB, {:?}", err))?;
        let mut attributes = HashMap::new();
        for (name, value) in gdal_feature.fields() {
            let value = value.map(field_value_to_string).unwrap_or_default();
            attributes.insert(name, value);
        }
        table.features.push(Feature {
            geometry,
            attributes,
        });
    }
    Ok(())
}

fn field_value_to_string(value: gdal::vector::FieldValue) -> String {
    use gdal::vector::FieldValue;
    match value {
        FieldValue::StringValue(v) => v,
        FieldValue::IntegerValue(v) => v.to_string(),
        FieldValue::Integer64Value(v) => v.to_string(),
        FieldValue::RealValue(v) => v.to_string(),
        FieldValue::DateValue(v) => v.format("%Y-%m-%d").to_string(),
        FieldValue::DateTimeValue(v) => v.to_rfc3339(),
        // List types do not occur in DBF attribute tables.
        other => format!("{:?}", other),
    }
}
