use std::collections::HashMap;

/// A single geographic record: one geometry plus its attribute values.
// TODO support different value types besides String. See gdal::vector::OGRFieldType for types
// supported by GDAL.
#[derive(Debug, Clone)]
pub struct Feature {
    pub geometry: geo::Geometry,
    pub attributes: HashMap<String, String>,
}

/// In-memory table of records merged from one or more shapefiles.
///
/// `field_names` keeps the source column order (union across merged files,
/// first seen wins), so attribute iteration and therefore output files are
/// stable across runs. All records share `spatial_ref`.
pub struct FeatureTable {
    pub features: Vec<Feature>,
    pub field_names: Vec<String>,
    pub spatial_ref: gdal::spatial_ref::SpatialRef,
}

impl FeatureTable {
    pub fn empty(spatial_ref: gdal::spatial_ref::SpatialRef) -> Self {
        Self {
            features: Vec::new(),
            field_names: Vec::new(),
            spatial_ref,
        }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.field_names.iter().any(|field| field == name)
    }
}
