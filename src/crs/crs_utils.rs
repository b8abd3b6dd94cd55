pub type EpsgCode = u32;

/// The display CRS every output document uses.
pub const WGS84_EPSG: EpsgCode = 4326;

pub fn epsg_4326() -> gdal::spatial_ref::SpatialRef {
    gdal::spatial_ref::SpatialRef::from_epsg(WGS84_EPSG).unwrap()
}

pub fn epsg_code_to_authority_string(code: EpsgCode) -> String {
    format!("EPSG:{}", code)
}
