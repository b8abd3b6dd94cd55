pub mod feature;
pub mod shapefile;
pub mod split;
