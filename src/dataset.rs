use serde::Deserialize;

use crate::kml::placemark::CoordinateFormat;
use crate::kml::style::{FillKind, StyleTable};

/// The three MLIT urban-planning dataset types this tool understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetKind {
    /// 都市計画区域 (city planning area), one whole-table overlay.
    UrbanPlanningArea,
    /// 区域区分 (urbanization promotion/control boundary), split per category.
    AreaDivision,
    /// 用途地域 (land-use zoning), split per zoning category.
    LandUseZone,
}

impl DatasetKind {
    pub const ALL: [DatasetKind; 3] = [
        DatasetKind::UrbanPlanningArea,
        DatasetKind::AreaDivision,
        DatasetKind::LandUseZone,
    ];
}

/// Everything that differs between the three dataset pipelines: discovery
/// keyword, split attribute, styling and output naming. The values are fixed
/// per dataset type; changing them changes the emitted files byte for byte.
pub struct DatasetSpec {
    pub kind: DatasetKind,
    /// Substring a shapefile name must contain to belong to this dataset.
    pub keyword: &'static str,
    /// Subdirectory under `<output_root>/<prefecture>/` receiving the KML files.
    pub output_dirname: &'static str,
    /// Display title, also the output file name in whole-table mode.
    pub title: &'static str,
    /// Attribute used to partition records; `None` means whole-table output.
    pub split_attribute: Option<&'static str>,
    /// Decimal digits kept per coordinate.
    pub coordinate_precision: u32,
    /// Douglas-Peucker tolerance for boundary simplification, if any.
    pub simplify_tolerance: Option<f64>,
    pub coordinate_format: CoordinateFormat,
    /// When set, each per-category document declares the whole style table
    /// instead of only the group's own style.
    pub declare_all_styles: bool,
    pub styles: StyleTable,
}

impl DatasetKind {
    pub fn spec(self) -> DatasetSpec {
        match self {
            DatasetKind::UrbanPlanningArea => DatasetSpec {
                kind: self,
                keyword: "_tokei",
                output_dirname: "01_都市計画区域",
                title: "都市計画区域",
                split_attribute: None,
                coordinate_precision: 7,
                simplify_tolerance: Some(0.00001),
                coordinate_format: CoordinateFormat::LonLat,
                declare_all_styles: false,
                styles: StyleTable::new(
                    FillKind::Outline,
                    &[("都市計画区域", "style_urban_planning", "ff404040")],
                ),
            },
            DatasetKind::AreaDivision => DatasetSpec {
                kind: self,
                keyword: "_senbiki",
                output_dirname: "02_区域区分",
                title: "区域区分",
                split_attribute: Some("区域区分"),
                coordinate_precision: 7,
                simplify_tolerance: None,
                coordinate_format: CoordinateFormat::LonLatZero,
                declare_all_styles: true,
                styles: StyleTable::new(
                    FillKind::Translucent,
                    &[
                        ("市街化区域", "style_shigaika", "ff0000ff"),
                        ("市街化調整区域", "style_chosei", "ff00ff00"),
                    ],
                ),
            },
            DatasetKind::LandUseZone => DatasetSpec {
                kind: self,
                keyword: "_youto",
                output_dirname: "用途地域",
                title: "用途地域",
                split_attribute: Some("用途地域"),
                coordinate_precision: 7,
                simplify_tolerance: None,
                coordinate_format: CoordinateFormat::LonLatZero,
                declare_all_styles: false,
                styles: StyleTable::new(
                    FillKind::Translucent,
                    &[
                        ("第一種低層住居専用地域", "style_1low", "ff00ff00"),
                        ("第二種低層住居専用地域", "style_2low", "ff00ff80"),
                        ("第一種中高層住居専用地域", "style_1mid", "ffffff00"),
                        ("第二種中高層住居専用地域", "style_2mid", "ffffff80"),
                        ("第一種住居地域", "style_1res", "ffff8000"),
                        ("第二種住居地域", "style_2res", "ffff8080"),
                        ("準住居地域", "style_semires", "ffff0000"),
                        ("近隣商業地域", "style_neighbor", "ffff00ff"),
                        ("商業地域", "style_commercial", "ffff80ff"),
                        ("準工業地域", "style_semiindustrial", "ff0080ff"),
                        ("工業地域", "style_industrial", "ff0000ff"),
                        ("工業専用地域", "style_exclusiveindustrial", "ff000080"),
                    ],
                ),
            },
        }
    }
}
