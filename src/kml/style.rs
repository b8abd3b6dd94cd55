use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::Writer;
use std::io::Write;

use super::write_text_element;

/// Line width shared by every emitted style.
const LINE_WIDTH: &str = "2";
/// Neutral gray used for categories without an explicit mapping.
const DEFAULT_LINE_COLOR: &str = "ff888888";

/// How the polygon interior of a style is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillKind {
    /// Outline only: `<fill>0</fill><outline>1</outline>`.
    Outline,
    /// Semi-transparent fill color derived from the line color.
    Translucent,
}

/// One KML style: element id plus aabbggrr line color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleSpec {
    pub id: String,
    pub line_color: String,
}

/// Immutable category → style mapping for one dataset type.
pub struct StyleTable {
    entries: Vec<(String, StyleSpec)>,
    pub fill: FillKind,
}

impl StyleTable {
    /// Build a table from `(category, style id, line color)` triples.
    pub fn new(fill: FillKind, entries: &[(&str, &str, &str)]) -> Self {
        Self {
            entries: entries
                .iter()
                .map(|(category, id, line_color)| {
                    (
                        category.to_string(),
                        StyleSpec {
                            id: id.to_string(),
                            line_color: line_color.to_string(),
                        },
                    )
                })
                .collect(),
            fill,
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = &StyleSpec> {
        self.entries.iter().map(|(_, spec)| spec)
    }

    /// Resolve a category to its style. An unmapped category synthesizes a
    /// `style_<category>` id with the neutral gray color instead of failing.
    pub fn resolve(&self, category: &str) -> StyleSpec {
        self.entries
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, spec)| spec.clone())
            .unwrap_or_else(|| StyleSpec {
                id: format!("style_{}", category),
                line_color: DEFAULT_LINE_COLOR.to_string(),
            })
    }
}

/// Fill color of the translucent PolyStyle: every `ff` in the line color
/// replaced by `80`. A plain string substitution, not an alpha computation —
/// it can touch non-alpha channels, and the published overlay colors depend
/// on exactly that.
pub fn fill_color(line_color: &str) -> String {
    line_color.replace("ff", "80")
}

pub fn write_style<W: Write>(
    writer: &mut Writer<W>,
    style: &StyleSpec,
    fill: FillKind,
) -> anyhow::Result<()> {
    let mut element = BytesStart::new("Style");
    element.push_attribute(("id", style.id.as_str()));
    writer.write_event(Event::Start(element))?;

    writer.write_event(Event::Start(BytesStart::new("LineStyle")))?;
    write_text_element(writer, "color", &style.line_color)?;
    write_text_element(writer, "width", LINE_WIDTH)?;
    writer.write_event(Event::End(BytesEnd::new("LineStyle")))?;

    writer.write_event(Event::Start(BytesStart::new("PolyStyle")))?;
    match fill {
        FillKind::Outline => {
            write_text_element(writer, "fill", "0")?;
            write_text_element(writer, "outline", "1")?;
        }
        FillKind::Translucent => {
            write_text_element(writer, "color", &fill_color(&style.line_color))?;
        }
    }
    writer.write_event(Event::End(BytesEnd::new("PolyStyle")))?;

    writer.write_event(Event::End(BytesEnd::new("Style")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use quick_xml::Writer;
    use rstest::rstest;

    use super::{fill_color, write_style, FillKind, StyleTable};

    fn two_entry_table() -> StyleTable {
        StyleTable::new(
            FillKind::Translucent,
            &[
                ("市街化区域", "style_shigaika", "ff0000ff"),
                ("市街化調整区域", "style_chosei", "ff00ff00"),
            ],
        )
    }

    #[rstest]
    fn test_resolve_mapped_category() {
        let style = two_entry_table().resolve("市街化調整区域");
        assert_eq!(style.id, "style_chosei");
        assert_eq!(style.line_color, "ff00ff00");
    }

    #[rstest]
    fn test_resolve_unmapped_category_falls_back_to_gray() {
        let style = two_entry_table().resolve("準都市計画区域");
        assert_eq!(style.id, "style_準都市計画区域");
        assert_eq!(style.line_color, "ff888888");
    }

    #[rstest]
    #[case("ff0000ff", "80000080")]
    #[case("ff404040", "80404040")]
    #[case("ffffff00", "80808000")]
    fn test_fill_color_replaces_every_ff_pair(#[case] line: &str, #[case] expected: &str) {
        assert_eq!(fill_color(line), expected);
    }

    #[rstest]
    fn test_write_style_outline_kind() {
        let mut writer = Writer::new(Vec::new());
        let style = StyleTable::new(
            FillKind::Outline,
            &[("都市計画区域", "style_urban_planning", "ff404040")],
        )
        .resolve("都市計画区域");
        write_style(&mut writer, &style, FillKind::Outline).unwrap();
        let xml = String::from_utf8(writer.into_inner()).unwrap();
        assert!(xml.starts_with("<Style id=\"style_urban_planning\">"));
        assert!(xml.contains("<LineStyle><color>ff404040</color><width>2</width></LineStyle>"));
        assert!(xml.contains("<PolyStyle><fill>0</fill><outline>1</outline></PolyStyle>"));
    }

    #[rstest]
    fn test_write_style_translucent_kind() {
        let mut writer = Writer::new(Vec::new());
        let style = two_entry_table().resolve("市街化区域");
        write_style(&mut writer, &style, FillKind::Translucent).unwrap();
        let xml = String::from_utf8(writer.into_inner()).unwrap();
        assert!(xml.contains("<PolyStyle><color>80000080</color></PolyStyle>"));
    }
}
