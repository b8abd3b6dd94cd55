use quick_xml::events::{BytesCData, BytesEnd, BytesStart, Event};
use quick_xml::Writer;
use std::io::Write;

use super::write_text_element;

/// Whether coordinate tuples carry a literal 0 altitude. The dataset types
/// disagree on this, and each one's own convention must be preserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinateFormat {
    LonLat,
    LonLatZero,
}

/// Serialize a ring as space-separated coordinate tuples.
pub fn coordinates_text(ring: &geo::LineString, format: CoordinateFormat) -> String {
    ring.coords()
        .map(|coord| match format {
            CoordinateFormat::LonLat => format!("{},{}", coord.x, coord.y),
            CoordinateFormat::LonLatZero => format!("{},{},0", coord.x, coord.y),
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Write one placemark: name, CDATA-wrapped HTML description, style
/// reference and a single-ring polygon boundary. Multipolygons are handled
/// by the caller invoking this once per constituent polygon.
pub fn write_placemark<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    description_html: &str,
    style_url: &str,
    ring: &geo::LineString,
    format: CoordinateFormat,
) -> anyhow::Result<()> {
    writer.write_event(Event::Start(BytesStart::new("Placemark")))?;
    write_text_element(writer, "name", name)?;

    writer.write_event(Event::Start(BytesStart::new("description")))?;
    writer.write_event(Event::CData(BytesCData::new(description_html)))?;
    writer.write_event(Event::End(BytesEnd::new("description")))?;

    write_text_element(writer, "styleUrl", style_url)?;

    writer.write_event(Event::Start(BytesStart::new("Polygon")))?;
    writer.write_event(Event::Start(BytesStart::new("outerBoundaryIs")))?;
    writer.write_event(Event::Start(BytesStart::new("LinearRing")))?;
    write_text_element(writer, "coordinates", &coordinates_text(ring, format))?;
    writer.write_event(Event::End(BytesEnd::new("LinearRing")))?;
    writer.write_event(Event::End(BytesEnd::new("outerBoundaryIs")))?;
    writer.write_event(Event::End(BytesEnd::new("Polygon")))?;

    writer.write_event(Event::End(BytesEnd::new("Placemark")))?;
    Ok(())
}
