use anyhow::Context;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use super::placemark::write_placemark;
use super::simplify::{exterior_rings, reduce_ring_precision};
use super::style::{write_style, StyleSpec};
use crate::crs::reproject::table_to_wgs84;
use crate::dataset::DatasetSpec;
use crate::geofile::feature::{Feature, FeatureTable};
use crate::geofile::split::CategoryGroup;

const KML_NAMESPACE: &str = "http://www.opengis.net/kml/2.2";

/// Write the single document of a dataset without a split attribute.
/// Returns the path written.
pub fn assemble_whole_table(
    table: FeatureTable,
    spec: &DatasetSpec,
    output_dir: &Path,
) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Creating output directory {:?}", output_dir))?;
    let table = table_to_wgs84(table)?;

    let style = spec.styles.resolve(spec.title);
    let filepath = output_dir.join(format!("{}.kml", spec.title));
    write_document(
        &filepath,
        std::slice::from_ref(&style),
        spec,
        &table,
        spec.title,
        &style,
        None,
    )?;
    log::info!("Wrote {:?}", filepath);
    Ok(filepath)
}

/// Write one document per category group. Returns the paths written.
pub fn assemble_groups(
    groups: Vec<CategoryGroup>,
    spec: &DatasetSpec,
    output_dir: &Path,
) -> anyhow::Result<Vec<PathBuf>> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Creating output directory {:?}", output_dir))?;

    let mut written = Vec::new();
    for group in groups {
        let table = table_to_wgs84(group.table)?;
        let style = spec.styles.resolve(&group.name);
        let document_styles: Vec<StyleSpec> = if spec.declare_all_styles {
            let mut document_styles: Vec<StyleSpec> = spec.styles.entries().cloned().collect();
            if !document_styles.iter().any(|declared| declared.id == style.id) {
                document_styles.push(style.clone());
            }
            document_styles
        } else {
            vec![style.clone()]
        };

        let filepath = output_dir.join(category_file_name(&group.name));
        write_document(
            &filepath,
            &document_styles,
            spec,
            &table,
            &group.name,
            &style,
            spec.split_attribute,
        )?;
        log::info!("Wrote {:?}", filepath);
        written.push(filepath);
    }
    Ok(written)
}

fn write_document(
    filepath: &Path,
    styles: &[StyleSpec],
    spec: &DatasetSpec,
    table: &FeatureTable,
    name: &str,
    placemark_style: &StyleSpec,
    skip_field: Option<&str>,
) -> anyhow::Result<()> {
    let file =
        File::create(filepath).with_context(|| format!("Creating KML file {:?}", filepath))?;
    let mut writer = Writer::new(BufWriter::new(file));

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
    let mut kml = BytesStart::new("kml");
    kml.push_attribute(("xmlns", KML_NAMESPACE));
    writer.write_event(Event::Start(kml))?;
    writer.write_event(Event::Start(BytesStart::new("Document")))?;

    for style in styles {
        write_style(&mut writer, style, spec.styles.fill)?;
    }

    let style_url = format!("#{}", placemark_style.id);
    for feature in &table.features {
        let description = description_html(name, &table.field_names, feature, skip_field);
        for ring in exterior_rings(&feature.geometry, spec.simplify_tolerance) {
            let ring = reduce_ring_precision(&ring, spec.coordinate_precision);
            write_placemark(
                &mut writer,
                name,
                &description,
                &style_url,
                &ring,
                spec.coordinate_format,
            )?;
        }
    }

    writer.write_event(Event::End(BytesEnd::new("Document")))?;
    writer.write_event(Event::End(BytesEnd::new("kml")))?;
    writer
        .into_inner()
        .flush()
        .with_context(|| format!("Flushing KML file {:?}", filepath))?;
    Ok(())
}

/// HTML body of the placemark popup: `<h3>` header plus a bordered table
/// with one row per attribute in schema order. Cell values go in raw; the
/// CDATA wrapping in the placemark is the only escaping. In split mode the
/// split attribute is the header and is left out of the table.
fn description_html(
    header: &str,
    field_names: &[String],
    feature: &Feature,
    skip_field: Option<&str>,
) -> String {
    let mut html = format!("<h3>{}</h3>", header);
    html.push_str("<table border='1'><tr><th>属性</th><th>値</th></tr>");
    for field_name in field_names {
        if Some(field_name.as_str()) == skip_field {
            continue;
        }
        let value = feature
            .attributes
            .get(field_name)
            .map(String::as_str)
            .unwrap_or("");
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td></tr>",
            field_name, value
        ));
    }
    html.push_str("</table>");
    html
}

/// File name for one category, with spaces made filesystem-safe.
fn category_file_name(category: &str) -> String {
    format!("{}.kml", category.replace(' ', "_"))
}
