use std::collections::HashMap;

use anyhow::anyhow;

use super::feature::FeatureTable;

/// Subset of a table whose records all share one value of the split
/// attribute. The group name is the literal attribute value.
pub struct CategoryGroup {
    pub name: String,
    pub table: FeatureTable,
}

/// Partition a table into one group per distinct value of `attribute`.
///
/// Groups come out in first-seen record order and together hold every record
/// of the input exactly once. An attribute missing from the table schema is
/// an error; an empty table yields zero groups.
pub fn split_by_attribute(
    table: FeatureTable,
    attribute: &str,
) -> anyhow::Result<Vec<CategoryGroup>> {
    if !table.has_field(attribute) {
        return Err(anyhow!(
            "Attribute '{}' not found in merged table (fields: {:?})",
            attribute,
            table.field_names
        ));
    }

    let FeatureTable {
        features,
        field_names,
        spatial_ref,
    } = table;
    let mut groups: Vec<CategoryGroup> = Vec::new();
    let mut group_index_by_name: HashMap<String, usize> = HashMap::new();
    for feature in features {
        let value = feature
            .attributes
            .get(attribute)
            .cloned()
            .unwrap_or_default();
        let group_index = match group_index_by_name.get(&value) {
            Some(group_index) => *group_index,
            None => {
                group_index_by_name.insert(value.clone(), groups.len());
                groups.push(CategoryGroup {
                    name: value,
                    table: FeatureTable {
                        features: Vec::new(),
                        field_names: field_names.clone(),
                        spatial_ref: spatial_ref.clone(),
                    },
                });
                groups.len() - 1
            }
        };
        groups[group_index].table.features.push(feature);
    }
    Ok(groups)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rstest::rstest;

    use crate::crs::crs_utils::epsg_4326;
    use crate::geofile::feature::{Feature, FeatureTable};

    use super::split_by_attribute;

    fn table_with_categories(categories: &[&str]) -> FeatureTable {
        let features = categories
            .iter()
            .enumerate()
            .map(|(i, category)| Feature {
                geometry: geo::Geometry::Point(geo::Point::new(i as f64, i as f64)),
                attributes: HashMap::from([("区域区分".to_string(), category.to_string())]),
            })
            .collect();
        FeatureTable {
            features,
            field_names: vec!["区域区分".to_string()],
            spatial_ref: epsg_4326(),
        }
    }

    #[rstest]
    fn test_split_partitions_exactly() {
        let table = table_with_categories(&["市街化区域", "市街化調整区域", "市街化区域"]);
        let total = table.len();

        let groups = split_by_attribute(table, "区域区分").unwrap();

        assert_eq!(groups.len(), 2);
        assert_eq!(groups.iter().map(|g| g.table.len()).sum::<usize>(), total);
        for group in &groups {
            for feature in &group.table.features {
                assert_eq!(feature.attributes["区域区分"], group.name);
            }
        }
    }

    #[rstest]
    fn test_split_preserves_first_seen_order() {
        let table = table_with_categories(&["b", "a", "b", "c"]);
        let groups = split_by_attribute(table, "区域区分").unwrap();
        let names: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
    }

    #[rstest]
    fn test_split_missing_attribute_is_an_error() {
        let table = table_with_categories(&["a"]);
        assert!(split_by_attribute(table, "用途地域").is_err());
    }

    #[rstest]
    fn test_split_empty_table_yields_no_groups() {
        let table = table_with_categories(&[]);
        let groups = split_by_attribute(table, "区域区分").unwrap();
        assert!(groups.is_empty());
    }
}
