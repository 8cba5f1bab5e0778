//! Aggregation of marker records into region cluster markers.

use ahash::HashMap;
use ahash::HashMapExt;
use geomarker_types::GeoPoint2d;

use crate::marker::{ClusterBy, ClusteringOptions, ClusteringRule, MarkerRecord};

/// A synthetic marker representing one group of records sharing a clustering attribute value.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterMarker {
    /// Arithmetic mean of the member coordinates.
    pub position: GeoPoint2d,
    /// `"<group key> <member count>"`, rendered through the text-bubble path.
    pub label: String,
    /// The rule attribute this cluster belongs to.
    pub by: ClusterBy,
    /// Number of records aggregated into this cluster.
    pub member_count: usize,
}

/// Computes one cluster marker set per configured rule.
///
/// Rules are processed independently: the returned list contains a full layer of clusters for
/// every rule, and the layers coexist (visibility decides which one is shown). Returns an
/// empty list when clustering is absent or disabled.
pub fn build_clusters(
    records: &[MarkerRecord],
    options: Option<&ClusteringOptions>,
) -> Vec<ClusterMarker> {
    let Some(options) = options else {
        return Vec::new();
    };
    if !options.enabled {
        return Vec::new();
    }

    options
        .rules
        .iter()
        .flat_map(|rule| build_rule_layer(records, rule))
        .collect()
}

fn build_rule_layer(records: &[MarkerRecord], rule: &ClusteringRule) -> Vec<ClusterMarker> {
    // Group keys keep the order in which they first appear in the record list so that
    // recomputation is deterministic.
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<&MarkerRecord>> = HashMap::new();

    for record in records {
        let key = rule
            .by
            .key_of(record.extra.as_ref())
            .unwrap_or_else(|| rule.by.placeholder().to_string());

        groups
            .entry(key.clone())
            .or_insert_with(|| {
                order.push(key);
                Vec::new()
            })
            .push(record);
    }

    order
        .into_iter()
        .map(|key| {
            let members = &groups[&key];
            let count = members.len();
            let lat = members.iter().map(|m| m.coordinate.lat()).sum::<f64>() / count as f64;
            let lon = members.iter().map(|m| m.coordinate.lon()).sum::<f64>() / count as f64;

            ClusterMarker {
                position: GeoPoint2d::latlon(lat, lon),
                label: format!("{key} {count}"),
                by: rule.by,
                member_count: count,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use geomarker_types::latlon;

    use crate::marker::RegionInfo;

    fn record(id: &str, lat: f64, lon: f64, city: Option<&str>) -> MarkerRecord {
        let mut record = MarkerRecord::new(id, latlon!(lat, lon));
        record.extra = city.map(|city| RegionInfo {
            city: Some(city.to_string()),
            ..Default::default()
        });
        record
    }

    fn city_options() -> ClusteringOptions {
        ClusteringOptions {
            enabled: true,
            rules: vec![ClusteringRule {
                by: ClusterBy::City,
                threshold_zoom_level: 10.0,
            }],
        }
    }

    #[test]
    fn absent_or_disabled_options_produce_no_clusters() {
        let records = vec![record("a", 1.0, 1.0, Some("Shanghai"))];
        assert!(build_clusters(&records, None).is_empty());

        let disabled = ClusteringOptions {
            enabled: false,
            ..city_options()
        };
        assert!(build_clusters(&records, Some(&disabled)).is_empty());
    }

    #[test]
    fn groups_by_attribute_with_centroid_and_label() {
        let records = vec![
            record("a", 30.0, 120.0, Some("Hangzhou")),
            record("b", 32.0, 122.0, Some("Hangzhou")),
            record("c", 40.0, 116.0, Some("Beijing")),
        ];

        let clusters = build_clusters(&records, Some(&city_options()));
        assert_eq!(clusters.len(), 2);

        assert_eq!(clusters[0].label, "Hangzhou 2");
        assert_abs_diff_eq!(clusters[0].position.lat(), 31.0);
        assert_abs_diff_eq!(clusters[0].position.lon(), 121.0);

        assert_eq!(clusters[1].label, "Beijing 1");
        assert_eq!(clusters[1].by, ClusterBy::City);
    }

    #[test]
    fn missing_attribute_gets_placeholder_group() {
        let records = vec![
            record("a", 1.0, 1.0, None),
            record("b", 3.0, 3.0, None),
            record("c", 5.0, 5.0, Some("Suzhou")),
        ];

        let clusters = build_clusters(&records, Some(&city_options()));
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].label, "unknown city 2");
        assert_abs_diff_eq!(clusters[0].position.lat(), 2.0);
    }

    #[test]
    fn member_counts_sum_to_record_count_per_rule() {
        let records: Vec<_> = (0..17)
            .map(|i| {
                record(
                    &format!("m{i}"),
                    i as f64,
                    i as f64,
                    Some(["A", "B", "C"][i % 3]),
                )
            })
            .collect();

        let options = ClusteringOptions {
            enabled: true,
            rules: vec![
                ClusteringRule {
                    by: ClusterBy::City,
                    threshold_zoom_level: 10.0,
                },
                ClusteringRule {
                    by: ClusterBy::Province,
                    threshold_zoom_level: 8.0,
                },
            ],
        };

        let clusters = build_clusters(&records, Some(&options));
        for by in [ClusterBy::City, ClusterBy::Province] {
            let total: usize = clusters
                .iter()
                .filter(|c| c.by == by)
                .map(|c| c.member_count)
                .sum();
            assert_eq!(total, records.len());
        }
    }

    #[test]
    fn single_member_centroid_is_the_member_coordinate() {
        let records = vec![record("a", 39.9042, 116.4074, Some("Beijing"))];
        let clusters = build_clusters(&records, Some(&city_options()));
        assert_eq!(clusters[0].position, latlon!(39.9042, 116.4074));
    }

    #[test]
    fn duplicate_records_count_separately() {
        let records = vec![
            record("same", 10.0, 10.0, Some("Ningbo")),
            record("same", 10.0, 10.0, Some("Ningbo")),
        ];
        let clusters = build_clusters(&records, Some(&city_options()));
        assert_eq!(clusters[0].label, "Ningbo 2");
    }
}
