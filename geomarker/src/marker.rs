//! Marker and clustering data model.

use geomarker_types::{GeoPoint2d, Point2, Size};
use serde::{Deserialize, Serialize};

use crate::color::Color;

/// One point annotation supplied by the application.
///
/// Records are stored by the engine verbatim: ids are not required to be unique, duplicates are
/// preserved, and the supplied order is kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerRecord {
    /// Application-defined identifier, reported back on tap events. Not required to be unique.
    pub id: String,
    /// Geographic position of the annotation.
    pub coordinate: GeoPoint2d,
    /// Title shown in the marker callout.
    #[serde(default)]
    pub title: Option<String>,
    /// Subtitle shown in the marker callout.
    #[serde(default)]
    pub subtitle: Option<String>,
    /// Icon style of the marker. Defaults to the built-in pin.
    #[serde(default)]
    pub style: MarkerStyle,
    /// Geocoding attributes used only as clustering keys.
    #[serde(default)]
    pub extra: Option<RegionInfo>,
}

impl MarkerRecord {
    /// Creates a pin-styled record with no titles or extra attributes.
    pub fn new(id: impl Into<String>, coordinate: GeoPoint2d) -> Self {
        Self {
            id: id.into(),
            coordinate,
            title: None,
            subtitle: None,
            style: MarkerStyle::default(),
            extra: None,
        }
    }

    /// Text of the custom-style bubble: title if non-empty, subtitle otherwise.
    pub fn bubble_text(&self) -> Option<&str> {
        match self.title.as_deref() {
            Some(title) if !title.is_empty() => Some(title),
            _ => self.subtitle.as_deref(),
        }
    }
}

/// Icon style of a marker with a per-style payload.
///
/// The set of styles is closed. An unknown style tag is rejected when the record is
/// deserialized instead of silently rendering nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MarkerStyle {
    /// The map surface's built-in pin, tinted by one of three fixed colors.
    Pin(PinStyle),
    /// A fixed-size teardrop silhouette with an optional head label and info capsule.
    Teardrop(TeardropStyle),
    /// A text bubble, optionally composed over a remotely fetched image.
    Custom(CustomStyle),
}

impl Default for MarkerStyle {
    fn default() -> Self {
        MarkerStyle::Pin(PinStyle::default())
    }
}

impl MarkerStyle {
    /// Discriminant of the style, without its payload.
    pub fn kind(&self) -> StyleKind {
        match self {
            MarkerStyle::Pin(_) => StyleKind::Pin,
            MarkerStyle::Teardrop(_) => StyleKind::Teardrop,
            MarkerStyle::Custom(_) => StyleKind::Custom,
        }
    }
}

/// Discriminant of [`MarkerStyle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleKind {
    /// The `pin` style.
    Pin,
    /// The `teardrop` style.
    Teardrop,
    /// The `custom` style.
    Custom,
}

/// Payload of the `pin` style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PinStyle {
    /// Tint of the built-in pin artwork.
    #[serde(default)]
    pub color: PinColor,
}

/// Tint of the built-in pin. The indices match the platform annotation colors:
/// 0 is red, 1 is green, 2 is purple. Any other index falls back to red.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum PinColor {
    /// Red pin (index 0).
    #[default]
    Red,
    /// Green pin (index 1).
    Green,
    /// Purple pin (index 2).
    Purple,
}

impl From<i32> for PinColor {
    fn from(value: i32) -> Self {
        match value {
            1 => PinColor::Green,
            2 => PinColor::Purple,
            _ => PinColor::Red,
        }
    }
}

impl From<PinColor> for i32 {
    fn from(value: PinColor) -> Self {
        match value {
            PinColor::Red => 0,
            PinColor::Green => 1,
            PinColor::Purple => 2,
        }
    }
}

/// Payload of the `teardrop` style.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeardropStyle {
    /// Short text rendered in the circular head of the drop. When absent, a thin outlined
    /// circle is drawn instead.
    #[serde(default)]
    pub label: Option<String>,
    /// Explicit fill color. Takes precedence over the seeded color.
    #[serde(default)]
    pub fill_color: Option<String>,
    /// Seed for a deterministic palette color, used when no explicit color is given.
    #[serde(default)]
    pub fill_color_seed: Option<String>,
    /// Text of the info capsule stacked above the drop. The capsule is laid out only when
    /// this is non-empty.
    #[serde(default)]
    pub info_text: Option<String>,
}

impl TeardropStyle {
    /// Default fill color of the drop: `#5981D8`.
    pub const DEFAULT_FILL: Color = Color::from_hex("#5981D8");

    /// Resolves the fill color: explicit color, then seeded color, then the default.
    /// A malformed explicit color degrades to the default.
    pub fn resolve_fill(&self) -> Color {
        match (&self.fill_color, &self.fill_color_seed) {
            (Some(hex), _) => Color::from_hex_or(hex, Self::DEFAULT_FILL),
            (None, Some(seed)) => Color::from_seed(seed),
            (None, None) => Self::DEFAULT_FILL,
        }
    }
}

/// Payload of the `custom` style.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomStyle {
    /// Styling of the text bubble. Unset fields keep their defaults.
    #[serde(default)]
    pub text_style: Option<TextStyle>,
    /// Offset of the text bubble from the icon center, in logical units.
    #[serde(default)]
    pub text_offset: Option<Point2>,
    /// Remote image composed under the bubble. When present, the marker is added to the map
    /// only after the fetch completes.
    #[serde(default)]
    pub image: Option<ImageSource>,
}

/// Styling of the custom text bubble. All fields are optional; an unset field is simply not
/// applied and the documented default is used.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    /// Text color. Defaults to white.
    #[serde(default)]
    pub color: Option<String>,
    /// Font size in logical units. Defaults to 14.
    #[serde(default)]
    pub font_size: Option<f64>,
    /// CSS-like font weight (`"bold"`, `"700"`, ...). Defaults to bold.
    #[serde(default)]
    pub font_weight: Option<String>,
    /// Maximum number of text lines. Defaults to a single line.
    #[serde(default)]
    pub number_of_lines: Option<u32>,
    /// Horizontal/vertical padding around the text, in logical units. Defaults to 6x4.
    #[serde(default)]
    pub padding: Option<Point2>,
    /// Background color of the bubble. Defaults to `#5981D8`.
    #[serde(default)]
    pub background_color: Option<String>,
}

/// A remote image referenced by a `custom` style marker.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageSource {
    /// Url to fetch the image from.
    pub url: String,
    /// Target size in logical units. When absent, the bitmap's intrinsic size is used.
    #[serde(default)]
    pub size: Option<Size>,
}

/// Geocoding attributes of a record. Only used as clustering keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionInfo {
    /// Administrative province.
    #[serde(default)]
    pub province: Option<String>,
    /// City.
    #[serde(default)]
    pub city: Option<String>,
    /// District.
    #[serde(default)]
    pub district: Option<String>,
}

/// Attribute a clustering rule groups records by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClusterBy {
    /// Group records by province.
    Province,
    /// Group records by city.
    City,
    /// Group records by district.
    District,
}

impl ClusterBy {
    /// Extracts the grouping key from the record's region attributes.
    pub fn key_of(&self, extra: Option<&RegionInfo>) -> Option<String> {
        let extra = extra?;
        match self {
            ClusterBy::Province => extra.province.clone(),
            ClusterBy::City => extra.city.clone(),
            ClusterBy::District => extra.district.clone(),
        }
    }

    /// Group label for records that miss the attribute.
    pub fn placeholder(&self) -> &'static str {
        match self {
            ClusterBy::Province => "unknown province",
            ClusterBy::City => "unknown city",
            ClusterBy::District => "unknown district",
        }
    }
}

/// One clustering rule: group by an attribute, collapse below a zoom threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusteringRule {
    /// Attribute the rule groups records by.
    pub by: ClusterBy,
    /// Zoom level at which the rule stops collapsing markers. The rule is active while the
    /// current zoom is strictly below this value.
    pub threshold_zoom_level: f64,
}

/// Clustering configuration supplied by the application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusteringOptions {
    /// Whether clustering is active at all.
    pub enabled: bool,
    /// Rules in the order they were supplied. The order is not assumed to be sorted.
    #[serde(default)]
    pub rules: Vec<ClusteringRule>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use geomarker_types::latlon;

    #[test]
    fn style_defaults_to_pin() {
        let record: MarkerRecord = serde_json::from_str(
            r#"{"id": "a", "coordinate": {"lat": 1.0, "lon": 2.0}}"#,
        )
        .expect("invalid json");

        assert_eq!(record.style, MarkerStyle::Pin(PinStyle { color: PinColor::Red }));
        assert_eq!(record.coordinate, latlon!(1.0, 2.0));
    }

    #[test]
    fn unknown_style_tag_is_rejected() {
        let result: Result<MarkerRecord, _> = serde_json::from_str(
            r#"{"id": "a", "coordinate": {"lat": 1.0, "lon": 2.0}, "style": {"type": "sparkles"}}"#,
        );

        assert!(result.is_err());
    }

    #[test]
    fn teardrop_payload_roundtrip() {
        let record: MarkerRecord = serde_json::from_str(
            r#"{
                "id": "a",
                "coordinate": {"lat": 1.0, "lon": 2.0},
                "style": {"type": "teardrop", "label": "7", "fillColorSeed": "shop-7"},
                "extra": {"province": "Zhejiang", "city": "Hangzhou"}
            }"#,
        )
        .expect("invalid json");

        assert_matches!(
            &record.style,
            MarkerStyle::Teardrop(TeardropStyle { label: Some(label), .. }) if label == "7"
        );
        assert_eq!(
            ClusterBy::City.key_of(record.extra.as_ref()),
            Some("Hangzhou".into())
        );
        assert_eq!(ClusterBy::District.key_of(record.extra.as_ref()), None);
    }

    #[test]
    fn pin_color_index_fallback() {
        assert_eq!(PinColor::from(0), PinColor::Red);
        assert_eq!(PinColor::from(1), PinColor::Green);
        assert_eq!(PinColor::from(2), PinColor::Purple);
        assert_eq!(PinColor::from(7), PinColor::Red);
        assert_eq!(PinColor::from(-1), PinColor::Red);
    }

    #[test]
    fn teardrop_fill_resolution_order() {
        let explicit = TeardropStyle {
            fill_color: Some("#FF0000".into()),
            fill_color_seed: Some("seed".into()),
            ..Default::default()
        };
        assert_eq!(explicit.resolve_fill(), Color::RED);

        let seeded = TeardropStyle {
            fill_color_seed: Some("seed".into()),
            ..Default::default()
        };
        assert_eq!(seeded.resolve_fill(), Color::from_seed("seed"));

        assert_eq!(TeardropStyle::default().resolve_fill(), TeardropStyle::DEFAULT_FILL);

        let malformed = TeardropStyle {
            fill_color: Some("not-a-color".into()),
            ..Default::default()
        };
        assert_eq!(malformed.resolve_fill(), TeardropStyle::DEFAULT_FILL);
    }

    #[test]
    fn bubble_text_prefers_non_empty_title() {
        let mut record = MarkerRecord::new("a", latlon!(0.0, 0.0));
        record.subtitle = Some("sub".into());
        assert_eq!(record.bubble_text(), Some("sub"));

        record.title = Some(String::new());
        assert_eq!(record.bubble_text(), Some("sub"));

        record.title = Some("title".into());
        assert_eq!(record.bubble_text(), Some("title"));
    }
}
