//! Record model for barrier-free places.
//!
//! One `AccessibilityRecord` is one row of the backing spreadsheet. Apart
//! from the transient `distance` annotation a record is immutable once
//! converted from its row.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Number of ordered barrier-free attribute slots per record.
pub const BARRIER_FREE_SLOTS: usize = 16;

/// One accessibility/facility entry with location, category and free-text
/// accessibility hints.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct AccessibilityRecord {
    /// Unique record id
    pub id: String,
    /// Place name
    pub title: String,
    pub description: String,
    pub address: String,
    pub phone: String,
    /// Opening hours, free text
    pub schedule: String,
    pub thumbnails: String,
    pub thumb: String,
    /// Latitude as spreadsheet text; parsed on demand, may be empty or junk
    pub lat: String,
    /// Longitude as spreadsheet text; parsed on demand, may be empty or junk
    pub lon: String,
    /// Free-text accessibility notes, searched by keyword containment
    pub hints: String,
    /// Category code (mapped value, e.g. "관광"), compared exactly
    pub category: String,
    /// Ordered barrier-free attribute slots, searched by keyword containment
    pub barrier_free: [String; BARRIER_FREE_SLOTS],
    pub slope: String,
    pub slope_scale: String,
    pub elevator: String,
    pub toilet: String,
    pub parking: String,
    pub table: String,
    /// Overall evaluation score, free text
    pub total: String,
    /// Accessibility evaluation, free text
    pub accessibility: String,
    /// Distance in km from the query point, attached only by location-aware
    /// queries and rounded to two decimals. Never intrinsic to the record.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
}

impl AccessibilityRecord {
    /// Parse the textual lat/lon fields.
    ///
    /// Returns `None` when either field is empty or not a number; such
    /// records never satisfy a location predicate and never receive a
    /// distance value.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        let lat = self.lat.trim().parse::<f64>().ok()?;
        let lon = self.lon.trim().parse::<f64>().ok()?;
        Some((lat, lon))
    }

    /// Substring search for a feature keyword across `hints` and all
    /// barrier-free slots.
    pub fn has_feature(&self, keyword: &str) -> bool {
        if self.hints.contains(keyword) {
            return true;
        }
        self.barrier_free.iter().any(|slot| slot.contains(keyword))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinates_parsing() {
        let mut record = AccessibilityRecord {
            lat: "33.450".to_string(),
            lon: "126.560".to_string(),
            ..Default::default()
        };
        assert_eq!(record.coordinates(), Some((33.450, 126.560)));

        // Surrounding whitespace is tolerated
        record.lat = " 33.450 ".to_string();
        assert_eq!(record.coordinates(), Some((33.450, 126.560)));

        // Empty or junk coordinates parse to None
        record.lat = String::new();
        assert_eq!(record.coordinates(), None);
        record.lat = "not-a-number".to_string();
        assert_eq!(record.coordinates(), None);
    }

    #[test]
    fn test_has_feature_in_hints_and_slots() {
        let mut record = AccessibilityRecord {
            hints: "점자블록 있음".to_string(),
            ..Default::default()
        };
        assert!(record.has_feature("점자블록"));
        assert!(!record.has_feature("승강기"));

        record.barrier_free[15] = "승강기 보유".to_string();
        assert!(record.has_feature("승강기"));
    }
}
