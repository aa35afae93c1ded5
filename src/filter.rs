//! Filtering & ranking engine for accessibility records.
//!
//! A query is a [`FilterCriteria`]: every dimension is optional and an
//! absent dimension matches everything. Matching records are annotated
//! with a great-circle distance when the query carries a location, then
//! sorted ascending with distance-less records last.
//!
//! Feature matching is deliberately permissive: ANY keyword of a requested
//! user type, or any universal common keyword, is enough. The data surfaces
//! "possibly accessible" places rather than strictly verified ones.

use std::cmp::Ordering;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::Error;
use crate::geo::{haversine_km, round2};
use crate::model::AccessibilityRecord;

/// Facilities considered relevant for every user type.
pub const COMMON_FEATURES: &[&str] = &[
    "보장구 대여",
    "안내데스크",
    "장애인 화장실",
    "장애인 객실",
    "주차장",
    "키오스크 접근 가능",
];

/// Place category. Each variant maps to the stable code stored in the
/// spreadsheet's category column, distinct from the variant name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Tour,
    Accommodation,
    Restaurant,
}

impl Category {
    /// The external code stored in record data. Comparison is exact
    /// equality against this value, never against the variant name.
    pub fn code(&self) -> &'static str {
        match self {
            Category::Tour => "관광",
            Category::Accommodation => "숙박",
            Category::Restaurant => "음식점",
        }
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TOUR" => Ok(Category::Tour),
            "ACCOMMODATION" => Ok(Category::Accommodation),
            "RESTAURANT" => Ok(Category::Restaurant),
            other => Err(Error::InvalidInput(format!("unknown category: {other}"))),
        }
    }
}

/// User type a query filters for. Each maps to a fixed set of feature
/// keywords searched across the record's hints and barrier-free slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserType {
    MobilityImpaired,
    VisuallyImpaired,
    HearingImpaired,
    InfantAccompanied,
}

impl UserType {
    /// Feature keywords specific to this user type.
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            UserType::MobilityImpaired => &[
                "단독접근가능",
                "도움필요",
                "단차",
                "경사로",
                "테이블 비치",
                "매표소 접근 가능",
                "장애인 리프트",
                "승강기",
                "장애인 관람석",
                "장애인 전용 주차구역",
                "전동휠체어 급속충전기",
            ],
            UserType::VisuallyImpaired => &[
                "점자블록",
                "점자안내판",
                "안내견 출입 가능",
                "점자책 대여",
                "음성안내해설",
            ],
            UserType::HearingImpaired => &["수어안내해설"],
            UserType::InfantAccompanied => &["아기의자", "수유실", "유아차 대여", "가족화장실"],
        }
    }
}

impl FromStr for UserType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MOBILITY_IMPAIRED" => Ok(UserType::MobilityImpaired),
            "VISUALLY_IMPAIRED" => Ok(UserType::VisuallyImpaired),
            "HEARING_IMPAIRED" => Ok(UserType::HearingImpaired),
            "INFANT_ACCOMPANIED" => Ok(UserType::InfantAccompanied),
            other => Err(Error::InvalidInput(format!("unknown user type: {other}"))),
        }
    }
}

/// The optional filter dimensions supplied by a query.
///
/// Empty vectors and `None` fields mean "do not filter on this dimension",
/// not "match nothing".
#[derive(Debug, Clone, Default)]
pub struct FilterCriteria {
    pub categories: Vec<Category>,
    pub user_types: Vec<UserType>,
    pub title: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub radius: Option<f64>,
}

/// Apply the full criteria to a record set and produce the ranked result.
///
/// 1. Keep records passing category AND features AND title AND location.
/// 2. When the criteria carries both lat and lon, attach a rounded distance
///    to every survivor with parsable coordinates.
/// 3. Sort ascending by distance, records without one last.
pub fn apply_filter(
    records: Vec<AccessibilityRecord>,
    criteria: &FilterCriteria,
) -> Vec<AccessibilityRecord> {
    let mut matched: Vec<AccessibilityRecord> = records
        .into_iter()
        .filter(|record| {
            matches_categories(record, &criteria.categories)
                && matches_features(record, &criteria.user_types)
                && matches_title(record, criteria.title.as_deref())
                && matches_location(record, criteria.lat, criteria.lon, criteria.radius)
        })
        .collect();

    if let (Some(lat), Some(lon)) = (criteria.lat, criteria.lon) {
        for record in &mut matched {
            record.distance = record
                .coordinates()
                .map(|(rlat, rlon)| round2(haversine_km(rlat, rlon, lat, lon)));
        }
    }

    sort_by_distance(&mut matched);
    matched
}

/// Ascending by attached distance; records without one sort last. Relative
/// order among equal or missing distances is not part of the contract.
pub fn sort_by_distance(records: &mut [AccessibilityRecord]) {
    records.sort_by(|a, b| match (a.distance, b.distance) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

/// Category predicate: empty set passes, otherwise exact equality of the
/// record's category against any requested category's mapped code.
pub fn matches_categories(record: &AccessibilityRecord, categories: &[Category]) -> bool {
    if categories.is_empty() {
        return true;
    }
    categories.iter().any(|c| record.category == c.code())
}

/// Feature predicate: ANY requested user type satisfied, where a type is
/// satisfied by one of its specific keywords or one of the common keywords.
pub fn matches_features(record: &AccessibilityRecord, user_types: &[UserType]) -> bool {
    if user_types.is_empty() {
        return true;
    }
    user_types.iter().any(|user_type| {
        let specific = user_type.keywords().iter().any(|kw| record.has_feature(kw));
        let common = COMMON_FEATURES.iter().any(|kw| record.has_feature(kw));
        specific || common
    })
}

/// Title predicate: case-insensitive substring containment, criteria text
/// trimmed of surrounding whitespace.
pub fn matches_title(record: &AccessibilityRecord, title: Option<&str>) -> bool {
    let Some(title) = title else {
        return true;
    };
    let needle = title.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    record.title.to_lowercase().contains(&needle)
}

/// Location predicate: passes when no geo triple is supplied; fails for
/// records without parsable coordinates; otherwise inclusive radius test.
pub fn matches_location(
    record: &AccessibilityRecord,
    lat: Option<f64>,
    lon: Option<f64>,
    radius: Option<f64>,
) -> bool {
    let (Some(lat), Some(lon), Some(radius)) = (lat, lon, radius) else {
        return true;
    };
    match record.coordinates() {
        Some((rlat, rlon)) => haversine_km(rlat, rlon, lat, lon) <= radius,
        None => false,
    }
}

/// Linear scan for exact id equality.
pub fn find_by_id(records: &[AccessibilityRecord], id: &str) -> Option<AccessibilityRecord> {
    records.iter().find(|r| r.id == id).cloned()
}

/// Linear scan for exact mapped-code equality. A legacy variant of the data
/// layer matched categories by substring containment; exact match is the
/// normative behavior here.
pub fn find_by_category(
    records: &[AccessibilityRecord],
    category: Category,
) -> Vec<AccessibilityRecord> {
    records
        .iter()
        .filter(|r| r.category == category.code())
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::haversine_km;

    fn record(id: &str, lat: &str, lon: &str, category: &str) -> AccessibilityRecord {
        AccessibilityRecord {
            id: id.to_string(),
            lat: lat.to_string(),
            lon: lon.to_string(),
            category: category.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_criteria_is_identity() {
        let records = vec![record("1", "33.450", "126.560", "관광")];
        let result = apply_filter(records, &FilterCriteria::default());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "1");
        assert!(result[0].distance.is_none(), "no location, no distance");
    }

    #[test]
    fn test_category_filter() {
        // End-to-end example: two records, only the tour one survives
        let records = vec![
            record("1", "33.450", "126.560", "관광"),
            record("2", "", "", "음식점"),
        ];
        let criteria = FilterCriteria {
            categories: vec![Category::Tour],
            ..Default::default()
        };
        let result = apply_filter(records, &criteria);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "1");
    }

    #[test]
    fn test_category_match_is_exact_on_code() {
        let rec = record("1", "", "", "관광지"); // contains the code but is not equal
        assert!(!matches_categories(&rec, &[Category::Tour]));
        let rec = record("2", "", "", "관광");
        assert!(matches_categories(&rec, &[Category::Tour]));
    }

    #[test]
    fn test_radius_query_excludes_unparsable_coordinates() {
        let records = vec![
            record("1", "33.450", "126.560", "관광"),
            record("2", "", "", "음식점"),
        ];
        let criteria = FilterCriteria {
            lat: Some(33.450),
            lon: Some(126.560),
            radius: Some(0.1),
            ..Default::default()
        };
        let result = apply_filter(records, &criteria);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "1");
        assert_eq!(result[0].distance, Some(0.0));
    }

    #[test]
    fn test_radius_boundary_is_inclusive() {
        let rec = record("1", "33.500", "126.560", "관광");
        let exact = haversine_km(33.500, 126.560, 33.450, 126.560);
        assert!(matches_location(
            &rec,
            Some(33.450),
            Some(126.560),
            Some(exact)
        ));
        assert!(!matches_location(
            &rec,
            Some(33.450),
            Some(126.560),
            Some(exact - 1e-9)
        ));
    }

    #[test]
    fn test_location_predicate_passes_when_absent() {
        let rec = record("1", "", "", "관광");
        assert!(matches_location(&rec, None, None, None));
    }

    #[test]
    fn test_title_match_case_insensitive_and_trimmed() {
        let mut rec = record("1", "", "", "관광");
        rec.title = "City Museum".to_string();
        assert!(matches_title(&rec, Some("Museum ")));
        assert!(matches_title(&rec, Some("museum")));
        assert!(matches_title(&rec, Some("  CITY  ")));
        assert!(!matches_title(&rec, Some("aquarium")));
        assert!(matches_title(&rec, None));
        assert!(matches_title(&rec, Some("   ")), "blank title matches all");
    }

    #[test]
    fn test_feature_match_from_hints_only() {
        // Tactile paving keyword in hints, no slot data at all
        let mut rec = record("1", "", "", "관광");
        rec.hints = "입구에 점자블록 설치".to_string();
        assert!(matches_features(&rec, &[UserType::VisuallyImpaired]));
        assert!(!matches_features(&rec, &[UserType::HearingImpaired]));
    }

    #[test]
    fn test_feature_match_common_keyword_satisfies_any_type() {
        let mut rec = record("1", "", "", "관광");
        rec.barrier_free[3] = "장애인 화장실".to_string();
        // Common facility satisfies every requested user type
        assert!(matches_features(&rec, &[UserType::HearingImpaired]));
        assert!(matches_features(&rec, &[UserType::InfantAccompanied]));
    }

    #[test]
    fn test_feature_match_any_of_requested_types() {
        let mut rec = record("1", "", "", "관광");
        rec.barrier_free[0] = "수어안내해설".to_string();
        // One satisfied type is enough even when another fails
        assert!(matches_features(
            &rec,
            &[UserType::VisuallyImpaired, UserType::HearingImpaired]
        ));
    }

    #[test]
    fn test_distance_attached_and_sorted_nulls_last() {
        let records = vec![
            record("far", "33.550", "126.560", "관광"),
            record("no-coords", "", "", "관광"),
            record("near", "33.451", "126.560", "관광"),
        ];
        let criteria = FilterCriteria {
            lat: Some(33.450),
            lon: Some(126.560),
            ..Default::default()
        };
        let result = apply_filter(records, &criteria);
        assert_eq!(result.len(), 3, "no radius means no exclusion");

        assert_eq!(result[0].id, "near");
        assert_eq!(result[1].id, "far");
        assert_eq!(result[2].id, "no-coords");
        assert!(result[0].distance.unwrap() <= result[1].distance.unwrap());
        assert!(result[2].distance.is_none());
    }

    #[test]
    fn test_attached_distance_is_rounded() {
        let records = vec![record("1", "33.4996", "126.5312", "관광")];
        let criteria = FilterCriteria {
            lat: Some(33.2541),
            lon: Some(126.5601),
            ..Default::default()
        };
        let result = apply_filter(records, &criteria);
        let d = result[0].distance.unwrap();
        assert_eq!(d, round2(d), "attached distance carries 2 decimals");
    }

    #[test]
    fn test_find_by_id() {
        let records = vec![record("1", "", "", "관광"), record("2", "", "", "숙박")];
        assert_eq!(find_by_id(&records, "2").map(|r| r.id), Some("2".into()));
        assert!(find_by_id(&records, "3").is_none());
    }

    #[test]
    fn test_find_by_category() {
        let records = vec![
            record("1", "", "", "관광"),
            record("2", "", "", "숙박"),
            record("3", "", "", "관광"),
        ];
        let tours = find_by_category(&records, Category::Tour);
        assert_eq!(tours.len(), 2);
        assert!(tours.iter().all(|r| r.category == "관광"));
    }

    #[test]
    fn test_enum_parsing() {
        assert_eq!("tour".parse::<Category>().unwrap(), Category::Tour);
        assert_eq!(
            "ACCOMMODATION".parse::<Category>().unwrap(),
            Category::Accommodation
        );
        assert!("lodging".parse::<Category>().is_err());

        assert_eq!(
            "visually_impaired".parse::<UserType>().unwrap(),
            UserType::VisuallyImpaired
        );
        assert!("robot".parse::<UserType>().is_err());
    }
}
