//! Venue domain model: the venue-type enumeration and the fixed lookup
//! tables used when enriching external place-lookup results.
//!
//! The tables are literal slices (not conditional chains) so the category
//! resolution priority order stays auditable.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Categorical venue type. Stored as the `venue_type` Postgres enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "venue_type", rename_all = "snake_case")]
pub enum VenueType {
    Park,
    Library,
    Museum,
    Playground,
    CommunityCenter,
    IndoorPlay,
    SportsFacility,
    Cafe,
    Restaurant,
    Other,
}

impl VenueType {
    pub const ALL: [VenueType; 10] = [
        VenueType::Park,
        VenueType::Library,
        VenueType::Museum,
        VenueType::Playground,
        VenueType::CommunityCenter,
        VenueType::IndoorPlay,
        VenueType::SportsFacility,
        VenueType::Cafe,
        VenueType::Restaurant,
        VenueType::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            VenueType::Park => "park",
            VenueType::Library => "library",
            VenueType::Museum => "museum",
            VenueType::Playground => "playground",
            VenueType::CommunityCenter => "community_center",
            VenueType::IndoorPlay => "indoor_play",
            VenueType::SportsFacility => "sports_facility",
            VenueType::Cafe => "cafe",
            VenueType::Restaurant => "restaurant",
            VenueType::Other => "other",
        }
    }
}

impl std::fmt::Display for VenueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for VenueType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VenueType::ALL
            .into_iter()
            .find(|vt| vt.as_str() == s)
            .ok_or_else(|| format!("unknown venue type: {s}"))
    }
}

/// Indoor/outdoor classification. Stored as the `indoor_outdoor` Postgres enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "indoor_outdoor", rename_all = "snake_case")]
pub enum IndoorOutdoor {
    Indoor,
    Outdoor,
    Both,
}

/// Inclusive age-suitability range in years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct AgeRange {
    #[validate(range(min = 0, max = 18))]
    pub min: i16,
    #[validate(range(min = 0, max = 18))]
    pub max: i16,
}

impl AgeRange {
    pub const fn new(min: i16, max: i16) -> Self {
        Self { min, max }
    }

    /// Whether this range fully covers `other` (A contains B iff
    /// A.min <= B.min and A.max >= B.max).
    ///
    /// The search filter uses containment, not overlap: a venue passes only
    /// if its range covers the entire requested range.
    pub fn contains(&self, other: &AgeRange) -> bool {
        self.min <= other.min && self.max >= other.max
    }
}

// ---------------------------------------------------------------------------
// External category mapping
// ---------------------------------------------------------------------------

/// External lookup categories queried when the local store is sparse.
///
/// The lookup service accepts only one category per call, so a fallback
/// search issues one call per entry.
pub const FAMILY_CATEGORIES: [&str; 7] = [
    "park",
    "playground",
    "library",
    "museum",
    "aquarium",
    "zoo",
    "amusement_park",
];

/// External category tag -> venue type mapping.
///
/// Resolution walks the place's category tags in order and returns the first
/// tag with an entry here; unmapped tags resolve to [`VenueType::Other`].
const CATEGORY_TO_VENUE_TYPE: &[(&str, VenueType)] = &[
    ("park", VenueType::Park),
    ("playground", VenueType::Playground),
    ("library", VenueType::Library),
    ("museum", VenueType::Museum),
    ("art_gallery", VenueType::Museum),
    ("aquarium", VenueType::Museum),
    ("zoo", VenueType::Museum),
    ("amusement_park", VenueType::IndoorPlay),
    ("bowling_alley", VenueType::SportsFacility),
    ("gym", VenueType::SportsFacility),
    ("stadium", VenueType::SportsFacility),
    ("cafe", VenueType::Cafe),
    ("restaurant", VenueType::Restaurant),
    ("community_center", VenueType::CommunityCenter),
];

/// Resolve a venue type from an external result's category tags.
///
/// First matching tag wins; a result with no mapped tag is `Other`.
pub fn venue_type_from_categories<S: AsRef<str>>(categories: &[S]) -> VenueType {
    for category in categories {
        let category = category.as_ref();
        if let Some((_, vt)) = CATEGORY_TO_VENUE_TYPE
            .iter()
            .find(|(tag, _)| *tag == category)
        {
            return *vt;
        }
    }
    VenueType::Other
}

// ---------------------------------------------------------------------------
// Per-type defaults
// ---------------------------------------------------------------------------

/// Default age-suitability range for a venue type, applied to external-only
/// results that have no curated range yet.
pub fn default_age_range(venue_type: VenueType) -> AgeRange {
    match venue_type {
        VenueType::Playground => AgeRange::new(2, 12),
        VenueType::Museum => AgeRange::new(3, 18),
        VenueType::IndoorPlay => AgeRange::new(1, 10),
        VenueType::SportsFacility => AgeRange::new(5, 18),
        VenueType::Park
        | VenueType::Library
        | VenueType::CommunityCenter
        | VenueType::Cafe
        | VenueType::Restaurant
        | VenueType::Other => AgeRange::new(0, 18),
    }
}

/// Default indoor/outdoor classification for a venue type.
pub fn default_indoor_outdoor(venue_type: VenueType) -> IndoorOutdoor {
    match venue_type {
        VenueType::Park | VenueType::Playground | VenueType::Other => IndoorOutdoor::Outdoor,
        VenueType::Library
        | VenueType::Museum
        | VenueType::IndoorPlay
        | VenueType::Cafe
        | VenueType::Restaurant => IndoorOutdoor::Indoor,
        VenueType::CommunityCenter | VenueType::SportsFacility => IndoorOutdoor::Both,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_matching_category_wins() {
        // "zoo" maps to Museum even though "cafe" appears later.
        let vt = venue_type_from_categories(&["zoo", "cafe"]);
        assert_eq!(vt, VenueType::Museum);

        // Order in the tags decides, not order in the table.
        let vt = venue_type_from_categories(&["cafe", "zoo"]);
        assert_eq!(vt, VenueType::Cafe);
    }

    #[test]
    fn unmapped_categories_skip_to_next_tag() {
        let vt = venue_type_from_categories(&["point_of_interest", "establishment", "park"]);
        assert_eq!(vt, VenueType::Park);
    }

    #[test]
    fn no_mapped_category_resolves_to_other() {
        let vt = venue_type_from_categories(&["point_of_interest", "establishment"]);
        assert_eq!(vt, VenueType::Other);
        assert_eq!(venue_type_from_categories::<&str>(&[]), VenueType::Other);
    }

    #[test]
    fn amusement_park_maps_to_indoor_play() {
        assert_eq!(
            venue_type_from_categories(&["amusement_park"]),
            VenueType::IndoorPlay
        );
    }

    #[test]
    fn default_age_ranges_are_valid() {
        for vt in [
            VenueType::Park,
            VenueType::Library,
            VenueType::Museum,
            VenueType::Playground,
            VenueType::CommunityCenter,
            VenueType::IndoorPlay,
            VenueType::SportsFacility,
            VenueType::Cafe,
            VenueType::Restaurant,
            VenueType::Other,
        ] {
            let range = default_age_range(vt);
            assert!(range.min <= range.max, "{vt:?}");
            assert!(range.min >= 0 && range.max <= 18, "{vt:?}");
        }
    }

    #[test]
    fn playground_defaults() {
        assert_eq!(default_age_range(VenueType::Playground), AgeRange::new(2, 12));
        assert_eq!(
            default_indoor_outdoor(VenueType::Playground),
            IndoorOutdoor::Outdoor
        );
    }

    #[test]
    fn age_range_containment_is_not_overlap() {
        let venue = AgeRange::new(5, 10);
        // Overlapping but not containing.
        assert!(!venue.contains(&AgeRange::new(3, 12)));
        // Fully inside.
        assert!(venue.contains(&AgeRange::new(6, 9)));
        // Equal ranges contain each other.
        assert!(venue.contains(&AgeRange::new(5, 10)));
    }
}
