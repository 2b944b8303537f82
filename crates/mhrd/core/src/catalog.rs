//! Fixed enumerations the dataset is built from.

use serde::{Deserialize, Serialize};

/// Reporting years, oldest first.
pub const YEARS: [i32; 3] = [2023, 2024, 2025];

/// Year the growth factors are measured from.
pub const BASE_YEAR: i32 = YEARS[0];

/// Year used when a request does not name one.
pub const LATEST_YEAR: i32 = YEARS[YEARS.len() - 1];

pub const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

pub const SCHEMES: [&str; 13] = [
    "Samagra Shiksha",
    "PM SHRI Schools",
    "PM POSHAN (Mid-Day Meal)",
    "PM eVIDYA",
    "SWAYAM",
    "DIKSHA (Digital Infrastructure)",
    "NISHTHA Teacher Training",
    "National Means-cum-Merit Scholarship",
    "Rashtriya Uchchatar Shiksha Abhiyan (RUSA)",
    "GIAN",
    "IMPRINT",
    "Unnat Bharat Abhiyan",
    "National Apprenticeship Training Scheme (NATS)",
];

pub const CATEGORIES: [&str; 5] = [
    "Infrastructure",
    "Digital Learning",
    "Scholarships",
    "Teacher Training",
    "Skill Development",
];

/// Category whose scholarship counts are drawn from the wider range.
pub const SCHOLARSHIP_CATEGORY: &str = "Scholarships";

/// States followed by union territories.
pub const STATES: [&str; 36] = [
    "Andhra Pradesh",
    "Arunachal Pradesh",
    "Assam",
    "Bihar",
    "Chhattisgarh",
    "Goa",
    "Gujarat",
    "Haryana",
    "Himachal Pradesh",
    "Jharkhand",
    "Karnataka",
    "Kerala",
    "Madhya Pradesh",
    "Maharashtra",
    "Manipur",
    "Meghalaya",
    "Mizoram",
    "Nagaland",
    "Odisha",
    "Punjab",
    "Rajasthan",
    "Sikkim",
    "Tamil Nadu",
    "Telangana",
    "Tripura",
    "Uttar Pradesh",
    "Uttarakhand",
    "West Bengal",
    "Andaman and Nicobar Islands",
    "Chandigarh",
    "Dadra and Nagar Haveli and Daman and Diu",
    "Delhi",
    "Jammu and Kashmir",
    "Ladakh",
    "Lakshadweep",
    "Puducherry",
];

/// Map coordinates for a state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

const fn at(lat: f64, lng: f64) -> Coordinates {
    Coordinates { lat, lng }
}

pub const STATE_COORDINATES: [(&str, Coordinates); 36] = [
    ("Andhra Pradesh", at(15.9129, 79.7400)),
    ("Arunachal Pradesh", at(28.2180, 94.7278)),
    ("Assam", at(26.2006, 92.9376)),
    ("Bihar", at(25.0961, 85.3131)),
    ("Chhattisgarh", at(21.2787, 81.8661)),
    ("Goa", at(15.2993, 74.1240)),
    ("Gujarat", at(22.2587, 71.1924)),
    ("Haryana", at(29.0588, 76.0856)),
    ("Himachal Pradesh", at(31.1048, 77.1734)),
    ("Jharkhand", at(23.6102, 85.2799)),
    ("Karnataka", at(15.3173, 75.7139)),
    ("Kerala", at(10.8505, 76.2711)),
    ("Madhya Pradesh", at(22.9734, 78.6569)),
    ("Maharashtra", at(19.7515, 75.7139)),
    ("Manipur", at(24.6637, 93.9063)),
    ("Meghalaya", at(25.4670, 91.3662)),
    ("Mizoram", at(23.1645, 92.9376)),
    ("Nagaland", at(26.1584, 94.5624)),
    ("Odisha", at(20.9517, 85.0985)),
    ("Punjab", at(31.1471, 75.3412)),
    ("Rajasthan", at(27.0238, 74.2179)),
    ("Sikkim", at(27.5330, 88.5122)),
    ("Tamil Nadu", at(11.1271, 78.6569)),
    ("Telangana", at(18.1124, 79.0193)),
    ("Tripura", at(23.9408, 91.9882)),
    ("Uttar Pradesh", at(26.8467, 80.9462)),
    ("Uttarakhand", at(30.0668, 79.0193)),
    ("West Bengal", at(22.9868, 87.8550)),
    ("Andaman and Nicobar Islands", at(11.7401, 92.6586)),
    ("Chandigarh", at(30.7333, 76.7794)),
    ("Dadra and Nagar Haveli and Daman and Diu", at(20.3974, 72.8328)),
    ("Delhi", at(28.7041, 77.1025)),
    ("Jammu and Kashmir", at(33.7782, 76.5762)),
    ("Ladakh", at(34.2268, 77.5619)),
    ("Lakshadweep", at(10.5667, 72.6417)),
    ("Puducherry", at(11.9416, 79.8083)),
];

pub const SCHEME_CATEGORY_HINTS: [(&str, &str); 13] = [
    ("Samagra Shiksha", "Infrastructure"),
    ("PM SHRI Schools", "Infrastructure"),
    ("PM POSHAN (Mid-Day Meal)", "Skill Development"),
    ("PM eVIDYA", "Digital Learning"),
    ("SWAYAM", "Digital Learning"),
    ("DIKSHA (Digital Infrastructure)", "Digital Learning"),
    ("NISHTHA Teacher Training", "Teacher Training"),
    ("National Means-cum-Merit Scholarship", "Scholarships"),
    ("Rashtriya Uchchatar Shiksha Abhiyan (RUSA)", "Infrastructure"),
    ("GIAN", "Skill Development"),
    ("IMPRINT", "Skill Development"),
    ("Unnat Bharat Abhiyan", "Skill Development"),
    ("National Apprenticeship Training Scheme (NATS)", "Skill Development"),
];

pub const STATUSES: [&str; 4] = ["On Track", "Completed", "Delayed", "At Risk"];

/// Draw weights, index-aligned with [`STATUSES`].
pub const STATUS_WEIGHTS: [u32; 4] = [50, 20, 20, 10];

/// States the scholarship-beneficiary series is published for.
pub const SCHOLARSHIP_STATE_WEIGHTS: [(&str, f64); 6] = [
    ("Karnataka", 1.0),
    ("Tamil Nadu", 1.2),
    ("Maharashtra", 1.5),
    ("Delhi", 0.6),
    ("Uttar Pradesh", 1.8),
    ("West Bengal", 0.9),
];

pub fn coordinates_for(state: &str) -> Option<Coordinates> {
    STATE_COORDINATES
        .iter()
        .find(|(name, _)| *name == state)
        .map(|(_, coords)| *coords)
}

pub fn scheme_category_hint(scheme: &str) -> Option<&'static str> {
    SCHEME_CATEGORY_HINTS
        .iter()
        .find(|(name, _)| *name == scheme)
        .map(|(_, category)| *category)
}

/// Resolve a state slug to its catalog name.
pub fn state_by_slug(slug: &str) -> Option<&'static str> {
    STATES.iter().copied().find(|name| slugify(name) == slug)
}

/// Resolve a scheme slug to its catalog name.
pub fn scheme_by_slug(slug: &str) -> Option<&'static str> {
    SCHEMES.iter().copied().find(|name| slugify(name) == slug)
}

/// Sorted copy of a catalog list.
pub fn sorted(names: &[&str]) -> Vec<String> {
    let mut out: Vec<String> = names.iter().map(|s| s.to_string()).collect();
    out.sort();
    out.dedup();
    out
}

/// URL slug for a display name.
///
/// Keeps ASCII letters, digits, underscores and hyphens, lowercases them,
/// collapses whitespace and hyphen runs into a single `-` and trims leading
/// and trailing `-`/`_`. Any other character is dropped.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;

    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() || ch == '_' {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else if ch == '-' || ch.is_whitespace() {
            pending_dash = true;
        }
    }

    slug.trim_matches(|c| c == '-' || c == '_').to_string()
}
