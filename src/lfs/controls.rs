// The dashboard control surface: the curated option lists behind the
// selectors, and the built-in default selection.

use labour_stats::Criteria;
use serde_json::json;
use serde_json::Value as JSValue;

/// Industry selector entries: display label and the NAICS label used in the
/// extract.
pub const INDUSTRY_OPTIONS: &[(&str, &str)] = &[
    ("All Industries", "Total, all industries"),
    ("Goods-producing sector", "Goods-producing sector"),
    ("Agriculture", "Agriculture [111-112, 1100, 1151-1152]"),
    (
        "Forestry, Fishing, Mining, Quarring, Oil and Gas",
        "Forestry, fishing, mining, quarrying, oil and gas [21, 113-114, 1153, 2100]",
    ),
    (
        "Forestry, Logging and Support activities",
        "Forestry and logging and support activities for forestry [113, 1153]",
    ),
    ("Fishing, Hunting and Trapping", "Fishing, hunting and trapping [114]"),
    (
        "Mining, Quarrying, and Oil and Gas extraction",
        "Mining, quarrying, and oil and gas extraction [21, 2100]",
    ),
    ("Utilities", "Utilities [22]"),
    ("Construction", "Construction [23]"),
    ("Manufacturing", "Manufacturing [31-33]"),
    ("Durables", "Durables [321, 327, 331-339]"),
    ("Non-durables", "Non-durables [311-316, 322-326]"),
    ("Services-producing sector", "Services-producing sector"),
    ("Wholesale and retail trade", "Wholesale and retail trade [41, 44-45]"),
    ("Wholesale trade", "Wholesale trade [41]"),
    ("Retail trade", "Retail trade [44-45]"),
    (
        "Transportation and warehousing",
        "Transportation and warehousing [48-49]",
    ),
    (
        "Professional, scientific and technical services",
        "Professional, scientific and technical services [54]",
    ),
    (
        "Finance, insurance, real estate, rental and leasing",
        "Finance, insurance, real estate, rental and leasing [52, 53]",
    ),
    ("Finance and insurance", "Finance and insurance [52]"),
    (
        "Real estate and rental and leasing",
        "Real estate and rental and leasing [53]",
    ),
    (
        "Business, building and other support services",
        "Business, building and other support services [55, 56]",
    ),
    ("Educational services", "Educational services [61]"),
    (
        "Health care and social assistance",
        "Health care and social assistance [62]",
    ),
    (
        "Information, culture and recreation",
        "Information, culture and recreation [51, 71]",
    ),
    (
        "Accommodation and food services",
        "Accommodation and food services [72]",
    ),
    (
        "Other services (except public administration)",
        "Other services (except public administration) [81]",
    ),
    ("Public administration", "Public administration [91]"),
    ("Unclassified industries", "Unclassified industries"),
];

/// The 10 provinces covered by the extract.
pub const PROVINCES: &[&str] = &[
    "Alberta",
    "Newfoundland and Labrador",
    "Prince Edward Island",
    "Nova Scotia",
    "New Brunswick",
    "Quebec",
    "Ontario",
    "Manitoba",
    "Saskatchewan",
    "British Columbia",
];

/// Labour force characteristic entries: display label and extract label.
pub const LABOUR_STATUS_OPTIONS: &[(&str, &str)] = &[
    ("Unemployed", "Unemployment"),
    ("Part-time employment", "Part-time employment"),
    ("Full-time employment", "Full-time employment"),
];

/// Year range of the extract.
pub const YEAR_MIN: i32 = 1976;
pub const YEAR_MAX: i32 = 2021;

/// Tick marks of the year slider.
pub const YEAR_MARKS: &[i32] = &[
    1976, 1980, 1985, 1990, 1995, 2000, 2005, 2010, 2015, 2020,
];

/// The selection shown when neither the command line nor the configuration
/// file picks one.
pub fn default_criteria() -> Criteria {
    Criteria {
        year: 2020,
        age_group: "25 to 54 years".to_string(),
        industry: "Total, all industries".to_string(),
        province: "Alberta".to_string(),
        labour_status: "Full-time employment".to_string(),
    }
}

/// The control surface as embedded in the summary output. The age groups
/// are the ones discovered in the loaded table; everything else is the
/// curated lists above.
pub fn controls_js(age_groups: &[String]) -> JSValue {
    let industries: Vec<JSValue> = INDUSTRY_OPTIONS
        .iter()
        .map(|(label, value)| json!({"label": label, "value": value}))
        .collect();
    let provinces: Vec<JSValue> = PROVINCES
        .iter()
        .map(|p| json!({"label": p, "value": p}))
        .collect();
    let labour_status: Vec<JSValue> = LABOUR_STATUS_OPTIONS
        .iter()
        .map(|(label, value)| json!({"label": label, "value": value}))
        .collect();
    json!({
        "industries": industries,
        "provinces": provinces,
        "labourStatus": labour_status,
        "ageGroups": age_groups,
        "yearSlider": {
            "min": YEAR_MIN,
            "max": YEAR_MAX,
            "step": 1,
            "marks": YEAR_MARKS,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_lists_are_consistent() {
        assert_eq!(PROVINCES.len(), 10);

        // Every option value is distinct; a duplicate would make two
        // selector entries indistinguishable to the query.
        let mut values: Vec<&str> = INDUSTRY_OPTIONS.iter().map(|(_, v)| *v).collect();
        values.sort_unstable();
        values.dedup();
        assert_eq!(values.len(), INDUSTRY_OPTIONS.len());
    }

    #[test]
    fn default_selection_is_listed_in_the_controls() {
        let defaults = default_criteria();
        assert!(INDUSTRY_OPTIONS.iter().any(|(_, v)| *v == defaults.industry));
        assert!(PROVINCES.contains(&defaults.province.as_str()));
        assert!(LABOUR_STATUS_OPTIONS
            .iter()
            .any(|(_, v)| *v == defaults.labour_status));
        assert!(defaults.year >= YEAR_MIN && defaults.year <= YEAR_MAX);
    }
}
