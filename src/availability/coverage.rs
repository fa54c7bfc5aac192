//! Coverage dataset.
//!
//! The network footprint changes a few times a year and is small enough to
//! ship as a compiled-in table. Streets are matched after normalization, so
//! "Main St" and "Main Street" hit the same record.

use super::Availability;

/// One street segment in the coverage table.
struct CoverageRecord {
    street: &'static str,
    zip: &'static str,
    status: Availability,
}

/// Streets with live fiber, and streets on the published build-out plan.
const COVERAGE: &[CoverageRecord] = &[
    CoverageRecord {
        street: "main street",
        zip: "29115",
        status: Availability::InService,
    },
    CoverageRecord {
        street: "russell street",
        zip: "29115",
        status: Availability::InService,
    },
    CoverageRecord {
        street: "college avenue",
        zip: "29115",
        status: Availability::InService,
    },
    CoverageRecord {
        street: "oak avenue",
        zip: "29118",
        status: Availability::InService,
    },
    CoverageRecord {
        street: "amelia street",
        zip: "29115",
        status: Availability::InService,
    },
    CoverageRecord {
        street: "future lane",
        zip: "29115",
        status: Availability::FutureService,
    },
    CoverageRecord {
        street: "meadowfield drive",
        zip: "29118",
        status: Availability::FutureService,
    },
    CoverageRecord {
        street: "belleville road",
        zip: "29115",
        status: Availability::FutureService,
    },
];

/// Normalize a street name for lookup: lowercase, collapse whitespace, and
/// expand the common suffix abbreviations.
pub fn normalize_street(street: &str) -> String {
    let lowered = street.to_lowercase();
    let mut words: Vec<String> = lowered.split_whitespace().map(String::from).collect();

    if let Some(last) = words.last_mut() {
        let expanded = match last.trim_end_matches('.') {
            "st" => "street",
            "ave" | "av" => "avenue",
            "ln" => "lane",
            "dr" => "drive",
            "rd" => "road",
            "blvd" => "boulevard",
            "ct" => "court",
            other => other,
        };
        *last = expanded.to_string();
    }

    words.join(" ")
}

/// Look a street + zip up in the coverage table.
pub fn lookup(street: &str, zip: &str) -> Availability {
    let normalized = normalize_street(street);
    COVERAGE
        .iter()
        .find(|r| r.street == normalized && r.zip == zip)
        .map(|r| r.status)
        .unwrap_or(Availability::NoMatch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_expands_suffixes() {
        assert_eq!(normalize_street("Main St"), "main street");
        assert_eq!(normalize_street("Oak Ave."), "oak avenue");
        assert_eq!(normalize_street("Future Ln"), "future lane");
        assert_eq!(normalize_street("Belleville Rd"), "belleville road");
    }

    #[test]
    fn normalize_collapses_whitespace() {
        assert_eq!(normalize_street("  Main   Street "), "main street");
    }

    #[test]
    fn lookup_finds_in_service_street() {
        assert_eq!(lookup("Main Street", "29115"), Availability::InService);
        assert_eq!(lookup("main st", "29115"), Availability::InService);
    }

    #[test]
    fn lookup_finds_future_service_street() {
        assert_eq!(lookup("Future Lane", "29115"), Availability::FutureService);
    }

    #[test]
    fn wrong_zip_is_no_match() {
        assert_eq!(lookup("Main Street", "29201"), Availability::NoMatch);
    }

    #[test]
    fn unknown_street_is_no_match() {
        assert_eq!(lookup("Elm Street", "29115"), Availability::NoMatch);
    }
}
