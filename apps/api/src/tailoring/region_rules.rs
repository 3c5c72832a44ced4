//! Region formatting rules: a pure, total lookup from region to page and style guidance.

use serde::Serialize;

use crate::models::job::Region;

/// Formatting guidance passed verbatim to the generation prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionRules {
    pub pages: u8,
    pub style: &'static str,
    pub date_format: &'static str,
}

const DATE_FORMAT: &str = "YYYY-MM";

/// Resolves the rules for a region. Unrecognized regions get the default
/// two-page rule set; this never fails.
pub fn region_rules(region: &Region) -> RegionRules {
    match region {
        Region::Us => RegionRules {
            pages: 1,
            style: "no photo; concise; one-page",
            date_format: DATE_FORMAT,
        },
        Region::Eu => RegionRules {
            pages: 2,
            style: "two-page allowed; simple",
            date_format: DATE_FORMAT,
        },
        Region::Gl => RegionRules {
            pages: 1,
            style: "one-page allowed; simple",
            date_format: DATE_FORMAT,
        },
        Region::Other(_) => RegionRules {
            pages: 2,
            style: "no photo; refs on request ok",
            date_format: DATE_FORMAT,
        },
    }
}
