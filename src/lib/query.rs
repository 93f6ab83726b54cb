use super::region::Region;
use regex::Regex;
use std::sync::OnceLock;

/// NSW cadastre lot layer.
pub const NSW_PARCEL_URL: &str =
    "https://maps.six.nsw.gov.au/arcgis/rest/services/public/NSW_Cadastre/MapServer/9/query";

/// QLD land parcel property framework layer.
pub const QLD_PARCEL_URL: &str = "https://spatial-gis.information.qld.gov.au/arcgis/rest/services/PlanningCadastre/LandParcelPropertyFramework/MapServer/4/query";

/// A parcel lookup derived from what a user typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParcelQuery {
    pub region: Region,
    pub lot: String,
    pub section: Option<String>,
    pub plan: String,
}

fn lot_plan_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // lot digits followed by a plan like RP123456, SP789 or CP1234
    PATTERN.get_or_init(|| Regex::new(r"^(\d+)([A-Z]{1,3}[0-9]+)$").unwrap())
}

/// Parses a lot/plan reference.
///
/// NSW references are slash separated, `43/DP12345` or, with a section,
/// `43/1/DP12345`. QLD references are written as one word, `3RP123456`.
/// Input is trimmed and uppercased first.
///
/// # Example
///
/// ```
/// use parcel_export::query::parse_user_input;
/// use parcel_export::Region;
///
/// let query = parse_user_input(" 43/1/dp12345 ").unwrap();
/// assert_eq!(query.region, Region::Nsw);
/// assert_eq!(query.section.as_deref(), Some("1"));
/// assert!(parse_user_input("lot 3").is_none());
/// ```
pub fn parse_user_input(input: &str) -> Option<ParcelQuery> {
    let input = input.trim().to_uppercase();
    if input.is_empty() {
        return None;
    }

    if input.contains('/') {
        let parts: Vec<&str> = input.split('/').map(str::trim).collect();
        let (lot, section, plan) = match parts.as_slice() {
            [lot, section, plan] => (lot, Some(section.to_string()), plan),
            [lot, plan] => (lot, None, plan),
            _ => return None,
        };
        return Some(ParcelQuery {
            region: Region::Nsw,
            lot: lot.to_string(),
            section,
            plan: plan.to_string(),
        });
    }

    let captures = lot_plan_pattern().captures(&input)?;
    Some(ParcelQuery {
        region: Region::Qld,
        lot: captures[1].to_string(),
        section: None,
        plan: captures[2].to_string(),
    })
}

impl ParcelQuery {
    pub fn service_url(&self) -> &'static str {
        match self.region {
            Region::Nsw => NSW_PARCEL_URL,
            Region::Qld => QLD_PARCEL_URL,
        }
    }

    /// The `where` expression selecting this parcel on the region's layer.
    ///
    /// The NSW layer filters on the numeric part of the plan label.
    pub fn where_clause(&self) -> String {
        match self.region {
            Region::Nsw => {
                let plan_number: String = self.plan.chars().filter(char::is_ascii_digit).collect();
                let plan_number = plan_number.trim_start_matches('0');
                let plan_number = if plan_number.is_empty() { "0" } else { plan_number };
                let section = match self.section.as_deref() {
                    Some(section) if !section.is_empty() => {
                        format!("sectionnumber='{}'", quote(section))
                    }
                    _ => "(sectionnumber IS NULL OR sectionnumber='')".to_string(),
                };
                format!(
                    "lotnumber='{}' AND plannumber={} AND {}",
                    quote(&self.lot),
                    plan_number,
                    section
                )
            }
            Region::Qld => format!(
                "lot='{}' AND plan='{}'",
                quote(&self.lot),
                quote(&self.plan)
            ),
        }
    }

    /// Query string parameters asking the layer for WGS84 GeoJSON.
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("where", self.where_clause()),
            ("outFields", "*".to_string()),
            ("outSR", "4326".to_string()),
            ("f", "geoJSON".to_string()),
        ]
    }
}

// SQL string literals escape quotes by doubling them
fn quote(value: &str) -> String {
    value.replace('\'', "''")
}

#[cfg(test)]
mod parse_user_input {
    use super::*;

    fn query(region: Region, lot: &str, section: Option<&str>, plan: &str) -> ParcelQuery {
        ParcelQuery {
            region,
            lot: lot.into(),
            section: section.map(String::from),
            plan: plan.into(),
        }
    }

    #[test]
    fn nsw_lot_plan() {
        assert_eq!(
            parse_user_input("43/DP12345"),
            Some(query(Region::Nsw, "43", None, "DP12345"))
        );
    }

    #[test]
    fn nsw_lot_section_plan() {
        assert_eq!(
            parse_user_input(" 43 / 1 / dp12345"),
            Some(query(Region::Nsw, "43", Some("1"), "DP12345"))
        );
    }

    #[test]
    fn qld_lot_plan() {
        assert_eq!(
            parse_user_input("3rp123456"),
            Some(query(Region::Qld, "3", None, "RP123456"))
        );
        assert_eq!(
            parse_user_input("101CP1234"),
            Some(query(Region::Qld, "101", None, "CP1234"))
        );
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_user_input(""), None);
        assert_eq!(parse_user_input("   "), None);
        assert_eq!(parse_user_input("1/2/3/4"), None);
        assert_eq!(parse_user_input("RP123456"), None);
        assert_eq!(parse_user_input("3ABCD1"), None);
    }
}
