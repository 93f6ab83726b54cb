use super::error::Error;
use super::feature::{value_text, Feature, Properties};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// The cadastre a parcel comes from. Each one names its attributes differently.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    #[serde(rename = "NSW")]
    Nsw,
    #[serde(rename = "QLD")]
    Qld,
}

/// Which property keys carry the lot, section and plan of a parcel.
struct RegionFields {
    lot: &'static str,
    section: Option<&'static str>,
    plan: &'static str,
    plan_prefix: &'static str,
}

const NSW_FIELDS: RegionFields = RegionFields {
    lot: "lotnumber",
    section: Some("sectionnumber"),
    plan: "planlabel",
    plan_prefix: "",
};

// QLD parcels have no sections
const QLD_FIELDS: RegionFields = RegionFields {
    lot: "lot",
    section: None,
    plan: "plan",
    plan_prefix: "Plan ",
};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Attributes {
    pub lot: String,
    pub section: String,
    pub plan: String,
    pub display_name: String,
}

impl Region {
    fn fields(self) -> &'static RegionFields {
        match self {
            Region::Nsw => &NSW_FIELDS,
            Region::Qld => &QLD_FIELDS,
        }
    }

    /// Guesses the region of a batch of features: QLD parcels carry a `lot`
    /// property, NSW parcels do not.
    pub fn detect(features: &[Feature]) -> Region {
        let qld_key = QLD_FIELDS.lot;
        if features
            .iter()
            .any(|feature| feature.properties.contains_key(qld_key))
        {
            Region::Qld
        } else {
            Region::Nsw
        }
    }

    /// Extracts lot, section and plan plus a display name like
    /// `Lot 43 Section 2 DP12345` (NSW) or `Lot 3 Plan RP123456` (QLD).
    ///
    /// Missing or `null` values become empty strings.
    pub fn attributes(self, properties: &Properties) -> Attributes {
        let fields = self.fields();
        let text = |key: &str| {
            properties
                .get(key)
                .and_then(value_text)
                .unwrap_or_default()
        };
        let lot = text(fields.lot);
        let section = fields.section.map(text).unwrap_or_default();
        let plan = text(fields.plan);

        let section_part = if section.is_empty() {
            String::new()
        } else {
            format!("Section {} ", section)
        };
        let display_name = format!(
            "Lot {} {}{}{}",
            lot, section_part, fields.plan_prefix, plan
        );

        Attributes {
            lot,
            section,
            plan,
            display_name,
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Region::Nsw => write!(f, "NSW"),
            Region::Qld => write!(f, "QLD"),
        }
    }
}

impl FromStr for Region {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NSW" => Ok(Region::Nsw),
            "QLD" => Ok(Region::Qld),
            _ => Err(Error::UnknownRegion(s.to_string())),
        }
    }
}
