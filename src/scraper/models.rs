use serde::{Deserialize, Serialize};
use std::fmt;

// listResults[]
//  ├── detailUrl          -> home_URL
//  ├── statusType         -> home_status
//  ├── price              -> home_price  (number or "$1,250,000")
//  ├── address            -> home_address
//  ├── addressZipcode     -> home_zipcode
//  ├── beds / baths / area
//  └── hdpData
//       └── homeInfo
//            ├── homeType      -> home_type
//            └── daysOnZillow  -> posted

/// One normalized listing. Every field is optional; `None` means the site
/// did not supply it and serializes as `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListingRecord {
    pub home_type: Option<String>,
    pub posted: Option<i64>,
    #[serde(rename = "home_URL")]
    pub home_url: Option<String>,
    pub home_status: Option<String>,
    pub home_price: Option<HomePrice>,
    pub home_address: Option<String>,
    pub home_zipcode: Option<String>,
    pub num_beds: Option<f64>,
    pub num_baths: Option<f64>,
    pub home_area: Option<f64>,
}

impl ListingRecord {
    /// Output field names, in record order.
    pub const FIELDS: [&'static str; 10] = [
        "home_type",
        "posted",
        "home_URL",
        "home_status",
        "home_price",
        "home_address",
        "home_zipcode",
        "num_beds",
        "num_baths",
        "home_area",
    ];
}

/// The site sends prices either as raw numbers or as preformatted strings
/// ("$1,250,000", "$2,400/mo"). Both are kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HomePrice {
    Number(f64),
    Text(String),
}

impl fmt::Display for HomePrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HomePrice::Number(n) => write!(f, "{n}"),
            HomePrice::Text(s) => f.write_str(s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_output_field_names() {
        let record = ListingRecord {
            home_url: Some("/homedetails/1_zpid/".into()),
            home_price: Some(HomePrice::Text("$500,000".into())),
            num_beds: Some(2.0),
            ..Default::default()
        };

        let json = serde_json::to_value(&record).unwrap();
        let obj = json.as_object().unwrap();

        let mut keys: Vec<&str> = obj.keys().map(String::as_str).collect();
        let mut expected = ListingRecord::FIELDS.to_vec();
        keys.sort_unstable();
        expected.sort_unstable();
        assert_eq!(keys, expected);

        assert_eq!(obj["home_URL"], "/homedetails/1_zpid/");
        assert_eq!(obj["home_price"], "$500,000");
        assert!(obj["home_type"].is_null());
    }

    #[test]
    fn price_display() {
        assert_eq!(HomePrice::Number(425000.0).to_string(), "425000");
        assert_eq!(HomePrice::Text("$2,400/mo".into()).to_string(), "$2,400/mo");
    }
}
