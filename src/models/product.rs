//! Text product model (area forecast discussion)

use serde::{Deserialize, Serialize};

/// A text product as issued by a forecast office
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Product {
    #[serde(rename = "@id", default)]
    pub id: String,
    #[serde(rename = "issuanceTime", default)]
    pub issuance_time: String,
    #[serde(rename = "productText", default)]
    pub text: String,
}
