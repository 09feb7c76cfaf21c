//! Shopper context resource type.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Personalization context attached to a usid.
///
/// Drives which promotions, price books and customer groups apply to the
/// shopper's subsequent requests.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopperContext {
    /// Preview the storefront as of this instant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_date_time: Option<DateTime<Utc>>,
    /// Custom session qualifiers used by promotions.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub custom_qualifiers: BTreeMap<String, String>,
    /// Qualifiers used by campaign assignments.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub assignment_qualifiers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_code: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub customer_group_ids: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
