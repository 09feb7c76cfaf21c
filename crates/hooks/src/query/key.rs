//! Structured cache keys.
//!
//! A key is the resource path of a read (`organizations/{org}/baskets/{id}`)
//! plus its remaining parameters. Filters match keys either exactly or by
//! path prefix, so one filter can address a basket and everything under it.

use std::collections::BTreeMap;
use std::fmt;

use commerce_query_core::{CustomerId, OrganizationId, SiteId};

/// Key of one cached query result.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey {
    path: Vec<String>,
    params: BTreeMap<String, String>,
}

impl QueryKey {
    /// Create a key from path segments.
    pub fn new<I, S>(path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            path: path.into_iter().map(Into::into).collect(),
            params: BTreeMap::new(),
        }
    }

    /// Add a non-path parameter.
    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn path(&self) -> &[String] {
        &self.path
    }

    #[must_use]
    pub const fn params(&self) -> &BTreeMap<String, String> {
        &self.params
    }

    /// Whether this key's path starts with `prefix`.
    #[must_use]
    pub fn has_prefix(&self, prefix: &[String]) -> bool {
        self.path.starts_with(prefix)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.path.join("/"))?;
        for (i, (name, value)) in self.params.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            write!(f, "{sep}{name}={value}")?;
        }
        Ok(())
    }
}

/// Selects cached queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyFilter {
    /// Exactly one key, parameters included.
    Exact(QueryKey),
    /// Every key whose path starts with these segments, whatever its
    /// parameters.
    Prefix(Vec<String>),
}

impl KeyFilter {
    pub fn prefix<I, S>(path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Prefix(path.into_iter().map(Into::into).collect())
    }

    #[must_use]
    pub fn matches(&self, key: &QueryKey) -> bool {
        match self {
            Self::Exact(exact) => exact == key,
            Self::Prefix(prefix) => key.has_prefix(prefix),
        }
    }
}

impl fmt::Display for KeyFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(key) => write!(f, "{key}"),
            Self::Prefix(path) => write!(f, "/{}/**", path.join("/")),
        }
    }
}

impl From<QueryKey> for KeyFilter {
    fn from(key: QueryKey) -> Self {
        Self::Exact(key)
    }
}

// =============================================================================
// QueryScope
// =============================================================================

/// Parameters shared by every query of one shopper session.
///
/// Keys are rooted at `organizations/{org}` and carry `siteId` (and `locale`
/// when set) as parameters, mirroring the request URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryScope {
    pub organization_id: OrganizationId,
    pub site_id: SiteId,
    pub locale: Option<String>,
    /// Customer the session is authenticated as, used to address the
    /// customer's basket list.
    pub customer_id: Option<CustomerId>,
}

impl QueryScope {
    #[must_use]
    pub fn new(organization_id: impl Into<OrganizationId>, site_id: impl Into<SiteId>) -> Self {
        Self {
            organization_id: organization_id.into(),
            site_id: site_id.into(),
            locale: None,
            customer_id: None,
        }
    }

    #[must_use]
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    #[must_use]
    pub fn with_customer_id(mut self, customer_id: CustomerId) -> Self {
        self.customer_id = Some(customer_id);
        self
    }

    fn rooted<I, S>(&self, path: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut segments = vec![
            "organizations".to_string(),
            self.organization_id.to_string(),
        ];
        segments.extend(path.into_iter().map(Into::into));
        segments
    }

    /// Key of a read at `path` below the organization.
    pub fn key<I, S>(&self, path: I) -> QueryKey
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let key = QueryKey::new(self.rooted(path)).with_param("siteId", self.site_id.as_str());
        match &self.locale {
            Some(locale) => key.with_param("locale", locale.as_str()),
            None => key,
        }
    }

    /// Filter matching every read at or below `path`.
    pub fn prefix<I, S>(&self, path: I) -> KeyFilter
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        KeyFilter::Prefix(self.rooted(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scope() -> QueryScope {
        QueryScope::new("f_ecom_zzrf_001", "RefArch")
    }

    #[test]
    fn test_scope_keys_are_rooted_at_organization() {
        let key = scope().key(["baskets", "b1", "taxes"]);
        assert_eq!(
            key.path(),
            ["organizations", "f_ecom_zzrf_001", "baskets", "b1", "taxes"]
        );
        assert_eq!(key.params().get("siteId").map(String::as_str), Some("RefArch"));
        assert_eq!(
            key.to_string(),
            "/organizations/f_ecom_zzrf_001/baskets/b1/taxes?siteId=RefArch"
        );
    }

    #[test]
    fn test_locale_becomes_a_param() {
        let key = scope().with_locale("en-US").key(["baskets", "b1"]);
        assert_eq!(
            key.to_string(),
            "/organizations/f_ecom_zzrf_001/baskets/b1?locale=en-US&siteId=RefArch"
        );
    }

    #[test]
    fn test_prefix_filter_matches_sub_resources_only() {
        let filter = scope().prefix(["baskets", "b1"]);

        assert!(filter.matches(&scope().key(["baskets", "b1"])));
        assert!(filter.matches(&scope().key(["baskets", "b1", "payment-methods"])));
        assert!(filter.matches(&scope().with_locale("de-DE").key(["baskets", "b1"])));
        assert!(!filter.matches(&scope().key(["baskets", "b10"])));
        assert!(!filter.matches(&scope().key(["baskets"])));
        assert!(!filter.matches(&QueryScope::new("other", "RefArch").key(["baskets", "b1"])));
    }

    #[test]
    fn test_exact_filter_compares_params() {
        let key = scope().key(["baskets", "b1"]);
        let filter = KeyFilter::from(key.clone());

        assert!(filter.matches(&key));
        assert!(!filter.matches(&scope().with_locale("en-US").key(["baskets", "b1"])));
        assert_eq!(
            scope().prefix(["baskets"]).to_string(),
            "/organizations/f_ecom_zzrf_001/baskets/**"
        );
    }
}
