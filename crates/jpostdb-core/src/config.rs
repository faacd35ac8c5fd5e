// crates/jpostdb-core/src/config.rs

//! # Catalog Variants
//!
//! The fuke and manhole card pages run the same controller. What differs is
//! captured here: which endpoints to hit, what the query parameters are
//! called, whether there is a dependent city facet, and which messages the
//! user sees when something fails.

use crate::error::{CatalogError, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: u32 = 12;

const PREFECTURES_ERROR: &str = "Failed to load prefectures list, please try again later.";
const CITIES_ERROR: &str = "Failed to load cities list, please try again later.";

/// A facet listing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetEndpoint {
    pub path: String,
    /// Object keys tried in order to find an option's id.
    pub id_fields: Vec<String>,
}

/// The dependent facet (city), scoped by the primary selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecondaryFacet {
    #[serde(flatten)]
    pub endpoint: FacetEndpoint,
    /// Query parameter carrying the primary id, e.g. `pref_id`.
    pub scope_param: String,
}

/// Query parameter names of the search endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchParamNames {
    pub primary: String,
    /// `None` when the variant has no secondary facet.
    pub secondary: Option<String>,
    pub keyword: String,
    pub page: String,
    pub page_size: String,
}

/// Fixed user-facing failure messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorMessages {
    pub primary_facet: String,
    pub secondary_facet: String,
    pub search: String,
}

/// Everything that distinguishes one catalog page from another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantConfig {
    pub name: String,
    pub primary: FacetEndpoint,
    #[serde(default)]
    pub secondary: Option<SecondaryFacet>,
    pub search_endpoint: String,
    pub params: SearchParamNames,
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,
    pub messages: ErrorMessages,
    /// Prefix of the keyword part of the filter label ("Office", "Name").
    pub keyword_label: String,
    /// Filter label shown when nothing is selected.
    pub empty_label: String,
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl VariantConfig {
    /// Scenic postmarks: prefecture -> city -> post office name.
    pub fn fuke() -> Self {
        Self {
            name: "fuke".into(),
            primary: FacetEndpoint {
                path: "/api/fuke/prefectures".into(),
                id_fields: strings(&["pref_id", "id"]),
            },
            secondary: Some(SecondaryFacet {
                endpoint: FacetEndpoint {
                    path: "/api/fuke/cities".into(),
                    id_fields: strings(&["id"]),
                },
                scope_param: "pref_id".into(),
            }),
            search_endpoint: "/api/fuke/search".into(),
            params: SearchParamNames {
                primary: "pref_id".into(),
                secondary: Some("city_id".into()),
                keyword: "jpost_name".into(),
                page: "page".into(),
                page_size: "page_size".into(),
            },
            default_page_size: DEFAULT_PAGE_SIZE,
            messages: ErrorMessages {
                primary_facet: PREFECTURES_ERROR.into(),
                secondary_facet: CITIES_ERROR.into(),
                search: "Failed to search scenic stamp data, please try again later.".into(),
            },
            keyword_label: "Office".into(),
            empty_label: "No prefecture / city selected".into(),
        }
    }

    /// Manhole cards: prefecture -> card name. No city facet.
    pub fn manhole_card() -> Self {
        Self {
            name: "manhole-card".into(),
            primary: FacetEndpoint {
                path: "/api/prefectures".into(),
                id_fields: strings(&["id"]),
            },
            secondary: None,
            search_endpoint: "/api/manhole-card/search".into(),
            params: SearchParamNames {
                primary: "pref_id".into(),
                secondary: None,
                keyword: "name".into(),
                page: "page".into(),
                page_size: "page_size".into(),
            },
            default_page_size: DEFAULT_PAGE_SIZE,
            messages: ErrorMessages {
                primary_facet: PREFECTURES_ERROR.into(),
                secondary_facet: CITIES_ERROR.into(),
                search: "Failed to search manhole card data, please try again later.".into(),
            },
            keyword_label: "Name".into(),
            empty_label: "No prefecture selected".into(),
        }
    }

    /// Looks a preset up by name (`fuke`, `manhole-card`, `manhole_card`).
    pub fn by_name(name: &str) -> Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "fuke" => Ok(Self::fuke()),
            "manhole-card" | "manhole_card" | "manhole" => Ok(Self::manhole_card()),
            other => Err(CatalogError::UnknownVariant(other.to_string())),
        }
    }

    pub fn has_secondary(&self) -> bool {
        self.secondary.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_resolve_by_name() {
        assert_eq!(VariantConfig::by_name("FUKE").unwrap(), VariantConfig::fuke());
        assert_eq!(
            VariantConfig::by_name("manhole_card").unwrap(),
            VariantConfig::manhole_card()
        );
        assert!(matches!(
            VariantConfig::by_name("stamps"),
            Err(CatalogError::UnknownVariant(_))
        ));
    }

    #[test]
    fn only_fuke_has_a_city_facet() {
        assert!(VariantConfig::fuke().has_secondary());
        assert!(!VariantConfig::manhole_card().has_secondary());
        assert!(VariantConfig::manhole_card().params.secondary.is_none());
    }

    #[test]
    fn custom_config_deserializes_with_defaults() {
        let json = serde_json::json!({
            "name": "custom",
            "primary": { "path": "/api/prefectures", "id_fields": ["id"] },
            "search_endpoint": "/api/custom/search",
            "params": {
                "primary": "pref",
                "secondary": null,
                "keyword": "q",
                "page": "p",
                "page_size": "n"
            },
            "messages": {
                "primary_facet": "a",
                "secondary_facet": "b",
                "search": "c"
            },
            "keyword_label": "Name",
            "empty_label": "-"
        });
        let cfg: VariantConfig = serde_json::from_value(json).unwrap();
        assert_eq!(cfg.default_page_size, DEFAULT_PAGE_SIZE);
        assert!(cfg.secondary.is_none());
    }

    #[test]
    fn secondary_facet_flattens_endpoint() {
        let json = serde_json::to_value(VariantConfig::fuke().secondary.unwrap()).unwrap();
        assert_eq!(json["path"], "/api/fuke/cities");
        assert_eq!(json["scope_param"], "pref_id");
    }
}
