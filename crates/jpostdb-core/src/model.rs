// crates/jpostdb-core/src/model.rs

//! # Wire Model
//!
//! Shapes exchanged with the catalog HTTP endpoints. Facet options are kept
//! loosely typed (an id plus whatever string fields the server sent) because
//! the two catalogs name their display fields differently; search results
//! stay opaque `serde_json::Value`s so the controller never has to know which
//! catalog it is paging through.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::warn;

// -----------------------------------------------------------------------------
// FACET OPTIONS
// -----------------------------------------------------------------------------

/// One selectable entry of a facet (a prefecture, a city).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetOption {
    pub id: i64,
    /// String-valued fields of the server object, e.g. `full_name`, `en_name`
    /// for a prefecture or `name` for a city.
    pub display_fields: BTreeMap<String, String>,
}

impl FacetOption {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            display_fields: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, key: &str, value: &str) -> Self {
        self.display_fields.insert(key.to_string(), value.to_string());
        self
    }

    pub fn field(&self, key: &str) -> Option<&str> {
        self.display_fields.get(key).map(String::as_str)
    }

    /// Builds an option from a server object.
    ///
    /// The id is taken from the first of `id_fields` that holds an integer
    /// (fuke prefectures carry both `pref_id` and `id`). Returns `None` when
    /// no usable id is present.
    pub fn from_object(obj: &Map<String, Value>, id_fields: &[String]) -> Option<Self> {
        let id = id_fields
            .iter()
            .find_map(|key| obj.get(key).and_then(Value::as_i64))?;

        let display_fields = obj
            .iter()
            .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
            .collect();

        Some(Self { id, display_fields })
    }
}

/// Decodes a facet listing (`[{...}, {...}]`) into options.
///
/// Entries that are not objects or lack an id are skipped; anything other
/// than an array is rejected.
pub fn parse_facet_options(body: Value, id_fields: &[String]) -> crate::Result<Vec<FacetOption>> {
    let Value::Array(entries) = body else {
        return Err(crate::CatalogError::InvalidData(
            "facet listing is not a JSON array".into(),
        ));
    };

    let mut out = Vec::with_capacity(entries.len());
    for entry in entries {
        match entry.as_object().and_then(|o| FacetOption::from_object(o, id_fields)) {
            Some(opt) => out.push(opt),
            None => warn!(?entry, ?id_fields, "skipping facet entry without an id"),
        }
    }
    Ok(out)
}

// -----------------------------------------------------------------------------
// SEARCH RESPONSE
// -----------------------------------------------------------------------------

/// Body of `GET .../search`.
///
/// Every field is defaulted, whether missing or `null`: `items` reads as
/// empty, `total` as zero, and `page`/`page_size` as zero, which the
/// controller treats as "keep the locally held value".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchPage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub page: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub page_size: u32,
}

fn null_as_default<'de, D, T>(de: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(de)?.unwrap_or_default())
}

// -----------------------------------------------------------------------------
// TYPED ITEM VIEWS
// -----------------------------------------------------------------------------

/// A scenic postmark (fuke) row as returned by `/api/fuke/search`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FukeItem {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub abolition: Option<bool>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    pub jpost_office_name: String,
    pub jpost_office_address: String,
    pub jpost_office_postcode: String,
    pub pref_id: i64,
    pub city_id: i64,
}

/// A manhole card row as returned by `/api/manhole-card/search`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManholeCardItem {
    pub id: i64,
    pub name: String,
    pub series: String,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub location_info: Option<String>,
    #[serde(default)]
    pub distribution_time: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    pub prefecture_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn option_prefers_first_listed_id_field() {
        let body = json!([{ "id": 7, "pref_id": 13, "full_name": "Tokyo", "en_name": "Tokyo" }]);
        let opts = parse_facet_options(body, &fields(&["pref_id", "id"])).unwrap();
        assert_eq!(opts.len(), 1);
        assert_eq!(opts[0].id, 13);
        assert_eq!(opts[0].field("full_name"), Some("Tokyo"));
        assert_eq!(opts[0].field("id"), None);
    }

    #[test]
    fn option_falls_back_to_next_id_field() {
        let body = json!([{ "id": 101, "name": "Shinjuku" }]);
        let opts = parse_facet_options(body, &fields(&["pref_id", "id"])).unwrap();
        assert_eq!(opts[0].id, 101);
        assert_eq!(opts[0].field("name"), Some("Shinjuku"));
    }

    #[test]
    fn entries_without_id_are_skipped() {
        let body = json!([{ "name": "nowhere" }, 3, { "id": 1, "name": "Hokkaido" }]);
        let opts = parse_facet_options(body, &fields(&["id"])).unwrap();
        assert_eq!(opts, vec![FacetOption::new(1).with_field("name", "Hokkaido")]);
    }

    #[test]
    fn non_array_listing_is_rejected() {
        let err = parse_facet_options(json!({ "id": 1 }), &fields(&["id"])).unwrap_err();
        assert!(matches!(err, crate::CatalogError::InvalidData(_)));
    }

    #[test]
    fn search_page_defaults_missing_fields() {
        let page: SearchPage = serde_json::from_value(json!({ "items": [1, 2] })).unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total, 0);
        assert_eq!(page.page, 0);
        assert_eq!(page.page_size, 0);
    }

    #[test]
    fn search_page_reads_null_fields_as_defaults() {
        let body = json!({ "items": null, "total": null, "page": null, "page_size": 20 });
        let page: SearchPage = serde_json::from_value(body).unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total, 0);
        assert_eq!(page.page, 0);
        assert_eq!(page.page_size, 20);
    }

    #[test]
    fn search_page_still_rejects_wrong_types() {
        let body = json!({ "items": "none", "total": 3 });
        assert!(serde_json::from_value::<SearchPage>(body).is_err());
    }

    #[test]
    fn fuke_item_decodes_server_row() {
        let row = json!({
            "id": 5,
            "name": "Tokyo Tower",
            "abolition": false,
            "image_url": null,
            "start_date": "1999-04-01",
            "jpost_office_name": "Shiba",
            "jpost_office_address": "Minato-ku",
            "jpost_office_postcode": "105-0011",
            "pref_id": 13,
            "city_id": 101
        });
        let item: FukeItem = serde_json::from_value(row).unwrap();
        assert_eq!(item.jpost_office_name, "Shiba");
        assert_eq!(item.start_date.as_deref(), Some("1999-04-01"));
        assert!(item.author.is_none());
    }
}
