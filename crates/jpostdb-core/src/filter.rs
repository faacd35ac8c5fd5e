// crates/jpostdb-core/src/filter.rs
use serde::{Deserialize, Serialize};

/// The user's current filter selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub primary_facet_id: Option<i64>,
    pub secondary_facet_id: Option<i64>,
    /// Stored as typed; trimmed whenever it is used.
    pub name_keyword: String,
}

impl FilterState {
    /// The keyword as it would be sent, or `None` when blank.
    pub fn keyword(&self) -> Option<&str> {
        let kw = self.name_keyword.trim();
        (!kw.is_empty()).then_some(kw)
    }

    pub fn has_any_criteria(&self) -> bool {
        self.primary_facet_id.is_some() || self.secondary_facet_id.is_some() || self.keyword().is_some()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Normalizes a raw select-box value into a facet id.
///
/// Blank input, `"0"` and anything that does not parse as an integer all mean
/// "nothing selected".
///
/// ```
/// use jpostdb_core::filter::coerce_facet_id;
///
/// assert_eq!(coerce_facet_id("13"), Some(13));
/// assert_eq!(coerce_facet_id(" 7 "), Some(7));
/// assert_eq!(coerce_facet_id(""), None);
/// assert_eq!(coerce_facet_id("0"), None);
/// assert_eq!(coerce_facet_id("tokyo"), None);
/// ```
pub fn coerce_facet_id(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok().filter(|id| *id != 0)
}

/// Two-digit prefecture code as printed on the catalog pages (`1` -> `"01"`).
pub fn pad_code(id: i64) -> String {
    format!("{id:02}")
}
