//! Query parameters for paged, sorted, filtered requests.

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

/// Sort direction reported by a table column header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    /// Ascending order (A-Z, 0-9).
    Ascend,
    /// Descending order (Z-A, 9-0).
    Descend,
}

/// Paging, sorting and filter state sent with every data request.
///
/// `page` and `page_size` drive pagination, `order` holds the sort
/// expression (column name, optionally suffixed with `" desc"`), and any
/// number of arbitrary filter fields ride along flattened into the same
/// object. The whole struct serializes to the camelCase wire shape the
/// backend expects and round-trips through the [`StateStore`] unchanged.
///
/// [`StateStore`]: crate::store::StateStore
///
/// # Example
///
/// ```
/// use tablegrid::QueryParams;
///
/// let mut params = QueryParams::new();
/// params.set_filter("name", "contoso");
/// params.page = 2;
///
/// let pairs = params.to_pairs();
/// assert!(pairs.contains(&("page".to_string(), "2".to_string())));
/// assert!(pairs.contains(&("name".to_string(), "contoso".to_string())));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryParams {
    /// Current page index, 1-based.
    pub page: u64,
    /// Number of rows per page.
    pub page_size: u64,
    /// Sort expression: column name, optionally suffixed with `" desc"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
    /// Arbitrary filter fields, flattened into the serialized object.
    #[serde(flatten)]
    pub filters: Map<String, Value>,
}

impl Default for QueryParams {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 20,
            order: None,
            filters: Map::new(),
        }
    }
}

impl QueryParams {
    /// Creates query parameters with default paging (page 1, 20 rows).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a filter field, replacing any previous value under that name.
    pub fn set_filter(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.filters.insert(name.into(), value.into());
    }

    /// Removes a filter field.
    pub fn remove_filter(&mut self, name: &str) -> Option<Value> {
        self.filters.remove(name)
    }

    /// Returns a filter field, if set.
    pub fn filter(&self, name: &str) -> Option<&Value> {
        self.filters.get(name)
    }

    /// Flattens the parameters into query-string pairs for a GET request.
    ///
    /// Scalars serialize to their plain string form, arrays of scalars to a
    /// comma-joined list, null filters are skipped entirely.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let object = match serde_json::to_value(self) {
            Ok(Value::Object(object)) => object,
            _ => return Vec::new(),
        };
        object
            .into_iter()
            .filter_map(|(name, value)| value_to_pair(value).map(|text| (name, text)))
            .collect()
    }
}

fn value_to_pair(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Number(number) => Some(number.to_string()),
        Value::Array(items) => {
            let parts: Vec<String> = items.into_iter().filter_map(value_to_pair).collect();
            Some(parts.join(","))
        }
        // Nested objects don't survive a flat query string.
        Value::Object(_) => None,
    }
}

/// Resolves the order expression for a column sort event.
///
/// No direction means the column header was reset, which falls back to the
/// originally configured sort key.
pub(crate) fn resolve_order(
    column: &str,
    direction: Option<SortDirection>,
    fallback: Option<&str>,
) -> Option<String> {
    match direction {
        None => fallback.map(str::to_string),
        Some(SortDirection::Ascend) => Some(column.to_string()),
        Some(SortDirection::Descend) => Some(format!("{column} desc")),
    }
}
