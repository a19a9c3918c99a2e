//! Row contract and the paged result envelope.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;

/// Contract a row type must satisfy to be displayed in a grid.
///
/// Selection membership is keyed by [`id`](GridRow::id), so the identifier
/// must be unique within a page. [`set_line_number`](GridRow::set_line_number)
/// is an optional hook the pager uses to stamp each row with its 1-based
/// display index; the default implementation ignores it.
pub trait GridRow: Clone + Send + Sync + 'static {
    /// Unique identifier of this row.
    fn id(&self) -> String;

    /// Receives the derived display index during load.
    fn set_line_number(&mut self, _line_number: u64) {}
}

/// Server response envelope: one page of rows plus the total row count.
///
/// # Example
///
/// ```ignore
/// let mut list: PagerList<Customer> = PagerList::from_value(payload)?;
/// list.init_line_numbers();
/// println!("{} of {} rows", list.data.len(), list.total_count);
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagerList<T> {
    /// Page index the server answered for, 1-based.
    #[serde(default = "first_page")]
    pub page: u64,
    /// Rows per page the server answered for.
    #[serde(default)]
    pub page_size: u64,
    /// Total number of rows matching the query, across all pages.
    #[serde(default)]
    pub total_count: u64,
    /// The rows of this page, in display order.
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

fn first_page() -> u64 {
    1
}

impl<T: GridRow + DeserializeOwned> PagerList<T> {
    /// Deserializes a raw response payload into the envelope.
    pub fn from_value(payload: Value) -> Result<Self, ApiError> {
        serde_json::from_value(payload).map_err(|source| {
            ApiError::parse(format!("invalid paged result envelope: {source}"))
        })
    }
}

impl<T: GridRow> PagerList<T> {
    /// Stamps every row with its 1-based display index.
    ///
    /// The first row of page `p` gets `(p - 1) * page_size + 1`.
    pub fn init_line_numbers(&mut self) {
        let base = self.page.saturating_sub(1).saturating_mul(self.page_size);
        for (offset, row) in self.data.iter_mut().enumerate() {
            row.set_line_number(base.saturating_add(offset as u64).saturating_add(1));
        }
    }

    /// Returns `true` if this page has no rows.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the number of rows in this page.
    pub fn len(&self) -> usize {
        self.data.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Deserialize, PartialEq)]
    struct Item {
        id: String,
        #[serde(default)]
        line_number: u64,
    }

    impl GridRow for Item {
        fn id(&self) -> String {
            self.id.clone()
        }

        fn set_line_number(&mut self, line_number: u64) {
            self.line_number = line_number;
        }
    }

    #[test]
    fn test_line_numbers_offset_by_page() {
        let mut list = PagerList {
            page: 3,
            page_size: 10,
            total_count: 25,
            data: vec![
                Item { id: "a".into(), line_number: 0 },
                Item { id: "b".into(), line_number: 0 },
            ],
        };
        list.init_line_numbers();
        assert_eq!(list.data[0].line_number, 21);
        assert_eq!(list.data[1].line_number, 22);
    }

    #[test]
    fn test_missing_fields_default() {
        let payload = serde_json::json!({ "totalCount": 2, "data": [{ "id": "x" }] });
        let list: PagerList<Item> = PagerList::from_value(payload).unwrap();
        assert_eq!(list.page, 1);
        assert_eq!(list.total_count, 2);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_huge_paging_values_saturate_instead_of_overflowing() {
        let mut list = PagerList {
            page: u64::MAX,
            page_size: u64::MAX,
            total_count: 1,
            data: vec![Item { id: "a".into(), line_number: 0 }],
        };
        list.init_line_numbers();
        assert_eq!(list.data[0].line_number, u64::MAX);
    }

    #[test]
    fn test_absent_data_is_empty() {
        let payload = serde_json::json!({ "totalCount": 0 });
        let list: PagerList<Item> = PagerList::from_value(payload).unwrap();
        assert!(list.is_empty());
    }

    #[test]
    fn test_malformed_envelope_is_a_parse_error() {
        let payload = serde_json::json!({ "data": "not-an-array" });
        assert!(PagerList::<Item>::from_value(payload).is_err());
    }
}
