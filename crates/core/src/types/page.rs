//! Paged collection envelope returned by the backend.

use serde::{Deserialize, Deserializer, Serialize};

/// One page of a backend collection.
///
/// Only `content` is required on the wire. Missing paging fields are filled
/// in as if the collection fit on a single page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub total_elements: u64,
    pub total_pages: u32,
    pub number: u32,
    pub size: u32,
    pub last: bool,
}

impl<T> Page<T> {
    /// A single page holding every item.
    #[must_use]
    pub fn single(content: Vec<T>) -> Self {
        let len = content.len();
        Self {
            content,
            total_elements: len as u64,
            total_pages: 1,
            number: 0,
            size: u32::try_from(len).unwrap_or(u32::MAX),
            last: true,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPage<T> {
    content: Vec<T>,
    total_elements: Option<u64>,
    total_pages: Option<u32>,
    number: Option<u32>,
    size: Option<u32>,
    last: Option<bool>,
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Page<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawPage::<T>::deserialize(deserializer)?;
        let defaults = Self::single(raw.content);
        Ok(Self {
            total_elements: raw.total_elements.unwrap_or(defaults.total_elements),
            total_pages: raw.total_pages.unwrap_or(defaults.total_pages),
            number: raw.number.unwrap_or(defaults.number),
            size: raw.size.unwrap_or(defaults.size),
            last: raw.last.unwrap_or(defaults.last),
            content: defaults.content,
        })
    }
}
