use serde::{Deserialize, Serialize};
use validator::Validate;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Page query parameters: `?page=1&size=20&sortBy=createdAt&sortDirection=DESC`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    #[validate(range(min = 1, message = "Page number must be greater than 0"))]
    pub page: Option<u32>,
    #[validate(range(min = 1, max = 100, message = "Page size must be between 1 and 100"))]
    pub size: Option<u32>,
    pub sort_by: Option<String>,
    pub sort_direction: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// Case-insensitive; anything other than ASC/DESC falls back to DESC.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_uppercase()).as_deref() {
            Some("ASC") => SortDirection::Asc,
            _ => SortDirection::Desc,
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

impl PageRequest {
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(DEFAULT_PAGE)
    }

    pub fn size(&self) -> u32 {
        self.size.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    pub fn offset(&self) -> i64 {
        (i64::from(self.page()) - 1) * i64::from(self.size())
    }

    pub fn direction(&self) -> SortDirection {
        SortDirection::parse(self.sort_direction.as_deref())
    }

    /// Resolves `sortBy` against a whitelist of `(wire name, column)` pairs;
    /// unknown or missing values use `default_column`.
    pub fn sort_column(&self, allowed: &[(&str, &'static str)], default_column: &'static str) -> &'static str {
        self.sort_by
            .as_deref()
            .and_then(|wanted| {
                allowed
                    .iter()
                    .find(|(name, _)| *name == wanted.trim())
                    .map(|(_, column)| *column)
            })
            .unwrap_or(default_column)
    }
}

/// A page already cut by the data source, with its own navigation data.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u32,
    pub has_previous: bool,
    pub has_next: bool,
}

impl<T> Page<T> {
    /// Slices a counted result the way the repositories do: `number` is zero-based.
    pub fn new(content: Vec<T>, number: u32, size: u32, total_elements: u64) -> Self {
        let total_pages = total_pages(size, total_elements);
        Self {
            content,
            size,
            total_elements,
            total_pages,
            has_previous: number > 0,
            has_next: number + 1 < total_pages,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T> {
    pub current_page: Option<u32>,
    pub page_size: Option<u32>,
    pub total_items: u64,
    pub total_pages: u32,
    pub data: Vec<T>,
    pub has_previous: bool,
    pub has_next: bool,
}

fn total_pages(size: u32, total_items: u64) -> u32 {
    if size == 0 {
        return 0;
    }
    u32::try_from(total_items.div_ceil(u64::from(size))).unwrap_or(u32::MAX)
}

impl<T> PageResponse<T> {
    pub fn of(current_page: Option<u32>, page_size: Option<u32>, total_items: u64, data: Vec<T>) -> Self {
        let total_pages = page_size.map_or(0, |size| total_pages(size, total_items));
        let has_previous = current_page.is_some_and(|p| p > 1);
        let has_next = current_page.is_some_and(|p| p < total_pages);
        Self {
            current_page,
            page_size,
            total_items,
            total_pages,
            data,
            has_previous,
            has_next,
        }
    }

    /// Trusts the page's own size, totals and flags.
    pub fn from_page<S>(page: Option<Page<S>>, mapper: impl FnMut(S) -> T, requested_page: u32) -> Self {
        let Some(page) = page else {
            return Self::of(Some(1), Some(0), 0, Vec::new());
        };
        let data = page.content.into_iter().map(mapper).collect();
        let mut response = Self::of(
            Some(requested_page.max(1)),
            Some(page.size),
            page.total_elements,
            data,
        );
        response.total_pages = page.total_pages;
        response.has_previous = page.has_previous;
        response.has_next = page.has_next;
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate_payload;

    #[test]
    fn defaults_and_offset() {
        let req = PageRequest::default();
        assert_eq!(req.page(), 1);
        assert_eq!(req.size(), 20);
        assert_eq!(req.offset(), 0);

        let req = PageRequest {
            page: Some(3),
            size: Some(15),
            ..Default::default()
        };
        assert_eq!(req.offset(), 30);
    }

    #[test]
    fn size_bounds_are_validated() {
        let too_big = PageRequest {
            size: Some(101),
            ..Default::default()
        };
        assert!(validate_payload(&too_big).is_err());

        let zero_page = PageRequest {
            page: Some(0),
            ..Default::default()
        };
        assert!(validate_payload(&zero_page).is_err());

        let ok = PageRequest {
            page: Some(1),
            size: Some(100),
            ..Default::default()
        };
        assert!(validate_payload(&ok).is_ok());
    }

    #[test]
    fn zero_size_has_no_pages() {
        for page in 0..5 {
            let resp = PageResponse::<u8>::of(Some(page), Some(0), 42, Vec::new());
            assert_eq!(resp.total_pages, 0);
            assert!(!resp.has_next);
        }
        let resp = PageResponse::<u8>::of(Some(1), None, 42, Vec::new());
        assert_eq!(resp.total_pages, 0);
    }

    #[test]
    fn total_pages_is_ceiling() {
        let cases = [(10, 0, 0), (10, 1, 1), (10, 10, 1), (10, 11, 2), (3, 10, 4), (1, 7, 7)];
        for (size, total, expected) in cases {
            let resp = PageResponse::<u8>::of(Some(1), Some(size), total, Vec::new());
            assert_eq!(resp.total_pages, expected, "size={size} total={total}");
        }
    }

    #[test]
    fn navigation_flags() {
        let first = PageResponse::<u8>::of(Some(1), Some(10), 25, Vec::new());
        assert!(!first.has_previous);
        assert!(first.has_next);

        let middle = PageResponse::<u8>::of(Some(2), Some(10), 25, Vec::new());
        assert!(middle.has_previous);
        assert!(middle.has_next);

        let last = PageResponse::<u8>::of(Some(3), Some(10), 25, Vec::new());
        assert!(last.has_previous);
        assert!(!last.has_next);

        let unknown = PageResponse::<u8>::of(None, Some(10), 25, Vec::new());
        assert!(!unknown.has_previous);
        assert!(!unknown.has_next);
    }

    #[test]
    fn from_page_trusts_source_flags() {
        let page = Page {
            content: vec![1, 2],
            size: 2,
            total_elements: 9,
            total_pages: 5,
            has_previous: false,
            has_next: true,
        };
        let resp = PageResponse::from_page(Some(page), |n: i32| n * 10, 0);
        assert_eq!(resp.current_page, Some(1));
        assert_eq!(resp.data, vec![10, 20]);
        assert_eq!(resp.total_pages, 5);
        assert!(!resp.has_previous);
        assert!(resp.has_next);
    }

    #[test]
    fn from_missing_page_is_empty() {
        let resp = PageResponse::<u8>::from_page(None::<Page<u8>>, |n| n, 4);
        assert_eq!(resp.current_page, Some(1));
        assert_eq!(resp.page_size, Some(0));
        assert_eq!(resp.total_items, 0);
        assert!(resp.data.is_empty());
    }

    #[test]
    fn page_new_computes_flags_from_zero_based_number() {
        let page = Page::new(vec!['a'], 1, 10, 25);
        assert_eq!(page.total_pages, 3);
        assert!(page.has_previous);
        assert!(page.has_next);

        let last = Page::new(vec!['a'], 2, 10, 25);
        assert!(!last.has_next);
    }

    #[test]
    fn sort_helpers() {
        assert_eq!(SortDirection::parse(Some("asc")), SortDirection::Asc);
        assert_eq!(SortDirection::parse(Some("sideways")), SortDirection::Desc);
        assert_eq!(SortDirection::parse(None), SortDirection::Desc);

        let req = PageRequest {
            sort_by: Some("totalCalories".into()),
            ..Default::default()
        };
        let allowed = [("totalCalories", "total_calories"), ("createdAt", "created_at")];
        assert_eq!(req.sort_column(&allowed, "created_at"), "total_calories");

        let injected = PageRequest {
            sort_by: Some("1; DROP TABLE meals".into()),
            ..Default::default()
        };
        assert_eq!(injected.sort_column(&allowed, "created_at"), "created_at");
    }
}
