//! Pagination request parsing and response headers for list endpoints.

use axum::http::header::{HeaderMap, HeaderValue, InvalidHeaderValue, LINK};
use tusk_core::{Direction, Order, Page, Pageable};

pub const TOTAL_COUNT: &str = "x-total-count";

/// Bounds applied to `size` query parameters.
#[derive(Debug, Clone, Copy)]
pub struct PaginationSettings {
    pub default_size: u32,
    pub max_size: u32,
}

impl Default for PaginationSettings {
    fn default() -> Self {
        Self { default_size: 20, max_size: 2000 }
    }
}

impl PaginationSettings {
    /// Reads `page`, `size` and repeated `sort` parameters from a raw query string.
    ///
    /// Unparseable numbers fall back to defaults. Each `sort` value is
    /// `prop[,prop...][,asc|desc]`; the trailing direction applies to every
    /// property in that value.
    pub fn parse(&self, query: Option<&str>) -> Pageable {
        let mut page = 0u32;
        let mut size = self.default_size;
        let mut sort = Vec::new();

        for (key, value) in url::form_urlencoded::parse(query.unwrap_or_default().as_bytes()) {
            match key.as_ref() {
                "page" => page = value.parse::<i64>().map(|p| p.clamp(0, u32::MAX as i64) as u32).unwrap_or(0),
                "size" => {
                    size = match value.parse::<i64>() {
                        Ok(s) if s >= 1 => s.min(self.max_size as i64) as u32,
                        _ => self.default_size,
                    }
                }
                "sort" => sort.extend(parse_sort(&value)),
                _ => {}
            }
        }

        Pageable::of(page, size).with_sort(sort)
    }
}

fn parse_sort(value: &str) -> Vec<Order> {
    let mut parts: Vec<&str> = value
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect();

    let direction = match parts.last().and_then(|last| Direction::parse(last)) {
        Some(direction) => {
            parts.pop();
            direction
        }
        None => Direction::Asc,
    };

    parts
        .into_iter()
        .map(|property| Order { property: property.to_string(), direction })
        .collect()
}

/// Builds `X-Total-Count` and the RFC 5988 `Link` header for a page.
pub fn pagination_headers<E>(page: &Page<E>, base_url: &str) -> Result<HeaderMap, InvalidHeaderValue> {
    let mut headers = HeaderMap::new();
    headers.insert(TOTAL_COUNT, HeaderValue::from(page.total_elements));

    let mut links = Vec::with_capacity(4);
    if page.has_next() {
        links.push(link(base_url, page.number as u64 + 1, page.size, "next"));
    }
    if page.has_previous() {
        links.push(link(base_url, page.number as u64 - 1, page.size, "prev"));
    }
    let last_page = page.total_pages().saturating_sub(1);
    links.push(link(base_url, last_page, page.size, "last"));
    links.push(link(base_url, 0, page.size, "first"));

    headers.insert(LINK, HeaderValue::from_str(&links.join(","))?);
    Ok(headers)
}

fn link(base_url: &str, page: u64, size: u32, rel: &str) -> String {
    format!("<{}?page={}&size={}>; rel=\"{}\"", base_url, page, size, rel)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(number: u32, size: u32, total: u64) -> Page<()> {
        Page::new(vec![], &Pageable::of(number, size), total)
    }

    #[test]
    fn first_page_links_next_last_first() {
        let headers = pagination_headers(&page(0, 20, 45), "/api/deals").unwrap();
        assert_eq!(headers[TOTAL_COUNT], "45");
        assert_eq!(
            headers[LINK],
            "</api/deals?page=1&size=20>; rel=\"next\",\
             </api/deals?page=2&size=20>; rel=\"last\",\
             </api/deals?page=0&size=20>; rel=\"first\""
        );
    }

    #[test]
    fn middle_page_links_both_neighbours() {
        let headers = pagination_headers(&page(1, 2, 5), "/api/passengers").unwrap();
        let link = headers[LINK].to_str().unwrap();
        assert!(link.starts_with("</api/passengers?page=2&size=2>; rel=\"next\","));
        assert!(link.contains("</api/passengers?page=0&size=2>; rel=\"prev\""));
        assert!(link.contains("</api/passengers?page=2&size=2>; rel=\"last\""));
    }

    #[test]
    fn empty_collection_points_last_at_page_zero() {
        let headers = pagination_headers(&page(0, 20, 0), "/api/deals").unwrap();
        assert_eq!(headers[TOTAL_COUNT], "0");
        assert_eq!(
            headers[LINK],
            "</api/deals?page=0&size=20>; rel=\"last\",</api/deals?page=0&size=20>; rel=\"first\""
        );
    }

    #[test]
    fn parse_applies_defaults_and_bounds() {
        let settings = PaginationSettings::default();

        assert_eq!(settings.parse(None), Pageable::of(0, 20));
        assert_eq!(settings.parse(Some("page=-3&size=0")), Pageable::of(0, 20));
        assert_eq!(settings.parse(Some("page=abc&size=xyz")), Pageable::of(0, 20));
        assert_eq!(settings.parse(Some("page=2&size=5000")), Pageable::of(2, 2000));
    }

    #[test]
    fn parse_collects_repeated_sort_parameters() {
        let settings = PaginationSettings::default();
        let pageable = settings.parse(Some("sort=price_nuc,desc&sort=name&sort=first_name,last_name,DESC"));

        assert_eq!(
            pageable.sort,
            vec![
                Order::desc("price_nuc"),
                Order::asc("name"),
                Order::desc("first_name"),
                Order::desc("last_name"),
            ]
        );
    }

    #[test]
    fn parse_ignores_bare_directions() {
        let settings = PaginationSettings::default();
        assert!(settings.parse(Some("sort=desc&sort=,")).sort.is_empty());
    }

    #[test]
    fn parse_decodes_percent_encoding() {
        let settings = PaginationSettings::default();
        let pageable = settings.parse(Some("sort=name%2Cdesc"));
        assert_eq!(pageable.sort, vec![Order::desc("name")]);
    }
}
