//! Pagination response headers
//!
//! `X-Total-Count` carries the unpaged match count. `Link` carries
//! `next`/`prev`/`last`/`first` URLs that keep every other query parameter
//! of the request.

use axum::http::{HeaderMap, HeaderName, HeaderValue, Uri, header};

use crate::core::constants::HEADER_TOTAL_COUNT;
use crate::data::traits::Page;

/// Build `X-Total-Count` and `Link` headers for `page`
pub fn pagination_headers<E>(uri: &Uri, page: &Page<E>) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        HeaderName::from_static(HEADER_TOTAL_COUNT),
        HeaderValue::from(page.total),
    );

    let link = link_header(uri, page);
    match HeaderValue::from_str(&link) {
        Ok(value) => {
            headers.insert(header::LINK, value);
        }
        Err(e) => tracing::warn!(error = %e, "Skipping unencodable Link header"),
    }
    headers
}

fn link_header<E>(uri: &Uri, page: &Page<E>) -> String {
    let path = uri.path();
    // Keep the raw (still encoded) pairs other than page and size
    let kept: Vec<&str> = uri
        .query()
        .unwrap_or_default()
        .split('&')
        .filter(|pair| {
            let key = pair.split('=').next().unwrap_or_default();
            !pair.is_empty() && key != "page" && key != "size"
        })
        .collect();

    let url_for = |number: u64| {
        let mut query = format!("page={}&size={}", number, page.size);
        for pair in &kept {
            query.push('&');
            query.push_str(pair);
        }
        format!("{}?{}", path, query)
    };

    let last = page.total_pages().saturating_sub(1);
    let current = page.page as u64;
    let mut links = Vec::with_capacity(4);
    if page.has_next() {
        links.push(format!("<{}>; rel=\"next\"", url_for(current + 1)));
    }
    if page.has_previous() {
        links.push(format!("<{}>; rel=\"prev\"", url_for(current - 1)));
    }
    links.push(format!("<{}>; rel=\"last\"", url_for(last)));
    links.push(format!("<{}>; rel=\"first\"", url_for(0)));
    links.join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(page: u32, size: u32, total: u64) -> Page<()> {
        Page {
            content: Vec::new(),
            total,
            page,
            size,
        }
    }

    #[test]
    fn test_middle_page_links() {
        let uri: Uri = "/api/patients?name.contains=jo&page=1&size=2".parse().unwrap();
        let headers = pagination_headers(&uri, &page(1, 2, 7));

        assert_eq!(headers.get(HEADER_TOTAL_COUNT).unwrap(), "7");
        let link = headers.get(header::LINK).unwrap().to_str().unwrap();
        assert_eq!(
            link,
            "</api/patients?page=2&size=2&name.contains=jo>; rel=\"next\",\
             </api/patients?page=0&size=2&name.contains=jo>; rel=\"prev\",\
             </api/patients?page=3&size=2&name.contains=jo>; rel=\"last\",\
             </api/patients?page=0&size=2&name.contains=jo>; rel=\"first\""
        );
    }

    #[test]
    fn test_first_page_has_no_prev() {
        let uri: Uri = "/api/hospitals".parse().unwrap();
        let link = link_header(&uri, &page(0, 20, 45));
        assert!(link.contains("rel=\"next\""));
        assert!(!link.contains("rel=\"prev\""));
        assert!(link.contains("</api/hospitals?page=2&size=20>; rel=\"last\""));
    }

    #[test]
    fn test_empty_result_links_to_page_zero() {
        let uri: Uri = "/api/providers?sort=name,desc".parse().unwrap();
        let link = link_header(&uri, &page(0, 20, 0));
        assert_eq!(
            link,
            "</api/providers?page=0&size=20&sort=name,desc>; rel=\"last\",\
             </api/providers?page=0&size=20&sort=name,desc>; rel=\"first\""
        );
    }
}
