//! Slice the ranked sequence into the requested page.

use crate::types::{PaginatedResult, PaginationRequest, ScoredJob};

/// Return page `request.page` of `sorted`.
///
/// `total_pages = ceil(total / page_size)`. A page past the end yields an
/// empty item list with the same `total_pages`; it is not an error.
pub fn paginate(sorted: Vec<ScoredJob>, request: PaginationRequest) -> PaginatedResult {
    let total_count = sorted.len();
    let page_size = request.page_size.max(1);
    let total_pages = total_count.div_ceil(page_size);

    let start = request.page.saturating_sub(1).saturating_mul(page_size);
    let items = if start >= total_count {
        Vec::new()
    } else {
        let end = start.saturating_add(page_size).min(total_count);
        tracing::debug!(
            page = request.page,
            total_pages,
            from = start + 1,
            to = end,
            total_count,
            "returning page"
        );
        sorted.into_iter().skip(start).take(end - start).collect()
    };

    PaginatedResult {
        items,
        total_count,
        page: request.page,
        page_size: request.page_size,
        total_pages,
    }
}
