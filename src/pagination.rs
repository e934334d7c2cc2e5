//! Paging through transactions: the page size config, the page indicator and its HTML.

use maud::{Markup, html};

/// The config for pagination
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// The maximum transactions to display per page.
    pub page_size: u64,
    /// The maximum number of pages to show in the pagination indicator.
    pub max_pages: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            page_size: 10,
            max_pages: 5,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum PaginationIndicator {
    Page(u64),
    CurrPage(u64),
    Ellipsis,
    NextButton(u64),
    BackButton(u64),
}

/// The page links to show for `curr_page` out of `page_count` pages.
///
/// Pages are 1-based. At most `max_pages` numbered pages are shown around
/// the current page, with the first and last page always reachable.
pub fn create_pagination_indicators(
    curr_page: u64,
    page_count: u64,
    max_pages: u64,
) -> Vec<PaginationIndicator> {
    let map_page = |page| {
        if page == curr_page {
            PaginationIndicator::CurrPage(page)
        } else {
            PaginationIndicator::Page(page)
        }
    };
    let half = max_pages / 2;

    let visible_pages = if page_count <= max_pages {
        1..=page_count
    } else if curr_page <= half {
        1..=max_pages
    } else if curr_page > page_count - half {
        (page_count - max_pages + 1)..=page_count
    } else {
        (curr_page - half)..=(curr_page + half)
    };
    let mut indicators: Vec<PaginationIndicator> = visible_pages.map(map_page).collect();

    if page_count > max_pages {
        if curr_page > half + 1 {
            indicators.splice(
                0..0,
                [PaginationIndicator::Page(1), PaginationIndicator::Ellipsis],
            );
        }

        if curr_page < page_count - half {
            indicators.extend([
                PaginationIndicator::Ellipsis,
                PaginationIndicator::Page(page_count),
            ]);
        }
    }

    if curr_page > 1 {
        indicators.insert(0, PaginationIndicator::BackButton(curr_page - 1));
    }

    if curr_page < page_count {
        indicators.push(PaginationIndicator::NextButton(curr_page + 1));
    }

    indicators
}

/// The page to show after deleting a row from `page`.
///
/// Deleting the only row on a page other than the first leaves that page
/// empty, so the previous page is shown instead.
pub fn page_after_delete(page: u64, rows_on_page: u64) -> u64 {
    if rows_on_page <= 1 && page > 1 {
        page - 1
    } else {
        page.max(1)
    }
}

/// Render the page indicators as a list of links.
///
/// `page_url` builds the URL for a 1-based page number.
pub fn pagination_html(
    indicators: &[PaginationIndicator],
    page_url: impl Fn(u64) -> String,
) -> Markup {
    const LINK_STYLE: &str = "block px-3 py-2 rounded text-gray-700 hover:bg-gray-200 \
        dark:text-gray-300 dark:hover:bg-gray-700";
    const CURRENT_STYLE: &str = "block px-3 py-2 rounded bg-blue-600 text-white";

    html! {
        nav class="pagination" aria-label="Pagination"
        {
            ul class="flex flex-wrap items-center justify-center gap-1 text-sm"
            {
                @for indicator in indicators {
                    li {
                        @match indicator {
                            PaginationIndicator::CurrPage(page) => {
                                span class=(CURRENT_STYLE) aria-current="page" { (page) }
                            }
                            PaginationIndicator::Page(page) => {
                                a href=(page_url(*page)) class=(LINK_STYLE) { (page) }
                            }
                            PaginationIndicator::Ellipsis => {
                                span class="px-2 text-gray-500" { "..." }
                            }
                            PaginationIndicator::BackButton(page) => {
                                a href=(page_url(*page)) class=(LINK_STYLE) { "Back" }
                            }
                            PaginationIndicator::NextButton(page) => {
                                a href=(page_url(*page)) class=(LINK_STYLE) { "Next" }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};

    use crate::pagination::{
        PaginationIndicator, create_pagination_indicators, page_after_delete, pagination_html,
    };

    #[test]
    fn shows_all_pages() {
        let want = [
            PaginationIndicator::CurrPage(1),
            PaginationIndicator::Page(2),
            PaginationIndicator::Page(3),
            PaginationIndicator::NextButton(2),
        ];

        let got = create_pagination_indicators(1, 3, 5);

        assert_eq!(want, got.as_slice());
    }

    #[test]
    fn single_page_has_no_buttons() {
        let got = create_pagination_indicators(1, 1, 5);

        assert_eq!([PaginationIndicator::CurrPage(1)], got.as_slice());
    }

    #[test]
    fn shows_page_subset_on_left() {
        let want = [
            PaginationIndicator::CurrPage(1),
            PaginationIndicator::Page(2),
            PaginationIndicator::Page(3),
            PaginationIndicator::Page(4),
            PaginationIndicator::Page(5),
            PaginationIndicator::Ellipsis,
            PaginationIndicator::Page(10),
            PaginationIndicator::NextButton(2),
        ];

        let got = create_pagination_indicators(1, 10, 5);

        assert_eq!(want, got.as_slice());
    }

    #[test]
    fn shows_page_subset_on_right() {
        let want = [
            PaginationIndicator::BackButton(9),
            PaginationIndicator::Page(1),
            PaginationIndicator::Ellipsis,
            PaginationIndicator::Page(6),
            PaginationIndicator::Page(7),
            PaginationIndicator::Page(8),
            PaginationIndicator::Page(9),
            PaginationIndicator::CurrPage(10),
        ];

        let got = create_pagination_indicators(10, 10, 5);

        assert_eq!(want, got.as_slice());
    }

    #[test]
    fn shows_page_subset_in_center() {
        let want = [
            PaginationIndicator::BackButton(4),
            PaginationIndicator::Page(1),
            PaginationIndicator::Ellipsis,
            PaginationIndicator::Page(3),
            PaginationIndicator::Page(4),
            PaginationIndicator::CurrPage(5),
            PaginationIndicator::Page(6),
            PaginationIndicator::Page(7),
            PaginationIndicator::Ellipsis,
            PaginationIndicator::Page(10),
            PaginationIndicator::NextButton(6),
        ];

        let got = create_pagination_indicators(5, 10, 5);

        assert_eq!(want, got.as_slice());
    }

    #[test]
    fn deleting_last_row_steps_back_a_page() {
        assert_eq!(page_after_delete(3, 1), 2);
    }

    #[test]
    fn deleting_one_of_many_rows_stays_on_page() {
        assert_eq!(page_after_delete(3, 4), 3);
    }

    #[test]
    fn deleting_last_row_on_first_page_stays_on_first_page() {
        assert_eq!(page_after_delete(1, 1), 1);
        assert_eq!(page_after_delete(0, 1), 1);
    }

    #[test]
    fn renders_links_for_other_pages() {
        let indicators = create_pagination_indicators(2, 3, 5);

        let markup = pagination_html(&indicators, |page| format!("/transactions?page={page}"));

        let html = Html::parse_fragment(&markup.into_string());
        let hrefs: Vec<_> = html
            .select(&Selector::parse("a").unwrap())
            .filter_map(|link| link.value().attr("href"))
            .collect();
        assert_eq!(
            hrefs,
            [
                "/transactions?page=1",
                "/transactions?page=1",
                "/transactions?page=3",
                "/transactions?page=3"
            ]
        );
        let current = html
            .select(&Selector::parse("[aria-current=page]").unwrap())
            .next()
            .unwrap();
        assert_eq!(current.text().collect::<String>(), "2");
    }
}
