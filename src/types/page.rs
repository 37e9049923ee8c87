use serde::{Deserialize, Deserializer};

pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Zero-based page selection sent as `?page=&size=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    pub fn new(page: u32, size: u32) -> Self {
        Self { page, size }
    }

    pub(crate) fn query(&self) -> [(&'static str, String); 2] {
        [("page", self.page.to_string()), ("size", self.size.to_string())]
    }
}

/// Paging metadata normalized from whatever shape the backend returned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageInfo {
    pub total_pages: u32,
    pub total_elements: u64,
    pub current_page: u32,
    pub page_size: u32,
}

/// One page of results.
///
/// Deserializes from either a paged body (`content`, `totalPages`, `totalElements`,
/// `pageable`) or a bare JSON array. Missing or zero metadata falls back to a single
/// page holding every returned item.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub info: PageInfo,
}

impl<T> Page<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PageBody<T> {
    Paged(PagedBody<T>),
    Plain(Vec<T>),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PagedBody<T> {
    content: Vec<T>,
    #[serde(default)]
    total_pages: Option<u32>,
    #[serde(default)]
    total_elements: Option<u64>,
    #[serde(default)]
    pageable: Option<Pageable>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Pageable {
    #[serde(default)]
    page_number: Option<u32>,
    #[serde(default)]
    page_size: Option<u32>,
}

fn saturating_count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

fn non_zero<N: Default + PartialEq>(n: Option<N>) -> Option<N> {
    n.filter(|v| *v != N::default())
}

impl<T> From<PageBody<T>> for Page<T> {
    fn from(body: PageBody<T>) -> Self {
        match body {
            PageBody::Paged(paged) => {
                let count = paged.content.len();
                let (page_number, page_size) = paged
                    .pageable
                    .map(|p| (p.page_number, p.page_size))
                    .unwrap_or((None, None));
                Page {
                    info: PageInfo {
                        total_pages: non_zero(paged.total_pages).unwrap_or(1),
                        total_elements: non_zero(paged.total_elements).unwrap_or(count as u64),
                        current_page: page_number.unwrap_or(0),
                        page_size: non_zero(page_size).unwrap_or(saturating_count(count)),
                    },
                    items: paged.content,
                }
            }
            PageBody::Plain(items) => Page {
                info: PageInfo {
                    total_pages: 1,
                    total_elements: items.len() as u64,
                    current_page: 0,
                    page_size: saturating_count(items.len()),
                },
                items,
            },
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Page<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        PageBody::<T>::deserialize(deserializer).map(Page::from)
    }
}
