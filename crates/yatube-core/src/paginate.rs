//! Fixed-size pagination over an ordered record set.
//!
//! Paging is split in two steps so the store only ever loads one page:
//! [`Paginator::window`] turns the raw `?page=` value and the total count into
//! an offset/limit pair, and [`Paginator::page`] wraps the fetched rows.

use serde::Serialize;

use crate::{Error, Result};

/// Posts per page when nothing else is configured.
pub const DEFAULT_PAGE_SIZE: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
  per_page: u64,
}

/// The slice of the record set a page covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
  /// 1-based page number, always valid for the count it was resolved against.
  pub number: u64,
  pub offset: u64,
  pub limit:  u64,
}

impl Default for Paginator {
  fn default() -> Self {
    Self { per_page: DEFAULT_PAGE_SIZE }
  }
}

impl Paginator {
  pub fn new(per_page: u64) -> Result<Self> {
    if per_page == 0 {
      return Err(Error::ZeroPageSize);
    }
    Ok(Self { per_page })
  }

  /// `ceil(count / per_page)`; zero for an empty record set.
  pub fn num_pages(&self, count: u64) -> u64 { count.div_ceil(self.per_page) }

  /// Resolve the requested page against `count` records.
  ///
  /// A missing or blank value means page 1. Anything that is not a page
  /// number in `1..=last` (non-numeric, zero, negative, past the end) falls
  /// back to the last page instead of failing. An empty record set still has
  /// a (blank) page 1.
  pub fn window(&self, requested: Option<&str>, count: u64) -> PageWindow {
    let last = self.num_pages(count).max(1);
    let number = match requested.map(str::trim) {
      None | Some("") => 1,
      Some(raw) => match raw.parse::<u64>() {
        Ok(n) if (1..=last).contains(&n) => n,
        _ => last,
      },
    };

    PageWindow {
      number,
      offset: (number - 1) * self.per_page,
      limit: self.per_page,
    }
  }

  /// Wrap the rows fetched for `window` into a [`Page`].
  pub fn page<T>(&self, window: PageWindow, count: u64, items: Vec<T>) -> Page<T> {
    Page {
      items,
      number: window.number,
      count,
      num_pages: self.num_pages(count),
      per_page: self.per_page,
    }
  }
}

// ─── Page ────────────────────────────────────────────────────────────────────

/// One page of results plus what is needed to render navigation links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
  pub items:     Vec<T>,
  /// 1-based.
  pub number:    u64,
  /// Total number of records across all pages.
  pub count:     u64,
  pub num_pages: u64,
  pub per_page:  u64,
}

impl<T> Page<T> {
  pub fn has_next(&self) -> bool { self.number < self.num_pages }

  pub fn has_previous(&self) -> bool { self.number > 1 }

  pub fn has_other_pages(&self) -> bool { self.has_next() || self.has_previous() }

  pub fn next_page_number(&self) -> Option<u64> {
    self.has_next().then(|| self.number + 1)
  }

  pub fn previous_page_number(&self) -> Option<u64> {
    self.has_previous().then(|| self.number - 1)
  }

  pub fn is_empty(&self) -> bool { self.items.is_empty() }

  /// Convert the items while keeping the page metadata.
  pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
    Page {
      items:     self.items.into_iter().map(f).collect(),
      number:    self.number,
      count:     self.count,
      num_pages: self.num_pages,
      per_page:  self.per_page,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn records(n: u64) -> Vec<u64> { (0..n).collect() }

  /// Window an in-memory record set the way the store windows a query.
  fn paginate(p: &Paginator, requested: Option<&str>, records: Vec<u64>) -> Page<u64> {
    let count = records.len() as u64;
    let window = p.window(requested, count);
    let items = records
      .into_iter()
      .skip(window.offset as usize)
      .take(window.limit as usize)
      .collect();
    p.page(window, count, items)
  }

  #[test]
  fn thirteen_records_split_ten_and_three() {
    let p = Paginator::default();

    let first = paginate(&p, None, records(13));
    assert_eq!(first.items.len(), 10);
    assert_eq!(first.number, 1);
    assert_eq!(first.num_pages, 2);
    assert!(first.has_next());
    assert!(!first.has_previous());
    assert_eq!(first.next_page_number(), Some(2));

    let second = paginate(&p, Some("2"), records(13));
    assert_eq!(second.items, vec![10, 11, 12]);
    assert!(!second.has_next());
    assert_eq!(second.previous_page_number(), Some(1));
  }

  #[test]
  fn page_counts_and_last_page_sizes() {
    for per_page in 1..=12 {
      let p = Paginator::new(per_page).unwrap();
      for n in 0..=40 {
        assert_eq!(p.num_pages(n), n.div_ceil(per_page), "n={n} p={per_page}");

        let last = paginate(&p, Some("999"), records(n));
        let expected = match n {
          0 => 0,
          _ if n % per_page == 0 => per_page,
          _ => n % per_page,
        };
        assert_eq!(last.items.len() as u64, expected, "n={n} p={per_page}");
      }
    }
  }

  #[test]
  fn out_of_range_and_garbage_fall_back_to_last_page() {
    let p = Paginator::default();
    for raw in ["3", "100", "0", "-1", "abc", "1.5"] {
      let window = p.window(Some(raw), 25);
      assert_eq!(window.number, 3, "raw={raw:?}");
      assert_eq!(window.offset, 20);
    }
  }

  #[test]
  fn missing_or_blank_means_first_page() {
    let p = Paginator::default();
    assert_eq!(p.window(None, 25).number, 1);
    assert_eq!(p.window(Some(""), 25).number, 1);
    assert_eq!(p.window(Some(" 2 "), 25).number, 2);
  }

  #[test]
  fn empty_set_yields_empty_first_page() {
    let page = paginate(&Paginator::default(), Some("5"), records(0));
    assert!(page.is_empty());
    assert_eq!(page.number, 1);
    assert_eq!(page.count, 0);
    assert!(!page.has_other_pages());
  }

  #[test]
  fn zero_page_size_is_rejected() {
    assert!(matches!(Paginator::new(0), Err(Error::ZeroPageSize)));
  }
}
