//! Response wrapper for list operations.
//!
//! [`ListResponse<T, P>`] combines the decoded objects of one page with the
//! page's pagination descriptor. It implements `Deref<Target = Vec<T>>`, so
//! it can be used like the object list directly:
//!
//! ```rust,ignore
//! let page: ListResponse<Widget> = node.get_list::<Widget>(0, 0, &[], false).await?;
//!
//! for widget in page.iter() {
//!     println!("{}", widget.name);
//! }
//!
//! if let Some(offset) = page.next_offset() {
//!     let next = node.get_list::<Widget>(offset, 0, &[], false).await?;
//! }
//! ```

use std::ops::{Deref, DerefMut};

use crate::rest::pagination::{DefaultPagination, Pagination};

/// One page of a list response.
#[derive(Debug, Clone)]
pub struct ListResponse<T, P = DefaultPagination> {
    objects: Vec<T>,
    pagination: P,
}

impl<T, P: Pagination> ListResponse<T, P> {
    /// Creates a page.
    #[must_use]
    pub const fn new(pagination: P, objects: Vec<T>) -> Self {
        Self {
            objects,
            pagination,
        }
    }

    /// Returns the pagination descriptor.
    #[must_use]
    pub const fn pagination(&self) -> &P {
        &self.pagination
    }

    /// Returns `true` if another page follows.
    #[must_use]
    pub fn has_next_page(&self) -> bool {
        self.pagination.has_next_page()
    }

    /// Offset of the next page, if any.
    #[must_use]
    pub fn next_offset(&self) -> Option<u64> {
        self.pagination.next_offset()
    }

    /// Consumes the page, returning the objects.
    #[must_use]
    pub fn into_inner(self) -> Vec<T> {
        self.objects
    }

    /// Consumes the page, returning pagination and objects.
    #[must_use]
    pub fn into_parts(self) -> (P, Vec<T>) {
        (self.pagination, self.objects)
    }

    /// Maps the objects while keeping the pagination.
    #[must_use]
    pub fn map<U, F>(self, f: F) -> ListResponse<U, P>
    where
        F: FnMut(T) -> U,
    {
        ListResponse {
            objects: self.objects.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }
}

impl<T, P> Deref for ListResponse<T, P> {
    type Target = Vec<T>;

    fn deref(&self) -> &Self::Target {
        &self.objects
    }
}

impl<T, P> DerefMut for ListResponse<T, P> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.objects
    }
}

impl<T, P> IntoIterator for ListResponse<T, P> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.objects.into_iter()
    }
}
