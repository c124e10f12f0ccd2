//! Explicit partial changes to an entity.
//!
//! A [`Patch`] overwrites some fields of a cloned entity and leaves the rest
//! alone. There is no deep merge: a patch that sets a nested struct replaces
//! that struct wholesale. Closures taking `&mut T` are patches, and so are
//! application-defined change structs:
//!
//! ```
//! use collate_foundation::Patch;
//!
//! #[derive(Clone)]
//! struct Book {
//!     title: String,
//!     pages: u32,
//! }
//!
//! struct BookChanges {
//!     title: Option<String>,
//!     pages: Option<u32>,
//! }
//!
//! impl Patch<Book> for BookChanges {
//!     fn apply_to(&self, book: &mut Book) {
//!         if let Some(title) = &self.title {
//!             book.title.clone_from(title);
//!         }
//!         if let Some(pages) = self.pages {
//!             book.pages = pages;
//!         }
//!     }
//! }
//!
//! let mut book = Book { title: "Dune".into(), pages: 412 };
//! BookChanges { title: None, pages: Some(896) }.apply_to(&mut book);
//! assert_eq!(book.pages, 896);
//! assert_eq!(book.title, "Dune");
//! ```

/// A field-wise change applied to an entity.
pub trait Patch<T> {
    /// Applies the change to `entity` in place.
    fn apply_to(&self, entity: &mut T);
}

impl<T, F> Patch<T> for F
where
    F: Fn(&mut T),
{
    fn apply_to(&self, entity: &mut T) {
        self(entity);
    }
}

/// A change addressed to the entity stored under `id`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Update<Id, P> {
    /// Id the entity is currently stored under.
    pub id: Id,
    /// Changes to apply.
    pub changes: P,
}

impl<Id, P> Update<Id, P> {
    /// Creates a new update.
    #[must_use]
    pub fn new(id: Id, changes: P) -> Self {
        Self { id, changes }
    }
}
