use std::fmt;

use super::{BoxedMiddleware, Middleware};

/// A named middleware, the unit the [`Registry`](super::Registry) orders.
///
/// The name addresses the entry in [`before`](super::Registry::before) and
/// [`after`](super::Registry::after) and must be unique within a registry.
/// An entry with a [`path`](Entry::path) only runs for requests under that
/// prefix; without one it runs for every request.
#[derive(Clone)]
pub struct Entry {
    name: String,
    path: Option<String>,
    middleware: BoxedMiddleware,
}

impl Entry {
    pub fn new(name: impl Into<String>, middleware: impl Middleware) -> Self {
        Self {
            name: name.into(),
            path: None,
            middleware: middleware.into_boxed_middleware(),
        }
    }

    /// Scopes the entry to `path` and everything below it.
    ///
    /// A missing leading `/` is added and a trailing `/` is dropped, so
    /// `"one/"` and `"/one"` scope the same requests.
    pub fn path(mut self, path: impl AsRef<str>) -> Self {
        self.path = Some(normalize_scope(path.as_ref()));
        self
    }

    pub fn name(&self) -> &str { &self.name }
    pub fn scope(&self) -> Option<&str> { self.path.as_deref() }

    pub(crate) fn into_parts(self) -> (String, Option<String>, BoxedMiddleware) {
        (self.name, self.path, self.middleware)
    }
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("name", &self.name)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

pub(crate) fn normalize_scope(path: &str) -> String {
    let trimmed = path.trim_matches('/');
    let mut scope = String::with_capacity(trimmed.len() + 1);
    scope.push('/');
    scope.push_str(trimmed);
    scope
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::Next;
    use crate::Request;

    async fn noop(req: Request, next: Next) -> crate::Response {
        next.run(req).await
    }

    #[test]
    fn path_is_normalized() {
        assert_eq!(Entry::new("a", noop).path("one/").scope(), Some("/one"));
        assert_eq!(Entry::new("a", noop).path("/one/two").scope(), Some("/one/two"));
        assert_eq!(Entry::new("a", noop).path("/").scope(), Some("/"));
        assert_eq!(Entry::new("a", noop).scope(), None);
    }

    #[test]
    fn debug_shows_name_and_path() {
        let entry = Entry::new("auth", noop).path("/admin");
        let shown = format!("{entry:?}");
        assert!(shown.contains("\"auth\""));
        assert!(shown.contains("\"/admin\""));
    }
}
