use std::sync::Arc;

use tracing::debug;

use super::entry::normalize_scope;
use super::{BoxedMiddleware, Sink};

#[derive(Clone)]
pub(crate) struct Layer {
    scope: Option<String>,
    pub(crate) middleware: BoxedMiddleware,
}

impl Layer {
    /// Case-insensitive prefix match on segment boundaries: `/one` covers
    /// `/one`, `/ONE` and `/one/two`, never `/onetwo`.
    pub(crate) fn applies_to(&self, path: &str) -> bool {
        let Some(scope) = self.scope.as_deref() else {
            return true;
        };
        if scope == "/" {
            return true;
        }
        let (scope, path) = (scope.as_bytes(), path.as_bytes());
        if path.len() < scope.len() || !path[..scope.len()].eq_ignore_ascii_case(scope) {
            return false;
        }
        matches!(path.get(scope.len()), None | Some(b'/'))
    }
}

/// The committed middleware stack of an [`App`](crate::App).
///
/// Layers run in registration order. The list sits behind an `Arc` so each
/// request only bumps a reference count to walk it.
#[derive(Clone, Default)]
pub struct Stack {
    layers: Arc<Vec<Layer>>,
}

impl Stack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize { self.layers.len() }
    pub fn is_empty(&self) -> bool { self.layers.is_empty() }

    pub(crate) fn layers(&self) -> Arc<Vec<Layer>> {
        Arc::clone(&self.layers)
    }

    fn push(&mut self, layer: Layer) {
        Arc::make_mut(&mut self.layers).push(layer);
    }
}

impl Sink for Stack {
    fn register_global(&mut self, middleware: BoxedMiddleware) {
        debug!(position = self.layers.len(), "global middleware registered");
        self.push(Layer { scope: None, middleware });
    }

    fn register_scoped(&mut self, path: &str, middleware: BoxedMiddleware) {
        let scope = normalize_scope(path);
        debug!(position = self.layers.len(), scope = %scope, "scoped middleware registered");
        self.push(Layer { scope: Some(scope), middleware });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::{Middleware, Next};
    use crate::{Request, Response};

    async fn noop(req: Request, next: Next) -> Response {
        next.run(req).await
    }

    fn layer(scope: Option<&str>) -> Layer {
        Layer {
            scope: scope.map(normalize_scope),
            middleware: noop.into_boxed_middleware(),
        }
    }

    #[test]
    fn unscoped_layer_applies_everywhere() {
        let l = layer(None);
        assert!(l.applies_to("/"));
        assert!(l.applies_to("/anything/at/all"));
    }

    #[test]
    fn scoped_layer_matches_on_segment_boundaries() {
        let l = layer(Some("/one"));
        assert!(l.applies_to("/one"));
        assert!(l.applies_to("/one/"));
        assert!(l.applies_to("/one/two"));
        assert!(l.applies_to("/ONE"));
        assert!(l.applies_to("/One/two"));
        assert!(!l.applies_to("/"));
        assert!(!l.applies_to("/ONETWO"));
        assert!(!l.applies_to("/onetwo"));
        assert!(!l.applies_to("/two/one"));
    }

    #[test]
    fn root_scope_matches_everything() {
        assert!(layer(Some("/")).applies_to("/deep/path"));
    }

    #[test]
    fn registrations_keep_order_and_scope() {
        let mut stack = Stack::new();
        stack.register_global(noop.into_boxed_middleware());
        stack.register_scoped("admin", noop.into_boxed_middleware());

        assert_eq!(stack.len(), 2);
        assert_eq!(stack.layers[0].scope, None);
        assert_eq!(stack.layers[1].scope.as_deref(), Some("/admin"));
    }

    #[test]
    fn snapshot_is_not_affected_by_later_registrations() {
        let mut stack = Stack::new();
        stack.register_global(noop.into_boxed_middleware());
        let snapshot = stack.layers();

        stack.register_global(noop.into_boxed_middleware());
        assert_eq!(snapshot.len(), 1);
        assert_eq!(stack.len(), 2);
    }
}
