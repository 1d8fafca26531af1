use super::BoxedMiddleware;

/// Receives middlewares, in order, when a [`Registry`](super::Registry) is
/// committed.
///
/// [`Stack`](super::Stack) is the implementation an [`App`](crate::App)
/// commits into. Other implementations are mostly useful in tests, to record
/// what a commit produced.
pub trait Sink {
    /// Installs `middleware` for every request.
    fn register_global(&mut self, middleware: BoxedMiddleware);

    /// Installs `middleware` for requests whose path falls under `path`.
    fn register_scoped(&mut self, path: &str, middleware: BoxedMiddleware);

    /// Operator-visible, non-fatal diagnostic.
    fn warn(&mut self, message: &str) {
        tracing::warn!("{message}");
    }
}
