use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, PoisonError, RwLock,
};

use log::debug;

use super::CallbackHandler;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RouteHandle(u64);

struct Route {
    handle: RouteHandle,
    prefix: String,
    handler: CallbackHandler,
}

/// Prefix routes of callback data, shared between clones
#[derive(Clone, Default)]
pub struct RouteTable {
    routes: Arc<RwLock<Vec<Route>>>,
    next_id: Arc<AtomicU64>,
}

impl RouteTable {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn register(&self, prefix: &str, handler: CallbackHandler) -> RouteHandle {
        let handle = RouteHandle(self.next_id.fetch_add(1, Ordering::Relaxed));
        debug!("Registering callback route {handle:?} for prefix {prefix}");

        self.routes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Route {
                handle,
                prefix: prefix.to_string(),
                handler,
            });

        handle
    }

    pub fn unregister(&self, handle: RouteHandle) -> bool {
        let mut routes = self.routes.write().unwrap_or_else(PoisonError::into_inner);
        let len = routes.len();
        routes.retain(|r| r.handle != handle);

        routes.len() != len
    }

    /// first registered route whose prefix matches
    pub fn find(&self, data: &str) -> Option<CallbackHandler> {
        self.routes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|r| data.starts_with(r.prefix.as_str()))
            .map(|r| Arc::clone(&r.handler))
    }

    pub fn len(&self) -> usize {
        self.routes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
