use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use cached::{Cached, TimedSizedCache};
use tracing::debug;
use uuid::Uuid;

use super::machine::FormMachine;
use crate::config::FormsConfig;
use crate::executors::Executor;

/// Live form instances of one form type, keyed by the `form_id` embedded in
/// the rendered page.
///
/// Instances live in a bounded cache with a fixed lifespan, so abandoned
/// forms do not accumulate.
pub struct FormRegistry<E: Executor> {
    executor: Arc<E>,
    success_path: String,
    forms: Mutex<TimedSizedCache<Uuid, Arc<FormMachine<E>>>>,
}

impl<E: Executor> FormRegistry<E> {
    pub fn new(executor: E, success_path: impl Into<String>, config: &FormsConfig) -> Self {
        FormRegistry {
            executor: Arc::new(executor),
            success_path: success_path.into(),
            forms: Mutex::new(TimedSizedCache::with_size_and_lifespan(
                config.capacity.max(1),
                config.lifespan_seconds,
            )),
        }
    }

    pub fn executor(&self) -> &Arc<E> {
        &self.executor
    }

    /// A fresh id for a newly rendered form.
    pub fn issue_id(&self) -> Uuid {
        Uuid::new_v4()
    }

    /// The machine for `id`, created on first use.
    pub fn instance(&self, id: Uuid) -> Arc<FormMachine<E>> {
        let mut forms = self.forms();
        let machine = forms.cache_get_or_set_with(id, || {
            debug!("creating form instance {}", id);
            Arc::new(FormMachine::new(
                Arc::clone(&self.executor),
                self.success_path.clone(),
            ))
        });
        Arc::clone(machine)
    }

    /// Drops the instance for `id`; the next render starts from a clean form.
    pub fn forget(&self, id: &Uuid) {
        self.forms().cache_remove(id);
    }

    pub fn len(&self) -> usize {
        self.forms().cache_size()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn forms(&self) -> MutexGuard<'_, TimedSizedCache<Uuid, Arc<FormMachine<E>>>> {
        self.forms.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Parses a submitted `form_id`, issuing a new one when it is missing or
/// malformed.
pub fn parse_form_id(raw: Option<&str>) -> Uuid {
    raw.and_then(|s| Uuid::parse_str(s.trim()).ok())
        .unwrap_or_else(Uuid::new_v4)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IdentityConfig;
    use crate::executors::AccessExecutor;

    fn registry(capacity: usize) -> FormRegistry<AccessExecutor> {
        let identity = IdentityConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            login_path: "/auth/login".to_string(),
            access_path: "/api/request-access".to_string(),
            token_field: "accessToken".to_string(),
            timeout_in_ms: 100,
        };
        FormRegistry::new(
            AccessExecutor::new(&identity),
            "/access-requested",
            &FormsConfig {
                capacity,
                lifespan_seconds: 60,
            },
        )
    }

    #[test]
    fn same_id_yields_same_instance() {
        let registry = registry(10);
        let id = registry.issue_id();
        let a = registry.instance(id);
        let b = registry.instance(id);
        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &registry.instance(registry.issue_id())));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn forget_starts_over() {
        let registry = registry(10);
        let id = registry.issue_id();
        let a = registry.instance(id);
        registry.forget(&id);
        assert!(registry.is_empty());
        assert!(!Arc::ptr_eq(&a, &registry.instance(id)));
    }

    #[test]
    fn capacity_is_bounded() {
        let registry = registry(2);
        for _ in 0..5 {
            registry.instance(registry.issue_id());
        }
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn form_ids_are_parsed_or_issued() {
        let id = Uuid::new_v4();
        assert_eq!(parse_form_id(Some(&id.to_string())), id);
        assert_ne!(parse_form_id(Some("garbage")), id);
        assert_ne!(parse_form_id(None), parse_form_id(None));
    }
}
