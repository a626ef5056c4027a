use std::collections::HashMap;
use std::sync::{Arc, LazyLock, Mutex};

use crate::analytics::error::{
    duplicate_scope, invalid_argument, not_initialized, EntrolyticsResult,
};
use crate::analytics::{Entrolytics, EntrolyticsConfig};

pub const DEFAULT_SCOPE_NAME: &str = "[DEFAULT]";

/// Settings for a provider scope. The name distinguishes multiple clients in
/// one process; most applications never set it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScopeSettings {
    pub name: Option<String>,
}

static SCOPES: LazyLock<Mutex<HashMap<String, Arc<Entrolytics>>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

fn normalize_name(settings: &ScopeSettings) -> EntrolyticsResult<String> {
    let name = settings
        .name
        .clone()
        .unwrap_or_else(|| DEFAULT_SCOPE_NAME.to_string());
    if name.trim().is_empty() {
        return Err(invalid_argument(format!("Illegal scope name: '{name}'")));
    }
    Ok(name)
}

/// Creates, connects, and registers a client under a scope name.
///
/// Re-initializing a scope with an equal configuration returns the existing
/// client; a different configuration is an error.
pub fn init_entrolytics(
    config: EntrolyticsConfig,
    settings: Option<ScopeSettings>,
) -> EntrolyticsResult<Arc<Entrolytics>> {
    let settings = settings.unwrap_or_default();
    let name = normalize_name(&settings)?;

    let mut scopes = SCOPES.lock().unwrap();
    if let Some(existing) = scopes.get(&name) {
        if existing.config() == &config {
            return Ok(existing.clone());
        }
        return Err(duplicate_scope(format!(
            "Entrolytics scope '{name}' already exists with a different configuration"
        )));
    }

    let client = Entrolytics::new(config)?;
    client.connect()?;
    let client = Arc::new(client);
    scopes.insert(name, client.clone());
    Ok(client)
}

/// Accessor used by components and page code. `None` resolves the default
/// scope.
pub fn get_entrolytics(name: Option<&str>) -> EntrolyticsResult<Arc<Entrolytics>> {
    let name = name.unwrap_or(DEFAULT_SCOPE_NAME);
    SCOPES
        .lock()
        .unwrap()
        .get(name)
        .cloned()
        .ok_or_else(|| {
            not_initialized(format!(
                "No Entrolytics scope named '{name}' - call init_entrolytics() first"
            ))
        })
}

/// Removes a scope. Clients already handed out keep working; only the
/// registry entry is dropped.
pub fn delete_entrolytics(name: Option<&str>) -> bool {
    let name = name.unwrap_or(DEFAULT_SCOPE_NAME);
    SCOPES.lock().unwrap().remove(name).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unique_settings() -> ScopeSettings {
        use std::sync::atomic::{AtomicUsize, Ordering};
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        ScopeSettings {
            name: Some(format!("scope-{}", COUNTER.fetch_add(1, Ordering::SeqCst))),
        }
    }

    fn test_config() -> EntrolyticsConfig {
        EntrolyticsConfig::new("site-1", "https://stats.example.com")
    }

    #[test]
    fn init_registers_a_ready_client() {
        let settings = unique_settings();
        let client = init_entrolytics(test_config(), Some(settings.clone())).unwrap();
        assert!(client.is_ready());

        let fetched = get_entrolytics(settings.name.as_deref()).unwrap();
        assert!(Arc::ptr_eq(&client, &fetched));
    }

    #[test]
    fn equal_config_returns_existing_client() {
        let settings = unique_settings();
        let first = init_entrolytics(test_config(), Some(settings.clone())).unwrap();
        let second = init_entrolytics(test_config(), Some(settings)).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn different_config_is_a_duplicate() {
        let settings = unique_settings();
        init_entrolytics(test_config(), Some(settings.clone())).unwrap();
        let other = EntrolyticsConfig::new("site-2", "https://stats.example.com");
        let err = init_entrolytics(other, Some(settings)).unwrap_err();
        assert_eq!(err.code_str(), "entrolytics/duplicate-scope");
    }

    #[test]
    fn missing_scope_reports_not_initialized() {
        let err = get_entrolytics(Some("nope")).unwrap_err();
        assert_eq!(err.code_str(), "entrolytics/not-initialized");
    }

    #[test]
    fn empty_scope_name_is_rejected() {
        let settings = ScopeSettings {
            name: Some("  ".into()),
        };
        let err = init_entrolytics(test_config(), Some(settings)).unwrap_err();
        assert_eq!(err.code_str(), "entrolytics/invalid-argument");
    }

    #[test]
    fn delete_removes_the_scope() {
        let settings = unique_settings();
        init_entrolytics(test_config(), Some(settings.clone())).unwrap();
        assert!(delete_entrolytics(settings.name.as_deref()));
        assert!(!delete_entrolytics(settings.name.as_deref()));
    }
}
