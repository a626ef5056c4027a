//! Process-wide provider for app-scoped client instances: initialized once,
//! read many times. Components resolve their client through
//! [`get_entrolytics`]; nothing here is required — every API also accepts an
//! explicit client reference.

mod registry;

pub use registry::{
    delete_entrolytics, get_entrolytics, init_entrolytics, ScopeSettings, DEFAULT_SCOPE_NAME,
};
