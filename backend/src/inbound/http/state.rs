//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and only see driving ports, so
//! they can be exercised against mocks without any I/O.

use std::sync::Arc;

use crate::domain::ports::{AccountCommand, DailyMenu, IdentityResolver, MealCatalog, OrderLedger};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn AccountCommand>,
    pub identity: Arc<dyn IdentityResolver>,
    pub catalog: Arc<dyn MealCatalog>,
    pub menu: Arc<dyn DailyMenu>,
    pub orders: Arc<dyn OrderLedger>,
}

/// Parameter object for [`HttpState::new`].
pub struct HttpStatePorts {
    pub accounts: Arc<dyn AccountCommand>,
    pub identity: Arc<dyn IdentityResolver>,
    pub catalog: Arc<dyn MealCatalog>,
    pub menu: Arc<dyn DailyMenu>,
    pub orders: Arc<dyn OrderLedger>,
}

impl HttpState {
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            accounts,
            identity,
            catalog,
            menu,
            orders,
        } = ports;
        Self {
            accounts,
            identity,
            catalog,
            menu,
            orders,
        }
    }
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}
