//! Test helpers for inbound HTTP components.
//!
//! Handlers are exercised with mockall doubles for the port under test and a
//! fixed-token identity stub, so each test only states the expectations it
//! cares about. Ports left at their defaults panic if called.

use std::sync::Arc;

use actix_web::web;
use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::ports::{
    AccountCommand, DailyMenu, IdentityResolver, MealCatalog, MockAccountCommand, MockDailyMenu,
    MockMealCatalog, MockOrderLedger, OrderLedger,
};
use crate::domain::{Actor, Clearance, Error, UserId, Username};
use crate::inbound::http::state::{HttpState, HttpStatePorts};

pub const CUSTOMER_TOKEN: &str = "customer-token";
pub const CATERER_TOKEN: &str = "caterer-token";

fn fixed_actor(seed: u128, username: &str, clearance: Clearance) -> Actor {
    Actor {
        id: UserId::from_uuid(Uuid::from_u128(seed)),
        username: Username::new(username).expect("fixture username"),
        clearance,
    }
}

/// The actor behind [`CUSTOMER_TOKEN`].
pub fn customer() -> Actor {
    fixed_actor(1, "diner", Clearance::Customer)
}

/// The actor behind [`CATERER_TOKEN`].
pub fn caterer() -> Actor {
    fixed_actor(2, "chef", Clearance::Caterer)
}

/// Resolves the two fixture tokens; everything else is unauthorized.
pub struct StubIdentity;

#[async_trait]
impl IdentityResolver for StubIdentity {
    async fn resolve(&self, token: &str) -> Result<Actor, Error> {
        match token {
            CUSTOMER_TOKEN => Ok(customer()),
            CATERER_TOKEN => Ok(caterer()),
            _ => Err(Error::unauthorized("bearer credential is invalid")),
        }
    }
}

/// Builder for an [`HttpState`] made of doubles.
pub struct TestPorts {
    accounts: Arc<dyn AccountCommand>,
    catalog: Arc<dyn MealCatalog>,
    menu: Arc<dyn DailyMenu>,
    orders: Arc<dyn OrderLedger>,
}

impl Default for TestPorts {
    fn default() -> Self {
        Self {
            accounts: Arc::new(MockAccountCommand::new()),
            catalog: Arc::new(MockMealCatalog::new()),
            menu: Arc::new(MockDailyMenu::new()),
            orders: Arc::new(MockOrderLedger::new()),
        }
    }
}

impl TestPorts {
    pub fn with_accounts(mut self, accounts: MockAccountCommand) -> Self {
        self.accounts = Arc::new(accounts);
        self
    }

    pub fn with_catalog(mut self, catalog: MockMealCatalog) -> Self {
        self.catalog = Arc::new(catalog);
        self
    }

    pub fn with_menu(mut self, menu: MockDailyMenu) -> Self {
        self.menu = Arc::new(menu);
        self
    }

    pub fn with_orders(mut self, orders: MockOrderLedger) -> Self {
        self.orders = Arc::new(orders);
        self
    }

    pub fn state(&self) -> web::Data<HttpState> {
        web::Data::new(HttpState::new(HttpStatePorts {
            accounts: self.accounts.clone(),
            identity: Arc::new(StubIdentity),
            catalog: self.catalog.clone(),
            menu: self.menu.clone(),
            orders: self.orders.clone(),
        }))
    }
}

/// `Authorization` header for `token`.
pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {token}"))
}
