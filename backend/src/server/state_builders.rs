//! Builders wiring adapters into services and services into [`HttpState`].

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};

use meal_backend::domain::ports::{
    MealRepository, MenuRepository, OrderRepository, PasswordHasher, TokenIssuer, UserRepository,
};
use meal_backend::domain::{
    AccountService, CatalogService, MenuService, OrderService, OrderVisibility,
};
use meal_backend::inbound::http::state::{HttpState, HttpStatePorts};
use meal_backend::outbound::memory::InMemoryStore;
use meal_backend::outbound::persistence::{
    DieselMealRepository, DieselMenuRepository, DieselOrderRepository, DieselUserRepository,
};
use meal_backend::outbound::security::Argon2PasswordHasher;

use super::ServerConfig;

/// One repository adapter per driven port.
struct Repositories<U, M, Mn, O> {
    users: Arc<U>,
    meals: Arc<M>,
    menu: Arc<Mn>,
    orders: Arc<O>,
}

/// Cross-cutting collaborators shared by every service.
struct Collaborators {
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenIssuer>,
    clock: Arc<dyn Clock>,
    visibility: OrderVisibility,
}

fn assemble<U, M, Mn, O>(repos: Repositories<U, M, Mn, O>, shared: Collaborators) -> HttpState
where
    U: UserRepository + 'static,
    M: MealRepository + 'static,
    Mn: MenuRepository + 'static,
    O: OrderRepository + 'static,
{
    let Collaborators {
        hasher,
        tokens,
        clock,
        visibility,
    } = shared;
    let accounts = Arc::new(AccountService::new(repos.users, hasher, tokens, clock.clone()));
    HttpState::new(HttpStatePorts {
        accounts: accounts.clone(),
        identity: accounts,
        catalog: Arc::new(CatalogService::new(repos.meals, clock.clone())),
        menu: Arc::new(MenuService::new(repos.menu, clock.clone())),
        orders: Arc::new(OrderService::new(repos.orders, clock, visibility)),
    })
}

/// Build handler state from the server configuration.
///
/// Diesel adapters are used when a pool is configured; otherwise every port
/// is served by one shared [`InMemoryStore`], so its contents live and die
/// with the process.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let shared = Collaborators {
        hasher: Arc::new(Argon2PasswordHasher::new()),
        tokens: Arc::new(config.tokens.clone()),
        clock: Arc::new(DefaultClock),
        visibility: config.visibility,
    };
    let state = match &config.db_pool {
        Some(pool) => assemble(
            Repositories {
                users: Arc::new(DieselUserRepository::new(pool.clone())),
                meals: Arc::new(DieselMealRepository::new(pool.clone())),
                menu: Arc::new(DieselMenuRepository::new(pool.clone())),
                orders: Arc::new(DieselOrderRepository::new(pool.clone())),
            },
            shared,
        ),
        None => {
            let store = Arc::new(InMemoryStore::new());
            assemble(
                Repositories {
                    users: store.clone(),
                    meals: store.clone(),
                    menu: store.clone(),
                    orders: store,
                },
                shared,
            )
        }
    };
    web::Data::new(state)
}
