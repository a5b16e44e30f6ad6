//! Contract tests for the in-memory store.

use chrono::{NaiveDate, TimeDelta, Utc};
use rstest::{fixture, rstest};

use super::*;
use crate::domain::{
    Clearance, Email, LineItemEdit, MealDraft, OrderRequest, PatchRejection, Quantity,
};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, d).expect("valid date")
}

fn meal(name: &str) -> Meal {
    MealDraft::try_from_parts(name, None, 5.0, None, None)
        .expect("valid draft")
        .into_meal(MealId::random(), UserId::random(), Utc::now())
}

fn stored_user(username: &str, email: Option<&str>) -> StoredUser {
    StoredUser {
        user: User::new(
            UserId::random(),
            Username::new(username).expect("username"),
            email.map(|raw| Email::new(raw).expect("email")),
            Clearance::Customer,
            Utc::now(),
        ),
        password_hash: "$argon2id$stub".to_owned(),
    }
}

fn publication(meal_ids: Vec<MealId>) -> MenuPublication {
    MenuPublication {
        day: day(1),
        meal_ids,
        added_by: UserId::random(),
        created_at: Utc::now(),
    }
}

fn order_for(meals: &[MealId]) -> Order {
    OrderRequest::try_new(meals.iter().map(|id| (*id, 1)))
        .expect("valid request")
        .into_order(OrderId::random(), UserId::random(), day(1), Utc::now())
}

/// Store holding two meals, only the first of which is on the day-1 menu.
#[fixture]
async fn stocked() -> (InMemoryStore, Meal, Meal) {
    let store = InMemoryStore::new();
    let soup = meal("Soup");
    let stew = meal("Stew");
    MealRepository::insert(&store, &soup).await.expect("insert soup");
    MealRepository::insert(&store, &stew).await.expect("insert stew");
    store
        .publish(&publication(vec![soup.id]))
        .await
        .expect("publish soup");
    (store, soup, stew)
}

#[rstest]
#[tokio::test]
async fn duplicate_usernames_are_rejected() {
    let store = InMemoryStore::new();
    UserRepository::insert(&store, &stored_user("ada", None))
        .await
        .expect("first insert");

    let err = UserRepository::insert(&store, &stored_user("ada", None))
        .await
        .expect_err("duplicate");
    assert_eq!(err, UserPersistenceError::duplicate_username("ada"));
}

#[rstest]
#[tokio::test]
async fn duplicate_emails_are_rejected() {
    let store = InMemoryStore::new();
    UserRepository::insert(&store, &stored_user("ada", Some("a@example.com")))
        .await
        .expect("first insert");

    let err = UserRepository::insert(&store, &stored_user("bob", Some("a@example.com")))
        .await
        .expect_err("duplicate");
    assert_eq!(err, UserPersistenceError::duplicate_email("a@example.com"));
}

#[rstest]
#[tokio::test]
async fn deleted_users_are_gone() {
    let store = InMemoryStore::new();
    let stored = stored_user("ada", None);
    UserRepository::insert(&store, &stored).await.expect("insert");

    assert!(UserRepository::delete(&store, stored.user.id()).await.expect("delete"));
    assert!(!UserRepository::delete(&store, stored.user.id()).await.expect("repeat"));
    assert!(store.find_by_id(stored.user.id()).await.expect("lookup").is_none());
}

#[rstest]
#[tokio::test]
async fn retired_meals_disappear_from_reads(#[future] stocked: (InMemoryStore, Meal, Meal)) {
    let (store, soup, stew) = stocked.await;

    assert!(store.retire(&soup.id).await.expect("retire"));
    assert!(!store.retire(&soup.id).await.expect("already retired"));
    assert!(MealRepository::find(&store, &soup.id).await.expect("find").is_none());
    assert_eq!(MealRepository::list(&store).await.expect("list"), vec![stew]);
    assert!(store.entries_for_day(day(1)).await.expect("menu").is_empty());
}

#[rstest]
#[tokio::test]
async fn publishing_is_all_or_nothing(#[future] stocked: (InMemoryStore, Meal, Meal)) {
    let (store, soup, stew) = stocked.await;

    let err = store
        .publish(&publication(vec![stew.id, soup.id]))
        .await
        .expect_err("soup already published");
    assert_eq!(err, MenuPersistenceError::duplicate_menu_entry(soup.id));

    let menu = store.entries_for_day(day(1)).await.expect("menu");
    assert_eq!(menu.len(), 1);
    assert_eq!(menu[0].meal.id, soup.id);
}

#[rstest]
#[tokio::test]
async fn unknown_meals_cannot_be_published(#[future] stocked: (InMemoryStore, Meal, Meal)) {
    let (store, _, stew) = stocked.await;
    let ghost = MealId::random();

    let err = store
        .publish(&publication(vec![stew.id, ghost]))
        .await
        .expect_err("ghost meal");
    assert_eq!(err, MenuPersistenceError::meal_not_found(ghost));
    assert_eq!(store.entries_for_day(day(1)).await.expect("menu").len(), 1);
}

#[rstest]
#[tokio::test]
async fn orders_only_accept_meals_on_the_menu(#[future] stocked: (InMemoryStore, Meal, Meal)) {
    let (store, soup, stew) = stocked.await;

    let err = store
        .place(&order_for(&[soup.id, stew.id]))
        .await
        .expect_err("stew not on menu");
    assert_eq!(err, OrderPersistenceError::meal_not_on_menu(stew.id));
    assert!(OrderRepository::list(&store, None).await.expect("orders").is_empty());

    store.place(&order_for(&[soup.id])).await.expect("soup on menu");
    assert_eq!(OrderRepository::list(&store, None).await.expect("orders").len(), 1);
}

#[rstest]
#[tokio::test]
async fn listing_is_newest_first_and_filters_by_owner(
    #[future] stocked: (InMemoryStore, Meal, Meal),
) {
    let (store, soup, _) = stocked.await;
    let older = order_for(&[soup.id]);
    let mut newer = order_for(&[soup.id]);
    newer.ordered_at = older.ordered_at + TimeDelta::minutes(5);
    store.place(&older).await.expect("older");
    store.place(&newer).await.expect("newer");

    let all = OrderRepository::list(&store, None).await.expect("all");
    assert_eq!(all.iter().map(|o| o.id).collect::<Vec<_>>(), [newer.id, older.id]);

    let mine = OrderRepository::list(&store, Some(older.owner)).await.expect("mine");
    assert_eq!(mine, vec![older]);
}

#[rstest]
#[tokio::test]
async fn updates_recheck_replacement_meals(#[future] stocked: (InMemoryStore, Meal, Meal)) {
    let (store, soup, stew) = stocked.await;
    let order = order_for(&[soup.id]);
    store.place(&order).await.expect("placed");

    let swap = OrderPatch::try_new(
        vec![LineItemEdit {
            position: 0,
            meal_id: Some(stew.id),
            quantity: None,
        }],
        None,
    )
    .expect("valid patch");
    let err = OrderRepository::update(&store, &order.id, &swap).await.expect_err("stew off menu");
    assert_eq!(err, OrderPersistenceError::meal_not_on_menu(stew.id));

    let bump = OrderPatch::try_new(
        vec![LineItemEdit {
            position: 0,
            meal_id: None,
            quantity: Some(Quantity::new(3).expect("quantity")),
        }],
        Some(true),
    )
    .expect("valid patch");
    let updated = OrderRepository::update(&store, &order.id, &bump).await.expect("updated");
    assert_eq!(updated.items[0].quantity.get(), 3);
    assert!(updated.delivered);

    let undo = OrderPatch::try_new(Vec::new(), Some(false)).expect("valid patch");
    let err = OrderRepository::update(&store, &order.id, &undo).await.expect_err("final");
    assert_eq!(err, OrderPersistenceError::rejected(PatchRejection::DeliveryIsFinal));
}

#[rstest]
#[tokio::test]
async fn replacements_are_checked_against_the_order_day(
    #[future] stocked: (InMemoryStore, Meal, Meal),
) {
    let (store, soup, stew) = stocked.await;
    store
        .publish(&MenuPublication {
            day: day(2),
            ..publication(vec![stew.id])
        })
        .await
        .expect("publish stew on day 2");
    let order = order_for(&[soup.id]);
    store.place(&order).await.expect("placed");

    let swap = OrderPatch::try_new(
        vec![LineItemEdit {
            position: 0,
            meal_id: Some(stew.id),
            quantity: Some(Quantity::new(4).expect("quantity")),
        }],
        None,
    )
    .expect("valid patch");
    let err = OrderRepository::update(&store, &order.id, &swap)
        .await
        .expect_err("stew is only on the day-2 menu");
    assert_eq!(err, OrderPersistenceError::meal_not_on_menu(stew.id));

    let stored = OrderRepository::find(&store, &order.id)
        .await
        .expect("find")
        .expect("order still stored");
    assert_eq!(stored, order);
}

#[rstest]
#[tokio::test]
async fn updating_a_missing_order_is_not_found() {
    let store = InMemoryStore::new();
    let id = OrderId::random();
    let patch = OrderPatch::try_new(Vec::new(), Some(true)).expect("valid patch");

    let err = OrderRepository::update(&store, &id, &patch).await.expect_err("missing");
    assert_eq!(err, OrderPersistenceError::order_not_found(id));
}
