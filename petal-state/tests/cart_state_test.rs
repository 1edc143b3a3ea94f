// Cart container behavior against the mock backend

mod common;

use common::{FetchGate, MockRemote, product};
use petal_state::storage::{LocalStore, cart_key};
use petal_state::{CartState, MemoryStore, StateError, StateEvents};
use rust_decimal::Decimal;
use shared::models::RemoteCartLine;
use std::sync::Arc;
use std::sync::atomic::Ordering;

fn cart_with(remote: Arc<MockRemote>, store: Arc<MemoryStore>) -> CartState {
    CartState::new(remote, store, StateEvents::default())
}

#[tokio::test]
async fn test_add_requires_identity() {
    let remote = Arc::new(MockRemote::new().with_product(product(7, 100, 10)));
    let cart = cart_with(remote, Arc::new(MemoryStore::new()));

    let err = cart.add_item(&product(7, 100, 10), None, None).await.unwrap_err();
    assert!(matches!(err, StateError::AuthenticationRequired));
    assert!(cart.lines().await.is_empty());
}

#[tokio::test]
async fn test_duplicate_add_increments_instead_of_inserting() {
    // Spec scenario: add {id:7, price:100, offer:10} twice
    let remote = Arc::new(MockRemote::new().with_product(product(7, 100, 10)));
    let cart = cart_with(remote.clone(), Arc::new(MemoryStore::new()));
    cart.set_identity(Some("1".to_string())).await;

    cart.add_item(&product(7, 100, 10), None, None).await.unwrap();
    cart.add_item(&product(7, 100, 10), None, None).await.unwrap();

    let lines = cart.lines().await;
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].quantity, 2);
    assert_eq!(lines[0].discounted_price(), Decimal::from(90));
    // Exactly one remote create happened; the second add was an update
    assert_eq!(remote.cart.lock().unwrap().len(), 1);
    assert_eq!(*remote.quantity_updates.lock().unwrap(), vec![(100, 2)]);
}

#[tokio::test]
async fn test_same_product_different_variant_gets_own_line() {
    let remote = Arc::new(MockRemote::new().with_product(product(7, 100, 0)));
    let cart = cart_with(remote, Arc::new(MemoryStore::new()));
    cart.set_identity(Some("1".to_string())).await;

    cart.add_item(&product(7, 100, 0), Some("30ml".to_string()), None)
        .await
        .unwrap();
    cart.add_item(&product(7, 100, 0), Some("50ml".to_string()), None)
        .await
        .unwrap();

    assert_eq!(cart.lines().await.len(), 2);
    assert_eq!(cart.item_count().await, 2);
}

#[tokio::test]
async fn test_decrement_floors_at_one_and_still_calls_remote() {
    let remote = Arc::new(MockRemote::new().with_product(product(7, 100, 0)));
    let cart = cart_with(remote.clone(), Arc::new(MemoryStore::new()));
    cart.set_identity(Some("1".to_string())).await;
    cart.add_item(&product(7, 100, 0), None, None).await.unwrap();

    cart.update_quantity(7, false).await.unwrap();
    cart.update_quantity(7, false).await.unwrap();

    assert_eq!(cart.lines().await[0].quantity, 1);
    // The idempotent quantity=1 call is issued each time, not short-circuited
    assert_eq!(*remote.quantity_updates.lock().unwrap(), vec![(100, 1), (100, 1)]);
}

#[tokio::test]
async fn test_failed_remote_mutation_leaves_lines_unchanged() {
    let remote = Arc::new(
        MockRemote::new()
            .with_product(product(7, 100, 0))
            .with_product(product(8, 50, 0)),
    );
    let cart = cart_with(remote.clone(), Arc::new(MemoryStore::new()));
    cart.set_identity(Some("1".to_string())).await;
    cart.add_item(&product(7, 100, 0), None, None).await.unwrap();
    let before = cart.lines().await;

    remote.set_fail(true);

    assert!(cart.add_item(&product(8, 50, 0), None, None).await.is_err());
    assert!(cart.update_quantity(7, true).await.is_err());
    assert!(cart.remove_item(7).await.is_err());

    assert_eq!(cart.lines().await, before);
}

#[tokio::test]
async fn test_remove_unknown_line_is_logged_noop() {
    let remote = Arc::new(MockRemote::new());
    let cart = cart_with(remote, Arc::new(MemoryStore::new()));
    cart.set_identity(Some("1".to_string())).await;

    // No such line, no identity loss: soft no-op, not an error
    cart.remove_item(999).await.unwrap();
    assert!(cart.lines().await.is_empty());
}

#[tokio::test]
async fn test_selection_stays_subset_of_lines() {
    let remote = Arc::new(
        MockRemote::new()
            .with_product(product(7, 100, 0))
            .with_product(product(8, 50, 0)),
    );
    let cart = cart_with(remote, Arc::new(MemoryStore::new()));
    cart.set_identity(Some("1".to_string())).await;
    cart.add_item(&product(7, 100, 0), None, None).await.unwrap();
    cart.add_item(&product(8, 50, 0), None, None).await.unwrap();

    cart.set_selection([7, 8, 999]).await;
    assert_eq!(cart.selected().await.len(), 2);

    cart.remove_item(7).await.unwrap();
    let selected = cart.selected().await;
    assert!(!selected.contains(&7));
    assert!(selected.contains(&8));

    cart.remove_item(8).await.unwrap();
    assert!(cart.selected().await.is_empty());
}

#[tokio::test]
async fn test_toggle_selection_ignores_unknown_products() {
    let remote = Arc::new(MockRemote::new().with_product(product(7, 100, 0)));
    let cart = cart_with(remote, Arc::new(MemoryStore::new()));
    cart.set_identity(Some("1".to_string())).await;
    cart.add_item(&product(7, 100, 0), None, None).await.unwrap();

    cart.toggle_selection(999).await;
    assert!(cart.selected().await.is_empty());

    cart.toggle_selection(7).await;
    assert!(cart.selected().await.contains(&7));
    cart.toggle_selection(7).await;
    assert!(cart.selected().await.is_empty());
}

#[tokio::test]
async fn test_totals_and_combo_pricing() {
    let remote = Arc::new(
        MockRemote::new()
            .with_product(product(7, 100, 10))
            .with_product(product(8, 50, 0)),
    );
    let cart = cart_with(remote, Arc::new(MemoryStore::new()));
    cart.set_identity(Some("1".to_string())).await;

    cart.add_item(&product(7, 100, 10), None, None).await.unwrap();
    cart.add_item(&product(7, 100, 10), None, None).await.unwrap();
    cart.add_item(&product(8, 50, 0), None, Some(Decimal::from(40)))
        .await
        .unwrap();

    assert_eq!(cart.item_count().await, 3);
    // Raw total ignores discounts: 2*100 + 1*50
    assert_eq!(cart.total().await, Decimal::from(250));

    cart.set_selection([7, 8]).await;
    // Selected total: offer-discounted 2*90, combo-priced 1*40
    assert_eq!(cart.selected_total().await, Decimal::from(220));
    assert_eq!(cart.selected_lines().await.len(), 2);
}

#[tokio::test]
async fn test_identity_switch_never_leaks_lines() {
    let remote = Arc::new(
        MockRemote::new()
            .with_product(product(1, 10, 0))
            .with_product(product(2, 20, 0)),
    );
    remote.cart.lock().unwrap().push(RemoteCartLine {
        id: 11,
        product_id: 1,
        quantity: 1,
        variant: None,
    });

    let store = Arc::new(MemoryStore::new());
    let cart = cart_with(remote.clone(), store.clone());

    cart.set_identity(Some("A".to_string())).await;
    assert_eq!(cart.lines().await[0].product_id, 1);
    assert!(store.get(&cart_key("A")).await.unwrap().is_some());

    // User B's server-side cart holds a different product
    *remote.cart.lock().unwrap() = vec![RemoteCartLine {
        id: 12,
        product_id: 2,
        quantity: 1,
        variant: None,
    }];
    cart.set_identity(Some("B".to_string())).await;

    let lines = cart.lines().await;
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].product_id, 2);
}

#[tokio::test]
async fn test_slow_reload_for_prior_identity_never_applies() {
    let remote = Arc::new(
        MockRemote::new()
            .with_product(product(1, 10, 0))
            .with_product(product(2, 20, 0)),
    );
    remote.cart.lock().unwrap().push(RemoteCartLine {
        id: 11,
        product_id: 1,
        quantity: 1,
        variant: None,
    });
    let cart = Arc::new(cart_with(remote.clone(), Arc::new(MemoryStore::new())));

    // Park user A's fetch mid-flight, holding A's rows
    let gate = FetchGate::new();
    *remote.list_gate.lock().unwrap() = Some(gate.clone());
    let slow = {
        let cart = Arc::clone(&cart);
        tokio::spawn(async move { cart.set_identity(Some("A".to_string())).await })
    };
    gate.started.notified().await;

    // B's switch completes while A's reload is still in flight
    *remote.cart.lock().unwrap() = vec![RemoteCartLine {
        id: 12,
        product_id: 2,
        quantity: 1,
        variant: None,
    }];
    cart.set_identity(Some("B".to_string())).await;
    assert_eq!(cart.lines().await[0].product_id, 2);

    gate.release.notify_one();
    slow.await.unwrap();

    // A's late result was discarded, not applied over B's cart
    let lines = cart.lines().await;
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].product_id, 2);
}

#[tokio::test]
async fn test_identity_loss_clears_lines_and_mirror() {
    let remote = Arc::new(MockRemote::new().with_product(product(7, 100, 0)));
    let store = Arc::new(MemoryStore::new());
    let cart = cart_with(remote, store.clone());
    cart.set_identity(Some("7".to_string())).await;
    cart.add_item(&product(7, 100, 0), None, None).await.unwrap();
    assert!(store.get(&cart_key("7")).await.unwrap().is_some());

    cart.set_identity(None).await;

    assert!(cart.lines().await.is_empty());
    assert!(cart.selected().await.is_empty());
    assert!(store.get(&cart_key("7")).await.unwrap().is_none());
}

#[tokio::test]
async fn test_load_failure_yields_empty_cart() {
    let remote = Arc::new(MockRemote::new());
    remote.cart.lock().unwrap().push(RemoteCartLine {
        id: 11,
        product_id: 1,
        quantity: 1,
        variant: None,
    });
    remote.set_fail(true);

    let cart = cart_with(remote, Arc::new(MemoryStore::new()));
    cart.set_identity(Some("1".to_string())).await;
    assert!(cart.lines().await.is_empty());
}

#[tokio::test]
async fn test_clear_cart_survives_remote_failure() {
    let remote = Arc::new(MockRemote::new().with_product(product(7, 100, 0)));
    let store = Arc::new(MemoryStore::new());
    let cart = cart_with(remote.clone(), store.clone());
    cart.set_identity(Some("7".to_string())).await;
    cart.add_item(&product(7, 100, 0), None, None).await.unwrap();

    remote.set_fail(true);
    cart.clear_cart().await;

    assert!(cart.lines().await.is_empty());
    assert!(store.get(&cart_key("7")).await.unwrap().is_none());
}

#[tokio::test]
async fn test_mirror_holds_confirmed_lines() {
    let remote = Arc::new(MockRemote::new().with_product(product(7, 100, 10)));
    let store = Arc::new(MemoryStore::new());
    let cart = cart_with(remote, store.clone());
    cart.set_identity(Some("7".to_string())).await;
    cart.add_item(&product(7, 100, 10), None, None).await.unwrap();

    let json = store.get(&cart_key("7")).await.unwrap().unwrap();
    let mirrored: Vec<shared::models::CartLine> = serde_json::from_str(&json).unwrap();
    assert_eq!(mirrored.len(), 1);
    assert_eq!(mirrored[0].product_id, 7);
    assert_eq!(mirrored[0].remote_line_id, Some(100));
}

#[tokio::test]
async fn test_reload_rehydrates_display_fields() {
    let remote = Arc::new(MockRemote::new().with_product(product(7, 100, 10)));
    remote.cart.lock().unwrap().push(RemoteCartLine {
        id: 11,
        product_id: 7,
        quantity: 3,
        variant: Some("30ml".to_string()),
    });
    remote.next_line_id.store(200, Ordering::SeqCst);

    let cart = cart_with(remote, Arc::new(MemoryStore::new()));
    cart.set_identity(Some("1".to_string())).await;

    let lines = cart.lines().await;
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].remote_line_id, Some(11));
    assert_eq!(lines[0].quantity, 3);
    assert_eq!(lines[0].variant.as_deref(), Some("30ml"));
    assert_eq!(lines[0].name, "Product 7");
    assert_eq!(lines[0].price, Decimal::from(100));
}
