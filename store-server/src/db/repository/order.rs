//! Order repository (order ledger)
//!
//! Sequence numbers come from the `meta` counter, incremented in the
//! same transaction that inserts the order, so numbers are strictly
//! increasing and never reused even under concurrent creations.

use redb::ReadableTable;

use crate::db::storage::{LAST_ORDER_NUMBER_KEY, META_TABLE, ORDERS_TABLE, Storage};
use shared::models::{ORDER_NUMBER_BASE, Order, OrderItem, OrderStatus};
use shared::{AppError, AppResult};

/// Create an order in the `AwaitingKey` state
///
/// The declared total is stored as supplied by the caller; it is not
/// recomputed from the items.
pub fn create(
    storage: &Storage,
    user_login: &str,
    phone: &str,
    items: Vec<OrderItem>,
    total: i64,
) -> AppResult<Order> {
    let txn = storage.begin_write().map_err(AppError::from)?;
    let order = {
        let mut meta = txn.open_table(META_TABLE).map_err(storage_err)?;
        let last = meta
            .get(LAST_ORDER_NUMBER_KEY)
            .map_err(storage_err)?
            .map(|g| g.value())
            .unwrap_or(ORDER_NUMBER_BASE);
        let number = last + 1;
        meta.insert(LAST_ORDER_NUMBER_KEY, number)
            .map_err(storage_err)?;
        drop(meta);

        let order = Order::new(number, user_login, phone, items, total);
        let mut orders = txn.open_table(ORDERS_TABLE).map_err(storage_err)?;
        let bytes = serde_json::to_vec(&order).map_err(storage_err)?;
        orders
            .insert(order.id.as_str(), bytes.as_slice())
            .map_err(storage_err)?;
        order
    };
    txn.commit().map_err(storage_err)?;

    tracing::info!(
        order_id = %order.id,
        number = order.number,
        user_login = %order.user_login,
        total = order.total,
        "Order created"
    );
    Ok(order)
}

/// All orders, ordered by sequence number
pub fn find_all(storage: &Storage) -> AppResult<Vec<Order>> {
    let mut orders: Vec<Order> = storage.read_all(ORDERS_TABLE)?;
    orders.sort_by_key(|o| o.number);
    Ok(orders)
}

/// Orders belonging to one user
pub fn find_for_login(storage: &Storage, login: &str) -> AppResult<Vec<Order>> {
    let mut orders = find_all(storage)?;
    orders.retain(|o| o.user_login == login);
    Ok(orders)
}

/// Fulfilled orders belonging to one user
pub fn find_fulfilled_for_login(storage: &Storage, login: &str) -> AppResult<Vec<Order>> {
    let mut orders = find_for_login(storage, login)?;
    orders.retain(|o| o.status == OrderStatus::Fulfilled);
    Ok(orders)
}

/// Number of orders placed by one user
pub fn count_for_login(storage: &Storage, login: &str) -> AppResult<usize> {
    Ok(find_for_login(storage, login)?.len())
}

/// Fulfill an order, looked up by internal id or sequence number
///
/// Transitions `AwaitingKey -> Fulfilled` and sets the key.
/// Re-fulfilling overwrites the key; an unknown reference leaves the
/// ledger untouched.
pub fn fulfill(storage: &Storage, id_or_number: &str, key: &str) -> AppResult<Order> {
    let txn = storage.begin_write().map_err(AppError::from)?;
    let order = {
        let mut orders = txn.open_table(ORDERS_TABLE).map_err(storage_err)?;

        let mut found: Option<Order> = None;
        for entry in orders.iter().map_err(storage_err)? {
            let (_, value) = entry.map_err(storage_err)?;
            let order: Order = serde_json::from_slice(value.value()).map_err(storage_err)?;
            if order.id == id_or_number || order.number.to_string() == id_or_number {
                found = Some(order);
                break;
            }
        }

        let mut order = found
            .ok_or_else(|| AppError::not_found(format!("Order {}", id_or_number)))?;
        order.status = OrderStatus::Fulfilled;
        order.key = Some(key.to_string());

        let bytes = serde_json::to_vec(&order).map_err(storage_err)?;
        orders
            .insert(order.id.as_str(), bytes.as_slice())
            .map_err(storage_err)?;
        order
    };
    txn.commit().map_err(storage_err)?;

    tracing::info!(order_id = %order.id, number = order.number, "Order fulfilled");
    Ok(order)
}

fn storage_err(e: impl std::fmt::Display) -> AppError {
    AppError::storage(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage() -> Storage {
        Storage::open_in_memory().unwrap()
    }

    fn key_item() -> Vec<OrderItem> {
        vec![OrderItem {
            title: "Key".into(),
            qty: 1,
            price: 100,
        }]
    }

    #[test]
    fn first_order_gets_number_1001() {
        let storage = storage();
        let order = create(&storage, "alice", "+100", key_item(), 100).unwrap();

        assert_eq!(order.number, 1001);
        assert_eq!(order.status, OrderStatus::AwaitingKey);
        assert!(order.key.is_none());
    }

    #[test]
    fn numbers_are_strictly_increasing() {
        let storage = storage();
        let first = create(&storage, "alice", "+100", key_item(), 100).unwrap();
        let second = create(&storage, "bob", "+200", key_item(), 100).unwrap();

        assert!(first.number < second.number);
        assert_eq!(second.number, 1002);
    }

    #[test]
    fn concurrent_creations_never_reuse_numbers() {
        let storage = storage();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let storage = storage.clone();
                std::thread::spawn(move || {
                    create(&storage, "alice", "+100", key_item(), 100)
                        .unwrap()
                        .number
                })
            })
            .collect();

        let mut numbers: Vec<u64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        numbers.sort_unstable();
        numbers.dedup();
        assert_eq!(numbers.len(), 8);
    }

    #[test]
    fn fulfill_by_id_and_by_number() {
        let storage = storage();
        let order = create(&storage, "alice", "+100", key_item(), 100).unwrap();

        let fulfilled = fulfill(&storage, &order.id, "ABC-123").unwrap();
        assert_eq!(fulfilled.status, OrderStatus::Fulfilled);
        assert_eq!(fulfilled.key.as_deref(), Some("ABC-123"));

        // Re-fulfilling by number overwrites the key
        let again = fulfill(&storage, "1001", "XYZ-789").unwrap();
        assert_eq!(again.id, order.id);
        assert_eq!(again.key.as_deref(), Some("XYZ-789"));
    }

    #[test]
    fn fulfill_unknown_order_is_not_found() {
        let storage = storage();
        create(&storage, "alice", "+100", key_item(), 100).unwrap();

        let err = fulfill(&storage, "9999", "ABC").unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        // Ledger untouched
        let orders = find_all(&storage).unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].status, OrderStatus::AwaitingKey);
    }

    #[test]
    fn per_user_views() {
        let storage = storage();
        create(&storage, "alice", "+100", key_item(), 100).unwrap();
        create(&storage, "bob", "+200", key_item(), 100).unwrap();
        let third = create(&storage, "alice", "+100", key_item(), 100).unwrap();
        fulfill(&storage, &third.id, "K").unwrap();

        assert_eq!(find_for_login(&storage, "alice").unwrap().len(), 2);
        assert_eq!(count_for_login(&storage, "bob").unwrap(), 1);

        let history = find_fulfilled_for_login(&storage, "alice").unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].id, third.id);
    }

    #[test]
    fn number_counter_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.redb");

        {
            let storage = Storage::open(&path).unwrap();
            create(&storage, "alice", "+100", key_item(), 100).unwrap();
        }

        let storage = Storage::open(&path).unwrap();
        let order = create(&storage, "alice", "+100", key_item(), 100).unwrap();
        assert_eq!(order.number, 1002);
    }
}
