//! 购物车存储集成测试（文件后端）

use store_api::cart::{
    CartItemInput, CartPrice, CartState, CartStore, FileCartStorage, MemoryCartStorage,
};

fn battery() -> CartItemInput {
    CartItemInput {
        product_id: "p-100".to_string(),
        title: "Amaron 35Ah Battery".to_string(),
        price: CartPrice {
            dp: 100.0,
            mrp: 150.0,
        },
        image: None,
    }
}

#[test]
fn cart_arithmetic_matches_contract() {
    let mut store = CartStore::open(MemoryCartStorage::new()).expect("open cart");

    store.add_item(battery(), 2).expect("add qty 2");
    store.add_item(battery(), 1).expect("add qty 1");

    let state = store.state();
    assert_eq!(state.items.len(), 1);
    assert_eq!(store.item_quantity("p-100"), 3);
    assert!((state.subtotal - 300.0).abs() < f64::EPSILON);
    assert!((state.savings - 150.0).abs() < f64::EPSILON);
    assert_eq!(state.total_items, 3);
}

#[test]
fn file_backend_survives_reopen() {
    let dir = tempfile::tempdir().expect("temp dir");

    {
        let mut store =
            CartStore::open(FileCartStorage::new(dir.path())).expect("open cart");
        store.add_item(battery(), 2).expect("add");
        store
            .update_quantity("p-100", 5)
            .expect("update quantity");
    }

    // 重新打开同一目录，状态完整恢复
    let store = CartStore::open(FileCartStorage::new(dir.path())).expect("reopen cart");
    assert_eq!(store.item_quantity("p-100"), 5);
    assert!((store.state().subtotal - 500.0).abs() < f64::EPSILON);
}

#[test]
fn clear_persists_empty_state() {
    let dir = tempfile::tempdir().expect("temp dir");

    {
        let mut store =
            CartStore::open(FileCartStorage::new(dir.path())).expect("open cart");
        store.add_item(battery(), 4).expect("add");
        store.clear().expect("clear");
    }

    let store = CartStore::open(FileCartStorage::new(dir.path())).expect("reopen cart");
    assert_eq!(store.state(), &CartState::default());
}

#[test]
fn missing_file_starts_empty() {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = CartStore::open(FileCartStorage::new(dir.path())).expect("open cart");
    assert_eq!(store.state(), &CartState::default());
}
