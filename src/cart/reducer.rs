//! # 购物车 reducer
//!
//! 所有状态变更都是 `(状态, 动作) -> 新状态` 的纯函数，
//! 每次变更后重算 {total_items, subtotal, savings}。

use serde::{Deserialize, Serialize};

/// 商品价格（经销价 / 标价）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CartPrice {
    pub dp: f64,
    pub mrp: f64,
}

/// 购物车行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: String,
    pub title: String,
    pub price: CartPrice,
    pub image: Option<String>,
    pub quantity: u32,
}

/// 加入购物车的商品（数量由动作携带）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItemInput {
    pub product_id: String,
    pub title: String,
    pub price: CartPrice,
    pub image: Option<String>,
}

/// 购物车状态
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CartState {
    pub items: Vec<CartItem>,
    pub total_items: u32,
    pub subtotal: f64,
    pub savings: f64,
}

impl CartState {
    /// 商品是否已在购物车中
    #[must_use]
    pub fn is_in_cart(&self, product_id: &str) -> bool {
        self.items.iter().any(|item| item.product_id == product_id)
    }

    /// 指定商品的数量（不在购物车则为 0）
    #[must_use]
    pub fn item_quantity(&self, product_id: &str) -> u32 {
        self.items
            .iter()
            .find(|item| item.product_id == product_id)
            .map_or(0, |item| item.quantity)
    }
}

/// 购物车动作
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CartAction {
    /// 加入商品：已存在则叠加数量，否则追加到末尾
    AddItem { item: CartItemInput, quantity: u32 },
    /// 移除整行
    RemoveItem { product_id: String },
    /// 修改数量；数量 <= 0 时等价于移除
    UpdateQuantity { product_id: String, quantity: i32 },
    /// 清空购物车
    Clear,
}

/// 应用一个动作，返回新状态
#[must_use]
pub fn apply(state: &CartState, action: &CartAction) -> CartState {
    let items = match action {
        CartAction::AddItem { item, quantity } => {
            let mut items = state.items.clone();
            if let Some(existing) = items
                .iter_mut()
                .find(|line| line.product_id == item.product_id)
            {
                existing.quantity += quantity;
            } else {
                items.push(CartItem {
                    product_id: item.product_id.clone(),
                    title: item.title.clone(),
                    price: item.price,
                    image: item.image.clone(),
                    quantity: *quantity,
                });
            }
            items
        }
        CartAction::RemoveItem { product_id } => state
            .items
            .iter()
            .filter(|item| &item.product_id != product_id)
            .cloned()
            .collect(),
        CartAction::UpdateQuantity {
            product_id,
            quantity,
        } => {
            if *quantity <= 0 {
                state
                    .items
                    .iter()
                    .filter(|item| &item.product_id != product_id)
                    .cloned()
                    .collect()
            } else {
                state
                    .items
                    .iter()
                    .map(|item| {
                        if &item.product_id == product_id {
                            let mut updated = item.clone();
                            updated.quantity = *quantity as u32;
                            updated
                        } else {
                            item.clone()
                        }
                    })
                    .collect()
            }
        }
        CartAction::Clear => Vec::new(),
    };

    with_totals(items)
}

/// 重算派生总计
fn with_totals(items: Vec<CartItem>) -> CartState {
    let total_items = items.iter().map(|item| item.quantity).sum();
    let subtotal = items
        .iter()
        .map(|item| item.price.dp * f64::from(item.quantity))
        .sum();
    let savings = items
        .iter()
        .map(|item| (item.price.mrp - item.price.dp) * f64::from(item.quantity))
        .sum();

    CartState {
        items,
        total_items,
        subtotal,
        savings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn battery() -> CartItemInput {
        CartItemInput {
            product_id: "p-100".to_string(),
            title: "Amaron 35Ah Battery".to_string(),
            price: CartPrice { dp: 100.0, mrp: 150.0 },
            image: None,
        }
    }

    fn inverter() -> CartItemInput {
        CartItemInput {
            product_id: "p-200".to_string(),
            title: "Luminous 900VA Inverter".to_string(),
            price: CartPrice { dp: 5000.0, mrp: 5600.0 },
            image: Some("https://cdn.example.com/inverter.jpg".to_string()),
        }
    }

    #[test]
    fn add_item_merges_quantity_for_same_product() {
        let state = CartState::default();
        let state = apply(
            &state,
            &CartAction::AddItem { item: battery(), quantity: 2 },
        );
        let state = apply(
            &state,
            &CartAction::AddItem { item: battery(), quantity: 1 },
        );

        assert_eq!(state.items.len(), 1);
        assert_eq!(state.items[0].quantity, 3);
        assert_eq!(state.total_items, 3);
        assert!((state.subtotal - 300.0).abs() < f64::EPSILON);
        assert!((state.savings - 150.0).abs() < f64::EPSILON);
    }

    #[test]
    fn add_item_appends_distinct_products_in_order() {
        let state = apply(
            &CartState::default(),
            &CartAction::AddItem { item: battery(), quantity: 1 },
        );
        let state = apply(
            &state,
            &CartAction::AddItem { item: inverter(), quantity: 1 },
        );

        assert_eq!(state.items.len(), 2);
        assert_eq!(state.items[0].product_id, "p-100");
        assert_eq!(state.items[1].product_id, "p-200");
        assert_eq!(state.total_items, 2);
    }

    #[test]
    fn update_quantity_to_zero_removes_the_line() {
        let state = apply(
            &CartState::default(),
            &CartAction::AddItem { item: battery(), quantity: 2 },
        );
        let state = apply(
            &state,
            &CartAction::UpdateQuantity {
                product_id: "p-100".to_string(),
                quantity: 0,
            },
        );

        assert!(state.items.is_empty());
        assert_eq!(state.total_items, 0);
        assert!(state.subtotal.abs() < f64::EPSILON);
    }

    #[test]
    fn update_quantity_overwrites_rather_than_adds() {
        let state = apply(
            &CartState::default(),
            &CartAction::AddItem { item: battery(), quantity: 2 },
        );
        let state = apply(
            &state,
            &CartAction::UpdateQuantity {
                product_id: "p-100".to_string(),
                quantity: 5,
            },
        );

        assert_eq!(state.item_quantity("p-100"), 5);
        assert!((state.subtotal - 500.0).abs() < f64::EPSILON);
    }

    #[test]
    fn remove_and_clear_reset_totals() {
        let state = apply(
            &CartState::default(),
            &CartAction::AddItem { item: battery(), quantity: 1 },
        );
        let state = apply(
            &state,
            &CartAction::AddItem { item: inverter(), quantity: 1 },
        );

        let removed = apply(
            &state,
            &CartAction::RemoveItem {
                product_id: "p-100".to_string(),
            },
        );
        assert_eq!(removed.items.len(), 1);
        assert!(!removed.is_in_cart("p-100"));

        let cleared = apply(&state, &CartAction::Clear);
        assert_eq!(cleared, CartState::default());
    }

    #[test]
    fn removing_unknown_product_is_a_no_op() {
        let state = apply(
            &CartState::default(),
            &CartAction::AddItem { item: battery(), quantity: 1 },
        );
        let after = apply(
            &state,
            &CartAction::RemoveItem {
                product_id: "missing".to_string(),
            },
        );
        assert_eq!(after, state);
    }
}
