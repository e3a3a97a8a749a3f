//! # 实体定义测试
//!
//! 测试所有 Sea-ORM 实体定义的正确性

#[cfg(test)]
mod tests {
    use crate::{order_items, orders, products, user_wishlists, users};
    use sea_orm::Set;

    #[tokio::test]
    async fn test_user_creation() {
        // 测试用户实体可以正常创建
        let user = users::ActiveModel {
            email: Set("test@example.com".to_string()),
            display_name: Set("Test User".to_string()),
            role: Set("user".to_string()),
            password_hash: Set("hash123".to_string()),
            ..Default::default()
        };

        assert_eq!(user.email.as_ref(), "test@example.com");
        assert_eq!(user.display_name.as_ref(), "Test User");
        assert_eq!(user.role.as_ref(), "user");
    }

    #[tokio::test]
    async fn test_product_creation() {
        // 测试商品实体
        let product = products::ActiveModel {
            title: Set("Exide 150Ah Tubular Battery".to_string()),
            category: Set("Inverters".to_string()),
            brand: Set("Exide".to_string()),
            dp_price: Set(11_500.0),
            mrp_price: Set(14_200.0),
            stock: Set(12),
            tags: Set(serde_json::json!(["inverter", "battery"])),
            is_active: Set(true),
            ..Default::default()
        };

        assert_eq!(product.brand.as_ref(), "Exide");
        assert_eq!(product.is_active.as_ref(), &true);
        assert!(product.dp_price.as_ref() <= product.mrp_price.as_ref());
    }

    #[tokio::test]
    async fn test_order_with_items_creation() {
        // 测试订单与订单行实体
        let order = orders::ActiveModel {
            user_id: Set(Some(1)),
            status: Set("pending".to_string()),
            total_amount: Set(23_000.0),
            ..Default::default()
        };

        let item = order_items::ActiveModel {
            order_id: Set(1),
            product_id: Set(Some(1)),
            product_title: Set("Exide 150Ah Tubular Battery".to_string()),
            quantity: Set(2),
            unit_price: Set(11_500.0),
            total_price: Set(23_000.0),
            ..Default::default()
        };

        assert_eq!(order.status.as_ref(), "pending");
        assert_eq!(item.quantity.as_ref(), &2);
        assert_eq!(
            item.total_price.as_ref(),
            &(item.unit_price.as_ref() * f64::from(*item.quantity.as_ref()))
        );
    }

    #[tokio::test]
    async fn test_wishlist_entry_creation() {
        // 测试心愿单实体
        let entry = user_wishlists::ActiveModel {
            user_id: Set(1),
            product_id: Set(42),
            ..Default::default()
        };

        assert_eq!(entry.user_id.as_ref(), &1);
        assert_eq!(entry.product_id.as_ref(), &42);
    }
}
