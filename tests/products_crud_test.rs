//! 商品管理服务集成测试

mod common;

use common::{ProductSeed, admin, customer, seed_product, seed_user, setup_test_db};
use pretty_assertions::assert_eq;
use store_api::api::error::ApiError;
use store_api::api::services::ProductsService;
use store_api::api::services::products::{
    CreateProductRequest, DeleteProductRequest, ProductQuery, UpdateProductRequest,
};

fn create_request() -> CreateProductRequest {
    CreateProductRequest {
        title: "Amaron 35Ah Battery".to_string(),
        description: Some("Maintenance-free battery".to_string()),
        category: "Four-Wheeler Batteries".to_string(),
        brand: "Amaron".to_string(),
        image_url: Some("https://cdn.example.com/amaron.jpg".to_string()),
        dp_price: 3_400.0,
        mrp_price: 4_100.0,
        stock: 8,
        specifications: Some(serde_json::json!({"warranty": "36 months"})),
        tags: vec!["car".to_string(), "battery".to_string()],
    }
}

#[tokio::test]
async fn create_then_fetch_product() {
    let db = setup_test_db().await;
    let service = ProductsService::new(db);

    let created = service
        .create(&admin(), &create_request())
        .await
        .expect("create product");

    assert_eq!(created.brand, "Amaron");
    assert!(created.is_active);
    assert_eq!(created.stock_status, "in_stock");
    assert_eq!(created.tags, vec!["car", "battery"]);

    let fetched = service.get(created.id).await.expect("fetch product");
    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.title, "Amaron 35Ah Battery");
}

#[tokio::test]
async fn create_rejects_dp_above_mrp() {
    let db = setup_test_db().await;
    let service = ProductsService::new(db);

    let mut request = create_request();
    request.dp_price = 5_000.0;
    request.mrp_price = 4_000.0;

    let err = service.create(&admin(), &request).await.unwrap_err();
    assert!(matches!(
        err,
        ApiError::Validation { field: Some(ref f), .. } if f == "dpPrice"
    ));
}

#[tokio::test]
async fn create_requires_admin_role() {
    let db = setup_test_db().await;
    let user = seed_user(db.as_ref(), "buyer@example.com", "Buyer", "user").await;
    let service = ProductsService::new(db);

    let err = service
        .create(&customer(user.id), &create_request())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Permission { .. }));
}

#[tokio::test]
async fn soft_delete_twice_fails_on_second_call() {
    let db = setup_test_db().await;
    let service = ProductsService::new(db);

    let created = service
        .create(&admin(), &create_request())
        .await
        .expect("create product");

    let request = DeleteProductRequest {
        product_id: created.id,
    };

    let first = service.delete(&admin(), &request).await.expect("first delete");
    assert!(first.success);
    assert_eq!(first.product_id, created.id);

    let second = service.delete(&admin(), &request).await.unwrap_err();
    assert!(matches!(second, ApiError::Business { .. }));
    assert_eq!(second.to_string(), "Product is already deleted");
}

#[tokio::test]
async fn delete_missing_product_is_not_found() {
    let db = setup_test_db().await;
    let service = ProductsService::new(db);

    let err = service
        .delete(&admin(), &DeleteProductRequest { product_id: 999 })
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound { .. }));
}

#[tokio::test]
async fn listing_excludes_inactive_products() {
    let db = setup_test_db().await;
    seed_product(db.as_ref(), ProductSeed::default()).await;
    let hidden = seed_product(
        db.as_ref(),
        ProductSeed {
            title: "Discontinued UPS".to_string(),
            category: "UPS Battery".to_string(),
            is_active: false,
            ..Default::default()
        },
    )
    .await;

    let service = ProductsService::new(db);
    let result = service
        .list(&ProductQuery::default())
        .await
        .expect("list products");

    assert_eq!(result.pagination.total_count, 1);
    assert!(result.products.iter().all(|p| p.id != hidden.id));

    let err = service.get(hidden.id).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound { .. }));
}

#[tokio::test]
async fn list_filters_by_category_and_price() {
    let db = setup_test_db().await;
    seed_product(
        db.as_ref(),
        ProductSeed {
            title: "Solar PCU 3kVA".to_string(),
            category: "Solar PCU".to_string(),
            brand: "Luminous".to_string(),
            dp_price: 42_000.0,
            mrp_price: 47_000.0,
            ..Default::default()
        },
    )
    .await;
    seed_product(
        db.as_ref(),
        ProductSeed {
            title: "Scooter Battery".to_string(),
            category: "Two-Wheeler Batteries".to_string(),
            brand: "Exide".to_string(),
            dp_price: 1_400.0,
            mrp_price: 1_800.0,
            ..Default::default()
        },
    )
    .await;

    let service = ProductsService::new(db);

    let by_category = service
        .list(&ProductQuery {
            category: Some("Solar PCU".to_string()),
            ..Default::default()
        })
        .await
        .expect("list by category");
    assert_eq!(by_category.products.len(), 1);
    assert_eq!(by_category.products[0].category, "Solar PCU");

    let by_price = service
        .list(&ProductQuery {
            max_price: Some(2_000.0),
            ..Default::default()
        })
        .await
        .expect("list by price");
    assert_eq!(by_price.products.len(), 1);
    assert_eq!(by_price.products[0].title, "Scooter Battery");
}

#[tokio::test]
async fn list_sorts_by_price_ascending() {
    let db = setup_test_db().await;
    seed_product(
        db.as_ref(),
        ProductSeed {
            title: "Costly".to_string(),
            dp_price: 9_000.0,
            mrp_price: 9_500.0,
            ..Default::default()
        },
    )
    .await;
    seed_product(
        db.as_ref(),
        ProductSeed {
            title: "Cheap".to_string(),
            dp_price: 1_000.0,
            mrp_price: 1_500.0,
            ..Default::default()
        },
    )
    .await;

    let service = ProductsService::new(db);
    let result = service
        .list(&ProductQuery {
            sort_by: Some("price".to_string()),
            sort_order: Some("asc".to_string()),
            ..Default::default()
        })
        .await
        .expect("sorted list");

    let prices: Vec<f64> = result.products.iter().map(|p| p.dp_price).collect();
    assert!(prices.windows(2).all(|w| w[0] <= w[1]));
}

#[tokio::test]
async fn list_pagination_skips_and_limits() {
    let db = setup_test_db().await;
    for i in 0..5 {
        seed_product(
            db.as_ref(),
            ProductSeed {
                title: format!("Battery {i}"),
                age_days: i,
                ..Default::default()
            },
        )
        .await;
    }

    let service = ProductsService::new(db);
    let page2 = service
        .list(&ProductQuery {
            page: Some(2),
            limit: Some(2),
            ..Default::default()
        })
        .await
        .expect("page 2");

    assert_eq!(page2.products.len(), 2);
    assert_eq!(page2.pagination.total_count, 5);
    assert_eq!(page2.pagination.total_pages, 3);
    assert!(page2.pagination.has_next_page);
    assert!(page2.pagination.has_previous_page);
}

#[tokio::test]
async fn list_rejects_limit_above_max() {
    let db = setup_test_db().await;
    let service = ProductsService::new(db);

    let err = service
        .list(&ProductQuery {
            limit: Some(101),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Validation { .. }));
}

#[tokio::test]
async fn tag_filter_matches_any_overlap() {
    let db = setup_test_db().await;
    seed_product(
        db.as_ref(),
        ProductSeed {
            title: "Solar Panel Combo".to_string(),
            tags: vec!["solar", "rooftop"],
            ..Default::default()
        },
    )
    .await;
    seed_product(
        db.as_ref(),
        ProductSeed {
            title: "Plain Battery".to_string(),
            tags: vec!["battery"],
            ..Default::default()
        },
    )
    .await;

    let service = ProductsService::new(db);
    let result = service
        .list(&ProductQuery {
            tags: Some("rooftop,ups".to_string()),
            ..Default::default()
        })
        .await
        .expect("tag filtered list");

    assert_eq!(result.products.len(), 1);
    assert_eq!(result.products[0].title, "Solar Panel Combo");
    assert_eq!(result.pagination.total_count, 1);
}

#[tokio::test]
async fn update_applies_only_provided_fields() {
    let db = setup_test_db().await;
    let service = ProductsService::new(db);

    let created = service
        .create(&admin(), &create_request())
        .await
        .expect("create product");

    let updated = service
        .update(
            &admin(),
            &UpdateProductRequest {
                id: created.id,
                stock: Some(0),
                title: None,
                description: None,
                brand: None,
                category: None,
                dp_price: None,
                mrp_price: None,
                is_active: None,
                image_url: None,
                tags: None,
                specifications: None,
            },
        )
        .await
        .expect("update product");

    assert_eq!(updated.stock, 0);
    assert_eq!(updated.stock_status, "out_of_stock");
    // 其余字段保持不变
    assert_eq!(updated.title, created.title);
    assert_eq!(updated.dp_price, created.dp_price);
    assert!(updated.updated_at >= created.updated_at);
}

#[tokio::test]
async fn update_rejects_merged_price_inversion() {
    let db = setup_test_db().await;
    let service = ProductsService::new(db);

    let created = service
        .create(&admin(), &create_request())
        .await
        .expect("create product");

    // 单独把 dp 提到现有 mrp 之上
    let err = service
        .update(
            &admin(),
            &UpdateProductRequest {
                id: created.id,
                dp_price: Some(created.mrp_price + 100.0),
                title: None,
                description: None,
                brand: None,
                category: None,
                mrp_price: None,
                stock: None,
                is_active: None,
                image_url: None,
                tags: None,
                specifications: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Validation { .. }));
}

#[tokio::test]
async fn update_missing_product_is_not_found() {
    let db = setup_test_db().await;
    let service = ProductsService::new(db);

    let err = service
        .update(
            &admin(),
            &UpdateProductRequest {
                id: 12_345,
                title: Some("Ghost".to_string()),
                description: None,
                brand: None,
                category: None,
                dp_price: None,
                mrp_price: None,
                stock: None,
                is_active: None,
                image_url: None,
                tags: None,
                specifications: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound { .. }));
}
