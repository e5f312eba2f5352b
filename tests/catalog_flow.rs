//! End-to-end catalog flow against the in-memory database and asset store.

use std::sync::Arc;

use rugloom_server::assets::{AssetStore, MemoryAssetStore};
use rugloom_server::catalog::CatalogService;
use rugloom_server::db::DbService;
use rugloom_server::db::models::{
    ColorSubmission, ImageSubmission, Pricing, Product, ProductCreate, ProductUpdate,
};
use rugloom_server::db::repository::ProductRepository;
use rugloom_server::utils::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

async fn setup() -> (CatalogService, Arc<MemoryAssetStore>) {
    let db = DbService::in_memory().await.expect("in-memory db");
    let store = Arc::new(MemoryAssetStore::new());
    let service = CatalogService::new(
        ProductRepository::new(db.db.clone()),
        store.clone() as Arc<dyn AssetStore>,
    );
    (service, store)
}

fn image(asset_id: &str, is_main: bool) -> ImageSubmission {
    ImageSubmission {
        asset_id: Some(asset_id.to_string()),
        url: Some(format!("https://img.test/{asset_id}")),
        is_main,
        ..Default::default()
    }
}

fn color(name: &str, code: &str, assets: &[&str]) -> ColorSubmission {
    ColorSubmission {
        variant_id: None,
        name: Some(name.to_string()),
        color_code: Some(code.to_string()),
        shape: Some("round".to_string()),
        base_images: assets
            .iter()
            .enumerate()
            .map(|(i, a)| image(a, i == 0))
            .collect(),
        layer_images: Vec::new(),
    }
}

fn create_payload(colors: Vec<ColorSubmission>) -> ProductCreate {
    ProductCreate {
        name: "Heritage Medallion".to_string(),
        description: "Hand-knotted wool rug".to_string(),
        shape: vec!["round".to_string()],
        category: vec!["classic".to_string()],
        rug_type: vec!["wool".to_string()],
        delivery_time: "4-6 weeks".to_string(),
        pricing: Pricing::default(),
        colors,
    }
}

fn id_of(product: &Product) -> String {
    product.id.as_ref().expect("persisted id").to_string()
}

async fn seed(service: &CatalogService, store: &MemoryAssetStore, assets: &[&str]) -> Product {
    for asset in assets {
        store.insert(asset);
    }
    service
        .create_product(create_payload(vec![color("Crimson", "#AA0000", assets)]))
        .await
        .expect("create product")
}

#[tokio::test]
async fn create_assigns_variant_ids() {
    let (service, store) = setup().await;
    let product = seed(&service, &store, &["a1", "a2"]).await;

    assert_eq!(product.colors.len(), 1);
    assert!(!product.colors[0].variant_id.is_empty());
    assert_eq!(product.colors[0].base_images.len(), 2);
    assert!(product.colors[0].base_images[0].is_main);
}

#[tokio::test]
async fn create_rejects_invalid_colors_with_indexed_messages() {
    let (service, _store) = setup().await;
    let mut bad = color("NoMain", "#112233", &["x1"]);
    bad.base_images[0].is_main = false;

    let err = service
        .create_product(create_payload(vec![color("Ok", "#AA0000", &["a1"]), bad]))
        .await
        .unwrap_err();

    match err {
        AppError::ValidationErrors(messages) => {
            assert!(messages.iter().any(|m| m.contains("colors[1]")));
        }
        other => panic!("expected validation errors, got {other:?}"),
    }
}

#[tokio::test]
async fn failed_create_compensates_submitted_assets() {
    let store = Arc::new(MemoryAssetStore::new());
    store.insert("a1");
    store.insert("a2");
    // Unconnected handle, so the persist step fails after validation
    let dead_db: Surreal<Db> = Surreal::init();
    let service = CatalogService::new(
        ProductRepository::new(dead_db),
        store.clone() as Arc<dyn AssetStore>,
    );

    let err = service
        .create_product(create_payload(vec![color(
            "Crimson",
            "#AA0000",
            &["a1", "a2"],
        )]))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Database(_)));
    // Both submitted assets were compensated away
    assert_eq!(store.delete_calls(), 2);
    assert!(store.is_empty());
}

#[tokio::test]
async fn update_adds_image_without_touching_store() {
    let (service, store) = setup().await;
    let product = seed(&service, &store, &["a1"]).await;
    let id = id_of(&product);
    let variant_id = product.colors[0].variant_id.clone();
    store.insert("a2");

    let updated = service
        .update_product(
            &id,
            ProductUpdate {
                colors: Some(vec![ColorSubmission {
                    variant_id: Some(variant_id.clone()),
                    name: Some("Crimson".to_string()),
                    color_code: Some("#AA0000".to_string()),
                    shape: Some("round".to_string()),
                    base_images: vec![image("a1", true), image("a2", false)],
                    layer_images: Vec::new(),
                }]),
                ..Default::default()
            },
        )
        .await
        .expect("update");

    assert_eq!(updated.colors.len(), 1);
    assert_eq!(updated.colors[0].variant_id, variant_id);
    assert_eq!(updated.colors[0].base_images.len(), 2);
    assert_eq!(store.delete_calls(), 0);
}

#[tokio::test]
async fn replacing_variant_deletes_orphaned_assets() {
    let (service, store) = setup().await;
    let product = seed(&service, &store, &["a1", "a2"]).await;
    let id = id_of(&product);
    store.insert("b1");

    let updated = service
        .update_product(
            &id,
            ProductUpdate {
                colors: Some(vec![color("Blue", "#0000FF", &["b1"])]),
                ..Default::default()
            },
        )
        .await
        .expect("update");

    assert_eq!(updated.colors.len(), 1);
    assert_ne!(updated.colors[0].variant_id, product.colors[0].variant_id);
    // a1 and a2 were orphaned by the removed variant
    assert_eq!(store.delete_calls(), 2);
    assert!(!store.contains("a1"));
    assert!(!store.contains("a2"));
    assert!(store.contains("b1"));
}

#[tokio::test]
async fn empty_colors_submission_is_non_destructive() {
    let (service, store) = setup().await;
    let product = seed(&service, &store, &["a1"]).await;
    let id = id_of(&product);

    let updated = service
        .update_product(
            &id,
            ProductUpdate {
                name: Some("Renamed".to_string()),
                colors: Some(Vec::new()),
                ..Default::default()
            },
        )
        .await
        .expect("update");

    assert_eq!(updated.name, "Renamed");
    assert_eq!(updated.colors.len(), 1);
    assert_eq!(store.delete_calls(), 0);
    assert!(store.contains("a1"));
}

#[tokio::test]
async fn malformed_color_skipped_sibling_applied() {
    let (service, store) = setup().await;
    let product = seed(&service, &store, &["a1"]).await;
    let id = id_of(&product);
    let variant_id = product.colors[0].variant_id.clone();
    store.insert("b1");

    let missing_code = ColorSubmission {
        name: Some("Broken".to_string()),
        shape: Some("round".to_string()),
        base_images: vec![image("b9", true)],
        ..Default::default()
    };
    let keep_existing = ColorSubmission {
        variant_id: Some(variant_id.clone()),
        name: Some("Crimson".to_string()),
        color_code: Some("#AA0000".to_string()),
        shape: Some("round".to_string()),
        base_images: vec![image("a1", true)],
        layer_images: Vec::new(),
    };

    let updated = service
        .update_product(
            &id,
            ProductUpdate {
                colors: Some(vec![missing_code, keep_existing]),
                ..Default::default()
            },
        )
        .await
        .expect("update");

    assert_eq!(updated.colors.len(), 1);
    assert_eq!(updated.colors[0].variant_id, variant_id);
    assert_eq!(store.delete_calls(), 0);
}

#[tokio::test]
async fn delete_product_removes_document_and_assets() {
    let (service, store) = setup().await;
    let product = seed(&service, &store, &["a1", "a2"]).await;
    let id = id_of(&product);

    service.delete_product(&id).await.expect("delete");

    assert!(matches!(
        service.get_product(&id).await,
        Err(AppError::NotFound(_))
    ));
    assert_eq!(store.delete_calls(), 2);
    assert!(store.is_empty());
}

#[tokio::test]
async fn failed_asset_delete_does_not_fail_the_update() {
    let (service, store) = setup().await;
    let product = seed(&service, &store, &["a1", "a2"]).await;
    let id = id_of(&product);
    store.insert("b1");
    store.fail_delete("a1");

    let updated = service
        .update_product(
            &id,
            ProductUpdate {
                colors: Some(vec![color("Blue", "#0000FF", &["b1"])]),
                ..Default::default()
            },
        )
        .await
        .expect("update succeeds despite delete failure");

    assert_eq!(updated.colors.len(), 1);
    // Both deletions were attempted even though the first failed
    assert_eq!(store.delete_calls(), 2);
    assert!(store.contains("a1"));
    assert!(!store.contains("a2"));
}

#[tokio::test]
async fn scalar_update_does_not_touch_colors() {
    let (service, store) = setup().await;
    let product = seed(&service, &store, &["a1"]).await;
    let id = id_of(&product);

    let updated = service
        .update_product(
            &id,
            ProductUpdate {
                description: Some("Updated description".to_string()),
                ..Default::default()
            },
        )
        .await
        .expect("update");

    assert_eq!(updated.description, "Updated description");
    assert_eq!(updated.colors, product.colors);
    assert_eq!(store.delete_calls(), 0);
}

#[tokio::test]
async fn remove_image_guards_last_base_image() {
    let (service, store) = setup().await;
    let product = seed(&service, &store, &["a1", "a2"]).await;
    let id = id_of(&product);
    let variant_id = product.colors[0].variant_id.clone();

    let updated = service
        .remove_image(&id, &variant_id, "a2")
        .await
        .expect("remove image");
    assert_eq!(updated.colors[0].base_images.len(), 1);
    assert!(!store.contains("a2"));

    let err = service.remove_image(&id, &variant_id, "a1").await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert!(store.contains("a1"));
}
