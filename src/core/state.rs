//! Shared server state
//!
//! Built once at startup and cloned into every handler. Repositories and
//! services are cheap to clone; the trait objects sit behind `Arc`.

use std::sync::Arc;

use crate::assets::{AssetStore, HttpAssetStore, MemoryAssetStore};
use crate::auth::{JwtConfig, JwtService, LogMailer, MemoryThrottle, OtpService};
use crate::catalog::CatalogService;
use crate::core::config::Config;
use crate::db::DbService;
use crate::db::models::{Category, ColorSwatch, Pattern, PileHeight, ShapeStyle};
use crate::db::repository::{
    AddressRepository, CartRepository, OtpRepository, ProductRepository, TaxonomyRepository,
    UserRepository, WishlistRepository,
};
use crate::utils::AppResult;

#[derive(Clone)]
pub struct ServerState {
    pub config: Arc<Config>,
    pub db: DbService,
    pub assets: Arc<dyn AssetStore>,
    pub jwt: Arc<JwtService>,
    pub catalog: CatalogService,
    pub otp: OtpService,
    pub carts: CartRepository,
    pub wishlists: WishlistRepository,
    pub addresses: AddressRepository,
    pub products: ProductRepository,
    pub categories: TaxonomyRepository<Category>,
    pub patterns: TaxonomyRepository<Pattern>,
    pub shapes: TaxonomyRepository<ShapeStyle>,
    pub colors: TaxonomyRepository<ColorSwatch>,
    pub pile_heights: TaxonomyRepository<PileHeight>,
}

impl ServerState {
    pub async fn initialize(config: Config) -> AppResult<Self> {
        let db = DbService::new(&config.data_dir).await?;
        Self::with_db(config, db)
    }

    /// Assemble state around an already opened database. Tests use this with
    /// the in-memory engine.
    pub fn with_db(config: Config, db: DbService) -> AppResult<Self> {
        let assets: Arc<dyn AssetStore> = match &config.asset_store {
            Some(store) => Arc::new(HttpAssetStore::new(
                store.base_url.clone(),
                store.api_key.clone(),
                store.api_secret.clone(),
            )?),
            None => {
                tracing::warn!("No asset store configured, using in-memory store");
                Arc::new(MemoryAssetStore::new())
            }
        };

        let jwt = Arc::new(JwtService::new(JwtConfig::new(config.jwt_secret.clone())));

        let products = ProductRepository::new(db.db.clone());
        let catalog = CatalogService::new(products.clone(), assets.clone());
        let otp = OtpService::new(
            UserRepository::new(db.db.clone()),
            OtpRepository::new(db.db.clone()),
            Arc::new(MemoryThrottle::new()),
            Arc::new(LogMailer),
            jwt.clone(),
        );

        Ok(Self {
            config: Arc::new(config),
            assets,
            jwt,
            catalog,
            otp,
            carts: CartRepository::new(db.db.clone()),
            wishlists: WishlistRepository::new(db.db.clone()),
            addresses: AddressRepository::new(db.db.clone()),
            products,
            categories: TaxonomyRepository::new(db.db.clone()),
            patterns: TaxonomyRepository::new(db.db.clone()),
            shapes: TaxonomyRepository::new(db.db.clone()),
            colors: TaxonomyRepository::new(db.db.clone()),
            pile_heights: TaxonomyRepository::new(db.db.clone()),
            db,
        })
    }
}
