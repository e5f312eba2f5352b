//! Database models

// Catalog domain
pub mod product;
pub mod taxonomy;

// Storefront domain
pub mod address;
pub mod cart;
pub mod user;
pub mod wishlist;

// Auth
pub mod otp;

// Re-exports
pub use address::{Address, AddressCreate, AddressUpdate};
pub use cart::{Cart, CartItem, CartItemCreate, SizeSelection};
pub use otp::{OtpPurpose, OtpRecord};
pub use product::{
    ColorSubmission, ColorVariant, ImageRef, ImageSubmission, LayerImageRef, MaterialPrice,
    Pricing, Product, ProductCreate, ProductId, ProductUpdate,
};
pub use taxonomy::{
    Category, ColorSwatch, NamedCreate, Pattern, PileHeight, PileHeightCreate, ShapeStyle,
    SwatchCreate, TaxonomyRecord,
};
pub use user::{User, UserId, UserRole};
pub use wishlist::Wishlist;
