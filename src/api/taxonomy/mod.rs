//! Taxonomy API module
//!
//! One generic handler set instantiated for the five admin-managed tables.

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;
use crate::db::models::{Category, ColorSwatch, Pattern, PileHeight, ShapeStyle};
use crate::db::repository::TaxonomyRepository;
use handler::TaxonomyState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .nest("/api/categories", routes::<Category>())
        .nest("/api/patterns", routes::<Pattern>())
        .nest("/api/shapes", routes::<ShapeStyle>())
        .nest("/api/colors", routes::<ColorSwatch>())
        .nest("/api/pile-heights", routes::<PileHeight>())
}

fn routes<T: TaxonomyState>() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list::<T>).post(handler::create::<T>))
        .route(
            "/{id}",
            get(handler::get_by_id::<T>).delete(handler::delete::<T>),
        )
}

impl TaxonomyState for Category {
    fn repository(state: &ServerState) -> &TaxonomyRepository<Self> {
        &state.categories
    }
}

impl TaxonomyState for Pattern {
    fn repository(state: &ServerState) -> &TaxonomyRepository<Self> {
        &state.patterns
    }
}

impl TaxonomyState for ShapeStyle {
    fn repository(state: &ServerState) -> &TaxonomyRepository<Self> {
        &state.shapes
    }
}

impl TaxonomyState for ColorSwatch {
    fn repository(state: &ServerState) -> &TaxonomyRepository<Self> {
        &state.colors
    }
}

impl TaxonomyState for PileHeight {
    fn repository(state: &ServerState) -> &TaxonomyRepository<Self> {
        &state.pile_heights
    }
}
