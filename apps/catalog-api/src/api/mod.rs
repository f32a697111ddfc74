//! API routes module

pub mod health;
pub mod products;

use axum::Router;

use crate::state::AppState;

/// Create all API routes
pub async fn routes(state: &AppState) -> eyre::Result<Router> {
    let products = products::router(state).await?;

    Ok(Router::new()
        .nest("/products", products)
        .merge(health::router(state.clone())))
}
