//! HTTP handlers for the Catalog API

use axum::{
    Json, Router,
    extract::{OriginalUri, State},
    routing::{get, put},
};
use axum_helpers::{
    IdPath, ValidatedJson, ValidatedQuery,
    errors::responses::{
        BadRequestIdResponse, BadRequestValidationResponse, InternalServerErrorResponse,
        NotFoundResponse, ServiceUnavailableResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::CatalogResult;
use crate::models::{
    BulkUpdateRequest, CatalogQuery, FilterParams, ListParams, PriceUpdate, Product, ProductPage,
    ProductPatch, SearchParams, SortField, SortOrder, SortParams,
};
use crate::service::CatalogService;
use crate::source::ProductSource;

/// OpenAPI documentation for the Catalog API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_products,
        search_products,
        filter_products,
        sort_products,
        complex_query,
        bulk_update,
        show_product,
        update_price,
    ),
    components(
        schemas(
            Product, ProductPage, PriceUpdate, ProductPatch, BulkUpdateRequest,
            SortField, SortOrder
        ),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestIdResponse,
            ServiceUnavailableResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Catalog", description = "Product catalog endpoints")
    )
)]
pub struct ApiDoc;

/// Create the catalog router with all HTTP endpoints
pub fn router<S: ProductSource + 'static>(service: CatalogService<S>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_products))
        .route("/search", get(search_products))
        .route("/filter", get(filter_products))
        .route("/sort", get(sort_products))
        .route("/query", get(complex_query))
        .route("/bulk", put(bulk_update))
        .route("/{id}", get(show_product))
        .route("/{id}/price", put(update_price))
        .with_state(shared_service)
}

/// List products with pagination
#[utoipa::path(
    get,
    path = "",
    tag = "Catalog",
    params(ListParams),
    responses(
        (status = 200, description = "One page of products", body = ProductPage),
        (status = 400, response = BadRequestValidationResponse),
        (status = 503, response = ServiceUnavailableResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products<S: ProductSource>(
    State(service): State<Arc<CatalogService<S>>>,
    OriginalUri(uri): OriginalUri,
    ValidatedQuery(params): ValidatedQuery<ListParams>,
) -> CatalogResult<Json<ProductPage>> {
    let page = service.list(params, uri.path()).await?;
    Ok(Json(page))
}

/// Search products by title keyword (case-insensitive)
#[utoipa::path(
    get,
    path = "/search",
    tag = "Catalog",
    params(SearchParams),
    responses(
        (status = 200, description = "Matching products", body = Vec<Product>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 503, response = ServiceUnavailableResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn search_products<S: ProductSource>(
    State(service): State<Arc<CatalogService<S>>>,
    ValidatedQuery(params): ValidatedQuery<SearchParams>,
) -> CatalogResult<Json<Vec<Product>>> {
    let products = service.search(&params.name).await?;
    Ok(Json(products))
}

/// Filter products by category and price range
#[utoipa::path(
    get,
    path = "/filter",
    tag = "Catalog",
    params(FilterParams),
    responses(
        (status = 200, description = "Matching products", body = Vec<Product>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 503, response = ServiceUnavailableResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn filter_products<S: ProductSource>(
    State(service): State<Arc<CatalogService<S>>>,
    ValidatedQuery(params): ValidatedQuery<FilterParams>,
) -> CatalogResult<Json<Vec<Product>>> {
    params.check_price_bounds()?;
    let products = service.filter(&params).await?;
    Ok(Json(products))
}

/// Sort products by price or title
#[utoipa::path(
    get,
    path = "/sort",
    tag = "Catalog",
    params(SortParams),
    responses(
        (status = 200, description = "Sorted products", body = Vec<Product>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 503, response = ServiceUnavailableResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn sort_products<S: ProductSource>(
    State(service): State<Arc<CatalogService<S>>>,
    ValidatedQuery(params): ValidatedQuery<SortParams>,
) -> CatalogResult<Json<Vec<Product>>> {
    let products = service.sorted(params.sort_by, params.order).await?;
    Ok(Json(products))
}

/// Combined search, filter and sort query; every parameter is optional
#[utoipa::path(
    get,
    path = "/query",
    tag = "Catalog",
    params(CatalogQuery),
    responses(
        (status = 200, description = "Matching products", body = Vec<Product>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 503, response = ServiceUnavailableResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn complex_query<S: ProductSource>(
    State(service): State<Arc<CatalogService<S>>>,
    ValidatedQuery(params): ValidatedQuery<CatalogQuery>,
) -> CatalogResult<Json<Vec<Product>>> {
    params.check_price_bounds()?;
    let products = service.query(&params).await?;
    Ok(Json(products))
}

/// Apply price/category updates to many products in one request.
///
/// Entries are applied in listed order; entries referencing unknown ids are
/// skipped. Responds with the full resulting collection.
#[utoipa::path(
    put,
    path = "/bulk",
    tag = "Catalog",
    request_body = BulkUpdateRequest,
    responses(
        (status = 200, description = "Full updated collection", body = Vec<Product>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 503, response = ServiceUnavailableResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn bulk_update<S: ProductSource>(
    State(service): State<Arc<CatalogService<S>>>,
    ValidatedJson(request): ValidatedJson<BulkUpdateRequest>,
) -> CatalogResult<Json<Vec<Product>>> {
    let products = service.bulk_update(request.updates).await?;
    Ok(Json(products))
}

/// Get product details by id
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Catalog",
    params(
        ("id" = i64, Path, description = "Product id")
    ),
    responses(
        (status = 200, description = "Product found", body = Product),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 503, response = ServiceUnavailableResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn show_product<S: ProductSource>(
    State(service): State<Arc<CatalogService<S>>>,
    IdPath(id): IdPath,
) -> CatalogResult<Json<Product>> {
    let product = service.show(id).await?;
    Ok(Json(product))
}

/// Update one product's price.
///
/// Durable when the catalog is database-backed. In cache mode the change
/// applies only to the copy returned in this response; the cached snapshot
/// and the upstream API are left untouched.
#[utoipa::path(
    put,
    path = "/{id}/price",
    tag = "Catalog",
    params(
        ("id" = i64, Path, description = "Product id")
    ),
    request_body = PriceUpdate,
    responses(
        (status = 200, description = "Product updated", body = Product),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 503, response = ServiceUnavailableResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_price<S: ProductSource>(
    State(service): State<Arc<CatalogService<S>>>,
    IdPath(id): IdPath,
    ValidatedJson(input): ValidatedJson<PriceUpdate>,
) -> CatalogResult<Json<Product>> {
    let product = service.update_price(id, input.price).await?;
    Ok(Json(product))
}
