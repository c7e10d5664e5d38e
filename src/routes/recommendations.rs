use crate::core::{assemble, MatchMode, Matcher};
use crate::models::{
    ErrorResponse, EstimateRequest, EstimateResponse, FieldUpdates, HealthResponse,
    PreferencesResponse, RecommendQuery, RecommendResponse,
};
use crate::services::{PostgresClient, PostgresError, PricePredictor, RecommendationCache};
use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use validator::Validate;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub postgres: Arc<PostgresClient>,
    pub cache: Arc<RecommendationCache>,
    pub predictor: Arc<PricePredictor>,
    pub matcher: Matcher,
    pub default_mode: MatchMode,
}

/// Configure all recommendation-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route(
            "/clients/{client_id}/preferences",
            web::post().to(upsert_preferences),
        )
        .route(
            "/clients/{client_id}/preferences",
            web::delete().to(delete_preferences),
        )
        .route(
            "/clients/{client_id}/recommendations",
            web::get().to(recommend),
        )
        .route("/clients/{client_id}", web::delete().to(delete_client))
        .route("/listings/estimate", web::post().to(estimate_price))
        .route("/listings/{listing_id}", web::delete().to(delete_listing));
}

fn error_json(status: u16, error: &str, message: String) -> HttpResponse {
    let body = ErrorResponse {
        error: error.to_string(),
        message,
        status_code: status,
    };
    match status {
        400 => HttpResponse::BadRequest().json(body),
        404 => HttpResponse::NotFound().json(body),
        _ => HttpResponse::InternalServerError().json(body),
    }
}

fn postgres_error_response(err: PostgresError) -> HttpResponse {
    match err {
        PostgresError::ClientNotFound(id) => error_json(
            404,
            "client_not_found",
            format!("No client with id {}", id),
        ),
        PostgresError::InvalidPreference(e) => {
            error_json(400, "invalid_preference", e.to_string())
        }
        other => {
            tracing::error!("database error: {}", other);
            error_json(500, "database_error", other.to_string())
        }
    }
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let pg_healthy = state.postgres.health_check().await.unwrap_or(false);

    let status = if pg_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Create or merge a client's preference profile
///
/// POST /api/v1/clients/{client_id}/preferences
///
/// The body is a sparse map of preference fields. Absent fields keep their
/// stored value; fields set to null are cleared.
async fn upsert_preferences(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<FieldUpdates>,
) -> impl Responder {
    let client_id = path.into_inner();

    tracing::info!(
        "upserting {} preference field(s) for client {}",
        body.len(),
        client_id
    );

    let profile = match state
        .postgres
        .upsert_preferences(state.matcher.schema(), client_id, &body)
        .await
    {
        Ok(profile) => profile,
        Err(e) => return postgres_error_response(e),
    };

    if let Err(e) = state.cache.invalidate_client(client_id).await {
        tracing::warn!("failed to invalidate cache for client {}: {}", client_id, e);
    }

    HttpResponse::Created().json(PreferencesResponse {
        client_id: profile.client_id,
        fields: profile.fields,
    })
}

/// Delete a client's preference profile
///
/// DELETE /api/v1/clients/{client_id}/preferences
async fn delete_preferences(state: web::Data<AppState>, path: web::Path<i64>) -> impl Responder {
    let client_id = path.into_inner();

    match state.postgres.delete_preferences(client_id).await {
        Ok(true) => {
            if let Err(e) = state.cache.invalidate_client(client_id).await {
                tracing::warn!("failed to invalidate cache for client {}: {}", client_id, e);
            }
            HttpResponse::Ok().json(serde_json::json!({
                "message": "Preferences deleted"
            }))
        }
        Ok(false) => error_json(
            404,
            "preferences_not_found",
            format!("Client {} has no stored preferences", client_id),
        ),
        Err(e) => postgres_error_response(e),
    }
}

/// Recommend listings matching a client's stored preferences
///
/// GET /api/v1/clients/{client_id}/recommendations?mode=all|any
async fn recommend(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    query: web::Query<RecommendQuery>,
) -> impl Responder {
    let client_id = path.into_inner();
    let mode = query.mode.unwrap_or(state.default_mode);

    let client = match state.postgres.get_client(client_id).await {
        Ok(Some(client)) => client,
        Ok(None) => {
            return error_json(
                404,
                "client_not_found",
                format!("No client with id {}", client_id),
            );
        }
        Err(e) => return postgres_error_response(e),
    };

    // Serve from cache when possible; entries are invalidated on any
    // preference or listing change.
    match state.cache.get_recommendations(client_id, mode).await {
        Ok(Some(cached)) => {
            tracing::debug!("serving cached recommendations for client {}", client_id);
            return HttpResponse::Ok().json(cached);
        }
        Ok(None) => {}
        Err(e) => tracing::warn!("cache read failed for client {}: {}", client_id, e),
    }

    let profile = match state.postgres.get_preferences(client_id).await {
        Ok(profile) => profile,
        Err(e) => return postgres_error_response(e),
    };

    let Some(profile) = profile else {
        // No stored profile: an empty result, not an error.
        return HttpResponse::Ok().json(RecommendResponse {
            client: Some(client),
            matches: vec![],
            preferences_applied: None,
            total_candidates: 0,
        });
    };

    let candidates = match state.postgres.available_listings().await {
        Ok(candidates) => candidates,
        Err(e) => return postgres_error_response(e),
    };

    let outcome = state.matcher.find_matches(&profile, candidates, mode);

    let mut vendor_ids: Vec<i64> = outcome.matches.iter().map(|l| l.vendor_id).collect();
    vendor_ids.sort_unstable();
    vendor_ids.dedup();

    let vendors = match state.postgres.vendors_by_ids(&vendor_ids).await {
        Ok(vendors) => vendors,
        Err(e) => return postgres_error_response(e),
    };

    let matches = assemble(outcome.matches, &vendors);

    let response = RecommendResponse {
        client: Some(client),
        matches,
        preferences_applied: Some(profile.fields),
        total_candidates: outcome.total_candidates,
    };

    tracing::info!(
        "returning {} matches for client {} (from {} candidates, {:?})",
        response.matches.len(),
        client_id,
        response.total_candidates,
        mode
    );

    if let Err(e) = state
        .cache
        .put_recommendations(client_id, mode, &response)
        .await
    {
        tracing::warn!("failed to cache recommendations for client {}: {}", client_id, e);
    }

    HttpResponse::Ok().json(response)
}

/// Delete a client; the preference profile cascades away in the database
///
/// DELETE /api/v1/clients/{client_id}
async fn delete_client(state: web::Data<AppState>, path: web::Path<i64>) -> impl Responder {
    let client_id = path.into_inner();

    match state.postgres.delete_client(client_id).await {
        Ok(true) => {
            if let Err(e) = state.cache.invalidate_client(client_id).await {
                tracing::warn!("failed to invalidate cache for client {}: {}", client_id, e);
            }
            HttpResponse::Ok().json(serde_json::json!({
                "message": "Client deleted"
            }))
        }
        Ok(false) => error_json(
            404,
            "client_not_found",
            format!("No client with id {}", client_id),
        ),
        Err(e) => postgres_error_response(e),
    }
}

/// Delete a listing
///
/// DELETE /api/v1/listings/{listing_id}
async fn delete_listing(state: web::Data<AppState>, path: web::Path<i64>) -> impl Responder {
    let listing_id = path.into_inner();

    match state.postgres.delete_listing(listing_id).await {
        Ok(true) => {
            // The pool shrank; any cached result may reference the listing.
            if let Err(e) = state.cache.invalidate_all().await {
                tracing::warn!("failed to invalidate recommendation cache: {}", e);
            }
            HttpResponse::Ok().json(serde_json::json!({
                "message": "Listing deleted"
            }))
        }
        Ok(false) => error_json(
            404,
            "listing_not_found",
            format!("No listing with id {}", listing_id),
        ),
        Err(e) => postgres_error_response(e),
    }
}

/// Estimate a sale price for a prospective listing
///
/// POST /api/v1/listings/estimate
///
/// Request body:
/// ```json
/// {
///   "attributes": { "GrLivArea": 1822.0, "Neighborhood": "NridgHt" }
/// }
/// ```
async fn estimate_price(
    state: web::Data<AppState>,
    req: web::Json<EstimateRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return error_json(400, "validation_failed", errors.to_string());
    }

    match state.predictor.predict(&req.attributes).await {
        Ok(price) => HttpResponse::Ok().json(EstimateResponse {
            predicted_price: price,
        }),
        Err(e) => {
            tracing::error!("price prediction failed: {}", e);
            error_json(500, "prediction_failed", e.to_string())
        }
    }
}
