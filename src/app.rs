use std::net::SocketAddr;

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use crate::{auth, foods, profiles, recommendations, reference};

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .nest(
            "/api/v1",
            Router::new()
                .merge(auth::router())
                .merge(profiles::router())
                .merge(foods::router())
                .merge(recommendations::router())
                .merge(reference::router())
                .route("/health", get(|| async { "ok" })),
        )
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri, status = tracing::field::Empty)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        let latency_ms = latency.as_millis() as u64;
                        if status.is_server_error() {
                            tracing::error!(%status, latency_ms, "response");
                        } else {
                            tracing::info!(%status, latency_ms, "response");
                        }
                    },
                ),
        )
}

pub async fn serve(app: Router) -> anyhow::Result<()> {
    let addr: SocketAddr = format!(
        "{}:{}",
        std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
        std::env::var("APP_PORT").unwrap_or_else(|_| "8080".into())
    )
    .parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        extract::FromRef,
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::auth::jwt::JwtKeys;
    use crate::foods::Food;
    use crate::profiles::Profile;
    use crate::recommendations::RecommendationEngine;
    use crate::testing::{food, profile, MemoryCatalog, MemoryProfiles};

    fn state(foods: Vec<Food>, profiles: Vec<Profile>) -> AppState {
        let engine = RecommendationEngine::new(
            Arc::new(MemoryCatalog::new(foods)),
            Arc::new(MemoryProfiles::new(profiles)),
            100,
        );
        AppState::fake(engine)
    }

    fn bearer(state: &AppState, user_id: Uuid) -> String {
        let token = JwtKeys::from_ref(state).sign_access(user_id).unwrap();
        format!("Bearer {token}")
    }

    async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
        let res = app.oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn get(uri: &str, auth: &str) -> Request<Body> {
        Request::get(uri)
            .header(header::AUTHORIZATION, auth)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn health_is_public() {
        let app = build_app(state(vec![], vec![]));
        let res = app
            .oneshot(Request::get("/api/v1/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn dietary_patterns_are_public() {
        let app = build_app(state(vec![], vec![]));
        let req = Request::get("/api/v1/reference/dietary-patterns")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(app, req).await;

        assert_eq!(status, StatusCode::OK);
        let names: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, ["vegetarian", "vegan", "pescatarian"]);
        assert_eq!(body[1]["restrictions"][5], "honey");
    }

    #[tokio::test]
    async fn recommendations_require_a_token() {
        let app = build_app(state(vec![], vec![]));
        let res = app
            .oneshot(Request::get("/api/v1/recommendations").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn recommendations_use_default_profile() {
        let user = Uuid::new_v4();
        let mut p = profile(user);
        p.allergens = vec!["peanuts".into()];
        let mut f1 = food("f1");
        f1.labels = vec!["peanuts".into()];

        let st = state(vec![f1, food("f2")], vec![p]);
        let auth = bearer(&st, user);
        let (status, body) = send(build_app(st), get("/api/v1/recommendations?limit=10", &auth)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_count"], 1);
        assert_eq!(body["foods"][0]["id"], "f2");
        assert_eq!(body["applied_rules"][0]["type"], "allergen");
    }

    #[tokio::test]
    async fn filter_endpoint_applies_custom_rules() {
        let user = Uuid::new_v4();
        let mut heavy = food("heavy");
        heavy.nutrition_100g.insert("sugar".into(), json!("40"));

        let st = state(vec![heavy, food("light")], vec![profile(user)]);
        let auth = bearer(&st, user);
        let req = Request::post("/api/v1/recommendations/filter")
            .header(header::AUTHORIZATION, auth)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                json!({
                    "custom_rules": [
                        {"type": "nutrient", "operation": "max", "target": "sugar", "value": 10, "priority": 80}
                    ]
                })
                .to_string(),
            ))
            .unwrap();
        let (status, body) = send(build_app(st), req).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_count"], 1);
        assert_eq!(body["foods"][0]["id"], "light");
    }

    fn post_json(uri: &str, auth: &str, body: String) -> Request<Body> {
        Request::post(uri)
            .header(header::AUTHORIZATION, auth)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    fn two_profiles(user: Uuid) -> (Vec<Profile>, Uuid) {
        let relaxed = profile(user);
        let mut strict = profile(user);
        strict.is_default = false;
        strict.allergens = vec!["peanuts".into()];
        let strict_id = strict.id;
        (vec![relaxed, strict], strict_id)
    }

    fn nut_and_rice() -> Vec<Food> {
        let mut nut = food("nut");
        nut.labels = vec!["peanuts".into()];
        vec![nut, food("rice")]
    }

    #[tokio::test]
    async fn filter_keeps_explicit_profile_with_unrecognized_rule() {
        let user = Uuid::new_v4();
        let (profiles, strict_id) = two_profiles(user);
        let st = state(nut_and_rice(), profiles);
        let auth = bearer(&st, user);

        let body = json!({
            "profile_id": strict_id,
            "custom_rules": [
                {"type": "texture", "operation": "exclude", "target": "crunchy", "priority": 10}
            ]
        });
        let (status, body) = send(
            build_app(st),
            post_json("/api/v1/recommendations/filter", &auth, body.to_string()),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_count"], 1);
        assert_eq!(body["foods"][0]["id"], "rice");
        assert_eq!(body["applied_rules"][0]["type"], "allergen");
        assert_eq!(body["applied_rules"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn filter_rejects_malformed_body_instead_of_defaulting() {
        let user = Uuid::new_v4();
        let (profiles, strict_id) = two_profiles(user);
        let st = state(nut_and_rice(), profiles);
        let auth = bearer(&st, user);
        let app = build_app(st);

        let bad_field = json!({"profile_id": strict_id, "limit": "ten"}).to_string();
        let (status, body) = send(
            app.clone(),
            post_json("/api/v1/recommendations/filter", &auth, bad_field),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_INPUT");

        let (status, _) = send(
            app.clone(),
            post_json("/api/v1/recommendations/filter", &auth, "{\"profile_id\": ".into()),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        // an empty body still means "default profile, no extra rules"
        let (status, body) = send(
            app,
            post_json("/api/v1/recommendations/filter", &auth, String::new()),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_count"], 2);
    }

    #[tokio::test]
    async fn bad_query_and_path_values_use_error_body() {
        let user = Uuid::new_v4();
        let st = state(vec![food("a")], vec![profile(user)]);
        let auth = bearer(&st, user);
        let app = build_app(st);

        let (status, body) = send(app.clone(), get("/api/v1/recommendations?limit=abc", &auth)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_INPUT");

        let (status, body) = send(app, get("/api/v1/recommendations/meal-plan/not-a-uuid", &auth)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_INPUT");
    }

    #[tokio::test]
    async fn foreign_profile_is_forbidden() {
        let owner = Uuid::new_v4();
        let p = profile(owner);
        let pid = p.id;
        let st = state(vec![food("a")], vec![p]);
        let auth = bearer(&st, Uuid::new_v4());
        let app = build_app(st);

        let (status, body) = send(
            app.clone(),
            get(&format!("/api/v1/recommendations?profile_id={pid}"), &auth),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"]["code"], "FORBIDDEN");

        let (status, _) = send(
            app,
            get(&format!("/api/v1/recommendations/meal-plan/{pid}"), &auth),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn missing_default_profile_is_not_found() {
        let user = Uuid::new_v4();
        let st = state(vec![food("a")], vec![]);
        let auth = bearer(&st, user);
        let (status, body) = send(build_app(st), get("/api/v1/recommendations", &auth)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn meal_plan_defaults_to_a_week() {
        let user = Uuid::new_v4();
        let p = profile(user);
        let pid = p.id;
        let st = state((0..4).map(|i| food(&format!("f{i}"))).collect(), vec![p]);
        let auth = bearer(&st, user);

        let (status, body) = send(
            build_app(st),
            get(&format!("/api/v1/recommendations/meal-plan/{pid}"), &auth),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_days"], 7);
        let days = body["days"].as_array().unwrap();
        assert_eq!(days.len(), 7);
        assert_eq!(days[0]["date"], "Day 1");
        assert_eq!(days[0]["meals"][0]["type"], "breakfast");
        assert_eq!(days[0]["meals"][2]["foods"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn alternatives_default_limit_and_unknown_food() {
        let user = Uuid::new_v4();
        let foods: Vec<Food> = (0..8)
            .map(|i| {
                let mut f = food(&format!("s{i}"));
                f.food_type = Some("snack".into());
                f
            })
            .collect();
        let st = state(foods, vec![]);
        let auth = bearer(&st, user);
        let app = build_app(st);

        let (status, body) = send(app.clone(), get("/api/v1/recommendations/alternatives/s0", &auth)).await;
        assert_eq!(status, StatusCode::OK);
        let alts = body.as_array().unwrap();
        assert_eq!(alts.len(), 5);
        assert!(alts.iter().all(|f| f["id"] != "s0"));

        let (status, _) = send(app, get("/api/v1/recommendations/alternatives/nope", &auth)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn daily_checks_ownership_then_returns_foods() {
        let user = Uuid::new_v4();
        let p = profile(user);
        let pid = p.id;
        let st = state((0..9).map(|i| food(&format!("f{i}"))).collect(), vec![p]);
        let auth = bearer(&st, user);

        let (status, body) = send(
            build_app(st),
            get(&format!("/api/v1/recommendations/daily/{pid}"), &auth),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 5);
    }
}
