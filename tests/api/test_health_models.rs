// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! GET /health and GET /models tests

use crate::common::*;
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use std::sync::Arc;

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[cfg(test)]
mod health_models_tests {
    use super::*;

    #[tokio::test]
    async fn test_health_reports_loaded_model() {
        let (status, json) = send(test_app(mock_service(512)), get("/health")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
        assert_eq!(json["model"], "vit-b-32");
        assert_eq!(json["device"], "cpu");
        assert_eq!(json["dimension"], 512);
        assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_health_dimension_follows_encoder() {
        let service = service_with("vit-l-14", Arc::new(MockEncoder { dimension: 768 }));
        let (_, json) = send(test_app(service), get("/health")).await;

        assert_eq!(json["model"], "vit-l-14");
        assert_eq!(json["dimension"], 768);
    }

    #[tokio::test]
    async fn test_models_lists_catalog() {
        let service = service_with("vit-b-16", Arc::new(MockEncoder { dimension: 512 }));
        let (status, json) = send(test_app(service), get("/models")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["current"], "vit-b-16");

        let available: Vec<&str> = json["available"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert_eq!(available, vec!["vit-b-32", "vit-b-16", "vit-l-14", "vit-l-14-336"]);

        assert_eq!(json["models"]["vit-b-32"]["dim"], 512);
        assert_eq!(json["models"]["vit-b-32"]["speed"], "fast");
        assert_eq!(json["models"]["vit-l-14"]["dim"], 768);
        assert_eq!(json["models"]["vit-l-14-336"]["quality"], "best+");
        assert_eq!(json["models"]["vit-l-14-336"]["speed"], "slowest");
    }

    #[tokio::test]
    async fn test_cors_preflight_allowed() {
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/embed")
            .header("Origin", "http://example.com")
            .header("Access-Control-Request-Method", "POST")
            .body(Body::empty())
            .unwrap();

        let response = tower::ServiceExt::oneshot(test_app(mock_service(512)), request)
            .await
            .unwrap();

        assert!(response.status().is_success());
        assert_eq!(
            response.headers()["access-control-allow-origin"],
            "*"
        );
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let response = tower::ServiceExt::oneshot(test_app(mock_service(512)), get("/embed/text"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
