//! OpenAPI specification and Swagger UI

use axum::http::header;
use axum::response::{Html, IntoResponse, Json};
use utoipa::OpenApi;

use crate::api::routes::{health, incidents, metrics};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Incidents API",
        version = env!("CARGO_PKG_VERSION"),
        description = "Read-only reporting over shelling incident records"
    ),
    tags(
        (name = "health", description = "Health check endpoint"),
        (name = "incidents", description = "Filtered, paginated incident listing"),
        (name = "metrics", description = "Aggregate incident metrics")
    ),
    paths(
        health::health,
        incidents::list_incidents,
        metrics::summary,
        metrics::timeseries,
        metrics::by_source,
        metrics::by_direction,
        metrics::heatmap,
    ),
    components(schemas(
        health::HealthResponse,
        incidents::types::IncidentDto,
        metrics::types::SummaryDto,
        metrics::types::PeriodCountDto,
        metrics::types::KeyCountDto,
        metrics::types::HeatmapCellDto,
    ))
)]
pub struct ApiDoc;

/// Serve OpenAPI JSON specification
pub async fn openapi_json() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/json")],
        Json(ApiDoc::openapi()),
    )
}

/// Serve Swagger UI from CDN
pub async fn swagger_ui_html() -> Html<&'static str> {
    Html(SWAGGER_UI_HTML)
}

const SWAGGER_UI_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Incidents API Documentation</title>
    <link rel="stylesheet" type="text/css" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css">
    <style>
        html { box-sizing: border-box; overflow-y: scroll; }
        *, *:before, *:after { box-sizing: inherit; }
        body { margin: 0; background: #fafafa; }
    </style>
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-standalone-preset.js"></script>
    <script>
        window.onload = () => {
            window.ui = SwaggerUIBundle({
                url: "/api/openapi.json",
                dom_id: '#swagger-ui',
                presets: [
                    SwaggerUIBundle.presets.apis,
                    SwaggerUIStandalonePreset
                ],
                layout: "StandaloneLayout",
                deepLinking: true,
                showExtensions: true,
                showCommonExtensions: true
            });
        };
    </script>
</body>
</html>"#;


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_all_endpoints() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/health",
            "/api/incidents",
            "/api/metrics/summary",
            "/api/metrics/timeseries",
            "/api/metrics/by_source",
            "/api/metrics/by_direction",
            "/api/metrics/heatmap",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
        assert_eq!(doc.info.title, "Incidents API");
    }

    #[test]
    fn test_swagger_ui_points_at_openapi_json() {
        assert!(SWAGGER_UI_HTML.contains("/api/openapi.json"));
    }
}
