//! Generated API documentation.
//!
//! The OpenAPI 3.0 document is assembled once at startup and served as JSON;
//! `/api-docs` renders it with Swagger UI.

use axum::{extract::State, response::Html, Json};
use serde_json::{json, Value};

use crate::state::AppState;

pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";

const SWAGGER_UI_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8" />
    <title>TweetAI API</title>
    <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css" />
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js" crossorigin></script>
    <script>
        window.onload = () => {
            window.ui = SwaggerUIBundle({ url: '__OPENAPI_PATH__', dom_id: '#swagger-ui' });
        };
    </script>
</body>
</html>
"#;

/// GET /api-docs - Swagger UI
pub async fn swagger_ui() -> Html<String> {
    Html(SWAGGER_UI_PAGE.replace("__OPENAPI_PATH__", OPENAPI_PATH))
}

/// GET /api-docs/openapi.json - Raw OpenAPI document
pub async fn openapi_json(State(state): State<AppState>) -> Json<Value> {
    Json(state.api_docs.as_ref().clone())
}

fn id_parameter(description: &str) -> Value {
    json!({
        "in": "path",
        "name": "id",
        "required": true,
        "schema": { "type": "integer" },
        "description": description
    })
}

fn list_of(schema: &str, description: &str) -> Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": {
                    "type": "array",
                    "maxItems": 10,
                    "items": { "$ref": format!("#/components/schemas/{}", schema) }
                }
            }
        }
    })
}

fn throttled_responses(ok: Value) -> Value {
    json!({
        "200": ok,
        "429": { "$ref": "#/components/responses/TooManyRequests" },
        "500": { "$ref": "#/components/responses/InternalError" }
    })
}

/// Responses for throttled routes that also take an `{id}` path parameter
fn throttled_id_responses(ok: Value) -> Value {
    let mut responses = throttled_responses(ok);
    responses["400"] = json!({ "$ref": "#/components/responses/BadRequest" });
    responses
}

/// Build the OpenAPI document describing every public endpoint
pub fn openapi_document(server_url: &str) -> Value {
    json!({
        "openapi": "3.0.0",
        "info": {
            "title": "TweetAI API",
            "version": "1.0.0",
            "description": "API documentation for the TweetAI platform"
        },
        "servers": [{ "url": server_url }],
        "paths": paths(),
        "components": {
            "schemas": schemas(),
            "responses": shared_responses()
        }
    })
}

fn paths() -> Value {
    let autobots = json!({
        "get": {
            "summary": "Retrieve a list of Autobots",
            "tags": ["Autobots"],
            "responses": throttled_responses(list_of("Autobot", "A list of Autobots"))
        }
    });

    let autobot_posts = json!({
        "get": {
            "summary": "Retrieve a list of Posts by Autobot's ID",
            "description": "Retrieve a list of posts associated with a specific Autobot using the Autobot's ID.",
            "tags": ["Autobots"],
            "parameters": [id_parameter("The ID of the Autobot for which to retrieve posts")],
            "responses": throttled_id_responses(list_of("Post", "A list of Posts"))
        }
    });

    let post_comments = json!({
        "get": {
            "summary": "Retrieve a list of comments by Post's ID",
            "description": "Retrieve a list of comments associated with a specific Post using the Post's ID.",
            "tags": ["Posts"],
            "parameters": [id_parameter("The ID of the Post for which to retrieve comments")],
            "responses": throttled_id_responses(list_of("Comment", "A list of comments"))
        }
    });

    let update_count = json!({
        "post": {
            "summary": "Update the Autobot count",
            "description": "Counts the Autobots and pushes the total to every client connected to /ws as an autobot-count event.",
            "tags": ["Autobots"],
            "responses": {
                "200": {
                    "description": "Count broadcast",
                    "content": { "text/plain": { "schema": { "type": "string", "example": "OK" } } }
                },
                "500": { "$ref": "#/components/responses/InternalError" }
            }
        }
    });

    json!({
        "/api/autobots": autobots,
        "/api/autobots/{id}/posts": autobot_posts,
        "/api/posts/{id}/comments": post_comments,
        "/api/update-autobot-count": update_count
    })
}

fn schemas() -> Value {
    let autobot = json!({
        "type": "object",
        "properties": {
            "id": { "type": "integer", "description": "The Autobot ID", "example": 1 },
            "username": { "type": "string", "description": "The Autobot username", "example": "Bret" },
            "name": { "type": "string", "description": "The Autobot name", "example": "Nicholas Runolfsdottir V" },
            "email": { "type": "string", "description": "The Autobot email", "example": "Rey.Padberg@karina.biz" }
        }
    });

    let post = json!({
        "type": "object",
        "properties": {
            "id": { "type": "integer", "description": "The Post ID", "example": 1 },
            "title": { "type": "string", "description": "The Post title", "example": "labore in ex et explicabo corporis aut quas" },
            "body": { "type": "string", "description": "The Post body" },
            "autobot_id": { "type": "integer", "description": "The Autobot ID", "example": 1 }
        }
    });

    let comment = json!({
        "type": "object",
        "properties": {
            "id": { "type": "integer", "description": "The Comment ID", "example": 1 },
            "post_id": { "type": "integer", "description": "The Post ID", "example": 9 },
            "body": { "type": "string", "description": "The Comment body" }
        }
    });

    let error = json!({
        "type": "object",
        "properties": {
            "error": { "type": "string" },
            "details": { "type": "string", "nullable": true }
        }
    });

    json!({
        "Autobot": autobot,
        "Post": post,
        "Comment": comment,
        "ErrorResponse": error
    })
}

fn shared_responses() -> Value {
    let error_body = json!({
        "application/json": { "schema": { "$ref": "#/components/schemas/ErrorResponse" } }
    });

    json!({
        "BadRequest": {
            "description": "The path id is not an integer",
            "content": error_body.clone()
        },
        "TooManyRequests": {
            "description": "More than the allowed number of requests from this address in the current window",
            "headers": { "Retry-After": { "schema": { "type": "integer" } } },
            "content": { "text/plain": { "schema": { "type": "string", "example": "Too Many Requests" } } }
        },
        "InternalError": {
            "description": "Database failure",
            "content": error_body
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_endpoint() {
        let doc = openapi_document("http://localhost:3000");
        let paths = doc["paths"].as_object().expect("paths should be an object");

        assert!(paths["/api/autobots"]["get"].is_object());
        assert!(paths["/api/autobots/{id}/posts"]["get"].is_object());
        assert!(paths["/api/posts/{id}/comments"]["get"].is_object());
        assert!(paths["/api/update-autobot-count"]["post"].is_object());
        assert_eq!(doc["servers"][0]["url"], "http://localhost:3000");
        assert_eq!(doc["info"]["title"], "TweetAI API");
    }

    #[test]
    fn test_throttled_endpoints_document_429() {
        let doc = openapi_document("http://localhost:3000");
        for path in ["/api/autobots", "/api/autobots/{id}/posts", "/api/posts/{id}/comments"] {
            assert!(
                doc["paths"][path]["get"]["responses"]["429"].is_object(),
                "{} should document the rate limit response",
                path
            );
        }
        assert!(doc["paths"]["/api/update-autobot-count"]["post"]["responses"]["429"].is_null());
    }

    #[test]
    fn test_bad_request_only_on_id_routes() {
        let doc = openapi_document("http://localhost:3000");
        assert!(doc["paths"]["/api/autobots"]["get"]["responses"]["400"].is_null());
        for path in ["/api/autobots/{id}/posts", "/api/posts/{id}/comments"] {
            assert_eq!(
                doc["paths"][path]["get"]["responses"]["400"]["$ref"],
                "#/components/responses/BadRequest"
            );
        }
    }
}
