//! The voice webhook: `POST /alexa`.
//!
//! The handler validates the envelope at the boundary, lets the pure dialogue
//! machine decide, performs whatever repository IO the decision asks for, and
//! phrases the outcome. Every failure past the boundary still returns a
//! normal-shaped envelope with HTTP 200 — the platform has no error channel.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use estoque_core::dialogue::phrases;
use estoque_core::{decide, Decision, ResponseBuilder, TurnRequest, TurnResponse};
use estoque_db::StockRepository;
use serde_json::Value;
use tracing::{error, info, warn};

#[derive(Clone)]
pub struct WebhookState {
    repo: Arc<dyn StockRepository>,
}

pub fn router(repo: Arc<dyn StockRepository>) -> Router {
    Router::new().route("/alexa", post(alexa_webhook)).with_state(WebhookState { repo })
}

pub async fn alexa_webhook(
    State(state): State<WebhookState>,
    Json(payload): Json<Value>,
) -> (StatusCode, Json<TurnResponse>) {
    let turn: TurnRequest = match serde_json::from_value(payload) {
        Ok(turn) => turn,
        Err(parse_error) => {
            warn!(
                event_name = "webhook.payload_rejected",
                error = %parse_error,
                "rejecting malformed turn payload at the boundary"
            );
            let response = ResponseBuilder::speak(phrases::REQUISICAO_INVALIDA)
                .end_session(true)
                .build();
            return (StatusCode::BAD_REQUEST, Json(response));
        }
    };

    (StatusCode::OK, Json(handle_turn(state.repo.as_ref(), &turn).await))
}

pub async fn handle_turn(repo: &dyn StockRepository, turn: &TurnRequest) -> TurnResponse {
    match decide(turn) {
        Decision::Reply { speech, end_session, state } => ResponseBuilder::speak(speech)
            .end_session(end_session)
            .attributes(state.to_attributes())
            .build(),
        Decision::Lookup { material, state } => {
            let attributes = state.to_attributes();
            match repo.find_by_name_fragment(&material).await {
                Ok(hits) => {
                    info!(
                        event_name = "webhook.lookup",
                        material = %material,
                        hits = hits.len(),
                        "location lookup served"
                    );
                    let speech =
                        format!("{}{}", phrases::resultados_busca(&hits), phrases::BUSCAR_OUTRO);
                    ResponseBuilder::speak(speech).attributes(attributes).build()
                }
                Err(repo_error) => {
                    error!(
                        event_name = "webhook.lookup_failed",
                        material = %material,
                        error = %repo_error,
                        "location lookup failed"
                    );
                    // Lookup has no multi-turn form to abandon; the bag stays.
                    ResponseBuilder::speak(phrases::ERRO_BUSCA).attributes(attributes).build()
                }
            }
        }
        Decision::Commit { material, quantidade, setor } => {
            let result = repo
                .upsert_stock(&material, quantidade, setor, turn.user_id(), turn.device_id())
                .await;
            // Terminal either way, bag cleared either way; the user must
            // re-initiate after a failure.
            match result {
                Ok(item_id) => {
                    info!(
                        event_name = "webhook.stock_committed",
                        material = %material,
                        quantidade,
                        setor,
                        item_id,
                        "stock inclusion committed"
                    );
                    ResponseBuilder::speak(phrases::sucesso(&material, quantidade, setor))
                        .end_session(true)
                        .build()
                }
                Err(repo_error) => {
                    error!(
                        event_name = "webhook.commit_failed",
                        material = %material,
                        error = %repo_error,
                        "stock inclusion failed"
                    );
                    ResponseBuilder::speak(phrases::ERRO_GRAVACAO).end_session(true).build()
                }
            }
        }
        Decision::SessionEndedAck => TurnResponse::session_ended_ack(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::extract::State;
    use axum::http::StatusCode;
    use axum::Json;
    use estoque_core::dialogue::phrases;
    use estoque_core::TurnRequest;
    use estoque_db::InMemoryStockRepository;
    use serde_json::{json, Value};

    use super::{alexa_webhook, handle_turn, WebhookState};

    fn turn(request: Value, attributes: Value) -> TurnRequest {
        serde_json::from_value(json!({
            "version": "1.0",
            "session": {"attributes": attributes, "user": {"userId": "amzn1.user.test"}},
            "context": {"System": {"device": {"deviceId": "amzn1.device.test"}}},
            "request": request,
        }))
        .expect("envelope should deserialize")
    }

    fn speech_of(response: &estoque_core::TurnResponse) -> String {
        response.response.as_ref().expect("body").output_speech.ssml.clone()
    }

    #[tokio::test]
    async fn lookup_names_each_hit_and_asks_to_search_again() {
        let repo = InMemoryStockRepository::with_items(&[("Parafuso M6", 10, 3)]);
        let request = turn(
            json!({
                "type": "IntentRequest",
                "intent": {
                    "name": "ConsultaMaterialIntent",
                    "slots": {"material": {"value": "parafuso"}}
                }
            }),
            json!({}),
        );

        let response = handle_turn(&repo, &request).await;
        let speech = speech_of(&response);

        assert!(speech.contains("Parafuso M6"));
        assert!(speech.contains("setor 3"));
        assert!(speech.contains("Deseja buscar outro material?"));
        assert!(!response.response.as_ref().expect("body").should_end_session);
    }

    #[tokio::test]
    async fn lookup_miss_speaks_the_fixed_not_found_phrase() {
        let repo = InMemoryStockRepository::new();
        let request = turn(
            json!({
                "type": "IntentRequest",
                "intent": {
                    "name": "ConsultaMaterialIntent",
                    "slots": {"material": {"value": "martelo"}}
                }
            }),
            json!({}),
        );

        let speech = speech_of(&handle_turn(&repo, &request).await);
        assert!(speech.contains(phrases::MATERIAL_NAO_ENCONTRADO));
    }

    #[tokio::test]
    async fn lookup_failure_apologizes_and_keeps_the_bag() {
        let repo = InMemoryStockRepository::new();
        repo.fail_requests(true);
        let request = turn(
            json!({
                "type": "IntentRequest",
                "intent": {
                    "name": "ConsultaMaterialIntent",
                    "slots": {"material": {"value": "cabo"}}
                }
            }),
            json!({"flow": "ASK_QTD", "material": "porca"}),
        );

        let response = handle_turn(&repo, &request).await;
        assert!(speech_of(&response).contains(phrases::ERRO_BUSCA));
        assert_eq!(response.session_attributes.get("flow"), Some(&json!("ASK_QTD")));
        assert_eq!(response.session_attributes.get("material"), Some(&json!("porca")));
    }

    #[tokio::test]
    async fn affirmative_commits_once_with_envelope_identifiers() {
        let repo = InMemoryStockRepository::new();
        let request = turn(
            json!({"type": "IntentRequest", "intent": {"name": "AMAZON.YesIntent"}}),
            json!({"flow": "CONFIRM", "material": "cabo", "quantidade": "10", "setor": "4"}),
        );

        let response = handle_turn(&repo, &request).await;

        let calls = repo.upsert_calls();
        assert_eq!(calls.len(), 1, "exactly one upsert per confirmation");
        assert_eq!(calls[0].nome, "cabo");
        assert_eq!(calls[0].quantidade, 10);
        assert_eq!(calls[0].setor, 4);
        assert_eq!(calls[0].user_id.as_deref(), Some("amzn1.user.test"));
        assert_eq!(calls[0].device_id.as_deref(), Some("amzn1.device.test"));

        let body = response.response.as_ref().expect("body");
        assert!(body.should_end_session);
        assert!(body.reprompt.is_none());
        assert!(response.session_attributes.is_empty(), "bag cleared after commit");
        assert!(speech_of(&response).contains("com sucesso"));
    }

    #[tokio::test]
    async fn commit_failure_is_terminal_and_clears_the_bag_too() {
        let repo = InMemoryStockRepository::new();
        repo.fail_requests(true);
        let request = turn(
            json!({"type": "IntentRequest", "intent": {"name": "AMAZON.YesIntent"}}),
            json!({"flow": "CONFIRM", "material": "cabo", "quantidade": "10", "setor": "4"}),
        );

        let response = handle_turn(&repo, &request).await;
        let body = response.response.as_ref().expect("body");

        assert!(speech_of(&response).contains(phrases::ERRO_GRAVACAO));
        assert!(body.should_end_session);
        assert!(body.reprompt.is_none());
        assert!(response.session_attributes.is_empty());
    }

    #[tokio::test]
    async fn four_turn_flow_over_the_wire_shapes() {
        let repo = InMemoryStockRepository::new();

        let mut attributes = json!({});
        let slots = [
            json!({"material": {"value": "cabo"}}),
            json!({"quantidade": {"value": "10"}}),
            json!({"setor": {"value": "4"}}),
        ];
        let mut last_speech = String::new();
        for slot in slots {
            let request = turn(
                json!({
                    "type": "IntentRequest",
                    "intent": {"name": "IncluirEstoqueIntent", "slots": slot}
                }),
                attributes,
            );
            let response = handle_turn(&repo, &request).await;
            last_speech = speech_of(&response);
            attributes = Value::Object(response.session_attributes);
        }

        assert!(last_speech.contains("10"));
        assert!(last_speech.contains("cabo"));
        assert!(last_speech.contains("setor 4"));

        let request = turn(
            json!({"type": "IntentRequest", "intent": {"name": "AMAZON.YesIntent"}}),
            attributes,
        );
        let response = handle_turn(&repo, &request).await;

        assert_eq!(repo.upsert_calls().len(), 1);
        assert_eq!(repo.quantity_of("cabo"), Some(10));
        assert!(response.session_attributes.is_empty());
        assert!(response.response.expect("body").should_end_session);
    }

    #[tokio::test]
    async fn malformed_payload_is_rejected_with_http_400() {
        let state = WebhookState { repo: Arc::new(InMemoryStockRepository::new()) };

        let (status, Json(response)) =
            alexa_webhook(State(state), Json(json!({"version": "1.0"}))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let body = response.response.expect("body");
        assert!(body.output_speech.ssml.contains(phrases::REQUISICAO_INVALIDA));
        assert!(body.should_end_session);
    }

    #[tokio::test]
    async fn router_serves_the_alexa_route() {
        use axum::body::Body;
        use axum::http::Request;
        use tower::ServiceExt;

        let router = super::router(Arc::new(InMemoryStockRepository::new()));
        let payload = json!({"version": "1.0", "request": {"type": "LaunchRequest"}});

        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/alexa")
                    .header("content-type", "application/json")
                    .body(Body::from(payload.to_string()))
                    .expect("request should build"),
            )
            .await
            .expect("router should respond");

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn session_ended_request_gets_a_bare_ack() {
        let repo = InMemoryStockRepository::new();
        let request = turn(json!({"type": "SessionEndedRequest"}), json!({}));

        let response = handle_turn(&repo, &request).await;
        let wire = serde_json::to_value(&response).expect("serialize");
        assert_eq!(wire, json!({"version": "1.0"}));
    }
}
