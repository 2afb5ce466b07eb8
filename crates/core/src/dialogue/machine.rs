//! Turn-by-turn decision logic for the voice dialogue.
//!
//! `decide` is pure: it reads one inbound turn plus the caller-echoed bag and
//! produces either a finished reply or an instruction for the caller to hit
//! the stock repository (commit or lookup) and phrase the result. All IO
//! stays at the webhook edge.

use crate::alexa::request::{ConfirmationStatus, Intent, Request, TurnRequest};
use crate::dialogue::flow::{parse_int, parse_positive_int, Flow, SessionState};
use crate::dialogue::phrases;

pub const INTENT_CONSULTA: &str = "ConsultaMaterialIntent";
pub const INTENT_INCLUIR: &str = "IncluirEstoqueIntent";
/// Alias kept from an earlier interaction model still deployed on some skills.
pub const INTENT_INCLUIR_ALIAS: &str = "IncludeEstoqueIntent";

#[derive(Clone, Debug, PartialEq)]
pub enum Decision {
    /// Speak and (unless terminal) keep listening with the given bag echoed.
    Reply { speech: String, end_session: bool, state: SessionState },
    /// All three values validated; the caller must run exactly one upsert and
    /// finish the session with a success or apology phrase, bag cleared.
    Commit { material: String, quantidade: i64, setor: i64 },
    /// Run the location search for `material`; the bag passes through
    /// untouched because lookup has no multi-turn form.
    Lookup { material: String, state: SessionState },
    /// `SessionEndedRequest`: acknowledge with no speech.
    SessionEndedAck,
}

fn reply(speech: impl Into<String>, state: SessionState) -> Decision {
    Decision::Reply { speech: speech.into(), end_session: false, state }
}

fn terminal(speech: impl Into<String>, state: SessionState) -> Decision {
    Decision::Reply { speech: speech.into(), end_session: true, state }
}

pub fn decide(turn: &TurnRequest) -> Decision {
    let state = SessionState::from_attributes(&turn.session_attributes());

    match &turn.request {
        Request::Launch => reply(phrases::BOAS_VINDAS, SessionState::restart()),
        Request::Intent { intent } => decide_intent(intent, state),
        Request::SessionEnded { .. } => Decision::SessionEndedAck,
        Request::Unsupported => terminal(phrases::REQUISICAO_NAO_SUPORTADA, state),
    }
}

fn decide_intent(intent: &Intent, state: SessionState) -> Decision {
    match intent.name.as_str() {
        INTENT_CONSULTA => lookup(intent, state),
        INTENT_INCLUIR | INTENT_INCLUIR_ALIAS => inclusion(intent, state),
        "AMAZON.YesIntent" => affirmative(state),
        "AMAZON.NoIntent" => negative(state),
        "AMAZON.CancelIntent" | "AMAZON.StopIntent" => terminal(phrases::DESPEDIDA, state),
        _ => reply(phrases::NAO_ENTENDI, state),
    }
}

fn lookup(intent: &Intent, state: SessionState) -> Decision {
    match intent.slot_value("material") {
        Some(material) => Decision::Lookup { material, state },
        None => reply(phrases::MATERIAL_NAO_ENTENDIDO, state),
    }
}

fn inclusion(intent: &Intent, mut state: SessionState) -> Decision {
    match intent.confirmation_status {
        ConfirmationStatus::Denied => return restart(),
        ConfirmationStatus::Confirmed if state.flow == Some(Flow::Confirm) => {
            return try_commit(state)
        }
        _ => {}
    }

    // Non-empty spoken values overwrite, absent ones are ignored, so a later
    // turn can correct an earlier answer.
    if let Some(material) = intent.slot_value("material") {
        state.material = Some(material);
    }
    if let Some(quantidade) = intent.slot_value("quantidade") {
        state.quantidade = Some(quantidade);
    }
    if let Some(setor) = intent.slot_value("setor") {
        state.setor = Some(setor);
    }

    collect(state)
}

/// The priority ladder: first missing or invalid value decides the question.
fn collect(mut state: SessionState) -> Decision {
    let Some(material) = state.material.clone() else {
        state.flow = Some(Flow::AskMaterial);
        return reply(phrases::PERGUNTA_MATERIAL, state);
    };

    let quantidade = match state.quantidade.as_deref() {
        None => {
            state.flow = Some(Flow::AskQtd);
            return reply(phrases::pergunta_quantidade(&material), state);
        }
        Some(raw) => match parse_positive_int(raw) {
            Some(value) => value,
            None => {
                state.quantidade = None;
                state.flow = Some(Flow::AskQtd);
                return reply(phrases::QUANTIDADE_INVALIDA, state);
            }
        },
    };

    let setor = match state.setor.as_deref() {
        None => {
            state.flow = Some(Flow::AskSetor);
            return reply(phrases::pergunta_setor(&material), state);
        }
        Some(raw) => match parse_int(raw) {
            Some(value) => value,
            None => {
                state.setor = None;
                state.flow = Some(Flow::AskSetor);
                return reply(phrases::SETOR_INVALIDO, state);
            }
        },
    };

    state.flow = Some(Flow::Confirm);
    reply(phrases::confirmacao(&material, quantidade, setor), state)
}

fn affirmative(state: SessionState) -> Decision {
    if state.flow == Some(Flow::Confirm) {
        try_commit(state)
    } else {
        reply(phrases::NAO_ENTENDI, state)
    }
}

fn negative(state: SessionState) -> Decision {
    if state.in_progress() {
        restart()
    } else {
        reply(phrases::NAO_ENTENDI, state)
    }
}

fn restart() -> Decision {
    reply(phrases::RECOMECO, SessionState::restart())
}

/// The bag is untrusted even at `CONFIRM`: a stale or replayed turn may have
/// dropped or mangled a value, in which case we fall back into collection
/// instead of committing garbage.
fn try_commit(state: SessionState) -> Decision {
    let material = state.material.clone();
    let quantidade = state.quantidade.as_deref().and_then(parse_positive_int);
    let setor = state.setor.as_deref().and_then(parse_int);

    match (material, quantidade, setor) {
        (Some(material), Some(quantidade), Some(setor)) => {
            Decision::Commit { material, quantidade, setor }
        }
        _ => collect(state),
    }
}
