//! Gate-type and sequence-path normalization

use crate::source::SourceStep;
use openpra_schema::PathStep;
use saphire_model::GateType;
use serde_json::Value;

/// Map any gate token onto a recognized kind
///
/// Case-insensitive. Canonical names pass through, the single-letter
/// abbreviations `A`, `O`, `N`, `X` expand, everything else becomes `OR`.
#[must_use]
pub fn normalize_gate_type(token: &str) -> GateType {
    let upper = token.trim().to_uppercase();
    if let Ok(kind) = upper.parse::<GateType>() {
        return kind;
    }
    match upper.as_str() {
        "A" => GateType::And,
        "N" => GateType::Not,
        "X" => GateType::Xor,
        _ => GateType::Or,
    }
}

/// `S` or `SUCCESS`, any case
#[must_use]
pub fn token_success(token: &str) -> bool {
    let token = token.trim();
    token.eq_ignore_ascii_case("S") || token.eq_ignore_ascii_case("SUCCESS")
}

/// Success flag of an explicit `state` value
#[must_use]
pub fn state_success(state: &Value) -> bool {
    match state {
        Value::Bool(flag) => *flag,
        Value::String(text) => token_success(text) || text.trim().eq_ignore_ascii_case("true"),
        Value::Number(n) => n.as_f64().is_some_and(|x| x != 0.0),
        _ => false,
    }
}

/// Turn source path elements into branch decisions
///
/// Bare tokens get a synthetic event name `Event<N>`, N being the
/// 1-based position in the output path. Unrecognized elements are dropped.
#[must_use]
pub fn normalize_path(steps: &[SourceStep]) -> Vec<PathStep> {
    let mut path = Vec::with_capacity(steps.len());
    for step in steps {
        match step {
            SourceStep::Branch { event, state } => path.push(PathStep {
                event: event.clone(),
                success: state_success(state),
            }),
            SourceStep::Token(token) => path.push(PathStep {
                event: format!("Event{}", path.len() + 1),
                success: token_success(token),
            }),
            SourceStep::Other(_) => {}
        }
    }
    path
}
