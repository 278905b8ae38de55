use crate::ProbabilityEngine;
use oddsboard_core::{Card, ProbabilityRequest, ProbabilityResult, Selection};
use tracing::{debug, warn};

/// Builds the request from the given slots and asks `engine` for a
/// probability. Engine failures come back as `ProbabilityResult::Error`.
pub fn request_probability<E>(
    engine: &E,
    hand: &[Option<Card>],
    table: &[Option<Card>],
    num_opponents: u32,
) -> ProbabilityResult
where
    E: ProbabilityEngine + ?Sized,
{
    let request = ProbabilityRequest::from_slots(hand, table, num_opponents);
    resolve(engine, &request)
}

pub fn resolve<E>(engine: &E, request: &ProbabilityRequest) -> ProbabilityResult
where
    E: ProbabilityEngine + ?Sized,
{
    debug!(
        hand = request.hand.len(),
        table = request.table.len(),
        num_opponents = request.num_opponents,
        "requesting probability"
    );
    match engine.calculate(request) {
        Ok(value) => {
            let result = ProbabilityResult::from_probability(value);
            if result == ProbabilityResult::Error {
                warn!(value, "engine returned probability outside [0, 1]");
            }
            result
        }
        Err(err) => {
            warn!(error = %err, "probability request failed");
            ProbabilityResult::Error
        }
    }
}

/// Issues a request for the current slots, waits for the engine, and stores
/// the outcome in `selection`.
pub fn calculate_now<E>(
    selection: &mut Selection,
    engine: &E,
    num_opponents: u32,
) -> ProbabilityResult
where
    E: ProbabilityEngine + ?Sized,
{
    let (ticket, request) = selection.issue_request(num_opponents);
    let result = resolve(engine, &request);
    selection.apply_result(ticket, result);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EngineError;
    use oddsboard_core::{ResponseError, SlotRef};
    use std::cell::RefCell;

    fn card(text: &str) -> Card {
        text.parse().expect("card")
    }

    #[test]
    fn success_maps_to_value() {
        let engine = |_: &ProbabilityRequest| -> Result<f64, EngineError> { Ok(0.5) };
        let hand = [Some(card("Ah")), Some(card("Kd"))];
        let result = request_probability(&engine, &hand, &[None; 5], 2);
        assert_eq!(result, ProbabilityResult::Value(0.5));
        assert_eq!(result.label().as_deref(), Some("0.50"));
    }

    #[test]
    fn engine_sees_compacted_payload() {
        let seen = RefCell::new(None);
        let engine = |request: &ProbabilityRequest| -> Result<f64, EngineError> {
            *seen.borrow_mut() = Some(request.clone());
            Ok(0.31)
        };
        let hand = [Some(card("Ah")), Some(card("Kd"))];
        let table = [Some(card("2c")), Some(card("7s")), None, None, None];
        request_probability(&engine, &hand, &table, 2);
        let request = seen.into_inner().expect("engine called");
        assert_eq!(request.hand, vec![card("Ah"), card("Kd")]);
        assert_eq!(request.table, vec![card("2c"), card("7s")]);
        assert_eq!(request.num_opponents, 2);
    }

    #[test]
    fn failures_become_error_sentinel() {
        let failures: Vec<fn() -> EngineError> = vec![
            || EngineError::Transport("connection refused".to_string()),
            || EngineError::Timeout,
            || EngineError::Decode("expected value".to_string()),
            || EngineError::Response(ResponseError::MissingProbability),
            || EngineError::Status {
                status: 500,
                message: "boom".to_string(),
            },
        ];
        for make in failures {
            let engine = move |_: &ProbabilityRequest| -> Result<f64, EngineError> { Err(make()) };
            let result = request_probability(&engine, &[None, None], &[None; 5], 2);
            assert_eq!(result, ProbabilityResult::Error);
            assert_eq!(result.label().as_deref(), Some("Error"));
        }
    }

    #[test]
    fn out_of_range_value_is_an_error() {
        let engine = |_: &ProbabilityRequest| -> Result<f64, EngineError> { Ok(1.5) };
        let result = request_probability(&engine, &[None, None], &[None; 5], 2);
        assert_eq!(result, ProbabilityResult::Error);
    }

    #[test]
    fn calculate_now_stores_result() {
        let mut selection = Selection::new();
        selection.begin_edit(SlotRef::hand(0)).expect("slot");
        selection.pick(card("Ah"));
        let engine = |_: &ProbabilityRequest| -> Result<f64, EngineError> { Ok(0.25) };
        let result = calculate_now(&mut selection, &engine, 2);
        assert_eq!(result, ProbabilityResult::Value(0.25));
        assert_eq!(selection.result(), ProbabilityResult::Value(0.25));
        assert!(!selection.pending());
    }
}
