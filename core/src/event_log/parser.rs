//! Line parser for the incoming event log.
//!
//! Layout: `[HH:MM:SS.mmm] <kind> <competitor> [param...]`, fields separated
//! by whitespace. Only the structure is checked here; timestamps and
//! kind-specific parameters are validated by the processor.

use thiserror::Error;

use super::event::{CompetitorId, EventKind, RaceEvent};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineError {
    #[error("line {line_number}: invalid event format: {line}")]
    TooFewFields { line_number: u64, line: String },
    #[error("line {line_number}: invalid event id: {value}")]
    InvalidKind { line_number: u64, value: String },
    #[error("line {line_number}: invalid competitor id: {value}")]
    InvalidCompetitorId { line_number: u64, value: String },
}

pub fn parse_line(line_number: u64, line: &str) -> Result<RaceEvent, LineError> {
    let mut fields = line.split_whitespace();

    let (Some(time), Some(kind), Some(competitor)) = (fields.next(), fields.next(), fields.next())
    else {
        return Err(LineError::TooFewFields {
            line_number,
            line: line.to_string(),
        });
    };

    let kind = kind
        .parse::<u32>()
        .map(EventKind::from_id)
        .map_err(|_| LineError::InvalidKind {
            line_number,
            value: kind.to_string(),
        })?;

    // Competitor ids are positive
    let competitor_id = competitor
        .parse::<CompetitorId>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| LineError::InvalidCompetitorId {
            line_number,
            value: competitor.to_string(),
        })?;

    Ok(RaceEvent {
        line_number,
        time: time.trim_matches(['[', ']']).to_string(),
        kind,
        competitor_id,
        params: fields.map(str::to_string).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line_without_params() {
        let event = parse_line(1, "[09:05:59.867] 1 1").unwrap();
        assert_eq!(event.time, "09:05:59.867");
        assert_eq!(event.kind, EventKind::Registered);
        assert_eq!(event.competitor_id, 1);
        assert!(event.params.is_empty());
        assert_eq!(event.line_number, 1);
    }

    #[test]
    fn test_parse_line_with_params() {
        let event = parse_line(2, "[09:15:00.841] 2 1 09:30:00.000").unwrap();
        assert_eq!(event.kind, EventKind::StartTimeAssigned);
        assert_eq!(event.params, vec!["09:30:00.000"]);

        let event = parse_line(3, "[12:34:56.789] 3 2 param1 param2").unwrap();
        assert_eq!(event.kind, EventKind::OnStartLine);
        assert_eq!(event.competitor_id, 2);
        assert_eq!(event.params, vec!["param1", "param2"]);
    }

    #[test]
    fn test_parse_line_keeps_free_text_words() {
        let event = parse_line(9, "[10:30:00.000] 11 4 Lost in   the forest").unwrap();
        assert_eq!(event.kind, EventKind::CannotContinue);
        assert_eq!(event.joined_params(), "Lost in the forest");
    }

    #[test]
    fn test_parse_line_too_few_fields() {
        assert!(matches!(
            parse_line(5, "invalid line"),
            Err(LineError::TooFewFields { line_number: 5, .. })
        ));
    }

    #[test]
    fn test_parse_line_non_integer_fields() {
        assert!(matches!(
            parse_line(1, "[09:05:59.867] x 1"),
            Err(LineError::InvalidKind { .. })
        ));
        assert!(matches!(
            parse_line(1, "[09:05:59.867] 1 -4"),
            Err(LineError::InvalidCompetitorId { .. })
        ));
    }

    #[test]
    fn test_parse_line_rejects_competitor_zero() {
        assert_eq!(
            parse_line(4, "[09:05:59.867] 1 0"),
            Err(LineError::InvalidCompetitorId {
                line_number: 4,
                value: "0".to_string(),
            })
        );
        assert!(parse_line(4, "[09:05:59.867] 1 01").is_ok());
    }

    #[test]
    fn test_parse_line_unknown_kind_is_not_fatal() {
        let event = parse_line(1, "[09:05:59.867] 42 1").unwrap();
        assert_eq!(event.kind, EventKind::Unrecognized(42));
    }

    #[test]
    fn test_parse_line_leaves_timestamp_unchecked() {
        let event = parse_line(1, "[bogus] 1 1").unwrap();
        assert_eq!(event.time, "bogus");
    }
}
