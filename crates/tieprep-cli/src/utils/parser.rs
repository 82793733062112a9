use thiserror::Error;
use tieprep::engine::tying::ChainPairing;

#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error(
        "Invalid tie rule '{0}'. Expected 'CHAIN:CHAIN' or 'CHAIN:CHAIN:WEIGHT' (e.g., 'A:C' or 'A:C:0.5')."
    )]
    InvalidTieRule(String),
}

/// Parses an inline tie rule of the form `A:C` or `A:C:0.5`.
pub fn parse_tie_rule(value: &str) -> Result<ChainPairing, ParseError> {
    let parts: Vec<&str> = value.split(':').collect();
    let invalid = || ParseError::InvalidTieRule(value.to_string());

    let (first, second, weight) = match parts.as_slice() {
        [first, second] => (*first, *second, None),
        [first, second, weight] => (*first, *second, Some(*weight)),
        _ => return Err(invalid()),
    };

    let first = single_chain(first).ok_or_else(invalid)?;
    let second = single_chain(second).ok_or_else(invalid)?;

    match weight {
        None => Ok(ChainPairing::new(first, second)),
        Some(raw) => {
            let weight: f64 = raw.trim().parse().map_err(|_| invalid())?;
            Ok(ChainPairing::with_weight(first, second, weight))
        }
    }
}

fn single_chain(value: &str) -> Option<char> {
    let mut chars = value.trim().chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => Some(c.to_ascii_uppercase()),
        _ => None,
    }
}
