//! Functions drawing from the emitter's seeded RNG.

use super::Arg;
use crate::error::RenderError;
use crate::template::{RenderContext, RenderState};
use rand::Rng;
use uuid::Uuid;

/// UUID v4 built from RNG bytes so that it follows the emitter seed.
pub fn uuid(_: &[Arg], state: &mut RenderState, _: &RenderContext<'_>) -> Result<String, RenderError> {
    let mut bytes = [0u8; 16];
    state.rng().fill(&mut bytes);

    bytes[6] = (bytes[6] & 0x0f) | 0x40; // Version 4
    bytes[8] = (bytes[8] & 0x3f) | 0x80; // Variant RFC 4122

    Ok(Uuid::from_bytes(bytes).to_string())
}

/// Random number with exactly N digits.
pub fn digits(args: &[Arg], state: &mut RenderState, _: &RenderContext<'_>) -> Result<String, RenderError> {
    let [Arg::Int(count)] = args else {
        return Err(RenderError::InvalidArguments("digits"));
    };
    let count = usize::try_from(*count).map_err(|_| RenderError::InvalidArguments("digits"))?;
    if count == 0 {
        return Ok(String::new());
    }

    let rng = state.rng();
    let mut result = String::with_capacity(count);

    // First digit should be 1-9 to avoid leading zeros
    result.push(char::from(b'0' + rng.random_range(1..10u8)));
    for _ in 1..count {
        result.push(char::from(b'0' + rng.random_range(0..10u8)));
    }

    Ok(result)
}

pub fn integer(args: &[Arg], state: &mut RenderState, _: &RenderContext<'_>) -> Result<String, RenderError> {
    let [Arg::Int(min), Arg::Int(max)] = args else {
        return Err(RenderError::InvalidArguments("integer"));
    };
    Ok(state.rng().random_range(*min..=*max).to_string())
}

pub fn float(args: &[Arg], state: &mut RenderState, _: &RenderContext<'_>) -> Result<String, RenderError> {
    let (Some(min), Some(max)) = (
        args.first().and_then(Arg::as_f64),
        args.get(1).and_then(Arg::as_f64),
    ) else {
        return Err(RenderError::InvalidArguments("float"));
    };
    if !(min.is_finite() && max.is_finite() && min <= max) {
        return Err(RenderError::InvalidArguments("float"));
    }
    Ok(format!("{:.2}", state.rng().random_range(min..=max)))
}

pub fn boolean(_: &[Arg], state: &mut RenderState, _: &RenderContext<'_>) -> Result<String, RenderError> {
    Ok(state.rng().random_bool(0.5).to_string())
}

pub fn one_of(args: &[Arg], state: &mut RenderState, _: &RenderContext<'_>) -> Result<String, RenderError> {
    if args.is_empty() {
        return Err(RenderError::InvalidArguments("oneof"));
    }
    let idx = state.rng().random_range(0..args.len());
    Ok(args[idx].to_string())
}
