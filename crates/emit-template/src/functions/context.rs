//! Functions that read the render state, the record or the environment.

use super::Arg;
use crate::error::RenderError;
use crate::template::{RenderContext, RenderState};

pub fn index(_: &[Arg], state: &mut RenderState, _: &RenderContext<'_>) -> Result<String, RenderError> {
    Ok(state.index().to_string())
}

pub fn now(_: &[Arg], _: &mut RenderState, _: &RenderContext<'_>) -> Result<String, RenderError> {
    Ok(chrono::Utc::now().to_rfc3339())
}

pub fn unix_time(
    _: &[Arg],
    _: &mut RenderState,
    _: &RenderContext<'_>,
) -> Result<String, RenderError> {
    Ok(chrono::Utc::now().timestamp().to_string())
}

pub fn env(args: &[Arg], _: &mut RenderState, _: &RenderContext<'_>) -> Result<String, RenderError> {
    let [Arg::Str(name)] = args else {
        return Err(RenderError::InvalidArguments("env"));
    };
    std::env::var(name).map_err(|_| RenderError::MissingEnv(name.clone()))
}

pub fn key(_: &[Arg], _: &mut RenderState, context: &RenderContext<'_>) -> Result<String, RenderError> {
    context
        .key()
        .map(str::to_string)
        .ok_or(RenderError::NoRecord("key"))
}

pub fn value(
    _: &[Arg],
    _: &mut RenderState,
    context: &RenderContext<'_>,
) -> Result<String, RenderError> {
    context
        .value()
        .map(str::to_string)
        .ok_or(RenderError::NoRecord("value"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_missing() {
        let mut state = RenderState::new(0);
        let context = RenderContext::new("us");
        let args = [Arg::Str("DATAGEN_TEST_SURELY_UNSET_VAR".to_string())];
        assert_eq!(
            env(&args, &mut state, &context).unwrap_err(),
            RenderError::MissingEnv("DATAGEN_TEST_SURELY_UNSET_VAR".to_string())
        );
    }

    #[test]
    fn test_unix_time_is_numeric() {
        let mut state = RenderState::new(0);
        let rendered = unix_time(&[], &mut state, &RenderContext::new("us")).unwrap();
        assert!(rendered.parse::<i64>().unwrap() > 1_600_000_000);
    }
}
