//! Locale-aware functions. The locale comes from the render context, never
//! from shared state.

use super::Arg;
use crate::error::RenderError;
use crate::locale::{lookup, LocaleData};
use crate::template::{RenderContext, RenderState};
use rand::Rng;

fn current(context: &RenderContext<'_>) -> Result<&'static LocaleData, RenderError> {
    lookup(context.locale()).ok_or_else(|| RenderError::UnsupportedLocale(context.locale().to_string()))
}

fn pick(state: &mut RenderState, words: &'static [&'static str]) -> &'static str {
    match words.len() {
        0 => "",
        len => words[state.rng().random_range(0..len)],
    }
}

fn email_part(word: &str) -> String {
    word.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

pub fn locale(_: &[Arg], _: &mut RenderState, context: &RenderContext<'_>) -> Result<String, RenderError> {
    Ok(current(context)?.code.to_string())
}

pub fn country(_: &[Arg], _: &mut RenderState, context: &RenderContext<'_>) -> Result<String, RenderError> {
    Ok(current(context)?.country.to_string())
}

pub fn name(_: &[Arg], state: &mut RenderState, context: &RenderContext<'_>) -> Result<String, RenderError> {
    let locale = current(context)?;
    Ok(pick(state, locale.first_names).to_string())
}

pub fn surname(_: &[Arg], state: &mut RenderState, context: &RenderContext<'_>) -> Result<String, RenderError> {
    let locale = current(context)?;
    Ok(pick(state, locale.surnames).to_string())
}

pub fn city(_: &[Arg], state: &mut RenderState, context: &RenderContext<'_>) -> Result<String, RenderError> {
    let locale = current(context)?;
    Ok(pick(state, locale.cities).to_string())
}

pub fn email(_: &[Arg], state: &mut RenderState, context: &RenderContext<'_>) -> Result<String, RenderError> {
    let locale = current(context)?;
    let first = pick(state, locale.first_names);
    let last = pick(state, locale.surnames);
    let domain = pick(state, locale.email_domains);
    Ok(format!("{}.{}@{}", email_part(first), email_part(last), domain))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_country_follows_context() {
        let mut state = RenderState::new(1);
        assert_eq!(country(&[], &mut state, &RenderContext::new("it")).unwrap(), "Italia");
        assert_eq!(country(&[], &mut state, &RenderContext::new("de")).unwrap(), "Deutschland");
    }

    #[test]
    fn test_city_comes_from_locale_table() {
        let mut state = RenderState::new(5);
        let cities = lookup("fr").unwrap().cities;
        for _ in 0..10 {
            let value = city(&[], &mut state, &RenderContext::new("fr")).unwrap();
            assert!(cities.contains(&value.as_str()));
        }
    }

    #[test]
    fn test_email_shape() {
        let mut state = RenderState::new(5);
        let value = email(&[], &mut state, &RenderContext::new("uk")).unwrap();
        let (local, domain) = value.split_once('@').unwrap();
        assert!(local.contains('.'));
        assert!(local.chars().all(|c| c == '.' || c.is_lowercase()));
        assert!(lookup("uk").unwrap().email_domains.contains(&domain));
    }

    #[test]
    fn test_unsupported_locale() {
        let mut state = RenderState::new(5);
        assert_eq!(
            name(&[], &mut state, &RenderContext::new("tlh")).unwrap_err(),
            RenderError::UnsupportedLocale("tlh".to_string())
        );
    }
}
