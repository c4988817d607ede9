// ABOUTME: Typed environment lookups
// ABOUTME: Reads variables through a caller-supplied source so tests never touch the process env

use std::str::FromStr;
use tracing::warn;

/// Source backed by the real process environment
pub fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// Look up a variable, treating blank values as unset
pub fn lookup<F>(source: F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    source(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Look up and parse a variable. Unparseable values are logged and ignored.
pub fn lookup_parsed<F, T>(source: F, name: &str) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    let raw = lookup(source, name)?;
    match raw.parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring invalid value for {}: {:?}", name, raw);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::*;
    use rstest::rstest;

    fn fixed(name: &str) -> Option<String> {
        match name {
            TASKDECK_PROJECT_ID => Some("proj-1".to_string()),
            TASKDECK_PUBLIC_KEY => Some("   ".to_string()),
            TASKDECK_HTTP_REQUEST_TIMEOUT_SECS => Some("45".to_string()),
            TASKDECK_HTTP_CONNECT_TIMEOUT_SECS => Some("soon".to_string()),
            _ => None,
        }
    }

    #[rstest]
    #[case(TASKDECK_PROJECT_ID, Some("proj-1"))]
    #[case(TASKDECK_PUBLIC_KEY, None)]
    #[case(TASKDECK_API_URL, None)]
    fn test_lookup(#[case] name: &str, #[case] expected: Option<&str>) {
        assert_eq!(lookup(fixed, name).as_deref(), expected);
    }

    #[test]
    fn test_lookup_parsed() {
        assert_eq!(lookup_parsed::<_, u64>(fixed, TASKDECK_HTTP_REQUEST_TIMEOUT_SECS), Some(45));
        assert_eq!(lookup_parsed::<_, u64>(fixed, TASKDECK_HTTP_CONNECT_TIMEOUT_SECS), None);
    }
}
