//! Route identifiers.
//!
//! Exactly one controller runs per route. Controllers navigate by returning
//! the next [`Route`]; a location string such as `suggestions?play=3` maps to
//! a route through [`Route::parse`].

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Preferences,
    Suggestions { play: Option<u32> },
    Profile,
}

impl Route {
    /// Parse a location such as `profile` or `suggestions.html?play=3`.
    ///
    /// # Errors
    ///
    /// Returns an error for locations that name no known route.
    pub fn parse(location: &str) -> anyhow::Result<Self> {
        let location = location.trim().trim_start_matches('/');
        let (path, query) = location.split_once('?').unwrap_or((location, ""));
        let page = path.trim_end_matches(".html");

        match page {
            "" | "index" | "preferences" | "prefs" => Ok(Route::Preferences),
            "suggestions" | "suggest" => Ok(Route::Suggestions {
                play: parse_play_param(query),
            }),
            "profile" => Ok(Route::Profile),
            other => anyhow::bail!("Unknown location '{other}'. Use preferences, suggestions or profile"),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Preferences => write!(f, "preferences"),
            Route::Suggestions { play: None } => write!(f, "suggestions"),
            Route::Suggestions { play: Some(id) } => write!(f, "suggestions?play={id}"),
            Route::Profile => write!(f, "profile"),
        }
    }
}

/// Read `play=<id>` from a query string (with or without the leading `?`).
///
/// The first well-formed `play` parameter wins; malformed values are ignored.
#[must_use]
pub fn parse_play_param(query: &str) -> Option<u32> {
    query
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .filter(|(key, _)| *key == "play")
        .find_map(|(_, value)| value.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_play_param() {
        assert_eq!(parse_play_param("play=3"), Some(3));
        assert_eq!(parse_play_param("?play=12"), Some(12));
        assert_eq!(parse_play_param("from=profile&play=5"), Some(5));
        assert_eq!(parse_play_param("play=abc&play=4"), Some(4));
        assert_eq!(parse_play_param("play="), None);
        assert_eq!(parse_play_param(""), None);
        assert_eq!(parse_play_param("replay=3"), None);
    }

    #[test]
    fn test_parse_locations() {
        assert_eq!(Route::parse("profile").unwrap(), Route::Profile);
        assert_eq!(Route::parse("/index.html").unwrap(), Route::Preferences);
        assert_eq!(
            Route::parse("suggestions.html?play=2").unwrap(),
            Route::Suggestions { play: Some(2) }
        );
        assert_eq!(Route::parse("suggestions").unwrap(), Route::Suggestions { play: None });
        assert!(Route::parse("settings").is_err());
    }

    #[test]
    fn test_display_round_trips() {
        for route in [
            Route::Preferences,
            Route::Profile,
            Route::Suggestions { play: None },
            Route::Suggestions { play: Some(9) },
        ] {
            assert_eq!(Route::parse(&route.to_string()).unwrap(), route);
        }
    }
}
