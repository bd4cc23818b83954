//! Macro for implementing Display and FromStr for small value enums
//!
//! Notification actions, loading statuses and store kinds all travel as
//! strings through configuration and logs. This macro gives them one
//! consistent textual form.
//!
//! # Example
//!
//! ```rust
//! use lazycache_domain::impl_cache_enum_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Phase {
//!     Cold,
//!     Warm,
//! }
//!
//! impl_cache_enum_conversions!(Phase {
//!     Cold => "cold",
//!     Warm => "warm",
//! });
//!
//! assert_eq!("WARM".parse::<Phase>().unwrap(), Phase::Warm);
//! assert!("hot".parse::<Phase>().is_err());
//! ```

/// Implements Display and FromStr for a fieldless enum
///
/// - Display writes the lowercase mapping
/// - FromStr matches case-insensitively and returns
///   [`CacheError::InvalidArgument`](crate::CacheError::InvalidArgument) for
///   anything else
#[macro_export]
macro_rules! impl_cache_enum_conversions {
    ($enum_name:ident { $($variant:ident => $str:literal),+ $(,)? }) => {
        impl ::std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($str),)+
                }
            }
        }

        impl ::std::str::FromStr for $enum_name {
            type Err = $crate::CacheError;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err($crate::CacheError::InvalidArgument(format!(
                        "Invalid {}: {}",
                        stringify!($enum_name),
                        s
                    ))),
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use crate::{CacheError, Result};

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Phase {
        Cold,
        Warm,
    }

    impl_cache_enum_conversions!(Phase {
        Cold => "cold",
        Warm => "warm",
    });

    // Callers commonly import the crate's one-parameter `Result` alias
    fn parse_phase(raw: &str) -> Result<Phase> {
        raw.parse()
    }

    #[test]
    fn test_expands_beside_result_alias() {
        assert_eq!(parse_phase("cold").unwrap(), Phase::Cold);
        assert!(parse_phase("tepid").is_err());
    }

    #[test]
    fn test_display_conversion() {
        assert_eq!(Phase::Cold.to_string(), "cold");
        assert_eq!(Phase::Warm.to_string(), "warm");
    }

    #[test]
    fn test_fromstr_ignores_case_and_whitespace() {
        assert_eq!(Phase::from_str("cold").unwrap(), Phase::Cold);
        assert_eq!(Phase::from_str("WARM").unwrap(), Phase::Warm);
        assert_eq!(Phase::from_str("  Warm ").unwrap(), Phase::Warm);
    }

    #[test]
    fn test_fromstr_invalid_is_invalid_argument() {
        let err = Phase::from_str("lukewarm").unwrap_err();
        assert_eq!(err, CacheError::InvalidArgument("Invalid Phase: lukewarm".to_string()));
    }
}
