//! Macro for implementing Display and FromStr for wire-named enums
//!
//! Removes the boilerplate of keeping `Display` and `FromStr` in sync for
//! enums that travel as fixed strings. Parsing is case-insensitive; display
//! always yields the canonical spelling.
//!
//! # Example
//!
//! ```rust
//! use dealflow_domain::impl_domain_enum_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Priority {
//!     Low,
//!     High,
//! }
//!
//! impl_domain_enum_conversions!(Priority {
//!     Low => "LOW",
//!     High => "HIGH",
//! });
//!
//! assert_eq!(Priority::High.to_string(), "HIGH");
//! assert_eq!("low".parse::<Priority>().unwrap(), Priority::Low);
//! ```

/// Implements Display and FromStr traits for wire-named enums
///
/// # Arguments
///
/// * `$enum_name` - The name of the enum type
/// * `$variant => $str` - Mapping of enum variants to their canonical string
#[macro_export]
macro_rules! impl_domain_enum_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                let trimmed = s.trim();
                $(
                    if trimmed.eq_ignore_ascii_case($str) {
                        return Ok(Self::$variant);
                    }
                )+
                Err(format!("Invalid {}: {}", stringify!($enum_name), s))
            }
        }
    };
}
