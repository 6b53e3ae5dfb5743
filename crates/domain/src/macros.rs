//! Macro for implementing Display and FromStr for label enums
//!
//! Used by enums that travel as short lowercase labels (sync action kinds,
//! log formats). Parsing is case-insensitive, output is always lowercase.
//!
//! # Example
//!
//! ```rust
//! use rostersync_domain::impl_domain_status_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum RunStatus {
//!     Staged,
//!     Synced,
//! }
//!
//! impl_domain_status_conversions!(RunStatus {
//!     Staged => "staged",
//!     Synced => "synced",
//! });
//!
//! assert_eq!(RunStatus::Staged.to_string(), "staged");
//! assert_eq!("SYNCED".parse::<RunStatus>().unwrap(), RunStatus::Synced);
//! ```

/// Implements `Display` and `FromStr` for a fieldless enum from a
/// variant → label mapping. Labels must be lowercase literals.
#[macro_export]
macro_rules! impl_domain_status_conversions {
    ($enum_name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        impl ::std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($label),)+
                }
            }
        }

        impl ::std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($label => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
