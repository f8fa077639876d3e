//! Macros for building and returning [`crate::error::ResolverError`]s.

/// Creates a [`crate::error::ResolverError`] from an error kind, a static description and an
/// optional detail rendered with [`ToString`].
#[macro_export]
macro_rules! resolver_error {
    ($kind:expr, $desc:expr) => {
        $crate::error::ResolverError::from(($kind, $desc))
    };
    ($kind:expr, $desc:expr, $detail:expr) => {
        $crate::error::ResolverError::from(($kind, $desc, $detail.to_string()))
    };
}

/// Returns early with a [`crate::error::ResolverError`] built by [`resolver_error!`].
#[macro_export]
macro_rules! bail {
    ($kind:expr, $desc:expr) => {
        return Err($crate::resolver_error!($kind, $desc))
    };
    ($kind:expr, $desc:expr, $detail:expr) => {
        return Err($crate::resolver_error!($kind, $desc, $detail))
    };
}
