//! Macros for declaring identifiable resource kinds.

/// Declares a zero-sized tag type for a kind of portal resource.
///
/// This generates a unit struct with:
/// - A `KIND` constant
/// - An [`Identifiable`](crate::Identifiable) implementation
/// - `Debug`, `Clone`, `Copy`, `Eq`, `Ord`, `Hash` and `Default`
///
/// # Example
///
/// ```ignore
/// define_identifiable!(Site, "site");
///
/// let context = contexts::site()?;
/// let id: Id<Site> = context.parse("site/classic")?.retag();
/// assert_eq!(id.kind(), Site::KIND);
/// ```
#[macro_export]
macro_rules! define_identifiable {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        pub struct $name;

        impl $name {
            /// The kind name carried by components identifying this resource.
            pub const KIND: &'static str = $kind;
        }

        impl $crate::Identifiable for $name {
            const KIND: &'static str = $kind;
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str($kind)
            }
        }
    };
}
