//! `define_port_error!`: thiserror enums with `impl Into` constructors.
//!
//! Both port error types in this crate are declared through it:
//! `CatalogSourceError` (transport, timeout, unknown user, decode) and
//! `IdentityStoreError` (I/O, encoding). Each variant gets a `#[must_use]`
//! snake_case constructor, so the AniList adapter writes
//! `CatalogSourceError::user_not_found(username)` and the JSON store writes
//! `IdentityStoreError::io(format!(..))` instead of building struct variants
//! by hand. The generated enums derive `PartialEq` so session tests can
//! compare errors directly.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            #[must_use]
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            #[must_use]
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };
    (
        $(#[$outer:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    define_port_error! {
        pub enum ProbeError {
            Offline => "offline",
            Rejected { message: String } => "rejected: {message}",
            Status { code: u16, message: String } => "status {code}: {message}",
        }
    }

    #[test]
    fn unit_variants_get_nullary_constructors() {
        assert_eq!(ProbeError::offline(), ProbeError::Offline);
        assert_eq!(ProbeError::offline().to_string(), "offline");
    }

    #[test]
    fn string_fields_accept_borrowed_text() {
        let err = ProbeError::rejected("no such user");
        assert_eq!(err.to_string(), "rejected: no such user");
    }

    #[test]
    fn port_errors_built_by_the_macro_compare_by_value() {
        use crate::domain::ports::{CatalogSourceError, IdentityStoreError};

        assert_eq!(
            CatalogSourceError::user_not_found("ghost"),
            CatalogSourceError::UserNotFound {
                username: "ghost".to_owned()
            }
        );
        assert_eq!(
            IdentityStoreError::encode("bad record").to_string(),
            "identity store encoding failed: bad record"
        );
    }

    #[test]
    fn mixed_fields_keep_their_types() {
        let err = ProbeError::status(404_u16, "Not Found.");
        assert_eq!(err.to_string(), "status 404: Not Found.");
    }
}
