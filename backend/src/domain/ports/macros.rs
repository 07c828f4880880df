//! Helper macro for declaring driven-port error enums.
//!
//! Each variant gets a snake_case constructor whose parameters accept
//! anything convertible into the field type.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
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
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
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
        pub enum StoreProbeError {
            Unreachable => "store unreachable",
            Rejected { message: String } => "rejected: {message}",
            Collision { id: u64 } => "id {id} already stored",
            Stale { message: String, id: u64 } => "stale {id}: {message}",
        }
    }

    #[test]
    fn unit_variants_get_nullary_constructors() {
        assert_eq!(StoreProbeError::unreachable(), StoreProbeError::Unreachable);
    }

    #[test]
    fn string_fields_accept_str() {
        let err = StoreProbeError::rejected("quota");
        assert_eq!(err.to_string(), "rejected: quota");
    }

    #[test]
    fn numeric_fields_keep_their_type() {
        let err = StoreProbeError::collision(7_u64);
        assert_eq!(err.to_string(), "id 7 already stored");
    }

    #[test]
    fn mixed_fields_are_positional() {
        let err = StoreProbeError::stale("replaced", 3_u64);
        assert_eq!(err.to_string(), "stale 3: replaced");
    }
}
