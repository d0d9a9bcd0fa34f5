//! `define_port_error!` builds a `thiserror` enum for a driven port together
//! with snake_case constructors taking `impl Into<_>` for every field.

macro_rules! define_port_error {
    (@ctor $variant:ident ($($params:tt)*) ($($inits:tt)*)) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor
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
                $variant:ident { $($field:ident : $ty:ty),* $(,)? } => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant { $($field : $ty),* },
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant () () $($field : $ty,)*);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    define_port_error! {
        pub enum FetchError {
            Timeout { message: String } => "timed out: {message}",
            Status { status: u16, message: String } => "HTTP {status}: {message}",
        }
    }

    #[test]
    fn string_fields_accept_str() {
        assert_eq!(FetchError::timeout("10s").to_string(), "timed out: 10s");
    }

    #[test]
    fn mixed_fields_keep_their_types() {
        let error = FetchError::status(503_u16, "maintenance");
        assert_eq!(
            error,
            FetchError::Status {
                status: 503,
                message: "maintenance".to_owned()
            }
        );
        assert_eq!(error.to_string(), "HTTP 503: maintenance");
    }
}
