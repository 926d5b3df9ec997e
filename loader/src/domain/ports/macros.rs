//! `define_port_error!`: error enums for driven ports.
//!
//! Every variant gets a snake-case constructor (`UnexpectedStatus` becomes
//! `unexpected_status`) whose parameters accept `impl Into<FieldType>`, and
//! the enum gets a `kind()` label for structured log fields.

macro_rules! define_port_error {
    (@constructor $variant:ident $($field:ident : $field_ty:ty),*) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($field: impl Into<$field_ty>),*) -> Self {
                Self::$variant { $($field: $field.into()),* }
            }
        }
    };

    (
        $(#[$enum_meta:meta])*
        pub enum $error:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $field_ty:ty),* $(,)? } )? => $display:expr
            ),* $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $error {
            $(
                $(#[$variant_meta])*
                #[error($display)]
                $variant $( { $($field : $field_ty),* } )?,
            )*
        }

        impl $error {
            $(
                define_port_error!(@constructor $variant $( $($field : $field_ty),* )?);
            )*

            /// Snake-case variant name, e.g. `"unexpected_status"`.
            pub const fn kind(&self) -> &'static str {
                ::paste::paste! {
                    match self {
                        $( Self::$variant { .. } => stringify!([<$variant:snake>]), )*
                    }
                }
            }
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    //! Constructor coverage for generated port errors.
    define_port_error! {
        pub enum SampleError {
            Offline => "offline",
            Refused { message: String } => "refused: {message}",
            UnexpectedStatus { status: u16, message: String } => "status {status}: {message}",
        }
    }

    #[test]
    fn unit_variants_get_constructors() {
        assert_eq!(SampleError::offline(), SampleError::Offline);
        assert_eq!(SampleError::offline().to_string(), "offline");
    }

    #[test]
    fn string_fields_accept_str() {
        assert_eq!(SampleError::refused("no route").to_string(), "refused: no route");
    }

    #[test]
    fn mixed_fields_keep_their_types() {
        let err = SampleError::unexpected_status(502_u16, "bad gateway");
        assert_eq!(err.to_string(), "status 502: bad gateway");
    }

    #[test]
    fn kind_names_the_variant() {
        assert_eq!(SampleError::offline().kind(), "offline");
        assert_eq!(
            SampleError::unexpected_status(500_u16, "boom").kind(),
            "unexpected_status"
        );
    }
}
