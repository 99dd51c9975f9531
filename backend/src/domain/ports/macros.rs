//! Helper macro for declaring port error enums.
//!
//! Every variant carries a single `message` field; the macro derives
//! `thiserror::Error` and generates a snake_case constructor per variant
//! accepting anything convertible into a `String`.

macro_rules! define_port_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => $message:literal
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant {
                    /// Adapter-supplied description of the failure.
                    message: String,
                },
            )*
        }

        impl $name {
            $(
                ::paste::paste! {
                    #[doc = concat!("Build a `", stringify!($variant), "` error.")]
                    pub fn [<$variant:snake>](message: impl Into<String>) -> Self {
                        Self::$variant {
                            message: message.into(),
                        }
                    }
                }
            )*

            /// Adapter-supplied message, whatever the variant.
            #[must_use]
            pub fn message(&self) -> &str {
                match self {
                    $( Self::$variant { message } => message.as_str(), )*
                }
            }
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    define_port_error! {
        pub enum SamplePortError {
            Connection => "connection failed: {message}",
            Query => "query failed: {message}",
        }
    }

    #[test]
    fn constructors_accept_str_and_format_message() {
        let err = SamplePortError::connection("refused");
        assert_eq!(err.to_string(), "connection failed: refused");
        assert_eq!(err.message(), "refused");
    }

    #[test]
    fn constructors_accept_owned_strings() {
        let err = SamplePortError::query(String::from("syntax"));
        assert!(matches!(err, SamplePortError::Query { .. }));
        assert_eq!(err.to_string(), "query failed: syntax");
    }
}
