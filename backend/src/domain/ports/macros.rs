//! Macro for declaring port error enums with snake_case constructors.
//!
//! ```ignore
//! define_port_error! {
//!     /// Errors raised by the mood store.
//!     pub enum MoodPersistenceError {
//!         Connection { message: String } => "mood store connection failed: {message}",
//!         Query { message: String } => "mood store query failed: {message}",
//!     }
//! }
//!
//! let err = MoodPersistenceError::query("boom");
//! ```
//!
//! Struct variant fields become `impl Into<T>` constructor parameters; unit
//! variants get a zero-argument constructor.

macro_rules! define_port_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:literal
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
                define_port_error!(@constructor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };

    (@constructor $variant:ident) => {
        ::paste::paste! {
            #[must_use]
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@constructor $variant:ident { $($field:ident : $ty:ty),* }) => {
        ::paste::paste! {
            #[must_use]
            pub fn [<$variant:snake>]($($field: impl Into<$ty>),*) -> Self {
                Self::$variant { $($field: $field.into()),* }
            }
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    define_port_error! {
        pub enum SampleStoreError {
            Connection { message: String } => "connection failed: {message}",
            Duplicate => "already exists",
            Limit { message: String, max: u32 } => "{message} (max {max})",
        }
    }

    #[test]
    fn struct_variant_constructor_accepts_str() {
        let err = SampleStoreError::connection("refused");
        assert_eq!(err.to_string(), "connection failed: refused");
    }

    #[test]
    fn unit_variant_has_zero_argument_constructor() {
        assert_eq!(SampleStoreError::duplicate(), SampleStoreError::Duplicate);
        assert_eq!(SampleStoreError::duplicate().to_string(), "already exists");
    }

    #[test]
    fn mixed_fields_keep_their_types() {
        let err = SampleStoreError::limit("too many", 3_u32);
        assert_eq!(err.to_string(), "too many (max 3)");
    }
}
