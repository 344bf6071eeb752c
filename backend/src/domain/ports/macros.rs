//! Helper macro generating port error enums with snake_case constructors.

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
    //! Regression coverage for the generated constructors.
    use rstest::rstest;

    define_port_error! {
        pub enum RosterPortError {
            Unreachable { message: String } => "roster store unreachable: {message}",
            Missing { event_id: i64 } => "event {event_id} has no roster",
            Stale { message: String, event_id: i64 } => "roster for {event_id} is stale: {message}",
            Duplicate => "duplicate roster row",
        }
    }

    #[rstest]
    fn string_fields_accept_str() {
        let err = RosterPortError::unreachable("timeout");
        assert_eq!(err.to_string(), "roster store unreachable: timeout");
    }

    #[rstest]
    fn numeric_fields_keep_their_type() {
        let err = RosterPortError::missing(42_i64);
        assert_eq!(err.to_string(), "event 42 has no roster");
    }

    #[rstest]
    fn mixed_fields_are_positional() {
        let err = RosterPortError::stale("replica lag", 7_i64);
        assert_eq!(err.to_string(), "roster for 7 is stale: replica lag");
    }

    #[rstest]
    fn unit_variants_get_nullary_constructors() {
        assert_eq!(RosterPortError::duplicate(), RosterPortError::Duplicate);
    }
}
