//=======================================================================//
// IMPORTS
//
//=======================================================================//

use serde::{Deserialize, Serialize};

//=======================================================================//
// MACROS
//
//=======================================================================//

/// Generates the [`Value`] enum and the [`ToValue`] impls for every primitive it wraps.
macro_rules! for_each_value {
    ($macro:ident) => {
        $macro!(
            Bool, bool, true,
            U8, u8, 0,
            U16, u16, 0,
            I8, i8, 0,
            I16, i16, 0,
            I32, i32, 0,
            F32, f32, 0f32,
            String, String, String::new()
        );
    };
}

/// Generates [`ToValue`] implementations for every primitive.
macro_rules! to_value {
    ($($variant:ident, $t:ty, $default:expr),+) => {$(
        impl ToValue for $t
        {
            #[inline]
            fn to_value(&self) -> Value { Value::$variant((*self).to_owned()) }
        }
    )+};
}

/// Generates the [`Value`] enum itself.
macro_rules! value_enum {
    ($($variant:ident, $t:ty, $default:expr),+) => {
        /// A named field's runtime value. Used by the creation-entity "with meta" edits and by
        /// property-change edits, where the concrete field type is only known at the call site.
        #[must_use]
        #[derive(Clone, Debug, Serialize, Deserialize)]
        pub enum Value
        {
            $(
                #[allow(missing_docs)]
                $variant($t),
            )+
        }

        impl Default for Value
        {
            #[inline]
            fn default() -> Self { Value::Bool(true) }
        }
    };
}

for_each_value!(value_enum);
for_each_value!(to_value);

//=======================================================================//
// TRAITS
//
//=======================================================================//

/// Converts a concrete value into its type-erased [`Value`] counterpart.
pub trait ToValue
{
    /// Converts `self` to a [`Value`].
    fn to_value(&self) -> Value;
}

//=======================================================================//
// TESTS
//
//=======================================================================//

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn primitives_round_trip_through_value()
    {
        assert!(matches!(42u8.to_value(), Value::U8(42)));
        assert!(matches!("hi".to_owned().to_value(), Value::String(s) if s == "hi"));
    }
}
