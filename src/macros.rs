//=======================================================================//
// MACROS
//
//=======================================================================//

/// Ends the function call if `$value` is `None`. Otherwise returns the contained value.
macro_rules! return_if_none {
    ($value:expr) => {
        match $value {
            Some(value) => value,
            None => return
        }
    };

    ($value:expr, $return_value:expr) => {
        match $value {
            Some(value) => value,
            None => return $return_value
        }
    };
}

pub(crate) use return_if_none;
