use crate::error::{with_last_error_mut, EmError, EmErrorCode};
use std::ffi::CString;

/// Set the thread-local error message and code.
/// Internal helper for FFI functions to record failure details.
pub(crate) fn set_last_error(error: &impl EmError) {
    with_last_error_mut(|(cstring, code)| {
        *cstring = CString::new(error.msg()).ok();
        *code = error.code();
    });
}

/// Track an error by setting it in thread-local storage and returning its code.
#[inline]
pub(crate) fn track_error(error: &impl EmError) -> EmErrorCode {
    tracing::debug!(code = ?error.code(), "{}", error.msg());
    set_last_error(error);
    error.code()
}

/// Clear the thread-local error message and code.
/// Internal helper called on successful operations.
pub(crate) fn clear_last_error() {
    with_last_error_mut(|(cstring, code)| {
        *cstring = None;
        *code = EmErrorCode::Ok;
    });
}

/// Record the outcome of a fallible operation and collapse its error into a code.
pub(crate) fn track_result<T, E: EmError>(result: Result<T, E>) -> Result<T, EmErrorCode> {
    match result {
        Ok(value) => {
            clear_last_error();
            Ok(value)
        }
        Err(error) => Err(track_error(&error)),
    }
}

/// Collapse a `Result<(), EmErrorCode>` into the code returned across the boundary.
#[inline]
pub(crate) fn into_code(result: Result<(), EmErrorCode>) -> EmErrorCode {
    match result {
        Ok(()) => EmErrorCode::Ok,
        Err(code) => code,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{em_get_last_error, em_get_last_error_code, DefaultEmError};
    use std::ffi::CStr;

    #[test]
    fn test_track_result_records_and_clears() {
        let failed: Result<(), _> = Err(DefaultEmError::null_pointer("x"));
        assert_eq!(track_result(failed), Err(EmErrorCode::NullPointer));
        assert_eq!(em_get_last_error_code(), EmErrorCode::NullPointer);
        let msg = unsafe { CStr::from_ptr(em_get_last_error()) };
        assert_eq!(msg.to_str().unwrap(), "Parameter 'x' cannot be null");

        let ok: Result<u8, DefaultEmError> = Ok(3);
        assert_eq!(track_result(ok), Ok(3));
        assert_eq!(em_get_last_error_code(), EmErrorCode::Ok);
        assert!(em_get_last_error().is_null());
    }
}
