use em1d_core::ModelError;
use std::cell::RefCell;
use std::ffi::CString;
use std::os::raw::c_char;
use std::ptr;

/// Common interface for FFI error types.
///
/// Every failure that crosses the C boundary is reduced to an error code plus a
/// message kept in thread-local storage for `em_get_last_error`.
///
/// # Example
/// ```rust,ignore
/// let err = DefaultEmError::null_pointer("out_aux");
/// assert_eq!(err.code(), EmErrorCode::NullPointer);
/// assert_eq!(err.msg(), "Parameter 'out_aux' cannot be null");
/// ```
pub(crate) trait EmError {
    /// Returns the error code to be returned across the FFI boundary.
    fn code(&self) -> EmErrorCode;

    /// Returns the human-readable error message.
    fn msg(&self) -> &str;
}

/// Default implementation of `EmError` for the errors raised by this crate
/// and the ones forwarded from `em1d-core`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DefaultEmError {
    code: EmErrorCode,
    msg: String,
}

impl DefaultEmError {
    /// Create error for null pointer passed where non-null required.
    ///
    /// # Arguments
    /// * `param_name` - The name of the parameter that was null (e.g., `"out_instance"`, `"x"`)
    pub fn null_pointer(param_name: &str) -> Self {
        Self {
            code: EmErrorCode::NullPointer,
            msg: format!("Parameter '{param_name}' cannot be null"),
        }
    }

    /// Create error for a selector code that names no material profile.
    pub fn unknown_material(code: u8) -> Self {
        Self {
            code: EmErrorCode::InvalidConfiguration,
            msg: format!(
                "Unknown material profile code {code} (expected 0=homogeneous, 1=interface, 2=moving_gaussian)"
            ),
        }
    }

    /// Create error for a selector code that names no excitation.
    pub fn unknown_excitation(code: u8) -> Self {
        Self {
            code: EmErrorCode::InvalidConfiguration,
            msg: format!(
                "Unknown excitation code {code} (expected 0=plane, 1=gauss_pulse, 2=simple_pulse)"
            ),
        }
    }

    /// Report any core error raised while building the model as a configuration error.
    pub fn invalid_configuration(error: ModelError) -> Self {
        Self {
            code: EmErrorCode::InvalidConfiguration,
            ..Self::from(error)
        }
    }

    /// Create error for a buffer length the model cannot accept.
    ///
    /// # Arguments
    /// * `param_name` - The name of the length parameter (e.g., `"len"`, `"num_ghost"`)
    /// * `value` - The rejected value
    /// * `constraint` - Description of the constraint (e.g., `"must equal the cell count 600"`)
    pub fn invalid_length(param_name: &str, value: usize, constraint: &str) -> Self {
        Self {
            code: EmErrorCode::InvalidParameter,
            msg: format!("Parameter {param_name}: {constraint}, got {value}"),
        }
    }
}

impl From<ModelError> for DefaultEmError {
    fn from(error: ModelError) -> Self {
        let code = match error {
            ModelError::InvalidParameter { .. } => EmErrorCode::InvalidParameter,
            ModelError::NonFinite { .. } => EmErrorCode::NumericalDomain,
            ModelError::ShapeMismatch { .. } => EmErrorCode::ShapeMismatch,
            ModelError::UnknownMaterialProfile(_)
            | ModelError::UnknownExcitation(_)
            | ModelError::ZeroWidthPerturbation { .. } => EmErrorCode::InvalidConfiguration,
        };
        Self {
            code,
            msg: error.to_string(),
        }
    }
}

impl EmError for DefaultEmError {
    fn code(&self) -> EmErrorCode {
        self.code
    }

    fn msg(&self) -> &str {
        &self.msg
    }
}

/// FFI error codes returned by the material model functions.
/// Follows standard C convention: 0 = success, non-zero = error.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmErrorCode {
    /// Operation completed successfully.
    Ok = 0,

    /// Invalid pointer: null pointer passed where non-null required.
    NullPointer = 1,

    /// The parameters do not describe a valid run (unknown selector, zero-width
    /// perturbation, non-positive wavelength, ...). Fatal for the run.
    InvalidConfiguration = 2,

    /// An evaluation produced NaN or infinity.
    NumericalDomain = 3,

    /// A host buffer does not have the shape the model expects.
    ShapeMismatch = 4,

    /// Invalid parameter passed to function.
    InvalidParameter = 5,
}

impl From<DefaultEmError> for EmErrorCode {
    fn from(error: DefaultEmError) -> Self {
        error.code
    }
}

thread_local! {
    /// Thread-local storage for the most recent FFI error (C string, error code).
    /// The CString is stored here so the pointer handed out stays valid.
    static LAST_ERROR: RefCell<(Option<CString>, EmErrorCode)> = const { RefCell::new((None, EmErrorCode::Ok)) };
}

/// Internal helper to read `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error<F, R>(f: F) -> R
where
    F: FnOnce(&(Option<CString>, EmErrorCode)) -> R,
{
    LAST_ERROR.with_borrow(f)
}

/// Internal helper to mutate `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut (Option<CString>, EmErrorCode)) -> R,
{
    LAST_ERROR.with_borrow_mut(f)
}

/// Retrieve the most recent FFI error message as a null-terminated C string.
///
/// Returns:
/// - A borrowed pointer to the error message if an error occurred.
/// - `null` if the last call on this thread succeeded.
///
/// # Thread Safety
/// Error messages are stored per-thread, so each host thread sees only the
/// errors of its own calls.
///
/// # Lifetime
/// The returned pointer is valid until the next FFI call on this thread.
///
/// **DO NOT FREE THIS POINTER** - it is managed internally.
///
/// Example:
/// ```cpp
/// EmModelInstance* model = nullptr;
/// EmErrorCode err = em_model_new(&params, &model);
/// if (err != EmErrorCode::Ok) {
///     const char* error = em_get_last_error();
///     if (error) {
///         printf("Material model setup failed: %s\n", error);
///     }
/// }
/// ```
#[no_mangle]
pub extern "C" fn em_get_last_error() -> *const c_char {
    with_last_error(|(cstring, _code)| cstring.as_ref().map_or(ptr::null(), |cs| cs.as_ptr()))
}

/// Retrieve the most recent FFI error code.
///
/// Returns:
/// - `EmErrorCode::Ok` (0) if the last call on this thread succeeded
/// - The specific error code from the last failed operation
#[no_mangle]
pub extern "C" fn em_get_last_error_code() -> EmErrorCode {
    with_last_error(|(_cstring, code)| *code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_errors_map_to_codes() {
        let shape = DefaultEmError::from(ModelError::ShapeMismatch {
            array: "q",
            expected_rows: 2,
            rows: 2,
            expected_len: 10,
            len: 9,
        });
        assert_eq!(shape.code(), EmErrorCode::ShapeMismatch);
        assert!(shape.msg().contains("2x9"));

        let zero_width = DefaultEmError::from(ModelError::ZeroWidthPerturbation { field: "mu" });
        assert_eq!(zero_width.code(), EmErrorCode::InvalidConfiguration);

        let nan = DefaultEmError::from(ModelError::NonFinite {
            quantity: "epsilon",
            time: 0.0,
            position: 1e-6,
        });
        assert_eq!(nan.code(), EmErrorCode::NumericalDomain);
    }

    #[test]
    fn test_selector_errors_are_configuration_errors() {
        assert_eq!(
            DefaultEmError::unknown_material(7).code(),
            EmErrorCode::InvalidConfiguration
        );
        assert_eq!(
            DefaultEmError::unknown_excitation(3).code(),
            EmErrorCode::InvalidConfiguration
        );
    }
}
