use em1d_core::core_types::{RowArray, AUX_ROWS, FIELD_ROWS};
use em1d_core::{Configuration, EmMaterialModel, MaterialModel, SolverState, UniformGrid};
use std::ptr;
use std::slice;
use std::sync::Arc;

use crate::error::{DefaultEmError, EmErrorCode};
use crate::helpers::{into_code, track_error, track_result};
use crate::parameters::EmParameters;

/// Opaque handle to a configured material model.
///
/// The instance is immutable after creation: every call reads time and
/// positions from its arguments and writes only into caller-provided buffers,
/// so one handle may be shared by several host threads.
pub struct EmModelInstance {
    pub(crate) model: EmMaterialModel,
    pub(crate) grid: UniformGrid,
}

impl EmModelInstance {
    /// Resolve the parameters and build the model.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` for unknown selectors or parameters that
    /// `Configuration::new` rejects.
    pub(crate) fn new(params: &EmParameters) -> Result<Box<Self>, DefaultEmError> {
        let config = Configuration::new(params.simulation_parameters()?)
            .map_err(DefaultEmError::invalid_configuration)?;
        let grid = config.grid().map_err(DefaultEmError::invalid_configuration)?;
        tracing::info!(
            cells = grid.num_cells(),
            material = %config.material().shape(),
            excitation = %config.incident().excitation.kind(),
            "Material model created over FFI"
        );
        Ok(Box::new(Self {
            model: EmMaterialModel::new(Arc::new(config)),
            grid,
        }))
    }

    fn state(&self, t: f64) -> SolverState {
        SolverState::new(self.grid, t)
    }

    fn state_with_field(&self, t: f64, q: &[f64]) -> Result<SolverState, DefaultEmError> {
        let mut state = self.state(t);
        state.q = RowArray::from_vec(q.to_vec(), FIELD_ROWS, self.grid.num_cells())?;
        Ok(state)
    }

    fn padded_len(&self, num_ghost: usize) -> Result<usize, DefaultEmError> {
        self.grid.padded_len(num_ghost).map_err(DefaultEmError::from)
    }

    fn expect_cell_count(&self, len: usize) -> Result<(), DefaultEmError> {
        let num_cells = self.grid.num_cells();
        if len == num_cells {
            Ok(())
        } else {
            Err(DefaultEmError::invalid_length(
                "len",
                len,
                &format!("must equal the cell count {num_cells}"),
            ))
        }
    }
}

/// Borrow the instance behind a handle, recording a null-pointer error.
///
/// # Safety
/// `ptr` must be null or a live pointer returned by `em_model_new`.
unsafe fn instance_from_ptr<'a>(
    ptr: *const EmModelInstance,
) -> Result<&'a EmModelInstance, EmErrorCode> {
    if ptr.is_null() {
        return Err(track_error(&DefaultEmError::null_pointer("ptr")));
    }
    // SAFETY: non-null, and the caller guarantees it came from `em_model_new`.
    Ok(unsafe { &*ptr })
}

/// Copy `width` columns of every row of `padded`, starting at `start`, into
/// `out` row-major.
fn copy_columns(padded: &RowArray, start: usize, width: usize, out: &mut [f64]) {
    for row in 0..padded.rows {
        out[row * width..(row + 1) * width].copy_from_slice(&padded.row(row)[start..start + width]);
    }
}

/// Reject a null buffer before it is turned into a slice.
fn require_non_null<T>(buffer: *const T, name: &str) -> Result<(), EmErrorCode> {
    if buffer.is_null() {
        Err(track_error(&DefaultEmError::null_pointer(name)))
    } else {
        Ok(())
    }
}

/// Creates a new material model from `params`.
///
/// On success `*out_instance` receives an owned handle that must be released
/// with `em_model_destroy`. On error it is set to null and the reason is
/// available from `em_get_last_error`.
///
/// # Safety
/// - `params` must point to a valid `EmParameters`.
/// - `out_instance` must be a valid, writable pointer.
///
/// Example (C++)
/// ```cpp
/// EmParameters params = em_parameters_default();
/// EmModelInstance* model = nullptr;
/// if (em_model_new(&params, &model) != EmErrorCode::Ok) {
///     fprintf(stderr, "%s\n", em_get_last_error());
///     return;
/// }
/// // ... use model ...
/// em_model_destroy(model);
/// ```
#[no_mangle]
pub unsafe extern "C" fn em_model_new(
    params: *const EmParameters,
    out_instance: *mut *mut EmModelInstance,
) -> EmErrorCode {
    if out_instance.is_null() {
        return track_error(&DefaultEmError::null_pointer("out_instance"));
    }
    if params.is_null() {
        // SAFETY: checked non-null above.
        unsafe {
            *out_instance = ptr::null_mut();
        }
        return track_error(&DefaultEmError::null_pointer("params"));
    }

    // SAFETY: both pointers checked non-null; validity is the caller's contract.
    let params = unsafe { &*params };
    match track_result(EmModelInstance::new(params)) {
        Ok(instance) => {
            unsafe {
                *out_instance = Box::into_raw(instance);
            }
            EmErrorCode::Ok
        }
        Err(code) => {
            unsafe {
                *out_instance = ptr::null_mut();
            }
            code
        }
    }
}

/// Destroys a model previously created by `em_model_new`.
///
/// Passing null is a no-op.
///
/// # Safety
/// - The pointer MUST have been created by `em_model_new` and not freed already.
/// - After this call the pointer must not be used again.
#[no_mangle]
pub unsafe extern "C" fn em_model_destroy(ptr: *mut EmModelInstance) {
    if ptr.is_null() {
        return;
    }

    // SAFETY: created by `Box::into_raw` in `em_model_new` per the contract above.
    unsafe {
        drop(Box::from_raw(ptr));
    }
}

/// Writes the number of interior cells of the model's grid to `out_count`.
///
/// # Safety
/// - `ptr` must be a live handle from `em_model_new`.
/// - `out_count` must be a valid, writable pointer.
#[no_mangle]
pub unsafe extern "C" fn em_model_cell_count(
    ptr: *const EmModelInstance,
    out_count: *mut usize,
) -> EmErrorCode {
    into_code(unsafe { cell_count(ptr, out_count) })
}

unsafe fn cell_count(
    ptr: *const EmModelInstance,
    out_count: *mut usize,
) -> Result<(), EmErrorCode> {
    let instance = unsafe { instance_from_ptr(ptr) }?;
    require_non_null(out_count, "out_count")?;
    unsafe {
        *out_count = instance.grid.num_cells();
    }
    Ok(())
}

/// Evaluates `[ε_r, μ_r, ∂ε_r/∂t, ∂μ_r/∂t]` at time `t` for `len` positions.
///
/// `out_aux` receives `4 * len` values, row-major: all ε_r first, then all
/// μ_r, then the two rates.
///
/// # Safety
/// - `ptr` must be a live handle from `em_model_new`.
/// - `x` must point to `len` readable `f64` values.
/// - `out_aux` must point to `4 * len` writable `f64` values.
#[no_mangle]
pub unsafe extern "C" fn em_model_evaluate(
    ptr: *const EmModelInstance,
    t: f64,
    x: *const f64,
    len: usize,
    out_aux: *mut f64,
) -> EmErrorCode {
    into_code(unsafe { evaluate(ptr, t, x, len, out_aux) })
}

unsafe fn evaluate(
    ptr: *const EmModelInstance,
    t: f64,
    x: *const f64,
    len: usize,
    out_aux: *mut f64,
) -> Result<(), EmErrorCode> {
    let instance = unsafe { instance_from_ptr(ptr) }?;
    require_non_null(x, "x")?;
    require_non_null(out_aux, "out_aux")?;

    // SAFETY: non-null, lengths are the caller's contract.
    let x = unsafe { slice::from_raw_parts(x, len) };
    let out = unsafe { slice::from_raw_parts_mut(out_aux, AUX_ROWS * len) };

    let aux = track_result(instance.model.evaluate(t, x).map_err(DefaultEmError::from))?;
    out.copy_from_slice(aux.as_slice());
    Ok(())
}

/// Writes the incident wave into the lower ghost cells.
///
/// `out_q` receives `2 * num_ghost` values, row-major: the electric field of
/// every ghost cell, then the magnetic field. Column 0 is the outermost cell.
///
/// # Safety
/// - `ptr` must be a live handle from `em_model_new`.
/// - `out_q` must point to `2 * num_ghost` writable `f64` values.
#[no_mangle]
pub unsafe extern "C" fn em_model_fill_field_lower(
    ptr: *const EmModelInstance,
    t: f64,
    num_ghost: usize,
    out_q: *mut f64,
) -> EmErrorCode {
    into_code(unsafe { fill_field_lower(ptr, t, num_ghost, out_q) })
}

unsafe fn fill_field_lower(
    ptr: *const EmModelInstance,
    t: f64,
    num_ghost: usize,
    out_q: *mut f64,
) -> Result<(), EmErrorCode> {
    let instance = unsafe { instance_from_ptr(ptr) }?;
    require_non_null(out_q, "out_q")?;
    let padded = track_result(instance.padded_len(num_ghost))?;

    let mut qbc = RowArray::field(padded);
    track_result(
        instance
            .model
            .fill_field_lower(&instance.grid, t, &mut qbc, num_ghost)
            .map_err(DefaultEmError::from),
    )?;

    // SAFETY: non-null, length is the caller's contract.
    let out = unsafe { slice::from_raw_parts_mut(out_q, FIELD_ROWS * num_ghost) };
    copy_columns(&qbc, 0, num_ghost, out);
    Ok(())
}

/// Refreshes the auxiliary state of the interior cells at time `t`.
///
/// `out_aux` receives `4 * len` values in the layout of `em_model_evaluate`.
/// Call it before every step, or before every stage when the run refreshes
/// per stage.
///
/// # Safety
/// - `ptr` must be a live handle from `em_model_new`.
/// - `out_aux` must point to `4 * len` writable `f64` values.
#[no_mangle]
pub unsafe extern "C" fn em_model_before_step(
    ptr: *const EmModelInstance,
    t: f64,
    len: usize,
    out_aux: *mut f64,
) -> EmErrorCode {
    into_code(unsafe { before_step(ptr, t, len, out_aux) })
}

unsafe fn before_step(
    ptr: *const EmModelInstance,
    t: f64,
    len: usize,
    out_aux: *mut f64,
) -> Result<(), EmErrorCode> {
    let instance = unsafe { instance_from_ptr(ptr) }?;
    require_non_null(out_aux, "out_aux")?;
    track_result(instance.expect_cell_count(len))?;

    let mut state = instance.state(t);
    track_result(instance.model.before_step(&mut state).map_err(DefaultEmError::from))?;

    // SAFETY: non-null, length is the caller's contract.
    let out = unsafe { slice::from_raw_parts_mut(out_aux, AUX_ROWS * len) };
    out.copy_from_slice(state.aux.as_slice());
    Ok(())
}

#[derive(Clone, Copy)]
enum GhostSide {
    Lower,
    Upper,
}

/// Evaluates the material profile on the ghost cells below `x_lower`.
///
/// `out_aux` receives `4 * num_ghost` values, row-major as in
/// `em_model_evaluate`. Column 0 is the outermost cell.
///
/// # Safety
/// - `ptr` must be a live handle from `em_model_new`.
/// - `out_aux` must point to `4 * num_ghost` writable `f64` values.
#[no_mangle]
pub unsafe extern "C" fn em_model_fill_aux_lower(
    ptr: *const EmModelInstance,
    t: f64,
    num_ghost: usize,
    out_aux: *mut f64,
) -> EmErrorCode {
    into_code(unsafe { fill_aux(ptr, t, num_ghost, out_aux, GhostSide::Lower) })
}

/// Evaluates the material profile on the ghost cells above `x_upper`.
///
/// Same layout as `em_model_fill_aux_lower`; column 0 is the cell next to
/// the domain.
///
/// # Safety
/// - `ptr` must be a live handle from `em_model_new`.
/// - `out_aux` must point to `4 * num_ghost` writable `f64` values.
#[no_mangle]
pub unsafe extern "C" fn em_model_fill_aux_upper(
    ptr: *const EmModelInstance,
    t: f64,
    num_ghost: usize,
    out_aux: *mut f64,
) -> EmErrorCode {
    into_code(unsafe { fill_aux(ptr, t, num_ghost, out_aux, GhostSide::Upper) })
}

unsafe fn fill_aux(
    ptr: *const EmModelInstance,
    t: f64,
    num_ghost: usize,
    out_aux: *mut f64,
    side: GhostSide,
) -> Result<(), EmErrorCode> {
    let instance = unsafe { instance_from_ptr(ptr) }?;
    require_non_null(out_aux, "out_aux")?;
    let padded = track_result(instance.padded_len(num_ghost))?;

    let grid = &instance.grid;
    let mut auxbc = RowArray::aux(padded);
    let (filled, start) = match side {
        GhostSide::Lower => (
            instance.model.fill_aux_lower(grid, t, &mut auxbc, num_ghost),
            0,
        ),
        GhostSide::Upper => (
            instance.model.fill_aux_upper(grid, t, &mut auxbc, num_ghost),
            grid.num_cells() + num_ghost,
        ),
    };
    track_result(filled.map_err(DefaultEmError::from))?;

    // SAFETY: non-null, length is the caller's contract.
    let out = unsafe { slice::from_raw_parts_mut(out_aux, AUX_ROWS * num_ghost) };
    copy_columns(&auxbc, start, num_ghost, out);
    Ok(())
}

/// Zeroes the field state `q` (`2 * len` values, `len` = cell count).
///
/// # Safety
/// - `ptr` must be a live handle from `em_model_new`.
/// - `q` must point to `2 * len` writable `f64` values.
#[no_mangle]
pub unsafe extern "C" fn em_model_set_initial_conditions(
    ptr: *const EmModelInstance,
    q: *mut f64,
    len: usize,
) -> EmErrorCode {
    into_code(unsafe { set_initial_conditions(ptr, q, len) })
}

unsafe fn set_initial_conditions(
    ptr: *const EmModelInstance,
    q: *mut f64,
    len: usize,
) -> Result<(), EmErrorCode> {
    let instance = unsafe { instance_from_ptr(ptr) }?;
    require_non_null(q, "q")?;
    track_result(instance.expect_cell_count(len))?;

    // SAFETY: non-null, length is the caller's contract.
    let q = unsafe { slice::from_raw_parts_mut(q, FIELD_ROWS * len) };
    let mut state = track_result(instance.state_with_field(0.0, q))?;
    track_result(
        instance
            .model
            .set_initial_conditions(&mut state)
            .map_err(DefaultEmError::from),
    )?;
    q.copy_from_slice(state.q.as_slice());
    Ok(())
}

/// Computes the effective capacity `[ε_eff, μ_eff]` on the interior cells.
///
/// `q` holds the current field (`2 * len` values); `out_capacity` receives
/// `2 * len` values in the same layout.
///
/// # Safety
/// - `ptr` must be a live handle from `em_model_new`.
/// - `q` must point to `2 * len` readable `f64` values.
/// - `out_capacity` must point to `2 * len` writable `f64` values.
#[no_mangle]
pub unsafe extern "C" fn em_model_capacity(
    ptr: *const EmModelInstance,
    t: f64,
    q: *const f64,
    len: usize,
    out_capacity: *mut f64,
) -> EmErrorCode {
    into_code(unsafe { capacity(ptr, t, q, len, out_capacity) })
}

unsafe fn capacity(
    ptr: *const EmModelInstance,
    t: f64,
    q: *const f64,
    len: usize,
    out_capacity: *mut f64,
) -> Result<(), EmErrorCode> {
    let instance = unsafe { instance_from_ptr(ptr) }?;
    require_non_null(q, "q")?;
    require_non_null(out_capacity, "out_capacity")?;
    track_result(instance.expect_cell_count(len))?;

    // SAFETY: non-null, lengths are the caller's contract.
    let q = unsafe { slice::from_raw_parts(q, FIELD_ROWS * len) };
    let out = unsafe { slice::from_raw_parts_mut(out_capacity, FIELD_ROWS * len) };

    let state = track_result(instance.state_with_field(t, q))?;
    let capacity = track_result(instance.model.capacity(&state).map_err(DefaultEmError::from))?;
    out.copy_from_slice(capacity.as_slice());
    Ok(())
}

/// Computes the time-centered derivative of the linear response on the
/// interior cells: `(ε(t + dt/2) - ε(t - dt/2)) / dt` and likewise for μ.
///
/// # Safety
/// - `ptr` must be a live handle from `em_model_new`.
/// - `out_rate` must point to `2 * len` writable `f64` values.
#[no_mangle]
pub unsafe extern "C" fn em_model_response_rate(
    ptr: *const EmModelInstance,
    t: f64,
    dt: f64,
    len: usize,
    out_rate: *mut f64,
) -> EmErrorCode {
    into_code(unsafe { response_rate(ptr, t, dt, len, out_rate) })
}

unsafe fn response_rate(
    ptr: *const EmModelInstance,
    t: f64,
    dt: f64,
    len: usize,
    out_rate: *mut f64,
) -> Result<(), EmErrorCode> {
    let instance = unsafe { instance_from_ptr(ptr) }?;
    require_non_null(out_rate, "out_rate")?;
    track_result(instance.expect_cell_count(len))?;

    // SAFETY: non-null, length is the caller's contract.
    let out = unsafe { slice::from_raw_parts_mut(out_rate, FIELD_ROWS * len) };

    let rate = track_result(
        instance
            .model
            .response_rate(&instance.state(t), dt)
            .map_err(DefaultEmError::from),
    )?;
    out.copy_from_slice(rate.as_slice());
    Ok(())
}
