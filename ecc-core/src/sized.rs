//! Query-then-fill helper for backend operations with variable-length output.

use zeroize::Zeroizing;

use crate::error::{EccError, Result};
use ecc_primitives::status;

/// Ask for the output size, allocate exactly that, let the backend fill it and
/// trim to the length actually written.
///
/// The buffer is zeroized on drop, so the same helper serves public encodings
/// and secrets alike.
///
/// # Errors
///
/// Propagates errors from either closure. A fill that claims to have written
/// more than it was given fails with `OperationFailed` and `BUFFER_E`.
pub fn sized_operation<S, F>(compute_size: S, fill_buffer: F) -> Result<Zeroizing<Vec<u8>>>
where
    S: FnOnce() -> Result<usize>,
    F: FnOnce(&mut [u8]) -> Result<usize>,
{
    let size = compute_size()?;
    let mut buffer = Zeroizing::new(vec![0u8; size]);
    let written = fill_buffer(buffer.as_mut_slice())?;
    if written > size {
        return Err(EccError::OperationFailed {
            operation: "sized_operation",
            status: status::BUFFER_E,
        });
    }
    buffer.truncate(written);
    Ok(buffer)
}
