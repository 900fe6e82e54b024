use crate::error::{ErrorCode, GraphicsError};

/// Runs `f` inside error scopes for every error class and turns anything the
/// device reported into a `ResourceCreation` error carrying all messages.
pub(super) fn capture<T>(
    device: &wgpu::Device,
    what: &'static str,
    f: impl FnOnce() -> T,
) -> Result<T, GraphicsError> {
    let oom = device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
    let internal = device.push_error_scope(wgpu::ErrorFilter::Internal);
    let validation = device.push_error_scope(wgpu::ErrorFilter::Validation);

    let value = f();

    // Scopes pop in reverse push order.
    let popped = [
        (ErrorCode::Validation, validation),
        (ErrorCode::Internal, internal),
        (ErrorCode::OutOfMemory, oom),
    ];

    let mut code = None;
    let mut info = Vec::new();
    for (scope_code, guard) in popped {
        if let Some(err) = pollster::block_on(guard.pop()) {
            code.get_or_insert(scope_code);
            info.push(err.to_string());
        }
    }

    match code {
        None => Ok(value),
        Some(code) => {
            log::error!("creating {what} failed: {}", info.join("; "));
            Err(GraphicsError::ResourceCreation { what, code, info })
        }
    }
}
