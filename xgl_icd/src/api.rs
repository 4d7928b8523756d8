/// Shader entry points
///
/// `create_shader` and `create_shader_from_glsl` resolve the device and
/// delegate identically: the GLSL entry point does not force the GLSL
/// front-end, which is chosen by the create info's structure type and the
/// device's `COMPILE_GLSL` extension.

use crate::error::{Result, ResultCode};
use crate::icd::{DeviceHandle, Icd, ShaderHandle};
use crate::shader::{Shader, ShaderCreateInfo};

fn shader_create(device: DeviceHandle, info: &ShaderCreateInfo<'_>) -> Result<ShaderHandle> {
    let dev = Icd::device(device)?;

    let shader = Shader::create(&dev, info)?;

    Icd::register_shader(device, shader)
}

/// Create a shader object
///
/// # Errors
///
/// - `InvalidHandle` if `device` is unknown
/// - `OutOfMemory`, `InvalidMemorySize` or `BadShaderCode` from shader creation
pub fn create_shader(device: DeviceHandle, info: &ShaderCreateInfo<'_>) -> Result<ShaderHandle> {
    shader_create(device, info)
}

/// Create a shader object from GLSL (COMPILE_GLSL extension entry point)
pub fn create_shader_from_glsl(device: DeviceHandle, info: &ShaderCreateInfo<'_>) -> Result<ShaderHandle> {
    shader_create(device, info)
}

fn into_raw(result: Result<ShaderHandle>) -> (Option<ShaderHandle>, ResultCode) {
    let code = ResultCode::from(&result);
    (result.ok(), code)
}

/// `create_shader` in `(handle, result code)` form; the handle is unset on failure
pub fn create_shader_raw(device: DeviceHandle, info: &ShaderCreateInfo<'_>) -> (Option<ShaderHandle>, ResultCode) {
    into_raw(create_shader(device, info))
}

/// `create_shader_from_glsl` in `(handle, result code)` form
pub fn create_shader_from_glsl_raw(
    device: DeviceHandle,
    info: &ShaderCreateInfo<'_>,
) -> (Option<ShaderHandle>, ResultCode) {
    into_raw(create_shader_from_glsl(device, info))
}

/// Destroy an object created through this API
pub fn destroy_object(object: ShaderHandle) -> Result<()> {
    Icd::destroy_object(object)
}
