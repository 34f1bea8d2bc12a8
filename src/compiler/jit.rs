//! In-process execution of a lowered module.

use std::sync::OnceLock;

use inkwell::{
    execution_engine::JitFunction,
    targets::{InitializationConfig, Target},
    OptimizationLevel,
};
use log::debug;

use crate::{
    errors::errors::{Error, ErrorImpl},
    Position,
};

use super::compiler::{backend_error, Compiler};

type EntryPoint = unsafe extern "C" fn() -> i32;

static NATIVE_TARGET: OnceLock<Result<(), String>> = OnceLock::new();

/// Verifies the module, JIT-compiles it and calls `name`, which must take no
/// arguments and return `i32`.
///
/// The module is handed to the execution engine, so a compiler can only be
/// run once.
pub fn run_entry_point(compiler: &Compiler<'_>, name: &str) -> Result<i32, Error> {
    let position = Position::null();

    let function = compiler.module.get_function(name).ok_or_else(|| {
        Error::new(
            ErrorImpl::UnregisteredFunction {
                function: name.to_string(),
            },
            position.clone(),
        )
    })?;

    let returns_i32 =
        function.get_type().get_return_type() == Some(compiler.context.i32_type().into());
    if function.count_params() != 0 || !returns_i32 {
        return Err(backend_error(
            format!(
                "entry point {:?} must take no arguments and return i32",
                name
            ),
            &position,
        ));
    }

    compiler.verify()?;

    NATIVE_TARGET
        .get_or_init(|| Target::initialize_native(&InitializationConfig::default()))
        .clone()
        .map_err(|message| backend_error(message, &position))?;
    let engine = compiler
        .module
        .create_jit_execution_engine(OptimizationLevel::None)
        .map_err(|message| backend_error(message, &position))?;

    debug!("Running entry point {}", name);
    let entry: JitFunction<EntryPoint> = unsafe { engine.get_function(name) }
        .map_err(|error| backend_error(format!("{:?}", error), &position))?;

    Ok(unsafe { entry.call() })
}
