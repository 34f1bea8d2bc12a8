//! Main compiler module.
//!
//! This module contains the core Compiler structure and implements lowering
//! from the typed AST to LLVM IR. It manages the LLVM context, module and
//! builder, type conversion, and the storage scopes holding each variable's
//! stack slot.

use std::{fmt::Display, path::PathBuf};

use inkwell::{
    attributes::{Attribute, AttributeLoc},
    basic_block::BasicBlock,
    builder::Builder,
    context::Context,
    module::{Linkage, Module},
    types::{BasicMetadataTypeEnum, BasicType, BasicTypeEnum, FunctionType},
    values::{FunctionValue, PointerValue},
    AddressSpace,
};
use log::debug;

use crate::{
    ast::{ast::Program, statements::FunctionDecl, types::Type},
    errors::errors::{CompileError, Error, ErrorImpl},
    symbols::symbols::{ScopeId, SymbolTable},
    Position,
};

use super::stmt::gen_statement;

/// The main compiler structure that holds the state of the lowering pass.
///
/// This structure manages all aspects of LLVM code generation, including:
/// - The LLVM context, module, and builder
/// - Stack slots for parameters and variables, scoped per function
///
/// Storage scopes are independent of the scopes built while parsing; names
/// are bound here as their slots are created.
///
/// # Type Parameters
///
/// * `'a` - Lifetime of the LLVM context
pub struct Compiler<'a> {
    /// Stack slot of every parameter and variable lowered so far
    pub storage: SymbolTable<PointerValue<'a>>,
    /// The innermost open storage scope
    pub current_scope: ScopeId,

    /// Reference to the LLVM context
    pub context: &'a Context,
    /// The LLVM module being built
    pub module: Module<'a>,
    /// The LLVM IR builder
    pub builder: Builder<'a>,
}

impl<'a> Compiler<'a> {
    /// Creates a new Compiler instance.
    ///
    /// # Arguments
    ///
    /// * `context` - Reference to the LLVM context
    /// * `file_name` - Name of the file being compiled (used for module naming)
    ///
    /// # Returns
    ///
    /// A new Compiler instance with an empty module.
    pub fn new(context: &'a Context, file_name: &str) -> Self {
        let storage = SymbolTable::new();
        let current_scope = storage.root();

        Compiler {
            storage,
            current_scope,
            module: context.create_module(file_name),
            builder: context.create_builder(),
            context,
        }
    }

    /// Saves the current LLVM module to a file as textual IR.
    ///
    /// # Arguments
    ///
    /// * `output_file` - Path where the module file should be written
    pub fn save_module_to_file(&self, output_file: PathBuf) -> Result<(), Error> {
        self.module
            .print_to_file(&output_file)
            .map_err(|message| backend_error(message, &Position::null()))
    }

    /// The module as textual IR.
    pub fn print_ir(&self) -> String {
        self.module.print_to_string().to_string()
    }

    /// Lowers a whole program.
    ///
    /// Every signature is declared before any body is lowered, so a body can
    /// call a function that appears after it in the module.
    pub fn gen(&mut self, program: &Program) -> Result<(), Error> {
        for function in program.functions() {
            self.declare_function(function)?;
        }

        for node in program.nodes.iter() {
            gen_statement(self, node)?;
        }

        self.verify()
    }

    /// Runs the LLVM verifier over the whole module.
    pub fn verify(&self) -> Result<(), Error> {
        self.module
            .verify()
            .map_err(|message| backend_error(message, &Position::null()))
    }

    /// Converts a language type to an LLVM basic type.
    ///
    /// Maps the language's type system to LLVM's type system. String
    /// literals are byte pointers.
    ///
    /// # Arguments
    ///
    /// * `ty` - The type to convert
    /// * `position` - Where the type was needed, for error reporting
    ///
    /// # Returns
    ///
    /// The corresponding LLVM BasicTypeEnum, or `UnmappableType` for types
    /// with no value representation.
    pub fn convert_type(&self, ty: &Type, position: &Position) -> Result<BasicTypeEnum<'a>, Error> {
        match ty {
            Type::Int32 => Ok(self.context.i32_type().into()),
            Type::Int8 => Ok(self.context.i8_type().into()),
            Type::Int32Pointer => Ok(self
                .context
                .i32_type()
                .ptr_type(AddressSpace::default())
                .into()),
            Type::Int8Pointer | Type::StringLiteral => Ok(self
                .context
                .i8_type()
                .ptr_type(AddressSpace::default())
                .into()),
            Type::Unresolved | Type::Void | Type::Function(_) | Type::UserDefined(_) => {
                Err(Error::new(
                    ErrorImpl::UnmappableType { type_: ty.name() },
                    position.clone(),
                ))
            }
        }
    }

    /// Builds the LLVM signature of a function. `void` is only valid here.
    pub fn convert_function_type(
        &self,
        parameters: &[Type],
        return_type: &Type,
        position: &Position,
    ) -> Result<FunctionType<'a>, Error> {
        let params = parameters
            .iter()
            .map(|parameter| {
                self.convert_type(parameter, position)
                    .map(BasicMetadataTypeEnum::from)
            })
            .collect::<Result<Vec<BasicMetadataTypeEnum<'a>>, Error>>()?;

        match return_type {
            Type::Void => Ok(self.context.void_type().fn_type(&params, false)),
            other => Ok(self
                .convert_type(other, position)?
                .fn_type(&params, false)),
        }
    }

    /// Adds the function's prototype to the module, or returns the one
    /// already there.
    pub fn declare_function(&self, function: &FunctionDecl) -> Result<FunctionValue<'a>, Error> {
        if let Some(existing) = self.module.get_function(&function.name) {
            return Ok(existing);
        }

        let function_type = self.convert_function_type(
            &function.parameter_types(),
            &function.return_type,
            &function.span.start,
        )?;
        debug!("Declaring function {}", function.name);

        Ok(self.create_function_proto(&function.name, function_type))
    }

    /// Opens the entry block of a function being defined and positions the
    /// builder in it.
    pub fn create_function(&self, function: FunctionValue<'a>) {
        self.create_function_block(function);

        let attribute = self
            .context
            .create_enum_attribute(Attribute::get_named_enum_kind_id("nounwind"), 0);
        function.add_attribute(AttributeLoc::Function, attribute);
    }

    fn create_function_proto(&self, name: &str, function_type: FunctionType<'a>) -> FunctionValue<'a> {
        self.module
            .add_function(name, function_type, Some(Linkage::External))
    }

    fn create_function_block(&self, function: FunctionValue<'a>) {
        let entry = self.create_basic_block("entry", function);
        self.builder.position_at_end(entry);
    }

    fn create_basic_block(&self, name: &str, function: FunctionValue<'a>) -> BasicBlock<'a> {
        self.context.append_basic_block(function, name)
    }

    /// Opens a storage scope nested in the current one.
    pub fn push_scope(&mut self) -> ScopeId {
        self.current_scope = self.storage.create_scope(self.current_scope);
        self.current_scope
    }

    pub fn pop_scope(&mut self) {
        if let Some(parent) = self.storage.parent(self.current_scope) {
            self.current_scope = parent;
        }
    }

    /// Binds `name` to its stack slot in the current storage scope.
    pub fn bind_slot(
        &mut self,
        name: &str,
        slot: PointerValue<'a>,
        position: &Position,
    ) -> Result<(), Error> {
        if self.storage.add(self.current_scope, name, slot) {
            return Ok(());
        }

        Err(backend_error(
            format!("storage for {:?} bound twice in one scope", name),
            position,
        ))
    }

    /// The stack slot `name` resolves to through the storage scope chain.
    pub fn lookup_slot(&self, name: &str, position: &Position) -> Result<PointerValue<'a>, Error> {
        self.storage
            .get(self.current_scope, name)
            .map(|symbol| symbol.value)
            .ok_or_else(|| {
                Error::new(
                    ErrorImpl::UnboundVariable {
                        variable: name.to_string(),
                    },
                    position.clone(),
                )
            })
    }
}

/// Wraps a message from LLVM or the builder in an error at `position`.
pub fn backend_error(message: impl Display, position: &Position) -> Error {
    Error::new(
        ErrorImpl::BackendError {
            message: message.to_string(),
        },
        position.clone(),
    )
}

/// Lowers a checked program into a new module.
///
/// This is the primary entry point for lowering. It creates a compiler for
/// `file_name`, lowers every declaration and verifies the module.
///
/// # Arguments
///
/// * `program` - The parsed program, free of diagnostics
/// * `file_name` - Name of the file being compiled (for module naming)
/// * `context` - Reference to the LLVM context
///
/// # Returns
///
/// Returns the Compiler holding the finished module, or a `Lowering` error.
pub fn compile_program<'a>(
    program: &Program,
    file_name: &str,
    context: &'a Context,
) -> Result<Compiler<'a>, CompileError> {
    let mut compiler = Compiler::new(context, file_name);
    compiler.gen(program).map_err(CompileError::Lowering)?;

    Ok(compiler)
}
