use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use std::collections::HashMap;

use crate::core::*;

/// represents the IR while it's being built
///
/// The compiler pass decides which opcodes to emit, this only collects them together with
/// the constant and class pools, and hands out function ids.
#[derive(Debug, Clone, Default)]
pub struct ByteCodeBuilder {
    /// Basically the program
    pub text: Vec<u8>,
    /// top level constant pool
    pub constants: Vec<Constant>,
    /// one entry per class definition
    pub classes: Vec<ClassEntry>,
    /// function name to id, shared by free functions and methods
    function_ids: HashMap<String, FunctionId>,
}

/// The finished artifact: what [`crate::bytecode::serialize`] linearizes
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Module {
    pub classes: Vec<ClassEntry>,
    pub constants: Vec<Constant>,
    pub text: Vec<u8>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IrError {
    #[error("Too many {what}: {count} don't fit, the format allows at most {max}")]
    Overflow {
        what: &'static str,
        count: usize,
        max: usize,
    },

    #[error("There is no class with index {0}")]
    UnknownClass(usize),
}

impl ByteCodeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// appends a single instruction byte
    pub fn emit(&mut self, op: u8) {
        self.text.push(op);
    }

    pub fn emit_all(&mut self, bytes: &[u8]) {
        self.text.extend_from_slice(bytes);
    }

    /// adds a constant to the top level pool and returns its index
    pub fn push_constant(&mut self, constant: impl Into<Constant>) -> usize {
        self.constants.push(constant.into());
        self.constants.len() - 1
    }

    /// returns the id for a function name, handing out the next free one if the name
    /// is new
    pub fn function_id(&mut self, name: &str) -> Result<FunctionId, IrError> {
        if let Some(id) = self.function_ids.get(name) {
            return Ok(*id);
        }
        let next = self.function_ids.len();
        let id = u8::try_from(next).map_err(|_| IrError::Overflow {
            what: "function names",
            count: next + 1,
            max: u8::MAX as usize + 1,
        })?;
        let id = FunctionId(id);
        debug!(name, id = id.0, "new function id");
        self.function_ids.insert(name.to_owned(), id);
        Ok(id)
    }

    /// adds a compiled free function to the top level pool, returns the constant index
    pub fn push_function(&mut self, name: &str, instructions: Vec<u8>) -> Result<usize, IrError> {
        let id = self.function_id(name)?;
        Ok(self.push_constant(Function { id, instructions }))
    }

    /// starts a new class and returns its index in the class pool
    pub fn push_class(&mut self, instance_field_count: u8) -> usize {
        self.classes.push(ClassEntry::new(instance_field_count));
        self.classes.len() - 1
    }

    /// adds a constant to a class's pool and returns its index there
    pub fn push_class_constant(
        &mut self,
        class: usize,
        constant: impl Into<Constant>,
    ) -> Result<usize, IrError> {
        let entry = self
            .classes
            .get_mut(class)
            .ok_or(IrError::UnknownClass(class))?;
        entry.constants.push(constant.into());
        Ok(entry.constants.len() - 1)
    }

    /// adds a compiled method to a class
    pub fn push_method(
        &mut self,
        class: usize,
        name: &str,
        instructions: Vec<u8>,
    ) -> Result<usize, IrError> {
        if class >= self.classes.len() {
            return Err(IrError::UnknownClass(class));
        }
        let id = self.function_id(name)?;
        self.push_class_constant(class, Function { id, instructions })
    }

    pub fn build(self) -> Module {
        Module {
            classes: self.classes,
            constants: self.constants,
            text: self.text,
        }
    }
}
