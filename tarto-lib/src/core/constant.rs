//! Constant pool and class pool entries, as filled by the compiler pass

use serde::{Deserialize, Serialize};

use std::fmt;

/// A stable key for a function name, handed out when the name is first defined.
/// Methods with the same name share their id, so the VM can dispatch on it
/// without knowing the receiver's class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FunctionId(pub u8);

/// compiled function body, stored as a constant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Function {
    pub id: FunctionId,
    pub instructions: Vec<u8>,
}

/// an entry of a constant pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Constant {
    Integer(u16),
    Bool(bool),
    Function(Function),
    Range { from: u16, to: u16 },
}

/// The tag byte in front of each serialized constant. The values are part of the IR format.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstantTag {
    Integer = 0,
    Function = 1,
    Bool = 2,
    Range = 3,
}

impl Constant {
    pub fn tag(&self) -> ConstantTag {
        match self {
            Constant::Integer(_) => ConstantTag::Integer,
            Constant::Bool(_) => ConstantTag::Bool,
            Constant::Function(_) => ConstantTag::Function,
            Constant::Range { .. } => ConstantTag::Range,
        }
    }

    /// Number of payload bytes that follow the size field. For functions
    /// that's the instruction count, everything else has a fixed width.
    pub fn payload_size(&self) -> usize {
        match self {
            Constant::Integer(_) | Constant::Bool(_) => 2,
            Constant::Range { .. } => 4,
            Constant::Function(f) => f.instructions.len(),
        }
    }
}

impl From<u16> for Constant {
    fn from(x: u16) -> Self {
        Constant::Integer(x)
    }
}

impl From<bool> for Constant {
    fn from(x: bool) -> Self {
        Constant::Bool(x)
    }
}

impl From<Function> for Constant {
    fn from(f: Function) -> Self {
        Constant::Function(f)
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constant::Integer(x) => write!(f, "int {}", x),
            Constant::Bool(x) => write!(f, "bool {}", x),
            Constant::Function(func) => {
                write!(f, "fn #{} ({} bytes)", func.id.0, func.instructions.len())
            }
            Constant::Range { from, to } => write!(f, "range {}..{}", from, to),
        }
    }
}

/// Describes the layout of a user defined class: how many fields an instance has,
/// and the constants (methods, mostly) that belong to it
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClassEntry {
    pub instance_field_count: u8,
    pub constants: Vec<Constant>,
}

impl ClassEntry {
    pub fn new(instance_field_count: u8) -> Self {
        ClassEntry {
            instance_field_count,
            constants: vec![],
        }
    }
}
