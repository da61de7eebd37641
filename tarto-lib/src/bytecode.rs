//! Linearizes a [`Module`] into the binary IR that the VM loads, and renders
//! byte buffers as hex for inspection.
//!
//! All multi byte fields are big-endian:
//!
//! ```text
//! u32 magic (FF FF FF FF)
//! u8  class count
//!     per class: u8 instance field count, u16 constant count, constants
//! u16 constant count
//!     constants
//! u16 instruction count
//!     instruction bytes
//! ```

use tracing::debug;

use std::fmt;

use crate::core::*;

pub const MAGIC: u32 = 0xFFFF_FFFF;

/// Accumulates the output. Every count goes through [`IrWriter::count_u8`] or
/// [`IrWriter::count_u16`], which refuse values that don't fit instead of truncating.
#[derive(Debug, Default)]
struct IrWriter {
    out: Vec<u8>,
}

impl IrWriter {
    fn u8(&mut self, x: u8) {
        self.out.push(x);
    }

    fn u16(&mut self, x: u16) {
        self.out.extend_from_slice(&x.to_be_bytes());
    }

    fn u32(&mut self, x: u32) {
        self.out.extend_from_slice(&x.to_be_bytes());
    }

    fn count_u8(&mut self, what: &'static str, count: usize) -> Result<(), IrError> {
        let x = u8::try_from(count).map_err(|_| IrError::Overflow {
            what,
            count,
            max: u8::MAX as usize,
        })?;
        self.u8(x);
        Ok(())
    }

    fn count_u16(&mut self, what: &'static str, count: usize) -> Result<(), IrError> {
        let x = u16::try_from(count).map_err(|_| IrError::Overflow {
            what,
            count,
            max: u16::MAX as usize,
        })?;
        self.u16(x);
        Ok(())
    }

    fn constant_pool(&mut self, pool: &[Constant]) -> Result<(), IrError> {
        self.count_u16("constants", pool.len())?;
        for constant in pool {
            self.constant(constant)?;
        }
        Ok(())
    }

    fn constant(&mut self, constant: &Constant) -> Result<(), IrError> {
        self.u8(constant.tag() as u8);
        match constant {
            Constant::Integer(x) => {
                self.count_u16("constant bytes", constant.payload_size())?;
                self.u16(*x);
            }
            Constant::Bool(x) => {
                self.count_u16("constant bytes", constant.payload_size())?;
                self.u16(*x as u16);
            }
            Constant::Function(f) => {
                self.u8(f.id.0);
                self.count_u16("function bytes", constant.payload_size())?;
                self.out.extend_from_slice(&f.instructions);
            }
            Constant::Range { from, to } => {
                self.count_u16("constant bytes", constant.payload_size())?;
                self.u16(*from);
                self.u16(*to);
            }
        }
        Ok(())
    }
}

/// produces the binary IR for the given pools and program text
pub fn serialize(
    classes: &[ClassEntry],
    constants: &[Constant],
    text: &[u8],
) -> Result<Vec<u8>, IrError> {
    let mut w = IrWriter::default();
    w.u32(MAGIC);

    w.count_u8("classes", classes.len())?;
    for class in classes {
        w.u8(class.instance_field_count);
        w.constant_pool(&class.constants)?;
    }

    w.constant_pool(constants)?;

    w.count_u16("instructions", text.len())?;
    w.out.extend_from_slice(text);

    debug!(
        classes = classes.len(),
        constants = constants.len(),
        bytes = w.out.len(),
        "serialized module"
    );
    Ok(w.out)
}

impl Module {
    pub fn to_bytes(&self) -> Result<Vec<u8>, IrError> {
        serialize(&self.classes, &self.constants, &self.text)
    }
}

/// Displays a byte buffer as uppercase hex, 16 bytes per line, each line labeled with
/// the offset of its first byte. There is a gap between the 8th and the 9th byte of a
/// line, and no newline after the last one.
#[derive(Debug, Clone, Copy)]
pub struct HexDump<'a>(pub &'a [u8]);

impl<'a> fmt::Display for HexDump<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (line, chunk) in self.0.chunks(16).enumerate() {
            if line != 0 {
                writeln!(f)?;
            }
            write!(f, "{:02X}: ", line * 16)?;
            for (i, byte) in chunk.iter().enumerate() {
                if i == 8 {
                    write!(f, " ")?;
                }
                write!(f, "{:02X}", byte)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants_only() {
        let bytes =
            serialize(&[], &[Constant::Integer(7), Constant::Bool(true)], &[]).unwrap();
        assert_eq!(
            bytes,
            vec![
                0xFF, 0xFF, 0xFF, 0xFF, 0x00, 0x00, 0x02, 0x00, 0x00, 0x02, 0x00, 0x07, 0x02,
                0x00, 0x02, 0x00, 0x01, 0x00, 0x00
            ]
        );
    }

    #[test]
    fn test_empty_module() {
        assert_eq!(
            Module::default().to_bytes().unwrap(),
            vec![0xFF, 0xFF, 0xFF, 0xFF, 0x00, 0x00, 0x00, 0x00, 0x00]
        );
    }

    #[test]
    fn test_classes_functions_and_ranges() {
        let mut b = ByteCodeBuilder::new();
        let class = b.push_class(2);
        b.push_method(class, "get", vec![0xAA, 0xBB]).unwrap();
        b.push_constant(Constant::Range { from: 1, to: 300 });
        b.push_function("main", vec![0x01]).unwrap();
        b.emit_all(&[0x10, 0x20, 0x30]);

        let bytes = b.build().to_bytes().unwrap();
        #[rustfmt::skip]
        let expected = vec![
            0xFF, 0xFF, 0xFF, 0xFF,
            // class pool
            0x01,
            0x02, 0x00, 0x01,
            0x01, 0x00, 0x00, 0x02, 0xAA, 0xBB,
            // constant pool
            0x00, 0x02,
            0x03, 0x00, 0x04, 0x00, 0x01, 0x01, 0x2C,
            0x01, 0x01, 0x00, 0x01, 0x01,
            // text
            0x00, 0x03, 0x10, 0x20, 0x30,
        ];
        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_overflow_is_an_error() {
        let text = vec![0u8; u16::MAX as usize + 1];
        assert_eq!(
            serialize(&[], &[], &text),
            Err(IrError::Overflow {
                what: "instructions",
                count: 65536,
                max: 65535
            })
        );

        let classes = vec![ClassEntry::default(); 256];
        assert!(matches!(
            serialize(&classes, &[], &[]),
            Err(IrError::Overflow { what: "classes", .. })
        ));
    }

    #[test]
    fn test_hexdump() {
        let bytes =
            serialize(&[], &[Constant::Integer(7), Constant::Bool(true)], &[]).unwrap();
        assert_eq!(
            HexDump(&bytes).to_string(),
            "00: FFFFFFFF00000200 0002000702000200\n10: 010000"
        );
    }

    #[test]
    fn test_hexdump_line_count() {
        assert_eq!(HexDump(&[]).to_string(), "");
        assert_eq!(HexDump(&[0xab; 8]).to_string(), "00: ABABABABABABABAB");
        for n in [1usize, 16, 17, 32, 100] {
            let dump = HexDump(&vec![0; n]).to_string();
            assert_eq!(dump.lines().count(), (n + 15) / 16);
            assert!(!dump.ends_with('\n'));
        }
        let dump = HexDump(&[0x0f; 33]).to_string();
        assert_eq!(dump.lines().nth(2), Some("20: 0F"));
    }
}
