use std::collections::HashMap;
use std::vec::Vec;

use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};

/// Records writes and answers register reads with 16 bit big endian values.
#[derive(Debug, Default)]
pub struct MockI2c {
    pub writes: Vec<(u8, Vec<u8>)>,
    pub registers: HashMap<u8, u16>,
    pub fail: bool,
    pointer: u8,
}

impl ErrorType for MockI2c {
    type Error = ErrorKind;
}

impl I2c for MockI2c {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        if self.fail {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }
        for operation in operations {
            match operation {
                Operation::Write(bytes) => {
                    if let Some(register) = bytes.first() {
                        self.pointer = *register;
                    }
                    self.writes.push((address, bytes.to_vec()));
                }
                Operation::Read(buf) => {
                    let value = self.registers.get(&self.pointer).copied().unwrap_or(0);
                    let bytes = value.to_be_bytes();
                    for (i, b) in buf.iter_mut().enumerate() {
                        *b = bytes.get(i).copied().unwrap_or(0);
                    }
                }
            }
        }
        Ok(())
    }
}
