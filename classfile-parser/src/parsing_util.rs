use std::io::Read;

use rust_jvm_common::loading::ClassfileReadError;

pub trait ParsingContext {
    fn read8(&mut self) -> Result<u8, ClassfileReadError>;
    fn read16(&mut self) -> Result<u16, ClassfileReadError>;
    fn read32(&mut self) -> Result<u32, ClassfileReadError>;
    fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>, ClassfileReadError>;
}

pub(crate) struct ReadParsingContext<'l> {
    pub(crate) read: &'l mut dyn Read,
}

fn map_eof(err: std::io::Error) -> ClassfileReadError {
    if err.kind() == std::io::ErrorKind::UnexpectedEof {
        ClassfileReadError::Truncated
    } else {
        ClassfileReadError::Io(err)
    }
}

impl ReadParsingContext<'_> {
    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], ClassfileReadError> {
        let mut buffer = [0; N];
        self.read.read_exact(&mut buffer).map_err(map_eof)?;
        Ok(buffer)
    }
}

impl ParsingContext for ReadParsingContext<'_> {
    fn read8(&mut self) -> Result<u8, ClassfileReadError> {
        Ok(u8::from_be_bytes(self.read_array()?))
    }

    fn read16(&mut self) -> Result<u16, ClassfileReadError> {
        Ok(u16::from_be_bytes(self.read_array()?))
    }

    fn read32(&mut self) -> Result<u32, ClassfileReadError> {
        Ok(u32::from_be_bytes(self.read_array()?))
    }

    fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>, ClassfileReadError> {
        let mut buffer = vec![0; len];
        self.read.read_exact(buffer.as_mut_slice()).map_err(map_eof)?;
        Ok(buffer)
    }
}
