use crate::MemoryError;

pub const ALLOCATION_ALIGNMENT: u64 = 8;

/// Bounded bump arena over an owned byte buffer. Offset 0 is never handed out so it can serve as null.
pub struct Heap {
    bytes: Vec<u8>,
    capacity: u64,
}

impl Heap {
    pub fn new(capacity: u64) -> Self {
        Self { bytes: vec![0; ALLOCATION_ALIGNMENT as usize], capacity }
    }

    pub fn used(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    /// Returns the start of a zeroed region of at least `size` bytes. Never reused.
    pub fn allocate(&mut self, size: u64) -> Result<u64, MemoryError> {
        let start = self.used();
        let aligned_size = size.max(1).div_ceil(ALLOCATION_ALIGNMENT) * ALLOCATION_ALIGNMENT;
        let end = start.checked_add(aligned_size).filter(|end| *end <= self.capacity).ok_or(MemoryError::OutOfMemory {
            requested: size,
            available: self.capacity.saturating_sub(start),
        })?;
        self.bytes.resize(end as usize, 0);
        Ok(start)
    }

    fn range(&self, address: u64, size: usize) -> Result<std::ops::Range<usize>, MemoryError> {
        let out_of_bounds = MemoryError::OutOfBounds { address, size };
        if address < ALLOCATION_ALIGNMENT {
            return Err(out_of_bounds);
        }
        let start = usize::try_from(address).map_err(|_| out_of_bounds.clone())?;
        let end = start.checked_add(size).ok_or_else(|| out_of_bounds.clone())?;
        if end > self.bytes.len() {
            return Err(out_of_bounds);
        }
        Ok(start..end)
    }

    pub fn read<const N: usize>(&self, address: u64) -> Result<[u8; N], MemoryError> {
        let range = self.range(address, N)?;
        let mut res = [0u8; N];
        res.copy_from_slice(&self.bytes[range]);
        Ok(res)
    }

    pub fn write<const N: usize>(&mut self, address: u64, bytes: [u8; N]) -> Result<(), MemoryError> {
        let range = self.range(address, N)?;
        self.bytes[range].copy_from_slice(&bytes);
        Ok(())
    }
}
