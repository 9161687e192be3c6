use crate::component::Component;
use crate::error::{Error, Result};

/// Flat, byte-addressable storage. The CPU uses one instance for main
/// memory and a second, smaller one for the I/O port space.
#[derive(Clone, Debug)]
pub struct Memory {
    cells: Vec<Component>,
}

impl Memory {
    pub fn new(size: usize) -> Self {
        Self {
            cells: vec![Component::default(); size],
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    fn check(&self, address: usize) -> Result<()> {
        if address < self.cells.len() {
            Ok(())
        } else {
            Err(Error::AddressOutOfRange {
                address,
                size: self.cells.len(),
            })
        }
    }

    pub fn get_contents(&self, address: usize) -> Result<&Component> {
        self.check(address)?;
        Ok(&self.cells[address])
    }

    pub fn get_contents_mut(&mut self, address: usize) -> Result<&mut Component> {
        self.check(address)?;
        Ok(&mut self.cells[address])
    }

    pub fn get_contents_value(&self, address: usize) -> Result<u8> {
        self.get_contents(address).map(Component::get_contents)
    }

    pub fn set_contents_value(&mut self, address: usize, value: u8) -> Result<()> {
        self.get_contents_mut(address)?.set_contents(value);
        Ok(())
    }

    /// Snapshot of every cell.
    pub fn dump(&self) -> Vec<u8> {
        self.cells.iter().map(Component::get_contents).collect()
    }

    /// Overwrites the cells from address 0 onwards.
    pub fn load(&mut self, data: &[u8]) -> Result<()> {
        self.load_at(0, data)
    }

    /// Overwrites `data.len()` cells starting at `address`.
    pub fn load_at(&mut self, address: usize, data: &[u8]) -> Result<()> {
        if data.is_empty() {
            return Ok(());
        }
        self.check(address + data.len() - 1)?;
        for (cell, &value) in self.cells[address..].iter_mut().zip(data) {
            cell.set_contents(value);
        }
        Ok(())
    }
}
