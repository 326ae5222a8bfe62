use std::collections::HashMap;
use std::vec::Vec;

use chevron_hal::I2cBus;

/// Bus failure injected by [`FakeBus`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Nack;

/// Register-mapped I2C devices held in memory
///
/// A write sets the register pointer (first byte) and stores any further
/// bytes from there on; reads continue from the pointer.
#[derive(Debug, Default)]
pub struct FakeBus {
    registers: HashMap<(u8, u8), u8>,
    pointers: HashMap<u8, u8>,
    present: Vec<u8>,
    pub transfers: usize,
}

impl FakeBus {
    pub fn with_device(mut self, address: u8, start: u8, bytes: &[u8]) -> Self {
        self.present.push(address);
        for (i, &b) in bytes.iter().enumerate() {
            self.registers.insert((address, start + i as u8), b);
        }
        self
    }

    pub fn register(&self, address: u8, reg: u8) -> u8 {
        self.registers.get(&(address, reg)).copied().unwrap_or(0)
    }

    fn check(&mut self, address: u8) -> Result<(), Nack> {
        self.transfers += 1;
        if self.present.contains(&address) {
            Ok(())
        } else {
            Err(Nack)
        }
    }
}

impl I2cBus for FakeBus {
    type Error = Nack;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Nack> {
        self.check(address)?;
        if let Some((&reg, rest)) = data.split_first() {
            for (i, &b) in rest.iter().enumerate() {
                self.registers.insert((address, reg + i as u8), b);
            }
            self.pointers.insert(address, reg);
        }
        Ok(())
    }

    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Nack> {
        self.check(address)?;
        let start = self.pointers.get(&address).copied().unwrap_or(0);
        for (i, b) in buf.iter_mut().enumerate() {
            *b = self.register(address, start + i as u8);
        }
        Ok(())
    }

    fn write_read(&mut self, address: u8, write_data: &[u8], read_buf: &mut [u8]) -> Result<(), Nack> {
        self.write(address, write_data)?;
        self.transfers -= 1;
        self.read(address, read_buf)
    }
}
