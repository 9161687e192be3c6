use crate::component::{Component, PotentialFlags};
use crate::cpu::flags::Outcome;
use crate::cpu::{Cpu, Location};
use crate::error::Result;

impl Cpu {
    /// `in r,(c)` and `in a,(*)`. The bare `in (c)` form reads the port
    /// for its flags only.
    pub(super) fn input(&mut self, target: &Location, source: &Location) -> Result<Outcome> {
        let value = match source {
            Location::None => self.read_location(target)?,
            _ => {
                let value = self.read_location(source)?;
                self.write_location(target, value)?;
                value
            }
        } as u8;

        let mut flags = PotentialFlags {
            half_carry: Some(false),
            add_subtract: Some(false),
            ..PotentialFlags::default()
        };
        Component::with_contents("in", value).set_potential_flags(&mut flags);
        Ok(Outcome::leaking(flags, value))
    }

    pub(super) fn output(&mut self, port: &Location, source: &Location) -> Result<Outcome> {
        let value = self.read_location(source)?;
        self.write_location(port, value)?;
        Ok(Outcome::default())
    }
}
