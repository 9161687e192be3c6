use anyhow::{bail, Context, Result};
use retroz80_core::{Cpu, CpuConfig, RunSummary};
use typed_builder::TypedBuilder;

/// How a program image is placed and run.
#[derive(Clone, Debug, PartialEq, Eq, TypedBuilder)]
pub struct RunOptions {
    /// Load address of the image; execution starts here too.
    #[builder(default = 0)]
    pub origin: u16,
    /// Stop once PC reaches this address.
    #[builder(default, setter(strip_option))]
    pub stop: Option<u16>,
    #[builder(default = retroz80_core::MEMORY_SIZE)]
    pub memory_size: usize,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Parses an address written in decimal or as `0x`-prefixed hex.
pub fn parse_address(text: &str) -> Result<u16> {
    let parsed = match text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
    {
        Some(digits) => u16::from_str_radix(digits, 16),
        None => text.parse(),
    };
    parsed.with_context(|| format!("invalid address '{}'", text))
}

/// Loads `image` at the configured origin and runs it to completion.
pub fn run(image: &[u8], options: &RunOptions) -> Result<(Cpu, RunSummary)> {
    let config = CpuConfig::builder()
        .memory_size(options.memory_size)
        .build();
    let mut cpu = Cpu::with_config(config)?;

    let origin = usize::from(options.origin);
    if origin + image.len() > cpu.memory.len() {
        bail!(
            "image of {} bytes does not fit at {:#06x}",
            image.len(),
            options.origin
        );
    }
    cpu.memory.load_at(origin, image)?;
    cpu.set_pc(options.origin);

    log::info!(
        "loaded {} bytes at {:#06x}",
        image.len(),
        options.origin
    );
    let summary = cpu
        .run(options.stop)
        .with_context(|| format!("execution failed at {:#06x}", cpu.pc()))?;
    Ok((cpu, summary))
}
