use anyhow::{bail, Context, Result};
use retroz80::RunOptions;

const USAGE: &str = "usage: retroz80 <image> [--org ADDR] [--stop ADDR]";

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let mut image_path = None;
    let mut options = RunOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--org" | "--origin" => {
                let value = args.next().context("--org needs an address")?;
                options.origin = retroz80::parse_address(&value)?;
            }
            "--stop" => {
                let value = args.next().context("--stop needs an address")?;
                options.stop = Some(retroz80::parse_address(&value)?);
            }
            "-h" | "--help" => {
                println!("{}", USAGE);
                return Ok(());
            }
            other if image_path.is_none() => image_path = Some(other.to_string()),
            other => bail!("unexpected argument '{}'\n{}", other, USAGE),
        }
    }

    let Some(image_path) = image_path else {
        eprintln!("{}", USAGE);
        std::process::exit(1);
    };

    log::info!("Running image: '{}'", image_path);
    let image = std::fs::read(&image_path)
        .with_context(|| format!("failed to read image '{}'", image_path))?;

    let (cpu, summary) = retroz80::run(&image, &options)?;
    println!(
        "stopped: {:?} after {} instructions",
        summary.stop, summary.instructions
    );
    println!("AF   BC   DE   HL   AF'  BC'  DE'  HL'  IX   IY   SP   PC");
    println!("{}", cpu.state_line());
    println!("flags: {}", cpu.flags().describe());
    Ok(())
}
