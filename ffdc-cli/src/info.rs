use anyhow::{Context, Result};
use sbe_format::parse_response_with_ffdc;
use std::path::Path;

pub fn run_info(input: &Path) -> Result<()> {
    let buf = std::fs::read(input).with_context(|| format!("reading {}", input.display()))?;
    let (frame, map) = parse_response_with_ffdc(&buf)
        .with_context(|| format!("parsing response {}", input.display()))?;

    println!("File:        {}", input.display());
    println!("Size:        {} bytes", buf.len());
    println!(
        "Status:      {:?} / {:?}{}",
        frame.primary_status,
        frame.secondary_status,
        if frame.is_success() { "" } else { " (failed)" }
    );
    println!("Value:       {} bytes", frame.value.len());
    println!("Header:      offset {}", frame.header_offset);
    println!(
        "FFDC:        {} packages, {} SLIDs",
        map.package_count(),
        map.len()
    );

    for (log_id, packages) in map.iter() {
        println!("  SLID 0x{log_id:04x}: {} packages", packages.len());
        for p in packages {
            println!(
                "    seq {} cmd {:02X}{:02X} rc 0x{:08X} sev {} chip {} data {} bytes",
                p.sequence_id,
                p.command_class,
                p.command,
                p.return_code,
                p.severity,
                p.chip_id,
                p.data.len()
            );
        }
    }

    Ok(())
}
