//! Building a policy by hand and writing it as PAF.
//!
//! Run with: cargo run --example simple

use policy_writer::{to_string, PafWriter, Policy, PolicyFile, PolicyWriter};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let mut policy = Policy::new();
    policy.set("camera", "lsstcam")?;
    policy.set("binning", 2)?;
    policy.set("gains", vec![1.5, 1.75, 2.0])?;
    policy.set("defaults", PolicyFile::new("conf/defaults.paf"))?;

    // Hierarchical names create the intermediate policies
    policy.set("isr.doBias", true)?;
    policy.set("isr.doFlat", false)?;

    // Appending promotes a single value to an array
    policy.add("filters", "g")?;
    policy.add("filters", vec!["r", "i"])?;

    println!("PAF output:\n{}", to_string(&policy, true)?);

    // Writing to stdout directly
    let stdout = std::io::stdout();
    let mut writer = PafWriter::new(stdout.lock());
    writer.write(&policy, false)?;

    Ok(())
}
