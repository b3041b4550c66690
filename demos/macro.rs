//! Using the policy! macro for literal policy trees.
//!
//! Run with: cargo run --example macro

use policy_writer::{policy, to_string, PolicyFile};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let scalars = policy!({
        "enabled": true,
        "retries": 3,
        "threshold": 5.0,
        "label": "calibration"
    })?;

    println!("Scalars:\n{}", to_string(&scalars, false)?);

    let arrays = policy!({
        "ids": [1, 2, 3],
        "filters": ["g", "r", "i", "z"],
        "includes": [(PolicyFile::new("a.paf")), (PolicyFile::new("b.paf"))]
    })?;

    println!("Arrays:\n{}", to_string(&arrays, false)?);

    let pipeline = policy!({
        "name": "isr",
        "offset": (-12),
        "bias": { "enabled": true, "level": 1000 },
        "stages": [
            { "name": "overscan", "order": 1 },
            { "name": "flat", "order": 2 }
        ],
        "output.dir": "/tmp/isr"
    })?;

    println!("Nested:\n{}", pipeline);

    // Mixed arrays have no single element kind
    match policy!({ "bad": [1, "two"] }) {
        Ok(_) => println!("unexpected success"),
        Err(e) => println!("Rejected: {}", e),
    }

    Ok(())
}
