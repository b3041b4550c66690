//! Writing a Serialize struct as a PAF policy file.
//!
//! Run with: cargo run --example typed_config

use policy_writer::{to_file, to_policy, to_string, PolicyFile};
use serde::Serialize;
use std::error::Error;

#[derive(Debug, Serialize)]
enum Mode {
    Fast,
    Careful { passes: u32 },
}

#[derive(Debug, Serialize)]
struct Stage {
    name: String,
    enabled: bool,
}

#[derive(Debug, Serialize)]
struct Pipeline {
    name: String,
    version: u32,
    threshold: f64,
    mode: Mode,
    fallback: Mode,
    defaults: PolicyFile,
    stages: Vec<Stage>,
    note: Option<String>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let pipeline = Pipeline {
        name: "isr".to_string(),
        version: 3,
        threshold: 5.0,
        mode: Mode::Careful { passes: 2 },
        fallback: Mode::Fast,
        defaults: PolicyFile::new("conf/isr_defaults.paf"),
        stages: vec![
            Stage {
                name: "bias".to_string(),
                enabled: true,
            },
            Stage {
                name: "flat".to_string(),
                enabled: false,
            },
        ],
        note: None,
    };

    let policy = to_policy(&pipeline)?;
    println!("PAF output:\n{}", to_string(&policy, true)?);

    let path = std::env::temp_dir().join("isr_pipeline.paf");
    to_file(&path, &policy)?;
    println!("Written to {}", path.display());

    Ok(())
}
