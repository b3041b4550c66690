//! Customizing PAF output with PafOptions.
//!
//! Run with: cargo run --example custom_options

use policy_writer::{policy, to_string_with_options, PafOptions, PafWriter, PolicyWriter};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let config = policy!({
        "name": "MyApp",
        "database": { "host": "localhost", "ports": [5432, 5433] }
    })?;

    // Default format (two-space indent)
    println!("Default:");
    println!("{}", to_string_with_options(&config, true, PafOptions::default())?);

    // Wider indentation
    println!("Four-space indent:");
    let wide = PafOptions::new().with_indent(4);
    println!("{}", to_string_with_options(&config, true, wide)?);

    // No indentation at all
    println!("Compact:");
    println!("{}", to_string_with_options(&config, false, PafOptions::compact())?);

    // Dotted names are refused unless hierarchical names are enabled
    println!("Hierarchical names:");
    let mut flat = PafWriter::new(Vec::new());
    if let Err(e) = flat.write_int("database.timeout", 30) {
        println!("  default writer: {}", e);
    }

    let options = PafOptions::new().with_hierarchical_names(true);
    let mut dotted = PafWriter::with_options(Vec::new(), options);
    dotted.write_int("database.timeout", 30)?;
    let out = dotted.into_inner().unwrap_or_default();
    println!("  hierarchical writer:\n{}", String::from_utf8(out)?);

    Ok(())
}
