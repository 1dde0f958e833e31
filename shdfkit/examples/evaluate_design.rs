//! Evaluate a generated SHDF design, optionally against a reference.

use shdfkit::prelude::*;
use std::path::Path;

fn main() -> Result<(), ShdfKitError> {
    let mut args = std::env::args().skip(1);
    let generated = args
        .next()
        .unwrap_or_else(|| "tests/fixtures/blink_breadboard.json".to_string());
    let reference = args.next();

    let core = ShdfKitCore::new();
    let report = core.validate_file(Path::new(&generated))?;
    if !report.is_valid {
        println!("Document is invalid:");
        for error in &report.errors {
            println!("  - {}", error);
        }
        std::process::exit(1);
    }

    let options = EvaluationOptions::new(Mode::Physical);
    let evaluation = core.evaluate_files(
        Path::new(&generated),
        reference.as_deref().map(Path::new),
        &options,
    )?;

    println!("{}", serde_json::to_string_pretty(&evaluation)?);
    println!("\nDefects found: {}", evaluation.defect_count());
    Ok(())
}
