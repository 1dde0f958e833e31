//! Convert a Wokwi diagram to SHDF and print the result with any warnings.

use shdfkit::prelude::*;
use std::path::Path;

fn main() -> Result<(), ShdfKitError> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "tests/fixtures/blink_diagram.json".to_string());
    let path = Path::new(&path);

    if !path.exists() {
        eprintln!("File not found: {}", path.display());
        eprintln!("Usage: cargo run --example convert_diagram [path/to/diagram.json] [logical|physical]");
        std::process::exit(1);
    }

    let mode = match std::env::args().nth(2) {
        Some(mode) => mode.parse::<Mode>().unwrap_or_else(|e| {
            eprintln!("{}", e);
            std::process::exit(2);
        }),
        None => Mode::Physical,
    };

    let options = ConvertOptions { mode, ..Default::default() };
    let core = ShdfKitCore::new();
    let conversion = core.convert_file_to_neutral(path, &options)?;

    println!("{}", conversion.document.to_json_pretty()?);

    if !conversion.issues.is_empty() {
        eprintln!("\n{} issue(s):", conversion.issues.len());
        for issue in &conversion.issues {
            eprintln!("  {:?} {}", issue.severity, issue);
        }
    }

    // Round trip back to Wokwi to show the generated layout
    let diagram = shdfkit::to_simulator(core.catalog(), &conversion.document, &options)?;
    eprintln!(
        "\nRound trip: {} parts, {} wires",
        diagram.document.parts.len(),
        diagram.document.connections.len()
    );
    Ok(())
}
