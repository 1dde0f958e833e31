//! shdfkit CLI - Wokwi <-> SHDF conversion, validation and evaluation from the command line.

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use shdfkit::{
    Catalog, Conversion, ConvertOptions, Evaluation, EvaluationOptions, Issue, Mode, Severity,
    ShdfKitCore, ShdfKitError, ValidationReport,
};
use std::path::{Path, PathBuf};
use std::process;

/// Exit code for I/O, JSON and conversion errors. 1 is reserved for
/// "ran fine, but the document failed".
const EXIT_ERROR: i32 = 2;

#[derive(Parser)]
#[command(name = "shdfkit")]
#[command(about = "Wokwi <-> SHDF circuit diagram conversion and validation", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// External component catalog (module_info.json format)
    #[arg(long, value_name = "FILE", global = true)]
    catalog: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a Wokwi diagram.json to SHDF
    ToShdf {
        #[command(flatten)]
        conversion: ConversionArgs,
    },

    /// Convert an SHDF document to a Wokwi diagram.json
    ToWokwi {
        #[command(flatten)]
        conversion: ConversionArgs,
    },

    /// Validate an SHDF document
    Validate {
        /// Path to the SHDF JSON file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,
    },

    /// Score an SHDF document, optionally against a reference design
    Evaluate {
        /// Path to the generated SHDF JSON file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Reference SHDF JSON file
        #[arg(short, long, value_name = "FILE")]
        reference: Option<PathBuf>,

        /// Circuit view to evaluate
        #[arg(short, long, value_enum, default_value = "logical")]
        mode: ModeArg,

        /// Benchmark scenario name; `traffic_light` enables LED colour checks
        #[arg(long)]
        scenario: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,

        /// Exit with error code if any defect is found
        #[arg(long)]
        fail_on_defects: bool,
    },

    /// List component types known to the catalog
    Catalog {
        /// Also list every pin
        #[arg(long)]
        pins: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,
    },
}

#[derive(clap::Args)]
struct ConversionArgs {
    /// Input JSON file
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Write the converted document here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Circuit view to convert
    #[arg(short, long, value_enum, default_value = "logical")]
    mode: ModeArg,

    /// Keep components of unknown type under a synthesized type name
    #[arg(long)]
    keep_unknown: bool,

    /// Exit with error code if the conversion reported warnings
    #[arg(long)]
    strict: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "human")]
    format: OutputFormat,
}

impl ConversionArgs {
    fn options(&self) -> ConvertOptions {
        ConvertOptions {
            mode: self.mode.into(),
            synthesize_unknown_types: self.keep_unknown,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output for scripts and CI
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    /// Component-to-component wiring only
    Logical,
    /// Breadboard placement and routing
    Physical,
}

impl From<ModeArg> for Mode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Logical => Mode::Logical,
            ModeArg::Physical => Mode::Physical,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(log_level)
        .with_target(false)
        .init();

    let external;
    let catalog = match &cli.catalog {
        Some(path) => {
            external = Catalog::load_or_empty(path);
            &external
        }
        None => Catalog::shared(),
    };
    tracing::debug!("Using catalog with {} component types", catalog.len());
    let core = ShdfKitCore::with_catalog(catalog);

    let exit_code = match cli.command {
        Commands::ToShdf { conversion } => {
            let result = core.convert_file_to_neutral(&conversion.file, &conversion.options());
            handle_conversion(result, &conversion)
        }
        Commands::ToWokwi { conversion } => {
            let result = core.convert_file_to_simulator(&conversion.file, &conversion.options());
            handle_conversion(result, &conversion)
        }
        Commands::Validate { file, format } => handle_validate(&core, &file, format),
        Commands::Evaluate {
            file,
            reference,
            mode,
            scenario,
            format,
            fail_on_defects,
        } => {
            let options = EvaluationOptions {
                mode: mode.into(),
                scenario,
            };
            handle_evaluate(&core, &file, reference.as_deref(), &options, format, fail_on_defects)
        }
        Commands::Catalog { pins, format } => {
            handle_catalog(catalog, pins, format);
            0
        }
    };

    process::exit(exit_code);
}

fn print_json<T: Serialize>(value: &T) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(text) => {
            println!("{}", text);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            EXIT_ERROR
        }
    }
}

fn severity_label(issue: &Issue) -> &'static str {
    match issue.severity {
        Severity::Error => "error",
        Severity::Warning => "warning",
        Severity::Info => "note",
    }
}

fn handle_conversion<T: Serialize>(
    result: Result<Conversion<T>, ShdfKitError>,
    args: &ConversionArgs,
) -> i32 {
    let conversion = match result {
        Ok(conversion) => conversion,
        Err(e) => {
            eprintln!("Error: {}", e);
            return EXIT_ERROR;
        }
    };

    if let Some(path) = &args.output {
        let written = serde_json::to_string_pretty(&conversion.document)
            .map_err(ShdfKitError::from)
            .and_then(|text| std::fs::write(path, text + "\n").map_err(ShdfKitError::from));
        if let Err(e) = written {
            eprintln!("Error: cannot write {}: {}", path.display(), e);
            return EXIT_ERROR;
        }
    }

    match args.format {
        OutputFormat::Human => {
            if args.output.is_none() {
                let code = print_json(&conversion.document);
                if code != 0 {
                    return code;
                }
            }
            for issue in &conversion.issues {
                eprintln!("{}: {}", severity_label(issue), issue);
            }
        }
        OutputFormat::Json => {
            let code = print_json(&conversion);
            if code != 0 {
                return code;
            }
        }
    }

    if args.strict && conversion.has_warnings() {
        1
    } else {
        0
    }
}

fn handle_validate(core: &ShdfKitCore<'_>, file: &Path, format: OutputFormat) -> i32 {
    let report = match core.validate_file(file) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: {}", e);
            return EXIT_ERROR;
        }
    };

    match format {
        OutputFormat::Human => output_report_human(file, &report),
        OutputFormat::Json => {
            let code = print_json(&report);
            if code != 0 {
                return code;
            }
        }
    }

    if report.is_valid {
        0
    } else {
        1
    }
}

fn output_report_human(file: &Path, report: &ValidationReport) {
    println!("\nFile: {}", file.display());
    println!("{}", "─".repeat(60));

    if report.is_valid {
        println!("  Valid SHDF document");
        return;
    }

    println!("  {} error(s):", report.error_count());
    for error in &report.errors {
        println!("    - {}", error);
    }
}

fn handle_evaluate(
    core: &ShdfKitCore<'_>,
    file: &Path,
    reference: Option<&Path>,
    options: &EvaluationOptions,
    format: OutputFormat,
    fail_on_defects: bool,
) -> i32 {
    let evaluation = match core.evaluate_files(file, reference, options) {
        Ok(evaluation) => evaluation,
        Err(e) => {
            eprintln!("Error: {}", e);
            return EXIT_ERROR;
        }
    };

    match format {
        OutputFormat::Human => output_evaluation_human(file, &evaluation),
        OutputFormat::Json => {
            let code = print_json(&evaluation);
            if code != 0 {
                return code;
            }
        }
    }

    if fail_on_defects && evaluation.defect_count() > 0 {
        1
    } else {
        0
    }
}

fn output_evaluation_human(file: &Path, evaluation: &Evaluation) {
    let m = &evaluation.metrics;

    println!("\nFile: {} ({} mode)", file.display(), evaluation.mode);
    println!("{}", "─".repeat(60));

    println!("  Duplicate connections: {}", m.duplicate_connections.duplicate_connections);
    for dup in &m.duplicate_connections.duplicate_connection_list {
        println!("    - #{}: {} - {}", dup.index, dup.connection.from, dup.connection.to);
    }

    println!("  Unused components:     {}", m.unused_components.unused_components);
    for component in &m.unused_components.unused_component_list {
        println!("    - {} ({})", component.id, component.component_type);
    }

    if let Some(conflicts) = &m.endpoint_conflicts {
        println!("  Endpoint conflicts:    {}", conflicts.endpoint_conflicts);
        for conflict in &conflicts.conflict_endpoints {
            println!(
                "    - {} used by connections {:?}",
                conflict.endpoint, conflict.connection_indices
            );
        }
    }

    if let Some(direct) = &m.direct_connections {
        println!(
            "  Direct connections:    {} ({:.1}%), via breadboard: {} ({:.1}%)",
            direct.direct_connections,
            direct.direct_connection_percentage,
            direct.breadboard_connections,
            direct.breadboard_connection_percentage
        );
    }

    if let Some(comparison) = &m.unnecessary_components {
        println!("  Unnecessary components: {}", comparison.unnecessary_components);
        for extra in &comparison.unnecessary_component_list {
            println!(
                "    - {}: {} generated, {} in reference",
                extra.component_type, extra.generated_count, extra.reference_count
            );
        }
        println!("  Missing components:    {}", comparison.missing_components);
        for missing in &comparison.missing_component_list {
            println!(
                "    - {}: {} generated, {} in reference",
                missing.component_type, missing.generated_count, missing.reference_count
            );
        }
    }

    if let Some(attrs) = &m.component_attrs {
        println!("  Incorrect attributes:  {}", attrs.incorrect_attrs);
        for attr in &attrs.incorrect_attrs_list {
            println!(
                "    - {}.{}: '{}' (expected '{}')",
                attr.component_id, attr.attribute, attr.generated_value, attr.reference_value
            );
        }
    }

    println!(
        "  Electrical nets:       {} ({} shorted)",
        m.electrical_nets.net_count, m.electrical_nets.shorted_nets
    );
    for net in &m.electrical_nets.shorted_net_list {
        println!("    - short: {}", net.pins.join(", "));
    }

    println!("\n  Defects: {}", evaluation.defect_count());
}

fn handle_catalog(catalog: &Catalog, pins: bool, format: OutputFormat) {
    if let OutputFormat::Json = format {
        print_json(&catalog.entries());
        return;
    }

    println!("Component types ({}):\n", catalog.len());
    for entry in catalog.entries() {
        println!("  {}", entry.neutral_type);
        println!("    wokwi: {}", entry.simulator_type);
        if !entry.neutral_type_aliases.is_empty() {
            let aliases: Vec<&str> = entry.neutral_type_aliases.iter().map(|a| a.as_str()).collect();
            println!("    aliases: {}", aliases.join(", "));
        }
        if pins {
            for pin in &entry.pins {
                println!(
                    "    {:<8} <- {:<8} {}",
                    pin.neutral_pin_name, pin.simulator_pin_name, pin.description
                );
            }
        }
        println!();
    }
}
