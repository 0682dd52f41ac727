//! CLI logic for the Marlin diagram tool.
//!
//! Reads a diagram file, parses it with [`DiagramBuilder`] and writes the
//! syntax tree as JSON or the diagram's wrapped labels.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, Emit};

use std::{fs, io};

use log::info;

use marlin::{Diagram, DiagramBuilder, MarlinError};

/// Run the Marlin CLI application
///
/// This function parses the input file and writes the requested rendition
/// of the diagram to the output file, or to standard output.
///
/// # Errors
///
/// Returns `MarlinError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Unknown diagram kinds
/// - Parsing errors
/// - Layout errors
pub fn run(args: &Args) -> Result<(), MarlinError> {
    info!(
        input_path = args.input,
        emit:? = args.emit;
        "Processing diagram"
    );

    let app_config = config::load_config(args.config.as_ref())?;

    let source = fs::read_to_string(&args.input)?;

    let builder = DiagramBuilder::new(app_config);
    let diagram = match &args.kind {
        Some(tag) => builder.parse_named(tag, &source)?,
        None => builder.parse(&source)?,
    };

    let rendered = render(&builder, &diagram, args.emit)?;

    match &args.output {
        Some(path) => {
            fs::write(path, rendered)?;
            info!(output_file = path; "Output written");
        }
        None => print!("{rendered}"),
    }

    Ok(())
}

fn render(builder: &DiagramBuilder, diagram: &Diagram, emit: Emit) -> Result<String, MarlinError> {
    let mut rendered = match emit {
        Emit::Ast => serde_json::to_string_pretty(diagram).map_err(io::Error::from)?,
        Emit::Labels => builder
            .wrap_labels(diagram)?
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join("\n"),
    };
    rendered.push('\n');
    Ok(rendered)
}
