use flowchart_detector::config::{self, RuntimeConfig};
use flowchart_detector::image::io::{load_grayscale_image, read_json_file, save_ink_mask, write_json_file, write_text_file};
use flowchart_detector::image::InkMask;
use flowchart_detector::{ExtractError, ExtractionReport, FlowchartExtractor, Result, TextRegion};
use std::env;
use std::path::PathBuf;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let mut args = env::args();
    let program = args.next().unwrap_or_else(|| "flowchart_detector".to_string());
    let config_path = args.next().map(PathBuf::from).ok_or_else(|| {
        ExtractError::Config(format!("usage: {program} <config.json>"))
    })?;
    let config = config::load_config(&config_path)?;

    let gray = load_grayscale_image(&config.input)?;
    let regions: Vec<TextRegion> = match &config.text_regions {
        Some(path) => read_json_file(path)?,
        None => Vec::new(),
    };

    let extractor = FlowchartExtractor::new(config.params);
    let report = extractor.process(&gray.as_view(), &regions)?;
    print_summary(&config, &report);
    write_outputs(&config, &report)?;

    if let Some(path) = &config.output.ink_mask {
        let mask = InkMask::from_gray(&gray.as_view(), &config.params.binarize);
        save_ink_mask(&mask, path)?;
        println!("Ink mask written to {}", path.display());
    }
    Ok(())
}

fn write_outputs(config: &RuntimeConfig, report: &ExtractionReport) -> Result<()> {
    let out = &config.output;
    if let Some(path) = &out.graph_json {
        write_text_file(path, &report.graph.to_json()?)?;
        println!("Graph JSON written to {}", path.display());
    }
    if let Some(path) = &out.mermaid {
        write_text_file(path, &report.graph.to_mermaid())?;
        println!("Mermaid written to {}", path.display());
    }
    if let Some(path) = &out.diagnostics_json {
        write_json_file(path, &report.diagnostics)?;
        println!("Diagnostics written to {}", path.display());
    }
    if out.graph_json.is_none() && out.mermaid.is_none() {
        print!("\n{}", report.graph.to_mermaid());
    }
    Ok(())
}

fn print_summary(config: &RuntimeConfig, report: &ExtractionReport) {
    let d = &report.diagnostics;
    println!("Extraction summary for {}", config.input.display());
    println!("  image: {}x{}", d.width, d.height);
    println!("  shapes: {} ({} contours, {} rejected)", d.shapes, d.contours_found, d.rejected_contours);
    println!("  edges: {}", report.graph.edges.len());
    println!("  dropped connectors: {}", d.dropped_connectors);
    println!("  dangling edges: {}", d.dangling_edges);
    println!("  unassociated text: {}", d.unassociated_text);
    println!("  latency_ms: {:.3}", d.timing.total_ms);
    for stage in &d.timing.stages {
        println!("    {:<10} {:.3}", stage.label, stage.elapsed_ms);
    }
}
