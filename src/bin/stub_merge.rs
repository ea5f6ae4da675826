use log::warn;
use serde::Serialize;
use std::env;
use std::path::Path;
use vertex_stub::config::merge;
use vertex_stub::io::{read_event, write_json_file};
use vertex_stub::stub::{EventMergeResult, MergeContext, StubMergeEngine};

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = merge::load_config(Path::new(&config_path))?;
    let event = read_event(&config.input)?;

    let field = config.distortion.build();
    let ctx = MergeContext::new(
        &config.geometry,
        field.as_ref(),
        &config.properties,
        &config.clocks,
    )
    .map_err(|e| format!("Invalid geometry: {e}"))?;
    let engine = StubMergeEngine::new(ctx, config.cuts.clone());
    let result = engine.process(&event.stubs);

    if result.merged.is_empty() && !event.stubs.is_empty() {
        warn!(
            "event {}: no stub pair merged out of {} stubs",
            event.event,
            event.stubs.len()
        );
    }

    let report = StubMergeReport {
        event: event.event,
        input_stubs: event.stubs.len(),
        result,
    };
    write_json_file(&config.output, &report)?;

    println!(
        "Merged {} stub pairs ({} contained, {} unmerged) in {:.3} ms -> {}",
        report.result.merged.len(),
        report.result.contained.len(),
        report.result.unmerged.len(),
        report.result.elapsed_ms,
        config.output.display()
    );
    Ok(())
}

fn usage() -> String {
    "Usage: stub_merge <config.json>".to_string()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StubMergeReport {
    event: u64,
    input_stubs: usize,
    result: EventMergeResult,
}
