//! CLI command implementations.

use std::path::Path;
use std::time::Instant;

use tress_bench::metrics::BenchmarkMetrics;
use tress_bench::runner::BenchmarkRunner;
use tress_bench::scenarios::{Scenario, ScenarioKind};
use tress_debug::hooks::{step_with_hooks, InspectionHook, TelemetryHook};
use tress_debug::snapshot::SimulationSnapshot;
use tress_io::contract::{SimulationInput, SimulationMetrics, SimulationOutput, SimulationParams};
use tress_io::loader::build_simulation;
use tress_io::validator::{validate_hair_file, validate_input, validate_params};
use tress_io::HairFile;
use tress_material::MaterialDatabase;
use tress_telemetry::{EventBus, TracingSink};

type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Options of the `simulate` command.
pub struct SimulateArgs {
    pub input: String,
    pub config: Option<String>,
    pub output: Option<String>,
    pub steps: Option<u64>,
    pub material: Option<String>,
    pub resample: Option<usize>,
    pub snapshot: Option<String>,
}

fn extension(path: &str) -> Option<&str> {
    Path::new(path).extension().and_then(|e| e.to_str())
}

/// Run a simulation from a HAIR file or JSON input.
pub fn simulate(args: SimulateArgs) -> CliResult {
    println!("Tress Simulation");
    println!("────────────────");

    let db = MaterialDatabase::with_defaults();

    // Input strands; a HAIR file is kept so its attributes survive the write-back.
    let (mut input, hair_file) = match extension(&args.input) {
        Some("hair") => {
            let file = HairFile::load(&args.input)?;
            validate_hair_file(&file)?;
            let input = SimulationInput::from_hair_file(&file, SimulationParams::default())?;
            (input, Some(file))
        }
        Some("json") => {
            let text = std::fs::read_to_string(&args.input)?;
            (SimulationInput::from_json(&text)?, None)
        }
        _ => return Err(format!("Unsupported input '{}'. Use .hair or .json.", args.input).into()),
    };
    if let Some(path) = &args.config {
        input.params = SimulationParams::load(path)?;
    }
    if let Some(name) = args.material {
        input.params.material_name = name;
    }
    if args.resample.is_some() {
        input.params.resample = args.resample;
    }

    let mut sim = build_simulation(&input, &db)?;
    let ticks = args.steps.unwrap_or_else(|| input.params.timestep_count());
    let config = sim.config();
    println!("Input:     {}", args.input);
    println!("Material:  {}", input.params.material_name);
    println!("Strands:   {} ({} vertices)", sim.rod_count(), sim.vertex_count());
    println!(
        "Solver:    dt={:.5}s, {} substeps, {:?}, twist {:?}",
        config.dt, config.substeps, config.integrator, config.twist_mode
    );
    println!("Ticks:     {ticks}");
    println!();

    let mut bus = EventBus::new();
    bus.add_sink(Box::new(TracingSink::new(tracing::Level::DEBUG)));
    let mut hooks: Vec<Box<dyn InspectionHook>> =
        vec![Box::new(TelemetryHook::forwarding(bus.sender()))];

    let mut metrics = SimulationMetrics::default();
    let start = Instant::now();
    for _ in 0..ticks {
        let tick = step_with_hooks(&mut sim, &mut hooks);
        bus.flush();
        metrics.record(&tick);
    }
    for hook in &mut hooks {
        hook.on_simulation_end();
    }
    bus.finalize();
    metrics.wall_time_seconds = start.elapsed().as_secs_f64();

    let e = metrics.final_energy;
    println!("Wall time:      {:.3}s", metrics.wall_time_seconds);
    println!("Sim time:       {:.4}s", metrics.sim_time);
    println!("Energy:         stretch {:.4e}, bend {:.4e}, twist {:.4e}, kinetic {:.4e}",
        e.stretching, e.bending, e.twisting, e.kinetic);
    println!("Max force:      {:.4e}N", metrics.max_force);
    println!("Unstable steps: {}", metrics.unstable_steps);
    if metrics.unstable_steps > 0 {
        tracing::warn!(
            unstable = metrics.unstable_steps,
            "Some strand steps were rolled back; try more substeps"
        );
    }

    let strands = sim.positions();
    if let Some(path) = &args.output {
        match extension(path) {
            Some("hair") => {
                let mut file = hair_file.unwrap_or_default();
                file.set_positions(&strands)?;
                file.save(path)?;
            }
            Some("json") => {
                let output = SimulationOutput { strands, metrics };
                std::fs::write(path, serde_json::to_string_pretty(&output)?)?;
            }
            _ => return Err(format!("Unsupported output '{path}'. Use .hair or .json.").into()),
        }
        println!("Result written to: {path}");
    }

    if let Some(path) = &args.snapshot {
        SimulationSnapshot::capture(&sim).save(path)?;
        println!("Snapshot written to: {path}");
    }

    Ok(())
}

fn scenario_kinds(name: &str) -> Result<Vec<ScenarioKind>, Box<dyn std::error::Error>> {
    if name == "all" {
        return Ok(ScenarioKind::all().to_vec());
    }
    match ScenarioKind::from_name(name) {
        Some(kind) => Ok(vec![kind]),
        None => {
            let available: Vec<&str> = ScenarioKind::all().iter().map(|k| k.name()).collect();
            Err(format!("Unknown scenario: '{name}'. Available: {}, all", available.join(", ")).into())
        }
    }
}

/// Run benchmark suite.
pub fn benchmark(scenario_name: &str, output_path: Option<&str>, material_name: Option<&str>) -> CliResult {
    println!("Tress Benchmark Suite");
    println!("═════════════════════");
    println!();

    let material = match material_name {
        Some(name) => {
            let db = MaterialDatabase::with_defaults();
            let material = db.get(name).ok_or_else(|| {
                format!("Unknown material: '{name}'. Available: {}", db.names().join(", "))
            })?;
            println!("Material: {name}");
            println!();
            Some(material.clone())
        }
        None => None,
    };

    let mut all_metrics = Vec::new();
    for kind in scenario_kinds(scenario_name)? {
        let mut scenario = Scenario::from_kind(kind);
        if let Some(material) = &material {
            scenario = scenario.with_material(material.clone());
        }

        let vertices: usize = scenario.strands.iter().map(Vec::len).sum();
        println!(
            "Running: {} ({} strands, {} verts, {} steps)",
            kind.name(),
            scenario.strands.len(),
            vertices,
            scenario.timesteps,
        );

        let metrics = BenchmarkRunner::run(&scenario).map_err(|e| format!("Benchmark failed: {e}"))?;

        println!("  Wall time:     {:.3}s", metrics.total_wall_time);
        println!("  Avg step:      {:.3}ms", metrics.avg_step_time * 1000.0);
        println!("  Final KE:      {:.6e}", metrics.final_kinetic_energy);
        println!("  Max displace:  {:.4}m", metrics.max_displacement);
        println!("  Unstable:      {}", metrics.unstable_steps);
        println!();

        all_metrics.push(metrics);
    }

    let csv = BenchmarkMetrics::to_csv(&all_metrics);
    if let Some(path) = output_path {
        std::fs::write(path, &csv)?;
        println!("Results written to: {path}");
    } else {
        println!("CSV Output:");
        println!("{csv}");
    }

    Ok(())
}

/// Write the initial strands of a scenario as a HAIR file.
pub fn generate(scenario_name: &str, output_path: &str) -> CliResult {
    let kinds = scenario_kinds(scenario_name)?;
    let strands: Vec<_> = kinds
        .into_iter()
        .flat_map(|kind| Scenario::from_kind(kind).strands)
        .collect();
    let mut file = HairFile::from_strands(&strands)?;
    file.header_mut().set_info_text(&format!("tress {scenario_name}"));
    file.save(output_path)?;
    println!("Wrote {} strands to {output_path}", strands.len());
    Ok(())
}

/// Inspect a HAIR file.
pub fn inspect(path: &str) -> CliResult {
    println!("Tress HAIR Inspector");
    println!("────────────────────");
    println!();

    let file = HairFile::load(path)?;
    println!("{}", file.summary());

    match file.strands() {
        Ok(strands) if !strands.is_empty() => {
            let lengths: Vec<f64> = strands
                .iter()
                .map(|s| s.windows(2).map(|w| w[0].distance(w[1])).sum())
                .collect();
            let min = lengths.iter().copied().fold(f64::INFINITY, f64::min);
            let max = lengths.iter().copied().fold(0.0, f64::max);
            let mean = lengths.iter().sum::<f64>() / lengths.len() as f64;
            println!();
            println!("Strand length: min {min:.4}, mean {mean:.4}, max {max:.4}");
        }
        Ok(_) => {}
        Err(e) => println!("Strands unreadable: {e}"),
    }
    Ok(())
}

/// Inspect a state snapshot.
pub fn snapshot(path: &str) -> CliResult {
    println!("Tress Snapshot Inspector");
    println!("────────────────────────");
    println!();

    let snapshot = SimulationSnapshot::load(path).map_err(|e| format!("Failed to read snapshot: {e}"))?;

    println!("Timestep:     {}", snapshot.timestep);
    println!("Sim time:     {:.4}s", snapshot.sim_time);
    println!("Strands:      {}", snapshot.strands.len());
    println!("Vertices:     {}", snapshot.vertex_count());

    let ys: Vec<f64> = snapshot
        .strands
        .iter()
        .flat_map(|s| (0..s.vertex_count()).map(move |i| s.position(i).y))
        .collect();
    if !ys.is_empty() {
        let min_y = ys.iter().copied().fold(f64::INFINITY, f64::min);
        let max_y = ys.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        println!("Y range:      [{min_y:.4}, {max_y:.4}]");
    }

    Ok(())
}

/// Validate a HAIR file, parameter file or JSON input.
pub fn validate(path: &str) -> CliResult {
    println!("Tress Validator");
    println!("───────────────");
    println!();

    let db = MaterialDatabase::with_defaults();
    match extension(path) {
        Some("hair") => {
            println!("Validating HAIR file: {path}");
            let file = HairFile::load(path)?;
            validate_hair_file(&file)?;
            println!("✅ HAIR file is valid ({} strands, {} points).", file.strand_count(), file.point_count());
        }
        Some("toml") => {
            println!("Validating parameters: {path}");
            let params = SimulationParams::load(path)?;
            validate_params(&params, &db)?;
            println!("✅ Parameters are valid.");
        }
        Some("json") => {
            println!("Validating input: {path}");
            let input = SimulationInput::from_json(&std::fs::read_to_string(path)?)?;
            validate_input(&input, &db)?;
            println!("✅ Input is valid ({} strands, {} vertices).", input.strands.len(), input.vertex_count());
        }
        _ => return Err("Unsupported file format. Use .hair, .toml or .json.".into()),
    }

    Ok(())
}
