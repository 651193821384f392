use std::process::ExitCode;

use clap::Parser;
use scenery::{document::Mesh, Context, Registry};

mod cli;
mod recorder;

use cli::{initialize_tracing, Cli};
use recorder::RecordingSpawner;

fn print_indices(context: &Context<RecordingSpawner>, registry: &Registry, identifier: &str) {
    let Ok(id) = registry.id(identifier) else {
        return;
    };
    for mesh in registry.handles::<Mesh>(id).unwrap_or_default() {
        for primitive in registry.primitives(mesh).unwrap_or_default() {
            match context.read_indices(registry, primitive) {
                Ok(Some(indices)) => println!("  {primitive}: {indices:?}"),
                Ok(None) => println!("  {primitive}: not indexed"),
                Err(error) => tracing::warn!(%primitive, %error, "could not decode indices"),
            }
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    initialize_tracing(&cli.log_filter, cli.log_format);

    let mut registry = Registry::new();
    let mut context = match Context::new(cli.config(), RecordingSpawner::default()) {
        Ok(c) => c,
        Err(error) => {
            tracing::error!(%error, "could not initialize");
            return ExitCode::FAILURE;
        }
    };

    let mut failed = false;
    for file in &cli.files {
        let identifier = file.to_string_lossy();
        if registry.load(file).is_err() {
            failed = true;
            continue;
        }
        if cli.validate {
            if let Ok(report) = registry.validate(&identifier) {
                println!("{identifier}: {}", report.status());
                for issue in &report.issues {
                    println!("  {issue}");
                }
                if let Err(error) = report.into_result() {
                    tracing::warn!(%error, "processing an invalid document");
                }
            }
        }
        if cli.info {
            if let Ok(info) = registry.info(&identifier) {
                println!("{info}");
            }
        }
        if cli.indices {
            print_indices(&context, &registry, &identifier);
        }
        match context.process(&mut registry, &identifier) {
            Ok(report) => {
                println!("{report}");
                for skip in &report.skipped {
                    println!("  skipped: {skip}");
                }
            }
            Err(_) => failed = true,
        }
    }

    for record in &context.spawner().records {
        let t = &record.transform;
        println!(
            "#{} {:?} t={:?} r={:?} s={:?}",
            record.id,
            record.name,
            t.translation.as_slice(),
            t.rotation_xyzw(),
            t.scale.as_slice()
        );
        for g in &record.geometry {
            println!(
                "    {}[{}]: {} vertices, bounds {:?}",
                g.mesh, g.primitive, g.vertices, g.bounds
            );
        }
    }
    let spawner = context.finalize();
    tracing::info!(released = spawner.released, "finalized");
    for identifier in registry.identifiers() {
        tracing::debug!(identifier, "closing document");
    }
    registry.clear();

    match failed {
        true => ExitCode::FAILURE,
        false => ExitCode::SUCCESS,
    }
}
