// In demos/round_robin_loop.rs
//
// cargo run --example round_robin_loop -- <sources> <messages_per_source>
//
// N producer channels -> merger -> shared link -> splitter -> N consumer channels,
// all driven from one polling loop. Integrity is checked per source by comparing
// SHA-256 digests of what was fed against what came out.
use annotated_mux::{MuxBuilder, Sink};
use sha2::{Digest, Sha256};
use std::env;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().collect();
    let sources: usize = args.get(1).map(|s| s.parse()).transpose()?.unwrap_or(3);
    let per_source: u64 = args.get(2).map(|s| s.parse()).transpose()?.unwrap_or(100_000);

    let builder = MuxBuilder::new()
        .with_sources(sources)
        .with_width(64)
        .with_capacity(4);
    let format = builder.format()?;
    info!(?format, per_source, "building topology");

    let mut merger = builder.build_merger()?;
    let (inputs, merger_sources) = builder.build_sources()?;
    let (link_tx, link_rx) = builder.build_link()?;
    let (mut splitter, outputs) = builder.build_splitter()?;

    let running = Arc::new(AtomicBool::new(true));
    let running_for_handler = Arc::clone(&running);

    // Handle Ctrl+C to stop the driver loop
    ctrlc::set_handler(move || {
        running_for_handler.store(false, Ordering::SeqCst);
    })?;

    let payload_mask = format.payload_mask();
    let mut fed = vec![Sha256::new(); sources];
    let mut recovered = vec![Sha256::new(); sources];
    let mut next = vec![0u64; sources];
    let mut received = 0u64;
    let total = per_source * sources as u64;

    let start = std::time::Instant::now();
    let mut ticks = 0u64;

    while running.load(Ordering::SeqCst) && received < total {
        ticks += 1;

        // Sources produce at different rates so the merger sees uneven load.
        for (j, input) in inputs.iter().enumerate() {
            if next[j] < per_source && ticks % (j as u64 + 1) == 0 {
                let value = (next[j] * (j as u64 + 1)) & payload_mask;
                if input.try_send(value).is_ok() {
                    fed[j].update(value.to_le_bytes());
                    next[j] += 1;
                }
            }
        }

        merger.intake_cycle(&merger_sources)?;
        merger.drain_into(&link_tx);
        splitter.drain_from(&link_rx);

        for (j, output) in outputs.iter().enumerate() {
            while let Some(payload) = output.receive() {
                recovered[j].update(payload.to_le_bytes());
                received += 1;
            }
        }

        if ticks % 100_000 == 0 {
            info!(ticks, received, "progress");
        }
    }

    let elapsed = start.elapsed();
    println!(
        "Delivered {} of {} payloads in {} ticks ({:.2?}, {:.2} million payloads/sec)",
        received,
        total,
        ticks,
        elapsed,
        (received as f64 / elapsed.as_secs_f64()) / 1_000_000.0
    );

    if received < total {
        println!("Interrupted with payloads still in flight, skipping integrity check");
        return Ok(());
    }

    let mut intact = true;
    for (j, (fed, recovered)) in fed.into_iter().zip(recovered).enumerate() {
        let fed = format!("{:x}", fed.finalize());
        let recovered = format!("{:x}", recovered.finalize());
        let matches = fed == recovered;
        intact &= matches;
        println!("source {j:>3}: {} {}", &fed[..16], if matches { "ok" } else { "MISMATCH" });
    }
    println!(
        "splitter: {} delivered, {} dropped",
        splitter.delivered(),
        splitter.dropped()
    );

    if !intact {
        return Err("per-source sequences differ after merge/split".into());
    }
    println!("All payloads recovered in order");
    Ok(())
}
