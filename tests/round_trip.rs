use annotated_mux::{Consumer, MuxBuilder, Packet, PacketFormat, Producer, RingBuffer, Sink};

/// Drives merge -> shared link -> split until every fed item came out the far side.
fn run_round_trip(builder: &MuxBuilder, fed: &[Vec<u64>]) -> Vec<Vec<u64>> {
    let n = fed.len();
    let mut merger = builder.build_merger().unwrap();
    let (inputs, sources) = builder.build_sources().unwrap();
    let (link_tx, link_rx) = builder.build_link().unwrap();
    let (mut splitter, outputs) = builder.build_splitter().unwrap();

    let total: usize = fed.iter().map(Vec::len).sum();
    let mut cursors = vec![0usize; n];
    let mut recovered = vec![Vec::new(); n];
    let mut received = 0;

    // bounded so a routing bug fails the test instead of hanging it
    for _tick in 0..total * 8 + 64 {
        for (j, input) in inputs.iter().enumerate() {
            if let Some(&value) = fed[j].get(cursors[j]) {
                if input.try_send(value).is_ok() {
                    cursors[j] += 1;
                }
            }
        }
        merger.intake_cycle(&sources).unwrap();
        merger.drain_into(&link_tx);
        splitter.drain_from(&link_rx);
        for (j, output) in outputs.iter().enumerate() {
            let drained = output.drain();
            received += drained.len();
            recovered[j].extend(drained);
        }
        if received == total {
            break;
        }
    }
    recovered
}

#[test]
fn per_source_order_survives_merge_and_split() {
    let mut rng = fastrand::Rng::with_seed(42);
    for n in [1usize, 2, 3, 7, 20] {
        let builder = MuxBuilder::new()
            .with_sources(n)
            .with_width(40)
            .with_capacity(rng.usize(1..=4))
            .with_staging_depth(rng.usize(1..=8));
        let payload_mask = builder.format().unwrap().payload_mask();

        let fed: Vec<Vec<u64>> = (0..n)
            .map(|_| {
                let len = rng.usize(0..50);
                (0..len).map(|_| rng.u64(..) & payload_mask).collect()
            })
            .collect();

        let recovered = run_round_trip(&builder, &fed);
        assert_eq!(recovered, fed, "n = {n}");
    }
}

#[test]
fn scenario_three_sources_two_cycles() {
    let builder = MuxBuilder::new().with_sources(3).with_width(64).with_header_width(32);
    let format = builder.format().unwrap();
    let mut merger = builder.build_merger().unwrap();
    let (inputs, sources) = builder.build_sources().unwrap();
    let (link_tx, link_rx) = builder.build_link().unwrap();
    let (mut splitter, outputs) = builder.build_splitter().unwrap();

    for cycle in 0..2u64 {
        for (j, input) in inputs.iter().enumerate() {
            input.send((j as u64 + 1) * cycle).unwrap();
        }
        merger.intake_cycle(&sources).unwrap();
    }
    merger.drain_into(&link_tx);

    let packets: Vec<Packet> = link_rx.drain();
    let order: Vec<(u64, u64)> = packets.iter().map(|&p| format.decode(p)).collect();
    assert_eq!(order, vec![(0, 0), (1, 0), (2, 0), (0, 1), (1, 2), (2, 3)]);

    let replay = RingBuffer::<Packet>::new(packets.len()).unwrap();
    for packet in packets {
        replay.try_send(packet).unwrap();
    }
    assert_eq!(splitter.drain_from(&replay), 6);

    let recovered: Vec<Vec<u64>> = outputs.iter().map(Consumer::drain).collect();
    assert_eq!(recovered, vec![vec![0, 1], vec![0, 2], vec![0, 3]]);
}

#[test]
fn producers_on_other_threads_feed_the_driver_loop() {
    use std::thread;

    let n = 4;
    let per_source = 500u64;
    let builder = MuxBuilder::new().with_sources(n).with_width(32).with_capacity(2);
    let format: PacketFormat = builder.format().unwrap();
    let mut merger = builder.build_merger().unwrap();
    let (inputs, sources) = builder.build_sources().unwrap();
    let (link_tx, link_rx) = builder.build_link().unwrap();
    let (mut splitter, outputs) = builder.build_splitter().unwrap();
    assert_eq!(format.sources(), n);

    let feeders: Vec<_> = inputs
        .into_iter()
        .enumerate()
        .map(|(j, input): (usize, Producer<u64>)| {
            thread::spawn(move || {
                for i in 0..per_source {
                    let mut value = (j as u64) * 10_000 + i;
                    while let Err(back) = input.try_send(value) {
                        value = back;
                        thread::yield_now();
                    }
                }
            })
        })
        .collect();

    let mut recovered = vec![Vec::new(); n];
    while recovered.iter().map(Vec::len).sum::<usize>() < n * per_source as usize {
        merger.intake_cycle(&sources).unwrap();
        merger.drain_into(&link_tx);
        splitter.drain_from(&link_rx);
        for (j, output) in outputs.iter().enumerate() {
            recovered[j].extend(output.drain());
        }
        thread::yield_now();
    }

    for feeder in feeders {
        feeder.join().unwrap();
    }
    for (j, values) in recovered.iter().enumerate() {
        let expected: Vec<u64> = (0..per_source).map(|i| (j as u64) * 10_000 + i).collect();
        assert_eq!(values, &expected, "source {j}");
    }
}
