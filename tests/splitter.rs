use annotated_mux::{
    AnnotatedSplitter, Consumer, Delivery, MuxBuilder, MuxError, Packet, PacketFormat, Producer,
    RingBuffer, Sink,
};

fn splitter(
    n: usize,
    capacity: usize,
) -> (AnnotatedSplitter<Producer<u64>>, Vec<Consumer<u64>>, RingBuffer<Packet>) {
    let builder = MuxBuilder::new()
        .with_sources(n)
        .with_width(24)
        .with_capacity(capacity);
    let (splitter, outputs) = builder.build_splitter().unwrap();
    (splitter, outputs, RingBuffer::new(64).unwrap())
}

#[test]
fn routes_payload_by_tag_and_strips_header() {
    let (mut s, outputs, input) = splitter(3, 4);
    let format = *s.format();
    input.try_send(format.encode(2, 7)).unwrap();
    input.try_send(format.encode(0, 8)).unwrap();
    input.try_send(format.encode(2, 9)).unwrap();

    assert!(s.consume(&input));
    assert!(s.consume(&input));
    assert!(s.consume(&input));
    assert!(!s.consume(&input), "input is empty");

    assert_eq!(outputs[0].drain(), vec![8]);
    assert!(outputs[1].is_empty());
    assert_eq!(outputs[2].drain(), vec![7, 9]);
    assert_eq!(s.delivered(), 3);
}

#[test]
fn invalid_tag_is_dropped_without_side_effects() {
    let (mut s, outputs, input) = splitter(3, 4);
    let format = *s.format();
    // tag == N fits the 2-bit header but addresses no output
    let crafted = Packet::from_raw(3 << format.header_shift() | 5);
    input.try_send(crafted).unwrap();

    assert_eq!(s.route(&input), Delivery::InvalidTag { tag: 3 });
    assert!(outputs.iter().all(|o| o.is_empty()));
    assert!(input.is_empty(), "the packet is consumed");
    assert_eq!(s.dropped(), 1);
    assert_eq!(s.delivered(), 0);

    input.try_send(crafted).unwrap();
    assert!(!s.consume(&input));
    assert!(outputs.iter().all(|o| o.is_empty()));
}

#[test]
fn empty_input_reports_empty() {
    let (mut s, outputs, input) = splitter(2, 4);
    assert_eq!(s.route(&input), Delivery::Empty);
    assert!(!s.consume(&input));
    assert!(outputs.iter().all(|o| o.is_empty()));
}

#[test]
fn single_destination_accepts_only_tag_zero() {
    let format = PacketFormat::compact(1, 8).unwrap();
    let outputs = vec![RingBuffer::<u64>::new(4).unwrap()];
    let mut s = AnnotatedSplitter::new(format, outputs).unwrap();
    let input = RingBuffer::<Packet>::new(4).unwrap();

    input.try_send(Packet::from_raw(0xAB)).unwrap();
    assert_eq!(s.route(&input), Delivery::Delivered { tag: 0 });
    // any bit above the 8-bit packet is a non-zero tag
    input.try_send(Packet::from_raw(0x1AB)).unwrap();
    assert_eq!(s.route(&input), Delivery::InvalidTag { tag: 1 });

    assert_eq!(s.output(0).unwrap().dequeue(), Some(0xAB));
    assert!(s.output(0).unwrap().is_empty());
}

#[test]
fn full_destination_parks_and_retries() {
    let (mut s, outputs, input) = splitter(2, 1);
    let format = *s.format();
    input.try_send(format.encode(1, 1)).unwrap();
    input.try_send(format.encode(1, 2)).unwrap();

    assert_eq!(s.drain_from(&input), 1);
    assert!(s.has_parked());
    assert_eq!(s.route(&input), Delivery::Stalled { tag: 1 });

    assert_eq!(outputs[1].receive(), Some(1));
    assert_eq!(s.route(&input), Delivery::Delivered { tag: 1 });
    assert!(!s.has_parked());
    assert_eq!(outputs[1].receive(), Some(2));
}

#[test]
fn drain_skips_invalid_packets() {
    let (mut s, outputs, input) = splitter(3, 4);
    let format = *s.format();
    input.try_send(format.encode(0, 1)).unwrap();
    input.try_send(Packet::from_raw(u64::MAX)).unwrap();
    input.try_send(format.encode(1, 2)).unwrap();

    assert_eq!(s.drain_from(&input), 2);
    assert_eq!(s.dropped(), 1);
    assert_eq!(outputs[0].drain(), vec![1]);
    assert_eq!(outputs[1].drain(), vec![2]);
}

#[test]
fn output_count_mismatch_is_rejected() {
    let format = PacketFormat::compact(2, 8).unwrap();
    let outputs: Vec<RingBuffer<u64>> = Vec::new();
    assert_eq!(
        AnnotatedSplitter::new(format, outputs).err(),
        Some(MuxError::OutputCountMismatch {
            expected: 2,
            actual: 0
        })
    );
}
