use annotated_mux::Mux::Buffer::RingBuffer;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

#[test]
fn mpmc_correctness_many_threads() {
    let buffer = Arc::new(RingBuffer::<u64>::new(1024).unwrap());

    let producers = 4u64;
    let consumers = 4;
    let msgs_per_producer = 1000u64;
    let total_msgs = producers * msgs_per_producer;

    let mut handles = vec![];

    // Spawn producers; producer id in the high bits keeps every item unique
    for p_id in 0..producers {
        let buffer = buffer.clone();
        handles.push(thread::spawn(move || {
            for i in 0..msgs_per_producer {
                let mut item = (p_id << 32) | i;
                while let Err(back) = buffer.enqueue(item) {
                    item = back;
                    thread::yield_now();
                }
            }
        }));
    }

    // Spawn consumers
    let received_count = Arc::new(AtomicU64::new(0));
    let seen = Arc::new(Mutex::new(HashSet::new()));
    for _ in 0..consumers {
        let buffer = buffer.clone();
        let received_count = received_count.clone();
        let seen = seen.clone();
        handles.push(thread::spawn(move || loop {
            if let Some(item) = buffer.dequeue() {
                assert!(seen.lock().unwrap().insert(item), "duplicate item {item:#x}");
                received_count.fetch_add(1, Ordering::Relaxed);
            } else {
                if received_count.load(Ordering::Relaxed) >= total_msgs {
                    break;
                }
                thread::yield_now();
            }
        }));
    }

    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(received_count.load(Ordering::SeqCst), total_msgs);
    assert_eq!(seen.lock().unwrap().len() as u64, total_msgs);
}

#[test]
fn per_producer_order_is_preserved() {
    let buffer = Arc::new(RingBuffer::<u64>::new(16).unwrap());
    let producers = 3u64;
    let per_producer = 2000u64;

    let handles: Vec<_> = (0..producers)
        .map(|p_id| {
            let buffer = buffer.clone();
            thread::spawn(move || {
                for i in 0..per_producer {
                    let mut item = (p_id << 32) | i;
                    while let Err(back) = buffer.enqueue(item) {
                        item = back;
                        std::hint::spin_loop();
                    }
                }
            })
        })
        .collect();

    let mut next = vec![0u64; producers as usize];
    let mut received = 0;
    while received < producers * per_producer {
        if let Some(item) = buffer.dequeue() {
            let p_id = (item >> 32) as usize;
            assert_eq!(item & 0xFFFF_FFFF, next[p_id]);
            next[p_id] += 1;
            received += 1;
        } else {
            std::hint::spin_loop();
        }
    }

    for h in handles {
        h.join().unwrap();
    }
    assert!(buffer.is_empty());
}

#[test]
fn mpmc_throughput_print() {
    let buffer = Arc::new(RingBuffer::<u64>::new(4096).unwrap());

    let start = std::time::Instant::now();
    let count = 100_000u64;

    let b_prod = buffer.clone();
    let p = thread::spawn(move || {
        for i in 0..count {
            let mut item = i;
            while let Err(back) = b_prod.enqueue(item) {
                item = back;
                std::hint::spin_loop();
            }
        }
    });

    let b_cons = buffer.clone();
    let c = thread::spawn(move || {
        let mut rx = 0;
        while rx < count {
            if b_cons.dequeue().is_some() {
                rx += 1;
            } else {
                std::hint::spin_loop();
            }
        }
    });

    p.join().unwrap();
    c.join().unwrap();

    let elapsed = start.elapsed();
    println!(
        "Throughput: {:.2} million ops/sec",
        (count as f64 / elapsed.as_secs_f64()) / 1_000_000.0
    );
}
