use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use replay_queue::{PutOutcome, Queue, QueueConfig};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tempfile::tempdir;

const ITEMS_PER_PRODUCER: u64 = 200_000;

fn bench_put_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("queue");
    group.throughput(Throughput::Elements(ITEMS_PER_PRODUCER));

    for producers in [1usize, 4usize] {
        group.bench_with_input(
            BenchmarkId::new("accepted_path", producers),
            &producers,
            |b, &producers| {
                b.iter(|| {
                    let dir = tempdir().unwrap();
                    let queue = Arc::new(
                        Queue::<u64>::new(QueueConfig::new(4096, dir.path())).unwrap(),
                    );

                    let handles: Vec<_> = (0..producers)
                        .map(|_| {
                            let queue = Arc::clone(&queue);
                            thread::spawn(move || {
                                for i in 0..ITEMS_PER_PRODUCER {
                                    let outcome = queue.put(black_box(i), Duration::from_millis(50));
                                    debug_assert_eq!(outcome, PutOutcome::Accepted);
                                }
                            })
                        })
                        .collect();

                    let total = producers as u64 * ITEMS_PER_PRODUCER;
                    let mut drained = 0u64;
                    while drained < total {
                        if queue.get(Duration::from_millis(50)).is_some() {
                            drained += 1;
                        }
                    }

                    for handle in handles {
                        handle.join().unwrap();
                    }
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_put_get);
criterion_main!(benches);
