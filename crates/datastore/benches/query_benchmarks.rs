use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use orderapp_core::{Page, QueryOptions};
use orderapp_datastore::{DataStore, InMemoryDataStore};
use orderapp_models::Order;
use tokio::runtime::Runtime;

fn runtime() -> Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

fn order(i: usize) -> Order {
    let status = if i % 3 == 0 { "InProcess" } else { "Processed" };
    Order::builder()
        .customer_id(format!("c{i}"))
        .account_representative_id(format!("AR{i}"))
        .product_id(format!("P{i}"))
        .status(status)
        .amount(i as i32)
        .date("2022-10-25")
        .id(i.to_string())
        .build()
}

fn seeded(rt: &Runtime, count: usize) -> InMemoryDataStore {
    let store = InMemoryDataStore::new();
    rt.block_on(async {
        for i in 0..count {
            store.save(order(i)).await.unwrap();
        }
    });
    store
}

fn bench_save_throughput(c: &mut Criterion) {
    let rt = runtime();
    let mut group = c.benchmark_group("save_throughput");

    for batch_size in [1, 10, 100, 1000].iter() {
        group.throughput(Throughput::Elements(*batch_size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(batch_size), batch_size, |b, &n| {
            b.iter(|| {
                let store = InMemoryDataStore::new();
                rt.block_on(async {
                    for i in 0..n {
                        store.save(order(i)).await.unwrap();
                    }
                });
                black_box(store.count::<Order>().unwrap())
            });
        });
    }

    group.finish();
}

fn bench_filtered_query(c: &mut Criterion) {
    let rt = runtime();
    let mut group = c.benchmark_group("filtered_query");

    for record_count in [100, 1000, 10000].iter() {
        let store = seeded(&rt, *record_count);
        group.bench_with_input(
            BenchmarkId::from_parameter(record_count),
            record_count,
            |b, _| {
                b.iter(|| {
                    let options = QueryOptions::matching(
                        Order::STATUS.eq("InProcess").and(Order::AMOUNT.ge(10)),
                    )
                    .sorted_by(Order::AMOUNT.descending())
                    .paginated(Page::first(100));
                    let results = rt.block_on(store.query::<Order>(options)).unwrap();
                    black_box(results.count())
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_save_throughput, bench_filtered_query);
criterion_main!(benches);
