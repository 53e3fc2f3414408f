use availability_digest::tree_filter::{
    allowlist_from, project_by_allowlist, remove_by_key_substring,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{thread_rng, Rng};
use serde_json::{json, Value};

// Builds an availability-shaped response with `hotels` properties
fn availability_response(hotels: usize) -> Value {
    let mut rng = thread_rng();
    let availability: Vec<Value> = (0..hotels)
        .map(|i| {
            let rooms: Vec<Value> = (0..rng.gen_range(1..5))
                .map(|r| {
                    json!({
                        "roomCode": format!("R{}", r),
                        "images": (0..8)
                            .map(|n| format!("img_{}_{}.jpg", i, n))
                            .collect::<Vec<_>>(),
                        "rates": [{
                            "total": rng.gen_range(50.0..500.0),
                            "cancel_penalties": [{
                                "amount": rng.gen_range(0..100),
                                "deadline": "2026-10-20"
                            }],
                            "nonrefundable_date_ranges": []
                        }]
                    })
                })
                .collect();

            json!({
                "propertyId": format!("P{}", i),
                "propertyName": format!("Hotel {}", i),
                "description": "x".repeat(200),
                "rooms": rooms
            })
        })
        .collect();

    json!({ "availability": availability })
}

pub fn tree_filter_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("availability_tree_filter");
    let allowlist = allowlist_from([
        "cancel_penalties",
        "nonrefundable_date_ranges",
        "propertyName",
        "propertyId",
    ]);

    // Benchmark with different response sizes
    for hotels in [10, 100, 1000].iter() {
        let response = availability_response(*hotels);

        group.bench_with_input(
            BenchmarkId::new("allowlist", hotels),
            &response,
            |b, response| b.iter(|| black_box(project_by_allowlist(response, &allowlist))),
        );

        group.bench_with_input(
            BenchmarkId::new("denylist", hotels),
            &response,
            |b, response| {
                b.iter(|| black_box(remove_by_key_substring(response, &["image", "description"])))
            },
        );
    }

    group.finish();
}

criterion_group!(benches, tree_filter_benchmark);
criterion_main!(benches);
