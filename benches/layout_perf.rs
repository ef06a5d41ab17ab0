//! Layout engine benchmarks over synthetic skill graphs.

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};

use mastery::core::Skill;
use mastery::graph::assign_positions;

/// Layered synthetic graph: `width` skills per layer, each requiring two
/// skills from the layer above.
fn synthetic_graph(layers: usize, width: usize) -> Vec<Skill> {
    let mut skills = Vec::with_capacity(layers * width);
    for layer in 0..layers {
        for column in 0..width {
            let id = format!("s{layer}-{column}");
            let requirements = if layer == 0 {
                Vec::new()
            } else {
                vec![
                    format!("s{}-{}", layer - 1, column),
                    format!("s{}-{}", layer - 1, (column + 1) % width),
                ]
            };
            skills.push(
                Skill::new(id, "bench", format!("Skill {layer}/{column}"), format!("cat{column}"))
                    .with_requirements(requirements),
            );
        }
    }
    skills
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");

    for (layers, width) in [(4, 8), (10, 20), (20, 50)] {
        let skills = synthetic_graph(layers, width);
        group.bench_function(format!("{layers}x{width}"), |b| {
            b.iter(|| assign_positions(black_box(&skills)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_layout);
criterion_main!(benches);
