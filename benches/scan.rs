// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Hop and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use hop::annotate::AnnotationStrategy;
use hop::host::ScriptedSurface;
use hop::model::LineRange;
use hop::scan::tokenize;
use hop::{HopConfig, Hopper};

mod settings;

// Benchmark identity (keep stable):
// - Group names: `scan.tokenize`, `annotate.apply_restore`
// - Case IDs: `viewport_40x8`, `viewport_120x16`; `overlay`, `substitution`.
fn benches_scan(c: &mut Criterion) {
    {
        let mut group = c.benchmark_group("scan.tokenize");

        for (case_id, lines, words) in [("viewport_40x8", 40, 8), ("viewport_120x16", 120, 16)] {
            let text = settings::document(lines, words);
            let rows = text.lines().map(str::to_owned).collect::<Vec<_>>();
            let ranges = [LineRange::new(0, lines - 1)];
            group.throughput(Throughput::Elements((lines * words) as u64));
            group.bench_function(case_id, |b| {
                b.iter(|| {
                    let scan = tokenize(black_box(&ranges), |line| rows.get(line).cloned());
                    black_box(scan.tokens.len())
                })
            });
        }

        group.finish();
    }

    {
        let mut group = c.benchmark_group("annotate.apply_restore");
        let text = settings::document(40, 8);

        for strategy in [AnnotationStrategy::Overlay, AnnotationStrategy::Substitution] {
            let hopper = Hopper::new(HopConfig {
                strategy,
                ..HopConfig::default()
            })
            .expect("hopper");
            let annotator = strategy.annotator(hopper.config().label_style());
            let mut surface = ScriptedSurface::new(&text);
            let plan = hopper.plan(&surface);
            group.throughput(Throughput::Elements(plan.assignments.len() as u64));
            group.bench_function(strategy.to_string(), |b| {
                b.iter(|| {
                    let annotations = annotator
                        .apply(&mut surface, &plan.assignments, &plan.scanned_lines)
                        .expect("apply");
                    annotations.restore(&mut surface).expect("restore");
                })
            });
        }

        group.finish();
    }
}

criterion_group! {
    name = benches;
    config = settings::criterion();
    targets = benches_scan
}
criterion_main!(benches);
