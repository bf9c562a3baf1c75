// benches/scanner.rs
use std::collections::HashSet;
use std::fmt::Write as _;

use criterion::{ black_box, criterion_group, criterion_main, Criterion };

use lms_sync::config::options::EntryShape;
use lms_sync::patch::{ dedupe, scanner, Delim };

const MARKER: &str = "export const upcomingLeagueMatches2025_26: SimpleFixture[] =";

/// A host file with `n` fixture entries, some with awkward text.
fn synthetic_host(n: usize) -> String {
    let mut out = String::with_capacity(n * 400);
    out.push_str("// generated fixtures, it's big\n");
    out.push_str(MARKER);
    out.push_str(" [\n");
    for i in 0..n {
        let _ = write!(
            out,
            "  {{\n    id: \"andover-a-{i}\",\n    homeTeam: \"Team {{{i}}} [A]\",\n    awayTeam: 'O\\'Neil',\n    notes: \"see // here\"\n  }}{}\n",
            if i + 1 < n { "," } else { "" }
        );
    }
    out.push_str("];\n\n// 2025-2026 Season Upcoming Tournaments\n");
    out
}

fn bench_scanner(c: &mut Criterion) {
    let doc = synthetic_host(2_000);
    let purge: HashSet<String> = (0..2_000).step_by(7).map(|i| format!("andover-a-{i}")).collect();
    let shape = EntryShape::Sequence { key_field: "id".into() };

    c.bench_function("locate_region", |b| {
        b.iter(|| scanner::locate_region(black_box(&doc), MARKER).map(|r| r.len()))
    });

    let region = match scanner::locate_region(&doc, MARKER) {
        Ok(r) => r,
        Err(e) => panic!("synthetic host has no region: {e}"),
    };

    c.bench_function("split_entries", |b| {
        b.iter(|| scanner::split_top_level_entries(black_box(&doc), region, Delim::Brace).len())
    });

    c.bench_function("purge_region", |b| {
        b.iter(|| dedupe::purge_region_text(black_box(region.text(&doc)), &shape, &purge).removed)
    });
}

criterion_group!(benches, bench_scanner);
criterion_main!(benches);
