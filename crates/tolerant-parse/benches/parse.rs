use std::hint::black_box;

use codspeed_criterion_compat::{
    BenchmarkId, Criterion, Throughput, criterion_group, criterion_main,
};

fn benchmark_parser(c: &mut Criterion) {
    let junk = format!(
        "<?php static{} $a; function{} f() {{}}",
        " \x01".repeat(4096),
        " \x02".repeat(4096)
    );
    let inputs = [
        (
            "Simple",
            r#"<?php
            function foo() {
                return 42;
            }
            "#,
        ),
        (
            "Medium",
            r#"<?php
            function foo($a) {
                if ($a) {}
                if ($a) {} else {}
                if ($a) {} elseif (!$a) {} else {}
            }

            class Bar extends Baz implements Qux {
                private ?int $count = null;

                public function loop(array $items): void {
                    foreach ($items as $key => $item) {
                        $this->count += $item['weight'] ?? 1;
                    }
                }
            }
            "#,
        ),
        ("Sample", include_str!("../test_data/shapes.php")),
        ("Template", include_str!("../test_data/template.php")),
        ("Broken", "<?php function (} class { public ]; $a = = ; if ( {"),
        ("Unrecognized", junk.as_str()),
    ];

    let mut group = c.benchmark_group("Parser Benchmark");

    for (name, code) in inputs {
        group.throughput(Throughput::Bytes(code.len() as u64));
        group.bench_with_input(BenchmarkId::new("parse_code", name), code, |b, code| {
            b.iter(|| {
                let parse = tolerant_parse::parse_text(code);
                black_box(parse);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_parser);
criterion_main!(benches);
