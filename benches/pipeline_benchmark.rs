//! Benchmarks for resumekit pipeline performance.
//!
//! Run with: cargo bench
//!
//! These benchmarks use synthetic resumes of growing length.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

/// Creates a synthetic resume with the given number of experience entries.
fn create_test_resume(entry_count: usize) -> String {
    let mut content = String::new();

    content.push_str("Jane Doe\n");
    content.push_str("jane@example.com | (555) 123-4567 | Austin, TX\n");
    content.push_str("linkedin.com/in/janedoe | github.com/jdoe\n\n");

    content.push_str("SUMMARY\n");
    content.push_str("Backend engineer with a focus on payment systems and developer tooling.\n\n");

    content.push_str("EXPERIENCE\n");
    for i in 0..entry_count {
        content.push_str(&format!("COMPANY {}\n", i));
        content.push_str("Senior Software Engineer\n");
        content.push_str(&format!("Jan {} - Dec {}\n", 2000 + i, 2001 + i));
        content.push_str("• responsible for the billing service and its on-call rotation\n");
        content.push_str("• worked on reducing latency of the ledger API by 40%\n");
        content.push_str("• helped with onboarding of new engineers to the platform team\n");
    }
    content.push('\n');

    content.push_str("EDUCATION\n");
    content.push_str("Bachelor of Science, Tech University (2013-2017)\n\n");

    content.push_str("SKILLS\n");
    content.push_str("Languages: Python, Rust, Go\n");
    content.push_str("Tools: Docker, Kubernetes, Terraform\n");

    content
}

/// Benchmark source format detection.
fn bench_format_detection(c: &mut Criterion) {
    let text = create_test_resume(1);
    let pdf_data = b"%PDF-1.7\n%\xe2\xe3\xcf\xd3\n";

    c.bench_function("detect_text", |b| {
        b.iter(|| resumekit::detect_format_from_bytes(black_box(text.as_bytes())));
    });

    c.bench_function("detect_pdf", |b| {
        b.iter(|| resumekit::detect_format_from_bytes(black_box(pdf_data)));
    });
}

/// Benchmark full parsing at various sizes.
fn bench_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("parsing");

    for entry_count in [1, 10, 50].iter() {
        let text = create_test_resume(*entry_count);

        group.bench_function(format!("{}_entries", entry_count), |b| {
            b.iter(|| resumekit::parse_text(black_box(&text)));
        });
    }

    group.finish();
}

/// Benchmark the rule engine.
fn bench_rewrite(c: &mut Criterion) {
    let engine = resumekit::RuleEngine::default();
    let text = create_test_resume(10);

    c.bench_function("rewrite_bullet", |b| {
        b.iter(|| engine.rewrite_bullet(black_box("• Responsible for managing a team of developers")));
    });

    c.bench_function("rewrite_text", |b| {
        b.iter(|| engine.rewrite_text(black_box(&text)));
    });
}

/// Benchmark layout and Markdown rendering.
fn bench_rendering(c: &mut Criterion) {
    let doc = resumekit::parse_text(&create_test_resume(10));
    let template = resumekit::TemplateDescriptor::two_column();
    let design = resumekit::DesignOptions::default();
    let options = resumekit::RenderOptions::default();

    c.bench_function("render_tree", |b| {
        b.iter(|| resumekit::render(black_box(&doc), &template, &design));
    });

    c.bench_function("render_markdown", |b| {
        b.iter(|| {
            let tree = resumekit::render(black_box(&doc), &template, &design);
            resumekit::render::to_markdown(&tree, &options)
        });
    });
}

criterion_group!(
    benches,
    bench_format_detection,
    bench_parsing,
    bench_rewrite,
    bench_rendering,
);
criterion_main!(benches);
