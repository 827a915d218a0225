//! # Scoring Benchmarks
//!
//! Performance benchmarks for aiiq-core scoring and the CSV store codec.
//!
//! Run with: `cargo bench -p aiiq-core`

use aiiq_core::formats::{ColumnLayout, submissions_from_csv, submissions_to_csv};
use aiiq_core::submission::now_timestamp;
use aiiq_core::{
    NewSubmission, Respondent, ResponseSheet, RespondentId, ScaleChoice, ScoringPolicy,
    Submission, SurveyModel, score_sheet,
};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

/// A sheet for the built-in model where answers cycle through the scale.
fn cycling_sheet(model: &SurveyModel) -> ResponseSheet {
    let mut sheet = ResponseSheet::new();
    for (d, dimension) in model.dimensions().iter().enumerate() {
        let answers: Vec<ScaleChoice> = (0..dimension.question_count())
            .map(|q| ScaleChoice::ALL[(d + q) % ScaleChoice::ALL.len()])
            .collect();
        sheet = sheet
            .with_answers(dimension.name.as_str(), &answers)
            .with_text(dimension.name.as_str(), "Some context, with a comma.");
    }
    sheet
}

/// N stored submissions for the built-in model.
fn create_submissions(model: &SurveyModel, size: usize) -> Vec<Submission> {
    let sheet = cycling_sheet(model);
    let card = score_sheet(model, ScoringPolicy::Unweighted, &sheet).expect("score");
    let respondent = Respondent::new("Bench", "bench@example.com");
    let timestamp = now_timestamp();

    (0..size)
        .map(|i| {
            NewSubmission::from_card(&respondent, &card, &sheet, timestamp)
                .with_id(RespondentId(i as u64 + 1))
        })
        .collect()
}

// =============================================================================
// BENCHMARKS
// =============================================================================

fn bench_score_sheet(c: &mut Criterion) {
    let model = SurveyModel::builtin();
    let sheet = cycling_sheet(&model);
    let mut group = c.benchmark_group("score_sheet");

    for policy in [ScoringPolicy::Unweighted, ScoringPolicy::Weighted] {
        group.bench_with_input(BenchmarkId::from_parameter(policy), &policy, |b, &policy| {
            b.iter(|| black_box(score_sheet(&model, policy, &sheet)));
        });
    }

    group.finish();
}

fn bench_encode_table(c: &mut Criterion) {
    let model = SurveyModel::builtin();
    let layout = ColumnLayout::for_model(&model);
    let mut group = c.benchmark_group("encode_table");

    for size in [10, 100, 1000].iter() {
        let submissions = create_submissions(&model, *size);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| black_box(submissions_to_csv(&layout, &submissions)));
        });
    }

    group.finish();
}

fn bench_decode_table(c: &mut Criterion) {
    let model = SurveyModel::builtin();
    let layout = ColumnLayout::for_model(&model);
    let mut group = c.benchmark_group("decode_table");

    for size in [10, 100, 1000].iter() {
        let bytes = submissions_to_csv(&layout, &create_submissions(&model, *size)).expect("encode");
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| black_box(submissions_from_csv(&layout, &bytes)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_score_sheet,
    bench_encode_table,
    bench_decode_table,
);

criterion_main!(benches);
