//! Unit tests for probability (Bernoulli) sampling.

mod common;

use common::{as_strings, lines, ScriptedDraw};
use linesample::draw::RngDraw;
use linesample::sample::{sample_at_rate, BernoulliSampler};
use linesample::writer::CollectSink;

#[test]
fn test_keeps_strictly_below_threshold() {
    let draw = ScriptedDraw::units(&[0.1, 0.3, 0.29999, 0.9]);
    let mut sampler = BernoulliSampler::new(0.3, draw).unwrap();
    let mut sink = CollectSink::new();

    let tally = sample_at_rate(lines(&["a", "b", "c", "d"]), &mut sampler, &mut sink).unwrap();

    assert_eq!(as_strings(sink.lines(0)), vec!["a", "c"]);
    assert_eq!(tally.seen, 4);
    assert_eq!(tally.emitted(), 2);
    assert_eq!(tally.discarded, 2);
}

#[test]
fn test_one_draw_per_line() {
    let mut draw = ScriptedDraw::units(&[0.5; 7]);
    let mut sampler = BernoulliSampler::new(0.5, &mut draw).unwrap();
    let mut sink = CollectSink::new();
    sample_at_rate(lines(&["1", "2", "3", "4", "5", "6", "7"]), &mut sampler, &mut sink).unwrap();
    drop(sampler);

    assert_eq!(draw.unit_calls, 7);
    assert!(draw.is_exhausted());
    assert_eq!(sink.total(), 0);
}

#[test]
fn test_zero_and_one() {
    let input: Vec<String> = (0..1000).map(|i| i.to_string()).collect();

    let mut sampler = BernoulliSampler::new(0.0, RngDraw::seeded(5)).unwrap();
    let mut sink = CollectSink::new();
    sample_at_rate(&input, &mut sampler, &mut sink).unwrap();
    assert_eq!(sink.total(), 0);

    let mut sampler = BernoulliSampler::new(1.0, RngDraw::seeded(5)).unwrap();
    let mut sink = CollectSink::new();
    sample_at_rate(&input, &mut sampler, &mut sink).unwrap();
    assert_eq!(as_strings(sink.lines(0)), input);
}

#[test]
fn test_preserves_input_order() {
    let input: Vec<String> = (0..5000).map(|i| format!("{i:05}")).collect();
    let mut sampler = BernoulliSampler::new(0.3, RngDraw::seeded(11)).unwrap();
    let mut sink = CollectSink::new();
    sample_at_rate(&input, &mut sampler, &mut sink).unwrap();

    let kept = as_strings(sink.lines(0));
    assert!(!kept.is_empty());
    assert!(kept.windows(2).all(|w| w[0] < w[1]), "output must stay in input order");
}

#[test]
fn test_mean_output_size() {
    let n = 1000usize;
    let p = 0.2;
    let trials = 400;
    let mut draw = RngDraw::seeded(2024);
    let mut total = 0u64;

    for _ in 0..trials {
        let mut sampler = BernoulliSampler::new(p, &mut draw).unwrap();
        total += sampler.sample(0..n).count() as u64;
    }

    // Mean of `trials` binomial(n, p) draws: sd of the mean is about 0.63.
    let mean = total as f64 / trials as f64;
    let expected = p * n as f64;
    assert!(
        (mean - expected).abs() < 5.0,
        "mean output {mean}, expected {expected}"
    );
}
