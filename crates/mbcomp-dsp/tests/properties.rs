//! Property-based tests for the multiband chain.
//!
//! Covers crossover reconstruction (single blocks and long multi-block
//! runs), mute/solo precedence, compressor ratio monotonicity, the
//! below-threshold no-op and gain ramp continuity.

use mbcomp_core::{
    AudioBlock, BUTTERWORTH_Q, Biquad, ProcessSpec, Processor, allpass_coefficients,
    db_to_linear,
};
use mbcomp_dsp::{
    BandCount, CompressorBand, CrossoverNetwork, GainStage, MultibandPipeline, PipelineConfig,
    RATIO_CHOICES,
};
use proptest::prelude::*;

const SR: f32 = 48000.0;
const LEN: usize = 256;

fn allpass(frequency: f32) -> Biquad {
    let mut biquad = Biquad::new();
    biquad.set_coefficients(allpass_coefficients(frequency, BUTTERWORTH_Q, SR));
    biquad
}

/// RBJ all-pass in double precision, independent of `Biquad`.
struct ReferenceAllpass {
    b: [f64; 3],
    a: [f64; 2],
    x: [f64; 2],
    y: [f64; 2],
}

impl ReferenceAllpass {
    fn new(frequency: f32) -> Self {
        let omega = 2.0 * std::f64::consts::PI * f64::from(frequency) / f64::from(SR);
        let alpha = omega.sin() / (2.0 * std::f64::consts::FRAC_1_SQRT_2);
        let cos_omega = omega.cos();
        let a0 = 1.0 + alpha;
        Self {
            b: [(1.0 - alpha) / a0, -2.0 * cos_omega / a0, 1.0],
            a: [-2.0 * cos_omega / a0, (1.0 - alpha) / a0],
            x: [0.0; 2],
            y: [0.0; 2],
        }
    }

    fn process(&mut self, input: f64) -> f64 {
        let output = self.b[0] * input + self.b[1] * self.x[0] + self.b[2] * self.x[1]
            - self.a[0] * self.y[0]
            - self.a[1] * self.y[1];
        self.x = [input, self.x[0]];
        self.y = [output, self.y[0]];
        output
    }
}

/// Sine plus DC plus noise, long enough to expose slow drift.
fn long_signal(len: usize, seed: u32) -> Vec<f32> {
    let mut state = seed;
    (0..len)
        .map(|i| {
            state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            let noise = (state >> 8) as f32 / (1u32 << 24) as f32 * 2.0 - 1.0;
            let t = i as f32 / SR;
            0.3 + 0.4 * libm::sinf(2.0 * core::f32::consts::PI * 31.0 * t) + 0.2 * noise
        })
        .collect()
}

/// Runs `input` through a bypassed pipeline in 512-sample blocks and returns
/// the largest deviation from the double-precision all-pass cascade.
fn long_run_error(count: BandCount, low_mid: f32, mid_high: f32, input: &[f32]) -> f64 {
    const BLOCK: usize = 512;
    let mut pipeline = MultibandPipeline::new(count);
    pipeline.prepare(ProcessSpec::new(SR, 1, BLOCK));
    let mut config = PipelineConfig::bypassed();
    config.crossover.low_mid_hz = low_mid;
    config.crossover.mid_high_hz = mid_high;

    let mut ap1 = ReferenceAllpass::new(low_mid);
    let mut ap2 = ReferenceAllpass::new(mid_high);
    let mut worst = 0.0f64;
    for chunk in input.chunks(BLOCK) {
        let mut block = AudioBlock::from_channels(vec![chunk.to_vec()]);
        pipeline.process(&mut block, &config);
        for (&x, &y) in chunk.iter().zip(block.channel(0)) {
            let mut reference = ap1.process(f64::from(x));
            if count == BandCount::Three {
                reference = ap2.process(reference);
            }
            worst = worst.max((f64::from(y) - reference).abs());
        }
    }
    worst
}

#[test]
fn reconstruction_holds_over_many_blocks_at_lowest_cutoff() {
    let input = long_signal(100 * 512, 7);
    for count in [BandCount::Two, BandCount::Three] {
        let error = long_run_error(count, 20.0, 1000.0, &input);
        assert!(error < 1e-4, "{count:?}: max error {error}");
    }
}

fn stereo(left: Vec<f32>, right: Vec<f32>) -> AudioBlock {
    AudioBlock::from_channels(vec![left, right])
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// With every band bypassed and unity gains the pipeline output equals
    /// the input through the crossover all-passes, for any valid cutoffs.
    #[test]
    fn bypassed_pipeline_reconstructs_input(
        low_mid in 20.0f32..999.0,
        mid_high in 1000.0f32..20000.0,
        left in prop::collection::vec(-1.0f32..=1.0, LEN),
        right in prop::collection::vec(-1.0f32..=1.0, LEN),
    ) {
        let mut pipeline = MultibandPipeline::new(BandCount::Three);
        pipeline.prepare(ProcessSpec::new(SR, 2, LEN));
        let mut config = PipelineConfig::bypassed();
        config.crossover.low_mid_hz = low_mid;
        config.crossover.mid_high_hz = mid_high;

        let input = stereo(left, right);
        let mut block = input.clone();
        pipeline.process(&mut block, &config);

        for ch in 0..2 {
            let (mut ap1, mut ap2) = (allpass(low_mid), allpass(mid_high));
            for (i, (&x, &y)) in input.channel(ch).iter().zip(block.channel(ch)).enumerate() {
                let reference = ap2.process(ap1.process(x));
                prop_assert!(
                    (y - reference).abs() < 1e-3,
                    "ch {} sample {}: {} vs {} ({} / {} Hz)", ch, i, y, reference, low_mid, mid_high
                );
            }
        }
    }

    /// Two bands reconstruct through the single low-mid all-pass.
    #[test]
    fn two_band_pipeline_reconstructs_input(
        low_mid in 20.0f32..999.0,
        input in prop::collection::vec(-1.0f32..=1.0, LEN),
    ) {
        let mut pipeline = MultibandPipeline::new(BandCount::Two);
        pipeline.prepare(ProcessSpec::new(SR, 1, LEN));
        let mut config = PipelineConfig::bypassed();
        config.crossover.low_mid_hz = low_mid;

        let mut block = AudioBlock::from_channels(vec![input.clone()]);
        pipeline.process(&mut block, &config);

        let mut ap = allpass(low_mid);
        for (&x, &y) in input.iter().zip(block.channel(0)) {
            prop_assert!((y - ap.process(x)).abs() < 1e-3);
        }
    }

    /// Any solo keeps exactly the soloed bands; otherwise exactly the
    /// unmuted ones.
    #[test]
    fn mute_solo_precedence(
        muted in prop::array::uniform3(any::<bool>()),
        soloed in prop::array::uniform3(any::<bool>()),
        input in prop::collection::vec(-1.0f32..=1.0, LEN),
    ) {
        let mut pipeline = MultibandPipeline::new(BandCount::Three);
        pipeline.prepare(ProcessSpec::new(SR, 1, LEN));
        let mut config = PipelineConfig::bypassed();
        for (band, (&m, &s)) in config.bands.iter_mut().zip(muted.iter().zip(&soloed)) {
            band.muted = m;
            band.soloed = s;
        }

        let source = AudioBlock::from_channels(vec![input]);
        let mut block = source.clone();
        pipeline.process(&mut block, &config);

        // Same split, mixed by hand
        let mut crossover = CrossoverNetwork::new(BandCount::Three);
        crossover.prepare(ProcessSpec::new(SR, 1, LEN));
        let mut bands = [
            AudioBlock::new(1, LEN),
            AudioBlock::new(1, LEN),
            AudioBlock::new(1, LEN),
        ];
        crossover.split(&source, &mut bands);

        let any_solo = soloed.iter().any(|&s| s);
        let mut expected = AudioBlock::new(1, LEN);
        for (i, band) in bands.iter().enumerate() {
            let keep = if any_solo { soloed[i] } else { !muted[i] };
            if keep {
                expected.accumulate_from(band);
            }
        }

        prop_assert_eq!(block, expected);
    }

    /// Above threshold, a higher ratio never produces a louder output.
    #[test]
    fn ratio_is_monotonic(
        threshold_db in -60.0f32..-20.0,
        level_db in -18.0f32..0.0,
        lower in 0usize..RATIO_CHOICES.len(),
        upper in 0usize..RATIO_CHOICES.len(),
        attack_ms in 5.0f32..50.0,
    ) {
        let (lower, upper) = if lower <= upper { (lower, upper) } else { (upper, lower) };
        let level = db_to_linear(level_db);

        let settled = |ratio: f32| {
            let mut band = CompressorBand::new();
            band.prepare(ProcessSpec::new(SR, 1, 4800));
            band.update_settings(threshold_db, ratio, attack_ms, 250.0);
            let mut block = AudioBlock::from_channels(vec![vec![level; 4800]]);
            band.process(&mut block);
            block.channel(0)[4799]
        };

        let gentle = settled(RATIO_CHOICES[lower]);
        let hard = settled(RATIO_CHOICES[upper]);
        prop_assert!(hard <= gentle + 1e-6, "{}:1 -> {}, {}:1 -> {}",
            RATIO_CHOICES[lower], gentle, RATIO_CHOICES[upper], hard);
        if upper > lower {
            prop_assert!(hard < gentle);
        }
    }

    /// Signals that stay below threshold come out bit-identical.
    #[test]
    fn below_threshold_is_unity(
        threshold_db in -60.0f32..12.0,
        ratio_index in 0usize..RATIO_CHOICES.len(),
        attack_ms in 5.0f32..500.0,
        release_ms in 5.0f32..500.0,
        shape in prop::collection::vec(-1.0f32..=1.0, LEN),
    ) {
        let ceiling = db_to_linear(threshold_db - 0.5);
        let input: Vec<f32> = shape.iter().map(|s| s * ceiling).collect();

        let mut band = CompressorBand::new();
        band.prepare(ProcessSpec::new(SR, 1, LEN));
        band.update_settings(threshold_db, RATIO_CHOICES[ratio_index], attack_ms, release_ms);
        let mut block = AudioBlock::from_channels(vec![input.clone()]);
        band.process(&mut block);

        prop_assert_eq!(block.channel(0), input.as_slice());
    }

    /// A gain jump never moves faster than the ramp's per-sample step and
    /// lands exactly on target.
    #[test]
    fn gain_ramp_is_continuous(
        start_db in -24.0f32..24.0,
        target_db in -24.0f32..24.0,
        ramp_ms in 1.0f32..50.0,
    ) {
        let mut stage = GainStage::with_ramp_time_ms(ramp_ms);
        stage.set_target_gain_db(start_db);
        stage.prepare(ProcessSpec::new(SR, 1, 4096));
        stage.set_target_gain_db(target_db);
        let step = stage.max_step();

        let mut block = AudioBlock::from_channels(vec![vec![1.0; 4096]]);
        stage.process(&mut block);
        let out = block.channel(0);

        prop_assert!((out[0] - db_to_linear(start_db)).abs() <= step + 1e-5);
        for pair in out.windows(2) {
            prop_assert!((pair[1] - pair[0]).abs() <= step + 1e-5);
        }
        prop_assert!((out[4095] - db_to_linear(target_db)).abs() < 1e-6);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]

    /// Reconstruction does not drift across a long run of blocks, with the
    /// low-mid cutoff near the bottom of its range.
    #[test]
    fn reconstruction_does_not_drift(
        low_mid in 20.0f32..60.0,
        mid_high in 1000.0f32..20000.0,
        seed in any::<u32>(),
    ) {
        let input = long_signal(100 * 512, seed);
        let error = long_run_error(BandCount::Three, low_mid, mid_high, &input);
        prop_assert!(error < 1e-4, "max error {} at {} / {} Hz", error, low_mid, mid_high);
    }
}
