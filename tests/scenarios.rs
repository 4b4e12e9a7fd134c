use nes_cvbs::cvbs::SubcarrierEncoder;
use nes_cvbs::ppu::{COLORBURST_INDEX, SYNC_INDEX};
use nes_cvbs::{FilterSettings, FrameFilter, PpuVariant, SignalField, SignalFloat};

const NTSC_SAMPLES_PER_DOT: usize = 8;

fn dot_samples(signal: &SignalField, line: usize, dot: usize, samples_per_dot: usize) -> &[SignalFloat] {
    &signal.row(line)[dot * samples_per_dot..(dot + 1) * samples_per_dot]
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Expect {
    Sync,
    Blank,
    Colorburst,
    /// Flat level of a palette entry.
    Flat(usize),
}

/// Dot ranges of an NTSC field with sync, for an all-zero frame.
const NTSC_REFERENCE: &[(usize, usize, usize, Expect)] = &[
    // Active scanline.
    (0, 0, 25, Expect::Sync),
    (0, 25, 29, Expect::Blank),
    (0, 29, 44, Expect::Colorburst),
    (0, 44, 49, Expect::Blank),
    (0, 49, 65, Expect::Blank),
    (0, 65, 321, Expect::Flat(0x00)),
    (0, 321, 341, Expect::Blank),
    (239, 0, 25, Expect::Sync),
    (239, 29, 44, Expect::Colorburst),
    (239, 65, 321, Expect::Flat(0x00)),
    // Post-render: bottom border only.
    (240, 0, 25, Expect::Sync),
    (240, 29, 44, Expect::Colorburst),
    (240, 44, 341, Expect::Blank),
    (241, 49, 341, Expect::Blank),
    // Post-render blanking.
    (242, 0, 25, Expect::Sync),
    (242, 29, 44, Expect::Colorburst),
    (244, 44, 341, Expect::Blank),
    // Vertical sync.
    (245, 0, 318, Expect::Sync),
    (245, 318, 341, Expect::Blank),
    (247, 0, 318, Expect::Sync),
    (247, 318, 341, Expect::Blank),
    // Pre-render blanking.
    (248, 0, 25, Expect::Sync),
    (248, 25, 29, Expect::Blank),
    (248, 29, 44, Expect::Colorburst),
    (261, 44, 341, Expect::Blank),
];

#[test]
fn all_zero_ntsc_field_matches_reference() {
    let mut filter = FrameFilter::new(FilterSettings::default()).unwrap();
    let lut = filter.lut().clone();
    let signal = filter.filter_frame(&vec![0; 256 * 240], 0, false).unwrap();

    assert_eq!(signal.width(), 341 * NTSC_SAMPLES_PER_DOT);
    assert_eq!(signal.height(), 262);

    let burst = [
        lut.level(false, false, COLORBURST_INDEX),
        lut.level(true, false, COLORBURST_INDEX),
    ];
    for &(line, start, end, expect) in NTSC_REFERENCE {
        for dot in start..end {
            for &sample in dot_samples(signal, line, dot, NTSC_SAMPLES_PER_DOT) {
                match expect {
                    Expect::Sync => assert_eq!(sample, lut.level(false, false, SYNC_INDEX)),
                    Expect::Blank => assert_eq!(sample, lut.level(true, false, SYNC_INDEX)),
                    Expect::Colorburst => assert!(burst.contains(&sample), "line {line} dot {dot}"),
                    Expect::Flat(color) => assert_eq!(sample, lut.level(true, false, color)),
                }
            }
        }
    }
}

#[test]
fn flat_black_field() {
    let mut filter = FrameFilter::new(FilterSettings::default()).unwrap();
    let level = filter.lut().level(false, false, 0x0D);
    assert_eq!(level, filter.lut().level(true, false, 0x0D));

    let signal = filter.filter_frame(&vec![0x0D; 256 * 240], 1, false).unwrap();
    for line in 0..240 {
        let active = &signal.row(line)[65 * NTSC_SAMPLES_PER_DOT..321 * NTSC_SAMPLES_PER_DOT];
        assert!(active.iter().all(|&s| s == level), "line {line}");
    }
}

#[test]
fn pal_odd_lines_swing_three_steps() {
    let mut filter = FrameFilter::new(FilterSettings::for_variant(PpuVariant::Pal)).unwrap();
    let lut = filter.lut().clone();
    let high = lut.level(true, false, 0x16);
    let signal = filter.filter_frame(&vec![0x16; 256 * 240], 0, false).unwrap();

    let samples_per_dot = 10;
    let active_start = 49 + 18;
    for line in 0..8 {
        let swing = if line % 2 == 1 { 3 } else { 0 };
        let start = ((line % 3) * 4 + swing) % 12;
        for dot in active_start..active_start + 256 {
            for (i, &sample) in dot_samples(signal, line, dot, samples_per_dot).iter().enumerate() {
                let phase = (start + dot * samples_per_dot + i) % 12;
                let expect_high = (6 + phase) % 12 < 6;
                assert_eq!(sample == high, expect_high, "line {line} dot {dot} sample {i}");
            }
        }
    }
}

#[test]
fn pal_swing_does_not_carry_over() {
    let lut = nes_cvbs::ppu::SignalLevelLut::new(PpuVariant::Pal.voltages(), 0.0, 0.0);
    let encoder = SubcarrierEncoder::new(PpuVariant::Pal, &lut);
    for line in (0..312).step_by(2) {
        let even = encoder.phases(0, line, false).next().unwrap();
        assert_eq!(usize::from(even), (line % 3) * 4);
    }
}

#[test]
fn emphasis_bits_darken_their_own_phases() {
    for (bit, offset) in [(0u16, 0x0C), (1, 0x04), (2, 0x08)] {
        let mut filter = FrameFilter::new(FilterSettings::default()).unwrap();
        let darkened = filter.lut().level(true, true, 0x20);
        let normal = filter.lut().level(true, false, 0x20);
        let signal = filter.filter_frame(&vec![0x20 | 1 << (6 + bit); 256 * 240], 1, false).unwrap();

        for line in 0..3 {
            let start = ((1 + line) % 3) * 4;
            for dot in 65..321 {
                for (i, &sample) in dot_samples(signal, line, dot, NTSC_SAMPLES_PER_DOT).iter().enumerate() {
                    let phase = (start + dot * NTSC_SAMPLES_PER_DOT + i) % 12;
                    let expected = if (offset + phase) % 12 < 6 { darkened } else { normal };
                    assert_eq!(sample, expected, "bit {bit} line {line} dot {dot} sample {i}");
                }
            }
        }
    }
}

#[test]
fn dot_skip_only_touches_the_start_of_scanline_zero() {
    let pixels: Vec<u16> = (0..256 * 240).map(|i| (i % 0x40) as u16).collect();

    let mut filter = FrameFilter::new(FilterSettings::default()).unwrap();
    let normal = filter.filter_frame(&pixels, 2, false).unwrap().clone();
    let skipped = filter.filter_frame(&pixels, 2, true).unwrap().clone();

    let correction = 63 * NTSC_SAMPLES_PER_DOT;
    assert_eq!(normal.row(0)[correction..], skipped.row(0)[correction..]);
    // The colorburst comes before the correction column, so it is the visible part of the shift.
    let burst = 29 * NTSC_SAMPLES_PER_DOT..44 * NTSC_SAMPLES_PER_DOT;
    assert_ne!(normal.row(0)[burst.clone()], skipped.row(0)[burst]);
    for line in 1..262 {
        assert_eq!(normal.row(line), skipped.row(line), "line {line}");
    }
}

#[test]
fn dot_skip_is_ignored_on_pal_chips() {
    for variant in [PpuVariant::Pal, PpuVariant::Dendy] {
        let pixels = vec![0x2A; 256 * 240];
        let mut filter = FrameFilter::new(FilterSettings::for_variant(variant)).unwrap();
        let normal = filter.filter_frame(&pixels, 1, false).unwrap().clone();
        let skipped = filter.filter_frame(&pixels, 1, true).unwrap().clone();
        assert_eq!(normal, skipped);
    }
}

#[test]
fn full_frame_input_reaches_the_borders() {
    let settings = FilterSettings {
        full_frame: true,
        ..FilterSettings::default()
    };
    let mut filter = FrameFilter::new(settings).unwrap();
    let level = filter.lut().level(true, false, 0x30);
    let signal = filter.filter_frame(&vec![0x30; 283 * 242], 0, false).unwrap();

    for line in [0, 120, 241] {
        let visible = &signal.row(line)[49 * NTSC_SAMPLES_PER_DOT..332 * NTSC_SAMPLES_PER_DOT];
        assert!(visible.iter().all(|&s| s == level), "line {line}");
    }
}

#[test]
fn sync_disabled_field_is_the_visible_window() {
    let settings = FilterSettings {
        sync_enable: false,
        ..FilterSettings::default()
    };
    let mut filter = FrameFilter::new(settings).unwrap();
    let sync = filter.lut().sync_level();
    let signal = filter.filter_frame(&vec![0x20; 256 * 240], 0, false).unwrap();

    assert_eq!(signal.len(), 283 * NTSC_SAMPLES_PER_DOT * 242);
    assert!(signal.samples().iter().all(|&s| s != sync));
}
