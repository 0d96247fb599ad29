//! Clock domain model: compile-time derivation and cross-validation of the
//! audio clock tree.
//!
//! The sample rate is produced twice, by two clock chains that share no
//! hardware:
//!
//! ```text
//! peripheral-bus path:  24 MHz ─PLL(×32.768)─► 786.432 MHz ─÷4─÷8─► 24.576 MHz
//! sample-timer path:    48 kHz × 32 bit-clocks/frame × ÷16        ► 24.576 MHz
//!                       24 MHz crystal ─ PIT ÷500 ─────────────────► 48 kHz
//! ```
//!
//! Both paths must land on the same frequency bit for bit; otherwise input
//! sampling and output emission drift apart. All derivations use exact
//! integer arithmetic (no floats, no rounding) and are evaluated in `const`
//! context, so a mismatched configuration is a compile error and can never
//! reach hardware.
//!
//! The predicates live on [`ClockTree`] so tests can probe deliberately
//! broken parameter sets; the `const _` items at the bottom of this module
//! apply them to the one tree the firmware actually uses,
//! [`AUDIO_CLOCK_TREE`].

use crate::constants;

/// Ceiling on the modulator peripheral input clock, in Hz.
pub const MODULATOR_INPUT_CEILING_HZ: u64 = 66_500_000;

/// Top-level ratios of the audio clock tree.
///
/// Immutable, build-time-only. The firmware's single instance is
/// [`AUDIO_CLOCK_TREE`]; tests construct additional instances to verify that
/// the validation predicates reject inconsistent trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockTree {
    /// PLL reference (input) frequency in Hz.
    pub pll_ref_hz: u32,
    /// PLL integer divider select.
    pub pll_divsel: u32,
    /// PLL fractional numerator.
    pub pll_num: u32,
    /// PLL fractional denominator.
    pub pll_den: u32,
    /// First serial-audio prescaler from the PLL output.
    pub sai_presc_1: u32,
    /// Second serial-audio prescaler from the PLL output.
    pub sai_presc_2: u32,
    /// Bit-clock divider inside the serial-audio interface.
    pub bit_clock_div: u32,
    /// Bit-clock cycles per L+R data frame.
    pub bit_clocks_per_frame: u32,
    /// Target audio sample rate in Hz.
    pub sample_rate_hz: u32,
    /// Output modulator PWM carrier frequency in Hz.
    pub pwm_carrier_hz: u32,
    /// Output modulator oversample ratio.
    pub oversample: u32,
    /// Clock feeding the periodic sample-trigger timer, in Hz.
    pub timer_clock_hz: u32,
}

impl ClockTree {
    /// PLL output frequency: `ref * divsel + ref * num / den`, exact.
    ///
    /// The reference divides the denominator evenly for every supported
    /// configuration, so the fractional term carries no truncation error.
    pub const fn pll_output_hz(&self) -> u64 {
        let r = self.pll_ref_hz as u64;
        r * self.pll_divsel as u64 + r * self.pll_num as u64 / self.pll_den as u64
    }

    /// Peripheral-bus path: PLL output through both serial-audio prescalers.
    pub const fn sai_bus_hz(&self) -> u64 {
        self.pll_output_hz() / (self.sai_presc_1 as u64 * self.sai_presc_2 as u64)
    }

    /// Expected modulator input clock: oversample ratio times PWM carrier.
    pub const fn modulator_input_hz(&self) -> u64 {
        self.oversample as u64 * self.pwm_carrier_hz as u64
    }

    /// Sample-timer path: frame rate times bits per frame times the
    /// bit-clock divider, reconstructing the serial-audio input frequency
    /// from the sample rate side.
    pub const fn bit_clock_path_hz(&self) -> u64 {
        self.sample_rate_hz as u64
            * self.bit_clocks_per_frame as u64
            * self.bit_clock_div as u64
    }

    /// Trigger-timer reload ticks per audio sample period.
    pub const fn trigger_ticks_per_sample(&self) -> u32 {
        self.timer_clock_hz / self.sample_rate_hz
    }

    // ── Validation predicates ──────────────────────────────────────────

    /// Both derivation paths and the modulator expectation agree exactly.
    pub const fn paths_agree(&self) -> bool {
        self.bit_clock_path_hz() == self.sai_bus_hz()
            && self.bit_clock_path_hz() == self.modulator_input_hz()
    }

    /// The trigger timer clock divides into the sample rate with no
    /// remainder, so reconstructing the rate from the reload value is exact.
    pub const fn timer_path_exact(&self) -> bool {
        self.timer_clock_hz % self.sample_rate_hz == 0
            && self.timer_clock_hz / self.trigger_ticks_per_sample()
                == self.sample_rate_hz
    }

    /// PLL fractional numerator strictly below the denominator, both within
    /// the register field width.
    pub const fn pll_fraction_proper(&self) -> bool {
        self.pll_num < self.pll_den
            && self.pll_num < 1 << 30
            && self.pll_den < 1 << 30
    }

    /// PLL divider select within the documented 27..=54 range.
    pub const fn pll_divsel_in_range(&self) -> bool {
        self.pll_divsel >= 27 && self.pll_divsel <= 54
    }

    /// Serial-audio prescalers and bit-clock divider within documented
    /// ranges; the bit-clock divider must additionally be even.
    pub const fn prescalers_in_range(&self) -> bool {
        self.sai_presc_1 >= 1
            && self.sai_presc_1 <= 8
            && self.sai_presc_2 >= 1
            && self.sai_presc_2 <= 64
            && self.bit_clock_div >= 2
            && self.bit_clock_div <= 512
            && self.bit_clock_div % 2 == 0
    }

    /// Modulator oversample ratio restricted to the peripheral's discrete
    /// supported set.
    pub const fn oversample_supported(&self) -> bool {
        self.oversample == 32 || self.oversample == 64
    }

    /// PWM carrier locked to an integer multiple of the sample rate.
    pub const fn carrier_locked_to_rate(&self) -> bool {
        self.pwm_carrier_hz % self.sample_rate_hz == 0
    }

    /// Modulator input clock below the peripheral's documented ceiling.
    pub const fn below_modulator_ceiling(&self) -> bool {
        self.modulator_input_hz() < MODULATOR_INPUT_CEILING_HZ
    }

    /// All predicates at once.
    pub const fn is_consistent(&self) -> bool {
        self.paths_agree()
            && self.timer_path_exact()
            && self.pll_fraction_proper()
            && self.pll_divsel_in_range()
            && self.prescalers_in_range()
            && self.oversample_supported()
            && self.carrier_locked_to_rate()
            && self.below_modulator_ceiling()
    }
}

/// The audio clock tree this firmware is built with.
pub const AUDIO_CLOCK_TREE: ClockTree = ClockTree {
    pll_ref_hz: constants::AUDIO_PLL_REF_HZ,
    pll_divsel: constants::AUDIO_PLL_DIVSEL,
    pll_num: constants::AUDIO_PLL_NUM,
    pll_den: constants::AUDIO_PLL_DEN,
    sai_presc_1: constants::SAI_PRESC_1,
    sai_presc_2: constants::SAI_PRESC_2,
    bit_clock_div: constants::BIT_CLOCK_DIV,
    bit_clocks_per_frame: constants::BIT_CLOCKS_PER_FRAME,
    sample_rate_hz: constants::AUDIO_SAMPLE_RATE_HZ,
    pwm_carrier_hz: constants::PWM_CARRIER_HZ,
    oversample: constants::MODULATOR_OVERSAMPLE,
    timer_clock_hz: constants::TRIGGER_TIMER_CLOCK_HZ,
};

/// Trigger-timer reload value producing one conversion request per sample.
pub const TRIGGER_TICKS_PER_SAMPLE: u32 =
    AUDIO_CLOCK_TREE.trigger_ticks_per_sample();

// ── Build-time enforcement ─────────────────────────────────────────────────
//
// Violations fail compilation; none of these conditions exist at runtime.

const _: () = assert!(
    AUDIO_CLOCK_TREE.paths_agree(),
    "clock divider mismatch: peripheral-bus and sample-timer paths disagree"
);
const _: () = assert!(
    AUDIO_CLOCK_TREE.timer_path_exact(),
    "trigger timer clock must divide the sample rate exactly"
);
const _: () = assert!(
    AUDIO_CLOCK_TREE.pll_fraction_proper(),
    "PLL numerator must be strictly less than the denominator"
);
const _: () = assert!(
    AUDIO_CLOCK_TREE.pll_divsel_in_range(),
    "PLL divider select must be within 27..=54"
);
const _: () = assert!(
    AUDIO_CLOCK_TREE.prescalers_in_range(),
    "serial-audio prescaler out of range"
);
const _: () = assert!(
    AUDIO_CLOCK_TREE.oversample_supported(),
    "modulator oversample ratio must be 32 or 64"
);
const _: () = assert!(
    AUDIO_CLOCK_TREE.carrier_locked_to_rate(),
    "PWM carrier must be an integer multiple of the sample rate"
);
const _: () = assert!(
    AUDIO_CLOCK_TREE.below_modulator_ceiling(),
    "modulator input clock must stay below 66.5 MHz"
);
const _: () = assert!(
    constants::PROCESSING_BLOCK_SIZE % constants::CACHE_LINE_SAMPLES == 0,
    "processing block size must be a multiple of the cache line sample count"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pll_output_is_exact() {
        // 24 MHz * (32 + 768/1000) with no rounding drift.
        assert_eq!(AUDIO_CLOCK_TREE.pll_output_hz(), 786_432_000);
    }

    #[test]
    fn both_paths_land_on_the_same_frequency() {
        assert_eq!(AUDIO_CLOCK_TREE.sai_bus_hz(), 24_576_000);
        assert_eq!(AUDIO_CLOCK_TREE.bit_clock_path_hz(), 24_576_000);
        assert_eq!(AUDIO_CLOCK_TREE.modulator_input_hz(), 24_576_000);
        assert!(AUDIO_CLOCK_TREE.paths_agree());
    }

    #[test]
    fn trigger_timer_reload_reconstructs_the_sample_rate() {
        assert_eq!(TRIGGER_TICKS_PER_SAMPLE, 500);
        assert!(AUDIO_CLOCK_TREE.timer_path_exact());
    }

    #[test]
    fn shipped_tree_is_consistent() {
        assert!(AUDIO_CLOCK_TREE.is_consistent());
    }

    #[test]
    fn mismatched_prescaler_is_rejected() {
        let broken = ClockTree {
            sai_presc_2: 4, // bus path now 49.152 MHz, timer path unchanged
            ..AUDIO_CLOCK_TREE
        };
        assert!(!broken.paths_agree());
        assert!(!broken.is_consistent());
    }

    #[test]
    fn mismatched_sample_rate_is_rejected() {
        let broken = ClockTree {
            sample_rate_hz: 44_100,
            pwm_carrier_hz: 44_100 * 8,
            ..AUDIO_CLOCK_TREE
        };
        assert!(!broken.paths_agree());
    }

    #[test]
    fn improper_pll_fraction_is_rejected() {
        let broken = ClockTree {
            pll_num: 1000,
            pll_den: 768,
            ..AUDIO_CLOCK_TREE
        };
        assert!(!broken.pll_fraction_proper());
    }

    #[test]
    fn divsel_limits_are_enforced() {
        let low = ClockTree {
            pll_divsel: 26,
            ..AUDIO_CLOCK_TREE
        };
        let high = ClockTree {
            pll_divsel: 55,
            ..AUDIO_CLOCK_TREE
        };
        assert!(!low.pll_divsel_in_range());
        assert!(!high.pll_divsel_in_range());
    }

    #[test]
    fn only_documented_oversample_ratios_are_accepted() {
        for ratio in [1u32, 8, 16, 48, 128, 63, 65] {
            let tree = ClockTree {
                oversample: ratio,
                ..AUDIO_CLOCK_TREE
            };
            assert!(!tree.oversample_supported(), "ratio {ratio} accepted");
        }
        for ratio in [32u32, 64] {
            let tree = ClockTree {
                oversample: ratio,
                ..AUDIO_CLOCK_TREE
            };
            assert!(tree.oversample_supported());
        }
    }

    #[test]
    fn odd_bit_clock_divider_is_rejected() {
        let broken = ClockTree {
            bit_clock_div: 15,
            ..AUDIO_CLOCK_TREE
        };
        assert!(!broken.prescalers_in_range());
    }

    #[test]
    fn modulator_ceiling_is_enforced() {
        // 64x oversample of a 1.2 MHz carrier would need 76.8 MHz.
        let broken = ClockTree {
            pwm_carrier_hz: 1_200_000,
            ..AUDIO_CLOCK_TREE
        };
        assert!(!broken.below_modulator_ceiling());
    }
}
