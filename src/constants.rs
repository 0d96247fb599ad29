//! Build-time configuration surface.
//!
//! Every value here is resolved at compile time and cross-checked by the
//! clock domain model in [`crate::clocks`]. Nothing in this module is
//! runtime-mutable; a bad combination of values fails the build, never the
//! running image.

/// Number of samples handed to application processing per dispatch.
///
/// The firmware processes blocks of samples rather than single samples, so
/// this also sizes each half of the DMA double buffer. Must be a multiple of
/// [`CACHE_LINE_SAMPLES`] so buffer halves stay cache-line aligned.
pub const PROCESSING_BLOCK_SIZE: usize = 128;

/// Audio sample rate in Hz.
pub const AUDIO_SAMPLE_RATE_HZ: u32 = 48_000;

/// Carrier frequency of the output PWM modulator, in Hz.
///
/// Kept at an integer multiple of the sample rate (approximately the factory
/// configuration) so the output clock chain divides down exactly.
pub const PWM_CARRIER_HZ: u32 = AUDIO_SAMPLE_RATE_HZ * 8;

/// Oversample ratio of the output modulator. The peripheral supports only
/// 32 or 64.
pub const MODULATOR_OVERSAMPLE: u32 = 64;

/// Number of bit-clock cycles per L+R output data frame.
pub const BIT_CLOCKS_PER_FRAME: u32 = 32;

// ── Audio PLL ──────────────────────────────────────────────────────────────
//
// PLL_output = F_ref * (DIVSEL + NUM/DEN), with F_ref the 24 MHz oscillator.

/// Audio PLL reference (input) frequency in Hz.
pub const AUDIO_PLL_REF_HZ: u32 = 24_000_000;

/// Audio PLL integer divider select. The peripheral accepts 27..=54.
pub const AUDIO_PLL_DIVSEL: u32 = 32;

/// Audio PLL fractional numerator. Must be strictly less than the denominator.
pub const AUDIO_PLL_NUM: u32 = 768;

/// Audio PLL fractional denominator.
pub const AUDIO_PLL_DEN: u32 = 1000;

// ── Serial-audio clock chain ───────────────────────────────────────────────

/// First serial-audio clock prescaler from the audio PLL (1..=8).
pub const SAI_PRESC_1: u32 = 4;

/// Second serial-audio clock prescaler from the audio PLL (1..=64).
pub const SAI_PRESC_2: u32 = 8;

/// Bit-clock divider inside the serial-audio interface. Must be even,
/// 2..=512.
pub const BIT_CLOCK_DIV: u32 = 16;

// ── Sample trigger timer ───────────────────────────────────────────────────

/// Clock feeding the periodic trigger timer, in Hz. The timer runs off the
/// crystal oscillator so the sample cadence is independent of CPU and bus
/// frequency scaling.
pub const TRIGGER_TIMER_CLOCK_HZ: u32 = 24_000_000;

// ── Conversion peripheral ──────────────────────────────────────────────────

/// Input channel to sample, numbered with respect to the second ADC
/// instance (not the board pin number). Channel 12 is pin A2.
pub const INPUT_ADC_CHANNEL: u32 = 12;

// ── Interrupt priorities ───────────────────────────────────────────────────
//
// Lower numeric value preempts higher. Audio work sits strictly above UI
// housekeeping (display refresh, LED timing); input and output sides share
// the same block-processing priority so neither can preempt the other.

/// Priority of the transfer-engine completion interrupts.
pub const DMA_INTERRUPT_PRIORITY: u8 = 10;

/// Priority at which the registered block-processing callback runs, for both
/// the input and the output direction.
pub const BLOCK_PROCESS_PRIORITY: u8 = 20;

// ── Cache geometry ─────────────────────────────────────────────────────────

/// Data cache line size in bytes (Cortex-M7).
pub const CACHE_LINE_BYTES: usize = 32;

/// Number of 16-bit samples per cache line.
pub const CACHE_LINE_SAMPLES: usize =
    CACHE_LINE_BYTES / core::mem::size_of::<i16>();
