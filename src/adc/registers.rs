//! Conversion peripheral register and bitfield definitions.
//!
//! Field layouts follow the reference manual, chapter "Analog-to-Digital
//! Converter". Total conversion time is
//! `sfc_adder + average_num * (bct + lst_adder)`: the single/first
//! continuous adder (4 ADCK + 2 bus cycles), the hardware averaging factor,
//! the base conversion time (25 ADCK at 12 bits) and the long sample time
//! adder (3..25 ADCK).

// A handful of fields (low-power, overwrite-enable) are defined for
// completeness but not used by the driver.
#![allow(dead_code)]

// ── CFG: configuration ─────────────────────────────────────────────────────

/// Data overwrite enable.
pub const CFG_OVWREN: u32 = 1 << 16;

/// Hardware averaging sample-count select (0=4x, 1=8x, 2=16x, 3=32x).
pub const fn cfg_avgs(select: u32) -> u32 {
    (select & 0x3) << 14
}

/// Hardware (rather than software) conversion trigger.
pub const CFG_ADTRG: u32 = 1 << 13;

/// High-speed conversion mode.
pub const CFG_ADHSC: u32 = 1 << 10;

/// Sample-time duration select.
pub const fn cfg_adsts(select: u32) -> u32 {
    (select & 0x3) << 8
}

/// Low-power configuration.
pub const CFG_ADLPC: u32 = 1 << 7;

/// Input clock divider (0=÷1, 1=÷2, 2=÷4, 3=÷8).
pub const fn cfg_adiv(select: u32) -> u32 {
    (select & 0x3) << 5
}

/// Long sample time enable.
pub const CFG_ADLSMP: u32 = 1 << 4;

/// Conversion mode / resolution (0=8-bit, 1=10-bit, 2=12-bit).
pub const fn cfg_mode(select: u32) -> u32 {
    (select & 0x3) << 2
}

/// Input clock select (0=IPG, 1=IPG/2, 3=asynchronous ADC clock).
pub const fn cfg_adiclk(select: u32) -> u32 {
    select & 0x3
}

// ── GC: general control ────────────────────────────────────────────────────

/// Calibration start; hardware clears the bit when calibration completes.
pub const GC_CAL: u32 = 1 << 7;

/// Continuous conversion enable.
pub const GC_ADCO: u32 = 1 << 6;

/// Hardware averaging enable.
pub const GC_AVGE: u32 = 1 << 5;

/// DMA request enable (unused: requests come pulsed from the trigger
/// controller instead).
pub const GC_DMAEN: u32 = 1 << 1;

/// Asynchronous clock output enable.
pub const GC_ADACKEN: u32 = 1 << 0;

// ── GS: general status ─────────────────────────────────────────────────────

/// Calibration failed flag.
pub const GS_CALF: u32 = 1 << 1;

/// Conversion active.
pub const GS_ADACT: u32 = 1 << 0;

// ── HC0: hardware trigger control word 0 ───────────────────────────────────

/// Conversion-complete interrupt enable (left clear: delivery is DMA-driven).
pub const HC_AIEN: u32 = 1 << 7;

/// Input channel select for trigger control word 0.
pub const fn hc_adch(channel: u32) -> u32 {
    channel & 0x1F
}

/// Channel value routing conversions from the external trigger controller.
pub const ADCH_EXTERNAL_TRIGGER: u32 = 16;
