//! External trigger controller register and bitfield definitions.
//!
//! The trigger controller (ADC_ETC on the i.MX RT1062) routes periodic timer
//! events to hardware-triggered ADC conversions. Field layouts follow the
//! reference manual, chapter "ADC External Trigger Control".

// Trigger channels 0..8 exist; only 4..8 feed the second ADC instance and
// some fields (pre-divider, DMA mode) live in the shared control register.
#![allow(dead_code)]

// ── CTRL: global control ───────────────────────────────────────────────────

/// Software reset. Held set, the whole controller is in reset.
pub const CTRL_SOFTRST: u32 = 1 << 31;

/// Touch-screen bypass. Must be cleared, after clearing soft reset, for the
/// second ADC instance to be reachable at all.
pub const CTRL_TSC_BYPASS: u32 = 1 << 30;

/// Pulsed (rather than level) DMA request generation.
pub const CTRL_DMA_MODE_SEL: u32 = 1 << 29;

/// Enable mask for trigger channels 0..=7.
pub const fn ctrl_trig_enable(mask: u32) -> u32 {
    mask & 0xFF
}

// ── DMA_CTRL: per-trigger DMA request enable ───────────────────────────────

/// Enable DMA requests for one trigger channel.
pub const fn dma_ctrl_triq_enable(channel: u32) -> u32 {
    1 << (channel & 0x7)
}

// ── TRIGn_CTRL: per-trigger configuration ──────────────────────────────────

/// Chain length field: number of conversions per trigger, minus one.
pub const fn trig_ctrl_chain(length: u32) -> u32 {
    ((length - 1) & 0x7) << 8
}

/// Trigger priority field, 0 (lowest) ..= 7 (highest).
pub const fn trig_ctrl_priority(priority: u32) -> u32 {
    (priority & 0x7) << 12
}

/// Highest arbitration priority a trigger channel can carry.
pub const TRIG_PRIORITY_MAX: u32 = 7;

// ── TRIGn_CHAIN_1_0: chain steps 0 and 1 ───────────────────────────────────

/// Step 0: ADC input channel select.
pub const fn chain_csel0(adc_channel: u32) -> u32 {
    adc_channel & 0xF
}

/// Step 0: hardware trigger select bitmask into the target ADC.
pub const fn chain_hwts0(mask: u32) -> u32 {
    (mask & 0xFF) << 4
}

/// Step 0: back-to-back mode; no inter-step wait before the conversion.
pub const CHAIN_B2B0: u32 = 1 << 12;
