//! # amp-audio
//!
//! A `no_std`, zero-allocation real-time audio front end for a
//! [Teensy 4.x](https://www.pjrc.com/teensy/) (i.MX RT1062, Cortex-M7)
//! multi-effect guitar amplifier. It owns everything between the analog
//! input pin and the application's block-processing hook: the audio clock
//! tree, the hardware trigger chain, the ADC acquisition lifecycle, and
//! double-buffered block dispatch in both directions.
//!
//! In steady state no instruction executes per sample. A hardware timer
//! triggers one ADC conversion per sample period through the external
//! trigger controller, DMA moves results into a double buffer, and the CPU
//! wakes once per 128-sample block to run the registered hook.
//!
//! ## Architecture
//!
//! | Layer | Module | Purpose |
//! |-------|--------|---------|
//! | Timing | [`constants`] / [`clocks`] | Clock tree parameters, verified at build time |
//! | Dispatch | [`callback`] | Allocation-free callback handles for interrupt context |
//! | Trigger | [`trigger`] | Timer-tick to hardware-conversion trigger chain |
//! | Acquisition | [`adc`] | ADC configuration, calibration and lifecycle |
//! | I/O | [`io`] | Double buffers, input/output drivers, block dispatch |
//!
//! ## Quick start
//!
//! ```ignore
//! use amp_audio::callback::ContextCallback;
//! use amp_audio::constants;
//! use amp_audio::io::{AudioInputAdc, DmaHalf, DoubleBuffer, SampleBlock};
//!
//! static mut INPUT_BUFFER: DoubleBuffer = DoubleBuffer::new();
//!
//! fn process_block(block: &SampleBlock) {
//!     // 128 samples, 2.67 ms of audio, immutable for the call
//! }
//!
//! let mut input = AudioInputAdc::new(etc_regs, adc_regs);
//! input.init()?; // blocks once for ADC self-calibration
//! input.attach_interrupt(
//!     ContextCallback::from_fn(process_block),
//!     constants::BLOCK_PROCESS_PRIORITY,
//! );
//! input.start()?;
//!
//! // From the DMA half/complete interrupt handlers:
//! input.half_complete(&INPUT_BUFFER, DmaHalf::First);
//! ```
//!
//! ## Features
//!
//! | Feature | Default | Enables |
//! |---------|---------|---------|
//! | `defmt` | no | Deferred-format logging from the drivers |
//!
//! ## Audio parameters
//!
//! - **Block size:** 128 samples ([`constants::PROCESSING_BLOCK_SIZE`])
//! - **Sample rate:** 48 000 Hz ([`constants::AUDIO_SAMPLE_RATE_HZ`])
//! - **Sample format:** `i16` (signed 16-bit)
//! - **Block rate:** 375 blocks per second per direction

#![no_std]

pub mod constants;
pub mod clocks;
pub mod callback;
pub mod trigger;
pub mod adc;
pub mod io;
