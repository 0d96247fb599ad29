//! I/O drivers for the audio front end.
//!
//! ## Components
//!
//! | Driver | Direction | Description |
//! |--------|-----------|-------------|
//! | [`AudioInputAdc`] | in | Hardware-triggered ADC sampling with block dispatch |
//! | [`AudioOutputMqs`] | out | Double-buffered block output toward the MQS modulator |
//! | [`BlockDispatcher`] | both | Routes completed blocks to the registered hook |
//!
//! ## DMA Buffer Layout
//!
//! Both directions move data through a [`DoubleBuffer`]: two cache-aligned
//! [`SampleBlock`] halves that the transfer engine works circularly. The
//! engine raises a signal at each half boundary; platform glue forwards it
//! to the driver's `half_complete` entry point with the [`DmaHalf`] that
//! just finished. While the engine owns one half, the application owns the
//! other, so dispatched blocks are never concurrently written.

pub mod buffer;
pub mod dispatch;
pub mod input_adc;
pub mod output_mqs;

pub use buffer::{DmaHalf, DoubleBuffer, Sample, SampleBlock};
pub use dispatch::BlockDispatcher;
pub use input_adc::{AdcCode, AudioInputAdc};
pub use output_mqs::AudioOutputMqs;
