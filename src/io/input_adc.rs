//! Analog audio input: trigger chain, acquisition and block dispatch.
//!
//! [`AudioInputAdc`] composes the three input-side stages into one driver:
//! the external trigger chain converts timer ticks into hardware conversion
//! requests, the acquisition state machine owns the ADC lifecycle, and the
//! block dispatcher hands each completed half buffer to the application
//! hook. Platform glue wires the DMA half/complete interrupts to
//! [`half_complete`](AudioInputAdc::half_complete); everything else runs
//! without per-sample CPU work.
//!
//! ## Usage with RTIC
//!
//! ```ignore
//! static mut INPUT_BUFFER: DoubleBuffer = DoubleBuffer::new();
//!
//! let mut input = AudioInputAdc::new(EtcRegs, AdcRegs);
//! input.init()?;
//! input.attach_interrupt(
//!     ContextCallback::from_fn(process_block),
//!     constants::BLOCK_PROCESS_PRIORITY,
//! );
//! input.start()?;
//!
//! // DMA half-transfer ISR:
//! input.half_complete(&INPUT_BUFFER, DmaHalf::First);
//! // DMA transfer-complete ISR:
//! input.half_complete(&INPUT_BUFFER, DmaHalf::Second);
//! ```

use crate::adc::{Acquisition, AcquisitionError, AcquisitionState, AdcBus, AdcConfig};
use crate::callback::ContextCallback;
use crate::constants::INPUT_ADC_CHANNEL;
use crate::io::buffer::{DmaHalf, DoubleBuffer, SampleBlock};
use crate::io::dispatch::BlockDispatcher;
use crate::trigger::{EtcBus, TriggerChain, TriggerChannel};

/// Raw conversion result, left-aligned to the configured resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AdcCode(pub u16);

impl AdcCode {
    const FULL_SCALE: f32 = 4096.0;
    const REFERENCE_VOLTS: f32 = 3.3;

    /// Input voltage represented by a 12-bit code.
    pub fn volts(self) -> f32 {
        f32::from(self.0) / Self::FULL_SCALE * Self::REFERENCE_VOLTS
    }
}

/// Driver for the analog audio input path.
pub struct AudioInputAdc<E: EtcBus, A: AdcBus> {
    trigger: TriggerChain<E>,
    acquisition: Acquisition<A>,
    dispatch: BlockDispatcher,
    latest: Option<DmaHalf>,
}

impl<E: EtcBus, A: AdcBus> AudioInputAdc<E, A> {
    /// Take ownership of both peripheral buses. No register is touched.
    pub const fn new(etc: E, adc: A) -> Self {
        Self {
            trigger: TriggerChain::new(etc, TriggerChannel::Trig4),
            acquisition: Acquisition::new(adc, AdcConfig::audio()),
            dispatch: BlockDispatcher::new(),
            latest: None,
        }
    }

    /// Configure the trigger chain, then configure and calibrate the ADC.
    ///
    /// Blocks for the duration of the hardware self-calibration. A
    /// calibration failure is fatal: the error propagates and
    /// [`start`](Self::start) will refuse to arm.
    pub fn init(&mut self) -> Result<(), AcquisitionError> {
        self.trigger.init(INPUT_ADC_CHANNEL);
        self.acquisition.init()
    }

    /// Register the block-processing hook, overwriting any previous one.
    pub fn attach_interrupt(&mut self, handle: ContextCallback<()>, priority: u8) {
        self.dispatch.attach(handle, priority);
    }

    /// Arm the sample path and enable dispatch.
    pub fn start(&mut self) -> Result<(), AcquisitionError> {
        self.acquisition.start()?;
        self.dispatch.start();
        Ok(())
    }

    /// DMA half/complete interrupt entry point.
    ///
    /// `completed` names the half the transfer engine just finished
    /// writing; the engine is now filling the other half, so the completed
    /// block is stable for the duration of the hook.
    pub fn half_complete(&mut self, buffer: &DoubleBuffer, completed: DmaHalf) {
        self.latest = Some(completed);
        self.dispatch.dispatch(buffer.half(completed));
    }

    /// Copy the most recently completed block into `out`.
    ///
    /// Zeros `out` when no block has completed yet, so a passthrough
    /// topology stays silent instead of replaying stale data.
    pub fn read_block(&self, buffer: &DoubleBuffer, out: &mut SampleBlock) {
        match self.latest {
            Some(half) => out.copy_from_slice(buffer.half(half)),
            None => out.fill(0),
        }
    }

    /// Lifecycle state of the underlying acquisition.
    pub const fn state(&self) -> AcquisitionState {
        self.acquisition.state()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::PROCESSING_BLOCK_SIZE;

    struct NullEtc;

    impl EtcBus for NullEtc {
        fn read(&mut self, _: crate::trigger::EtcRegister) -> u32 {
            0
        }
        fn write(&mut self, _: crate::trigger::EtcRegister, _: u32) {}
    }

    struct NullAdc {
        fail_calibration: bool,
        gs: u32,
    }

    impl NullAdc {
        fn new(fail_calibration: bool) -> Self {
            Self {
                fail_calibration,
                gs: 0,
            }
        }
    }

    impl AdcBus for NullAdc {
        fn read(&mut self, reg: crate::adc::AdcRegister) -> u32 {
            match reg {
                // Calibration completes on the first poll.
                crate::adc::AdcRegister::Gc => {
                    if self.fail_calibration {
                        self.gs |= crate::adc::registers::GS_CALF;
                    }
                    0
                }
                crate::adc::AdcRegister::Gs => self.gs,
                _ => 0,
            }
        }
        fn write(&mut self, _: crate::adc::AdcRegister, _: u32) {}
    }

    fn ramp(start: i16) -> SampleBlock {
        let mut block = [0; PROCESSING_BLOCK_SIZE];
        for (i, s) in block.iter_mut().enumerate() {
            *s = start + i as i16;
        }
        block
    }

    #[test]
    fn read_block_is_silent_before_the_first_completion() {
        let input = AudioInputAdc::new(NullEtc, NullAdc::new(false));
        let mut buffer = DoubleBuffer::new();
        buffer.half_mut(DmaHalf::First).fill(1234);

        let mut out = [99; PROCESSING_BLOCK_SIZE];
        input.read_block(&buffer, &mut out);
        assert!(out.iter().all(|&s| s == 0));
    }

    #[test]
    fn read_block_tracks_the_latest_completed_half() {
        let mut input = AudioInputAdc::new(NullEtc, NullAdc::new(false));
        let mut buffer = DoubleBuffer::new();
        *buffer.half_mut(DmaHalf::First) = ramp(100);
        *buffer.half_mut(DmaHalf::Second) = ramp(-5000);

        let mut out = [0; PROCESSING_BLOCK_SIZE];

        input.half_complete(&buffer, DmaHalf::First);
        input.read_block(&buffer, &mut out);
        assert_eq!(out, ramp(100));

        input.half_complete(&buffer, DmaHalf::Second);
        input.read_block(&buffer, &mut out);
        assert_eq!(out, ramp(-5000));
    }

    #[test]
    fn start_fails_after_failed_calibration() {
        let mut input = AudioInputAdc::new(NullEtc, NullAdc::new(true));

        assert_eq!(input.init(), Err(AcquisitionError::CalibrationFailed));
        assert_eq!(input.state(), AcquisitionState::Failed);
        assert_eq!(input.start(), Err(AcquisitionError::NotReady));
    }

    #[test]
    fn adc_code_scales_to_reference_voltage() {
        assert_eq!(AdcCode(0).volts(), 0.0);

        let half_scale = AdcCode(2048).volts();
        assert!((half_scale - 1.65).abs() < 1e-5);

        let full_scale = AdcCode(4095).volts();
        assert!((full_scale - 3.3).abs() < 1e-2);
    }
}
