//! Hardware trigger chain: one conversion request per timer tick, no CPU.
//!
//! A periodic timer tick enters the external trigger controller, which
//! arbitrates it and raises a hardware conversion request at the ADC. In
//! steady state no instruction executes per sample; the CPU only sees the
//! DMA half-buffer completion interrupts, once per processing block.
//!
//! ```text
//! PIT (÷TRIGGER_TICKS_PER_SAMPLE) ──► trigger controller ──► ADC hw trigger
//!                                        chain length 1,        │
//!                                        priority 7, B2B        ▼
//!                                                          DMA request
//! ```
//!
//! [`TriggerChain`] owns the configuration sequence. It is generic over
//! [`EtcBus`], the register access seam: firmware implements it with
//! volatile writes to the controller's register block, tests implement it
//! with a recording mock. Configuration happens once at initialization and
//! is never revisited; there is no runtime failure path in this stage.
//!
//! ## Usage with RTIC
//!
//! ```ignore
//! struct EtcRegs; // newtype over the ADC_ETC register block
//!
//! impl amp_audio::trigger::EtcBus for EtcRegs {
//!     fn read(&mut self, reg: EtcRegister) -> u32 { /* volatile read */ }
//!     fn write(&mut self, reg: EtcRegister, value: u32) { /* volatile write */ }
//! }
//!
//! let mut chain = TriggerChain::new(EtcRegs, TriggerChannel::Trig4);
//! chain.init(constants::INPUT_ADC_CHANNEL);
//! ```

pub mod registers;

use num_enum::TryFromPrimitive;

use registers as reg;

/// Trigger channels that feed the second ADC instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum TriggerChannel {
    Trig4 = 4,
    Trig5 = 5,
    Trig6 = 6,
    Trig7 = 7,
}

impl TriggerChannel {
    /// Channel index within the controller.
    pub const fn index(self) -> u32 {
        self as u32
    }
}

/// Registers of the external trigger controller touched by this driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EtcRegister {
    /// Global control (reset, bypass, DMA mode, trigger enables).
    Ctrl,
    /// Per-trigger DMA request enables.
    DmaCtrl,
    /// Per-trigger control (chain length, priority).
    TrigCtrl(TriggerChannel),
    /// Chain steps 0 and 1 of a trigger.
    TrigChain10(TriggerChannel),
}

/// Register access seam for the external trigger controller.
pub trait EtcBus {
    fn read(&mut self, reg: EtcRegister) -> u32;
    fn write(&mut self, reg: EtcRegister, value: u32);
}

/// Driver for one trigger channel of the external trigger controller.
pub struct TriggerChain<B: EtcBus> {
    bus: B,
    channel: TriggerChannel,
}

impl<B: EtcBus> TriggerChain<B> {
    /// Take ownership of the controller bus for the given channel.
    pub const fn new(bus: B, channel: TriggerChannel) -> Self {
        Self { bus, channel }
    }

    /// Run the one-time configuration sequence.
    ///
    /// Ordered steps; the order is load-bearing:
    ///
    /// 1. If the controller reports soft-reset or bypass, write the control
    ///    register to zero twice. The two bits share the register but the
    ///    hardware requires them cleared in sequence (reset first, then
    ///    bypass), so a single write is not sufficient.
    /// 2. Enable this trigger channel with pulsed DMA request generation.
    /// 3. Enable the channel's DMA request line.
    /// 4. Program a chain of length one at maximum arbitration priority, so
    ///    sampling jitter stays independent of other trigger activity.
    /// 5. Bind chain step 0 to `adc_channel` on the ADC's hardware trigger
    ///    0, back-to-back (no inter-step delay; there is only one step).
    ///
    /// `adc_channel` is the input channel at the conversion peripheral, not
    /// a board pin number.
    pub fn init(&mut self, adc_channel: u32) {
        let ch = self.channel.index();

        // Step 1: two-write reset/bypass clear.
        let ctrl = self.bus.read(EtcRegister::Ctrl);
        if ctrl & (reg::CTRL_SOFTRST | reg::CTRL_TSC_BYPASS) != 0 {
            self.bus.write(EtcRegister::Ctrl, 0); // clears SOFTRST only
            self.bus.write(EtcRegister::Ctrl, 0); // then clears TSC_BYPASS
        }

        // Steps 2 and 3: trigger enable, pulsed DMA mode, DMA request line.
        let ctrl = self.bus.read(EtcRegister::Ctrl);
        self.bus.write(
            EtcRegister::Ctrl,
            ctrl | reg::ctrl_trig_enable(1 << ch) | reg::CTRL_DMA_MODE_SEL,
        );
        let dma_ctrl = self.bus.read(EtcRegister::DmaCtrl);
        self.bus.write(
            EtcRegister::DmaCtrl,
            dma_ctrl | reg::dma_ctrl_triq_enable(ch),
        );

        // Step 4: single-conversion chain, top priority.
        self.bus.write(
            EtcRegister::TrigCtrl(self.channel),
            reg::trig_ctrl_chain(1) | reg::trig_ctrl_priority(reg::TRIG_PRIORITY_MAX),
        );

        // Step 5: chain step 0 drops into the ADC's hardware trigger 0.
        self.bus.write(
            EtcRegister::TrigChain10(self.channel),
            reg::chain_hwts0(1) | reg::chain_csel0(adc_channel) | reg::CHAIN_B2B0,
        );

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "trigger chain configured: channel {}, adc input {}",
            ch,
            adc_channel
        );
    }

    /// The trigger channel this driver was bound to.
    pub const fn channel(&self) -> TriggerChannel {
        self.channel
    }
}
