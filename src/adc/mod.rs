//! Acquisition state machine for the conversion peripheral.
//!
//! Owns the ADC instance that samples the analog input. The life of the
//! peripheral is strictly linear:
//!
//! ```text
//! Unconfigured ──configure()──► Configured ──calibrate()──► Ready
//!                                     │                       │
//!                                     └──► Failed (terminal)  └──start()──► Sampling
//! ```
//!
//! Configuration writes resolution, hardware averaging, the hardware
//! trigger source (the external trigger controller, never a software
//! trigger) and the clock selection. Calibration is the single blocking
//! operation in the crate: a busy-poll until the peripheral clears its
//! calibration bit, performed exactly once at initialization, off the
//! real-time path. A failed calibration is fatal; the state machine parks
//! in `Failed`, `start` refuses to arm, and no conversion result is ever
//! trusted. There is no path back to `Unconfigured`; re-initialization is
//! not a supported transition.
//!
//! In steady state every trigger event produces one conversion whose result
//! the transfer engine moves into the double buffer; the
//! conversion-complete interrupt stays disabled throughout.
//!
//! The driver is generic over [`AdcBus`], the register access seam, for the
//! same reason the trigger chain is: firmware implements it with volatile
//! register access, tests with a simulated peripheral.

pub mod registers;

use num_enum::TryFromPrimitive;

use registers as reg;

/// Registers of the conversion peripheral touched by this driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdcRegister {
    /// Configuration (resolution, averaging, trigger, clocking).
    Cfg,
    /// General control (calibrate, averaging enable, clock enable).
    Gc,
    /// General status (calibration failure, conversion active).
    Gs,
    /// Hardware trigger control word 0.
    Hc0,
}

/// Register access seam for the conversion peripheral.
pub trait AdcBus {
    fn read(&mut self, reg: AdcRegister) -> u32;
    fn write(&mut self, reg: AdcRegister, value: u32);
}

/// Conversion resolution in bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Resolution {
    Bits8 = 8,
    Bits10 = 10,
    Bits12 = 12,
}

impl Resolution {
    const fn field(self) -> u32 {
        match self {
            Resolution::Bits8 => 0,
            Resolution::Bits10 => 1,
            Resolution::Bits12 => 2,
        }
    }
}

/// Hardware averaging factor. The peripheral supports exactly these counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum AverageCount {
    Avg4 = 4,
    Avg8 = 8,
    Avg16 = 16,
    Avg32 = 32,
}

impl AverageCount {
    const fn field(self) -> u32 {
        match self {
            AverageCount::Avg4 => 0,
            AverageCount::Avg8 => 1,
            AverageCount::Avg16 => 2,
            AverageCount::Avg32 => 3,
        }
    }
}

/// Input clock selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockSource {
    /// Peripheral bus clock.
    Ipg,
    /// Peripheral bus clock divided by two.
    IpgDiv2,
    /// The ADC's own asynchronous clock, independent of bus scaling.
    Async,
}

impl ClockSource {
    const fn field(self) -> u32 {
        match self {
            ClockSource::Ipg => 0,
            ClockSource::IpgDiv2 => 1,
            ClockSource::Async => 3,
        }
    }
}

/// Peripheral settings fixed at initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdcConfig {
    pub resolution: Resolution,
    pub average: AverageCount,
    pub clock: ClockSource,
    /// Input clock divider select (0=÷1 .. 3=÷8).
    pub clock_div: u32,
    /// Sample-time duration select (0..=3).
    pub sample_time: u32,
    /// Extend the sample window for high source impedance.
    pub long_sample: bool,
    /// High-speed conversion mode.
    pub high_speed: bool,
}

impl AdcConfig {
    /// Settings used by the audio front end: 12-bit conversions with 16x
    /// hardware averaging off the asynchronous clock, long sample window,
    /// high-speed mode.
    pub const fn audio() -> Self {
        Self {
            resolution: Resolution::Bits12,
            average: AverageCount::Avg16,
            clock: ClockSource::Async,
            clock_div: 0,
            sample_time: 0,
            long_sample: true,
            high_speed: true,
        }
    }

    /// Assemble the configuration register word. Hardware triggering is
    /// always selected; software triggers have no place in this design.
    pub const fn config_word(&self) -> u32 {
        let mut word = reg::cfg_avgs(self.average.field())
            | reg::cfg_mode(self.resolution.field())
            | reg::CFG_ADTRG
            | reg::cfg_adiclk(self.clock.field())
            | reg::cfg_adiv(self.clock_div)
            | reg::cfg_adsts(self.sample_time);
        if self.long_sample {
            word |= reg::CFG_ADLSMP;
        }
        if self.high_speed {
            word |= reg::CFG_ADHSC;
        }
        word
    }
}

impl Default for AdcConfig {
    fn default() -> Self {
        Self::audio()
    }
}

/// Acquisition lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AcquisitionState {
    Unconfigured,
    Configured,
    Calibrating,
    Ready,
    Sampling,
    /// Calibration failed; terminal.
    Failed,
}

/// Errors surfaced by the acquisition state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AcquisitionError {
    /// The peripheral's self-calibration reported failure. Fatal: sample
    /// values cannot be trusted and the sample path must never be armed.
    #[error("conversion peripheral self-calibration failed")]
    CalibrationFailed,
    /// `start` was requested before calibration completed successfully.
    #[error("acquisition not ready to be armed")]
    NotReady,
}

/// Driver owning one conversion peripheral instance.
pub struct Acquisition<B: AdcBus> {
    bus: B,
    config: AdcConfig,
    state: AcquisitionState,
}

impl<B: AdcBus> Acquisition<B> {
    /// Take ownership of the peripheral bus. No register is touched yet.
    pub const fn new(bus: B, config: AdcConfig) -> Self {
        Self {
            bus,
            config,
            state: AcquisitionState::Unconfigured,
        }
    }

    /// Configure and calibrate, in that order. Blocks for the duration of
    /// the hardware self-calibration (once, at initialization).
    pub fn init(&mut self) -> Result<(), AcquisitionError> {
        self.configure();
        self.calibrate()
    }

    /// Write the full peripheral configuration.
    ///
    /// The conversion-complete interrupt stays disabled: results leave the
    /// peripheral through the transfer engine, not through software.
    fn configure(&mut self) {
        self.bus.write(AdcRegister::Cfg, self.config.config_word());

        // Conversions arrive from the external trigger controller.
        self.bus
            .write(AdcRegister::Hc0, reg::hc_adch(reg::ADCH_EXTERNAL_TRIGGER));

        // Hardware averaging plus the asynchronous clock. The peripheral's
        // own DMA request stays off; requests come pulsed from the trigger
        // controller.
        self.bus
            .write(AdcRegister::Gc, reg::GC_AVGE | reg::GC_ADACKEN);

        self.state = AcquisitionState::Configured;
    }

    /// One-time blocking self-calibration.
    ///
    /// Sets the calibration bit and busy-polls until the peripheral clears
    /// it (bounded by hardware at a few thousand ADCK cycles). On the
    /// failure flag the machine parks in `Failed` and the error propagates;
    /// there is no retry.
    fn calibrate(&mut self) -> Result<(), AcquisitionError> {
        self.state = AcquisitionState::Calibrating;

        let gc = self.bus.read(AdcRegister::Gc);
        self.bus.write(AdcRegister::Gc, gc | reg::GC_CAL);
        while self.bus.read(AdcRegister::Gc) & reg::GC_CAL != 0 {}

        if self.bus.read(AdcRegister::Gs) & reg::GS_CALF != 0 {
            self.state = AcquisitionState::Failed;
            #[cfg(feature = "defmt")]
            defmt::error!("ADC self-calibration failed; sample path not armed");
            return Err(AcquisitionError::CalibrationFailed);
        }

        self.state = AcquisitionState::Ready;
        #[cfg(feature = "defmt")]
        defmt::debug!("ADC calibrated and ready");
        Ok(())
    }

    /// Arm the peripheral for externally triggered conversions.
    ///
    /// Decoupled from `init` so the caller controls the relative order in
    /// which the input and output paths start.
    pub fn start(&mut self) -> Result<(), AcquisitionError> {
        if self.state != AcquisitionState::Ready {
            return Err(AcquisitionError::NotReady);
        }
        self.state = AcquisitionState::Sampling;
        Ok(())
    }

    /// Current lifecycle state.
    pub const fn state(&self) -> AcquisitionState {
        self.state
    }

    /// The configuration the peripheral was initialized with.
    pub const fn config(&self) -> AdcConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Simulated peripheral: calibration holds the CAL bit for a fixed
    /// number of polls, then clears it and optionally raises the failure
    /// flag.
    pub(crate) struct SimAdc {
        cfg: u32,
        gc: u32,
        gs: u32,
        hc0: u32,
        cal_polls: u32,
        fail_calibration: bool,
    }

    impl SimAdc {
        pub(crate) fn new(cal_polls: u32, fail_calibration: bool) -> Self {
            Self {
                cfg: 0,
                gc: 0,
                gs: 0,
                hc0: 0,
                cal_polls,
                fail_calibration,
            }
        }
    }

    impl AdcBus for SimAdc {
        fn read(&mut self, reg: AdcRegister) -> u32 {
            match reg {
                AdcRegister::Cfg => self.cfg,
                AdcRegister::Gc => {
                    if self.gc & registers::GC_CAL != 0 {
                        if self.cal_polls == 0 {
                            self.gc &= !registers::GC_CAL;
                            if self.fail_calibration {
                                self.gs |= registers::GS_CALF;
                            }
                        } else {
                            self.cal_polls -= 1;
                        }
                    }
                    self.gc
                }
                AdcRegister::Gs => self.gs,
                AdcRegister::Hc0 => self.hc0,
            }
        }

        fn write(&mut self, reg: AdcRegister, value: u32) {
            match reg {
                AdcRegister::Cfg => self.cfg = value,
                AdcRegister::Gc => self.gc = value,
                AdcRegister::Gs => self.gs = value,
                AdcRegister::Hc0 => self.hc0 = value,
            }
        }
    }

    #[test]
    fn audio_config_word_matches_field_layout() {
        let word = AdcConfig::audio().config_word();

        assert_eq!(word & (0x3 << 14), 2 << 14, "16x averaging");
        assert_eq!(word & (0x3 << 2), 2 << 2, "12-bit mode");
        assert_ne!(word & registers::CFG_ADTRG, 0, "hardware trigger");
        assert_eq!(word & 0x3, 3, "asynchronous clock");
        assert_ne!(word & registers::CFG_ADLSMP, 0, "long sample");
        assert_ne!(word & registers::CFG_ADHSC, 0, "high speed");
        assert_eq!(word & (0x3 << 5), 0, "divider 1");
    }

    #[test]
    fn successful_calibration_reaches_ready() {
        let mut acq = Acquisition::new(SimAdc::new(5, false), AdcConfig::audio());
        assert_eq!(acq.state(), AcquisitionState::Unconfigured);

        acq.init().unwrap();
        assert_eq!(acq.state(), AcquisitionState::Ready);
    }

    #[test]
    fn calibration_waits_only_for_the_simulated_duration() {
        // An immediate clear completes as well as a long one; the poll loop
        // exits exactly when the peripheral clears the bit.
        for polls in [0u32, 1, 100] {
            let mut acq = Acquisition::new(SimAdc::new(polls, false), AdcConfig::audio());
            acq.init().unwrap();
            assert_eq!(acq.state(), AcquisitionState::Ready);
        }
    }

    #[test]
    fn failed_calibration_is_fatal_and_never_arms() {
        let mut acq = Acquisition::new(SimAdc::new(3, true), AdcConfig::audio());

        assert_eq!(acq.init(), Err(AcquisitionError::CalibrationFailed));
        assert_eq!(acq.state(), AcquisitionState::Failed);

        // The sample path must refuse to arm.
        assert_eq!(acq.start(), Err(AcquisitionError::NotReady));
        assert_eq!(acq.state(), AcquisitionState::Failed);
    }

    #[test]
    fn start_is_gated_on_ready() {
        let mut acq = Acquisition::new(SimAdc::new(0, false), AdcConfig::audio());
        assert_eq!(acq.start(), Err(AcquisitionError::NotReady));

        acq.init().unwrap();
        acq.start().unwrap();
        assert_eq!(acq.state(), AcquisitionState::Sampling);
    }

    #[test]
    fn configure_selects_the_external_trigger_source() {
        let mut acq = Acquisition::new(SimAdc::new(0, false), AdcConfig::audio());
        acq.init().unwrap();

        assert_eq!(acq.bus.hc0 & 0x1F, registers::ADCH_EXTERNAL_TRIGGER);
        // Conversion-complete interrupt deliberately left disabled.
        assert_eq!(acq.bus.hc0 & registers::HC_AIEN, 0);
        // Averaging and the asynchronous clock are enabled; the ADC's own
        // DMA request is not.
        assert_ne!(acq.bus.gc & registers::GC_AVGE, 0);
        assert_ne!(acq.bus.gc & registers::GC_ADACKEN, 0);
        assert_eq!(acq.bus.gc & registers::GC_DMAEN, 0);
    }

    #[test]
    fn discrete_setting_sets_are_enforced() {
        assert!(AverageCount::try_from(16u8).is_ok());
        assert!(AverageCount::try_from(2u8).is_err());
        assert!(AverageCount::try_from(64u8).is_err());
        assert!(Resolution::try_from(12u8).is_ok());
        assert!(Resolution::try_from(14u8).is_err());
    }
}
