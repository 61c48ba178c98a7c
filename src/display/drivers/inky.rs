/*
 *  display/drivers/inky.rs
 *
 *  inkstat - meeting room status on e-paper
 *  (c) 2020-26 Stuart Hunter
 *
 *  Inky pHAT panel drivers - full (slow) and partial (fast) refresh
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiDevice;
use inkstat_driver_inky::{pack, Ink, Inky, Planes, Waveform};
use linux_embedded_hal::gpio_cdev::{Chip, LineRequestFlags};
use linux_embedded_hal::spidev::{SpiModeFlags, SpidevOptions};
use linux_embedded_hal::{CdevPin, Delay, SpidevDevice};
use log::{debug, info};

use crate::config::PanelSettings;
use crate::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use crate::display::color::{InkyColor, PanelColour};
use crate::display::error::DisplayError;
use crate::display::traits::{check_frame_size, PanelCapabilities, PanelDriver};
use crate::func_timer::FunctionTimer;
use crate::refresh::RefreshMode;
use crate::vframebuf::Frame;

/// The controller wired to a Raspberry Pi through spidev and the GPIO character device
pub type HardwareInky = Inky<SpidevDevice, CdevPin, CdevPin, CdevPin>;

/// Open the SPI device and claim the reset, data/command and busy lines.
pub fn open_hardware(s: &PanelSettings) -> Result<HardwareInky, DisplayError> {
    let mut spi = SpidevDevice::open(&s.spi_bus).map_err(|e| {
        DisplayError::InitializationFailed(format!("opening {}: {}", s.spi_bus, e))
    })?;
    let options = SpidevOptions::new()
        .bits_per_word(8)
        .max_speed_hz(s.spi_speed_hz)
        .mode(SpiModeFlags::SPI_MODE_0)
        .build();
    spi.configure(&options)?;

    let mut chip = Chip::new(&s.gpio_chip)?;
    let reset = CdevPin::new(chip.get_line(s.reset_pin)?.request(LineRequestFlags::OUTPUT, 1, "inkstat-reset")?)?;
    let dc = CdevPin::new(chip.get_line(s.dc_pin)?.request(LineRequestFlags::OUTPUT, 0, "inkstat-dc")?)?;
    let busy = CdevPin::new(chip.get_line(s.busy_pin)?.request(LineRequestFlags::INPUT, 0, "inkstat-busy")?)?;

    debug!(
        "inky on {} @ {}Hz, reset {} dc {} busy {}",
        s.spi_bus, s.spi_speed_hz, s.reset_pin, s.dc_pin, s.busy_pin
    );
    Ok(Inky::new(spi, dc, reset, busy, s.colour.into()))
}

/// Shared state of both refresh flavours: the controller, a delay source and
/// the staged frame in panel order.
struct InkyCore<SPI, DC, RST, BUSY, D> {
    inky: Inky<SPI, DC, RST, BUSY>,
    delay: D,
    capabilities: PanelCapabilities,
    staged: Option<Vec<Ink>>,
}

impl<SPI, DC, RST, BUSY, D> InkyCore<SPI, DC, RST, BUSY, D>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
    BUSY: InputPin,
    D: DelayNs,
{
    fn new(inky: Inky<SPI, DC, RST, BUSY>, delay: D, colour: PanelColour, name: &'static str) -> Self {
        Self {
            inky,
            delay,
            capabilities: PanelCapabilities {
                width: DISPLAY_WIDTH,
                height: DISPLAY_HEIGHT,
                colour,
                name,
            },
            staged: None,
        }
    }

    fn stage(&mut self, frame: &Frame) -> Result<(), DisplayError> {
        check_frame_size(&self.capabilities, frame)?;
        self.staged = Some(frame.as_slice().iter().map(|&c| Ink::from(c)).collect());
        Ok(())
    }

    fn push(&mut self, waveform: Waveform, fold_accent: bool) -> Result<(), DisplayError> {
        let _timer = FunctionTimer::new("inky refresh");
        let pixels = self.staged.as_deref().ok_or(DisplayError::NothingStaged)?;
        let planes: Planes = pack(pixels, fold_accent)?;
        self.inky.update(&planes, waveform, &mut self.delay)?;
        Ok(())
    }
}

/// Full refresh: all three pigments, the long flashing waveform, clears ghosting.
pub struct InkyPhat<SPI, DC, RST, BUSY, D> {
    core: InkyCore<SPI, DC, RST, BUSY, D>,
}

impl InkyPhat<SpidevDevice, CdevPin, CdevPin, CdevPin, Delay> {
    pub fn open(settings: &PanelSettings) -> Result<Self, DisplayError> {
        info!("Inky pHAT ({:?}) full refresh", settings.colour);
        Ok(Self::new(open_hardware(settings)?, Delay {}, settings.colour))
    }
}

impl<SPI, DC, RST, BUSY, D> InkyPhat<SPI, DC, RST, BUSY, D>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
    BUSY: InputPin,
    D: DelayNs,
{
    pub fn new(inky: Inky<SPI, DC, RST, BUSY>, delay: D, colour: PanelColour) -> Self {
        Self { core: InkyCore::new(inky, delay, colour, "inky-phat") }
    }
}

impl<SPI, DC, RST, BUSY, D> PanelDriver for InkyPhat<SPI, DC, RST, BUSY, D>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
    BUSY: InputPin,
    D: DelayNs,
{
    fn capabilities(&self) -> &PanelCapabilities {
        &self.core.capabilities
    }

    fn refresh_mode(&self) -> RefreshMode {
        RefreshMode::Slow
    }

    fn set_border(&mut self, colour: InkyColor) {
        self.core.inky.set_border(colour.into());
    }

    fn set_image(&mut self, frame: &Frame) -> Result<(), DisplayError> {
        self.core.stage(frame)
    }

    fn show(&mut self) -> Result<(), DisplayError> {
        // black/white panels have no accent pigment to drive
        let fold = self.core.capabilities.colour == PanelColour::Black;
        self.core.push(Waveform::Full, fold)
    }
}

/// Partial refresh: black and white only, short waveform, ghosts over time.
///
/// Accent pixels are drawn black and the accent plane is left empty.
pub struct InkyPhatFast<SPI, DC, RST, BUSY, D> {
    core: InkyCore<SPI, DC, RST, BUSY, D>,
}

impl InkyPhatFast<SpidevDevice, CdevPin, CdevPin, CdevPin, Delay> {
    pub fn open(settings: &PanelSettings) -> Result<Self, DisplayError> {
        info!("Inky pHAT ({:?}) fast refresh", settings.colour);
        Ok(Self::new(open_hardware(settings)?, Delay {}, settings.colour))
    }
}

impl<SPI, DC, RST, BUSY, D> InkyPhatFast<SPI, DC, RST, BUSY, D>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
    BUSY: InputPin,
    D: DelayNs,
{
    pub fn new(inky: Inky<SPI, DC, RST, BUSY>, delay: D, colour: PanelColour) -> Self {
        Self { core: InkyCore::new(inky, delay, colour, "inky-phat-fast") }
    }
}

impl<SPI, DC, RST, BUSY, D> PanelDriver for InkyPhatFast<SPI, DC, RST, BUSY, D>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
    BUSY: InputPin,
    D: DelayNs,
{
    fn capabilities(&self) -> &PanelCapabilities {
        &self.core.capabilities
    }

    fn refresh_mode(&self) -> RefreshMode {
        RefreshMode::Fast
    }

    fn set_border(&mut self, colour: InkyColor) {
        self.core.inky.set_border(colour.into());
    }

    fn set_image(&mut self, frame: &Frame) -> Result<(), DisplayError> {
        self.core.stage(frame)
    }

    fn show(&mut self) -> Result<(), DisplayError> {
        self.core.push(Waveform::Fast, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::prelude::*;
    use embedded_hal::digital::{ErrorType as PinErrorType, PinState};
    use embedded_hal::spi::{ErrorType as SpiErrorType, Operation};
    use inkstat_driver_inky::{lut_for, Variant, PLANE_BYTES};
    use std::convert::Infallible;
    use std::sync::{Arc, Mutex};

    /// SPI double that keeps every write, in order.
    #[derive(Clone, Default)]
    struct RecordingSpi(Arc<Mutex<Vec<Vec<u8>>>>);

    impl SpiErrorType for RecordingSpi {
        type Error = Infallible;
    }

    impl SpiDevice for RecordingSpi {
        fn transaction(&mut self, ops: &mut [Operation<'_, u8>]) -> Result<(), Infallible> {
            for op in ops {
                if let Operation::Write(bytes) = op {
                    self.0.lock().unwrap().push(bytes.to_vec());
                }
            }
            Ok(())
        }
    }

    struct Pin;

    impl PinErrorType for Pin {
        type Error = Infallible;
    }

    impl OutputPin for Pin {
        fn set_low(&mut self) -> Result<(), Infallible> { Ok(()) }
        fn set_high(&mut self) -> Result<(), Infallible> { Ok(()) }
        fn set_state(&mut self, _: PinState) -> Result<(), Infallible> { Ok(()) }
    }

    impl InputPin for Pin {
        fn is_high(&mut self) -> Result<bool, Infallible> { Ok(false) }
        fn is_low(&mut self) -> Result<bool, Infallible> { Ok(true) }
    }

    struct NoDelay;

    impl DelayNs for NoDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    fn controller(variant: Variant) -> (Inky<RecordingSpi, Pin, Pin, Pin>, RecordingSpi) {
        let spi = RecordingSpi::default();
        (Inky::new(spi.clone(), Pin, Pin, Pin, variant), spi)
    }

    /// Payload written right after `command`, the last time it was sent.
    fn payload_after(writes: &[Vec<u8>], command: u8) -> Option<Vec<u8>> {
        writes
            .windows(2)
            .rev()
            .find(|w| w[0] == [command])
            .map(|w| w[1].clone())
    }

    fn accent_frame() -> Frame {
        let mut frame = Frame::new(DISPLAY_WIDTH, DISPLAY_HEIGHT, InkyColor::White);
        Pixel(Point::new(0, 0), InkyColor::Accent).draw(&mut frame).unwrap();
        frame
    }

    #[test]
    fn test_slow_uses_full_waveform_and_accent_plane() {
        let (inky, spi) = controller(Variant::Red);
        let mut panel = InkyPhat::new(inky, NoDelay, PanelColour::Red);
        assert_eq!(panel.refresh_mode(), RefreshMode::Slow);

        panel.set_border(InkyColor::Accent);
        panel.set_image(&accent_frame()).unwrap();
        panel.show().unwrap();

        let writes = spi.0.lock().unwrap().clone();
        assert_eq!(payload_after(&writes, 0x32).unwrap(), lut_for(Variant::Red, Waveform::Full).to_vec());
        assert_eq!(payload_after(&writes, 0x3C).unwrap(), vec![0x73]);
        let accent = payload_after(&writes, 0x26).unwrap();
        assert_eq!(accent.len(), PLANE_BYTES);
        assert_eq!(accent.iter().map(|b| b.count_ones()).sum::<u32>(), 1);
    }

    #[test]
    fn test_fast_folds_accent_into_black() {
        let (inky, spi) = controller(Variant::Red);
        let mut panel = InkyPhatFast::new(inky, NoDelay, PanelColour::Red);
        assert_eq!(panel.refresh_mode(), RefreshMode::Fast);

        panel.set_image(&accent_frame()).unwrap();
        panel.show().unwrap();

        let writes = spi.0.lock().unwrap().clone();
        assert_eq!(payload_after(&writes, 0x32).unwrap(), lut_for(Variant::Red, Waveform::Fast).to_vec());
        let accent = payload_after(&writes, 0x26).unwrap();
        assert!(accent.iter().all(|&b| b == 0));
        let black = payload_after(&writes, 0x24).unwrap();
        // exactly one pixel is black, every other bit stays set
        assert_eq!(black.iter().map(|b| b.count_zeros()).sum::<u32>(), 1);
    }

    #[test]
    fn test_show_before_set_image() {
        let (inky, spi) = controller(Variant::Black);
        let mut panel = InkyPhat::new(inky, NoDelay, PanelColour::Black);
        assert!(matches!(panel.show(), Err(DisplayError::NothingStaged)));
        assert!(spi.0.lock().unwrap().is_empty());
    }

    #[test]
    fn test_nothing_sent_before_show() {
        let (inky, spi) = controller(Variant::Yellow);
        let mut panel = InkyPhatFast::new(inky, NoDelay, PanelColour::Yellow);
        panel.set_border(InkyColor::Black);
        panel.set_image(&Frame::new(DISPLAY_WIDTH, DISPLAY_HEIGHT, InkyColor::White)).unwrap();
        assert!(spi.0.lock().unwrap().is_empty());
        assert!(matches!(
            panel.set_image(&Frame::new(10, 10, InkyColor::White)),
            Err(DisplayError::BufferSizeMismatch { .. })
        ));
    }
}
