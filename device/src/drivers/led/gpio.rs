use crate::traits::led::Led;
use embedded_hal::digital::OutputPin;

/// Status LED on an active-high GPIO output.
pub struct GpioLed<P>
where
    P: OutputPin,
{
    pin: P,
    state: bool,
}

impl<P> GpioLed<P>
where
    P: OutputPin,
{
    /// Takes the pin and drives it low so the LED starts off.
    pub fn new(mut pin: P) -> Result<Self, P::Error> {
        pin.set_low()?;
        Ok(Self { pin, state: false })
    }

    fn set(&mut self, state: bool) -> Result<(), P::Error> {
        match state {
            true => self.pin.set_high(),
            false => self.pin.set_low(),
        }?;
        self.state = state;
        Ok(())
    }

    pub fn release(self) -> P {
        self.pin
    }
}

impl<P> Led for GpioLed<P>
where
    P: OutputPin,
{
    type Error = P::Error;

    fn on(&mut self) -> Result<(), Self::Error> {
        self.set(true)
    }

    fn off(&mut self) -> Result<(), Self::Error> {
        self.set(false)
    }

    fn state(&self) -> Result<bool, Self::Error> {
        Ok(self.state)
    }
}
