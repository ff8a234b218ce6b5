/// A status indicator that can be switched on and off.
pub trait Led {
    type Error;
    fn on(&mut self) -> Result<(), Self::Error>;
    fn off(&mut self) -> Result<(), Self::Error>;
    fn state(&self) -> Result<bool, Self::Error>;
}
