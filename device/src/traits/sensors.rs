/// A sensor reporting ambient temperature (°C) and relative humidity (%RH).
///
/// Each call runs one full measurement; implementations keep no reading between
/// calls.
#[allow(async_fn_in_trait)]
pub trait EnvironmentSensor {
    type Error;

    async fn temperature(&mut self) -> Result<f32, Self::Error>;

    async fn humidity(&mut self) -> Result<f32, Self::Error>;
}
