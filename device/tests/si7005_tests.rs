#[cfg(feature = "std")]
mod tests {
    use embassy_time::Duration;
    use embedded_hal::i2c::ErrorKind;
    use field_node::drivers::i2c::TimeoutI2c;
    use field_node::drivers::sensors::si7005::{SensorError, Si7005, Stage};
    use field_node::testutil::*;
    use field_node::traits::sensors::EnvironmentSensor;
    use futures::executor::block_on;

    #[test]
    fn test_measures_through_guarded_bus() {
        let bus = FakeBus::new()
            .with_temperature([0x23, 0xA8])
            .with_humidity([0x47, 0x00])
            .with_busy_polls(7);
        let mut sensor = block_on(Si7005::initialize(TimeoutI2c::new(bus), NoopDelay::new()));
        block_on(sensor.verify()).unwrap();

        assert_eq!(21.3125, block_on(sensor.temperature()).unwrap());
        assert_eq!(47.0, block_on(sensor.humidity()).unwrap());

        let (i2c, delay) = sensor.release();
        let bus = i2c.release();
        assert_eq!(16, bus.status_reads);
        assert_eq!(14, delay.calls);
        assert_eq!(2, bus.data_reads);
    }

    #[test]
    fn test_hung_bus_reported_as_command_failure() {
        let bus = TimeoutI2c::with_timeout(FakeBus::new().hanging(), Duration::from_millis(5));
        let mut sensor = Si7005::new(bus, NoopDelay::new());

        assert_eq!(
            Err(SensorError::BusTransaction {
                stage: Stage::Command,
                kind: ErrorKind::Other,
            }),
            block_on(sensor.temperature())
        );
    }
}
