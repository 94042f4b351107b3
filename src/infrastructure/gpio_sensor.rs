use rppal::gpio::{Gpio, InputPin, Trigger};

use crate::application::{AppError, AppResult, LightSensor};

/// Light sensor digital output wired to a BCM pin.
///
/// With the internal pull-up the module pulls the line low when it sees
/// light, so activation is the falling edge.
pub struct GpioLightSensor {
    pin: InputPin,
    trigger: Trigger,
}

impl GpioLightSensor {
    pub fn open(bcm_pin: u8, pull_up: bool) -> AppResult<Self> {
        let gpio = Gpio::new().map_err(|e| AppError::Sensor(e.to_string()))?;
        let pin = gpio
            .get(bcm_pin)
            .map_err(|e| AppError::Sensor(format!("gpio {bcm_pin}: {e}")))?;

        let (pin, trigger) = if pull_up {
            (pin.into_input_pullup(), Trigger::FallingEdge)
        } else {
            (pin.into_input_pulldown(), Trigger::RisingEdge)
        };

        tracing::info!(pin = bcm_pin, pull_up, "light sensor configured");
        Ok(Self { pin, trigger })
    }
}

impl LightSensor for GpioLightSensor {
    fn on_activated(&mut self, mut callback: Box<dyn FnMut() + Send>) -> AppResult<()> {
        self.pin
            .set_async_interrupt(self.trigger, move |_level| callback())
            .map_err(|e| AppError::Sensor(e.to_string()))
    }
}
