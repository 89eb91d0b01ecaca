//! Fuel injector bench tester firmware
//!
//! Single blocking control loop on an RP2040: the keypad is polled, the UI
//! state machine edits the parameters, and test runs take over the loop until
//! they finish. Board wiring and timings come from `board.toml`.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::gpio::{Level, Output};
use embassy_time::Delay;
use {defmt_rtt as _, panic_probe as _};

use injector_core::{Bench, Controller};
use injector_drivers::actuator::{GpioActuatorBus, Polarity};
use injector_drivers::keypad::AnalogKeypad;
use injector_drivers::lcd::Hd44780;
use injector_hal_rp2040::{
    EmbassyTimebase, KeypadAdc, PinBank, PinBankPeripherals, Rp2040FlashStorage, RpOutput,
    RpOutputBank,
};

mod board;

/// Level that leaves an output inactive
fn idle_level(active_low: bool) -> Level {
    Level::from(active_low)
}

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("Injector tester starting...");

    let p = embassy_rp::init(Default::default());
    let (pins, rest) = PinBankPeripherals::from_peripherals(p);
    let mut bank = PinBank::new(pins);

    // Outputs come up inactive before the actuator bus takes them over
    let pump = RpOutput::new(Output::new(
        unwrap!(bank.take(board::PUMP_PIN)),
        idle_level(board::PUMP_ACTIVE_LOW),
    ));
    let injectors = RpOutputBank::new(board::INJECTOR_PINS.map(|pin| {
        Output::new(
            unwrap!(bank.take(pin)),
            idle_level(board::INJECTORS_ACTIVE_LOW),
        )
    }));
    let actuators = GpioActuatorBus::new(
        pump,
        Polarity::from_active_low(board::PUMP_ACTIVE_LOW),
        injectors,
        Polarity::from_active_low(board::INJECTORS_ACTIVE_LOW),
    );
    info!(
        "Actuators ready: pump on GPIO{}, {} injectors",
        board::PUMP_PIN,
        actuators.injector_count()
    );

    // Held for the lifetime of main; dropping an Output releases the pin
    let _backlight = board::LCD_BACKLIGHT.map(|(pin, active_low)| {
        Output::new(unwrap!(bank.take(pin)), Level::from(!active_low))
    });
    let lcd_out = |bank: &mut PinBank, pin: u8| Output::new(unwrap!(bank.take(pin)), Level::Low);
    let rs = lcd_out(&mut bank, board::LCD_RS);
    let en = lcd_out(&mut bank, board::LCD_EN);
    let data = board::LCD_DATA.map(|pin| lcd_out(&mut bank, pin));
    let lcd = unwrap!(Hd44780::new(rs, en, data, Delay));
    info!("LCD initialized");

    let channel = unwrap!(bank.take_adc_channel(board::KEYPAD_ADC_PIN));
    let keypad = AnalogKeypad::new(KeypadAdc::new(rest.adc, channel));

    let storage = Rp2040FlashStorage::new(rest.flash);

    let bench = Bench::new(actuators, EmbassyTimebase::new(), lcd);
    let mut controller = Controller::new(bench, keypad, storage, board::TESTER_CONFIG);

    let source = controller.boot();
    info!("Boot complete: {}", source);

    loop {
        controller.tick();
    }
}
