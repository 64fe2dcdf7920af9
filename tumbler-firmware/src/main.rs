//! Tumbler - Combination Lock Cracking Machine Firmware
//!
//! Main firmware binary for a Raspberry Pi Pico driving a dial stepper, a
//! shackle puller servo and a limit switch. Tries every legal combination
//! until the shackle opens.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_time::Delay;
use {defmt_rtt as _, panic_probe as _};

use tumbler_core::config::MachineConfig;
use tumbler_core::control::Mechanism;
use tumbler_core::controller::Controller;
use tumbler_core::state::InputEvent;
use tumbler_drivers::{GpioLimitSwitch, PwmServo, ServoTiming, StepDirConfig, StepDirStepper};
use tumbler_hal_rp2040::flash::FlashStorage;
use tumbler_hal_rp2040::pwm::servo_output;

mod board;
mod channels;
mod settings;
mod tasks;

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Tumbler firmware starting...");

    // Initialize RP2040 peripherals
    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // Load calibration from flash; missing values are healed by the core
    let mut storage = FlashStorage::new(p.FLASH, p.DMA_CH0);
    let settings = settings::load_settings(&mut storage).await;
    info!("Settings loaded");

    let config = MachineConfig::default();
    info!(
        "Dial: {} positions, {} zones, {} steps/rev",
        config.dial.positions, config.dial.zones, config.dial.steps_per_rev
    );

    // Stepper starts disabled (EN high) and clockwise (DIR low)
    let stepper = StepDirStepper::new(
        Output::new(p.PIN_2, Level::Low),
        Output::new(p.PIN_3, Level::Low),
        Output::new(p.PIN_4, Level::High),
        Delay,
        StepDirConfig::default(),
    );

    let pwm = unwrap!(servo_output(p.PWM_SLICE7, p.PIN_14));
    let servo = PwmServo::new(pwm, ServoTiming::default());

    let limit_switch = GpioLimitSwitch::new(Input::new(p.PIN_15, Pull::Down), true);
    info!("Actuators initialized");

    let mechanism = Mechanism::new(stepper, servo, limit_switch, &config);
    let controller = Controller::new(mechanism, settings, config);

    let buttons = [
        (Input::new(p.PIN_10, Pull::Up), InputEvent::Next),
        (Input::new(p.PIN_11, Pull::Up), InputEvent::Previous),
        (Input::new(p.PIN_12, Pull::Up), InputEvent::Select),
        (Input::new(p.PIN_13, Pull::Up), InputEvent::Back),
    ];

    // Spawn tasks
    spawner.spawn(tasks::tick_task()).unwrap();
    for (button, event) in buttons {
        spawner.spawn(tasks::button_task(button, event)).unwrap();
    }
    spawner.spawn(tasks::settings_task(storage)).unwrap();
    spawner.spawn(tasks::controller_task(controller)).unwrap();

    info!("All tasks spawned, firmware running");

    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}
