//! Main controller task
//!
//! Owns the controller. Button presses and ticks are handled in arrival
//! order, so the core never sees concurrent access.

use defmt::*;
use embassy_futures::select::{select, Either};

use tumbler_core::state::{Event, State};

use crate::board::BoardController;
use crate::channels::{SettingsWrite, INPUT_CHANNEL, SETTINGS_WRITE};
use crate::settings::storage_key;
use crate::tasks::tick::{now_ms, TICK_SIGNAL};

/// Controller task - main coordination loop
#[embassy_executor::task]
pub async fn controller_task(mut controller: BoardController) {
    info!("Controller task started");

    controller.boot();
    flush_settings(&mut controller).await;
    info!("Boot complete, entering idle state");
    show_state(&controller, now_ms());

    loop {
        match select(INPUT_CHANNEL.receive(), TICK_SIGNAL.wait()).await {
            Either::First(input) => {
                let now = now_ms();
                debug!("Input: {:?}", input);
                if let Some(event) = controller.process_input(input, now) {
                    debug!("Event: {:?}", event);
                    show_state(&controller, now);
                }
            }

            Either::Second(now) => {
                if let Some(event) = controller.tick(now) {
                    report_outcome(&controller, event, now);
                    show_state(&controller, now);
                }
            }
        }

        flush_settings(&mut controller).await;
    }
}

/// Forward settings written by the core to the flash task
async fn flush_settings(controller: &mut BoardController) {
    while let Some((setting, value)) = controller.settings_mut().take_dirty() {
        SETTINGS_WRITE
            .send(SettingsWrite {
                key: storage_key(setting),
                value,
            })
            .await;
    }
}

/// Log how a run ended
fn report_outcome(controller: &BoardController, event: Event, now: u32) {
    let report = controller.report(now);
    match event {
        Event::Unlocked => info!(
            "Unlocked with {} at attempt {} in {}",
            report.combination().as_str(),
            report.progress().as_str(),
            report.elapsed().as_str()
        ),
        Event::Exhausted => warn!(
            "No combination opened the lock ({} attempts in {})",
            report.progress().as_str(),
            report.elapsed().as_str()
        ),
        Event::Faulted(fault) => error!("Run stopped: {:?}", fault),
        _ => {}
    }
}

/// Log the page the operator is on
fn show_state(controller: &BoardController, now: u32) {
    match controller.state() {
        State::Idle => info!("Menu: {:?}", controller.menu()),
        State::Preparing => info!("Attach the lock, then Select"),
        State::Armed => info!("Ready, Select to start"),
        State::Running => {
            let report = controller.report(now);
            debug!(
                "Dialing {} (attempt {})",
                report.combination().as_str(),
                report.progress().as_str()
            );
        }
        State::CalibrationIntro => info!("Calibration: Select to begin"),
        State::CalibratingZone => info!("First zone digit: {}", controller.zone_digit()),
        State::CalibratingServo => info!(
            "Servo bottom: {}",
            controller.mechanism().servo.current_position()
        ),
        State::Fault(fault) => error!("Stopped on fault {:?}, Select to return", fault),
        state => info!("State: {:?}", state),
    }
}
