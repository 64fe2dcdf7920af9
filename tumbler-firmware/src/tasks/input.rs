//! Button input tasks
//!
//! One task per button. Buttons pull the pin low; a press is reported
//! once it has stayed down through the debounce delay.

use defmt::*;
use embassy_rp::gpio::Input;
use embassy_time::{Duration, Timer};

use tumbler_core::state::InputEvent;

use crate::channels::INPUT_CHANNEL;

/// Settling time after an edge
const DEBOUNCE_MS: u64 = 20;

/// Button task - reports presses of one button
#[embassy_executor::task(pool_size = 4)]
pub async fn button_task(mut button: Input<'static>, event: InputEvent) {
    info!("Button task started for {:?}", event);

    loop {
        button.wait_for_falling_edge().await;

        // Debounce
        Timer::after(Duration::from_millis(DEBOUNCE_MS)).await;

        if button.is_low() {
            debug!("Button: {:?}", event);
            INPUT_CHANNEL.send(event).await;

            button.wait_for_high().await;

            // Debounce after release
            Timer::after(Duration::from_millis(DEBOUNCE_MS)).await;
        }
    }
}
