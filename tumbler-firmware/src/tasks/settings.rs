//! Settings persistence task
//!
//! Owns the flash and writes settings queued by the controller, so flash
//! erase times never stall the dial.

use defmt::*;

use tumbler_hal::FlashStorage as _;
use tumbler_hal_rp2040::flash::FlashStorage;

use crate::channels::SETTINGS_WRITE;

/// Settings task - handles flash persistence for calibration values
#[embassy_executor::task]
pub async fn settings_task(mut storage: FlashStorage<'static>) {
    info!("Settings task started");

    loop {
        let request = SETTINGS_WRITE.receive().await;
        info!("Saving {:?} = {}", request.key, request.value);

        match storage.write(request.key, &[request.value]).await {
            Ok(()) => info!("Setting saved"),
            Err(e) => error!("Failed to save setting: {:?}", e),
        }
    }
}
