//! Main-loop stall guard over the ESP-IDF Task Watchdog Timer.
//!
//! The loop's worst normal pass is bounded: a full climate probe
//! transfer (~25 ms) plus a telemetry frame at 9600 baud (~10 ms), on a
//! 10 ms pace. A multi-second budget therefore only ever expires on a
//! genuine hang, and the TWDT panics the device back to a clean boot.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

/// Guard handle. Dropping it does not unsubscribe; the loop never ends.
pub struct Watchdog {
    #[cfg(target_os = "espidf")]
    armed: bool,
}

impl Watchdog {
    /// Subscribe the calling task with a `timeout_ms` stall budget.
    ///
    /// A subscribe failure is logged and leaves the loop unguarded
    /// rather than refusing to run.
    pub fn subscribe(timeout_ms: u32) -> Self {
        #[cfg(target_os = "espidf")]
        {
            Self {
                armed: arm(timeout_ms),
            }
        }

        #[cfg(not(target_os = "espidf"))]
        {
            log::info!("watchdog(sim): unguarded ({timeout_ms} ms budget ignored)");
            Self {}
        }
    }

    /// Reset the stall budget. Called once per main-loop pass.
    pub fn feed(&self) {
        #[cfg(target_os = "espidf")]
        if self.armed {
            // SAFETY: plain FFI call; the calling task subscribed in
            // subscribe().
            unsafe {
                esp_task_wdt_reset();
            }
        }
    }
}

#[cfg(target_os = "espidf")]
fn arm(timeout_ms: u32) -> bool {
    // SAFETY: the config struct is read synchronously by the call; a
    // null task handle means "the calling task".
    unsafe {
        let cfg = esp_task_wdt_config_t {
            timeout_ms,
            idle_core_mask: 0,
            trigger_panic: true,
        };
        let rc = esp_task_wdt_reconfigure(&cfg);
        if rc != ESP_OK {
            log::warn!("watchdog: TWDT reconfigure rc={rc} (already configured?)");
        }

        let rc = esp_task_wdt_add(core::ptr::null_mut());
        if rc == ESP_OK {
            log::info!("watchdog: armed, {timeout_ms} ms stall budget");
            true
        } else {
            log::warn!("watchdog: subscribe failed rc={rc}; loop runs unguarded");
            false
        }
    }
}
