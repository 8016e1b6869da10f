//! Millisecond tick source using ESP-IDF's esp_timer API.
//!
//! One periodic 1 kHz timer drives the global [`TICK`] scheduler.
//! Callbacks execute in the ESP timer service task (not an ISR), which
//! can preempt the main loop at any instruction, so the callback touches
//! nothing but the scheduler's atomic API.
//!
//! On host targets no timer exists; tests drive `TICK.on_tick()`
//! directly.

#[cfg(target_os = "espidf")]
use crate::mode::OperatingMode;
#[cfg(target_os = "espidf")]
use crate::tick::TICK;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
static mut TICK_TIMER: esp_timer_handle_t = core::ptr::null_mut();

#[cfg(target_os = "espidf")]
unsafe extern "C" fn tick_cb(_arg: *mut core::ffi::c_void) {
    // The published mode is a single atomic word; reading it here keeps
    // the scheduler arms consistent with whatever the main loop last
    // committed.
    TICK.on_tick(OperatingMode::published());
}

/// Start the 1 kHz tick timer.
#[cfg(target_os = "espidf")]
pub fn start_tick_timer() {
    // SAFETY: TICK_TIMER is written here once at boot from the single
    // main-task context before the callback can fire. The callback only
    // touches the atomic scheduler API.
    unsafe {
        let args = esp_timer_create_args_t {
            callback: Some(tick_cb),
            arg: core::ptr::null_mut(),
            dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
            name: c"tick".as_ptr(),
            skip_unhandled_events: true,
        };
        let ret = esp_timer_create(&args, &raw mut TICK_TIMER);
        if ret != ESP_OK {
            log::error!("hw_timer: tick timer create failed (rc={ret}) — scheduler will never fire");
            return;
        }
        let ret = esp_timer_start_periodic(TICK_TIMER, 1_000); // 1ms
        if ret != ESP_OK {
            log::error!("hw_timer: tick timer start failed (rc={ret})");
            return;
        }
    }
    info!("hw_timer: 1 kHz tick started");
}

#[cfg(not(target_os = "espidf"))]
pub fn start_tick_timer() {
    log::info!("hw_timer(sim): no tick timer (tests drive TICK directly)");
}

/// Stop the tick timer.
#[cfg(target_os = "espidf")]
pub fn stop_tick_timer() {
    // SAFETY: TICK_TIMER is a valid handle if start_tick_timer()
    // succeeded; null-check prevents stopping a never-created timer.
    unsafe {
        let handle = TICK_TIMER;
        if !handle.is_null() {
            esp_timer_stop(handle);
        }
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn stop_tick_timer() {}
