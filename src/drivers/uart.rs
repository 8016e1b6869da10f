//! Link UART to the transparent serial radio bridge (9600 8N1).
//!
//! Receive runs in a dedicated task that pulls one byte at a time from
//! the driver and feeds the frame decoder; completed frames go into the
//! lock-free queue, rejects into the atomic counters. The task stands in
//! for an RX interrupt with the identical hand-off discipline: nothing
//! in here is ever touched by the main loop.
//!
//! Transmit is a blocking per-byte write from the main loop; at 9600
//! baud a full telemetry frame occupies the wire for ~10 ms.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: real UART2 driver plus the receive task.
//! On host/test: everything is a no-op; tests feed the decoder and the
//! queue directly.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

use super::hw_init::HwInitError;

/// UART peripheral index for the radio bridge.
#[cfg(target_os = "espidf")]
const LINK_UART_PORT: uart_port_t = 2;

/// Driver-side receive buffer; frames are 4 bytes, so this rides out
/// long main-loop stalls many times over.
#[cfg(target_os = "espidf")]
const RX_BUFFER_LEN: i32 = 256;

/// Install the UART driver and route it to the link pins.
#[cfg(target_os = "espidf")]
pub fn init() -> Result<(), HwInitError> {
    use crate::pins;

    let config = uart_config_t {
        baud_rate: pins::LINK_UART_BAUD as i32,
        data_bits: uart_word_length_t_UART_DATA_8_BITS,
        parity: uart_parity_t_UART_PARITY_DISABLE,
        stop_bits: uart_stop_bits_t_UART_STOP_BITS_1,
        flow_ctrl: uart_hw_flowcontrol_t_UART_HW_FLOWCTRL_DISABLE,
        ..Default::default()
    };

    // SAFETY: Called once from main() before the receive task exists;
    // the driver APIs are internally synchronised after install.
    unsafe {
        let ret = uart_driver_install(LINK_UART_PORT, RX_BUFFER_LEN, 0, 0, core::ptr::null_mut(), 0);
        if ret != ESP_OK as i32 {
            return Err(HwInitError::UartInitFailed(ret));
        }
        let ret = uart_param_config(LINK_UART_PORT, &config);
        if ret != ESP_OK as i32 {
            return Err(HwInitError::UartInitFailed(ret));
        }
        let ret = uart_set_pin(
            LINK_UART_PORT,
            pins::LINK_UART_TX_GPIO,
            pins::LINK_UART_RX_GPIO,
            -1,
            -1,
        );
        if ret != ESP_OK as i32 {
            return Err(HwInitError::UartInitFailed(ret));
        }
    }

    info!(
        "uart: link on UART{} @ {} baud (tx=GPIO{}, rx=GPIO{})",
        LINK_UART_PORT,
        pins::LINK_UART_BAUD,
        pins::LINK_UART_TX_GPIO,
        pins::LINK_UART_RX_GPIO
    );
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init() -> Result<(), HwInitError> {
    log::info!("uart(sim): link init skipped");
    Ok(())
}

/// Spawn the receive task.  ESP-IDF implements `std::thread` as FreeRTOS
/// tasks via pthreads; the config set here applies to the next spawn
/// from this thread, pinning the task to core 0 alongside the main loop
/// so the frame queue stays same-core SPSC.
#[cfg(target_os = "espidf")]
pub fn start_rx_task() {
    use crate::events;
    use crate::link::{CommandDecoder, FrameEvent};

    unsafe {
        let mut cfg = esp_create_default_pthread_config();
        cfg.pin_to_core = 0;
        cfg.prio = 6;
        cfg.stack_size = 4096;
        cfg.thread_name = c"link-rx".as_ptr();
        let ret = esp_pthread_set_cfg(&cfg);
        if ret != ESP_OK as i32 {
            log::warn!("uart: pthread cfg failed (rc={ret}); rx task uses defaults");
        }
    }

    std::thread::spawn(move || {
        let mut decoder = CommandDecoder::new();
        let mut byte = 0u8;
        loop {
            // SAFETY: single reader of this port; buffer outlives the call.
            let n = unsafe {
                uart_read_bytes(
                    LINK_UART_PORT,
                    (&raw mut byte).cast(),
                    1,
                    u32::MAX, // block until a byte arrives
                )
            };
            if n != 1 {
                continue;
            }
            match decoder.feed(byte) {
                FrameEvent::Ready(frame) => {
                    events::push_frame(frame);
                }
                FrameEvent::Rejected(err) => events::record_frame_error(err),
                FrameEvent::None => {}
            }
        }
    });

    info!("uart: receive task started");
}

#[cfg(not(target_os = "espidf"))]
pub fn start_rx_task() {
    log::info!("uart(sim): no receive task");
}

/// Blocking single-byte transmit.
#[cfg(target_os = "espidf")]
pub fn write_byte(byte: u8) {
    // SAFETY: uart_write_bytes copies out of the buffer before returning;
    // main loop is the only transmitter.
    unsafe {
        uart_write_bytes(LINK_UART_PORT, (&raw const byte).cast(), 1);
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn write_byte(_byte: u8) {}
