//! Input dispatch: keypad codes and command frames to actions.
//!
//! Pure mapping, no I/O and no blocking; the service applies whatever
//! comes back through the actuator commands in the same main-loop pass.
//!
//! Key map (4x4 pad, code 0 = no key):
//!
//! ```text
//!  1 buzzer on    2 buzzer off   3 fan on      4 fan off
//!  5 lamp on      6 lamp off     7 --          8 --
//!  9 motor +20    10 motor -20   11 motor 0    12 motor +100
//!    door 90         door 0         door 180      door 45
//!  13 live data   14 canned warm 15 canned cool 16 next mode
//! ```
//!
//! Codes 1-12 are Manual-only; 13-16 work in every mode. 7 and 8 are
//! unassigned pad positions.

use crate::link::CommandFrame;
use crate::mode::context::ClimateReading;
use crate::mode::OperatingMode;

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

/// A direct actuator request from a Manual-mode key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceAction {
    Buzzer(bool),
    Fan(bool),
    Lamp(bool),
    /// Motor speed preset with its paired door angle.
    MotorServo { speed: i16, angle: u16 },
}

/// What a keypad code asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Device(DeviceAction),
    SelectSource(SensorSource),
    AdvanceMode,
}

/// Where snapshot climate values come from.
///
/// The canned sources are a bench facility: they pin the climate to fixed
/// readings on either side of the Auto thresholds so the policy can be
/// exercised without a climate chamber. The latch survives mode changes
/// and applies in every mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SensorSource {
    #[default]
    Live,
    /// 35.0 C / 70.0 %RH — above both thresholds.
    CannedWarm,
    /// 25.0 C / 50.0 %RH — below both thresholds.
    CannedCool,
}

impl SensorSource {
    /// The fixed reading for a canned source; `None` for live.
    pub fn canned_climate(self) -> Option<ClimateReading> {
        match self {
            Self::Live => None,
            Self::CannedWarm => Some(ClimateReading::new(35, 0, 70, 0)),
            Self::CannedCool => Some(ClimateReading::new(25, 0, 50, 0)),
        }
    }
}

// ---------------------------------------------------------------------------
// Keypad dispatch
// ---------------------------------------------------------------------------

/// Map a keypad code to an action, honoring mode qualification.
///
/// Device codes outside Manual return `None` (ignored, not queued);
/// source and mode codes apply in every mode. Code 0 means no key.
pub fn on_key(code: u8, mode: OperatingMode) -> Option<Action> {
    let device = |action: DeviceAction| {
        (mode == OperatingMode::Manual).then_some(Action::Device(action))
    };

    match code {
        1 => device(DeviceAction::Buzzer(true)),
        2 => device(DeviceAction::Buzzer(false)),
        3 => device(DeviceAction::Fan(true)),
        4 => device(DeviceAction::Fan(false)),
        5 => device(DeviceAction::Lamp(true)),
        6 => device(DeviceAction::Lamp(false)),
        7 | 8 => None, // unassigned pad positions
        9 => device(DeviceAction::MotorServo {
            speed: 20,
            angle: 90,
        }),
        10 => device(DeviceAction::MotorServo {
            speed: -20,
            angle: 0,
        }),
        11 => device(DeviceAction::MotorServo {
            speed: 0,
            angle: 180,
        }),
        12 => device(DeviceAction::MotorServo {
            speed: 100,
            angle: 45,
        }),
        13 => Some(Action::SelectSource(SensorSource::Live)),
        14 => Some(Action::SelectSource(SensorSource::CannedWarm)),
        15 => Some(Action::SelectSource(SensorSource::CannedCool)),
        16 => Some(Action::AdvanceMode),
        _ => None, // 0 = idle; the scanner never reports above 16
    }
}

// ---------------------------------------------------------------------------
// Frame dispatch
// ---------------------------------------------------------------------------

/// What a received command frame asks for.
///
/// A frame can carry both a device mirror and a mode advance; the service
/// applies the mirror first, then the advance, so a frame that both sets
/// flags and leaves Remote lands its mirror before the exit cleanup wipes
/// the outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameActions {
    /// Flags to mirror onto the actuators; `Some` only in Remote.
    pub mirror: Option<CommandFrame>,
    /// Advance the mode rotation one step.
    pub advance_mode: bool,
}

/// Map a received frame to its actions, honoring mode qualification.
///
/// The toggle bit is level-triggered per received frame: every frame with
/// the bit set advances the mode once, so a peer holding the bit across
/// consecutive frames advances repeatedly. The deployed remote sends the
/// bit in exactly one frame per button press and relies on this reading.
pub fn on_frame(frame: CommandFrame, mode: OperatingMode) -> FrameActions {
    FrameActions {
        mirror: (mode == OperatingMode::Remote).then_some(frame),
        advance_mode: frame.mode_toggle,
    }
}
