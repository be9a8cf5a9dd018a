//! Decoded host commands.

/// A decoded, host-intent-bearing command, ready for the audio/plugin side.
///
/// Every variant owns its payload. Strings are copied out of the inbound
/// message at decode time; the transport is free to reuse its buffers as
/// soon as the handler returns.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Save plugin state now (`configure` with the save-now key).
    SaveNow,
    /// Replace the plugin's chunk/state blob (string-encoded).
    SetChunkData(String),
    /// Set one custom data entry.
    SetCustomData {
        kind: String,
        key: String,
        value: String,
    },
    ParameterChanged { index: i32, value: f32 },
    ProgramChanged { index: i32 },
    MidiProgramChanged { bank: i32, program: i32 },
    NoteOn { note: u8, velocity: u8 },
    NoteOff { note: u8 },
    /// Show (`true`) or hide (`false`) the plugin GUI.
    ShowGui(bool),
    /// Host requested shutdown. Shutdown policy is the consumer's call;
    /// this is just another event in the queue.
    Quit,
}
