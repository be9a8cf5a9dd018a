//! Per-method message decoding.
//!
//! The method set is closed and known up front, so dispatch is a plain
//! `match`. Each handler enforces its exact argument shape; deviations are
//! rejected, never coerced.

use crate::error::{BridgeOscError, Result};
use crate::event::Event;
use rosc::OscType;

/// `configure` key requesting an immediate state save.
pub const MSG_SAVE_NOW: &str = "save_now";
/// `configure` key whose value carries the plugin's chunk/state blob.
pub const MSG_SET_CHUNK: &str = "set_chunk";
/// `configure` key whose value carries a delimiter-separated custom-data triple.
pub const MSG_SET_CUSTOM: &str = "set_custom";

/// Field separator inside a `set_custom` value. Multi-byte on purpose: it
/// is not expected to occur in any field's content.
pub const CUSTOM_DATA_DELIMITER: char = '·';

const MIDI_STATUS_NOTE_OFF: u8 = 0x80;
const MIDI_STATUS_NOTE_ON: u8 = 0x90;

/// Decode one inbound message.
///
/// `Ok(Some(event))` is a decoded command; `Ok(None)` means the message
/// was validly addressed and shaped but intentionally produces no event
/// (unknown configure key, malformed custom-data triple, non-note MIDI
/// status) — the protocol relies on such payloads being ignorable.
pub fn decode(method: &str, args: &[OscType]) -> Result<Option<Event>> {
    match method {
        "configure" => configure(args),
        "control" => control(args),
        "program" => program(args),
        "midi_program" => midi_program(args),
        "midi" => midi(args),
        "show" => no_args(args, "show", Event::ShowGui(true)),
        "hide" => no_args(args, "hide", Event::ShowGui(false)),
        "quit" => no_args(args, "quit", Event::Quit),
        _ => Err(BridgeOscError::UnsupportedMethod {
            method: method.to_string(),
        }),
    }
}

fn configure(args: &[OscType]) -> Result<Option<Event>> {
    let (key, value) = match args {
        [OscType::String(key), OscType::String(value)] => (key.as_str(), value.as_str()),
        _ => return Err(mismatch("configure", "ss", args)),
    };

    match key {
        MSG_SAVE_NOW => Ok(Some(Event::SaveNow)),
        MSG_SET_CHUNK => Ok(Some(Event::SetChunkData(value.to_string()))),
        MSG_SET_CUSTOM => {
            let fields: Vec<&str> = value.split(CUSTOM_DATA_DELIMITER).collect();
            match fields.as_slice() {
                [kind, key, value] => Ok(Some(Event::SetCustomData {
                    kind: kind.to_string(),
                    key: key.to_string(),
                    value: value.to_string(),
                })),
                _ => Ok(None),
            }
        }
        _ => Ok(None),
    }
}

fn control(args: &[OscType]) -> Result<Option<Event>> {
    match args {
        [OscType::Int(index), OscType::Float(value)] => Ok(Some(Event::ParameterChanged {
            index: *index,
            value: *value,
        })),
        _ => Err(mismatch("control", "if", args)),
    }
}

fn program(args: &[OscType]) -> Result<Option<Event>> {
    match args {
        [OscType::Int(index)] => Ok(Some(Event::ProgramChanged { index: *index })),
        _ => Err(mismatch("program", "i", args)),
    }
}

fn midi_program(args: &[OscType]) -> Result<Option<Event>> {
    match args {
        [OscType::Int(bank), OscType::Int(program)] => Ok(Some(Event::MidiProgramChanged {
            bank: *bank,
            program: *program,
        })),
        _ => Err(mismatch("midi_program", "ii", args)),
    }
}

fn midi(args: &[OscType]) -> Result<Option<Event>> {
    let m = match args {
        [OscType::Midi(m)] => m,
        _ => return Err(mismatch("midi", "m", args)),
    };

    // Byte 0 of the 4-byte blob is the port, ignored here.
    let (mut status, note, velocity) = (m.status, m.data1, m.data2);

    // Zero-velocity note-on is note-off by MIDI convention.
    if is_note_on(status) && velocity == 0 {
        status &= !0x10;
    }

    if is_note_off(status) {
        Ok(Some(Event::NoteOff { note }))
    } else if is_note_on(status) {
        Ok(Some(Event::NoteOn { note, velocity }))
    } else {
        Ok(None)
    }
}

fn no_args(args: &[OscType], method: &'static str, event: Event) -> Result<Option<Event>> {
    if args.is_empty() {
        Ok(Some(event))
    } else {
        Err(mismatch(method, "", args))
    }
}

fn is_note_on(status: u8) -> bool {
    status & 0xF0 == MIDI_STATUS_NOTE_ON
}

fn is_note_off(status: u8) -> bool {
    status & 0xF0 == MIDI_STATUS_NOTE_OFF
}

fn mismatch(method: &'static str, expected: &'static str, args: &[OscType]) -> BridgeOscError {
    BridgeOscError::TypeSignatureMismatch {
        method,
        expected,
        got: signature_of(args),
    }
}

/// OSC type-tag string of `args`, for diagnostics.
fn signature_of(args: &[OscType]) -> String {
    args.iter()
        .map(|arg| match arg {
            OscType::Int(_) => 'i',
            OscType::Float(_) => 'f',
            OscType::String(_) => 's',
            OscType::Blob(_) => 'b',
            OscType::Long(_) => 'h',
            OscType::Double(_) => 'd',
            OscType::Char(_) => 'c',
            OscType::Midi(_) => 'm',
            OscType::Time(_) => 't',
            OscType::Color(_) => 'r',
            OscType::Bool(true) => 'T',
            OscType::Bool(false) => 'F',
            OscType::Nil => 'N',
            OscType::Inf => 'I',
            _ => '?',
        })
        .collect()
}
