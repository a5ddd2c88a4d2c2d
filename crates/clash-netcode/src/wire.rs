//! Text wire format for sequenced intents
//!
//! ```text
//! <sequence>;<flags>[;<trailing field>...]
//!
//! 5;00010          sequence 5, jump pressed
//! 12;10001;rtt=40  sequence 12, move_left + light_punch, unknown field ignored
//! ```
//!
//! `<flags>` holds one `0`/`1` character per action in `Action::ALL` order.
//! Decoders accept extra flag characters (actions added by a newer peer)
//! and extra `;` fields, but reject anything shorter than a full frame.

use crate::{Error, Result};
use clash_core::{Action, Intent, Sequence};

/// Field separator
pub const SEPARATOR: char = ';';

/// Shortest valid frame: one sequence digit, separator, one flag per action
pub const MIN_FRAME_LEN: usize = 2 + Action::COUNT;

/// An intent stamped with the sequence number it was sent under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequencedIntent {
    /// Sender-side sequence number
    pub sequence: Sequence,
    /// The intent itself
    pub intent: Intent,
}

impl SequencedIntent {
    /// Pair an intent with its sequence number
    pub fn new(sequence: Sequence, intent: Intent) -> Self {
        Self { sequence, intent }
    }
}

/// Encode a sequenced intent into its wire form
pub fn encode(sequence: Sequence, intent: Intent) -> String {
    let mut out = String::with_capacity(24);
    out.push_str(&sequence.to_string());
    out.push(SEPARATOR);
    for action in Action::ALL {
        out.push(if intent.is_pressed(action) { '1' } else { '0' });
    }
    out
}

/// Decode a wire message
///
/// Returns `Error::Deserialization` for truncated or garbled frames.
pub fn decode(message: &str) -> Result<SequencedIntent> {
    let message = message.trim();
    if message.len() < MIN_FRAME_LEN {
        return Err(Error::malformed(format!(
            "frame of {} bytes is shorter than the minimum of {}",
            message.len(),
            MIN_FRAME_LEN
        )));
    }

    let mut fields = message.split(SEPARATOR);
    let sequence_field = fields.next().unwrap_or_default();
    let flags_field = fields
        .next()
        .ok_or_else(|| Error::malformed("missing flag field"))?;

    if sequence_field.is_empty() || !sequence_field.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::malformed(format!(
            "sequence '{sequence_field}' is not an unsigned integer"
        )));
    }
    let sequence: Sequence = sequence_field
        .parse()
        .map_err(|e| Error::malformed(format!("sequence '{sequence_field}': {e}")))?;

    let flags = flags_field.as_bytes();
    if flags.len() < Action::COUNT {
        return Err(Error::malformed(format!(
            "expected {} action flags, got {}",
            Action::COUNT,
            flags.len()
        )));
    }

    let mut intent = Intent::NONE;
    for action in Action::ALL {
        match flags[action.index()] {
            b'1' => intent = intent.with(action),
            b'0' => {}
            other => {
                return Err(Error::malformed(format!(
                    "flag for {} is {:?}, expected '0' or '1'",
                    action,
                    other as char
                )))
            }
        }
    }

    Ok(SequencedIntent::new(sequence, intent))
}
