//! Telnet-aware framing for the control channel: strips/escapes Telnet IAC sequences so that the
//! rest of the session can read and write plain CRLF-terminated command lines.

use super::{command::Command, error::ControlChanError, Reply};
use bytes::BytesMut;
use std::io::Write;
use tokio_util::codec::{Decoder, Encoder};

const IAC: u8 = 255;
const WILL: u8 = 251;
const WONT: u8 = 252;
const DO: u8 = 253;
const DONT: u8 = 254;
const SB: u8 = 250;
const SE: u8 = 240;

/// Implements tokio's [`Decoder`]/[`Encoder`] for the control channel: decodes lines into
/// [`Command`]s after removing Telnet control sequences, and escapes `0xFF` bytes on the way out.
pub struct TelnetCodec {
    // Index into `buf` already scanned for a newline; avoids re-scanning the whole buffer on
    // every partial read.
    next_index: usize,
    // Replies to Telnet option negotiation (WONT/DONT) queued to go out with the next write.
    pending_option_replies: Vec<u8>,
}

impl TelnetCodec {
    pub fn new() -> Self {
        TelnetCodec {
            next_index: 0,
            pending_option_replies: Vec::new(),
        }
    }

    // Strips Telnet IAC sequences from `raw`, unescapes doubled 0xFF, and queues option-negotiation
    // replies. Returns the cleaned line.
    fn strip_telnet(&mut self, raw: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(raw.len());
        let mut i = 0;
        while i < raw.len() {
            if raw[i] != IAC {
                out.push(raw[i]);
                i += 1;
                continue;
            }
            // raw[i] == IAC
            match raw.get(i + 1).copied() {
                Some(IAC) => {
                    out.push(IAC);
                    i += 2;
                }
                Some(WILL) | Some(DO) => {
                    if let Some(&opt) = raw.get(i + 2) {
                        let reply = if raw[i + 1] == WILL { DONT } else { WONT };
                        self.pending_option_replies.extend_from_slice(&[IAC, reply, opt]);
                    }
                    i += 3;
                }
                Some(WONT) | Some(DONT) => {
                    i += 3;
                }
                Some(SB) => {
                    // Skip to the matching IAC SE.
                    let mut j = i + 2;
                    while j + 1 < raw.len() && !(raw[j] == IAC && raw[j + 1] == SE) {
                        j += 1;
                    }
                    i = j + 2;
                }
                Some(_) => {
                    // Two-byte Telnet command (NOP, AYT, etc).
                    i += 2;
                }
                None => {
                    i += 1;
                }
            }
        }
        out
    }
}

impl Decoder for TelnetCodec {
    type Item = Command;
    type Error = ControlChanError;

    fn decode(&mut self, buf: &mut BytesMut) -> Result<Option<Command>, Self::Error> {
        if let Some(newline_offset) = buf[self.next_index..].iter().position(|b| *b == b'\n') {
            let newline_index = newline_offset + self.next_index;
            let line = buf.split_to(newline_index + 1);
            self.next_index = 0;
            let cleaned = self.strip_telnet(&line);
            let text = std::str::from_utf8(&cleaned).map_err(|_| ControlChanError::from(super::error::ControlChanErrorKind::Utf8Error))?;
            Ok(Some(Command::parse(text)))
        } else {
            self.next_index = buf.len();
            Ok(None)
        }
    }
}

impl Encoder<Reply> for TelnetCodec {
    type Error = ControlChanError;

    fn encode(&mut self, reply: Reply, buf: &mut BytesMut) -> Result<(), Self::Error> {
        if !self.pending_option_replies.is_empty() {
            buf.extend(std::mem::take(&mut self.pending_option_replies));
        }

        let mut buffer = vec![];
        match reply {
            Reply::None => return Ok(()),
            Reply::CodeAndMsg { code, msg } => {
                if msg.is_empty() {
                    writeln!(buffer, "{} \r", code as u32)?;
                } else {
                    writeln!(buffer, "{} {}\r", code as u32, msg)?;
                }
            }
            Reply::MultiLine { code, mut lines } => {
                let last_line = lines.pop().unwrap_or_default();
                for it in lines.iter_mut() {
                    if it.chars().next().is_some_and(|c| c.is_ascii_digit()) {
                        it.insert(0, ' ');
                    }
                }
                if lines.is_empty() {
                    writeln!(buffer, "{} {}\r", code as u32, last_line)?;
                } else {
                    write!(buffer, "{}-{}\r\n{} {}\r\n", code as u32, lines.join("\r\n"), code as u32, last_line)?;
                }
            }
        }
        // Escape any literal 0xFF in the outgoing text so the client's Telnet layer doesn't
        // misinterpret it as an IAC byte.
        for &b in &buffer {
            buf.extend_from_slice(&[b]);
            if b == IAC {
                buf.extend_from_slice(&[IAC]);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_plain_line() {
        let mut codec = TelnetCodec::new();
        let mut buf = BytesMut::from("NOOP\r\n");
        let cmd = codec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(cmd.name, "NOOP");
    }

    #[test]
    fn strips_will_do_negotiation_and_queues_reply() {
        let mut codec = TelnetCodec::new();
        let mut line = vec![IAC, WILL, 1];
        line.extend_from_slice(b"NOOP\r\n");
        let mut buf = BytesMut::from(&line[..]);
        let cmd = codec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(cmd.name, "NOOP");
        assert_eq!(codec.pending_option_replies, vec![IAC, DONT, 1]);
    }

    #[test]
    fn strips_subnegotiation() {
        let mut codec = TelnetCodec::new();
        let mut line = vec![IAC, SB, 1, 2, 3, IAC, SE];
        line.extend_from_slice(b"NOOP\r\n");
        let mut buf = BytesMut::from(&line[..]);
        let cmd = codec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(cmd.name, "NOOP");
    }

    #[test]
    fn unescapes_doubled_iac() {
        let mut codec = TelnetCodec::new();
        let mut line = vec![b'A', IAC, IAC, b'B'];
        line.extend_from_slice(b"\r\n");
        let mut buf = BytesMut::from(&line[..]);
        let cleaned = codec.strip_telnet(&buf.split_to(buf.len()));
        assert_eq!(cleaned, b"A\xffB\r\n");
    }

    #[test]
    fn encode_roundtrips_plain_reply() {
        let mut codec = TelnetCodec::new();
        let mut buf = BytesMut::new();
        codec.encode(Reply::new(super::super::reply::ReplyCode::CommandOkay, "ok"), &mut buf).unwrap();
        assert_eq!(&buf[..], b"200 ok\r\n");
    }
}
