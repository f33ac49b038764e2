use hexvm_control::{ControlError, Controller, Fault, Phase, DUMP_LEN, STATE_SIZE};
use pretty_assertions::assert_eq;

fn dump(c: &Controller) -> String {
    c.dump_hex(DUMP_LEN).expect("dump fits")
}

fn zero_dump() -> String {
    "0".repeat(DUMP_LEN)
}

#[test]
fn starts_empty_with_all_zero_state() {
    let c = Controller::new();
    assert_eq!(c.phase(), Phase::Empty);
    assert_eq!(dump(&c), zero_dump());
}

#[test]
fn dump_after_load_shows_unexecuted_image() {
    let mut c = Controller::new();
    c.load_binary(&[0x10, 0x01, 0x2a, 0x00]).unwrap();
    assert_eq!(c.phase(), Phase::Loaded);

    let text = dump(&c);
    assert!(text.starts_with("10012a00"));
    // no instruction retired, no status flag set
    assert_eq!(&text[8..], &zero_dump()[8..]);
    assert_eq!(c.machine().cycles(), 0);
}

#[test]
fn execute_moves_state_away_from_zero() {
    let mut c = Controller::new();
    c.load_binary(&[0x00]).unwrap();
    let exec = c.execute();
    assert_eq!(exec.retired, 1);
    assert_eq!(exec.fault, None);
    assert_eq!(c.phase(), Phase::Executed);
    assert_ne!(dump(&c), zero_dump());
}

#[test]
fn execute_again_stays_executed() {
    let mut c = Controller::new();
    c.load_binary(&[0x32, 0x00, 0x00]).unwrap();
    c.execute();
    let first = dump(&c);
    c.execute();
    assert_eq!(c.phase(), Phase::Executed);
    assert_ne!(dump(&c), first);
}

#[test]
fn consecutive_dumps_are_identical() {
    let mut c = Controller::new();
    c.load_hex(b"1003ff3203").unwrap();
    c.execute();
    assert_eq!(dump(&c), dump(&c));
}

#[test]
fn load_hex_decodes_before_installing() {
    let mut c = Controller::new();
    c.load_hex(b"00FF").unwrap();
    assert!(dump(&c).starts_with("00ff"));
}

#[test]
fn malformed_hex_leaves_state_untouched() {
    let mut c = Controller::new();
    c.load_binary(&[0x10, 0x02, 0x05, 0x00]).unwrap();
    c.execute();
    let before = dump(&c);

    let err = c.load_hex(b"0").unwrap_err();
    assert!(matches!(err, ControlError::InvalidEncoding { .. }));
    assert_eq!(dump(&c), before);
    assert_eq!(c.phase(), Phase::Executed);
}

#[test]
fn oversized_program_leaves_state_untouched() {
    let mut c = Controller::new();
    c.load_binary(&[0x01, 0x00]).unwrap();
    let before = dump(&c);

    let err = c.load_binary(&[0u8; 257]).unwrap_err();
    assert_eq!(
        err,
        ControlError::ProgramTooLarge {
            len: 257,
            capacity: 256
        }
    );
    assert_eq!(dump(&c), before);
    assert_eq!(c.phase(), Phase::Loaded);
}

#[test]
fn fault_is_reported_and_phase_still_executed() {
    let mut c = Controller::new();
    c.load_binary(&[0xee]).unwrap();
    let exec = c.execute();
    assert_eq!(
        exec.fault,
        Some(Fault::InvalidOpcode {
            opcode: 0xee,
            pc: 0
        })
    );
    assert_eq!(c.phase(), Phase::Executed);
}

#[test]
fn dump_below_state_size_fails_and_writes_nothing() {
    let c = Controller::new();
    assert_eq!(
        c.dump_hex(DUMP_LEN - 1),
        Err(ControlError::BufferTooSmall {
            required: DUMP_LEN,
            capacity: DUMP_LEN - 1
        })
    );

    let mut buf = vec![b'x'; 2 * STATE_SIZE - 2];
    assert!(c.dump_hex_into(&mut buf).is_err());
    assert!(buf.iter().all(|b| *b == b'x'));
}

#[test]
fn dump_into_reports_written_length() {
    let mut c = Controller::new();
    c.load_binary(&[0xab]).unwrap();
    let mut buf = [0u8; 2000];
    let written = c.dump_hex_into(&mut buf).unwrap();
    assert_eq!(written, DUMP_LEN);
    assert_eq!(&buf[..2], b"ab");
    assert!(buf[written..].iter().all(|b| *b == 0));
}
