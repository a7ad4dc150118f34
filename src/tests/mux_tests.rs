use super::mock_transport::MockTransport;
use crate::bus::TransportError;
use crate::config::MuxConfig;
use crate::mux::{MuxError, Pca9846};
use parking_lot::Mutex;
use std::sync::Arc;

fn mux_with(mock: MockTransport) -> (Pca9846<MockTransport>, Arc<Mutex<MockTransport>>) {
    let bus = Arc::new(Mutex::new(mock));
    (Pca9846::new(bus.clone()), bus)
}

#[test]
fn set_port_roundtrip() {
    let (mut mux, _bus) = mux_with(MockTransport::new());

    for port in 0..=3 {
        assert_eq!(mux.set_port(port), Ok(()));
        assert_eq!(mux.first_port(), Ok(Some(port)));
    }
}

#[test]
fn set_port_out_of_range_disables_all() {
    let (mut mux, _bus) = mux_with(MockTransport::new());

    assert_eq!(mux.set_port(2), Ok(()));
    assert_eq!(mux.set_port(4), Ok(()));
    assert_eq!(mux.port_state(), Ok(0));

    assert_eq!(mux.set_port(1), Ok(()));
    assert_eq!(mux.set_port(200), Ok(()));
    assert_eq!(mux.port_state(), Ok(0));
}

#[test]
fn port_state_roundtrip() {
    let (mut mux, _bus) = mux_with(MockTransport::new());

    for mask in 0..16 {
        assert_eq!(mux.set_port_state(mask), Ok(()));
        assert_eq!(mux.port_state(), Ok(mask));
    }
}

#[test]
fn enable_port_accumulates_bits() {
    let (mut mux, _bus) = mux_with(MockTransport::new());

    assert_eq!(mux.enable_port(0), Ok(()));
    assert_eq!(mux.enable_port(2), Ok(()));
    assert_eq!(mux.port_state(), Ok(0b0101));

    assert_eq!(mux.enable_port(3), Ok(()));
    assert_eq!(mux.port_state(), Ok(0b1101));
}

#[test]
fn disable_port_clears_single_bit() {
    let (mut mux, _bus) = mux_with(MockTransport::new());

    assert_eq!(mux.set_port_state(0b1011), Ok(()));
    assert_eq!(mux.disable_port(1), Ok(()));
    assert_eq!(mux.port_state(), Ok(0b1001));
}

#[test]
fn first_port_on_empty_register() {
    let (mut mux, _bus) = mux_with(MockTransport::new());

    assert_eq!(mux.first_port(), Ok(None));
}

#[test]
fn first_port_picks_lowest_bit() {
    let (mut mux, _bus) = mux_with(MockTransport::new());

    assert_eq!(mux.set_port_state(0b1100), Ok(()));
    assert_eq!(mux.first_port(), Ok(Some(2)));
}

#[test]
fn enable_port_clamps_to_port_3() {
    let (mut mux, _bus) = mux_with(MockTransport::new());

    assert_eq!(mux.enable_port(9), Ok(()));
    assert_eq!(mux.port_state(), Ok(0b1000));
}

#[test]
fn disable_port_clamps_to_port_3() {
    let (mut mux, _bus) = mux_with(MockTransport::new());

    assert_eq!(mux.set_port_state(0b1111), Ok(()));
    assert_eq!(mux.disable_port(200), Ok(()));
    assert_eq!(mux.port_state(), Ok(0b0111));
}

#[test]
fn failed_reads_surface_transport_errors() {
    let mut mock = MockTransport::new();
    mock.fail_reads = true;
    let (mut mux, _bus) = mux_with(mock);

    assert!(matches!(mux.first_port(), Err(MuxError::Transport(_))));
    assert!(matches!(mux.port_state(), Err(MuxError::Transport(_))));
}

#[test]
fn read_modify_write_aborts_without_writing() {
    let mut mock = MockTransport::new();
    mock.fail_reads = true;
    let (mut mux, bus) = mux_with(mock);

    assert!(mux.enable_port(1).is_err());
    assert!(mux.disable_port(1).is_err());
    assert!(bus.lock().writes.is_empty());
}

#[test]
fn failed_write_surfaces_error() {
    let mut mock = MockTransport::new();
    mock.fail_writes = true;
    let (mut mux, _bus) = mux_with(mock);

    assert!(mux.set_port(0).is_err());
    assert!(mux.set_port_state(0b0011).is_err());
}

#[test]
fn unique_id_composes_big_endian() {
    let (mut mux, _bus) = mux_with(MockTransport::with_chip_id(0x123456));

    assert_eq!(mux.unique_id(), Ok(0x123456));
}

#[test]
fn unique_id_fails_on_short_read() {
    let mut mock = MockTransport::new();
    mock.short_id_reads = true;
    let (mut mux, _bus) = mux_with(mock);

    assert_eq!(
        mux.unique_id(),
        Err(MuxError::Transport(TransportError::ShortRead {
            expected: 3,
            actual: 1
        }))
    );
}

#[test]
fn initialize_accepts_expected_chip() {
    let (mut mux, _bus) = mux_with(MockTransport::new());

    assert_eq!(mux.initialize(), Ok(()));
    assert!(mux.is_connected());
}

#[test]
fn initialize_rejects_unknown_chip() {
    let (mut mux, _bus) = mux_with(MockTransport::with_chip_id(0x000857));

    assert_eq!(
        mux.initialize(),
        Err(MuxError::UnknownChip {
            expected: 0x000858,
            found: 0x000857
        })
    );
    assert!(!mux.is_connected());
}

#[test]
fn initialize_skips_id_read_when_ping_fails() {
    let mut mock = MockTransport::new();
    mock.ack = false;
    let (mut mux, bus) = mux_with(mock);

    assert_eq!(
        mux.initialize(),
        Err(MuxError::Transport(TransportError::NoAck(0x70)))
    );
    assert_eq!(bus.lock().id_reads, 0);
}

#[test]
fn is_connected_false_on_read_failure() {
    let mut mock = MockTransport::new();
    mock.fail_reads = true;
    let (mut mux, _bus) = mux_with(mock);

    assert!(!mux.is_connected());
}

#[test]
fn from_config_applies_address() {
    let bus = Arc::new(Mutex::new(MockTransport::new()));
    let mux = Pca9846::from_config(bus, &MuxConfig::new(0x71, 1)).unwrap();

    assert_eq!(mux.address(), 0x71);
}

#[test]
fn from_config_rejects_invalid_address() {
    let bus = Arc::new(Mutex::new(MockTransport::new()));

    assert!(matches!(
        Pca9846::from_config(bus, &MuxConfig::new(0x80, 1)),
        Err(MuxError::InvalidConfig(_))
    ));
}
