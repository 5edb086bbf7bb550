// Licensed under the Apache-2.0 license

use crate::common::WriteLogger;
use crate::i2c::{BitBangI2c, BusConfig, BusConfigBuilder, Error, StretchLimit, READ_FAILED};
use crate::tests::sim_bus::{BusEvent, Console, SimBus};

const RTC: u8 = 0x68 << 1;
const EEPROM: u8 = 0xA0;

#[test]
fn rtc_ram_and_eeprom_poll_loop() {
    let rtc_sim = SimBus::device(0x68, 1);
    let eeprom_sim = SimBus::device(0x50, 2);
    let mut rtc = rtc_sim.master(BusConfig::default());
    let mut eeprom = eeprom_sim.master(BusConfig::default());
    rtc.init().unwrap();
    eeprom.init().unwrap();

    for _ in 0..3 {
        assert!(rtc.write(RTC, 0x08, 0x55));
        assert_eq!(rtc.read(RTC, 0x08), 0x55);
        assert!(eeprom.write_16bit_addr(EEPROM, 0x00, 0x00, 0xAA));
        assert_eq!(eeprom.read_16bit_addr(EEPROM, 0x00, 0x00), 0xAA);
    }

    let stops = |sim: &SimBus| {
        sim.events()
            .iter()
            .filter(|e| **e == BusEvent::Stop)
            .count()
    };
    assert_eq!(stops(&rtc_sim), 6);
    assert_eq!(stops(&eeprom_sim), 6);
    assert!(!rtc.is_started());
    assert!(!eeprom.is_started());
}

#[test]
fn buses_keep_separate_sessions() {
    let sim_a = SimBus::device(0x68, 1);
    let sim_b = SimBus::device(0x68, 1);
    let mut a = sim_a.master(BusConfig::default());
    let mut b = sim_b.master(BusConfig::default());
    a.init().unwrap();
    b.init().unwrap();

    a.start().unwrap();
    assert!(a.is_started());
    assert!(!b.is_started());

    // b opens with a fresh start, not a repeated one
    assert!(b.write(RTC, 0x10, 0x01));
    assert_eq!(sim_b.events().first(), Some(&BusEvent::Start));
    assert_eq!(sim_a.events(), vec![BusEvent::Start]);

    a.stop().unwrap();
    assert_eq!(sim_a.events(), vec![BusEvent::Start, BusEvent::Stop]);
}

#[test]
fn transaction_survives_clock_stretching() {
    let sim = SimBus::device(0x68, 1);
    let mut bus = sim.master(BusConfig::default());
    bus.init().unwrap();

    sim.stretch_next_clock(200);
    assert!(bus.write(RTC, 0x20, 0x7E));
    sim.stretch_next_clock(50);
    assert_eq!(bus.read(RTC, 0x20), 0x7E);
}

#[test]
fn bounded_stretch_aborts_transaction() {
    let sim = SimBus::device(0x68, 1);
    let config = BusConfigBuilder::new()
        .clock_stretch(StretchLimit::Polls(16))
        .build();
    let mut bus = sim.master(config);
    bus.init().unwrap();

    sim.stretch_next_clock(10);
    assert_eq!(bus.try_write(RTC, 0x20, 0x01), Ok(()));

    sim.stretch_next_clock(1_000);
    assert_eq!(bus.try_read(RTC, 0x20), Err(Error::ClockStretchTimeout));
}

#[test]
fn console_log_reports_nack_and_contention() {
    let sim = SimBus::device(0x50, 1);
    let mut console = Console::default();
    {
        let (scl, sda, delay) = sim.handles();
        let mut bus = BitBangI2c::with_logger(
            scl,
            sda,
            delay,
            BusConfig::default(),
            WriteLogger::new(&mut console),
        );
        bus.init().unwrap();

        assert_eq!(bus.read(RTC, 0x08), READ_FAILED);

        sim.jam_data(true);
        assert_eq!(bus.try_write(EEPROM, 0x00, 0x00), Err(Error::ArbitrationLoss));
    }

    let text = console.text();
    let lines: Vec<&str> = text.split("\r\n").collect();
    assert_eq!(lines[0], "[i2c] bus released");
    assert_eq!(lines[1], "[i2c] device 0xd0: address not acknowledged");
    assert!(lines.contains(&"[i2c] error: arbitration lost, forcing stop"));
    assert!(lines.contains(&"[i2c] error: arbitration lost during recovery, giving up on forced stop"));
    assert!(lines.contains(&"[i2c] error: transaction saw bus contention"));
}
