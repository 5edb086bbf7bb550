// Licensed under the Apache-2.0 license

use crate::devices::ds1307::{self, RAM_SIZE};
use crate::devices::{At24c32, DeviceError, Ds1307, Time};
use crate::i2c::{BusConfig, Error};
use crate::tests::sim_bus::SimBus;
use embedded_hal::i2c::NoAcknowledgeSource;

#[test]
fn rtc_time_round_trip() {
    let sim = SimBus::device(0x68, 1).with_register(u16::from(ds1307::reg::SECONDS), 0x80);
    let mut bus = sim.master(BusConfig::default());
    bus.init().unwrap();
    let mut rtc = Ds1307::new(bus);

    assert!(!rtc.is_running().unwrap());

    let time = Time {
        hours: 17,
        minutes: 45,
        seconds: 9,
    };
    rtc.set_time(time).unwrap();

    assert_eq!(rtc.time().unwrap(), time);
    assert!(rtc.is_running().unwrap());
    assert_eq!(sim.register(u16::from(ds1307::reg::HOURS)), Some(0x17));
}

#[test]
fn rtc_ram_sweep() {
    let sim = SimBus::device(0x68, 1);
    let mut bus = sim.master(BusConfig::default());
    bus.init().unwrap();
    let mut rtc = Ds1307::new(bus);

    for offset in 0..RAM_SIZE {
        let value = u8::try_from(offset).unwrap() ^ 0xA5;
        rtc.write_ram(offset, value).unwrap();
    }
    for offset in 0..RAM_SIZE {
        let value = u8::try_from(offset).unwrap() ^ 0xA5;
        assert_eq!(rtc.read_ram(offset).unwrap(), value);
    }
    assert_eq!(sim.register(0x3F), Some(0x37 ^ 0xA5));
    assert_eq!(rtc.read_ram(RAM_SIZE), Err(DeviceError::OutOfBounds));
}

#[test]
fn eeprom_block_read() {
    let sim = SimBus::device(0x50, 2);
    let mut bus = sim.master(BusConfig::default());
    bus.init().unwrap();
    let mut eeprom = At24c32::new(bus);

    let data = *b"bitbang";
    for (offset, &byte) in (0x0FF0u16..).zip(data.iter()) {
        eeprom.write_byte(offset, byte).unwrap();
    }

    let mut buf = [0u8; 7];
    eeprom.read(0x0FF0, &mut buf).unwrap();
    assert_eq!(buf, data);
}

#[test]
fn missing_eeprom_reports_address_nack() {
    let sim = SimBus::device(0x68, 1);
    let mut bus = sim.master(BusConfig::default());
    bus.init().unwrap();
    let mut eeprom = At24c32::new(bus);

    assert_eq!(
        eeprom.read_byte(0),
        Err(DeviceError::Bus(Error::NoAcknowledge(
            NoAcknowledgeSource::Address
        )))
    );
}
