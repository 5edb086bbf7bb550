// Licensed under the Apache-2.0 license

mod bus_scenarios;
mod device_scenarios;
